use crate::args::AddArgs;
use crate::commands::{describe, Out};
use crate::model::Transaction;
use crate::tracker::Tracker;
use crate::{Config, Result};

/// Validates the new transaction and adds it to the front of the list.
pub async fn add_transaction(config: Config, args: AddArgs) -> Result<Out<Transaction>> {
    let mut tracker = Tracker::load(config);
    let input = args.input(tracker.today());
    let added = tracker.ledger_mut().add(&input, None)?.clone();
    let message = format!("Added {} ({})", describe(&added), added.id());
    Ok(Out::new(message, added))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{Error, ValidationError};
    use crate::model::{Amount, TransactionType};
    use crate::storage::{KeyValueStore, TRANSACTIONS};
    use crate::test::TestEnv;
    use rust_decimal::Decimal;

    #[tokio::test]
    async fn test_add_transaction() {
        let env = TestEnv::new().await;
        let args = AddArgs::new("Gaji", "100000", "income", Some("2024-01-01".to_string()));
        let out = add_transaction(env.config(), args).await.unwrap();
        assert!(out.message().starts_with("Added 2024-01-01 income Rp100.000,00 Gaji"));

        let added = out.structure().unwrap();
        assert_eq!(added.amount(), Amount::new(Decimal::from(100_000)));
        assert_eq!(added.transaction_type(), TransactionType::Income);

        // what is read back from storage is the same transaction
        let tracker = Tracker::load(env.config());
        assert_eq!(tracker.ledger().transactions(), std::slice::from_ref(added));
    }

    #[tokio::test]
    async fn test_add_prepends() {
        let env = TestEnv::new().await;
        env.add("first", "1", "income", "2024-01-01").await;
        env.add("second", "2", "expense", "2024-01-02").await;
        let tracker = Tracker::load(env.config());
        let descriptions: Vec<&str> = tracker
            .ledger()
            .transactions()
            .iter()
            .map(|t| t.description())
            .collect();
        assert_eq!(descriptions, vec!["second", "first"]);
    }

    #[tokio::test]
    async fn test_add_defaults_to_today() {
        let env = TestEnv::new().await;
        let out = add_transaction(env.config(), AddArgs::new("Kopi", "25000", "expense", None))
            .await
            .unwrap();
        assert_eq!(out.structure().unwrap().date(), env.config().today());
    }

    #[tokio::test]
    async fn test_add_invalid_changes_nothing() {
        let env = TestEnv::new().await;
        let args = AddArgs::new("   ", "100", "income", None);
        let err = add_transaction(env.config(), args).await.unwrap_err();
        assert_eq!(
            err.downcast_ref::<Error>(),
            Some(&Error::Validation(ValidationError::EmptyDescription))
        );

        let args = AddArgs::new("Refund", "-5", "income", None);
        let err = add_transaction(env.config(), args).await.unwrap_err();
        assert!(matches!(
            err.downcast_ref::<Error>(),
            Some(Error::Validation(ValidationError::NonPositiveAmount(_)))
        ));

        assert_eq!(env.config().store().get(TRANSACTIONS).unwrap(), None);
    }
}
