//! Delete command handler.

use crate::args::{DeleteArgs, Selection};
use crate::commands::{describe, Out};
use crate::model::Transaction;
use crate::tracker::Tracker;
use crate::{Config, Result};

/// Removes the selected transaction. When the selection does not exist nothing is changed.
pub async fn delete_transaction(config: Config, args: DeleteArgs) -> Result<Out<Transaction>> {
    let mut tracker = Tracker::load(config);
    let removed = match args.selector().selection()? {
        Selection::Id(id) => tracker.ledger_mut().remove(&id)?,
        Selection::Index(index) => tracker.ledger_mut().remove_at(index)?,
    };
    let message = format!("Deleted {} ({})", describe(&removed), removed.id());
    Ok(Out::new(message, removed))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::args::Selector;
    use crate::error::Error;
    use crate::test::TestEnv;

    #[tokio::test]
    async fn test_delete_by_index() {
        let env = TestEnv::new().await;
        let kept = env.add("Gaji", "100", "income", "2024-01-01").await;
        let gone = env.add("Makan", "30", "expense", "2024-01-02").await;

        let out = delete_transaction(env.config(), DeleteArgs::new(Selector::index(0)))
            .await
            .unwrap();
        assert_eq!(out.structure(), Some(&gone));
        assert!(out.message().starts_with("Deleted 2024-01-02 expense"));

        let tracker = Tracker::load(env.config());
        assert_eq!(tracker.ledger().transactions(), &[kept]);
    }

    #[tokio::test]
    async fn test_delete_by_id() {
        let env = TestEnv::new().await;
        let gone = env.add("Gaji", "100", "income", "2024-01-01").await;
        let kept = env.add("Makan", "30", "expense", "2024-01-02").await;

        let args = DeleteArgs::new(Selector::id(gone.id().as_str()));
        delete_transaction(env.config(), args).await.unwrap();

        let tracker = Tracker::load(env.config());
        assert_eq!(tracker.ledger().transactions(), &[kept]);
    }

    #[tokio::test]
    async fn test_delete_out_of_range() {
        let env = TestEnv::new().await;
        env.add("Gaji", "100", "income", "2024-01-01").await;
        env.add("Makan", "30", "expense", "2024-01-02").await;
        let before = Tracker::load(env.config()).ledger().transactions().to_vec();

        let err = delete_transaction(env.config(), DeleteArgs::new(Selector::index(5)))
            .await
            .unwrap_err();
        assert_eq!(
            err.downcast_ref::<Error>(),
            Some(&Error::IndexOutOfRange { index: 5, len: 2 })
        );

        let after = Tracker::load(env.config()).ledger().transactions().to_vec();
        assert_eq!(before, after);
    }

    #[tokio::test]
    async fn test_delete_unknown_id() {
        let env = TestEnv::new().await;
        env.add("Gaji", "100", "income", "2024-01-01").await;
        let err = delete_transaction(env.config(), DeleteArgs::new(Selector::id("missing")))
            .await
            .unwrap_err();
        assert!(matches!(err.downcast_ref::<Error>(), Some(Error::NotFound(_))));
        assert_eq!(Tracker::load(env.config()).ledger().len(), 1);
    }
}
