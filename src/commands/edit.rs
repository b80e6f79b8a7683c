use crate::args::{EditArgs, Selection};
use crate::commands::{describe, select, Out};
use crate::model::{Transaction, TransactionInput};
use crate::tracker::Tracker;
use crate::{Config, Result};

/// Changes the selected transaction. Fields that are not given keep their current values, and the
/// result is validated as a whole.
pub async fn edit_transaction(config: Config, args: EditArgs) -> Result<Out<Transaction>> {
    let mut tracker = Tracker::load(config);
    let selection = args.selector().selection()?;
    let (index, existing) = select(tracker.ledger(), &selection)?;
    let input = args.apply(TransactionInput::from_transaction(existing));

    let ledger = tracker.ledger_mut();
    let edited = match &selection {
        Selection::Id(id) => ledger.update(id, &input)?,
        Selection::Index(_) => ledger.add(&input, Some(index))?,
    }
    .clone();

    let message = format!("Updated {} ({})", describe(&edited), edited.id());
    Ok(Out::new(message, edited))
}
