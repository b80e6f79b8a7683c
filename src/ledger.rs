//! The transaction list and its persistence.
//!
//! `Ledger` holds transactions most-recent-first (new entries are prepended) and writes the whole
//! list to the `transactions` key after every mutation. Subscribers are notified once the write
//! has succeeded.
//!
//! Stored records that cannot be made into a valid transaction are not shown, but they are kept
//! as-is at the end of the stored list so that nothing the user saved is lost.

use crate::error::Error;
use crate::model::{Transaction, TransactionId, TransactionInput};
use crate::storage::{self, KeyValueStore, TRANSACTIONS};
use crate::Result;
use anyhow::Context;
use chrono::NaiveDate;
use serde::Serialize;
use serde_json::Value;
use std::fmt::{Debug, Formatter};
use std::sync::Arc;
use tracing::{debug, warn};

/// Describes a change to the ledger, sent to subscribers after it has been persisted.
#[derive(Debug, Clone, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case", tag = "event")]
pub enum LedgerEvent {
    Added { id: TransactionId },
    Replaced { index: usize, id: TransactionId },
    Removed { index: usize, id: TransactionId },
}

type Listener = Box<dyn FnMut(&LedgerEvent) + Send>;

pub struct Ledger {
    store: Arc<dyn KeyValueStore>,
    transactions: Vec<Transaction>,
    /// Stored records that failed validation, written back unchanged.
    unreadable: Vec<Value>,
    listeners: Vec<Listener>,
}

impl Debug for Ledger {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Ledger")
            .field("store", &self.store)
            .field("transactions", &self.transactions)
            .field("unreadable", &self.unreadable.len())
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

impl Ledger {
    /// Loads the transaction list from `store`.
    ///
    /// This never fails. Missing or malformed data gives an empty ledger, and individual records
    /// that cannot be made valid are skipped but kept in storage. If a valid record had to be
    /// given an ID, the list is written back so that IDs stay stable from one run to the next.
    pub fn load(store: Arc<dyn KeyValueStore>, today: NaiveDate) -> Self {
        let records: Vec<Value> = storage::read_json(store.as_ref(), TRANSACTIONS).unwrap_or_default();
        let mut assigned_ids = false;
        let mut transactions = Vec::with_capacity(records.len());
        let mut unreadable = Vec::new();
        for (ix, record) in records.into_iter().enumerate() {
            match Transaction::from_stored(&record, today) {
                Ok(t) => {
                    assigned_ids |= record.get("id").and_then(Value::as_str) != Some(t.id().as_str());
                    transactions.push(t);
                }
                Err(e) => {
                    warn!("Skipping stored transaction at position {ix}: {e}");
                    unreadable.push(record);
                }
            }
        }
        debug!(
            "Loaded {} transaction(s), skipped {}",
            transactions.len(),
            unreadable.len()
        );

        let ledger = Self {
            store,
            transactions,
            unreadable,
            listeners: Vec::new(),
        };
        if assigned_ids {
            if let Err(e) = ledger.persist(&ledger.transactions) {
                warn!("Unable to save the new transaction IDs: {e:#}");
            }
        }
        ledger
    }

    pub fn transactions(&self) -> &[Transaction] {
        &self.transactions
    }

    pub fn len(&self) -> usize {
        self.transactions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transactions.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Transaction> {
        self.transactions.get(index)
    }

    /// Finds a transaction and its current position by ID.
    pub fn find(&self, id: &TransactionId) -> Option<(usize, &Transaction)> {
        self.transactions
            .iter()
            .enumerate()
            .find(|(_, t)| t.id() == id)
    }

    /// Registers `listener` to be called after every successful mutation.
    pub fn subscribe<F>(&mut self, listener: F)
    where
        F: FnMut(&LedgerEvent) + Send + 'static,
    {
        self.listeners.push(Box::new(listener));
    }

    /// Validates `input` and either replaces the transaction at `edit_index` or, when there is no
    /// edit index, adds it to the front of the list.
    pub fn add(
        &mut self,
        input: &TransactionInput,
        edit_index: Option<usize>,
    ) -> Result<&Transaction> {
        if let Some(index) = edit_index {
            return self.replace_at(index, input);
        }
        let transaction = input.validate(TransactionId::generate()).map_err(Error::from)?;
        let id = transaction.id().clone();
        let mut next = Vec::with_capacity(self.transactions.len() + 1);
        next.push(transaction);
        next.extend(self.transactions.iter().cloned());
        self.commit(next, LedgerEvent::Added { id })?;
        Ok(&self.transactions[0])
    }

    /// Validates `input` and replaces the transaction at `index` with it. The ID is kept.
    pub fn replace_at(&mut self, index: usize, input: &TransactionInput) -> Result<&Transaction> {
        let existing = self.check_index(index)?;
        let id = existing.id().clone();
        let transaction = input.validate(id.clone()).map_err(Error::from)?;
        let mut next = self.transactions.clone();
        next[index] = transaction;
        self.commit(next, LedgerEvent::Replaced { index, id })?;
        Ok(&self.transactions[index])
    }

    /// Removes and returns the transaction at `index`.
    pub fn remove_at(&mut self, index: usize) -> Result<Transaction> {
        let id = self.check_index(index)?.id().clone();
        let mut next = self.transactions.clone();
        let removed = next.remove(index);
        self.commit(next, LedgerEvent::Removed { index, id })?;
        Ok(removed)
    }

    /// Validates `input` and replaces the transaction with ID `id`.
    pub fn update(&mut self, id: &TransactionId, input: &TransactionInput) -> Result<&Transaction> {
        let index = self.index_of(id)?;
        self.replace_at(index, input)
    }

    /// Removes and returns the transaction with ID `id`.
    pub fn remove(&mut self, id: &TransactionId) -> Result<Transaction> {
        let index = self.index_of(id)?;
        self.remove_at(index)
    }

    fn index_of(&self, id: &TransactionId) -> Result<usize> {
        match self.find(id) {
            Some((index, _)) => Ok(index),
            None => {
                warn!("No transaction with ID {id}");
                Err(Error::NotFound(id.clone()).into())
            }
        }
    }

    fn check_index(&self, index: usize) -> Result<&Transaction> {
        match self.transactions.get(index) {
            Some(t) => Ok(t),
            None => {
                let len = self.transactions.len();
                warn!("Transaction index {index} is out of range, the ledger has {len}");
                Err(Error::IndexOutOfRange { index, len }.into())
            }
        }
    }

    /// Writes `next` to storage and, only if that succeeds, makes it the current list.
    fn commit(&mut self, next: Vec<Transaction>, event: LedgerEvent) -> Result<()> {
        self.persist(&next)?;
        self.transactions = next;
        debug!("Persisted {} transaction(s) after {event:?}", self.transactions.len());
        for listener in self.listeners.iter_mut() {
            listener(&event);
        }
        Ok(())
    }

    /// Writes `transactions` followed by the unreadable records.
    fn persist(&self, transactions: &[Transaction]) -> Result<()> {
        let mut records = transactions
            .iter()
            .map(serde_json::to_value)
            .collect::<std::result::Result<Vec<Value>, _>>()
            .context("Unable to serialize the transactions")?;
        records.extend(self.unreadable.iter().cloned());
        storage::write_json(self.store.as_ref(), TRANSACTIONS, &records)
    }
}
