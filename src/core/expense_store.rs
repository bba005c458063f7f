//! The expense repository: an ordered in-memory list mirrored to a storage slot.

use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::domain::expense::Expense;
use crate::errors::{ExpenseError, Result};
use crate::storage::StorageBackend;

/// Slot name holding the serialized expense list.
pub const EXPENSES_SLOT: &str = "expenses";

/// Owns the expense collection and persists it after every mutation.
///
/// Records are kept most-recent-first: `add` prepends. Every mutation rewrites
/// the whole collection synchronously before returning.
pub struct ExpenseStore {
    backend: Box<dyn StorageBackend>,
    expenses: Vec<Expense>,
}

impl ExpenseStore {
    /// Creates an empty store without reading the backend.
    pub fn new(backend: Box<dyn StorageBackend>) -> Self {
        Self {
            backend,
            expenses: Vec::new(),
        }
    }

    /// Creates a store and hydrates it from the backend.
    pub fn open(backend: Box<dyn StorageBackend>) -> Self {
        let mut store = Self::new(backend);
        store.load();
        store
    }

    /// Replaces the in-memory collection with the persisted one and returns the
    /// number of records loaded. Missing, unreadable or malformed data yields an
    /// empty collection.
    pub fn load(&mut self) -> usize {
        self.expenses = match self.backend.read(EXPENSES_SLOT) {
            Ok(Some(payload)) => match serde_json::from_str::<Vec<Expense>>(&payload) {
                Ok(expenses) => expenses,
                Err(err) => {
                    warn!(error = %err, "stored expenses are unreadable, starting empty");
                    Vec::new()
                }
            },
            Ok(None) => Vec::new(),
            Err(err) => {
                warn!(error = %err, "failed to read expense storage, starting empty");
                Vec::new()
            }
        };
        info!(count = self.expenses.len(), "expenses loaded");
        self.expenses.len()
    }

    /// Prepends `expense` and persists. Rejects ids already present.
    pub fn add(&mut self, expense: Expense) -> Result<()> {
        if self.contains(expense.id) {
            return Err(ExpenseError::Validation(format!(
                "an expense with id {} already exists",
                expense.id
            )));
        }
        debug!(id = %expense.id, "adding expense");
        self.expenses.insert(0, expense);
        self.persist()
    }

    /// Replaces the record with the same id in place. Returns `false` and leaves
    /// the collection untouched when no record matches.
    pub fn update(&mut self, expense: Expense) -> Result<bool> {
        let matched = match self.expenses.iter_mut().find(|item| item.id == expense.id) {
            Some(slot) => {
                *slot = expense;
                true
            }
            None => {
                debug!(id = %expense.id, "update ignored, no matching expense");
                false
            }
        };
        self.persist()?;
        Ok(matched)
    }

    /// Removes the record with `id` if present and returns it.
    pub fn remove(&mut self, id: Uuid) -> Result<Option<Expense>> {
        let removed = self
            .expenses
            .iter()
            .position(|item| item.id == id)
            .map(|index| self.expenses.remove(index));
        self.persist()?;
        Ok(removed)
    }

    pub fn all(&self) -> &[Expense] {
        &self.expenses
    }

    pub fn get(&self, id: Uuid) -> Option<&Expense> {
        self.expenses.iter().find(|item| item.id == id)
    }

    pub fn contains(&self, id: Uuid) -> bool {
        self.get(id).is_some()
    }

    pub fn len(&self) -> usize {
        self.expenses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.expenses.is_empty()
    }

    /// Draws a fresh id that is not used by any stored record.
    pub fn next_id(&self) -> Uuid {
        loop {
            let id = Uuid::new_v4();
            if !self.contains(id) {
                return id;
            }
        }
    }

    /// Resolves a full id or a unique, case-insensitive id prefix.
    pub fn resolve_id(&self, input: &str) -> Result<Uuid> {
        let needle = input.trim().to_lowercase();
        if needle.is_empty() {
            return Err(ExpenseError::Validation("expense id is required".into()));
        }
        if let Ok(id) = Uuid::parse_str(&needle) {
            return Ok(id);
        }
        let mut matches = self
            .expenses
            .iter()
            .filter(|item| item.id.to_string().starts_with(&needle));
        match (matches.next(), matches.next()) {
            (Some(found), None) => Ok(found.id),
            (Some(_), Some(_)) => Err(ExpenseError::Validation(format!(
                "id prefix `{}` matches more than one expense",
                input.trim()
            ))),
            (None, _) => Err(ExpenseError::Validation(format!(
                "no expense matches id `{}`",
                input.trim()
            ))),
        }
    }

    fn persist(&self) -> Result<()> {
        let json = serde_json::to_string_pretty(&self.expenses)?;
        self.backend.write(EXPENSES_SLOT, &json)?;
        debug!(count = self.expenses.len(), "expenses persisted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStorage;
    use chrono::{TimeZone, Utc};
    use rust_decimal::Decimal;

    fn expense(description: &str, cents: i64) -> Expense {
        let date = Utc.with_ymd_and_hms(2024, 5, 1, 9, 0, 0).unwrap();
        Expense::new(description, Decimal::new(cents, 2), "Food", date)
    }

    #[test]
    fn add_prepends_most_recent_first() {
        let mut store = ExpenseStore::new(Box::new(MemoryStorage::new()));
        store.add(expense("first", 100)).unwrap();
        store.add(expense("second", 200)).unwrap();
        let descriptions: Vec<_> = store.all().iter().map(|e| e.description.as_str()).collect();
        assert_eq!(descriptions, vec!["second", "first"]);
    }

    #[test]
    fn add_rejects_duplicate_ids() {
        let mut store = ExpenseStore::new(Box::new(MemoryStorage::new()));
        let record = expense("coffee", 150);
        store.add(record.clone()).unwrap();
        let err = store.add(record).expect_err("duplicate id must be rejected");
        assert!(matches!(err, ExpenseError::Validation(_)));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn update_with_unknown_id_is_silent_noop() {
        let mut store = ExpenseStore::new(Box::new(MemoryStorage::new()));
        store.add(expense("coffee", 150)).unwrap();
        let before = store.all().to_vec();

        let matched = store.update(expense("ghost", 999)).unwrap();
        assert!(!matched);
        assert_eq!(store.all(), before.as_slice());
    }

    #[test]
    fn update_replaces_in_place() {
        let mut store = ExpenseStore::new(Box::new(MemoryStorage::new()));
        store.add(expense("a", 100)).unwrap();
        store.add(expense("b", 200)).unwrap();
        let mut edited = store.all()[1].clone();
        edited.category = "Travel".into();

        assert!(store.update(edited.clone()).unwrap());
        assert_eq!(store.all()[1], edited);
    }

    #[test]
    fn remove_unknown_id_leaves_collection_unchanged() {
        let mut store = ExpenseStore::new(Box::new(MemoryStorage::new()));
        store.add(expense("coffee", 150)).unwrap();
        let removed = store.remove(Uuid::new_v4()).unwrap();
        assert!(removed.is_none());
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn load_treats_corrupt_payload_as_empty() {
        let backend = MemoryStorage::with_slot(EXPENSES_SLOT, "{not json");
        let store = ExpenseStore::open(Box::new(backend));
        assert!(store.is_empty());
    }

    #[test]
    fn resolve_id_accepts_unique_prefix() {
        let mut store = ExpenseStore::new(Box::new(MemoryStorage::new()));
        let record = expense("coffee", 150);
        let id = record.id;
        store.add(record).unwrap();

        let prefix = &id.to_string()[..8];
        assert_eq!(store.resolve_id(prefix).unwrap(), id);
        assert_eq!(store.resolve_id(&prefix.to_uppercase()).unwrap(), id);
        assert!(store.resolve_id("zzzz").is_err());
    }
}
