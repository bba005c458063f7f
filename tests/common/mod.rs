#![allow(dead_code)]

use std::cell::Cell;

use chrono::{DateTime, TimeZone, Utc};
use expense_core::{
    classifier::{CategoryClassifier, ClassifierError},
    core::ExpenseStore,
    domain::Expense,
    storage::JsonStorage,
};
use rust_decimal::Decimal;
use tempfile::TempDir;

/// Answers every request with the same label and counts the calls.
pub struct StubClassifier {
    answer: Result<&'static str, &'static str>,
    calls: Cell<usize>,
}

impl StubClassifier {
    pub fn answering(category: &'static str) -> Self {
        Self {
            answer: Ok(category),
            calls: Cell::new(0),
        }
    }

    pub fn failing(reason: &'static str) -> Self {
        Self {
            answer: Err(reason),
            calls: Cell::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.get()
    }
}

impl CategoryClassifier for StubClassifier {
    fn classify(&self, _description: &str) -> Result<String, ClassifierError> {
        self.calls.set(self.calls.get() + 1);
        match self.answer {
            Ok(category) => Ok(category.to_string()),
            Err(reason) => Err(ClassifierError::Transport(reason.to_string())),
        }
    }
}

/// A store persisted under a fresh temporary directory. Keep the guard alive
/// for the duration of the test.
pub fn temp_store() -> (ExpenseStore, TempDir) {
    let temp = TempDir::new().expect("create temp dir");
    let storage = JsonStorage::new(Some(temp.path().to_path_buf())).expect("create json storage");
    (ExpenseStore::open(Box::new(storage)), temp)
}

pub fn reopen(temp: &TempDir) -> ExpenseStore {
    let storage = JsonStorage::new(Some(temp.path().to_path_buf())).expect("create json storage");
    ExpenseStore::open(Box::new(storage))
}

pub fn fixed_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, 15, 12, 0, 0).unwrap()
}

pub fn expense(description: &str, cents: i64, category: &str, days_ago: i64) -> Expense {
    Expense::new(
        description,
        Decimal::new(cents, 2),
        category,
        fixed_now() - chrono::Duration::days(days_ago),
    )
}
