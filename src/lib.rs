#![doc(test(attr(deny(warnings))))]

//! Personal expense tracking backed by a JSON file in the user's data
//! directory.
//!
//! Records are held by an [`ExpenseStore`], which persists after every
//! mutation. [`ExpenseService`] runs the add, edit and delete flows and asks
//! a [`CategoryClassifier`] for a category when a new expense has none; a
//! failed lookup files the record under `"Uncategorized"` instead of
//! rejecting it. [`SummaryService`] derives totals, the 30-day window and the
//! category breakdown, and [`ExportService`] writes the filtered list to
//! `expenses_report.csv`. The `expense_core_cli` binary wraps all of this in
//! a shell (see [`cli::run_cli`]).
//!
//! ```
//! use chrono::Utc;
//! use expense_core::{
//!     DisabledClassifier, ExpenseDraft, ExpenseService, ExpenseStore, MemoryStorage,
//!     SummaryService,
//! };
//! use rust_decimal::Decimal;
//!
//! let mut store = ExpenseStore::new(Box::new(MemoryStorage::new()));
//! let draft = ExpenseDraft::new("Coffee", Decimal::new(120, 0)).with_category("Food");
//! ExpenseService::create(&mut store, &DisabledClassifier, draft, Utc::now())?;
//! assert_eq!(SummaryService::total(store.all()), Decimal::new(120, 0));
//! # Ok::<(), expense_core::errors::ExpenseError>(())
//! ```

pub mod classifier;
pub mod cli;
pub mod config;
pub mod core;
pub mod domain;
pub mod errors;
pub mod storage;
pub mod utils;

pub use crate::classifier::{CategoryClassifier, DisabledClassifier, HttpClassifier};
pub use crate::core::services::{ExpenseService, ExportService, SummaryService};
pub use crate::core::ExpenseStore;
pub use crate::domain::{Expense, ExpenseDraft, ExpenseFilter};
pub use crate::storage::{JsonStorage, MemoryStorage, StorageBackend};

/// Installs the stderr tracing subscriber used by the CLI binary.
pub fn init() {
    utils::init_tracing();
    tracing::debug!(version = env!("CARGO_PKG_VERSION"), "expense core tracing ready");
}

#[cfg(test)]
mod tests {
    #[test]
    fn init_is_idempotent() {
        super::init();
        super::init();
    }
}
