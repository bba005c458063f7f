pub mod category;
pub mod common;
pub mod expense;
pub mod filter;

pub use category::{CategoryIcon, FALLBACK_CATEGORY, GROUP_SENTINEL};
pub use common::Displayable;
pub use expense::{Expense, ExpenseChanges, ExpenseDraft};
pub use filter::{CategoryFilter, ExpenseFilter};
