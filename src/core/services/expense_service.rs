//! The add, edit and delete flows built on top of [`ExpenseStore`].

use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use tracing::info;
use uuid::Uuid;

use crate::classifier::{assist_category, CategoryClassifier};
use crate::core::expense_store::ExpenseStore;
use crate::domain::expense::{validate_amount, Expense, ExpenseChanges, ExpenseDraft};
use crate::errors::{ExpenseError, Result};

/// Result of the create flow. `warning` is set when category assist failed and
/// the fallback label was used; the record is created either way.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateOutcome {
    pub expense: Expense,
    pub warning: Option<String>,
}

pub struct ExpenseService;

impl ExpenseService {
    /// Validates the draft, resolves its category and commits the new record.
    ///
    /// The classifier is consulted once, and only when the draft carries no
    /// category of its own.
    pub fn create(
        store: &mut ExpenseStore,
        classifier: &dyn CategoryClassifier,
        draft: ExpenseDraft,
        now: DateTime<Utc>,
    ) -> Result<CreateOutcome> {
        draft.validate()?;

        let (category, warning) = match draft.supplied_category() {
            Some(category) => (category.to_string(), None),
            None => {
                let suggestion = assist_category(classifier, &draft.description);
                (suggestion.category, suggestion.warning)
            }
        };

        let expense = Expense {
            id: store.next_id(),
            description: draft.description.trim().to_string(),
            amount: draft.amount,
            category,
            date: draft.date.unwrap_or(now),
        };
        store.add(expense.clone())?;
        info!(id = %expense.id, category = %expense.category, "expense created");

        Ok(CreateOutcome { expense, warning })
    }

    /// Applies user edits to an existing record. Category assist is never used
    /// here.
    pub fn edit(store: &mut ExpenseStore, id: Uuid, changes: ExpenseChanges) -> Result<Expense> {
        let mut expense = store.get(id).cloned().ok_or(ExpenseError::NotFound(id))?;
        expense.apply(changes);
        expense.description = expense.description.trim().to_string();
        expense.validate()?;
        store.update(expense.clone())?;
        info!(id = %expense.id, "expense updated");
        Ok(expense)
    }

    /// Removes the record if present. Unknown ids are not an error.
    pub fn delete(store: &mut ExpenseStore, id: Uuid) -> Result<Option<Expense>> {
        let removed = store.remove(id)?;
        if removed.is_some() {
            info!(id = %id, "expense deleted");
        }
        Ok(removed)
    }

    /// Parses a user-entered amount. Blank, malformed, non-positive and
    /// oversized values are rejected.
    pub fn parse_amount(input: &str) -> Result<Decimal> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(ExpenseError::Validation(
                "Please fill in both description and amount.".into(),
            ));
        }
        let amount = Decimal::from_str(trimmed)
            .map_err(|_| ExpenseError::Validation(format!("`{}` is not a valid amount", trimmed)))?;
        validate_amount(amount)?;
        Ok(amount)
    }

    /// Accepts RFC 3339 timestamps or plain `YYYY-MM-DD` dates (midnight UTC).
    pub fn parse_date(input: &str) -> Result<DateTime<Utc>> {
        let trimmed = input.trim();
        if let Ok(parsed) = DateTime::parse_from_rfc3339(trimmed) {
            return Ok(parsed.with_timezone(&Utc));
        }
        NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
            .ok()
            .and_then(|date| date.and_hms_opt(0, 0, 0))
            .map(|naive| DateTime::from_naive_utc_and_offset(naive, Utc))
            .ok_or_else(|| {
                ExpenseError::Validation(format!(
                    "`{}` is not a date (use YYYY-MM-DD or RFC 3339)",
                    trimmed
                ))
            })
    }
}
