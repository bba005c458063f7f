//! The expense record and the inputs used to create and edit it.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::category::{normalize_label, CategoryIcon};
use crate::domain::common::Displayable;
use crate::errors::{ExpenseError, Result};

/// Largest amount a single expense may carry. Sums over the stored list stay
/// far below `Decimal::MAX`.
pub const MAX_AMOUNT: Decimal = Decimal::from_parts(3_567_587_328, 232, 0, false, 0);

/// A single user-entered outflow.
///
/// `amount` serializes as a decimal string so that persisted data keeps full
/// precision; numeric JSON values are accepted when reading.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Expense {
    pub id: Uuid,
    pub description: String,
    pub amount: Decimal,
    #[serde(default)]
    pub category: String,
    pub date: DateTime<Utc>,
}

impl Expense {
    pub fn new(
        description: impl Into<String>,
        amount: Decimal,
        category: impl Into<String>,
        date: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            description: description.into(),
            amount,
            category: category.into(),
            date,
        }
    }

    /// Category label used for grouping; blank categories map to the sentinel.
    pub fn group_label(&self) -> &str {
        normalize_label(&self.category)
    }

    pub fn icon(&self) -> CategoryIcon {
        CategoryIcon::for_label(&self.category)
    }

    /// Checks the record-level invariants shared by the create and edit flows.
    pub fn validate(&self) -> Result<()> {
        validate_description(&self.description)?;
        validate_amount(self.amount)
    }

    /// Applies the provided changes without validating the result.
    pub fn apply(&mut self, changes: ExpenseChanges) {
        if let Some(description) = changes.description {
            self.description = description;
        }
        if let Some(amount) = changes.amount {
            self.amount = amount;
        }
        if let Some(category) = changes.category {
            self.category = category;
        }
        if let Some(date) = changes.date {
            self.date = date;
        }
    }
}

impl Displayable for Expense {
    fn display_label(&self) -> String {
        format!("{} ({})", self.description, self.group_label())
    }
}

/// User input for a new expense before category assist and id assignment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExpenseDraft {
    pub description: String,
    pub amount: Decimal,
    pub category: Option<String>,
    pub date: Option<DateTime<Utc>>,
}

impl ExpenseDraft {
    pub fn new(description: impl Into<String>, amount: Decimal) -> Self {
        Self {
            description: description.into(),
            amount,
            category: None,
            date: None,
        }
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn with_date(mut self, date: DateTime<Utc>) -> Self {
        self.date = Some(date);
        self
    }

    /// The user-supplied category, if one was given and is not blank.
    pub fn supplied_category(&self) -> Option<&str> {
        self.category
            .as_deref()
            .map(str::trim)
            .filter(|category| !category.is_empty())
    }

    pub fn validate(&self) -> Result<()> {
        validate_description(&self.description)?;
        validate_amount(self.amount)
    }
}

/// Field-level edits applied through the edit flow.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExpenseChanges {
    pub description: Option<String>,
    pub amount: Option<Decimal>,
    pub category: Option<String>,
    pub date: Option<DateTime<Utc>>,
}

impl ExpenseChanges {
    pub fn is_empty(&self) -> bool {
        self.description.is_none()
            && self.amount.is_none()
            && self.category.is_none()
            && self.date.is_none()
    }
}

fn validate_description(description: &str) -> Result<()> {
    if description.trim().is_empty() {
        return Err(ExpenseError::Validation(
            "Please fill in both description and amount.".into(),
        ));
    }
    Ok(())
}

pub(crate) fn validate_amount(amount: Decimal) -> Result<()> {
    if amount <= Decimal::ZERO {
        return Err(ExpenseError::Validation(
            "Amount must be greater than zero.".into(),
        ));
    }
    if amount > MAX_AMOUNT {
        return Err(ExpenseError::Validation(format!(
            "Amount must not exceed {}.",
            MAX_AMOUNT
        )));
    }
    Ok(())
}
