//! Interactive data entry for expenses.
//!
//! Field validators are plain functions so the same rules apply to prompts
//! and to command-line flags.

use chrono::{DateTime, Utc};
use dialoguer::{theme::ColorfulTheme, Confirm, Input};
use rust_decimal::Decimal;

use crate::cli::core::CommandError;
use crate::cli::formatters::format_amount;
use crate::core::services::ExpenseService;
use crate::domain::expense::{Expense, ExpenseChanges, ExpenseDraft};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormResult<T> {
    Completed(T),
    Cancelled,
}

pub fn validate_description(input: &str) -> Result<String, String> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        Err("Description cannot be empty".into())
    } else {
        Ok(trimmed.to_string())
    }
}

pub fn validate_amount(input: &str) -> Result<Decimal, String> {
    ExpenseService::parse_amount(input).map_err(|err| err.to_string())
}

/// Blank input means "keep the default".
pub fn validate_optional_date(input: &str) -> Result<Option<DateTime<Utc>>, String> {
    if input.trim().is_empty() {
        return Ok(None);
    }
    ExpenseService::parse_date(input)
        .map(Some)
        .map_err(|err| err.to_string())
}

pub struct ExpenseWizard<'a> {
    theme: &'a ColorfulTheme,
    currency_symbol: &'a str,
}

impl<'a> ExpenseWizard<'a> {
    pub fn new(theme: &'a ColorfulTheme, currency_symbol: &'a str) -> Self {
        Self {
            theme,
            currency_symbol,
        }
    }

    /// Collects a new expense. An empty category is left for category assist.
    pub fn create(&self) -> Result<FormResult<ExpenseDraft>, CommandError> {
        let description = self.text("Description", "", |value| {
            validate_description(value).map(|_| ())
        })?;
        let amount_raw = self.text("Amount", "", |value| validate_amount(value).map(|_| ()))?;
        let category = self.optional("Category (blank to suggest)", "")?;
        let date_raw = self.date("Date (YYYY-MM-DD, blank for now)", "")?;

        let amount = validate_amount(&amount_raw).map_err(CommandError::InvalidArguments)?;
        let mut draft = ExpenseDraft::new(description.trim(), amount);
        if !category.trim().is_empty() {
            draft = draft.with_category(category.trim());
        }
        if let Some(date) =
            validate_optional_date(&date_raw).map_err(CommandError::InvalidArguments)?
        {
            draft = draft.with_date(date);
        }

        let summary = format!(
            "Save `{}` for {}?",
            draft.description,
            format_amount(draft.amount, self.currency_symbol)
        );
        if self.confirm(&summary)? {
            Ok(FormResult::Completed(draft))
        } else {
            Ok(FormResult::Cancelled)
        }
    }

    /// Prompts for every field with the current value pre-filled.
    pub fn edit(&self, current: &Expense) -> Result<FormResult<ExpenseChanges>, CommandError> {
        let description = self.text("Description", &current.description, |value| {
            validate_description(value).map(|_| ())
        })?;
        let amount_raw = self.text("Amount", &current.amount.to_string(), |value| {
            validate_amount(value).map(|_| ())
        })?;
        let category = self.optional("Category", &current.category)?;
        let date_raw = self.date(
            "Date (YYYY-MM-DD, blank to keep)",
            &current.date.format("%Y-%m-%d").to_string(),
        )?;

        let mut changes = ExpenseChanges::default();
        let description = description.trim().to_string();
        if description != current.description {
            changes.description = Some(description);
        }
        let amount = validate_amount(&amount_raw).map_err(CommandError::InvalidArguments)?;
        if amount != current.amount {
            changes.amount = Some(amount);
        }
        let category = category.trim().to_string();
        if category != current.category {
            changes.category = Some(category);
        }
        if let Some(date) =
            validate_optional_date(&date_raw).map_err(CommandError::InvalidArguments)?
        {
            if date.date_naive() != current.date.date_naive() {
                changes.date = Some(date);
            }
        }

        if changes.is_empty() {
            return Ok(FormResult::Cancelled);
        }
        if self.confirm("Apply changes?")? {
            Ok(FormResult::Completed(changes))
        } else {
            Ok(FormResult::Cancelled)
        }
    }

    fn text<F>(&self, prompt: &str, initial: &str, check: F) -> Result<String, CommandError>
    where
        F: Fn(&str) -> Result<(), String>,
    {
        Input::<String>::with_theme(self.theme)
            .with_prompt(prompt)
            .with_initial_text(initial)
            .validate_with(|value: &String| check(value))
            .interact_text()
            .map_err(CommandError::from)
    }

    fn optional(&self, prompt: &str, initial: &str) -> Result<String, CommandError> {
        Input::<String>::with_theme(self.theme)
            .with_prompt(prompt)
            .with_initial_text(initial)
            .allow_empty(true)
            .interact_text()
            .map_err(CommandError::from)
    }

    fn date(&self, prompt: &str, initial: &str) -> Result<String, CommandError> {
        Input::<String>::with_theme(self.theme)
            .with_prompt(prompt)
            .with_initial_text(initial)
            .allow_empty(true)
            .validate_with(|value: &String| validate_optional_date(value).map(|_| ()))
            .interact_text()
            .map_err(CommandError::from)
    }

    fn confirm(&self, prompt: &str) -> Result<bool, CommandError> {
        Confirm::with_theme(self.theme)
            .with_prompt(prompt)
            .default(true)
            .interact()
            .map_err(CommandError::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn description_is_trimmed_and_required() {
        assert_eq!(validate_description("  Taxi ").unwrap(), "Taxi");
        assert!(validate_description("   ").is_err());
    }

    #[test]
    fn amount_must_be_positive() {
        assert_eq!(validate_amount("12.50").unwrap(), Decimal::new(1250, 2));
        assert!(validate_amount("0").is_err());
        assert!(validate_amount("abc").is_err());
    }

    #[test]
    fn blank_date_keeps_default() {
        assert_eq!(validate_optional_date("  ").unwrap(), None);
        assert!(validate_optional_date("2024-02-30").is_err());
        assert!(validate_optional_date("2024-02-03").unwrap().is_some());
    }
}
