use crate::cli::commands::{parse_flags, ParsedArgs};
use crate::cli::core::{CliMode, CommandError, CommandResult, ShellContext};
use crate::cli::forms::{validate_amount, validate_optional_date, ExpenseWizard, FormResult};
use crate::cli::formatters::{format_amount, short_id};
use crate::cli::io;
use crate::cli::registry::CommandEntry;
use crate::core::services::ExpenseService;
use crate::domain::common::Displayable;
use crate::domain::expense::{ExpenseChanges, ExpenseDraft};

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![
        CommandEntry::new(
            "add",
            "Record a new expense",
            "add [<description> <amount>] [--category <name>] [--date YYYY-MM-DD]",
            cmd_add,
        ),
        CommandEntry::new(
            "edit",
            "Change an existing expense",
            "edit <id> [--description <text>] [--amount <n>] [--category <name>] [--date YYYY-MM-DD]",
            cmd_edit,
        ),
        CommandEntry::new("delete", "Remove an expense", "delete <id>", cmd_delete),
    ]
}

fn cmd_add(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let parsed = parse_flags(args)?;

    let draft = if parsed.positional.is_empty() && !parsed.has_flags() {
        if context.mode() == CliMode::Script {
            return Err(CommandError::InvalidArguments(
                "usage: add <description> <amount> [--category <name>] [--date YYYY-MM-DD]".into(),
            ));
        }
        let wizard = ExpenseWizard::new(&context.theme, &context.config.currency_symbol);
        match wizard.create()? {
            FormResult::Completed(draft) => draft,
            FormResult::Cancelled => {
                io::print_info("Operation cancelled.");
                return Ok(());
            }
        }
    } else {
        draft_from_args(parsed)?
    };

    let outcome = context.create_expense(draft)?;
    io::print_success(format!(
        "Added `{}` ({}) as {} [{}].",
        outcome.expense.description,
        format_amount(outcome.expense.amount, &context.config.currency_symbol),
        outcome.expense.group_label(),
        short_id(&outcome.expense)
    ));
    Ok(())
}

/// Builds a draft from `add` arguments. The amount is the last positional;
/// everything before it forms the description.
fn draft_from_args(parsed: ParsedArgs) -> Result<ExpenseDraft, CommandError> {
    let mut positional = parsed.positional;
    let amount_raw = match parsed.amount {
        Some(amount) => amount,
        None => positional.pop().unwrap_or_default(),
    };
    let description = match parsed.description {
        Some(description) => description,
        None => positional.join(" "),
    };
    if description.trim().is_empty() || amount_raw.trim().is_empty() {
        return Err(CommandError::InvalidArguments(
            "Please fill in both description and amount.".into(),
        ));
    }

    let amount = validate_amount(&amount_raw).map_err(CommandError::InvalidArguments)?;
    let mut draft = ExpenseDraft::new(description, amount);
    if let Some(category) = parsed.category {
        draft = draft.with_category(category);
    }
    if let Some(date) = parsed
        .date
        .as_deref()
        .map(validate_optional_date)
        .transpose()
        .map_err(CommandError::InvalidArguments)?
        .flatten()
    {
        draft = draft.with_date(date);
    }
    Ok(draft)
}

fn cmd_edit(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let parsed = parse_flags(args)?;
    let reference = parsed
        .positional
        .first()
        .ok_or_else(|| CommandError::InvalidArguments("usage: edit <id> [--field value]".into()))?;
    let id = context.store.resolve_id(reference)?;

    let changes = if parsed.has_flags() {
        changes_from_args(&parsed)?
    } else {
        if context.mode() == CliMode::Script {
            return Err(CommandError::InvalidArguments(
                "edit needs at least one of --description, --amount, --category, --date".into(),
            ));
        }
        let current = context
            .store
            .get(id)
            .cloned()
            .ok_or(crate::errors::ExpenseError::NotFound(id))?;
        let wizard = ExpenseWizard::new(&context.theme, &context.config.currency_symbol);
        match wizard.edit(&current)? {
            FormResult::Completed(changes) => changes,
            FormResult::Cancelled => {
                io::print_info("No changes made.");
                return Ok(());
            }
        }
    };

    let updated = ExpenseService::edit(&mut context.store, id, changes)?;
    io::print_success(format!(
        "Updated `{}` [{}].",
        updated.description,
        short_id(&updated)
    ));
    Ok(())
}

fn changes_from_args(parsed: &ParsedArgs) -> Result<ExpenseChanges, CommandError> {
    let amount = parsed
        .amount
        .as_deref()
        .map(validate_amount)
        .transpose()
        .map_err(CommandError::InvalidArguments)?;
    let date = match parsed.date.as_deref() {
        Some(raw) => validate_optional_date(raw).map_err(CommandError::InvalidArguments)?,
        None => None,
    };
    Ok(ExpenseChanges {
        description: parsed.description.clone(),
        amount,
        category: parsed.category.clone(),
        date,
    })
}

fn cmd_delete(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let reference = args
        .first()
        .ok_or_else(|| CommandError::InvalidArguments("usage: delete <id>".into()))?;
    let id = context.store.resolve_id(reference)?;

    if context.mode() == CliMode::Interactive {
        let label = context
            .store
            .get(id)
            .map(|expense| expense.display_label())
            .unwrap_or_default();
        let prompt = format!("Delete `{}`?", label);
        if !io::confirm_action(&context.theme, &prompt, false)? {
            io::print_info("Operation cancelled.");
            return Ok(());
        }
    }

    match ExpenseService::delete(&mut context.store, id)? {
        Some(removed) => io::print_success(format!("Deleted `{}`.", removed.description)),
        None => io::print_warning("Nothing to delete."),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    #[test]
    fn trailing_positional_is_the_amount() {
        let parsed = parse_flags(&["Team", "lunch", "450", "-c", "Food"]).unwrap();
        let draft = draft_from_args(parsed).unwrap();
        assert_eq!(draft.description, "Team lunch");
        assert_eq!(draft.amount, Decimal::new(450, 0));
        assert_eq!(draft.supplied_category(), Some("Food"));
    }

    #[test]
    fn missing_amount_is_rejected() {
        let parsed = parse_flags(&["450"]).unwrap();
        assert!(draft_from_args(parsed).is_err());
    }

    #[test]
    fn edit_flags_become_changes() {
        let parsed = parse_flags(&["abc", "--amount", "12.5", "--category", "Travel"]).unwrap();
        let changes = changes_from_args(&parsed).unwrap();
        assert_eq!(changes.amount, Some(Decimal::new(125, 1)));
        assert_eq!(changes.category.as_deref(), Some("Travel"));
        assert!(changes.description.is_none());
    }
}
