use std::path::PathBuf;

use chrono::Utc;

use crate::cli::core::{CommandError, CommandResult, ShellContext};
use crate::cli::formatters::{expense_header, expense_row, format_amount, format_percent};
use crate::cli::io;
use crate::cli::output::{line, section};
use crate::cli::registry::CommandEntry;
use crate::core::services::{ExportService, SummaryService};
use crate::domain::category::CategoryIcon;
use crate::domain::expense::Expense;
use crate::domain::filter::CategoryFilter;
use crate::errors::ExpenseError;

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![
        CommandEntry::new("list", "List expenses matching the active filter", "list", cmd_list),
        CommandEntry::new(
            "search",
            "Filter by description text (no term clears it)",
            "search [term]",
            cmd_search,
        ),
        CommandEntry::new(
            "filter",
            "Filter by exact category or `all`",
            "filter <category|all>",
            cmd_filter,
        ),
        CommandEntry::new(
            "dashboard",
            "Totals, monthly spend and recent expenses",
            "dashboard",
            cmd_dashboard,
        ),
        CommandEntry::new(
            "analytics",
            "Spending share per category",
            "analytics",
            cmd_analytics,
        ),
        CommandEntry::new(
            "categories",
            "List the categories in use",
            "categories",
            cmd_categories,
        ),
        CommandEntry::new(
            "export",
            "Write the filtered expenses to expenses_report.csv",
            "export [dir]",
            cmd_export,
        ),
    ]
}

fn print_rows(context: &ShellContext, expenses: &[Expense]) {
    line(expense_header());
    for expense in expenses {
        line(expense_row(expense, &context.config));
    }
}

fn describe_filter(context: &ShellContext) -> String {
    let search = context.filter.search.trim();
    match (search.is_empty(), &context.filter.category) {
        (true, CategoryFilter::All) => "all expenses".into(),
        (true, category) => format!("category {}", category),
        (false, CategoryFilter::All) => format!("search `{}`", search),
        (false, category) => format!("search `{}` in category {}", search, category),
    }
}

fn cmd_list(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let expenses = context.filtered();
    section(format!("Expenses ({})", describe_filter(context)));
    if expenses.is_empty() {
        if context.store.is_empty() {
            io::print_info("No expenses yet. Use `add` to record one.");
        } else {
            io::print_info("No expenses match the current filter.");
        }
        return Ok(());
    }
    print_rows(context, &expenses);
    Ok(())
}

fn cmd_search(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    context.filter.search = args.join(" ");
    let matches = context.filter.apply(context.store.all()).len();
    if context.filter.search.trim().is_empty() {
        io::print_info(format!("Search cleared. {} expenses shown.", matches));
    } else {
        io::print_info(format!(
            "{} expenses match `{}`.",
            matches, context.filter.search
        ));
    }
    Ok(())
}

fn cmd_filter(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    if args.is_empty() {
        return Err(CommandError::InvalidArguments(
            "usage: filter <category|all>".into(),
        ));
    }
    context.filter.category = CategoryFilter::parse(&args.join(" "));
    let matches = context.filter.apply(context.store.all()).len();
    io::print_info(format!(
        "Showing {} ({} expenses).",
        describe_filter(context),
        matches
    ));
    Ok(())
}

fn cmd_dashboard(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let expenses = context.filtered();
    let summary = SummaryService::dashboard(&expenses, Utc::now(), context.config.recent_limit);
    let symbol = &context.config.currency_symbol;

    section(format!("Dashboard ({})", describe_filter(context)));
    io::print_info(format!("  Total spent : {}", format_amount(summary.total, symbol)));
    io::print_info(format!("  Expenses    : {}", summary.count));
    io::print_info(format!("  Average     : {}", format_amount(summary.average, symbol)));
    io::print_info(format!(
        "  This month  : {}",
        format_amount(summary.monthly_total, symbol)
    ));

    if !summary.by_category.is_empty() {
        section("By category");
        for (category, amount) in &summary.by_category {
            line(format!(
                "  {} {:<22} {:>12}",
                CategoryIcon::for_label(category).glyph(),
                category,
                format_amount(*amount, symbol)
            ));
        }
    }

    section("Recent");
    if summary.recent.is_empty() {
        io::print_info("No expenses yet.");
    } else {
        print_rows(context, &summary.recent);
    }
    Ok(())
}

fn cmd_analytics(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let expenses = context.filtered();
    let shares = SummaryService::category_breakdown(&expenses);
    section(format!("Spending by category ({})", describe_filter(context)));
    if shares.is_empty() {
        io::print_info("Nothing to analyse yet.");
        return Ok(());
    }
    for share in shares {
        line(format!(
            "  {} {:<22} {:>12} {:>7}",
            CategoryIcon::for_label(&share.category).glyph(),
            share.category,
            format_amount(share.amount, &context.config.currency_symbol),
            format_percent(share.percent)
        ));
    }
    Ok(())
}

fn cmd_categories(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let categories = SummaryService::categories(context.store.all());
    section("Categories");
    if categories.is_empty() {
        io::print_info("No categories recorded yet.");
        return Ok(());
    }
    for category in categories {
        line(format!(
            "  {} {}",
            CategoryIcon::for_label(&category).glyph(),
            category
        ));
    }
    Ok(())
}

fn cmd_export(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let dir = match args.first() {
        Some(dir) => PathBuf::from(dir),
        None => match &context.config.export_dir {
            Some(dir) => dir.clone(),
            None => std::env::current_dir()?,
        },
    };

    let expenses = context.filtered();
    match ExportService::export_to_dir(&expenses, &dir, &context.config.date_format) {
        Ok(path) => {
            io::print_success(format!(
                "Exported {} expenses to {}.",
                expenses.len(),
                path.display()
            ));
            Ok(())
        }
        Err(ExpenseError::EmptyExport) => {
            io::print_warning(ExpenseError::EmptyExport);
            Ok(())
        }
        Err(err) => Err(err.into()),
    }
}
