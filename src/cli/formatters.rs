use rust_decimal::{Decimal, RoundingStrategy};

use crate::config::Config;
use crate::core::utils::format_date;
use crate::domain::expense::Expense;

const SHORT_ID_LEN: usize = 8;

/// Rounds to two fractional digits for display only.
pub fn format_amount(amount: Decimal, symbol: &str) -> String {
    let rounded = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    format!("{symbol}{rounded:.2}")
}

/// Amounts are outflows, shown with a leading minus.
pub fn format_outflow(amount: Decimal, symbol: &str) -> String {
    format!("-{}", format_amount(amount, symbol))
}

pub fn format_percent(percent: Decimal) -> String {
    let rounded = percent.round_dp_with_strategy(1, RoundingStrategy::MidpointAwayFromZero);
    format!("{rounded:.1}%")
}

pub fn short_id(expense: &Expense) -> String {
    expense.id.to_string()[..SHORT_ID_LEN].to_string()
}

pub fn expense_header() -> String {
    format!(
        "{:<8}  {:<10}  {:<28}  {:<22}  {:>12}",
        "ID", "Date", "Description", "Category", "Amount"
    )
}

pub fn expense_row(expense: &Expense, config: &Config) -> String {
    let date = format_date(&expense.date, &config.date_format)
        .unwrap_or_else(|_| expense.date.date_naive().to_string());
    let category = format!("{} {}", expense.icon().glyph(), expense.group_label());
    format!(
        "{:<8}  {:<10}  {:<28}  {:<22}  {:>12}",
        short_id(expense),
        date,
        truncate(&expense.description, 28),
        truncate(&category, 22),
        format_outflow(expense.amount, &config.currency_symbol)
    )
}

fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        return text.to_string();
    }
    let mut cut: String = text.chars().take(width.saturating_sub(1)).collect();
    cut.push('…');
    cut
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn amounts_round_to_two_places() {
        assert_eq!(format_amount(Decimal::new(150, 0), "₹"), "₹150.00");
        assert_eq!(format_amount(Decimal::new(12345, 3), "$"), "$12.35");
        assert_eq!(format_outflow(Decimal::new(5, 1), "$"), "-$0.50");
    }

    #[test]
    fn percent_has_one_decimal() {
        assert_eq!(format_percent(Decimal::new(33333, 3)), "33.3%");
    }

    #[test]
    fn long_text_is_truncated() {
        assert_eq!(truncate("abcdef", 4), "abc…");
        assert_eq!(truncate("abc", 4), "abc");
    }
}
