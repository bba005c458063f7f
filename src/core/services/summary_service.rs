//! Aggregate statistics over an already-filtered expense list.
//!
//! Every function here is pure: same input, same output, input untouched.
//! Sums saturate at `Decimal::MAX` so oversized stored records cannot abort a
//! report.

use std::collections::{BTreeMap, BTreeSet};

use chrono::{DateTime, Duration, Utc};
use rust_decimal::Decimal;

use crate::domain::expense::Expense;

/// Length of the trailing "this month" window.
pub const MONTHLY_WINDOW_DAYS: i64 = 30;

/// One slice of the per-category breakdown.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryShare {
    pub category: String,
    pub amount: Decimal,
    /// Share of the total in percent, unrounded.
    pub percent: Decimal,
}

/// Everything the dashboard shows for the current filter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DashboardSummary {
    pub total: Decimal,
    pub count: usize,
    pub average: Decimal,
    pub monthly_total: Decimal,
    pub by_category: BTreeMap<String, Decimal>,
    pub recent: Vec<Expense>,
}

pub struct SummaryService;

impl SummaryService {
    pub fn total(expenses: &[Expense]) -> Decimal {
        sum_amounts(expenses.iter())
    }

    pub fn count(expenses: &[Expense]) -> usize {
        expenses.len()
    }

    /// `total / count`, or zero for an empty list.
    pub fn average(expenses: &[Expense]) -> Decimal {
        let count = Self::count(expenses);
        if count == 0 {
            return Decimal::ZERO;
        }
        Self::total(expenses) / Decimal::from(count)
    }

    /// Sum of the records dated within `[now - 30 days, now]`.
    pub fn monthly_total(expenses: &[Expense], now: DateTime<Utc>) -> Decimal {
        let start = now - Duration::days(MONTHLY_WINDOW_DAYS);
        sum_amounts(
            expenses
                .iter()
                .filter(|expense| expense.date >= start && expense.date <= now),
        )
    }

    /// Sums amounts per category label; blank labels land under the sentinel.
    pub fn group_by_category(expenses: &[Expense]) -> BTreeMap<String, Decimal> {
        let mut groups = BTreeMap::new();
        for expense in expenses {
            let slot = groups
                .entry(expense.group_label().to_string())
                .or_insert(Decimal::ZERO);
            *slot = slot.saturating_add(expense.amount);
        }
        groups
    }

    /// The first `n` records in list order. The store keeps the newest first.
    pub fn recent(expenses: &[Expense], n: usize) -> &[Expense] {
        &expenses[..n.min(expenses.len())]
    }

    /// Distinct non-blank category labels in ascending order.
    pub fn categories(expenses: &[Expense]) -> Vec<String> {
        expenses
            .iter()
            .map(|expense| expense.category.as_str())
            .filter(|category| !category.trim().is_empty())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .map(str::to_string)
            .collect()
    }

    /// Category totals with their share of the overall total, largest first.
    pub fn category_breakdown(expenses: &[Expense]) -> Vec<CategoryShare> {
        let total = Self::total(expenses);
        let mut shares: Vec<CategoryShare> = Self::group_by_category(expenses)
            .into_iter()
            .map(|(category, amount)| {
                let percent = if total.is_zero() {
                    Decimal::ZERO
                } else {
                    amount / total * Decimal::ONE_HUNDRED
                };
                CategoryShare {
                    category,
                    amount,
                    percent,
                }
            })
            .collect();
        shares.sort_by(|a, b| {
            b.amount
                .cmp(&a.amount)
                .then_with(|| a.category.cmp(&b.category))
        });
        shares
    }

    pub fn dashboard(
        expenses: &[Expense],
        now: DateTime<Utc>,
        recent_limit: usize,
    ) -> DashboardSummary {
        DashboardSummary {
            total: Self::total(expenses),
            count: Self::count(expenses),
            average: Self::average(expenses),
            monthly_total: Self::monthly_total(expenses, now),
            by_category: Self::group_by_category(expenses),
            recent: Self::recent(expenses, recent_limit).to_vec(),
        }
    }
}

fn sum_amounts<'a>(expenses: impl Iterator<Item = &'a Expense>) -> Decimal {
    expenses.fold(Decimal::ZERO, |acc, expense| acc.saturating_add(expense.amount))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 30, 12, 0, 0).unwrap()
    }

    fn expense(description: &str, cents: i64, category: &str, days_ago: i64) -> Expense {
        Expense::new(
            description,
            Decimal::new(cents, 2),
            category,
            now() - Duration::days(days_ago),
        )
    }

    fn sample() -> Vec<Expense> {
        vec![
            expense("Coffee", 15000, "Food & Dining", 1),
            expense("Bus pass", 120050, "Travel", 10),
            expense("Gift", 99999, "", 45),
            expense("Lunch", 33333, "Food & Dining", 30),
        ]
    }

    #[test]
    fn empty_list_yields_zeroes() {
        let empty: Vec<Expense> = Vec::new();
        assert_eq!(SummaryService::total(&empty), Decimal::ZERO);
        assert_eq!(SummaryService::count(&empty), 0);
        assert_eq!(SummaryService::average(&empty), Decimal::ZERO);
        assert!(SummaryService::group_by_category(&empty).is_empty());
        assert!(SummaryService::category_breakdown(&empty).is_empty());
    }

    #[test]
    fn total_and_average_are_exact() {
        let list = sample();
        let total = SummaryService::total(&list);
        assert_eq!(total, Decimal::new(268382, 2));
        assert_eq!(
            SummaryService::average(&list),
            total / Decimal::from(list.len())
        );
    }

    #[test]
    fn groups_sum_to_total_and_blank_goes_to_other() {
        let list = sample();
        let groups = SummaryService::group_by_category(&list);
        let summed: Decimal = groups.values().copied().sum();
        assert_eq!(summed, SummaryService::total(&list));
        assert_eq!(groups.get("Other"), Some(&Decimal::new(99999, 2)));
        assert_eq!(groups.get("Food & Dining"), Some(&Decimal::new(48333, 2)));
    }

    #[test]
    fn monthly_window_bounds_are_inclusive() {
        let mut list = sample();
        list.push(expense("Future", 100, "Food & Dining", -1));
        // 1, 10 and exactly 30 days ago count; 45 days ago and tomorrow do not.
        assert_eq!(
            SummaryService::monthly_total(&list, now()),
            Decimal::new(15000 + 120050 + 33333, 2)
        );
    }

    #[test]
    fn recent_keeps_list_order_and_caps_length() {
        let list = sample();
        let recent = SummaryService::recent(&list, 2);
        assert_eq!(recent.len(), 2);
        assert_eq!(recent[0].description, "Coffee");
        assert_eq!(SummaryService::recent(&list, 10).len(), list.len());
    }

    #[test]
    fn categories_are_sorted_and_distinct() {
        let list = sample();
        assert_eq!(
            SummaryService::categories(&list),
            vec!["Food & Dining".to_string(), "Travel".to_string()]
        );
    }

    #[test]
    fn breakdown_is_sorted_by_amount_and_covers_total() {
        let list = sample();
        let shares = SummaryService::category_breakdown(&list);
        let names: Vec<_> = shares.iter().map(|s| s.category.as_str()).collect();
        assert_eq!(names, vec!["Travel", "Other", "Food & Dining"]);

        let percent: Decimal = shares.iter().map(|s| s.percent).sum();
        let drift = (percent - Decimal::ONE_HUNDRED).abs();
        assert!(drift < Decimal::new(1, 10), "percentages drift: {percent}");
    }

    #[test]
    fn dashboard_does_not_mutate_input() {
        let list = sample();
        let before = list.clone();
        let summary = SummaryService::dashboard(&list, now(), 5);
        assert_eq!(list, before);
        assert_eq!(summary.count, 4);
        assert_eq!(summary.recent.len(), 4);
    }

    #[test]
    fn oversized_records_saturate_instead_of_panicking() {
        let list = vec![
            expense("Big", 0, "A", 1),
            expense("Bigger", 0, "A", 2),
        ]
        .into_iter()
        .map(|mut item| {
            item.amount = Decimal::MAX;
            item
        })
        .collect::<Vec<_>>();

        assert_eq!(SummaryService::total(&list), Decimal::MAX);
        assert_eq!(SummaryService::monthly_total(&list, now()), Decimal::MAX);
        assert_eq!(
            SummaryService::group_by_category(&list).get("A"),
            Some(&Decimal::MAX)
        );
        let summary = SummaryService::dashboard(&list, now(), 5);
        assert_eq!(summary.count, 2);
        assert_eq!(SummaryService::category_breakdown(&list).len(), 1);
    }
}
