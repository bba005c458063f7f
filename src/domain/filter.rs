//! Search and category predicates applied upstream of the summaries.

use std::fmt;

use crate::domain::expense::Expense;

/// Keyword that clears the category filter.
pub const ALL_CATEGORIES: &str = "all";

/// Restricts the list to a single category or lets everything through.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum CategoryFilter {
    #[default]
    All,
    Only(String),
}

impl CategoryFilter {
    /// Parses user input; the literal `all` selects every category.
    pub fn parse(input: &str) -> Self {
        if input == ALL_CATEGORIES {
            CategoryFilter::All
        } else {
            CategoryFilter::Only(input.to_string())
        }
    }

    /// Exact, case-sensitive match against the record's category.
    pub fn matches(&self, expense: &Expense) -> bool {
        match self {
            CategoryFilter::All => true,
            CategoryFilter::Only(category) => expense.category == *category,
        }
    }
}

impl fmt::Display for CategoryFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CategoryFilter::All => f.write_str(ALL_CATEGORIES),
            CategoryFilter::Only(category) => f.write_str(category),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExpenseFilter {
    pub search: String,
    pub category: CategoryFilter,
}

impl ExpenseFilter {
    pub fn new(search: impl Into<String>, category: CategoryFilter) -> Self {
        Self {
            search: search.into(),
            category,
        }
    }

    pub fn is_unfiltered(&self) -> bool {
        self.search.is_empty() && self.category == CategoryFilter::All
    }

    /// Case-insensitive substring match on the description.
    pub fn matches_search(&self, expense: &Expense) -> bool {
        if self.search.is_empty() {
            return true;
        }
        expense
            .description
            .to_lowercase()
            .contains(&self.search.to_lowercase())
    }

    pub fn matches(&self, expense: &Expense) -> bool {
        self.matches_search(expense) && self.category.matches(expense)
    }

    /// Returns the matching records in their original order.
    pub fn apply<'a>(&self, expenses: &'a [Expense]) -> Vec<&'a Expense> {
        expenses.iter().filter(|expense| self.matches(expense)).collect()
    }

    /// Owned variant of [`ExpenseFilter::apply`].
    pub fn apply_owned(&self, expenses: &[Expense]) -> Vec<Expense> {
        expenses
            .iter()
            .filter(|expense| self.matches(expense))
            .cloned()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use rust_decimal::Decimal;

    fn expenses() -> Vec<Expense> {
        let now = Utc::now();
        vec![
            Expense::new("Morning Coffee", Decimal::new(150, 0), "Food", now),
            Expense::new("Train ticket", Decimal::new(90, 0), "Travel", now),
            Expense::new("coffee beans", Decimal::new(600, 0), "Groceries", now),
            Expense::new("Dinner", Decimal::new(1200, 0), "Food", now),
        ]
    }

    #[test]
    fn default_filter_returns_everything() {
        let list = expenses();
        let filter = ExpenseFilter::default();
        assert!(filter.is_unfiltered());
        assert_eq!(filter.apply_owned(&list), list);
    }

    #[test]
    fn search_is_case_insensitive() {
        let list = expenses();
        let filter = ExpenseFilter::new("COFFEE", CategoryFilter::All);
        let found: Vec<_> = filter.apply(&list).iter().map(|e| e.amount).collect();
        assert_eq!(found, vec![Decimal::new(150, 0), Decimal::new(600, 0)]);
    }

    #[test]
    fn category_match_is_case_sensitive() {
        let list = expenses();
        assert_eq!(ExpenseFilter::new("", CategoryFilter::parse("Food")).apply(&list).len(), 2);
        assert!(ExpenseFilter::new("", CategoryFilter::parse("food"))
            .apply(&list)
            .is_empty());
    }

    #[test]
    fn predicates_combine_in_either_order() {
        let list = expenses();
        let filter = ExpenseFilter::new("coffee", CategoryFilter::parse("Food"));

        let search_first: Vec<Expense> = list
            .iter()
            .filter(|e| filter.matches_search(e))
            .filter(|e| filter.category.matches(e))
            .cloned()
            .collect();
        let category_first: Vec<Expense> = list
            .iter()
            .filter(|e| filter.category.matches(e))
            .filter(|e| filter.matches_search(e))
            .cloned()
            .collect();

        assert_eq!(search_first, category_first);
        assert_eq!(search_first, filter.apply_owned(&list));
        assert_eq!(search_first.len(), 1);
    }
}
