//! Category labels and their presentation helpers.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Label used when grouping expenses whose category is empty.
pub const GROUP_SENTINEL: &str = "Other";

/// Label assigned when category assist cannot produce a prediction.
pub const FALLBACK_CATEGORY: &str = "Uncategorized";

/// Returns the grouping label for a raw category, mapping blank labels to
/// [`GROUP_SENTINEL`].
pub fn normalize_label(category: &str) -> &str {
    let trimmed = category.trim();
    if trimmed.is_empty() {
        GROUP_SENTINEL
    } else {
        category
    }
}

/// Glyph family used when rendering a category in lists.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum CategoryIcon {
    Dining,
    Transport,
    Shopping,
    Entertainment,
    Health,
    Education,
    Internet,
    Phone,
    Clothing,
    Gifts,
    General,
}

const KEYWORDS: &[(CategoryIcon, &[&str])] = &[
    (CategoryIcon::Dining, &["food", "dining", "restaurant"]),
    (CategoryIcon::Transport, &["transport", "travel", "gas"]),
    (CategoryIcon::Shopping, &["shopping", "retail"]),
    (CategoryIcon::Entertainment, &["entertainment", "gaming"]),
    (CategoryIcon::Health, &["health", "medical"]),
    (CategoryIcon::Education, &["education", "book"]),
    (CategoryIcon::Internet, &["internet", "wifi"]),
    (CategoryIcon::Phone, &["phone", "mobile"]),
    (CategoryIcon::Clothing, &["clothing", "fashion"]),
    (CategoryIcon::Gifts, &["gift", "present"]),
];

impl CategoryIcon {
    /// Picks the icon whose keywords appear in the label. First match wins.
    pub fn for_label(label: &str) -> Self {
        let lower = label.to_lowercase();
        KEYWORDS
            .iter()
            .find(|(_, words)| words.iter().any(|word| lower.contains(word)))
            .map(|(icon, _)| *icon)
            .unwrap_or(CategoryIcon::General)
    }

    pub fn glyph(self) -> &'static str {
        match self {
            CategoryIcon::Dining => "🍴",
            CategoryIcon::Transport => "🚗",
            CategoryIcon::Shopping => "🛍",
            CategoryIcon::Entertainment => "🎮",
            CategoryIcon::Health => "♥",
            CategoryIcon::Education => "📖",
            CategoryIcon::Internet => "📶",
            CategoryIcon::Phone => "📱",
            CategoryIcon::Clothing => "👕",
            CategoryIcon::Gifts => "🎁",
            CategoryIcon::General => "💳",
        }
    }
}

impl fmt::Display for CategoryIcon {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            CategoryIcon::Dining => "Dining",
            CategoryIcon::Transport => "Transport",
            CategoryIcon::Shopping => "Shopping",
            CategoryIcon::Entertainment => "Entertainment",
            CategoryIcon::Health => "Health",
            CategoryIcon::Education => "Education",
            CategoryIcon::Internet => "Internet",
            CategoryIcon::Phone => "Phone",
            CategoryIcon::Clothing => "Clothing",
            CategoryIcon::Gifts => "Gifts",
            CategoryIcon::General => "General",
        };
        f.write_str(label)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn icon_lookup_is_case_insensitive() {
        assert_eq!(CategoryIcon::for_label("Food & Dining"), CategoryIcon::Dining);
        assert_eq!(CategoryIcon::for_label("TRAVEL"), CategoryIcon::Transport);
        assert_eq!(CategoryIcon::for_label("Mobile bill"), CategoryIcon::Phone);
        assert_eq!(CategoryIcon::for_label("Rent"), CategoryIcon::General);
    }

    #[test]
    fn blank_labels_normalize_to_sentinel() {
        assert_eq!(normalize_label(""), GROUP_SENTINEL);
        assert_eq!(normalize_label("   "), GROUP_SENTINEL);
        assert_eq!(normalize_label("Travel"), "Travel");
    }
}
