//! Aggregate statistics over classified records.

use itertools::Itertools;

use crate::domain::entities::{BookmarkStats, Category, Record};

impl BookmarkStats {
    pub fn from_records(records: &[Record]) -> Self {
        let counts = records.iter().counts_by(|r| r.category);
        let per_category = Category::ALL
            .iter()
            .map(|c| (*c, counts.get(c).copied().unwrap_or(0)))
            .collect();
        Self {
            total_bookmarks: records.len(),
            per_category,
            unique_domains: records.iter().map(|r| r.domain.as_str()).unique().count(),
        }
    }

    /// Categories with at least one record, largest first (ties in category order).
    pub fn detected(&self) -> Vec<(Category, usize)> {
        self.per_category
            .iter()
            .copied()
            .filter(|(_, n)| *n > 0)
            .sorted_by(|a, b| b.1.cmp(&a.1))
            .collect()
    }
}
