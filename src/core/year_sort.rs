use crate::domain::model::LaunchEntry;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SortOrder {
    Ascending,
    Descending,
}

impl SortOrder {
    /// Only the exact strings `"Ascending"` and `"Descending"` are recognized.
    pub fn parse(value: &str) -> Option<SortOrder> {
        match value {
            "Ascending" => Some(SortOrder::Ascending),
            "Descending" => Some(SortOrder::Descending),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SortOrder::Ascending => "Ascending",
            SortOrder::Descending => "Descending",
        }
    }
}

/// Orders launches by year. Any unrecognized `direction` returns a copy in the
/// original order.
pub fn sort_by_year(launches: &[Arc<LaunchEntry>], direction: &str) -> Vec<Arc<LaunchEntry>> {
    sort_entries(launches, SortOrder::parse(direction))
}

/// `slice::sort_by` 是穩定排序，同年份保留原本的相對順序
pub fn sort_entries(
    launches: &[Arc<LaunchEntry>],
    order: Option<SortOrder>,
) -> Vec<Arc<LaunchEntry>> {
    let mut sorted = launches.to_vec();
    match order {
        Some(SortOrder::Ascending) => sorted.sort_by(|a, b| a.year.cmp(&b.year)),
        Some(SortOrder::Descending) => sorted.sort_by(|a, b| b.year.cmp(&a.year)),
        None => {}
    }
    sorted
}
