use crate::domain::model::LaunchEntry;
use std::sync::Arc;

/// Keeps launches whose year, written as `i32::to_string()`, equals `selected_year`.
///
/// An empty selection returns every launch in its original order. Matching is
/// exact string equality, so `"02020"` matches nothing.
pub fn filter_by_year(launches: &[Arc<LaunchEntry>], selected_year: &str) -> Vec<Arc<LaunchEntry>> {
    if selected_year.is_empty() {
        return launches.to_vec();
    }

    launches
        .iter()
        .filter(|entry| entry.year.to_string() == selected_year)
        .cloned()
        .collect()
}

/// Distinct launch years, newest first. Handy for building a year picker.
pub fn available_years(launches: &[Arc<LaunchEntry>]) -> Vec<i32> {
    let mut years: Vec<i32> = launches.iter().map(|entry| entry.year).collect();
    years.sort_unstable_by(|a, b| b.cmp(a));
    years.dedup();
    years
}
