//! Reactive launch feed.
//!
//! Inputs are `tokio::sync::watch` cells: the upstream query result, the
//! selected year and the selected sort direction. Derived collections are
//! pulled synchronously and recomputed only when an input changed since the
//! last observation:
//!
//! ```text
//! SourceState ──normalize──▶ entries ──filter(year)──▶ LaunchFeed ──sort(dir)──▶ SortedFeed
//! ```
//!
//! Normalization formats every date once per source value and keeps the raw
//! date next to the display text, so changing only the year re-filters the
//! cached entries without formatting again.

use crate::core::date_format::DateFormatter;
use crate::core::year_filter::filter_by_year;
use crate::core::year_sort::{sort_entries, SortOrder};
use crate::domain::model::{Launch, LaunchEntry, QueryResult, RejectedLaunch, SourceState};
use crate::domain::ports::LaunchSource;
use crate::utils::error::{LaunchError, Result};
use chrono::Datelike;
use std::collections::HashSet;
use std::sync::Arc;
use tokio::sync::watch;

/// Writable side of the feed inputs, held by whoever plays the UI role.
pub struct LaunchInputs {
    result: watch::Sender<SourceState>,
    selected_year: watch::Sender<String>,
    selected_sort: watch::Sender<String>,
}

impl Default for LaunchInputs {
    fn default() -> Self {
        Self::new()
    }
}

impl LaunchInputs {
    pub fn new() -> Self {
        let (result, _) = watch::channel(None);
        let (selected_year, _) = watch::channel(String::new());
        let (selected_sort, _) = watch::channel(String::new());
        Self {
            result,
            selected_year,
            selected_sort,
        }
    }

    pub fn publish_result(&self, result: QueryResult) {
        self.result.send_replace(Some(result));
    }

    /// Fetches from `source` and publishes the result. On failure the current
    /// value is kept, so a loading state stays empty.
    pub async fn refresh_from<S: LaunchSource + ?Sized>(&self, source: &S) -> Result<usize> {
        match source.fetch_launches().await {
            Ok(result) => {
                let count = result.launches.len();
                self.publish_result(result);
                Ok(count)
            }
            Err(e) => {
                tracing::error!("Fetching launches failed: {}", e);
                Err(e)
            }
        }
    }

    /// Back to the "not loaded yet" state.
    pub fn clear_result(&self) {
        self.result.send_replace(None);
    }

    pub fn select_year(&self, year: impl Into<String>) {
        replace_if_different(&self.selected_year, year.into());
    }

    pub fn select_sort(&self, sort: impl Into<String>) {
        replace_if_different(&self.selected_sort, sort.into());
    }

    pub fn selected_year(&self) -> String {
        self.selected_year.borrow().clone()
    }

    pub fn selected_sort(&self) -> String {
        self.selected_sort.borrow().clone()
    }

    pub fn result_receiver(&self) -> watch::Receiver<SourceState> {
        self.result.subscribe()
    }

    pub fn year_receiver(&self) -> watch::Receiver<String> {
        self.selected_year.subscribe()
    }

    pub fn sort_receiver(&self) -> watch::Receiver<String> {
        self.selected_sort.subscribe()
    }

    /// Feed filtered by the selected year and ordered by the selected sort.
    pub fn sorted_feed(&self, pipeline: &LaunchDataPipeline) -> SortedFeed {
        pipeline
            .build(self.result_receiver(), self.year_receiver())
            .sorted(self.sort_receiver())
    }
}

fn replace_if_different(sender: &watch::Sender<String>, value: String) {
    sender.send_if_modified(|current| {
        if *current == value {
            false
        } else {
            *current = value;
            true
        }
    });
}

#[derive(Debug, Clone, Default)]
pub struct Normalized {
    pub entries: Vec<Arc<LaunchEntry>>,
    pub rejected: Vec<RejectedLaunch>,
}

/// Formats each launch date once. Records with an unparseable date are
/// excluded and reported. Once a record with a given `id` is accepted, later
/// records reusing that `id` are dropped.
pub fn normalize_launches(formatter: &DateFormatter, launches: &[Launch]) -> Normalized {
    let mut normalized = Normalized::default();
    let mut seen_ids = HashSet::new();

    for launch in launches {
        if seen_ids.contains(launch.id.as_str()) {
            tracing::warn!("Skipping duplicate launch id {}", launch.id);
            continue;
        }

        let raw = launch.launch_date_local.as_str();
        match formatter.parse(raw) {
            Ok(date) => {
                seen_ids.insert(launch.id.as_str());
                normalized.entries.push(Arc::new(LaunchEntry {
                    display_date: formatter.format_datetime(&date),
                    year: date.year(),
                    launch: launch.clone(),
                }));
            }
            Err(e) => {
                tracing::warn!("Excluding launch {}: {}", launch.id, e);
                normalized.rejected.push(RejectedLaunch {
                    id: launch.id.clone(),
                    raw_date: raw.to_string(),
                    reason: e.to_string(),
                });
            }
        }
    }

    normalized
}

/// Builds reactive launch feeds with a fixed date formatter.
#[derive(Debug, Clone, Default)]
pub struct LaunchDataPipeline {
    formatter: Arc<DateFormatter>,
}

impl LaunchDataPipeline {
    pub fn new(formatter: DateFormatter) -> Self {
        Self {
            formatter: Arc::new(formatter),
        }
    }

    pub fn build(
        &self,
        source: watch::Receiver<SourceState>,
        selected_year: watch::Receiver<String>,
    ) -> LaunchFeed {
        LaunchFeed {
            formatter: Arc::clone(&self.formatter),
            source: Tracked::new(source),
            selected_year: Tracked::new(selected_year),
            normalized: Normalized::default(),
            current: Vec::new(),
            generation: 0,
        }
    }
}

struct Tracked<T> {
    rx: watch::Receiver<T>,
    // 值已被 changed() 看過，但還沒重新計算
    dirty: bool,
    closed: bool,
}

impl<T> Tracked<T> {
    fn new(rx: watch::Receiver<T>) -> Self {
        Self {
            rx,
            dirty: true,
            closed: false,
        }
    }

    fn is_stale(&mut self) -> bool {
        if self.dirty {
            return true;
        }
        match self.rx.has_changed() {
            Ok(changed) => changed,
            // the sender may have published a last value before going away
            Err(_) if !self.closed => {
                self.closed = true;
                true
            }
            Err(_) => false,
        }
    }

    fn current(&mut self) -> watch::Ref<'_, T> {
        self.dirty = false;
        self.rx.borrow_and_update()
    }

    async fn wait(&mut self) -> bool {
        match self.rx.changed().await {
            Ok(()) => {
                self.dirty = true;
                true
            }
            Err(_) => {
                self.closed = true;
                false
            }
        }
    }
}

/// Display-ready launches for the selected year, in source order.
pub struct LaunchFeed {
    formatter: Arc<DateFormatter>,
    source: Tracked<SourceState>,
    selected_year: Tracked<String>,
    normalized: Normalized,
    current: Vec<Arc<LaunchEntry>>,
    generation: u64,
}

impl LaunchFeed {
    pub fn launches(&mut self) -> &[Arc<LaunchEntry>] {
        self.refresh();
        &self.current
    }

    /// Records excluded from the current source value.
    pub fn rejected(&mut self) -> &[RejectedLaunch] {
        self.refresh();
        &self.normalized.rejected
    }

    /// Every normalized launch of the current source value, before filtering.
    pub fn all_launches(&mut self) -> &[Arc<LaunchEntry>] {
        self.refresh();
        &self.normalized.entries
    }

    /// Incremented every time the derived collection is recomputed.
    pub fn generation(&mut self) -> u64 {
        self.refresh();
        self.generation
    }

    pub fn is_loading(&self) -> bool {
        self.source.rx.borrow().is_none()
    }

    /// Sorting composed on top of the filtered output.
    pub fn sorted(self, selected_sort: watch::Receiver<String>) -> SortedFeed {
        SortedFeed {
            upstream: self,
            upstream_closed: false,
            selected_sort: Tracked::new(selected_sort),
            seen_generation: 0,
            current: Vec::new(),
            generation: 0,
        }
    }

    /// Resolves when the source result or the selected year changes.
    pub async fn changed(&mut self) -> Result<()> {
        loop {
            tokio::select! {
                changed = self.source.wait(), if !self.source.closed => {
                    if changed {
                        return Ok(());
                    }
                }
                changed = self.selected_year.wait(), if !self.selected_year.closed => {
                    if changed {
                        return Ok(());
                    }
                }
                else => return Err(LaunchError::SourceClosed),
            }
        }
    }

    /// Calls `on_update` with the current launches, then again after every
    /// input change, until all inputs are closed.
    pub async fn observe<F>(&mut self, mut on_update: F)
    where
        F: FnMut(&[Arc<LaunchEntry>]),
    {
        loop {
            on_update(self.launches());
            if self.changed().await.is_err() {
                break;
            }
        }
    }

    fn refresh(&mut self) {
        let source_stale = self.source.is_stale();
        let year_stale = self.selected_year.is_stale();
        if !source_stale && !year_stale {
            return;
        }

        if source_stale {
            let state = self.source.current();
            self.normalized = match state.as_ref() {
                Some(result) => normalize_launches(&self.formatter, &result.launches),
                None => Normalized::default(),
            };
        }

        let year = self.selected_year.current().clone();
        self.current = filter_by_year(&self.normalized.entries, &year);
        self.generation += 1;

        tracing::debug!(
            "Launch feed recomputed (generation {}): {} of {} launches for year {:?}",
            self.generation,
            self.current.len(),
            self.normalized.entries.len(),
            year
        );
    }
}

/// [`LaunchFeed`] output ordered by the selected sort direction.
pub struct SortedFeed {
    upstream: LaunchFeed,
    upstream_closed: bool,
    selected_sort: Tracked<String>,
    seen_generation: u64,
    current: Vec<Arc<LaunchEntry>>,
    generation: u64,
}

impl SortedFeed {
    pub fn launches(&mut self) -> &[Arc<LaunchEntry>] {
        self.refresh();
        &self.current
    }

    pub fn generation(&mut self) -> u64 {
        self.refresh();
        self.generation
    }

    pub fn upstream(&mut self) -> &mut LaunchFeed {
        &mut self.upstream
    }

    pub async fn changed(&mut self) -> Result<()> {
        loop {
            tokio::select! {
                res = self.upstream.changed(), if !self.upstream_closed => {
                    match res {
                        Ok(()) => return Ok(()),
                        Err(_) => self.upstream_closed = true,
                    }
                }
                changed = self.selected_sort.wait(), if !self.selected_sort.closed => {
                    if changed {
                        return Ok(());
                    }
                }
                else => return Err(LaunchError::SourceClosed),
            }
        }
    }

    fn refresh(&mut self) {
        let upstream_generation = self.upstream.generation();
        let sort_stale = self.selected_sort.is_stale();
        if upstream_generation == self.seen_generation && !sort_stale {
            return;
        }

        let order = SortOrder::parse(&self.selected_sort.current());
        self.current = sort_entries(self.upstream.launches(), order);
        self.seen_generation = upstream_generation;
        self.generation += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::{LaunchSite, Rocket};

    fn launch(id: &str, date: &str) -> Launch {
        Launch {
            id: id.to_string(),
            mission_id: vec![],
            mission_name: Some(format!("Mission {}", id)),
            launch_date_local: date.to_string(),
            launch_site: Some(LaunchSite {
                site_name: Some("KSC LC 39A".to_string()),
            }),
            rocket: Some(Rocket {
                rocket_name: Some("Falcon 9".to_string()),
            }),
            details: None,
        }
    }

    fn sample_result() -> QueryResult {
        QueryResult {
            launches: vec![
                launch("a", "2020-05-30T15:22:00-04:00"),
                launch("b", "2019-03-02T02:49:00-05:00"),
                launch("c", "2020-01-19T10:30:00-05:00"),
                launch("d", "2018-02-06T15:45:00-05:00"),
            ],
        }
    }

    fn ids(launches: &[Arc<LaunchEntry>]) -> Vec<String> {
        launches.iter().map(|entry| entry.id().to_string()).collect()
    }

    #[test]
    fn test_normalize_keeps_raw_date_and_derives_year() {
        let normalized = normalize_launches(&DateFormatter::default(), &sample_result().launches);

        assert_eq!(normalized.entries.len(), 4);
        assert!(normalized.rejected.is_empty());

        let first = &normalized.entries[0];
        assert_eq!(first.raw_date(), "2020-05-30T15:22:00-04:00");
        assert_eq!(first.display_date, "May 30, 2020");
        assert_eq!(first.year, 2020);
    }

    #[test]
    fn test_normalize_excludes_bad_dates_only() {
        let launches = vec![
            launch("good", "2020-05-30T15:22:00-04:00"),
            launch("bad", "Invalid Date"),
            launch("also-good", "2018-02-06T15:45:00-05:00"),
        ];
        let normalized = normalize_launches(&DateFormatter::default(), &launches);

        assert_eq!(ids(&normalized.entries), vec!["good", "also-good"]);
        assert_eq!(normalized.rejected.len(), 1);
        assert_eq!(normalized.rejected[0].id, "bad");
        assert_eq!(normalized.rejected[0].raw_date, "Invalid Date");
    }

    #[test]
    fn test_normalize_drops_duplicate_ids() {
        let launches = vec![
            launch("a", "2020-05-30T15:22:00-04:00"),
            launch("a", "2019-03-02T02:49:00-05:00"),
        ];
        let normalized = normalize_launches(&DateFormatter::default(), &launches);

        assert_eq!(normalized.entries.len(), 1);
        assert_eq!(normalized.entries[0].year, 2020);
    }

    #[test]
    fn test_rejected_record_does_not_claim_its_id() {
        let launches = vec![
            launch("x", "garbage"),
            launch("x", "2020-01-01T00:00:00Z"),
            launch("x", "2019-01-01T00:00:00Z"),
        ];
        let normalized = normalize_launches(&DateFormatter::default(), &launches);

        assert_eq!(normalized.rejected.len(), 1);
        assert_eq!(normalized.rejected[0].raw_date, "garbage");
        assert_eq!(normalized.entries.len(), 1);
        assert_eq!(normalized.entries[0].raw_date(), "2020-01-01T00:00:00Z");
    }

    #[test]
    fn test_loading_state_is_empty() {
        let inputs = LaunchInputs::new();
        let mut feed = LaunchDataPipeline::default()
            .build(inputs.result_receiver(), inputs.year_receiver());

        assert!(feed.is_loading());
        assert!(feed.launches().is_empty());
        assert!(feed.rejected().is_empty());
    }

    #[test]
    fn test_feed_follows_inputs() {
        let inputs = LaunchInputs::new();
        let mut feed = LaunchDataPipeline::default()
            .build(inputs.result_receiver(), inputs.year_receiver());

        inputs.publish_result(sample_result());
        assert_eq!(ids(feed.launches()), vec!["a", "b", "c", "d"]);

        inputs.select_year("2020");
        assert_eq!(ids(feed.launches()), vec!["a", "c"]);

        inputs.select_year("");
        assert_eq!(feed.launches().len(), 4);

        inputs.clear_result();
        assert!(feed.launches().is_empty());
    }

    #[test]
    fn test_feed_recomputes_only_on_change() {
        let inputs = LaunchInputs::new();
        let mut feed = LaunchDataPipeline::default()
            .build(inputs.result_receiver(), inputs.year_receiver());
        inputs.publish_result(sample_result());

        let first = feed.generation();
        assert_eq!(feed.generation(), first);

        // 同一個值不會觸發重算
        inputs.select_year("");
        assert_eq!(feed.generation(), first);

        inputs.select_year("2019");
        assert_eq!(feed.generation(), first + 1);
    }

    #[test]
    fn test_year_change_reuses_normalized_entries() {
        let inputs = LaunchInputs::new();
        let mut feed = LaunchDataPipeline::default()
            .build(inputs.result_receiver(), inputs.year_receiver());
        inputs.publish_result(sample_result());

        let before = feed.all_launches()[0].clone();
        inputs.select_year("2020");
        let after = feed.launches()[0].clone();

        assert!(Arc::ptr_eq(&before, &after));
    }

    #[test]
    fn test_sorted_feed_applies_sort_after_filter() {
        let inputs = LaunchInputs::new();
        let mut feed = inputs.sorted_feed(&LaunchDataPipeline::default());
        inputs.publish_result(sample_result());

        inputs.select_sort("Ascending");
        assert_eq!(ids(feed.launches()), vec!["d", "b", "a", "c"]);

        inputs.select_year("2020");
        inputs.select_sort("Descending");
        assert_eq!(ids(feed.launches()), vec!["a", "c"]);

        inputs.select_sort("banana");
        assert_eq!(ids(feed.launches()), vec!["a", "c"]);

        inputs.select_year("");
        assert_eq!(ids(feed.launches()), vec!["a", "b", "c", "d"]);
    }

    struct StaticSource(Option<QueryResult>);

    #[async_trait::async_trait]
    impl LaunchSource for StaticSource {
        async fn fetch_launches(&self) -> Result<QueryResult> {
            self.0.clone().ok_or_else(|| LaunchError::GraphQlError {
                message: "unavailable".to_string(),
            })
        }
    }

    #[tokio::test]
    async fn test_refresh_from_source() {
        let inputs = LaunchInputs::new();
        let mut feed = LaunchDataPipeline::default()
            .build(inputs.result_receiver(), inputs.year_receiver());

        let failing = StaticSource(None);
        assert!(inputs.refresh_from(&failing).await.is_err());
        assert!(feed.is_loading());
        assert!(feed.launches().is_empty());

        let working = StaticSource(Some(sample_result()));
        assert_eq!(inputs.refresh_from(&working).await.unwrap(), 4);
        assert_eq!(feed.launches().len(), 4);
    }

    #[tokio::test]
    async fn test_changed_wakes_on_input() {
        let inputs = LaunchInputs::new();
        let mut feed = LaunchDataPipeline::default()
            .build(inputs.result_receiver(), inputs.year_receiver());
        assert!(feed.launches().is_empty());

        inputs.publish_result(sample_result());
        feed.changed().await.unwrap();

        assert_eq!(feed.launches().len(), 4);
    }

    #[tokio::test]
    async fn test_changed_errors_when_inputs_closed() {
        let inputs = LaunchInputs::new();
        let mut feed = inputs.sorted_feed(&LaunchDataPipeline::default());
        drop(inputs);

        assert!(matches!(feed.changed().await, Err(LaunchError::SourceClosed)));
    }

    #[tokio::test]
    async fn test_last_value_before_close_is_observed() {
        let inputs = LaunchInputs::new();
        let mut feed = LaunchDataPipeline::default()
            .build(inputs.result_receiver(), inputs.year_receiver());
        assert!(feed.launches().is_empty());

        inputs.publish_result(sample_result());
        drop(inputs);

        assert_eq!(feed.launches().len(), 4);
    }

    #[tokio::test]
    async fn test_observe_reports_each_update() {
        let inputs = LaunchInputs::new();
        let mut feed = LaunchDataPipeline::default()
            .build(inputs.result_receiver(), inputs.year_receiver());

        let producer = async move {
            tokio::task::yield_now().await;
            inputs.publish_result(sample_result());
            tokio::task::yield_now().await;
            inputs.select_year("2018");
            tokio::task::yield_now().await;
        };

        let mut sizes = Vec::new();
        let consumer = feed.observe(|launches| sizes.push(launches.len()));
        tokio::join!(producer, consumer);

        assert_eq!(sizes.first(), Some(&0));
        assert_eq!(sizes.last(), Some(&1));
    }
}
