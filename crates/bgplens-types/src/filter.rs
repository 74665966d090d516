// NOTE: Filter Semantics
//
// Filters of the same kind are OR-combined (a record matches if it matches
// any of them); filters of different kinds are AND-combined. An empty kind
// matches everything. Values are opaque strings compared verbatim by the
// backend; no validation happens here.
//
// Time windows are inclusive on both ends, matching the interval semantics
// of archival BGP tooling. An inverted window (start > end) is accepted and
// matches nothing; callers that consider that a mistake must reject it
// themselves.

/// Kind of an inclusion filter entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterKind {
    Project,
    Collector,
    RecordType,
}

/// A time window over epoch seconds, inclusive on both ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeWindow {
    pub start: u32,
    pub end: u32,
}

impl TimeWindow {
    pub fn new(start: u32, end: u32) -> Self {
        Self { start, end }
    }

    pub fn contains(&self, t: u32) -> bool {
        self.start <= t && t <= self.end
    }
}

/// Accumulating set of inclusion predicates handed to a backend at start.
///
/// Insertion order within a kind is preserved (no deduplication), which
/// keeps OR-evaluation deterministic even though the result does not depend
/// on order.
#[derive(Debug, Clone, Default)]
pub struct FilterSet {
    projects: Vec<String>,
    collectors: Vec<String>,
    record_types: Vec<String>,
    windows: Vec<TimeWindow>,
    rib_period: u32,
}

impl FilterSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_filter(&mut self, kind: FilterKind, value: impl Into<String>) {
        let value = value.into();
        match kind {
            FilterKind::Project => self.projects.push(value),
            FilterKind::Collector => self.collectors.push(value),
            FilterKind::RecordType => self.record_types.push(value),
        }
    }

    pub fn add_window(&mut self, window: TimeWindow) {
        self.windows.push(window);
    }

    /// Set the RIB replay period in seconds. Only one period is meaningful
    /// per session, so a later call overwrites an earlier one; zero means
    /// "use the backend's default cadence".
    pub fn set_rib_period(&mut self, seconds: u32) {
        self.rib_period = seconds;
    }

    pub fn projects(&self) -> &[String] {
        &self.projects
    }

    pub fn collectors(&self) -> &[String] {
        &self.collectors
    }

    pub fn record_types(&self) -> &[String] {
        &self.record_types
    }

    pub fn windows(&self) -> &[TimeWindow] {
        &self.windows
    }

    pub fn rib_period(&self) -> Option<u32> {
        (self.rib_period > 0).then_some(self.rib_period)
    }

    pub fn entries(&self, kind: FilterKind) -> &[String] {
        match kind {
            FilterKind::Project => &self.projects,
            FilterKind::Collector => &self.collectors,
            FilterKind::RecordType => &self.record_types,
        }
    }

    pub fn matches_project(&self, project: &str) -> bool {
        self.projects.is_empty() || self.projects.iter().any(|p| p == project)
    }

    pub fn matches_collector(&self, collector: &str) -> bool {
        self.collectors.is_empty() || self.collectors.iter().any(|c| c == collector)
    }

    pub fn matches_record_type(&self, record_type: &str) -> bool {
        self.record_types.is_empty() || self.record_types.iter().any(|t| t == record_type)
    }

    pub fn matches_time(&self, t: u32) -> bool {
        self.windows.is_empty() || self.windows.iter().any(|w| w.contains(t))
    }

    /// Whether a dump stamped at `dump_time` can still hold in-window
    /// records. Dumps are stamped at their start and accumulate forward,
    /// so any window ending at or after the stamp is reachable; the
    /// per-record time check happens when the dump is read.
    pub fn reaches_window(&self, dump_time: u32) -> bool {
        self.windows.is_empty() || self.windows.iter().any(|w| dump_time <= w.end)
    }
}
