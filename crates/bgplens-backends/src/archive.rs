use std::collections::{HashMap, HashSet, VecDeque};
use std::path::PathBuf;
use std::time::{Duration, Instant};

use bgplens_types::{DumpType, FilterSet, Record};

use crate::cancel::CancelToken;
use crate::dumpfile;
use crate::error::Result;
use crate::traits::{DataBackend, DumpCatalog, DumpMeta};

const RESCAN_SLICE: Duration = Duration::from_millis(200);

/// Catalog-driven archival backend shared by the shipped data interfaces.
///
/// Dumps are admitted once (tracked by path), filtered by provenance
/// metadata and window reachability, thinned by the RIB replay period, and
/// delivered in dump-time order within each enumeration pass. A dump
/// stamped before a window is still read, since its records may fall
/// inside it; the per-record window check happens at read time. Blocking
/// consumers re-enumerate the catalog through `await_new_data`, which is
/// the only place this backend ever waits.
pub struct ArchiveBackend {
    catalog: Box<dyn DumpCatalog>,
    filters: FilterSet,
    pending: VecDeque<DumpMeta>,
    queue: VecDeque<Record>,
    seen: HashSet<PathBuf>,
    /// dump_time of the last kept rib, per collector
    last_rib: HashMap<String, u32>,
}

impl ArchiveBackend {
    pub fn new(catalog: Box<dyn DumpCatalog>, filters: FilterSet) -> Result<Self> {
        let mut backend = Self {
            catalog,
            filters,
            pending: VecDeque::new(),
            queue: VecDeque::new(),
            seen: HashSet::new(),
            last_rib: HashMap::new(),
        };
        backend.refresh()?;
        Ok(backend)
    }

    /// Re-enumerate the catalog and admit unseen dumps. Returns how many
    /// dumps were admitted.
    fn refresh(&mut self) -> Result<usize> {
        let mut fresh: Vec<DumpMeta> = Vec::new();
        for meta in self.catalog.enumerate()? {
            if !self.seen.insert(meta.path.clone()) {
                continue;
            }
            if self.admits(&meta) {
                fresh.push(meta);
            }
        }

        fresh.sort_by(|a, b| {
            (a.dump_time, &a.collector, &a.path).cmp(&(b.dump_time, &b.collector, &b.path))
        });

        let mut admitted = 0;
        for meta in fresh {
            if !self.passes_rib_period(&meta) {
                continue;
            }
            if meta.dump_type == DumpType::Rib {
                self.last_rib.insert(meta.collector.clone(), meta.dump_time);
            }
            self.pending.push_back(meta);
            admitted += 1;
        }
        Ok(admitted)
    }

    fn admits(&self, meta: &DumpMeta) -> bool {
        self.filters.matches_project(&meta.project)
            && self.filters.matches_collector(&meta.collector)
            && self
                .filters
                .matches_record_type(meta.dump_type.filter_name())
            && self.filters.reaches_window(meta.dump_time)
    }

    /// Replay-period thinning: keep a rib dump only if it is at least
    /// `period` seconds after the previously kept rib of the same
    /// collector. Updates are never thinned.
    fn passes_rib_period(&self, meta: &DumpMeta) -> bool {
        if meta.dump_type != DumpType::Rib {
            return true;
        }
        let Some(period) = self.filters.rib_period() else {
            return true;
        };
        match self.last_rib.get(&meta.collector) {
            Some(&last) => meta.dump_time >= last.saturating_add(period),
            None => true,
        }
    }

    /// Load records from the next pending dump into the delivery queue.
    /// Returns false when no dumps remain.
    fn load_next_dump(&mut self) -> bool {
        match self.pending.pop_front() {
            Some(meta) => {
                self.queue
                    .extend(dumpfile::read_records(&meta, &self.filters));
                true
            }
            None => false,
        }
    }
}

impl DataBackend for ArchiveBackend {
    fn next_record(&mut self) -> Result<Option<Record>> {
        loop {
            if let Some(record) = self.queue.pop_front() {
                return Ok(Some(record));
            }
            if !self.load_next_dump() {
                return Ok(None);
            }
        }
    }

    fn await_new_data(&mut self, token: &CancelToken, budget: Duration) -> Result<bool> {
        let deadline = Instant::now() + budget;
        loop {
            if token.is_cancelled() {
                return Ok(false);
            }
            if self.refresh()? > 0 {
                return Ok(true);
            }
            let remaining = deadline.saturating_duration_since(Instant::now());
            if remaining.is_zero() {
                return Ok(false);
            }
            std::thread::sleep(remaining.min(RESCAN_SLICE));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bgplens_types::{FilterKind, RecordStatus, TimeWindow};
    use std::io::Write;
    use std::sync::{Arc, Mutex};

    /// In-memory catalog backed by real temp files for the record payloads.
    struct FakeCatalog {
        entries: Arc<Mutex<Vec<DumpMeta>>>,
    }

    impl DumpCatalog for FakeCatalog {
        fn enumerate(&mut self) -> Result<Vec<DumpMeta>> {
            Ok(self.entries.lock().unwrap().clone())
        }
    }

    struct World {
        dir: tempfile::TempDir,
        entries: Arc<Mutex<Vec<DumpMeta>>>,
    }

    impl World {
        fn new() -> Self {
            Self {
                dir: tempfile::tempdir().unwrap(),
                entries: Arc::new(Mutex::new(Vec::new())),
            }
        }

        fn catalog(&self) -> Box<dyn DumpCatalog> {
            Box::new(FakeCatalog {
                entries: self.entries.clone(),
            })
        }

        fn add_dump(
            &self,
            project: &str,
            collector: &str,
            dump_type: DumpType,
            dump_time: u32,
            lines: &[String],
        ) {
            let path = self.dir.path().join(format!(
                "{}.{}.{}.{}.dump",
                project,
                collector,
                dump_type.filter_name(),
                dump_time
            ));
            let mut file = std::fs::File::create(&path).unwrap();
            for line in lines {
                writeln!(file, "{}", line).unwrap();
            }
            self.entries.lock().unwrap().push(DumpMeta {
                path,
                project: project.to_string(),
                collector: collector.to_string(),
                dump_type,
                dump_time,
            });
        }
    }

    fn withdrawal(time: u32) -> String {
        format!("{}|W,10.0.0.1,64500,192.0.2.0/24", time)
    }

    fn wide_filters() -> FilterSet {
        let mut filters = FilterSet::new();
        filters.add_window(TimeWindow::new(0, 100_000));
        filters
    }

    fn drain(backend: &mut ArchiveBackend) -> Vec<Record> {
        let mut out = Vec::new();
        while let Some(record) = backend.next_record().unwrap() {
            out.push(record);
        }
        out
    }

    #[test]
    fn test_dumps_delivered_in_dump_time_order() {
        let world = World::new();
        world.add_dump("ris", "rrc01", DumpType::Update, 200, &[withdrawal(200)]);
        world.add_dump("ris", "rrc00", DumpType::Update, 100, &[withdrawal(100)]);

        let mut backend = ArchiveBackend::new(world.catalog(), wide_filters()).unwrap();
        let records = drain(&mut backend);
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].collector, "rrc00");
        assert_eq!(records[1].collector, "rrc01");
    }

    #[test]
    fn test_metadata_filters_select_dumps() {
        let world = World::new();
        world.add_dump("ris", "rrc00", DumpType::Update, 100, &[withdrawal(100)]);
        world.add_dump("routeviews", "rv2", DumpType::Update, 100, &[withdrawal(100)]);
        world.add_dump("ris", "rrc00", DumpType::Rib, 100, &[withdrawal(100)]);

        let mut filters = wide_filters();
        filters.add_filter(FilterKind::Project, "ris");
        filters.add_filter(FilterKind::RecordType, "updates");

        let mut backend = ArchiveBackend::new(world.catalog(), filters).unwrap();
        let records = drain(&mut backend);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].project, "ris");
        assert_eq!(records[0].dump_type, DumpType::Update);
    }

    #[test]
    fn test_dumps_stamped_past_every_window_are_skipped() {
        let world = World::new();
        world.add_dump("ris", "rrc00", DumpType::Update, 100, &[withdrawal(100)]);
        world.add_dump("ris", "rrc00", DumpType::Update, 900, &[withdrawal(900)]);

        let mut filters = FilterSet::new();
        filters.add_window(TimeWindow::new(0, 500));

        let mut backend = ArchiveBackend::new(world.catalog(), filters).unwrap();
        let records = drain(&mut backend);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].dump_time, 100);
    }

    #[test]
    fn test_dump_stamped_before_window_yields_its_in_window_records() {
        let world = World::new();
        world.add_dump(
            "ris",
            "rrc00",
            DumpType::Update,
            40,
            &[withdrawal(42), withdrawal(50)],
        );

        let mut filters = FilterSet::new();
        filters.add_window(TimeWindow::new(45, 100));

        let mut backend = ArchiveBackend::new(world.catalog(), filters).unwrap();
        let records = drain(&mut backend);
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].status, RecordStatus::FilteredSource);
        assert_eq!(records[1].status, RecordStatus::Valid);
        assert_eq!(records[1].record_time, 50);
    }

    #[test]
    fn test_rib_period_thins_per_collector() {
        let world = World::new();
        for t in [0u32, 100, 3600, 4000, 7200] {
            world.add_dump("ris", "rrc00", DumpType::Rib, t, &[withdrawal(t)]);
        }
        // another collector keeps its own cadence
        world.add_dump("ris", "rrc01", DumpType::Rib, 100, &[withdrawal(100)]);

        let mut filters = wide_filters();
        filters.set_rib_period(3600);

        let mut backend = ArchiveBackend::new(world.catalog(), filters).unwrap();
        let kept: Vec<(String, u32)> = drain(&mut backend)
            .into_iter()
            .map(|r| (r.collector, r.dump_time))
            .collect();
        assert_eq!(
            kept,
            vec![
                ("rrc00".to_string(), 0),
                ("rrc01".to_string(), 100),
                ("rrc00".to_string(), 3600),
                ("rrc00".to_string(), 7200),
            ]
        );
    }

    #[test]
    fn test_await_new_data_discovers_fresh_dumps() {
        let world = World::new();
        world.add_dump("ris", "rrc00", DumpType::Update, 100, &[withdrawal(100)]);

        let mut backend = ArchiveBackend::new(world.catalog(), wide_filters()).unwrap();
        assert_eq!(drain(&mut backend).len(), 1);
        assert!(backend.next_record().unwrap().is_none());

        let token = CancelToken::new();
        assert!(!backend
            .await_new_data(&token, Duration::from_millis(1))
            .unwrap());

        world.add_dump("ris", "rrc00", DumpType::Update, 200, &[withdrawal(200)]);
        assert!(backend
            .await_new_data(&token, Duration::from_millis(1))
            .unwrap());
        let records = drain(&mut backend);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].record_time, 200);
    }

    #[test]
    fn test_cancelled_token_returns_promptly() {
        let world = World::new();
        let mut backend = ArchiveBackend::new(world.catalog(), wide_filters()).unwrap();

        let token = CancelToken::new();
        token.cancel();
        let started = Instant::now();
        assert!(!backend
            .await_new_data(&token, Duration::from_secs(30))
            .unwrap());
        assert!(started.elapsed() < Duration::from_secs(1));
    }
}
