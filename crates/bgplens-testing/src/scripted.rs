//! In-memory backend with a pre-written delivery script, for exercising
//! the session and retrieval loop without touching the filesystem.

use std::collections::VecDeque;
use std::time::Duration;

use bgplens_backends::{CancelToken, DataBackend, Error, Result};
use bgplens_types::{DumpPosition, DumpType, Record, RecordStatus};

enum Step {
    Record(Record),
    Fail(String),
}

/// Scripted `DataBackend`: yields its steps in order, then reports
/// exhaustion. A refill batch, if any, becomes available after one
/// `await_new_data` call, emulating a live source that grows.
#[derive(Default)]
pub struct ScriptedBackend {
    steps: VecDeque<Step>,
    refill: VecDeque<Record>,
}

impl ScriptedBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_record(mut self, record: Record) -> Self {
        self.steps.push_back(Step::Record(record));
        self
    }

    /// Append a hard source failure after the preceding records.
    pub fn push_failure(mut self, message: impl Into<String>) -> Self {
        self.steps.push_back(Step::Fail(message.into()));
        self
    }

    /// Records that appear only after the consumer waits for new data.
    pub fn with_refill(mut self, records: Vec<Record>) -> Self {
        self.refill = records.into();
        self
    }
}

impl DataBackend for ScriptedBackend {
    fn next_record(&mut self) -> Result<Option<Record>> {
        match self.steps.pop_front() {
            Some(Step::Record(record)) => Ok(Some(record)),
            Some(Step::Fail(message)) => Err(Error::Source(message)),
            None => Ok(None),
        }
    }

    fn await_new_data(&mut self, token: &CancelToken, _budget: Duration) -> Result<bool> {
        if token.is_cancelled() || self.refill.is_empty() {
            return Ok(false);
        }
        while let Some(record) = self.refill.pop_front() {
            self.steps.push_back(Step::Record(record));
        }
        Ok(true)
    }
}

/// A minimal valid record for scripts; elements can be attached by the
/// caller through the public fields.
pub fn valid_record(time: u32) -> Record {
    Record {
        record_time: time,
        project: "ris".to_string(),
        collector: "rrc00".to_string(),
        dump_type: DumpType::Update,
        status: RecordStatus::Valid,
        dump_time: time,
        dump_pos: DumpPosition::Start,
        elems: Vec::new(),
        raw: Vec::new(),
    }
}
