use crate::elem::Elem;

/// Whether a record originates from a full-table snapshot or an
/// incremental feed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DumpType {
    Rib,
    Update,
}

impl DumpType {
    /// Label used in rendered record lines.
    pub fn label(&self) -> &'static str {
        match self {
            DumpType::Rib => "rib",
            DumpType::Update => "update",
        }
    }

    /// Name used in dump file metadata and matched by `-t` filters
    /// (`ribs`, `updates`).
    pub fn filter_name(&self) -> &'static str {
        match self {
            DumpType::Rib => "ribs",
            DumpType::Update => "updates",
        }
    }

    pub fn from_filter_name(name: &str) -> Option<Self> {
        match name {
            "ribs" => Some(DumpType::Rib),
            "updates" => Some(DumpType::Update),
            _ => None,
        }
    }
}

/// Position of a record within its contiguous source dump file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DumpPosition {
    Start,
    Middle,
    End,
}

impl DumpPosition {
    pub fn label(&self) -> &'static str {
        match self {
            DumpPosition::Start => "start",
            DumpPosition::Middle => "middle",
            DumpPosition::End => "end",
        }
    }
}

/// Terminal classification of a retrieved record.
///
/// Only `Valid` records carry elements; the other statuses describe why the
/// source produced no usable payload. They are rendered, not raised as
/// errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordStatus {
    Valid,
    FilteredSource,
    EmptySource,
    CorruptedSource,
    CorruptedRecord,
}

impl RecordStatus {
    pub fn label(&self) -> &'static str {
        match self {
            RecordStatus::Valid => "valid_record",
            RecordStatus::FilteredSource => "filtered_source",
            RecordStatus::EmptySource => "empty_source",
            RecordStatus::CorruptedSource => "corrupted_source",
            RecordStatus::CorruptedRecord => "corrupted_record",
        }
    }
}

/// One unit of retrieved data with status, timing, and provenance metadata.
#[derive(Debug, Clone)]
pub struct Record {
    /// Capture time, epoch seconds
    pub record_time: u32,
    pub project: String,
    pub collector: String,
    pub dump_type: DumpType,
    pub status: RecordStatus,
    /// When the source dump file was produced, epoch seconds
    pub dump_time: u32,
    pub dump_pos: DumpPosition,
    /// Parsed elements; empty for any non-valid status
    pub elems: Vec<Elem>,
    /// Raw payload tokens in the backend's native dump format
    pub raw: Vec<String>,
}

impl Record {
    /// Cursor over this record's elements, in payload order.
    pub fn elem_cursor(&self) -> ElemCursor<'_> {
        ElemCursor {
            iter: self.elems.iter(),
        }
    }
}

/// Lazy, exhaustive cursor over one record's elements.
///
/// `next` keeps returning `None` once the payload is drained; the borrowed
/// element is valid until the next `next` call by construction of the
/// borrow, matching the one-live-element contract of the retrieval loop.
pub struct ElemCursor<'a> {
    iter: std::slice::Iter<'a, Elem>,
}

impl<'a> ElemCursor<'a> {
    pub fn next(&mut self) -> Option<&'a Elem> {
        self.iter.next()
    }
}
