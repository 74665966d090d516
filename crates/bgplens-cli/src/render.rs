//! Stateless text rendering of records and elements.

use std::fmt::{self, Write as _};

use bgplens_types::{Elem, Record};

/// Upper bound on one rendered element line.
pub const ELEM_BUF_LEN: usize = 65536;

/// Pipe-delimited record line, fields in fixed order:
/// capture time, project, collector, dump type, status, dump time,
/// dump position. The trailing separator is part of the format.
pub fn record_line(record: &Record) -> String {
    format!(
        "{}|{}|{}|{}|{}|{}|{}|",
        record.record_time,
        record.project,
        record.collector,
        record.dump_type.label(),
        record.status.label(),
        record.dump_time,
        record.dump_pos.label()
    )
}

/// Marker for an element whose rendering would exceed the fixed buffer.
#[derive(Debug)]
pub struct ElemOverflow;

/// Render one element into the reusable buffer. On overflow the buffer
/// holds the truncated content for diagnostics and the caller must treat
/// the run as failed; truncated output is never emitted as if complete.
pub fn elem_line<'a>(
    elem: &Elem,
    buf: &'a mut FixedBuf,
) -> std::result::Result<&'a str, ElemOverflow> {
    buf.clear();
    match write!(buf, "{}", elem) {
        Ok(()) => Ok(buf.as_str()),
        Err(fmt::Error) => Err(ElemOverflow),
    }
}

/// A `fmt::Write` sink with a hard capacity. Writes that would exceed the
/// capacity keep as much as fits and report an error instead of silently
/// truncating.
pub struct FixedBuf {
    buf: String,
    cap: usize,
}

impl FixedBuf {
    pub fn new(cap: usize) -> Self {
        Self {
            buf: String::new(),
            cap,
        }
    }

    pub fn clear(&mut self) {
        self.buf.clear();
    }

    pub fn as_str(&self) -> &str {
        &self.buf
    }
}

impl fmt::Write for FixedBuf {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        let room = self.cap - self.buf.len();
        if s.len() <= room {
            self.buf.push_str(s);
            return Ok(());
        }
        let mut cut = room;
        while cut > 0 && !s.is_char_boundary(cut) {
            cut -= 1;
        }
        self.buf.push_str(&s[..cut]);
        Err(fmt::Error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bgplens_types::{DumpPosition, DumpType, RecordStatus};

    fn sample_record(status: RecordStatus) -> Record {
        Record {
            record_time: 50,
            project: "ris".to_string(),
            collector: "rrc00".to_string(),
            dump_type: DumpType::Rib,
            status,
            dump_time: 40,
            dump_pos: DumpPosition::Start,
            elems: Vec::new(),
            raw: Vec::new(),
        }
    }

    #[test]
    fn test_record_line_field_order() {
        let line = record_line(&sample_record(RecordStatus::Valid));
        assert_eq!(line, "50|ris|rrc00|rib|valid_record|40|start|");

        let fields: Vec<&str> = line.split('|').collect();
        assert_eq!(fields[3], "rib");
        assert_eq!(fields[4], "valid_record");
    }

    #[test]
    fn test_record_line_renders_every_status() {
        for (status, label) in [
            (RecordStatus::Valid, "valid_record"),
            (RecordStatus::FilteredSource, "filtered_source"),
            (RecordStatus::EmptySource, "empty_source"),
            (RecordStatus::CorruptedSource, "corrupted_source"),
            (RecordStatus::CorruptedRecord, "corrupted_record"),
        ] {
            let line = record_line(&sample_record(status));
            assert_eq!(line.split('|').nth(4), Some(label));
        }
    }

    #[test]
    fn test_elem_line_renders_into_buffer() {
        let elem = Elem::parse("W,10.0.0.1,64500,192.0.2.0/24", 50).unwrap();
        let mut buf = FixedBuf::new(ELEM_BUF_LEN);
        let line = elem_line(&elem, &mut buf).unwrap();
        assert_eq!(line, "50|W|10.0.0.1|64500|192.0.2.0/24");

        // the buffer is reusable across elements
        let other = Elem::parse("W,10.0.0.1,64500,198.51.100.0/24", 51).unwrap();
        let line = elem_line(&other, &mut buf).unwrap();
        assert_eq!(line, "51|W|10.0.0.1|64500|198.51.100.0/24");
    }

    #[test]
    fn test_overflow_fails_loudly_and_keeps_truncated_content() {
        let elem = Elem::parse("W,10.0.0.1,64500,192.0.2.0/24", 50).unwrap();
        let mut buf = FixedBuf::new(10);
        assert!(elem_line(&elem, &mut buf).is_err());
        assert_eq!(buf.as_str().len(), 10);
        assert!("50|W|10.0.0.1|64500|192.0.2.0/24".starts_with(buf.as_str()));
    }
}
