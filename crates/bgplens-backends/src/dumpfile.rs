//! Line-oriented dump-file reader shared by the archival catalogs.
//!
//! Each non-empty line of a dump file is one record:
//! `record_time|elem|elem|...`, elems comma-separated as understood by
//! `Elem::parse`. Source-level problems are never raised as errors; they
//! become records with the matching terminal status so the consumer can
//! render them.

use std::fs;

use bgplens_types::{DumpPosition, Elem, FilterSet, Record, RecordStatus};

use crate::traits::DumpMeta;

/// Read every record of one dump file, in payload order.
///
/// Status mapping:
/// - unreadable file -> a single `corrupted_source` record
/// - readable but empty -> a single `empty_source` record
/// - malformed record line -> `corrupted_record` (payload dropped)
/// - capture time outside every window -> `filtered_source` (elements
///   suppressed, the record itself is still delivered)
pub fn read_records(meta: &DumpMeta, filters: &FilterSet) -> Vec<Record> {
    let content = match fs::read_to_string(&meta.path) {
        Ok(content) => content,
        Err(_) => return vec![marker_record(meta, RecordStatus::CorruptedSource)],
    };

    let lines: Vec<&str> = content
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .collect();
    if lines.is_empty() {
        return vec![marker_record(meta, RecordStatus::EmptySource)];
    }

    let last = lines.len() - 1;
    lines
        .iter()
        .enumerate()
        .map(|(i, line)| {
            let pos = if i == 0 {
                DumpPosition::Start
            } else if i == last {
                DumpPosition::End
            } else {
                DumpPosition::Middle
            };
            parse_record(meta, filters, line, pos)
        })
        .collect()
}

fn parse_record(meta: &DumpMeta, filters: &FilterSet, line: &str, pos: DumpPosition) -> Record {
    let mut record = Record {
        record_time: meta.dump_time,
        project: meta.project.clone(),
        collector: meta.collector.clone(),
        dump_type: meta.dump_type,
        status: RecordStatus::Valid,
        dump_time: meta.dump_time,
        dump_pos: pos,
        elems: Vec::new(),
        raw: Vec::new(),
    };

    let mut fields = line.split('|');
    let time: u32 = match fields.next().and_then(|t| t.parse().ok()) {
        Some(time) => time,
        None => {
            record.status = RecordStatus::CorruptedRecord;
            return record;
        }
    };
    record.record_time = time;

    if !filters.matches_time(time) {
        record.status = RecordStatus::FilteredSource;
        return record;
    }

    for token in fields {
        match Elem::parse(token, time) {
            Ok(elem) => {
                record.elems.push(elem);
                record.raw.push(token.to_string());
            }
            Err(_) => {
                record.status = RecordStatus::CorruptedRecord;
                record.elems.clear();
                record.raw.clear();
                return record;
            }
        }
    }
    record
}

fn marker_record(meta: &DumpMeta, status: RecordStatus) -> Record {
    Record {
        record_time: meta.dump_time,
        project: meta.project.clone(),
        collector: meta.collector.clone(),
        dump_type: meta.dump_type,
        status,
        dump_time: meta.dump_time,
        dump_pos: DumpPosition::Start,
        elems: Vec::new(),
        raw: Vec::new(),
    }
}
