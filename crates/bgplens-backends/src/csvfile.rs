use std::path::PathBuf;

use bgplens_types::DumpType;
use serde::Deserialize;

use crate::error::{Error, Result};
use crate::traits::{DumpCatalog, DumpMeta};

/// One row of the CSV index. Relative dump paths are resolved against the
/// directory holding the index file.
#[derive(Debug, Deserialize)]
struct IndexRow {
    path: String,
    project: String,
    collector: String,
    record_type: String,
    dump_time: u32,
}

/// CSV-index catalog: dumps are whatever the index file lists, which makes
/// appending rows the way to publish new data to blocking consumers.
#[derive(Debug)]
pub struct CsvCatalog {
    index: PathBuf,
    base: PathBuf,
}

impl CsvCatalog {
    pub fn new(index: PathBuf) -> Result<Self> {
        if !index.is_file() {
            return Err(Error::Init(format!(
                "csv index '{}' does not exist",
                index.display()
            )));
        }
        let base = index
            .parent()
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("."));
        Ok(Self { index, base })
    }
}

impl DumpCatalog for CsvCatalog {
    fn enumerate(&mut self) -> Result<Vec<DumpMeta>> {
        let mut reader = csv::Reader::from_path(&self.index)
            .map_err(|e| Error::Source(format!("cannot read csv index: {}", e)))?;

        let mut dumps = Vec::new();
        for row in reader.deserialize() {
            let row: IndexRow =
                row.map_err(|e| Error::Source(format!("malformed csv index row: {}", e)))?;
            let dump_type = DumpType::from_filter_name(&row.record_type).ok_or_else(|| {
                Error::Source(format!(
                    "unknown record type '{}' in csv index",
                    row.record_type
                ))
            })?;

            let path = PathBuf::from(&row.path);
            let path = if path.is_absolute() {
                path
            } else {
                self.base.join(path)
            };

            dumps.push(DumpMeta {
                path,
                project: row.project,
                collector: row.collector,
                dump_type,
                dump_time: row.dump_time,
            });
        }
        Ok(dumps)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_enumerate_resolves_relative_paths() {
        let dir = tempfile::tempdir().unwrap();
        let index = dir.path().join("index.csv");
        let mut file = std::fs::File::create(&index).unwrap();
        writeln!(file, "path,project,collector,record_type,dump_time").unwrap();
        writeln!(file, "dumps/a.dump,ris,rrc00,updates,100").unwrap();
        writeln!(file, "/abs/b.dump,routeviews,rv2,ribs,200").unwrap();

        let mut catalog = CsvCatalog::new(index).unwrap();
        let dumps = catalog.enumerate().unwrap();
        assert_eq!(dumps.len(), 2);
        assert_eq!(dumps[0].path, dir.path().join("dumps/a.dump"));
        assert_eq!(dumps[0].dump_type, DumpType::Update);
        assert_eq!(dumps[1].path, PathBuf::from("/abs/b.dump"));
        assert_eq!(dumps[1].collector, "rv2");
    }

    #[test]
    fn test_unknown_record_type_is_a_source_error() {
        let dir = tempfile::tempdir().unwrap();
        let index = dir.path().join("index.csv");
        let mut file = std::fs::File::create(&index).unwrap();
        writeln!(file, "path,project,collector,record_type,dump_time").unwrap();
        writeln!(file, "a.dump,ris,rrc00,tables,100").unwrap();

        let mut catalog = CsvCatalog::new(index).unwrap();
        assert!(matches!(catalog.enumerate(), Err(Error::Source(_))));
    }

    #[test]
    fn test_missing_index_is_an_init_error() {
        let err = CsvCatalog::new(PathBuf::from("/no/such/index.csv")).unwrap_err();
        assert!(matches!(err, Error::Init(_)));
    }
}
