use std::path::{Path, PathBuf};

use bgplens_types::DumpType;
use walkdir::WalkDir;

use crate::error::{Error, Result};
use crate::traits::{DumpCatalog, DumpMeta};

/// Directory catalog: recursively scans an archive root for files named
/// `<project>.<collector>.<ribs|updates>.<dump_time>.dump`. Files that do
/// not follow the convention are not part of the archive and are skipped.
#[derive(Debug)]
pub struct TextdumpCatalog {
    root: PathBuf,
}

impl TextdumpCatalog {
    pub fn new(root: PathBuf) -> Result<Self> {
        if !root.is_dir() {
            return Err(Error::Init(format!(
                "archive path '{}' is not a directory",
                root.display()
            )));
        }
        Ok(Self { root })
    }
}

impl DumpCatalog for TextdumpCatalog {
    fn enumerate(&mut self) -> Result<Vec<DumpMeta>> {
        let mut dumps = Vec::new();
        for entry in WalkDir::new(&self.root).follow_links(true) {
            let entry = entry.map_err(|e| Error::Source(e.to_string()))?;
            if !entry.file_type().is_file() {
                continue;
            }
            if let Some(meta) = parse_dump_name(entry.path()) {
                dumps.push(meta);
            }
        }
        Ok(dumps)
    }
}

/// Decode provenance metadata from an archive file name, or None if the
/// name does not follow the convention.
fn parse_dump_name(path: &Path) -> Option<DumpMeta> {
    let name = path.file_name()?.to_str()?;
    let stem = name.strip_suffix(".dump")?;

    // project names carry no dots, collector names may (route-views.sg),
    // so take the project from the left and time/type from the right
    let (project, rest) = stem.split_once('.')?;
    let mut fields = rest.rsplitn(3, '.');
    let dump_time: u32 = fields.next()?.parse().ok()?;
    let dump_type = DumpType::from_filter_name(fields.next()?)?;
    let collector = fields.next()?;
    if project.is_empty() || collector.is_empty() {
        return None;
    }

    Some(DumpMeta {
        path: path.to_path_buf(),
        project: project.to_string(),
        collector: collector.to_string(),
        dump_type,
        dump_time,
    })
}
