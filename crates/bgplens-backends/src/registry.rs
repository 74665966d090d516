// NOTE: Option Handle Scoping
//
// A resolved option handle carries the identity of the backend that owns
// it. The session compares that identity against its active backend before
// staging a value, so a handle resolved against one data interface can
// never silently configure another one that happens to use the same option
// name.

use std::path::PathBuf;

use bgplens_types::FilterSet;

use crate::archive::ArchiveBackend;
use crate::csvfile::CsvCatalog;
use crate::error::{Error, Result};
use crate::textdump::TextdumpCatalog;
use crate::traits::DataBackend;

/// Identifier of one pluggable data interface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendId {
    Textdump,
    Csvfile,
}

#[derive(Debug, Clone)]
pub struct BackendMetadata {
    pub id: BackendId,
    pub name: &'static str,
    pub description: &'static str,
    pub is_default: bool,
}

const BACKENDS: &[BackendMetadata] = &[
    BackendMetadata {
        id: BackendId::Textdump,
        name: "textdump",
        description: "scan an archive directory for dump files",
        is_default: true,
    },
    BackendMetadata {
        id: BackendId::Csvfile,
        name: "csvfile",
        description: "read dump files listed in a CSV index",
        is_default: false,
    },
];

/// A named configuration option scoped to one data interface.
#[derive(Debug, Clone, Copy)]
pub struct OptionSpec {
    pub name: &'static str,
    pub description: &'static str,
}

const TEXTDUMP_OPTIONS: &[OptionSpec] = &[OptionSpec {
    name: "path",
    description: "archive directory scanned for <project>.<collector>.<type>.<time>.dump files",
}];

const CSVFILE_OPTIONS: &[OptionSpec] = &[OptionSpec {
    name: "csv-file",
    description: "CSV index of dumps (path,project,collector,record_type,dump_time)",
}];

/// Resolved option handle, valid only against the backend it was resolved
/// for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OptionHandle {
    backend: BackendId,
    name: &'static str,
}

impl OptionHandle {
    pub fn backend(&self) -> BackendId {
        self.backend
    }

    pub fn name(&self) -> &'static str {
        self.name
    }
}

/// All known data interfaces, in stable presentation order.
pub fn all_backends() -> &'static [BackendMetadata] {
    BACKENDS
}

pub fn default_backend() -> BackendId {
    BACKENDS
        .iter()
        .find(|m| m.is_default)
        .map(|m| m.id)
        .unwrap_or(BACKENDS[0].id)
}

pub fn backend_by_name(name: &str) -> Option<BackendId> {
    BACKENDS.iter().find(|m| m.name == name).map(|m| m.id)
}

pub fn metadata(id: BackendId) -> &'static BackendMetadata {
    BACKENDS
        .iter()
        .find(|m| m.id == id)
        .expect("every BackendId has a metadata entry")
}

pub fn options_for(id: BackendId) -> &'static [OptionSpec] {
    match id {
        BackendId::Textdump => TEXTDUMP_OPTIONS,
        BackendId::Csvfile => CSVFILE_OPTIONS,
    }
}

pub fn option_by_name(id: BackendId, name: &str) -> Option<OptionHandle> {
    options_for(id)
        .iter()
        .find(|spec| spec.name == name)
        .map(|spec| OptionHandle {
            backend: id,
            name: spec.name,
        })
}

/// Build a started backend from staged option values and the session's
/// filter set. Option values are applied last-wins.
pub fn create_backend(
    id: BackendId,
    options: &[(OptionHandle, String)],
    filters: &FilterSet,
) -> Result<Box<dyn DataBackend>> {
    let value = |name: &str| {
        options
            .iter()
            .rev()
            .find(|(handle, _)| handle.name == name)
            .map(|(_, v)| v.as_str())
    };

    match id {
        BackendId::Textdump => {
            let root = value("path").ok_or_else(|| {
                Error::Init("the 'path' option is required for the textdump interface".to_string())
            })?;
            let catalog = TextdumpCatalog::new(PathBuf::from(root))?;
            Ok(Box::new(ArchiveBackend::new(
                Box::new(catalog),
                filters.clone(),
            )?))
        }
        BackendId::Csvfile => {
            let index = value("csv-file").ok_or_else(|| {
                Error::Init(
                    "the 'csv-file' option is required for the csvfile interface".to_string(),
                )
            })?;
            let catalog = CsvCatalog::new(PathBuf::from(index))?;
            Ok(Box::new(ArchiveBackend::new(
                Box::new(catalog),
                filters.clone(),
            )?))
        }
    }
}
