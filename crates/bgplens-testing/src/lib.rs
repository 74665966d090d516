//! Testing infrastructure for bgplens integration tests.
//!
//! - `ArchiveWorld`: isolated archive directory plus CLI command runner
//! - `scripted`: in-memory `DataBackend` for driving the session directly
//! - `fixtures`: canned element tokens and record lines

pub mod fixtures;
pub mod process;
pub mod scripted;
pub mod world;

pub use process::BackgroundRun;
pub use scripted::ScriptedBackend;
pub use world::{ArchiveWorld, RunResult};
