//! ArchiveWorld pattern for declarative end-to-end test setup.
//!
//! Creates an isolated temp directory holding a dump archive (and
//! optionally a CSV index), then runs the `bgplens` binary against it.

use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use anyhow::Result;
use assert_cmd::Command;
use tempfile::TempDir;

/// Isolated test environment: a temp dir with an `archive/` subdirectory.
pub struct ArchiveWorld {
    temp_dir: TempDir,
    archive: PathBuf,
}

impl Default for ArchiveWorld {
    fn default() -> Self {
        Self::new()
    }
}

impl ArchiveWorld {
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let archive = temp_dir.path().join("archive");
        std::fs::create_dir_all(&archive).expect("Failed to create archive dir");
        Self { temp_dir, archive }
    }

    pub fn archive(&self) -> &Path {
        &self.archive
    }

    pub fn archive_str(&self) -> String {
        self.archive.display().to_string()
    }

    /// Place one dump file in the archive, named by the catalog
    /// convention. `lines` are full record lines (see
    /// `fixtures::record_line`); an empty slice produces an empty file.
    pub fn add_dump(
        &self,
        project: &str,
        collector: &str,
        record_type: &str,
        dump_time: u32,
        lines: &[String],
    ) -> Result<PathBuf> {
        let path = self.archive.join(format!(
            "{}.{}.{}.{}.dump",
            project, collector, record_type, dump_time
        ));
        let mut content = String::new();
        for line in lines {
            writeln!(content, "{}", line)?;
        }
        std::fs::write(&path, content)?;
        Ok(path)
    }

    /// Write a CSV index over explicit rows of
    /// `(path, project, collector, record_type, dump_time)`.
    pub fn write_index(&self, rows: &[(String, &str, &str, &str, u32)]) -> Result<PathBuf> {
        let path = self.temp_dir.path().join("index.csv");
        let mut content = String::from("path,project,collector,record_type,dump_time\n");
        for (file, project, collector, record_type, dump_time) in rows {
            writeln!(
                content,
                "{},{},{},{},{}",
                file, project, collector, record_type, dump_time
            )?;
        }
        std::fs::write(&path, content)?;
        Ok(path)
    }

    /// Start a long-lived bgplens run (blocking mode tests).
    pub fn spawn(&self, args: &[&str]) -> Result<crate::process::BackgroundRun> {
        crate::process::BackgroundRun::spawn(
            args,
            self.temp_dir.path(),
            &self.temp_dir.path().join("config.toml"),
        )
    }

    /// Run the bgplens binary with the given arguments.
    pub fn run(&self, args: &[&str]) -> Result<RunResult> {
        let output = Command::cargo_bin("bgplens")?
            .args(args)
            .current_dir(self.temp_dir.path())
            // isolate from any user-level config
            .env("BGPLENS_CONFIG", self.temp_dir.path().join("config.toml"))
            .output()?;
        Ok(RunResult { output })
    }
}

/// Captured outcome of one CLI invocation.
pub struct RunResult {
    output: std::process::Output,
}

impl RunResult {
    pub fn success(&self) -> bool {
        self.output.status.success()
    }

    pub fn code(&self) -> Option<i32> {
        self.output.status.code()
    }

    pub fn stdout(&self) -> String {
        String::from_utf8_lossy(&self.output.stdout).to_string()
    }

    pub fn stderr(&self) -> String {
        String::from_utf8_lossy(&self.output.stderr).to_string()
    }

    /// Non-empty stdout lines.
    pub fn stdout_lines(&self) -> Vec<String> {
        self.stdout()
            .lines()
            .filter(|l| !l.is_empty())
            .map(str::to_string)
            .collect()
    }
}
