//! Background process management for blocking-mode tests.

use std::io::{BufRead, BufReader};
use std::path::Path;
use std::process::{Child, Command, Stdio};
use std::sync::mpsc::{Receiver, channel};
use std::time::Duration;

use anyhow::Result;

/// A bgplens run kept alive in the background, with line-wise access to
/// its stdout.
pub struct BackgroundRun {
    child: Child,
    lines: Receiver<String>,
}

impl BackgroundRun {
    pub fn spawn(args: &[&str], cwd: &Path, config_path: &Path) -> Result<Self> {
        let mut child = Command::new(assert_cmd::cargo::cargo_bin("bgplens"))
            .args(args)
            .current_dir(cwd)
            .env("BGPLENS_CONFIG", config_path)
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .spawn()?;

        let stdout = child.stdout.take().expect("stdout is piped");
        let (tx, rx) = channel();
        std::thread::spawn(move || {
            for line in BufReader::new(stdout).lines().map_while(|l| l.ok()) {
                if tx.send(line).is_err() {
                    break;
                }
            }
        });

        Ok(Self { child, lines: rx })
    }

    /// Next stdout line, or None if nothing arrives within the timeout.
    pub fn next_line(&self, timeout: Duration) -> Option<String> {
        self.lines.recv_timeout(timeout).ok()
    }

    /// Deliver SIGINT, as Ctrl-C would.
    #[cfg(unix)]
    pub fn interrupt(&self) {
        unsafe {
            libc::kill(self.child.id() as libc::pid_t, libc::SIGINT);
        }
    }

    /// Wait for the process to finish and return its status.
    pub fn wait(mut self) -> Result<std::process::ExitStatus> {
        Ok(self.child.wait()?)
    }

    /// Hard-kill the process; for cleanup paths only.
    pub fn kill(mut self) {
        let _ = self.child.kill();
        let _ = self.child.wait();
    }
}
