// NOTE: Session Lifecycle
//
// Configuring -> Started -> Stopped, one way. Backend selection, option
// staging, and the blocking flag are writable only while Configuring, so a
// backend never observes a half-configured filter set and the "options
// before start" rule is checked mechanically instead of by convention.
// There are no process-wide globals; every session is an independent value.

use std::time::Duration;

use bgplens_backends::{
    self as backends, BackendId, CancelToken, DataBackend, OptionHandle, default_backend, metadata,
};
use bgplens_types::{FilterSet, Record};

use crate::error::{Error, Result};

const BLOCKING_WAIT_BUDGET: Duration = Duration::from_millis(500);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Configuring,
    Started,
    Stopped,
}

impl State {
    fn label(&self) -> &'static str {
        match self {
            State::Configuring => "configuring",
            State::Started => "started",
            State::Stopped => "stopped",
        }
    }
}

/// One retrieval session: owns the active backend, its staged options, and
/// the pull protocol including blocking waits.
pub struct Session {
    state: State,
    backend_id: BackendId,
    options: Vec<(OptionHandle, String)>,
    blocking: bool,
    backend: Option<Box<dyn DataBackend>>,
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl Session {
    pub fn new() -> Self {
        Self {
            state: State::Configuring,
            backend_id: default_backend(),
            options: Vec::new(),
            blocking: false,
            backend: None,
        }
    }

    pub fn backend_id(&self) -> BackendId {
        self.backend_id
    }

    /// Staged option values, in application order.
    pub fn staged_options(&self) -> &[(OptionHandle, String)] {
        &self.options
    }

    /// Select the active data interface. Options staged for a previously
    /// selected interface are discarded, since their handles no longer
    /// apply.
    pub fn select_backend(&mut self, id: BackendId) -> Result<()> {
        self.check_configuring("select a data interface")?;
        if id != self.backend_id {
            self.options.clear();
        }
        self.backend_id = id;
        Ok(())
    }

    /// Stage a value for a backend option. The handle must have been
    /// resolved against the currently active interface.
    pub fn set_option(&mut self, handle: OptionHandle, value: impl Into<String>) -> Result<()> {
        self.check_configuring("set a data interface option")?;
        if handle.backend() != self.backend_id {
            return Err(Error::OptionMismatch {
                expected: metadata(handle.backend()).name,
                got: metadata(self.backend_id).name,
            });
        }
        self.options.push((handle, value.into()));
        Ok(())
    }

    /// In blocking mode, exhaustion suspends inside `next_record` until
    /// new data arrives or the token is cancelled, instead of ending the
    /// stream.
    pub fn set_blocking(&mut self, blocking: bool) -> Result<()> {
        self.check_configuring("change the blocking mode")?;
        self.blocking = blocking;
        Ok(())
    }

    /// Bring up the selected backend and transition to Started.
    pub fn start(&mut self, filters: FilterSet) -> Result<()> {
        let id = self.backend_id;
        let options = self.options.clone();
        self.start_with(filters, move |f| backends::create_backend(id, &options, f))
    }

    /// Like `start`, but with an explicit backend factory. This is the
    /// seam unit tests use to drive the session against scripted backends.
    pub fn start_with<F>(&mut self, filters: FilterSet, make: F) -> Result<()>
    where
        F: FnOnce(&FilterSet) -> backends::Result<Box<dyn DataBackend>>,
    {
        self.check_configuring("start")?;
        if filters.windows().is_empty() {
            return Err(Error::NoWindow);
        }
        self.backend = Some(make(&filters)?);
        self.state = State::Started;
        Ok(())
    }

    /// Pull the next record. `Ok(None)` means the stream is over: the
    /// backend is exhausted (non-blocking) or the token was cancelled.
    pub fn next_record(&mut self, token: &CancelToken) -> Result<Option<Record>> {
        if self.state != State::Started {
            return Err(Error::InvalidState {
                operation: "pull a record",
                state: self.state.label(),
            });
        }
        let backend = self
            .backend
            .as_mut()
            .expect("a started session holds a backend");

        loop {
            if token.is_cancelled() {
                return Ok(None);
            }
            if let Some(record) = backend.next_record().map_err(Error::Backend)? {
                return Ok(Some(record));
            }
            if !self.blocking {
                return Ok(None);
            }
            backend
                .await_new_data(token, BLOCKING_WAIT_BUDGET)
                .map_err(Error::Backend)?;
        }
    }

    /// Release backend resources. Safe to call from any state and
    /// idempotent once stopped.
    pub fn stop(&mut self) {
        self.backend = None;
        self.state = State::Stopped;
    }

    pub fn is_stopped(&self) -> bool {
        self.state == State::Stopped
    }

    fn check_configuring(&self, operation: &'static str) -> Result<()> {
        if self.state != State::Configuring {
            return Err(Error::InvalidState {
                operation,
                state: self.state.label(),
            });
        }
        Ok(())
    }
}
