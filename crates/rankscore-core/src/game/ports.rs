//! Interfaces the core needs from its surroundings, plus in-memory versions
//! for tests and embedding.

use crate::error::PersistenceError;
use crate::game::state::GameState;
use crate::model::record::RoundRecord;
use crate::model::seat::SeatTable;
use core::fmt;
use std::cell::Cell;
use std::io;
use time::OffsetDateTime;

/// Opaque blob storage for the persisted game.
pub trait SnapshotStore {
    fn load(&mut self) -> Result<Option<Vec<u8>>, PersistenceError>;
    fn save(&mut self, blob: &[u8]) -> Result<(), PersistenceError>;
    fn discard(&mut self) -> Result<(), PersistenceError>;
}

pub trait Clock {
    fn now(&self) -> OffsetDateTime;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Info,
    Success,
    Warning,
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Severity::Info => "info",
            Severity::Success => "ok",
            Severity::Warning => "warning",
            Severity::Error => "error",
        };
        f.write_str(label)
    }
}

/// Short user-facing notices.
pub trait Notifier {
    fn show(&mut self, message: &str, severity: Severity);
}

/// Change notifications for a presentation layer. All methods default to
/// doing nothing.
pub trait GameObserver {
    fn round_committed(&mut self, _record: &RoundRecord) {}
    fn totals_changed(&mut self, _totals: &SeatTable<i32>) {}
    fn state_restored(&mut self, _state: &GameState) {}
}

#[derive(Debug, Default)]
pub struct MemoryStore {
    blob: Option<Vec<u8>>,
    fail_writes: bool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_blob(blob: impl Into<Vec<u8>>) -> Self {
        Self {
            blob: Some(blob.into()),
            fail_writes: false,
        }
    }

    /// Makes every later save fail, as an unavailable store would.
    pub fn fail_writes(&mut self, fail: bool) {
        self.fail_writes = fail;
    }

    pub fn blob(&self) -> Option<&[u8]> {
        self.blob.as_deref()
    }
}

impl SnapshotStore for MemoryStore {
    fn load(&mut self) -> Result<Option<Vec<u8>>, PersistenceError> {
        Ok(self.blob.clone())
    }

    fn save(&mut self, blob: &[u8]) -> Result<(), PersistenceError> {
        if self.fail_writes {
            return Err(io::Error::other("store is read-only").into());
        }
        self.blob = Some(blob.to_vec());
        Ok(())
    }

    fn discard(&mut self) -> Result<(), PersistenceError> {
        self.blob = None;
        Ok(())
    }
}

/// A clock that only moves when told to.
#[derive(Debug, Clone)]
pub struct ManualClock {
    now: Cell<OffsetDateTime>,
}

impl ManualClock {
    pub fn new(start: OffsetDateTime) -> Self {
        Self {
            now: Cell::new(start),
        }
    }

    pub fn advance(&self, seconds: i64) {
        self.now.set(self.now.get() + time::Duration::seconds(seconds));
    }
}

impl Clock for ManualClock {
    fn now(&self) -> OffsetDateTime {
        self.now.get()
    }
}

/// Keeps every notice it is shown.
#[derive(Debug, Default, Clone)]
pub struct NoticeLog {
    pub notices: Vec<(Severity, String)>,
}

impl NoticeLog {
    pub fn last(&self) -> Option<&(Severity, String)> {
        self.notices.last()
    }

    pub fn count(&self, severity: Severity) -> usize {
        self.notices.iter().filter(|(s, _)| *s == severity).count()
    }
}

impl Notifier for NoticeLog {
    fn show(&mut self, message: &str, severity: Severity) {
        self.notices.push((severity, message.to_string()));
    }
}
