//! Store configuration.

use std::time::Duration;

/// SQLite journal mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JournalMode {
    /// Write-ahead log.
    #[default]
    Wal,
    /// Rollback journal, deleted after each transaction.
    Delete,
    /// Journal kept in memory.
    Memory,
}

impl JournalMode {
    /// Pragma value.
    pub const fn as_str(&self) -> &'static str {
        match self {
            JournalMode::Wal => "WAL",
            JournalMode::Delete => "DELETE",
            JournalMode::Memory => "MEMORY",
        }
    }
}

/// Configuration for opening a store.
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Whether to create the database file if it doesn't exist.
    pub create_if_missing: bool,

    /// Open the database read-only. Writes fail with `CoreError::ReadOnly`.
    pub read_only: bool,

    /// Journal mode for file databases. In-memory stores ignore it.
    pub journal_mode: JournalMode,

    /// Whether to fully sync on every commit (safer but slower).
    pub sync_on_commit: bool,

    /// How long to wait on a locked database file before failing.
    pub busy_timeout: Duration,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            create_if_missing: true,
            read_only: false,
            journal_mode: JournalMode::Wal,
            sync_on_commit: true,
            busy_timeout: Duration::from_secs(5),
        }
    }
}

impl StoreConfig {
    /// Creates a new configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets whether to create the database if missing.
    #[must_use]
    pub const fn create_if_missing(mut self, value: bool) -> Self {
        self.create_if_missing = value;
        self
    }

    /// Sets read-only mode.
    #[must_use]
    pub const fn read_only(mut self, value: bool) -> Self {
        self.read_only = value;
        self
    }

    /// Sets the journal mode.
    #[must_use]
    pub const fn journal_mode(mut self, mode: JournalMode) -> Self {
        self.journal_mode = mode;
        self
    }

    /// Sets whether to sync on every commit.
    #[must_use]
    pub const fn sync_on_commit(mut self, value: bool) -> Self {
        self.sync_on_commit = value;
        self
    }

    /// Sets the busy timeout.
    #[must_use]
    pub const fn busy_timeout(mut self, timeout: Duration) -> Self {
        self.busy_timeout = timeout;
        self
    }

    /// `PRAGMA synchronous` value implied by `sync_on_commit`.
    pub(crate) const fn synchronous(&self) -> &'static str {
        if self.sync_on_commit {
            "FULL"
        } else {
            "NORMAL"
        }
    }
}
