//! Buffered per-day log collector.
//!
//! The collector bridges the host's diagnostic-event stream to an append-only
//! text file, one file per calendar day. Events are queued by [`ingest`] and
//! drained to disk one record per tick by [`drain_one`]; nothing else touches
//! the file. At shutdown, [`flush_remaining`] force-writes everything still
//! queued.
//!
//! ## Write discipline
//!
//! - The queue mutex is never held across file I/O.
//! - A dedicated drain lock guarantees at most one drain in flight; a tick
//!   that loses the `try_lock` race is a no-op.
//! - The drain peeks the head record, attempts the write, and pops only on
//!   success, so a transient I/O failure retries the same record next tick.
//!
//! [`ingest`]: LogCollector::ingest
//! [`drain_one`]: LogCollector::drain_one
//! [`flush_remaining`]: LogCollector::flush_remaining

use crate::config::CollectorConfig;
use crate::paths;
use crate::record::{LogRecord, Severity};
use anyhow::{Context, Result};
use std::collections::VecDeque;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

/// Buffered log sink writing one file per calendar day.
///
/// Owned by the embedder (typically behind [`Arc`]) and handed to whatever
/// triggers ingestion; there is no ambient global instance.
pub struct LogCollector {
    /// FIFO of records awaiting a drain. Insertion order is emission order.
    pending: Mutex<VecDeque<LogRecord>>,
    /// External suspend flag: collaborators set it to pause draining (e.g.
    /// while an uploader reads the file) without losing queued records.
    /// Only [`set_write_enabled`] touches it.
    ///
    /// [`set_write_enabled`]: LogCollector::set_write_enabled
    suspended: AtomicBool,
    /// Set by the readiness check once the directory and file exist; cleared
    /// while a missing file is being created so a drain cannot race the
    /// creation. Independent of `suspended`: re-confirming readiness must not
    /// undo an external suspend.
    ready: AtomicBool,
    /// Held for the duration of a drain. `try_lock` makes a contended tick a
    /// no-op instead of a second writer.
    drain_lock: Mutex<()>,
    /// Current day's file name, refreshed by the readiness check on rollover.
    current_file_name: Mutex<String>,
    /// `<base>/LogFile`, fixed at construction.
    dir: PathBuf,
    /// One-time start marker emitted on the first successful readiness check.
    started: AtomicBool,
    /// One-time end marker emitted by the first shutdown flush.
    ended: AtomicBool,
}

impl LogCollector {
    /// Creates a collector for the configured storage location.
    ///
    /// Nothing is created on disk here; the readiness check owns directory
    /// and file creation.
    ///
    /// # Errors
    ///
    /// Returns an error if no base directory can be resolved.
    pub fn new(config: &CollectorConfig) -> Result<Self> {
        let dir = config.resolve_base_dir()?.join(paths::LOG_DIR_NAME);
        Ok(Self {
            pending: Mutex::new(VecDeque::new()),
            suspended: AtomicBool::new(false),
            ready: AtomicBool::new(false),
            drain_lock: Mutex::new(()),
            current_file_name: Mutex::new(paths::file_name_today()),
            dir,
            started: AtomicBool::new(false),
            ended: AtomicBool::new(false),
        })
    }

    /// Creates a collector wrapped in [`Arc`] for shared ownership between the
    /// ingestion site and the runner task.
    pub fn shared(config: &CollectorConfig) -> Result<Arc<Self>> {
        Ok(Arc::new(Self::new(config)?))
    }

    /// Captures one diagnostic event.
    ///
    /// Timestamps the record and appends it to the pending queue. Performs no
    /// file I/O and never blocks beyond the short queue lock, so it is safe to
    /// call from a thread other than the one running the periodic callbacks.
    pub fn ingest(&self, message: &str, detail: &str, severity: Severity) {
        let record = LogRecord::new(message, detail, severity);
        if let Ok(mut pending) = self.pending.lock() {
            pending.push_back(record);
        }
    }

    /// Verifies that the target directory and current day's file exist,
    /// creating them if needed, and detects date rollover.
    ///
    /// Runs at ~1 Hz from the runner task. On rollover the file name is
    /// updated; records already written stay in the previous day's file.
    /// While a missing file is being created the readiness flag is cleared so
    /// an in-flight drain cannot race the creation; it is set again on every
    /// successful pass. An external suspend via [`set_write_enabled`] is a
    /// separate flag and survives readiness checks untouched.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory or file cannot be created. The
    /// readiness flag is left cleared in that case, so draining stays
    /// suspended until a later check succeeds.
    ///
    /// [`set_write_enabled`]: LogCollector::set_write_enabled
    pub fn check_file_readiness(&self) -> Result<()> {
        let today = paths::file_name_today();
        {
            let mut name = lock_unpoisoned(&self.current_file_name);
            if *name != today {
                *name = today;
            }
        }

        if !self.dir.exists() {
            fs::create_dir_all(&self.dir).with_context(|| {
                format!("Failed to create log directory: {}", self.dir.display())
            })?;
        }

        let path = self.file_path();
        if !path.exists() {
            self.ready.store(false, Ordering::SeqCst);
            fs::File::create(&path)
                .with_context(|| format!("Failed to create log file: {}", path.display()))?;
        }

        if !self.started.swap(true, Ordering::SeqCst) {
            tracing::info!(file = %path.display(), "log capture started");
        }
        self.ready.store(true, Ordering::SeqCst);
        Ok(())
    }

    /// Drains at most one record from the queue to the current day's file.
    ///
    /// A no-op returning `Ok(false)` when the gate is disabled, the queue is
    /// empty, or another drain holds the lock. Otherwise writes the head
    /// record and pops it, returning `Ok(true)`.
    ///
    /// # Errors
    ///
    /// Returns an error if the append fails. The record stays at the head of
    /// the queue and is retried on the next tick.
    pub fn drain_one(&self) -> Result<bool> {
        if !self.write_enabled() {
            return Ok(false);
        }
        let Ok(_guard) = self.drain_lock.try_lock() else {
            return Ok(false);
        };

        // Peek without holding the queue lock across the write.
        let head = match lock_unpoisoned(&self.pending).front().cloned() {
            Some(record) => record,
            None => return Ok(false),
        };

        self.append(&head)?;

        // Pop only after the write landed.
        lock_unpoisoned(&self.pending).pop_front();
        Ok(true)
    }

    /// Appends one record unconditionally, ignoring the gate flag and the
    /// drain lock. Shutdown-only: the periodic drain must not be running.
    ///
    /// # Errors
    ///
    /// Returns an error if the append fails.
    pub fn force_write(&self, record: &LogRecord) -> Result<()> {
        self.append(record)
    }

    /// Force-writes every record still queued, in ingestion order.
    ///
    /// Best-effort: a failed write is reported and skipped, later records are
    /// still attempted. Returns the number of records written.
    pub fn flush_remaining(&self) -> usize {
        let snapshot: Vec<LogRecord> = lock_unpoisoned(&self.pending).drain(..).collect();
        let mut written = 0;
        for record in &snapshot {
            match self.force_write(record) {
                Ok(()) => written += 1,
                Err(e) => {
                    tracing::warn!(error = %e, "dropping log record at shutdown");
                }
            }
        }
        if !self.ended.swap(true, Ordering::SeqCst) {
            tracing::info!(written, "log capture ended");
        }
        written
    }

    /// Opens the current day's file in append mode, writes one record, and
    /// releases the handle. `create(true)` recreates a file deleted mid-flight.
    fn append(&self, record: &LogRecord) -> Result<()> {
        let path = self.file_path();
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .with_context(|| format!("Failed to open log file: {}", path.display()))?;
        file.write_all(record.render().as_bytes())
            .with_context(|| format!("Failed to append to log file: {}", path.display()))?;
        Ok(())
    }

    /// Enables or disables draining. Queued records are retained while the
    /// gate is disabled. The suspend persists across readiness checks until
    /// the caller re-enables.
    pub fn set_write_enabled(&self, enabled: bool) {
        self.suspended.store(!enabled, Ordering::SeqCst);
    }

    /// Returns whether draining is currently enabled: the file must be ready
    /// and no external suspend may be in effect.
    pub fn write_enabled(&self) -> bool {
        self.ready.load(Ordering::SeqCst) && !self.suspended.load(Ordering::SeqCst)
    }

    /// Returns the directory holding the day files.
    pub fn file_dir(&self) -> &PathBuf {
        &self.dir
    }

    /// Returns the current day's file name.
    pub fn file_name(&self) -> String {
        lock_unpoisoned(&self.current_file_name).clone()
    }

    /// Returns the full path of the current day's file.
    pub fn file_path(&self) -> PathBuf {
        self.dir.join(self.file_name())
    }

    /// Returns the number of records awaiting a drain.
    pub fn pending_len(&self) -> usize {
        lock_unpoisoned(&self.pending).len()
    }
}

/// Locks a mutex, recovering the inner data if a panicking thread poisoned it.
/// Queue and file-name state stay usable; a poisoned drain lock is handled
/// separately since skipping the tick is the correct response there.
fn lock_unpoisoned<T>(mutex: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    match mutex.lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    }
}

#[cfg(test)]
#[path = "tests/collector_tests.rs"]
mod tests;
