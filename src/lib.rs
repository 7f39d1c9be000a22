//! daylog — buffered per-day file log sink for interactive application
//! runtimes.
//!
//! The crate bridges a host's diagnostic-event stream to append-only text
//! files, one file per calendar day, without blocking the event source and
//! without concurrent file access:
//!
//! - [`LogCollector::ingest`] queues events; it never touches the disk.
//! - A background task ([`runner::spawn`]) checks file readiness at ~1 Hz and
//!   drains one record per tick.
//! - [`CollectorHandle::shutdown`] force-flushes everything still queued.
//!
//! ```rust,no_run
//! use daylog::{CollectorConfig, LogCollector, Severity};
//!
//! # async fn run() -> anyhow::Result<()> {
//! let config = CollectorConfig::default();
//! let collector = LogCollector::shared(&config)?;
//! let handle = daylog::runner::spawn(collector.clone(), &config);
//!
//! collector.ingest("scene loaded", "", Severity::Info);
//!
//! // ... later, at application shutdown:
//! handle.shutdown().await;
//! # Ok(())
//! # }
//! ```

pub mod collector;
pub mod config;
pub mod paths;
pub mod record;
pub mod runner;

pub use collector::LogCollector;
pub use config::CollectorConfig;
pub use record::{LogRecord, Severity};
pub use runner::CollectorHandle;
