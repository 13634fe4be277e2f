//! # studytrack-core
//!
//! Core library for studytrack - a study-time tracking dashboard.
//!
//! This library provides:
//! - Domain types for study sessions and subjects
//! - A `DD-MM-YYYY` date value type with calendar arithmetic
//! - The aggregation engine: bucketed series, window navigation and derived
//!   metrics
//! - The data-source boundary (JSON snapshot files)
//! - Configuration management
//! - Logging infrastructure
//!
//! ## Architecture
//!
//! Data flows in one direction:
//! - **Source:** a [`SessionSource`] yields sessions and subjects
//! - **Snapshot:** an immutable in-memory copy handed to the analytics
//! - **Derived:** series, listings and metrics, recomputed on every call
//!
//! ## Example
//!
//! ```rust,no_run
//! use studytrack_core::analytics::{compute_series, Granularity, Window, ZoomLevel};
//! use studytrack_core::{Config, DateKey, SnapshotFile};
//!
//! let config = Config::load().expect("failed to load config");
//! let snapshot = SnapshotFile::new(config.snapshot_path())
//!     .load()
//!     .expect("failed to load snapshot");
//!
//! let today = DateKey::today();
//! let window = Window::new(ZoomLevel::Month, today);
//! let series = compute_series(&snapshot.sessions, Granularity::Day, &window, today);
//! ```

// Re-export commonly used items at the crate root
pub use config::Config;
pub use date_key::{DateKey, DateRange};
pub use entry::{validate_subject_name, SessionDraft};
pub use error::{Error, Result};
pub use source::{SessionSource, Snapshot, SnapshotFile};
pub use types::*;

// Public modules
pub mod analytics;
pub mod config;
pub mod date_key;
pub mod entry;
pub mod error;
pub mod format;
pub mod logging;
pub mod source;
pub mod types;
