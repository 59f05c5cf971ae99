//! Compilation driver for the Quill front-end.
//!
//! Coordinates the staged processing of a batch of source files through an
//! ordered pipeline (*load from disk*, then *tokenize*), executed either on
//! the caller thread or across a fixed worker pool. Accumulates diagnostics
//! under a configurable error budget and exposes the per-file artifacts
//! (source text, token buffer) through a thread-safe registry of dense
//! `SourceId`s.
//!
//! # Architecture
//!
//! ```text
//! quill_ir, quill_diagnostic, quill_lexer
//!                  ↓
//!            quill_driver  ← this crate
//!                  ↓
//!               quillc
//! ```
//!
//! # Usage
//!
//! ```no_run
//! use quill_driver::{default_diagnostic_callback, Driver, DriverConfig};
//! use quill_diagnostic::ColorMode;
//!
//! let config = DriverConfig::default().with_num_threads(4);
//! let driver = Driver::new(config, default_diagnostic_callback(ColorMode::Auto));
//!
//! driver.start_workers();
//! driver.load_files(["main.ql", "lib.ql"]);
//! driver.wait_for_all_tasks();
//!
//! if !driver.has_hit_fail_condition() {
//!     driver.tokenize_loaded_files();
//!     driver.wait_for_all_tasks();
//! }
//! ```
//!
//! Stages are serialized by the caller: exactly one task group runs at a
//! time, and `wait_for_all_tasks` (or the inline single-threaded drain)
//! leaves the driver quiescent between stages.

mod callback;
mod config;
mod context;
mod driver;
mod source;
mod task;
mod worker;

pub use callback::default_diagnostic_callback;
pub use config::{suggested_num_threads, DriverConfig, Verbosity};
pub use context::{Context, DiagnosticCallback};
pub use driver::Driver;
pub use source::{Source, SourceManager};
pub use task::Task;
