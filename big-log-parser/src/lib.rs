//! BIG Log Parser Library
//!
//! A small, reusable library for turning device-telemetry logs into a device
//! status report.
//!
//! # Architecture
//!
//! Data flows one way:
//! - raw line → [`parse_message`] → [`LogRecord`] or [`ParserError::InvalidFormat`]
//! - [`LogRecord`] → [`Report::process`] → running per-device statistics
//! - failed records are decoded with [`decode_errors`] against the static
//!   [`ErrorCatalog`]
//!
//! [`LogScanner`] ties the pieces together over a file or any buffered reader.
//!
//! The library does NOT:
//! - Render or print reports
//! - Resolve default log paths or load configuration files
//! - Display progress
//!
//! All of that lives in the application layer (big-log-cli).
//!
//! # Example Usage
//!
//! ```no_run
//! use big_log_parser::{LogScanner, ScanConfig};
//! use std::path::Path;
//!
//! let scanner = LogScanner::new(ScanConfig::new());
//! let report = scanner.scan_file(Path::new("app_2.log")).unwrap();
//!
//! for (device, count) in report.healthy_devices() {
//!     println!("{}: {} OK", device, count);
//! }
//! for (device, errors) in report.failed_devices() {
//!     println!("{}: {:?}", device, errors);
//! }
//! ```

// Public modules
pub mod bitfield;
pub mod catalog;
pub mod config;
pub mod parser;
pub mod report;
pub mod scanner;
pub mod types;

// Re-export main types for convenience
pub use bitfield::{decode_errors, subsystem_flag};
pub use catalog::ErrorCatalog;
pub use config::ScanConfig;
pub use parser::{is_big_message, parse_message, MARKER};
pub use report::Report;
pub use scanner::{LogScanner, RecordIterator, ScanEvent};
pub use types::{DeviceState, FormatIssue, LogRecord, ParserError, Result};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
