//! Core types for the BIG log parser library
//!
//! This module defines the records the parser emits for each relevant log line
//! and the error types shared by the parser, the error decoder and the scanner.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Result type for parser operations
pub type Result<T> = std::result::Result<T, ParserError>;

/// Terminal state reported by a BIG message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DeviceState {
    /// Code `02`
    Ok,
    /// Code `DD`
    Failed,
}

impl DeviceState {
    /// Map a raw two-character state code to a state.
    ///
    /// Returns `None` for anything other than `02` or `DD`.
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "02" => Some(DeviceState::Ok),
            "DD" => Some(DeviceState::Failed),
            _ => None,
        }
    }

    /// Raw code as it appears in the log line
    pub fn code(&self) -> &'static str {
        match self {
            DeviceState::Ok => "02",
            DeviceState::Failed => "DD",
        }
    }
}

impl fmt::Display for DeviceState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeviceState::Ok => write!(f, "OK"),
            DeviceState::Failed => write!(f, "FAILED"),
        }
    }
}

/// A single parsed BIG message
///
/// Payload fields are kept as the raw digit strings from the log line because
/// the error decoder works on their exact textual width.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogRecord {
    /// Six-character alphanumeric device identifier (case-sensitive)
    pub device_id: String,
    /// Signed 4-digit field; the last digit is a control sum
    pub status_payload_1: String,
    /// Signed 3-digit field
    pub status_payload_2: String,
    /// Terminal state of the message
    pub state: DeviceState,
}

/// Why a line carrying the BIG marker was rejected
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormatIssue {
    /// The line does not contain a `BIG;` record at all
    MissingMarker,
    /// The marker is not preceded by the opening `'`
    MissingOpeningQuote,
    /// The record ended before this field
    MissingField(&'static str),
    /// The field is present but does not have the expected shape
    MalformedField { field: &'static str, value: String },
    /// The state code is neither `02` nor `DD`
    UnknownState(String),
    /// The trailing `;` or the closing quote is missing
    MissingTerminator,
}

impl fmt::Display for FormatIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FormatIssue::MissingMarker => write!(f, "no BIG record found"),
            FormatIssue::MissingOpeningQuote => write!(f, "record is not quoted"),
            FormatIssue::MissingField(field) => write!(f, "missing field '{}'", field),
            FormatIssue::MalformedField { field, value } => {
                write!(f, "malformed field '{}': {:?}", field, value)
            }
            FormatIssue::UnknownState(code) => write!(f, "unknown state code {:?}", code),
            FormatIssue::MissingTerminator => write!(f, "record is not terminated"),
        }
    }
}

/// Errors that can occur while parsing, decoding or scanning
#[derive(Debug, thiserror::Error)]
pub enum ParserError {
    #[error("Invalid BIG message ({reason}): {line}")]
    InvalidFormat { line: String, reason: FormatIssue },

    #[error("Invalid status payload: {0:?}")]
    InvalidPayload(String),

    #[error("Status payload digits have odd length {}: {digits:?}", .digits.len())]
    OddDigitCount { digits: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl ParserError {
    /// Offending line for format errors
    pub fn line(&self) -> Option<&str> {
        match self {
            ParserError::InvalidFormat { line, .. } => Some(line),
            _ => None,
        }
    }

    /// True for errors that must abort a scan
    pub fn is_fatal(&self) -> bool {
        matches!(self, ParserError::Io(_))
    }
}
