//! BIG message parser
//!
//! Extracts a [`LogRecord`] from one raw log line. A BIG record is a
//! semicolon-delimited run of fields wrapped in single quotes:
//!
//! ```text
//! 'BIG;<u>;<id6>;<u>;<u>;<u>;<p1>;<s>;<s>;<s>;<s>;<s>;<s>;<p2>;<s>;<s>;<s>;<02|DD>;'
//! ```
//!
//! where `<u>` is an unsigned integer, `<s>` a signed integer, `<id6>` six ASCII
//! alphanumerics, `<p1>` a signed 4-digit payload and `<p2>` a signed 3-digit
//! payload. Every placeholder must be present and well formed; the field widths
//! are a fixed contract because the error decoder depends on them.

use crate::types::{DeviceState, FormatIssue, LogRecord, ParserError, Result};

/// Literal token that marks a relevant line
pub const MARKER: &str = "BIG";

/// Shape of a single positional field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FieldKind {
    Unsigned,
    Signed,
    DeviceId,
    /// Optional `-` followed by exactly N digits
    Payload(usize),
}

/// One entry of the record layout
#[derive(Debug, Clone, Copy)]
struct FieldSpec {
    name: &'static str,
    kind: FieldKind,
}

const fn field(name: &'static str, kind: FieldKind) -> FieldSpec {
    FieldSpec { name, kind }
}

/// Positional layout between the marker and the state code
const RECORD_LAYOUT: [FieldSpec; 16] = [
    field("sequence", FieldKind::Unsigned),
    field("device_id", FieldKind::DeviceId),
    field("field_4", FieldKind::Unsigned),
    field("field_5", FieldKind::Unsigned),
    field("field_6", FieldKind::Unsigned),
    field("status_payload_1", FieldKind::Payload(4)),
    field("field_8", FieldKind::Signed),
    field("field_9", FieldKind::Signed),
    field("field_10", FieldKind::Signed),
    field("field_11", FieldKind::Signed),
    field("field_12", FieldKind::Signed),
    field("field_13", FieldKind::Signed),
    field("status_payload_2", FieldKind::Payload(3)),
    field("field_15", FieldKind::Signed),
    field("field_16", FieldKind::Signed),
    field("field_17", FieldKind::Signed),
];

const DEVICE_ID_LEN: usize = 6;
const STATE_CODE_LEN: usize = 2;

/// Cheap pre-filter: only lines containing the marker are worth parsing
pub fn is_big_message(line: &str) -> bool {
    line.contains(MARKER)
}

/// Parse a BIG message out of a raw log line
///
/// Text before and after the record is ignored. Every occurrence of the marker
/// is tried in order and the first complete match wins; if none matches, the
/// error carries the reason found at the first occurrence.
///
/// # Example
/// ```
/// use big_log_parser::{parse_message, DeviceState};
///
/// let record = parse_message("'BIG;1;ABC123;1;1;1;0012;1;1;1;1;1;1;001;1;1;1;02;'").unwrap();
/// assert_eq!(record.device_id, "ABC123");
/// assert_eq!(record.state, DeviceState::Ok);
/// ```
pub fn parse_message(line: &str) -> Result<LogRecord> {
    let mut first_issue = None;

    for (start, _) in line.match_indices(MARKER) {
        match parse_record_at(line, start) {
            Ok(record) => return Ok(record),
            Err(issue) => {
                log::trace!("No BIG record at offset {}: {}", start, issue);
                if first_issue.is_none() {
                    first_issue = Some(issue);
                }
            }
        }
    }

    Err(ParserError::InvalidFormat {
        line: line.to_string(),
        reason: first_issue.unwrap_or(FormatIssue::MissingMarker),
    })
}

/// Try to match a full record whose marker starts at byte offset `start`
fn parse_record_at(line: &str, start: usize) -> std::result::Result<LogRecord, FormatIssue> {
    let mut cursor = FieldCursor::new(&line[start + MARKER.len()..]);

    if !cursor.eat(';') {
        return Err(FormatIssue::MissingMarker);
    }
    if !line[..start].ends_with('\'') {
        return Err(FormatIssue::MissingOpeningQuote);
    }

    let mut device_id = "";
    let mut status_payload_1 = "";
    let mut status_payload_2 = "";

    for spec in RECORD_LAYOUT.iter() {
        let value = cursor.take(spec.name)?;
        if !matches_kind(value, spec.kind) {
            return Err(FormatIssue::MalformedField {
                field: spec.name,
                value: value.to_string(),
            });
        }

        match spec.name {
            "device_id" => device_id = value,
            "status_payload_1" => status_payload_1 = value,
            "status_payload_2" => status_payload_2 = value,
            _ => {}
        }
    }

    let state = cursor.take_state()?;

    // Trailing `;` followed by the closing quote
    if !cursor.eat(';') || !cursor.eat('\'') {
        return Err(FormatIssue::MissingTerminator);
    }

    Ok(LogRecord {
        device_id: device_id.to_string(),
        status_payload_1: status_payload_1.to_string(),
        status_payload_2: status_payload_2.to_string(),
        state,
    })
}

fn matches_kind(value: &str, kind: FieldKind) -> bool {
    match kind {
        FieldKind::Unsigned => is_digits(value),
        FieldKind::Signed => is_digits(strip_sign(value)),
        FieldKind::DeviceId => {
            value.len() == DEVICE_ID_LEN && value.bytes().all(|b| b.is_ascii_alphanumeric())
        }
        FieldKind::Payload(width) => {
            let digits = strip_sign(value);
            digits.len() == width && is_digits(digits)
        }
    }
}

fn strip_sign(value: &str) -> &str {
    value.strip_prefix('-').unwrap_or(value)
}

fn is_digits(value: &str) -> bool {
    !value.is_empty() && value.bytes().all(|b| b.is_ascii_digit())
}

/// Forward-only reader over the text following the marker
struct FieldCursor<'a> {
    rest: &'a str,
}

impl<'a> FieldCursor<'a> {
    fn new(rest: &'a str) -> Self {
        Self { rest }
    }

    /// Consume `expected` if it is the next character
    fn eat(&mut self, expected: char) -> bool {
        match self.rest.strip_prefix(expected) {
            Some(rest) => {
                self.rest = rest;
                true
            }
            None => false,
        }
    }

    /// Take the next `;`-terminated field, consuming the separator
    fn take(&mut self, name: &'static str) -> std::result::Result<&'a str, FormatIssue> {
        let end = self.rest.find(';').ok_or(FormatIssue::MissingField(name))?;
        let value = &self.rest[..end];
        self.rest = &self.rest[end + 1..];
        Ok(value)
    }

    /// Take the fixed-width state code; the terminator is left in place
    fn take_state(&mut self) -> std::result::Result<DeviceState, FormatIssue> {
        if self.rest.is_empty() {
            return Err(FormatIssue::MissingField("state"));
        }

        let code = self.rest.get(..STATE_CODE_LEN).unwrap_or(self.rest);
        match DeviceState::from_code(code) {
            Some(state) => {
                self.rest = &self.rest[STATE_CODE_LEN..];
                Ok(state)
            }
            None => {
                let end = self.rest.find([';', '\'']).unwrap_or(self.rest.len());
                Err(FormatIssue::UnknownState(self.rest[..end].to_string()))
            }
        }
    }
}
