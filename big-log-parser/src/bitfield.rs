//! Bitfield error decoding
//!
//! A failed BIG message encodes which subsystems reported an error in its two
//! status payloads. The payload digits (minus the control-sum digit) are split
//! into 2-digit decimal groups; group `i` describes subsystem `i`, and the
//! subsystem is flagged when bit 4 (counting from the MSB, 0-indexed) of the
//! group's 8-bit value is set.

use crate::catalog::ErrorCatalog;
use crate::types::{ParserError, Result};

/// Bit 4 from the left of an 8-bit value (`0b0000_1000`)
const SUBSYSTEM_FLAG_MASK: u8 = 1 << 3;

/// Number of decimal digits per subsystem group
const GROUP_WIDTH: usize = 2;

/// True if the subsystem flag bit is set in `byte`
pub fn subsystem_flag(byte: u8) -> bool {
    byte & SUBSYSTEM_FLAG_MASK != 0
}

/// Decode the error descriptions carried by a failed message
///
/// Returns the descriptions of every flagged subsystem in ascending code order,
/// or the catalog's fallback description when no flag is set. The result is
/// never empty.
///
/// # Errors
/// * [`ParserError::InvalidPayload`] if a payload contains anything other than
///   digits (a leading `-` sign is allowed and ignored)
/// * [`ParserError::OddDigitCount`] if the combined digit string cannot be split
///   into 2-digit groups
///
/// # Example
/// ```
/// use big_log_parser::decode_errors;
///
/// // "000" + "800" -> groups 00, 08, 00 -> subsystem 1
/// let errors = decode_errors("0009", "800").unwrap();
/// assert_eq!(errors, vec!["Temperature device error"]);
/// ```
pub fn decode_errors(status_payload_1: &str, status_payload_2: &str) -> Result<Vec<&'static str>> {
    let catalog = ErrorCatalog::standard();
    let digits = payload_digits(status_payload_1, status_payload_2)?;

    let mut errors: Vec<&'static str> = flagged_subsystems(&digits)?
        .into_iter()
        .filter_map(|code| {
            let description = catalog.description(code);
            if description.is_none() {
                log::debug!("Ignoring flag for uncatalogued subsystem {}", code);
            }
            description
        })
        .collect();

    if errors.is_empty() {
        errors.push(catalog.fallback());
    }

    Ok(errors)
}

/// Build the digit string: payload 1 without its control digit, then payload 2
fn payload_digits(status_payload_1: &str, status_payload_2: &str) -> Result<String> {
    let first = unsigned_digits(status_payload_1)?;
    let second = unsigned_digits(status_payload_2)?;

    // Digits are ASCII, so dropping the last byte drops the control digit
    let without_control = &first[..first.len().saturating_sub(1)];

    let mut digits = String::with_capacity(without_control.len() + second.len());
    digits.push_str(without_control);
    digits.push_str(second);
    Ok(digits)
}

fn unsigned_digits(payload: &str) -> Result<&str> {
    let digits = payload.strip_prefix('-').unwrap_or(payload);
    if digits.bytes().all(|b| b.is_ascii_digit()) {
        Ok(digits)
    } else {
        Err(ParserError::InvalidPayload(payload.to_string()))
    }
}

/// Codes of every group whose flag bit is set, in ascending order
fn flagged_subsystems(digits: &str) -> Result<Vec<usize>> {
    if digits.len() % GROUP_WIDTH != 0 {
        return Err(ParserError::OddDigitCount {
            digits: digits.to_string(),
        });
    }

    let flagged = digits
        .as_bytes()
        .chunks(GROUP_WIDTH)
        .map(|group| (group[0] - b'0') * 10 + (group[1] - b'0'))
        .enumerate()
        .filter(|(_, byte)| subsystem_flag(*byte))
        .map(|(code, _)| code)
        .collect();

    Ok(flagged)
}
