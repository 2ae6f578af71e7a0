//! Report aggregation
//!
//! Accumulates per-device and aggregate statistics from parsed BIG messages.
//! A device starts out unknown, becomes healthy on its first OK message and is
//! tracked as failed from its first FAILED message on. A failed device never
//! contributes to the OK tallies again.

use crate::bitfield::decode_errors;
use crate::types::{DeviceState, LogRecord, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Aggregate result of one pass over a log
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Report {
    /// Lines carrying the BIG marker, whether or not they parsed
    pub total_seen: usize,
    /// Messages with state OK
    pub total_ok: usize,
    /// Messages with state FAILED
    pub total_failed: usize,
    /// OK count per device that has never failed
    pub ok_counts_by_device: BTreeMap<String, usize>,
    /// Error description occurrence counts per device that has failed
    pub error_catalog_by_device: BTreeMap<String, BTreeMap<String, usize>>,
}

impl Report {
    /// Create an empty report
    pub fn new() -> Self {
        Self::default()
    }

    /// Count a line that carries the BIG marker
    ///
    /// Must be called once per relevant line, before the line is parsed.
    pub fn record_seen(&mut self) {
        self.total_seen += 1;
    }

    /// Apply one parsed message to the report
    ///
    /// On error (the failed message's payloads could not be decoded) the report
    /// is left untouched.
    pub fn process(&mut self, record: &LogRecord) -> Result<()> {
        match record.state {
            DeviceState::Ok => {
                self.total_ok += 1;
                if !self.is_failed(&record.device_id) {
                    *self
                        .ok_counts_by_device
                        .entry(record.device_id.clone())
                        .or_insert(0) += 1;
                }
            }
            DeviceState::Failed => {
                let errors = decode_errors(&record.status_payload_1, &record.status_payload_2)?;

                self.total_failed += 1;
                if let Some(previous) = self.ok_counts_by_device.remove(&record.device_id) {
                    log::debug!(
                        "Device {} failed after {} OK messages",
                        record.device_id,
                        previous
                    );
                }

                let device_errors = self
                    .error_catalog_by_device
                    .entry(record.device_id.clone())
                    .or_default();
                for error in errors {
                    *device_errors.entry(error.to_string()).or_insert(0) += 1;
                }
            }
        }

        Ok(())
    }

    /// Hand off the accumulated state
    pub fn finalize(self) -> Report {
        self
    }

    /// Relevant lines that did not make it into the OK/FAILED totals
    pub fn total_malformed(&self) -> usize {
        self.total_seen
            .saturating_sub(self.total_ok + self.total_failed)
    }

    /// Number of distinct devices seen in well-formed messages
    pub fn device_count(&self) -> usize {
        self.ok_counts_by_device.len() + self.error_catalog_by_device.len()
    }

    /// True once the device has reported a failure
    pub fn is_failed(&self, device_id: &str) -> bool {
        self.error_catalog_by_device.contains_key(device_id)
    }

    /// OK count of a healthy device
    pub fn ok_count(&self, device_id: &str) -> Option<usize> {
        self.ok_counts_by_device.get(device_id).copied()
    }

    /// How often `description` was reported for a failed device
    pub fn error_count(&self, device_id: &str, description: &str) -> usize {
        self.error_catalog_by_device
            .get(device_id)
            .and_then(|errors| errors.get(description))
            .copied()
            .unwrap_or(0)
    }

    /// Healthy devices, most OK messages first, ties broken by device id
    pub fn healthy_devices(&self) -> Vec<(&str, usize)> {
        let mut devices: Vec<(&str, usize)> = self
            .ok_counts_by_device
            .iter()
            .map(|(id, count)| (id.as_str(), *count))
            .collect();
        devices.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
        devices
    }

    /// Failed devices in device id order
    pub fn failed_devices(&self) -> impl Iterator<Item = (&str, &BTreeMap<String, usize>)> {
        self.error_catalog_by_device
            .iter()
            .map(|(id, errors)| (id.as_str(), errors))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(device_id: &str, p1: &str, p2: &str, state: DeviceState) -> LogRecord {
        LogRecord {
            device_id: device_id.to_string(),
            status_payload_1: p1.to_string(),
            status_payload_2: p2.to_string(),
            state,
        }
    }

    fn feed(report: &mut Report, record: &LogRecord) {
        report.record_seen();
        report.process(record).unwrap();
    }

    #[test]
    fn test_ok_messages_count_per_device() {
        let mut report = Report::new();
        feed(&mut report, &record("ABC123", "0012", "001", DeviceState::Ok));
        feed(&mut report, &record("ABC123", "0012", "001", DeviceState::Ok));
        feed(&mut report, &record("XYZ789", "0012", "001", DeviceState::Ok));

        assert_eq!(report.total_seen, 3);
        assert_eq!(report.total_ok, 3);
        assert_eq!(report.total_failed, 0);
        assert_eq!(report.ok_count("ABC123"), Some(2));
        assert_eq!(report.ok_count("XYZ789"), Some(1));
        assert!(report.error_catalog_by_device.is_empty());
    }

    #[test]
    fn test_failure_discards_ok_tally() {
        let mut report = Report::new();
        feed(&mut report, &record("ABC123", "0012", "001", DeviceState::Ok));
        feed(&mut report, &record("ABC123", "0009", "800", DeviceState::Failed));

        assert_eq!(report.ok_count("ABC123"), None);
        assert!(report.is_failed("ABC123"));
        assert_eq!(report.error_count("ABC123", "Temperature device error"), 1);
        assert_eq!(report.total_ok, 1);
        assert_eq!(report.total_failed, 1);
    }

    #[test]
    fn test_failed_device_never_heals() {
        let mut report = Report::new();
        feed(&mut report, &record("ABC123", "0009", "800", DeviceState::Failed));
        feed(&mut report, &record("ABC123", "0012", "001", DeviceState::Ok));
        feed(&mut report, &record("ABC123", "0012", "001", DeviceState::Ok));

        assert_eq!(report.total_ok, 2);
        assert_eq!(report.ok_count("ABC123"), None);
        assert!(report.is_failed("ABC123"));
        assert_eq!(report.device_count(), 1);
    }

    #[test]
    fn test_error_occurrences_accumulate() {
        let mut report = Report::new();
        feed(&mut report, &record("ABC123", "0009", "800", DeviceState::Failed));
        feed(&mut report, &record("ABC123", "1247", "408", DeviceState::Failed));
        feed(&mut report, &record("ABC123", "0001", "000", DeviceState::Failed));

        assert_eq!(report.total_failed, 3);
        assert_eq!(report.error_count("ABC123", "Temperature device error"), 2);
        assert_eq!(report.error_count("ABC123", "Battery device error"), 1);
        assert_eq!(report.error_count("ABC123", "Threshold central error"), 1);
        assert_eq!(report.error_count("ABC123", "Unknown device error"), 1);
        assert_eq!(report.error_count("NOPE00", "Unknown device error"), 0);
    }

    #[test]
    fn test_undecodable_failure_leaves_report_untouched() {
        let mut report = Report::new();
        feed(&mut report, &record("ABC123", "0012", "001", DeviceState::Ok));
        report.record_seen();
        let before = report.clone();

        let result = report.process(&record("ABC123", "001", "000", DeviceState::Failed));
        assert!(result.is_err());
        assert_eq!(report, before);
        assert_eq!(report.total_malformed(), 1);
    }

    #[test]
    fn test_devices_are_case_sensitive() {
        let mut report = Report::new();
        feed(&mut report, &record("abc123", "0012", "001", DeviceState::Ok));
        feed(&mut report, &record("ABC123", "0009", "800", DeviceState::Failed));

        assert_eq!(report.ok_count("abc123"), Some(1));
        assert!(report.is_failed("ABC123"));
        assert!(!report.is_failed("abc123"));
    }

    #[test]
    fn test_device_listings() {
        let mut report = Report::new();
        for id in ["BBB222", "AAA111", "BBB222", "CCC333", "CCC333"] {
            feed(&mut report, &record(id, "0012", "001", DeviceState::Ok));
        }
        feed(&mut report, &record("DDD444", "0805", "000", DeviceState::Failed));

        assert_eq!(
            report.healthy_devices(),
            vec![("BBB222", 2), ("CCC333", 2), ("AAA111", 1)]
        );

        let failed: Vec<&str> = report.failed_devices().map(|(id, _)| id).collect();
        assert_eq!(failed, vec!["DDD444"]);
    }

    #[test]
    fn test_finalize_returns_accumulated_state() {
        let mut report = Report::new();
        feed(&mut report, &record("ABC123", "0012", "001", DeviceState::Ok));
        let expected = report.clone();
        assert_eq!(report.finalize(), expected);
    }
}
