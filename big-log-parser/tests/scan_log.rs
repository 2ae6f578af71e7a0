// End-to-end scans of on-disk logs
use big_log_parser::{LogScanner, ParserError, Report, ScanConfig};
use std::io::Write;
use tempfile::NamedTempFile;

fn write_log(lines: &[&str]) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    for line in lines {
        writeln!(file, "{}", line).unwrap();
    }
    file.flush().unwrap();
    file
}

fn scan(lines: &[&str]) -> Report {
    let file = write_log(lines);
    LogScanner::default().scan_file(file.path()).unwrap()
}

#[test]
fn healthy_device_scenario() {
    let report = scan(&["'BIG;1;ABC123;1;1;1;0012;1;1;1;1;1;1;001;1;1;1;02;'"]);

    assert_eq!(report.total_seen, 1);
    assert_eq!(report.total_ok, 1);
    assert_eq!(report.total_failed, 0);
    assert_eq!(report.ok_count("ABC123"), Some(1));
    assert!(!report.error_catalog_by_device.contains_key("ABC123"));
}

#[test]
fn device_fails_after_ok_scenario() {
    let report = scan(&[
        "'BIG;1;ABC123;1;1;1;0012;1;1;1;1;1;1;001;1;1;1;02;'",
        "'BIG;2;ABC123;1;1;1;0009;1;1;1;1;1;1;800;1;1;1;DD;'",
    ]);

    assert_eq!(report.total_seen, 2);
    assert_eq!(report.total_failed, 1);
    assert!(!report.ok_counts_by_device.contains_key("ABC123"));
    assert_eq!(report.error_catalog_by_device["ABC123"]["Temperature device error"], 1);
    assert_eq!(report.error_catalog_by_device["ABC123"].len(), 1);
}

#[test]
fn malformed_line_does_not_stop_scan() {
    let report = scan(&[
        "'BIG;1;ABC123;1;1;1;0012;1;1;1;1;1;1;001;1;1;1;02'",
        "'BIG;2;XYZ789;1;1;1;0012;1;1;1;1;1;1;001;1;1;1;02;'",
    ]);

    assert_eq!(report.total_seen, 2);
    assert_eq!(report.total_ok, 1);
    assert_eq!(report.total_malformed(), 1);
    assert_eq!(report.ok_count("ABC123"), None);
    assert_eq!(report.ok_count("XYZ789"), Some(1));
}

#[test]
fn irrelevant_lines_are_not_counted() {
    let report = scan(&[
        "2023-11-02 10:00:00 INFO service started",
        "2023-11-02 10:00:01 DEBUG 'SMALL;1;ABC123;02;'",
        "",
    ]);

    assert_eq!(report, Report::new());
}

#[test]
fn mixed_log_totals() {
    let report = scan(&[
        "10:00:00 handler 'BIG;1;AAA111;1;1;1;0012;1;1;1;1;1;1;001;1;1;1;02;'",
        "10:00:01 handler 'BIG;2;BBB222;1;1;1;0012;1;1;1;1;1;1;001;1;1;1;02;'",
        "10:00:02 heartbeat ok",
        "10:00:03 handler 'BIG;3;AAA111;1;1;1;0012;1;1;1;1;1;1;001;1;1;1;02;'",
        "10:00:04 handler 'BIG;4;CCC333;1;1;1;1247;1;1;1;1;1;1;408;1;1;1;DD;'",
        "10:00:05 handler 'BIG;5;CCC333;1;1;1;0001;1;1;1;1;1;1;000;1;1;1;DD;'",
        "10:00:06 handler 'BIG;6;CCC333;1;1;1;0012;1;1;1;1;1;1;001;1;1;1;02;'",
        "10:00:07 handler 'BIG;7;DDD444;1;1;1;0012;1;1;1;1;1;1;001;1;1;1;XX;'",
    ]);

    assert_eq!(report.total_seen, 7);
    assert_eq!(report.total_ok, 4);
    assert_eq!(report.total_failed, 2);
    assert_eq!(report.total_malformed(), 1);

    assert_eq!(report.healthy_devices(), vec![("AAA111", 2), ("BBB222", 1)]);
    assert_eq!(report.error_count("CCC333", "Battery device error"), 1);
    assert_eq!(report.error_count("CCC333", "Temperature device error"), 1);
    assert_eq!(report.error_count("CCC333", "Threshold central error"), 1);
    assert_eq!(report.error_count("CCC333", "Unknown device error"), 1);
    assert_eq!(report.device_count(), 3);
}

#[test]
fn line_ceiling_bounds_the_scan() {
    let lines = vec!["'BIG;1;ABC123;1;1;1;0012;1;1;1;1;1;1;001;1;1;1;02;'"; 10];
    let file = write_log(&lines);

    let scanner = LogScanner::new(ScanConfig::new().with_max_lines(4));
    let report = scanner.scan_file(file.path()).unwrap();

    assert_eq!(report.total_seen, 4);
    assert_eq!(report.ok_count("ABC123"), Some(4));
}

#[test]
fn missing_file_is_an_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = LogScanner::default()
        .scan_file(&dir.path().join("absent.log"))
        .unwrap_err();

    assert!(matches!(err, ParserError::Io(_)));
    assert!(err.is_fatal());
}

#[test]
fn report_serializes_to_json() {
    let report = scan(&[
        "'BIG;1;ABC123;1;1;1;0012;1;1;1;1;1;1;001;1;1;1;02;'",
        "'BIG;2;XYZ789;1;1;1;0009;1;1;1;1;1;1;800;1;1;1;DD;'",
    ]);

    let json = serde_json::to_value(&report).unwrap();
    assert_eq!(json["total_seen"], 2);
    assert_eq!(json["ok_counts_by_device"]["ABC123"], 1);
    assert_eq!(json["error_catalog_by_device"]["XYZ789"]["Temperature device error"], 1);

    let back: Report = serde_json::from_value(json).unwrap();
    assert_eq!(back, report);
}
