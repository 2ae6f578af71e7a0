//! Streaming log scanner
//!
//! Reads a log one line at a time, hands every line that carries the BIG marker
//! to the parser and folds the results into a [`Report`]. Lines without the
//! marker are skipped without being counted anywhere.

use crate::config::ScanConfig;
use crate::parser::{is_big_message, parse_message};
use crate::report::Report;
use crate::types::{LogRecord, ParserError, Result};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// Outcome of one relevant line
#[derive(Debug)]
pub enum ScanEvent {
    /// The line held a well-formed BIG message
    Record {
        /// 1-based line number in the input
        line_number: usize,
        record: LogRecord,
    },
    /// The line carried the marker but did not parse
    Malformed {
        /// 1-based line number in the input
        line_number: usize,
        error: ParserError,
    },
}

impl ScanEvent {
    /// Line number this event was produced from
    pub fn line_number(&self) -> usize {
        match self {
            ScanEvent::Record { line_number, .. } => *line_number,
            ScanEvent::Malformed { line_number, .. } => *line_number,
        }
    }
}

/// Entry point for scanning BIG logs
pub struct LogScanner {
    config: ScanConfig,
}

impl LogScanner {
    /// Create a scanner with the given configuration
    pub fn new(config: ScanConfig) -> Self {
        Self { config }
    }

    /// Scan a log file and build its report
    ///
    /// The file is closed when this returns, whether the scan completed, hit
    /// the line ceiling or failed while reading.
    ///
    /// # Example
    /// ```no_run
    /// use big_log_parser::{LogScanner, ScanConfig};
    /// use std::path::Path;
    ///
    /// let scanner = LogScanner::new(ScanConfig::new().with_max_lines(10_000));
    /// let report = scanner.scan_file(Path::new("app_2.log")).unwrap();
    /// println!("{} BIG messages, {} failed", report.total_seen, report.total_failed);
    /// ```
    pub fn scan_file(&self, path: &Path) -> Result<Report> {
        log::info!("Scanning log file: {:?}", path);

        let file = File::open(path)?;
        let report = self.scan_reader(BufReader::new(file))?;

        log::info!(
            "Finished {:?}: {} BIG messages ({} OK, {} failed, {} skipped)",
            path,
            report.total_seen,
            report.total_ok,
            report.total_failed,
            report.total_malformed()
        );
        Ok(report)
    }

    /// Scan any buffered reader and build its report
    ///
    /// Malformed lines are logged and skipped. Only a read error aborts the
    /// scan.
    pub fn scan_reader<R: BufRead>(&self, reader: R) -> Result<Report> {
        let mut report = Report::new();

        for event in self.records(reader) {
            let event = event?;
            report.record_seen();

            match event {
                ScanEvent::Record { line_number, record } => {
                    log::trace!("Line {}: {} {}", line_number, record.device_id, record.state);
                    if let Err(e) = report.process(&record) {
                        log::warn!("Skipping line {}: {}", line_number, e);
                    }
                }
                ScanEvent::Malformed { line_number, error } => {
                    log::warn!("Skipping line {}: {}", line_number, error);
                }
            }
        }

        Ok(report.finalize())
    }

    /// Lazily parse the relevant lines of a reader
    pub fn records<R: BufRead>(&self, reader: R) -> RecordIterator<R> {
        RecordIterator::new(reader, self.config.clone())
    }
}

impl Default for LogScanner {
    fn default() -> Self {
        Self::new(ScanConfig::default())
    }
}

/// Iterator over the BIG-marked lines of a reader
///
/// Yields one [`ScanEvent`] per relevant line, in file order, and an `Err` if
/// reading fails. Stops after the configured line ceiling.
///
/// Line length is not capped: a line is buffered in full up to its newline (or
/// end of input), so memory use follows the longest line in the log.
pub struct RecordIterator<R> {
    reader: R,
    config: ScanConfig,
    buf: Vec<u8>,
    lines_read: usize,
    done: bool,
}

impl<R: BufRead> RecordIterator<R> {
    fn new(reader: R, config: ScanConfig) -> Self {
        Self {
            reader,
            config,
            buf: Vec::new(),
            lines_read: 0,
            done: false,
        }
    }

    /// Number of lines read so far, relevant or not
    pub fn lines_read(&self) -> usize {
        self.lines_read
    }
}

impl<R: BufRead> Iterator for RecordIterator<R> {
    type Item = Result<ScanEvent>;

    fn next(&mut self) -> Option<Self::Item> {
        while !self.done {
            if !self.config.should_continue(self.lines_read) {
                log::info!("Line limit reached after {} lines", self.lines_read);
                self.done = true;
                break;
            }

            self.buf.clear();
            match self.reader.read_until(b'\n', &mut self.buf) {
                Ok(0) => {
                    self.done = true;
                    break;
                }
                Ok(_) => self.lines_read += 1,
                Err(e) => {
                    self.done = true;
                    return Some(Err(e.into()));
                }
            }

            // Stray non-UTF-8 bytes must not abort the run
            let text = String::from_utf8_lossy(&self.buf);
            let line = text.trim_end_matches(['\r', '\n']);

            if !is_big_message(line) {
                continue;
            }

            let line_number = self.lines_read;
            let event = match parse_message(line) {
                Ok(record) => ScanEvent::Record { line_number, record },
                Err(error) => ScanEvent::Malformed { line_number, error },
            };
            return Some(Ok(event));
        }

        None
    }
}
