//! Standalone BIG log inspection tool
//!
//! Streams a log file and prints every BIG message as it is parsed, followed
//! by a short summary.
//!
//! Usage:
//!   inspect_log <app.log> [--limit <lines>] [--verbose]
//!
//! Example:
//!   cargo run --example inspect_log -- app_2.log --limit 1000 --verbose

use big_log_parser::{decode_errors, DeviceState, LogScanner, ScanConfig, ScanEvent};
use std::collections::HashMap;
use std::env;
use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;

#[derive(Default)]
struct InspectStats {
    relevant_lines: usize,
    ok_messages: usize,
    failed_messages: usize,
    malformed_lines: usize,
    messages_per_device: HashMap<String, usize>,
}

impl InspectStats {
    fn print_summary(&self, lines_read: usize) {
        println!("\n=== INSPECTION SUMMARY ===");
        println!("Lines read: {}", lines_read);
        println!("BIG lines: {}", self.relevant_lines);
        println!("OK messages: {}", self.ok_messages);
        println!("FAILED messages: {}", self.failed_messages);
        println!("Malformed lines: {}", self.malformed_lines);
        println!("Unique devices: {}", self.messages_per_device.len());

        if !self.messages_per_device.is_empty() {
            println!("\nTop 10 Most Active Devices:");
            let mut sorted: Vec<_> = self.messages_per_device.iter().collect();
            sorted.sort_by(|a, b| b.1.cmp(a.1).then_with(|| a.0.cmp(b.0)));
            for (device, count) in sorted.iter().take(10) {
                println!("  {}: {} messages", device, count);
            }
        }
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();

    if args.len() < 2 {
        eprintln!("Usage: {} <app.log> [--limit <lines>] [--verbose]", args[0]);
        std::process::exit(1);
    }

    let log_file = PathBuf::from(&args[1]);
    let mut limit: Option<usize> = None;
    let mut verbose = false;

    let mut i = 2;
    while i < args.len() {
        match args[i].as_str() {
            "--limit" => {
                i += 1;
                if i < args.len() {
                    limit = Some(args[i].parse()?);
                }
            }
            "--verbose" | "-v" => verbose = true,
            _ => eprintln!("Unknown argument: {}", args[i]),
        }
        i += 1;
    }

    println!("=== BIG Log Inspector ===");
    println!("Log file: {:?}", log_file);
    if let Some(n) = limit {
        println!("Limit: {} lines", n);
    }
    println!();

    let scanner = LogScanner::new(ScanConfig::new().with_line_limit(limit));
    let mut records = scanner.records(BufReader::new(File::open(&log_file)?));
    let mut stats = InspectStats::default();

    for event in records.by_ref() {
        stats.relevant_lines += 1;

        match event? {
            ScanEvent::Record { line_number, record } => {
                *stats
                    .messages_per_device
                    .entry(record.device_id.clone())
                    .or_insert(0) += 1;

                match record.state {
                    DeviceState::Ok => stats.ok_messages += 1,
                    DeviceState::Failed => stats.failed_messages += 1,
                }

                println!("[{:>6}] {} {}", line_number, record.device_id, record.state);

                if verbose && record.state == DeviceState::Failed {
                    match decode_errors(&record.status_payload_1, &record.status_payload_2) {
                        Ok(errors) => {
                            for error in errors {
                                println!("         └─ {}", error);
                            }
                        }
                        Err(e) => println!("         └─ undecodable: {}", e),
                    }
                }
            }
            ScanEvent::Malformed { line_number, error } => {
                stats.malformed_lines += 1;
                if verbose {
                    println!("[{:>6}] MALFORMED {}", line_number, error);
                }
            }
        }
    }

    stats.print_summary(records.lines_read());

    Ok(())
}
