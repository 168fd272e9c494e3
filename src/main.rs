//! Main application entry point (CLI binary).
//!
//! This is a thin wrapper around the `domain_security_scanner` library that handles:
//! - Command-line argument parsing
//! - Logger initialization
//! - Reading domains from arguments, a domain list, or a zone file
//! - Printing the results as JSON
//!
//! All core functionality is implemented in the library crate.

use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;
use std::process;

use anyhow::{Context, Result};
use clap::Parser;
use log::info;

use domain_security_scanner::initialization::init_logger_with;
use domain_security_scanner::{Opt, ScanResult, Scanner};

#[tokio::main]
async fn main() -> Result<()> {
    let opt = Opt::parse();

    init_logger_with(opt.log_level.clone().into(), opt.log_format.clone())
        .context("Failed to initialize logger")?;

    match run(&opt).await {
        Ok(()) => Ok(()),
        Err(e) => {
            eprintln!("domain_security_scanner error: {:#}", e);
            process::exit(1);
        }
    }
}

async fn run(opt: &Opt) -> Result<()> {
    let scanner = Scanner::new(opt.scanner_config()).context("Failed to create scanner")?;

    let results = if let Some(path) = &opt.zone_file {
        scanner.scan_zone_file(path).await
    } else {
        let mut domains = opt.domains.clone();
        if let Some(path) = &opt.file {
            domains.extend(read_domains(path)?);
        }
        scanner.scan(domains.as_slice()).await
    };
    scanner.close().await;

    let mut results = results.context("Scan failed")?;
    results.sort_by(|a, b| a.domain.cmp(&b.domain));
    info!(
        "Scanned {} domain(s), {} with errors",
        results.len(),
        results.iter().filter(|r| r.error.is_some()).count()
    );

    print_results(&results, opt.pretty)
}

/// Reads one domain per line, skipping blank lines and `#` comments.
///
/// A path of `-` reads from stdin.
fn read_domains(path: &Path) -> Result<Vec<String>> {
    let reader: Box<dyn BufRead> = if path == Path::new("-") {
        Box::new(BufReader::new(io::stdin()))
    } else {
        let file = File::open(path)
            .with_context(|| format!("Failed to open domain list {}", path.display()))?;
        Box::new(BufReader::new(file))
    };

    let mut domains = Vec::new();
    for line in reader.lines() {
        let line = line.context("Failed to read domain list")?;
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        domains.push(line.to_string());
    }
    Ok(domains)
}

fn print_results(results: &[ScanResult], pretty: bool) -> Result<()> {
    let json = if pretty {
        serde_json::to_string_pretty(results)
    } else {
        serde_json::to_string(results)
    }
    .context("Failed to serialize results")?;
    println!("{json}");
    Ok(())
}
