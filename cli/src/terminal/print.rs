//! Renders scan results on stdout.
//!
//! Everything here writes to a generic [`Write`] so the exact output of each
//! format can be checked against a buffer.

use std::io::{self, Write};
use std::sync::Arc;

use anyhow::Context;
use colored::*;
use z21scan_common::config::OutputFormat;
use z21scan_common::network::range::NetworkBlock;
use z21scan_common::network::result::ScanResult;
use z21scan_core::scanner::ProbeCallback;

pub fn scan_header<W: Write>(out: &mut W, block: &NetworkBlock, port: u16) -> io::Result<()> {
    writeln!(out, "Scanning network \"{block}\" (port: {port}) ...")
}

pub fn progress_line(result: &ScanResult) -> String {
    format!(
        "Probing {:<14} -> z21 device: {}",
        result.ip.to_string(),
        result.reachable
    )
}

/// Prints a progress line for each probe as it completes.
pub fn progress_callback() -> ProbeCallback {
    Arc::new(|result: &ScanResult| println!("{}", progress_line(result)))
}

pub fn render<W: Write>(
    out: &mut W,
    devices: &[ScanResult],
    format: OutputFormat,
) -> anyhow::Result<()> {
    match format {
        OutputFormat::Short => {
            for device in devices {
                writeln!(out, "{}", device.ip)?;
            }
        }
        OutputFormat::Normal | OutputFormat::Verbose => {
            let count: ColoredString = devices.len().to_string().bold().green();
            writeln!(out, "Found {count} Z21 device(s)")?;
            for device in devices {
                writeln!(
                    out,
                    "  {:<15} port={} serial={}",
                    device.ip.to_string(),
                    device.port,
                    device.serial
                )?;
            }
        }
        OutputFormat::Json => {
            let json: String =
                serde_json::to_string(devices).context("failed to marshal results to JSON")?;
            writeln!(out, "{json}")?;
        }
    }
    out.flush()?;
    Ok(())
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
