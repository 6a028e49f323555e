pub mod scan;

use std::time::Duration;

use clap::Parser;
use z21scan_common::config::{DEFAULT_PORT, MAX_CONCURRENCY, OutputFormat, ScanConfig};
use z21scan_common::error::ConfigError;

const DEFAULT_TIMEOUT_MS: u64 = 2_000;

#[derive(Parser, Debug)]
#[command(name = "z21scan", version)]
#[command(about = "Scan local network for Z21 devices.")]
#[command(long_about = "z21scan scans a local network for reachable Z21 devices.
You can specify either a network interface (e.g. \"eth0\") or a
network address in CIDR notation (e.g. \"192.168.2.0/24\").")]
pub struct CommandLine {
    /// Network interface or network in CIDR notation
    #[arg(value_name = "IFACE|NETWORK")]
    pub target: String,

    /// UDP port to probe
    #[arg(short, long, default_value_t = DEFAULT_PORT)]
    pub port: u16,

    /// Output format: short|normal|verbose|json
    #[arg(short, long, default_value = "normal")]
    pub output: String,

    /// Short output (same as -o short)
    #[arg(short, long)]
    pub quiet: bool,

    /// Verbose output (same as -o verbose), takes precedence over --quiet
    #[arg(short, long)]
    pub verbose: bool,

    /// Maximum number of hosts probed at the same time
    #[arg(short, long, default_value_t = MAX_CONCURRENCY, value_parser = positive_usize)]
    pub concurrency: usize,

    /// Per-host reply timeout in milliseconds
    #[arg(short, long, value_name = "MILLIS", default_value_t = DEFAULT_TIMEOUT_MS,
          value_parser = clap::value_parser!(u64).range(1..))]
    pub timeout: u64,
}

impl CommandLine {
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Builds the immutable scan configuration, validating the output format.
    pub fn to_config(&self) -> Result<ScanConfig, ConfigError> {
        Ok(ScanConfig {
            port: self.port,
            concurrency: self.concurrency,
            timeout: Duration::from_millis(self.timeout),
            output: OutputFormat::resolve(&self.output, self.quiet, self.verbose)?,
        })
    }
}

fn positive_usize(s: &str) -> Result<usize, String> {
    match s.parse::<usize>() {
        Ok(0) => Err("must be at least 1".to_string()),
        Ok(n) => Ok(n),
        Err(e) => Err(e.to_string()),
    }
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
