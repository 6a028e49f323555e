use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use crate::error::ConfigError;

/// UDP port a Z21 command station listens on.
pub const DEFAULT_PORT: u16 = 21105;
/// Maximum number of probes in flight at once.
pub const MAX_CONCURRENCY: usize = 200;
pub const PROBE_TIMEOUT: Duration = Duration::from_secs(2);

pub const VALID_OUTPUT_FORMATS: [&str; 4] = ["short", "normal", "verbose", "json"];

/// How results are presented once the scan has finished.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// One address per line, nothing else.
    Short,
    #[default]
    Normal,
    /// Normal output plus a progress line per probed host.
    Verbose,
    Json,
}

impl OutputFormat {
    /// Picks the output format from the raw command line values.
    ///
    /// `verbose` takes precedence over `quiet`, and both take precedence over
    /// `output`. The `output` string is only validated when neither flag is set.
    pub fn resolve(output: &str, quiet: bool, verbose: bool) -> Result<Self, ConfigError> {
        if verbose {
            return Ok(Self::Verbose);
        }
        if quiet {
            return Ok(Self::Short);
        }
        output.parse()
    }

    /// True for the formats that print a header and a summary.
    pub fn is_human(&self) -> bool {
        matches!(self, Self::Normal | Self::Verbose)
    }
}

impl FromStr for OutputFormat {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "short" => Ok(Self::Short),
            "normal" => Ok(Self::Normal),
            "verbose" => Ok(Self::Verbose),
            "json" => Ok(Self::Json),
            other => Err(ConfigError::InvalidOutputFormat(other.to_string())),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Short => "short",
            Self::Normal => "normal",
            Self::Verbose => "verbose",
            Self::Json => "json",
        };
        f.write_str(name)
    }
}

/// Immutable settings for a single scan, built once from the command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanConfig {
    pub port: u16,
    /// Capacity of the concurrency gate.
    pub concurrency: usize,
    /// Deadline applied to each request/response exchange.
    pub timeout: Duration,
    pub output: OutputFormat,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            concurrency: MAX_CONCURRENCY,
            timeout: PROBE_TIMEOUT,
            output: OutputFormat::default(),
        }
    }
}

impl ScanConfig {
    pub fn is_verbose(&self) -> bool {
        self.output == OutputFormat::Verbose
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
