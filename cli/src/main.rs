mod commands;
mod terminal;

use commands::{CommandLine, scan};
use z21scan_common::config::ScanConfig;

use crate::terminal::logging;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let commands = CommandLine::parse_args();
    let cfg: ScanConfig = commands.to_config()?;

    logging::init_logging(&cfg);

    scan::scan(&commands.target, &cfg).await
}
