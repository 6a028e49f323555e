use std::io;
use std::net::Ipv4Addr;
use std::time::Instant;

use tracing::info;
use z21scan_common::config::ScanConfig;
use z21scan_common::network::range::NetworkBlock;
use z21scan_common::network::result::ScanResult;
use z21scan_common::network::target::Target;
use z21scan_core::scanner;

use crate::terminal::print;

/// Resolves `target`, probes every candidate host and prints the devices found.
pub async fn scan(target: &str, cfg: &ScanConfig) -> anyhow::Result<()> {
    let target: Target = target.parse()?;
    let block: NetworkBlock = target.resolve()?;
    let ips: Vec<Ipv4Addr> = block.hosts();

    if cfg.output.is_human() {
        print::scan_header(&mut io::stdout(), &block, cfg.port)?;
    }

    let start_time: Instant = Instant::now();
    let on_probe_done = cfg.is_verbose().then(print::progress_callback);
    let results: Vec<ScanResult> = scanner::perform_scan(ips, cfg, on_probe_done).await?;
    let devices: Vec<ScanResult> = scanner::reachable_only(results);

    info!(
        "Found {} device(s) in {:.2}s",
        devices.len(),
        start_time.elapsed().as_secs_f64()
    );

    print::render(&mut io::stdout().lock(), &devices, cfg.output)
}
