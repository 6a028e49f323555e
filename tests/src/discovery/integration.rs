#![cfg(test)]
use std::net::Ipv4Addr;
use std::str::FromStr;
use std::time::Duration;

use z21scan_common::config::ScanConfig;
use z21scan_common::error::ConfigError;
use z21scan_common::network::result::ScanResult;
use z21scan_common::network::target::Target;
use z21scan_core::scanner;

use crate::utils::{unused_port, FakeZ21};

fn config(port: u16) -> ScanConfig {
    ScanConfig {
        port,
        timeout: Duration::from_millis(500),
        ..ScanConfig::default()
    }
}

async fn scan(target: &str, cfg: &ScanConfig) -> anyhow::Result<(usize, Vec<ScanResult>)> {
    let block = Target::from_str(target)?.resolve()?;
    let ips = block.hosts();
    let candidates = ips.len();

    let results = scanner::perform_scan(ips, cfg, None).await?;
    assert_eq!(
        results.len(),
        candidates,
        "every candidate must produce exactly one result"
    );
    Ok((candidates, scanner::reachable_only(results)))
}

/// A `/31` keeps both addresses; only the loopback host answers.
#[tokio::test]
async fn slash_31_reports_single_device() {
    let device = FakeZ21::spawn(Ipv4Addr::LOCALHOST, 0, 265070).await.unwrap();
    let cfg = config(device.port());

    let (candidates, devices) = scan("127.0.0.0/31", &cfg).await.unwrap();

    assert_eq!(candidates, 2);
    assert_eq!(
        devices,
        vec![ScanResult::reachable(Ipv4Addr::LOCALHOST, device.port(), "265070")]
    );
}

#[tokio::test]
async fn slash_32_probes_the_single_address() {
    let device = FakeZ21::spawn(Ipv4Addr::LOCALHOST, 0, 42).await.unwrap();
    let cfg = config(device.port());

    let (candidates, devices) = scan("127.0.0.1/32", &cfg).await.unwrap();

    assert_eq!(candidates, 1);
    assert_eq!(devices.len(), 1);
    assert_eq!(devices[0].serial, "42");
}

#[tokio::test]
async fn device_with_wrong_reply_is_not_reported() {
    let reply = vec![0x08, 0x00, 0x1A, 0x00, 0x00, 0x02, 0x02, 0x00];
    let device = FakeZ21::spawn_with(Ipv4Addr::LOCALHOST, 0, reply).await.unwrap();
    let cfg = config(device.port());

    let (_, devices) = scan("127.0.0.1/32", &cfg).await.unwrap();

    assert!(devices.is_empty());
    assert_eq!(serde_json::to_string(&devices).unwrap(), "[]");
}

#[tokio::test]
async fn unknown_interface_fails_before_probing() {
    let cfg = config(unused_port().await);

    let err = scan("z21scan-nope0", &cfg).await.unwrap_err();

    assert_eq!(
        err.downcast_ref::<ConfigError>(),
        Some(&ConfigError::InterfaceNotFound("z21scan-nope0".to_string()))
    );
}

#[tokio::test]
async fn malformed_cidr_fails_before_probing() {
    let cfg = config(unused_port().await);
    let err = scan("192.168.2.0/40", &cfg).await.unwrap_err();
    assert!(matches!(
        err.downcast_ref::<ConfigError>(),
        Some(ConfigError::InvalidNetworkAddress { .. })
    ));
}

// The tests below need the whole 127.0.0.0/8 routed to loopback.

#[tokio::test]
#[cfg(target_os = "linux")]
async fn slash_30_finds_both_devices() {
    let first = FakeZ21::spawn(Ipv4Addr::new(127, 0, 0, 1), 0, 265070).await.unwrap();
    let port = first.port();
    let _second = FakeZ21::spawn(Ipv4Addr::new(127, 0, 0, 2), port, 265071).await.unwrap();
    let cfg = config(port);

    let (candidates, mut devices) = scan("127.0.0.0/30", &cfg).await.unwrap();
    devices.sort_by_key(|d| d.ip);

    assert_eq!(candidates, 2);
    let expected = format!(
        "[{{\"ip\":\"127.0.0.1\",\"port\":{port},\"reachable\":true,\"serial\":\"265070\"}},\
         {{\"ip\":\"127.0.0.2\",\"port\":{port},\"reachable\":true,\"serial\":\"265071\"}}]"
    );
    assert_eq!(serde_json::to_string(&devices).unwrap(), expected);
}

#[tokio::test]
#[cfg(target_os = "linux")]
async fn silent_subnet_yields_no_devices_and_all_results() {
    let cfg = ScanConfig {
        concurrency: 3,
        ..config(unused_port().await)
    };

    let (candidates, devices) = scan("127.0.1.0/28", &cfg).await.unwrap();

    assert_eq!(candidates, 14);
    assert!(devices.is_empty());
}

#[tokio::test]
#[cfg(target_os = "linux")]
async fn scan_finds_devices_among_many_silent_hosts() {
    let port = unused_port().await;
    let mut fakes = Vec::new();
    for last in [3u8, 77, 200] {
        let ip = Ipv4Addr::new(127, 0, 2, last);
        fakes.push(FakeZ21::spawn(ip, port, u32::from(last)).await.unwrap());
    }
    let cfg = ScanConfig {
        concurrency: 16,
        ..config(port)
    };

    let (candidates, mut devices) = scan("127.0.2.0/24", &cfg).await.unwrap();
    devices.sort_by_key(|d| d.ip);

    assert_eq!(candidates, 254);
    let serials: Vec<&str> = devices.iter().map(|d| d.serial.as_str()).collect();
    assert_eq!(serials, vec!["3", "77", "200"]);
    drop(fakes);
}
