use std::net::Ipv4Addr;

use async_trait::async_trait;
use tokio::time::Instant;
use tracing::debug;
use z21scan_common::config::ScanConfig;
use z21scan_common::network::result::ScanResult;
use z21scan_protocols::z21::Request;

use super::Prober;
use crate::network::udp::Z21Connection;

/// Asks a host for its Z21 serial number.
///
/// Every failure, whether connect error, timeout or unexpected reply, makes the
/// host unreachable. Nothing is retried.
pub struct Z21Prober;

#[async_trait]
impl Prober for Z21Prober {
    async fn probe(&self, ip: Ipv4Addr, cfg: &ScanConfig) -> ScanResult {
        match query_serial_number(ip, cfg).await {
            Ok(serial) => ScanResult::reachable(ip, cfg.port, serial.to_string()),
            Err(e) => {
                debug!(ip = %ip, error = %e, "Probe failed");
                ScanResult::unreachable(ip, cfg.port)
            }
        }
    }
}

async fn query_serial_number(ip: Ipv4Addr, cfg: &ScanConfig) -> anyhow::Result<u32> {
    let mut conn = Z21Connection::connect(ip, cfg.port).await?;

    let deadline = Instant::now() + cfg.timeout;
    let reply = conn.send_rcv(deadline, Request::SerialNumber).await;
    conn.close();

    Ok(reply?.into_serial_number()?)
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use tokio::net::UdpSocket;

    async fn device_replying(reply: Vec<u8>) -> u16 {
        let socket = UdpSocket::bind("127.0.0.1:0").await.unwrap();
        let port = socket.local_addr().unwrap().port();
        tokio::spawn(async move {
            let mut buf = [0u8; 64];
            while let Ok((_, peer)) = socket.recv_from(&mut buf).await {
                let _ = socket.send_to(&reply, peer).await;
            }
        });
        port
    }

    fn config(port: u16) -> ScanConfig {
        ScanConfig {
            port,
            timeout: Duration::from_millis(300),
            ..ScanConfig::default()
        }
    }

    #[tokio::test]
    async fn reachable_device_reports_serial_in_decimal() {
        let port = device_replying(vec![0x08, 0x00, 0x10, 0x00, 0x6E, 0x0B, 0x04, 0x00]).await;
        let result = Z21Prober.probe(Ipv4Addr::LOCALHOST, &config(port)).await;
        assert_eq!(result, ScanResult::reachable(Ipv4Addr::LOCALHOST, port, "265070"));
    }

    #[tokio::test]
    async fn wrong_reply_type_is_unreachable() {
        let port = device_replying(vec![0x08, 0x00, 0x1A, 0x00, 0x01, 0x02, 0x03, 0x04]).await;
        let result = Z21Prober.probe(Ipv4Addr::LOCALHOST, &config(port)).await;
        assert_eq!(result, ScanResult::unreachable(Ipv4Addr::LOCALHOST, port));
    }

    #[tokio::test]
    async fn silent_host_is_unreachable_after_timeout() {
        let silent = UdpSocket::bind("127.0.0.1:0").await.unwrap();
        let port = silent.local_addr().unwrap().port();

        let started = std::time::Instant::now();
        let result = Z21Prober.probe(Ipv4Addr::LOCALHOST, &config(port)).await;
        assert!(!result.reachable);
        assert!(started.elapsed() < Duration::from_secs(2));
        drop(silent);
    }
}
