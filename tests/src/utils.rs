use std::net::{Ipv4Addr, SocketAddr};

use tokio::net::UdpSocket;
use tokio::task::JoinHandle;
use z21scan_protocols::z21::{LAN_GET_SERIAL_NUMBER, Request};

/// A command station stand-in answering serial number requests on UDP.
pub struct FakeZ21 {
    pub addr: SocketAddr,
    handle: JoinHandle<()>,
}

impl FakeZ21 {
    /// Binds `ip:port` (port 0 picks a free one) and answers every
    /// `LAN_GET_SERIAL_NUMBER` request with `serial`.
    pub async fn spawn(ip: Ipv4Addr, port: u16, serial: u32) -> anyhow::Result<Self> {
        Self::spawn_with(ip, port, serial_reply(serial)).await
    }

    /// Like [`FakeZ21::spawn`], but answers with the raw `reply` bytes.
    pub async fn spawn_with(ip: Ipv4Addr, port: u16, reply: Vec<u8>) -> anyhow::Result<Self> {
        let socket = UdpSocket::bind((ip, port)).await?;
        let addr = socket.local_addr()?;
        let expected: Vec<u8> = Request::SerialNumber.encode();

        let handle = tokio::spawn(async move {
            let mut buf = [0u8; 256];
            while let Ok((len, peer)) = socket.recv_from(&mut buf).await {
                if buf[..len] != expected[..] {
                    continue;
                }
                let _ = socket.send_to(&reply, peer).await;
            }
        });

        Ok(Self { addr, handle })
    }

    pub fn port(&self) -> u16 {
        self.addr.port()
    }
}

impl Drop for FakeZ21 {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

pub fn serial_reply(serial: u32) -> Vec<u8> {
    let mut frame = vec![0x08, 0x00];
    frame.extend_from_slice(&LAN_GET_SERIAL_NUMBER.to_le_bytes());
    frame.extend_from_slice(&serial.to_le_bytes());
    frame
}

/// A loopback port with nothing listening on it, at least right after the call.
pub async fn unused_port() -> u16 {
    let socket = UdpSocket::bind("127.0.0.1:0").await.unwrap();
    socket.local_addr().unwrap().port()
}
