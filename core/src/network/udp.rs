//! Async UDP connection to a single Z21 command station.

use std::net::{Ipv4Addr, SocketAddr, SocketAddrV4};

use anyhow::Context;
use tokio::net::UdpSocket;
use tokio::time::{Instant, timeout_at};
use tracing::trace;
use z21scan_protocols::z21::{self, Reply, Request};

/// Largest datagram a command station sends back.
const RECV_BUFFER_SIZE: usize = 1472;

pub struct Z21Connection {
    socket: Option<UdpSocket>,
    target: SocketAddr,
}

impl Z21Connection {
    /// Binds an ephemeral socket and connects it to `ip:port`.
    pub async fn connect(ip: Ipv4Addr, port: u16) -> anyhow::Result<Self> {
        let target = SocketAddr::V4(SocketAddrV4::new(ip, port));
        let socket = UdpSocket::bind("0.0.0.0:0")
            .await
            .context("binding udp socket")?;
        socket
            .connect(target)
            .await
            .with_context(|| format!("connecting to {target}"))?;

        Ok(Self {
            socket: Some(socket),
            target,
        })
    }

    pub fn target(&self) -> SocketAddr {
        self.target
    }

    /// Sends `request` and waits for the answer until `deadline`.
    ///
    /// Frames in the reply datagram that do not answer `request` are skipped as
    /// long as a matching one follows; otherwise the first frame is returned.
    pub async fn send_rcv(&self, deadline: Instant, request: Request) -> anyhow::Result<Reply> {
        let socket = self.socket.as_ref().context("connection is closed")?;

        let packet = request.encode();
        trace!(target = %self.target, len = packet.len(), "Sending Z21 request");

        let mut buf = vec![0u8; RECV_BUFFER_SIZE];
        let len = timeout_at(deadline, async {
            socket.send(&packet).await?;
            socket.recv(&mut buf).await
        })
        .await
        .with_context(|| format!("no reply from {} before deadline", self.target))?
        .with_context(|| format!("exchange with {} failed", self.target))?;

        let mut replies = z21::decode_datagram(&buf[..len])?;
        let idx = replies
            .iter()
            .position(|reply| reply.header() == request.header())
            .unwrap_or(0);

        anyhow::ensure!(!replies.is_empty(), "empty datagram from {}", self.target);
        Ok(replies.swap_remove(idx))
    }

    /// Releases the socket. Calling it again is a no-op.
    pub fn close(&mut self) {
        if self.socket.take().is_some() {
            trace!(target = %self.target, "Closed Z21 connection");
        }
    }

    pub fn is_closed(&self) -> bool {
        self.socket.is_none()
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
