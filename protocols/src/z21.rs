//! Z21 LAN protocol framing.
//!
//! Every message is `DataLen:u16 | Header:u16 | Data`, little-endian, where
//! `DataLen` counts the whole frame including itself. A single UDP datagram
//! may carry several frames back to back.

use thiserror::Error;
use tracing::trace;

pub const HEADER_LEN: usize = 4;

pub const LAN_GET_SERIAL_NUMBER: u16 = 0x0010;

const SERIAL_NUMBER_DATA_LEN: usize = 4;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum Z21Error {
    #[error("frame truncated: need {needed} bytes, got {got}")]
    Truncated { needed: usize, got: usize },

    #[error("invalid frame length {0}")]
    BadLength(u16),

    #[error("unexpected reply with header {0:#06x}")]
    UnexpectedReply(u16),
}

/// Commands the scanner can send to a command station.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Request {
    SerialNumber,
}

impl Request {
    pub fn header(&self) -> u16 {
        match self {
            Request::SerialNumber => LAN_GET_SERIAL_NUMBER,
        }
    }

    pub fn encode(&self) -> Vec<u8> {
        let len = HEADER_LEN as u16;
        let mut buf = Vec::with_capacity(HEADER_LEN);
        buf.extend_from_slice(&len.to_le_bytes());
        buf.extend_from_slice(&self.header().to_le_bytes());
        buf
    }
}

/// A decoded frame sent back by a command station.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    SerialNumber(u32),
    /// A well-formed frame the scanner does not interpret.
    Other { header: u16, data: Vec<u8> },
}

impl Reply {
    pub fn header(&self) -> u16 {
        match self {
            Reply::SerialNumber(_) => LAN_GET_SERIAL_NUMBER,
            Reply::Other { header, .. } => *header,
        }
    }

    /// Returns the serial number, or an error naming the frame that came back instead.
    pub fn into_serial_number(self) -> Result<u32, Z21Error> {
        match self {
            Reply::SerialNumber(serial) => Ok(serial),
            other => Err(Z21Error::UnexpectedReply(other.header())),
        }
    }
}

/// Decodes the first frame in `buf`, returning it with the number of bytes consumed.
pub fn decode_frame(buf: &[u8]) -> Result<(Reply, usize), Z21Error> {
    if buf.len() < HEADER_LEN {
        return Err(Z21Error::Truncated {
            needed: HEADER_LEN,
            got: buf.len(),
        });
    }

    let data_len = u16::from_le_bytes([buf[0], buf[1]]);
    let header = u16::from_le_bytes([buf[2], buf[3]]);
    let frame_len = data_len as usize;

    if frame_len < HEADER_LEN {
        return Err(Z21Error::BadLength(data_len));
    }
    if buf.len() < frame_len {
        return Err(Z21Error::Truncated {
            needed: frame_len,
            got: buf.len(),
        });
    }

    let data = &buf[HEADER_LEN..frame_len];
    trace!(header, len = frame_len, "Decoding Z21 frame");

    let reply = match header {
        LAN_GET_SERIAL_NUMBER => {
            let bytes: [u8; SERIAL_NUMBER_DATA_LEN] = data
                .try_into()
                .map_err(|_| Z21Error::BadLength(data_len))?;
            Reply::SerialNumber(u32::from_le_bytes(bytes))
        }
        _ => Reply::Other {
            header,
            data: data.to_vec(),
        },
    };

    Ok((reply, frame_len))
}

/// Decodes every frame of a datagram.
pub fn decode_datagram(mut buf: &[u8]) -> Result<Vec<Reply>, Z21Error> {
    let mut replies = Vec::new();
    while !buf.is_empty() {
        let (reply, used) = decode_frame(buf)?;
        replies.push(reply);
        buf = &buf[used..];
    }
    Ok(replies)
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
