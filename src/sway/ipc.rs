//! i3-ipc framing as spoken on sway's control socket.
//!
//! Every message, in both directions, is a fixed 14-byte header followed by
//! the payload:
//!
//! | Bytes  | Field          |                                   |
//! |--------|----------------|-----------------------------------|
//! | 0..6   | magic          | `i3-ipc`                          |
//! | 6..10  | payload length | `u32`, native byte order          |
//! | 10..14 | message type   | `u32`, native byte order          |

use super::SwayError;
use serde::Deserialize;
use std::io::{Read, Write};

pub const MAGIC: &[u8; 6] = b"i3-ipc";
pub const HEADER_LEN: usize = 14;

/// Message types used by swipeswitch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u32)]
pub enum MessageType {
    RunCommand = 0,
    GetVersion = 7,
}

/// Build a complete request frame.
pub fn encode(kind: MessageType, payload: &[u8]) -> Vec<u8> {
    let mut frame = Vec::with_capacity(HEADER_LEN + payload.len());
    frame.extend_from_slice(MAGIC);
    frame.extend_from_slice(&(payload.len() as u32).to_ne_bytes());
    frame.extend_from_slice(&(kind as u32).to_ne_bytes());
    frame.extend_from_slice(payload);
    frame
}

/// Split a header into `(payload length, message type)`.
pub fn decode_header(header: &[u8; HEADER_LEN]) -> Result<(usize, u32), SwayError> {
    if &header[0..6] != MAGIC {
        return Err(SwayError::Protocol("invalid magic string in reply".into()));
    }
    let mut len = [0u8; 4];
    len.copy_from_slice(&header[6..10]);
    let mut kind = [0u8; 4];
    kind.copy_from_slice(&header[10..14]);
    Ok((u32::from_ne_bytes(len) as usize, u32::from_ne_bytes(kind)))
}

/// Write one request frame.
pub fn write_message(
    writer: &mut impl Write,
    kind: MessageType,
    payload: &[u8],
) -> Result<(), SwayError> {
    writer.write_all(&encode(kind, payload))?;
    writer.flush()?;
    Ok(())
}

/// Read one reply frame, returning its type and payload.
pub fn read_message(reader: &mut impl Read) -> Result<(u32, Vec<u8>), SwayError> {
    let mut header = [0u8; HEADER_LEN];
    reader.read_exact(&mut header)?;
    let (len, kind) = decode_header(&header)?;
    let mut payload = vec![0u8; len];
    reader.read_exact(&mut payload)?;
    Ok((kind, payload))
}

/// One entry of a `RUN_COMMAND` reply.
#[derive(Debug, Deserialize)]
struct CommandOutcome {
    success: bool,
    #[serde(default)]
    error: Option<String>,
}

/// Check a `RUN_COMMAND` reply.
///
/// sway answers with one outcome per command in the request; the request
/// fails if any of them did.
pub fn check_command_reply(payload: &[u8]) -> Result<(), SwayError> {
    let outcomes: Vec<CommandOutcome> = serde_json::from_slice(payload)?;
    match outcomes.into_iter().find(|o| !o.success) {
        Some(failed) => Err(SwayError::Command(
            failed.error.unwrap_or_else(|| "unknown error".into()),
        )),
        None => Ok(()),
    }
}

/// Subset of the `GET_VERSION` reply.
#[derive(Debug, Deserialize)]
pub struct Version {
    pub human_readable: String,
}
