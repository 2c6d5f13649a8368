//! sway backend.
//!
//! Talks to sway over its i3-ipc control socket.  One connection is opened
//! at startup and every workspace switch is a `RUN_COMMAND` request on it.
//! Nothing outside this module should reference sway directly.

pub mod ipc;

use crate::command::CompositorCommand;
use crate::traits::Compositor;
use ipc::MessageType;
use log::{debug, warn};
use std::os::unix::net::UnixStream;
use std::path::{Path, PathBuf};
use std::process::Command;
use std::time::Duration;

/// Errors that can occur when talking to sway.
#[derive(Debug, thiserror::Error)]
pub enum SwayError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("cannot locate sway socket: {0}")]
    Discovery(String),
    #[error("sway protocol error: {0}")]
    Protocol(String),
    #[error("sway rejected command: {0}")]
    Command(String),
    #[error("sway connection is broken after an earlier I/O failure")]
    Broken,
}

/// Resolve the sway control socket.
///
/// `$SWAYSOCK` wins; otherwise ask `sway --get-socketpath`.
pub fn socket_path() -> Result<PathBuf, SwayError> {
    if let Some(path) = std::env::var_os("SWAYSOCK").filter(|p| !p.is_empty()) {
        return Ok(PathBuf::from(path));
    }

    let output = Command::new("sway")
        .arg("--get-socketpath")
        .output()
        .map_err(|e| SwayError::Discovery(format!("run sway --get-socketpath: {}", e)))?;
    if !output.status.success() {
        return Err(SwayError::Discovery(format!(
            "sway --get-socketpath exited with {}",
            output.status
        )));
    }
    let path = String::from_utf8(output.stdout)
        .map_err(|e| SwayError::Discovery(format!("socket path is not utf-8: {}", e)))?;
    let path = path.trim();
    if path.is_empty() {
        return Err(SwayError::Discovery("sway returned an empty socket path".into()));
    }
    Ok(PathBuf::from(path))
}

/// The i3-ipc command for a workspace change.
///
/// `prev` / `next` cycle through existing workspaces and wrap around at the
/// ends.
fn command_string(command: CompositorCommand) -> &'static str {
    match command {
        CompositorCommand::PreviousWorkspace => "workspace prev",
        CompositorCommand::NextWorkspace => "workspace next",
    }
}

/// How long a single read or write on the IPC socket may block.
pub const IPC_TIMEOUT: Duration = Duration::from_secs(1);

/// sway-backed compositor holding a single long-lived IPC connection.
///
/// The socket is closed when the value is dropped.  After an I/O failure
/// (including a timeout) the stream may sit in the middle of a frame, so it
/// is marked broken and every later request fails with
/// [`SwayError::Broken`] instead of reading a stale reply.
pub struct SwayCompositor {
    stream: UnixStream,
    broken: bool,
}

impl SwayCompositor {
    /// Connect to the socket at `path`.
    pub fn connect(path: &Path) -> Result<Self, SwayError> {
        let stream = UnixStream::connect(path)?;
        debug!("connected to sway at {}", path.display());
        Self::from_stream(stream)
    }

    /// Locate the running sway instance and connect to it.
    pub fn connect_default() -> Result<Self, SwayError> {
        Self::connect(&socket_path()?)
    }

    /// Wrap an already-connected stream, bounding reads and writes by
    /// [`IPC_TIMEOUT`].
    pub fn from_stream(stream: UnixStream) -> Result<Self, SwayError> {
        Self::with_timeout(stream, IPC_TIMEOUT)
    }

    /// Wrap an already-connected stream with a custom I/O timeout.
    pub fn with_timeout(stream: UnixStream, timeout: Duration) -> Result<Self, SwayError> {
        stream.set_read_timeout(Some(timeout))?;
        stream.set_write_timeout(Some(timeout))?;
        Ok(Self {
            stream,
            broken: false,
        })
    }

    /// `true` once an I/O failure has left the stream unusable.
    pub fn is_broken(&self) -> bool {
        self.broken
    }

    /// One request/response exchange.
    fn request(&mut self, kind: MessageType, payload: &[u8]) -> Result<Vec<u8>, SwayError> {
        if self.broken {
            return Err(SwayError::Broken);
        }
        let result = ipc::write_message(&mut self.stream, kind, payload)
            .and_then(|()| ipc::read_message(&mut self.stream));
        let (reply_kind, reply) = match result {
            Ok(reply) => reply,
            Err(e @ SwayError::Io(_)) => {
                warn!("sway connection lost: {}", e);
                self.broken = true;
                return Err(e);
            }
            Err(e) => return Err(e),
        };
        if reply_kind != kind as u32 {
            return Err(SwayError::Protocol(format!(
                "expected reply type {}, got {}",
                kind as u32, reply_kind
            )));
        }
        Ok(reply)
    }

    /// Query the compositor version; used as a startup handshake.
    pub fn version(&mut self) -> Result<String, SwayError> {
        let reply = self.request(MessageType::GetVersion, b"")?;
        let version: ipc::Version = serde_json::from_slice(&reply)?;
        Ok(version.human_readable)
    }
}

impl Compositor for SwayCompositor {
    type Error = SwayError;

    fn name(&self) -> &'static str {
        "sway"
    }

    fn send(&mut self, command: CompositorCommand) -> Result<(), Self::Error> {
        let text = command_string(command);
        debug!("sway RUN_COMMAND {:?}", text);
        let reply = self.request(MessageType::RunCommand, text.as_bytes())?;
        ipc::check_command_reply(&reply)
    }
}

//  Tests
