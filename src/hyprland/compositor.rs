//! [`Compositor`] implementation backed by Hyprland IPC.
//!
//! Communicates directly with Hyprland through its Unix socket at
//! `$XDG_RUNTIME_DIR/hypr/$HYPRLAND_INSTANCE_SIGNATURE/.socket.sock`.
//! Hyprland closes the connection after answering each request, so the
//! handle kept for the daemon's lifetime is the resolved socket path.

use crate::command::CompositorCommand;
use crate::traits::Compositor;
use log::debug;
use std::io::{Read, Write};
use std::os::unix::net::UnixStream;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Errors that can occur when talking to Hyprland.
#[derive(Debug, thiserror::Error)]
#[error("hyprland IPC error: {0}")]
pub struct HyprlandError(String);

/// Resolve the Hyprland command socket path.
///
/// Hyprland ≥ 0.40 stores its sockets at
/// `$XDG_RUNTIME_DIR/hypr/$HYPRLAND_INSTANCE_SIGNATURE/.socket.sock`.
pub fn socket_path() -> Result<PathBuf, HyprlandError> {
    let runtime_dir = std::env::var("XDG_RUNTIME_DIR")
        .map_err(|_| HyprlandError("XDG_RUNTIME_DIR not set".into()))?;
    let his = std::env::var("HYPRLAND_INSTANCE_SIGNATURE")
        .map_err(|_| HyprlandError("HYPRLAND_INSTANCE_SIGNATURE not set".into()))?;
    Ok(PathBuf::from(format!(
        "{}/hypr/{}/.socket.sock",
        runtime_dir, his
    )))
}

/// The dispatcher arguments for a workspace change.
///
/// `e-1` / `e+1` step through existing workspaces on the focused monitor.
fn dispatch_args(command: CompositorCommand) -> &'static str {
    match command {
        CompositorCommand::PreviousWorkspace => "workspace e-1",
        CompositorCommand::NextWorkspace => "workspace e+1",
    }
}

/// How long a single read or write on a request connection may block.
pub const IPC_TIMEOUT: Duration = Duration::from_secs(1);

/// Hyprland-backed compositor.
pub struct HyprlandCompositor {
    socket: PathBuf,
    timeout: Duration,
}

impl HyprlandCompositor {
    /// Use the socket at `socket`, failing if it does not exist.
    pub fn open(socket: impl AsRef<Path>) -> Result<Self, HyprlandError> {
        let socket = socket.as_ref().to_path_buf();
        if !socket.exists() {
            return Err(HyprlandError(format!(
                "no socket at {}",
                socket.display()
            )));
        }
        Ok(Self {
            socket,
            timeout: IPC_TIMEOUT,
        })
    }

    /// Replace the per-request I/O timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Locate the running Hyprland instance.
    pub fn open_default() -> Result<Self, HyprlandError> {
        Self::open(socket_path()?)
    }

    /// The socket this compositor talks to.
    pub fn socket(&self) -> &Path {
        &self.socket
    }

    /// Send a raw request and return the response as a string.
    fn request(&self, request: &str) -> Result<String, HyprlandError> {
        let mut stream = UnixStream::connect(&self.socket).map_err(|e| {
            HyprlandError(format!("connect to {}: {}", self.socket.display(), e))
        })?;
        stream
            .set_read_timeout(Some(self.timeout))
            .and_then(|()| stream.set_write_timeout(Some(self.timeout)))
            .map_err(|e| HyprlandError(format!("set timeout: {}", e)))?;

        stream
            .write_all(request.as_bytes())
            .map_err(|e| HyprlandError(format!("write: {}", e)))?;
        stream
            .shutdown(std::net::Shutdown::Write)
            .map_err(|e| HyprlandError(format!("shutdown: {}", e)))?;

        let mut response = Vec::new();
        stream
            .read_to_end(&mut response)
            .map_err(|e| HyprlandError(format!("read: {}", e)))?;

        String::from_utf8(response).map_err(|e| HyprlandError(format!("utf-8: {}", e)))
    }

    /// Send a dispatch command and check for `"ok"`.
    fn dispatch(&self, args: &str) -> Result<(), HyprlandError> {
        let response = self.request(&format!("/dispatch {}", args))?;
        if response.trim() == "ok" {
            Ok(())
        } else {
            Err(HyprlandError(format!("dispatch error: {}", response)))
        }
    }
}

impl Compositor for HyprlandCompositor {
    type Error = HyprlandError;

    fn name(&self) -> &'static str {
        "hyprland"
    }

    fn send(&mut self, command: CompositorCommand) -> Result<(), Self::Error> {
        let args = dispatch_args(command);
        debug!("hyprland dispatch {:?}", args);
        self.dispatch(args)
    }
}

//  Tests
