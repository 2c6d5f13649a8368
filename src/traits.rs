//! Core trait that decouples swipeswitch from any specific compositor.
//!
//! Every concrete backend (sway, Hyprland, a dry-run logger, a test
//! harness, …) implements [`Compositor`].  The
//! [`Dispatcher`](crate::dispatcher::Dispatcher) only depends on this
//! abstraction.

use crate::command::CompositorCommand;

/// Abstraction over a compositor control channel that can switch
/// workspaces.
///
/// An implementation is expected to hold its connection (or whatever stands
/// in for one) from construction until it is dropped; `send` must not
/// reopen it.
pub trait Compositor {
    /// The error type produced by this compositor.
    type Error: std::error::Error + Send + 'static;

    /// Short backend name used in log lines.
    fn name(&self) -> &'static str;

    /// Ask the compositor to perform `command`.
    ///
    /// Returns once the transport has accepted the command (and, for
    /// protocols that reply, once the reply has been read).  Callers treat
    /// failures as non-fatal.
    fn send(&mut self, command: CompositorCommand) -> Result<(), Self::Error>;
}
