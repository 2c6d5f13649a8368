//! Hyprland backend.
//!
//! Provides a [`Compositor`](crate::traits::Compositor) implementation
//! powered by Hyprland's IPC request socket.
//!
//! Nothing outside this module should reference Hyprland directly.

pub mod compositor;
