//! **swipeswitch** — switch workspaces with three-finger touchpad swipes.
//!
//! A horizontal three-finger swipe on the touchpad moves to the previous
//! (left) or next (right) workspace.  Short or vertical swipes are ignored.
//!
//! # Architecture
//!
//! * [`gesture`] accumulates swipe motion and classifies a finished swipe.
//!   It is pure state, testable without a device.
//! * [`dispatcher`] turns a direction into a
//!   [`CompositorCommand`](command::CompositorCommand) and sends it,
//!   fire-and-forget.
//! * [`traits::Compositor`] abstracts the control channel so the dispatcher
//!   is not coupled to any specific compositor.  Concrete implementations
//!   live in [`sway`] (i3-ipc) and [`hyprland`].
//! * [`touchpad`] reads libinput and [`daemon`] runs the single-threaded
//!   event loop.

pub mod command;
pub mod config;
pub mod daemon;
pub mod dispatcher;
pub mod gesture;
pub mod hyprland;
pub mod sway;
pub mod touchpad;
pub mod traits;
