//! Turns raw touchpad swipe events into at most one [`Direction`] per swipe.
//!
//! # How a swipe becomes a workspace switch
//!
//! libinput reports three event types for a multi-finger swipe:
//!
//! | Event    | Payload        | Meaning                               |
//! |----------|----------------|---------------------------------------|
//! | `begin`  | finger count   | A multi-finger swipe has started      |
//! | `update` | `dx`, `dy`     | Incremental finger movement           |
//! | `end`    | cancelled flag | Fingers lifted (or gesture abandoned) |
//!
//! [`GestureSampler`] tracks a single session:
//!
//! 1. **`begin` with 3 fingers** → opens a session with `dx = 0`.  Any begin
//!    discards a session that was still open, without dispatching.
//! 2. **Each `update`** → adds the horizontal delta.  Vertical motion is
//!    ignored.
//! 3. **`end`** → the accumulated `dx` goes through [`classify`] and the
//!    session is closed.  A cancelled end closes it without classifying.
//!
//! Everything here is pure state; nothing touches a socket or a device.

use crate::command::Direction;
use log::debug;

/// The only finger count that is tracked.
pub const SWIPE_FINGERS: u32 = 3;

/// Minimum total horizontal travel, in libinput's normalised units, for a
/// swipe to count as a workspace switch.  Both bounds are inclusive.
pub const SWIPE_THRESHOLD: f64 = 100.0;

/// One event from the input boundary.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GestureEvent {
    Begin { fingers: u32 },
    Update { dx: f64, dy: f64 },
    End { cancelled: bool },
}

/// An in-progress three-finger swipe.
#[derive(Debug, Clone, PartialEq)]
struct GestureSession {
    /// Horizontal displacement accumulated so far.
    dx: f64,
}

/// Classify a finished swipe by its total horizontal displacement.
///
/// Returns `Left` for `dx <= -SWIPE_THRESHOLD`, `Right` for
/// `dx >= SWIPE_THRESHOLD` and `None` otherwise (including NaN).
pub fn classify(dx: f64) -> Option<Direction> {
    if dx <= -SWIPE_THRESHOLD {
        Some(Direction::Left)
    } else if dx >= SWIPE_THRESHOLD {
        Some(Direction::Right)
    } else {
        None
    }
}

/// Accumulates swipe motion for at most one session at a time.
#[derive(Debug, Default)]
pub struct GestureSampler {
    session: Option<GestureSession>,
}

impl GestureSampler {
    pub fn new() -> Self {
        Self::default()
    }

    /// `true` while a three-finger session is open.
    pub fn is_tracking(&self) -> bool {
        self.session.is_some()
    }

    /// Accumulated `dx` of the open session, if any.
    pub fn accumulated_dx(&self) -> Option<f64> {
        self.session.as_ref().map(|session| session.dx)
    }

    /// Start a new swipe.
    ///
    /// A session that is still open is dropped without classification: the
    /// input layer either lost an `end` or the finger count changed.
    pub fn begin(&mut self, fingers: u32) {
        if let Some(stale) = self.session.take() {
            debug!(
                "swipe begin ({} fingers) while tracking, discarding session at dx={:.1}",
                fingers, stale.dx
            );
        }
        if fingers == SWIPE_FINGERS {
            debug!("swipe begin: {} fingers", fingers);
            self.session = Some(GestureSession { dx: 0.0 });
        }
    }

    /// Add one frame of motion.  Only the horizontal component counts.
    pub fn update(&mut self, dx: f64, _dy: f64) {
        let Some(session) = self.session.as_mut() else {
            return;
        };
        if !dx.is_finite() {
            debug!("ignoring non-finite swipe delta {}", dx);
            return;
        }
        session.dx += dx;
    }

    /// Finish the swipe and classify it.  Idle samplers return `None`.
    pub fn end(&mut self) -> Option<Direction> {
        let session = self.session.take()?;
        let direction = classify(session.dx);
        debug!("swipe end: dx={:.1} -> {:?}", session.dx, direction);
        direction
    }

    /// Abandon the open session, if any, without classifying it.
    pub fn cancel(&mut self) {
        if let Some(session) = self.session.take() {
            debug!("swipe cancelled at dx={:.1}", session.dx);
        }
    }

    /// Feed one input event; returns a direction when a swipe completes.
    pub fn handle(&mut self, event: GestureEvent) -> Option<Direction> {
        match event {
            GestureEvent::Begin { fingers } => {
                self.begin(fingers);
                None
            }
            GestureEvent::Update { dx, dy } => {
                self.update(dx, dy);
                None
            }
            GestureEvent::End { cancelled: true } => {
                self.cancel();
                None
            }
            GestureEvent::End { cancelled: false } => self.end(),
        }
    }
}

//  Tests
