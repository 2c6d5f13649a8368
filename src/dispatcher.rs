//! Sends classified swipes to the compositor.
//!
//! [`Dispatcher`] owns the [`Compositor`] handle for the lifetime of the
//! daemon.  Sends are fire-and-forget: a failure is logged and dropped.  A
//! retried switch could land after the user has already moved on, so there
//! is no queue and no retry.

use crate::command::{CompositorCommand, Direction};
use crate::traits::Compositor;
use log::{info, warn};

/// What happened to a single dispatch request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// No direction; nothing was sent.
    Skipped,
    /// The compositor accepted the command.
    Sent(CompositorCommand),
    /// The send failed and the command was dropped.
    Dropped(CompositorCommand),
}

/// Maps directions to compositor commands and sends them.
pub struct Dispatcher<C: Compositor> {
    compositor: C,
    sent: u64,
    dropped: u64,
}

impl<C: Compositor> Dispatcher<C> {
    pub fn new(compositor: C) -> Self {
        Self {
            compositor,
            sent: 0,
            dropped: 0,
        }
    }

    /// Shared reference to the underlying compositor.
    pub fn compositor(&self) -> &C {
        &self.compositor
    }

    /// Number of commands the compositor accepted.
    pub fn sent(&self) -> u64 {
        self.sent
    }

    /// Number of commands dropped after a failed send.
    pub fn dropped(&self) -> u64 {
        self.dropped
    }

    /// Send the command for `direction`, if there is one.
    pub fn dispatch(&mut self, direction: Option<Direction>) -> DispatchOutcome {
        let Some(direction) = direction else {
            return DispatchOutcome::Skipped;
        };
        let command = CompositorCommand::from_direction(direction);
        match self.compositor.send(command) {
            Ok(()) => {
                info!("swipe {} -> {} ({})", direction, command, self.compositor.name());
                self.sent += 1;
                DispatchOutcome::Sent(command)
            }
            Err(e) => {
                warn!("dropping {} after failed send: {}", command, e);
                self.dropped += 1;
                DispatchOutcome::Dropped(command)
            }
        }
    }
}

//  Tests

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gesture::{GestureEvent, GestureSampler, SWIPE_THRESHOLD};

    #[derive(Debug, thiserror::Error)]
    #[error("recorder error")]
    struct RecorderErr;

    /// Records every command; fails the first `fail_next` sends.
    #[derive(Default)]
    struct RecorderCompositor {
        sent: Vec<CompositorCommand>,
        fail_next: usize,
    }

    impl Compositor for RecorderCompositor {
        type Error = RecorderErr;

        fn name(&self) -> &'static str {
            "recorder"
        }

        fn send(&mut self, command: CompositorCommand) -> Result<(), RecorderErr> {
            if self.fail_next > 0 {
                self.fail_next -= 1;
                return Err(RecorderErr);
            }
            self.sent.push(command);
            Ok(())
        }
    }

    fn run(events: &[GestureEvent]) -> Dispatcher<RecorderCompositor> {
        let mut sampler = GestureSampler::new();
        let mut dispatcher = Dispatcher::new(RecorderCompositor::default());
        for event in events {
            let _ = dispatcher.dispatch(sampler.handle(*event));
        }
        dispatcher
    }

    #[test]
    fn none_is_skipped() {
        let mut d = Dispatcher::new(RecorderCompositor::default());
        assert_eq!(d.dispatch(None), DispatchOutcome::Skipped);
        assert!(d.compositor().sent.is_empty());
        assert_eq!(d.sent(), 0);
    }

    #[test]
    fn left_sends_previous_workspace() {
        let mut d = Dispatcher::new(RecorderCompositor::default());
        assert_eq!(
            d.dispatch(Some(Direction::Left)),
            DispatchOutcome::Sent(CompositorCommand::PreviousWorkspace)
        );
        assert_eq!(d.compositor().sent, vec![CompositorCommand::PreviousWorkspace]);
    }

    #[test]
    fn right_sends_next_workspace() {
        let mut d = Dispatcher::new(RecorderCompositor::default());
        d.dispatch(Some(Direction::Right));
        assert_eq!(d.compositor().sent, vec![CompositorCommand::NextWorkspace]);
        assert_eq!(d.sent(), 1);
    }

    #[test]
    fn failed_send_is_dropped_and_next_one_goes_through() {
        let mut d = Dispatcher::new(RecorderCompositor {
            fail_next: 1,
            ..Default::default()
        });
        assert_eq!(
            d.dispatch(Some(Direction::Right)),
            DispatchOutcome::Dropped(CompositorCommand::NextWorkspace)
        );
        assert_eq!(
            d.dispatch(Some(Direction::Left)),
            DispatchOutcome::Sent(CompositorCommand::PreviousWorkspace)
        );
        // The dropped command is never replayed.
        assert_eq!(d.compositor().sent, vec![CompositorCommand::PreviousWorkspace]);
        assert_eq!(d.sent(), 1);
        assert_eq!(d.dropped(), 1);
    }

    #[test]
    fn sub_threshold_swipes_never_dispatch() {
        for dx in [0.0, 1.0, -1.0, 50.0, -99.0, SWIPE_THRESHOLD - 0.5] {
            let d = run(&[
                GestureEvent::Begin { fingers: 3 },
                GestureEvent::Update { dx, dy: 0.0 },
                GestureEvent::End { cancelled: false },
            ]);
            assert!(d.compositor().sent.is_empty(), "dx={} dispatched", dx);
        }
    }

    #[test]
    fn vertical_only_swipe_never_dispatches() {
        let d = run(&[
            GestureEvent::Begin { fingers: 3 },
            GestureEvent::Update { dx: 0.0, dy: -5_000.0 },
            GestureEvent::Update { dx: 0.0, dy: 5_000.0 },
            GestureEvent::End { cancelled: false },
        ]);
        assert!(d.compositor().sent.is_empty());
    }

    /// End-to-end: begin(3) → update(-50) → update(-60) → end sends
    /// "previous workspace" exactly once.
    #[test]
    fn leftward_swipe_sends_previous_once() {
        let d = run(&[
            GestureEvent::Begin { fingers: 3 },
            GestureEvent::Update { dx: -50.0, dy: 0.0 },
            GestureEvent::Update { dx: -60.0, dy: 0.0 },
            GestureEvent::End { cancelled: false },
        ]);
        assert_eq!(d.compositor().sent, vec![CompositorCommand::PreviousWorkspace]);
    }

    #[test]
    fn short_swipe_sends_nothing() {
        let d = run(&[
            GestureEvent::Begin { fingers: 3 },
            GestureEvent::Update { dx: 30.0, dy: 0.0 },
            GestureEvent::End { cancelled: false },
        ]);
        assert!(d.compositor().sent.is_empty());
    }

    #[test]
    fn cancelled_swipe_sends_nothing() {
        let d = run(&[
            GestureEvent::Begin { fingers: 3 },
            GestureEvent::Update { dx: 200.0, dy: 5.0 },
            GestureEvent::Begin { fingers: 2 },
            GestureEvent::End { cancelled: false },
        ]);
        assert!(d.compositor().sent.is_empty());
    }

    #[test]
    fn consecutive_swipes_each_dispatch_once() {
        let d = run(&[
            GestureEvent::Begin { fingers: 3 },
            GestureEvent::Update { dx: 120.0, dy: 0.0 },
            GestureEvent::End { cancelled: false },
            GestureEvent::Begin { fingers: 3 },
            GestureEvent::Update { dx: -120.0, dy: 0.0 },
            GestureEvent::End { cancelled: false },
            GestureEvent::End { cancelled: false },
        ]);
        assert_eq!(
            d.compositor().sent,
            vec![
                CompositorCommand::NextWorkspace,
                CompositorCommand::PreviousWorkspace
            ]
        );
    }
}
