//! The event loop that ties the touchpad, the sampler and the dispatcher
//! together.
//!
//! Everything runs on one thread.  The libinput fd is watched by a
//! level-triggered `calloop` source; each wake-up drains all pending input
//! and pushes every swipe event through [`Daemon::handle`] before the loop
//! sleeps again, so one swipe is fully dispatched before the next event is
//! read.  SIGINT and SIGTERM stop the loop, after which the touchpad and the
//! compositor connection are dropped.

use crate::dispatcher::{DispatchOutcome, Dispatcher};
use crate::gesture::{GestureEvent, GestureSampler};
use crate::touchpad::Touchpad;
use crate::traits::Compositor;
use calloop::generic::Generic;
use calloop::signals::{Signal, Signals};
use calloop::{EventLoop, Interest, Mode, PostAction};
use log::info;
use std::os::fd::AsFd;

/// Possible errors from the event loop.
#[derive(Debug, thiserror::Error)]
pub enum DaemonError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("event loop error: {0}")]
    EventLoop(#[from] calloop::Error),
}

/// Gesture state plus the compositor it dispatches to.
///
/// The daemon is generic over any [`Compositor`], so it can be driven by
/// hand in tests without a touchpad or a running compositor.
pub struct Daemon<C: Compositor> {
    sampler: GestureSampler,
    dispatcher: Dispatcher<C>,
}

impl<C: Compositor> Daemon<C> {
    pub fn new(compositor: C) -> Self {
        Self {
            sampler: GestureSampler::new(),
            dispatcher: Dispatcher::new(compositor),
        }
    }

    /// Process one input event to completion.
    pub fn handle(&mut self, event: GestureEvent) -> DispatchOutcome {
        let direction = self.sampler.handle(event);
        self.dispatcher.dispatch(direction)
    }

    pub fn sampler(&self) -> &GestureSampler {
        &self.sampler
    }

    pub fn dispatcher(&self) -> &Dispatcher<C> {
        &self.dispatcher
    }
}

/// Data shared with the loop callbacks.
struct LoopState<C: Compositor> {
    touchpad: Touchpad,
    daemon: Daemon<C>,
}

/// Run until SIGINT / SIGTERM or until the input fd fails.
pub fn run<C: Compositor + 'static>(touchpad: Touchpad, compositor: C) -> Result<(), DaemonError> {
    let mut event_loop = EventLoop::<LoopState<C>>::try_new()?;
    let handle = event_loop.handle();

    // calloop takes ownership of the fd it polls; give it a duplicate so the
    // libinput context keeps its own.
    let input_fd = touchpad.as_fd().try_clone_to_owned()?;
    handle
        .insert_source(
            Generic::new(input_fd, Interest::READ, Mode::Level),
            |_, _, state: &mut LoopState<C>| {
                let LoopState { touchpad, daemon } = state;
                touchpad.drain(|event| {
                    daemon.handle(event);
                })?;
                Ok(PostAction::Continue)
            },
        )
        .map_err(|e| e.error)?;

    let loop_signal = event_loop.get_signal();
    let signals = Signals::new(&[Signal::SIGINT, Signal::SIGTERM])?;
    handle
        .insert_source(signals, move |event, _, _| {
            info!("received {:?}, shutting down", event.signal());
            loop_signal.stop();
        })
        .map_err(|e| e.error)?;

    let mut state = LoopState {
        touchpad,
        daemon: Daemon::new(compositor),
    };
    info!(
        "swipeswitch running ({})",
        state.daemon.dispatcher().compositor().name()
    );
    event_loop.run(None, &mut state, |_| {})?;

    let dispatcher = state.daemon.dispatcher();
    info!(
        "stopped: {} workspace switch(es) sent, {} dropped",
        dispatcher.sent(),
        dispatcher.dropped()
    );
    Ok(())
}

//  Tests

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::CompositorCommand;

    #[derive(Debug, thiserror::Error)]
    #[error("recorder error")]
    struct RecorderErr;

    #[derive(Default)]
    struct RecorderCompositor {
        sent: Vec<CompositorCommand>,
    }

    impl Compositor for RecorderCompositor {
        type Error = RecorderErr;

        fn name(&self) -> &'static str {
            "recorder"
        }

        fn send(&mut self, command: CompositorCommand) -> Result<(), RecorderErr> {
            self.sent.push(command);
            Ok(())
        }
    }

    fn begin(fingers: u32) -> GestureEvent {
        GestureEvent::Begin { fingers }
    }

    fn update(dx: f64, dy: f64) -> GestureEvent {
        GestureEvent::Update { dx, dy }
    }

    fn end() -> GestureEvent {
        GestureEvent::End { cancelled: false }
    }

    #[test]
    fn only_the_end_event_dispatches() {
        let mut d = Daemon::new(RecorderCompositor::default());
        assert_eq!(d.handle(begin(3)), DispatchOutcome::Skipped);
        assert_eq!(d.handle(update(80.0, 0.0)), DispatchOutcome::Skipped);
        assert_eq!(d.handle(update(80.0, 0.0)), DispatchOutcome::Skipped);
        assert!(d.sampler().is_tracking());
        assert_eq!(
            d.handle(end()),
            DispatchOutcome::Sent(CompositorCommand::NextWorkspace)
        );
        assert!(!d.sampler().is_tracking());
    }

    #[test]
    fn leftward_swipe_dispatches_previous_once() {
        let mut d = Daemon::new(RecorderCompositor::default());
        for e in [begin(3), update(-50.0, 0.0), update(-60.0, 0.0), end()] {
            d.handle(e);
        }
        assert_eq!(
            d.dispatcher().compositor().sent,
            vec![CompositorCommand::PreviousWorkspace]
        );
    }

    #[test]
    fn finger_count_change_returns_to_idle_without_dispatch() {
        let mut d = Daemon::new(RecorderCompositor::default());
        for e in [begin(3), update(200.0, 5.0), begin(2), end()] {
            d.handle(e);
        }
        assert!(d.dispatcher().compositor().sent.is_empty());
        assert!(!d.sampler().is_tracking());
    }

    #[test]
    fn stray_end_is_harmless() {
        let mut d = Daemon::new(RecorderCompositor::default());
        assert_eq!(d.handle(end()), DispatchOutcome::Skipped);
        assert_eq!(
            d.handle(GestureEvent::End { cancelled: true }),
            DispatchOutcome::Skipped
        );
        assert_eq!(d.dispatcher().sent(), 0);
    }
}
