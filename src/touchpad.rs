//! libinput touchpad source.
//!
//! Opens either every device on a udev seat or a single evdev node, and
//! translates libinput swipe events into [`GestureEvent`]s.  Pinch and hold
//! gestures, pointer motion and keys are dropped here.

use crate::config::InputConfig;
use crate::gesture::GestureEvent;
use input::event::gesture::{
    GestureEndEvent, GestureEventCoordinates, GestureEventTrait, GestureSwipeEvent,
};
use input::event::{DeviceEvent, Event, EventTrait, GestureEvent as LibinputGesture};
use input::{Device, DeviceCapability, Libinput, LibinputInterface};
use log::{debug, info, warn};
use std::fs::{File, OpenOptions};
use std::os::fd::{AsFd, BorrowedFd, OwnedFd};
use std::os::unix::fs::OpenOptionsExt;
use std::path::Path;

/// Errors from opening the touchpad.
#[derive(Debug, thiserror::Error)]
pub enum TouchpadError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to assign udev seat {0:?}")]
    Seat(String),
    #[error("libinput could not open {0}")]
    Device(String),
    #[error("no gesture-capable device found (check read access to /dev/input)")]
    NoGestureDevice,
}

/// Opens device nodes on libinput's behalf with plain `open(2)`.
///
/// The process needs read access to `/dev/input/event*`, typically through
/// the `input` group.
struct Interface;

/// Read/write mode implied by libinput's `open` flags.
fn access_mode(flags: i32) -> (bool, bool) {
    match flags & libc::O_ACCMODE {
        libc::O_RDONLY => (true, false),
        libc::O_WRONLY => (false, true),
        _ => (true, true),
    }
}

fn open_device(path: &Path, flags: i32) -> Result<OwnedFd, i32> {
    let (read, write) = access_mode(flags);
    OpenOptions::new()
        .custom_flags(flags)
        .read(read)
        .write(write)
        .open(path)
        .map(OwnedFd::from)
        .map_err(|err| {
            warn!("cannot open {}: {}", path.display(), err);
            err.raw_os_error().unwrap_or(libc::EIO)
        })
}

impl LibinputInterface for Interface {
    fn open_restricted(&mut self, path: &Path, flags: i32) -> Result<OwnedFd, i32> {
        open_device(path, flags)
    }

    fn close_restricted(&mut self, fd: OwnedFd) {
        drop(File::from(fd));
    }
}

/// Phase of a libinput swipe event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SwipePhase {
    Begin,
    Update,
    End,
}

/// Build a [`GestureEvent`] from the raw values libinput reports.
///
/// libinput hands out the finger count as a C `int`; a negative count is
/// treated as zero fingers, which never opens a session.
fn gesture_event(
    phase: SwipePhase,
    fingers: i32,
    dx: f64,
    dy: f64,
    cancelled: bool,
) -> GestureEvent {
    match phase {
        SwipePhase::Begin => GestureEvent::Begin {
            fingers: u32::try_from(fingers).unwrap_or(0),
        },
        SwipePhase::Update => GestureEvent::Update { dx, dy },
        SwipePhase::End => GestureEvent::End { cancelled },
    }
}

/// Map one libinput event to the gesture vocabulary.
fn translate(event: &Event) -> Option<GestureEvent> {
    let Event::Gesture(LibinputGesture::Swipe(swipe)) = event else {
        return None;
    };
    let event = match swipe {
        GestureSwipeEvent::Begin(begin) => {
            gesture_event(SwipePhase::Begin, begin.finger_count(), 0.0, 0.0, false)
        }
        GestureSwipeEvent::Update(update) => gesture_event(
            SwipePhase::Update,
            update.finger_count(),
            update.dx(),
            update.dy(),
            false,
        ),
        GestureSwipeEvent::End(end) => {
            gesture_event(SwipePhase::End, end.finger_count(), 0.0, 0.0, end.cancelled())
        }
        _ => return None,
    };
    Some(event)
}

fn is_touchpad(device: &Device) -> bool {
    device.has_capability(DeviceCapability::Gesture)
}

/// A libinput context watching the configured touchpad(s).
///
/// Dropping it releases every device fd through [`Interface`].
pub struct Touchpad {
    libinput: Libinput,
}

impl Touchpad {
    /// Open the input side described by `config`.
    ///
    /// Fails if no device with gesture support ends up attached.
    pub fn open(config: &InputConfig) -> Result<Self, TouchpadError> {
        let mut libinput = match &config.device {
            Some(path) => {
                let mut libinput = Libinput::new_from_path(Interface);
                let name = path.display().to_string();
                let device = path
                    .to_str()
                    .and_then(|p| libinput.path_add_device(p))
                    .ok_or_else(|| TouchpadError::Device(name.clone()))?;
                if !is_touchpad(&device) {
                    warn!("{} ({}) reports no gesture support", name, device.name());
                }
                libinput
            }
            None => {
                let mut libinput = Libinput::new_with_udev(Interface);
                libinput
                    .udev_assign_seat(&config.seat)
                    .map_err(|()| TouchpadError::Seat(config.seat.clone()))?;
                libinput
            }
        };

        // Attaching devices queues one "added" event each.
        libinput.dispatch()?;
        let mut touchpads = 0;
        for event in &mut libinput {
            if let Event::Device(DeviceEvent::Added(_)) = &event {
                let device = event.device();
                if is_touchpad(&device) {
                    info!("using touchpad {:?}", device.name());
                    touchpads += 1;
                } else {
                    debug!("ignoring device {:?}", device.name());
                }
            }
        }
        if touchpads == 0 {
            return Err(TouchpadError::NoGestureDevice);
        }

        Ok(Self { libinput })
    }

    /// Read everything libinput has pending and hand each swipe event to
    /// `sink`, in order.
    pub fn drain(&mut self, mut sink: impl FnMut(GestureEvent)) -> std::io::Result<()> {
        self.libinput.dispatch()?;
        for event in &mut self.libinput {
            match &event {
                Event::Device(DeviceEvent::Added(_)) => {
                    info!("device added: {:?}", event.device().name());
                }
                Event::Device(DeviceEvent::Removed(_)) => {
                    info!("device removed: {:?}", event.device().name());
                }
                _ => {
                    if let Some(gesture) = translate(&event) {
                        sink(gesture);
                    }
                }
            }
        }
        Ok(())
    }
}

impl AsFd for Touchpad {
    fn as_fd(&self) -> BorrowedFd<'_> {
        self.libinput.as_fd()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn access_mode_from_flags() {
        assert_eq!(access_mode(libc::O_RDONLY), (true, false));
        assert_eq!(access_mode(libc::O_WRONLY), (false, true));
        assert_eq!(access_mode(libc::O_RDWR), (true, true));
        assert_eq!(
            access_mode(libc::O_RDWR | libc::O_NONBLOCK | libc::O_CLOEXEC),
            (true, true)
        );
        assert_eq!(access_mode(libc::O_RDONLY | libc::O_NONBLOCK), (true, false));
    }

    #[test]
    fn open_device_reads_regular_file() {
        let path = std::env::temp_dir().join(format!(
            "swipeswitch-dev-{}",
            std::process::id()
        ));
        std::fs::write(&path, b"x").unwrap();
        let fd = open_device(&path, libc::O_RDONLY | libc::O_NONBLOCK).unwrap();
        drop(fd);
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn open_device_reports_errno() {
        let path = Path::new("/nonexistent/swipeswitch/event0");
        assert_eq!(open_device(path, libc::O_RDONLY).err(), Some(libc::ENOENT));
    }

    #[test]
    fn begin_carries_finger_count() {
        assert_eq!(
            gesture_event(SwipePhase::Begin, 3, 0.0, 0.0, false),
            GestureEvent::Begin { fingers: 3 }
        );
        assert_eq!(
            gesture_event(SwipePhase::Begin, 4, 0.0, 0.0, false),
            GestureEvent::Begin { fingers: 4 }
        );
    }

    #[test]
    fn negative_finger_count_becomes_zero() {
        assert_eq!(
            gesture_event(SwipePhase::Begin, -1, 0.0, 0.0, false),
            GestureEvent::Begin { fingers: 0 }
        );
    }

    #[test]
    fn update_keeps_both_deltas() {
        assert_eq!(
            gesture_event(SwipePhase::Update, 3, -12.5, 4.0, false),
            GestureEvent::Update { dx: -12.5, dy: 4.0 }
        );
    }

    #[test]
    fn end_carries_cancelled_flag() {
        assert_eq!(
            gesture_event(SwipePhase::End, 3, 0.0, 0.0, true),
            GestureEvent::End { cancelled: true }
        );
        assert_eq!(
            gesture_event(SwipePhase::End, 3, 0.0, 0.0, false),
            GestureEvent::End { cancelled: false }
        );
    }

    #[test]
    fn cancelled_end_never_dispatches() {
        use crate::gesture::GestureSampler;

        let mut sampler = GestureSampler::new();
        let events = [
            gesture_event(SwipePhase::Begin, 3, 0.0, 0.0, false),
            gesture_event(SwipePhase::Update, 3, 500.0, 0.0, false),
            gesture_event(SwipePhase::End, 3, 0.0, 0.0, true),
        ];
        assert!(events.iter().all(|e| sampler.handle(*e).is_none()));
        assert!(!sampler.is_tracking());
    }
}
