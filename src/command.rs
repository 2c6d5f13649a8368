//! Directions and compositor commands.
//!
//! [`Direction`] is what the classifier decides a finished swipe meant, and
//! [`CompositorCommand`] is what the dispatcher asks the compositor to do
//! about it.  Backends render a command in their own syntax.

use std::fmt;

/// Horizontal direction of a completed swipe.
///
/// A swipe that did not travel far enough has no direction and is
/// represented as `Option::<Direction>::None`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Left,
    Right,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Left => write!(f, "left"),
            Direction::Right => write!(f, "right"),
        }
    }
}

/// A workspace change the compositor should perform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CompositorCommand {
    /// Focus the workspace before the current one.
    PreviousWorkspace,
    /// Focus the workspace after the current one.
    NextWorkspace,
}

impl CompositorCommand {
    /// Map a swipe direction to the command it triggers.
    pub fn from_direction(direction: Direction) -> Self {
        match direction {
            Direction::Left => CompositorCommand::PreviousWorkspace,
            Direction::Right => CompositorCommand::NextWorkspace,
        }
    }
}

impl From<Direction> for CompositorCommand {
    fn from(direction: Direction) -> Self {
        Self::from_direction(direction)
    }
}

impl fmt::Display for CompositorCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CompositorCommand::PreviousWorkspace => write!(f, "previous workspace"),
            CompositorCommand::NextWorkspace => write!(f, "next workspace"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn left_goes_to_previous_workspace() {
        assert_eq!(
            CompositorCommand::from_direction(Direction::Left),
            CompositorCommand::PreviousWorkspace
        );
    }

    #[test]
    fn right_goes_to_next_workspace() {
        assert_eq!(
            CompositorCommand::from(Direction::Right),
            CompositorCommand::NextWorkspace
        );
    }

    #[test]
    fn display_is_human_readable() {
        assert_eq!(Direction::Left.to_string(), "left");
        assert_eq!(Direction::Right.to_string(), "right");
        assert_eq!(
            CompositorCommand::PreviousWorkspace.to_string(),
            "previous workspace"
        );
        assert_eq!(CompositorCommand::NextWorkspace.to_string(), "next workspace");
    }
}
