//! Pointer events for mouse/touch input.

use std::fmt;
use std::str::FromStr;

use kurbo::Point;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Mouse button identifiers. Touches report as `Left`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MouseButton {
    #[default]
    Left,
    Right,
    Middle,
}

/// Pointer event type for unified mouse/touch handling.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum PointerEvent {
    Down { position: Point, button: MouseButton },
    Move { position: Point },
    Up { position: Point, button: MouseButton },
}

impl PointerEvent {
    /// Screen position of the event.
    pub fn position(&self) -> Point {
        match self {
            PointerEvent::Down { position, .. }
            | PointerEvent::Move { position }
            | PointerEvent::Up { position, .. } => *position,
        }
    }
}

/// Errors from parsing textual pointer events.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InputParseError {
    #[error("Empty event")]
    Empty,
    #[error("Unknown event kind: {0}")]
    UnknownKind(String),
    #[error("Bad coordinate: {0}")]
    BadCoordinate(String),
    #[error("Unknown button: {0}")]
    UnknownButton(String),
    #[error("Unexpected trailing input: {0}")]
    Trailing(String),
}

impl FromStr for MouseButton {
    type Err = InputParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "left" => Ok(MouseButton::Left),
            "right" => Ok(MouseButton::Right),
            "middle" => Ok(MouseButton::Middle),
            _ => Err(InputParseError::UnknownButton(s.to_string())),
        }
    }
}

/// Parses `down X Y [button]`, `move X Y` and `up X Y [button]`.
impl FromStr for PointerEvent {
    type Err = InputParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.split_whitespace();
        let kind = parts.next().ok_or(InputParseError::Empty)?.to_ascii_lowercase();
        let mut coordinate = || -> Result<f64, InputParseError> {
            let raw = parts.next().ok_or_else(|| InputParseError::BadCoordinate(String::new()))?;
            raw.parse().map_err(|_| InputParseError::BadCoordinate(raw.to_string()))
        };
        let position = Point::new(coordinate()?, coordinate()?);

        let event = match kind.as_str() {
            "down" | "up" => {
                let button = parts.next().map(str::parse::<MouseButton>).transpose()?.unwrap_or_default();
                if kind == "down" {
                    PointerEvent::Down { position, button }
                } else {
                    PointerEvent::Up { position, button }
                }
            }
            "move" => PointerEvent::Move { position },
            _ => return Err(InputParseError::UnknownKind(kind)),
        };

        let rest: Vec<&str> = parts.collect();
        if !rest.is_empty() {
            return Err(InputParseError::Trailing(rest.join(" ")));
        }
        Ok(event)
    }
}

impl fmt::Display for PointerEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PointerEvent::Down { position, button } => {
                write!(f, "down {} {} {:?}", position.x, position.y, button)
            }
            PointerEvent::Move { position } => write!(f, "move {} {}", position.x, position.y),
            PointerEvent::Up { position, button } => {
                write!(f, "up {} {} {:?}", position.x, position.y, button)
            }
        }
    }
}
