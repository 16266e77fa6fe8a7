//! Input event vocabulary for the canvas session.

use kurbo::Point;
use serde::{Deserialize, Serialize};
use std::time::Instant;

/// Mouse button identifiers.
///
/// The canvas distinguishes only the primary (draw/select/type) and
/// secondary (pan) buttons.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MouseButton {
    Primary,
    Secondary,
}

/// Modifier keys state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
    pub meta: bool,
}

impl Modifiers {
    /// No modifiers held.
    pub const NONE: Modifiers = Modifiers {
        shift: false,
        ctrl: false,
        alt: false,
        meta: false,
    };

    /// Shift only.
    pub const SHIFT: Modifiers = Modifiers {
        shift: true,
        ctrl: false,
        alt: false,
        meta: false,
    };
}

/// Pointer event type for unified mouse/touch handling.
///
/// Positions are in screen coordinates; the session maps them to world
/// coordinates through the camera.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum PointerEvent {
    Down {
        position: Point,
        button: MouseButton,
    },
    Up {
        position: Point,
        button: MouseButton,
    },
    Move {
        position: Point,
    },
    /// One wheel notch. Positive `delta` zooms in, negative zooms out.
    Scroll {
        position: Point,
        delta: f64,
    },
}

/// Keyboard keys the session reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Key {
    Char(char),
    Backspace,
    Delete,
    Enter,
    Escape,
    Left,
    Right,
    Up,
    Down,
    Home,
    End,
}

/// Double-click detection constants.
const DOUBLE_CLICK_TIME_MS: u128 = 500;
const DOUBLE_CLICK_DISTANCE: f64 = 5.0;

/// Detects double-clicks from successive primary-button presses.
#[derive(Debug, Clone, Default)]
pub struct ClickTracker {
    last_click_time: Option<Instant>,
    last_click_position: Option<Point>,
}

impl ClickTracker {
    /// Create a new tracker.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a primary-button press.
    ///
    /// Returns true when the press completes a double-click. A detected
    /// double-click resets the tracker so a triple-click is not reported
    /// as another double-click.
    pub fn register(&mut self, position: Point) -> bool {
        let now = Instant::now();
        if let (Some(last_time), Some(last_pos)) = (self.last_click_time, self.last_click_position)
        {
            let elapsed = now.duration_since(last_time).as_millis();
            let distance =
                ((position.x - last_pos.x).powi(2) + (position.y - last_pos.y).powi(2)).sqrt();

            if elapsed < DOUBLE_CLICK_TIME_MS && distance < DOUBLE_CLICK_DISTANCE {
                self.last_click_time = None;
                self.last_click_position = None;
                return true;
            }
        }
        self.last_click_time = Some(now);
        self.last_click_position = Some(position);
        false
    }
}
