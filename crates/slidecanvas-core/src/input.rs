//! Pointer and keyboard input types.
//!
//! Positions in these events are screen coordinates; the canvas converts them to
//! logical slide space through the stage.

use kurbo::Point;
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};

/// Mouse button identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
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
    pub const NONE: Modifiers = Modifiers {
        shift: false,
        ctrl: false,
        alt: false,
        meta: false,
    };

    pub const SHIFT: Modifiers = Modifiers {
        shift: true,
        ..Self::NONE
    };

    pub const ALT: Modifiers = Modifiers {
        alt: true,
        ..Self::NONE
    };
}

/// Pointer event type for unified mouse/touch handling.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum PointerEvent {
    Down {
        position: Point,
        button: MouseButton,
        modifiers: Modifiers,
    },
    Move {
        position: Point,
        modifiers: Modifiers,
    },
    Up {
        position: Point,
        button: MouseButton,
        modifiers: Modifiers,
    },
}

impl PointerEvent {
    pub fn position(&self) -> Point {
        match *self {
            PointerEvent::Down { position, .. }
            | PointerEvent::Move { position, .. }
            | PointerEvent::Up { position, .. } => position,
        }
    }

    pub fn modifiers(&self) -> Modifiers {
        match *self {
            PointerEvent::Down { modifiers, .. }
            | PointerEvent::Move { modifiers, .. }
            | PointerEvent::Up { modifiers, .. } => modifiers,
        }
    }
}

/// Keys the canvas reacts to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Key {
    Escape,
    Shift,
    Alt,
    Other(String),
}

impl Key {
    /// Map a DOM-style key name.
    pub fn from_name(name: &str) -> Self {
        match name {
            "Escape" | "Esc" => Key::Escape,
            "Shift" => Key::Shift,
            "Alt" | "Option" => Key::Alt,
            other => Key::Other(other.to_string()),
        }
    }
}

/// Double-click detection constants.
const DOUBLE_CLICK_TIME: Duration = Duration::from_millis(500);
const DOUBLE_CLICK_DISTANCE: f64 = 5.0;

/// Detects double clicks from a stream of left-button presses.
#[derive(Debug, Clone, Default)]
pub struct ClickTracker {
    last_click: Option<(Instant, Point)>,
}

impl ClickTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a press. Returns true when it completes a double click.
    pub fn press(&mut self, position: Point, now: Instant) -> bool {
        if let Some((last_time, last_pos)) = self.last_click {
            let elapsed = now.saturating_duration_since(last_time);
            if elapsed < DOUBLE_CLICK_TIME && (position - last_pos).hypot() < DOUBLE_CLICK_DISTANCE
            {
                // Reset so a third click starts over.
                self.last_click = None;
                return true;
            }
        }
        self.last_click = Some((now, position));
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_accessors() {
        let event = PointerEvent::Down {
            position: Point::new(10.0, 20.0),
            button: MouseButton::Left,
            modifiers: Modifiers::SHIFT,
        };
        assert_eq!(event.position(), Point::new(10.0, 20.0));
        assert!(event.modifiers().shift);
        assert!(!event.modifiers().alt);
    }

    #[test]
    fn test_key_names() {
        assert_eq!(Key::from_name("Escape"), Key::Escape);
        assert_eq!(Key::from_name("Alt"), Key::Alt);
        assert_eq!(Key::from_name("a"), Key::Other("a".to_string()));
    }

    #[test]
    fn test_double_click_detection() {
        let mut clicks = ClickTracker::new();
        let pos = Point::new(100.0, 100.0);
        let t0 = Instant::now();

        assert!(!clicks.press(pos, t0));
        assert!(clicks.press(pos, t0 + Duration::from_millis(200)));
        // Third click starts a new sequence.
        assert!(!clicks.press(pos, t0 + Duration::from_millis(300)));
    }

    #[test]
    fn test_double_click_too_far() {
        let mut clicks = ClickTracker::new();
        let t0 = Instant::now();

        assert!(!clicks.press(Point::new(100.0, 100.0), t0));
        assert!(!clicks.press(Point::new(200.0, 200.0), t0 + Duration::from_millis(100)));
    }

    #[test]
    fn test_double_click_too_slow() {
        let mut clicks = ClickTracker::new();
        let pos = Point::new(100.0, 100.0);
        let t0 = Instant::now();

        assert!(!clicks.press(pos, t0));
        assert!(!clicks.press(pos, t0 + Duration::from_millis(800)));
    }
}
