//! Input event types fed to the drawing engine by the host surface

/// Pointer position in canvas pixels
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PhysicalPosition {
    pub x: f64,
    pub y: f64,
}

impl PhysicalPosition {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ElementState {
    Pressed,
    Released,
}

/// Keys the engine reacts to
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Key {
    Delete,
    Backspace,
    Enter,
    Escape,
    Other,
}

impl Key {
    /// Map a DOM `KeyboardEvent.key` value
    pub fn from_dom(key: &str) -> Self {
        match key {
            "Delete" | "Del" => Key::Delete,
            "Backspace" => Key::Backspace,
            "Enter" => Key::Enter,
            "Escape" | "Esc" => Key::Escape,
            _ => Key::Other,
        }
    }
}

/// Events consumed by the selection controller.
///
/// `timestamp_ms` is a monotonic clock reading (the browser's
/// `performance.now()`), used by the post-commit guard. Only events that can
/// commit a drawing carry one.
#[derive(Clone, Debug, PartialEq)]
pub enum InputEvent {
    PointerInput {
        state: ElementState,
        position: PhysicalPosition,
        timestamp_ms: f64,
    },
    PointerMoved {
        position: PhysicalPosition,
    },
    DoubleClick {
        position: PhysicalPosition,
    },
    KeyDown {
        key: Key,
        timestamp_ms: f64,
    },
}
