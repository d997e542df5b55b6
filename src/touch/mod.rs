// Purpose: touch events, per-touch voice sessions and the controller that
// drives voices from touch phases

pub mod controller;
pub mod session;

pub use controller::{TouchOutcome, TouchSurfaceController};
pub use session::{SessionVoice, SessionVoices, TouchSession, TouchSessionTable};

/// Identity of one contact, assigned by the event source.
///
/// Stable from begin to end/cancel and never shared by two contacts that are
/// down at the same time. It may be reused once the contact has ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TouchId(pub u64);

impl From<u64> for TouchId {
    fn from(value: u64) -> Self {
        Self(value)
    }
}

/// Surface coordinates, x to the right and y downwards.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TouchPhase {
    Began,
    Moved,
    Ended,
    Cancelled,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TouchEvent {
    pub id: TouchId,
    pub phase: TouchPhase,
    pub position: Point,
    /// Force reading, when the device reports one.
    pub pressure: Option<f64>,
}

impl TouchEvent {
    pub fn new(id: TouchId, phase: TouchPhase, position: Point) -> Self {
        Self {
            id,
            phase,
            position,
            pressure: None,
        }
    }

    pub fn began(id: u64, x: f64, y: f64) -> Self {
        Self::new(TouchId(id), TouchPhase::Began, Point::new(x, y))
    }

    pub fn moved(id: u64, x: f64, y: f64) -> Self {
        Self::new(TouchId(id), TouchPhase::Moved, Point::new(x, y))
    }

    pub fn ended(id: u64, x: f64, y: f64) -> Self {
        Self::new(TouchId(id), TouchPhase::Ended, Point::new(x, y))
    }

    pub fn cancelled(id: u64) -> Self {
        Self::new(TouchId(id), TouchPhase::Cancelled, Point::default())
    }

    pub fn with_pressure(mut self, pressure: f64) -> Self {
        self.pressure = Some(pressure);
        self
    }
}
