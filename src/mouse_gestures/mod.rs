pub mod engine;
pub mod events;
pub mod overlay;
pub mod patterns;
mod service;

pub use engine::{classify_direction, Direction, GestureSession, GestureTracker, Point};
pub use events::{GestureEvent, GestureEventBus, GestureEventSink, ListenerId};
pub use overlay::{format_direction_label, OverlayBackend, TrailOverlay, TrailPointId, TrailStyle};
pub use patterns::{GesturePatternTable, MatchPolicy, TabCommand};
pub use service::{
    InputBackend, InputDisposition, MockInputBackend, MockInputHandle, MouseGestureService,
    PointerButton, PointerInput,
};
