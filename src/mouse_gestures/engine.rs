use crate::mouse_gestures::events::GestureEvent;
use crate::mouse_gestures::patterns::{GesturePatternTable, MatchPolicy, TabCommand};
use serde::{Deserialize, Serialize};
use std::fmt;

pub const DEFAULT_MIN_DISTANCE: f32 = 20.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub fn as_str(self) -> &'static str {
        match self {
            Direction::Up => "UP",
            Direction::Down => "DOWN",
            Direction::Left => "LEFT",
            Direction::Right => "RIGHT",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

impl From<(f32, f32)> for Point {
    fn from(value: (f32, f32)) -> Self {
        Self {
            x: value.0,
            y: value.1,
        }
    }
}

/// Classify the movement from `reference` to `sample` as one of the four
/// cardinal directions.
///
/// Returns `None` while the displacement stays below `min_distance` on both
/// axes. The dominant axis wins; when `|dx| == |dy|` the vertical axis wins.
pub fn classify_direction(reference: Point, sample: Point, min_distance: f32) -> Option<Direction> {
    let dx = sample.x - reference.x;
    let dy = sample.y - reference.y;
    let abs_x = dx.abs();
    let abs_y = dy.abs();

    if abs_x < min_distance && abs_y < min_distance {
        return None;
    }

    if abs_x > abs_y {
        Some(if dx > 0.0 {
            Direction::Right
        } else {
            Direction::Left
        })
    } else {
        Some(if dy > 0.0 {
            Direction::Down
        } else {
            Direction::Up
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct GestureSession {
    pub is_tracking: bool,
    pub reference_point: Point,
    pub current_point: Point,
    pub points: Vec<Point>,
    pub directions: Vec<Direction>,
    pub last_direction: Option<Direction>,
}

impl GestureSession {
    fn reset(&mut self) {
        self.points.clear();
        self.directions.clear();
        self.last_direction = None;
    }
}

/// Two-state recognizer (Idle / Tracking) turning pointer samples into a
/// direction sequence and, on release, a [`TabCommand`].
///
/// Every transition returns the notifications it produced, in order.
#[derive(Debug)]
pub struct GestureTracker {
    min_distance: f32,
    policy: MatchPolicy,
    session: GestureSession,
    released_path_len: usize,
}

impl Default for GestureTracker {
    fn default() -> Self {
        Self::new(DEFAULT_MIN_DISTANCE, MatchPolicy::Prefix)
    }
}

impl GestureTracker {
    pub fn new(min_distance: f32, policy: MatchPolicy) -> Self {
        Self {
            min_distance,
            policy,
            session: GestureSession::default(),
            released_path_len: 0,
        }
    }

    pub fn min_distance(&self) -> f32 {
        self.min_distance
    }

    pub fn is_tracking(&self) -> bool {
        self.session.is_tracking
    }

    pub fn session(&self) -> &GestureSession {
        &self.session
    }

    pub fn directions(&self) -> &[Direction] {
        &self.session.directions
    }

    pub fn press(&mut self, point: Point) -> Vec<GestureEvent> {
        self.session.reset();
        self.session.is_tracking = true;
        self.session.reference_point = point;
        self.session.current_point = point;
        self.session.points.push(point);
        self.released_path_len = 0;
        vec![GestureEvent::GestureStart {
            x: point.x,
            y: point.y,
        }]
    }

    pub fn move_to(&mut self, point: Point) -> Vec<GestureEvent> {
        if !self.session.is_tracking {
            return Vec::new();
        }

        self.session.current_point = point;
        self.session.points.push(point);
        let mut events = vec![GestureEvent::GestureMove {
            x: point.x,
            y: point.y,
        }];

        let Some(direction) =
            classify_direction(self.session.reference_point, point, self.min_distance)
        else {
            return events;
        };

        if self.session.last_direction != Some(direction) {
            self.session.directions.push(direction);
            self.session.last_direction = Some(direction);
            self.session.reference_point = point;
            events.push(GestureEvent::DirectionChanged {
                directions: self.session.directions.clone(),
            });
        }

        events
    }

    pub fn release(&mut self) -> Vec<GestureEvent> {
        if !self.session.is_tracking {
            return Vec::new();
        }

        self.session.is_tracking = false;
        let mut events = vec![GestureEvent::GestureEnd];

        match self.resolve() {
            Some(command) => events.push(GestureEvent::ResolvedCommand { command }),
            None if !self.session.directions.is_empty() => {
                tracing::debug!(
                    directions = %GesturePatternTable::join(&self.session.directions),
                    "unrecognized mouse gesture"
                );
            }
            None => {}
        }

        self.released_path_len = self.session.points.len();
        self.session.reset();
        events
    }

    /// Force the tracker back to Idle, discarding any partial gesture
    /// without resolving it.
    pub fn cancel(&mut self) -> Vec<GestureEvent> {
        let was_tracking = self.session.is_tracking;
        self.session.is_tracking = false;
        self.session.reset();
        self.released_path_len = 0;
        if was_tracking {
            vec![GestureEvent::GestureEnd]
        } else {
            Vec::new()
        }
    }

    pub fn resolve(&self) -> Option<TabCommand> {
        GesturePatternTable::global().resolve(&self.session.directions, self.policy)
    }

    /// Whether the native context menu should be suppressed right now.
    pub fn suppress_context_menu(&self) -> bool {
        self.session.is_tracking
            || self.session.points.len() > 1
            || self.released_path_len > 1
    }

    /// Like [`suppress_context_menu`](Self::suppress_context_menu), but
    /// forgets the just-ended gesture so only its own menu is suppressed.
    pub fn take_context_menu_suppression(&mut self) -> bool {
        let suppress = self.suppress_context_menu();
        self.released_path_len = 0;
        suppress
    }
}
