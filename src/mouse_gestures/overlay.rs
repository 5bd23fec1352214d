use crate::mouse_gestures::engine::{Direction, Point};
use crate::mouse_gestures::events::{GestureEvent, GestureEventSink};
use crate::settings::TrailSettings;
use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::{Duration, Instant};

pub const LABEL_SEPARATOR: &str = " → ";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TrailPointId(pub u64);

#[derive(Debug, Clone, PartialEq)]
pub struct TrailStyle {
    pub point_size: f32,
    pub point_color: String,
}

/// Drawing surface for the gesture trail and the direction label.
pub trait OverlayBackend: Send {
    fn add_point(&mut self, id: TrailPointId, point: Point, style: &TrailStyle);
    fn fade_point(&mut self, id: TrailPointId);
    fn remove_point(&mut self, id: TrailPointId);
    fn show_label(&mut self, text: &str);
    fn hide_label(&mut self);
}

/// Backend for hosts without a drawing surface; reports overlay changes as
/// trace events.
#[derive(Debug, Default)]
pub struct LoggingOverlayBackend;

impl OverlayBackend for LoggingOverlayBackend {
    fn add_point(&mut self, id: TrailPointId, point: Point, _style: &TrailStyle) {
        tracing::trace!(id = id.0, x = point.x, y = point.y, "trail point added");
    }

    fn fade_point(&mut self, id: TrailPointId) {
        tracing::trace!(id = id.0, "trail point fading");
    }

    fn remove_point(&mut self, id: TrailPointId) {
        tracing::trace!(id = id.0, "trail point removed");
    }

    fn show_label(&mut self, text: &str) {
        tracing::debug!(label = text, "direction label shown");
    }

    fn hide_label(&mut self) {
        tracing::debug!("direction label hidden");
    }
}

pub fn format_direction_label(directions: &[Direction]) -> String {
    directions
        .iter()
        .map(|dir| dir.as_str())
        .collect::<Vec<_>>()
        .join(LABEL_SEPARATOR)
}

#[derive(Debug)]
struct TrailPoint {
    id: TrailPointId,
    fade_at: Instant,
    remove_at: Instant,
    faded: bool,
}

struct TrailState {
    backend: Box<dyn OverlayBackend>,
    points: VecDeque<TrailPoint>,
    next_id: u64,
    label_visible: bool,
    clear_at: Option<Instant>,
    hide_label_at: Option<Instant>,
}

impl TrailState {
    fn clear_trail(&mut self) {
        for point in self.points.drain(..) {
            self.backend.remove_point(point.id);
        }
    }

    fn hide_label(&mut self) {
        if self.label_visible {
            self.backend.hide_label();
            self.label_visible = false;
        }
    }
}

pub struct TrailOverlay {
    settings: TrailSettings,
    style: TrailStyle,
    state: Mutex<TrailState>,
}

impl TrailOverlay {
    pub fn new(backend: Box<dyn OverlayBackend>, settings: TrailSettings) -> Self {
        let style = TrailStyle {
            point_size: settings.point_size,
            point_color: settings.point_color.clone(),
        };
        Self {
            settings,
            style,
            state: Mutex::new(TrailState {
                backend,
                points: VecDeque::new(),
                next_id: 0,
                label_visible: false,
                clear_at: None,
                hide_label_at: None,
            }),
        }
    }

    pub fn style(&self) -> &TrailStyle {
        &self.style
    }

    pub fn point_count(&self) -> usize {
        self.state.lock().map(|s| s.points.len()).unwrap_or(0)
    }

    pub fn label_visible(&self) -> bool {
        self.state.lock().map(|s| s.label_visible).unwrap_or(false)
    }

    pub fn handle_at(&self, event: &GestureEvent, now: Instant) {
        let Ok(mut state) = self.state.lock() else {
            tracing::error!("trail overlay state poisoned");
            return;
        };

        match event {
            GestureEvent::GestureStart { .. } => {
                state.clear_at = None;
                state.hide_label_at = None;
                state.clear_trail();
            }
            GestureEvent::GestureMove { x, y } => {
                let id = TrailPointId(state.next_id);
                state.next_id += 1;
                state.backend.add_point(id, Point::new(*x, *y), &self.style);
                let fade_at = now + Duration::from_millis(self.settings.point_lifetime_ms);
                state.points.push_back(TrailPoint {
                    id,
                    fade_at,
                    remove_at: fade_at + Duration::from_millis(self.settings.fade_ms),
                    faded: false,
                });
                while state.points.len() > self.settings.max_points {
                    if let Some(oldest) = state.points.pop_front() {
                        state.backend.remove_point(oldest.id);
                    }
                }
            }
            GestureEvent::DirectionChanged { directions } => {
                let text = format_direction_label(directions);
                state.backend.show_label(&text);
                state.label_visible = true;
                state.hide_label_at = None;
            }
            GestureEvent::GestureEnd => {
                state.clear_at = Some(now + Duration::from_millis(self.settings.clear_delay_ms));
                state.hide_label_at =
                    Some(now + Duration::from_millis(self.settings.label_hide_ms));
            }
            GestureEvent::ResolvedCommand { .. } => {}
        }
    }

    /// Apply fades, removals and delayed clears that are due at `now`.
    pub fn tick(&self, now: Instant) {
        let Ok(mut state) = self.state.lock() else {
            return;
        };

        if state.clear_at.is_some_and(|at| now >= at) {
            state.clear_at = None;
            state.clear_trail();
        }
        if state.hide_label_at.is_some_and(|at| now >= at) {
            state.hide_label_at = None;
            state.hide_label();
        }

        let TrailState {
            backend, points, ..
        } = &mut *state;
        for point in points.iter_mut() {
            if !point.faded && now >= point.fade_at {
                backend.fade_point(point.id);
                point.faded = true;
            }
        }
        while points.front().is_some_and(|p| now >= p.remove_at) {
            if let Some(expired) = points.pop_front() {
                backend.remove_point(expired.id);
            }
        }
    }

    pub fn shutdown(&self) {
        if let Ok(mut state) = self.state.lock() {
            state.clear_at = None;
            state.hide_label_at = None;
            state.clear_trail();
            state.hide_label();
        }
    }
}

impl GestureEventSink for TrailOverlay {
    fn dispatch(&self, event: &GestureEvent) {
        let now = Instant::now();
        self.tick(now);
        self.handle_at(event, now);
    }
}
