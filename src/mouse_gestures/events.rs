use crate::mouse_gestures::engine::Direction;
use crate::mouse_gestures::patterns::TabCommand;
use serde::{Deserialize, Serialize};
use slab::Slab;
use std::sync::Arc;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum GestureEvent {
    GestureStart { x: f32, y: f32 },
    GestureMove { x: f32, y: f32 },
    #[serde(rename = "gesture-direction-changed")]
    DirectionChanged { directions: Vec<Direction> },
    GestureEnd,
    ResolvedCommand { command: TabCommand },
}

impl GestureEvent {
    pub fn name(&self) -> &'static str {
        match self {
            GestureEvent::GestureStart { .. } => "gesture-start",
            GestureEvent::GestureMove { .. } => "gesture-move",
            GestureEvent::DirectionChanged { .. } => "gesture-direction-changed",
            GestureEvent::GestureEnd => "gesture-end",
            GestureEvent::ResolvedCommand { .. } => "resolved-command",
        }
    }
}

pub trait GestureEventSink: Send + Sync {
    fn dispatch(&self, event: &GestureEvent);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(usize);

/// Subscribers for gesture notifications, invoked in subscription order.
#[derive(Default)]
pub struct GestureEventBus {
    listeners: Slab<Arc<dyn GestureEventSink>>,
}

impl GestureEventBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&mut self, sink: Arc<dyn GestureEventSink>) -> ListenerId {
        ListenerId(self.listeners.insert(sink))
    }

    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        self.listeners.try_remove(id.0).is_some()
    }

    pub fn publish(&self, event: &GestureEvent) {
        for (_, sink) in self.listeners.iter() {
            sink.dispatch(event);
        }
    }

    pub fn clear(&mut self) {
        self.listeners.clear();
    }

    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }
}
