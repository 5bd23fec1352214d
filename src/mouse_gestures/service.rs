use crate::mouse_gestures::engine::{GestureTracker, Point};
use crate::mouse_gestures::events::{GestureEvent, GestureEventBus, GestureEventSink, ListenerId};
use crate::settings::GestureSettings;
use anyhow::anyhow;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// Pointer button using DOM `MouseEvent.button` numbering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "i16", into = "i16")]
pub enum PointerButton {
    Primary,
    Auxiliary,
    Secondary,
    Back,
    Forward,
    Other(i16),
}

impl From<i16> for PointerButton {
    fn from(code: i16) -> Self {
        match code {
            0 => PointerButton::Primary,
            1 => PointerButton::Auxiliary,
            2 => PointerButton::Secondary,
            3 => PointerButton::Back,
            4 => PointerButton::Forward,
            other => PointerButton::Other(other),
        }
    }
}

impl From<PointerButton> for i16 {
    fn from(button: PointerButton) -> Self {
        match button {
            PointerButton::Primary => 0,
            PointerButton::Auxiliary => 1,
            PointerButton::Secondary => 2,
            PointerButton::Back => 3,
            PointerButton::Forward => 4,
            PointerButton::Other(code) => code,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum PointerInput {
    Down { button: PointerButton, x: f32, y: f32 },
    Move { x: f32, y: f32 },
    Up { button: PointerButton, x: f32, y: f32 },
    ContextMenu,
    Blur,
}

/// What the host should do with the native default action of an input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct InputDisposition {
    pub prevent_default: bool,
}

impl InputDisposition {
    fn prevent() -> Self {
        Self {
            prevent_default: true,
        }
    }
}

/// Registration of the host's pointer listeners.
pub trait InputBackend: Send {
    fn install(&mut self) -> anyhow::Result<()>;
    fn uninstall(&mut self) -> anyhow::Result<()>;
    fn is_installed(&self) -> bool;
}

pub struct MouseGestureService {
    tracker: GestureTracker,
    bus: GestureEventBus,
    backend: Box<dyn InputBackend>,
    running: bool,
}

impl MouseGestureService {
    pub fn new(backend: Box<dyn InputBackend>) -> Self {
        Self::with_tracker(backend, GestureTracker::default())
    }

    pub fn with_settings(backend: Box<dyn InputBackend>, settings: &GestureSettings) -> Self {
        Self::with_tracker(
            backend,
            GestureTracker::new(settings.min_distance(), settings.match_policy),
        )
    }

    pub fn with_tracker(backend: Box<dyn InputBackend>, tracker: GestureTracker) -> Self {
        Self {
            tracker,
            bus: GestureEventBus::new(),
            backend,
            running: false,
        }
    }

    pub fn subscribe(&mut self, sink: Arc<dyn GestureEventSink>) -> ListenerId {
        self.bus.subscribe(sink)
    }

    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        self.bus.unsubscribe(id)
    }

    pub fn tracker(&self) -> &GestureTracker {
        &self.tracker
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn start(&mut self) -> anyhow::Result<()> {
        if self.running {
            return Ok(());
        }
        self.backend.install()?;
        self.running = true;
        tracing::debug!("mouse gesture listeners installed");
        Ok(())
    }

    /// Deregister input listeners and drop any in-progress gesture.
    pub fn shutdown(&mut self) {
        if !self.running && !self.backend.is_installed() {
            return;
        }
        if let Err(err) = self.backend.uninstall() {
            tracing::error!(?err, "failed to uninstall mouse gesture listeners");
        }
        self.running = false;
        self.cancel();
    }

    /// Force Idle, e.g. when the window loses focus.
    pub fn cancel(&mut self) {
        let events = self.tracker.cancel();
        self.publish(&events);
    }

    pub fn handle_input(&mut self, input: PointerInput) -> InputDisposition {
        if !self.running {
            tracing::debug!(?input, "mouse gesture service stopped; input ignored");
            return InputDisposition::default();
        }

        match input {
            PointerInput::Down { button, x, y } => {
                if button != PointerButton::Secondary {
                    return InputDisposition::default();
                }
                let events = self.tracker.press(Point::new(x, y));
                self.publish(&events);
                InputDisposition::prevent()
            }
            PointerInput::Move { x, y } => {
                let events = self.tracker.move_to(Point::new(x, y));
                self.publish(&events);
                InputDisposition::default()
            }
            PointerInput::Up { button, .. } => {
                if button != PointerButton::Secondary {
                    return InputDisposition::default();
                }
                let events = self.tracker.release();
                self.publish(&events);
                InputDisposition::default()
            }
            PointerInput::ContextMenu => InputDisposition {
                prevent_default: self.tracker.take_context_menu_suppression(),
            },
            PointerInput::Blur => {
                self.cancel();
                InputDisposition::default()
            }
        }
    }

    fn publish(&self, events: &[GestureEvent]) {
        for event in events {
            self.bus.publish(event);
        }
    }
}

impl Drop for MouseGestureService {
    fn drop(&mut self) {
        self.shutdown();
    }
}

#[derive(Clone)]
pub struct MockInputBackend {
    state: Arc<MockInputState>,
}

#[derive(Default)]
struct MockInputState {
    install_count: AtomicUsize,
    uninstall_count: AtomicUsize,
    installed: Mutex<bool>,
    fail_install: Mutex<bool>,
}

impl MockInputBackend {
    pub fn new() -> (Self, MockInputHandle) {
        let state = Arc::new(MockInputState::default());
        (
            Self {
                state: Arc::clone(&state),
            },
            MockInputHandle { state },
        )
    }
}

impl InputBackend for MockInputBackend {
    fn install(&mut self) -> anyhow::Result<()> {
        if *self.state.fail_install.lock().map_err(|_| anyhow!("lock"))? {
            return Err(anyhow!("listener registration refused"));
        }
        let mut installed = self.state.installed.lock().map_err(|_| anyhow!("lock"))?;
        if !*installed {
            self.state.install_count.fetch_add(1, Ordering::SeqCst);
            *installed = true;
        }
        Ok(())
    }

    fn uninstall(&mut self) -> anyhow::Result<()> {
        let mut installed = self.state.installed.lock().map_err(|_| anyhow!("lock"))?;
        if *installed {
            self.state.uninstall_count.fetch_add(1, Ordering::SeqCst);
        }
        *installed = false;
        Ok(())
    }

    fn is_installed(&self) -> bool {
        self.state
            .installed
            .lock()
            .map(|guard| *guard)
            .unwrap_or(false)
    }
}

pub struct MockInputHandle {
    state: Arc<MockInputState>,
}

impl MockInputHandle {
    pub fn install_count(&self) -> usize {
        self.state.install_count.load(Ordering::SeqCst)
    }

    pub fn uninstall_count(&self) -> usize {
        self.state.uninstall_count.load(Ordering::SeqCst)
    }

    pub fn is_installed(&self) -> bool {
        self.state
            .installed
            .lock()
            .map(|guard| *guard)
            .unwrap_or(false)
    }

    pub fn set_fail_install(&self, fail: bool) {
        if let Ok(mut guard) = self.state.fail_install.lock() {
            *guard = fail;
        }
    }
}
