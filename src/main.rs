use std::io::{BufRead, Write};
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use tab_gestures::mouse_gestures::overlay::LoggingOverlayBackend;
use tab_gestures::mouse_gestures::{
    GestureEvent, GestureEventSink, InputBackend, MouseGestureService, PointerInput,
    TrailOverlay,
};
use tab_gestures::settings::Settings;

/// Input arrives on stdin, so there is nothing to register with a host.
#[derive(Default)]
struct StdinBackend {
    installed: bool,
}

impl InputBackend for StdinBackend {
    fn install(&mut self) -> anyhow::Result<()> {
        self.installed = true;
        Ok(())
    }

    fn uninstall(&mut self) -> anyhow::Result<()> {
        self.installed = false;
        Ok(())
    }

    fn is_installed(&self) -> bool {
        self.installed
    }
}

struct JsonLineSink {
    out: Mutex<std::io::Stdout>,
}

impl GestureEventSink for JsonLineSink {
    fn dispatch(&self, event: &GestureEvent) {
        let line = match serde_json::to_string(event) {
            Ok(line) => line,
            Err(err) => {
                tracing::error!(?err, "failed to serialize gesture event");
                return;
            }
        };
        if let Ok(mut out) = self.out.lock() {
            if let Err(err) = writeln!(out, "{line}") {
                tracing::error!(?err, "failed to write gesture event");
            }
        }
    }
}

fn main() -> anyhow::Result<()> {
    let settings_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "settings.json".into());
    let settings = Settings::load(&settings_path)?;
    tab_gestures::logging::init(
        settings.debug_logging,
        settings.log_file.as_ref().map(PathBuf::from),
    );

    let mut service =
        MouseGestureService::with_settings(Box::new(StdinBackend::default()), &settings.gestures);
    service.subscribe(Arc::new(JsonLineSink {
        out: Mutex::new(std::io::stdout()),
    }));
    let trail = Arc::new(TrailOverlay::new(
        Box::new(LoggingOverlayBackend),
        settings.trail.clone(),
    ));
    service.subscribe(trail.clone());
    service.start()?;

    let stdin = std::io::stdin();
    for (idx, line) in stdin.lock().lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        match serde_json::from_str::<PointerInput>(&line) {
            Ok(input) => {
                service.handle_input(input);
            }
            Err(err) => tracing::warn!(line = idx + 1, %err, "skipping malformed input"),
        }
    }

    service.shutdown();
    trail.shutdown();
    Ok(())
}
