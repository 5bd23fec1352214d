use crate::mouse_gestures::events::{GestureEvent, GestureEventSink};
use crate::mouse_gestures::patterns::TabCommand;
use crate::relay::RelayClient;
use crate::settings::NotificationSettings;
use std::sync::Arc;
use std::time::Duration;

/// Navigation primitives of the page the gestures are drawn on.
pub trait BrowserPage: Send + Sync {
    fn history_back(&self) -> anyhow::Result<()>;
    fn history_forward(&self) -> anyhow::Result<()>;
    fn reload(&self) -> anyhow::Result<()>;
}

/// Transient feedback shown after a command runs.
pub trait Notifier: Send + Sync {
    fn notify(&self, message: &str, duration: Duration);
}

#[derive(Debug, Default)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, message: &str, duration: Duration) {
        tracing::info!(duration_ms = duration.as_millis() as u64, "{message}");
    }
}

pub fn notification_text(command: TabCommand) -> &'static str {
    match command {
        TabCommand::CloseTab => "Closed the tab",
        TabCommand::GoBack => "Went back to the previous page",
        TabCommand::GoForward => "Went forward to the next page",
        TabCommand::ReloadTab => "Reloaded the page",
    }
}

pub struct TabActionExecutor {
    page: Arc<dyn BrowserPage>,
    relay: RelayClient,
    notifier: Arc<dyn Notifier>,
    notification: NotificationSettings,
}

impl TabActionExecutor {
    pub fn new(page: Arc<dyn BrowserPage>, relay: RelayClient) -> Self {
        Self::with_notifier(
            page,
            relay,
            Arc::new(TracingNotifier),
            NotificationSettings::default(),
        )
    }

    pub fn with_notifier(
        page: Arc<dyn BrowserPage>,
        relay: RelayClient,
        notifier: Arc<dyn Notifier>,
        notification: NotificationSettings,
    ) -> Self {
        Self {
            page,
            relay,
            notifier,
            notification,
        }
    }

    pub fn execute(&self, command: TabCommand) {
        tracing::info!(%command, "executing tab command");
        let result = match command {
            TabCommand::CloseTab => self.relay.close_tab().map(|_| ()),
            TabCommand::GoBack => self.page.history_back(),
            TabCommand::GoForward => self.page.history_forward(),
            TabCommand::ReloadTab => self.page.reload(),
        };
        if let Err(err) = result {
            tracing::error!(?err, %command, "tab command failed");
        }

        if self.notification.enabled {
            self.notifier.notify(
                notification_text(command),
                Duration::from_millis(self.notification.duration_ms),
            );
        }
    }
}

impl GestureEventSink for TabActionExecutor {
    fn dispatch(&self, event: &GestureEvent) {
        if let GestureEvent::ResolvedCommand { command } = event {
            self.execute(*command);
        }
    }
}
