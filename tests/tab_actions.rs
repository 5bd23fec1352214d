use std::sync::{Arc, Mutex};
use std::time::Duration;

use anyhow::anyhow;
use tab_gestures::mouse_gestures::{
    GestureEvent, GestureEventSink, MockInputBackend, MouseGestureService, PointerButton,
    PointerInput, TabCommand,
};
use tab_gestures::relay::{PrivilegedRelay, TabHost, TabId};
use tab_gestures::settings::NotificationSettings;
use tab_gestures::tab_actions::{notification_text, BrowserPage, Notifier, TabActionExecutor};

#[derive(Default)]
struct RecordingPage {
    calls: Mutex<Vec<&'static str>>,
    fail: bool,
}

impl RecordingPage {
    fn record(&self, call: &'static str) -> anyhow::Result<()> {
        if let Ok(mut guard) = self.calls.lock() {
            guard.push(call);
        }
        if self.fail {
            return Err(anyhow!("navigation blocked"));
        }
        Ok(())
    }

    fn calls(&self) -> Vec<&'static str> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }
}

impl BrowserPage for RecordingPage {
    fn history_back(&self) -> anyhow::Result<()> {
        self.record("back")
    }

    fn history_forward(&self) -> anyhow::Result<()> {
        self.record("forward")
    }

    fn reload(&self) -> anyhow::Result<()> {
        self.record("reload")
    }
}

#[derive(Default)]
struct RecordingNotifier {
    messages: Mutex<Vec<(String, Duration)>>,
}

impl Notifier for RecordingNotifier {
    fn notify(&self, message: &str, duration: Duration) {
        if let Ok(mut guard) = self.messages.lock() {
            guard.push((message.to_string(), duration));
        }
    }
}

#[derive(Default)]
struct RecordingHost {
    removed: Mutex<Vec<TabId>>,
}

impl TabHost for RecordingHost {
    fn remove_tab(&self, tab: TabId) -> anyhow::Result<()> {
        if let Ok(mut guard) = self.removed.lock() {
            guard.push(tab);
        }
        Ok(())
    }
}

fn executor(
    page: Arc<RecordingPage>,
    relay: &PrivilegedRelay,
    notifier: Arc<RecordingNotifier>,
) -> TabActionExecutor {
    TabActionExecutor::with_notifier(
        page,
        relay.client(TabId(7)),
        notifier,
        NotificationSettings::default(),
    )
}

#[test]
fn history_commands_go_to_the_page() {
    let page = Arc::new(RecordingPage::default());
    let notifier = Arc::new(RecordingNotifier::default());
    let relay = PrivilegedRelay::spawn(Arc::new(RecordingHost::default()));
    let exec = executor(page.clone(), &relay, notifier.clone());

    exec.execute(TabCommand::GoBack);
    exec.execute(TabCommand::GoForward);
    exec.execute(TabCommand::ReloadTab);

    assert_eq!(page.calls(), vec!["back", "forward", "reload"]);
    let messages = notifier.messages.lock().unwrap();
    assert_eq!(messages.len(), 3);
    assert_eq!(messages[0].0, "Went back to the previous page");
    assert_eq!(messages[0].1, Duration::from_millis(2000));
}

#[test]
fn close_tab_goes_through_the_relay() {
    let page = Arc::new(RecordingPage::default());
    let notifier = Arc::new(RecordingNotifier::default());
    let host = Arc::new(RecordingHost::default());
    let mut relay = PrivilegedRelay::spawn(host.clone());
    let exec = executor(page.clone(), &relay, notifier.clone());

    exec.execute(TabCommand::CloseTab);
    relay.shutdown();

    assert!(page.calls().is_empty());
    assert_eq!(*host.removed.lock().unwrap(), vec![TabId(7)]);
    assert_eq!(
        notifier.messages.lock().unwrap()[0].0,
        notification_text(TabCommand::CloseTab)
    );
}

#[test]
fn failures_are_tolerated() {
    let page = Arc::new(RecordingPage {
        fail: true,
        ..RecordingPage::default()
    });
    let notifier = Arc::new(RecordingNotifier::default());
    let mut relay = PrivilegedRelay::spawn(Arc::new(RecordingHost::default()));
    let exec = executor(page.clone(), &relay, notifier.clone());
    relay.shutdown();

    exec.execute(TabCommand::ReloadTab);
    exec.execute(TabCommand::CloseTab);

    assert_eq!(page.calls(), vec!["reload"]);
    assert_eq!(notifier.messages.lock().unwrap().len(), 2);
}

#[test]
fn disabled_notifications_are_not_shown() {
    let page = Arc::new(RecordingPage::default());
    let notifier = Arc::new(RecordingNotifier::default());
    let relay = PrivilegedRelay::spawn(Arc::new(RecordingHost::default()));
    let exec = TabActionExecutor::with_notifier(
        page.clone(),
        relay.client(TabId(1)),
        notifier.clone(),
        NotificationSettings {
            enabled: false,
            ..NotificationSettings::default()
        },
    );

    exec.execute(TabCommand::GoBack);
    assert_eq!(page.calls(), vec!["back"]);
    assert!(notifier.messages.lock().unwrap().is_empty());
}

#[test]
fn executor_only_reacts_to_resolved_commands() {
    let page = Arc::new(RecordingPage::default());
    let notifier = Arc::new(RecordingNotifier::default());
    let relay = PrivilegedRelay::spawn(Arc::new(RecordingHost::default()));
    let exec = executor(page.clone(), &relay, notifier);

    exec.dispatch(&GestureEvent::GestureStart { x: 0.0, y: 0.0 });
    exec.dispatch(&GestureEvent::GestureEnd);
    assert!(page.calls().is_empty());

    exec.dispatch(&GestureEvent::ResolvedCommand {
        command: TabCommand::GoForward,
    });
    assert_eq!(page.calls(), vec!["forward"]);
}

#[test]
fn gesture_drives_executor_through_the_service() {
    let page = Arc::new(RecordingPage::default());
    let notifier = Arc::new(RecordingNotifier::default());
    let relay = PrivilegedRelay::spawn(Arc::new(RecordingHost::default()));
    let exec = Arc::new(executor(page.clone(), &relay, notifier));

    let (backend, _handle) = MockInputBackend::new();
    let mut service = MouseGestureService::new(Box::new(backend));
    service.subscribe(exec);
    service.start().unwrap();

    service.handle_input(PointerInput::Down {
        button: PointerButton::Secondary,
        x: 200.0,
        y: 200.0,
    });
    service.handle_input(PointerInput::Move { x: 200.0, y: 240.0 });
    service.handle_input(PointerInput::Move { x: 150.0, y: 240.0 });
    service.handle_input(PointerInput::Up {
        button: PointerButton::Secondary,
        x: 150.0,
        y: 240.0,
    });

    assert_eq!(page.calls(), vec!["back"]);
}
