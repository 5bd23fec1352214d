//! Privileged side of tab commands a page cannot perform on its own.
//!
//! Requests are queued to a worker thread and answered asynchronously; every
//! failure is logged here and reported back as an unsuccessful
//! [`RelayResponse`].

use anyhow::anyhow;
use serde::{Deserialize, Serialize};
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TabId(pub u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "camelCase")]
pub enum RelayMessage {
    CloseTab,
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelayResponse {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl RelayResponse {
    fn ok() -> Self {
        Self {
            success: true,
            error: None,
        }
    }

    fn failed(error: impl Into<String>) -> Self {
        Self {
            success: false,
            error: Some(error.into()),
        }
    }
}

/// Host process capability to manipulate tabs.
pub trait TabHost: Send + Sync {
    fn remove_tab(&self, tab: TabId) -> anyhow::Result<()>;
}

enum RelayCommand {
    Request {
        tab: TabId,
        message: RelayMessage,
        reply: Sender<RelayResponse>,
    },
    Stop,
}

/// Handle used by a single tab to reach the relay.
#[derive(Clone)]
pub struct RelayClient {
    tab: TabId,
    tx: Sender<RelayCommand>,
}

impl RelayClient {
    pub fn tab(&self) -> TabId {
        self.tab
    }

    pub fn send(&self, message: RelayMessage) -> anyhow::Result<Receiver<RelayResponse>> {
        let (reply, response) = mpsc::channel();
        self.tx
            .send(RelayCommand::Request {
                tab: self.tab,
                message,
                reply,
            })
            .map_err(|_| anyhow!("privileged relay is not running"))?;
        Ok(response)
    }

    pub fn close_tab(&self) -> anyhow::Result<Receiver<RelayResponse>> {
        self.send(RelayMessage::CloseTab)
    }

    /// Decode a raw JSON message (`{"action": "closeTab"}`) and forward it.
    pub fn send_raw(&self, json: &str) -> anyhow::Result<Receiver<RelayResponse>> {
        self.send(handle_raw(json)?)
    }
}

pub fn handle_raw(json: &str) -> anyhow::Result<RelayMessage> {
    Ok(serde_json::from_str(json)?)
}

pub struct PrivilegedRelay {
    tx: Sender<RelayCommand>,
    join: Option<JoinHandle<()>>,
}

impl PrivilegedRelay {
    pub fn spawn(host: Arc<dyn TabHost>) -> Self {
        let (tx, rx) = mpsc::channel();
        let join = thread::spawn(move || worker_loop(host, rx));
        Self {
            tx,
            join: Some(join),
        }
    }

    pub fn client(&self, tab: TabId) -> RelayClient {
        RelayClient {
            tab,
            tx: self.tx.clone(),
        }
    }

    pub fn is_running(&self) -> bool {
        self.join.is_some()
    }

    pub fn shutdown(&mut self) {
        if let Some(join) = self.join.take() {
            let _ = self.tx.send(RelayCommand::Stop);
            if join.join().is_err() {
                tracing::error!("privileged relay worker panicked");
            }
        }
    }
}

impl Drop for PrivilegedRelay {
    fn drop(&mut self) {
        self.shutdown();
    }
}

fn worker_loop(host: Arc<dyn TabHost>, rx: Receiver<RelayCommand>) {
    while let Ok(command) = rx.recv() {
        match command {
            RelayCommand::Request {
                tab,
                message,
                reply,
            } => {
                let response = process(host.as_ref(), tab, message);
                // The requester may have stopped listening.
                let _ = reply.send(response);
            }
            RelayCommand::Stop => break,
        }
    }
}

fn process(host: &dyn TabHost, tab: TabId, message: RelayMessage) -> RelayResponse {
    match message {
        RelayMessage::CloseTab => match host.remove_tab(tab) {
            Ok(()) => {
                tracing::debug!(tab = tab.0, "tab closed");
                RelayResponse::ok()
            }
            Err(err) => {
                tracing::error!(?err, tab = tab.0, "failed to close tab");
                RelayResponse::failed(err.to_string())
            }
        },
        RelayMessage::Unknown => {
            tracing::warn!(tab = tab.0, "unknown relay action");
            RelayResponse::failed("unknown action")
        }
    }
}
