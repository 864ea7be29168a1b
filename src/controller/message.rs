use chrono::{DateTime, Local};
use std::time::Duration;
use tokio::sync::mpsc::UnboundedSender;
use tokio::task::JoinHandle;

use super::events::ControllerEvent;

/// Severity tag of a status message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Info,
    Success,
    Error,
}

impl Severity {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Info => "info",
            Self::Success => "success",
            Self::Error => "error",
        }
    }
}

/// A message currently on display
#[derive(Debug, Clone, PartialEq)]
pub struct StatusMessage {
    /// Identity of this message; its expiry timer carries the same id
    pub id: u64,
    pub text: String,
    pub severity: Severity,
    pub shown_at: DateTime<Local>,
}

/// The single message slot.
///
/// Each message owns one scheduled clear. Setting a new message aborts the
/// previous timer, and an expiry only clears the slot when its id still
/// matches the message on display.
#[derive(Debug, Default)]
pub struct MessageSlot {
    current: Option<StatusMessage>,
    next_id: u64,
    timer: Option<JoinHandle<()>>,
}

impl MessageSlot {
    /// Show `text` and schedule its removal after `ttl`
    pub fn set(
        &mut self,
        text: impl Into<String>,
        severity: Severity,
        ttl: Duration,
        events: &UnboundedSender<ControllerEvent>,
    ) -> &StatusMessage {
        self.cancel_timer();

        self.next_id += 1;
        let id = self.next_id;

        let events = events.clone();
        self.timer = Some(tokio::spawn(async move {
            tokio::time::sleep(ttl).await;
            let _ = events.send(ControllerEvent::MessageExpired { id });
        }));

        self.current.insert(StatusMessage {
            id,
            text: text.into(),
            severity,
            shown_at: Local::now(),
        })
    }

    /// Handle a fired timer. Returns true when the slot was cleared.
    pub fn expire(&mut self, id: u64) -> bool {
        match &self.current {
            Some(message) if message.id == id => {
                self.current = None;
                self.timer = None;
                true
            }
            _ => false,
        }
    }

    /// Remove the message immediately
    pub fn clear(&mut self) {
        self.cancel_timer();
        self.current = None;
    }

    pub fn current(&self) -> Option<&StatusMessage> {
        self.current.as_ref()
    }

    fn cancel_timer(&mut self) {
        if let Some(timer) = self.timer.take() {
            timer.abort();
        }
    }
}

impl Drop for MessageSlot {
    fn drop(&mut self) {
        self.cancel_timer();
    }
}
