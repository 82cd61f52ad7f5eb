//! Lifecycle events and event handling.
//!
//! Every externally visible action of the scheduler (a request queued,
//! rejected, or fired) is emitted as an [`Event`] so the core never writes
//! to the terminal itself.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tokio::sync::RwLock;
use tokio::time::Instant;

use crate::core::request::RequestKind;
use crate::core::types::{MessageNumber, MessageType};

/// Events emitted by the dispatcher, service, and worker.
#[derive(Debug, Clone)]
pub enum Event {
    /// A request passed validation and joined the alarm queue.
    RequestQueued {
        kind: RequestKind,
        message_type: MessageType,
        message_number: MessageNumber,
        /// Wall-clock insertion time.
        queued_at: DateTime<Utc>,
        /// True when a queued schedule with the same number was superseded.
        replaced: bool,
        timestamp: Instant,
    },

    /// A request was rejected before touching the queue.
    RequestRejected {
        /// The parsed kind, or `None` when the line itself was malformed.
        kind: Option<RequestKind>,
        /// Which precondition failed, and for which identifier.
        reason: String,
        timestamp: Instant,
    },

    /// A schedule request reached its deadline and fired.
    AlarmFired {
        message_number: MessageNumber,
        delay_seconds: u32,
        message: String,
        timestamp: Instant,
    },

    /// A control request reached its deadline and left the queue.
    ControlExpired {
        kind: RequestKind,
        message_type: MessageType,
        message_number: MessageNumber,
        timestamp: Instant,
    },
}

impl Event {
    /// Get the timestamp of the event.
    pub fn timestamp(&self) -> Instant {
        match self {
            Event::RequestQueued { timestamp, .. } => *timestamp,
            Event::RequestRejected { timestamp, .. } => *timestamp,
            Event::AlarmFired { timestamp, .. } => *timestamp,
            Event::ControlExpired { timestamp, .. } => *timestamp,
        }
    }

    /// Create a RequestQueued event.
    pub fn request_queued(
        kind: RequestKind,
        message_type: MessageType,
        message_number: MessageNumber,
        queued_at: DateTime<Utc>,
        replaced: bool,
    ) -> Self {
        Event::RequestQueued {
            kind,
            message_type,
            message_number,
            queued_at,
            replaced,
            timestamp: Instant::now(),
        }
    }

    /// Create a RequestRejected event.
    pub fn request_rejected(kind: Option<RequestKind>, reason: impl Into<String>) -> Self {
        Event::RequestRejected {
            kind,
            reason: reason.into(),
            timestamp: Instant::now(),
        }
    }

    /// Create an AlarmFired event.
    pub fn alarm_fired(
        message_number: MessageNumber,
        delay_seconds: u32,
        message: impl Into<String>,
    ) -> Self {
        Event::AlarmFired {
            message_number,
            delay_seconds,
            message: message.into(),
            timestamp: Instant::now(),
        }
    }

    /// Create a ControlExpired event.
    pub fn control_expired(
        kind: RequestKind,
        message_type: MessageType,
        message_number: MessageNumber,
    ) -> Self {
        Event::ControlExpired {
            kind,
            message_type,
            message_number,
            timestamp: Instant::now(),
        }
    }
}

/// Handler for receiving scheduler events.
#[async_trait]
pub trait EventHandler: Send + Sync {
    /// Handle an event.
    async fn handle(&self, event: &Event);
}

/// Event bus for distributing events to registered handlers.
pub struct EventBus {
    handlers: RwLock<Vec<Arc<dyn EventHandler>>>,
}

impl EventBus {
    /// Create a new event bus with no handlers.
    pub fn new() -> Self {
        Self {
            handlers: RwLock::new(Vec::new()),
        }
    }

    /// Register an event handler.
    pub async fn register(&self, handler: Arc<dyn EventHandler>) {
        let mut handlers = self.handlers.write().await;
        handlers.push(handler);
    }

    /// Emit an event to all registered handlers.
    pub async fn emit(&self, event: Event) {
        let handlers = self.handlers.read().await;
        for handler in handlers.iter() {
            handler.handle(&event).await;
        }
    }

    /// Get the number of registered handlers.
    pub async fn handler_count(&self) -> usize {
        self.handlers.read().await.len()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}
