//! Alarm request values.
//!
//! A [`Request`] is immutable once constructed. Its deadline is computed at
//! build time from the requested delay, so the worker can order requests
//! without knowing how long they have already been queued.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;
use tokio::time::Instant;

use crate::core::types::{MessageNumber, MessageType};

/// Maximum payload length of a schedule message, in bytes.
pub const MAX_MESSAGE_BYTES: usize = 127;

/// The five request kinds accepted by the scheduler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RequestKind {
    /// Fire a timed message after a delay.
    Schedule,
    /// Control request: create a worker-thread group.
    CreateThread,
    /// Control request: invalidate a specific schedule by message number.
    Cancel,
    /// Control request: pause a worker-thread group.
    Pause,
    /// Control request: resume a paused worker-thread group.
    Resume,
}

impl fmt::Display for RequestKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RequestKind::Schedule => "schedule",
            RequestKind::CreateThread => "create-thread",
            RequestKind::Cancel => "cancel",
            RequestKind::Pause => "pause",
            RequestKind::Resume => "resume",
        };
        write!(f, "{}", name)
    }
}

/// A single queued unit of work.
///
/// Control kinds carry no delay in the grammar and are built due
/// immediately; only `Schedule` requests carry a payload message.
#[derive(Debug, Clone)]
pub struct Request {
    kind: RequestKind,
    delay_seconds: u32,
    message_type: MessageType,
    message_number: MessageNumber,
    message: String,
    /// Wall-clock creation time, kept for display only.
    created_at: DateTime<Utc>,
    /// Monotonic expiry; the queue's sort key.
    deadline: Instant,
}

impl Request {
    fn build(
        kind: RequestKind,
        delay_seconds: u32,
        message_type: MessageType,
        message_number: MessageNumber,
        message: String,
    ) -> Self {
        Self {
            kind,
            delay_seconds,
            message_type,
            message_number,
            message,
            created_at: Utc::now(),
            deadline: Instant::now() + Duration::from_secs(u64::from(delay_seconds)),
        }
    }

    /// Create a schedule request firing `delay_seconds` from now.
    pub fn schedule(
        delay_seconds: u32,
        message_type: MessageType,
        message_number: MessageNumber,
        message: impl Into<String>,
    ) -> Self {
        Self::build(
            RequestKind::Schedule,
            delay_seconds,
            message_type,
            message_number,
            message.into(),
        )
    }

    /// Create a create-thread control request for a message type.
    pub fn create_thread(message_type: MessageType) -> Self {
        Self::build(
            RequestKind::CreateThread,
            0,
            message_type,
            MessageNumber::new(0),
            String::new(),
        )
    }

    /// Create a cancel control request for a message number.
    pub fn cancel(message_number: MessageNumber) -> Self {
        Self::build(
            RequestKind::Cancel,
            0,
            MessageType::new(0),
            message_number,
            String::new(),
        )
    }

    /// Create a pause control request for a message type.
    pub fn pause(message_type: MessageType) -> Self {
        Self::build(
            RequestKind::Pause,
            0,
            message_type,
            MessageNumber::new(0),
            String::new(),
        )
    }

    /// Create a resume control request for a message type.
    pub fn resume(message_type: MessageType) -> Self {
        Self::build(
            RequestKind::Resume,
            0,
            message_type,
            MessageNumber::new(0),
            String::new(),
        )
    }

    /// The request kind.
    pub fn kind(&self) -> RequestKind {
        self.kind
    }

    /// The requested delay in whole seconds.
    pub fn delay_seconds(&self) -> u32 {
        self.delay_seconds
    }

    /// The worker-thread group this request refers to.
    pub fn message_type(&self) -> MessageType {
        self.message_type
    }

    /// The alarm instance this request refers to.
    pub fn message_number(&self) -> MessageNumber {
        self.message_number
    }

    /// The payload printed when a schedule request fires.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Wall-clock time this request was built.
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// The instant this request becomes due.
    pub fn deadline(&self) -> Instant {
        self.deadline
    }

    /// Override the computed deadline; only for deterministic queue tests.
    #[cfg(test)]
    pub(crate) fn with_deadline(mut self, deadline: Instant) -> Self {
        self.deadline = deadline;
        self
    }
}
