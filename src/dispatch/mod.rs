//! Request intake: from raw input line to validated queue entry.

use std::sync::Arc;
use thiserror::Error;

use crate::alarm::AlarmService;
use crate::core::request::Request;
use crate::events::{Event, EventBus};
use crate::parse::{self, Command, ParseError};
use crate::queue::validate::ValidationError;
use crate::queue::InsertOutcome;

/// Errors surfaced by [`Dispatcher::dispatch_line`].
///
/// Both variants are recoverable: the line is discarded and the intake
/// loop continues.
#[derive(Debug, Error)]
pub enum DispatchError {
    /// The line did not match the request grammar.
    #[error("bad command: {0}")]
    Parse(#[from] ParseError),

    /// The request failed validation against the queue's contents.
    #[error("request rejected: {0}")]
    Rejected(#[from] ValidationError),
}

/// Owns one request at a time: parses it, builds it, and hands it to the
/// alarm service.
pub struct Dispatcher {
    service: Arc<AlarmService>,
    events: Arc<EventBus>,
}

impl Dispatcher {
    /// Create a dispatcher over the shared service.
    pub fn new(service: Arc<AlarmService>, events: Arc<EventBus>) -> Self {
        Self { service, events }
    }

    /// Parse one input line, validate it, and queue the resulting request.
    ///
    /// Every rejection, whether grammatical or rule-based, emits a
    /// `RequestRejected` event before the error is returned.
    pub async fn dispatch_line(&self, line: &str) -> Result<InsertOutcome, DispatchError> {
        let command = match parse::parse_line(line) {
            Ok(command) => command,
            Err(error) => {
                self.events
                    .emit(Event::request_rejected(None, error.to_string()))
                    .await;
                return Err(error.into());
            }
        };

        Ok(self.service.submit(build_request(command)).await?)
    }
}

fn build_request(command: Command) -> Request {
    match command {
        Command::Schedule {
            delay_seconds,
            message_type,
            message_number,
            message,
        } => Request::schedule(delay_seconds, message_type, message_number, message),
        Command::CreateThread { message_type } => Request::create_thread(message_type),
        Command::Cancel { message_number } => Request::cancel(message_number),
        Command::Pause { message_type } => Request::pause(message_type),
        Command::Resume { message_type } => Request::resume(message_type),
    }
}
