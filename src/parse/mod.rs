//! Request line grammar.
//!
//! Turns one raw input line into a typed [`Command`]. Keyword prefixes are
//! case-sensitive. The grammar:
//!
//! - `<seconds> Message(<type>, <number>) <text>` for schedule
//! - `Create_Thread: MessageType(<type>)` for create-thread
//! - `Cancel: Message(<number>)` for cancel
//! - `Pause_Thread: MessageType(<type>)` for pause
//! - `Resume_Thread: MessageType(<type>)` for resume

use thiserror::Error;

use crate::core::request::MAX_MESSAGE_BYTES;
use crate::core::types::{MessageNumber, MessageType};

/// Errors that can occur when parsing a request line.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    /// The line was empty or whitespace only.
    #[error("empty input line")]
    EmptyLine,

    /// The line matched no known request keyword.
    #[error("unrecognized request: {0}")]
    UnrecognizedRequest(String),

    /// A recognized request was missing part of its grammar.
    #[error("malformed {kind} request: expected {expected}")]
    Malformed {
        /// Which request keyword matched.
        kind: &'static str,
        /// The grammar fragment that failed.
        expected: &'static str,
    },

    /// An integer field failed to parse.
    #[error("invalid integer field: {0}")]
    InvalidInteger(String),
}

/// A parsed request line, before validation against the queue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Fire a timed message after a delay.
    Schedule {
        delay_seconds: u32,
        message_type: MessageType,
        message_number: MessageNumber,
        message: String,
    },
    /// Create a worker-thread group.
    CreateThread { message_type: MessageType },
    /// Invalidate a schedule by message number.
    Cancel { message_number: MessageNumber },
    /// Pause a worker-thread group.
    Pause { message_type: MessageType },
    /// Resume a paused worker-thread group.
    Resume { message_type: MessageType },
}

/// Parse one input line into a [`Command`].
pub fn parse_line(line: &str) -> Result<Command, ParseError> {
    let line = line.trim();
    if line.is_empty() {
        return Err(ParseError::EmptyLine);
    }

    if line.starts_with(|c: char| c.is_ascii_digit()) {
        return parse_schedule(line);
    }
    if let Some(rest) = line.strip_prefix("Create_Thread:") {
        let message_type = parse_keyword_arg(rest, "create-thread", "MessageType")?;
        return Ok(Command::CreateThread {
            message_type: MessageType::new(message_type),
        });
    }
    if let Some(rest) = line.strip_prefix("Cancel:") {
        let message_number = parse_keyword_arg(rest, "cancel", "Message")?;
        return Ok(Command::Cancel {
            message_number: MessageNumber::new(message_number),
        });
    }
    if let Some(rest) = line.strip_prefix("Pause_Thread:") {
        let message_type = parse_keyword_arg(rest, "pause", "MessageType")?;
        return Ok(Command::Pause {
            message_type: MessageType::new(message_type),
        });
    }
    if let Some(rest) = line.strip_prefix("Resume_Thread:") {
        let message_type = parse_keyword_arg(rest, "resume", "MessageType")?;
        return Ok(Command::Resume {
            message_type: MessageType::new(message_type),
        });
    }

    Err(ParseError::UnrecognizedRequest(line.to_string()))
}

/// Parse `<seconds> Message(<type>, <number>) <text>`.
fn parse_schedule(line: &str) -> Result<Command, ParseError> {
    let digits_end = line
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(line.len());
    let delay_seconds = parse_u32(&line[..digits_end])?;

    let rest = line[digits_end..].trim_start();
    let rest = rest.strip_prefix("Message(").ok_or(ParseError::Malformed {
        kind: "schedule",
        expected: "Message(<type>, <number>)",
    })?;
    let (inner, text) = rest.split_once(')').ok_or(ParseError::Malformed {
        kind: "schedule",
        expected: "closing parenthesis",
    })?;
    let (type_field, number_field) = inner.split_once(',').ok_or(ParseError::Malformed {
        kind: "schedule",
        expected: "Message(<type>, <number>)",
    })?;

    let message_type = MessageType::new(parse_u32(type_field.trim())?);
    let message_number = MessageNumber::new(parse_u32(number_field.trim())?);

    let message = truncate_message(text.trim());
    if message.is_empty() {
        return Err(ParseError::Malformed {
            kind: "schedule",
            expected: "a message body",
        });
    }

    Ok(Command::Schedule {
        delay_seconds,
        message_type,
        message_number,
        message: message.to_string(),
    })
}

/// Parse `<Keyword>(<integer>)` after a matched request prefix.
fn parse_keyword_arg(
    rest: &str,
    kind: &'static str,
    keyword: &'static str,
) -> Result<u32, ParseError> {
    let rest = rest.trim_start();
    let rest = rest
        .strip_prefix(keyword)
        .and_then(|r| r.strip_prefix('('))
        .ok_or(ParseError::Malformed {
            kind,
            expected: "<keyword>(<integer>)",
        })?;
    let (value, _) = rest.split_once(')').ok_or(ParseError::Malformed {
        kind,
        expected: "closing parenthesis",
    })?;
    parse_u32(value.trim())
}

fn parse_u32(field: &str) -> Result<u32, ParseError> {
    field
        .parse()
        .map_err(|_| ParseError::InvalidInteger(field.to_string()))
}

/// Clamp a message to [`MAX_MESSAGE_BYTES`], respecting char boundaries.
fn truncate_message(text: &str) -> &str {
    if text.len() <= MAX_MESSAGE_BYTES {
        return text;
    }
    let mut end = MAX_MESSAGE_BYTES;
    while !text.is_char_boundary(end) {
        end -= 1;
    }
    &text[..end]
}
