//! Core identifier types for alarm requests.
//!
//! These types distinguish the two integer namespaces the request grammar
//! uses: message types (worker-thread groups) and message numbers (specific
//! alarm instances).

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier for a logical worker-thread group.
///
/// Referenced by `CreateThread`, `Pause`, and `Resume` requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MessageType(u32);

/// Identifier for a specific scheduled alarm instance.
///
/// Referenced by `Schedule` and `Cancel` requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MessageNumber(u32);

impl MessageType {
    /// Create a new MessageType from an integer.
    pub fn new(value: u32) -> Self {
        Self(value)
    }

    /// Get the underlying integer value.
    pub fn value(&self) -> u32 {
        self.0
    }
}

impl From<u32> for MessageType {
    fn from(value: u32) -> Self {
        Self::new(value)
    }
}

impl MessageNumber {
    /// Create a new MessageNumber from an integer.
    pub fn new(value: u32) -> Self {
        Self(value)
    }

    /// Get the underlying integer value.
    pub fn value(&self) -> u32 {
        self.0
    }
}

impl From<u32> for MessageNumber {
    fn from(value: u32) -> Self {
        Self::new(value)
    }
}

impl fmt::Display for MessageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for MessageNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
