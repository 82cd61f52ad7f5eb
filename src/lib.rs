pub mod alarm;
pub mod core;
pub mod dispatch;
pub mod events;
pub mod parse;
pub mod queue;

pub use crate::alarm::{AlarmService, Worker};
pub use crate::core::request::{Request, RequestKind, MAX_MESSAGE_BYTES};
pub use crate::core::types::{MessageNumber, MessageType};
pub use crate::dispatch::{DispatchError, Dispatcher};
pub use crate::events::{Event, EventBus, EventHandler};
pub use crate::parse::{parse_line, Command, ParseError};
pub use crate::queue::validate::ValidationError;
pub use crate::queue::{AlarmQueue, InsertOutcome};
