//! The shared alarm service and its single consumer.

mod service;
mod worker;

pub use service::AlarmService;
pub use worker::Worker;
