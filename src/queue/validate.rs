//! Admission rules applied before a request may join the queue.
//!
//! The rules are cross-referential: whether a control request is legal
//! depends on which schedule and control entries are currently queued.
//! Every predicate scans the whole queue; rejection never mutates it.

use thiserror::Error;

use crate::core::request::{Request, RequestKind};
use crate::core::types::{MessageNumber, MessageType};
use crate::queue::AlarmQueue;

/// Reasons a request may be refused admission.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    /// No queued schedule request carries the referenced message type.
    #[error("no schedule request with message type {0} is queued")]
    NoScheduleForType(MessageType),

    /// More than one queued schedule request carries the referenced type.
    #[error("more than one schedule request with message type {0} is queued")]
    MultipleSchedulesForType(MessageType),

    /// No queued schedule request carries the referenced message number.
    #[error("no schedule request with message number {0} is queued")]
    NoScheduleForNumber(MessageNumber),

    /// A create-thread request already targets the referenced type.
    #[error("a create-thread request for message type {0} is already queued")]
    DuplicateCreateThread(MessageType),

    /// A cancel request already targets the referenced number.
    #[error("a cancel request for message number {0} is already queued")]
    DuplicateCancel(MessageNumber),

    /// A pause request already targets the referenced type.
    #[error("a pause request for message type {0} is already queued")]
    DuplicatePause(MessageType),

    /// No queued pause request carries the referenced message type.
    #[error("no pause request with message type {0} is queued")]
    NoPauseForType(MessageType),

    /// More than one queued pause request carries the referenced type.
    #[error("more than one pause request with message type {0} is queued")]
    MultiplePausesForType(MessageType),

    /// A resume request already targets the referenced type.
    #[error("a resume request for message type {0} is already queued")]
    DuplicateResume(MessageType),
}

/// Decide whether `request` may be admitted given the queue's contents.
pub fn validate(queue: &AlarmQueue, request: &Request) -> Result<(), ValidationError> {
    match request.kind() {
        // Structural validity is the parser's job; schedules are always
        // admissible (a same-number duplicate replaces, it does not stack).
        RequestKind::Schedule => Ok(()),
        RequestKind::CreateThread => {
            let mtype = request.message_type();
            require_single_schedule_for_type(queue, mtype)?;
            if any_of_kind_for_type(queue, RequestKind::CreateThread, mtype) {
                return Err(ValidationError::DuplicateCreateThread(mtype));
            }
            Ok(())
        }
        RequestKind::Cancel => {
            let number = request.message_number();
            let target_exists = queue
                .iter()
                .any(|e| e.kind() == RequestKind::Schedule && e.message_number() == number);
            if !target_exists {
                return Err(ValidationError::NoScheduleForNumber(number));
            }
            let already_cancelled = queue
                .iter()
                .any(|e| e.kind() == RequestKind::Cancel && e.message_number() == number);
            if already_cancelled {
                return Err(ValidationError::DuplicateCancel(number));
            }
            Ok(())
        }
        RequestKind::Pause => {
            let mtype = request.message_type();
            require_single_schedule_for_type(queue, mtype)?;
            if any_of_kind_for_type(queue, RequestKind::Pause, mtype) {
                return Err(ValidationError::DuplicatePause(mtype));
            }
            Ok(())
        }
        RequestKind::Resume => {
            let mtype = request.message_type();
            match count_of_kind_for_type(queue, RequestKind::Pause, mtype) {
                0 => return Err(ValidationError::NoPauseForType(mtype)),
                1 => {}
                _ => return Err(ValidationError::MultiplePausesForType(mtype)),
            }
            if any_of_kind_for_type(queue, RequestKind::Resume, mtype) {
                return Err(ValidationError::DuplicateResume(mtype));
            }
            Ok(())
        }
    }
}

fn require_single_schedule_for_type(
    queue: &AlarmQueue,
    mtype: MessageType,
) -> Result<(), ValidationError> {
    match count_of_kind_for_type(queue, RequestKind::Schedule, mtype) {
        0 => Err(ValidationError::NoScheduleForType(mtype)),
        1 => Ok(()),
        _ => Err(ValidationError::MultipleSchedulesForType(mtype)),
    }
}

fn count_of_kind_for_type(queue: &AlarmQueue, kind: RequestKind, mtype: MessageType) -> usize {
    queue
        .iter()
        .filter(|e| e.kind() == kind && e.message_type() == mtype)
        .count()
}

fn any_of_kind_for_type(queue: &AlarmQueue, kind: RequestKind, mtype: MessageType) -> bool {
    count_of_kind_for_type(queue, kind, mtype) > 0
}
