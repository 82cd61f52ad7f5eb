//! Cross-referential validation scenarios driven through the dispatcher.
//!
//! No worker runs here: accepted entries stay queued, so each rule is
//! checked against a known queue state.

use crate::common::intake_only;
use reveil::{DispatchError, InsertOutcome, ValidationError};

fn rejected(error: DispatchError) -> ValidationError {
    match error {
        DispatchError::Rejected(inner) => inner,
        other => panic!("expected validation rejection, got {:?}", other),
    }
}

#[tokio::test]
async fn test_cancel_gating_lifecycle() {
    let (dispatcher, service, handler) = intake_only().await;

    // No schedule with number 7 yet: rejected.
    let error = dispatcher
        .dispatch_line("Cancel: Message(7)")
        .await
        .unwrap_err();
    assert!(matches!(
        rejected(error),
        ValidationError::NoScheduleForNumber(_)
    ));

    // Queue the target, then the cancel is accepted exactly once.
    dispatcher
        .dispatch_line("60 Message(1, 7) target")
        .await
        .unwrap();
    dispatcher.dispatch_line("Cancel: Message(7)").await.unwrap();

    let error = dispatcher
        .dispatch_line("Cancel: Message(7)")
        .await
        .unwrap_err();
    assert!(matches!(rejected(error), ValidationError::DuplicateCancel(_)));

    assert_eq!(service.pending_count().await, 2);
    assert_eq!(handler.queued_count().await, 2);
    assert_eq!(handler.rejected_reasons().await.len(), 2);
}

#[tokio::test]
async fn test_create_thread_gating() {
    let (dispatcher, _service, _handler) = intake_only().await;

    let error = dispatcher
        .dispatch_line("Create_Thread: MessageType(4)")
        .await
        .unwrap_err();
    assert!(matches!(
        rejected(error),
        ValidationError::NoScheduleForType(_)
    ));

    dispatcher
        .dispatch_line("60 Message(4, 1) target")
        .await
        .unwrap();
    dispatcher
        .dispatch_line("Create_Thread: MessageType(4)")
        .await
        .unwrap();

    let error = dispatcher
        .dispatch_line("Create_Thread: MessageType(4)")
        .await
        .unwrap_err();
    assert!(matches!(
        rejected(error),
        ValidationError::DuplicateCreateThread(_)
    ));
}

#[tokio::test]
async fn test_create_thread_rejected_for_ambiguous_type() {
    let (dispatcher, _service, _handler) = intake_only().await;

    dispatcher
        .dispatch_line("60 Message(4, 1) one")
        .await
        .unwrap();
    dispatcher
        .dispatch_line("60 Message(4, 2) two")
        .await
        .unwrap();

    let error = dispatcher
        .dispatch_line("Create_Thread: MessageType(4)")
        .await
        .unwrap_err();
    assert!(matches!(
        rejected(error),
        ValidationError::MultipleSchedulesForType(_)
    ));
}

#[tokio::test]
async fn test_pause_resume_chain() {
    let (dispatcher, _service, _handler) = intake_only().await;

    // Resume before any pause is queued: rejected.
    let error = dispatcher
        .dispatch_line("Resume_Thread: MessageType(2)")
        .await
        .unwrap_err();
    assert!(matches!(rejected(error), ValidationError::NoPauseForType(_)));

    // Pause needs a matching schedule first.
    let error = dispatcher
        .dispatch_line("Pause_Thread: MessageType(2)")
        .await
        .unwrap_err();
    assert!(matches!(
        rejected(error),
        ValidationError::NoScheduleForType(_)
    ));

    dispatcher
        .dispatch_line("60 Message(2, 5) target")
        .await
        .unwrap();
    dispatcher
        .dispatch_line("Pause_Thread: MessageType(2)")
        .await
        .unwrap();

    let error = dispatcher
        .dispatch_line("Pause_Thread: MessageType(2)")
        .await
        .unwrap_err();
    assert!(matches!(rejected(error), ValidationError::DuplicatePause(_)));

    dispatcher
        .dispatch_line("Resume_Thread: MessageType(2)")
        .await
        .unwrap();

    let error = dispatcher
        .dispatch_line("Resume_Thread: MessageType(2)")
        .await
        .unwrap_err();
    assert!(matches!(
        rejected(error),
        ValidationError::DuplicateResume(_)
    ));
}

#[tokio::test]
async fn test_replacement_keeps_one_entry_per_number() {
    let (dispatcher, service, _handler) = intake_only().await;

    assert_eq!(
        dispatcher
            .dispatch_line("30 Message(1, 7) old")
            .await
            .unwrap(),
        InsertOutcome::Inserted
    );
    assert_eq!(
        dispatcher
            .dispatch_line("5 Message(1, 7) new")
            .await
            .unwrap(),
        InsertOutcome::Replaced
    );

    assert_eq!(service.pending_count().await, 1);
}

#[tokio::test]
async fn test_malformed_lines_leave_queue_untouched() {
    let (dispatcher, service, handler) = intake_only().await;

    for line in [
        "gibberish",
        "5 Message(1 1) missing comma",
        "Cancel: Message(x)",
        "pause_thread: MessageType(1)",
    ] {
        assert!(dispatcher.dispatch_line(line).await.is_err());
    }

    assert_eq!(service.pending_count().await, 0);
    assert_eq!(handler.rejected_reasons().await.len(), 4);
}
