//! The single consumer of the alarm queue.
//!
//! The worker loops forever over three states: idle while the queue is
//! empty, waiting on the head item's deadline, and firing a due item. A
//! nearer insert preempts an in-progress wait; the held item is then put
//! back so the nearer one can be taken first.

use std::sync::Arc;
use tokio::time::{self, Instant};
use tracing::debug;

use crate::alarm::service::{AlarmService, NextItem};
use crate::core::request::{Request, RequestKind};
use crate::events::{Event, EventBus};

/// The dedicated alarm consumer.
///
/// Exactly one request is held outside the queue at a time, so a due item
/// cannot be superseded mid-fire and a preempted item is always requeued
/// intact.
pub struct Worker {
    service: Arc<AlarmService>,
    events: Arc<EventBus>,
}

impl Worker {
    /// Create a worker over the shared service.
    pub fn new(service: Arc<AlarmService>, events: Arc<EventBus>) -> Self {
        Self { service, events }
    }

    /// Run the consume loop. Never returns; the worker lives until the
    /// process exits.
    pub async fn run(self) {
        loop {
            match self.service.take_next().await {
                NextItem::Due(request) => self.fire(request).await,
                NextItem::Pending(request) => {
                    let deadline = request.deadline();
                    debug!(kind = %request.kind(), delay = request.delay_seconds(), "waiting for deadline");
                    if self.wait_until(deadline).await {
                        debug!(kind = %request.kind(), "preempted by a nearer deadline, requeueing");
                        self.service.requeue(request).await;
                    } else {
                        self.fire(request).await;
                    }
                }
            }
        }
    }

    /// Sleep until `deadline`. Returns true when the wait was preempted
    /// by an insert with a nearer deadline, false when the deadline
    /// elapsed.
    async fn wait_until(&self, deadline: Instant) -> bool {
        loop {
            let notified = self.service.wakeup().notified();
            tokio::select! {
                _ = time::sleep_until(deadline) => return false,
                _ = notified => {
                    if self.service.wait_target().await != Some(deadline) {
                        return true;
                    }
                    // Stale permit: the committed deadline is unchanged.
                }
            }
        }
    }

    async fn fire(&self, request: Request) {
        match request.kind() {
            RequestKind::Schedule => {
                self.events
                    .emit(Event::alarm_fired(
                        request.message_number(),
                        request.delay_seconds(),
                        request.message().to_owned(),
                    ))
                    .await;
            }
            kind => {
                debug!(%kind, "control request expired");
                self.events
                    .emit(Event::control_expired(
                        kind,
                        request.message_type(),
                        request.message_number(),
                    ))
                    .await;
            }
        }
    }
}
