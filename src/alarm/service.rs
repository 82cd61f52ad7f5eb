//! The shared alarm service: queue, lock, and wake protocol.
//!
//! One `AlarmService` is constructed at startup and shared by handle
//! between the request-intake path and the worker. All queue and
//! wait-marker access happens under the internal lock; the worker is the
//! only party that sleeps on the notify signal, the intake path only ever
//! signals it.

use std::sync::Arc;
use tokio::sync::{Mutex, Notify};
use tokio::time::Instant;

use crate::core::request::Request;
use crate::events::{Event, EventBus};
use crate::queue::validate::{validate, ValidationError};
use crate::queue::{AlarmQueue, InsertOutcome};

/// State guarded by the service lock.
struct Shared {
    queue: AlarmQueue,
    /// Deadline the worker is committed to sleeping until, or `None`
    /// while the worker is idle or between items.
    wait_target: Option<Instant>,
}

/// What the worker should do with the queue head it just took.
pub(crate) enum NextItem {
    /// The head is already due; fire it now.
    Due(Request),
    /// The head is not due yet; the wait marker has been committed to
    /// its deadline.
    Pending(Request),
}

/// Shared scheduler state for the dispatcher and the worker.
pub struct AlarmService {
    shared: Mutex<Shared>,
    wakeup: Notify,
    events: Arc<EventBus>,
}

impl AlarmService {
    /// Create a new service with an empty queue.
    pub fn new(events: Arc<EventBus>) -> Self {
        Self {
            shared: Mutex::new(Shared {
                queue: AlarmQueue::new(),
                wait_target: None,
            }),
            wakeup: Notify::new(),
            events,
        }
    }

    /// Validate and queue a request.
    ///
    /// Validation and insertion share one lock acquisition, so the rules
    /// are checked against exactly the queue state the request joins. The
    /// worker is signalled at most once, and only when the new entry
    /// becomes the nearest deadline (or the worker is idle).
    pub async fn submit(&self, request: Request) -> Result<InsertOutcome, ValidationError> {
        let kind = request.kind();
        let message_type = request.message_type();
        let message_number = request.message_number();
        let queued_at = request.created_at();

        let outcome = {
            let mut shared = self.shared.lock().await;
            if let Err(error) = validate(&shared.queue, &request) {
                drop(shared);
                self.events
                    .emit(Event::request_rejected(Some(kind), error.to_string()))
                    .await;
                return Err(error);
            }
            Self::insert_locked(&mut shared, &self.wakeup, request)
        };

        self.events
            .emit(Event::request_queued(
                kind,
                message_type,
                message_number,
                queued_at,
                outcome == InsertOutcome::Replaced,
            ))
            .await;
        Ok(outcome)
    }

    /// Number of requests currently queued.
    ///
    /// An item the worker is sleeping on is held outside the queue and is
    /// not counted.
    pub async fn pending_count(&self) -> usize {
        self.shared.lock().await.queue.len()
    }

    /// Take the next request, sleeping while the queue is empty.
    ///
    /// When the head is not yet due, the wait marker is committed to its
    /// deadline in the same critical section as the pop, so an insert
    /// landing between the pop and the worker's timed wait cannot have its
    /// wake swallowed.
    pub(crate) async fn take_next(&self) -> NextItem {
        loop {
            let notified = self.wakeup.notified();
            {
                let mut shared = self.shared.lock().await;
                shared.wait_target = None;
                if let Some(request) = shared.queue.pop_front() {
                    if request.deadline() <= Instant::now() {
                        return NextItem::Due(request);
                    }
                    shared.wait_target = Some(request.deadline());
                    return NextItem::Pending(request);
                }
            }
            notified.await;
        }
    }

    /// Put a preempted request back into the queue.
    ///
    /// The request was already validated on first admission; it re-enters
    /// by deadline order only. No user-visible event is emitted.
    pub(crate) async fn requeue(&self, request: Request) {
        let mut shared = self.shared.lock().await;
        Self::insert_locked(&mut shared, &self.wakeup, request);
    }

    /// Deadline the worker is currently committed to, if any.
    pub(crate) async fn wait_target(&self) -> Option<Instant> {
        self.shared.lock().await.wait_target
    }

    /// The worker's wake signal.
    pub(crate) fn wakeup(&self) -> &Notify {
        &self.wakeup
    }

    fn insert_locked(shared: &mut Shared, wakeup: &Notify, request: Request) -> InsertOutcome {
        let deadline = request.deadline();
        let outcome = shared.queue.insert(request);
        let nearer = match shared.wait_target {
            None => true,
            Some(target) => deadline < target,
        };
        if nearer {
            shared.wait_target = Some(deadline);
            wakeup.notify_one();
        }
        outcome
    }
}
