//! Common test utilities shared across integration tests.

use async_trait::async_trait;
use reveil::{AlarmService, Dispatcher, Event, EventBus, EventHandler, Worker};
use std::sync::Arc;
use tokio::sync::Mutex;
use tokio::time::Instant;

/// Recording event handler for verifying scheduler output.
pub struct RecordingHandler {
    events: Mutex<Vec<Event>>,
}

impl RecordingHandler {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            events: Mutex::new(Vec::new()),
        })
    }

    /// Fired schedule alarms as `(delay_seconds, message, fired_at)`.
    pub async fn fired(&self) -> Vec<(u32, String, Instant)> {
        self.events
            .lock()
            .await
            .iter()
            .filter_map(|event| match event {
                Event::AlarmFired {
                    delay_seconds,
                    message,
                    timestamp,
                    ..
                } => Some((*delay_seconds, message.clone(), *timestamp)),
                _ => None,
            })
            .collect()
    }

    pub async fn rejected_reasons(&self) -> Vec<String> {
        self.events
            .lock()
            .await
            .iter()
            .filter_map(|event| match event {
                Event::RequestRejected { reason, .. } => Some(reason.clone()),
                _ => None,
            })
            .collect()
    }

    pub async fn queued_count(&self) -> usize {
        self.events
            .lock()
            .await
            .iter()
            .filter(|event| matches!(event, Event::RequestQueued { .. }))
            .count()
    }
}

#[async_trait]
impl EventHandler for RecordingHandler {
    async fn handle(&self, event: &Event) {
        self.events.lock().await.push(event.clone());
    }
}

/// Build a dispatcher and service wired to a recording handler, without a
/// running worker. Queued entries stay queued, which keeps validation
/// scenarios deterministic.
pub async fn intake_only() -> (Dispatcher, Arc<AlarmService>, Arc<RecordingHandler>) {
    let bus = Arc::new(EventBus::new());
    let handler = RecordingHandler::new();
    bus.register(handler.clone()).await;
    let service = Arc::new(AlarmService::new(Arc::clone(&bus)));
    let dispatcher = Dispatcher::new(Arc::clone(&service), bus);
    (dispatcher, service, handler)
}

/// Build a full pipeline: dispatcher, service, recording handler, and a
/// spawned worker consuming the queue.
pub async fn full_pipeline() -> (Dispatcher, Arc<AlarmService>, Arc<RecordingHandler>) {
    let bus = Arc::new(EventBus::new());
    let handler = RecordingHandler::new();
    bus.register(handler.clone()).await;
    let service = Arc::new(AlarmService::new(Arc::clone(&bus)));
    let dispatcher = Dispatcher::new(Arc::clone(&service), Arc::clone(&bus));
    tokio::spawn(Worker::new(Arc::clone(&service), bus).run());
    (dispatcher, service, handler)
}
