use async_trait::async_trait;
use chrono::Utc;
use domain::{Ack, AnalyticsEvent, EventInput, ProviderError};
use serde_json::{Map, Value};
use std::sync::{Arc, Mutex};

/// Destination of recorded analytics events
pub trait EventSink: Send + Sync {
    /// Append one event. Recorded events are never modified.
    fn record(&self, event: AnalyticsEvent);
}

/// Event sink that keeps every event in memory, in arrival order
#[derive(Default)]
pub struct MemoryEventSink {
    events: Mutex<Vec<AnalyticsEvent>>,
}

impl MemoryEventSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of all recorded events
    pub fn events(&self) -> Vec<AnalyticsEvent> {
        self.events
            .lock()
            .expect("Failed to acquire lock on events")
            .clone()
    }

    /// Recorded events of one type
    pub fn events_of_type(&self, event_type: &str) -> Vec<AnalyticsEvent> {
        self.events()
            .into_iter()
            .filter(|event| event.event_type == event_type)
            .collect()
    }

    pub fn len(&self) -> usize {
        self.events
            .lock()
            .expect("Failed to acquire lock on events")
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl EventSink for MemoryEventSink {
    fn record(&self, event: AnalyticsEvent) {
        self.events
            .lock()
            .expect("Failed to acquire lock on events")
            .push(event);
    }
}

/// The `analytics` capability group of a data provider
#[async_trait]
pub trait AnalyticsClient: Send + Sync {
    async fn track_event(
        &self,
        event_type: &str,
        properties: Map<String, Value>,
    ) -> Result<Ack, ProviderError>;

    async fn track_batch_events(&self, events: Vec<EventInput>) -> Result<Ack, ProviderError>;
}

/// Analytics client that stamps events and hands them to a sink
pub struct MockAnalyticsClient {
    sink: Arc<dyn EventSink>,
    session_id: String,
}

impl MockAnalyticsClient {
    pub fn new(sink: Arc<dyn EventSink>, session_id: impl Into<String>) -> Self {
        Self {
            sink,
            session_id: session_id.into(),
        }
    }
}

#[async_trait]
impl AnalyticsClient for MockAnalyticsClient {
    async fn track_event(
        &self,
        event_type: &str,
        properties: Map<String, Value>,
    ) -> Result<Ack, ProviderError> {
        let event = AnalyticsEvent {
            event_type: event_type.to_string(),
            properties,
            timestamp: Utc::now(),
            session_id: self.session_id.clone(),
        };
        tracing::info!(event_type, properties = ?event.properties, "Analytics event");
        self.sink.record(event);
        Ok(Ack::ok())
    }

    async fn track_batch_events(&self, events: Vec<EventInput>) -> Result<Ack, ProviderError> {
        tracing::info!(count = events.len(), "Analytics batch");
        let now = Utc::now();
        for input in events {
            self.sink.record(AnalyticsEvent {
                event_type: input.event_type,
                properties: input.properties,
                timestamp: input.timestamp.unwrap_or(now),
                session_id: self.session_id.clone(),
            });
        }
        Ok(Ack::ok())
    }
}

/// Sends an event and ignores the outcome.
///
/// Analytics must never fail the action that produced the event, so errors
/// are only logged.
pub async fn track_quietly(
    client: &dyn AnalyticsClient,
    event_type: &str,
    properties: Map<String, Value>,
) {
    if let Err(err) = client.track_event(event_type, properties).await {
        tracing::warn!(event_type, error = %err, "Dropping analytics event");
    }
}

/// Builds an event property map from `(key, value)` pairs
pub fn properties<const N: usize>(pairs: [(&str, Value); N]) -> Map<String, Value> {
    pairs
        .into_iter()
        .map(|(key, value)| (key.to_string(), value))
        .collect()
}
