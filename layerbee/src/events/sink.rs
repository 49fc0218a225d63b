//! Event sink trait and implementations.

use async_trait::async_trait;
use parking_lot::RwLock;
use tracing::{debug, info, Level};

use super::FlowEvent;

/// Receiver for flow events.
///
/// Sinks must never fail the flow that feeds them; errors inside a sink are
/// logged and swallowed.
#[async_trait]
pub trait EventSink: Send + Sync {
    /// Emits an event asynchronously.
    async fn emit(&self, event: FlowEvent);

    /// Emits an event without blocking. Used from inside the flow loop.
    fn try_emit(&self, event: FlowEvent);
}

/// Discards every event. The default for flows built without a sink.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOpEventSink;

#[async_trait]
impl EventSink for NoOpEventSink {
    async fn emit(&self, _event: FlowEvent) {}

    fn try_emit(&self, _event: FlowEvent) {}
}

/// Writes events to the `tracing` subscriber.
#[derive(Debug, Clone)]
pub struct LoggingEventSink {
    level: Level,
}

impl Default for LoggingEventSink {
    fn default() -> Self {
        Self { level: Level::DEBUG }
    }
}

impl LoggingEventSink {
    /// Creates a logging sink with the given level.
    #[must_use]
    pub fn new(level: Level) -> Self {
        Self { level }
    }

    /// Creates an info-level logging sink.
    #[must_use]
    pub fn info() -> Self {
        Self::new(Level::INFO)
    }

    fn log_event(&self, event: &FlowEvent) {
        if self.level == Level::INFO {
            info!(
                event_type = event.event_type(),
                flow = %event.flow,
                node = ?event.node,
                action = ?event.action,
                "Flow event"
            );
        } else {
            debug!(
                event_type = event.event_type(),
                flow = %event.flow,
                node = ?event.node,
                action = ?event.action,
                "Flow event"
            );
        }
    }
}

#[async_trait]
impl EventSink for LoggingEventSink {
    async fn emit(&self, event: FlowEvent) {
        self.log_event(&event);
    }

    fn try_emit(&self, event: FlowEvent) {
        self.log_event(&event);
    }
}

/// Keeps every event in memory. Handy in tests.
#[derive(Debug, Default)]
pub struct CollectingEventSink {
    events: RwLock<Vec<FlowEvent>>,
}

impl CollectingEventSink {
    /// Creates an empty collecting sink.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns all collected events.
    #[must_use]
    pub fn events(&self) -> Vec<FlowEvent> {
        self.events.read().clone()
    }

    /// Returns the number of collected events.
    #[must_use]
    pub fn len(&self) -> usize {
        self.events.read().len()
    }

    /// Returns true if nothing has been collected.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.events.read().is_empty()
    }

    /// Returns the node names of all `node.completed` events, in order.
    #[must_use]
    pub fn completed_nodes(&self) -> Vec<String> {
        self.events
            .read()
            .iter()
            .filter(|e| e.event_type() == "node.completed")
            .filter_map(|e| e.node.clone())
            .collect()
    }
}

#[async_trait]
impl EventSink for CollectingEventSink {
    async fn emit(&self, event: FlowEvent) {
        self.events.write().push(event);
    }

    fn try_emit(&self, event: FlowEvent) {
        self.events.write().push(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::FlowEventKind;
    use crate::flow::Action;

    #[tokio::test]
    async fn test_noop_sink() {
        let sink = NoOpEventSink;
        sink.emit(FlowEvent::new(FlowEventKind::FlowCompleted, "tutor")).await;
        sink.try_emit(FlowEvent::new(FlowEventKind::FlowCompleted, "tutor"));
    }

    #[tokio::test]
    async fn test_logging_sink() {
        let sink = LoggingEventSink::info();
        sink.emit(FlowEvent::new(FlowEventKind::NodeStarted, "tutor").with_node("CallLLM"))
            .await;
    }

    #[tokio::test]
    async fn test_collecting_sink_completed_nodes() {
        let sink = CollectingEventSink::new();
        assert!(sink.is_empty());

        sink.try_emit(FlowEvent::new(FlowEventKind::NodeStarted, "f").with_node("a"));
        sink.try_emit(
            FlowEvent::new(FlowEventKind::NodeCompleted, "f")
                .with_node("a")
                .with_action(Action::Default),
        );
        sink.emit(
            FlowEvent::new(FlowEventKind::NodeCompleted, "f")
                .with_node("b")
                .with_action(Action::Success),
        )
        .await;

        assert_eq!(sink.len(), 3);
        assert_eq!(sink.completed_nodes(), vec!["a".to_string(), "b".to_string()]);
    }
}
