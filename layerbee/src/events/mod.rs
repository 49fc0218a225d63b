//! Flow events for observability.
//!
//! Every [`crate::flow::Flow`] run reports `node.started`, `node.completed`
//! and `flow.completed` events to an [`EventSink`].

mod sink;

pub use sink::{CollectingEventSink, EventSink, LoggingEventSink, NoOpEventSink};

use crate::flow::Action;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// What happened.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FlowEventKind {
    /// A node is about to run.
    #[serde(rename = "node.started")]
    NodeStarted,
    /// A node finished and chose an action.
    #[serde(rename = "node.completed")]
    NodeCompleted,
    /// The flow stopped because no edge matched.
    #[serde(rename = "flow.completed")]
    FlowCompleted,
}

/// A single event emitted by a flow run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FlowEvent {
    /// Event kind.
    pub kind: FlowEventKind,
    /// Name of the flow.
    pub flow: String,
    /// Node the event concerns, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub node: Option<String>,
    /// Action returned by the node, for `node.completed`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub action: Option<Action>,
    /// Wall-clock duration of the node or flow.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration_ms: Option<f64>,
    /// When the event was created.
    pub timestamp: DateTime<Utc>,
}

impl FlowEvent {
    /// Creates an event for the given flow.
    #[must_use]
    pub fn new(kind: FlowEventKind, flow: impl Into<String>) -> Self {
        Self {
            kind,
            flow: flow.into(),
            node: None,
            action: None,
            duration_ms: None,
            timestamp: Utc::now(),
        }
    }

    /// Sets the node name.
    #[must_use]
    pub fn with_node(mut self, node: impl Into<String>) -> Self {
        self.node = Some(node.into());
        self
    }

    /// Sets the action.
    #[must_use]
    pub const fn with_action(mut self, action: Action) -> Self {
        self.action = Some(action);
        self
    }

    /// Sets the duration.
    #[must_use]
    pub const fn with_duration_ms(mut self, duration_ms: f64) -> Self {
        self.duration_ms = Some(duration_ms);
        self
    }

    /// The dotted event type, e.g. `node.started`.
    #[must_use]
    pub const fn event_type(&self) -> &'static str {
        match self.kind {
            FlowEventKind::NodeStarted => "node.started",
            FlowEventKind::NodeCompleted => "node.completed",
            FlowEventKind::FlowCompleted => "flow.completed",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_type_strings() {
        assert_eq!(FlowEvent::new(FlowEventKind::NodeStarted, "f").event_type(), "node.started");
        assert_eq!(FlowEvent::new(FlowEventKind::NodeCompleted, "f").event_type(), "node.completed");
        assert_eq!(FlowEvent::new(FlowEventKind::FlowCompleted, "f").event_type(), "flow.completed");
    }

    #[test]
    fn test_event_serialization_uses_dotted_kind() {
        let event = FlowEvent::new(FlowEventKind::NodeCompleted, "tutor")
            .with_node("CallLLM")
            .with_action(Action::Failure);
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["kind"], "node.completed");
        assert_eq!(json["action"], "error");
        assert_eq!(json["node"], "CallLLM");
    }
}
