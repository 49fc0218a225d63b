//! Flow graph: nodes connected by action-labelled edges.
//!
//! Execution is sequential. The current node runs, its returned [`Action`]
//! selects the next node, and the run ends when no edge matches.

use super::node::{Action, Node, Runnable};
use crate::errors::FlowError;
use crate::events::{EventSink, FlowEvent, FlowEventKind, NoOpEventSink};
use crate::observability::SpanTimer;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, Instrument};

/// Result of one flow run.
#[derive(Debug, Clone)]
pub struct FlowRun<S> {
    /// The final state.
    pub state: S,
    /// Names of the nodes that ran, in order.
    pub path: Vec<String>,
    /// Total execution time in milliseconds.
    pub duration_ms: f64,
}

impl<S> FlowRun<S> {
    /// Returns true if the named node ran at least once.
    #[must_use]
    pub fn visited(&self, node: &str) -> bool {
        self.path.iter().any(|n| n == node)
    }
}

/// A validated, runnable graph of nodes.
///
/// Node names are resolved to indices at build time, so an edge can never
/// point at a node that does not exist.
pub struct Flow<S: Send + 'static> {
    name: String,
    start: usize,
    nodes: Vec<Arc<dyn Runnable<S>>>,
    edges: Vec<HashMap<Action, usize>>,
    max_steps: Option<usize>,
    sink: Arc<dyn EventSink>,
}

impl<S: Send + 'static> fmt::Debug for Flow<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Flow")
            .field("name", &self.name)
            .field("start", &self.nodes[self.start].node_name())
            .field("nodes", &self.node_names())
            .field("max_steps", &self.max_steps)
            .finish_non_exhaustive()
    }
}

impl<S: Send + 'static> Flow<S> {
    /// Returns the flow name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the number of nodes.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Returns the node names in registration order.
    #[must_use]
    pub fn node_names(&self) -> Vec<&str> {
        self.nodes.iter().map(|n| n.node_name()).collect()
    }

    /// Returns the name of the node reached from `from` via `action`.
    #[must_use]
    pub fn successor(&self, from: &str, action: Action) -> Option<&str> {
        let idx = self.nodes.iter().position(|n| n.node_name() == from)?;
        self.edges[idx]
            .get(&action)
            .map(|&next| self.nodes[next].node_name())
    }

    /// Runs the flow to completion.
    ///
    /// # Errors
    ///
    /// Returns [`FlowError::StepLimitExceeded`] if a step limit is set and
    /// the run would take more steps than allowed. Without a limit a cyclic
    /// graph never returns.
    pub async fn run(&self, state: S) -> Result<FlowRun<S>, FlowError> {
        let span = tracing::debug_span!("flow", flow = %self.name);
        self.run_inner(state).instrument(span).await
    }

    async fn run_inner(&self, mut state: S) -> Result<FlowRun<S>, FlowError> {
        let timer = SpanTimer::start();
        let mut path = Vec::new();
        let mut current = Some(self.start);

        while let Some(idx) = current {
            let node = &self.nodes[idx];

            if let Some(limit) = self.max_steps {
                if path.len() >= limit {
                    return Err(FlowError::StepLimitExceeded {
                        limit,
                        last_node: node.node_name().to_string(),
                    });
                }
            }

            self.sink.try_emit(
                FlowEvent::new(FlowEventKind::NodeStarted, &self.name).with_node(node.node_name()),
            );

            let node_timer = SpanTimer::start();
            let (next_state, action) = node.run(state).await;
            state = next_state;
            let node_ms = node_timer.elapsed_ms();

            debug!(node = node.node_name(), %action, duration_ms = node_ms, "Node completed");
            self.sink.try_emit(
                FlowEvent::new(FlowEventKind::NodeCompleted, &self.name)
                    .with_node(node.node_name())
                    .with_action(action)
                    .with_duration_ms(node_ms),
            );

            path.push(node.node_name().to_string());
            current = self.edges[idx].get(&action).copied();
        }

        let duration_ms = timer.elapsed_ms();
        self.sink.try_emit(
            FlowEvent::new(FlowEventKind::FlowCompleted, &self.name).with_duration_ms(duration_ms),
        );

        Ok(FlowRun {
            state,
            path,
            duration_ms,
        })
    }
}

/// Builder for [`Flow`].
pub struct FlowBuilder<S: Send + 'static> {
    name: String,
    start: Option<String>,
    nodes: Vec<Arc<dyn Runnable<S>>>,
    edges: Vec<(String, Action, String)>,
    max_steps: Option<usize>,
    sink: Arc<dyn EventSink>,
}

impl<S: Send + 'static> FlowBuilder<S> {
    /// Creates a new builder.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            start: None,
            nodes: Vec::new(),
            edges: Vec::new(),
            max_steps: None,
            sink: Arc::new(NoOpEventSink),
        }
    }

    /// Adds a node. The first node added is the start node unless
    /// [`Self::start`] says otherwise.
    #[must_use]
    pub fn node<N>(mut self, node: N) -> Self
    where
        N: Node<S> + 'static,
    {
        self.nodes.push(Arc::new(node));
        self
    }

    /// Sets the start node.
    #[must_use]
    pub fn start(mut self, name: impl Into<String>) -> Self {
        self.start = Some(name.into());
        self
    }

    /// Connects `from` to `to` for the given action.
    ///
    /// Connecting the same `(from, action)` twice keeps the last target.
    #[must_use]
    pub fn connect(mut self, from: &str, action: Action, to: &str) -> Self {
        self.edges.push((from.to_string(), action, to.to_string()));
        self
    }

    /// Connects `from` to `to` on [`Action::Default`].
    #[must_use]
    pub fn then(self, from: &str, to: &str) -> Self {
        self.connect(from, Action::Default, to)
    }

    /// Caps the number of node executions per run.
    #[must_use]
    pub const fn with_max_steps(mut self, max_steps: usize) -> Self {
        self.max_steps = Some(max_steps);
        self
    }

    /// Sets the event sink.
    #[must_use]
    pub fn with_event_sink(mut self, sink: Arc<dyn EventSink>) -> Self {
        self.sink = sink;
        self
    }

    /// Validates and builds the flow.
    ///
    /// # Errors
    ///
    /// Fails on duplicate node names, a missing start node, or an edge that
    /// references an unknown node.
    pub fn build(self) -> Result<Flow<S>, FlowError> {
        let mut index: HashMap<String, usize> = HashMap::with_capacity(self.nodes.len());
        for (i, node) in self.nodes.iter().enumerate() {
            if index.insert(node.node_name().to_string(), i).is_some() {
                return Err(FlowError::DuplicateNode(node.node_name().to_string()));
            }
        }

        let start_name = match self.start {
            Some(name) => name,
            None => self
                .nodes
                .first()
                .map(|n| n.node_name().to_string())
                .ok_or_else(|| FlowError::MissingStart(String::new()))?,
        };
        let start = *index
            .get(&start_name)
            .ok_or(FlowError::MissingStart(start_name.clone()))?;

        let mut edges: Vec<HashMap<Action, usize>> = vec![HashMap::new(); self.nodes.len()];
        for (from, action, to) in self.edges {
            let unknown = |missing: &str| FlowError::UnknownNode {
                from: from.clone(),
                action: action.to_string(),
                to: to.clone(),
                missing: missing.to_string(),
            };
            let from_idx = *index.get(&from).ok_or_else(|| unknown(&from))?;
            let to_idx = *index.get(&to).ok_or_else(|| unknown(&to))?;
            edges[from_idx].insert(action, to_idx);
        }

        Ok(Flow {
            name: self.name,
            start,
            nodes: self.nodes,
            edges,
            max_steps: self.max_steps,
            sink: self.sink,
        })
    }
}
