//! Sequential node/flow orchestration.
//!
//! A [`Flow`] is a directed graph of [`Node`]s joined by [`Action`]-labelled
//! edges. State is threaded by value: each node's `post` consumes the old
//! state and hands back the new one.

mod graph;
mod node;

pub use graph::{Flow, FlowBuilder, FlowRun};
pub use node::{Action, FnNode, Node, Runnable};
