//! Error types for the LayerBEE library.
//!
//! Inference failures never reach callers of [`crate::tutor::Tutor::ask`];
//! they are absorbed by the tutor flow. The types here cover everything
//! else: flow construction, storage, configuration and validation.

use thiserror::Error;

/// Convenience alias used across the crate.
pub type Result<T> = std::result::Result<T, LayerbeeError>;

/// The main error type for LayerBEE operations.
#[derive(Debug, Error)]
pub enum LayerbeeError {
    /// A flow could not be built or run.
    #[error("{0}")]
    Flow(#[from] FlowError),

    /// The inference capability failed.
    #[error("{0}")]
    Inference(#[from] InferenceError),

    /// A configuration file could not be read or is invalid.
    #[error("Config error in {path}: {message}")]
    Config {
        /// Path of the offending file.
        path: String,
        /// What went wrong.
        message: String,
    },

    /// A value failed validation.
    #[error("Validation error: {0}")]
    Validation(String),

    /// A record was not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Serialization/deserialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl LayerbeeError {
    /// Creates a config error for the given path.
    #[must_use]
    pub fn config(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Config {
            path: path.into(),
            message: message.into(),
        }
    }
}

/// Errors raised while building or running a [`crate::flow::Flow`].
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum FlowError {
    /// The start node was never added.
    #[error("Start node '{0}' is not registered in the flow")]
    MissingStart(String),

    /// An edge references a node that was never added.
    #[error("Edge {from} --{action}--> {to} references unknown node '{missing}'")]
    UnknownNode {
        /// Source node of the edge.
        from: String,
        /// Action label of the edge.
        action: String,
        /// Target node of the edge.
        to: String,
        /// The name that could not be resolved.
        missing: String,
    },

    /// Two nodes were registered under the same name.
    #[error("Node '{0}' is registered twice")]
    DuplicateNode(String),

    /// The loop guard tripped.
    #[error("Flow exceeded {limit} steps (last node: {last_node})")]
    StepLimitExceeded {
        /// Configured step limit.
        limit: usize,
        /// The node that would have run next.
        last_node: String,
    },
}

/// Errors produced by an inference capability.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum InferenceError {
    /// The capability has not finished initializing.
    #[error("AI engine not ready yet. Please wait for it to load!")]
    NotReady,

    /// The capability raised an error while generating.
    #[error("{0}")]
    Runtime(String),

    /// The HTTP transport failed.
    #[error("HTTP error: {0}")]
    Http(String),

    /// The capability answered without any content.
    #[error("Model returned an empty response")]
    EmptyResponse,
}

impl InferenceError {
    /// Creates a runtime error.
    #[must_use]
    pub fn runtime(message: impl Into<String>) -> Self {
        Self::Runtime(message.into())
    }
}
