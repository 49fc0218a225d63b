//! Inference engine doubles.

use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::VecDeque;

use crate::errors::InferenceError;
use crate::inference::{ChatRequest, InferenceEngine};

/// An engine that replies from a script and records every request.
///
/// Scripted replies are used in order; once they run out the default reply
/// is repeated.
#[derive(Debug)]
pub struct ScriptedEngine {
    default_reply: String,
    script: Mutex<VecDeque<Result<String, InferenceError>>>,
    requests: Mutex<Vec<ChatRequest>>,
}

impl ScriptedEngine {
    /// Creates an engine that always answers `reply`.
    #[must_use]
    pub fn always(reply: impl Into<String>) -> Self {
        Self {
            default_reply: reply.into(),
            script: Mutex::new(VecDeque::new()),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Queues a reply to use before the default.
    #[must_use]
    pub fn then_reply(self, reply: impl Into<String>) -> Self {
        self.script.lock().push_back(Ok(reply.into()));
        self
    }

    /// Queues a failure to use before the default.
    #[must_use]
    pub fn then_fail(self, error: InferenceError) -> Self {
        self.script.lock().push_back(Err(error));
        self
    }

    /// Returns the number of completed calls.
    #[must_use]
    pub fn call_count(&self) -> usize {
        self.requests.lock().len()
    }

    /// Returns every request received, in order.
    #[must_use]
    pub fn requests(&self) -> Vec<ChatRequest> {
        self.requests.lock().clone()
    }

    /// Returns the last request received.
    #[must_use]
    pub fn last_request(&self) -> Option<ChatRequest> {
        self.requests.lock().last().cloned()
    }
}

#[async_trait]
impl InferenceEngine for ScriptedEngine {
    async fn complete(&self, request: &ChatRequest) -> Result<String, InferenceError> {
        self.requests.lock().push(request.clone());
        self.script
            .lock()
            .pop_front()
            .unwrap_or_else(|| Ok(self.default_reply.clone()))
    }
}

/// An engine that always fails with the same error.
#[derive(Debug)]
pub struct FailingEngine {
    error: InferenceError,
    calls: Mutex<usize>,
}

impl FailingEngine {
    /// Creates an engine failing with `error`.
    #[must_use]
    pub fn new(error: InferenceError) -> Self {
        Self {
            error,
            calls: Mutex::new(0),
        }
    }

    /// Creates an engine failing with a runtime error carrying `message`.
    #[must_use]
    pub fn runtime(message: impl Into<String>) -> Self {
        Self::new(InferenceError::runtime(message))
    }

    /// Returns the number of calls.
    #[must_use]
    pub fn call_count(&self) -> usize {
        *self.calls.lock()
    }
}

#[async_trait]
impl InferenceEngine for FailingEngine {
    async fn complete(&self, _request: &ChatRequest) -> Result<String, InferenceError> {
        *self.calls.lock() += 1;
        Err(self.error.clone())
    }
}
