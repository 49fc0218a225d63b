//! Shared handle to an engine that may still be loading.

use super::{ChatRequest, InferenceEngine};
use crate::errors::InferenceError;
use async_trait::async_trait;
use parking_lot::RwLock;
use std::future::Future;
use std::sync::Arc;
use tracing::{info, warn};

/// Lifecycle of the engine behind an [`EngineSlot`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineStatus {
    /// Nothing has been loaded yet.
    Idle,
    /// A load is in progress.
    Loading,
    /// The engine is ready.
    Ready,
    /// The last load failed.
    Failed(String),
}

#[derive(Default)]
enum SlotState {
    #[default]
    Idle,
    Loading,
    Ready(Arc<dyn InferenceEngine>),
    Failed(String),
}

/// A cloneable handle to an engine that is installed once it finishes
/// loading. Until then every request fails with
/// [`InferenceError::NotReady`].
#[derive(Clone, Default)]
pub struct EngineSlot {
    state: Arc<RwLock<SlotState>>,
}

impl std::fmt::Debug for EngineSlot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EngineSlot")
            .field("status", &self.status())
            .finish()
    }
}

impl EngineSlot {
    /// Creates an empty slot.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a slot that already holds a ready engine.
    #[must_use]
    pub fn ready(engine: Arc<dyn InferenceEngine>) -> Self {
        let slot = Self::new();
        slot.install(engine);
        slot
    }

    /// Returns the current status.
    #[must_use]
    pub fn status(&self) -> EngineStatus {
        match &*self.state.read() {
            SlotState::Idle => EngineStatus::Idle,
            SlotState::Loading => EngineStatus::Loading,
            SlotState::Ready(_) => EngineStatus::Ready,
            SlotState::Failed(msg) => EngineStatus::Failed(msg.clone()),
        }
    }

    /// Returns true once an engine is installed.
    #[must_use]
    pub fn is_ready(&self) -> bool {
        matches!(&*self.state.read(), SlotState::Ready(_))
    }

    /// Installs a ready engine.
    pub fn install(&self, engine: Arc<dyn InferenceEngine>) {
        *self.state.write() = SlotState::Ready(engine);
    }

    /// Loads an engine with `loader` unless one is loaded or loading.
    ///
    /// Returns the status after the attempt. A failed load can be retried by
    /// calling this again.
    pub async fn initialize<F, Fut>(&self, loader: F) -> EngineStatus
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<Arc<dyn InferenceEngine>, InferenceError>>,
    {
        {
            let mut state = self.state.write();
            if matches!(&*state, SlotState::Loading | SlotState::Ready(_)) {
                drop(state);
                return self.status();
            }
            *state = SlotState::Loading;
        }

        match loader().await {
            Ok(engine) => {
                info!("Inference engine ready");
                *self.state.write() = SlotState::Ready(engine);
            }
            Err(e) => {
                warn!(error = %e, "Inference engine failed to load");
                *self.state.write() = SlotState::Failed(e.to_string());
            }
        }
        self.status()
    }

    fn engine(&self) -> Option<Arc<dyn InferenceEngine>> {
        match &*self.state.read() {
            SlotState::Ready(engine) => Some(engine.clone()),
            _ => None,
        }
    }
}

#[async_trait]
impl InferenceEngine for EngineSlot {
    async fn complete(&self, request: &ChatRequest) -> Result<String, InferenceError> {
        let engine = self.engine().ok_or(InferenceError::NotReady)?;
        engine.complete(request).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::ScriptedEngine;

    #[tokio::test]
    async fn test_empty_slot_is_not_ready() {
        let slot = EngineSlot::new();
        assert_eq!(slot.status(), EngineStatus::Idle);

        let err = slot.complete(&ChatRequest::new("s", "u")).await.unwrap_err();
        assert_eq!(err, InferenceError::NotReady);
    }

    #[tokio::test]
    async fn test_initialize_installs_engine() {
        let slot = EngineSlot::new();
        let status = slot
            .initialize(|| async {
                Ok(Arc::new(ScriptedEngine::always("hello")) as Arc<dyn InferenceEngine>)
            })
            .await;

        assert_eq!(status, EngineStatus::Ready);
        assert!(slot.is_ready());
        let reply = slot.complete(&ChatRequest::new("s", "u")).await.unwrap();
        assert_eq!(reply, "hello");
    }

    #[tokio::test]
    async fn test_failed_initialize_can_retry() {
        let slot = EngineSlot::new();
        let status = slot
            .initialize(|| async { Err(InferenceError::runtime("download failed")) })
            .await;
        assert_eq!(status, EngineStatus::Failed("download failed".to_string()));

        let status = slot
            .initialize(|| async {
                Ok(Arc::new(ScriptedEngine::always("ok")) as Arc<dyn InferenceEngine>)
            })
            .await;
        assert_eq!(status, EngineStatus::Ready);
    }

    #[tokio::test]
    async fn test_initialize_skips_when_ready() {
        let slot = EngineSlot::ready(Arc::new(ScriptedEngine::always("first")));
        let status = slot
            .initialize(|| async {
                Ok(Arc::new(ScriptedEngine::always("second")) as Arc<dyn InferenceEngine>)
            })
            .await;
        assert_eq!(status, EngineStatus::Ready);

        let reply = slot.complete(&ChatRequest::new("s", "u")).await.unwrap();
        assert_eq!(reply, "first");
    }
}
