//! Test fixtures for tutor tests.

use std::sync::Arc;

use super::mocks::ScriptedEngine;
use crate::config::TutorConfig;
use crate::events::CollectingEventSink;
use crate::inference::InferenceEngine;
use crate::progress::{Progress, ProgressSource};
use crate::tutor::Tutor;

/// A progress source that always returns the same value.
#[derive(Debug, Clone, Default)]
pub struct StaticProgress {
    progress: Progress,
}

impl StaticProgress {
    /// Creates a source returning `progress`.
    #[must_use]
    pub const fn new(progress: Progress) -> Self {
        Self { progress }
    }

    /// Creates a source with the given completed modules.
    #[must_use]
    pub fn completed(modules: &[&str]) -> Self {
        Self::new(Progress {
            completed: modules.iter().map(|m| (*m).to_string()).collect(),
            ..Progress::default()
        })
    }
}

impl ProgressSource for StaticProgress {
    fn load(&self) -> Progress {
        self.progress.clone()
    }
}

/// A tutor wired to an engine, a fixed progress source and a collecting
/// event sink.
#[derive(Debug)]
pub struct TutorFixture {
    /// The tutor under test.
    pub tutor: Tutor,
    /// Events emitted by the tutor flow.
    pub events: Arc<CollectingEventSink>,
}

impl TutorFixture {
    /// Builds a fixture around `engine` with empty progress.
    #[must_use]
    pub fn new(engine: Arc<dyn InferenceEngine>) -> Self {
        Self::with_progress(engine, StaticProgress::default())
    }

    /// Builds a fixture around `engine` and `progress`.
    #[must_use]
    pub fn with_progress(engine: Arc<dyn InferenceEngine>, progress: StaticProgress) -> Self {
        let events = Arc::new(CollectingEventSink::new());
        let tutor = Tutor::new(engine, Arc::new(progress))
            .with_config(TutorConfig::default())
            .with_event_sink(events.clone());
        Self { tutor, events }
    }

    /// Builds a fixture whose engine always answers `reply`.
    #[must_use]
    pub fn answering(reply: &str) -> (Self, Arc<ScriptedEngine>) {
        let engine = Arc::new(ScriptedEngine::always(reply));
        (Self::new(engine.clone()), engine)
    }
}
