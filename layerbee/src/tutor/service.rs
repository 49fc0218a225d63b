//! Tutor entry points.

use super::fallback::fallback_response;
use super::mode::{ModeSelector, TutorMode};
use super::nodes::{
    BuildPromptNode, CallModelNode, FallbackNode, FormatResponseNode, GatherContextNode,
    BUILD_PROMPT, CALL_LLM, ERROR_HANDLER, FORMAT_RESPONSE, GET_CONTEXT,
};
use super::state::{TutorResponse, TutorState};
use crate::config::TutorConfig;
use crate::errors::FlowError;
use crate::events::{EventSink, NoOpEventSink};
use crate::filter::{self, Verdict};
use crate::flow::{Action, Flow, FlowBuilder, FlowRun};
use crate::inference::{InferenceEngine, DEFAULT_MAX_TOKENS, DEFAULT_TEMPERATURE};
use crate::progress::{ProgressSource, ProgressTracker};
use futures::future::join_all;
use parking_lot::RwLock;
use std::fmt;
use std::sync::Arc;
use tracing::{info, warn};

/// Name of the tutor flow in events and logs.
pub const FLOW_NAME: &str = "tutor";

const DEFAULT_PAGE: &str = "/";

/// Answers 3D printing questions.
///
/// Each [`Tutor::ask`] builds a fresh state and a fresh flow, so one tutor
/// can serve concurrent questions.
pub struct Tutor {
    engine: Arc<dyn InferenceEngine>,
    progress: Arc<dyn ProgressSource>,
    config: Arc<TutorConfig>,
    temperature: f32,
    max_tokens: u32,
    mode: ModeSelector,
    page_path: RwLock<String>,
    sink: Arc<dyn EventSink>,
}

impl fmt::Debug for Tutor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Tutor")
            .field("mode", &self.mode())
            .field("page_path", &self.page_path())
            .field("temperature", &self.temperature)
            .field("max_tokens", &self.max_tokens)
            .finish_non_exhaustive()
    }
}

impl Tutor {
    /// Creates a tutor with default settings.
    #[must_use]
    pub fn new(engine: Arc<dyn InferenceEngine>, progress: Arc<dyn ProgressSource>) -> Self {
        Self {
            engine,
            progress,
            config: Arc::new(TutorConfig::default()),
            temperature: DEFAULT_TEMPERATURE,
            max_tokens: DEFAULT_MAX_TOKENS,
            mode: ModeSelector::default(),
            page_path: RwLock::new(DEFAULT_PAGE.to_string()),
            sink: Arc::new(NoOpEventSink),
        }
    }

    /// Uses `config` for topics, step limit and starting mode.
    #[must_use]
    pub fn with_config(mut self, config: TutorConfig) -> Self {
        self.mode = ModeSelector::new(config.default_mode);
        self.config = Arc::new(config);
        self
    }

    /// Overrides the sampling settings sent to the engine.
    #[must_use]
    pub fn with_sampling(mut self, temperature: f32, max_tokens: u32) -> Self {
        self.temperature = temperature;
        self.max_tokens = max_tokens;
        self
    }

    /// Sends flow events to `sink`.
    #[must_use]
    pub fn with_event_sink(mut self, sink: Arc<dyn EventSink>) -> Self {
        self.sink = sink;
        self
    }

    /// Sets the page the learner is on.
    #[must_use]
    pub fn with_page(self, page_path: impl Into<String>) -> Self {
        self.set_page(page_path);
        self
    }

    /// Switches mode. Unknown identifiers are ignored and return false.
    pub fn set_mode(&self, mode: &str) -> bool {
        self.mode.select(mode)
    }

    /// The active mode.
    #[must_use]
    pub fn mode(&self) -> TutorMode {
        self.mode.current()
    }

    /// The message to show when switching to `mode`.
    #[must_use]
    pub const fn mode_announcement(mode: TutorMode) -> &'static str {
        mode.announcement()
    }

    /// Sets the page the learner is on.
    pub fn set_page(&self, page_path: impl Into<String>) {
        *self.page_path.write() = page_path.into();
    }

    /// The page the learner is on.
    #[must_use]
    pub fn page_path(&self) -> String {
        self.page_path.read().clone()
    }

    /// Builds the tutor flow.
    ///
    /// # Errors
    ///
    /// Fails only if the graph is inconsistent.
    pub fn build_flow(&self) -> Result<Flow<TutorState>, FlowError> {
        FlowBuilder::new(FLOW_NAME)
            .node(GatherContextNode::new(self.progress.clone()))
            .node(BuildPromptNode::new(self.config.clone()))
            .node(CallModelNode::new(
                self.engine.clone(),
                self.temperature,
                self.max_tokens,
            ))
            .node(FormatResponseNode)
            .node(FallbackNode)
            .start(GET_CONTEXT)
            .then(GET_CONTEXT, BUILD_PROMPT)
            .then(BUILD_PROMPT, CALL_LLM)
            .connect(CALL_LLM, Action::Success, FORMAT_RESPONSE)
            .connect(CALL_LLM, Action::Failure, ERROR_HANDLER)
            .with_max_steps(self.config.max_steps)
            .with_event_sink(self.sink.clone())
            .build()
    }

    /// Runs the flow for `question` and returns the whole run.
    ///
    /// # Errors
    ///
    /// Fails if the flow cannot be built or exceeds its step limit.
    pub async fn run(&self, question: &str) -> Result<FlowRun<TutorState>, FlowError> {
        let state = TutorState::new(question, self.mode(), self.page_path());
        info!(run_id = %state.run_id, mode = %state.mode, "Tutor question received");
        self.build_flow()?.run(state).await
    }

    /// Answers `question`. Never fails; problems become a fallback answer.
    pub async fn ask(&self, question: &str) -> TutorResponse {
        match self.run(question).await {
            Ok(run) => run.state.response.unwrap_or_else(|| {
                warn!(path = ?run.path, "Tutor flow ended without a response");
                fallback_response(question, "no response was produced")
            }),
            Err(e) => {
                warn!(error = %e, "Tutor flow failed");
                fallback_response(question, &e.to_string())
            }
        }
    }

    /// Answers several questions concurrently, in order.
    pub async fn ask_all(&self, questions: &[&str]) -> Vec<TutorResponse> {
        join_all(questions.iter().map(|q| self.ask(q))).await
    }
}

/// Outcome of submitting a chat message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionReply {
    /// The input was blank; nothing happened.
    Empty,
    /// The content filter blocked the message. `message` is what to show.
    Blocked {
        /// Why the message was blocked.
        reason: String,
        /// Friendly text for the chat.
        message: String,
    },
    /// The tutor answered.
    Answer(TutorResponse),
}

/// The chat panel: filters input before it reaches the tutor and counts
/// solved problems in troubleshoot mode.
#[derive(Debug, Clone)]
pub struct TutorSession {
    tutor: Arc<Tutor>,
    progress: Option<ProgressTracker>,
}

impl TutorSession {
    /// Creates a session.
    #[must_use]
    pub fn new(tutor: Arc<Tutor>) -> Self {
        Self {
            tutor,
            progress: None,
        }
    }

    /// Records solved problems through `progress`.
    #[must_use]
    pub fn with_progress(mut self, progress: ProgressTracker) -> Self {
        self.progress = Some(progress);
        self
    }

    /// The underlying tutor.
    #[must_use]
    pub fn tutor(&self) -> &Tutor {
        &self.tutor
    }

    /// Handles one chat message.
    pub async fn submit(&self, input: &str) -> SessionReply {
        let question = input.trim();
        if question.is_empty() {
            return SessionReply::Empty;
        }

        if let Verdict::Rejected { reason, redirect } = filter::validate_chat_message(question) {
            info!(%reason, "Chat message blocked");
            let message = redirect.unwrap_or_else(|| reason.clone());
            return SessionReply::Blocked { reason, message };
        }

        let response = self.tutor.ask(question).await;

        if self.tutor.mode() == TutorMode::Troubleshoot {
            if let Some(progress) = &self.progress {
                if let Err(e) = progress.log_problem_solved() {
                    warn!(error = %e, "Could not record solved problem");
                }
            }
        }

        SessionReply::Answer(response)
    }
}
