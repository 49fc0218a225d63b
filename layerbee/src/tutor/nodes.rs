//! The five nodes of the tutor flow.

use super::fallback::fallback_response;
use super::markdown;
use super::mode::TutorMode;
use super::prompt::build_prompt;
use super::state::{
    LearnerContext, LearningModule, ModelOutcome, Prompt, SkillLevel, TutorResponse, TutorState,
    DEFAULT_PRINTER, DEFAULT_SLICER,
};
use crate::config::TutorConfig;
use crate::flow::{Action, Node};
use crate::inference::{ChatRequest, InferenceEngine};
use crate::progress::{Progress, ProgressSource};
use async_trait::async_trait;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, warn};

/// Name of [`GatherContextNode`].
pub const GET_CONTEXT: &str = "GetContext";
/// Name of [`BuildPromptNode`].
pub const BUILD_PROMPT: &str = "BuildPrompt";
/// Name of [`CallModelNode`].
pub const CALL_LLM: &str = "CallLLM";
/// Name of [`FormatResponseNode`].
pub const FORMAT_RESPONSE: &str = "FormatResponse";
/// Name of [`FallbackNode`].
pub const ERROR_HANDLER: &str = "ErrorHandler";

const MISSING_PROMPT: &str = "no prompt was built";

/// Collects what the tutor knows about the learner.
pub struct GatherContextNode {
    progress: Arc<dyn ProgressSource>,
}

impl GatherContextNode {
    /// Creates the node over a progress source.
    #[must_use]
    pub fn new(progress: Arc<dyn ProgressSource>) -> Self {
        Self { progress }
    }
}

impl fmt::Debug for GatherContextNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GatherContextNode").finish_non_exhaustive()
    }
}

fn or_default(value: String, default: &str) -> String {
    if value.trim().is_empty() {
        default.to_string()
    } else {
        value
    }
}

#[async_trait]
impl Node<TutorState> for GatherContextNode {
    type Prep = (String, Progress);
    type Exec = LearnerContext;

    fn name(&self) -> &str {
        GET_CONTEXT
    }

    fn prep(&self, state: &TutorState) -> (String, Progress) {
        (state.page_path.clone(), self.progress.load())
    }

    async fn exec(&self, (page_path, progress): (String, Progress)) -> LearnerContext {
        LearnerContext {
            current_module: LearningModule::from_page_path(&page_path),
            skill_level: SkillLevel::from_completed_count(progress.completed.len()),
            completed_modules: progress.completed,
            printer_type: or_default(progress.printer_type, DEFAULT_PRINTER),
            slicer: or_default(progress.slicer, DEFAULT_SLICER),
        }
    }

    fn post(&self, mut state: TutorState, context: LearnerContext) -> (TutorState, Action) {
        debug!(
            run_id = %state.run_id,
            module = %context.current_module,
            skill = %context.skill_level,
            "Learner context gathered"
        );
        state.context = Some(context);
        (state, Action::Default)
    }
}

/// Turns question, context and mode into a prompt.
#[derive(Debug)]
pub struct BuildPromptNode {
    config: Arc<TutorConfig>,
}

impl BuildPromptNode {
    /// Creates the node; topics come from `config`.
    #[must_use]
    pub fn new(config: Arc<TutorConfig>) -> Self {
        Self { config }
    }
}

#[async_trait]
impl Node<TutorState> for BuildPromptNode {
    type Prep = (String, LearnerContext, TutorMode);
    type Exec = Prompt;

    fn name(&self) -> &str {
        BUILD_PROMPT
    }

    fn prep(&self, state: &TutorState) -> Self::Prep {
        (
            state.question.clone(),
            state.context.clone().unwrap_or_default(),
            state.mode,
        )
    }

    async fn exec(&self, (question, context, mode): Self::Prep) -> Prompt {
        let topics = self.config.topics_for(context.current_module);
        build_prompt(&question, &context, mode, topics)
    }

    fn post(&self, mut state: TutorState, prompt: Prompt) -> (TutorState, Action) {
        state.prompt = Some(prompt);
        (state, Action::Default)
    }
}

/// Asks the inference engine once.
pub struct CallModelNode {
    engine: Arc<dyn InferenceEngine>,
    temperature: f32,
    max_tokens: u32,
}

impl CallModelNode {
    /// Creates the node with the given sampling settings.
    #[must_use]
    pub fn new(engine: Arc<dyn InferenceEngine>, temperature: f32, max_tokens: u32) -> Self {
        Self {
            engine,
            temperature,
            max_tokens,
        }
    }
}

impl fmt::Debug for CallModelNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CallModelNode")
            .field("temperature", &self.temperature)
            .field("max_tokens", &self.max_tokens)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl Node<TutorState> for CallModelNode {
    type Prep = Option<Prompt>;
    type Exec = ModelOutcome;

    fn name(&self) -> &str {
        CALL_LLM
    }

    fn prep(&self, state: &TutorState) -> Option<Prompt> {
        state.prompt.clone()
    }

    async fn exec(&self, prompt: Option<Prompt>) -> ModelOutcome {
        let Some(prompt) = prompt else {
            return ModelOutcome::Failed(MISSING_PROMPT.to_string());
        };

        let request = ChatRequest::new(prompt.system, prompt.user)
            .with_temperature(self.temperature)
            .with_max_tokens(self.max_tokens);

        match self.engine.complete(&request).await {
            Ok(text) => ModelOutcome::Generated(text),
            Err(e) => {
                warn!(error = %e, "Model call failed");
                ModelOutcome::Failed(e.to_string())
            }
        }
    }

    fn post(&self, mut state: TutorState, outcome: ModelOutcome) -> (TutorState, Action) {
        let action = match outcome {
            ModelOutcome::Generated(_) => Action::Success,
            ModelOutcome::Failed(_) => Action::Failure,
        };
        state.outcome = Some(outcome);
        (state, action)
    }
}

/// Renders generated text as HTML.
#[derive(Debug, Default)]
pub struct FormatResponseNode;

#[async_trait]
impl Node<TutorState> for FormatResponseNode {
    type Prep = Option<String>;
    type Exec = TutorResponse;

    fn name(&self) -> &str {
        FORMAT_RESPONSE
    }

    fn prep(&self, state: &TutorState) -> Option<String> {
        match &state.outcome {
            Some(ModelOutcome::Generated(text)) => Some(text.clone()),
            _ => None,
        }
    }

    async fn exec(&self, text: Option<String>) -> TutorResponse {
        TutorResponse::answer(markdown::render(text.as_deref().unwrap_or_default()))
    }

    fn post(&self, mut state: TutorState, response: TutorResponse) -> (TutorState, Action) {
        state.response = Some(response);
        (state, Action::Default)
    }
}

/// Answers from the canned table, or apologizes.
#[derive(Debug, Default)]
pub struct FallbackNode;

#[async_trait]
impl Node<TutorState> for FallbackNode {
    type Prep = (String, String);
    type Exec = TutorResponse;

    fn name(&self) -> &str {
        ERROR_HANDLER
    }

    fn prep(&self, state: &TutorState) -> Self::Prep {
        let error = state.failure().unwrap_or("unknown error").to_string();
        (state.question.clone(), error)
    }

    async fn exec(&self, (question, error): Self::Prep) -> TutorResponse {
        fallback_response(&question, &error)
    }

    fn post(&self, mut state: TutorState, response: TutorResponse) -> (TutorState, Action) {
        state.response = Some(response);
        (state, Action::Default)
    }
}
