//! The LayerBEE tutor.
//!
//! A question runs through a five-node flow:
//!
//! ```text
//! GetContext → BuildPrompt → CallLLM ─success→ FormatResponse
//!                                    └─error──→ ErrorHandler
//! ```
//!
//! Exactly one of `FormatResponse` and `ErrorHandler` produces the answer.

mod fallback;
pub mod markdown;
mod mode;
mod nodes;
mod prompt;
mod service;
mod state;

mod tutor_tests;

pub use fallback::{apology, canned_answer, fallback_response};
pub use mode::{ModeSelector, TutorMode, UnknownMode};
pub use nodes::{
    BuildPromptNode, CallModelNode, FallbackNode, FormatResponseNode, GatherContextNode,
    BUILD_PROMPT, CALL_LLM, ERROR_HANDLER, FORMAT_RESPONSE, GET_CONTEXT,
};
pub use prompt::build_prompt;
pub use service::{SessionReply, Tutor, TutorSession, FLOW_NAME};
pub use state::{
    LearnerContext, LearningModule, ModelOutcome, Prompt, SkillLevel, TutorResponse, TutorState,
    DEFAULT_PRINTER, DEFAULT_SLICER,
};
