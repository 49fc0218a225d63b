//! State threaded through one tutor flow run.

use super::mode::TutorMode;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Course module the learner is looking at.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LearningModule {
    /// Printer parts, filaments, first layer.
    #[default]
    Basics,
    /// CAD → slicer → printer.
    Workflow,
    /// Fixing failed prints.
    Troubleshooting,
    /// Tuning and post-processing.
    Advanced,
    /// Running a small print shop.
    Business,
}

impl LearningModule {
    /// Classifies a page path. Later matches win, so
    /// `/business/troubleshoot` is `Business`.
    #[must_use]
    pub fn from_page_path(path: &str) -> Self {
        let mut module = Self::Basics;
        if path.contains("workflow") {
            module = Self::Workflow;
        }
        if path.contains("troubleshoot") {
            module = Self::Troubleshooting;
        }
        if path.contains("advanced") {
            module = Self::Advanced;
        }
        if path.contains("business") {
            module = Self::Business;
        }
        module
    }

    /// Lowercase identifier.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Basics => "basics",
            Self::Workflow => "workflow",
            Self::Troubleshooting => "troubleshooting",
            Self::Advanced => "advanced",
            Self::Business => "business",
        }
    }
}

impl fmt::Display for LearningModule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Coarse learner skill level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SkillLevel {
    /// 0–1 modules completed.
    Beginner,
    /// 2–3 modules completed.
    Intermediate,
    /// 4 or more modules completed.
    Advanced,
}

impl SkillLevel {
    /// Derives the level from the number of completed modules.
    #[must_use]
    pub const fn from_completed_count(count: usize) -> Self {
        match count {
            0 | 1 => Self::Beginner,
            2 | 3 => Self::Intermediate,
            _ => Self::Advanced,
        }
    }

    /// Lowercase identifier.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Beginner => "beginner",
            Self::Intermediate => "intermediate",
            Self::Advanced => "advanced",
        }
    }
}

impl fmt::Display for SkillLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What the tutor knows about the learner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LearnerContext {
    /// Module of the current page.
    pub current_module: LearningModule,
    /// Completed module ids.
    pub completed_modules: Vec<String>,
    /// Derived skill level.
    pub skill_level: SkillLevel,
    /// Learner's printer.
    pub printer_type: String,
    /// Learner's slicer.
    pub slicer: String,
}

impl Default for LearnerContext {
    fn default() -> Self {
        Self {
            current_module: LearningModule::Basics,
            completed_modules: Vec::new(),
            skill_level: SkillLevel::Beginner,
            printer_type: DEFAULT_PRINTER.to_string(),
            slicer: DEFAULT_SLICER.to_string(),
        }
    }
}

/// Printer named in the prompt when the learner has not set one.
pub const DEFAULT_PRINTER: &str = "any FDM printer";

/// Slicer named in the prompt when the learner has not set one.
pub const DEFAULT_SLICER: &str = "Cura or Bambu Studio";

/// System instructions plus the learner's message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Prompt {
    /// System instructions.
    pub system: String,
    /// The learner's raw question.
    pub user: String,
}

/// Result of asking the model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", content = "value", rename_all = "lowercase")]
pub enum ModelOutcome {
    /// The model produced text.
    Generated(String),
    /// The model failed; the message is human readable.
    Failed(String),
}

/// The answer handed to the display surface.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TutorResponse {
    /// Generated markup.
    pub html: String,
    /// True when only the generic apology could be produced.
    pub is_error: bool,
}

impl TutorResponse {
    /// A usable answer.
    #[must_use]
    pub fn answer(html: impl Into<String>) -> Self {
        Self {
            html: html.into(),
            is_error: false,
        }
    }

    /// An apology.
    #[must_use]
    pub fn error(html: impl Into<String>) -> Self {
        Self {
            html: html.into(),
            is_error: true,
        }
    }
}

/// Shared state for one question. Created per call and dropped afterwards.
#[derive(Debug, Clone)]
pub struct TutorState {
    /// Identifies this run in logs.
    pub run_id: Uuid,
    /// The learner's question.
    pub question: String,
    /// Mode captured when the question was asked.
    pub mode: TutorMode,
    /// Path of the page the question was asked from.
    pub page_path: String,
    /// Filled by the context node.
    pub context: Option<LearnerContext>,
    /// Filled by the prompt node.
    pub prompt: Option<Prompt>,
    /// Filled by the model node.
    pub outcome: Option<ModelOutcome>,
    /// Filled by the format or fallback node.
    pub response: Option<TutorResponse>,
}

impl TutorState {
    /// Creates a fresh state for `question`.
    #[must_use]
    pub fn new(question: impl Into<String>, mode: TutorMode, page_path: impl Into<String>) -> Self {
        Self {
            run_id: Uuid::new_v4(),
            question: question.into(),
            mode,
            page_path: page_path.into(),
            context: None,
            prompt: None,
            outcome: None,
            response: None,
        }
    }

    /// The failure message, if the model failed.
    #[must_use]
    pub fn failure(&self) -> Option<&str> {
        match &self.outcome {
            Some(ModelOutcome::Failed(msg)) => Some(msg),
            _ => None,
        }
    }
}
