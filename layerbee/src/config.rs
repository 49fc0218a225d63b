//! Configuration for LayerBEE.
//!
//! Loaded from `layerbee.json`. Every field has a default, so a missing file
//! or a partial file is fine.

use crate::errors::{LayerbeeError, Result};
use crate::inference::{DEFAULT_MAX_TOKENS, DEFAULT_TEMPERATURE};
use crate::tutor::{LearningModule, TutorMode};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use std::time::Duration;

/// The default config file name.
pub const CONFIG_FILE_NAME: &str = "layerbee.json";

/// Model id sent when the config names none.
pub const DEFAULT_MODEL_ID: &str = "Llama-3.2-1B-Instruct-q4f16_1-MLC";

fn default_data_dir() -> String {
    ".layerbee".to_string()
}

fn default_model_id() -> String {
    DEFAULT_MODEL_ID.to_string()
}

const fn default_temperature() -> f32 {
    DEFAULT_TEMPERATURE
}

const fn default_max_tokens() -> u32 {
    DEFAULT_MAX_TOKENS
}

const fn default_timeout() -> f64 {
    60.0
}

/// Longest accepted request timeout, one day.
pub const MAX_TIMEOUT_SECONDS: f64 = 86_400.0;

const fn default_max_steps() -> usize {
    16
}

/// Top-level configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayerbeeConfig {
    /// Directory for the file-backed store.
    #[serde(default = "default_data_dir")]
    pub data_dir: String,

    /// Inference engine settings.
    #[serde(default)]
    pub engine: EngineConfig,

    /// Tutor settings.
    #[serde(default)]
    pub tutor: TutorConfig,
}

impl Default for LayerbeeConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            engine: EngineConfig::default(),
            tutor: TutorConfig::default(),
        }
    }
}

impl LayerbeeConfig {
    /// Loads `layerbee.json` from `dir`, or defaults if it does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be parsed or fails
    /// validation.
    pub fn load_from_dir(dir: &Path) -> Result<Self> {
        Self::load_from_file(&dir.join(CONFIG_FILE_NAME))
    }

    /// Loads a config file, or defaults if it does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be parsed or fails
    /// validation.
    pub fn load_from_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::debug!(path = %path.display(), "No config file, using defaults");
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&content)
            .map_err(|e| LayerbeeError::config(path.display().to_string(), e.to_string()))?;
        config
            .validate()
            .map_err(|e| LayerbeeError::config(path.display().to_string(), e.to_string()))?;
        Ok(config)
    }

    /// Checks value ranges.
    ///
    /// # Errors
    ///
    /// Returns [`LayerbeeError::Validation`] describing the first bad value.
    pub fn validate(&self) -> Result<()> {
        if self.data_dir.trim().is_empty() {
            return Err(LayerbeeError::Validation("dataDir must not be empty".to_string()));
        }
        self.engine.validate()?;
        self.tutor.validate()
    }
}

/// Inference engine settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EngineConfig {
    /// Base URL of an OpenAI-compatible API, e.g. `http://localhost:8080/v1`.
    /// When unset, the tutor runs without a model and answers from the
    /// fallback table.
    #[serde(default)]
    pub endpoint: Option<String>,

    /// Model identifier sent with each request.
    #[serde(default = "default_model_id")]
    pub model_id: String,

    /// Name of the environment variable holding the API key.
    #[serde(default)]
    pub api_key_env: Option<String>,

    /// Sampling temperature.
    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// Completion length cap.
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    /// Request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout_seconds: f64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            endpoint: None,
            model_id: default_model_id(),
            api_key_env: None,
            temperature: default_temperature(),
            max_tokens: default_max_tokens(),
            timeout_seconds: default_timeout(),
        }
    }
}

impl EngineConfig {
    /// Request timeout as a `Duration`. Values that do not fit a
    /// `Duration` give the default timeout.
    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::try_from_secs_f64(self.timeout_seconds)
            .unwrap_or_else(|_| Duration::from_secs_f64(default_timeout()))
    }

    fn validate(&self) -> Result<()> {
        if !(0.0..=2.0).contains(&self.temperature) {
            return Err(LayerbeeError::Validation(format!(
                "engine.temperature must be between 0 and 2, got {}",
                self.temperature
            )));
        }
        if self.max_tokens == 0 {
            return Err(LayerbeeError::Validation("engine.maxTokens must be positive".to_string()));
        }
        if !self.timeout_seconds.is_finite() || self.timeout_seconds <= 0.0 {
            return Err(LayerbeeError::Validation(
                "engine.timeoutSeconds must be positive".to_string(),
            ));
        }
        if self.timeout_seconds > MAX_TIMEOUT_SECONDS {
            return Err(LayerbeeError::Validation(format!(
                "engine.timeoutSeconds must be at most {MAX_TIMEOUT_SECONDS}, got {}",
                self.timeout_seconds
            )));
        }
        Ok(())
    }
}

/// Tutor settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TutorConfig {
    /// Mode the tutor starts in.
    #[serde(default)]
    pub default_mode: TutorMode,

    /// Loop guard for the tutor flow.
    #[serde(default = "default_max_steps")]
    pub max_steps: usize,

    /// Topics the tutor may cover, by module.
    #[serde(default = "default_topics")]
    pub topics: BTreeMap<LearningModule, Vec<String>>,
}

impl Default for TutorConfig {
    fn default() -> Self {
        Self {
            default_mode: TutorMode::default(),
            max_steps: default_max_steps(),
            topics: default_topics(),
        }
    }
}

impl TutorConfig {
    /// Topics for `module`, falling back to the basics list.
    #[must_use]
    pub fn topics_for(&self, module: LearningModule) -> &[String] {
        self.topics
            .get(&module)
            .or_else(|| self.topics.get(&LearningModule::Basics))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    fn validate(&self) -> Result<()> {
        if self.max_steps == 0 {
            return Err(LayerbeeError::Validation("tutor.maxSteps must be positive".to_string()));
        }
        Ok(())
    }
}

fn default_topics() -> BTreeMap<LearningModule, Vec<String>> {
    let list = |items: &[&str]| items.iter().map(|s| (*s).to_string()).collect::<Vec<_>>();
    BTreeMap::from([
        (
            LearningModule::Basics,
            list(&[
                "What is FDM 3D printing",
                "Parts of a 3D printer (bed, hotend, extruder, nozzle)",
                "Filament types (PLA, PETG, TPU)",
                "First layer importance",
                "Bed leveling basics",
            ]),
        ),
        (
            LearningModule::Workflow,
            list(&[
                "Design in Tinkercad or other CAD",
                "Export as STL file",
                "Import into slicer (Cura, PrusaSlicer, Bambu Studio)",
                "Slicer settings (layer height, infill, supports)",
                "Send to printer and monitor",
            ]),
        ),
        (
            LearningModule::Troubleshooting,
            list(&[
                "Stringing and oozing",
                "Warping and adhesion problems",
                "Layer shifting",
                "Under/over extrusion",
                "Clogged nozzle",
                "Failed supports",
            ]),
        ),
        (
            LearningModule::Advanced,
            list(&[
                "Multi-color printing",
                "Different nozzle sizes",
                "Print speed optimization",
                "Temperature tuning",
                "Custom supports",
                "Post-processing (sanding, painting)",
            ]),
        ),
        (
            LearningModule::Business,
            list(&[
                "Finding what to sell",
                "Pricing your prints",
                "Taking good photos",
                "Setting up an online store",
                "Handling orders safely",
                "Customer service basics",
            ]),
        ),
    ])
}
