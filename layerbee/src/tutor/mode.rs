//! Tutor interaction modes.

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::info;

/// How the tutor should behave.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TutorMode {
    /// Explain concepts.
    #[default]
    Learn,
    /// Test knowledge.
    Quiz,
    /// Help fix print problems.
    Troubleshoot,
    /// Tips for starting a print shop.
    Business,
}

impl TutorMode {
    /// All modes, in menu order.
    pub const ALL: [Self; 4] = [Self::Learn, Self::Quiz, Self::Troubleshoot, Self::Business];

    /// Lowercase identifier.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Learn => "learn",
            Self::Quiz => "quiz",
            Self::Troubleshoot => "troubleshoot",
            Self::Business => "business",
        }
    }

    /// Behavioural directives appended to the system prompt.
    #[must_use]
    pub const fn instructions(self) -> &'static str {
        match self {
            Self::Quiz => {
                "MODE: QUIZ\n\
                 - Ask one question at a time about 3D printing\n\
                 - Give multiple choice when possible (A, B, C, D)\n\
                 - Be encouraging if they get it wrong - explain why\n\
                 - Celebrate correct answers!"
            }
            Self::Troubleshoot => {
                "MODE: TROUBLESHOOT\n\
                 - Help diagnose print problems step by step\n\
                 - Ask clarifying questions (What does it look like? What filament?)\n\
                 - Give specific fixes they can try\n\
                 - Always mention safety (hot surfaces, ventilation)"
            }
            Self::Business => {
                "MODE: BUSINESS HELPER\n\
                 - Help them think about starting a small print business\n\
                 - Emphasize safety: no personal info online, get parent help for money stuff\n\
                 - Focus on school-appropriate ideas\n\
                 - Encourage creativity and entrepreneurship!"
            }
            Self::Learn => {
                "MODE: LEARN\n\
                 - Explain 3D printing concepts clearly\n\
                 - Use simple language (remember: young audience!)\n\
                 - Include fun facts when relevant\n\
                 - Give practical tips they can try"
            }
        }
    }

    /// Message shown in the chat when the learner switches to this mode.
    #[must_use]
    pub const fn announcement(self) -> &'static str {
        match self {
            Self::Learn => "📚 Learning mode - I'll explain concepts clearly!",
            Self::Troubleshoot => "🔧 Troubleshooting mode - Let's fix your print problems!",
            Self::Quiz => "❓ Quiz mode - Ready to test your knowledge!",
            Self::Business => "💼 Business mode - Let's talk about your print shop!",
        }
    }
}

impl fmt::Display for TutorMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a string names no mode.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown tutor mode '{0}'")]
pub struct UnknownMode(pub String);

impl FromStr for TutorMode {
    type Err = UnknownMode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "learn" | "explain" => Ok(Self::Learn),
            "quiz" => Ok(Self::Quiz),
            "troubleshoot" => Ok(Self::Troubleshoot),
            "business" => Ok(Self::Business),
            _ => Err(UnknownMode(s.to_string())),
        }
    }
}

/// Holds the active mode. Unrecognized identifiers leave it unchanged.
#[derive(Debug, Default)]
pub struct ModeSelector {
    current: RwLock<TutorMode>,
}

impl ModeSelector {
    /// Creates a selector starting in `mode`.
    #[must_use]
    pub fn new(mode: TutorMode) -> Self {
        Self {
            current: RwLock::new(mode),
        }
    }

    /// The active mode.
    #[must_use]
    pub fn current(&self) -> TutorMode {
        *self.current.read()
    }

    /// Switches mode if `id` names one. Returns whether it did.
    pub fn select(&self, id: &str) -> bool {
        match id.parse::<TutorMode>() {
            Ok(mode) => {
                *self.current.write() = mode;
                info!(%mode, "Tutor mode set");
                true
            }
            Err(_) => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_modes() {
        assert_eq!("learn".parse::<TutorMode>().unwrap(), TutorMode::Learn);
        assert_eq!("explain".parse::<TutorMode>().unwrap(), TutorMode::Learn);
        assert_eq!("QUIZ".parse::<TutorMode>().unwrap(), TutorMode::Quiz);
        assert_eq!(" troubleshoot ".parse::<TutorMode>().unwrap(), TutorMode::Troubleshoot);
        assert_eq!("business".parse::<TutorMode>().unwrap(), TutorMode::Business);
        assert!("party".parse::<TutorMode>().is_err());
    }

    #[test]
    fn test_selector_ignores_unknown() {
        let selector = ModeSelector::default();
        assert_eq!(selector.current(), TutorMode::Learn);

        assert!(selector.select("quiz"));
        assert_eq!(selector.current(), TutorMode::Quiz);

        assert!(!selector.select("dance"));
        assert_eq!(selector.current(), TutorMode::Quiz);
    }

    #[test]
    fn test_instructions_headers() {
        assert!(TutorMode::Learn.instructions().starts_with("MODE: LEARN"));
        assert!(TutorMode::Business.instructions().starts_with("MODE: BUSINESS HELPER"));
        assert!(TutorMode::Troubleshoot.instructions().contains("hot surfaces"));
    }

    #[test]
    fn test_serde_lowercase() {
        let json = serde_json::to_string(&TutorMode::Troubleshoot).unwrap();
        assert_eq!(json, "\"troubleshoot\"");
    }
}
