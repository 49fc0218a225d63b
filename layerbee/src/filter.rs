//! Content filter that keeps chat messages, shop fields and uploaded file
//! names kid-safe.
//!
//! Checks are plain pattern matches. The profanity list is stored base64
//! encoded and decoded on first use.

use base64::{engine::general_purpose::STANDARD, Engine};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Longest accepted name.
pub const MAX_NAME_LENGTH: usize = 30;
/// Longest accepted message.
pub const MAX_MESSAGE_LENGTH: usize = 500;
/// Longest accepted file name.
pub const MAX_FILENAME_LENGTH: usize = 100;

const PROFANITY_ENCODED: &[&str] = &[
    "ZnVjaw==", "c2hpdA==", "YXNz", "Yml0Y2g=", "ZGFtbg==",
    "aGVsbA==", "Y3JhcA==", "cGlzcw==", "d2hvcmU=", "c2x1dA==",
    "ZmFn", "bmlnZ2E=", "bmlnZ2Vy", "Y3VudA==", "ZGljaw==",
    "Y29jaw==", "cHVzc3k=", "Ym9vYg==", "dGl0", "YmFzdGFyZA==",
    "ZnVjazFuZw==", "c2gxdA==", "YTU1", "YjF0Y2g=", "ZHVtYmFzcw==",
    "amFja2Fzcw==", "a2lzc215YXNz", "cGVuaXM=", "dmFnaW5h",
];

const WEAPON_PATTERNS: &[&str] = &[
    r"(?i)\b(gun|guns|pistol|rifle|shotgun|firearm|ar[\-]?15|ak[\-]?47|glock|handgun|revolver|semi[\-]?auto)\b",
    r"(?i)\b(ammo|ammunition|bullet|bullets|cartridge|magazine|clip)\b",
    r"(?i)\b(knife|knives|sword|blade|dagger|machete|katana|switchblade|butterfly\s*knife)\b",
    r"(?i)\b(bomb|grenade|explosive|dynamite|c4|detonator|ied)\b",
    r"(?i)\b(weapon|weapons|nunchuck|brass\s*knuckles|taser|crossbow)\b",
    r"(?i)\b(trigger|silencer|suppressor|barrel|receiver|stock|grip)\b",
    r"(?i)\b(kill|murder|attack|shoot|stab|hurt|harm)\s+(someone|people|person|him|her|them)\b",
];

const INAPPROPRIATE_PATTERNS: &[&str] = &[
    r"(?i)how\s+to\s+(make|build|create)\s+(a\s+)?(bomb|weapon|gun|knife)",
    r"(?i)how\s+to\s+(hurt|harm|kill|attack)",
    r"(?i)\b(sex|porn|nude|naked|xxx)\b",
    r"(?i)\b(drug|drugs|weed|cocaine|heroin|meth|marijuana)\b",
    r"(?i)how\s+to\s+hack",
    r"(?i)\b(steal|stealing)\s+(money|credit\s*card)",
];

fn compile(patterns: &[&str]) -> Vec<Regex> {
    patterns.iter().filter_map(|p| Regex::new(p).ok()).collect()
}

static PROFANITY: Lazy<Vec<Regex>> = Lazy::new(|| {
    PROFANITY_ENCODED
        .iter()
        .filter_map(|encoded| STANDARD.decode(encoded).ok())
        .filter_map(|bytes| String::from_utf8(bytes).ok())
        .filter_map(|word| {
            Regex::new(&format!(r"(?i)\b{}(s|ed|ing|er)?\b", regex::escape(&word))).ok()
        })
        .collect()
});

static WEAPONS: Lazy<Vec<Regex>> = Lazy::new(|| compile(WEAPON_PATTERNS));

static INAPPROPRIATE: Lazy<Vec<Regex>> = Lazy::new(|| compile(INAPPROPRIATE_PATTERNS));

static NAME_CHARS: Lazy<Option<Regex>> =
    Lazy::new(|| Regex::new(r"^[a-zA-Z0-9\s\-'\.]+$").ok());

static MESSAGE_CHARS: Lazy<Option<Regex>> =
    Lazy::new(|| Regex::new(r"^[a-zA-Z0-9\s\-'\.!?,;:()@#$%&*+=\n]+$").ok());

static FILENAME_CHARS: Lazy<Option<Regex>> =
    Lazy::new(|| Regex::new(r"^[a-zA-Z0-9_\-\.]+$").ok());

static MODEL_EXTENSION: Lazy<Option<Regex>> =
    Lazy::new(|| Regex::new(r"(?i)\.(stl|obj|3mf|gcode)$").ok());

/// The kind of field being validated. Picks the length limit and the
/// character allowlist.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldKind {
    /// Customer names.
    Name,
    /// Free text such as order notes.
    Message,
    /// Uploaded file names.
    Filename,
}

impl FieldKind {
    /// Maximum length in characters.
    #[must_use]
    pub const fn max_len(self) -> usize {
        match self {
            Self::Name => MAX_NAME_LENGTH,
            Self::Message => MAX_MESSAGE_LENGTH,
            Self::Filename => MAX_FILENAME_LENGTH,
        }
    }

    fn allowlist(self) -> Option<&'static Regex> {
        match self {
            Self::Name => NAME_CHARS.as_ref(),
            Self::Message => MESSAGE_CHARS.as_ref(),
            Self::Filename => FILENAME_CHARS.as_ref(),
        }
    }
}

/// Category of blocked content, used to pick a redirect message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BlockedContent {
    /// Bad language.
    Profanity,
    /// Weapons or violent intent.
    Weapon,
    /// Topics an educational bot should not discuss.
    Inappropriate,
    /// Anything else.
    General,
}

impl fmt::Display for BlockedContent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Profanity => "profanity",
            Self::Weapon => "weapon",
            Self::Inappropriate => "inappropriate",
            Self::General => "general",
        })
    }
}

/// Outcome of a validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum Verdict {
    /// The input passed. `sanitized` is safe to display.
    Allowed {
        /// Cleaned-up input.
        sanitized: String,
    },
    /// The input was rejected.
    Rejected {
        /// Short explanation for the user.
        reason: String,
        /// Friendly chat reply to show instead of an answer.
        #[serde(skip_serializing_if = "Option::is_none")]
        redirect: Option<String>,
    },
}

impl Verdict {
    fn allowed(sanitized: impl Into<String>) -> Self {
        Self::Allowed {
            sanitized: sanitized.into(),
        }
    }

    fn rejected(reason: impl Into<String>) -> Self {
        Self::Rejected {
            reason: reason.into(),
            redirect: None,
        }
    }

    fn redirected(reason: impl Into<String>, redirect: impl Into<String>) -> Self {
        Self::Rejected {
            reason: reason.into(),
            redirect: Some(redirect.into()),
        }
    }

    /// Returns true if the input passed.
    #[must_use]
    pub const fn is_allowed(&self) -> bool {
        matches!(self, Self::Allowed { .. })
    }

    /// The rejection reason, if any.
    #[must_use]
    pub fn reason(&self) -> Option<&str> {
        match self {
            Self::Allowed { .. } => None,
            Self::Rejected { reason, .. } => Some(reason),
        }
    }
}

fn any_match(patterns: &[Regex], text: &str) -> bool {
    !text.is_empty() && patterns.iter().any(|re| re.is_match(text))
}

/// Returns true if `text` contains profanity.
#[must_use]
pub fn has_profanity(text: &str) -> bool {
    any_match(&PROFANITY, text)
}

/// Returns true if `text` mentions weapons or violent intent.
#[must_use]
pub fn has_weapon_content(text: &str) -> bool {
    any_match(&WEAPONS, text)
}

/// Returns true if `text` asks for something an educational bot should not
/// help with.
#[must_use]
pub fn has_inappropriate_request(text: &str) -> bool {
    any_match(&INAPPROPRIATE, text)
}

/// Returns true if every character of `text` is allowed for `kind`.
#[must_use]
pub fn has_valid_characters(text: &str, kind: FieldKind) -> bool {
    text.is_empty() || kind.allowlist().is_some_and(|re| re.is_match(text))
}

/// Returns true if `text` fits the length limit for `kind`.
#[must_use]
pub fn is_within_length(text: &str, kind: FieldKind) -> bool {
    text.chars().count() <= kind.max_len()
}

/// Escapes the characters that are significant in HTML text.
#[must_use]
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(c),
        }
    }
    out
}

/// Validates a print shop text field. Empty input is allowed.
#[must_use]
pub fn validate_shop_input(text: &str, kind: FieldKind) -> Verdict {
    let text = text.trim();
    if text.is_empty() {
        return Verdict::allowed("");
    }
    if !is_within_length(text, kind) {
        return Verdict::rejected(format!(
            "Text is too long (max {} characters)",
            kind.max_len()
        ));
    }
    if !has_valid_characters(text, kind) {
        return Verdict::rejected("Only letters, numbers, and basic punctuation allowed");
    }
    if has_profanity(text) {
        return Verdict::rejected("Please use appropriate language");
    }
    if has_weapon_content(text) {
        return Verdict::rejected("This type of content is not allowed");
    }
    Verdict::allowed(escape_html(text))
}

/// Validates a chat message before it reaches the tutor.
#[must_use]
pub fn validate_chat_message(message: &str) -> Verdict {
    let message = message.trim();
    if message.is_empty() {
        return Verdict::rejected("Please enter a message");
    }
    if !is_within_length(message, FieldKind::Message) {
        return Verdict::rejected(format!(
            "Message is too long (max {MAX_MESSAGE_LENGTH} characters)"
        ));
    }
    if has_profanity(message) {
        return Verdict::redirected(
            "Please use appropriate language when chatting with LayerBEE!",
            redirect_message(BlockedContent::Profanity),
        );
    }
    if has_inappropriate_request(message) {
        return Verdict::redirected(
            "This topic is not appropriate for LayerBEE",
            redirect_message(BlockedContent::Inappropriate),
        );
    }
    if has_weapon_content(message) {
        return Verdict::redirected(
            "LayerBEE cannot help with this type of request",
            redirect_message(BlockedContent::Weapon),
        );
    }
    Verdict::allowed(message)
}

/// Validates an uploaded model file name.
///
/// The extension is stripped and `_`/`-` become spaces before the content
/// checks, so `gun_holder.stl` is caught.
#[must_use]
pub fn validate_file_name(filename: &str) -> Verdict {
    if filename.is_empty() {
        return Verdict::rejected("No filename provided");
    }

    let base = MODEL_EXTENSION
        .as_ref()
        .map_or_else(|| filename.into(), |re| re.replace(filename, ""));
    let normalized = base.replace(|c: char| c == '_' || c == '-', " ");

    if has_weapon_content(&normalized) {
        return Verdict::rejected("This file name suggests content that is not allowed");
    }
    if has_profanity(&normalized) {
        return Verdict::rejected("Please rename the file with appropriate language");
    }
    if !has_valid_characters(filename, FieldKind::Filename) {
        return Verdict::rejected(
            "File name can only contain letters, numbers, underscores, and hyphens",
        );
    }
    if !is_within_length(filename, FieldKind::Filename) {
        return Verdict::rejected(format!(
            "File name is too long (max {MAX_FILENAME_LENGTH} characters)"
        ));
    }
    Verdict::allowed(filename)
}

/// The friendly chat reply shown instead of an answer to blocked content.
#[must_use]
pub const fn redirect_message(kind: BlockedContent) -> &'static str {
    match kind {
        BlockedContent::Profanity => {
            "Let's keep our conversation friendly! Is there something about 3D printing I can help you with?"
        }
        BlockedContent::Weapon => {
            "I can only help with safe, creative 3D printing projects. What would you like to make? Phone stands, toys, desk organizers?"
        }
        BlockedContent::Inappropriate => {
            "I'm here to help with 3D printing! Ask me about filaments, slicer settings, troubleshooting, or starting a print shop."
        }
        BlockedContent::General => "Is there something about 3D printing I can help you with today?",
    }
}
