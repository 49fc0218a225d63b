//! # LayerBEE
//!
//! Tutor, learner progress and print shop for a kids' 3D printing course.
//!
//! The centerpiece is the tutor: a small flow graph that turns a learner's
//! question into an HTML answer. It always answers, falling back to canned
//! tips when the model is missing or fails.
//!
//! - **Tutor flow**: gather context, build prompt, call model, then format
//!   or fall back
//! - **Progress**: completed modules, logged prints and printer setup
//! - **Shop**: catalog, cart and orders with integer-cent prices
//! - **Content filter**: kid-safe checks for chat and shop input
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use layerbee::prelude::*;
//!
//! let store = Arc::new(MemoryStore::new());
//! let progress = Arc::new(ProgressTracker::new(store));
//! let tutor = Tutor::new(Arc::new(EngineSlot::new()), progress);
//!
//! let reply = tutor.ask("Why is my print stringing?").await;
//! println!("{}", reply.html);
//! ```

#![forbid(unsafe_code)]
#![warn(
    clippy::all,
    clippy::pedantic,
    missing_docs,
    rust_2018_idioms
)]
#![allow(
    clippy::module_name_repetitions,
    clippy::must_use_candidate,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc
)]

pub mod config;
pub mod errors;
pub mod events;
pub mod filter;
pub mod flow;
pub mod inference;
pub mod observability;
pub mod progress;
pub mod quiz;
pub mod shop;
pub mod storage;
pub mod testing;
pub mod theme;
pub mod tutor;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::config::{EngineConfig, LayerbeeConfig, TutorConfig};
    pub use crate::errors::{FlowError, InferenceError, LayerbeeError, Result};
    pub use crate::events::{CollectingEventSink, EventSink, LoggingEventSink, NoOpEventSink};
    pub use crate::filter::{
        validate_chat_message, validate_file_name, validate_shop_input, FieldKind, Verdict,
    };
    pub use crate::flow::{Action, Flow, FlowBuilder, FlowRun, Node};
    pub use crate::inference::{ChatRequest, EngineSlot, InferenceEngine, UnavailableEngine};
    pub use crate::progress::{Progress, ProgressSource, ProgressTracker};
    pub use crate::quiz::{Quiz, QuizQuestion, QuizResult};
    pub use crate::shop::{Cart, CustomerInfo, Order, Shop};
    pub use crate::storage::{FileStore, KeyValueStore, MemoryStore};
    pub use crate::theme::{Theme, ThemeManager};
    pub use crate::tutor::{SessionReply, Tutor, TutorMode, TutorResponse, TutorSession};
    pub use std::sync::Arc;
}
