//! Testing utilities for the tutor.
//!
//! This module provides:
//! - Scripted and failing inference engines
//! - A fixed progress source
//! - Assertions over tutor flow runs

mod assertions;
mod fixtures;
mod mocks;

pub use assertions::{assert_exactly_one_responder, assert_fell_back, assert_formatted};
pub use fixtures::{StaticProgress, TutorFixture};
pub use mocks::{FailingEngine, ScriptedEngine};
