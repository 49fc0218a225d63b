//! Assertions over tutor flow runs.

use crate::flow::FlowRun;
use crate::tutor::{TutorState, ERROR_HANDLER, FORMAT_RESPONSE};

/// Asserts that exactly one of the formatting and fallback nodes ran.
pub fn assert_exactly_one_responder(run: &FlowRun<TutorState>) {
    let formatted = run.visited(FORMAT_RESPONSE);
    let fell_back = run.visited(ERROR_HANDLER);
    assert!(
        formatted ^ fell_back,
        "Expected exactly one responder node, path was {:?}",
        run.path
    );
    assert!(
        run.state.response.is_some(),
        "Expected a response, path was {:?}",
        run.path
    );
}

/// Asserts that the run answered through the formatting node.
pub fn assert_formatted(run: &FlowRun<TutorState>) {
    assert_exactly_one_responder(run);
    assert!(
        run.visited(FORMAT_RESPONSE),
        "Expected {FORMAT_RESPONSE} to run, path was {:?}",
        run.path
    );
}

/// Asserts that the run answered through the fallback node.
pub fn assert_fell_back(run: &FlowRun<TutorState>) {
    assert_exactly_one_responder(run);
    assert!(
        run.visited(ERROR_HANDLER),
        "Expected {ERROR_HANDLER} to run, path was {:?}",
        run.path
    );
}
