//! Node trait and implementations.
//!
//! A node is one unit of work in a [`super::Flow`]. Running a node is the
//! strict sequence `prep` → `exec` → `post`. Only `post` may produce a new
//! state, so `prep` always observes the state the previous node left behind.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt::{self, Debug};

/// Transition label returned by a node to pick the next node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Action {
    /// Unconditional single-path transition.
    #[serde(rename = "default")]
    Default,
    /// The node's work succeeded.
    #[serde(rename = "success")]
    Success,
    /// The node's work failed.
    #[serde(rename = "error")]
    Failure,
}

impl Action {
    /// The wire label of this action.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Default => "default",
            Self::Success => "success",
            Self::Failure => "error",
        }
    }
}

impl Default for Action {
    fn default() -> Self {
        Self::Default
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A processing stage in a flow over state `S`.
///
/// # Example
///
/// ```rust,ignore
/// #[derive(Debug)]
/// struct Double;
///
/// #[async_trait]
/// impl Node<u32> for Double {
///     type Prep = u32;
///     type Exec = u32;
///
///     fn name(&self) -> &str { "Double" }
///     fn prep(&self, state: &u32) -> u32 { *state }
///     async fn exec(&self, n: u32) -> u32 { n * 2 }
///     fn post(&self, _state: u32, n: u32) -> (u32, Action) { (n, Action::Default) }
/// }
/// ```
#[async_trait]
pub trait Node<S>: Send + Sync + Debug
where
    S: Send + 'static,
{
    /// Value extracted from the state for `exec`.
    type Prep: Send + 'static;
    /// Value produced by `exec` for `post`.
    type Exec: Send + 'static;

    /// Returns the name of the node. Edges refer to nodes by this name.
    fn name(&self) -> &str;

    /// Reads what the node needs from the state.
    fn prep(&self, state: &S) -> Self::Prep;

    /// Does the work. This is the only step allowed to suspend.
    async fn exec(&self, prep: Self::Prep) -> Self::Exec;

    /// Writes the result into the state and chooses the next action.
    fn post(&self, state: S, exec: Self::Exec) -> (S, Action);
}

/// Object-safe view of a [`Node`] used by the flow engine.
#[async_trait]
pub trait Runnable<S>: Send + Sync + Debug
where
    S: Send + 'static,
{
    /// Returns the name of the node.
    fn node_name(&self) -> &str;

    /// Runs `prep` → `exec` → `post`.
    async fn run(&self, state: S) -> (S, Action);
}

#[async_trait]
impl<S, N> Runnable<S> for N
where
    S: Send + 'static,
    N: Node<S>,
{
    fn node_name(&self) -> &str {
        self.name()
    }

    async fn run(&self, state: S) -> (S, Action) {
        let prep = self.prep(&state);
        let exec = self.exec(prep).await;
        self.post(state, exec)
    }
}

/// A node built from a single synchronous closure over the state.
pub struct FnNode<S, F>
where
    F: Fn(S) -> (S, Action) + Send + Sync,
{
    name: String,
    func: F,
    _state: std::marker::PhantomData<fn(S) -> S>,
}

impl<S, F> FnNode<S, F>
where
    F: Fn(S) -> (S, Action) + Send + Sync,
{
    /// Creates a new function-based node.
    pub fn new(name: impl Into<String>, func: F) -> Self {
        Self {
            name: name.into(),
            func,
            _state: std::marker::PhantomData,
        }
    }
}

impl<S, F> Debug for FnNode<S, F>
where
    F: Fn(S) -> (S, Action) + Send + Sync,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnNode").field("name", &self.name).finish()
    }
}

#[async_trait]
impl<S, F> Node<S> for FnNode<S, F>
where
    S: Send + 'static,
    F: Fn(S) -> (S, Action) + Send + Sync,
{
    type Prep = ();
    type Exec = ();

    fn name(&self) -> &str {
        &self.name
    }

    fn prep(&self, _state: &S) {}

    async fn exec(&self, _prep: ()) {}

    fn post(&self, state: S, _exec: ()) -> (S, Action) {
        (self.func)(state)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug)]
    struct Double;

    #[async_trait]
    impl Node<u32> for Double {
        type Prep = u32;
        type Exec = u32;

        fn name(&self) -> &str {
            "Double"
        }

        fn prep(&self, state: &u32) -> u32 {
            *state
        }

        async fn exec(&self, n: u32) -> u32 {
            tokio::task::yield_now().await;
            n * 2
        }

        fn post(&self, _state: u32, n: u32) -> (u32, Action) {
            let action = if n > 10 { Action::Failure } else { Action::Success };
            (n, action)
        }
    }

    #[tokio::test]
    async fn test_node_runs_prep_exec_post() {
        let (state, action) = Double.run(3).await;
        assert_eq!(state, 6);
        assert_eq!(action, Action::Success);

        let (state, action) = Double.run(6).await;
        assert_eq!(state, 12);
        assert_eq!(action, Action::Failure);
    }

    #[tokio::test]
    async fn test_fn_node() {
        let node = FnNode::new("inc", |n: u32| (n + 1, Action::Default));
        assert_eq!(node.node_name(), "inc");

        let (state, action) = node.run(41).await;
        assert_eq!(state, 42);
        assert_eq!(action, Action::Default);
    }

    #[test]
    fn test_action_labels() {
        assert_eq!(Action::Default.to_string(), "default");
        assert_eq!(Action::Success.to_string(), "success");
        assert_eq!(Action::Failure.to_string(), "error");
        assert_eq!(Action::default(), Action::Default);
    }
}
