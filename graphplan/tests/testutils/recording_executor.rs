//! Traversal executor that records fragments and fabricates bindings

use graphplan::exec::GraphOperationError;
use graphplan::{Fragment, TraversalExecutor, TraversalState};
use parking_lot::Mutex;

/// Binds every variable a fragment touches to `V-<name>` and records the fragment
#[derive(Default)]
pub struct RecordingExecutor {
    visited: Mutex<Vec<String>>,
}

impl RecordingExecutor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rendered fragments in the order they were traversed
    pub fn visited(&self) -> Vec<String> {
        self.visited.lock().clone()
    }
}

impl TraversalExecutor for RecordingExecutor {
    fn traverse(
        &self,
        fragment: &Fragment,
        mut state: TraversalState,
    ) -> Result<TraversalState, GraphOperationError> {
        self.visited.lock().push(fragment.to_string());
        for answer in &mut state.answers {
            for var in fragment.variable_names() {
                answer
                    .entry(var.clone())
                    .or_insert_with(|| format!("V-{}", var.name()));
            }
        }
        Ok(state)
    }
}

/// Fails on the first fragment it is asked to run
pub struct FailingExecutor;

impl TraversalExecutor for FailingExecutor {
    fn traverse(
        &self,
        fragment: &Fragment,
        _state: TraversalState,
    ) -> Result<TraversalState, GraphOperationError> {
        Err(GraphOperationError::TraversalFailed {
            fragment: fragment.to_string(),
            reason: "storage unavailable".to_string(),
        })
    }
}
