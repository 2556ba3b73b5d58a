// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Capability seam between plans and a graph storage engine

use std::collections::BTreeMap;

use super::error::GraphOperationError;
use crate::pattern::Var;
use crate::plan::{Fragment, Plan};

/// Identifier of a concept in the underlying graph
pub type ConceptId = String;

/// One binding of pattern variables to concepts
pub type Answer = BTreeMap<Var, ConceptId>;

/// Partial answers threaded through the steps of a plan
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TraversalState {
    pub answers: Vec<Answer>,
}

impl TraversalState {
    /// A single empty answer, the starting point of an unanchored plan
    pub fn seed() -> Self {
        Self {
            answers: vec![Answer::new()],
        }
    }

    pub fn from_answers(answers: Vec<Answer>) -> Self {
        Self { answers }
    }

    pub fn len(&self) -> usize {
        self.answers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.answers.is_empty()
    }
}

impl Default for TraversalState {
    fn default() -> Self {
        Self::seed()
    }
}

/// Runs single fragments against a graph
pub trait TraversalExecutor: Send + Sync {
    /// Extend or filter every answer in `state` by one fragment
    fn traverse(
        &self,
        fragment: &Fragment,
        state: TraversalState,
    ) -> Result<TraversalState, GraphOperationError>;

    /// Run every step of a plan in order, starting from an empty answer
    fn execute(&self, plan: &Plan) -> Result<TraversalState, GraphOperationError> {
        self.execute_from(plan, TraversalState::seed())
    }

    /// Run every step of a plan in order, starting from caller-bound answers
    fn execute_from(
        &self,
        plan: &Plan,
        state: TraversalState,
    ) -> Result<TraversalState, GraphOperationError> {
        plan.fragments().try_fold(state, |state, fragment| {
            log::trace!("Traversing {} over {} answers", fragment, state.len());
            self.traverse(fragment, state)
        })
    }
}
