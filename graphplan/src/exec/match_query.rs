// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Match queries: a pattern, an optional selection, and lazy answer streams
//!
//! Structural problems (no patterns, conflicting types, an empty selection)
//! are reported when the query is built. Everything that needs the schema
//! or the graph, including selecting a variable the pattern never mentions,
//! is reported by the answer stream when it is first consumed.

use std::collections::HashSet;
use std::mem;
use std::sync::Arc;

use super::traversal::{Answer, TraversalExecutor};
use crate::error::Result;
use crate::pattern::{Pattern, Var};
use crate::plan::{Plan, QueryPlanner};
use crate::schema::{PatternValidator, SchemaProvider, ValidationError};

/// Collaborators needed to run a query
#[derive(Clone, Copy)]
pub struct QueryContext<'a> {
    pub planner: &'a QueryPlanner,
    pub schema: &'a dyn SchemaProvider,
    pub executor: &'a dyn TraversalExecutor,
}

/// A match query over one pattern
#[derive(Debug, Clone)]
pub struct MatchQuery {
    pattern: Pattern,
    selected: Option<Vec<Var>>,
}

impl MatchQuery {
    pub fn new(pattern: Pattern) -> std::result::Result<Self, ValidationError> {
        PatternValidator::check_structure(&pattern)?;
        Ok(Self {
            pattern,
            selected: None,
        })
    }

    pub fn pattern(&self) -> &Pattern {
        &self.pattern
    }

    /// Restrict answers to the given variables
    pub fn select(
        mut self,
        vars: impl IntoIterator<Item = Var>,
    ) -> std::result::Result<Self, ValidationError> {
        let vars: Vec<Var> = vars.into_iter().collect();
        if vars.is_empty() {
            return Err(ValidationError::NoSelectVariables);
        }
        self.selected = Some(vars);
        Ok(self)
    }

    /// Selected variables, or every user variable of the pattern when nothing was selected
    pub fn selected_vars(&self) -> Vec<Var> {
        match &self.selected {
            Some(vars) => vars.clone(),
            None => self
                .pattern
                .variables()
                .into_iter()
                .filter(|v| !v.is_generated())
                .collect(),
        }
    }

    pub fn plan(&self, planner: &QueryPlanner, schema: &dyn SchemaProvider) -> Result<Arc<Plan>> {
        planner.plan(&self.pattern, schema)
    }

    /// Answers projected onto the selected variables
    pub fn stream<'a>(&'a self, ctx: QueryContext<'a>) -> Answers<'a> {
        Answers::pending(move || self.run(self.selected_vars(), ctx))
    }

    /// Answers projected onto a single variable
    pub fn get<'a>(&'a self, var: Var, ctx: QueryContext<'a>) -> Answers<'a> {
        Answers::pending(move || self.run(vec![var], ctx))
    }

    fn run(&self, projection: Vec<Var>, ctx: QueryContext<'_>) -> Result<Vec<Answer>> {
        let known = self.pattern.variables();
        if let Some(var) = projection.iter().find(|v| !known.contains(*v)) {
            return Err(ValidationError::VariableNotInQuery { var: var.clone() }.into());
        }

        let plan = self.plan(ctx.planner, ctx.schema)?;
        let state = ctx.executor.execute(&plan)?;

        let mut seen = HashSet::new();
        let answers = state
            .answers
            .into_iter()
            .map(|answer| {
                answer
                    .into_iter()
                    .filter(|(var, _)| projection.contains(var))
                    .collect::<Answer>()
            })
            .filter(|answer| seen.insert(answer.clone()))
            .collect();
        Ok(answers)
    }
}

enum AnswersState<'a> {
    Pending(Box<dyn FnOnce() -> Result<Vec<Answer>> + 'a>),
    Ready(std::vec::IntoIter<Answer>),
    Done,
}

/// Lazily evaluated answers; nothing runs until the first call to `next`
pub struct Answers<'a> {
    state: AnswersState<'a>,
}

impl<'a> Answers<'a> {
    fn pending(run: impl FnOnce() -> Result<Vec<Answer>> + 'a) -> Self {
        Self {
            state: AnswersState::Pending(Box::new(run)),
        }
    }
}

impl Iterator for Answers<'_> {
    type Item = Result<Answer>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            match mem::replace(&mut self.state, AnswersState::Done) {
                AnswersState::Pending(run) => match run() {
                    Ok(answers) => self.state = AnswersState::Ready(answers.into_iter()),
                    Err(err) => return Some(Err(err)),
                },
                AnswersState::Ready(mut answers) => {
                    let next = answers.next();
                    if next.is_some() {
                        self.state = AnswersState::Ready(answers);
                    }
                    return next.map(Ok);
                }
                AnswersState::Done => return None,
            }
        }
    }
}
