// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Greedy fragment ordering
//!
//! The optimizer picks one fragment per equivalent fragment set. Each round
//! it considers every fragment whose dependencies are already bound, commits
//! the cheapest one, and binds that fragment's variables. Ties on cost are
//! broken by start variable, then end variable, so plans are reproducible.

use petgraph::algo::tarjan_scc;
use petgraph::graph::{Graph, NodeIndex};
use serde::Serialize;
use std::cmp::Ordering;
use std::collections::{BTreeSet, HashMap};
use std::fmt;
use thiserror::Error;

use super::cost::{CostEstimator, CostModel};
use super::fragment::Fragment;
use super::fragment_set::{EquivalentFragmentSet, FragmentArena, FragmentRef, SetId};
use super::trace::{PlanTrace, PlanTracer};
use crate::pattern::Var;

/// Planning errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PlanningError {
    #[error("Nothing to plan: no fragment sets were provided")]
    NothingToPlan,

    #[error("Cyclic dependency between variables {}", .variables.join(", "))]
    CyclicDependency { variables: Vec<String> },

    #[error(
        "Unbound dependencies {}: fragments {} can never run",
        .variables.join(", "),
        .fragments.join(", ")
    )]
    UnboundDependencies {
        variables: Vec<String>,
        fragments: Vec<String>,
    },
}

/// A committed fragment and its estimated cost at the time it was chosen
#[derive(Debug, Clone, Serialize)]
pub struct PlanStep {
    pub fragment: Fragment,
    pub cost: f64,
    pub set: SetId,
}

/// An ordered, dependency-respecting sequence of fragments
#[derive(Debug, Clone, Serialize)]
pub struct Plan {
    steps: Vec<PlanStep>,
    start_vars: BTreeSet<Var>,
    trace: Option<PlanTrace>,
}

impl Plan {
    pub fn steps(&self) -> &[PlanStep] {
        &self.steps
    }

    pub fn fragments(&self) -> impl Iterator<Item = &Fragment> {
        self.steps.iter().map(|s| &s.fragment)
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn start_vars(&self) -> &BTreeSet<Var> {
        &self.start_vars
    }

    pub fn trace(&self) -> Option<&PlanTrace> {
        self.trace.as_ref()
    }

    pub fn total_cost(&self) -> f64 {
        self.steps.iter().map(|s| s.cost).sum()
    }

    /// Whether every step's dependencies are bound by the start variables or an earlier step
    pub fn is_dependency_sound(&self) -> bool {
        let mut bound = self.start_vars.clone();
        for step in &self.steps {
            if !step.fragment.dependencies().iter().all(|d| bound.contains(*d)) {
                return false;
            }
            bound.extend(step.fragment.variable_names().iter().cloned());
        }
        true
    }
}

impl fmt::Display for Plan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, step) in self.steps.iter().enumerate() {
            writeln!(f, "{}. {} (cost {:.2})", i + 1, step.fragment, step.cost)?;
        }
        write!(f, "total cost {:.2}", self.total_cost())
    }
}

/// Greedy optimizer over a fixed cost model
#[derive(Debug, Clone, Default)]
pub struct GreedyOptimizer {
    model: CostModel,
    trace: bool,
}

impl GreedyOptimizer {
    pub fn new(model: CostModel) -> Self {
        Self { model, trace: false }
    }

    /// Record a [`PlanTrace`] on every plan produced
    pub fn with_trace(mut self, enabled: bool) -> Self {
        self.trace = enabled;
        self
    }

    pub fn model(&self) -> &CostModel {
        &self.model
    }

    pub fn optimize(
        &self,
        sets: Vec<EquivalentFragmentSet>,
        start_vars: &BTreeSet<Var>,
    ) -> Result<Plan, PlanningError> {
        if sets.is_empty() {
            return Err(PlanningError::NothingToPlan);
        }

        let arena = FragmentArena::build(sets);
        let estimator = CostEstimator::new(&self.model);
        let mut bound = start_vars.clone();
        let mut resolved = vec![false; arena.len()];
        let mut steps = Vec::with_capacity(arena.len());
        let mut tracer = self.trace.then(PlanTracer::new);

        while steps.len() < arena.len() {
            let candidates: Vec<(f64, FragmentRef<'_>)> = arena
                .fragments()
                .filter(|c| !resolved[c.set.index()])
                .filter(|c| c.fragment.dependencies().iter().all(|d| bound.contains(*d)))
                .map(|c| (estimator.cost(c.fragment, &bound), c))
                .collect();

            for (cost, candidate) in &candidates {
                log::trace!("Candidate {} costs {:.2}", candidate.fragment, cost);
            }

            let Some((cost, chosen)) = candidates.iter().copied().min_by(rank) else {
                return Err(diagnose(&arena, &resolved, &bound));
            };

            resolved[chosen.set.index()] = true;
            bound.extend(chosen.fragment.variable_names().iter().cloned());
            log::debug!(
                "Plan step {}: {} (cost {:.2}, set {})",
                steps.len() + 1,
                chosen.fragment,
                cost,
                chosen.set
            );

            if let Some(tracer) = tracer.as_mut() {
                tracer.record(
                    candidates.len(),
                    chosen.fragment.to_string(),
                    cost,
                    bound.iter().map(|v| v.to_string()).collect(),
                );
            }

            steps.push(PlanStep {
                fragment: chosen.fragment.clone(),
                cost,
                set: chosen.set,
            });
        }

        Ok(Plan {
            steps,
            start_vars: start_vars.clone(),
            trace: tracer.map(PlanTracer::finalize),
        })
    }
}

/// Total order over candidates: cost, then start, end, kind name, set and position
fn rank(lhs: &(f64, FragmentRef<'_>), rhs: &(f64, FragmentRef<'_>)) -> Ordering {
    let (lhs_cost, l) = lhs;
    let (rhs_cost, r) = rhs;
    lhs_cost
        .total_cmp(rhs_cost)
        .then_with(|| l.fragment.start().cmp(r.fragment.start()))
        .then_with(|| l.fragment.end().cmp(&r.fragment.end()))
        .then_with(|| l.fragment.name().cmp(&r.fragment.name()))
        .then_with(|| l.set.cmp(&r.set))
        .then_with(|| l.index.cmp(&r.index))
}

/// Explain why no remaining fragment can run
fn diagnose(arena: &FragmentArena, resolved: &[bool], bound: &BTreeSet<Var>) -> PlanningError {
    let residual: Vec<&Fragment> = arena
        .fragments()
        .filter(|c| !resolved[c.set.index()])
        .map(|c| c.fragment)
        .collect();

    // Edge from each missing dependency to every variable its fragment would bind
    let mut graph: Graph<Var, ()> = Graph::new();
    let mut nodes: HashMap<Var, NodeIndex> = HashMap::new();
    let mut node = |graph: &mut Graph<Var, ()>, var: &Var| {
        *nodes
            .entry(var.clone())
            .or_insert_with(|| graph.add_node(var.clone()))
    };
    let mut missing = BTreeSet::new();
    for fragment in &residual {
        for dependency in fragment.dependencies() {
            if bound.contains(dependency) {
                continue;
            }
            missing.insert(dependency.clone());
            let from = node(&mut graph, dependency);
            for var in fragment.variable_names() {
                if var != dependency && !bound.contains(var) {
                    let to = node(&mut graph, var);
                    graph.add_edge(from, to, ());
                }
            }
        }
    }

    let cycle = tarjan_scc(&graph)
        .into_iter()
        .filter(|component| component.len() > 1)
        .map(|component| {
            let mut variables: Vec<String> =
                component.iter().map(|&ix| graph[ix].to_string()).collect();
            variables.sort();
            variables
        })
        .min();

    let error = match cycle {
        Some(variables) => PlanningError::CyclicDependency { variables },
        None => PlanningError::UnboundDependencies {
            variables: missing.iter().map(|v| v.to_string()).collect(),
            fragments: residual.iter().map(|f| f.to_string()).collect(),
        },
    };
    log::debug!("Planning failed: {}", error);
    error
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pattern::ValuePredicate;

    fn v(name: &str) -> Var {
        Var::new(name).unwrap()
    }

    fn set(fragments: Vec<Fragment>) -> EquivalentFragmentSet {
        EquivalentFragmentSet::new(fragments).unwrap()
    }

    #[test]
    fn test_starts_from_label_lookup() {
        let t = v("t");
        let x = v("x");
        let sets = vec![
            set(vec![Fragment::out_isa(x.clone(), t.clone()), Fragment::in_isa(t.clone(), x.clone())]),
            set(vec![Fragment::label(t.clone(), "movie")]),
        ];
        let plan = GreedyOptimizer::default().optimize(sets, &BTreeSet::new()).unwrap();
        let rendered: Vec<String> = plan.fragments().map(|f| f.to_string()).collect();
        assert_eq!(rendered, vec!["$t[label:movie]", "$t<-[isa]-$x"]);
        assert_eq!(plan.total_cost(), 101.0);
    }

    #[test]
    fn test_empty_input_is_rejected() {
        let err = GreedyOptimizer::default()
            .optimize(Vec::new(), &BTreeSet::new())
            .unwrap_err();
        assert_eq!(err, PlanningError::NothingToPlan);
    }

    #[test]
    fn test_dependent_value_waits_for_its_operand() {
        let x = v("x");
        let y = v("y");
        let sets = vec![
            set(vec![Fragment::value(x.clone(), ValuePredicate::gt(y.clone()))]),
            set(vec![Fragment::id(y.clone(), "V123")]),
        ];
        let plan = GreedyOptimizer::default().optimize(sets, &BTreeSet::new()).unwrap();
        assert_eq!(plan.steps()[0].fragment.start(), &y);
        assert!(plan.is_dependency_sound());
    }

    #[test]
    fn test_start_vars_anchor_traversals() {
        let x = v("x");
        let a = v("a");
        let sets = vec![set(vec![
            Fragment::out_has(x.clone(), a.clone(), "title"),
            Fragment::in_has(a.clone(), x.clone(), "title"),
        ])];
        let start: BTreeSet<Var> = [a.clone()].into_iter().collect();
        let plan = GreedyOptimizer::default().optimize(sets, &start).unwrap();
        assert_eq!(plan.steps()[0].fragment.start(), &a);
        assert_eq!(plan.steps()[0].cost, 10.0);
    }

    #[test]
    fn test_cyclic_dependency_is_reported() {
        let x = v("x");
        let y = v("y");
        let sets = vec![
            set(vec![Fragment::value(x.clone(), ValuePredicate::gt(y.clone()))]),
            set(vec![Fragment::value(y.clone(), ValuePredicate::lt(x.clone()))]),
        ];
        let err = GreedyOptimizer::default().optimize(sets, &BTreeSet::new()).unwrap_err();
        assert_eq!(
            err,
            PlanningError::CyclicDependency {
                variables: vec!["$x".to_string(), "$y".to_string()]
            }
        );
    }

    #[test]
    fn test_unbound_dependency_is_reported() {
        let x = v("x");
        let y = v("y");
        let sets = vec![set(vec![Fragment::value(x, ValuePredicate::gt(y))])];
        let err = GreedyOptimizer::default().optimize(sets, &BTreeSet::new()).unwrap_err();
        match err {
            PlanningError::UnboundDependencies { variables, fragments } => {
                assert_eq!(variables, vec!["$y".to_string()]);
                assert_eq!(fragments.len(), 1);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_trace_is_recorded_when_enabled() {
        let sets = vec![set(vec![Fragment::label(v("t"), "movie")])];
        let plan = GreedyOptimizer::default()
            .with_trace(true)
            .optimize(sets, &BTreeSet::new())
            .unwrap();
        let trace = plan.trace().unwrap();
        assert_eq!(trace.steps.len(), 1);
        assert_eq!(trace.steps[0].chosen, "$t[label:movie]");
    }
}
