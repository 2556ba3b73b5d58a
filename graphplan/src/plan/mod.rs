// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Query planning for conjunctive graph patterns
//!
//! A validated pattern is lowered into equivalent fragment sets, each set
//! holding interchangeable fragments for one constraint. The greedy
//! optimizer then picks one fragment per set, in an order that respects
//! data dependencies and keeps the estimated cost low.

pub mod cost;
pub mod fragment;
pub mod fragment_set;
pub mod lowering;
pub mod optimizer;
pub mod planner;
pub mod trace;

pub use cost::{CostEstimator, CostModel};
pub use fragment::{Fragment, FragmentKind};
pub use fragment_set::{ContractViolation, EquivalentFragmentSet, FragmentArena, FragmentRef, SetId};
pub use lowering::lower;
pub use optimizer::{GreedyOptimizer, Plan, PlanStep, PlanningError};
pub use planner::QueryPlanner;
pub use trace::{PlanTrace, PlanTracer, TraceStep};
