// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! GraphPlan - a query planner for conjunctive graph patterns
//!
//! GraphPlan compiles a typed graph pattern into an ordered list of
//! primitive traversal steps (fragments) that a storage engine can run.
//!
//! # Features
//!
//! - **Schema Validation**: Patterns are checked against a schema with precise error messages
//! - **Equivalent Fragments**: Every constraint offers interchangeable traversal directions
//! - **Greedy Ordering**: Cheapest eligible fragment first, respecting data dependencies
//! - **Plan Cache**: One compilation per pattern, shared as `Arc<Plan>`
//! - **Pluggable Storage**: Schema lookup and traversal are trait seams
//!
//! # Usage
//!
//! ```text
//! let schema = SchemaGraph::from_path("schema.json")?;
//! let planner = QueryPlanner::new();
//! let pattern = Pattern::new(vec![var("x")?.isa("movie").has("title", "Godfather")]);
//! let plan = planner.plan(&pattern, &schema)?;
//! println!("{}", plan);
//! ```

pub mod cache;
pub mod config;
pub mod error;
pub mod exec;
pub mod pattern;
pub mod plan;
pub mod schema;

pub use config::PlannerConfig;
pub use error::{ErrorKind, GraphPlanError, Result};
pub use exec::{Answer, Answers, MatchQuery, QueryContext, TraversalExecutor, TraversalState};
pub use pattern::{anon, var, Pattern, Var, VarPattern};
pub use plan::{EquivalentFragmentSet, Fragment, FragmentKind, GreedyOptimizer, Plan, QueryPlanner};
pub use schema::{SchemaConcept, SchemaGraph, SchemaProvider};

/// GraphPlan version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// GraphPlan crate name
pub const CRATE_NAME: &str = env!("CARGO_PKG_NAME");
