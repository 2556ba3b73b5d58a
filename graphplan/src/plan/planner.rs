// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Query planner entry point: validate, lower, optimize, cache

use std::collections::BTreeSet;
use std::sync::Arc;

use super::fragment_set::EquivalentFragmentSet;
use super::lowering::lower;
use super::optimizer::{GreedyOptimizer, Plan};
use crate::cache::{PlanCache, PlanCacheKey};
use crate::config::PlannerConfig;
use crate::error::Result;
use crate::pattern::{Pattern, Var};
use crate::schema::{PatternValidator, SchemaProvider};

/// Compiles patterns into plans, sharing compiled plans through a cache
pub struct QueryPlanner {
    config: PlannerConfig,
    optimizer: GreedyOptimizer,
    cache: PlanCache,
}

impl QueryPlanner {
    /// Create a new query planner with default settings
    pub fn new() -> Self {
        Self::build(PlannerConfig::default())
    }

    /// Create a query planner from a validated configuration
    pub fn with_config(config: PlannerConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::build(config))
    }

    fn build(config: PlannerConfig) -> Self {
        let optimizer = GreedyOptimizer::new(config.cost_model.clone()).with_trace(config.trace_plans);
        let cache = PlanCache::new(config.plan_cache.clone());
        Self {
            config,
            optimizer,
            cache,
        }
    }

    pub fn config(&self) -> &PlannerConfig {
        &self.config
    }

    pub fn cache(&self) -> &PlanCache {
        &self.cache
    }

    pub fn plan(&self, pattern: &Pattern, schema: &dyn SchemaProvider) -> Result<Arc<Plan>> {
        self.plan_with_start(pattern, schema, &BTreeSet::new())
    }

    /// Plan a pattern whose `start_vars` are already bound by the caller
    pub fn plan_with_start(
        &self,
        pattern: &Pattern,
        schema: &dyn SchemaProvider,
        start_vars: &BTreeSet<Var>,
    ) -> Result<Arc<Plan>> {
        let key = PlanCacheKey::new(
            pattern.signature(),
            start_vars,
            schema.schema_hash(),
            schema.version(),
        );
        self.cache.get_or_compile(key, || -> Result<Plan> {
            PatternValidator::new(schema).validate(pattern)?;
            let sets = lower(pattern)?;
            let plan = self.optimizer.optimize(sets, start_vars)?;
            log::debug!(
                "Planned `{}` in {} steps, estimated cost {:.2}",
                pattern,
                plan.len(),
                plan.total_cost()
            );
            Ok(plan)
        })
    }

    /// Order already-lowered sets, bypassing validation and the cache
    pub fn plan_sets(
        &self,
        sets: Vec<EquivalentFragmentSet>,
        start_vars: &BTreeSet<Var>,
    ) -> Result<Plan> {
        Ok(self.optimizer.optimize(sets, start_vars)?)
    }

    /// Human-readable explanation of the plan chosen for a pattern
    pub fn explain(&self, pattern: &Pattern, schema: &dyn SchemaProvider) -> Result<String> {
        let plan = self.plan(pattern, schema)?;
        Ok(match plan.trace() {
            Some(trace) => trace.format_trace(),
            None => plan.to_string(),
        })
    }
}

impl Default for QueryPlanner {
    fn default() -> Self {
        Self::new()
    }
}
