// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
// Planner configuration

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

use crate::cache::PlanCacheConfig;
use crate::plan::CostModel;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid configuration: {0}")]
    Invalid(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

/// Configuration for a [`QueryPlanner`](crate::plan::QueryPlanner)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlannerConfig {
    /// Cardinality constants used by the cost estimator
    pub cost_model: CostModel,

    pub plan_cache: PlanCacheConfig,

    /// Whether plans carry a trace of every greedy round
    pub trace_plans: bool,
}

impl PlannerConfig {
    /// Configuration that records plan traces, for debugging and explain output
    pub fn tracing() -> Self {
        Self {
            trace_plans: true,
            ..Self::default()
        }
    }

    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: PlannerConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    /// Validate configuration settings
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.cost_model.validate().map_err(ConfigError::Invalid)?;
        self.plan_cache.validate().map_err(ConfigError::Invalid)?;
        Ok(())
    }
}
