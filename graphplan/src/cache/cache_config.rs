// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Plan cache configuration

use serde::{Deserialize, Serialize};

/// Plan cache configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlanCacheConfig {
    /// Enable/disable plan caching entirely
    pub enabled: bool,

    /// Maximum number of cached plans before the least recently used is evicted
    pub max_entries: usize,
}

impl Default for PlanCacheConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            max_entries: 1000,
        }
    }
}

impl PlanCacheConfig {
    /// Configuration for workloads that repeat a large set of queries
    pub fn read_optimized() -> Self {
        Self {
            max_entries: 10_000,
            ..Self::default()
        }
    }

    /// Small cache, handy for exercising eviction
    pub fn testing() -> Self {
        Self {
            enabled: true,
            max_entries: 4,
        }
    }

    /// Compile every plan from scratch
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            ..Self::default()
        }
    }

    /// Validate configuration settings
    pub fn validate(&self) -> Result<(), String> {
        if self.enabled && self.max_entries == 0 {
            return Err("Plan cache must have max_entries > 0 when enabled".to_string());
        }
        Ok(())
    }
}
