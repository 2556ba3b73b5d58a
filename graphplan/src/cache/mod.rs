// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Compiled plan caching
//!
//! Plans are immutable once compiled, so a single compilation per pattern
//! signature and schema version is shared by every caller.

pub mod cache_config;
pub mod plan_cache;

pub use cache_config::PlanCacheConfig;
pub use plan_cache::{PlanCache, PlanCacheKey, PlanCacheStats};
