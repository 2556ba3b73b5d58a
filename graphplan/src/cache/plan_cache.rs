// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Plan caching to avoid recompilation
//!
//! Each key owns a `OnceCell`. Concurrent callers for the same key share
//! that cell, so a plan is compiled at most once while it stays cached and
//! every caller receives the same `Arc<Plan>`. Failed compilations leave
//! the cell empty and are retried by the next caller.

use once_cell::sync::OnceCell;
use parking_lot::{Mutex, RwLock};
use std::collections::{BTreeSet, HashMap};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use super::cache_config::PlanCacheConfig;
use crate::pattern::Var;
use crate::plan::Plan;

/// Key for plan cache entries
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PlanCacheKey {
    /// Canonical text of the pattern
    pub signature: String,
    pub start_vars: Vec<String>,
    /// Content fingerprint of the schema the plan was validated against
    pub schema_hash: u64,
    pub schema_version: u64,
}

impl PlanCacheKey {
    pub fn new(
        signature: impl Into<String>,
        start_vars: &BTreeSet<Var>,
        schema_hash: u64,
        schema_version: u64,
    ) -> Self {
        Self {
            signature: signature.into(),
            start_vars: start_vars.iter().map(|v| v.to_string()).collect(),
            schema_hash,
            schema_version,
        }
    }
}

struct PlanCacheEntry {
    plan: Arc<OnceCell<Arc<Plan>>>,
    last_used: AtomicU64,
}

/// Plan cache statistics
#[derive(Debug, Default, Clone, PartialEq)]
pub struct PlanCacheStats {
    pub hits: u64,
    pub misses: u64,
    pub compilations: u64,
    pub total_compilation_time: Duration,
    pub evictions: u64,
    pub current_entries: usize,
}

impl PlanCacheStats {
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}

/// Plan cache implementation
pub struct PlanCache {
    config: PlanCacheConfig,
    entries: RwLock<HashMap<PlanCacheKey, PlanCacheEntry>>,
    stats: Mutex<PlanCacheStats>,
    clock: AtomicU64,
}

impl PlanCache {
    pub fn new(config: PlanCacheConfig) -> Self {
        Self {
            config,
            entries: RwLock::new(HashMap::new()),
            stats: Mutex::new(PlanCacheStats::default()),
            clock: AtomicU64::new(0),
        }
    }

    pub fn config(&self) -> &PlanCacheConfig {
        &self.config
    }

    /// Return the cached plan for `key`, compiling it if absent
    pub fn get_or_compile<E>(
        &self,
        key: PlanCacheKey,
        compile: impl FnOnce() -> Result<Plan, E>,
    ) -> Result<Arc<Plan>, E> {
        if !self.config.enabled {
            self.stats.lock().misses += 1;
            return self.timed_compile(compile);
        }

        let cell = self.cell_for(&key);
        if let Some(plan) = cell.get() {
            log::trace!("Plan cache hit for `{}`", key.signature);
            self.stats.lock().hits += 1;
            return Ok(plan.clone());
        }

        let mut compiled_here = false;
        let result = cell
            .get_or_try_init(|| {
                compiled_here = true;
                self.timed_compile(compile)
            })
            .cloned();

        match &result {
            Ok(_) if compiled_here => {
                log::trace!("Plan cache miss for `{}`", key.signature);
                self.stats.lock().misses += 1;
            }
            Ok(_) => {
                self.stats.lock().hits += 1;
            }
            Err(_) => {
                self.stats.lock().misses += 1;
                let mut entries = self.entries.write();
                let stale = entries
                    .get(&key)
                    .map_or(false, |e| Arc::ptr_eq(&e.plan, &cell) && e.plan.get().is_none());
                if stale {
                    entries.remove(&key);
                }
            }
        }
        result
    }

    fn timed_compile<E>(&self, compile: impl FnOnce() -> Result<Plan, E>) -> Result<Arc<Plan>, E> {
        let started = Instant::now();
        let plan = compile()?;
        let mut stats = self.stats.lock();
        stats.compilations += 1;
        stats.total_compilation_time += started.elapsed();
        Ok(Arc::new(plan))
    }

    fn tick(&self) -> u64 {
        self.clock.fetch_add(1, Ordering::Relaxed)
    }

    fn cell_for(&self, key: &PlanCacheKey) -> Arc<OnceCell<Arc<Plan>>> {
        if let Some(entry) = self.entries.read().get(key) {
            entry.last_used.store(self.tick(), Ordering::Relaxed);
            return entry.plan.clone();
        }

        let mut entries = self.entries.write();
        if !entries.contains_key(key) && entries.len() >= self.config.max_entries {
            self.evict_lru(&mut entries);
        }
        let now = self.tick();
        let entry = entries.entry(key.clone()).or_insert_with(|| PlanCacheEntry {
            plan: Arc::new(OnceCell::new()),
            last_used: AtomicU64::new(now),
        });
        entry.last_used.store(now, Ordering::Relaxed);
        entry.plan.clone()
    }

    fn evict_lru(&self, entries: &mut HashMap<PlanCacheKey, PlanCacheEntry>) {
        let oldest = entries
            .iter()
            .min_by_key(|(_, e)| e.last_used.load(Ordering::Relaxed))
            .map(|(k, _)| k.clone());
        if let Some(key) = oldest {
            log::debug!("Evicting cached plan for `{}`", key.signature);
            entries.remove(&key);
            self.stats.lock().evictions += 1;
        }
    }

    /// Drop every plan compiled against a schema older than `version`
    pub fn invalidate_schema(&self, version: u64) -> usize {
        let mut entries = self.entries.write();
        let before = entries.len();
        entries.retain(|key, _| key.schema_version >= version);
        let removed = before - entries.len();
        if removed > 0 {
            log::debug!("Invalidated {} cached plans older than schema version {}", removed, version);
        }
        removed
    }

    pub fn clear(&self) {
        self.entries.write().clear();
    }

    pub fn contains(&self, key: &PlanCacheKey) -> bool {
        self.entries
            .read()
            .get(key)
            .map_or(false, |e| e.plan.get().is_some())
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    pub fn stats(&self) -> PlanCacheStats {
        let mut stats = self.stats.lock().clone();
        stats.current_entries = self.len();
        stats
    }
}

impl Default for PlanCache {
    fn default() -> Self {
        Self::new(PlanCacheConfig::default())
    }
}
