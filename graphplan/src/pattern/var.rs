// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Pattern variables
//!
//! A variable is an opaque name scoped to one query. Equality, hashing and
//! ordering are defined by the name alone.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use crate::schema::validator::ValidationError;

/// Prefix reserved for variables generated by the planner or the builder
const GENERATED_PREFIX: char = '_';

static ANON_COUNTER: AtomicU64 = AtomicU64::new(0);

/// A named pattern variable
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Var(Arc<str>);

impl Var {
    /// Create a user variable, rejecting empty and reserved names
    pub fn new(name: impl AsRef<str>) -> Result<Self, ValidationError> {
        let name = name.as_ref();
        if name.trim().is_empty() {
            return Err(ValidationError::InvalidArgument {
                reason: "variable name must not be empty".to_string(),
            });
        }
        if name.chars().any(char::is_whitespace) {
            return Err(ValidationError::InvalidArgument {
                reason: format!("variable name '{}' must not contain whitespace", name),
            });
        }
        if name.starts_with(GENERATED_PREFIX) {
            return Err(ValidationError::InvalidArgument {
                reason: format!(
                    "variable name '{}' uses the reserved prefix '{}'",
                    name, GENERATED_PREFIX
                ),
            });
        }
        Ok(Self(Arc::from(name)))
    }

    /// Create a fresh anonymous variable
    pub fn anon() -> Self {
        let n = ANON_COUNTER.fetch_add(1, Ordering::Relaxed);
        Self(Arc::from(format!("{}anon{}", GENERATED_PREFIX, n)))
    }

    /// Deterministic generated variable, used when lowering labels and attributes
    pub(crate) fn generated(tag: &str) -> Self {
        Self(Arc::from(format!("{}{}", GENERATED_PREFIX, tag)))
    }

    pub fn name(&self) -> &str {
        &self.0
    }

    /// Whether this variable was produced by the builder or planner rather than the user
    pub fn is_generated(&self) -> bool {
        self.0.starts_with(GENERATED_PREFIX)
    }
}

impl fmt::Display for Var {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "${}", self.0)
    }
}

impl FromStr for Var {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Var::new(s.strip_prefix('$').unwrap_or(s))
    }
}

impl TryFrom<&str> for Var {
    type Error = ValidationError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        value.parse()
    }
}
