// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Conjunctive graph patterns
//!
//! This module defines the typed pattern the planner consumes: variables,
//! the properties constraining them, and a builder for assembling patterns.

pub mod pattern;
pub mod property;
pub mod value;
pub mod var;

pub use pattern::{anon, var, Pattern, VarPattern};
pub use property::{RolePlayer, TypeRef, VarProperty};
pub use value::{DataType, Operand, Value, ValuePredicate};
pub use var::Var;
