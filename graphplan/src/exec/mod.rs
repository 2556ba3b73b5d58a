// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Query execution surface over a pluggable traversal executor

pub mod error;
pub mod match_query;
pub mod traversal;

pub use error::GraphOperationError;
pub use match_query::{Answers, MatchQuery, QueryContext};
pub use traversal::{Answer, ConceptId, TraversalExecutor, TraversalState};
