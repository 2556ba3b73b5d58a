// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Data operation error types

use thiserror::Error;

/// Errors raised when data violates the schema or a traversal fails
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GraphOperationError {
    #[error("instances of '{owner}' are not allowed to have a resource of type '{attribute}'")]
    HasNotAllowed { owner: String, attribute: String },

    #[error("instances of '{player_type}' are not allowed to play the role '{role}'")]
    CannotPlayRole { player_type: String, role: String },

    #[error("Traversal of {fragment} failed: {reason}")]
    TraversalFailed { fragment: String, reason: String },
}
