// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Crate-level error type
//!
//! Every layer keeps its own error enum; [`GraphPlanError`] wraps them so
//! callers can match on the class of failure through [`GraphPlanError::kind`]
//! or on a stable per-variant [`GraphPlanError::code`].

use thiserror::Error;

use crate::config::ConfigError;
use crate::exec::GraphOperationError;
use crate::plan::{ContractViolation, PlanningError};
use crate::schema::{SchemaError, ValidationError};

/// Class of a failure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// The query is malformed or inconsistent with the schema
    Validation,
    /// No dependency-respecting plan exists
    Planning,
    /// The planning API was misused
    Contract,
    /// Data violates the schema, or a traversal failed
    Data,
    /// A schema or configuration could not be loaded
    Configuration,
}

#[derive(Error, Debug)]
pub enum GraphPlanError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Planning(#[from] PlanningError),

    #[error(transparent)]
    Contract(#[from] ContractViolation),

    #[error(transparent)]
    Data(#[from] GraphOperationError),

    #[error("Schema error: {0}")]
    Schema(#[from] SchemaError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

impl GraphPlanError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            GraphPlanError::Validation(_) => ErrorKind::Validation,
            GraphPlanError::Planning(_) => ErrorKind::Planning,
            GraphPlanError::Contract(_) => ErrorKind::Contract,
            GraphPlanError::Data(_) => ErrorKind::Data,
            GraphPlanError::Schema(_) | GraphPlanError::Config(_) => ErrorKind::Configuration,
        }
    }

    /// Stable machine-readable code for the specific failure
    pub fn code(&self) -> &'static str {
        match self {
            GraphPlanError::Validation(err) => match err {
                ValidationError::NoPatterns => "GP1001",
                ValidationError::NoSelectVariables => "GP1002",
                ValidationError::LabelNotFound { .. } => "GP1003",
                ValidationError::NotARoleType { .. } => "GP1004",
                ValidationError::NotARelationType { .. } => "GP1005",
                ValidationError::RoleNotInRelation { .. } => "GP1006",
                ValidationError::MustBeResourceType { .. } => "GP1007",
                ValidationError::InstanceOfRoleType { .. } => "GP1008",
                ValidationError::ConflictingProperties { .. } => "GP1009",
                ValidationError::VariableNotInQuery { .. } => "GP1010",
                ValidationError::InvalidArgument { .. } => "GP1011",
                ValidationError::InvalidRegex { .. } => "GP1012",
            },
            GraphPlanError::Planning(err) => match err {
                PlanningError::NothingToPlan => "GP2001",
                PlanningError::CyclicDependency { .. } => "GP2002",
                PlanningError::UnboundDependencies { .. } => "GP2003",
            },
            GraphPlanError::Contract(err) => match err {
                ContractViolation::EmptyFragmentSet => "GP3001",
                ContractViolation::UnassignedFragment { .. } => "GP3002",
                ContractViolation::UnknownSet(_) => "GP3003",
            },
            GraphPlanError::Data(err) => match err {
                GraphOperationError::HasNotAllowed { .. } => "GP4001",
                GraphOperationError::CannotPlayRole { .. } => "GP4002",
                GraphOperationError::TraversalFailed { .. } => "GP4003",
            },
            GraphPlanError::Schema(_) => "GP5001",
            GraphPlanError::Config(_) => "GP5002",
        }
    }
}

pub type Result<T> = std::result::Result<T, GraphPlanError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_and_code() {
        let err: GraphPlanError = ValidationError::NoPatterns.into();
        assert_eq!(err.kind(), ErrorKind::Validation);
        assert_eq!(err.code(), "GP1001");
        assert!(err.to_string().contains("no patterns"));

        let err: GraphPlanError = PlanningError::NothingToPlan.into();
        assert_eq!(err.kind(), ErrorKind::Planning);

        let err: GraphPlanError = ContractViolation::EmptyFragmentSet.into();
        assert_eq!(err.kind(), ErrorKind::Contract);
        assert_eq!(err.code(), "GP3001");
    }
}
