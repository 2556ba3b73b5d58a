// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
// Schema module - type lookup, pattern validation and insert validation
//
// The planner validates every pattern against a schema before lowering it.
// This module holds the lookup capability, an in-memory schema, and the
// validators that turn schema violations into typed errors.

pub mod graph;
pub mod ingestion;
pub mod types;
pub mod validator;

pub use graph::{SchemaGraph, SchemaProvider};
pub use ingestion::IngestionValidator;
pub use types::{ConceptKind, SchemaConcept};
pub use validator::{PatternValidator, ValidationError};

// Schema module error type
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SchemaError {
    #[error("Invalid schema definition: {0}")]
    InvalidDefinition(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

pub type SchemaResult<T> = Result<T, SchemaError>;
