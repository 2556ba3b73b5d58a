// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
// Ingestion validator - checks insert patterns against the schema
// before any data is written

use std::collections::HashMap;

use super::graph::SchemaProvider;
use super::validator::PatternValidator;
use crate::error::Result;
use crate::exec::GraphOperationError;
use crate::pattern::{Pattern, TypeRef, Var, VarProperty};

/// Counters for patterns seen by an [`IngestionValidator`]
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ValidationStats {
    pub total_patterns: usize,
    pub valid_patterns: usize,
    pub invalid_patterns: usize,
}

/// Validates insert patterns: every label must resolve, every owned
/// resource must be allowed by the owner's type, and every role player
/// must be able to play its role.
pub struct IngestionValidator<'a> {
    schema: &'a dyn SchemaProvider,
    stats: ValidationStats,
}

impl<'a> IngestionValidator<'a> {
    /// Create a new ingestion validator over the given schema
    pub fn new(schema: &'a dyn SchemaProvider) -> Self {
        Self {
            schema,
            stats: ValidationStats::default(),
        }
    }

    pub fn stats(&self) -> &ValidationStats {
        &self.stats
    }

    pub fn validate_insert(&mut self, pattern: &Pattern) -> Result<()> {
        self.stats.total_patterns += 1;
        let result = self.check(pattern);
        match &result {
            Ok(()) => self.stats.valid_patterns += 1,
            Err(err) => {
                self.stats.invalid_patterns += 1;
                log::debug!("Rejected insert `{}`: {}", pattern, err);
            }
        }
        result
    }

    fn check(&self, pattern: &Pattern) -> Result<()> {
        PatternValidator::new(self.schema).validate(pattern)?;

        let mut types: HashMap<&Var, &str> = HashMap::new();
        for vp in pattern.var_patterns() {
            if let Some(label) = vp.isa_labels().next() {
                types.entry(vp.var()).or_insert(label);
            }
        }

        for vp in pattern.var_patterns() {
            for property in vp.properties() {
                match property {
                    VarProperty::Has { attribute_type, .. } => {
                        let Some(&owner) = types.get(vp.var()) else {
                            continue;
                        };
                        if !self.schema.can_have(owner, attribute_type) {
                            return Err(GraphOperationError::HasNotAllowed {
                                owner: owner.to_string(),
                                attribute: attribute_type.clone(),
                            }
                            .into());
                        }
                    }
                    VarProperty::Rel(rp) => {
                        let (Some(TypeRef::Label(role)), Some(&player_type)) =
                            (&rp.role, types.get(&rp.player))
                        else {
                            continue;
                        };
                        if !self.schema.can_play(player_type, role) {
                            return Err(GraphOperationError::CannotPlayRole {
                                player_type: player_type.to_string(),
                                role: role.clone(),
                            }
                            .into());
                        }
                    }
                    _ => {}
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{ErrorKind, GraphPlanError};
    use crate::pattern::{anon, var, DataType};
    use crate::schema::graph::SchemaGraph;
    use crate::schema::types::SchemaConcept;

    fn schema() -> SchemaGraph {
        SchemaGraph::new()
            .define(SchemaConcept::role("actor"))
            .define(SchemaConcept::role("production-with-cast"))
            .define(
                SchemaConcept::relation("has-cast")
                    .relates("actor")
                    .relates("production-with-cast"),
            )
            .define(SchemaConcept::resource("name", DataType::String))
            .define(SchemaConcept::resource("title", DataType::String))
            .define(SchemaConcept::entity("movie").plays("production-with-cast").has("title"))
            .define(SchemaConcept::entity("person").plays("actor"))
    }

    #[test]
    fn test_has_not_allowed() {
        let schema = schema();
        let mut validator = IngestionValidator::new(&schema);
        let pattern = Pattern::new(vec![var("x").unwrap().isa("person").has("name", "Bob")]);
        let err = validator.validate_insert(&pattern).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Data);
        let message = err.to_string();
        assert!(message.contains("person"));
        assert!(message.contains("name"));
        assert_eq!(validator.stats().invalid_patterns, 1);
    }

    #[test]
    fn test_cannot_play_role() {
        let schema = schema();
        let mut validator = IngestionValidator::new(&schema);
        let m = Var::new("m").unwrap();
        let pattern = Pattern::new(vec![
            var("m").unwrap().isa("movie"),
            anon().isa("has-cast").rel_role("actor", m),
        ]);
        let err = validator.validate_insert(&pattern).unwrap_err();
        assert!(matches!(
            err,
            GraphPlanError::Data(GraphOperationError::CannotPlayRole { .. })
        ));
    }

    #[test]
    fn test_valid_insert_is_counted() {
        let schema = schema();
        let mut validator = IngestionValidator::new(&schema);
        let pattern = Pattern::new(vec![var("x").unwrap().isa("movie").has("title", "Heat")]);
        validator.validate_insert(&pattern).unwrap();
        assert_eq!(
            validator.stats(),
            &ValidationStats {
                total_patterns: 1,
                valid_patterns: 1,
                invalid_patterns: 0
            }
        );
    }
}
