// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
// Pattern validator implementation

use std::collections::HashMap;

use super::graph::SchemaProvider;
use super::types::{ConceptKind, SchemaConcept};
use crate::pattern::{Pattern, TypeRef, ValuePredicate, Var, VarPattern, VarProperty};

/// Pattern validation errors
///
/// Messages name the offending labels and variables verbatim so that callers
/// can point users at the exact clause that was rejected.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("no patterns have been provided. at least one pattern must be provided")]
    NoPatterns,

    #[error("no variables have been selected. at least one variable must be selected")]
    NoSelectVariables,

    #[error("label '{label}' not found")]
    LabelNotFound { label: String },

    #[error("'{label}' is {kind}, not a role type. perhaps you meant 'isa {label}'? (in `{pattern}`)")]
    NotARoleType {
        label: String,
        kind: ConceptKind,
        pattern: String,
    },

    #[error("'{label}' is {kind}, not a relation type. perhaps you forgot to separate your statements with a ';'?")]
    NotARelationType { label: String, kind: ConceptKind },

    #[error("role '{role}' is not related by relation type '{relation}'")]
    RoleNotInRelation { role: String, relation: String },

    #[error("type '{label}' is {kind} and must be a resource type")]
    MustBeResourceType { label: String, kind: ConceptKind },

    #[error("cannot get instances of '{label}' because it is a role type")]
    InstanceOfRoleType { label: String },

    #[error("the following unique properties in {var} conflict: '{first}' and '{second}'")]
    ConflictingProperties {
        var: Var,
        first: String,
        second: String,
    },

    #[error("the variable {var} is not in the query")]
    VariableNotInQuery { var: Var },

    #[error("invalid argument: {reason}")]
    InvalidArgument { reason: String },

    #[error("invalid regex /{pattern}/: {reason}")]
    InvalidRegex { pattern: String, reason: String },
}

/// Validates patterns against a schema before they are lowered and planned
pub struct PatternValidator<'a> {
    schema: &'a dyn SchemaProvider,
}

impl<'a> PatternValidator<'a> {
    pub fn new(schema: &'a dyn SchemaProvider) -> Self {
        Self { schema }
    }

    /// Checks that need no schema: emptiness, conflicting type assertions, regex syntax
    pub fn check_structure(pattern: &Pattern) -> Result<(), ValidationError> {
        if pattern.is_empty() {
            return Err(ValidationError::NoPatterns);
        }

        let mut first_isa: HashMap<&Var, &str> = HashMap::new();
        for vp in pattern.var_patterns() {
            for label in vp.isa_labels() {
                match first_isa.get(vp.var()) {
                    Some(&first) if first != label => {
                        return Err(ValidationError::ConflictingProperties {
                            var: vp.var().clone(),
                            first: format!("isa {}", first),
                            second: format!("isa {}", label),
                        });
                    }
                    Some(_) => {}
                    None => {
                        first_isa.insert(vp.var(), label);
                    }
                }
            }

            for property in vp.properties() {
                match property {
                    VarProperty::Regex(regex)
                    | VarProperty::Value(ValuePredicate::Regex(regex)) => check_regex(regex)?,
                    VarProperty::Has {
                        predicate: Some(ValuePredicate::Regex(regex)),
                        ..
                    } => check_regex(regex)?,
                    _ => {}
                }
            }
        }
        Ok(())
    }

    /// Run every check, failing on the first problem found
    pub fn validate(&self, pattern: &Pattern) -> Result<(), ValidationError> {
        let result = self.validate_inner(pattern);
        if let Err(err) = &result {
            log::debug!("Rejected pattern `{}`: {}", pattern, err);
        }
        result
    }

    fn validate_inner(&self, pattern: &Pattern) -> Result<(), ValidationError> {
        Self::check_structure(pattern)?;

        for vp in pattern.var_patterns() {
            for property in vp.properties() {
                self.check_property(vp, property)?;
            }
        }

        for vp in pattern.var_patterns() {
            if vp.role_players().next().is_some() {
                self.check_relation(pattern, vp)?;
            }
        }
        Ok(())
    }

    fn resolve(&self, label: &str) -> Result<&'a SchemaConcept, ValidationError> {
        self.schema
            .resolve_type(label)
            .ok_or_else(|| ValidationError::LabelNotFound {
                label: label.to_string(),
            })
    }

    fn expect_role(&self, label: &str, vp: &VarPattern) -> Result<(), ValidationError> {
        let concept = self.resolve(label)?;
        if concept.is_role() {
            Ok(())
        } else {
            Err(ValidationError::NotARoleType {
                label: label.to_string(),
                kind: concept.kind,
                pattern: vp.to_string(),
            })
        }
    }

    fn check_property(&self, vp: &VarPattern, property: &VarProperty) -> Result<(), ValidationError> {
        match property {
            VarProperty::Isa(TypeRef::Label(label)) => {
                let concept = self.resolve(label)?;
                if concept.is_role() {
                    return Err(ValidationError::InstanceOfRoleType {
                        label: label.clone(),
                    });
                }
            }
            VarProperty::Sub(TypeRef::Label(label)) | VarProperty::Label(label) => {
                self.resolve(label)?;
            }
            VarProperty::Relates(TypeRef::Label(label))
            | VarProperty::Plays(TypeRef::Label(label)) => {
                self.expect_role(label, vp)?;
            }
            VarProperty::Rel(rp) => {
                if let Some(TypeRef::Label(role)) = &rp.role {
                    self.expect_role(role, vp)?;
                }
            }
            VarProperty::Has { attribute_type, .. } => {
                let concept = self.resolve(attribute_type)?;
                if !concept.is_resource() {
                    return Err(ValidationError::MustBeResourceType {
                        label: attribute_type.clone(),
                        kind: concept.kind,
                    });
                }
            }
            _ => {}
        }
        Ok(())
    }

    /// Role players of one clause must fit a single relation instance
    fn check_relation(&self, pattern: &Pattern, vp: &VarPattern) -> Result<(), ValidationError> {
        let relation_labels: Vec<&str> = pattern
            .patterns_for(vp.var())
            .flat_map(|p| p.isa_labels())
            .collect();

        for label in &relation_labels {
            let concept = self.resolve(label)?;
            if !concept.is_relation() {
                return Err(ValidationError::NotARelationType {
                    label: label.to_string(),
                    kind: concept.kind,
                });
            }
        }

        for rp in vp.role_players() {
            let Some(TypeRef::Label(role)) = &rp.role else {
                continue;
            };
            for relation in &relation_labels {
                if !self.schema.relates_role(relation, role) {
                    return Err(ValidationError::RoleNotInRelation {
                        role: role.clone(),
                        relation: relation.to_string(),
                    });
                }
            }
        }
        Ok(())
    }
}

fn check_regex(regex: &str) -> Result<(), ValidationError> {
    regex::Regex::new(regex)
        .map(|_| ())
        .map_err(|e| ValidationError::InvalidRegex {
            pattern: regex.to_string(),
            reason: e.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pattern::{anon, var, DataType};
    use crate::schema::graph::SchemaGraph;
    use crate::schema::types::SchemaConcept;

    fn schema() -> SchemaGraph {
        SchemaGraph::new()
            .define(SchemaConcept::role("actor"))
            .define(SchemaConcept::role("production-with-cast"))
            .define(SchemaConcept::role("director"))
            .define(
                SchemaConcept::relation("has-cast")
                    .relates("actor")
                    .relates("production-with-cast"),
            )
            .define(SchemaConcept::resource("title", DataType::String))
            .define(SchemaConcept::entity("movie").plays("production-with-cast").has("title"))
            .define(SchemaConcept::entity("person").plays("actor"))
    }

    #[test]
    fn test_valid_pattern_passes() {
        let schema = schema();
        let x = Var::new("x").unwrap();
        let y = Var::new("y").unwrap();
        let pattern = Pattern::new(vec![
            var("x").unwrap().isa("movie").has("title", "Godfather"),
            anon()
                .isa("has-cast")
                .rel_role("production-with-cast", x)
                .rel_role("actor", y),
        ]);
        assert!(PatternValidator::new(&schema).validate(&pattern).is_ok());
    }

    #[test]
    fn test_role_must_belong_to_relation() {
        let schema = schema();
        let x = Var::new("x").unwrap();
        let pattern = Pattern::new(vec![anon().isa("has-cast").rel_role("director", x)]);
        let err = PatternValidator::new(&schema).validate(&pattern).unwrap_err();
        assert_eq!(
            err,
            ValidationError::RoleNotInRelation {
                role: "director".into(),
                relation: "has-cast".into()
            }
        );
    }

    #[test]
    fn test_plays_requires_role() {
        let schema = schema();
        let pattern = Pattern::new(vec![var("t").unwrap().plays("movie")]);
        let err = PatternValidator::new(&schema).validate(&pattern).unwrap_err();
        assert!(matches!(err, ValidationError::NotARoleType { .. }));
        assert!(err.to_string().contains("an entity type"));
    }

    #[test]
    fn test_invalid_regex_is_rejected_without_schema() {
        let pattern = Pattern::new(vec![var("x").unwrap().val(ValuePredicate::Regex("(".into()))]);
        let err = PatternValidator::check_structure(&pattern).unwrap_err();
        assert!(matches!(err, ValidationError::InvalidRegex { .. }));
    }

    #[test]
    fn test_repeated_identical_isa_is_allowed() {
        let pattern = Pattern::new(vec![
            var("x").unwrap().isa("movie"),
            var("x").unwrap().isa("movie"),
        ]);
        assert!(PatternValidator::check_structure(&pattern).is_ok());
    }
}
