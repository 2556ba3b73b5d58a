// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
// Schema concept definitions

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::pattern::DataType;

/// Kind of a schema concept
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConceptKind {
    /// The root `thing` concept
    Meta,
    EntityType,
    RelationType,
    RoleType,
    ResourceType,
    RuleType,
}

impl fmt::Display for ConceptKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let description = match self {
            ConceptKind::Meta => "a meta type",
            ConceptKind::EntityType => "an entity type",
            ConceptKind::RelationType => "a relation type",
            ConceptKind::RoleType => "a role type",
            ConceptKind::ResourceType => "a resource type",
            ConceptKind::RuleType => "a rule type",
        };
        f.write_str(description)
    }
}

/// A labelled schema concept
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SchemaConcept {
    pub label: String,
    pub kind: ConceptKind,
    /// Direct supertype label
    #[serde(default)]
    pub sup: Option<String>,
    /// Roles related by a relation type
    #[serde(default)]
    pub relates: Vec<String>,
    /// Roles instances of this type may play
    #[serde(default)]
    pub plays: Vec<String>,
    /// Resource types instances of this type may own
    #[serde(default)]
    pub has: Vec<String>,
    #[serde(default)]
    pub data_type: Option<DataType>,
    #[serde(default)]
    pub is_abstract: bool,
}

impl SchemaConcept {
    fn with_kind(label: impl Into<String>, kind: ConceptKind, sup: Option<&str>) -> Self {
        Self {
            label: label.into(),
            kind,
            sup: sup.map(str::to_string),
            relates: Vec::new(),
            plays: Vec::new(),
            has: Vec::new(),
            data_type: None,
            is_abstract: false,
        }
    }

    pub fn entity(label: impl Into<String>) -> Self {
        Self::with_kind(label, ConceptKind::EntityType, Some(META_ENTITY))
    }

    pub fn relation(label: impl Into<String>) -> Self {
        Self::with_kind(label, ConceptKind::RelationType, Some(META_RELATION))
    }

    pub fn role(label: impl Into<String>) -> Self {
        Self::with_kind(label, ConceptKind::RoleType, Some(META_ROLE))
    }

    pub fn resource(label: impl Into<String>, data_type: DataType) -> Self {
        let mut concept = Self::with_kind(label, ConceptKind::ResourceType, Some(META_RESOURCE));
        concept.data_type = Some(data_type);
        concept
    }

    pub fn rule(label: impl Into<String>) -> Self {
        Self::with_kind(label, ConceptKind::RuleType, Some(META_RULE))
    }

    pub fn sub(mut self, sup: impl Into<String>) -> Self {
        self.sup = Some(sup.into());
        self
    }

    pub fn relates(mut self, role: impl Into<String>) -> Self {
        self.relates.push(role.into());
        self
    }

    pub fn plays(mut self, role: impl Into<String>) -> Self {
        self.plays.push(role.into());
        self
    }

    pub fn has(mut self, resource_type: impl Into<String>) -> Self {
        self.has.push(resource_type.into());
        self
    }

    pub fn abstract_type(mut self) -> Self {
        self.is_abstract = true;
        self
    }

    pub fn is_role(&self) -> bool {
        self.kind == ConceptKind::RoleType
    }

    pub fn is_relation(&self) -> bool {
        self.kind == ConceptKind::RelationType
    }

    pub fn is_resource(&self) -> bool {
        self.kind == ConceptKind::ResourceType
    }
}

pub const META_THING: &str = "thing";
pub const META_ENTITY: &str = "entity";
pub const META_RELATION: &str = "relation";
pub const META_ROLE: &str = "role";
pub const META_RESOURCE: &str = "resource";
pub const META_RULE: &str = "rule";

/// Built-in concepts present in every schema
pub fn meta_concepts() -> Vec<SchemaConcept> {
    vec![
        SchemaConcept::with_kind(META_THING, ConceptKind::Meta, None).abstract_type(),
        SchemaConcept::with_kind(META_ENTITY, ConceptKind::EntityType, Some(META_THING))
            .abstract_type(),
        SchemaConcept::with_kind(META_RELATION, ConceptKind::RelationType, Some(META_THING))
            .abstract_type(),
        SchemaConcept::with_kind(META_RESOURCE, ConceptKind::ResourceType, Some(META_THING))
            .abstract_type(),
        SchemaConcept::with_kind(META_ROLE, ConceptKind::RoleType, None).abstract_type(),
        SchemaConcept::with_kind(META_RULE, ConceptKind::RuleType, None).abstract_type(),
    ]
}
