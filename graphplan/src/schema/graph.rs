// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Schema lookup capability and an in-memory schema implementation
//!
//! The planner never talks to a storage engine directly. Everything it needs
//! to know about types, roles and resources is answered through
//! [`SchemaProvider`], which a storage layer can implement over its own
//! catalog. [`SchemaGraph`] is the in-memory implementation used by tests and
//! by embedders that load their schema from JSON.

use serde::{Deserialize, Serialize};
use std::collections::hash_map::DefaultHasher;
use std::collections::{BTreeMap, HashSet};
use std::hash::{Hash, Hasher};
use std::path::Path;

use super::types::{meta_concepts, ConceptKind, SchemaConcept, META_RELATION};
use super::{SchemaError, SchemaResult};

/// Read-only access to the schema a pattern is validated against
pub trait SchemaProvider: Send + Sync {
    /// Look up a schema concept by label
    fn resolve_type(&self, label: &str) -> Option<&SchemaConcept>;

    /// Fingerprint of the schema content
    ///
    /// Plans are cached per fingerprint, so two providers with different
    /// content must not report the same value.
    fn schema_hash(&self) -> u64;

    /// Monotonic schema version, used to invalidate cached plans
    fn version(&self) -> u64 {
        0
    }

    /// The concept and all of its supertypes, nearest first
    fn supertypes(&self, label: &str) -> Vec<&SchemaConcept> {
        let mut chain = Vec::new();
        let mut seen = HashSet::new();
        let mut current = self.resolve_type(label);
        while let Some(concept) = current {
            if !seen.insert(concept.label.as_str()) {
                break;
            }
            chain.push(concept);
            current = concept.sup.as_deref().and_then(|sup| self.resolve_type(sup));
        }
        chain
    }

    /// Whether `label` is `ancestor` or one of its subtypes
    fn is_subtype(&self, label: &str, ancestor: &str) -> bool {
        self.supertypes(label).iter().any(|c| c.label == ancestor)
    }

    /// Whether the relation type (or a supertype) relates the role (or a super-role)
    fn relates_role(&self, relation: &str, role: &str) -> bool {
        if relation == META_RELATION {
            return true;
        }
        let roles: Vec<&str> = self
            .supertypes(role)
            .iter()
            .map(|c| c.label.as_str())
            .collect();
        self.supertypes(relation)
            .iter()
            .any(|rel| rel.relates.iter().any(|r| roles.contains(&r.as_str())))
    }

    /// Whether instances of `owner` may own resources of `resource_type`
    fn can_have(&self, owner: &str, resource_type: &str) -> bool {
        let resources: Vec<&str> = self
            .supertypes(resource_type)
            .iter()
            .map(|c| c.label.as_str())
            .collect();
        self.supertypes(owner)
            .iter()
            .any(|ty| ty.has.iter().any(|h| resources.contains(&h.as_str())))
    }

    /// Whether instances of `ty` may play `role`
    fn can_play(&self, ty: &str, role: &str) -> bool {
        let roles: Vec<&str> = self
            .supertypes(role)
            .iter()
            .map(|c| c.label.as_str())
            .collect();
        self.supertypes(ty)
            .iter()
            .any(|t| t.plays.iter().any(|p| roles.contains(&p.as_str())))
    }
}

/// In-memory schema keyed by label
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchemaGraph {
    #[serde(default)]
    version: u64,
    concepts: BTreeMap<String, SchemaConcept>,
}

impl SchemaGraph {
    /// Create a schema containing only the meta concepts
    pub fn new() -> Self {
        let concepts = meta_concepts()
            .into_iter()
            .map(|c| (c.label.clone(), c))
            .collect();
        Self {
            version: 0,
            concepts,
        }
    }

    /// Add or replace a concept definition
    pub fn define(mut self, concept: SchemaConcept) -> Self {
        self.insert(concept);
        self
    }

    /// Add or replace a concept definition in place
    pub fn insert(&mut self, concept: SchemaConcept) {
        log::trace!("Defining {} '{}'", concept.kind, concept.label);
        self.concepts.insert(concept.label.clone(), concept);
        self.version += 1;
    }

    pub fn concepts(&self) -> impl Iterator<Item = &SchemaConcept> {
        self.concepts.values()
    }

    pub fn len(&self) -> usize {
        self.concepts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.concepts.is_empty()
    }

    /// Load a schema from its JSON form and check it for consistency
    ///
    /// Meta concepts missing from the document are added automatically.
    pub fn from_json(json: &str) -> SchemaResult<Self> {
        let mut graph: SchemaGraph = serde_json::from_str(json)?;
        for meta in meta_concepts() {
            graph.concepts.entry(meta.label.clone()).or_insert(meta);
        }
        graph.check_consistency()?;
        Ok(graph)
    }

    /// Load a schema from a JSON file
    pub fn from_path(path: impl AsRef<Path>) -> SchemaResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    pub fn to_json(&self) -> SchemaResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Check that every reference in the schema resolves to a concept of the right kind
    pub fn check_consistency(&self) -> SchemaResult<()> {
        for concept in self.concepts.values() {
            if let Some(sup) = &concept.sup {
                let parent = self.expect_kind(sup, None, &concept.label)?;
                if parent.kind != concept.kind && parent.kind != ConceptKind::Meta {
                    return Err(SchemaError::InvalidDefinition(format!(
                        "'{}' is {} but its supertype '{}' is {}",
                        concept.label, concept.kind, sup, parent.kind
                    )));
                }
            }
            for role in concept.relates.iter().chain(&concept.plays) {
                self.expect_kind(role, Some(ConceptKind::RoleType), &concept.label)?;
            }
            for resource in &concept.has {
                self.expect_kind(resource, Some(ConceptKind::ResourceType), &concept.label)?;
            }
            let mut seen = HashSet::new();
            let mut current = Some(concept);
            while let Some(c) = current {
                if !seen.insert(c.label.as_str()) {
                    return Err(SchemaError::InvalidDefinition(format!(
                        "supertype cycle through '{}'",
                        concept.label
                    )));
                }
                current = c.sup.as_deref().and_then(|s| self.concepts.get(s));
            }
        }
        Ok(())
    }

    fn expect_kind(
        &self,
        label: &str,
        kind: Option<ConceptKind>,
        referenced_by: &str,
    ) -> SchemaResult<&SchemaConcept> {
        let concept = self.concepts.get(label).ok_or_else(|| {
            SchemaError::InvalidDefinition(format!(
                "'{}' references undefined concept '{}'",
                referenced_by, label
            ))
        })?;
        match kind {
            Some(kind) if concept.kind != kind => Err(SchemaError::InvalidDefinition(format!(
                "'{}' references '{}', which is {} rather than {}",
                referenced_by, label, concept.kind, kind
            ))),
            _ => Ok(concept),
        }
    }
}

impl Default for SchemaGraph {
    fn default() -> Self {
        Self::new()
    }
}

impl SchemaProvider for SchemaGraph {
    fn resolve_type(&self, label: &str) -> Option<&SchemaConcept> {
        self.concepts.get(label)
    }

    fn schema_hash(&self) -> u64 {
        let mut hasher = DefaultHasher::new();
        self.concepts.hash(&mut hasher);
        hasher.finish()
    }

    fn version(&self) -> u64 {
        self.version
    }
}
