// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Var patterns and conjunctive patterns, with a fluent builder

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

use super::property::{RolePlayer, TypeRef, VarProperty};
use super::value::{DataType, ValuePredicate};
use super::var::Var;
use crate::schema::validator::ValidationError;

/// Start building a pattern on a named variable
pub fn var(name: &str) -> Result<VarPattern, ValidationError> {
    Ok(VarPattern::new(Var::new(name)?))
}

/// Start building a pattern on a fresh anonymous variable
pub fn anon() -> VarPattern {
    VarPattern::new(Var::anon())
}

/// All properties declared on one variable in one clause
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VarPattern {
    var: Var,
    properties: Vec<VarProperty>,
}

impl VarPattern {
    pub fn new(var: Var) -> Self {
        Self {
            var,
            properties: Vec::new(),
        }
    }

    pub fn var(&self) -> &Var {
        &self.var
    }

    pub fn properties(&self) -> &[VarProperty] {
        &self.properties
    }

    /// Add an arbitrary property
    pub fn with(mut self, property: VarProperty) -> Self {
        self.properties.push(property);
        self
    }

    pub fn isa(self, ty: impl Into<TypeRef>) -> Self {
        self.with(VarProperty::Isa(ty.into()))
    }

    pub fn sub(self, ty: impl Into<TypeRef>) -> Self {
        self.with(VarProperty::Sub(ty.into()))
    }

    pub fn label(self, label: impl Into<String>) -> Self {
        self.with(VarProperty::Label(label.into()))
    }

    pub fn id(self, id: impl Into<String>) -> Self {
        self.with(VarProperty::Id(id.into()))
    }

    pub fn val(self, predicate: impl Into<ValuePredicate>) -> Self {
        self.with(VarProperty::Value(predicate.into()))
    }

    /// Owns a resource of `attribute_type` whose value satisfies `predicate`
    pub fn has(self, attribute_type: impl Into<String>, predicate: impl Into<ValuePredicate>) -> Self {
        self.with(VarProperty::Has {
            attribute_type: attribute_type.into(),
            attribute: None,
            predicate: Some(predicate.into()),
        })
    }

    /// Owns a resource of `attribute_type` bound to `attribute`
    pub fn has_var(self, attribute_type: impl Into<String>, attribute: Var) -> Self {
        self.with(VarProperty::Has {
            attribute_type: attribute_type.into(),
            attribute: Some(attribute),
            predicate: None,
        })
    }

    /// Role player without a role
    pub fn rel(self, player: Var) -> Self {
        self.with(VarProperty::Rel(RolePlayer { role: None, player }))
    }

    /// Role player in the given role
    pub fn rel_role(self, role: impl Into<TypeRef>, player: Var) -> Self {
        self.with(VarProperty::Rel(RolePlayer {
            role: Some(role.into()),
            player,
        }))
    }

    pub fn relates(self, role: impl Into<TypeRef>) -> Self {
        self.with(VarProperty::Relates(role.into()))
    }

    pub fn plays(self, role: impl Into<TypeRef>) -> Self {
        self.with(VarProperty::Plays(role.into()))
    }

    pub fn datatype(self, data_type: DataType) -> Self {
        self.with(VarProperty::DataType(data_type))
    }

    pub fn is_abstract(self) -> Self {
        self.with(VarProperty::IsAbstract)
    }

    pub fn regex(self, regex: impl Into<String>) -> Self {
        self.with(VarProperty::Regex(regex.into()))
    }

    pub fn neq(self, other: Var) -> Self {
        self.with(VarProperty::Neq(other))
    }

    pub fn role_players(&self) -> impl Iterator<Item = &RolePlayer> {
        self.properties.iter().filter_map(|p| match p {
            VarProperty::Rel(rp) => Some(rp),
            _ => None,
        })
    }

    /// Labels this variable is declared an instance of via `isa <label>`
    pub fn isa_labels(&self) -> impl Iterator<Item = &str> {
        self.properties.iter().filter_map(|p| match p {
            VarProperty::Isa(TypeRef::Label(l)) => Some(l.as_str()),
            _ => None,
        })
    }
}

impl fmt::Display for VarPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.var)?;

        let players: Vec<String> = self.role_players().map(|rp| rp.to_string()).collect();
        if !players.is_empty() {
            write!(f, " ({})", players.join(", "))?;
        }

        let rest: Vec<String> = self
            .properties
            .iter()
            .filter(|p| !matches!(p, VarProperty::Rel(_)))
            .map(|p| p.to_string())
            .collect();
        if !rest.is_empty() {
            write!(f, " {}", rest.join(", "))?;
        }
        Ok(())
    }
}

/// A conjunction of var patterns
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Pattern {
    patterns: Vec<VarPattern>,
}

impl Pattern {
    pub fn new(patterns: Vec<VarPattern>) -> Self {
        Self { patterns }
    }

    pub fn var_patterns(&self) -> &[VarPattern] {
        &self.patterns
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    /// Every variable mentioned anywhere in the pattern
    pub fn variables(&self) -> BTreeSet<Var> {
        let mut vars = BTreeSet::new();
        for vp in &self.patterns {
            vars.insert(vp.var().clone());
            for property in vp.properties() {
                vars.extend(property.inner_vars().into_iter().cloned());
            }
        }
        vars
    }

    /// Var patterns declared on `var`, in clause order
    pub fn patterns_for<'a>(&'a self, var: &'a Var) -> impl Iterator<Item = &'a VarPattern> + 'a {
        self.patterns.iter().filter(move |vp| vp.var() == var)
    }

    /// Canonical encoding used to recognise identical patterns
    ///
    /// Built from the structure rather than the rendered text, so literals
    /// of different types or with embedded quotes never collide.
    pub fn signature(&self) -> String {
        format!("{:?}", self.patterns)
    }
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, vp) in self.patterns.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{};", vp)?;
        }
        Ok(())
    }
}

impl From<Vec<VarPattern>> for Pattern {
    fn from(patterns: Vec<VarPattern>) -> Self {
        Self::new(patterns)
    }
}

impl FromIterator<VarPattern> for Pattern {
    fn from_iter<T: IntoIterator<Item = VarPattern>>(iter: T) -> Self {
        Self::new(iter.into_iter().collect())
    }
}
