// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Fragments: the primitive traversal steps a plan is made of
//!
//! A fragment either filters the concepts bound to its start variable
//! (`Label`, `Value`, `Regex`, ...) or moves from the start variable to an
//! end variable along one kind of edge (`OutIsa`, `InHas`, ...). Fragments
//! are immutable once built and are compared by kind, start and end only;
//! auxiliary variables and kind payloads do not take part in equality.

use serde::Serialize;
use std::collections::BTreeSet;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::mem::discriminant;

use crate::pattern::{DataType, ValuePredicate, Var};

/// The closed set of fragment kinds
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum FragmentKind {
    /// Index lookup of a schema concept by label
    Label(String),
    /// Index lookup of a concept by id
    Id(String),
    /// Resource value filter, or index lookup for literal equality
    Value(ValuePredicate),
    /// Start and end are different concepts
    Neq,
    DataType(DataType),
    IsAbstract,
    Regex(String),
    OutIsa,
    InIsa,
    OutSub,
    InSub,
    OutRelates,
    InRelates,
    OutPlays,
    InPlays,
    /// Relation to role player, optionally restricted to a role label
    OutRolePlayer { role: Option<String> },
    /// Role player to relation, optionally restricted to a role label
    InRolePlayer { role: Option<String> },
    /// Owner to owned resource
    OutHas { attribute_type: String },
    /// Owned resource to owner
    InHas { attribute_type: String },
}

impl FragmentKind {
    /// Short deterministic name, placed between start and end when rendering
    pub fn name(&self) -> String {
        match self {
            FragmentKind::Label(label) => format!("[label:{}]", label),
            FragmentKind::Id(id) => format!("[id:{}]", id),
            FragmentKind::Value(predicate) => format!("[value:{}]", predicate),
            FragmentKind::Neq => "-[neq]-".to_string(),
            FragmentKind::DataType(dt) => format!("[datatype:{}]", dt),
            FragmentKind::IsAbstract => "[is-abstract]".to_string(),
            FragmentKind::Regex(regex) => format!("[regex:{}]", regex),
            FragmentKind::OutIsa => "-[isa]->".to_string(),
            FragmentKind::InIsa => "<-[isa]-".to_string(),
            FragmentKind::OutSub => "-[sub]->".to_string(),
            FragmentKind::InSub => "<-[sub]-".to_string(),
            FragmentKind::OutRelates => "-[relates]->".to_string(),
            FragmentKind::InRelates => "<-[relates]-".to_string(),
            FragmentKind::OutPlays => "-[plays]->".to_string(),
            FragmentKind::InPlays => "<-[plays]-".to_string(),
            FragmentKind::OutRolePlayer { role: Some(role) } => format!("-[rel:{}]->", role),
            FragmentKind::OutRolePlayer { role: None } => "-[rel]->".to_string(),
            FragmentKind::InRolePlayer { role: Some(role) } => format!("<-[rel:{}]-", role),
            FragmentKind::InRolePlayer { role: None } => "<-[rel]-".to_string(),
            FragmentKind::OutHas { attribute_type } => format!("-[has:{}]->", attribute_type),
            FragmentKind::InHas { attribute_type } => format!("<-[has:{}]-", attribute_type),
        }
    }

    /// Whether the fragment moves from its start to an end variable
    pub fn is_traversal(&self) -> bool {
        !matches!(
            self,
            FragmentKind::Label(_)
                | FragmentKind::Id(_)
                | FragmentKind::Value(_)
                | FragmentKind::Neq
                | FragmentKind::DataType(_)
                | FragmentKind::IsAbstract
                | FragmentKind::Regex(_)
        )
    }
}

/// One primitive step of a plan
#[derive(Debug, Clone, Serialize)]
pub struct Fragment {
    kind: FragmentKind,
    start: Var,
    end: Option<Var>,
    others: Vec<Var>,
    #[serde(skip)]
    variables: BTreeSet<Var>,
}

impl Fragment {
    fn build(kind: FragmentKind, start: Var, end: Option<Var>, others: Vec<Var>) -> Self {
        let mut variables = BTreeSet::new();
        variables.insert(start.clone());
        variables.extend(end.iter().cloned());
        variables.extend(others.iter().cloned());
        Self {
            kind,
            start,
            end,
            others,
            variables,
        }
    }

    pub fn label(start: Var, label: impl Into<String>) -> Self {
        Self::build(FragmentKind::Label(label.into()), start, None, Vec::new())
    }

    pub fn id(start: Var, id: impl Into<String>) -> Self {
        Self::build(FragmentKind::Id(id.into()), start, None, Vec::new())
    }

    /// Value filter; a variable operand becomes an auxiliary variable and a dependency
    pub fn value(start: Var, predicate: ValuePredicate) -> Self {
        let others = predicate.var().into_iter().cloned().collect();
        Self::build(FragmentKind::Value(predicate), start, None, others)
    }

    pub fn neq(start: Var, other: Var) -> Self {
        Self::build(FragmentKind::Neq, start, Some(other), Vec::new())
    }

    pub fn data_type(start: Var, data_type: DataType) -> Self {
        Self::build(FragmentKind::DataType(data_type), start, None, Vec::new())
    }

    pub fn is_abstract(start: Var) -> Self {
        Self::build(FragmentKind::IsAbstract, start, None, Vec::new())
    }

    pub fn regex(start: Var, regex: impl Into<String>) -> Self {
        Self::build(FragmentKind::Regex(regex.into()), start, None, Vec::new())
    }

    pub fn out_isa(instance: Var, ty: Var) -> Self {
        Self::build(FragmentKind::OutIsa, instance, Some(ty), Vec::new())
    }

    pub fn in_isa(ty: Var, instance: Var) -> Self {
        Self::build(FragmentKind::InIsa, ty, Some(instance), Vec::new())
    }

    pub fn out_sub(subtype: Var, supertype: Var) -> Self {
        Self::build(FragmentKind::OutSub, subtype, Some(supertype), Vec::new())
    }

    pub fn in_sub(supertype: Var, subtype: Var) -> Self {
        Self::build(FragmentKind::InSub, supertype, Some(subtype), Vec::new())
    }

    pub fn out_relates(relation_type: Var, role: Var) -> Self {
        Self::build(FragmentKind::OutRelates, relation_type, Some(role), Vec::new())
    }

    pub fn in_relates(role: Var, relation_type: Var) -> Self {
        Self::build(FragmentKind::InRelates, role, Some(relation_type), Vec::new())
    }

    pub fn out_plays(ty: Var, role: Var) -> Self {
        Self::build(FragmentKind::OutPlays, ty, Some(role), Vec::new())
    }

    pub fn in_plays(role: Var, ty: Var) -> Self {
        Self::build(FragmentKind::InPlays, role, Some(ty), Vec::new())
    }

    /// Relation to role player; the role variable, if any, is auxiliary
    pub fn out_role_player(
        relation: Var,
        player: Var,
        role_var: Option<Var>,
        role: Option<String>,
    ) -> Self {
        Self::build(
            FragmentKind::OutRolePlayer { role },
            relation,
            Some(player),
            role_var.into_iter().collect(),
        )
    }

    /// Role player to relation; the role variable, if any, is auxiliary
    pub fn in_role_player(
        player: Var,
        relation: Var,
        role_var: Option<Var>,
        role: Option<String>,
    ) -> Self {
        Self::build(
            FragmentKind::InRolePlayer { role },
            player,
            Some(relation),
            role_var.into_iter().collect(),
        )
    }

    pub fn out_has(owner: Var, attribute: Var, attribute_type: impl Into<String>) -> Self {
        Self::build(
            FragmentKind::OutHas {
                attribute_type: attribute_type.into(),
            },
            owner,
            Some(attribute),
            Vec::new(),
        )
    }

    pub fn in_has(attribute: Var, owner: Var, attribute_type: impl Into<String>) -> Self {
        Self::build(
            FragmentKind::InHas {
                attribute_type: attribute_type.into(),
            },
            attribute,
            Some(owner),
            Vec::new(),
        )
    }

    pub fn kind(&self) -> &FragmentKind {
        &self.kind
    }

    pub fn start(&self) -> &Var {
        &self.start
    }

    pub fn end(&self) -> Option<&Var> {
        self.end.as_ref()
    }

    /// Auxiliary variables, neither start nor end
    pub fn others(&self) -> &[Var] {
        &self.others
    }

    /// Start, end and auxiliary variables
    pub fn variable_names(&self) -> &BTreeSet<Var> {
        &self.variables
    }

    /// Variables that must be bound before this fragment may run
    pub fn dependencies(&self) -> Vec<&Var> {
        match &self.kind {
            FragmentKind::Value(predicate) => predicate.var().into_iter().collect(),
            FragmentKind::Neq => self.end.iter().collect(),
            _ => Vec::new(),
        }
    }

    pub fn name(&self) -> String {
        self.kind.name()
    }

    /// Equal and carrying the same kind payload, so either can replace the other
    pub fn is_duplicate_of(&self, other: &Fragment) -> bool {
        self == other && self.kind == other.kind
    }
}

impl PartialEq for Fragment {
    fn eq(&self, other: &Self) -> bool {
        discriminant(&self.kind) == discriminant(&other.kind)
            && self.start == other.start
            && self.end == other.end
    }
}

impl Eq for Fragment {}

impl Hash for Fragment {
    fn hash<H: Hasher>(&self, state: &mut H) {
        discriminant(&self.kind).hash(state);
        self.start.hash(state);
        self.end.hash(state);
    }
}

impl fmt::Display for Fragment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.start, self.kind.name())?;
        if let Some(end) = &self.end {
            write!(f, "{}", end)?;
        }
        Ok(())
    }
}
