// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Properties attached to a pattern variable

use serde::{Deserialize, Serialize};
use std::fmt;

use super::value::{DataType, ValuePredicate};
use super::var::Var;

/// Reference to a schema type, either by label or through another variable
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum TypeRef {
    Label(String),
    Var(Var),
}

impl TypeRef {
    pub fn label(&self) -> Option<&str> {
        match self {
            TypeRef::Label(l) => Some(l),
            TypeRef::Var(_) => None,
        }
    }
}

impl fmt::Display for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeRef::Label(l) => f.write_str(l),
            TypeRef::Var(v) => write!(f, "{}", v),
        }
    }
}

impl From<&str> for TypeRef {
    fn from(value: &str) -> Self {
        TypeRef::Label(value.to_string())
    }
}

impl From<String> for TypeRef {
    fn from(value: String) -> Self {
        TypeRef::Label(value)
    }
}

impl From<Var> for TypeRef {
    fn from(value: Var) -> Self {
        TypeRef::Var(value)
    }
}

/// One role player of a relation clause
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RolePlayer {
    pub role: Option<TypeRef>,
    pub player: Var,
}

impl fmt::Display for RolePlayer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.role {
            Some(role) => write!(f, "{}: {}", role, self.player),
            None => write!(f, "{}", self.player),
        }
    }
}

/// A single constraint on a variable
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum VarProperty {
    /// Instance of the given type (or a subtype)
    Isa(TypeRef),
    /// Subtype of the given type
    Sub(TypeRef),
    /// The variable is the schema concept with this label
    Label(String),
    /// The variable is the concept with this id
    Id(String),
    /// The variable is a resource whose value satisfies the predicate
    Value(ValuePredicate),
    /// The variable owns a resource of the given type
    Has {
        attribute_type: String,
        attribute: Option<Var>,
        predicate: Option<ValuePredicate>,
    },
    /// The variable is a relation with this role player
    Rel(RolePlayer),
    /// The variable is a relation type relating this role
    Relates(TypeRef),
    /// The variable is a type whose instances may play this role
    Plays(TypeRef),
    DataType(DataType),
    IsAbstract,
    Regex(String),
    /// The variable is a different concept from the other variable
    Neq(Var),
}

impl VarProperty {
    /// Variables referenced by this property, excluding the owning variable
    pub fn inner_vars(&self) -> Vec<&Var> {
        match self {
            VarProperty::Isa(TypeRef::Var(v))
            | VarProperty::Sub(TypeRef::Var(v))
            | VarProperty::Relates(TypeRef::Var(v))
            | VarProperty::Plays(TypeRef::Var(v))
            | VarProperty::Neq(v) => vec![v],
            VarProperty::Value(predicate) => predicate.var().into_iter().collect(),
            VarProperty::Has {
                attribute,
                predicate,
                ..
            } => attribute
                .iter()
                .chain(predicate.as_ref().and_then(|p| p.var()))
                .collect(),
            VarProperty::Rel(rp) => match &rp.role {
                Some(TypeRef::Var(role)) => vec![role, &rp.player],
                _ => vec![&rp.player],
            },
            _ => Vec::new(),
        }
    }
}

impl fmt::Display for VarProperty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VarProperty::Isa(t) => write!(f, "isa {}", t),
            VarProperty::Sub(t) => write!(f, "sub {}", t),
            VarProperty::Label(l) => write!(f, "label {}", l),
            VarProperty::Id(id) => write!(f, "id \"{}\"", id),
            VarProperty::Value(p) => write!(f, "val {}", p),
            VarProperty::Has {
                attribute_type,
                attribute,
                predicate,
            } => {
                write!(f, "has {}", attribute_type)?;
                if let Some(p) = predicate {
                    write!(f, " {}", p)?;
                }
                if let Some(a) = attribute {
                    write!(f, " {}", a)?;
                }
                Ok(())
            }
            VarProperty::Rel(rp) => write!(f, "({})", rp),
            VarProperty::Relates(t) => write!(f, "relates {}", t),
            VarProperty::Plays(t) => write!(f, "plays {}", t),
            VarProperty::DataType(dt) => write!(f, "datatype {}", dt),
            VarProperty::IsAbstract => f.write_str("is-abstract"),
            VarProperty::Regex(r) => write!(f, "regex /{}/", r),
            VarProperty::Neq(v) => write!(f, "!= {}", v),
        }
    }
}
