// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Attribute values and value predicates

use serde::{Deserialize, Serialize};
use std::fmt;

use super::var::Var;

/// Literal attribute value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Value {
    String(String),
    Long(i64),
    Double(f64),
    Boolean(bool),
}

impl Value {
    /// Data type this literal belongs to
    pub fn data_type(&self) -> DataType {
        match self {
            Value::String(_) => DataType::String,
            Value::Long(_) => DataType::Long,
            Value::Double(_) => DataType::Double,
            Value::Boolean(_) => DataType::Boolean,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::String(s) => write!(f, "{:?}", s),
            Value::Long(n) => write!(f, "{}", n),
            // Always keeps a fraction or exponent, so `3.0` never reads as a long
            Value::Double(n) => write!(f, "{:?}", n),
            Value::Boolean(b) => write!(f, "{}", b),
        }
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::String(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::String(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Long(value)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Double(value)
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Boolean(value)
    }
}

/// Data types a resource type may declare
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataType {
    String,
    Long,
    Double,
    Boolean,
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DataType::String => "string",
            DataType::Long => "long",
            DataType::Double => "double",
            DataType::Boolean => "boolean",
        };
        f.write_str(name)
    }
}

/// Right-hand side of a comparison: a literal or another variable's value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Operand {
    Value(Value),
    Var(Var),
}

impl fmt::Display for Operand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operand::Value(v) => write!(f, "{}", v),
            Operand::Var(v) => write!(f, "{}", v),
        }
    }
}

macro_rules! literal_conversions {
    ($target:ident, $wrap:expr) => {
        impl From<&str> for $target {
            fn from(value: &str) -> Self {
                $wrap(Value::from(value))
            }
        }

        impl From<String> for $target {
            fn from(value: String) -> Self {
                $wrap(Value::from(value))
            }
        }

        impl From<i64> for $target {
            fn from(value: i64) -> Self {
                $wrap(Value::from(value))
            }
        }

        impl From<f64> for $target {
            fn from(value: f64) -> Self {
                $wrap(Value::from(value))
            }
        }

        impl From<bool> for $target {
            fn from(value: bool) -> Self {
                $wrap(Value::from(value))
            }
        }

        impl From<Value> for $target {
            fn from(value: Value) -> Self {
                $wrap(value)
            }
        }
    };
}

literal_conversions!(Operand, Operand::Value);

impl From<Var> for Operand {
    fn from(value: Var) -> Self {
        Operand::Var(value)
    }
}

/// Predicate over a resource value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ValuePredicate {
    Eq(Operand),
    Neq(Operand),
    Gt(Operand),
    Gte(Operand),
    Lt(Operand),
    Lte(Operand),
    Contains(String),
    Regex(String),
}

impl ValuePredicate {
    pub fn eq(operand: impl Into<Operand>) -> Self {
        ValuePredicate::Eq(operand.into())
    }

    pub fn neq(operand: impl Into<Operand>) -> Self {
        ValuePredicate::Neq(operand.into())
    }

    pub fn gt(operand: impl Into<Operand>) -> Self {
        ValuePredicate::Gt(operand.into())
    }

    pub fn gte(operand: impl Into<Operand>) -> Self {
        ValuePredicate::Gte(operand.into())
    }

    pub fn lt(operand: impl Into<Operand>) -> Self {
        ValuePredicate::Lt(operand.into())
    }

    pub fn lte(operand: impl Into<Operand>) -> Self {
        ValuePredicate::Lte(operand.into())
    }

    fn operand(&self) -> Option<&Operand> {
        match self {
            ValuePredicate::Eq(o)
            | ValuePredicate::Neq(o)
            | ValuePredicate::Gt(o)
            | ValuePredicate::Gte(o)
            | ValuePredicate::Lt(o)
            | ValuePredicate::Lte(o) => Some(o),
            ValuePredicate::Contains(_) | ValuePredicate::Regex(_) => None,
        }
    }

    /// Variable whose value must be resolved before this predicate can be checked
    pub fn var(&self) -> Option<&Var> {
        match self.operand() {
            Some(Operand::Var(v)) => Some(v),
            _ => None,
        }
    }

    /// Whether the predicate can be answered by a value index lookup
    pub fn is_indexable(&self) -> bool {
        matches!(self, ValuePredicate::Eq(Operand::Value(_)))
    }

    fn symbol(&self) -> &'static str {
        match self {
            ValuePredicate::Eq(_) => "=",
            ValuePredicate::Neq(_) => "!=",
            ValuePredicate::Gt(_) => ">",
            ValuePredicate::Gte(_) => ">=",
            ValuePredicate::Lt(_) => "<",
            ValuePredicate::Lte(_) => "<=",
            ValuePredicate::Contains(_) => "contains",
            ValuePredicate::Regex(_) => "/",
        }
    }
}

impl fmt::Display for ValuePredicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            // Bare literals read as equality, as in `has genre "Drama"`
            ValuePredicate::Eq(Operand::Value(v)) => write!(f, "{}", v),
            ValuePredicate::Contains(s) => write!(f, "contains {:?}", s),
            ValuePredicate::Regex(r) => write!(f, "/{}/", r),
            other => match other.operand() {
                Some(operand) => write!(f, "{} {}", other.symbol(), operand),
                None => f.write_str(other.symbol()),
            },
        }
    }
}

literal_conversions!(ValuePredicate, |v| ValuePredicate::Eq(Operand::Value(v)));

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_predicate_dependencies() {
        let y = Var::new("y").unwrap();
        assert_eq!(ValuePredicate::gt(y.clone()).var(), Some(&y));
        assert_eq!(ValuePredicate::gt(10i64).var(), None);
        assert_eq!(ValuePredicate::Contains("a".into()).var(), None);
    }

    #[test]
    fn test_only_literal_equality_is_indexable() {
        assert!(ValuePredicate::eq("Drama").is_indexable());
        assert!(!ValuePredicate::eq(Var::new("y").unwrap()).is_indexable());
        assert!(!ValuePredicate::lt(3i64).is_indexable());
    }

    #[test]
    fn test_predicate_rendering() {
        assert_eq!(ValuePredicate::from("Drama").to_string(), "\"Drama\"");
        assert_eq!(ValuePredicate::gte(5i64).to_string(), ">= 5");
        assert_eq!(ValuePredicate::gte(5.0).to_string(), ">= 5.0");
        assert_eq!(ValuePredicate::from("say \"hi\"").to_string(), r#""say \"hi\"""#);
        assert_eq!(
            ValuePredicate::neq(Var::new("y").unwrap()).to_string(),
            "!= $y"
        );
    }
}
