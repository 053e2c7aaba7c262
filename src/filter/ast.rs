//! Predicate tree
//!
//! Leaves compare one field against a literal already coerced to the field's type.
//! Inner nodes are conjunctions. The empty predicate matches every record.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::schema::Scalar;

/// Comparison operators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CompareOp {
    Eq,
    Ne,
    Gt,
    Ge,
    Lt,
    Le,
}

impl CompareOp {
    /// Canonical token
    pub fn as_str(&self) -> &'static str {
        match self {
            CompareOp::Eq => "eq",
            CompareOp::Ne => "ne",
            CompareOp::Gt => "gt",
            CompareOp::Ge => "ge",
            CompareOp::Lt => "lt",
            CompareOp::Le => "le",
        }
    }

    /// Recognizes a whole operator token. Partial matches never count, so `gte` is
    /// only ever `Ge` and `rating` is never an operator.
    pub fn from_token(token: &str) -> Option<Self> {
        match token.to_ascii_lowercase().as_str() {
            "eq" | "=" | "==" => Some(CompareOp::Eq),
            "ne" | "!=" | "<>" => Some(CompareOp::Ne),
            "gt" | ">" => Some(CompareOp::Gt),
            "ge" | "gte" | ">=" => Some(CompareOp::Ge),
            "lt" | "<" => Some(CompareOp::Lt),
            "le" | "lte" | "<=" => Some(CompareOp::Le),
            _ => None,
        }
    }

    /// Returns true if `actual.cmp(literal)` satisfies this operator
    pub fn accepts(&self, ordering: Ordering) -> bool {
        match self {
            CompareOp::Eq => ordering == Ordering::Equal,
            CompareOp::Ne => ordering != Ordering::Equal,
            CompareOp::Gt => ordering == Ordering::Greater,
            CompareOp::Ge => ordering != Ordering::Less,
            CompareOp::Lt => ordering == Ordering::Less,
            CompareOp::Le => ordering != Ordering::Greater,
        }
    }
}

impl FromStr for CompareOp {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CompareOp::from_token(s.trim()).ok_or_else(|| format!("unknown operator '{}'", s))
    }
}

impl fmt::Display for CompareOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A single leaf comparison
#[derive(Debug, Clone, PartialEq)]
pub struct Comparison {
    pub field: String,
    pub op: CompareOp,
    pub value: Scalar,
}

impl fmt::Display for Comparison {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.value {
            Scalar::Text(s) => write!(f, "{} {} '{}'", self.field, self.op, s.replace('\'', "''")),
            other => write!(f, "{} {} {}", self.field, self.op, other),
        }
    }
}

/// Filter predicate
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Predicate {
    /// Matches everything
    #[default]
    All,
    /// Single comparison
    Compare(Comparison),
    /// Every child must match
    And(Vec<Predicate>),
}

impl Predicate {
    /// Create a leaf comparison
    pub fn compare(field: impl Into<String>, op: CompareOp, value: Scalar) -> Self {
        Predicate::Compare(Comparison {
            field: field.into(),
            op,
            value,
        })
    }

    /// Conjunction of two predicates. `All` is the identity and nested
    /// conjunctions are flattened.
    pub fn and(self, other: Predicate) -> Predicate {
        match (self, other) {
            (Predicate::All, p) | (p, Predicate::All) => p,
            (Predicate::And(mut left), Predicate::And(right)) => {
                left.extend(right);
                Predicate::And(left)
            }
            (Predicate::And(mut left), p) => {
                left.push(p);
                Predicate::And(left)
            }
            (p, Predicate::And(right)) => {
                let mut children = Vec::with_capacity(right.len() + 1);
                children.push(p);
                children.extend(right);
                Predicate::And(children)
            }
            (a, b) => Predicate::And(vec![a, b]),
        }
    }

    /// Conjunction of any number of predicates
    pub fn all_of(predicates: impl IntoIterator<Item = Predicate>) -> Predicate {
        predicates
            .into_iter()
            .fold(Predicate::All, |acc, p| acc.and(p))
    }

    /// Returns true if this predicate places no constraint
    pub fn is_empty(&self) -> bool {
        match self {
            Predicate::All => true,
            Predicate::Compare(_) => false,
            Predicate::And(children) => children.iter().all(Predicate::is_empty),
        }
    }

    /// All leaf comparisons, depth first
    pub fn leaves(&self) -> Vec<&Comparison> {
        let mut out = Vec::new();
        self.collect_leaves(&mut out);
        out
    }

    fn collect_leaves<'a>(&'a self, out: &mut Vec<&'a Comparison>) {
        match self {
            Predicate::All => {}
            Predicate::Compare(c) => out.push(c),
            Predicate::And(children) => {
                for child in children {
                    child.collect_leaves(out);
                }
            }
        }
    }
}

impl fmt::Display for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let leaves = self.leaves();
        if leaves.is_empty() {
            return write!(f, "true");
        }
        for (i, leaf) in leaves.iter().enumerate() {
            if i > 0 {
                write!(f, " and ")?;
            }
            write!(f, "{}", leaf)?;
        }
        Ok(())
    }
}
