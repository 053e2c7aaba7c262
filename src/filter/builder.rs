//! Filter builder
//!
//! Combines key constraints and a free-form expression into one predicate.
//!
//! Rules:
//! - Key range bounds are exclusive
//! - Malformed clauses are skipped and reported, never fatal
//! - Unknown fields and uncoercible literals reject the whole filter

use serde::{Deserialize, Serialize};

use super::ast::{CompareOp, Predicate};
use super::errors::{FilterError, FilterResult};
use super::lexer::{parse_clause, render_clause, split_clauses, tokenize};
use crate::observability::{log_event, Event};
use crate::schema::Schema;

/// Exclusive bounds on a key field. At least one bound must be set.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct KeyRange {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lower: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub upper: Option<String>,
}

impl KeyRange {
    /// Values strictly greater than `lower`
    pub fn above(lower: impl Into<String>) -> Self {
        Self {
            lower: Some(lower.into()),
            upper: None,
        }
    }

    /// Values strictly less than `upper`
    pub fn below(upper: impl Into<String>) -> Self {
        Self {
            lower: None,
            upper: Some(upper.into()),
        }
    }

    /// Values strictly between both bounds
    pub fn between(lower: impl Into<String>, upper: impl Into<String>) -> Self {
        Self {
            lower: Some(lower.into()),
            upper: Some(upper.into()),
        }
    }
}

/// Constraint on one key field
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KeyConstraint {
    /// No constraint
    #[default]
    None,
    /// Field equals the value
    Exact(String),
    /// Field lies within exclusive bounds
    Range(KeyRange),
}

/// A clause that was ignored
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedClause {
    pub clause: String,
    pub reason: String,
}

/// Output of the builder
#[derive(Debug, Clone, PartialEq)]
pub struct BuiltFilter {
    pub predicate: Predicate,
    pub skipped: Vec<SkippedClause>,
}

/// Builds predicates against a schema
pub struct FilterBuilder<'a> {
    schema: &'a Schema,
}

impl<'a> FilterBuilder<'a> {
    pub fn new(schema: &'a Schema) -> Self {
        Self { schema }
    }

    /// Builds the full filter: partition constraint, sort constraint, then the
    /// expression's clauses, all conjoined.
    pub fn build(
        &self,
        user_expression: &str,
        partition: &KeyConstraint,
        sort: &KeyConstraint,
    ) -> FilterResult<BuiltFilter> {
        let partition_pred = self.key_predicate(&self.schema.partition_key.name, partition)?;
        let sort_pred = self.key_predicate(&self.schema.sort_key.name, sort)?;
        let (expr_pred, skipped) = self.parse_expression(user_expression)?;

        Ok(BuiltFilter {
            predicate: Predicate::all_of([partition_pred, sort_pred, expr_pred]),
            skipped,
        })
    }

    /// Predicate for a single key constraint
    pub fn key_predicate(&self, field: &str, constraint: &KeyConstraint) -> FilterResult<Predicate> {
        match constraint {
            KeyConstraint::None => Ok(Predicate::All),
            KeyConstraint::Exact(value) => self.leaf(field, CompareOp::Eq, value),
            KeyConstraint::Range(range) => {
                if range.lower.is_none() && range.upper.is_none() {
                    return Err(FilterError::empty_range(field));
                }
                let lower = match &range.lower {
                    Some(v) => self.leaf(field, CompareOp::Gt, v)?,
                    None => Predicate::All,
                };
                let upper = match &range.upper {
                    Some(v) => self.leaf(field, CompareOp::Lt, v)?,
                    None => Predicate::All,
                };
                Ok(lower.and(upper))
            }
        }
    }

    /// Parses a free-form `field op literal [and ...]` expression
    pub fn parse_expression(&self, expression: &str) -> FilterResult<(Predicate, Vec<SkippedClause>)> {
        let mut predicate = Predicate::All;
        let mut skipped = Vec::new();

        for tokens in split_clauses(tokenize(expression)) {
            let text = render_clause(&tokens);
            match parse_clause(&tokens) {
                Ok(clause) => {
                    let leaf = self
                        .leaf(&clause.field, clause.op, &clause.literal)
                        .map_err(|e| e.in_clause(text.as_str()))?;
                    predicate = predicate.and(leaf);
                }
                Err(reason) => {
                    log_event(
                        Event::ClauseSkipped,
                        &[("clause", text.as_str()), ("reason", reason.as_str())],
                    );
                    skipped.push(SkippedClause {
                        clause: text,
                        reason,
                    });
                }
            }
        }

        Ok((predicate, skipped))
    }

    fn leaf(&self, field: &str, op: CompareOp, literal: &str) -> FilterResult<Predicate> {
        let value = self.schema.coerce_literal(field, literal)?;
        Ok(Predicate::compare(field, op, value))
    }
}
