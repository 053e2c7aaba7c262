//! Predicate evaluation
//!
//! A record matches a comparison only when the field is present and its stored
//! value coerces to the field's type and compares with the literal. Missing or
//! uncoercible values never match, whatever the operator.

use super::ast::{Comparison, Predicate};
use crate::schema::{Record, Scalar, Schema, SchemaError, SchemaResult};

/// Predicate filter
pub struct PredicateFilter;

impl PredicateFilter {
    /// Returns true if the record satisfies every comparison in the predicate
    pub fn matches(record: &Record, predicate: &Predicate, schema: &Schema) -> bool {
        match predicate {
            Predicate::All => true,
            Predicate::Compare(c) => Self::matches_comparison(record, c, schema),
            Predicate::And(children) => children
                .iter()
                .all(|child| Self::matches(record, child, schema)),
        }
    }

    fn matches_comparison(record: &Record, comparison: &Comparison, schema: &Schema) -> bool {
        match record.scalar(schema, &comparison.field) {
            Ok(Some(actual)) => actual
                .compare(&comparison.value)
                .is_some_and(|ord| comparison.op.accepts(ord)),
            _ => false,
        }
    }

    /// Checks that every comparison names a declared field and carries a literal
    /// of a compatible type. Stores run this before scanning.
    pub fn validate(predicate: &Predicate, schema: &Schema) -> SchemaResult<()> {
        for leaf in predicate.leaves() {
            let def = schema.field(&leaf.field)?;
            let compatible = match &leaf.value {
                Scalar::Text(_) => !def.field_type.is_numeric(),
                Scalar::Int(_) | Scalar::Decimal(_) => def.field_type.is_numeric(),
            };
            if !compatible {
                return Err(SchemaError::type_mismatch(
                    leaf.field.as_str(),
                    def.field_type.type_name(),
                    &leaf.value,
                ));
            }
        }
        Ok(())
    }
}
