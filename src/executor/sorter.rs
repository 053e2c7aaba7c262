//! Result sorting
//!
//! Compares values by the sort field's declared type, so numeric fields stored as
//! strings sort numerically. Missing or uncoercible values sort first in ascending
//! order and last in descending order. An escaped sort key sorts by its unescaped
//! value.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::schema::{unescape_key, Record, Scalar, Schema, SchemaResult};

/// Sort direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

/// Sort specification
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortSpec {
    pub field: String,
    #[serde(default)]
    pub direction: SortDirection,
}

impl SortSpec {
    pub fn asc(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            direction: SortDirection::Asc,
        }
    }

    pub fn desc(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            direction: SortDirection::Desc,
        }
    }
}

/// Sorts result records
pub struct ResultSorter;

impl ResultSorter {
    /// Sorts records in place by the spec's field.
    ///
    /// Stable: records with equal values keep their input order, in both directions.
    /// Fails before reordering anything if the field is not declared.
    pub fn sort(records: &mut [Record], sort_spec: &SortSpec, schema: &Schema) -> SchemaResult<()> {
        schema.field(&sort_spec.field)?;
        let unescape = schema.escape_sort_key && sort_spec.field == schema.sort_key.name;

        let mut keyed: Vec<(Option<Scalar>, Record)> = records
            .iter_mut()
            .map(|r| {
                let key = match r.scalar(schema, &sort_spec.field).ok().flatten() {
                    Some(Scalar::Text(s)) if unescape => Some(Scalar::Text(unescape_key(&s))),
                    other => other,
                };
                (key, std::mem::take(r))
            })
            .collect();

        keyed.sort_by(|(a, _), (b, _)| {
            let ordering = Self::compare_values(a.as_ref(), b.as_ref());
            match sort_spec.direction {
                SortDirection::Asc => ordering,
                SortDirection::Desc => ordering.reverse(),
            }
        });

        for (slot, (_, record)) in records.iter_mut().zip(keyed) {
            *slot = record;
        }
        Ok(())
    }

    fn compare_values(a: Option<&Scalar>, b: Option<&Scalar>) -> Ordering {
        match (a, b) {
            (None, None) => Ordering::Equal,
            (None, Some(_)) => Ordering::Less,
            (Some(_), None) => Ordering::Greater,
            (Some(a), Some(b)) => a.compare(b).unwrap_or(Ordering::Equal),
        }
    }
}
