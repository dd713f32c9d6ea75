//! Helpers for the carrier wire format.
//!
//! Carrier responses collapse single-element lists into bare objects, and
//! carry numeric values either as strings or as numbers depending on the
//! node. Everything repeatable deserializes through [`OneOrMany`] and
//! every numeric field through [`flexible_f64`], so the rest of the crate
//! only ever sees uniform lists and `f64`s.

use serde::{Deserialize, Deserializer, Serialize};

/// A response node that may appear as a single object or a list of
/// objects. A bare single entry and a list of one normalize identically.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OneOrMany<T> {
    One(T),
    Many(Vec<T>),
}

impl<T> OneOrMany<T> {
    /// Normalizes to a uniform list.
    pub fn into_vec(self) -> Vec<T> {
        match self {
            Self::One(value) => vec![value],
            Self::Many(values) => values,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Self::One(_) => 1,
            Self::Many(values) => values.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Normalizes an optional repeatable node, treating an absent node as an
/// empty list.
pub fn to_list<T>(node: Option<OneOrMany<T>>) -> Vec<T> {
    node.map(OneOrMany::into_vec).unwrap_or_default()
}

/// Deserializes a numeric field that the carrier sends either as a JSON
/// number or as a quoted decimal string.
pub fn flexible_f64<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum NumberOrString {
        Number(f64),
        String(String),
    }

    match NumberOrString::deserialize(deserializer)? {
        NumberOrString::Number(value) => Ok(value),
        NumberOrString::String(value) => value.trim().parse::<f64>().map_err(|_| {
            serde::de::Error::custom(format!("invalid numeric value '{value}'"))
        }),
    }
}
