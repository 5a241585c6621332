//! Normalization of prover output.
//!
//! Provers emit proofs and public signals as JSON in which every field
//! element is a decimal or `0x` hex string. Before the calldata export step
//! those strings must become integers again. [`Signal`] is the closed set of
//! shapes a prover emits; anything outside it is rejected.

use std::collections::BTreeMap;

use num_bigint::BigUint;
use serde_json::Value;

use crate::error::{Result, WhitelistError};
use crate::utils::parse_numeric_string;

/// A normalized prover value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Signal {
    /// A numeric string or JSON integer, parsed exactly.
    Number(BigUint),
    /// A string that is not numeric, such as a protocol or curve name.
    Text(String),
    List(Vec<Signal>),
    Map(BTreeMap<String, Signal>),
}

impl Signal {
    /// Converts raw prover JSON, recursing through arrays and objects.
    ///
    /// # Errors
    /// Returns [`WhitelistError::MalformedProverOutput`] for booleans, nulls,
    /// negative or fractional numbers, with the JSON path of the offender.
    pub fn normalize(value: &Value) -> Result<Self> {
        Self::visit(value, "$")
    }

    fn visit(value: &Value, path: &str) -> Result<Self> {
        match value {
            Value::String(s) => Ok(parse_numeric_string(s)
                .map(Signal::Number)
                .unwrap_or_else(|| Signal::Text(s.clone()))),
            Value::Number(n) => n.as_u64().map(|v| Signal::Number(v.into())).ok_or_else(|| {
                WhitelistError::MalformedProverOutput(format!(
                    "{path}: number {n} is not a non-negative integer"
                ))
            }),
            Value::Array(items) => items
                .iter()
                .enumerate()
                .map(|(i, item)| Self::visit(item, &format!("{path}[{i}]")))
                .collect::<Result<Vec<_>>>()
                .map(Signal::List),
            Value::Object(fields) => fields
                .iter()
                .map(|(key, item)| {
                    Self::visit(item, &format!("{path}.{key}")).map(|s| (key.clone(), s))
                })
                .collect::<Result<BTreeMap<_, _>>>()
                .map(Signal::Map),
            Value::Bool(_) | Value::Null => Err(WhitelistError::MalformedProverOutput(format!(
                "{path}: unsupported value {value}"
            ))),
        }
    }

    /// Serializes back to JSON with every number as an exact decimal string.
    #[must_use]
    pub fn to_json(&self) -> Value {
        match self {
            Signal::Number(n) => Value::String(n.to_str_radix(10)),
            Signal::Text(s) => Value::String(s.clone()),
            Signal::List(items) => Value::Array(items.iter().map(Signal::to_json).collect()),
            Signal::Map(fields) => Value::Object(
                fields
                    .iter()
                    .map(|(key, item)| (key.clone(), item.to_json()))
                    .collect(),
            ),
        }
    }
}
