//! Error types.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum LsError {
    /// One or more L-System parameters failed validation.
    #[error("invalid L-system parameters:{0}")]
    InvalidParams(ParamErrors),

    /// A `]` run tried to restore more turtle states than were saved.
    #[error("unbalanced branch: {requested} saved states requested, {available} available")]
    UnbalancedBranch { requested: usize, available: usize },
}

/// The verdict on a single parameter.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParamError {
    Message(String),
    /// Per-letter messages, used for `rules`.
    Entries(BTreeMap<String, String>),
}

/// Validation failures keyed by parameter name.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ParamErrors(BTreeMap<String, ParamError>);

impl ParamErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records `error` under `param`, replacing any previous verdict.
    pub fn insert(&mut self, param: impl Into<String>, error: ParamError) {
        self.0.insert(param.into(), error);
    }

    pub fn get(&self, param: &str) -> Option<&ParamError> {
        self.0.get(param)
    }

    pub fn contains(&self, param: &str) -> bool {
        self.0.contains_key(param)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &ParamError)> {
        self.0.iter()
    }

    /// Raw JSON representation, suitable for field-level display in a UI.
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or(serde_json::Value::Null)
    }

    /// `Ok(())` when nothing was recorded, otherwise `Err(self)`.
    pub fn into_result(self) -> Result<(), ParamErrors> {
        if self.is_empty() { Ok(()) } else { Err(self) }
    }
}

/// One line per parameter, each prefixed by a newline. Nested per-letter
/// messages are listed under their parameter, indented by two spaces.
impl fmt::Display for ParamErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (param, error) in &self.0 {
            match error {
                ParamError::Message(message) => write!(f, "\n{param}: {message}")?,
                ParamError::Entries(entries) => {
                    write!(f, "\n{param}:")?;
                    for (letter, message) in entries {
                        write!(f, "\n  {letter}: {message}")?;
                    }
                }
            }
        }
        Ok(())
    }
}
