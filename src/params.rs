//! L-System parameter types.
//!
//! [`LsParams`] is the strongly-typed description handed to the generator.
//! [`PartialLsParams`] is the loose shape a preset store or an editor produces
//! while a grammar is still being typed in: every field is optional and the
//! numeric fields may hold anything JSON can express, so the validator can
//! report each bad field instead of failing at deserialization.

use crate::error::{LsError, ParamError, ParamErrors};
use crate::validator;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Production rules, keyed by the letter they rewrite.
pub type Rules = BTreeMap<String, String>;

pub const DEFAULT_ALPHA: f64 = 0.0;
pub const DEFAULT_THETA: f64 = 0.0;
pub const DEFAULT_STEP: f64 = 10.0;
pub const DEFAULT_ITERATIONS: u32 = 3;

/// A complete L-System description.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LsParams {
    /// The initial codeword.
    pub axiom: String,

    /// Productions applied simultaneously to every symbol on each iteration.
    pub rules: Rules,

    /// Initial heading, in radians.
    pub alpha: f64,

    /// Heading increment for a single `+` or `-`, in radians.
    pub theta: f64,

    /// Length of a single turtle step.
    pub step: f64,

    /// Number of rewriting rounds.
    pub iterations: u32,
}

impl Default for LsParams {
    fn default() -> Self {
        Self {
            axiom: String::new(),
            rules: Rules::new(),
            alpha: DEFAULT_ALPHA,
            theta: DEFAULT_THETA,
            step: DEFAULT_STEP,
            iterations: DEFAULT_ITERATIONS,
        }
    }
}

impl LsParams {
    /// Creates parameters with the given axiom and the default numeric settings.
    pub fn new(axiom: impl Into<String>) -> Self {
        Self {
            axiom: axiom.into(),
            ..Default::default()
        }
    }

    /// Adds (or replaces) the production for `letter` (builder pattern).
    pub fn with_rule(mut self, letter: impl Into<String>, body: impl Into<String>) -> Self {
        self.rules.insert(letter.into(), body.into());
        self
    }

    /// Checks every field; see [`validator::validate_params`].
    pub fn validate(&self) -> Result<(), ParamErrors> {
        validator::validate_params(self)
    }
}

/// A numeric parameter as it arrives from an untyped source.
///
/// Anything that is not a number (a string such as `"1.57"`, `null`, a bool)
/// lands in [`ParamValue::Other`] and is rejected by the validator.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParamValue {
    Number(f64),
    Other(serde_json::Value),
}

impl ParamValue {
    /// Returns the number if this value holds one. Non-finite numbers are returned as-is.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            ParamValue::Number(n) => Some(*n),
            ParamValue::Other(_) => None,
        }
    }
}

impl From<f64> for ParamValue {
    fn from(value: f64) -> Self {
        ParamValue::Number(value)
    }
}

impl From<u32> for ParamValue {
    fn from(value: u32) -> Self {
        ParamValue::Number(f64::from(value))
    }
}

impl From<&str> for ParamValue {
    fn from(value: &str) -> Self {
        ParamValue::Other(serde_json::Value::String(value.to_owned()))
    }
}

/// L-System parameters where only the present fields get validated.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PartialLsParams {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub axiom: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rules: Option<Rules>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alpha: Option<ParamValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub theta: Option<ParamValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub step: Option<ParamValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iterations: Option<ParamValue>,
}

impl From<&LsParams> for PartialLsParams {
    fn from(params: &LsParams) -> Self {
        Self {
            axiom: Some(params.axiom.clone()),
            rules: Some(params.rules.clone()),
            alpha: Some(params.alpha.into()),
            theta: Some(params.theta.into()),
            step: Some(params.step.into()),
            iterations: Some(params.iterations.into()),
        }
    }
}

impl TryFrom<PartialLsParams> for LsParams {
    type Error = LsError;

    /// Validates the present fields and fills the missing ones from [`LsParams::default`].
    ///
    /// An iteration count that doesn't fit in a `u32` is rejected.
    fn try_from(partial: PartialLsParams) -> Result<Self, Self::Error> {
        validator::validate(&partial).map_err(LsError::InvalidParams)?;

        let defaults = LsParams::default();
        let number = |value: Option<ParamValue>, fallback: f64| -> f64 {
            value.as_ref().and_then(ParamValue::as_number).unwrap_or(fallback)
        };
        // Validation guarantees a positive integer here.
        let iterations = match partial.iterations.as_ref().and_then(ParamValue::as_number) {
            None => defaults.iterations,
            Some(n) if n <= f64::from(u32::MAX) => n as u32,
            Some(_) => {
                let mut errors = ParamErrors::new();
                errors.insert(
                    "iterations",
                    ParamError::Message(validator::ITERATIONS_MESSAGE.to_owned()),
                );
                return Err(LsError::InvalidParams(errors));
            }
        };

        Ok(Self {
            axiom: partial.axiom.unwrap_or(defaults.axiom),
            rules: partial.rules.unwrap_or(defaults.rules),
            alpha: number(partial.alpha, defaults.alpha),
            theta: number(partial.theta, defaults.theta),
            step: number(partial.step, defaults.step),
            iterations,
        })
    }
}
