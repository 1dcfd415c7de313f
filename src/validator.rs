//! Parameter validation.
//!
//! Every present field is checked independently and all failures are collected,
//! so a caller can show one message per field rather than the first problem only.

use crate::error::{ParamError, ParamErrors};
use crate::params::{LsParams, ParamValue, PartialLsParams, Rules};
use std::collections::BTreeMap;

pub const AXIOM_MESSAGE: &str = "Axiom may only contain the following characters: A..Z,+,-,[,]";
pub const RULE_MESSAGE: &str =
    "Production rules may only contain the following characters: A..Z,+,-,[,]";
pub const LETTER_MESSAGE: &str = "Allowed alphabet letters are: A..Z";
pub const ALPHA_MESSAGE: &str = "The “alpha” parameter must be a finite number";
pub const THETA_MESSAGE: &str = "The “theta” parameter must be a finite number";
pub const STEP_MESSAGE: &str = "The “step” parameter must be a positive finite number";
pub const ITERATIONS_MESSAGE: &str = "The number of iterations must be integer and finite";

/// Symbols allowed in an axiom or a production body.
pub fn is_grammar_symbol(c: char) -> bool {
    c.is_ascii_uppercase() || matches!(c, '+' | '-' | '[' | ']')
}

/// A production key must be exactly one letter `A..Z`.
pub fn check_letter(letter: &str) -> Result<(), &'static str> {
    let mut chars = letter.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) if c.is_ascii_uppercase() => Ok(()),
        _ => Err(LETTER_MESSAGE),
    }
}

/// An empty body is allowed.
pub fn check_rule(rule: &str) -> Result<(), &'static str> {
    if rule.chars().all(is_grammar_symbol) {
        Ok(())
    } else {
        Err(RULE_MESSAGE)
    }
}

pub fn check_axiom(axiom: &str) -> Result<(), &'static str> {
    check_rule(axiom).map_err(|_| AXIOM_MESSAGE)
}

/// Checks every production. A bad key is reported without looking at its body.
pub fn check_rules(rules: &Rules) -> Result<(), BTreeMap<String, String>> {
    let errors: BTreeMap<String, String> = rules
        .iter()
        .filter_map(|(letter, rule)| {
            check_letter(letter)
                .and_then(|_| check_rule(rule))
                .err()
                .map(|message| (letter.clone(), message.to_owned()))
        })
        .collect();

    if errors.is_empty() { Ok(()) } else { Err(errors) }
}

pub fn check_angle(angle: f64, message: &'static str) -> Result<(), &'static str> {
    if angle.is_finite() { Ok(()) } else { Err(message) }
}

pub fn check_step(step: f64) -> Result<(), &'static str> {
    if step.is_finite() && step > 0.0 {
        Ok(())
    } else {
        Err(STEP_MESSAGE)
    }
}

pub fn check_iterations(iterations: f64) -> Result<(), &'static str> {
    if iterations.is_finite() && iterations.fract() == 0.0 && iterations > 0.0 {
        Ok(())
    } else {
        Err(ITERATIONS_MESSAGE)
    }
}

fn numeric(
    value: &ParamValue,
    check: impl Fn(f64) -> Result<(), &'static str>,
    message: &'static str,
) -> Result<(), &'static str> {
    value.as_number().ok_or(message).and_then(check)
}

fn record(errors: &mut ParamErrors, param: &str, result: Result<(), &'static str>) {
    if let Err(message) = result {
        errors.insert(param, ParamError::Message(message.to_owned()));
    }
}

/// Validates the fields present in `params`.
pub fn validate(params: &PartialLsParams) -> Result<(), ParamErrors> {
    let mut errors = ParamErrors::new();

    if let Some(axiom) = &params.axiom {
        record(&mut errors, "axiom", check_axiom(axiom));
    }
    if let Some(rules) = &params.rules {
        if let Err(entries) = check_rules(rules) {
            errors.insert("rules", ParamError::Entries(entries));
        }
    }
    if let Some(alpha) = &params.alpha {
        let result = numeric(alpha, |a| check_angle(a, ALPHA_MESSAGE), ALPHA_MESSAGE);
        record(&mut errors, "alpha", result);
    }
    if let Some(theta) = &params.theta {
        let result = numeric(theta, |t| check_angle(t, THETA_MESSAGE), THETA_MESSAGE);
        record(&mut errors, "theta", result);
    }
    if let Some(step) = &params.step {
        record(&mut errors, "step", numeric(step, check_step, STEP_MESSAGE));
    }
    if let Some(iterations) = &params.iterations {
        let result = numeric(iterations, check_iterations, ITERATIONS_MESSAGE);
        record(&mut errors, "iterations", result);
    }

    errors.into_result()
}

/// Validates a complete parameter set without copying it.
pub fn validate_params(params: &LsParams) -> Result<(), ParamErrors> {
    let mut errors = ParamErrors::new();

    record(&mut errors, "axiom", check_axiom(&params.axiom));
    if let Err(entries) = check_rules(&params.rules) {
        errors.insert("rules", ParamError::Entries(entries));
    }
    record(&mut errors, "alpha", check_angle(params.alpha, ALPHA_MESSAGE));
    record(&mut errors, "theta", check_angle(params.theta, THETA_MESSAGE));
    record(&mut errors, "step", check_step(params.step));
    record(
        &mut errors,
        "iterations",
        check_iterations(f64::from(params.iterations)),
    );

    errors.into_result()
}
