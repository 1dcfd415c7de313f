//! Codeword generation by parallel string rewriting.

use crate::error::LsError;
use crate::params::LsParams;
use crate::validator::validate_params;

/// Productions every grammar starts with. User rules for `F` and `B` replace
/// the empty defaults; the control symbols always rewrite to themselves.
pub const CONTROL_RULES: [(u8, &str); 6] = [
    (b'F', ""),
    (b'B', ""),
    (b'+', "+"),
    (b'-', "-"),
    (b'[', "["),
    (b']', "]"),
];

/// Symbols that influence drawing. Everything else is stripped by [`clean_codeword`].
pub const DRAWING_SYMBOLS: &[u8] = b"FB[]+-";

/// Byte-indexed production table. Symbols without a production rewrite to
/// the empty string, so auxiliary letters with no rule vanish after one round.
struct RuleTable<'a> {
    replacements: [&'a str; 128],
}

impl<'a> RuleTable<'a> {
    fn new(params: &'a LsParams) -> Self {
        let mut replacements = [""; 128];
        for (symbol, body) in CONTROL_RULES {
            replacements[symbol as usize] = body;
        }
        for (letter, body) in &params.rules {
            // Keys are validated to be a single ASCII letter.
            if let [symbol] = letter.as_bytes() {
                if let Some(slot) = replacements.get_mut(*symbol as usize) {
                    *slot = body.as_str();
                }
            }
        }
        Self { replacements }
    }

    fn rewrite(&self, code: &str) -> String {
        let mut next = String::with_capacity(code.len() * 2);
        for byte in code.bytes() {
            if let Some(body) = self.replacements.get(byte as usize) {
                next.push_str(body);
            }
        }
        next
    }
}

/// Validates `params` and rewrites the axiom `iterations` times.
///
/// The result is the raw codeword, auxiliary letters included.
pub fn expand_axiom(params: &LsParams) -> Result<String, LsError> {
    validate_params(params).map_err(LsError::InvalidParams)?;

    let table = RuleTable::new(params);
    let mut code = params.axiom.clone();
    for _ in 0..params.iterations {
        code = table.rewrite(&code);
    }
    Ok(code)
}

/// Validates `params`, expands the axiom and returns the clean codeword.
pub fn generate_codeword(params: &LsParams) -> Result<String, LsError> {
    let raw = expand_axiom(params)?;
    let clean = clean_codeword(&raw);

    #[cfg(feature = "tracing")]
    tracing::debug!(
        iterations = params.iterations,
        raw_len = raw.len(),
        clean_len = clean.len(),
        "generated codeword"
    );

    Ok(clean)
}

/// Strips symbols that don't affect drawing, then repeatedly removes bracket
/// groups holding neither an `F` nor a nested bracket until nothing changes.
///
/// Only matched pairs are removed, so bracket balance is preserved.
pub fn clean_codeword(codeword: &str) -> String {
    let mut bytes: Vec<u8> = codeword
        .bytes()
        .filter(|b| DRAWING_SYMBOLS.contains(b))
        .collect();

    loop {
        let pruned = prune_empty_branches(&bytes);
        if pruned.len() == bytes.len() {
            break;
        }
        bytes = pruned;
    }

    // Only ASCII drawing symbols survive the filter.
    bytes.into_iter().map(char::from).collect()
}

/// One left-to-right pass removing every `[...]` whose content has no `F`, `[` or `]`.
fn prune_empty_branches(bytes: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'[' {
            let close = bytes[i + 1..]
                .iter()
                .position(|b| matches!(b, b'F' | b'[' | b']'))
                .map(|offset| i + 1 + offset);
            if let Some(j) = close.filter(|&j| bytes[j] == b']') {
                i = j + 1;
                continue;
            }
        }
        out.push(bytes[i]);
        i += 1;
    }
    out
}
