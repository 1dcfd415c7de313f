//! Run-length tokens of a clean codeword.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Operations the drawing turtle understands.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub enum TurtleOp {
    /// Move forward and draw a line (`F`).
    Draw,
    /// Move forward without drawing (`B`).
    Move,
    /// Rotate by `theta` times the sign (`+` is `1.0`, `-` is `-1.0`).
    Turn(f64),
    /// Save the turtle state (`[`).
    Push,
    /// Restore the most recently saved state (`]`).
    Pop,
}

impl TurtleOp {
    /// Maps a codeword symbol to its operation. Symbols outside `FB+-[]` have none.
    pub fn from_symbol(symbol: char) -> Option<Self> {
        match symbol {
            'F' => Some(TurtleOp::Draw),
            'B' => Some(TurtleOp::Move),
            '+' => Some(TurtleOp::Turn(1.0)),
            '-' => Some(TurtleOp::Turn(-1.0)),
            '[' => Some(TurtleOp::Push),
            ']' => Some(TurtleOp::Pop),
            _ => None,
        }
    }

    pub fn symbol(self) -> char {
        match self {
            TurtleOp::Draw => 'F',
            TurtleOp::Move => 'B',
            TurtleOp::Turn(sign) if sign < 0.0 => '-',
            TurtleOp::Turn(_) => '+',
            TurtleOp::Push => '[',
            TurtleOp::Pop => ']',
        }
    }
}

/// A maximal run of one repeated symbol.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Token {
    pub op: TurtleOp,
    pub count: usize,
}

impl Token {
    pub fn new(op: TurtleOp, count: usize) -> Self {
        Self { op, count }
    }
}

/// Expands back to the run it was built from.
impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let symbol = self.op.symbol();
        for _ in 0..self.count {
            write!(f, "{symbol}")?;
        }
        Ok(())
    }
}

/// Groups consecutive identical drawing symbols into tokens.
///
/// Characters outside the drawing alphabet end the current run and are skipped.
pub fn tokenize(codeword: &str) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut run: Option<(char, Token)> = None;

    for symbol in codeword.chars() {
        let Some(op) = TurtleOp::from_symbol(symbol) else {
            tokens.extend(run.take().map(|(_, token)| token));
            continue;
        };
        match &mut run {
            Some((current, token)) if *current == symbol => token.count += 1,
            _ => tokens.extend(
                run.replace((symbol, Token::new(op, 1)))
                    .map(|(_, token)| token),
            ),
        }
    }
    if let Some((_, token)) = run {
        tokens.push(token);
    }

    tokens
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_codeword_has_no_tokens() {
        assert!(tokenize("").is_empty());
    }

    #[test]
    fn groups_runs() {
        let tokens = tokenize("FF[[+F]]-B");
        assert_eq!(
            tokens,
            vec![
                Token::new(TurtleOp::Draw, 2),
                Token::new(TurtleOp::Push, 2),
                Token::new(TurtleOp::Turn(1.0), 1),
                Token::new(TurtleOp::Draw, 1),
                Token::new(TurtleOp::Pop, 2),
                Token::new(TurtleOp::Turn(-1.0), 1),
                Token::new(TurtleOp::Move, 1),
            ]
        );
    }

    #[test]
    fn foreign_symbols_split_runs() {
        let tokens = tokenize("FXF");
        assert_eq!(
            tokens,
            vec![Token::new(TurtleOp::Draw, 1), Token::new(TurtleOp::Draw, 1)]
        );
    }

    #[test]
    fn display_expands_run() {
        assert_eq!(Token::new(TurtleOp::Turn(-1.0), 3).to_string(), "---");
    }
}
