//! Interpreter that walks a tokenized codeword with a [`Turtle`] and produces SVG path data.
//!
//! Two output shapes are supported:
//!
//! - [`build_path_data`] emits everything into one `d` attribute.
//! - [`build_multi_path_data`] keeps one `d` attribute per branch level, so each
//!   nesting depth can be styled separately.
//!
//! The [`get_svg_data`] and [`get_multi_path_svg_data`] entry points run the
//! whole pipeline from [`LsParams`].

use crate::error::LsError;
use crate::generator::generate_codeword;
use crate::params::LsParams;
use crate::token::{Token, TurtleOp, tokenize};
use crate::turtle::{DrawingRect, Turtle};
use glam::DVec2;
use serde::{Deserialize, Serialize};

/// A single path command with an absolute target.
#[derive(Clone, Copy, Debug, PartialEq)]
enum PathCommand {
    MoveTo(DVec2),
    LineTo(DVec2),
}

/// Path data under construction.
#[derive(Clone, Debug, Default)]
struct PathBuffer {
    commands: Vec<PathCommand>,
}

impl PathBuffer {
    fn starting_at(position: DVec2) -> Self {
        Self {
            commands: vec![PathCommand::MoveTo(position)],
        }
    }

    fn move_to(&mut self, position: DVec2) {
        self.commands.push(PathCommand::MoveTo(position));
    }

    /// A move right after another move replaces it; SVG would read the second
    /// coordinate pair of a moveto as an implicit lineto.
    fn jump_to(&mut self, position: DVec2) {
        if let Some(PathCommand::MoveTo(_)) = self.commands.last() {
            self.commands.pop();
        }
        self.move_to(position);
    }

    fn line_to(&mut self, position: DVec2) {
        self.commands.push(PathCommand::LineTo(position));
    }

    fn has_lines(&self) -> bool {
        self.commands
            .iter()
            .any(|cmd| matches!(cmd, PathCommand::LineTo(_)))
    }

    /// Serializes the buffer, dropping every move that is followed by another
    /// move or ends the path. Consecutive line segments share one `L`.
    fn finish(&self) -> String {
        let mut data = String::new();
        let mut prev_line = false;

        for (i, cmd) in self.commands.iter().enumerate() {
            match *cmd {
                PathCommand::MoveTo(p) => {
                    let dead = !matches!(self.commands.get(i + 1), Some(PathCommand::LineTo(_)));
                    if dead {
                        continue;
                    }
                    data.push('M');
                    data.push_str(&format_point(p));
                    prev_line = false;
                }
                PathCommand::LineTo(p) => {
                    data.push(if prev_line { ' ' } else { 'L' });
                    data.push_str(&format_point(p));
                    prev_line = true;
                }
            }
        }
        data
    }
}

/// Rounds to four decimals and drops insignificant zeros; `-0` prints as `0`.
///
/// Exact halfway values round away from zero rather than to even.
pub fn format_coordinate(value: f64) -> String {
    let fixed = if is_exact_half_ten_thousandth(value) {
        let magnitude = (value.abs() * 10_000.0).ceil() / 10_000.0;
        let sign = if value < 0.0 { "-" } else { "" };
        format!("{sign}{magnitude:.4}")
    } else {
        format!("{value:.4}")
    };
    let trimmed = if fixed.contains('.') {
        fixed.trim_end_matches('0').trim_end_matches('.')
    } else {
        fixed.as_str()
    };
    match trimmed {
        "-0" => "0".to_owned(),
        s => s.to_owned(),
    }
}

/// Whether `value * 10^4` lies exactly halfway between two integers.
///
/// That holds iff `value * 20000 = value * 625 * 2^5` is an odd integer, i.e.
/// `value = m * 2^-5` with `m` odd.
fn is_exact_half_ten_thousandth(value: f64) -> bool {
    if !value.is_finite() {
        return false;
    }
    let bits = value.to_bits();
    let biased = ((bits >> 52) & 0x7ff) as i32;
    let fraction = bits & ((1u64 << 52) - 1);
    let (mantissa, exponent) = if biased == 0 {
        (fraction, -1074)
    } else {
        (fraction | (1u64 << 52), biased - 1075)
    };
    if mantissa == 0 {
        return false;
    }
    exponent + mantissa.trailing_zeros() as i32 == -5
}

fn format_point(p: DVec2) -> String {
    format!("{} {}", format_coordinate(p.x), format_coordinate(p.y))
}

/// Builds one path `d` attribute from `tokens`.
///
/// Every `]` starts a new subpath at the restored position. Moves that lead
/// nowhere are removed from the result, so a codeword without `F` yields an
/// empty string.
pub fn build_path_data(tokens: &[Token], turtle: &mut Turtle) -> Result<String, LsError> {
    let mut path = PathBuffer::starting_at(turtle.position);

    for token in tokens {
        let count = token.count;
        match token.op {
            TurtleOp::Draw => {
                turtle.translate(count);
                path.line_to(turtle.position);
            }
            TurtleOp::Move => {
                turtle.translate(count);
                path.jump_to(turtle.position);
            }
            TurtleOp::Turn(sign) => turtle.rotate(sign * count as f64),
            TurtleOp::Push => turtle.push_stack(count),
            TurtleOp::Pop => {
                turtle.pop_stack(count)?;
                path.move_to(turtle.position);
            }
        }
    }

    Ok(path.finish())
}

/// Builds one `d` attribute per branch level from `tokens`.
///
/// The branch level starts at 0 and follows the bracket runs. Entering or
/// returning to a level opens a new subpath in that level's data at the
/// current position. Levels without a single line segment are left out, so
/// the result is ordered by level but not indexed by it.
pub fn build_multi_path_data(
    tokens: &[Token],
    turtle: &mut Turtle,
) -> Result<Vec<String>, LsError> {
    let mut levels = vec![PathBuffer::starting_at(turtle.position)];
    let mut level = 0usize;

    for token in tokens {
        let count = token.count;
        match token.op {
            TurtleOp::Draw => {
                turtle.translate(count);
                levels[level].line_to(turtle.position);
            }
            TurtleOp::Move => {
                turtle.translate(count);
                levels[level].jump_to(turtle.position);
            }
            TurtleOp::Turn(sign) => turtle.rotate(sign * count as f64),
            TurtleOp::Push => {
                turtle.push_stack(count);
                level += count;
                if levels.len() <= level {
                    levels.resize_with(level + 1, PathBuffer::default);
                }
                levels[level].move_to(turtle.position);
            }
            TurtleOp::Pop => {
                turtle.pop_stack(count)?;
                // The stack holds one entry per open level.
                level = level.saturating_sub(count);
                levels[level].move_to(turtle.position);
            }
        }
    }

    let paths: Vec<String> = levels
        .iter()
        .filter(|buffer| buffer.has_lines())
        .map(PathBuffer::finish)
        .collect();

    #[cfg(feature = "tracing")]
    tracing::debug!(
        tokens = tokens.len(),
        levels = levels.len(),
        paths = paths.len(),
        "built multi-path data"
    );

    Ok(paths)
}

/// Single-path data plus the natural bounds of the drawing.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SvgData {
    pub path_data: String,
    #[serde(flatten)]
    pub rect: DrawingRect,
}

/// Per-level path data plus the natural bounds of the drawing.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MultiPathSvgData {
    pub multi_path_data: Vec<String>,
    #[serde(flatten)]
    pub rect: DrawingRect,
}

/// Generates the codeword for `params` and interprets it as a single path.
pub fn get_svg_data(params: &LsParams) -> Result<SvgData, LsError> {
    let codeword = generate_codeword(params)?;
    let tokens = tokenize(&codeword);
    let mut turtle = Turtle::from_params(params);
    let path_data = build_path_data(&tokens, &mut turtle)?;

    #[cfg(feature = "tracing")]
    tracing::debug!(
        tokens = tokens.len(),
        path_len = path_data.len(),
        "built path data"
    );

    Ok(SvgData {
        path_data,
        rect: turtle.drawing_rect(),
    })
}

/// Generates the codeword for `params` and interprets it as one path per branch level.
pub fn get_multi_path_svg_data(params: &LsParams) -> Result<MultiPathSvgData, LsError> {
    let codeword = generate_codeword(params)?;
    let tokens = tokenize(&codeword);
    let mut turtle = Turtle::from_params(params);
    let multi_path_data = build_multi_path_data(&tokens, &mut turtle)?;

    Ok(MultiPathSvgData {
        multi_path_data,
        rect: turtle.drawing_rect(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn turtle() -> Turtle {
        // Step 1 heading right, quarter turns.
        Turtle::new(DVec2::ZERO, 1.0, 0.0, std::f64::consts::FRAC_PI_2)
    }

    fn single(codeword: &str) -> String {
        build_path_data(&tokenize(codeword), &mut turtle()).unwrap()
    }

    fn multi(codeword: &str) -> Vec<String> {
        build_multi_path_data(&tokenize(codeword), &mut turtle()).unwrap()
    }

    #[test]
    fn coordinates_drop_trailing_zeros() {
        assert_eq!(format_coordinate(1.0), "1");
        assert_eq!(format_coordinate(1.5), "1.5");
        assert_eq!(format_coordinate(2.123456), "2.1235");
        assert_eq!(format_coordinate(-0.00001), "0");
        assert_eq!(format_coordinate(-3.25), "-3.25");
        assert_eq!(format_coordinate(100.0), "100");
        assert_eq!(format_coordinate(0.03125), "0.0313");
        assert_eq!(format_coordinate(-0.03125), "-0.0313");
        assert_eq!(format_coordinate(1.09375), "1.0938");
        assert_eq!(format_coordinate(0.09375), "0.0938");
        assert_eq!(format_coordinate(0.5), "0.5");
    }

    #[test]
    fn consecutive_lines_share_one_command() {
        assert_eq!(single("F+F"), "M0 0L1 0 1 1");
    }

    #[test]
    fn halfway_steps_round_up_in_path_data() {
        let mut turtle = Turtle::new(DVec2::ZERO, 0.03125, 0.0, 0.0);
        let path = build_path_data(&tokenize("F"), &mut turtle).unwrap();
        assert_eq!(path, "M0 0L0.0313 0");
    }

    #[test]
    fn run_of_f_is_one_segment() {
        assert_eq!(single("FFF"), "M0 0L3 0");
    }

    #[test]
    fn move_replaces_preceding_move() {
        assert_eq!(single("BBFB+B"), "M2 0L3 0");
        assert_eq!(single("FBF"), "M0 0L1 0M2 0L3 0");
    }

    #[test]
    fn branch_return_starts_subpath() {
        assert_eq!(single("F[+F]F"), "M0 0L1 0 1 1M1 0L2 0");
    }

    #[test]
    fn no_lines_means_empty_path() {
        assert_eq!(single(""), "");
        assert_eq!(single("B+B"), "");
    }

    #[test]
    fn multi_path_splits_by_level() {
        assert_eq!(
            multi("F[+F[-F]]F"),
            vec!["M0 0L1 0M1 0L2 0", "M1 0L1 1", "M1 1L2 1"]
        );
    }

    #[test]
    fn multi_path_drops_levels_without_lines() {
        // Level 1 only moves, level 2 is skipped by the double push, level 3 draws.
        assert_eq!(multi("F[B[[F]]]"), vec!["M0 0L1 0", "M2 0L3 0"]);
    }

    #[test]
    fn unbalanced_pop_is_reported() {
        let err = build_path_data(&tokenize("F]"), &mut turtle()).unwrap_err();
        assert_eq!(
            err,
            LsError::UnbalancedBranch {
                requested: 1,
                available: 0
            }
        );
        assert!(build_multi_path_data(&tokenize("[F]]"), &mut turtle()).is_err());
    }
}
