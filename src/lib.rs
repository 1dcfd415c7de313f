//! # lsystem-svg
//!
//! Turns bracketed L-System grammars into SVG path data.
//!
//! The pipeline is strictly linear: [`LsParams`] are validated, the axiom is
//! rewritten into a codeword ([`generate_codeword`]), the codeword is grouped
//! into run-length [`Token`]s ([`tokenize`]), and a [`Turtle`] walks the tokens
//! to produce path data and bounds ([`get_svg_data`],
//! [`get_multi_path_svg_data`]). [`get_svg_code`] and
//! [`get_multi_path_svg_code`] wrap the result into ready-to-render markup.
//!
//! The drawing alphabet is `F` (draw forward), `B` (move forward), `+`/`-`
//! (turn by `theta`), `[`/`]` (save/restore the turtle). Other letters only
//! take part in rewriting.

pub mod error;
pub mod generator;
pub mod interpreter;
pub mod params;
pub mod svg;
pub mod token;
pub mod turtle;
pub mod validator;

pub use error::*;
pub use generator::*;
pub use interpreter::*;
pub use params::*;
pub use svg::*;
pub use token::*;
pub use turtle::*;
pub use validator::{validate, validate_params};
