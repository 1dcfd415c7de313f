// tests/properties.rs
use lsystem_svg::{
    DRAWING_SYMBOLS, LsParams, Token, Turtle, build_multi_path_data, build_path_data,
    clean_codeword, generate_codeword, tokenize,
};
use proptest::prelude::*;

fn is_balanced(codeword: &str) -> bool {
    let mut depth = 0i64;
    for c in codeword.chars() {
        match c {
            '[' => depth += 1,
            ']' => depth -= 1,
            _ => {}
        }
        if depth < 0 {
            return false;
        }
    }
    depth == 0
}

/// Coordinate pairs targeted by line-to commands, sorted.
fn line_targets<'a>(paths: impl IntoIterator<Item = &'a str>) -> Vec<(String, String)> {
    let mut targets = Vec::new();
    for path in paths {
        for subpath in path.split('M') {
            // Everything after the first `L` of a subpath is a list of line targets.
            for lines in subpath.split('L').skip(1) {
                let numbers: Vec<&str> = lines.split(' ').collect();
                for pair in numbers.chunks(2) {
                    targets.push((pair[0].to_owned(), pair[1].to_owned()));
                }
            }
        }
    }
    targets.sort();
    targets
}

/// Production bodies with exactly one matched bracket pair.
fn rule_body() -> impl Strategy<Value = String> {
    ("[ABFX+\\-]{0,4}", "[ABFX+\\-]{0,4}", "[ABFX+\\-]{0,3}")
        .prop_map(|(head, branch, tail)| format!("{head}[{branch}]{tail}"))
}

fn ls_params() -> impl Strategy<Value = LsParams> {
    (
        "[FBX+\\-]{1,5}",
        rule_body(),
        rule_body(),
        -3.0f64..3.0,
        0.1f64..2.0,
        1u32..4,
    )
        .prop_map(|(axiom, f_rule, x_rule, alpha, theta, iterations)| LsParams {
            alpha,
            theta,
            iterations,
            step: 3.0,
            ..LsParams::new(axiom)
                .with_rule("F", f_rule)
                .with_rule("X", x_rule)
        })
}

proptest! {
    #[test]
    fn cleanup_is_idempotent(raw in "[ABFX+\\-\\[\\]]{0,60}") {
        let once = clean_codeword(&raw);
        prop_assert!(once.bytes().all(|b| DRAWING_SYMBOLS.contains(&b)));
        prop_assert_eq!(clean_codeword(&once), once);
    }

    #[test]
    fn tokens_expand_back_to_the_codeword(raw in "[ABFX+\\-\\[\\]]{0,60}") {
        let clean = clean_codeword(&raw);
        let tokens = tokenize(&clean);
        let expanded: String = tokens.iter().map(Token::to_string).collect();
        prop_assert_eq!(expanded, clean);
        for pair in tokens.windows(2) {
            prop_assert_ne!(pair[0].op, pair[1].op);
        }
    }

    #[test]
    fn generated_codewords_are_clean_and_balanced(params in ls_params()) {
        let codeword = generate_codeword(&params).unwrap();
        prop_assert!(codeword.bytes().all(|b| DRAWING_SYMBOLS.contains(&b)));
        prop_assert!(is_balanced(&codeword));
    }

    #[test]
    fn bounds_are_non_negative_and_shared_by_both_modes(params in ls_params()) {
        let tokens = tokenize(&generate_codeword(&params).unwrap());

        let mut single = Turtle::from_params(&params);
        let path = build_path_data(&tokens, &mut single).unwrap();
        let mut multi = Turtle::from_params(&params);
        let paths = build_multi_path_data(&tokens, &mut multi).unwrap();

        let rect = single.drawing_rect();
        prop_assert!(rect.width >= 0.0 && rect.height >= 0.0);
        prop_assert_eq!(rect, multi.drawing_rect());

        let has_lines = tokens.iter().any(|t| t.op == lsystem_svg::TurtleOp::Draw);
        prop_assert_eq!(path.contains('L'), has_lines);
        prop_assert_eq!(paths.is_empty(), !has_lines);
        for data in &paths {
            prop_assert!(data.contains('L'));
        }
    }

    #[test]
    fn both_modes_draw_the_same_segments(params in ls_params()) {
        let tokens = tokenize(&generate_codeword(&params).unwrap());

        let path = build_path_data(&tokens, &mut Turtle::from_params(&params)).unwrap();
        let paths = build_multi_path_data(&tokens, &mut Turtle::from_params(&params)).unwrap();

        let single = line_targets([path.as_str()]);
        let multi = line_targets(paths.iter().map(String::as_str));
        let draws: usize = tokens
            .iter()
            .filter(|t| t.op == lsystem_svg::TurtleOp::Draw)
            .count();
        prop_assert_eq!(single.len(), draws);
        prop_assert_eq!(single, multi);
    }
}
