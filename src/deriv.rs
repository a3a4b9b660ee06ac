//! Best-effort symbolic differentiation, with a numeric fallback.
//!
//! The symbolic pass only understands sums of a restricted term family:
//! numeric constants, `a*x^n` and `a*sin(b*x)` / `a*cos(b*x)`, where the
//! coefficients and the `*` are optional and names match either casing.
//! Signs count as part of a term only when glued to a leading numeric
//! coefficient, so `-x` or `-sin(x)` are not recognized. Any unrecognized
//! term abandons the whole attempt and the caller falls back to
//! [`numeric_derivative`].

use super::*;
use expr::{lex, normalize, Token};

/// Default step width for [`numeric_derivative`].
pub const DEFAULT_STEP: f64 = 1e-4;

/// Differentiate `expr` term by term, returning the derivative as a new
/// expression string.
///
/// `None` means the expression is outside the recognized term family (or not
/// lexable at all). A sum in which every term differentiates to zero comes
/// back as `"0"`.
pub fn differentiate(expr: &str) -> Option<String> {
    let tokens = lex(normalize(expr)).ok()?;
    if tokens.is_empty() {
        return None;
    }

    let mut terms = Vec::new();
    for piece in split_terms(&tokens) {
        // stray sign tokens between terms carry nothing to differentiate
        if piece.is_empty() || matches!(piece, [Token::Plus] | [Token::Minus]) {
            continue;
        }
        terms.push(classify(piece)?);
    }
    if terms.is_empty() {
        return None;
    }

    let rendered = terms.into_iter().filter_map(render).collect::<Vec<_>>();
    if rendered.is_empty() {
        return Some("0".to_string());
    }
    Some(rendered.join(" + ").replace("+ -", "- "))
}

/// Central difference derivative estimate, accurate to order `h²` on smooth
/// functions.
pub fn numeric_derivative(f: impl Fn(f64) -> f64, x: f64, h: f64) -> f64 {
    (f(x + h) - f(x - h)) / (2.0 * h)
}

/// One recognized additive term.
#[derive(Debug, Clone, Copy, PartialEq)]
enum Term {
    /// A bare numeric literal.
    Constant,
    /// `a*x^n`.
    Poly { coef: f64, exp: f64 },
    /// `a*sin(b*x)`.
    Sin { a: f64, b: f64 },
    /// `a*cos(b*x)`.
    Cos { a: f64, b: f64 },
}

/// Split at `+`/`-` tokens sitting at parenthesis depth zero, keeping each
/// sign at the head of the piece it introduces. A sign directly after `^`
/// belongs to the exponent and never splits.
fn split_terms(tokens: &[Token]) -> Vec<&[Token]> {
    let mut pieces = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;
    for (i, tok) in tokens.iter().enumerate() {
        match tok {
            Token::LParen => depth += 1,
            Token::RParen => depth = depth.saturating_sub(1),
            Token::Plus | Token::Minus if depth == 0 => {
                if i == 0 || tokens[i - 1] != Token::Caret {
                    pieces.push(&tokens[start..i]);
                    start = i;
                }
            }
            _ => {}
        }
    }
    pieces.push(&tokens[start..]);
    pieces
}

fn classify(piece: &[Token]) -> Option<Term> {
    let mut i = 0;

    // a sign is only recognized glued to a leading numeric coefficient
    let signed = matches!(piece.first(), Some(Token::Plus | Token::Minus));
    let sign = if matches!(piece.first(), Some(Token::Minus)) {
        -1.0
    } else {
        1.0
    };
    if signed {
        i += 1;
    }
    let coef = match piece.get(i) {
        Some(Token::Number(v)) => {
            i += 1;
            Some(sign * v)
        }
        _ if signed => return None,
        _ => None,
    };

    if coef.is_some() && i == piece.len() {
        return Some(Term::Constant);
    }

    if matches!(piece.get(i), Some(Token::Star)) {
        i += 1;
    }

    match piece.get(i) {
        Some(Token::Ident(name)) if name.eq_ignore_ascii_case("x") => {
            i += 1;
            let exp = if matches!(piece.get(i), Some(Token::Caret)) {
                i += 1;
                let esign = match piece.get(i) {
                    Some(Token::Plus) => {
                        i += 1;
                        1.0
                    }
                    Some(Token::Minus) => {
                        i += 1;
                        -1.0
                    }
                    _ => 1.0,
                };
                match piece.get(i) {
                    // integer exponents only
                    Some(Token::Number(v)) if v.fract() == 0.0 => {
                        i += 1;
                        esign * v
                    }
                    _ => return None,
                }
            } else {
                1.0
            };
            (i == piece.len()).then_some(Term::Poly {
                coef: coef.unwrap_or(1.0),
                exp,
            })
        }
        Some(Token::Ident(name))
            if name.eq_ignore_ascii_case("sin") || name.eq_ignore_ascii_case("cos") =>
        {
            let is_cos = name.eq_ignore_ascii_case("cos");
            i += 1;
            if !matches!(piece.get(i), Some(Token::LParen)) {
                return None;
            }
            i += 1;

            let inner_signed = matches!(piece.get(i), Some(Token::Plus | Token::Minus));
            let inner_sign = if matches!(piece.get(i), Some(Token::Minus)) {
                -1.0
            } else {
                1.0
            };
            if inner_signed {
                i += 1;
            }
            let b = match piece.get(i) {
                Some(Token::Number(v)) => {
                    i += 1;
                    Some(inner_sign * v)
                }
                _ if inner_signed => return None,
                _ => None,
            };
            if matches!(piece.get(i), Some(Token::Star)) {
                i += 1;
            }
            match piece.get(i) {
                Some(Token::Ident(n)) if n.eq_ignore_ascii_case("x") => i += 1,
                _ => return None,
            }
            if !matches!(piece.get(i), Some(Token::RParen)) {
                return None;
            }
            i += 1;

            let a = coef.unwrap_or(1.0);
            let b = b.unwrap_or(1.0);
            (i == piece.len()).then_some(if is_cos {
                Term::Cos { a, b }
            } else {
                Term::Sin { a, b }
            })
        }
        _ => None,
    }
}

/// Differentiate one term. `None` for terms with derivative zero, which drop
/// out of the rendered sum.
fn render(term: Term) -> Option<String> {
    match term {
        Term::Constant => None,
        Term::Poly { coef, exp } => {
            let c = coef * exp;
            let p = exp - 1.0;
            Some(if p == 0.0 {
                format!("{c}")
            } else if p == 1.0 {
                format!("{c}*x")
            } else {
                format!("{c}*x^{p}")
            })
        }
        Term::Sin { a, b } => Some(format!("{}*cos({b}*x)", a * b)),
        Term::Cos { a, b } => Some(format!("{}*sin({b}*x)", -(a * b))),
    }
}
