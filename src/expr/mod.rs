//! Mathematical expression parsing and evaluation.

use super::*;

mod ast;
mod parse;

pub use ast::{Ast, BinOp, Func, MathConst};
pub(crate) use parse::{lex, Token};

/// A compiled, immediately evaluable function of `x`.
#[derive(Debug, Clone)]
pub struct Compiled {
    ast: Ast,
}

impl Compiled {
    /// Evaluate at `x`.
    ///
    /// Never fails. Division by zero, out-of-domain arguments and overflow
    /// surface as infinities or NaN.
    pub fn eval(&self, x: f64) -> f64 {
        self.ast.eval(x)
    }
}

/// Compile `expr` into an evaluable function of `x`.
///
/// A leading `f(x) =` or `f =` definition prefix is accepted and stripped
/// before parsing.
pub fn compile(expr: &str) -> Result<Compiled> {
    let body = normalize(expr);
    let ast = parse::parse(body).wrap_err_with(|| format!("parsing '{expr}' failed"))?;
    Ok(Compiled { ast })
}

/// Strip an optional `f(x) =` or `f =` definition prefix, then surrounding
/// whitespace. `f` and `x` match either casing and may be spaced apart.
pub(crate) fn normalize(expr: &str) -> &str {
    let s = expr.trim();
    let s = strip_fx_prefix(s).unwrap_or(s);
    strip_f_prefix(s).unwrap_or(s)
}

fn strip_fx_prefix(s: &str) -> Option<&str> {
    let rest = strip_ci(s, 'f')?;
    let rest = rest.trim_start().strip_prefix('(')?;
    let rest = strip_ci(rest.trim_start(), 'x')?;
    let rest = rest.trim_start().strip_prefix(')')?;
    let rest = rest.trim_start().strip_prefix('=')?;
    Some(rest.trim_start())
}

fn strip_f_prefix(s: &str) -> Option<&str> {
    let rest = strip_ci(s, 'f')?;
    let rest = rest.trim_start().strip_prefix('=')?;
    Some(rest.trim_start())
}

fn strip_ci(s: &str, c: char) -> Option<&str> {
    let first = s.chars().next()?;
    first
        .eq_ignore_ascii_case(&c)
        .then(|| &s[first.len_utf8()..])
}
