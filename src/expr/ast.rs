//! The expression tree and its evaluator.
//!
//! The language is closed: the only names that exist are the variable `x`,
//! the constants in [`MathConst`] and the functions in [`Func`]. Name and
//! arity checking happens at parse time, so evaluation is total. Division by
//! zero, out-of-domain arguments and overflow follow IEEE 754 and surface as
//! non-finite values, which callers treat as data.

/// A parsed expression.
#[derive(Debug, Clone, PartialEq)]
pub enum Ast {
    /// A numeric literal.
    Num(f64),
    /// The variable `x`.
    X,
    /// A named constant.
    Const(MathConst),
    /// Unary negation.
    Neg(Box<Ast>),
    /// A binary operation.
    Binary(BinOp, Box<Ast>, Box<Ast>),
    /// A call to a built-in function.
    Call(Func, Vec<Ast>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinOp {
    Add,
    Sub,
    Mul,
    Div,
    Rem,
    Pow,
}

/// Named constants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MathConst {
    Pi,
    E,
}

impl MathConst {
    /// Resolve a name. `pi` is accepted in any casing, `e` only in lowercase.
    pub fn from_name(name: &str) -> Option<Self> {
        if name.eq_ignore_ascii_case("pi") {
            Some(MathConst::Pi)
        } else if name == "e" {
            Some(MathConst::E)
        } else {
            None
        }
    }

    pub fn value(self) -> f64 {
        match self {
            MathConst::Pi => std::f64::consts::PI,
            MathConst::E => std::f64::consts::E,
        }
    }
}

/// The callable functions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Func {
    Sin,
    Cos,
    Tan,
    Exp,
    Log,
    Sqrt,
    Abs,
    Min,
    Max,
    Pow,
}

impl Func {
    pub const ALL: [Func; 10] = [
        Func::Sin,
        Func::Cos,
        Func::Tan,
        Func::Exp,
        Func::Log,
        Func::Sqrt,
        Func::Abs,
        Func::Min,
        Func::Max,
        Func::Pow,
    ];

    pub fn from_name(name: &str) -> Option<Self> {
        Func::ALL.iter().copied().find(|f| f.name() == name)
    }

    pub fn name(self) -> &'static str {
        match self {
            Func::Sin => "sin",
            Func::Cos => "cos",
            Func::Tan => "tan",
            Func::Exp => "exp",
            Func::Log => "log",
            Func::Sqrt => "sqrt",
            Func::Abs => "abs",
            Func::Min => "min",
            Func::Max => "max",
            Func::Pow => "pow",
        }
    }

    pub(crate) fn arity_ok(self, n: usize) -> bool {
        match self {
            Func::Min | Func::Max => n >= 2,
            Func::Pow => n == 2,
            _ => n == 1,
        }
    }

    pub(crate) fn arity_label(self) -> &'static str {
        match self {
            Func::Min | Func::Max => "at least two arguments",
            Func::Pow => "two arguments",
            _ => "one argument",
        }
    }

    fn apply(self, args: &[f64]) -> f64 {
        match (self, args) {
            (Func::Sin, [v]) => v.sin(),
            (Func::Cos, [v]) => v.cos(),
            (Func::Tan, [v]) => v.tan(),
            (Func::Exp, [v]) => v.exp(),
            // log is the natural logarithm
            (Func::Log, [v]) => v.ln(),
            (Func::Sqrt, [v]) => v.sqrt(),
            (Func::Abs, [v]) => v.abs(),
            (Func::Pow, [a, b]) => a.powf(*b),
            (Func::Min, vs) => fold_nan(vs, f64::INFINITY, f64::min),
            (Func::Max, vs) => fold_nan(vs, f64::NEG_INFINITY, f64::max),
            // arity is enforced at parse time
            _ => f64::NAN,
        }
    }
}

// min/max over any NaN argument is NaN, unlike f64::min/f64::max which
// silently skip it.
fn fold_nan(vs: &[f64], init: f64, f: fn(f64, f64) -> f64) -> f64 {
    if vs.iter().any(|v| v.is_nan()) {
        f64::NAN
    } else {
        vs.iter().copied().fold(init, f)
    }
}

impl Ast {
    /// Evaluate at `x`.
    pub fn eval(&self, x: f64) -> f64 {
        match self {
            Ast::Num(v) => *v,
            Ast::X => x,
            Ast::Const(c) => c.value(),
            Ast::Neg(inner) => -inner.eval(x),
            Ast::Binary(op, lhs, rhs) => {
                let (a, b) = (lhs.eval(x), rhs.eval(x));
                match op {
                    BinOp::Add => a + b,
                    BinOp::Sub => a - b,
                    BinOp::Mul => a * b,
                    BinOp::Div => a / b,
                    BinOp::Rem => a % b,
                    BinOp::Pow => a.powf(b),
                }
            }
            Ast::Call(func, args) => {
                let vals = args.iter().map(|a| a.eval(x)).collect::<Vec<_>>();
                func.apply(&vals)
            }
        }
    }
}
