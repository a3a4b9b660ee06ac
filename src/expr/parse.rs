use super::*;
use simsearch::SimSearch;

/// Nesting limit for parentheses, signs and exponent chains.
const MAX_DEPTH: usize = 256;

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Token {
    Number(f64),
    Ident(String),
    Plus,
    Minus,
    Star,
    Slash,
    Percent,
    Caret,
    LParen,
    RParen,
    Comma,
}

impl Token {
    pub(crate) fn describe(&self) -> String {
        match self {
            Token::Number(v) => format!("'{v}'"),
            Token::Ident(s) => format!("'{s}'"),
            Token::Plus => "'+'".into(),
            Token::Minus => "'-'".into(),
            Token::Star => "'*'".into(),
            Token::Slash => "'/'".into(),
            Token::Percent => "'%'".into(),
            Token::Caret => "'^'".into(),
            Token::LParen => "'('".into(),
            Token::RParen => "')'".into(),
            Token::Comma => "','".into(),
        }
    }
}

/// Lex into tokens. Numbers take the forms `12`, `1.5`, `.5`, `5.` and
/// `1e-3`. Whitespace separates tokens and is otherwise ignored.
pub(crate) fn lex(src: &str) -> Result<Vec<Token>> {
    let b = src.as_bytes();
    let mut tokens = Vec::new();
    let mut i = 0;
    while i < b.len() {
        match b[i] {
            c if c.is_ascii_whitespace() => i += 1,
            b'+' => {
                tokens.push(Token::Plus);
                i += 1;
            }
            b'-' => {
                tokens.push(Token::Minus);
                i += 1;
            }
            b'*' => {
                tokens.push(Token::Star);
                i += 1;
            }
            b'/' => {
                tokens.push(Token::Slash);
                i += 1;
            }
            b'%' => {
                tokens.push(Token::Percent);
                i += 1;
            }
            b'^' => {
                tokens.push(Token::Caret);
                i += 1;
            }
            b'(' => {
                tokens.push(Token::LParen);
                i += 1;
            }
            b')' => {
                tokens.push(Token::RParen);
                i += 1;
            }
            b',' => {
                tokens.push(Token::Comma);
                i += 1;
            }
            b'0'..=b'9' | b'.' => {
                let start = i;
                while i < b.len() && b[i].is_ascii_digit() {
                    i += 1;
                }
                if i < b.len() && b[i] == b'.' {
                    i += 1;
                    while i < b.len() && b[i].is_ascii_digit() {
                        i += 1;
                    }
                }
                // exponent suffix only counts when at least one digit follows
                if i < b.len() && (b[i] == b'e' || b[i] == b'E') {
                    let mut j = i + 1;
                    if j < b.len() && (b[j] == b'+' || b[j] == b'-') {
                        j += 1;
                    }
                    if j < b.len() && b[j].is_ascii_digit() {
                        i = j + 1;
                        while i < b.len() && b[i].is_ascii_digit() {
                            i += 1;
                        }
                    }
                }
                let text = &src[start..i];
                let num = text
                    .parse()
                    .map_err(|_| miette!("invalid number '{text}'"))?;
                tokens.push(Token::Number(num));
            }
            c if c.is_ascii_alphabetic() || c == b'_' => {
                let start = i;
                while i < b.len() && (b[i].is_ascii_alphanumeric() || b[i] == b'_') {
                    i += 1;
                }
                tokens.push(Token::Ident(src[start..i].to_string()));
            }
            _ => {
                let c = src[i..].chars().next().expect("lexer is on a char boundary");
                return Err(miette!("unexpected character '{c}'"));
            }
        }
    }
    Ok(tokens)
}

pub(crate) fn parse(src: &str) -> Result<Ast> {
    let tokens = lex(src)?;
    ensure!(!tokens.is_empty(), "empty expression");
    let mut parser = Parser {
        tokens: &tokens,
        pos: 0,
    };
    let ast = parser.expr(0)?;
    if let Some(tok) = parser.peek() {
        return Err(miette!("unexpected {} after the expression", tok.describe()));
    }
    Ok(ast)
}

struct Parser<'a> {
    tokens: &'a [Token],
    pos: usize,
}

impl Parser<'_> {
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn advance(&mut self) {
        self.pos += 1;
    }

    fn eat(&mut self, tok: &Token) -> bool {
        if self.peek() == Some(tok) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn expr(&mut self, depth: usize) -> Result<Ast> {
        ensure!(depth < MAX_DEPTH, "expression is nested too deeply");
        let mut lhs = self.term(depth)?;
        loop {
            let op = match self.peek() {
                Some(Token::Plus) => BinOp::Add,
                Some(Token::Minus) => BinOp::Sub,
                _ => break,
            };
            self.advance();
            let rhs = self.term(depth)?;
            lhs = Ast::Binary(op, Box::new(lhs), Box::new(rhs));
        }
        Ok(lhs)
    }

    fn term(&mut self, depth: usize) -> Result<Ast> {
        let mut lhs = self.factor(depth)?;
        loop {
            let op = match self.peek() {
                Some(Token::Star) => BinOp::Mul,
                Some(Token::Slash) => BinOp::Div,
                Some(Token::Percent) => BinOp::Rem,
                _ => break,
            };
            self.advance();
            let rhs = self.factor(depth)?;
            lhs = Ast::Binary(op, Box::new(lhs), Box::new(rhs));
        }
        Ok(lhs)
    }

    /// Unary sign. Binds looser than `^`, so `-x^2` is `-(x^2)`.
    fn factor(&mut self, depth: usize) -> Result<Ast> {
        ensure!(depth < MAX_DEPTH, "expression is nested too deeply");
        match self.peek() {
            Some(Token::Minus) => {
                self.advance();
                Ok(Ast::Neg(Box::new(self.factor(depth + 1)?)))
            }
            Some(Token::Plus) => {
                self.advance();
                self.factor(depth + 1)
            }
            _ => self.power(depth),
        }
    }

    /// `^` is right associative and its exponent may carry a sign.
    fn power(&mut self, depth: usize) -> Result<Ast> {
        let base = self.atom(depth)?;
        if self.eat(&Token::Caret) {
            let exponent = self.factor(depth + 1)?;
            Ok(Ast::Binary(BinOp::Pow, Box::new(base), Box::new(exponent)))
        } else {
            Ok(base)
        }
    }

    fn atom(&mut self, depth: usize) -> Result<Ast> {
        let tok = self
            .peek()
            .cloned()
            .ok_or_else(|| miette!("unexpected end of expression"))?;
        match tok {
            Token::Number(v) => {
                self.advance();
                Ok(Ast::Num(v))
            }
            Token::LParen => {
                self.advance();
                let inner = self.expr(depth + 1)?;
                ensure!(self.eat(&Token::RParen), "missing closing ')'");
                Ok(inner)
            }
            Token::Ident(name) => {
                self.advance();
                if self.eat(&Token::LParen) {
                    let func =
                        Func::from_name(&name).ok_or_else(|| unknown_name("function", &name))?;
                    let args = self.arguments(depth)?;
                    ensure!(
                        func.arity_ok(args.len()),
                        "function '{}' expects {}, got {}",
                        func.name(),
                        func.arity_label(),
                        args.len()
                    );
                    Ok(Ast::Call(func, args))
                } else if name == "x" {
                    Ok(Ast::X)
                } else if let Some(c) = MathConst::from_name(&name) {
                    Ok(Ast::Const(c))
                } else if Func::from_name(&name).is_some() {
                    Err(miette!("function '{name}' needs an argument list"))
                } else {
                    Err(unknown_name("identifier", &name))
                }
            }
            other => Err(miette!("unexpected {}", other.describe())),
        }
    }

    fn arguments(&mut self, depth: usize) -> Result<Vec<Ast>> {
        let mut args = Vec::new();
        if self.eat(&Token::RParen) {
            return Ok(args);
        }
        loop {
            args.push(self.expr(depth + 1)?);
            if self.eat(&Token::Comma) {
                continue;
            }
            if self.eat(&Token::RParen) {
                break;
            }
            return match self.peek() {
                Some(tok) => Err(miette!("expected ',' or ')', found {}", tok.describe())),
                None => Err(miette!("missing closing ')'")),
            };
        }
        Ok(args)
    }
}

fn unknown_name(kind: &str, name: &str) -> Report {
    let mut msg = format!("unknown {kind} '{name}'");
    if let Some(sugg) = suggest(name) {
        msg.push_str(&format!(" (did you mean '{sugg}'?)"));
    }
    miette!("{msg}")
}

/// Fuzzy-match `name` against everything nameable in an expression.
fn suggest(name: &str) -> Option<&'static str> {
    let vocab: Vec<&'static str> = Func::ALL
        .iter()
        .map(|f| f.name())
        .chain(["pi", "e", "x"])
        .collect();
    let mut s = SimSearch::new();
    for (i, word) in vocab.iter().enumerate() {
        s.insert(i, word);
    }
    s.search(&name.to_ascii_lowercase())
        .first()
        .map(|&i| vocab[i])
}
