//! Small Go expression and statement builder.
//!
//! Synthesizers compose [`Expr`] values instead of concatenating strings, so
//! parenthesization and negation are decided in one place.

use std::fmt::{self, Write as _};

/// Binary operators the synthesizers need.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum BinOp {
    Or,
    And,
    Eq,
    Ne,
}

impl BinOp {
    fn precedence(self) -> u8 {
        match self {
            BinOp::Or => 1,
            BinOp::And => 2,
            BinOp::Eq | BinOp::Ne => 3,
        }
    }

    fn as_str(self) -> &'static str {
        match self {
            BinOp::Or => "||",
            BinOp::And => "&&",
            BinOp::Eq => "==",
            BinOp::Ne => "!=",
        }
    }
}

const UNARY: u8 = 5;
const PRIMARY: u8 = 6;

#[derive(Clone, PartialEq, Eq, Debug)]
pub enum Expr {
    /// Identifier, possibly package-qualified (`fmt.Sprintf`).
    Ident(String),
    /// Pre-rendered primary expression (literals).
    Raw(String),
    Deref(Box<Expr>),
    Not(Box<Expr>),
    Selector(Box<Expr>, String),
    Index(Box<Expr>, Box<Expr>),
    Call(Box<Expr>, Vec<Expr>),
    Binary(Box<Expr>, BinOp, Box<Expr>),
}

impl Expr {
    pub fn ident(name: impl Into<String>) -> Self {
        Expr::Ident(name.into())
    }

    pub fn raw(text: impl Into<String>) -> Self {
        Expr::Raw(text.into())
    }

    /// Go string literal.
    pub fn string(value: &str) -> Self {
        Expr::Raw(quote(value))
    }

    pub fn nil() -> Self {
        Expr::raw("nil")
    }

    pub fn call(callee: impl Into<String>, args: Vec<Expr>) -> Self {
        Expr::Call(Box::new(Expr::ident(callee)), args)
    }

    pub fn deref(self) -> Self {
        Expr::Deref(Box::new(self))
    }

    pub fn field(self, name: impl Into<String>) -> Self {
        Expr::Selector(Box::new(self), name.into())
    }

    pub fn index(self, index: Expr) -> Self {
        Expr::Index(Box::new(self), Box::new(index))
    }

    pub fn method(self, name: impl Into<String>, args: Vec<Expr>) -> Self {
        Expr::Call(Box::new(self.field(name)), args)
    }

    pub fn eq(self, rhs: Expr) -> Self {
        Expr::binary(self, BinOp::Eq, rhs)
    }

    pub fn ne(self, rhs: Expr) -> Self {
        Expr::binary(self, BinOp::Ne, rhs)
    }

    pub fn and(self, rhs: Expr) -> Self {
        Expr::binary(self, BinOp::And, rhs)
    }

    pub fn or(self, rhs: Expr) -> Self {
        Expr::binary(self, BinOp::Or, rhs)
    }

    fn binary(lhs: Expr, op: BinOp, rhs: Expr) -> Self {
        Expr::Binary(Box::new(lhs), op, Box::new(rhs))
    }

    /// Logical negation; flips comparisons and removes double negation.
    pub fn negate(self) -> Self {
        match self {
            Expr::Binary(lhs, BinOp::Eq, rhs) => Expr::Binary(lhs, BinOp::Ne, rhs),
            Expr::Binary(lhs, BinOp::Ne, rhs) => Expr::Binary(lhs, BinOp::Eq, rhs),
            Expr::Not(inner) => *inner,
            other => Expr::Not(Box::new(other)),
        }
    }

    fn precedence(&self) -> u8 {
        match self {
            Expr::Binary(_, op, _) => op.precedence(),
            Expr::Deref(_) | Expr::Not(_) => UNARY,
            Expr::Ident(_)
            | Expr::Raw(_)
            | Expr::Selector(..)
            | Expr::Index(..)
            | Expr::Call(..) => PRIMARY,
        }
    }

    /// Render as the operand of `op`, parenthesized when needed.
    pub fn operand_of(&self, op: BinOp) -> String {
        Operand(self, op.precedence()).to_string()
    }
}

struct Operand<'a>(&'a Expr, u8);

impl fmt::Display for Operand<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Operand(expr, min) = *self;
        if expr.precedence() < min {
            write!(f, "({expr})")
        } else {
            write!(f, "{expr}")
        }
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Ident(text) | Expr::Raw(text) => f.write_str(text),
            Expr::Deref(inner) => write!(f, "*{}", Operand(inner, UNARY)),
            Expr::Not(inner) => write!(f, "!{}", Operand(inner, UNARY)),
            Expr::Selector(base, name) => write!(f, "{}.{name}", Operand(base, PRIMARY)),
            Expr::Index(base, index) => write!(f, "{}[{index}]", Operand(base, PRIMARY)),
            Expr::Call(callee, args) => {
                write!(f, "{}(", Operand(callee, PRIMARY))?;
                for (i, arg) in args.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{arg}")?;
                }
                f.write_str(")")
            }
            Expr::Binary(lhs, op, rhs) => {
                let prec = op.precedence();
                write!(
                    f,
                    "{} {} {}",
                    Operand(lhs, prec),
                    op.as_str(),
                    Operand(rhs, prec + 1)
                )
            }
        }
    }
}

/// Go interpreted string literal.
pub fn quote(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('"');
    for c in value.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c.is_control() => {
                let _ = write!(out, "\\u{:04x}", c as u32);
            }
            c => out.push(c),
        }
    }
    out.push('"');
    out
}

/// Tab-indented line buffer for Go statements.
#[derive(Debug, Default)]
pub struct Code {
    buf: String,
    depth: usize,
}

impl Code {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn line(&mut self, text: impl fmt::Display) -> &mut Self {
        for _ in 0..self.depth {
            self.buf.push('\t');
        }
        let _ = writeln!(self.buf, "{text}");
        self
    }

    pub fn comment(&mut self, text: impl fmt::Display) -> &mut Self {
        self.line(format_args!("// {text}"))
    }

    /// Emit `header {` and indent until the matching [`Code::close`].
    pub fn open(&mut self, header: impl fmt::Display) -> &mut Self {
        self.line(format_args!("{header} {{"));
        self.depth += 1;
        self
    }

    pub fn close(&mut self) -> &mut Self {
        self.depth = self.depth.saturating_sub(1);
        self.line("}")
    }

    /// `header { ... }` with the body produced by `body`.
    pub fn block(&mut self, header: impl fmt::Display, body: impl FnOnce(&mut Code)) -> &mut Self {
        self.open(header);
        body(self);
        self.close()
    }

    /// Lines one level deeper, without braces (expression continuations).
    pub fn indented(&mut self, body: impl FnOnce(&mut Code)) -> &mut Self {
        self.depth += 1;
        body(self);
        self.depth = self.depth.saturating_sub(1);
        self
    }

    /// The buffered text, without the final newline.
    pub fn finish(mut self) -> String {
        if self.buf.ends_with('\n') {
            self.buf.pop();
        }
        self.buf
    }
}
