// SPDX-License-Identifier: PMPL-1.0-or-later

//! `Plural-Forms` header parsing and evaluation.
//!
//! The `plural=` expression is the C subset gettext accepts: `n`, unsigned
//! literals, `! * / % + - < <= > >= == != && ||`, `?:` and parentheses.
//! Arithmetic is unsigned and wrapping, as in libintl.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PluralError {
    #[error("Plural-Forms has no nplurals")]
    MissingNplurals,
    #[error("Plural-Forms has an invalid nplurals value: {0}")]
    InvalidNplurals(String),
    #[error("Plural-Forms has no plural expression")]
    MissingPlural,
    #[error("plural expression error at offset {offset}: {message}")]
    Syntax { offset: usize, message: String },
    #[error("plural expression divides by zero for n = {0}")]
    DivisionByZero(u64),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BinOp {
    Mul,
    Div,
    Rem,
    Add,
    Sub,
    Lt,
    Le,
    Gt,
    Ge,
    Eq,
    Ne,
    And,
    Or,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Expr {
    N,
    Num(u64),
    Not(Box<Expr>),
    Binary(BinOp, Box<Expr>, Box<Expr>),
    Cond(Box<Expr>, Box<Expr>, Box<Expr>),
}

impl Expr {
    fn eval(&self, n: u64) -> Result<u64, PluralError> {
        Ok(match self {
            Expr::N => n,
            Expr::Num(v) => *v,
            Expr::Not(e) => (e.eval(n)? == 0) as u64,
            Expr::Cond(c, a, b) => {
                if c.eval(n)? != 0 {
                    a.eval(n)?
                } else {
                    b.eval(n)?
                }
            }
            Expr::Binary(op, l, r) => {
                let a = l.eval(n)?;
                match op {
                    BinOp::And if a == 0 => 0,
                    BinOp::Or if a != 0 => 1,
                    _ => apply(*op, a, r.eval(n)?, n)?,
                }
            }
        })
    }
}

fn apply(op: BinOp, a: u64, b: u64, n: u64) -> Result<u64, PluralError> {
    Ok(match op {
        BinOp::Mul => a.wrapping_mul(b),
        BinOp::Div => a.checked_div(b).ok_or(PluralError::DivisionByZero(n))?,
        BinOp::Rem => a.checked_rem(b).ok_or(PluralError::DivisionByZero(n))?,
        BinOp::Add => a.wrapping_add(b),
        BinOp::Sub => a.wrapping_sub(b),
        BinOp::Lt => (a < b) as u64,
        BinOp::Le => (a <= b) as u64,
        BinOp::Gt => (a > b) as u64,
        BinOp::Ge => (a >= b) as u64,
        BinOp::Eq => (a == b) as u64,
        BinOp::Ne => (a != b) as u64,
        // Left operand already decided the short-circuit case.
        BinOp::And | BinOp::Or => (b != 0) as u64,
    })
}

/// Parsed `Plural-Forms` value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PluralForms {
    pub nplurals: usize,
    /// Expression source text as written in the header.
    pub expression: String,
    ast: Expr,
}

impl PluralForms {
    /// `nplurals=2; plural=(n != 1);`, used when a catalog has no header.
    pub fn germanic() -> Self {
        PluralForms {
            nplurals: 2,
            expression: "(n != 1)".to_string(),
            ast: Expr::Binary(BinOp::Ne, Box::new(Expr::N), Box::new(Expr::Num(1))),
        }
    }

    pub fn parse(value: &str) -> Result<Self, PluralError> {
        let mut nplurals = None;
        let mut expression = None;
        for part in value.split(';') {
            let Some((key, val)) = part.split_once('=') else {
                continue;
            };
            match key.trim() {
                "nplurals" => {
                    let raw = val.trim();
                    let parsed = raw
                        .parse::<usize>()
                        .ok()
                        .filter(|&v| v > 0)
                        .ok_or_else(|| PluralError::InvalidNplurals(raw.to_string()))?;
                    nplurals = Some(parsed);
                }
                "plural" => expression = Some(val.trim().to_string()),
                _ => {}
            }
        }
        let nplurals = nplurals.ok_or(PluralError::MissingNplurals)?;
        let expression = expression
            .filter(|e| !e.is_empty())
            .ok_or(PluralError::MissingPlural)?;
        let ast = ExprParser::new(&expression).parse()?;
        Ok(PluralForms {
            nplurals,
            expression,
            ast,
        })
    }

    /// Raw evaluation of the expression.
    pub fn evaluate(&self, n: u64) -> Result<u64, PluralError> {
        self.ast.eval(n)
    }

    /// msgstr index for `n`; out-of-range results and errors select index 0.
    pub fn index(&self, n: u64) -> usize {
        match self.ast.eval(n) {
            Ok(v) if (v as usize) < self.nplurals => v as usize,
            _ => 0,
        }
    }
}

impl std::fmt::Display for PluralForms {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "nplurals={}; plural={};", self.nplurals, self.expression)
    }
}

struct ExprParser<'a> {
    src: &'a [u8],
    pos: usize,
}

impl<'a> ExprParser<'a> {
    fn new(src: &'a str) -> Self {
        ExprParser {
            src: src.as_bytes(),
            pos: 0,
        }
    }

    fn parse(mut self) -> Result<Expr, PluralError> {
        let expr = self.ternary()?;
        self.skip_ws();
        if self.pos < self.src.len() {
            return Err(self.error("unexpected trailing input"));
        }
        Ok(expr)
    }

    fn error(&self, message: &str) -> PluralError {
        PluralError::Syntax {
            offset: self.pos,
            message: message.to_string(),
        }
    }

    fn skip_ws(&mut self) {
        while self.pos < self.src.len() && self.src[self.pos].is_ascii_whitespace() {
            self.pos += 1;
        }
    }

    fn eat(&mut self, token: &str) -> bool {
        self.skip_ws();
        if self.src[self.pos..].starts_with(token.as_bytes()) {
            self.pos += token.len();
            true
        } else {
            false
        }
    }

    /// Like `eat`, but refuses when the token is a prefix of a longer operator.
    fn eat_op(&mut self, token: &str, not_followed_by: &[u8]) -> bool {
        self.skip_ws();
        let rest = &self.src[self.pos..];
        if rest.starts_with(token.as_bytes()) {
            let next = rest.get(token.len());
            if next.map(|b| not_followed_by.contains(b)).unwrap_or(false) {
                return false;
            }
            self.pos += token.len();
            true
        } else {
            false
        }
    }

    fn ternary(&mut self) -> Result<Expr, PluralError> {
        let cond = self.or()?;
        if self.eat("?") {
            let then = self.ternary()?;
            if !self.eat(":") {
                return Err(self.error("expected ':'"));
            }
            let other = self.ternary()?;
            return Ok(Expr::Cond(Box::new(cond), Box::new(then), Box::new(other)));
        }
        Ok(cond)
    }

    fn or(&mut self) -> Result<Expr, PluralError> {
        let mut left = self.and()?;
        while self.eat("||") {
            let right = self.and()?;
            left = Expr::Binary(BinOp::Or, Box::new(left), Box::new(right));
        }
        Ok(left)
    }

    fn and(&mut self) -> Result<Expr, PluralError> {
        let mut left = self.equality()?;
        while self.eat("&&") {
            let right = self.equality()?;
            left = Expr::Binary(BinOp::And, Box::new(left), Box::new(right));
        }
        Ok(left)
    }

    fn equality(&mut self) -> Result<Expr, PluralError> {
        let mut left = self.relational()?;
        loop {
            let op = if self.eat("==") {
                BinOp::Eq
            } else if self.eat("!=") {
                BinOp::Ne
            } else {
                return Ok(left);
            };
            let right = self.relational()?;
            left = Expr::Binary(op, Box::new(left), Box::new(right));
        }
    }

    fn relational(&mut self) -> Result<Expr, PluralError> {
        let mut left = self.additive()?;
        loop {
            let op = if self.eat("<=") {
                BinOp::Le
            } else if self.eat(">=") {
                BinOp::Ge
            } else if self.eat("<") {
                BinOp::Lt
            } else if self.eat(">") {
                BinOp::Gt
            } else {
                return Ok(left);
            };
            let right = self.additive()?;
            left = Expr::Binary(op, Box::new(left), Box::new(right));
        }
    }

    fn additive(&mut self) -> Result<Expr, PluralError> {
        let mut left = self.multiplicative()?;
        loop {
            let op = if self.eat("+") {
                BinOp::Add
            } else if self.eat("-") {
                BinOp::Sub
            } else {
                return Ok(left);
            };
            let right = self.multiplicative()?;
            left = Expr::Binary(op, Box::new(left), Box::new(right));
        }
    }

    fn multiplicative(&mut self) -> Result<Expr, PluralError> {
        let mut left = self.unary()?;
        loop {
            let op = if self.eat("*") {
                BinOp::Mul
            } else if self.eat("/") {
                BinOp::Div
            } else if self.eat("%") {
                BinOp::Rem
            } else {
                return Ok(left);
            };
            let right = self.unary()?;
            left = Expr::Binary(op, Box::new(left), Box::new(right));
        }
    }

    fn unary(&mut self) -> Result<Expr, PluralError> {
        if self.eat_op("!", b"=") {
            return Ok(Expr::Not(Box::new(self.unary()?)));
        }
        self.primary()
    }

    fn primary(&mut self) -> Result<Expr, PluralError> {
        self.skip_ws();
        if self.eat("(") {
            let inner = self.ternary()?;
            if !self.eat(")") {
                return Err(self.error("expected ')'"));
            }
            return Ok(inner);
        }
        match self.src.get(self.pos) {
            Some(b'n') => {
                self.pos += 1;
                Ok(Expr::N)
            }
            Some(b) if b.is_ascii_digit() => {
                let start = self.pos;
                while self.pos < self.src.len() && self.src[self.pos].is_ascii_digit() {
                    self.pos += 1;
                }
                let digits = std::str::from_utf8(&self.src[start..self.pos])
                    .map_err(|_| self.error("invalid number"))?;
                digits
                    .parse::<u64>()
                    .map(Expr::Num)
                    .map_err(|_| self.error("number out of range"))
            }
            Some(_) => Err(self.error("expected 'n', a number or '('")),
            None => Err(self.error("unexpected end of expression")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn germanic_rule() {
        let forms = PluralForms::parse("nplurals=2; plural=(n != 1);").unwrap();
        assert_eq!(forms, PluralForms::germanic());
        assert_eq!(forms.index(0), 1);
        assert_eq!(forms.index(1), 0);
        assert_eq!(forms.index(5), 1);
    }

    #[test]
    fn french_and_single_form_rules() {
        let fr = PluralForms::parse("nplurals=2; plural=(n > 1);").unwrap();
        assert_eq!(fr.index(0), 0);
        assert_eq!(fr.index(2), 1);
        let ja = PluralForms::parse("nplurals=1; plural=0;").unwrap();
        assert_eq!(ja.index(42), 0);
    }

    #[test]
    fn polish_rule_with_nested_ternary() {
        let pl = PluralForms::parse(
            "nplurals=3; plural=(n==1 ? 0 : n%10>=2 && n%10<=4 && (n%100<10 || n%100>=20) ? 1 : 2);",
        )
        .unwrap();
        assert_eq!(pl.index(1), 0);
        assert_eq!(pl.index(3), 1);
        assert_eq!(pl.index(12), 2);
        assert_eq!(pl.index(22), 1);
        assert_eq!(pl.index(25), 2);
    }

    #[test]
    fn not_and_not_equal_are_distinct() {
        let forms = PluralForms::parse("nplurals=2; plural=!(n != 1);").unwrap();
        assert_eq!(forms.evaluate(1).unwrap(), 1);
        assert_eq!(forms.evaluate(3).unwrap(), 0);
    }

    #[test]
    fn out_of_range_and_division_fall_back_to_zero() {
        let forms = PluralForms::parse("nplurals=2; plural=n;").unwrap();
        assert_eq!(forms.index(7), 0);
        let div = PluralForms::parse("nplurals=2; plural=1/n;").unwrap();
        assert_eq!(div.evaluate(0), Err(PluralError::DivisionByZero(0)));
        assert_eq!(div.index(0), 0);
    }

    #[test]
    fn rejects_malformed_headers() {
        assert_eq!(
            PluralForms::parse("plural=(n != 1);"),
            Err(PluralError::MissingNplurals)
        );
        assert_eq!(
            PluralForms::parse("nplurals=0; plural=0;"),
            Err(PluralError::InvalidNplurals("0".to_string()))
        );
        assert_eq!(
            PluralForms::parse("nplurals=2;"),
            Err(PluralError::MissingPlural)
        );
        assert!(matches!(
            PluralForms::parse("nplurals=2; plural=(n != 1;"),
            Err(PluralError::Syntax { .. })
        ));
        assert!(matches!(
            PluralForms::parse("nplurals=2; plural=n x;"),
            Err(PluralError::Syntax { .. })
        ));
    }
}
