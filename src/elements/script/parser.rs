//! Handler script parser: a small statement and expression grammar.
//!
//! ```text
//! script     := statement (';' statement)* ';'?
//! statement  := expr ('=' expr)?
//! expr       := or ('?' expr ':' expr)?
//! or         := and ('||' and)*
//! and        := equality ('&&' equality)*
//! equality   := additive (('==' | '!=') additive)*
//! additive   := unary (('+' | '-') unary)*
//! unary      := ('!' | '-') unary | postfix
//! postfix    := primary ('.' ident | '[' expr ']' | '(' args ')')*
//! primary    := number | string | ident | '(' expr ')' | object | array
//! ```

use serde_json::Value;

use super::tokenizer::{lex, unescape, Lexeme, Token};
use super::ScriptError;

// ---------------------------------------------------------------------------
// AST
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    Not,
    Neg,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Add,
    Sub,
    Eq,
    NotEq,
    And,
    Or,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Literal(Value),
    Ident(String),
    Member(Box<Expr>, String),
    Index(Box<Expr>, Box<Expr>),
    Call(Box<Expr>, Vec<Expr>),
    Object(Vec<(String, Expr)>),
    Array(Vec<Expr>),
    Unary(UnaryOp, Box<Expr>),
    Binary(BinaryOp, Box<Expr>, Box<Expr>),
    Conditional(Box<Expr>, Box<Expr>, Box<Expr>),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Stmt {
    Expr(Expr),
    Assign(Expr, Expr),
}

/// Parse a whole handler body.
pub fn parse(source: &str) -> Result<Vec<Stmt>, ScriptError> {
    let lexemes = lex(source)?;
    let mut parser = Parser { lexemes, pos: 0 };
    parser.script()
}

/// Build a number value, integral when possible.
pub fn number(value: f64) -> Value {
    if value.fract() == 0.0 && value.is_finite() && value.abs() < 9.0e15 {
        Value::from(value as i64)
    } else {
        serde_json::Number::from_f64(value)
            .map(Value::Number)
            .unwrap_or(Value::Null)
    }
}

// ---------------------------------------------------------------------------
// Parser
// ---------------------------------------------------------------------------

struct Parser {
    lexemes: Vec<Lexeme>,
    pos: usize,
}

impl Parser {
    fn peek(&self) -> Option<Token> {
        self.lexemes.get(self.pos).map(|l| l.token)
    }

    fn eat(&mut self, token: Token) -> bool {
        if self.peek() == Some(token) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn advance(&mut self, context: &'static str) -> Result<Lexeme, ScriptError> {
        let lexeme = self
            .lexemes
            .get(self.pos)
            .cloned()
            .ok_or(ScriptError::UnexpectedEnd(context))?;
        self.pos += 1;
        Ok(lexeme)
    }

    fn expect(&mut self, token: Token, context: &'static str) -> Result<Lexeme, ScriptError> {
        let lexeme = self.advance(context)?;
        if lexeme.token == token {
            Ok(lexeme)
        } else {
            Err(unexpected(&lexeme))
        }
    }

    fn script(&mut self) -> Result<Vec<Stmt>, ScriptError> {
        let mut stmts = Vec::new();
        loop {
            while self.eat(Token::Semi) {}
            if self.peek().is_none() {
                break;
            }
            stmts.push(self.statement()?);
            match self.peek() {
                None => break,
                Some(Token::Semi) => {}
                Some(_) => return Err(unexpected(&self.advance("statement")?)),
            }
        }
        Ok(stmts)
    }

    fn statement(&mut self) -> Result<Stmt, ScriptError> {
        let target = self.expr()?;
        if !self.eat(Token::Assign) {
            return Ok(Stmt::Expr(target));
        }
        if !matches!(target, Expr::Member(..) | Expr::Index(..)) {
            return Err(ScriptError::InvalidAssignment);
        }
        let value = self.expr()?;
        Ok(Stmt::Assign(target, value))
    }

    fn expr(&mut self) -> Result<Expr, ScriptError> {
        let cond = self.binary_or()?;
        if !self.eat(Token::Question) {
            return Ok(cond);
        }
        let then = self.expr()?;
        self.expect(Token::Colon, "conditional")?;
        let otherwise = self.expr()?;
        Ok(Expr::Conditional(
            Box::new(cond),
            Box::new(then),
            Box::new(otherwise),
        ))
    }

    fn binary_or(&mut self) -> Result<Expr, ScriptError> {
        let mut lhs = self.binary_and()?;
        while self.eat(Token::Or) {
            let rhs = self.binary_and()?;
            lhs = Expr::Binary(BinaryOp::Or, Box::new(lhs), Box::new(rhs));
        }
        Ok(lhs)
    }

    fn binary_and(&mut self) -> Result<Expr, ScriptError> {
        let mut lhs = self.equality()?;
        while self.eat(Token::And) {
            let rhs = self.equality()?;
            lhs = Expr::Binary(BinaryOp::And, Box::new(lhs), Box::new(rhs));
        }
        Ok(lhs)
    }

    fn equality(&mut self) -> Result<Expr, ScriptError> {
        let mut lhs = self.additive()?;
        loop {
            let op = match self.peek() {
                Some(Token::Eq) => BinaryOp::Eq,
                Some(Token::NotEq) => BinaryOp::NotEq,
                _ => return Ok(lhs),
            };
            self.pos += 1;
            let rhs = self.additive()?;
            lhs = Expr::Binary(op, Box::new(lhs), Box::new(rhs));
        }
    }

    fn additive(&mut self) -> Result<Expr, ScriptError> {
        let mut lhs = self.unary()?;
        loop {
            let op = match self.peek() {
                Some(Token::Plus) => BinaryOp::Add,
                Some(Token::Minus) => BinaryOp::Sub,
                _ => return Ok(lhs),
            };
            self.pos += 1;
            let rhs = self.unary()?;
            lhs = Expr::Binary(op, Box::new(lhs), Box::new(rhs));
        }
    }

    fn unary(&mut self) -> Result<Expr, ScriptError> {
        if self.eat(Token::Bang) {
            return Ok(Expr::Unary(UnaryOp::Not, Box::new(self.unary()?)));
        }
        if self.eat(Token::Minus) {
            return Ok(Expr::Unary(UnaryOp::Neg, Box::new(self.unary()?)));
        }
        self.postfix()
    }

    fn postfix(&mut self) -> Result<Expr, ScriptError> {
        let mut expr = self.primary()?;
        loop {
            match self.peek() {
                Some(Token::Dot) => {
                    self.pos += 1;
                    let name = self.expect(Token::Ident, "member name")?;
                    expr = Expr::Member(Box::new(expr), name.text);
                }
                Some(Token::BracketOpen) => {
                    self.pos += 1;
                    let index = self.expr()?;
                    self.expect(Token::BracketClose, "index")?;
                    expr = Expr::Index(Box::new(expr), Box::new(index));
                }
                Some(Token::ParenOpen) => {
                    self.pos += 1;
                    let args = self.list(Token::ParenClose, "arguments", Self::expr)?;
                    expr = Expr::Call(Box::new(expr), args);
                }
                _ => return Ok(expr),
            }
        }
    }

    fn primary(&mut self) -> Result<Expr, ScriptError> {
        let lexeme = self.advance("expression")?;
        match lexeme.token {
            Token::Number => lexeme
                .text
                .parse::<f64>()
                .map(|n| Expr::Literal(number(n)))
                .map_err(|_| unexpected(&lexeme)),
            Token::Str => Ok(Expr::Literal(Value::String(unescape(&lexeme.text)))),
            Token::Ident => Ok(match lexeme.text.as_str() {
                "true" => Expr::Literal(Value::Bool(true)),
                "false" => Expr::Literal(Value::Bool(false)),
                "null" | "undefined" => Expr::Literal(Value::Null),
                _ => Expr::Ident(lexeme.text),
            }),
            Token::ParenOpen => {
                let inner = self.expr()?;
                self.expect(Token::ParenClose, "parenthesized expression")?;
                Ok(inner)
            }
            Token::BracketOpen => Ok(Expr::Array(self.list(
                Token::BracketClose,
                "array literal",
                Self::expr,
            )?)),
            Token::BraceOpen => Ok(Expr::Object(self.list(
                Token::BraceClose,
                "object literal",
                Self::property,
            )?)),
            _ => Err(unexpected(&lexeme)),
        }
    }

    fn property(&mut self) -> Result<(String, Expr), ScriptError> {
        let key = self.advance("property name")?;
        let name = match key.token {
            Token::Ident => key.text,
            Token::Str => unescape(&key.text),
            Token::Number => key.text,
            _ => return Err(unexpected(&key)),
        };
        self.expect(Token::Colon, "property")?;
        Ok((name, self.expr()?))
    }

    /// Comma-separated items up to `close`, allowing a trailing comma.
    fn list<T>(
        &mut self,
        close: Token,
        context: &'static str,
        mut item: impl FnMut(&mut Self) -> Result<T, ScriptError>,
    ) -> Result<Vec<T>, ScriptError> {
        let mut items = Vec::new();
        loop {
            if self.eat(close) {
                return Ok(items);
            }
            items.push(item(self)?);
            if self.eat(close) {
                return Ok(items);
            }
            self.expect(Token::Comma, context)?;
        }
    }
}

fn unexpected(lexeme: &Lexeme) -> ScriptError {
    ScriptError::UnexpectedToken {
        offset: lexeme.offset,
        found: lexeme.text.clone(),
    }
}

// ===========================================================================
// Tests
// ===========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn ident(name: &str) -> Box<Expr> {
        Box::new(Expr::Ident(name.into()))
    }

    #[test]
    fn member_assignment() {
        let stmts = parse("el.textContent = 'x'").unwrap();
        assert_eq!(
            stmts,
            vec![Stmt::Assign(
                Expr::Member(ident("el"), "textContent".into()),
                Expr::Literal(json!("x")),
            )]
        );
    }

    #[test]
    fn several_statements() {
        let stmts = parse("event.preventDefault(); uizy.emit('a.b', {id: 1});;").unwrap();
        assert_eq!(stmts.len(), 2);
        assert!(matches!(&stmts[1], Stmt::Expr(Expr::Call(_, args)) if args.len() == 2));
    }

    #[test]
    fn precedence() {
        let stmts = parse("a || b && c == 1 + 2").unwrap();
        let Stmt::Expr(Expr::Binary(BinaryOp::Or, _, rhs)) = &stmts[0] else {
            panic!("expected ||");
        };
        assert!(matches!(**rhs, Expr::Binary(BinaryOp::And, _, _)));
    }

    #[test]
    fn object_and_array_literals() {
        let stmts = parse(r#"x({"a": [1, 'two',], b: null,})"#).unwrap();
        let Stmt::Expr(Expr::Call(_, args)) = &stmts[0] else {
            panic!("expected call");
        };
        let Expr::Object(props) = &args[0] else {
            panic!("expected object");
        };
        assert_eq!(props[0].0, "a");
        assert_eq!(props[1], ("b".into(), Expr::Literal(Value::Null)));
    }

    #[test]
    fn numbers_are_integral_when_possible() {
        assert_eq!(number(2.0), json!(2));
        assert_eq!(number(2.5), json!(2.5));
    }

    #[test]
    fn rejects_bad_targets() {
        assert_eq!(parse("1 = 2"), Err(ScriptError::InvalidAssignment));
        assert_eq!(parse("foo() = 2"), Err(ScriptError::InvalidAssignment));
    }

    #[test]
    fn reports_unexpected_tokens() {
        assert!(matches!(
            parse("el.textContent 'x'"),
            Err(ScriptError::UnexpectedToken { .. })
        ));
        assert_eq!(
            parse("el.setAttribute('a',"),
            Err(ScriptError::UnexpectedEnd("expression"))
        );
    }
}
