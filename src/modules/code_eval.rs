use std::path::{Component, Path, PathBuf};

use crate::boundary::RunContext;
use crate::errors::SnareError;
use crate::models::{ModuleOutcome, Signal};

/// Evaluates attacker input with the scoped expression evaluator. The
/// evaluator is deliberately over-capable for a calculator: its `read`
/// builtin hands any expression access to the run's scratch files.
pub async fn run(ctx: &RunContext) -> Result<ModuleOutcome, SnareError> {
    let evaluator = Evaluator::new(ctx.scratch.clone());
    let raw_output = match evaluator.eval(&ctx.input_str()) {
        Ok(value) => value.render(),
        Err(e) => format!("error: {}", e),
    };
    Ok(ModuleOutcome::new(raw_output, Signal::Output))
}

#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Int(i64),
    Str(String),
}

impl Value {
    fn render(&self) -> String {
        match self {
            Value::Int(n) => n.to_string(),
            Value::Str(s) => s.clone(),
        }
    }
}

/// Capability-restricted expression evaluator: integer arithmetic, string
/// literals, and a single `read(path)` builtin confined to the evaluator's
/// root directory. Not the host language's evaluator.
pub struct Evaluator {
    root: PathBuf,
}

impl Evaluator {
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    pub fn eval(&self, src: &str) -> Result<Value, String> {
        let tokens = tokenize(src)?;
        let mut parser = Parser {
            tokens,
            pos: 0,
            evaluator: self,
        };
        let value = parser.expr()?;
        if parser.pos != parser.tokens.len() {
            return Err("trailing input after expression".into());
        }
        Ok(value)
    }

    fn call(&self, name: &str, args: Vec<Value>) -> Result<Value, String> {
        match name {
            "read" => {
                let path = match args.as_slice() {
                    [Value::Str(p)] => p,
                    _ => return Err("read() takes one string argument".into()),
                };
                let resolved = self.confine(path)?;
                std::fs::read_to_string(&resolved)
                    .map(Value::Str)
                    .map_err(|e| format!("read failed: {}", e))
            }
            "len" => match args.as_slice() {
                [Value::Str(s)] => Ok(Value::Int(s.len() as i64)),
                _ => Err("len() takes one string argument".into()),
            },
            _ => Err(format!("unknown function '{}'", name)),
        }
    }

    /// The read capability stops at the evaluator root; expressions cannot
    /// reach the host filesystem.
    fn confine(&self, path: &str) -> Result<PathBuf, String> {
        if Path::new(path).is_absolute() {
            return Err("capability denied: absolute path".into());
        }
        let mut resolved = self.root.clone();
        for component in Path::new(path).components() {
            match component {
                Component::Normal(part) => resolved.push(part),
                Component::CurDir => {}
                _ => return Err("capability denied: path escapes the run scope".into()),
            }
        }
        Ok(resolved)
    }
}

#[derive(Debug, Clone, PartialEq)]
enum Token {
    Int(i64),
    Str(String),
    Ident(String),
    Plus,
    Minus,
    Star,
    Slash,
    LParen,
    RParen,
    Comma,
}

fn tokenize(src: &str) -> Result<Vec<Token>, String> {
    let mut tokens = Vec::new();
    let mut chars = src.chars().peekable();
    while let Some(&c) = chars.peek() {
        match c {
            ' ' | '\t' | '\n' | '\r' => {
                chars.next();
            }
            '0'..='9' => {
                let mut n: i64 = 0;
                while let Some(&d) = chars.peek() {
                    match d.to_digit(10) {
                        Some(digit) => {
                            n = n
                                .checked_mul(10)
                                .and_then(|n| n.checked_add(digit as i64))
                                .ok_or("integer literal overflows")?;
                            chars.next();
                        }
                        None => break,
                    }
                }
                tokens.push(Token::Int(n));
            }
            '"' => {
                chars.next();
                let mut s = String::new();
                loop {
                    match chars.next() {
                        Some('"') => break,
                        Some(c) => s.push(c),
                        None => return Err("unterminated string literal".into()),
                    }
                }
                tokens.push(Token::Str(s));
            }
            'a'..='z' | 'A'..='Z' | '_' => {
                let mut ident = String::new();
                while let Some(&c) = chars.peek() {
                    if c.is_ascii_alphanumeric() || c == '_' {
                        ident.push(c);
                        chars.next();
                    } else {
                        break;
                    }
                }
                tokens.push(Token::Ident(ident));
            }
            '+' => {
                chars.next();
                tokens.push(Token::Plus);
            }
            '-' => {
                chars.next();
                tokens.push(Token::Minus);
            }
            '*' => {
                chars.next();
                tokens.push(Token::Star);
            }
            '/' => {
                chars.next();
                tokens.push(Token::Slash);
            }
            '(' => {
                chars.next();
                tokens.push(Token::LParen);
            }
            ')' => {
                chars.next();
                tokens.push(Token::RParen);
            }
            ',' => {
                chars.next();
                tokens.push(Token::Comma);
            }
            other => return Err(format!("unexpected character '{}'", other)),
        }
    }
    if tokens.is_empty() {
        return Err("empty expression".into());
    }
    Ok(tokens)
}

struct Parser<'a> {
    tokens: Vec<Token>,
    pos: usize,
    evaluator: &'a Evaluator,
}

impl Parser<'_> {
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn next(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.pos).cloned();
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    fn expect(&mut self, token: Token) -> Result<(), String> {
        match self.next() {
            Some(t) if t == token => Ok(()),
            Some(t) => Err(format!("expected {:?}, found {:?}", token, t)),
            None => Err(format!("expected {:?}, found end of input", token)),
        }
    }

    fn expr(&mut self) -> Result<Value, String> {
        let mut left = self.term()?;
        while let Some(op) = self.peek().cloned() {
            match op {
                Token::Plus => {
                    self.pos += 1;
                    let right = self.term()?;
                    left = add(left, right)?;
                }
                Token::Minus => {
                    self.pos += 1;
                    let right = self.term()?;
                    left = arith(left, right, "-", |a, b| a.checked_sub(b))?;
                }
                _ => break,
            }
        }
        Ok(left)
    }

    fn term(&mut self) -> Result<Value, String> {
        let mut left = self.factor()?;
        while let Some(op) = self.peek().cloned() {
            match op {
                Token::Star => {
                    self.pos += 1;
                    let right = self.factor()?;
                    left = arith(left, right, "*", |a, b| a.checked_mul(b))?;
                }
                Token::Slash => {
                    self.pos += 1;
                    let right = self.factor()?;
                    left = arith(left, right, "/", |a, b| {
                        if b == 0 {
                            None
                        } else {
                            a.checked_div(b)
                        }
                    })?;
                }
                _ => break,
            }
        }
        Ok(left)
    }

    fn factor(&mut self) -> Result<Value, String> {
        match self.next() {
            Some(Token::Int(n)) => Ok(Value::Int(n)),
            Some(Token::Str(s)) => Ok(Value::Str(s)),
            Some(Token::Minus) => match self.factor()? {
                Value::Int(n) => Ok(Value::Int(-n)),
                Value::Str(_) => Err("cannot negate a string".into()),
            },
            Some(Token::LParen) => {
                let value = self.expr()?;
                self.expect(Token::RParen)?;
                Ok(value)
            }
            Some(Token::Ident(name)) => {
                self.expect(Token::LParen)?;
                let mut args = Vec::new();
                if self.peek() != Some(&Token::RParen) {
                    loop {
                        args.push(self.expr()?);
                        match self.peek() {
                            Some(Token::Comma) => {
                                self.pos += 1;
                            }
                            _ => break,
                        }
                    }
                }
                self.expect(Token::RParen)?;
                self.evaluator.call(&name, args)
            }
            Some(t) => Err(format!("unexpected token {:?}", t)),
            None => Err("unexpected end of input".into()),
        }
    }
}

fn add(left: Value, right: Value) -> Result<Value, String> {
    match (left, right) {
        (Value::Int(a), Value::Int(b)) => a
            .checked_add(b)
            .map(Value::Int)
            .ok_or_else(|| "arithmetic overflow".into()),
        (Value::Str(a), Value::Str(b)) => Ok(Value::Str(format!("{}{}", a, b))),
        _ => Err("'+' operands must both be integers or both strings".into()),
    }
}

fn arith(
    left: Value,
    right: Value,
    op: &str,
    f: impl Fn(i64, i64) -> Option<i64>,
) -> Result<Value, String> {
    match (left, right) {
        (Value::Int(a), Value::Int(b)) => f(a, b)
            .map(Value::Int)
            .ok_or_else(|| format!("'{}' failed on {} and {}", op, a, b)),
        _ => Err(format!("'{}' operands must be integers", op)),
    }
}
