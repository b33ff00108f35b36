//! Path Pattern Parser
//!
//! Recursive descent parser for the binding dialect:
//!
//! ```text
//! union     := path ('|' path)*
//! path      := ('/' | '//')? step ('/' step)*
//! step      := '@' name | name predicate*
//! predicate := '[' test ('and' test)* ']'
//! test      := '@' name ('=' literal)?
//! ```
//!
//! An attribute step may only appear last.

use std::sync::Arc;

use super::element::PathElement;
use super::lexer::{Lexer, Token};
use super::pattern::PathPattern;

/// How a parsed path starts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Start {
    /// Leading `/`
    Absolute,
    /// Leading `//`
    Floating,
    /// No leading slash
    Relative,
}

/// One alternative of a parsed pattern
#[derive(Debug, Clone, PartialEq)]
pub struct PathExpr {
    pub start: Start,
    pub steps: Vec<PathElement>,
}

impl PathExpr {
    /// Turn the parsed path into a pattern; relative paths hang under `parent`
    pub fn anchored(&self, parent: &Arc<PathPattern>) -> PathPattern {
        match self.start {
            Start::Absolute => PathPattern::absolute(self.steps.clone()),
            Start::Floating => PathPattern::floating(self.steps.clone()),
            Start::Relative => PathPattern::under(parent, self.steps.clone()),
        }
    }

    /// Root patterns have no parent; a relative root may sit at any depth
    pub fn detached(&self) -> PathPattern {
        match self.start {
            Start::Absolute => PathPattern::absolute(self.steps.clone()),
            Start::Floating | Start::Relative => PathPattern::floating(self.steps.clone()),
        }
    }

    /// True when the path ends in `@name`
    pub fn selects_attribute(&self) -> bool {
        self.steps.last().map(|s| s.is_attribute()).unwrap_or(false)
    }
}

/// Parsed pattern: one or more alternatives joined by `|`
#[derive(Debug, Clone, PartialEq)]
pub struct PatternExpr {
    pub alternatives: Vec<PathExpr>,
}

/// Pattern parser
pub struct Parser<'a> {
    lexer: Lexer<'a>,
    current: Token,
}

impl<'a> Parser<'a> {
    /// Create a new parser
    pub fn new(input: &'a str) -> Self {
        let mut lexer = Lexer::new(input);
        let current = lexer.next_token();
        Parser { lexer, current }
    }

    /// Parse the whole input
    pub fn parse(&mut self) -> Result<PatternExpr, String> {
        let mut alternatives = vec![self.parse_path()?];

        while matches!(self.current, Token::Pipe) {
            self.advance();
            alternatives.push(self.parse_path()?);
        }

        if !matches!(self.current, Token::Eof) {
            return Err(self.unexpected("end of pattern"));
        }

        Ok(PatternExpr { alternatives })
    }

    fn advance(&mut self) {
        self.current = self.lexer.next_token();
    }

    fn unexpected(&self, expected: &str) -> String {
        match &self.current {
            Token::Unterminated => "Unterminated string literal".to_string(),
            Token::Invalid(c) => format!("Unsupported character '{}' at {}", c, self.lexer.position()),
            Token::Eof => format!("Expected {}, got end of pattern", expected),
            other => format!("Expected {}, got {:?}", expected, other),
        }
    }

    /// Parse one `|`-separated path
    fn parse_path(&mut self) -> Result<PathExpr, String> {
        let start = match self.current {
            Token::Slash => {
                self.advance();
                Start::Absolute
            }
            Token::DoubleSlash => {
                self.advance();
                Start::Floating
            }
            _ => Start::Relative,
        };

        let mut steps = vec![self.parse_step()?];

        loop {
            match self.current {
                Token::Slash => {
                    if steps.last().map(|s| s.is_attribute()).unwrap_or(false) {
                        return Err("Attribute step must be the last step".to_string());
                    }
                    self.advance();
                    steps.push(self.parse_step()?);
                }
                Token::DoubleSlash => {
                    return Err("'//' is only supported at the start of a pattern".to_string());
                }
                _ => break,
            }
        }

        Ok(PathExpr { start, steps })
    }

    /// Parse a location step
    fn parse_step(&mut self) -> Result<PathElement, String> {
        if matches!(self.current, Token::At) {
            self.advance();
            let name = self.expect_name("attribute name")?;
            return Ok(PathElement::attribute(name));
        }

        let name = self.expect_name("element name")?;
        let mut element = PathElement::element(name);

        while matches!(self.current, Token::LeftBracket) {
            self.advance();
            element = self.parse_predicate(element)?;
            while matches!(self.current, Token::And) {
                self.advance();
                element = self.parse_predicate(element)?;
            }
            if !matches!(self.current, Token::RightBracket) {
                return Err(self.unexpected("]"));
            }
            self.advance();
        }

        Ok(element)
    }

    /// Parse `@key` or `@key=value` and attach it to `element`
    fn parse_predicate(&mut self, element: PathElement) -> Result<PathElement, String> {
        if !matches!(self.current, Token::At) {
            return Err(self.unexpected("@attribute in predicate"));
        }
        self.advance();
        let key = self.expect_name("attribute name")?;

        if !matches!(self.current, Token::Eq) {
            return Ok(element.with_required(key));
        }
        self.advance();

        let value = match &self.current {
            Token::String(s) | Token::Number(s) | Token::Name(s) => s.clone(),
            _ => return Err(self.unexpected("predicate value")),
        };
        self.advance();
        Ok(element.with_predicate(key, value))
    }

    fn expect_name(&mut self, what: &str) -> Result<String, String> {
        match &self.current {
            Token::Name(name) => {
                let name = name.clone();
                self.advance();
                Ok(name)
            }
            // `and` is a legal element name outside predicates
            Token::And => {
                self.advance();
                Ok("and".to_string())
            }
            _ => Err(self.unexpected(what)),
        }
    }
}

/// Parse a pattern string
pub fn parse(input: &str) -> Result<PatternExpr, String> {
    Parser::new(input).parse()
}
