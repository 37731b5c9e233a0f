//! Requirement grammar parser for the supported ecosystems
//!
//! This module provides:
//! - A span-preserving lexer
//! - Per-ecosystem grammars (OR/AND separators, bare and tilde meaning)
//! - A recursive-descent parser producing OR branches of constraints
//! - Satisfaction checks against a `Version`
//!
//! ```text
//! requirement := branch (OR branch)*
//! branch      := constraint (AND? constraint)*
//! constraint  := operator? version ( '-' version | 'as' version )?
//! ```

mod constraint;
mod grammar;
mod lexer;

pub use constraint::{
    increment_at, Branch, Constraint, Operator, OperatorClass, ParsedRequirement, Segment,
    VersionPattern, VersionToken,
};
pub use grammar::{
    is_url_like, is_version_requirement, BareVersion, Grammar, OrStyle, PartialExact,
    TildeFlavor,
};
pub use lexer::{tokenize, Token, TokenKind};

use crate::error::ParseError;

/// Parse `input` under `grammar`
pub fn parse_requirement(input: &str, grammar: &Grammar) -> Result<ParsedRequirement, ParseError> {
    if input.trim().is_empty() {
        return Err(ParseError::Empty);
    }
    Parser::new(input, grammar).parse()
}

struct Parser<'a> {
    input: &'a str,
    grammar: &'a Grammar,
    tokens: Vec<Token>,
    pos: usize,
}

impl<'a> Parser<'a> {
    fn new(input: &'a str, grammar: &'a Grammar) -> Self {
        Self {
            input,
            grammar,
            tokens: tokenize(input, grammar),
            pos: 0,
        }
    }

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

    fn unexpected(&self, token: &Token) -> ParseError {
        ParseError::UnexpectedToken {
            input: self.input.to_string(),
            token: token.text(self.input).to_string(),
            offset: token.span.start,
        }
    }

    fn unsupported(&self, separator: &str) -> ParseError {
        ParseError::UnsupportedSeparator {
            input: self.input.to_string(),
            separator: separator.to_string(),
            ecosystem: self.grammar.ecosystem,
        }
    }

    fn parse(mut self) -> Result<ParsedRequirement, ParseError> {
        let mut branches = vec![self.branch()?];
        let mut separators = Vec::new();

        while let Some(token) = self.next() {
            let text = token.text(self.input);
            match token.kind {
                TokenKind::Pipe | TokenKind::Or => {
                    if !self.grammar.accepts_or(text) {
                        return Err(self.unsupported(text));
                    }
                }
                _ => return Err(self.unexpected(&token)),
            }

            let branch = self.branch()?;
            let previous_end = branches.last().map_or(0, |b: &Branch| b.span.end);
            separators.push(self.input[previous_end..branch.span.start].to_string());
            branches.push(branch);
        }

        Ok(ParsedRequirement {
            input: self.input.to_string(),
            branches,
            separators,
        })
    }

    fn branch(&mut self) -> Result<Branch, ParseError> {
        let first = self.constraint()?;
        let start = first.span.start;
        let mut constraints = vec![first];
        let mut joiners = Vec::new();

        while let Some(token) = self.peek().cloned() {
            let text = token.text(self.input);
            match token.kind {
                TokenKind::Pipe | TokenKind::Or => break,
                TokenKind::Comma => {
                    if !self.grammar.comma_and {
                        return Err(self.unsupported(text));
                    }
                    self.pos += 1;
                }
                TokenKind::And => {
                    self.pos += 1;
                }
                TokenKind::Operator(_) | TokenKind::Word => {
                    if !self.grammar.whitespace_and {
                        return Err(self.unsupported(" "));
                    }
                }
                TokenKind::Hyphen | TokenKind::As => return Err(self.unexpected(&token)),
            }

            let constraint = self.constraint()?;
            let previous_end = constraints.last().map_or(start, |c: &Constraint| c.span.end);
            joiners.push(self.input[previous_end..constraint.span.start].to_string());
            constraints.push(constraint);
        }

        let end = constraints.last().map_or(start, |c| c.span.end);
        Ok(Branch {
            constraints,
            joiners,
            span: start..end,
        })
    }

    fn constraint(&mut self) -> Result<Constraint, ParseError> {
        let start = self.peek().map_or(self.input.len(), |t| t.span.start);

        let operator = match self.peek() {
            Some(Token {
                kind: TokenKind::Operator(op),
                ..
            }) => {
                let op = *op;
                self.pos += 1;
                Some(op)
            }
            _ => None,
        };

        let version = self.version_word()?;
        let mut end = version.span.end;

        let mut upper = None;
        let mut alias = None;
        match self.peek().map(|t| t.kind) {
            Some(TokenKind::Hyphen) if self.grammar.hyphen_ranges && operator.is_none() => {
                self.pos += 1;
                let token = self.version_word()?;
                end = token.span.end;
                upper = Some(token);
            }
            Some(TokenKind::As) => {
                self.pos += 1;
                let token = self.version_word()?;
                end = token.span.end;
                alias = Some(token);
            }
            _ => {}
        }

        Ok(Constraint {
            operator,
            version,
            upper,
            alias,
            span: start..end,
        })
    }

    fn version_word(&mut self) -> Result<VersionToken, ParseError> {
        match self.peek() {
            Some(token) if token.kind == TokenKind::Word => {
                let token = token.clone();
                self.pos += 1;
                Ok(VersionToken::new(token.text(self.input), token.span))
            }
            Some(token) => Err(ParseError::ExpectedVersion {
                input: self.input.to_string(),
                offset: token.span.start,
            }),
            None => Err(ParseError::ExpectedVersion {
                input: self.input.to_string(),
                offset: self.input.len(),
            }),
        }
    }
}
