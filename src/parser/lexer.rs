//! Tokenizer for requirement strings
//!
//! Produces span-tagged tokens so the parser can slice the original text
//! when it needs to keep separators verbatim.

use crate::parser::constraint::Operator;
use crate::parser::grammar::{Grammar, OrStyle};
use std::ops::Range;

/// Kinds of token in a requirement string
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    /// Comparison or range operator
    Operator(Operator),
    /// `|` or `||`
    Pipe,
    /// `,`
    Comma,
    /// A standalone `-` between two versions
    Hyphen,
    /// `and` keyword
    And,
    /// `or` keyword
    Or,
    /// `as` keyword
    As,
    /// Anything else: versions, wildcards, branch names
    Word,
}

/// A token and its byte span in the input
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    /// Token kind
    pub kind: TokenKind,
    /// Byte span in the input
    pub span: Range<usize>,
}

impl Token {
    /// The token's text in `input`
    pub fn text<'a>(&self, input: &'a str) -> &'a str {
        &input[self.span.clone()]
    }
}

// Longest operators first so `>=` never lexes as `>` then `=`
const OPERATORS: &[&str] = &[
    "===", "~>", "~=", "==", "!=", ">=", "<=", "^", "~", ">", "<", "=",
];

fn is_punctuation(c: char) -> bool {
    matches!(c, '|' | ',' | '<' | '>' | '=' | '!' | '~' | '^')
}

/// Split `input` into tokens according to `grammar`
pub fn tokenize(input: &str, grammar: &Grammar) -> Vec<Token> {
    let mut tokens = Vec::new();
    let bytes = input.as_bytes();
    let mut pos = 0;

    while pos < input.len() {
        let c = input[pos..].chars().next().unwrap_or(' ');

        if c.is_whitespace() {
            pos += c.len_utf8();
            continue;
        }

        if c == '|' {
            let len = if bytes.get(pos + 1) == Some(&b'|') { 2 } else { 1 };
            tokens.push(Token {
                kind: TokenKind::Pipe,
                span: pos..pos + len,
            });
            pos += len;
            continue;
        }

        if c == ',' {
            tokens.push(Token {
                kind: TokenKind::Comma,
                span: pos..pos + 1,
            });
            pos += 1;
            continue;
        }

        if let Some(symbol) = OPERATORS.iter().find(|op| input[pos..].starts_with(**op)) {
            if let Some(operator) = Operator::from_symbol(symbol) {
                tokens.push(Token {
                    kind: TokenKind::Operator(operator),
                    span: pos..pos + symbol.len(),
                });
                pos += symbol.len();
                continue;
            }
        }

        if c == '-' {
            let before_is_space = pos == 0 || bytes[pos - 1].is_ascii_whitespace();
            let after_is_space = bytes.get(pos + 1).is_none_or(|b| b.is_ascii_whitespace());
            if before_is_space && after_is_space {
                tokens.push(Token {
                    kind: TokenKind::Hyphen,
                    span: pos..pos + 1,
                });
                pos += 1;
                continue;
            }
        }

        // Word: runs until whitespace or punctuation; inner dashes stay
        let start = pos;
        while pos < input.len() {
            let ch = input[pos..].chars().next().unwrap_or(' ');
            if ch.is_whitespace() || is_punctuation(ch) {
                break;
            }
            pos += ch.len_utf8();
        }
        if pos == start {
            // Lone '!' or other stray punctuation
            pos += c.len_utf8();
        }

        let text = &input[start..pos];
        let kind = match text {
            "or" if grammar.or_style == OrStyle::Keyword => TokenKind::Or,
            "and" if grammar.keyword_and => TokenKind::And,
            "as" if grammar.aliases => TokenKind::As,
            _ => TokenKind::Word,
        };
        tokens.push(Token {
            kind,
            span: start..pos,
        });
    }

    tokens
}
