//! Recursive-descent reader for the `exports.config = { ... }` object.

use std::ops::Range;

use tracing::debug;

use super::lexer::{Lexed, Token, TokenKind};
use crate::error::ParseError;
use crate::normalize::{trim_quotes, GenericValue};

const EXPORT_TARGETS: &[&str] = &["exports.config", "module.exports.config"];

/// Flatten the exported config object into qualified key/value entries.
pub(super) fn parse_config(lexed: &Lexed) -> Result<Vec<(String, GenericValue)>, ParseError> {
    let mut parser = Parser {
        source: &lexed.source,
        tokens: &lexed.tokens,
        pos: 0,
        entries: Vec::new(),
    };
    parser.seek_export()?;
    Ok(parser.entries)
}

fn is_opener(c: char) -> bool {
    matches!(c, '{' | '[' | '(')
}

fn is_closer(c: char) -> bool {
    matches!(c, '}' | ']' | ')')
}

fn unterminated(line: usize, what: &str) -> ParseError {
    ParseError::Js {
        line,
        message: format!("unterminated {}", what),
    }
}

struct Parser<'a> {
    source: &'a str,
    tokens: &'a [Token],
    pos: usize,
    entries: Vec<(String, GenericValue)>,
}

impl<'a> Parser<'a> {
    fn peek(&self) -> Option<&'a Token> {
        self.tokens.get(self.pos)
    }

    fn peek_at(&self, ahead: usize) -> Option<&'a Token> {
        self.tokens.get(self.pos + ahead)
    }

    /// Skip the module prelude up to `exports.config =`, then read the object.
    fn seek_export(&mut self) -> Result<(), ParseError> {
        let found = self.tokens.windows(2).position(|pair| {
            pair[0].kind == TokenKind::Word
                && EXPORT_TARGETS.contains(&pair[0].text.as_str())
                && pair[1].kind == TokenKind::Punct('=')
        });
        let Some(index) = found else {
            return Err(ParseError::Js {
                line: 1,
                message: "no `exports.config =` assignment found".to_string(),
            });
        };
        self.pos = index + 2;

        match self.peek() {
            Some(open) if open.kind == TokenKind::Punct('{') => {
                self.pos += 1;
                self.parse_object("", open.line)
            }
            Some(other) => Err(ParseError::Js {
                line: other.line,
                message: "exports.config is not assigned an object literal".to_string(),
            }),
            None => Err(unterminated(self.tokens[index].line, "exports.config assignment")),
        }
    }

    /// Read properties until the closing `}`. Keys are qualified with `prefix`.
    fn parse_object(&mut self, prefix: &str, open_line: usize) -> Result<(), ParseError> {
        loop {
            let token = self.peek().ok_or_else(|| unterminated(open_line, "object"))?;
            match token.kind {
                TokenKind::Punct('}') => {
                    self.pos += 1;
                    return Ok(());
                }
                TokenKind::Punct(',') | TokenKind::Punct(';') => {
                    self.pos += 1;
                    continue;
                }
                _ => {}
            }

            let is_pair = matches!(token.kind, TokenKind::Word | TokenKind::Str)
                && self
                    .peek_at(1)
                    .is_some_and(|t| t.kind == TokenKind::Punct(':'));
            if !is_pair {
                debug!(
                    "Skipping property without `key: value` form at line {}",
                    token.line
                );
                if self.scan_expression(&[',', '}'], open_line, "object")?.is_none() {
                    self.pos += 1;
                }
                continue;
            }

            self.pos += 2;
            let key = format!("{}{}", prefix, token.text);
            self.parse_value(key, open_line)?;
        }
    }

    fn parse_value(&mut self, key: String, open_line: usize) -> Result<(), ParseError> {
        let token = self.peek().ok_or_else(|| unterminated(open_line, "object"))?;
        match token.kind {
            TokenKind::Punct('{') => {
                self.pos += 1;
                self.entries.push((key.clone(), GenericValue::string("{")));
                self.parse_object(&format!("{}.", key), token.line)?;
            }
            TokenKind::Punct('[') => {
                self.pos += 1;
                let items = self.parse_array(token.line)?;
                self.entries.push((key, GenericValue::List(items)));
            }
            _ => {
                let value = self
                    .scan_expression(&[',', '}'], open_line, "object")?
                    .map(|span| trim_quotes(&self.source[span]))
                    .unwrap_or_default();
                self.entries.push((key, GenericValue::string(value)));
                return Ok(());
            }
        }
        // Whatever follows a literal (`[...].concat(x)`) is not recorded.
        self.scan_expression(&[',', '}'], open_line, "object")?;
        Ok(())
    }

    /// Read elements until the closing `]`, each as its sanitized source text.
    fn parse_array(&mut self, open_line: usize) -> Result<Vec<GenericValue>, ParseError> {
        let mut items = Vec::new();
        loop {
            let token = self.peek().ok_or_else(|| unterminated(open_line, "array"))?;
            match token.kind {
                TokenKind::Punct(']') => {
                    self.pos += 1;
                    return Ok(items);
                }
                TokenKind::Punct(',') => {
                    self.pos += 1;
                    continue;
                }
                _ => {}
            }
            match self.scan_expression(&[',', ']'], open_line, "array")? {
                Some(span) => items.push(GenericValue::string(trim_quotes(&self.source[span]))),
                None => self.pos += 1,
            }
        }
    }

    /// Consume one expression, stopping before a top-level stop character or
    /// an unmatched closer. Returns the source span consumed, if any.
    fn scan_expression(
        &mut self,
        stops: &[char],
        open_line: usize,
        what: &str,
    ) -> Result<Option<Range<usize>>, ParseError> {
        let mut depth = 0usize;
        let mut span: Option<Range<usize>> = None;
        loop {
            let token = self.peek().ok_or_else(|| unterminated(open_line, what))?;
            if let TokenKind::Punct(c) = token.kind {
                if depth == 0 && (stops.contains(&c) || is_closer(c)) {
                    return Ok(span);
                }
                if is_opener(c) {
                    depth += 1;
                } else if is_closer(c) {
                    depth -= 1;
                }
            }
            span = Some(match span {
                Some(range) => range.start..token.end,
                None => token.start..token.end,
            });
            self.pos += 1;
        }
    }
}
