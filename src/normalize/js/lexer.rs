//! Tokenizer for JS config modules.
//!
//! Produces just enough structure for the parser: words, strings and single
//! punctuation characters, each with its byte span and line. Comments are
//! blanked out of the returned source so a value's span never includes one.

use crate::error::ParseError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum TokenKind {
    /// Identifier, dotted member chain or number.
    Word,
    /// Quoted string; `text` holds the unescaped contents.
    Str,
    Punct(char),
}

#[derive(Debug, Clone)]
pub(super) struct Token {
    pub kind: TokenKind,
    pub text: String,
    pub start: usize,
    pub end: usize,
    pub line: usize,
}

#[derive(Debug)]
pub(super) struct Lexed {
    /// The input with comments replaced by spaces. Byte offsets match the input.
    pub source: String,
    pub tokens: Vec<Token>,
}

pub(super) fn tokenize(input: &str) -> Result<Lexed, ParseError> {
    let mut lexer = Lexer {
        input,
        chars: input.char_indices().collect(),
        pos: 0,
        line: 1,
        source: String::with_capacity(input.len()),
        tokens: Vec::new(),
    };
    lexer.run()?;
    Ok(Lexed {
        source: lexer.source,
        tokens: lexer.tokens,
    })
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '$' || c == '.'
}

struct Lexer<'a> {
    input: &'a str,
    chars: Vec<(usize, char)>,
    pos: usize,
    line: usize,
    source: String,
    tokens: Vec<Token>,
}

impl Lexer<'_> {
    fn peek(&self) -> Option<char> {
        self.peek_at(0)
    }

    fn peek_at(&self, ahead: usize) -> Option<char> {
        self.chars.get(self.pos + ahead).map(|&(_, c)| c)
    }

    fn offset(&self) -> usize {
        self.chars
            .get(self.pos)
            .map(|&(i, _)| i)
            .unwrap_or(self.input.len())
    }

    /// Consume one character, copying it to the output source.
    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += 1;
        if c == '\n' {
            self.line += 1;
        }
        self.source.push(c);
        Some(c)
    }

    /// Consume one character of a comment, blanking it in the output source.
    fn blank(&mut self) {
        if let Some(c) = self.peek() {
            self.pos += 1;
            if c == '\n' {
                self.line += 1;
                self.source.push('\n');
            } else {
                self.source
                    .extend(std::iter::repeat(' ').take(c.len_utf8()));
            }
        }
    }

    fn push(&mut self, kind: TokenKind, text: String, start: usize, line: usize) {
        let end = self.offset();
        self.tokens.push(Token {
            kind,
            text,
            start,
            end,
            line,
        });
    }

    fn run(&mut self) -> Result<(), ParseError> {
        while let Some(c) = self.peek() {
            match c {
                c if c.is_whitespace() => {
                    self.bump();
                }
                '/' if self.peek_at(1) == Some('/') => {
                    while self.peek().is_some_and(|c| c != '\n') {
                        self.blank();
                    }
                }
                '/' if self.peek_at(1) == Some('*') => self.block_comment()?,
                '/' if self.expects_value() => self.regex()?,
                '\'' | '"' | '`' => self.string(c)?,
                c if is_word_char(c) => self.word(),
                c => {
                    let (start, line) = (self.offset(), self.line);
                    self.bump();
                    self.push(TokenKind::Punct(c), c.to_string(), start, line);
                }
            }
        }
        Ok(())
    }

    /// Whether the previous token leaves the lexer in value position, where a
    /// `/` opens a regex literal rather than a division.
    fn expects_value(&self) -> bool {
        match self.tokens.last() {
            Some(token) => matches!(
                token.kind,
                TokenKind::Punct(':' | ',' | '[' | '(' | '=' | '!' | '&' | '|' | '?')
            ),
            None => false,
        }
    }

    /// A regex literal, kept verbatim (flags included) as one word.
    fn regex(&mut self) -> Result<(), ParseError> {
        let (start, line) = (self.offset(), self.line);
        let unterminated = || ParseError::Js {
            line,
            message: "unterminated regular expression literal".to_string(),
        };

        self.bump();
        let mut in_class = false;
        loop {
            match self.bump() {
                None | Some('\n') => return Err(unterminated()),
                Some('\\') => {
                    if matches!(self.bump(), None | Some('\n')) {
                        return Err(unterminated());
                    }
                }
                Some('[') => in_class = true,
                Some(']') => in_class = false,
                Some('/') if !in_class => break,
                Some(_) => {}
            }
        }
        while self.peek().is_some_and(|c| c.is_ascii_alphabetic()) {
            self.bump();
        }
        let text = self.input[start..self.offset()].to_string();
        self.push(TokenKind::Word, text, start, line);
        Ok(())
    }

    fn block_comment(&mut self) -> Result<(), ParseError> {
        let line = self.line;
        self.blank();
        self.blank();
        loop {
            match self.peek() {
                None => {
                    return Err(ParseError::Js {
                        line,
                        message: "unterminated block comment".to_string(),
                    })
                }
                Some('*') if self.peek_at(1) == Some('/') => {
                    self.blank();
                    self.blank();
                    return Ok(());
                }
                Some(_) => self.blank(),
            }
        }
    }

    fn string(&mut self, quote: char) -> Result<(), ParseError> {
        let (start, line) = (self.offset(), self.line);
        let unterminated = || ParseError::Js {
            line,
            message: "unterminated string literal".to_string(),
        };

        self.bump();
        let mut text = String::new();
        loop {
            match self.bump() {
                None => return Err(unterminated()),
                Some('\\') => match self.bump() {
                    Some('n') => text.push('\n'),
                    Some('t') => text.push('\t'),
                    Some('r') => text.push('\r'),
                    Some(escaped) => text.push(escaped),
                    None => return Err(unterminated()),
                },
                Some(c) if c == quote => break,
                Some('\n') if quote != '`' => return Err(unterminated()),
                Some(c) => text.push(c),
            }
        }
        self.push(TokenKind::Str, text, start, line);
        Ok(())
    }

    fn word(&mut self) {
        let (start, line) = (self.offset(), self.line);
        let mut text = String::new();
        while let Some(c) = self.peek().filter(|&c| is_word_char(c)) {
            text.push(c);
            self.bump();
        }
        self.push(TokenKind::Word, text, start, line);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(input: &str) -> Vec<(TokenKind, String)> {
        tokenize(input)
            .unwrap()
            .tokens
            .into_iter()
            .map(|t| (t.kind, t.text))
            .collect()
    }

    #[test]
    fn words_strings_and_punctuation() {
        let tokens = kinds("exports.config = { a: 'x' }");
        assert_eq!(
            tokens,
            vec![
                (TokenKind::Word, "exports.config".to_string()),
                (TokenKind::Punct('='), "=".to_string()),
                (TokenKind::Punct('{'), "{".to_string()),
                (TokenKind::Word, "a".to_string()),
                (TokenKind::Punct(':'), ":".to_string()),
                (TokenKind::Str, "x".to_string()),
                (TokenKind::Punct('}'), "}".to_string()),
            ]
        );
    }

    #[test]
    fn comments_are_blanked() {
        let lexed = tokenize("a // note\n/* block\n */ b").unwrap();
        let words: Vec<_> = lexed.tokens.iter().map(|t| t.text.as_str()).collect();
        assert_eq!(words, vec!["a", "b"]);
        assert_eq!(lexed.source.len(), "a // note\n/* block\n */ b".len());
        assert!(!lexed.source.contains("note"));
        assert_eq!(lexed.tokens[1].line, 3);
    }

    #[test]
    fn slashes_inside_strings_are_not_comments() {
        let tokens = kinds("host: 'http://proxy.example.com'");
        assert_eq!(tokens[2], (TokenKind::Str, "http://proxy.example.com".to_string()));
    }

    #[test]
    fn escapes_and_template_literals() {
        let tokens = kinds(r#"'it\'s' `multi
line`"#);
        assert_eq!(tokens[0].1, "it's");
        assert_eq!(tokens[1].1, "multi\nline");
    }

    #[test]
    fn spans_cover_source_text() {
        let input = "key: 'value'";
        let lexed = tokenize(input).unwrap();
        let string = &lexed.tokens[2];
        assert_eq!(&lexed.source[string.start..string.end], "'value'");
    }

    #[test]
    fn regex_literals_are_single_words() {
        let tokens = kinds(r"ignore: [/^\/health\//, /it's/gi]");
        assert_eq!(tokens[3], (TokenKind::Word, r"/^\/health\//".to_string()));
        assert_eq!(tokens[5], (TokenKind::Word, "/it's/gi".to_string()));
        assert_eq!(tokens[6], (TokenKind::Punct(']'), "]".to_string()));
    }

    #[test]
    fn slash_after_a_value_is_division() {
        let tokens = kinds("timeout: total / 2");
        assert_eq!(tokens[3], (TokenKind::Punct('/'), "/".to_string()));
    }

    #[test]
    fn comment_in_value_position_is_still_a_comment() {
        let tokens = kinds("a: // later
'x'");
        assert_eq!(tokens[2], (TokenKind::Str, "x".to_string()));
    }

    #[test]
    fn unterminated_constructs_report_their_line() {
        match tokenize("a\n/* never closed").unwrap_err() {
            ParseError::Js { line, .. } => assert_eq!(line, 2),
            other => panic!("unexpected error: {other}"),
        }
        match tokenize("\n\nname: 'oops\n").unwrap_err() {
            ParseError::Js { line, .. } => assert_eq!(line, 3),
            other => panic!("unexpected error: {other}"),
        }
    }
}
