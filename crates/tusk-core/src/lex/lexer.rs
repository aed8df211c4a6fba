// TuskTsk - Configuration Language Toolkit
//
// Copyright (c) 2025 TuskTsk authors and individual contributors.
//
// SPDX-License-Identifier: Apache-2.0
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License in the LICENSE file at the
// root of this repository or at: http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! The TuskTsk lexer.
//!
//! Turns source text into an ordered token stream ending in exactly one
//! [`TokenKind::Eof`]. Newlines are emitted as tokens because statement
//! termination is whitespace-sensitive when semicolons are omitted.
//!
//! # Ambiguous punctuation
//!
//! - `-` directly before a number (optionally separated by spaces or tabs) is
//!   folded into the literal as its sign, so `a - 5` and `a -5` both produce
//!   `Integer(-5)`. Telling subtraction from negation needs parser context.
//! - `<` and `>` are comparison operators unless local context suggests an
//!   object delimiter. `>` becomes [`TokenKind::ObjectEnd`] when one of the
//!   last three non-comment tokens is an identifier or colon, or an
//!   [`TokenKind::ObjectStart`] is still open. `<` becomes
//!   [`TokenKind::ObjectStart`] when the next non-blank character starts an
//!   identifier or ends the line.
//!
//! # Examples
//!
//! ```
//! use tusk_core::lex::{tokenize, Literal, TokenKind};
//!
//! let tokens = tokenize("port: 8080\n").unwrap();
//! let kinds: Vec<_> = tokens.iter().map(|t| t.kind).collect();
//! assert_eq!(
//!     kinds,
//!     vec![TokenKind::Identifier, TokenKind::Colon, TokenKind::Integer, TokenKind::Newline, TokenKind::Eof]
//! );
//! assert_eq!(tokens[2].literal, Some(Literal::Int(8080)));
//! ```

use super::config::LexConfig;
use super::error::{LexError, LexResult};
use super::span::SourcePos;
use super::tokens::{keyword, Literal, Token, TokenKind};

/// How many recent tokens `>` inspects when deciding whether it closes an object.
const OBJECT_LOOKBACK: usize = 3;

/// Operators matched greedily before single-character fallbacks.
const TWO_CHAR_OPERATORS: &[(&str, TokenKind)] = &[
    ("==", TokenKind::EqualEqual),
    ("!=", TokenKind::BangEqual),
    ("<=", TokenKind::LessEqual),
    (">=", TokenKind::GreaterEqual),
    ("&&", TokenKind::AndAnd),
    ("||", TokenKind::OrOr),
    ("+=", TokenKind::PlusAssign),
    ("-=", TokenKind::MinusAssign),
    ("*=", TokenKind::StarAssign),
    ("/=", TokenKind::SlashAssign),
];

/// Tokenize source text with default limits.
pub fn tokenize(source: &str) -> LexResult<Vec<Token>> {
    Lexer::new(source).tokenize()
}

/// Tokenize source text with explicit limits.
pub fn tokenize_with_config(source: &str, config: LexConfig) -> LexResult<Vec<Token>> {
    Lexer::with_config(source, config).tokenize()
}

/// Single-use lexer over one input.
///
/// `tokenize` consumes the lexer, so state can never leak between inputs.
pub struct Lexer<'a> {
    source: &'a str,
    /// Byte offset of the next unread character.
    offset: usize,
    cursor: SourcePos,
    tokens: Vec<Token>,
    open_objects: usize,
    config: LexConfig,
}

impl<'a> Lexer<'a> {
    /// Create a lexer with default limits.
    pub fn new(source: &'a str) -> Self {
        Self::with_config(source, LexConfig::default())
    }

    /// Create a lexer with explicit limits.
    pub fn with_config(source: &'a str, config: LexConfig) -> Self {
        Self {
            source,
            offset: 0,
            cursor: SourcePos::start(),
            tokens: Vec::new(),
            open_objects: 0,
            config,
        }
    }

    /// Run the lexer to completion.
    pub fn tokenize(mut self) -> LexResult<Vec<Token>> {
        while let Some(ch) = self.peek() {
            let start = self.cursor;
            let start_offset = self.offset;

            match ch {
                ' ' | '\t' | '\r' => {
                    self.advance();
                }
                '\n' => {
                    self.advance();
                    self.push(Token::new(TokenKind::Newline, "\n", start))?;
                }
                '#' => self.comment(start, start_offset)?,
                '"' | '\'' | '`' => self.string(ch, start, start_offset)?,
                c if c.is_ascii_digit() => self.number(start, start_offset, false)?,
                c if is_ident_start(c) => self.identifier(start, start_offset)?,
                _ => self.operator(ch, start, start_offset)?,
            }
        }

        let eof = Token::new(TokenKind::Eof, "", self.cursor);
        self.push(eof)?;
        Ok(self.tokens)
    }

    // ==================== Cursor helpers ====================

    fn peek(&self) -> Option<char> {
        self.source[self.offset..].chars().next()
    }

    fn peek_nth(&self, n: usize) -> Option<char> {
        self.source[self.offset..].chars().nth(n)
    }

    fn advance(&mut self) -> Option<char> {
        let ch = self.peek()?;
        self.offset += ch.len_utf8();
        if ch == '\n' {
            self.cursor.next_line();
        } else {
            self.cursor.advance_col();
        }
        Some(ch)
    }

    fn push(&mut self, token: Token) -> LexResult<()> {
        let count = self.tokens.len() + 1;
        if count > self.config.max_token_count() {
            return Err(LexError::TooManyTokens {
                count,
                max: self.config.max_token_count(),
                pos: token.pos,
            });
        }
        self.tokens.push(token);
        Ok(())
    }

    fn lexeme(&self, start_offset: usize) -> &'a str {
        &self.source[start_offset..self.offset]
    }

    // ==================== Token scanners ====================

    fn comment(&mut self, start: SourcePos, start_offset: usize) -> LexResult<()> {
        let rest = &self.source.as_bytes()[self.offset..];
        let end = match memchr::memchr(b'\n', rest) {
            Some(idx) => self.offset + idx,
            None => self.source.len(),
        };
        let raw = &self.source[start_offset..end];
        for _ in raw.chars() {
            self.cursor.advance_col();
        }
        self.offset = end;

        let text = raw[1..].trim().to_string();
        let lexeme = raw.trim_end_matches('\r');
        self.push(Token::new(TokenKind::Comment, lexeme, start).with_literal(Literal::String(text)))
    }

    fn string(&mut self, delimiter: char, start: SourcePos, start_offset: usize) -> LexResult<()> {
        self.advance();
        let mut value = String::new();

        loop {
            match self.advance() {
                None => return Err(LexError::UnterminatedString { delimiter, pos: start }),
                Some(c) if c == delimiter => break,
                Some('\\') => match self.advance() {
                    None => return Err(LexError::UnterminatedString { delimiter, pos: start }),
                    Some('n') => value.push('\n'),
                    Some('t') => value.push('\t'),
                    Some('r') => value.push('\r'),
                    Some(c @ ('\\' | '"' | '\'' | '`')) => value.push(c),
                    Some(other) => {
                        value.push('\\');
                        value.push(other);
                    }
                },
                Some(c) => value.push(c),
            }

            if value.len() > self.config.max_string_length() {
                return Err(LexError::StringTooLong {
                    length: value.len(),
                    max: self.config.max_string_length(),
                    pos: start,
                });
            }
        }

        let kind = if delimiter == '`' {
            TokenKind::TemplateString
        } else {
            TokenKind::String
        };
        let token = Token::new(kind, self.lexeme(start_offset), start).with_literal(Literal::String(value));
        self.push(token)
    }

    fn number(&mut self, start: SourcePos, start_offset: usize, negative: bool) -> LexResult<()> {
        let mut text = String::new();
        if negative {
            text.push('-');
        }
        let mut is_float = false;

        self.take_digits(&mut text);

        if self.peek() == Some('.') && self.peek_nth(1).is_some_and(|c| c.is_ascii_digit()) {
            is_float = true;
            self.advance();
            text.push('.');
            self.take_digits(&mut text);
        }

        if matches!(self.peek(), Some('e' | 'E')) {
            is_float = true;
            self.advance();
            text.push('e');
            if let Some(sign @ ('+' | '-')) = self.peek() {
                self.advance();
                text.push(sign);
            }
            if !self.peek().is_some_and(|c| c.is_ascii_digit()) {
                return Err(LexError::InvalidNumber {
                    message: format!("exponent in '{}' has no digits", self.lexeme(start_offset)),
                    pos: self.cursor,
                });
            }
            self.take_digits(&mut text);
        }

        let lexeme = self.lexeme(start_offset);
        let token = if is_float {
            let value = parse_double(&text, start)?;
            Token::new(TokenKind::Double, lexeme, start).with_literal(Literal::Double(value))
        } else {
            match text.parse::<i64>() {
                Ok(value) => match i32::try_from(value) {
                    Ok(small) => Token::new(TokenKind::Integer, lexeme, start).with_literal(Literal::Int(small)),
                    Err(_) => Token::new(TokenKind::Long, lexeme, start).with_literal(Literal::Long(value)),
                },
                // Wider than 64 bits: keep the magnitude as a double.
                Err(_) => {
                    let value = parse_double(&text, start)?;
                    Token::new(TokenKind::Double, lexeme, start).with_literal(Literal::Double(value))
                }
            }
        };
        self.push(token)
    }

    fn take_digits(&mut self, text: &mut String) {
        while let Some(c) = self.peek() {
            if !c.is_ascii_digit() {
                break;
            }
            self.advance();
            text.push(c);
        }
    }

    fn identifier(&mut self, start: SourcePos, start_offset: usize) -> LexResult<()> {
        while self.peek().is_some_and(is_ident_continue) {
            self.advance();
        }
        let text = self.lexeme(start_offset);

        let token = match keyword(text) {
            Some(TokenKind::Boolean) => {
                Token::new(TokenKind::Boolean, text, start).with_literal(Literal::Bool(text == "true"))
            }
            Some(TokenKind::Null) => Token::new(TokenKind::Null, text, start).with_literal(Literal::Null),
            Some(kind) => Token::new(kind, text, start),
            None => Token::new(TokenKind::Identifier, text, start),
        };
        self.push(token)
    }

    fn operator(&mut self, ch: char, start: SourcePos, start_offset: usize) -> LexResult<()> {
        let rest = &self.source[self.offset..];
        if let Some(&(op, kind)) = TWO_CHAR_OPERATORS.iter().find(|(op, _)| rest.starts_with(op)) {
            self.advance();
            self.advance();
            return self.push(Token::new(kind, op, start));
        }

        if ch == '-' && self.digit_after_blanks() {
            self.advance();
            while matches!(self.peek(), Some(' ' | '\t')) {
                self.advance();
            }
            return self.number(start, start_offset, true);
        }

        let kind = match ch {
            '+' => TokenKind::Plus,
            '-' => TokenKind::Minus,
            '*' => TokenKind::Star,
            '/' => TokenKind::Slash,
            '%' => TokenKind::Percent,
            '=' => TokenKind::Assign,
            '!' => TokenKind::Bang,
            '<' => {
                if self.opens_object() {
                    self.open_objects += 1;
                    TokenKind::ObjectStart
                } else {
                    TokenKind::Less
                }
            }
            '>' => {
                if self.in_object_context() {
                    self.open_objects = self.open_objects.saturating_sub(1);
                    TokenKind::ObjectEnd
                } else {
                    TokenKind::Greater
                }
            }
            '{' => TokenKind::LeftBrace,
            '}' => TokenKind::RightBrace,
            '[' => TokenKind::LeftBracket,
            ']' => TokenKind::RightBracket,
            '(' => TokenKind::LeftParen,
            ')' => TokenKind::RightParen,
            ',' => TokenKind::Comma,
            ':' => TokenKind::Colon,
            ';' => TokenKind::Semicolon,
            '.' => TokenKind::Dot,
            '?' => TokenKind::Question,
            '@' => TokenKind::At,
            '$' => TokenKind::Dollar,
            other => return Err(LexError::UnexpectedChar { ch: other, pos: start }),
        };

        self.advance();
        self.push(Token::new(kind, self.lexeme(start_offset), start))
    }

    // ==================== Context heuristics ====================

    /// `-` at the cursor followed by blanks and then a digit.
    fn digit_after_blanks(&self) -> bool {
        self.source[self.offset..]
            .chars()
            .skip(1)
            .find(|c| !matches!(c, ' ' | '\t'))
            .is_some_and(|c| c.is_ascii_digit())
    }

    /// `<` at the cursor followed by an identifier start or end of line.
    fn opens_object(&self) -> bool {
        self.source[self.offset..]
            .chars()
            .skip(1)
            .find(|c| !matches!(c, ' ' | '\t' | '\r'))
            .is_some_and(|c| c == '\n' || is_ident_start(c))
    }

    fn in_object_context(&self) -> bool {
        if self.open_objects > 0 {
            return true;
        }
        self.tokens
            .iter()
            .rev()
            .filter(|t| t.kind != TokenKind::Comment)
            .take(OBJECT_LOOKBACK)
            .any(|t| matches!(t.kind, TokenKind::Identifier | TokenKind::Colon))
    }
}

fn parse_double(text: &str, pos: SourcePos) -> LexResult<f64> {
    text.parse::<f64>().map_err(|_| LexError::InvalidNumber {
        message: format!("'{}' is not a valid number", text),
        pos,
    })
}

#[inline]
fn is_ident_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_'
}

#[inline]
fn is_ident_continue(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}
