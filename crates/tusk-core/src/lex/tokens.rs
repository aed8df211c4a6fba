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

//! Token model for TuskTsk source text.
//!
//! A [`Token`] is immutable once the lexer creates it. Literal tokens carry
//! their already-typed value in [`Token::literal`], so the parser never has to
//! re-interpret lexemes.

use std::fmt;

use super::span::SourcePos;

/// The closed set of token kinds produced by the lexer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TokenKind {
    // ==================== Literals ====================
    Identifier,
    String,
    /// Backtick string, subject to later interpolation.
    TemplateString,
    Integer,
    Long,
    Double,
    Boolean,
    Null,

    // ==================== Arithmetic ====================
    Plus,
    Minus,
    Star,
    Slash,
    Percent,

    // ==================== Comparison ====================
    EqualEqual,
    BangEqual,
    Less,
    LessEqual,
    Greater,
    GreaterEqual,

    // ==================== Logical ====================
    AndAnd,
    OrOr,
    Bang,

    // ==================== Assignment ====================
    Assign,
    PlusAssign,
    MinusAssign,
    StarAssign,
    SlashAssign,

    // ==================== Brackets ====================
    LeftBrace,
    RightBrace,
    LeftBracket,
    RightBracket,
    LeftParen,
    RightParen,
    /// `<` reinterpreted as an object delimiter.
    ObjectStart,
    /// `>` reinterpreted as an object delimiter.
    ObjectEnd,

    // ==================== Structural ====================
    Comma,
    Colon,
    Semicolon,
    Dot,
    Question,
    At,
    Dollar,

    // ==================== Keywords ====================
    And,
    Or,
    Not,
    If,
    Else,
    Elif,
    Endif,
    Include,
    Import,

    // ==================== Sentinels ====================
    Comment,
    Newline,
    Eof,
}

impl TokenKind {
    /// Returns `true` for kinds that carry a [`Literal`] value.
    pub fn is_literal(self) -> bool {
        matches!(
            self,
            TokenKind::String
                | TokenKind::TemplateString
                | TokenKind::Integer
                | TokenKind::Long
                | TokenKind::Double
                | TokenKind::Boolean
                | TokenKind::Null
        )
    }

    /// Returns `true` for reserved words (including `true`, `false`, `null`).
    pub fn is_keyword(self) -> bool {
        matches!(
            self,
            TokenKind::Boolean
                | TokenKind::Null
                | TokenKind::And
                | TokenKind::Or
                | TokenKind::Not
                | TokenKind::If
                | TokenKind::Else
                | TokenKind::Elif
                | TokenKind::Endif
                | TokenKind::Include
                | TokenKind::Import
        )
    }

    /// Returns `true` for arithmetic, comparison, logical and assignment operators.
    pub fn is_operator(self) -> bool {
        matches!(
            self,
            TokenKind::Plus
                | TokenKind::Minus
                | TokenKind::Star
                | TokenKind::Slash
                | TokenKind::Percent
                | TokenKind::EqualEqual
                | TokenKind::BangEqual
                | TokenKind::Less
                | TokenKind::LessEqual
                | TokenKind::Greater
                | TokenKind::GreaterEqual
                | TokenKind::AndAnd
                | TokenKind::OrOr
                | TokenKind::Bang
                | TokenKind::Assign
                | TokenKind::PlusAssign
                | TokenKind::MinusAssign
                | TokenKind::StarAssign
                | TokenKind::SlashAssign
        )
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// Look up a reserved word.
///
/// Returns `None` for ordinary identifiers.
///
/// ```
/// use tusk_core::lex::{keyword, TokenKind};
///
/// assert_eq!(keyword("elif"), Some(TokenKind::Elif));
/// assert_eq!(keyword("true"), Some(TokenKind::Boolean));
/// assert_eq!(keyword("server"), None);
/// ```
pub fn keyword(text: &str) -> Option<TokenKind> {
    let kind = match text {
        "true" | "false" => TokenKind::Boolean,
        "null" => TokenKind::Null,
        "and" => TokenKind::And,
        "or" => TokenKind::Or,
        "not" => TokenKind::Not,
        "if" => TokenKind::If,
        "else" => TokenKind::Else,
        "elif" => TokenKind::Elif,
        "endif" => TokenKind::Endif,
        "include" => TokenKind::Include,
        "import" => TokenKind::Import,
        _ => return None,
    };
    Some(kind)
}

/// An already-typed literal value attached to a token or AST node.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Literal {
    Null,
    Bool(bool),
    /// Integer that fits in 32 bits.
    Int(i32),
    /// Integer that needs 64 bits.
    Long(i64),
    Double(f64),
    String(String),
}

impl Literal {
    /// Returns the literal as an `i64` if it is integral.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Literal::Int(n) => Some(i64::from(*n)),
            Literal::Long(n) => Some(*n),
            _ => None,
        }
    }

    /// Returns the literal as a string slice if it is a string.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Literal::String(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Literal::Null => write!(f, "null"),
            Literal::Bool(b) => write!(f, "{}", b),
            Literal::Int(n) => write!(f, "{}", n),
            Literal::Long(n) => write!(f, "{}", n),
            Literal::Double(n) => write!(f, "{:?}", n),
            Literal::String(s) => write!(f, "{}", s),
        }
    }
}

/// A single lexical unit.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Token {
    /// What kind of token this is.
    pub kind: TokenKind,
    /// The source text the token was read from.
    pub lexeme: String,
    /// Typed value for literal tokens and comments.
    pub literal: Option<Literal>,
    /// Where the token starts.
    pub pos: SourcePos,
}

impl Token {
    /// Create a token without a literal value.
    pub fn new(kind: TokenKind, lexeme: impl Into<String>, pos: SourcePos) -> Self {
        Self {
            kind,
            lexeme: lexeme.into(),
            literal: None,
            pos,
        }
    }

    /// Attach a literal value.
    pub fn with_literal(mut self, literal: Literal) -> Self {
        self.literal = Some(literal);
        self
    }

    /// Line number (1-based).
    #[inline]
    pub fn line(&self) -> usize {
        self.pos.line()
    }

    /// Column number (1-based).
    #[inline]
    pub fn column(&self) -> usize {
        self.pos.column()
    }

    /// Returns `true` if this is the end-of-input sentinel.
    #[inline]
    pub fn is_eof(&self) -> bool {
        self.kind == TokenKind::Eof
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.literal {
            Some(lit) => write!(f, "{}({})", self.kind, lit),
            None if self.kind == TokenKind::Identifier => write!(f, "{}({})", self.kind, self.lexeme),
            None => write!(f, "{}", self.kind),
        }
    }
}
