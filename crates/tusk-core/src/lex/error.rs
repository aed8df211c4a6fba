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

//! Error types for lexical analysis.
//!
//! Every variant carries the [`SourcePos`] where the problem was detected, so
//! a failed `tokenize` call always reports a line and column.

use thiserror::Error;

pub use crate::lex::span::SourcePos;

/// Error produced when source text cannot be tokenized.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum LexError {
    // ==================== Literal errors ====================
    /// A string reached end of input before its closing delimiter.
    #[error("line {}, column {}: unterminated string (expected closing {})", .pos.line(), .pos.column(), .delimiter)]
    UnterminatedString { delimiter: char, pos: SourcePos },

    /// A numeric literal is malformed (e.g. exponent without digits).
    #[error("line {}, column {}: invalid number: {}", .pos.line(), .pos.column(), .message)]
    InvalidNumber { message: String, pos: SourcePos },

    /// A character that starts no token.
    #[error("line {}, column {}: unexpected character '{}'", .pos.line(), .pos.column(), .ch)]
    UnexpectedChar { ch: char, pos: SourcePos },

    // ==================== Resource limit errors ====================
    /// String literal longer than the configured maximum.
    #[error("line {}, column {}: string length {} exceeds maximum {}", .pos.line(), .pos.column(), .length, .max)]
    StringTooLong {
        length: usize,
        max: usize,
        pos: SourcePos,
    },

    /// Token stream longer than the configured maximum.
    #[error("line {}, column {}: token count {} exceeds maximum {}", .pos.line(), .pos.column(), .count, .max)]
    TooManyTokens {
        count: usize,
        max: usize,
        pos: SourcePos,
    },
}

impl LexError {
    /// Get the position where this error occurred.
    #[inline]
    pub fn position(&self) -> SourcePos {
        match self {
            LexError::UnterminatedString { pos, .. }
            | LexError::InvalidNumber { pos, .. }
            | LexError::UnexpectedChar { pos, .. }
            | LexError::StringTooLong { pos, .. }
            | LexError::TooManyTokens { pos, .. } => *pos,
        }
    }

    /// Line number (1-based) of the error.
    #[inline]
    pub fn line(&self) -> usize {
        self.position().line()
    }

    /// Column number (1-based) of the error.
    #[inline]
    pub fn column(&self) -> usize {
        self.position().column()
    }

    /// Returns `true` if this is a resource limit error.
    #[inline]
    pub fn is_resource_limit(&self) -> bool {
        matches!(
            self,
            LexError::StringTooLong { .. } | LexError::TooManyTokens { .. }
        )
    }
}

/// Result type for lexer operations.
pub type LexResult<T> = Result<T, LexError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unterminated_string_display() {
        let err = LexError::UnterminatedString {
            delimiter: '"',
            pos: SourcePos::new(3, 7),
        };
        let msg = err.to_string();
        assert!(msg.contains("line 3, column 7"));
        assert!(msg.contains("unterminated string"));
    }

    #[test]
    fn test_position_accessors() {
        let err = LexError::UnexpectedChar {
            ch: '~',
            pos: SourcePos::new(2, 9),
        };
        assert_eq!(err.line(), 2);
        assert_eq!(err.column(), 9);
        assert_eq!(err.position(), SourcePos::new(2, 9));
    }

    #[test]
    fn test_resource_limit_classification() {
        let limit = LexError::StringTooLong {
            length: 100,
            max: 10,
            pos: SourcePos::start(),
        };
        assert!(limit.is_resource_limit());

        let syntax = LexError::InvalidNumber {
            message: "exponent has no digits".to_string(),
            pos: SourcePos::start(),
        };
        assert!(!syntax.is_resource_limit());
    }
}
