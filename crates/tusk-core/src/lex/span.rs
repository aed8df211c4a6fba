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

//! Source positions for diagnostics.
//!
//! Every token records where it started so that lexer errors and downstream
//! parser errors can point at the offending character.
//!
//! # Examples
//!
//! ```
//! use tusk_core::lex::SourcePos;
//!
//! let mut pos = SourcePos::start();
//! pos.advance_col();
//! assert_eq!(pos.column(), 2);
//! pos.next_line();
//! assert_eq!((pos.line(), pos.column()), (2, 1));
//! ```

use std::fmt;

/// A 1-based line/column position in source text.
///
/// Columns count Unicode scalar values, not bytes, so a multi-byte
/// identifier character advances the column by one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SourcePos {
    line: usize,
    column: usize,
}

impl SourcePos {
    /// Creates a new source position.
    #[inline]
    pub const fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }

    /// Creates a position at the start of the input (line 1, column 1).
    #[inline]
    pub const fn start() -> Self {
        Self { line: 1, column: 1 }
    }

    /// Returns the line number.
    #[inline]
    pub const fn line(&self) -> usize {
        self.line
    }

    /// Returns the column number.
    #[inline]
    pub const fn column(&self) -> usize {
        self.column
    }

    /// Advances the position by one column.
    #[inline]
    pub fn advance_col(&mut self) {
        self.column += 1;
    }

    /// Moves to the next line (increments line, resets column to 1).
    #[inline]
    pub fn next_line(&mut self) {
        self.line += 1;
        self.column = 1;
    }
}

impl fmt::Display for SourcePos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}, column {}", self.line, self.column)
    }
}
