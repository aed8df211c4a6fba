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

//! Lexical analysis for TuskTsk source text.
//!
//! # Module Structure
//!
//! - [`span`] - Source positions for tokens and errors
//! - [`tokens`] - Token kinds, literal values and the keyword table
//! - [`config`] - Resource limits applied while lexing
//! - [`error`] - Lexer error type
//! - [`lexer`] - The scanner itself
//!
//! # Examples
//!
//! ```
//! use tusk_core::lex::{tokenize, TokenKind};
//!
//! let tokens = tokenize("key: \"a\" + 'b' - 5\n").unwrap();
//! let rendered: Vec<String> = tokens.iter().map(|t| t.to_string()).collect();
//! assert_eq!(
//!     rendered,
//!     ["Identifier(key)", "Colon", "String(a)", "Plus", "String(b)", "Integer(-5)", "Newline", "Eof"]
//! );
//! assert_eq!(tokens.last().map(|t| t.kind), Some(TokenKind::Eof));
//! ```
//!
//! # Security
//!
//! String length and total token count are bounded by [`LexConfig`] so
//! hostile input cannot exhaust memory.

pub mod config;
pub mod error;
pub mod lexer;
pub mod span;
pub mod tokens;

pub use config::LexConfig;
pub use error::{LexError, LexResult};
pub use lexer::{tokenize, tokenize_with_config, Lexer};
pub use span::SourcePos;
pub use tokens::{keyword, Literal, Token, TokenKind};
