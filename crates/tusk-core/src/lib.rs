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

//! Lexer and AST model for the TuskTsk configuration language.
//!
//! This crate is pure and synchronous: it performs no I/O. The compiled
//! binary format and its loader live in `tusk-pnt`.
//!
//! # Lexical Analysis
//!
//! [`lex::tokenize`] turns source text into tokens, resolving the language's
//! overloaded punctuation (`<`/`>` as comparison or object delimiters, `-`
//! as operator or numeric sign). See the [`lex`] module for details.
//!
//! # Syntax Tree
//!
//! The [`ast`] module defines the node set produced by a parser and the
//! visitor traits used to operate on it.
//!
//! ```
//! use tusk_core::{tokenize, TokenKind};
//!
//! let tokens = tokenize("[database]\nhost: \"localhost\"\n").unwrap();
//! assert_eq!(tokens[0].kind, TokenKind::LeftBracket);
//! ```

pub mod ast;
pub mod lex;

pub use ast::{walk, Configuration, Expression, NodeCounter, NodeVisitor, SourcePrinter, Statement, Visitor};
pub use lex::{tokenize, tokenize_with_config, LexConfig, LexError, LexResult, Literal, SourcePos, Token, TokenKind};
