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

//! # TuskTsk
//!
//! TuskTsk is a declarative configuration language with sections, nested
//! objects and `@` operators. Sources are compiled ahead of time into `.pnt`
//! containers that load quickly and answer dot-path queries.
//!
//! ## Quick Start
//!
//! ```rust
//! use tusk::{compile, load_bytes, tokenize, ConfigMap, ConfigValue, TokenKind};
//!
//! let tokens = tokenize("[server]\nport: 8080\n").unwrap();
//! assert_eq!(tokens[0].kind, TokenKind::LeftBracket);
//!
//! let mut server = ConfigMap::new();
//! server.insert("port".into(), ConfigValue::Int(8080));
//! let mut settings = ConfigMap::new();
//! settings.insert("server".into(), ConfigValue::Object(server));
//!
//! let bytes = compile(&settings).unwrap();
//! let store = load_bytes(&bytes).unwrap();
//! assert_eq!(store.get("server.port", 0u16), 8080);
//! ```
//!
//! ## Modules
//!
//! - [`lex`]: tokenizer
//! - [`ast`]: syntax tree and visitors
//! - [`pnt`]: container codec, loader and store

use std::path::Path;
use std::sync::Arc;

mod error;
mod error_ext;

pub use error::{TuskError, TuskErrorKind, TuskResult};
pub use error_ext::TuskResultExt;

pub use tusk_core::{Configuration, Expression, LexConfig, Literal, SourcePos, Statement, Token, TokenKind};
pub use tusk_pnt::{
    BinaryLoader, ConfigEnum, ConfigMap, ConfigStore, ConfigValue, FromConfigValue, LoadResult, LoaderOptions,
};

pub mod lex {
    //! Lexical analysis
    pub use tusk_core::lex::{
        keyword, tokenize, tokenize_with_config, LexConfig, LexError, LexResult, Lexer, Literal, SourcePos, Token,
        TokenKind,
    };
}

pub mod ast {
    //! Syntax tree, visitors and the source printer
    pub use tusk_core::ast::*;
}

pub mod pnt {
    //! Compiled containers
    pub use tusk_pnt::*;
}

/// Tokenize TuskTsk source with default limits.
///
/// ```rust
/// let tokens = tusk::tokenize("a: 1").unwrap();
/// assert_eq!(tokens.len(), 4);
/// ```
#[inline]
pub fn tokenize(source: &str) -> TuskResult<Vec<Token>> {
    Ok(tusk_core::tokenize(source)?)
}

/// Tokenize with explicit limits.
#[inline]
pub fn tokenize_with_config(source: &str, config: LexConfig) -> TuskResult<Vec<Token>> {
    Ok(tusk_core::tokenize_with_config(source, config)?)
}

/// Render a syntax tree back to TuskTsk source.
#[inline]
pub fn print(config: &Configuration) -> String {
    tusk_core::SourcePrinter::new().print(config)
}

/// Compile a settings tree into a container. Every top-level entry must be
/// an object; each becomes a section.
pub fn compile(settings: &ConfigMap) -> TuskResult<Vec<u8>> {
    Ok(tusk_pnt::ContainerWriter::new().with_settings(settings)?.to_bytes()?)
}

/// Decode an in-memory container.
pub fn load_bytes(bytes: &[u8]) -> TuskResult<ConfigStore> {
    Ok(tusk_pnt::ContainerDecoder::default().decode_slice(bytes)?.into_store())
}

/// Load one container from disk with default options.
///
/// Each call uses a fresh loader. Keep a [`BinaryLoader`] to reuse its cache.
pub async fn load(path: impl AsRef<Path>) -> TuskResult<Arc<ConfigStore>> {
    Ok(BinaryLoader::default().load(path).await.into_store()?)
}

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
