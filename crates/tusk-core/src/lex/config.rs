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

//! Resource limits for the lexer.
//!
//! Defaults are generous and meant for trusted configuration files. Use
//! [`LexConfig::strict()`] when tokenizing input from an untrusted source.

/// Configuration for lexical analysis with resource limits.
///
/// # Examples
///
/// ```
/// use tusk_core::lex::LexConfig;
///
/// let config = LexConfig::default();
/// assert_eq!(config.max_string_length(), 16 * 1024 * 1024);
///
/// let strict = LexConfig::strict();
/// assert_eq!(strict.max_string_length(), 64 * 1024);
///
/// let custom = LexConfig::new()
///     .with_max_string_length(1024)
///     .with_max_token_count(10_000);
/// assert_eq!(custom.max_token_count(), 10_000);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LexConfig {
    /// Maximum length of a single string literal in bytes (after unescaping).
    max_string_length: usize,

    /// Maximum number of tokens in one stream, including `EOF`.
    max_token_count: usize,
}

impl LexConfig {
    /// Default maximum string length (16 MB).
    pub const DEFAULT_MAX_STRING_LENGTH: usize = 16 * 1024 * 1024;

    /// Default maximum token count (10 million tokens).
    pub const DEFAULT_MAX_TOKEN_COUNT: usize = 10_000_000;

    /// Create a new configuration with default limits.
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Conservative limits for untrusted input.
    #[inline]
    pub fn strict() -> Self {
        Self {
            max_string_length: 64 * 1024,
            max_token_count: 100_000,
        }
    }

    /// Set the maximum string length in bytes.
    #[inline]
    pub fn with_max_string_length(mut self, max: usize) -> Self {
        self.max_string_length = max;
        self
    }

    /// Set the maximum token count.
    #[inline]
    pub fn with_max_token_count(mut self, max: usize) -> Self {
        self.max_token_count = max;
        self
    }

    /// Get the maximum string length in bytes.
    #[inline]
    pub fn max_string_length(&self) -> usize {
        self.max_string_length
    }

    /// Get the maximum token count.
    #[inline]
    pub fn max_token_count(&self) -> usize {
        self.max_token_count
    }
}

impl Default for LexConfig {
    fn default() -> Self {
        Self {
            max_string_length: Self::DEFAULT_MAX_STRING_LENGTH,
            max_token_count: Self::DEFAULT_MAX_TOKEN_COUNT,
        }
    }
}
