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

//! Unified error type for the facade.

use std::fmt;
use std::io;

use thiserror::Error;
use tusk_core::LexError;
use tusk_pnt::{LoadError, LoadErrorKind};

/// The kind of failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TuskErrorKind {
    /// Source text could not be tokenized.
    Lex,
    /// A file does not exist.
    NotFound,
    /// Signature, version or compression byte not supported.
    InvalidFormat,
    /// Container body is truncated or inconsistent.
    CorruptData,
    /// Gzip body could not be inflated.
    Decompression,
    /// Settings cannot be written as a container.
    Encode,
    /// Any other I/O failure.
    Io,
}

impl fmt::Display for TuskErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Lex => write!(f, "LexError"),
            Self::NotFound => write!(f, "NotFoundError"),
            Self::InvalidFormat => write!(f, "InvalidFormatError"),
            Self::CorruptData => write!(f, "CorruptDataError"),
            Self::Decompression => write!(f, "DecompressionError"),
            Self::Encode => write!(f, "EncodeError"),
            Self::Io => write!(f, "IOError"),
        }
    }
}

/// An error from any TuskTsk operation.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{kind}: {message}")]
pub struct TuskError {
    /// The kind of error.
    pub kind: TuskErrorKind,
    /// Human-readable error message.
    pub message: String,
    /// Caller-supplied context, innermost last.
    pub context: Option<String>,
}

impl TuskError {
    pub fn new(kind: TuskErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            context: None,
        }
    }

    /// Replace the context.
    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }

    pub fn io(message: impl Into<String>) -> Self {
        Self::new(TuskErrorKind::Io, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(TuskErrorKind::NotFound, message)
    }
}

impl From<LexError> for TuskError {
    fn from(err: LexError) -> Self {
        TuskError::new(TuskErrorKind::Lex, err.to_string())
    }
}

impl From<LoadError> for TuskError {
    fn from(err: LoadError) -> Self {
        let kind = match err.kind() {
            LoadErrorKind::NotFound => TuskErrorKind::NotFound,
            LoadErrorKind::InvalidFormat => TuskErrorKind::InvalidFormat,
            LoadErrorKind::CorruptData => TuskErrorKind::CorruptData,
            LoadErrorKind::Decompression => TuskErrorKind::Decompression,
            LoadErrorKind::Encode => TuskErrorKind::Encode,
            LoadErrorKind::Io => TuskErrorKind::Io,
        };
        TuskError::new(kind, err.to_string())
    }
}

impl From<io::Error> for TuskError {
    fn from(err: io::Error) -> Self {
        TuskError::from(LoadError::from(err))
    }
}

/// Result type for facade operations.
pub type TuskResult<T> = Result<T, TuskError>;
