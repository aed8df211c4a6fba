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

//! Error types for container decoding and loading.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Result type for codec and loader operations.
pub type PntResult<T> = Result<T, LoadError>;

/// Failure to encode, decode or load a compiled container.
///
/// Every variant is recoverable: the loader reports it to the caller and
/// keeps working. None of them are retried internally.
#[derive(Debug, Error)]
pub enum LoadError {
    /// The file does not exist.
    #[error("file not found: {}", .path.display())]
    NotFound { path: PathBuf },

    /// Signature, version or compression byte is not supported.
    #[error("invalid format: {0}")]
    InvalidFormat(String),

    /// Truncated data, out-of-range table index or unknown value tag.
    #[error("corrupt data at offset {offset}: {message}")]
    CorruptData { offset: usize, message: String },

    /// The compressed body could not be inflated.
    #[error("decompression failed: {0}")]
    Decompression(String),

    /// A value cannot be represented in the container format.
    #[error("encode error: {0}")]
    Encode(String),

    /// Any other I/O failure (permissions, mapping, ...).
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

/// Copyable tag identifying a [`LoadError`] variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LoadErrorKind {
    NotFound,
    InvalidFormat,
    CorruptData,
    Decompression,
    Encode,
    Io,
}

impl LoadError {
    /// Shorthand for [`LoadError::CorruptData`].
    pub fn corrupt(offset: usize, message: impl Into<String>) -> Self {
        LoadError::CorruptData {
            offset,
            message: message.into(),
        }
    }

    /// Map an I/O error for `path`, turning a missing file into `NotFound`.
    pub fn from_io(err: io::Error, path: impl Into<PathBuf>) -> Self {
        if err.kind() == io::ErrorKind::NotFound {
            LoadError::NotFound { path: path.into() }
        } else {
            LoadError::Io(err)
        }
    }

    /// Get the variant tag.
    pub fn kind(&self) -> LoadErrorKind {
        match self {
            LoadError::NotFound { .. } => LoadErrorKind::NotFound,
            LoadError::InvalidFormat(_) => LoadErrorKind::InvalidFormat,
            LoadError::CorruptData { .. } => LoadErrorKind::CorruptData,
            LoadError::Decompression(_) => LoadErrorKind::Decompression,
            LoadError::Encode(_) => LoadErrorKind::Encode,
            LoadError::Io(_) => LoadErrorKind::Io,
        }
    }

    /// Returns true if the input itself is bad (as opposed to the environment).
    pub fn is_format_error(&self) -> bool {
        matches!(
            self.kind(),
            LoadErrorKind::InvalidFormat | LoadErrorKind::CorruptData | LoadErrorKind::Decompression
        )
    }
}
