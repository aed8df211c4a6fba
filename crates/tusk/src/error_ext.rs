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

//! Error context helpers.
//!
//! [`TuskResultExt`] annotates any result whose error converts into
//! [`TuskError`] with a context message as it propagates.
//!
//! ```rust
//! use tusk::{load_bytes, TuskResultExt};
//!
//! fn read_overlay(bytes: &[u8]) -> tusk::TuskResult<tusk::ConfigStore> {
//!     load_bytes(bytes).context("while reading the overlay")
//! }
//!
//! let err = read_overlay(b"junk").unwrap_err();
//! assert_eq!(err.context.as_deref(), Some("while reading the overlay"));
//! ```
//!
//! Context added at outer layers is prepended, so the chain reads from the
//! outermost caller inward:
//!
//! ```rust
//! use tusk::{tokenize, TuskResultExt};
//!
//! let err = tokenize("key: \"open")
//!     .context("in app.tsk")
//!     .context("loading service config")
//!     .unwrap_err();
//! assert_eq!(err.context.as_deref(), Some("loading service config; in app.tsk"));
//! ```

use std::fmt;

use crate::error::TuskError;

/// Extension trait for adding context to results.
pub trait TuskResultExt<T> {
    /// Add context to an error. For expensive messages prefer
    /// [`with_context`](TuskResultExt::with_context).
    fn context<C>(self, context: C) -> Result<T, TuskError>
    where
        C: fmt::Display;

    /// Add context computed only on the error path.
    fn with_context<C, F>(self, f: F) -> Result<T, TuskError>
    where
        C: fmt::Display,
        F: FnOnce() -> C;
}

impl<T, E> TuskResultExt<T> for Result<T, E>
where
    E: Into<TuskError>,
{
    fn context<C>(self, context: C) -> Result<T, TuskError>
    where
        C: fmt::Display,
    {
        self.map_err(|e| add_context_to_error(e.into(), context.to_string()))
    }

    fn with_context<C, F>(self, f: F) -> Result<T, TuskError>
    where
        C: fmt::Display,
        F: FnOnce() -> C,
    {
        self.map_err(|e| add_context_to_error(e.into(), f().to_string()))
    }
}

/// Prepend `new_context` to any existing context, separated by `; `.
fn add_context_to_error(mut error: TuskError, new_context: String) -> TuskError {
    if new_context.is_empty() {
        return error;
    }

    error.context = Some(match error.context {
        Some(existing) => format!("{}; {}", new_context, existing),
        None => new_context,
    });

    error
}
