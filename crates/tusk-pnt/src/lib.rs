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

//! Compiled `.pnt` containers for TuskTsk configurations.
//!
//! A container is a little-endian binary file: a fixed header, an interned
//! string table, a value table and a list of sections mapping keys to value
//! indices. This crate writes containers, decodes them, and serves the
//! result as a queryable [`ConfigStore`].
//!
//! # Loading
//!
//! [`BinaryLoader`] decodes on the blocking thread pool, memory-maps large
//! files and caches results per path with modification-time invalidation.
//!
//! ```no_run
//! use tusk_pnt::BinaryLoader;
//!
//! # async fn run() -> tusk_pnt::PntResult<()> {
//! let loader = BinaryLoader::default();
//! let store = loader.load("config/app.pnt").await.into_store()?;
//! let port: u16 = store.get("server.port", 8080);
//! # let _ = port;
//! # Ok(())
//! # }
//! ```
//!
//! # Values
//!
//! Values are [`ConfigValue`]s. Typed reads go through [`FromConfigValue`],
//! which never fails outward: a missing key or a failed conversion yields
//! the caller's default.

pub mod convert;
pub mod decode;
pub mod encode;
pub mod error;
pub mod format;
pub mod hierarchy;
pub mod limits;
pub mod loader;
pub mod source;
pub mod store;
pub mod value;

pub use convert::{parse_bool, parse_datetime, parse_duration, ConfigEnum, FromConfigValue};
pub use decode::{read_header, ContainerDecoder, DecodedContainer, JsonDecoder, SerializedDecoder};
pub use encode::{ContainerWriter, SectionMeta};
pub use error::{LoadError, LoadErrorKind, PntResult};
pub use format::{
    Compression, ContainerHeader, ContainerInfo, SectionInfo, ValueTag, FIXED_HEADER_LEN, FORMAT_VERSION, SIGNATURE,
};
pub use hierarchy::{find_hierarchy, HIERARCHY_FILE_NAME};
pub use limits::DecodeLimits;
pub use loader::{
    BatchLoadResult, BinaryLoader, LoadResult, LoadedBinary, LoaderOptions, LoaderOptionsBuilder, LoaderStatistics,
};
pub use source::{ByteSource, MappedReader, StreamReader};
pub use store::{ConfigSchema, ConfigStore, ValidationResult};
pub use value::{ConfigMap, ConfigValue};
