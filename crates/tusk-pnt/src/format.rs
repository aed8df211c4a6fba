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

//! Byte-level constants of the `.pnt` container.
//!
//! All multi-byte fields are little-endian.
//!
//! ```text
//! offset      field                         size
//! 0           signature (0x544E5020)        4
//! 4           format version (1)            2
//! 6           compression                   1
//! 7           source file name length N     2
//! 9           source file name (UTF-8)      N
//! 9+N         compile timestamp (unix s)    8
//! 17+N        compiler version length M     2
//! 19+N        compiler version (UTF-8)      M
//! 19+N+M      reserved                      32
//! 51+N+M      body (string table, value table, sections)
//! ```

use std::fmt;

use chrono::{DateTime, Utc};

/// Container signature.
pub const SIGNATURE: u32 = 0x544E_5020;

/// The only format version this crate reads and writes.
pub const FORMAT_VERSION: u16 = 1;

/// Length of the zero-filled reserved block that ends the header.
pub const RESERVED_LEN: usize = 32;

/// Header size excluding the two variable-length strings.
pub const FIXED_HEADER_LEN: usize = 4 + 2 + 1 + 2 + 8 + 2 + RESERVED_LEN;

/// Body compression declared in the header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(u8)]
pub enum Compression {
    #[default]
    None = 0x00,
    Gzip = 0x01,
    /// Reserved block codec. Not implemented; bodies pass through unchanged.
    Block = 0x02,
}

impl Compression {
    /// Decode the header byte.
    pub fn from_byte(byte: u8) -> Option<Self> {
        match byte {
            0x00 => Some(Compression::None),
            0x01 => Some(Compression::Gzip),
            0x02 => Some(Compression::Block),
            _ => None,
        }
    }

    /// Header byte for this compression.
    pub fn as_byte(self) -> u8 {
        self as u8
    }
}

/// Leading byte of every encoded value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum ValueTag {
    Null = 0x00,
    Bool = 0x01,
    Int = 0x02,
    Long = 0x03,
    Double = 0x04,
    /// int32 string table index.
    String = 0x05,
    /// int32 length, then that many encoded values.
    Array = 0x06,
    /// int32 count, then `count` pairs of (int32 key index, encoded value).
    Object = 0x07,
    /// int32 length, then UTF-8 text in a generic format (JSON).
    Serialized = 0xFF,
}

impl ValueTag {
    /// Decode a tag byte. Unknown tags return `None`.
    pub fn from_byte(byte: u8) -> Option<Self> {
        match byte {
            0x00 => Some(ValueTag::Null),
            0x01 => Some(ValueTag::Bool),
            0x02 => Some(ValueTag::Int),
            0x03 => Some(ValueTag::Long),
            0x04 => Some(ValueTag::Double),
            0x05 => Some(ValueTag::String),
            0x06 => Some(ValueTag::Array),
            0x07 => Some(ValueTag::Object),
            0xFF => Some(ValueTag::Serialized),
            _ => None,
        }
    }

    /// Tag byte as written.
    pub fn as_byte(self) -> u8 {
        self as u8
    }
}

/// Decoded container header.
#[derive(Debug, Clone, PartialEq)]
pub struct ContainerHeader {
    pub version: u16,
    pub compression: Compression,
    /// Name of the source file the container was compiled from.
    pub source_file: String,
    /// Compile time in unix seconds.
    pub compiled_at: i64,
    pub compiler_version: String,
    /// Offset of the first body byte within the file.
    pub body_offset: usize,
}

impl ContainerHeader {
    /// Compile time as a UTC timestamp, if representable.
    pub fn compiled_at_utc(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.compiled_at, 0)
    }
}

impl fmt::Display for ContainerHeader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "pnt v{} ({:?}) from '{}' by '{}'",
            self.version, self.compression, self.source_file, self.compiler_version
        )
    }
}

/// Per-section metadata stored after each section's key list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionInfo {
    pub name: String,
    pub key_count: usize,
    pub is_optimized: bool,
    pub access_frequency: i32,
    pub computation_cost: i32,
}

/// Everything a decode learned about a container besides its values.
#[derive(Debug, Clone, PartialEq)]
pub struct ContainerInfo {
    pub header: ContainerHeader,
    pub sections: Vec<SectionInfo>,
    pub string_count: usize,
    pub value_count: usize,
}
