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

//! Container encoding.
//!
//! [`ContainerWriter`] is the producing side of the format: it interns every
//! string once, writes composites inline after their tag, and can gzip the
//! body or embed composites as JSON text.

use std::io::Write;

use flate2::write::GzEncoder;
use indexmap::{IndexMap, IndexSet};

use crate::decode::{JsonDecoder, SerializedDecoder};
use crate::error::{LoadError, PntResult};
use crate::format::{Compression, ValueTag, FORMAT_VERSION, RESERVED_LEN, SIGNATURE};
use crate::value::{ConfigMap, ConfigValue};

/// Metadata written after a section's key list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SectionMeta {
    pub is_optimized: bool,
    pub access_frequency: i32,
    pub computation_cost: i32,
}

#[derive(Debug, Clone, Default)]
struct Section {
    values: ConfigMap,
    meta: SectionMeta,
}

/// Builder producing byte-exact `.pnt` containers.
///
/// # Example
///
/// ```
/// use tusk_pnt::{ConfigMap, ConfigValue, ContainerDecoder, ContainerWriter};
///
/// let mut db = ConfigMap::new();
/// db.insert("host".into(), ConfigValue::from("localhost"));
///
/// let bytes = ContainerWriter::new().with_section("db", db).to_bytes().unwrap();
/// let store = ContainerDecoder::default().decode_slice(&bytes).unwrap().into_store();
/// assert_eq!(store.get("db.host", String::new()), "localhost");
/// ```
#[derive(Debug, Clone)]
pub struct ContainerWriter {
    source_file: String,
    compiler_version: String,
    compiled_at: i64,
    compression: Compression,
    serialize_composites: bool,
    sections: IndexMap<String, Section>,
}

impl Default for ContainerWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl ContainerWriter {
    /// Uncompressed writer stamped with the current time.
    pub fn new() -> Self {
        Self {
            source_file: String::new(),
            compiler_version: format!("tusk-pnt {}", env!("CARGO_PKG_VERSION")),
            compiled_at: chrono::Utc::now().timestamp(),
            compression: Compression::None,
            serialize_composites: false,
            sections: IndexMap::new(),
        }
    }

    pub fn with_source_file(mut self, name: impl Into<String>) -> Self {
        self.source_file = name.into();
        self
    }

    pub fn with_compiler_version(mut self, version: impl Into<String>) -> Self {
        self.compiler_version = version.into();
        self
    }

    /// Compile time in unix seconds.
    pub fn with_compiled_at(mut self, unix_seconds: i64) -> Self {
        self.compiled_at = unix_seconds;
        self
    }

    pub fn with_compression(mut self, compression: Compression) -> Self {
        self.compression = compression;
        self
    }

    /// Write arrays and objects as JSON text under the serialized tag.
    ///
    /// Composites whose JSON form would not decode to the same value (a
    /// `Long` that fits in `i32`, a non-finite double) keep the inline tags.
    pub fn with_serialized_composites(mut self, enabled: bool) -> Self {
        self.serialize_composites = enabled;
        self
    }

    pub fn with_section(mut self, name: impl Into<String>, values: ConfigMap) -> Self {
        self.add_section(name, values);
        self
    }

    /// Add or extend a section.
    pub fn add_section(&mut self, name: impl Into<String>, values: ConfigMap) {
        self.sections.entry(name.into()).or_default().values.extend(values);
    }

    /// Set section metadata. Creates the section if needed.
    pub fn set_section_meta(&mut self, name: impl Into<String>, meta: SectionMeta) {
        self.sections.entry(name.into()).or_default().meta = meta;
    }

    /// Add every top-level object of `settings` as a section.
    ///
    /// Fails on top-level scalars, which have no section to live in.
    pub fn with_settings(mut self, settings: &ConfigMap) -> PntResult<Self> {
        for (name, value) in settings {
            match value {
                ConfigValue::Object(map) => self.add_section(name.clone(), map.clone()),
                other => {
                    return Err(LoadError::Encode(format!(
                        "top-level key '{}' holds a {}, not a section",
                        name,
                        other.type_name()
                    )))
                }
            }
        }
        Ok(self)
    }

    /// Encode the whole container.
    pub fn to_bytes(&self) -> PntResult<Vec<u8>> {
        let mut out = Vec::new();
        self.write_to(&mut out)?;
        Ok(out)
    }

    /// Encode the whole container into `writer`.
    pub fn write_to<W: Write>(&self, mut writer: W) -> PntResult<()> {
        let header = self.encode_header()?;
        let body = self.encode_body()?;

        writer.write_all(&header)?;
        match self.compression {
            Compression::Gzip => {
                let mut encoder = GzEncoder::new(writer, flate2::Compression::default());
                encoder.write_all(&body)?;
                encoder.finish()?;
            }
            Compression::None | Compression::Block => writer.write_all(&body)?,
        }
        Ok(())
    }

    fn encode_header(&self) -> PntResult<Vec<u8>> {
        let mut out = Vec::new();
        out.extend_from_slice(&SIGNATURE.to_le_bytes());
        out.extend_from_slice(&FORMAT_VERSION.to_le_bytes());
        out.push(self.compression.as_byte());
        put_short_str(&mut out, &self.source_file, "source file name")?;
        out.extend_from_slice(&self.compiled_at.to_le_bytes());
        put_short_str(&mut out, &self.compiler_version, "compiler version")?;
        out.extend_from_slice(&[0u8; RESERVED_LEN]);
        Ok(out)
    }

    fn encode_body(&self) -> PntResult<Vec<u8>> {
        let mut body = BodyEncoder {
            strings: IndexSet::new(),
            values: Vec::new(),
            value_count: 0,
            serialize_composites: self.serialize_composites,
        };

        let mut sections = Vec::new();
        put_i32(&mut sections, len_i32(self.sections.len(), "section count")?);
        for (name, section) in &self.sections {
            put_i32(&mut sections, body.intern(name)?);
            put_i32(&mut sections, len_i32(section.values.len(), "section key count")?);
            for (key, value) in &section.values {
                put_i32(&mut sections, body.intern(key)?);
                put_i32(&mut sections, body.push_value(value)?);
            }
            sections.push(u8::from(section.meta.is_optimized));
            put_i32(&mut sections, section.meta.access_frequency);
            put_i32(&mut sections, section.meta.computation_cost);
        }

        let mut out = Vec::with_capacity(body.values.len() + sections.len() + 64);
        put_i32(&mut out, len_i32(body.strings.len(), "string count")?);
        for s in &body.strings {
            put_i32(&mut out, len_i32(s.len(), "string length")?);
            out.extend_from_slice(s.as_bytes());
        }
        put_i32(&mut out, len_i32(body.value_count, "value count")?);
        out.extend_from_slice(&body.values);
        out.extend_from_slice(&sections);
        Ok(out)
    }
}

struct BodyEncoder {
    strings: IndexSet<String>,
    /// Encoded value table entries, back to back.
    values: Vec<u8>,
    value_count: usize,
    serialize_composites: bool,
}

impl BodyEncoder {
    fn intern(&mut self, s: &str) -> PntResult<i32> {
        let index = match self.strings.get_index_of(s) {
            Some(index) => index,
            None => self.strings.insert_full(s.to_string()).0,
        };
        len_i32(index, "string index")
    }

    /// Append a value table entry and return its index.
    fn push_value(&mut self, value: &ConfigValue) -> PntResult<i32> {
        let mut encoded = Vec::new();
        self.encode_value(&mut encoded, value)?;
        self.values.extend_from_slice(&encoded);
        let index = len_i32(self.value_count, "value index")?;
        self.value_count += 1;
        Ok(index)
    }

    fn encode_value(&mut self, out: &mut Vec<u8>, value: &ConfigValue) -> PntResult<()> {
        if self.serialize_composites && matches!(value, ConfigValue::Array(_) | ConfigValue::Object(_)) {
            if let Some(text) = json_text(value)? {
                out.push(ValueTag::Serialized.as_byte());
                put_i32(out, len_i32(text.len(), "serialized length")?);
                out.extend_from_slice(text.as_bytes());
                return Ok(());
            }
        }
        match value {
            ConfigValue::Null => out.push(ValueTag::Null.as_byte()),
            ConfigValue::Bool(b) => {
                out.push(ValueTag::Bool.as_byte());
                out.push(u8::from(*b));
            }
            ConfigValue::Int(n) => {
                out.push(ValueTag::Int.as_byte());
                out.extend_from_slice(&n.to_le_bytes());
            }
            ConfigValue::Long(n) => {
                out.push(ValueTag::Long.as_byte());
                out.extend_from_slice(&n.to_le_bytes());
            }
            ConfigValue::Double(n) => {
                out.push(ValueTag::Double.as_byte());
                out.extend_from_slice(&n.to_le_bytes());
            }
            ConfigValue::String(s) => {
                out.push(ValueTag::String.as_byte());
                let index = self.intern(s)?;
                put_i32(out, index);
            }
            ConfigValue::Array(items) => {
                out.push(ValueTag::Array.as_byte());
                put_i32(out, len_i32(items.len(), "array length")?);
                for item in items {
                    self.encode_value(out, item)?;
                }
            }
            ConfigValue::Object(map) => {
                out.push(ValueTag::Object.as_byte());
                put_i32(out, len_i32(map.len(), "object size")?);
                for (key, item) in map {
                    let index = self.intern(key)?;
                    put_i32(out, index);
                    self.encode_value(out, item)?;
                }
            }
        }
        Ok(())
    }
}

// JSON text for `value`, or `None` when reading it back would not give the
// same value: small `Long`s come back as `Int` and non-finite doubles as null.
fn json_text(value: &ConfigValue) -> PntResult<Option<String>> {
    let text = serde_json::to_string(&value.to_json()).map_err(|e| LoadError::Encode(e.to_string()))?;
    Ok((JsonDecoder.decode(&text).as_ref() == Ok(value)).then_some(text))
}

fn put_i32(out: &mut Vec<u8>, n: i32) {
    out.extend_from_slice(&n.to_le_bytes());
}

fn len_i32(len: usize, what: &str) -> PntResult<i32> {
    i32::try_from(len).map_err(|_| LoadError::Encode(format!("{} {} does not fit in int32", what, len)))
}

fn put_short_str(out: &mut Vec<u8>, s: &str, what: &str) -> PntResult<()> {
    let len = u16::try_from(s.len())
        .map_err(|_| LoadError::Encode(format!("{} is {} bytes, limit is {}", what, s.len(), u16::MAX)))?;
    out.extend_from_slice(&len.to_le_bytes());
    out.extend_from_slice(s.as_bytes());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::FIXED_HEADER_LEN;

    fn map(pairs: Vec<(&str, ConfigValue)>) -> ConfigMap {
        pairs.into_iter().map(|(k, v)| (k.to_string(), v)).collect()
    }

    #[test]
    fn test_exact_bytes_for_small_container() {
        let bytes = ContainerWriter::new()
            .with_compiler_version("")
            .with_compiled_at(0)
            .with_section("s", map(vec![("k", ConfigValue::Bool(true))]))
            .to_bytes()
            .unwrap();

        let mut expected = Vec::new();
        expected.extend_from_slice(&[0x20, 0x50, 0x4E, 0x54, 0x01, 0x00, 0x00]);
        expected.extend_from_slice(&[0x00, 0x00]); // source name
        expected.extend_from_slice(&[0u8; 8]); // timestamp
        expected.extend_from_slice(&[0x00, 0x00]); // compiler version
        expected.extend_from_slice(&[0u8; RESERVED_LEN]);
        assert_eq!(expected.len(), FIXED_HEADER_LEN);
        // string table: ["s", "k"]
        expected.extend_from_slice(&[2, 0, 0, 0, 1, 0, 0, 0, b's', 1, 0, 0, 0, b'k']);
        // value table: [true]
        expected.extend_from_slice(&[1, 0, 0, 0, 0x01, 0x01]);
        // sections: 1 x {name 0, 1 key, key 1 -> value 0, not optimized, 0, 0}
        expected.extend_from_slice(&[1, 0, 0, 0, 0, 0, 0, 0, 1, 0, 0, 0, 1, 0, 0, 0, 0, 0, 0, 0]);
        expected.push(0);
        expected.extend_from_slice(&[0u8; 8]);

        assert_eq!(bytes, expected);
    }

    #[test]
    fn test_strings_are_interned_once() {
        let writer = ContainerWriter::new().with_section(
            "a",
            map(vec![
                ("x", ConfigValue::from("shared")),
                ("y", ConfigValue::from("shared")),
                ("shared", ConfigValue::Array(vec![ConfigValue::from("x")])),
            ]),
        );
        let body = writer.encode_body().unwrap();
        // a, x, shared, y
        assert_eq!(&body[..4], &4i32.to_le_bytes());
    }

    #[test]
    fn test_section_meta_is_written() {
        let mut writer = ContainerWriter::new();
        writer.add_section("hot", map(vec![]));
        writer.set_section_meta(
            "hot",
            SectionMeta {
                is_optimized: true,
                access_frequency: 7,
                computation_cost: -2,
            },
        );
        let body = writer.encode_body().unwrap();
        let tail = &body[body.len() - 9..];
        assert_eq!(tail[0], 1);
        assert_eq!(&tail[1..5], &7i32.to_le_bytes());
        assert_eq!(&tail[5..9], &(-2i32).to_le_bytes());
    }

    #[test]
    fn test_with_settings_rejects_top_level_scalars() {
        let settings = map(vec![("port", ConfigValue::Int(1))]);
        let err = ContainerWriter::new().with_settings(&settings).unwrap_err();
        assert!(matches!(err, LoadError::Encode(_)));
    }

    #[test]
    fn test_long_source_name_rejected() {
        let name = "x".repeat(usize::from(u16::MAX) + 1);
        let err = ContainerWriter::new().with_source_file(name).to_bytes().unwrap_err();
        assert!(matches!(err, LoadError::Encode(_)));
    }

    #[test]
    fn test_gzip_output_differs_from_plain() {
        let section = map(vec![("k", ConfigValue::from("v".repeat(200)))]);
        let plain = ContainerWriter::new().with_compiled_at(0).with_section("s", section.clone());
        let gz = plain.clone().with_compression(Compression::Gzip);
        let plain_bytes = plain.to_bytes().unwrap();
        let gz_bytes = gz.to_bytes().unwrap();
        assert_eq!(gz_bytes[6], Compression::Gzip.as_byte());
        assert!(gz_bytes.len() < plain_bytes.len());
    }

    #[test]
    fn test_serialized_composite_uses_json_tag() {
        let section = map(vec![("a", ConfigValue::Array(vec![ConfigValue::Int(5), ConfigValue::from("x")]))]);
        let bytes = ContainerWriter::new()
            .with_serialized_composites(true)
            .with_section("s", section.clone())
            .to_bytes()
            .unwrap();
        let json = br#"[5,"x"]"#;
        assert!(bytes.windows(json.len()).any(|w| w == json));

        let decoded = crate::decode::ContainerDecoder::default().decode_slice(&bytes).unwrap();
        assert_eq!(decoded.sections["s"], section);
    }

    #[test]
    fn test_serialized_mode_keeps_long_width() {
        let section = map(vec![
            ("a", ConfigValue::Array(vec![ConfigValue::Long(5)])),
            (
                "b",
                ConfigValue::Object(map(vec![
                    ("wide", ConfigValue::Long(7)),
                    ("tags", ConfigValue::Array(vec![ConfigValue::Int(1)])),
                ])),
            ),
            ("c", ConfigValue::Array(vec![ConfigValue::Double(f64::INFINITY)])),
        ]);
        let bytes = ContainerWriter::new()
            .with_serialized_composites(true)
            .with_section("s", section.clone())
            .to_bytes()
            .unwrap();

        // the inner array alone still goes out as JSON
        assert!(bytes.windows(3).any(|w| w == b"[1]"));
        let decoded = crate::decode::ContainerDecoder::default().decode_slice(&bytes).unwrap();
        assert_eq!(decoded.sections["s"], section);
    }
}
