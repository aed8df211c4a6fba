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

//! Container decoding.
//!
//! [`ContainerDecoder::decode_stream`] parses through a sequential reader;
//! [`ContainerDecoder::decode_slice`] parses a borrowed slice (the
//! memory-mapped path). Both run the same generic routines over a
//! [`ByteSource`]. Gzip bodies are inflated into memory first and then
//! parsed by the same path that read the header.

use std::fmt;
use std::io::Read;
use std::sync::Arc;

use flate2::read::GzDecoder;
use indexmap::IndexMap;
use tracing::{debug, warn};

use crate::error::{LoadError, PntResult};
use crate::format::{
    Compression, ContainerHeader, ContainerInfo, SectionInfo, ValueTag, FORMAT_VERSION, RESERVED_LEN, SIGNATURE,
};
use crate::limits::DecodeLimits;
use crate::source::{ByteSource, MappedReader, StreamReader};
use crate::store::ConfigStore;
use crate::value::{ConfigMap, ConfigValue};

/// Decoder for the generic-text payload of [`ValueTag::Serialized`] values.
///
/// The container only frames the text; interpreting it is delegated here.
pub trait SerializedDecoder: fmt::Debug + Send + Sync {
    fn decode(&self, text: &str) -> Result<ConfigValue, String>;
}

/// Decodes serialized payloads as JSON.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonDecoder;

impl SerializedDecoder for JsonDecoder {
    fn decode(&self, text: &str) -> Result<ConfigValue, String> {
        serde_json::from_str::<serde_json::Value>(text)
            .map(|json| ConfigValue::from_json(&json))
            .map_err(|e| e.to_string())
    }
}

/// Result of decoding one container.
#[derive(Debug, Clone)]
pub struct DecodedContainer {
    pub info: ContainerInfo,
    /// Section name to its key/value map, in file order.
    pub sections: IndexMap<String, ConfigMap>,
}

impl DecodedContainer {
    /// Wrap the sections into a store.
    pub fn into_store(self) -> ConfigStore {
        ConfigStore::from_sections(self.sections)
    }
}

/// Stateless container decoder.
#[derive(Debug, Clone)]
pub struct ContainerDecoder {
    limits: DecodeLimits,
    serialized: Arc<dyn SerializedDecoder>,
}

impl Default for ContainerDecoder {
    fn default() -> Self {
        Self::new(DecodeLimits::default(), Arc::new(JsonDecoder))
    }
}

impl ContainerDecoder {
    pub fn new(limits: DecodeLimits, serialized: Arc<dyn SerializedDecoder>) -> Self {
        Self { limits, serialized }
    }

    pub fn limits(&self) -> &DecodeLimits {
        &self.limits
    }

    /// Decode by sequential reads.
    pub fn decode_stream<R: Read>(&self, reader: R) -> PntResult<DecodedContainer> {
        let mut src = StreamReader::new(reader);
        let header = read_header(&mut src)?;
        match header.compression {
            Compression::Gzip => {
                let body = self.inflate(src.into_inner())?;
                self.decode_body(header, &mut StreamReader::new(body.as_slice()))
            }
            Compression::None | Compression::Block => self.decode_body(header, &mut src),
        }
    }

    /// Decode by offset from a borrowed buffer.
    pub fn decode_slice(&self, data: &[u8]) -> PntResult<DecodedContainer> {
        let mut src = MappedReader::new(data);
        let header = read_header(&mut src)?;
        match header.compression {
            Compression::Gzip => {
                let body = self.inflate(src.remaining())?;
                self.decode_body(header, &mut MappedReader::new(&body))
            }
            Compression::None | Compression::Block => self.decode_body(header, &mut src),
        }
    }

    fn inflate<R: Read>(&self, compressed: R) -> PntResult<Vec<u8>> {
        let limit = self.limits.max_decompressed_size;
        let mut body = Vec::new();
        GzDecoder::new(compressed)
            .take(limit.saturating_add(1))
            .read_to_end(&mut body)
            .map_err(|e| LoadError::Decompression(e.to_string()))?;
        if body.len() as u64 > limit {
            return Err(LoadError::Decompression(format!(
                "inflated body exceeds limit of {} bytes",
                limit
            )));
        }
        debug!("Inflated gzip body: {} bytes", body.len());
        Ok(body)
    }

    fn decode_body<S: ByteSource>(&self, header: ContainerHeader, src: &mut S) -> PntResult<DecodedContainer> {
        if header.compression == Compression::Block {
            warn!("Block compression is not supported; reading body as uncompressed");
        }

        let mut body = BodyDecoder {
            src,
            limits: &self.limits,
            serialized: self.serialized.as_ref(),
            strings: Vec::new(),
            values: Vec::new(),
        };
        body.read_strings()?;
        body.read_values()?;
        let (sections, section_info) = body.read_sections()?;

        let info = ContainerInfo {
            header,
            sections: section_info,
            string_count: body.strings.len(),
            value_count: body.values.len(),
        };
        debug!(
            "Decoded container: {} strings, {} values, {} sections",
            info.string_count,
            info.value_count,
            info.sections.len()
        );
        Ok(DecodedContainer { info, sections })
    }
}

/// Read and validate the header, leaving `src` at the first body byte.
pub fn read_header<S: ByteSource>(src: &mut S) -> PntResult<ContainerHeader> {
    let signature = src
        .read_u32()
        .map_err(|_| LoadError::InvalidFormat("input too short for a container header".to_string()))?;
    if signature != SIGNATURE {
        return Err(LoadError::InvalidFormat(format!(
            "bad signature 0x{:08X} (expected 0x{:08X})",
            signature, SIGNATURE
        )));
    }

    let version = src.read_u16()?;
    if version != FORMAT_VERSION {
        return Err(LoadError::InvalidFormat(format!(
            "unsupported format version {} (expected {})",
            version, FORMAT_VERSION
        )));
    }

    let compression_byte = src.read_u8()?;
    let compression = Compression::from_byte(compression_byte)
        .ok_or_else(|| LoadError::InvalidFormat(format!("unknown compression type 0x{:02X}", compression_byte)))?;

    let name_len = usize::from(src.read_u16()?);
    let source_file = src.read_string(name_len)?;
    let compiled_at = src.read_i64()?;
    let version_len = usize::from(src.read_u16()?);
    let compiler_version = src.read_string(version_len)?;
    src.skip(RESERVED_LEN)?;

    Ok(ContainerHeader {
        version,
        compression,
        source_file,
        compiled_at,
        compiler_version,
        body_offset: src.position(),
    })
}

struct BodyDecoder<'d, S> {
    src: &'d mut S,
    limits: &'d DecodeLimits,
    serialized: &'d dyn SerializedDecoder,
    strings: Vec<String>,
    values: Vec<ConfigValue>,
}

impl<S: ByteSource> BodyDecoder<'_, S> {
    /// Read an int32 count and check it against the table limit.
    fn read_count(&mut self, what: &str) -> PntResult<usize> {
        let offset = self.src.position();
        let raw = self.src.read_i32()?;
        let count = usize::try_from(raw).map_err(|_| LoadError::corrupt(offset, format!("negative {} {}", what, raw)))?;
        if count > self.limits.max_table_entries {
            return Err(LoadError::corrupt(
                offset,
                format!("{} {} exceeds limit {}", what, count, self.limits.max_table_entries),
            ));
        }
        Ok(count)
    }

    /// Read an int32 index and check it against a table length.
    fn read_index(&mut self, table: &str, len: usize) -> PntResult<usize> {
        let offset = self.src.position();
        let raw = self.src.read_i32()?;
        usize::try_from(raw)
            .ok()
            .filter(|&index| index < len)
            .ok_or_else(|| LoadError::corrupt(offset, format!("{} index {} out of range (len {})", table, raw, len)))
    }

    fn string_at(&mut self) -> PntResult<String> {
        let index = self.read_index("string", self.strings.len())?;
        Ok(self.strings[index].clone())
    }

    fn read_strings(&mut self) -> PntResult<()> {
        let count = self.read_count("string count")?;
        self.strings.reserve(count.min(4096));
        for _ in 0..count {
            let offset = self.src.position();
            let raw = self.src.read_i32()?;
            let len = usize::try_from(raw)
                .map_err(|_| LoadError::corrupt(offset, format!("negative string length {}", raw)))?;
            if len > self.limits.max_string_length {
                return Err(LoadError::corrupt(
                    offset,
                    format!("string length {} exceeds limit {}", len, self.limits.max_string_length),
                ));
            }
            let s = self.src.read_string(len)?;
            self.strings.push(s);
        }
        Ok(())
    }

    fn read_values(&mut self) -> PntResult<()> {
        let count = self.read_count("value count")?;
        self.values.reserve(count.min(4096));
        for _ in 0..count {
            let value = self.read_value(0)?;
            self.values.push(value);
        }
        Ok(())
    }

    fn read_value(&mut self, depth: usize) -> PntResult<ConfigValue> {
        let offset = self.src.position();
        if depth > self.limits.max_nesting_depth {
            return Err(LoadError::corrupt(
                offset,
                format!("nesting depth exceeds limit {}", self.limits.max_nesting_depth),
            ));
        }

        let byte = self.src.read_u8()?;
        let tag = ValueTag::from_byte(byte)
            .ok_or_else(|| LoadError::corrupt(offset, format!("unknown value tag 0x{:02X}", byte)))?;

        let value = match tag {
            ValueTag::Null => ConfigValue::Null,
            ValueTag::Bool => ConfigValue::Bool(self.src.read_bool()?),
            ValueTag::Int => ConfigValue::Int(self.src.read_i32()?),
            ValueTag::Long => ConfigValue::Long(self.src.read_i64()?),
            ValueTag::Double => ConfigValue::Double(self.src.read_f64()?),
            ValueTag::String => ConfigValue::String(self.string_at()?),
            ValueTag::Array => {
                let len = self.read_count("array length")?;
                let mut items = Vec::with_capacity(len.min(1024));
                for _ in 0..len {
                    items.push(self.read_value(depth + 1)?);
                }
                ConfigValue::Array(items)
            }
            ValueTag::Object => {
                let len = self.read_count("object size")?;
                let mut map = ConfigMap::with_capacity(len.min(1024));
                for _ in 0..len {
                    let key = self.string_at()?;
                    let value = self.read_value(depth + 1)?;
                    map.insert(key, value);
                }
                ConfigValue::Object(map)
            }
            ValueTag::Serialized => {
                let len_offset = self.src.position();
                let raw = self.src.read_i32()?;
                let len = usize::try_from(raw)
                    .map_err(|_| LoadError::corrupt(len_offset, format!("negative payload length {}", raw)))?;
                if len > self.limits.max_string_length {
                    return Err(LoadError::corrupt(len_offset, format!("payload length {} exceeds limit", len)));
                }
                let text = self.src.read_string(len)?;
                self.serialized
                    .decode(&text)
                    .map_err(|e| LoadError::corrupt(offset, format!("serialized value: {}", e)))?
            }
        };
        Ok(value)
    }

    fn read_sections(&mut self) -> PntResult<(IndexMap<String, ConfigMap>, Vec<SectionInfo>)> {
        let count = self.read_count("section count")?;
        let mut sections: IndexMap<String, ConfigMap> = IndexMap::with_capacity(count.min(1024));
        let mut info = Vec::with_capacity(count.min(1024));

        for _ in 0..count {
            let name = self.string_at()?;
            let key_count = self.read_count("section key count")?;

            let entries = sections.entry(name.clone()).or_default();
            for _ in 0..key_count {
                let key_offset = self.src.position();
                let key_index = self.src.read_i32()?;
                let key = usize::try_from(key_index)
                    .ok()
                    .and_then(|i| self.strings.get(i))
                    .cloned()
                    .ok_or_else(|| {
                        LoadError::corrupt(
                            key_offset,
                            format!("string index {} out of range (len {})", key_index, self.strings.len()),
                        )
                    })?;
                let value_index = self.read_index("value", self.values.len())?;
                entries.insert(key, self.values[value_index].clone());
            }

            let is_optimized = self.src.read_bool()?;
            let access_frequency = self.src.read_i32()?;
            let computation_cost = self.src.read_i32()?;
            info.push(SectionInfo {
                name,
                key_count,
                is_optimized,
                access_frequency,
                computation_cost,
            });
        }
        Ok((sections, info))
    }
}
