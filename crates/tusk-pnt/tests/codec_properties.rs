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

//! Property-based tests for the container codec.

use indexmap::IndexMap;
use proptest::prelude::*;
use tusk_pnt::{Compression, ConfigMap, ConfigValue, ContainerDecoder, ContainerWriter};

fn leaf() -> impl Strategy<Value = ConfigValue> {
    prop_oneof![
        Just(ConfigValue::Null),
        any::<bool>().prop_map(ConfigValue::Bool),
        any::<i32>().prop_map(ConfigValue::Int),
        any::<i64>().prop_map(ConfigValue::Long),
        (-1.0e12f64..1.0e12).prop_map(ConfigValue::Double),
        "\\PC{0,24}".prop_map(ConfigValue::String),
    ]
}

fn value() -> impl Strategy<Value = ConfigValue> {
    leaf().prop_recursive(3, 24, 4, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..4).prop_map(ConfigValue::Array),
            prop::collection::vec(("[a-z]{1,6}", inner), 0..4)
                .prop_map(|pairs| ConfigValue::Object(pairs.into_iter().collect())),
        ]
    })
}

fn sections() -> impl Strategy<Value = IndexMap<String, ConfigMap>> {
    prop::collection::vec(
        (
            "[a-z]{1,8}",
            prop::collection::vec(("[a-z_]{1,8}", value()), 0..6).prop_map(|pairs| pairs.into_iter().collect::<ConfigMap>()),
        ),
        0..5,
    )
    .prop_map(|pairs| pairs.into_iter().collect())
}

fn writer_for(sections: &IndexMap<String, ConfigMap>) -> ContainerWriter {
    sections
        .iter()
        .fold(ContainerWriter::new(), |w, (name, values)| w.with_section(name.clone(), values.clone()))
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// Property: decoding what the writer produced gives back the same sections.
    #[test]
    fn prop_roundtrip_plain(input in sections()) {
        let bytes = writer_for(&input).to_bytes().unwrap();
        let decoded = ContainerDecoder::default().decode_slice(&bytes).unwrap();
        prop_assert_eq!(decoded.sections, input);
    }

    /// Property: gzip bodies decode to the same sections by either reader.
    #[test]
    fn prop_roundtrip_gzip_both_readers(input in sections()) {
        let bytes = writer_for(&input).with_compression(Compression::Gzip).to_bytes().unwrap();
        let decoder = ContainerDecoder::default();
        let by_slice = decoder.decode_slice(&bytes).unwrap();
        let by_stream = decoder.decode_stream(bytes.as_slice()).unwrap();
        prop_assert_eq!(&by_slice.sections, &input);
        prop_assert_eq!(by_stream.sections, input);
    }

    /// Property: embedding composites as JSON text loses nothing, integer
    /// width included.
    #[test]
    fn prop_roundtrip_serialized_composites(input in sections()) {
        let bytes = writer_for(&input).with_serialized_composites(true).to_bytes().unwrap();
        let decoder = ContainerDecoder::default();
        let by_slice = decoder.decode_slice(&bytes).unwrap();
        let by_stream = decoder.decode_stream(bytes.as_slice()).unwrap();
        prop_assert_eq!(&by_slice.sections, &input);
        prop_assert_eq!(by_stream.sections, input);
    }

    /// Property: the sequential and offset readers agree on any input.
    #[test]
    fn prop_readers_agree_on_garbage(mut tail in prop::collection::vec(any::<u8>(), 0..96)) {
        let mut bytes = ContainerWriter::new().with_compiler_version("").to_bytes().unwrap();
        bytes.truncate(tusk_pnt::FIXED_HEADER_LEN);
        bytes.append(&mut tail);
        let decoder = ContainerDecoder::default();
        let by_slice = decoder.decode_slice(&bytes).map(|d| d.sections).map_err(|e| e.kind());
        let by_stream = decoder.decode_stream(bytes.as_slice()).map(|d| d.sections).map_err(|e| e.kind());
        prop_assert_eq!(by_slice, by_stream);
    }
}
