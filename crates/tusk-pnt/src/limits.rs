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

//! Resource limits for decoding untrusted containers.

/// Bounds applied while decoding a container body.
///
/// Counts and lengths in the container are attacker-controlled; these limits
/// stop a small file from requesting huge allocations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodeLimits {
    /// Maximum length of one string table entry in bytes (default: 16MB).
    pub max_string_length: usize,
    /// Maximum entry count of any table, array or object (default: 10M).
    pub max_table_entries: usize,
    /// Maximum array/object nesting depth (default: 128).
    pub max_nesting_depth: usize,
    /// Maximum size of an inflated gzip body in bytes (default: 1GB).
    pub max_decompressed_size: u64,
}

impl Default for DecodeLimits {
    fn default() -> Self {
        Self {
            max_string_length: 16 * 1024 * 1024,        // 16MB
            max_table_entries: 10_000_000,              // 10M
            max_nesting_depth: 128,
            max_decompressed_size: 1024 * 1024 * 1024, // 1GB
        }
    }
}

impl DecodeLimits {
    /// Limits with no restrictions (for trusted input and tests).
    pub fn unlimited() -> Self {
        Self {
            max_string_length: usize::MAX,
            max_table_entries: usize::MAX,
            max_nesting_depth: usize::MAX,
            max_decompressed_size: u64::MAX,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_limits() {
        let limits = DecodeLimits::default();
        assert_eq!(limits.max_string_length, 16 * 1024 * 1024);
        assert_eq!(limits.max_table_entries, 10_000_000);
        assert_eq!(limits.max_nesting_depth, 128);
        assert_eq!(limits.max_decompressed_size, 1024 * 1024 * 1024);
    }

    #[test]
    fn test_unlimited() {
        let limits = DecodeLimits::unlimited();
        assert_eq!(limits.max_table_entries, usize::MAX);
        assert_eq!(limits.max_decompressed_size, u64::MAX);
    }
}
