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

//! Dynamic configuration values.

use std::fmt;

use indexmap::IndexMap;
use serde_json::Value as JsonValue;

/// Insertion-ordered map of configuration values.
pub type ConfigMap = IndexMap<String, ConfigValue>;

/// A decoded configuration value.
///
/// Mirrors the container's value tags: integers keep the width they were
/// written with, objects keep key order.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum ConfigValue {
    #[default]
    Null,
    Bool(bool),
    Int(i32),
    Long(i64),
    Double(f64),
    String(String),
    Array(Vec<ConfigValue>),
    Object(ConfigMap),
}

impl ConfigValue {
    /// Returns true for `Null`.
    pub fn is_null(&self) -> bool {
        matches!(self, ConfigValue::Null)
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            ConfigValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Integer value of `Int` or `Long`.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            ConfigValue::Int(n) => Some(i64::from(*n)),
            ConfigValue::Long(n) => Some(*n),
            _ => None,
        }
    }

    /// Numeric value of any number variant.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            ConfigValue::Int(n) => Some(f64::from(*n)),
            ConfigValue::Long(n) => Some(*n as f64),
            ConfigValue::Double(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            ConfigValue::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[ConfigValue]> {
        match self {
            ConfigValue::Array(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&ConfigMap> {
        match self {
            ConfigValue::Object(map) => Some(map),
            _ => None,
        }
    }

    pub fn as_object_mut(&mut self) -> Option<&mut ConfigMap> {
        match self {
            ConfigValue::Object(map) => Some(map),
            _ => None,
        }
    }

    /// Name of the variant, for diagnostics.
    pub fn type_name(&self) -> &'static str {
        match self {
            ConfigValue::Null => "null",
            ConfigValue::Bool(_) => "bool",
            ConfigValue::Int(_) => "int",
            ConfigValue::Long(_) => "long",
            ConfigValue::Double(_) => "double",
            ConfigValue::String(_) => "string",
            ConfigValue::Array(_) => "array",
            ConfigValue::Object(_) => "object",
        }
    }

    /// Convert to a JSON value. Non-finite doubles become `null`.
    pub fn to_json(&self) -> JsonValue {
        match self {
            ConfigValue::Null => JsonValue::Null,
            ConfigValue::Bool(b) => JsonValue::Bool(*b),
            ConfigValue::Int(n) => JsonValue::from(*n),
            ConfigValue::Long(n) => JsonValue::from(*n),
            ConfigValue::Double(n) => serde_json::Number::from_f64(*n)
                .map(JsonValue::Number)
                .unwrap_or(JsonValue::Null),
            ConfigValue::String(s) => JsonValue::String(s.clone()),
            ConfigValue::Array(items) => JsonValue::Array(items.iter().map(ConfigValue::to_json).collect()),
            ConfigValue::Object(map) => JsonValue::Object(
                map.iter().map(|(k, v)| (k.clone(), v.to_json())).collect(),
            ),
        }
    }

    /// Build from a JSON value.
    ///
    /// Integers take the narrowest of `Int`/`Long`; integers beyond `i64`
    /// become `Double`.
    pub fn from_json(json: &JsonValue) -> Self {
        match json {
            JsonValue::Null => ConfigValue::Null,
            JsonValue::Bool(b) => ConfigValue::Bool(*b),
            JsonValue::Number(n) => match n.as_i64() {
                Some(i) => ConfigValue::from(i),
                None => ConfigValue::Double(n.as_f64().unwrap_or(f64::NAN)),
            },
            JsonValue::String(s) => ConfigValue::String(s.clone()),
            JsonValue::Array(items) => ConfigValue::Array(items.iter().map(ConfigValue::from_json).collect()),
            JsonValue::Object(map) => ConfigValue::Object(
                map.iter().map(|(k, v)| (k.clone(), ConfigValue::from_json(v))).collect(),
            ),
        }
    }
}

impl fmt::Display for ConfigValue {
    /// Scalars render as plain text; arrays and objects as JSON.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigValue::Null => write!(f, "null"),
            ConfigValue::Bool(b) => write!(f, "{}", b),
            ConfigValue::Int(n) => write!(f, "{}", n),
            ConfigValue::Long(n) => write!(f, "{}", n),
            ConfigValue::Double(n) => write!(f, "{}", n),
            ConfigValue::String(s) => write!(f, "{}", s),
            ConfigValue::Array(_) | ConfigValue::Object(_) => write!(f, "{}", self.to_json()),
        }
    }
}

impl From<bool> for ConfigValue {
    fn from(b: bool) -> Self {
        ConfigValue::Bool(b)
    }
}

impl From<i32> for ConfigValue {
    fn from(n: i32) -> Self {
        ConfigValue::Int(n)
    }
}

impl From<i64> for ConfigValue {
    /// Narrows to `Int` when the value fits.
    fn from(n: i64) -> Self {
        match i32::try_from(n) {
            Ok(small) => ConfigValue::Int(small),
            Err(_) => ConfigValue::Long(n),
        }
    }
}

impl From<f64> for ConfigValue {
    fn from(n: f64) -> Self {
        ConfigValue::Double(n)
    }
}

impl From<&str> for ConfigValue {
    fn from(s: &str) -> Self {
        ConfigValue::String(s.to_string())
    }
}

impl From<String> for ConfigValue {
    fn from(s: String) -> Self {
        ConfigValue::String(s)
    }
}

impl From<Vec<ConfigValue>> for ConfigValue {
    fn from(items: Vec<ConfigValue>) -> Self {
        ConfigValue::Array(items)
    }
}

impl From<ConfigMap> for ConfigValue {
    fn from(map: ConfigMap) -> Self {
        ConfigValue::Object(map)
    }
}
