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

//! Queryable configuration store.
//!
//! A [`ConfigStore`] owns a nested settings tree plus a memo of every key
//! path resolved so far. Both live behind one lock, so a reader never sees
//! a half-merged tree or a stale memo entry.

use std::collections::HashMap;
use std::fmt;

use indexmap::IndexMap;
use parking_lot::Mutex;
use tracing::debug;

use crate::convert::{ConfigEnum, FromConfigValue};
use crate::value::{ConfigMap, ConfigValue};

/// Structural validation hook for [`ConfigStore::validate`].
pub trait ConfigSchema {
    /// Inspect `settings` and record findings in `result`.
    fn check(&self, settings: &ConfigMap, result: &mut ValidationResult);
}

/// Findings of a validation pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationResult {
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

impl ValidationResult {
    /// No errors were recorded. Warnings do not count.
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn error(&mut self, message: impl Into<String>) {
        self.errors.push(message.into());
    }

    pub fn warning(&mut self, message: impl Into<String>) {
        self.warnings.push(message.into());
    }
}

#[derive(Debug, Default)]
struct StoreInner {
    settings: ConfigMap,
    lookup: HashMap<String, Option<ConfigValue>>,
}

/// Configuration tree with dot-path lookup and typed conversion.
///
/// Keys resolve as follows:
///
/// - `a.b.c` selects top-level section `a`, then walks `b` and `c` as nested
///   map keys. There is no fallback to other sections.
/// - A single segment `k` is looked up in every top-level section in
///   insertion order and the first hit wins. If no section has it, `k` is
///   looked up directly at the top level.
///
/// # Example
///
/// ```
/// use tusk_pnt::{ConfigMap, ConfigStore, ConfigValue};
///
/// let mut db = ConfigMap::new();
/// db.insert("port".into(), ConfigValue::Int(5432));
/// let mut sections = indexmap::IndexMap::new();
/// sections.insert("db".to_string(), db);
///
/// let store = ConfigStore::from_sections(sections);
/// assert_eq!(store.get("db.port", 0u16), 5432);
/// assert_eq!(store.get("port", 0u16), 5432);
/// assert_eq!(store.get("db.user", String::from("admin")), "admin");
/// ```
#[derive(Default)]
pub struct ConfigStore {
    inner: Mutex<StoreInner>,
}

impl ConfigStore {
    /// Empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Store whose top level is one object per section.
    pub fn from_sections(sections: IndexMap<String, ConfigMap>) -> Self {
        let settings = sections
            .into_iter()
            .map(|(name, values)| (name, ConfigValue::Object(values)))
            .collect();
        Self::from_settings(settings)
    }

    /// Store over an arbitrary settings tree.
    pub fn from_settings(settings: ConfigMap) -> Self {
        Self {
            inner: Mutex::new(StoreInner {
                settings,
                lookup: HashMap::new(),
            }),
        }
    }

    /// Resolve `key` to a copy of its raw value.
    pub fn get_value(&self, key: &str) -> Option<ConfigValue> {
        let mut inner = self.inner.lock();
        if let Some(hit) = inner.lookup.get(key) {
            return hit.clone();
        }
        let found = resolve(&inner.settings, key).cloned();
        inner.lookup.insert(key.to_string(), found.clone());
        found
    }

    /// Resolve and convert `key`, or `None` if missing or not convertible.
    pub fn try_get<T: FromConfigValue>(&self, key: &str) -> Option<T> {
        self.get_value(key).and_then(|v| T::from_config_value(&v))
    }

    /// Resolve and convert `key`, falling back to `default`.
    pub fn get<T: FromConfigValue>(&self, key: &str, default: T) -> T {
        self.try_get(key).unwrap_or(default)
    }

    /// Array at `key` with every element converted, or `default` if the
    /// value is not an array or any element fails to convert.
    pub fn get_array<T: FromConfigValue>(&self, key: &str, default: Vec<T>) -> Vec<T> {
        match self.get_value(key) {
            Some(value @ ConfigValue::Array(_)) => Vec::<T>::from_config_value(&value).unwrap_or(default),
            _ => default,
        }
    }

    /// Enum variant named by the string at `key`.
    pub fn get_enum<E: ConfigEnum>(&self, key: &str, default: E) -> E {
        self.get_value(key)
            .as_ref()
            .and_then(ConfigValue::as_str)
            .and_then(E::from_name)
            .unwrap_or(default)
    }

    /// Child store over the object at `name`. Empty if absent or not an object.
    ///
    /// A single-segment `name` names a top-level section first; the section
    /// key search applies only when no top-level object has that name.
    pub fn get_section(&self, name: &str) -> ConfigStore {
        if !name.contains('.') {
            if let Some(ConfigValue::Object(map)) = self.inner.lock().settings.get(name) {
                return ConfigStore::from_settings(map.clone());
            }
        }
        match self.get_value(name) {
            Some(ConfigValue::Object(map)) => ConfigStore::from_settings(map),
            _ => ConfigStore::new(),
        }
    }

    pub fn has_key(&self, key: &str) -> bool {
        self.get_value(key).is_some()
    }

    /// Every dot-path in the tree, depth-first, each object before its children.
    pub fn keys(&self) -> Vec<String> {
        let inner = self.inner.lock();
        let mut out = Vec::new();
        collect_keys(&inner.settings, "", &mut out);
        out
    }

    /// Snapshot of the top level.
    pub fn all_settings(&self) -> ConfigMap {
        self.inner.lock().settings.clone()
    }

    /// Number of top-level entries.
    pub fn len(&self) -> usize {
        self.inner.lock().settings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.lock().settings.is_empty()
    }

    /// Deep-merge `other` into this store. Where both sides hold an object
    /// the merge recurses; otherwise the value from `other` wins.
    ///
    /// Takes `&mut self` so a store shared through an `Arc` (such as one
    /// served from the loader cache) cannot be changed under other holders.
    pub fn merge(&mut self, other: &ConfigStore) {
        let incoming = other.all_settings();
        let inner = self.inner.get_mut();
        deep_merge(&mut inner.settings, incoming);
        inner.lookup.clear();
        debug!("Merged store, {} top-level entries", inner.settings.len());
    }

    /// Leaves keyed by their full path joined with `separator`.
    pub fn export_flattened(&self, separator: &str) -> ConfigMap {
        let inner = self.inner.lock();
        let mut out = ConfigMap::new();
        flatten_into(&inner.settings, "", separator, &mut out);
        out
    }

    /// Run structural checks, then `schema` if given.
    ///
    /// Null and empty-string leaves are reported as warnings.
    pub fn validate(&self, schema: Option<&dyn ConfigSchema>) -> ValidationResult {
        let settings = self.all_settings();
        let mut result = ValidationResult::default();
        check_leaves(&settings, "", &mut result);
        if let Some(schema) = schema {
            schema.check(&settings, &mut result);
        }
        result
    }

    /// Drop every memoized lookup.
    pub fn clear_lookup_cache(&self) {
        self.inner.lock().lookup.clear();
    }

    #[cfg(test)]
    fn cached_lookups(&self) -> usize {
        self.inner.lock().lookup.len()
    }
}

impl Clone for ConfigStore {
    fn clone(&self) -> Self {
        ConfigStore::from_settings(self.all_settings())
    }
}

impl PartialEq for ConfigStore {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self, other) || self.all_settings() == other.all_settings()
    }
}

impl fmt::Debug for ConfigStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConfigStore")
            .field("settings", &self.inner.lock().settings)
            .finish()
    }
}

impl From<ConfigMap> for ConfigStore {
    fn from(settings: ConfigMap) -> Self {
        ConfigStore::from_settings(settings)
    }
}

fn resolve<'a>(settings: &'a ConfigMap, key: &str) -> Option<&'a ConfigValue> {
    let mut segments = key.split('.');
    let first = segments.next()?;
    let rest: Vec<&str> = segments.collect();

    if rest.is_empty() {
        return settings
            .values()
            .filter_map(ConfigValue::as_object)
            .find_map(|section| section.get(first))
            .or_else(|| settings.get(first));
    }

    let mut current = settings.get(first)?;
    for segment in rest {
        current = current.as_object()?.get(segment)?;
    }
    Some(current)
}

fn join(prefix: &str, separator: &str, key: &str) -> String {
    if prefix.is_empty() {
        key.to_string()
    } else {
        format!("{}{}{}", prefix, separator, key)
    }
}

fn collect_keys(map: &ConfigMap, prefix: &str, out: &mut Vec<String>) {
    for (key, value) in map {
        let path = join(prefix, ".", key);
        out.push(path.clone());
        if let ConfigValue::Object(child) = value {
            collect_keys(child, &path, out);
        }
    }
}

fn flatten_into(map: &ConfigMap, prefix: &str, separator: &str, out: &mut ConfigMap) {
    for (key, value) in map {
        let path = join(prefix, separator, key);
        match value {
            ConfigValue::Object(child) => flatten_into(child, &path, separator, out),
            leaf => {
                out.insert(path, leaf.clone());
            }
        }
    }
}

fn deep_merge(target: &mut ConfigMap, incoming: ConfigMap) {
    for (key, value) in incoming {
        if let ConfigValue::Object(theirs) = value {
            if let Some(ConfigValue::Object(ours)) = target.get_mut(&key) {
                deep_merge(ours, theirs);
                continue;
            }
            target.insert(key, ConfigValue::Object(theirs));
            continue;
        }
        target.insert(key, value);
    }
}

fn check_leaves(map: &ConfigMap, prefix: &str, result: &mut ValidationResult) {
    for (key, value) in map {
        let path = join(prefix, ".", key);
        match value {
            ConfigValue::Object(child) => check_leaves(child, &path, result),
            ConfigValue::Null => result.warning(format!("'{}' is null", path)),
            ConfigValue::String(s) if s.is_empty() => result.warning(format!("'{}' is an empty string", path)),
            _ => {}
        }
    }
}
