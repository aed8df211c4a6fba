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

//! Integration tests for the binary loader and configuration store.

use std::fs::{self, File};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, SystemTime};

use tusk_pnt::{
    BinaryLoader, Compression, ConfigMap, ConfigValue, ContainerWriter, LoadError, LoadErrorKind, LoaderOptions,
    HIERARCHY_FILE_NAME,
};

// ==================== Helpers ====================

fn map(pairs: Vec<(&str, ConfigValue)>) -> ConfigMap {
    pairs.into_iter().map(|(k, v)| (k.to_string(), v)).collect()
}

fn sample_writer() -> ContainerWriter {
    ContainerWriter::new()
        .with_source_file("app.tsk")
        .with_section(
            "db",
            map(vec![
                ("host", ConfigValue::from("x")),
                ("nested", ConfigValue::Object(map(vec![("port", ConfigValue::Int(5432))]))),
            ]),
        )
        .with_section(
            "features",
            map(vec![
                ("a", ConfigValue::from("yes")),
                ("b", ConfigValue::from("On")),
                ("c", ConfigValue::from("1")),
                ("d", ConfigValue::from("no")),
                ("e", ConfigValue::from("Off")),
                ("f", ConfigValue::from("0")),
                ("tags", ConfigValue::Array(vec![ConfigValue::from("x"), ConfigValue::from("y")])),
            ]),
        )
}

fn write(dir: &Path, name: &str, bytes: &[u8]) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, bytes).unwrap();
    path
}

fn touch_forward(path: &Path) {
    let file = File::options().write(true).open(path).unwrap();
    file.set_modified(SystemTime::now() + Duration::from_secs(60)).unwrap();
}

fn buffered_loader() -> BinaryLoader {
    BinaryLoader::new(LoaderOptions::builder().mmap_threshold(u64::MAX).build())
}

fn mapped_loader() -> BinaryLoader {
    BinaryLoader::new(LoaderOptions::builder().mmap_threshold(0).build())
}

// ==================== Store queries ====================

#[tokio::test]
async fn test_dot_path_lookup() {
    let dir = tempfile::tempdir().unwrap();
    let path = write(dir.path(), "app.pnt", &sample_writer().to_bytes().unwrap());
    let store = BinaryLoader::default().load(&path).await.into_store().unwrap();

    assert_eq!(store.get("db.host", String::new()), "x");
    assert_eq!(store.get("db.nested.port", 0i32), 5432);
    assert_eq!(store.get("missing.path", 7i32), 7);
}

#[tokio::test]
async fn test_boolean_words() {
    let dir = tempfile::tempdir().unwrap();
    let path = write(dir.path(), "app.pnt", &sample_writer().to_bytes().unwrap());
    let store = BinaryLoader::default().load(&path).await.into_store().unwrap();

    for key in ["features.a", "features.b", "features.c"] {
        assert!(store.get(key, false), "{} should be true", key);
    }
    for key in ["features.d", "features.e", "features.f"] {
        assert!(!store.get(key, true), "{} should be false", key);
    }
    assert_eq!(store.get_array::<String>("features.tags", vec![]), vec!["x", "y"]);
}

#[tokio::test]
async fn test_merge_into_loaded_store() {
    let dir = tempfile::tempdir().unwrap();
    let path = write(dir.path(), "app.pnt", &sample_writer().to_bytes().unwrap());
    let loader = BinaryLoader::default();
    let loaded = loader.load(&path).await.into_store().unwrap();
    let mut store = (*loaded).clone();

    let overlay = ContainerWriter::new()
        .with_section("db", map(vec![("host", ConfigValue::from("y"))]))
        .to_bytes()
        .unwrap();
    let overlay = loader.load_from_bytes(&overlay, "overlay").into_store().unwrap();

    assert_eq!(store.get("db.host", String::new()), "x");
    store.merge(&overlay);
    assert_eq!(store.get("db.host", String::new()), "y");
    assert_eq!(store.get("db.nested.port", 0i32), 5432);
    // the cached original is untouched
    assert_eq!(loaded.get("db.host", String::new()), "x");

    let again = loader.load(&path).await;
    assert!(again.from_cache);
    assert_eq!(again.store().unwrap().get("db.host", String::new()), "x");
}

// ==================== Cache ====================

#[tokio::test]
async fn test_cache_is_idempotent() {
    let dir = tempfile::tempdir().unwrap();
    let path = write(dir.path(), "app.pnt", &sample_writer().to_bytes().unwrap());
    let loader = BinaryLoader::default();

    let first = loader.load(&path).await;
    let second = loader.load(&path).await;
    assert!(!first.from_cache);
    assert!(second.from_cache);
    assert_eq!(first.store().unwrap().all_settings(), second.store().unwrap().all_settings());
}

#[tokio::test]
async fn test_mtime_change_invalidates_cache() {
    let dir = tempfile::tempdir().unwrap();
    let path = write(dir.path(), "app.pnt", &sample_writer().to_bytes().unwrap());
    let loader = BinaryLoader::default();

    assert!(!loader.load(&path).await.from_cache);
    assert!(loader.load(&path).await.from_cache);

    let updated = ContainerWriter::new()
        .with_section("db", map(vec![("host", ConfigValue::from("z"))]))
        .to_bytes()
        .unwrap();
    fs::write(&path, updated).unwrap();
    touch_forward(&path);

    let reloaded = loader.load(&path).await;
    assert!(!reloaded.from_cache);
    assert_eq!(reloaded.store().unwrap().get("db.host", String::new()), "z");
    assert_eq!(loader.statistics().cached_files, 1);
}

#[tokio::test]
async fn test_statistics_evict_and_clear() {
    let dir = tempfile::tempdir().unwrap();
    let bytes = sample_writer().to_bytes().unwrap();
    let a = write(dir.path(), "a.pnt", &bytes);
    let b = write(dir.path(), "b.pnt", &bytes);
    let loader = BinaryLoader::default();

    loader.load(&a).await;
    loader.load(&b).await;
    loader.load(&a).await;

    let stats = loader.statistics();
    assert_eq!(stats.cached_files, 2);
    assert_eq!(stats.total_cache_bytes, 2 * bytes.len() as u64);
    assert_eq!(stats.cache_hits, 1);
    assert_eq!(stats.cache_misses, 2);

    assert!(loader.evict(&a));
    assert_eq!(loader.statistics().cached_files, 1);
    assert!(!loader.load(&a).await.from_cache);

    loader.dispose();
    assert_eq!(loader.statistics().cached_files, 0);
}

// ==================== Read paths ====================

#[tokio::test]
async fn test_buffered_and_mapped_paths_agree() {
    let dir = tempfile::tempdir().unwrap();
    let plain = write(dir.path(), "plain.pnt", &sample_writer().to_bytes().unwrap());
    let gzip = write(
        dir.path(),
        "gzip.pnt",
        &sample_writer().with_compression(Compression::Gzip).to_bytes().unwrap(),
    );

    for path in [&plain, &gzip] {
        let buffered = buffered_loader().load(path).await;
        let mapped = mapped_loader().load(path).await;
        assert!(!buffered.memory_mapped);
        assert!(mapped.memory_mapped);
        assert_eq!(
            buffered.into_store().unwrap().all_settings(),
            mapped.into_store().unwrap().all_settings()
        );
    }
}

#[tokio::test]
async fn test_threshold_is_strictly_greater() {
    let dir = tempfile::tempdir().unwrap();
    let bytes = sample_writer().to_bytes().unwrap();
    let path = write(dir.path(), "app.pnt", &bytes);
    let len = bytes.len() as u64;

    let at = BinaryLoader::new(LoaderOptions::builder().mmap_threshold(len).build());
    let below = BinaryLoader::new(LoaderOptions::builder().mmap_threshold(len - 1).build());
    assert!(!at.load(&path).await.memory_mapped);
    assert!(below.load(&path).await.memory_mapped);

    let off = BinaryLoader::new(
        LoaderOptions::builder()
            .mmap_threshold(0)
            .enable_memory_mapping(false)
            .build(),
    );
    assert!(!off.load(&path).await.memory_mapped);
}

// ==================== Rejection ====================

fn with_bad_signature() -> Vec<u8> {
    let mut bytes = sample_writer().to_bytes().unwrap();
    bytes[..4].copy_from_slice(&0u32.to_le_bytes());
    bytes
}

fn with_bad_version() -> Vec<u8> {
    let mut bytes = sample_writer().to_bytes().unwrap();
    bytes[4..6].copy_from_slice(&2u16.to_le_bytes());
    bytes
}

#[tokio::test]
async fn test_header_rejection_on_every_path() {
    let dir = tempfile::tempdir().unwrap();
    for (name, bytes) in [("sig.pnt", with_bad_signature()), ("ver.pnt", with_bad_version())] {
        let path = write(dir.path(), name, &bytes);
        for loader in [buffered_loader(), mapped_loader()] {
            let result = loader.load(&path).await;
            assert_eq!(result.error().map(LoadError::kind), Some(LoadErrorKind::InvalidFormat));
            assert_eq!(loader.statistics().cached_files, 0);
        }
        let result = BinaryLoader::default().load_from_bytes(&bytes, name);
        assert_eq!(result.error().map(LoadError::kind), Some(LoadErrorKind::InvalidFormat));
    }
}

#[tokio::test]
async fn test_truncated_file_is_corrupt() {
    let dir = tempfile::tempdir().unwrap();
    let bytes = sample_writer().to_bytes().unwrap();
    let path = write(dir.path(), "cut.pnt", &bytes[..bytes.len() - 5]);

    for loader in [buffered_loader(), mapped_loader()] {
        let result = loader.load(&path).await;
        assert_eq!(result.error().map(LoadError::kind), Some(LoadErrorKind::CorruptData));
    }
}

// ==================== Batch loading ====================

#[tokio::test]
async fn test_preload_keeps_going_past_failures() {
    let dir = tempfile::tempdir().unwrap();
    let bytes = sample_writer().to_bytes().unwrap();
    let good_a = write(dir.path(), "a.pnt", &bytes);
    let bad = write(dir.path(), "bad.pnt", b"not a container");
    let good_b = write(dir.path(), "b.pnt", &bytes);
    let missing = dir.path().join("missing.pnt");

    let loader = BinaryLoader::new(LoaderOptions::builder().max_concurrency(2).build());
    let batch = loader
        .preload(vec![good_a.clone(), bad.clone(), good_b.clone(), missing.clone()])
        .await;

    assert_eq!(batch.results.len(), 4);
    assert_eq!(batch.succeeded, 2);
    assert_eq!(batch.failed, 2);
    assert!(!batch.all_succeeded());
    assert_eq!(batch.total_bytes, 2 * bytes.len() as u64);

    let paths: Vec<_> = batch.results.iter().map(|r| r.path.clone()).collect();
    assert_eq!(paths, vec![good_a, bad, good_b, missing]);
    assert_eq!(batch.results[1].error().map(LoadError::kind), Some(LoadErrorKind::InvalidFormat));
    assert_eq!(batch.results[3].error().map(LoadError::kind), Some(LoadErrorKind::NotFound));
    assert_eq!(loader.statistics().cached_files, 2);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_loads_share_one_loader() {
    let dir = tempfile::tempdir().unwrap();
    let path = write(dir.path(), "app.pnt", &sample_writer().to_bytes().unwrap());
    let loader = BinaryLoader::default();

    let mut handles = Vec::new();
    for _ in 0..8 {
        let loader = loader.clone();
        let path = path.clone();
        handles.push(tokio::spawn(async move { loader.load(&path).await.into_store().unwrap() }));
    }
    for handle in handles {
        let store: Arc<_> = handle.await.unwrap();
        assert_eq!(store.get("db.host", String::new()), "x");
    }
    assert_eq!(loader.statistics().cached_files, 1);
}

// ==================== Hierarchy ====================

#[tokio::test]
async fn test_hierarchy_closer_files_win() {
    let dir = tempfile::tempdir().unwrap();
    let child = dir.path().join("service");
    fs::create_dir(&child).unwrap();

    let root_bytes = ContainerWriter::new()
        .with_section(
            "db",
            map(vec![("host", ConfigValue::from("root")), ("port", ConfigValue::Int(1))]),
        )
        .to_bytes()
        .unwrap();
    let child_bytes = ContainerWriter::new()
        .with_section("db", map(vec![("host", ConfigValue::from("child"))]))
        .to_bytes()
        .unwrap();
    write(dir.path(), HIERARCHY_FILE_NAME, &root_bytes);
    write(&child, HIERARCHY_FILE_NAME, &child_bytes);

    let store = BinaryLoader::default().load_hierarchy(&child).await.unwrap();
    assert_eq!(store.get("db.host", String::new()), "child");
    assert_eq!(store.get("db.port", 0i32), 1);
}

#[tokio::test]
async fn test_hierarchy_missing_dir() {
    let dir = tempfile::tempdir().unwrap();
    let err = BinaryLoader::default()
        .load_hierarchy(dir.path().join("gone"))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), LoadErrorKind::NotFound);
}
