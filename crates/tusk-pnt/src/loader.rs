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

//! Asynchronous container loader with a path-keyed cache.
//!
//! Decoding runs on the blocking thread pool. Files above
//! [`LoaderOptions::mmap_threshold`] are memory-mapped and decoded by offset;
//! smaller files go through a buffered sequential reader. Both paths produce
//! identical stores.
//!
//! # Cache
//!
//! Each cached entry remembers the modification time and size the file had
//! when it was decoded. A later `load` with different metadata evicts the
//! entry and decodes again. The cache lock is held for map operations only,
//! never across I/O.

use std::collections::HashMap;
use std::fs::{self, File};
use std::io::{self, BufReader};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant, SystemTime};

use memmap2::Mmap;
use parking_lot::Mutex;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{debug, info, warn};

use crate::decode::{ContainerDecoder, DecodedContainer, JsonDecoder, SerializedDecoder};
use crate::error::{LoadError, PntResult};
use crate::format::ContainerInfo;
use crate::hierarchy::find_hierarchy;
use crate::limits::DecodeLimits;
use crate::store::ConfigStore;

/// Default size above which files are memory-mapped (1 MiB).
pub const DEFAULT_MMAP_THRESHOLD: u64 = 1024 * 1024;

/// Loader configuration.
#[derive(Debug, Clone)]
pub struct LoaderOptions {
    /// Keep decoded stores keyed by path.
    pub enable_caching: bool,
    /// Allow the memory-mapped path for large files.
    pub enable_memory_mapping: bool,
    /// Files strictly larger than this many bytes are memory-mapped.
    pub mmap_threshold: u64,
    /// Upper bound on concurrent loads in [`BinaryLoader::preload`].
    pub max_concurrency: usize,
    /// Decoder resource limits.
    pub limits: DecodeLimits,
    /// Decoder for serialized (tag `0xFF`) payloads.
    pub serialized_decoder: Arc<dyn SerializedDecoder>,
}

impl Default for LoaderOptions {
    fn default() -> Self {
        Self {
            enable_caching: true,
            enable_memory_mapping: true,
            mmap_threshold: DEFAULT_MMAP_THRESHOLD,
            max_concurrency: default_concurrency(),
            limits: DecodeLimits::default(),
            serialized_decoder: Arc::new(JsonDecoder),
        }
    }
}

impl LoaderOptions {
    /// Create a new builder for LoaderOptions.
    pub fn builder() -> LoaderOptionsBuilder {
        LoaderOptionsBuilder::new()
    }
}

fn default_concurrency() -> usize {
    std::thread::available_parallelism().map(|n| n.get()).unwrap_or(4)
}

/// Builder for [`LoaderOptions`].
///
/// ```
/// use tusk_pnt::LoaderOptions;
///
/// let opts = LoaderOptions::builder()
///     .mmap_threshold(0)
///     .max_concurrency(2)
///     .enable_caching(false)
///     .build();
/// assert_eq!(opts.max_concurrency, 2);
/// ```
#[derive(Debug, Clone)]
pub struct LoaderOptionsBuilder {
    options: LoaderOptions,
}

impl Default for LoaderOptionsBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl LoaderOptionsBuilder {
    /// Create a new builder with default options.
    pub fn new() -> Self {
        Self {
            options: LoaderOptions::default(),
        }
    }

    pub fn enable_caching(mut self, enabled: bool) -> Self {
        self.options.enable_caching = enabled;
        self
    }

    pub fn enable_memory_mapping(mut self, enabled: bool) -> Self {
        self.options.enable_memory_mapping = enabled;
        self
    }

    /// Set the mapping threshold in bytes (default: 1 MiB).
    pub fn mmap_threshold(mut self, bytes: u64) -> Self {
        self.options.mmap_threshold = bytes;
        self
    }

    /// Set the preload concurrency. Zero is treated as one.
    pub fn max_concurrency(mut self, n: usize) -> Self {
        self.options.max_concurrency = n.max(1);
        self
    }

    pub fn limits(mut self, limits: DecodeLimits) -> Self {
        self.options.limits = limits;
        self
    }

    pub fn serialized_decoder(mut self, decoder: Arc<dyn SerializedDecoder>) -> Self {
        self.options.serialized_decoder = decoder;
        self
    }

    pub fn build(self) -> LoaderOptions {
        self.options
    }
}

/// Cache entry for one decoded file.
///
/// Owns the memory map when the mapped path was used; dropping the entry
/// unmaps the file.
#[derive(Debug)]
pub struct LoadedBinary {
    store: Arc<ConfigStore>,
    info: ContainerInfo,
    file_size: u64,
    modified: Option<SystemTime>,
    loaded_at: SystemTime,
    load_time: Duration,
    mapping: Option<Mmap>,
}

impl LoadedBinary {
    pub fn store(&self) -> &Arc<ConfigStore> {
        &self.store
    }

    pub fn info(&self) -> &ContainerInfo {
        &self.info
    }

    pub fn file_size(&self) -> u64 {
        self.file_size
    }

    pub fn loaded_at(&self) -> SystemTime {
        self.loaded_at
    }

    pub fn load_time(&self) -> Duration {
        self.load_time
    }

    pub fn is_memory_mapped(&self) -> bool {
        self.mapping.is_some()
    }

    /// The mapped file contents, if this entry was memory-mapped.
    pub fn raw_bytes(&self) -> Option<&[u8]> {
        self.mapping.as_deref()
    }

    fn is_fresh(&self, metadata: &fs::Metadata) -> bool {
        metadata.len() == self.file_size && metadata.modified().ok() == self.modified
    }
}

/// Outcome of loading one file.
#[derive(Debug)]
pub struct LoadResult {
    pub path: PathBuf,
    pub outcome: Result<Arc<ConfigStore>, LoadError>,
    pub load_time: Duration,
    pub file_size: u64,
    pub from_cache: bool,
    pub memory_mapped: bool,
}

impl LoadResult {
    fn failed(path: PathBuf, error: LoadError, started: Instant) -> Self {
        Self {
            path,
            outcome: Err(error),
            load_time: started.elapsed(),
            file_size: 0,
            from_cache: false,
            memory_mapped: false,
        }
    }

    pub fn is_success(&self) -> bool {
        self.outcome.is_ok()
    }

    /// The loaded store.
    ///
    /// Stores served from the cache are shared and read-only; clone one to merge into it.
    pub fn store(&self) -> Option<&Arc<ConfigStore>> {
        self.outcome.as_ref().ok()
    }

    pub fn error(&self) -> Option<&LoadError> {
        self.outcome.as_ref().err()
    }

    pub fn into_store(self) -> PntResult<Arc<ConfigStore>> {
        self.outcome
    }
}

/// Aggregate outcome of [`BinaryLoader::preload`].
#[derive(Debug)]
pub struct BatchLoadResult {
    /// One result per input path, in input order.
    pub results: Vec<LoadResult>,
    pub succeeded: usize,
    pub failed: usize,
    /// Sum of file sizes of successful loads.
    pub total_bytes: u64,
    pub elapsed: Duration,
}

impl BatchLoadResult {
    pub fn all_succeeded(&self) -> bool {
        self.failed == 0
    }
}

/// Snapshot of loader counters.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LoaderStatistics {
    pub cached_files: usize,
    pub memory_mapped_files: usize,
    /// Sum of file sizes of cached entries.
    pub total_cache_bytes: u64,
    pub cache_hits: u64,
    pub cache_misses: u64,
    /// Successful decodes.
    pub loads: u64,
    pub failures: u64,
    /// Mean decode time over successful decodes.
    pub average_load_time: Duration,
}

impl LoaderStatistics {
    /// Cache hit rate (0.0 to 1.0).
    pub fn hit_rate(&self) -> f64 {
        let total = self.cache_hits + self.cache_misses;
        if total == 0 {
            0.0
        } else {
            self.cache_hits as f64 / total as f64
        }
    }
}

#[derive(Debug, Default)]
struct Counters {
    hits: AtomicU64,
    misses: AtomicU64,
    loads: AtomicU64,
    failures: AtomicU64,
    load_micros: AtomicU64,
}

#[derive(Debug)]
struct LoaderInner {
    options: LoaderOptions,
    decoder: ContainerDecoder,
    cache: Mutex<HashMap<PathBuf, LoadedBinary>>,
    counters: Counters,
}

/// Loads compiled containers from disk or memory.
///
/// Cloning is cheap and clones share the cache.
#[derive(Debug, Clone)]
pub struct BinaryLoader {
    inner: Arc<LoaderInner>,
}

impl Default for BinaryLoader {
    fn default() -> Self {
        Self::new(LoaderOptions::default())
    }
}

impl BinaryLoader {
    pub fn new(options: LoaderOptions) -> Self {
        let decoder = ContainerDecoder::new(options.limits.clone(), Arc::clone(&options.serialized_decoder));
        Self {
            inner: Arc::new(LoaderInner {
                options,
                decoder,
                cache: Mutex::new(HashMap::new()),
                counters: Counters::default(),
            }),
        }
    }

    pub fn options(&self) -> &LoaderOptions {
        &self.inner.options
    }

    /// Load `path`, serving it from the cache when the file is unchanged.
    ///
    /// Never panics on malformed input; failures come back in
    /// [`LoadResult::outcome`].
    pub async fn load(&self, path: impl AsRef<Path>) -> LoadResult {
        let path = path.as_ref().to_path_buf();
        let started = Instant::now();
        let inner = Arc::clone(&self.inner);
        let task_path = path.clone();

        match tokio::task::spawn_blocking(move || inner.load_file(task_path)).await {
            Ok(result) => result,
            Err(e) => {
                self.inner.counters.failures.fetch_add(1, Ordering::Relaxed);
                let error = io::Error::new(io::ErrorKind::Other, format!("load task failed: {}", e));
                LoadResult::failed(path, LoadError::Io(error), started)
            }
        }
    }

    /// Decode an in-memory container. Bypasses the cache.
    pub fn load_from_bytes(&self, bytes: &[u8], name: impl Into<PathBuf>) -> LoadResult {
        let path = name.into();
        let started = Instant::now();
        match self.inner.decoder.decode_slice(bytes) {
            Ok(decoded) => {
                let load_time = started.elapsed();
                self.inner.record_load(load_time);
                LoadResult {
                    path,
                    outcome: Ok(Arc::new(decoded.into_store())),
                    load_time,
                    file_size: bytes.len() as u64,
                    from_cache: false,
                    memory_mapped: false,
                }
            }
            Err(e) => {
                self.inner.counters.failures.fetch_add(1, Ordering::Relaxed);
                debug!("Failed to decode {}: {}", path.display(), e);
                LoadResult::failed(path, e, started)
            }
        }
    }

    /// Load many files with bounded concurrency.
    ///
    /// A failed file is reported in its slot and does not stop the batch.
    pub async fn preload<I, P>(&self, paths: I) -> BatchLoadResult
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        let started = Instant::now();
        let paths: Vec<PathBuf> = paths.into_iter().map(Into::into).collect();
        let semaphore = Arc::new(Semaphore::new(self.inner.options.max_concurrency.max(1)));
        let mut tasks = JoinSet::new();

        for (index, path) in paths.iter().cloned().enumerate() {
            let permit = semaphore.clone().acquire_owned().await;
            let loader = self.clone();
            tasks.spawn(async move {
                let _permit = permit;
                (index, loader.load(path).await)
            });
        }

        let mut slots: Vec<Option<LoadResult>> = paths.iter().map(|_| None).collect();
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((index, result)) => slots[index] = Some(result),
                Err(e) => warn!("Preload task failed: {}", e),
            }
        }

        let results: Vec<LoadResult> = slots
            .into_iter()
            .zip(paths)
            .map(|(slot, path)| {
                slot.unwrap_or_else(|| {
                    let error = io::Error::new(io::ErrorKind::Other, "load task failed");
                    LoadResult::failed(path, LoadError::Io(error), started)
                })
            })
            .collect();

        let succeeded = results.iter().filter(|r| r.is_success()).count();
        let failed = results.len() - succeeded;
        let total_bytes = results.iter().filter(|r| r.is_success()).map(|r| r.file_size).sum();
        let elapsed = started.elapsed();
        info!(
            "Preloaded {} files: {} succeeded, {} failed, {} bytes in {:?}",
            results.len(),
            succeeded,
            failed,
            total_bytes,
            elapsed
        );

        BatchLoadResult {
            results,
            succeeded,
            failed,
            total_bytes,
            elapsed,
        }
    }

    /// Load every `peanu.pnt` from the filesystem root down to `dir` and
    /// merge them, closer directories overriding.
    pub async fn load_hierarchy(&self, dir: impl AsRef<Path>) -> PntResult<ConfigStore> {
        let dir = dir.as_ref().to_path_buf();
        let search_dir = dir.clone();
        let files = tokio::task::spawn_blocking(move || find_hierarchy(&search_dir))
            .await
            .map_err(|e| LoadError::Io(io::Error::new(io::ErrorKind::Other, format!("Task join error: {}", e))))?
            .map_err(|e| LoadError::from_io(e, &dir))?;

        let mut merged = ConfigStore::new();
        for file in &files {
            let store = self.load(file).await.into_store()?;
            merged.merge(&store);
        }
        debug!("Loaded hierarchy for {}: {} files", dir.display(), files.len());
        Ok(merged)
    }

    /// Run `f` on the cache entry for `path`, if present.
    ///
    /// The cache lock is held while `f` runs; keep it short.
    pub fn with_cached<R>(&self, path: impl AsRef<Path>, f: impl FnOnce(&LoadedBinary) -> R) -> Option<R> {
        self.inner.cache.lock().get(path.as_ref()).map(f)
    }

    /// Header and section metadata of a cached file.
    pub fn container_info(&self, path: impl AsRef<Path>) -> Option<ContainerInfo> {
        self.with_cached(path, |entry| entry.info().clone())
    }

    pub fn statistics(&self) -> LoaderStatistics {
        let counters = &self.inner.counters;
        let loads = counters.loads.load(Ordering::Relaxed);
        let micros = counters.load_micros.load(Ordering::Relaxed);
        let average_load_time = if loads == 0 {
            Duration::ZERO
        } else {
            Duration::from_micros(micros / loads)
        };

        let cache = self.inner.cache.lock();
        LoaderStatistics {
            cached_files: cache.len(),
            memory_mapped_files: cache.values().filter(|e| e.is_memory_mapped()).count(),
            total_cache_bytes: cache.values().map(|e| e.file_size).sum(),
            cache_hits: counters.hits.load(Ordering::Relaxed),
            cache_misses: counters.misses.load(Ordering::Relaxed),
            loads,
            failures: counters.failures.load(Ordering::Relaxed),
            average_load_time,
        }
    }

    /// Remove one cached entry. Returns whether it was present.
    pub fn evict(&self, path: impl AsRef<Path>) -> bool {
        let path = path.as_ref();
        let removed = self.inner.cache.lock().remove(path);
        match removed {
            Some(_) => {
                debug!("Evicted {}", path.display());
                true
            }
            None => false,
        }
    }

    /// Drop every cached entry and unmap its file.
    pub fn clear_cache(&self) {
        let drained = std::mem::take(&mut *self.inner.cache.lock());
        if !drained.is_empty() {
            debug!("Cleared {} cached files", drained.len());
        }
    }

    /// Release all cached stores and mappings.
    pub fn dispose(&self) {
        self.clear_cache();
    }
}

impl LoaderInner {
    fn load_file(&self, path: PathBuf) -> LoadResult {
        let started = Instant::now();
        let metadata = match fs::metadata(&path) {
            Ok(metadata) => metadata,
            Err(e) => {
                let error = LoadError::from_io(e, &path);
                return self.fail(path, error, started);
            }
        };

        if self.options.enable_caching {
            let mut cache = self.cache.lock();
            if let Some(entry) = cache.get(&path) {
                if entry.is_fresh(&metadata) {
                    self.counters.hits.fetch_add(1, Ordering::Relaxed);
                    debug!("Cache hit: {}", path.display());
                    return LoadResult {
                        outcome: Ok(Arc::clone(&entry.store)),
                        load_time: started.elapsed(),
                        file_size: entry.file_size,
                        from_cache: true,
                        memory_mapped: entry.is_memory_mapped(),
                        path,
                    };
                }
                debug!("Cache entry for {} is stale", path.display());
                cache.remove(&path);
            }
            self.counters.misses.fetch_add(1, Ordering::Relaxed);
            debug!("Cache miss: {}", path.display());
        }

        let (decoded, mapping) = match self.decode_file(&path, metadata.len()) {
            Ok(decoded) => decoded,
            Err(e) => return self.fail(path, e, started),
        };

        let load_time = started.elapsed();
        self.record_load(load_time);
        let file_size = metadata.len();
        let memory_mapped = mapping.is_some();
        let DecodedContainer { info, sections } = decoded;
        let store = Arc::new(ConfigStore::from_sections(sections));

        if self.options.enable_caching {
            let entry = LoadedBinary {
                store: Arc::clone(&store),
                info,
                file_size,
                modified: metadata.modified().ok(),
                loaded_at: SystemTime::now(),
                load_time,
                mapping,
            };
            self.cache.lock().insert(path.clone(), entry);
        }

        LoadResult {
            path,
            outcome: Ok(store),
            load_time,
            file_size,
            from_cache: false,
            memory_mapped,
        }
    }

    fn decode_file(&self, path: &Path, size: u64) -> PntResult<(DecodedContainer, Option<Mmap>)> {
        let file = File::open(path).map_err(|e| LoadError::from_io(e, path))?;

        if self.options.enable_memory_mapping && size > self.options.mmap_threshold {
            debug!("Memory-mapping {} ({} bytes)", path.display(), size);
            // SAFETY: the map is read-only and only borrowed for the duration
            // of the decode, which copies everything it keeps.
            let mapping = unsafe { Mmap::map(&file)? };
            let decoded = self.decoder.decode_slice(&mapping)?;
            return Ok((decoded, Some(mapping)));
        }

        debug!("Buffered read of {} ({} bytes)", path.display(), size);
        let decoded = self.decoder.decode_stream(BufReader::new(file))?;
        Ok((decoded, None))
    }

    fn record_load(&self, load_time: Duration) {
        let micros = u64::try_from(load_time.as_micros()).unwrap_or(u64::MAX);
        self.counters.loads.fetch_add(1, Ordering::Relaxed);
        self.counters.load_micros.fetch_add(micros, Ordering::Relaxed);
    }

    fn fail(&self, path: PathBuf, error: LoadError, started: Instant) -> LoadResult {
        self.counters.failures.fetch_add(1, Ordering::Relaxed);
        debug!("Failed to load {}: {}", path.display(), error);
        LoadResult::failed(path, error, started)
    }
}
