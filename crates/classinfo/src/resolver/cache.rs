// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Concurrent cache of [`ClassInfo`] records.
//!
//! Reflection-driven name derivation happens once per type. Later lookups
//! peek under a shared read lock; a miss takes the write lock and checks again
//! before building, so each key is built at most once even under concurrent
//! first use.
//!
//! Decode-side indices (by numeric id, by name-hash pair, by tag hash) live in
//! `DashMap`s beside the primary map. Dynamic identities are never name
//! indexed: they can't be the target of a lookup on the receiving side.
//! There is no eviction; identities live as long as the resolver.

use dashmap::DashMap;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;

use super::class_id::ClassId;
use super::class_info::ClassInfo;
use crate::types::TypeKey;

/// Cache hit/miss statistics.
#[derive(Debug, Default, Clone, Copy)]
pub struct LookupStats {
    pub hits: u64,
    pub misses: u64,
    pub last_miss_ns: u64,
}

/// Type-keyed identity cache plus decode-side indices.
#[derive(Debug)]
pub struct ClassInfoCache {
    inner: RwLock<HashMap<TypeKey, Arc<ClassInfo>>>,
    by_id: DashMap<ClassId, Arc<ClassInfo>>,
    by_names: DashMap<(i64, i64), Arc<ClassInfo>>,
    by_tag: DashMap<i64, Arc<ClassInfo>>,
    stats: RwLock<LookupStats>,
}

impl ClassInfoCache {
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            inner: RwLock::new(HashMap::with_capacity(capacity)),
            by_id: DashMap::with_capacity(capacity),
            by_names: DashMap::with_capacity(capacity),
            by_tag: DashMap::new(),
            stats: RwLock::new(LookupStats::default()),
        }
    }

    /// Cached identity for `name`, without touching the statistics.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<Arc<ClassInfo>> {
        self.inner.read().get(name).map(Arc::clone)
    }

    /// Cached identity for `key`, built by `build` on first use.
    ///
    /// A failed build caches nothing, so the next call retries.
    pub fn get_or_try_build<F, E>(&self, key: &TypeKey, build: F) -> Result<Arc<ClassInfo>, E>
    where
        F: FnOnce() -> Result<ClassInfo, E>,
    {
        if let Some(hit) = self.get(key.as_str()) {
            self.record_hit();
            return Ok(hit);
        }

        let mut cache = self.inner.write();
        if let Some(hit) = cache.get(key) {
            self.record_hit();
            return Ok(Arc::clone(hit));
        }

        let start = Instant::now();
        let built = Arc::new(build()?);
        debug_assert_eq!(
            built.key().as_ref(),
            Some(key),
            "ClassInfo class must match its cache key"
        );
        cache.insert(key.clone(), Arc::clone(&built));
        drop(cache);

        self.index(&built);
        self.record_miss(start);
        Ok(built)
    }

    /// Store `info` under `key`, replacing (and unindexing) any previous identity.
    pub fn insert(&self, key: TypeKey, info: Arc<ClassInfo>) -> Option<Arc<ClassInfo>> {
        let previous = self.inner.write().insert(key, Arc::clone(&info));
        if let Some(old) = previous.as_ref() {
            self.unindex(old);
        }
        self.index(&info);
        previous
    }

    /// Replace the identity under `key` with one built from the current entry.
    ///
    /// `build` runs under the write lock: no first use of `key` can land a
    /// record between reading the old identity and storing the new one.
    pub fn rebuild<F, E>(&self, key: TypeKey, build: F) -> Result<Arc<ClassInfo>, E>
    where
        F: FnOnce(Option<&ClassInfo>) -> Result<ClassInfo, E>,
    {
        let mut cache = self.inner.write();
        let built = Arc::new(build(cache.get(&key).map(|info| &**info))?);
        let previous = cache.insert(key, Arc::clone(&built));
        drop(cache);

        if let Some(old) = previous.as_ref() {
            self.unindex(old);
        }
        self.index(&built);
        Ok(built)
    }

    /// Index an identity without a runtime type (stub placeholders) by id.
    pub fn install_placeholder(&self, info: Arc<ClassInfo>) {
        self.by_id.insert(info.class_id(), info);
    }

    #[must_use]
    pub fn by_id(&self, id: ClassId) -> Option<Arc<ClassInfo>> {
        self.by_id.get(&id).map(|entry| Arc::clone(entry.value()))
    }

    #[must_use]
    pub fn by_names(&self, package_hash: i64, name_hash: i64) -> Option<Arc<ClassInfo>> {
        self.by_names
            .get(&(package_hash, name_hash))
            .map(|entry| Arc::clone(entry.value()))
    }

    #[must_use]
    pub fn by_tag(&self, tag_hash: i64) -> Option<Arc<ClassInfo>> {
        self.by_tag
            .get(&tag_hash)
            .map(|entry| Arc::clone(entry.value()))
    }

    /// Make `info` reachable through its name-hash pair.
    pub fn index_names(&self, info: &Arc<ClassInfo>) {
        if info.is_dynamic() {
            return;
        }
        if let Some(hashes) = info.name_hashes() {
            self.by_names.insert(hashes, Arc::clone(info));
        }
    }

    /// Number of type-keyed identities.
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.read().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[must_use]
    pub fn stats(&self) -> LookupStats {
        *self.stats.read()
    }

    fn index(&self, info: &Arc<ClassInfo>) {
        if !info.class_id().is_reserved() {
            self.by_id.insert(info.class_id(), Arc::clone(info));
        }
        self.index_names(info);
        if let Some(tag) = info.tag_bytes() {
            self.by_tag.insert(tag.hash_code(), Arc::clone(info));
        }
    }

    fn unindex(&self, info: &Arc<ClassInfo>) {
        if !info.class_id().is_reserved() {
            self.by_id
                .remove_if(&info.class_id(), |_, current| Arc::ptr_eq(current, info));
        }
        if let Some(hashes) = info.name_hashes() {
            self.by_names
                .remove_if(&hashes, |_, current| Arc::ptr_eq(current, info));
        }
        if let Some(tag) = info.tag_bytes() {
            self.by_tag
                .remove_if(&tag.hash_code(), |_, current| Arc::ptr_eq(current, info));
        }
    }

    fn record_hit(&self) {
        let mut stats = self.stats.write();
        stats.hits = stats.hits.saturating_add(1);
    }

    fn record_miss(&self, start: Instant) {
        let mut stats = self.stats.write();
        stats.misses = stats.misses.saturating_add(1);
        stats.last_miss_ns = start.elapsed().as_nanos() as u64;
    }
}
