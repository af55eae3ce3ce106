// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Process-wide interning table for meta-string bytes.
//!
//! Every distinct byte sequence maps to exactly one shared
//! [`MetaStringBytes`]; `Arc::ptr_eq` on two handles implies byte equality.
//! The table is passed into resolvers explicitly so independent resolvers
//! (tests, separate sessions) can share it or not.
//!
//! # Thread Safety
//!
//! Both maps are `DashMap`s. First use of a key goes through the entry API,
//! so concurrent first uses of the same bytes agree on a single handle.

use dashmap::DashMap;
use std::sync::Arc;

use super::meta_string_bytes::MetaStringBytes;
use crate::meta::{Encoding, MetaString, MetaStringError};

/// Canonical interning table.
#[derive(Debug, Default)]
pub struct MetaStringResolver {
    /// Canonical handles, one per encoded byte sequence.
    interned: DashMap<MetaStringBytes, Arc<MetaStringBytes>>,
    /// Fast path from an encoder result to its handle.
    by_meta_string: DashMap<MetaString, Arc<MetaStringBytes>>,
}

impl MetaStringResolver {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            interned: DashMap::with_capacity(capacity),
            by_meta_string: DashMap::with_capacity(capacity),
        }
    }

    /// Shared handle for an encoder result.
    pub fn get_or_create(&self, meta_string: &MetaString) -> Arc<MetaStringBytes> {
        if let Some(hit) = self.by_meta_string.get(meta_string) {
            return Arc::clone(hit.value());
        }
        let handle = self.intern(MetaStringBytes::from_meta_string(meta_string));
        self.by_meta_string
            .entry(meta_string.clone())
            .or_insert_with(|| Arc::clone(&handle));
        handle
    }

    /// Shared handle for short bytes read off the wire with their encoding byte.
    pub fn get_or_create_small(
        &self,
        bytes: &[u8],
        encoding: Encoding,
    ) -> Arc<MetaStringBytes> {
        self.intern(MetaStringBytes::new(bytes, encoding))
    }

    /// Shared handle for long bytes read off the wire with their hash.
    pub fn get_or_create_big(
        &self,
        bytes: &[u8],
        hash_code: i64,
    ) -> Result<Arc<MetaStringBytes>, MetaStringError> {
        Ok(self.intern(MetaStringBytes::with_hash(bytes, hash_code)?))
    }

    /// Number of distinct byte sequences interned.
    #[must_use]
    pub fn len(&self) -> usize {
        self.interned.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.interned.is_empty()
    }

    fn intern(&self, candidate: MetaStringBytes) -> Arc<MetaStringBytes> {
        if let Some(hit) = self.interned.get(&candidate) {
            return Arc::clone(hit.value());
        }
        let entry = self
            .interned
            .entry(candidate.clone())
            .or_insert_with(|| Arc::new(candidate));
        Arc::clone(entry.value())
    }
}
