// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Encoded meta-string bytes plus the 64-bit hash identifying them on the wire.

use std::fmt;
use std::hash::{Hash, Hasher};

use crate::config::META_STRING_HASH_SEED;
use crate::meta::{murmurhash3_x64_128, Encoding, MetaString, MetaStringDecoder, MetaStringError};

const HEADER_MASK: i64 = 0xff;

/// Immutable encoded name, shared through the interning table.
///
/// The low byte of `hash_code` carries the encoding id so that a peer reading
/// only the hash (long strings) still knows how to decode the bytes.
#[derive(Clone, Eq)]
pub struct MetaStringBytes {
    bytes: Box<[u8]>,
    encoding: Encoding,
    hash_code: i64,
}

impl MetaStringBytes {
    #[must_use]
    pub fn new(bytes: &[u8], encoding: Encoding) -> Self {
        Self {
            hash_code: Self::compute_hash(bytes, encoding),
            bytes: bytes.into(),
            encoding,
        }
    }

    #[must_use]
    pub fn from_meta_string(meta_string: &MetaString) -> Self {
        Self::new(&meta_string.bytes, meta_string.encoding)
    }

    /// Rebuild from bytes and a hash read off the wire, checking both agree.
    pub fn with_hash(bytes: &[u8], hash_code: i64) -> Result<Self, MetaStringError> {
        let encoding = Encoding::try_from((hash_code & HEADER_MASK) as u8)?;
        let built = Self::new(bytes, encoding);
        if built.hash_code != hash_code {
            return Err(MetaStringError::Malformed(format!(
                "hash mismatch: expected {:#018x}, computed {:#018x}",
                hash_code, built.hash_code
            )));
        }
        Ok(built)
    }

    /// Murmur3 lane 0 with the low byte replaced by the encoding id.
    #[must_use]
    pub fn compute_hash(bytes: &[u8], encoding: Encoding) -> i64 {
        let (lane0, _) = murmurhash3_x64_128(bytes, META_STRING_HASH_SEED);
        let mut hash = lane0 as i64;
        if hash == 0 {
            // low byte is the header, keep the rest non-zero
            hash += 256;
        }
        hash &= !HEADER_MASK;
        hash | i64::from(encoding.value())
    }

    #[inline]
    #[must_use]
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    #[inline]
    #[must_use]
    pub fn encoding(&self) -> Encoding {
        self.encoding
    }

    #[inline]
    #[must_use]
    pub fn hash_code(&self) -> i64 {
        self.hash_code
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub fn decode(&self, decoder: &MetaStringDecoder) -> Result<String, MetaStringError> {
        decoder.decode(&self.bytes, self.encoding)
    }
}

impl PartialEq for MetaStringBytes {
    fn eq(&self, other: &Self) -> bool {
        self.hash_code == other.hash_code && self.bytes == other.bytes
    }
}

impl Hash for MetaStringBytes {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.hash_code.hash(state);
    }
}

impl fmt::Debug for MetaStringBytes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "MetaStringBytes({}, {} bytes, hash={:016x})",
            self.encoding,
            self.bytes.len(),
            self.hash_code
        )
    }
}
