// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Serializer seam and the atomically swappable slot holding it.
//!
//! Serializers are implemented elsewhere; the resolver only binds them to
//! identities. A binding may be upgraded after the identity is cached (for
//! example a generic serializer replaced by a specialized one), so callers must
//! load the serializer through the [`ClassInfo`](super::ClassInfo) each time
//! instead of holding on to a raw reference.

use arc_swap::ArcSwapOption;
use std::fmt;
use std::sync::Arc;

/// Per-type read/write implementation.
pub trait Serializer: Send + Sync + fmt::Debug {
    /// Short name used in logs.
    fn name(&self) -> &str;
}

/// Shared serializer handle.
pub type SerializerRef = Arc<dyn Serializer>;

/// Lock-free cell holding the current serializer of an identity.
///
/// Readers never observe a torn value: replacement is a single atomic swap.
pub struct SerializerSlot {
    current: ArcSwapOption<SerializerRef>,
}

impl SerializerSlot {
    #[must_use]
    pub fn new(serializer: Option<SerializerRef>) -> Self {
        Self {
            current: ArcSwapOption::new(serializer.map(Arc::new)),
        }
    }

    /// Current serializer, if one is bound.
    #[inline]
    #[must_use]
    pub fn load(&self) -> Option<SerializerRef> {
        self.current.load().as_deref().cloned()
    }

    /// Bind `serializer`, returning the previous binding.
    pub fn replace(&self, serializer: SerializerRef) -> Option<SerializerRef> {
        self.current
            .swap(Some(Arc::new(serializer)))
            .map(|previous| Arc::clone(&*previous))
    }
}

impl fmt::Debug for SerializerSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.load() {
            Some(serializer) => write!(f, "{}", serializer.name()),
            None => write!(f, "<unbound>"),
        }
    }
}
