// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! The identity record binding a runtime type to its wire identity and serializer.
//!
//! # Construction
//!
//! ```text
//! class_id == NONE && class set  ->  classify (lambda / proxy -> stub id)
//!        |
//!        +-- stub id      -> no names, no tag, is_dynamic = true
//!        +-- NONE/REPLACE -> derive (package, simple) -> encode -> intern
//!        +-- real id      -> numeric path, names unset
//! tag set                -> encode (UTF-8) -> intern
//! bridging language      -> full name (UTF-8) -> intern
//! ```
//!
//! Everything but the serializer is fixed once built. The serializer sits in a
//! [`SerializerSlot`] and may be swapped atomically at any time. A record
//! rebuilt on registration shares the slot of the record it replaces.

use std::fmt;
use std::sync::Arc;

use super::class_id::ClassId;
use super::classify::classify;
use super::meta_string_bytes::MetaStringBytes;
use super::meta_string_resolver::MetaStringResolver;
use super::naming::{derive_class_name, primitive_array_token, ClassNameParts};
use super::serializer::{SerializerRef, SerializerSlot};
use crate::config::Language;
use crate::error::{Error, Result};
use crate::meta::{Encoding, PACKAGE_ENCODER, TYPE_NAME_ENCODER};
use crate::types::{TypeKey, TypeRef, TypeShape};

/// Identity of one runtime type for the life of a resolver.
pub struct ClassInfo {
    class: Option<TypeRef>,
    class_id: ClassId,
    full_name_bytes: Option<Arc<MetaStringBytes>>,
    package_name_bytes: Option<Arc<MetaStringBytes>>,
    class_name_bytes: Option<Arc<MetaStringBytes>>,
    tag_bytes: Option<Arc<MetaStringBytes>>,
    is_dynamic: bool,
    serializer: Arc<SerializerSlot>,
}

impl ClassInfo {
    /// Start building an identity whose names are interned in `strings`.
    #[must_use]
    pub fn builder(strings: &MetaStringResolver, language: Language) -> ClassInfoBuilder<'_> {
        ClassInfoBuilder {
            strings,
            language,
            class: None,
            tag: None,
            serializer: None,
            shared_slot: None,
            class_id: ClassId::NONE,
        }
    }

    /// Runtime type, `None` for placeholder entries.
    #[inline]
    #[must_use]
    pub fn class(&self) -> Option<&TypeRef> {
        self.class.as_ref()
    }

    #[inline]
    #[must_use]
    pub fn class_id(&self) -> ClassId {
        self.class_id
    }

    /// Fully-qualified name, only when bridging to a foreign runtime.
    #[inline]
    #[must_use]
    pub fn full_name_bytes(&self) -> Option<&Arc<MetaStringBytes>> {
        self.full_name_bytes.as_ref()
    }

    #[inline]
    #[must_use]
    pub fn package_name_bytes(&self) -> Option<&Arc<MetaStringBytes>> {
        self.package_name_bytes.as_ref()
    }

    #[inline]
    #[must_use]
    pub fn class_name_bytes(&self) -> Option<&Arc<MetaStringBytes>> {
        self.class_name_bytes.as_ref()
    }

    #[inline]
    #[must_use]
    pub fn tag_bytes(&self) -> Option<&Arc<MetaStringBytes>> {
        self.tag_bytes.as_ref()
    }

    /// Lambda or proxy. Never a lookup target on the receiving side.
    #[inline]
    #[must_use]
    pub fn is_dynamic(&self) -> bool {
        self.is_dynamic
    }

    /// Serializer currently bound. Load it per use; it may be swapped.
    #[inline]
    #[must_use]
    pub fn serializer(&self) -> Option<SerializerRef> {
        self.serializer.load()
    }

    /// Atomically rebind the serializer, returning the previous one.
    pub fn set_serializer(&self, serializer: SerializerRef) -> Option<SerializerRef> {
        self.serializer.replace(serializer)
    }

    /// Identity travels as package and class name bytes rather than an id.
    #[must_use]
    pub fn uses_name_path(&self) -> bool {
        self.class_id.needs_name()
            && self.package_name_bytes.is_some()
            && self.class_name_bytes.is_some()
    }

    /// Cache key of the runtime type.
    #[must_use]
    pub fn key(&self) -> Option<TypeKey> {
        self.class.as_ref().map(|class| class.key())
    }

    /// `(package hash, class-name hash)` when both name handles are set.
    #[must_use]
    pub fn name_hashes(&self) -> Option<(i64, i64)> {
        match (&self.package_name_bytes, &self.class_name_bytes) {
            (Some(package), Some(name)) => Some((package.hash_code(), name.hash_code())),
            _ => None,
        }
    }

    fn check_invariants(&self) -> Result<()> {
        if self.is_dynamic {
            if !self.class_id.is_dynamic_stub() {
                return Err(Error::Invariant(format!(
                    "dynamic class carries non-stub id {}",
                    self.class_id
                )));
            }
            if self.package_name_bytes.is_some() || self.class_name_bytes.is_some() {
                return Err(Error::Invariant(
                    "dynamic class carries name bytes".to_string(),
                ));
            }
            return Ok(());
        }
        if self.class.is_some() && self.class_id.is_none() && self.class_name_bytes.is_none() {
            return Err(Error::Invariant(
                "name-path identity without class name bytes".to_string(),
            ));
        }
        Ok(())
    }
}

impl fmt::Debug for ClassInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClassInfo")
            .field(
                "class",
                &self.class.as_ref().map(|class| class.qualified_name()),
            )
            .field("full_name_bytes", &self.full_name_bytes)
            .field("package_name_bytes", &self.package_name_bytes)
            .field("class_name_bytes", &self.class_name_bytes)
            .field("tag_bytes", &self.tag_bytes)
            .field("is_dynamic", &self.is_dynamic)
            .field("serializer", &self.serializer)
            .field("class_id", &self.class_id)
            .finish()
    }
}

/// Collects the inputs of a [`ClassInfo`].
#[must_use]
pub struct ClassInfoBuilder<'a> {
    strings: &'a MetaStringResolver,
    language: Language,
    class: Option<TypeRef>,
    tag: Option<String>,
    serializer: Option<SerializerRef>,
    shared_slot: Option<Arc<SerializerSlot>>,
    class_id: ClassId,
}

impl ClassInfoBuilder<'_> {
    pub fn class(mut self, class: TypeRef) -> Self {
        self.class = Some(class);
        self
    }

    /// Explicit cross-language tag.
    pub fn tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = Some(tag.into());
        self
    }

    pub fn serializer(mut self, serializer: SerializerRef) -> Self {
        self.serializer = Some(serializer);
        self
    }

    /// Bind through the same slot as `previous`, so a rebind on either record
    /// is seen by both.
    pub fn share_serializer_with(mut self, previous: &ClassInfo) -> Self {
        self.shared_slot = Some(Arc::clone(&previous.serializer));
        self
    }

    /// Requested id. Defaults to [`ClassId::NONE`] (name path).
    pub fn class_id(mut self, class_id: ClassId) -> Self {
        self.class_id = class_id;
        self
    }

    pub fn build(self) -> Result<ClassInfo> {
        if self.class.is_none() && self.class_id.is_none() && self.tag.is_none() {
            return Err(Error::InvalidArgument(
                "class info needs a class, a class id, or a tag".to_string(),
            ));
        }

        let serializer = match self.shared_slot {
            Some(slot) => {
                if let Some(explicit) = self.serializer {
                    slot.replace(explicit);
                }
                slot
            }
            None => Arc::new(SerializerSlot::new(self.serializer)),
        };

        let classification = classify(self.class.as_deref(), self.class_id);
        if let Some(stub) = classification.stub {
            log::debug!(
                "[resolver] {} is a {:?} class, using stub id {}",
                self.class
                    .as_ref()
                    .map_or("<none>", |class| class.qualified_name()),
                stub,
                classification.class_id
            );
            let info = ClassInfo {
                class: self.class,
                class_id: classification.class_id,
                full_name_bytes: None,
                package_name_bytes: None,
                class_name_bytes: None,
                tag_bytes: None,
                is_dynamic: true,
                serializer,
            };
            info.check_invariants()?;
            return Ok(info);
        }

        let class_id = classification.class_id;
        let mut full_name_bytes = None;
        let mut package_name_bytes = None;
        let mut class_name_bytes = None;

        if let Some(class) = self.class.as_deref() {
            if self.language.is_cross_language() {
                let full = PACKAGE_ENCODER.encode_with(class.qualified_name(), Encoding::Utf8)?;
                full_name_bytes = Some(self.strings.get_or_create(&full));
            }
            if class_id.needs_name() {
                let parts = class_name_parts(class)?;
                let package = PACKAGE_ENCODER.encode(&parts.package)?;
                let simple = TYPE_NAME_ENCODER.encode(&parts.simple_name)?;
                package_name_bytes = Some(self.strings.get_or_create(&package));
                class_name_bytes = Some(self.strings.get_or_create(&simple));
            }
        }

        let tag_bytes = match self.tag.as_deref() {
            Some(tag) => {
                let encoded = PACKAGE_ENCODER.encode_with(tag, Encoding::Utf8)?;
                Some(self.strings.get_or_create(&encoded))
            }
            None => None,
        };

        let info = ClassInfo {
            class: self.class,
            class_id,
            full_name_bytes,
            package_name_bytes,
            class_name_bytes,
            tag_bytes,
            is_dynamic: false,
            serializer,
        };
        info.check_invariants()?;
        Ok(info)
    }
}

/// Package and simple name of `class`, primitive arrays included.
fn class_name_parts(class: &dyn TypeShape) -> Result<ClassNameParts> {
    let parts = match derive_class_name(class) {
        Some(parts) => Some(parts),
        None => primitive_array_token(class).map(|token| ClassNameParts {
            package: String::new(),
            simple_name: token,
        }),
    };
    match parts {
        Some(parts) if !parts.simple_name.is_empty() => Ok(parts),
        _ => {
            log::error!(
                "[resolver] no simple name derivable for '{}'",
                class.qualified_name()
            );
            Err(Error::Invariant(format!(
                "empty simple name for '{}'",
                class.qualified_name()
            )))
        }
    }
}
