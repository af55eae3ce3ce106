// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Class resolution: runtime type -> [`ClassInfo`] -> wire header, and back.
//!
//! [`ClassResolver`] owns the identity cache and the id registry. The
//! meta-string interning table is injected so that independent resolvers can
//! share (or not share) deduplicated name bytes.
//!
//! # Thread Safety
//!
//! Every operation takes `&self`. A resolver can be wrapped in an `Arc` and used
//! from many encode/decode sessions at once; the per-message back-reference
//! state lives in [`WriteSession`] / [`ReadSession`], owned by the caller.

pub mod cache;
pub mod class_id;
pub mod class_info;
pub mod classify;
pub mod meta_string_bytes;
pub mod meta_string_resolver;
pub mod naming;
pub mod registry;
pub mod serializer;

pub use cache::{ClassInfoCache, LookupStats};
pub use class_id::ClassId;
pub use class_info::{ClassInfo, ClassInfoBuilder};
pub use classify::{classify, stub_kind, Classification, StubKind};
pub use meta_string_bytes::MetaStringBytes;
pub use meta_string_resolver::MetaStringResolver;
pub use naming::{decode_class_name, derive_class_name, ClassNameParts, DecodedClassName};
pub use registry::{builtin_class_names, ClassIdRegistry};
pub use serializer::{Serializer, SerializerRef, SerializerSlot};

use dashmap::DashMap;
use std::sync::Arc;

use crate::config::ResolverConfig;
use crate::error::{Error, Result};
use crate::meta::{Encoding, PACKAGE_DECODER, PACKAGE_ENCODER, TYPE_NAME_DECODER};
use crate::types::{ClassDescriptor, TypeKey, TypeRef, TypeShape};
use crate::wire::{
    read_class_header, write_class_header, ClassHeader, Cursor, CursorMut, ReadSession,
    WriteSession,
};

/// Resolves runtime types to cached identities and encodes them on the wire.
#[derive(Debug)]
pub struct ClassResolver {
    config: ResolverConfig,
    strings: Arc<MetaStringResolver>,
    registry: ClassIdRegistry,
    cache: ClassInfoCache,
    tags: DashMap<TypeKey, Arc<str>>,
    replacements: DashMap<TypeKey, Arc<ClassInfo>>,
}

impl ClassResolver {
    /// Build a resolver with the stub placeholders and builtin classes installed.
    pub fn new(config: ResolverConfig, strings: Arc<MetaStringResolver>) -> Result<Self> {
        config.validate()?;
        let resolver = Self {
            cache: ClassInfoCache::with_capacity(config.initial_capacity),
            registry: ClassIdRegistry::new(),
            tags: DashMap::new(),
            replacements: DashMap::new(),
            strings,
            config,
        };

        for stub in [
            ClassId::LAMBDA_STUB,
            ClassId::PROXY_STUB,
            ClassId::REPLACE_STUB,
        ] {
            let placeholder = resolver.builder().class_id(stub).build()?;
            resolver.cache.install_placeholder(Arc::new(placeholder));
        }

        for name in builtin_class_names() {
            let Some(id) = resolver.registry.lookup(&name) else {
                continue;
            };
            let class = ClassDescriptor::infer(&name).into_ref();
            let info = resolver.builder().class(class).class_id(id).build()?;
            resolver.cache.insert(TypeKey::from(name), Arc::new(info));
        }

        log::debug!(
            "[resolver] ready: language={} strict={} builtins={}",
            resolver.config.language,
            resolver.config.require_class_registration,
            resolver.registry.len()
        );
        Ok(resolver)
    }

    #[must_use]
    pub fn config(&self) -> &ResolverConfig {
        &self.config
    }

    /// Shared interning table.
    #[must_use]
    pub fn meta_strings(&self) -> &Arc<MetaStringResolver> {
        &self.strings
    }

    #[must_use]
    pub fn registry(&self) -> &ClassIdRegistry {
        &self.registry
    }

    #[must_use]
    pub fn stats(&self) -> LookupStats {
        self.cache.stats()
    }

    /// Register `class` under the next free id.
    pub fn register(&self, class: &TypeRef) -> Result<ClassId> {
        reject_dynamic(class)?;
        let id = self.registry.register(class.key())?;
        self.install_registered(class, id)?;
        Ok(id)
    }

    /// Register `class` under a caller-chosen id.
    pub fn register_with_id(&self, class: &TypeRef, id: i16) -> Result<ClassId> {
        reject_dynamic(class)?;
        let id = self.registry.register_with_id(class.key(), ClassId::new(id)?)?;
        self.install_registered(class, id)?;
        Ok(id)
    }

    /// Attach a cross-language tag to `class`, rebuilding its identity.
    pub fn register_tag(&self, class: &TypeRef, tag: &str) -> Result<Arc<ClassInfo>> {
        reject_dynamic(class)?;
        let key = class.key();
        self.tags.insert(key.clone(), Arc::from(tag));
        let class_id = self.registry.lookup(key.as_str()).unwrap_or(ClassId::NONE);
        self.cache
            .rebuild(key, |previous| self.build_info(class, class_id, previous))
    }

    /// Identity of `class`, built on first use and cached for the resolver's life.
    pub fn get_or_create_class_info(&self, class: &TypeRef) -> Result<Arc<ClassInfo>> {
        let key = class.key();
        self.cache.get_or_try_build(&key, || {
            let class_id = self.registry.lookup(key.as_str()).unwrap_or(ClassId::NONE);
            if self.config.require_class_registration
                && class_id.is_none()
                && !class.is_dynamic()
            {
                log::warn!("[resolver] {} used without registration", key);
                return Err(Error::RegistrationRequired(key.to_string()));
            }
            let info = self.build_info(class, class_id, None)?;
            log::debug!(
                "[resolver] created class info for {} (id={}, name_path={})",
                key,
                info.class_id(),
                info.uses_name_path()
            );
            Ok(info)
        })
    }

    /// Identity used when only the class of a write-replace substitute is written.
    ///
    /// Carries [`ClassId::REPLACE_STUB`] with freshly derived names; cached apart
    /// from the regular identities.
    pub fn class_info_for_replacement(&self, class: &TypeRef) -> Result<Arc<ClassInfo>> {
        let key = class.key();
        if let Some(hit) = self.replacements.get(&key) {
            return Ok(Arc::clone(hit.value()));
        }
        let entry = self.replacements.entry(key).or_try_insert_with(|| {
            self.builder()
                .class(Arc::clone(class))
                .class_id(ClassId::REPLACE_STUB)
                .build()
                .map(Arc::new)
        })?;
        Ok(Arc::clone(entry.value()))
    }

    /// Bind `serializer` to `class`, returning the previous binding.
    pub fn set_serializer(
        &self,
        class: &TypeRef,
        serializer: SerializerRef,
    ) -> Result<Option<SerializerRef>> {
        let info = self.get_or_create_class_info(class)?;
        log::debug!(
            "[resolver] {} serializer -> {}",
            class.qualified_name(),
            serializer.name()
        );
        Ok(info.set_serializer(serializer))
    }

    /// Identity registered under `id` (builtins and stub placeholders included).
    #[must_use]
    pub fn class_info_by_id(&self, id: ClassId) -> Option<Arc<ClassInfo>> {
        self.cache.by_id(id)
    }

    /// Identity whose package and class name bytes match.
    #[must_use]
    pub fn class_info_by_names(
        &self,
        package: &MetaStringBytes,
        class_name: &MetaStringBytes,
    ) -> Option<Arc<ClassInfo>> {
        self.cache
            .by_names(package.hash_code(), class_name.hash_code())
    }

    /// Identity carrying the cross-language `tag`.
    pub fn class_info_by_tag(&self, tag: &str) -> Result<Option<Arc<ClassInfo>>> {
        let encoded = PACKAGE_ENCODER.encode_with(tag, Encoding::Utf8)?;
        let handle = self.strings.get_or_create(&encoded);
        Ok(self.cache.by_tag(handle.hash_code()))
    }

    /// Resolve `class` and write its header.
    pub fn write_class_info(
        &self,
        cursor: &mut CursorMut<'_>,
        session: &mut WriteSession,
        class: &TypeRef,
    ) -> Result<Arc<ClassInfo>> {
        let info = self.get_or_create_class_info(class)?;
        write_class_header(cursor, session, &info)?;
        Ok(info)
    }

    /// Read a header and resolve it to a known identity.
    pub fn read_class_info(
        &self,
        cursor: &mut Cursor<'_>,
        session: &mut ReadSession,
    ) -> Result<Arc<ClassInfo>> {
        match read_class_header(cursor, session, &self.strings)? {
            ClassHeader::Id(id) => self.class_info_by_id(id).ok_or_else(|| {
                log::warn!("[resolver] unknown class id {} on read", id);
                Error::UnknownClassId(id.get())
            }),
            ClassHeader::Names {
                package,
                class_name,
            } => match self.class_info_by_names(&package, &class_name) {
                Some(info) => Ok(info),
                None => self.resolve_by_decoded_names(&package, &class_name),
            },
        }
    }

    fn resolve_by_decoded_names(
        &self,
        package: &MetaStringBytes,
        class_name: &MetaStringBytes,
    ) -> Result<Arc<ClassInfo>> {
        let package = package.decode(&PACKAGE_DECODER)?;
        let simple_name = class_name.decode(&TYPE_NAME_DECODER)?;
        let decoded = decode_class_name(&package, &simple_name);
        let qualified = decoded.qualified_name();

        // Lambdas and proxies never resolve by name, cached or not.
        let dynamic = match self.cache.get(&qualified) {
            Some(known) if !known.is_dynamic() => {
                self.cache.index_names(&known);
                return Ok(known);
            }
            Some(_) => true,
            None => ClassDescriptor::infer(&qualified).is_dynamic(),
        };
        if dynamic || self.config.require_class_registration {
            log::warn!(
                "[resolver] unknown class {} (package '{}', name '{}', dynamic={})",
                qualified,
                package,
                simple_name,
                dynamic
            );
            return Err(Error::UnknownClassName {
                package,
                name: simple_name,
            });
        }

        log::debug!("[resolver] materializing {} from wire names", qualified);
        self.get_or_create_class_info(&descriptor_for(&decoded).into_ref())
    }

    fn builder(&self) -> ClassInfoBuilder<'_> {
        ClassInfo::builder(&self.strings, self.config.language)
    }

    fn build_info(
        &self,
        class: &TypeRef,
        class_id: ClassId,
        previous: Option<&ClassInfo>,
    ) -> Result<ClassInfo> {
        let mut builder = self.builder().class(Arc::clone(class)).class_id(class_id);
        if let Some(tag) = self.tags.get(&class.key()) {
            builder = builder.tag(tag.value().as_ref());
        }
        if let Some(previous) = previous {
            builder = builder.share_serializer_with(previous);
        }
        builder.build()
    }

    fn install_registered(&self, class: &TypeRef, id: ClassId) -> Result<()> {
        self.cache
            .rebuild(class.key(), |previous| self.build_info(class, id, previous))?;
        Ok(())
    }
}

fn reject_dynamic(class: &TypeRef) -> Result<()> {
    if class.is_dynamic() {
        return Err(Error::InvalidArgument(format!(
            "dynamic class {} cannot be registered",
            class.qualified_name()
        )));
    }
    Ok(())
}

/// Runtime type reconstructed from decoded wire names.
fn descriptor_for(decoded: &DecodedClassName) -> ClassDescriptor {
    let component_name = decoded.component_name();
    let component = if decoded.is_primitive_array {
        ClassDescriptor::primitive(&component_name)
    } else if decoded.is_enum {
        ClassDescriptor::enumeration(&component_name)
    } else {
        ClassDescriptor::class(&component_name)
    };
    ClassDescriptor::array_of(component, decoded.array_depth)
}

#[cfg(test)]
mod tests;
