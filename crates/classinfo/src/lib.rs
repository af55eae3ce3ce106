// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Type-identity resolution and metadata cache
//!
//! Maps runtime types to compact wire identities for a cross-language binary
//! serialization engine, and binds each identity to its serializer.
//!
//! # Features
//!
//! - **Numeric path**: registered classes travel as a small id
//! - **Name path**: unregistered classes travel as deduplicated, bit-packed
//!   package and class names whose prefixes encode array depth and enum-ness
//! - **Stub ids**: lambdas and proxies get reserved ids instead of names
//! - **Late binding**: serializers can be swapped atomically after caching
//!
//! # Quick Start
//!
//! ```
//! use std::sync::Arc;
//! use classinfo::{ClassDescriptor, ClassResolver, MetaStringResolver, ResolverConfig};
//!
//! let strings = Arc::new(MetaStringResolver::new());
//! let resolver = ClassResolver::new(ResolverConfig::default(), strings)?;
//!
//! let widget = ClassDescriptor::class("com.acme.Widget").into_ref();
//! let info = resolver.get_or_create_class_info(&widget)?;
//! assert!(info.uses_name_path());
//! # Ok::<(), classinfo::Error>(())
//! ```
//!
//! # Configuration File
//!
//! ```toml
//! language = "python"
//! require_class_registration = false
//! initial_capacity = 256
//! ```

pub mod config;
pub mod error;
pub mod meta;
pub mod resolver;
pub mod types;
pub mod wire;

pub use config::{ConfigError, Language, ResolverConfig};
pub use error::{Error, Result};
pub use meta::{Encoding, MetaString, MetaStringError};
pub use resolver::{
    ClassId, ClassInfo, ClassInfoBuilder, ClassResolver, LookupStats, MetaStringBytes,
    MetaStringResolver, Serializer, SerializerRef,
};
pub use types::{ClassDescriptor, TypeKey, TypeRef, TypeShape};
pub use wire::{Cursor, CursorMut, ReadSession, WireError, WriteSession};

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
