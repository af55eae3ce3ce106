// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Capability queries over a runtime type.

use std::borrow::Borrow;
use std::fmt;
use std::sync::Arc;

/// Structural view of a runtime type.
///
/// Implementations are oracles: answers must be stable for the life of the
/// process, since identities derived from them are cached.
pub trait TypeShape: Send + Sync + fmt::Debug {
    /// Fully-qualified name (`pkg.Outer$Inner`, arrays as `pkg.T[][]`).
    fn qualified_name(&self) -> &str;

    /// Enumeration type.
    fn is_enum(&self) -> bool;

    /// Primitive scalar type (`int`, `double`, ...).
    fn is_primitive(&self) -> bool;

    /// Innermost component type and nesting depth (`T[][]` -> `(T, 2)`).
    ///
    /// `None` for anything that is not an array.
    fn array_component(&self) -> Option<(&dyn TypeShape, usize)>;

    /// Synthetic class generated for a lambda expression.
    fn is_lambda(&self) -> bool;

    /// Dynamic proxy class.
    fn is_proxy(&self) -> bool;

    fn is_array(&self) -> bool {
        self.array_component().is_some()
    }

    /// Lambda or proxy: generated per process, no portable name.
    fn is_dynamic(&self) -> bool {
        self.is_lambda() || self.is_proxy()
    }

    /// Cache key for this type.
    fn key(&self) -> TypeKey {
        TypeKey::new(self.qualified_name())
    }
}

/// Shared handle to a runtime type.
pub type TypeRef = Arc<dyn TypeShape>;

/// Identifies a runtime type in resolver maps (its qualified name).
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TypeKey(Arc<str>);

impl TypeKey {
    #[must_use]
    pub fn new(name: &str) -> Self {
        Self(Arc::from(name))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for TypeKey {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl From<String> for TypeKey {
    fn from(name: String) -> Self {
        Self(Arc::from(name))
    }
}

impl Borrow<str> for TypeKey {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for TypeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TypeKey({})", self.0)
    }
}

impl fmt::Display for TypeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
