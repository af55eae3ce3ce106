// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Bundled [`TypeShape`] implementation.
//!
//! A `ClassDescriptor` is a name plus a [`ClassKind`]. Arrays are always stored
//! flattened (innermost component + depth), so `array_of(array_of(T, 1), 2)`
//! and `array_of(T, 3)` describe the same type.

use std::fmt;
use std::sync::Arc;

use super::shape::{TypeRef, TypeShape};

/// Names of the primitive scalar types.
pub const PRIMITIVE_NAMES: [&str; 9] = [
    "void", "boolean", "byte", "char", "short", "int", "float", "long", "double",
];

const ARRAY_SUFFIX: &str = "[]";
const LAMBDA_MARKER: &str = "$$Lambda";
const PROXY_MARKER: &str = "$Proxy";
const PROXY_MODULE_PREFIX: &str = "jdk.proxy";

/// Shape of a described class.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ClassKind {
    Class,
    Interface,
    Enum,
    Primitive,
    Array {
        component: Arc<ClassDescriptor>,
        depth: usize,
    },
    Lambda,
    Proxy,
}

/// Named runtime type with an explicit shape.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct ClassDescriptor {
    name: Arc<str>,
    kind: ClassKind,
}

impl ClassDescriptor {
    fn with_kind(name: &str, kind: ClassKind) -> Self {
        Self {
            name: Arc::from(name),
            kind,
        }
    }

    /// Plain class.
    #[must_use]
    pub fn class(name: &str) -> Self {
        Self::with_kind(name, ClassKind::Class)
    }

    #[must_use]
    pub fn interface(name: &str) -> Self {
        Self::with_kind(name, ClassKind::Interface)
    }

    #[must_use]
    pub fn enumeration(name: &str) -> Self {
        Self::with_kind(name, ClassKind::Enum)
    }

    #[must_use]
    pub fn primitive(name: &str) -> Self {
        Self::with_kind(name, ClassKind::Primitive)
    }

    #[must_use]
    pub fn lambda(name: &str) -> Self {
        Self::with_kind(name, ClassKind::Lambda)
    }

    #[must_use]
    pub fn proxy(name: &str) -> Self {
        Self::with_kind(name, ClassKind::Proxy)
    }

    /// Array of `depth` dimensions over `component`.
    ///
    /// Nested arrays are flattened. A depth of zero returns the component.
    #[must_use]
    pub fn array_of(component: Self, depth: usize) -> Self {
        if depth == 0 {
            return component;
        }
        let (inner, depth) = match component.kind {
            ClassKind::Array {
                component: inner,
                depth: inner_depth,
            } => (inner, inner_depth + depth),
            _ => (Arc::new(component), depth),
        };
        let name = format!("{}{}", inner.name, ARRAY_SUFFIX.repeat(depth));
        Self {
            name: Arc::from(name.as_str()),
            kind: ClassKind::Array {
                component: inner,
                depth,
            },
        }
    }

    /// Classify a class name by runtime naming conventions.
    ///
    /// Recognizes array suffixes, primitive names, generated lambda classes
    /// (`Foo$$Lambda$12/0x...`) and proxies (`$Proxy7`, `jdk.proxy1.$Proxy0`).
    /// Everything else is a plain class: enum-ness cannot be read from a name.
    #[must_use]
    pub fn infer(name: &str) -> Self {
        let mut base = name;
        let mut depth = 0;
        while let Some(stripped) = base.strip_suffix(ARRAY_SUFFIX) {
            base = stripped;
            depth += 1;
        }
        if depth > 0 {
            return Self::array_of(Self::infer(base), depth);
        }
        if PRIMITIVE_NAMES.contains(&name) {
            Self::primitive(name)
        } else if is_lambda_name(name) {
            Self::lambda(name)
        } else if is_proxy_name(name) {
            Self::proxy(name)
        } else {
            Self::class(name)
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn kind(&self) -> &ClassKind {
        &self.kind
    }

    /// Wrap into a shared [`TypeRef`].
    #[must_use]
    pub fn into_ref(self) -> TypeRef {
        Arc::new(self)
    }
}

fn is_lambda_name(name: &str) -> bool {
    name.contains(LAMBDA_MARKER) || name.contains('/')
}

fn is_proxy_name(name: &str) -> bool {
    if name.starts_with(PROXY_MODULE_PREFIX) {
        return true;
    }
    let simple = name.rsplit('.').next().unwrap_or(name);
    simple
        .strip_prefix(PROXY_MARKER)
        .is_some_and(|n| !n.is_empty() && n.bytes().all(|b| b.is_ascii_digit()))
}

impl TypeShape for ClassDescriptor {
    fn qualified_name(&self) -> &str {
        &self.name
    }

    fn is_enum(&self) -> bool {
        matches!(self.kind, ClassKind::Enum)
    }

    fn is_primitive(&self) -> bool {
        matches!(self.kind, ClassKind::Primitive)
    }

    fn array_component(&self) -> Option<(&dyn TypeShape, usize)> {
        match &self.kind {
            ClassKind::Array { component, depth } => {
                Some((component.as_ref() as &dyn TypeShape, *depth))
            }
            _ => None,
        }
    }

    fn is_lambda(&self) -> bool {
        matches!(self.kind, ClassKind::Lambda)
    }

    fn is_proxy(&self) -> bool {
        matches!(self.kind, ClassKind::Proxy)
    }
}

impl fmt::Debug for ClassDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = match &self.kind {
            ClassKind::Class => "class",
            ClassKind::Interface => "interface",
            ClassKind::Enum => "enum",
            ClassKind::Primitive => "primitive",
            ClassKind::Array { .. } => "array",
            ClassKind::Lambda => "lambda",
            ClassKind::Proxy => "proxy",
        };
        write!(f, "{} {}", kind, self.name)
    }
}

impl fmt::Display for ClassDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}
