// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Package / simple-name derivation for the name-encoding path.
//!
//! The simple name alone must let a peer rebuild the type's shape, since the
//! wire carries nothing but the two encoded names:
//!
//! | Type | Package | Simple name |
//! |------|---------|-------------|
//! | `java.lang.String` | `java.lang` | `String` |
//! | enum `a.Color` | `a` | `2Color` |
//! | `a.Point[][]` | `a` | `11Point` |
//! | `a.Color[][]` (enum) | `a` | `112Color` |
//! | `int[][]` | `` | `[[I` (fixed token, not derived) |

use crate::config::{ARRAY_PREFIX, ENUM_PREFIX};
use crate::types::TypeShape;

const ARRAY_DESCRIPTOR: char = '[';

/// Fixed one-letter codes for primitive array components.
const PRIMITIVE_CODES: [(&str, char); 9] = [
    ("boolean", 'Z'),
    ("byte", 'B'),
    ("char", 'C'),
    ("short", 'S'),
    ("int", 'I'),
    ("long", 'J'),
    ("float", 'F'),
    ("double", 'D'),
    ("void", 'V'),
];

/// Strings fed to the meta-string encoders.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassNameParts {
    pub package: String,
    pub simple_name: String,
}

/// Everything before the last `.`, or `""` for the default package.
#[must_use]
pub fn package_of(qualified_name: &str) -> &str {
    qualified_name
        .rfind('.')
        .map_or("", |pos| &qualified_name[..pos])
}

/// Everything after the last `.`. Nested-class separators (`$`) are kept.
#[must_use]
pub fn simple_name_of(qualified_name: &str) -> &str {
    qualified_name
        .rfind('.')
        .map_or(qualified_name, |pos| &qualified_name[pos + 1..])
}

/// Derive the package and simple name of a type.
///
/// Returns `None` for arrays of primitives: those use the fixed tokens of
/// [`primitive_array_token`] and never go through this policy.
#[must_use]
pub fn derive_class_name(shape: &dyn TypeShape) -> Option<ClassNameParts> {
    if let Some((component, depth)) = shape.array_component() {
        if component.is_primitive() {
            return None;
        }
        let name = component.qualified_name();
        let mut simple_name = String::with_capacity(depth + 1 + name.len());
        simple_name.extend(std::iter::repeat(ARRAY_PREFIX).take(depth));
        if component.is_enum() {
            simple_name.push(ENUM_PREFIX);
        }
        simple_name.push_str(simple_name_of(name));
        return Some(ClassNameParts {
            package: package_of(name).to_string(),
            simple_name,
        });
    }

    let name = shape.qualified_name();
    let simple = simple_name_of(name);
    let simple_name = if shape.is_enum() {
        format!("{ENUM_PREFIX}{simple}")
    } else {
        simple.to_string()
    };
    Some(ClassNameParts {
        package: package_of(name).to_string(),
        simple_name,
    })
}

/// Descriptor token of a primitive array (`int[][]` -> `[[I`).
///
/// `None` when `shape` is not an array of primitives.
#[must_use]
pub fn primitive_array_token(shape: &dyn TypeShape) -> Option<String> {
    let (component, depth) = shape.array_component()?;
    if !component.is_primitive() {
        return None;
    }
    let code = primitive_code(component.qualified_name())?;
    let mut token: String = std::iter::repeat(ARRAY_DESCRIPTOR).take(depth).collect();
    token.push(code);
    Some(token)
}

fn primitive_code(name: &str) -> Option<char> {
    PRIMITIVE_CODES
        .iter()
        .find(|(primitive, _)| *primitive == name)
        .map(|(_, code)| *code)
}

fn primitive_name(code: char) -> Option<&'static str> {
    PRIMITIVE_CODES
        .iter()
        .find(|(_, c)| *c == code)
        .map(|(name, _)| *name)
}

/// Shape recovered from a package and simple name read off the wire.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedClassName {
    /// Package of the (innermost component) type.
    pub package: String,
    /// Unprefixed simple name of the (innermost component) type.
    pub simple_name: String,
    pub array_depth: usize,
    pub is_enum: bool,
    pub is_primitive_array: bool,
}

impl DecodedClassName {
    /// Qualified name of the component type, without array suffixes.
    #[must_use]
    pub fn component_name(&self) -> String {
        if self.package.is_empty() {
            self.simple_name.clone()
        } else {
            format!("{}.{}", self.package, self.simple_name)
        }
    }

    /// Qualified name as produced by [`TypeShape::qualified_name`].
    #[must_use]
    pub fn qualified_name(&self) -> String {
        let mut name = self.component_name();
        name.push_str(&"[]".repeat(self.array_depth));
        name
    }
}

/// Inverse of [`derive_class_name`] and [`primitive_array_token`].
#[must_use]
pub fn decode_class_name(package: &str, simple_name: &str) -> DecodedClassName {
    if package.is_empty() && simple_name.starts_with(ARRAY_DESCRIPTOR) {
        let rest = simple_name.trim_start_matches(ARRAY_DESCRIPTOR);
        let mut chars = rest.chars();
        if let (Some(code), None) = (chars.next(), chars.next()) {
            if let Some(primitive) = primitive_name(code) {
                return DecodedClassName {
                    package: String::new(),
                    simple_name: primitive.to_string(),
                    array_depth: simple_name.len() - rest.len(),
                    is_enum: false,
                    is_primitive_array: true,
                };
            }
        }
    }

    let rest = simple_name.trim_start_matches(ARRAY_PREFIX);
    let array_depth = simple_name.len() - rest.len();
    let (is_enum, rest) = match rest.strip_prefix(ENUM_PREFIX) {
        Some(stripped) => (true, stripped),
        None => (false, rest),
    };
    DecodedClassName {
        package: package.to_string(),
        simple_name: rest.to_string(),
        array_depth,
        is_enum,
        is_primitive_array: false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ClassDescriptor;

    fn parts(shape: &ClassDescriptor) -> (String, String) {
        let parts = derive_class_name(shape).expect("derivable");
        (parts.package, parts.simple_name)
    }

    #[test]
    fn plain_class_splits_at_last_dot() {
        let string = ClassDescriptor::class("java.lang.String");
        assert_eq!(parts(&string), ("java.lang".into(), "String".into()));

        let nested = ClassDescriptor::class("com.acme.Outer$Inner");
        assert_eq!(parts(&nested), ("com.acme".into(), "Outer$Inner".into()));

        let default_pkg = ClassDescriptor::interface("Runnable");
        assert_eq!(parts(&default_pkg), (String::new(), "Runnable".into()));
    }

    #[test]
    fn enum_gets_one_marker() {
        let color = ClassDescriptor::enumeration("com.acme.Color");
        assert_eq!(parts(&color), ("com.acme".into(), "2Color".into()));
    }

    #[test]
    fn array_markers_repeat_per_dimension() {
        let point = ClassDescriptor::class("com.acme.Point");
        for depth in 1..=4 {
            let array = ClassDescriptor::array_of(point.clone(), depth);
            let (package, simple) = parts(&array);
            assert_eq!(package, "com.acme");
            assert_eq!(simple, format!("{}Point", "1".repeat(depth)));
            let decoded = decode_class_name(&package, &simple);
            assert_eq!(decoded.array_depth, depth);
            assert!(!decoded.is_enum);
            assert_eq!(decoded.qualified_name(), array.qualified_name());
        }
    }

    #[test]
    fn enum_array_puts_enum_marker_after_array_markers() {
        let color = ClassDescriptor::enumeration("com.acme.Color");
        let grid = ClassDescriptor::array_of(color, 2);
        let (package, simple) = parts(&grid);
        assert_eq!(simple, "112Color");

        let decoded = decode_class_name(&package, &simple);
        assert_eq!(decoded.array_depth, 2);
        assert!(decoded.is_enum);
        assert_eq!(decoded.simple_name, "Color");
        assert_eq!(decoded.qualified_name(), "com.acme.Color[][]");
    }

    #[test]
    fn primitive_arrays_use_fixed_tokens() {
        let ints = ClassDescriptor::array_of(ClassDescriptor::primitive("int"), 2);
        assert!(derive_class_name(&ints).is_none());
        assert_eq!(primitive_array_token(&ints).as_deref(), Some("[[I"));

        let longs = ClassDescriptor::array_of(ClassDescriptor::primitive("long"), 1);
        assert_eq!(primitive_array_token(&longs).as_deref(), Some("[J"));

        let decoded = decode_class_name("", "[[I");
        assert!(decoded.is_primitive_array);
        assert_eq!(decoded.qualified_name(), "int[][]");

        let objects = ClassDescriptor::array_of(ClassDescriptor::class("a.B"), 1);
        assert!(primitive_array_token(&objects).is_none());
    }

    #[test]
    fn primitive_scalar_follows_plain_rule() {
        let int = ClassDescriptor::primitive("int");
        assert_eq!(parts(&int), (String::new(), "int".into()));
    }
}
