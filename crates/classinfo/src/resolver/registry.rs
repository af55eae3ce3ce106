// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Bidirectional `TypeKey <-> ClassId` registry.
//!
//! Ids below [`FIRST_BUILTIN_CLASS_ID`] are sentinels and never assigned. The
//! builtins (primitives, `java.lang.String`, primitive arrays) take the ids
//! right after them in a fixed order shared with every peer.

use parking_lot::RwLock;
use std::collections::HashMap;

use super::class_id::ClassId;
use crate::config::{FIRST_BUILTIN_CLASS_ID, MAX_CLASS_ID};
use crate::error::{Error, Result};
use crate::types::{TypeKey, PRIMITIVE_NAMES};

const STRING_CLASS_NAME: &str = "java.lang.String";

/// Builtin class names in id order.
#[must_use]
pub fn builtin_class_names() -> Vec<String> {
    let mut names: Vec<String> = PRIMITIVE_NAMES.iter().map(|name| (*name).to_string()).collect();
    names.push(STRING_CLASS_NAME.to_string());
    names.extend(
        PRIMITIVE_NAMES
            .iter()
            .filter(|name| **name != "void")
            .map(|name| format!("{name}[]")),
    );
    names
}

#[derive(Debug, Default)]
struct Tables {
    by_key: HashMap<TypeKey, ClassId>,
    by_id: HashMap<ClassId, TypeKey>,
    next_id: i16,
}

impl Tables {
    fn bind(&mut self, key: TypeKey, id: ClassId) {
        self.by_id.insert(id, key.clone());
        self.by_key.insert(key, id);
    }
}

/// Numeric id allocation and lookup.
#[derive(Debug)]
pub struct ClassIdRegistry {
    tables: RwLock<Tables>,
    builtin_end: i16,
}

impl ClassIdRegistry {
    /// Registry holding only the builtins.
    #[must_use]
    pub fn new() -> Self {
        let mut tables = Tables {
            next_id: FIRST_BUILTIN_CLASS_ID,
            ..Tables::default()
        };
        for name in builtin_class_names() {
            let id = ClassId::from_raw(tables.next_id);
            tables.bind(TypeKey::from(name), id);
            tables.next_id += 1;
        }
        let builtin_end = tables.next_id;
        Self {
            tables: RwLock::new(tables),
            builtin_end,
        }
    }

    /// Assign the next free id to `key`. Idempotent for an already registered key.
    pub fn register(&self, key: TypeKey) -> Result<ClassId> {
        let mut tables = self.tables.write();
        if let Some(existing) = tables.by_key.get(&key) {
            return Ok(*existing);
        }
        while tables.by_id.contains_key(&ClassId::from_raw(tables.next_id)) {
            tables.next_id += 1;
        }
        if tables.next_id >= MAX_CLASS_ID {
            return Err(Error::InvalidArgument(format!(
                "class id space exhausted registering {key}"
            )));
        }
        let id = ClassId::from_raw(tables.next_id);
        tables.next_id += 1;
        log::debug!("[registry] {} -> {}", key, id);
        tables.bind(key, id);
        Ok(id)
    }

    /// Bind `key` to a caller-chosen id.
    pub fn register_with_id(&self, key: TypeKey, id: ClassId) -> Result<ClassId> {
        let id = ClassId::new(id.get())?;
        if id.is_reserved() {
            return Err(Error::InvalidArgument(format!(
                "class id {id} is reserved"
            )));
        }

        let mut tables = self.tables.write();
        if let Some(existing) = tables.by_key.get(&key).copied() {
            if existing == id {
                return Ok(id);
            }
            log::warn!(
                "[registry] {} already registered with id {}, refusing {}",
                key,
                existing,
                id
            );
            return Err(Error::RegistrationConflict {
                class: key.to_string(),
                id: id.get(),
                existing: existing.to_string(),
            });
        }
        if let Some(owner) = tables.by_id.get(&id) {
            log::warn!("[registry] id {} already bound to {}, refusing {}", id, owner, key);
            return Err(Error::RegistrationConflict {
                class: key.to_string(),
                id: id.get(),
                existing: owner.to_string(),
            });
        }
        log::debug!("[registry] {} -> {}", key, id);
        tables.bind(key, id);
        Ok(id)
    }

    #[must_use]
    pub fn lookup(&self, name: &str) -> Option<ClassId> {
        self.tables.read().by_key.get(name).copied()
    }

    #[must_use]
    pub fn class_key(&self, id: ClassId) -> Option<TypeKey> {
        self.tables.read().by_id.get(&id).cloned()
    }

    /// Id belongs to the builtin block.
    #[must_use]
    pub fn is_builtin(&self, id: ClassId) -> bool {
        (FIRST_BUILTIN_CLASS_ID..self.builtin_end).contains(&id.get())
    }

    /// Number of registered classes, builtins included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tables.read().by_key.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for ClassIdRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtins_follow_the_sentinels() {
        let registry = ClassIdRegistry::new();
        assert_eq!(registry.lookup("void"), Some(ClassId::from_raw(4)));
        assert_eq!(registry.lookup("double"), Some(ClassId::from_raw(12)));
        assert_eq!(registry.lookup("java.lang.String"), Some(ClassId::from_raw(13)));
        assert_eq!(registry.lookup("boolean[]"), Some(ClassId::from_raw(14)));
        assert_eq!(registry.lookup("double[]"), Some(ClassId::from_raw(21)));
        assert!(registry.lookup("void[]").is_none());
        assert_eq!(registry.len(), 18);
        assert!(registry.is_builtin(ClassId::from_raw(13)));
        assert!(!registry.is_builtin(ClassId::from_raw(22)));
    }

    #[test]
    fn register_allocates_after_builtins_and_is_idempotent() {
        let registry = ClassIdRegistry::new();
        let widget = registry.register("com.acme.Widget".into()).expect("register");
        assert_eq!(widget.get(), 22);
        let again = registry.register("com.acme.Widget".into()).expect("register");
        assert_eq!(widget, again);
        assert_eq!(
            registry.class_key(widget).map(|key| key.to_string()),
            Some("com.acme.Widget".to_string())
        );
    }

    #[test]
    fn register_skips_ids_taken_explicitly() {
        let registry = ClassIdRegistry::new();
        registry
            .register_with_id("com.acme.Fixed".into(), ClassId::from_raw(22))
            .expect("explicit");
        let next = registry.register("com.acme.Next".into()).expect("register");
        assert_eq!(next.get(), 23);
    }

    #[test]
    fn explicit_ids_are_validated() {
        let registry = ClassIdRegistry::new();
        for bad in [0, 1, 2, 3, -5, MAX_CLASS_ID] {
            let err = registry
                .register_with_id("com.acme.Bad".into(), ClassId::from_raw(bad))
                .unwrap_err();
            assert!(matches!(err, Error::InvalidArgument(_)), "id {bad}");
        }
    }

    #[test]
    fn conflicts_are_reported_both_ways() {
        let registry = ClassIdRegistry::new();
        registry
            .register_with_id("com.acme.Widget".into(), ClassId::from_raw(300))
            .expect("first");
        assert!(registry
            .register_with_id("com.acme.Widget".into(), ClassId::from_raw(300))
            .is_ok());

        let err = registry
            .register_with_id("com.acme.Gadget".into(), ClassId::from_raw(300))
            .unwrap_err();
        assert!(matches!(
            err,
            Error::RegistrationConflict { ref existing, .. } if existing == "com.acme.Widget"
        ));

        let err = registry
            .register_with_id("com.acme.Widget".into(), ClassId::from_raw(301))
            .unwrap_err();
        assert!(matches!(err, Error::RegistrationConflict { id: 301, .. }));

        let err = registry
            .register_with_id("com.acme.Other".into(), ClassId::from_raw(13))
            .unwrap_err();
        assert!(matches!(err, Error::RegistrationConflict { .. }));
    }
}
