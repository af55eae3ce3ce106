// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Numeric class ids and their reserved sentinels.

use std::fmt;

use crate::config::{
    FIRST_BUILTIN_CLASS_ID, LAMBDA_STUB_ID, MAX_CLASS_ID, NO_CLASS_ID, PROXY_STUB_ID,
    REPLACE_STUB_ID,
};
use crate::error::{Error, Result};

/// Numeric wire id of a class.
///
/// Values below [`FIRST_BUILTIN_CLASS_ID`] are sentinels, never real ids.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ClassId(i16);

impl ClassId {
    /// No id assigned: use the name-encoding path.
    pub const NONE: Self = Self(NO_CLASS_ID);
    /// Lambda stub sentinel.
    pub const LAMBDA_STUB: Self = Self(LAMBDA_STUB_ID);
    /// Proxy stub sentinel.
    pub const PROXY_STUB: Self = Self(PROXY_STUB_ID);
    /// Recompute names for a write-replace substitute class.
    pub const REPLACE_STUB: Self = Self(REPLACE_STUB_ID);

    /// Validate an id read from configuration or user code.
    pub fn new(id: i16) -> Result<Self> {
        if !(0..MAX_CLASS_ID).contains(&id) {
            return Err(Error::InvalidArgument(format!(
                "class id {id} out of range 0..{MAX_CLASS_ID}"
            )));
        }
        Ok(Self(id))
    }

    /// Trust the caller (constants, wire values already range-checked).
    #[inline]
    #[must_use]
    pub const fn from_raw(id: i16) -> Self {
        Self(id)
    }

    #[inline]
    #[must_use]
    pub const fn get(self) -> i16 {
        self.0
    }

    #[inline]
    #[must_use]
    pub fn is_none(self) -> bool {
        self == Self::NONE
    }

    /// Reserved sentinel (unset, stub, or replace).
    #[inline]
    #[must_use]
    pub fn is_reserved(self) -> bool {
        self.0 < FIRST_BUILTIN_CLASS_ID
    }

    /// Lambda or proxy stub.
    #[inline]
    #[must_use]
    pub fn is_dynamic_stub(self) -> bool {
        self == Self::LAMBDA_STUB || self == Self::PROXY_STUB
    }

    /// Identity must be carried by package and class name bytes.
    #[inline]
    #[must_use]
    pub fn needs_name(self) -> bool {
        self == Self::NONE || self == Self::REPLACE_STUB
    }
}

impl Default for ClassId {
    fn default() -> Self {
        Self::NONE
    }
}

impl fmt::Debug for ClassId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Self::NONE => write!(f, "ClassId(NONE)"),
            Self::LAMBDA_STUB => write!(f, "ClassId(LAMBDA_STUB)"),
            Self::PROXY_STUB => write!(f, "ClassId(PROXY_STUB)"),
            Self::REPLACE_STUB => write!(f, "ClassId(REPLACE_STUB)"),
            Self(id) => write!(f, "ClassId({id})"),
        }
    }
}

impl fmt::Display for ClassId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
