// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Error types for class resolution.
//!
//! Two classes of failure matter to callers:
//!
//! - **Invalid argument**: the caller asked for something that has no identity
//!   (null type, no id, no tag) or tried to register a class that can never be
//!   registered. Fatal to that single call.
//! - **Invariant violation**: a non-null type produced no usable name. This is a
//!   gap in name derivation, not a recoverable condition. Do not retry it.

use thiserror::Error;

use crate::config::ConfigError;
use crate::meta::MetaStringError;
use crate::wire::WireError;

/// Errors surfaced by the resolver.
#[derive(Debug, Error)]
pub enum Error {
    /// The request carries no identity or names a class that cannot be registered.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Derived identity is malformed for a non-null type.
    #[error("Invariant violated: {0}")]
    Invariant(String),

    /// Meta-string encoding or decoding failed.
    #[error("Meta string error: {0}")]
    Encoding(#[from] MetaStringError),

    /// Class header could not be written or read.
    #[error("Wire error: {0}")]
    Wire(#[from] WireError),

    /// No identity is registered under the numeric id read from the wire.
    #[error("Unknown class id: {0}")]
    UnknownClassId(i16),

    /// No known class matches the package and class name read from the wire.
    #[error("Unknown class: package '{package}', name '{name}'")]
    UnknownClassName { package: String, name: String },

    /// Id or class already bound to something else.
    #[error("Registration conflict: {class} -> {id} (existing: {existing})")]
    RegistrationConflict {
        class: String,
        id: i16,
        existing: String,
    },

    /// Strict registration is enabled and the class was never registered.
    #[error("Class {0} is not registered")]
    RegistrationRequired(String),

    /// Resolver configuration is unusable.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

/// Convenient alias for resolver results.
pub type Result<T> = core::result::Result<T, Error>;
