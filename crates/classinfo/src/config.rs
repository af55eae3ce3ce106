// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Resolver configuration - single source of truth for wire constants.
//!
//! # Architecture
//!
//! - **Level 1 (Static)**: reserved class ids, name markers, meta-string
//!   thresholds. These are part of the wire protocol and must match every peer
//!   bit for bit. **NEVER hardcode them elsewhere!**
//! - **Level 2 (Dynamic)**: [`ResolverConfig`], fixed for the life of a resolver
//!   (peer language, registration policy, initial capacity).
//!
//! # Example
//!
//! ```ignore
//! use classinfo::config::*;
//!
//! let config = ResolverConfig::from_toml_str(r#"
//!     language = "python"
//!     require_class_registration = true
//! "#)?;
//! assert!(config.language.is_cross_language());
//! ```

#[cfg(feature = "config-loaders")]
use serde::{Deserialize, Serialize};
use std::fmt;
#[cfg(feature = "config-loaders")]
use std::path::Path;
use thiserror::Error;

// =======================================================================
// Reserved class ids
// =======================================================================

/// No numeric id assigned: the identity travels as package + class name.
pub const NO_CLASS_ID: i16 = 0;

/// Stub id for synthetic lambda classes (no portable name exists).
pub const LAMBDA_STUB_ID: i16 = 1;

/// Stub id for dynamic proxy classes (no portable name exists).
pub const PROXY_STUB_ID: i16 = 2;

/// Names are recomputed for a write-replace substitute class.
pub const REPLACE_STUB_ID: i16 = 3;

/// First id handed to builtin classes by the registry.
pub const FIRST_BUILTIN_CLASS_ID: i16 = REPLACE_STUB_ID + 1;

/// Exclusive upper bound for class ids.
///
/// Bit 0 of the wire-encoded id is the "name follows" flag, so the id is
/// shifted left once before encoding.
pub const MAX_CLASS_ID: i16 = i16::MAX / 2;

// =======================================================================
// Name markers
// =======================================================================

/// Prepended once per array dimension to the component's simple name.
pub const ARRAY_PREFIX: char = '1';

/// Prepended to the simple name of enums (and enum array components).
pub const ENUM_PREFIX: char = '2';

// =======================================================================
// Meta strings
// =======================================================================

/// Meta strings longer than this are written with their 64-bit hash
/// instead of a single encoding byte.
pub const SMALL_STRING_THRESHOLD: usize = 16;

/// Seed of the murmur3 hash identifying meta-string bytes.
pub const META_STRING_HASH_SEED: u64 = 47;

/// Longest accepted meta string (exclusive), in chars.
pub const MAX_META_STRING_LEN: usize = i16::MAX as usize;

/// Default capacity hint for resolver maps.
pub const DEFAULT_INITIAL_CAPACITY: usize = 64;

// =======================================================================
// Runtime configuration
// =======================================================================

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[cfg(feature = "config-loaders")]
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Language of the peer on the other side of the wire.
///
/// `Java` is the same-runtime mode: no full-name bytes are produced. Any other
/// value bridges to a foreign runtime that expects the fully-qualified name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "config-loaders", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "config-loaders", serde(rename_all = "lowercase"))]
pub enum Language {
    Xlang,
    #[default]
    Java,
    Python,
    Cpp,
    Go,
    Javascript,
    Rust,
}

impl Language {
    /// True when identities must also carry the fully-qualified name.
    #[inline]
    #[must_use]
    pub fn is_cross_language(self) -> bool {
        self != Language::Java
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Language::Xlang => "xlang",
            Language::Java => "java",
            Language::Python => "python",
            Language::Cpp => "cpp",
            Language::Go => "go",
            Language::Javascript => "javascript",
            Language::Rust => "rust",
        };
        f.write_str(name)
    }
}

/// Resolver configuration, fixed for the life of a resolver.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "config-loaders", derive(Serialize, Deserialize))]
pub struct ResolverConfig {
    /// Peer language.
    #[cfg_attr(feature = "config-loaders", serde(default))]
    pub language: Language,

    /// Reject classes that were never registered (dynamic classes are exempt).
    #[cfg_attr(feature = "config-loaders", serde(default))]
    pub require_class_registration: bool,

    /// Capacity hint for the identity cache and its indices.
    #[cfg_attr(
        feature = "config-loaders",
        serde(default = "default_initial_capacity")
    )]
    pub initial_capacity: usize,
}

#[cfg(feature = "config-loaders")]
fn default_initial_capacity() -> usize {
    DEFAULT_INITIAL_CAPACITY
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            language: Language::default(),
            require_class_registration: false,
            initial_capacity: DEFAULT_INITIAL_CAPACITY,
        }
    }
}

impl ResolverConfig {
    /// Same-runtime configuration for the given peer language.
    #[must_use]
    pub fn for_language(language: Language) -> Self {
        Self {
            language,
            ..Default::default()
        }
    }

    /// Load configuration from a TOML file.
    #[cfg(feature = "config-loaders")]
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Parse configuration from TOML text.
    #[cfg(feature = "config-loaders")]
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.initial_capacity == 0 {
            return Err(ConfigError::Invalid(
                "initial_capacity must be greater than zero".into(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reserved_ids_are_distinct_and_below_builtins() {
        let reserved = [NO_CLASS_ID, LAMBDA_STUB_ID, PROXY_STUB_ID, REPLACE_STUB_ID];
        for (i, a) in reserved.iter().enumerate() {
            for b in &reserved[i + 1..] {
                assert_ne!(a, b);
            }
            assert!(*a < FIRST_BUILTIN_CLASS_ID);
        }
        assert_eq!(MAX_CLASS_ID, 16383);
    }

    #[test]
    fn java_is_the_only_same_runtime_language() {
        assert!(!Language::Java.is_cross_language());
        for lang in [
            Language::Xlang,
            Language::Python,
            Language::Cpp,
            Language::Go,
            Language::Javascript,
            Language::Rust,
        ] {
            assert!(lang.is_cross_language(), "{lang} should bridge");
        }
    }

    #[test]
    fn zero_capacity_is_rejected() {
        let config = ResolverConfig {
            initial_capacity: 0,
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }

    #[cfg(feature = "config-loaders")]
    #[test]
    fn toml_defaults_fill_missing_fields() {
        let config = ResolverConfig::from_toml_str("language = \"python\"\n")
            .expect("valid TOML should parse");
        assert_eq!(config.language, Language::Python);
        assert!(!config.require_class_registration);
        assert_eq!(config.initial_capacity, DEFAULT_INITIAL_CAPACITY);
    }

    #[cfg(feature = "config-loaders")]
    #[test]
    fn toml_validation_runs_after_parse() {
        let err = ResolverConfig::from_toml_str("initial_capacity = 0\n").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));

        let err = ResolverConfig::from_toml_str("language = \"cobol\"\n").unwrap_err();
        assert!(matches!(err, ConfigError::Toml(_)));
    }

    #[cfg(feature = "config-loaders")]
    #[test]
    fn loads_from_file() {
        use std::io::Write;

        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        writeln!(
            file,
            "language = \"rust\"\nrequire_class_registration = true\ninitial_capacity = 8"
        )
        .expect("write config");

        let config = ResolverConfig::from_file(file.path()).expect("config should load");
        assert_eq!(
            config,
            ResolverConfig {
                language: Language::Rust,
                require_class_registration: true,
                initial_capacity: 8,
            }
        );
    }
}
