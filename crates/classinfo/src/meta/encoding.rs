// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Meta-string encoding ids and errors.

use std::fmt;
use thiserror::Error;

/// Meta-string errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MetaStringError {
    #[error("non-ASCII characters are not allowed in compact meta strings: {0:?}")]
    NonAscii(String),

    #[error("meta string of {0} chars is too long (limit 32766)")]
    TooLong(usize),

    #[error("character {ch:?} cannot be encoded with {encoding}")]
    UnencodableChar { ch: char, encoding: Encoding },

    #[error("unknown meta string encoding id {0}")]
    UnknownEncoding(u8),

    #[error("malformed meta string bytes: {0}")]
    Malformed(String),
}

/// Encoding of a meta string. The discriminant is written on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Encoding {
    Utf8 = 0,
    LowerSpecial = 1,
    LowerUpperDigitSpecial = 2,
    FirstToLowerSpecial = 3,
    AllToLowerSpecial = 4,
}

impl Encoding {
    #[inline]
    #[must_use]
    pub fn value(self) -> u8 {
        self as u8
    }

    /// Bits per packed char, `None` for UTF-8.
    #[must_use]
    pub fn bits_per_char(self) -> Option<usize> {
        match self {
            Encoding::Utf8 => None,
            Encoding::LowerUpperDigitSpecial => Some(6),
            Encoding::LowerSpecial
            | Encoding::FirstToLowerSpecial
            | Encoding::AllToLowerSpecial => Some(5),
        }
    }
}

impl TryFrom<u8> for Encoding {
    type Error = MetaStringError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Encoding::Utf8),
            1 => Ok(Encoding::LowerSpecial),
            2 => Ok(Encoding::LowerUpperDigitSpecial),
            3 => Ok(Encoding::FirstToLowerSpecial),
            4 => Ok(Encoding::AllToLowerSpecial),
            other => Err(MetaStringError::UnknownEncoding(other)),
        }
    }
}

impl fmt::Display for Encoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Encoding::Utf8 => "UTF_8",
            Encoding::LowerSpecial => "LOWER_SPECIAL",
            Encoding::LowerUpperDigitSpecial => "LOWER_UPPER_DIGIT_SPECIAL",
            Encoding::FirstToLowerSpecial => "FIRST_TO_LOWER_SPECIAL",
            Encoding::AllToLowerSpecial => "ALL_TO_LOWER_SPECIAL",
        };
        f.write_str(name)
    }
}
