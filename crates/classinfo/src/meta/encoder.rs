// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Meta-string encoder.

use super::encoding::{Encoding, MetaStringError};
use crate::config::MAX_META_STRING_LEN;

/// Encoder for package names (`com.acme.model`).
pub const PACKAGE_ENCODER: MetaStringEncoder = MetaStringEncoder::new('.', '_');

/// Encoder for simple class names (`Outer$Inner`, `12Color`).
pub const TYPE_NAME_ENCODER: MetaStringEncoder = MetaStringEncoder::new('$', '_');

/// Encoded name plus everything needed to decode it again.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MetaString {
    pub original: String,
    pub encoding: Encoding,
    pub special_char1: char,
    pub special_char2: char,
    pub bytes: Vec<u8>,
}

/// Bit-packing encoder parameterized by the two LUDS special chars.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MetaStringEncoder {
    special_char1: char,
    special_char2: char,
}

struct Statistics {
    digit_count: usize,
    upper_count: usize,
    can_lower_special: bool,
    can_lower_upper_digit_special: bool,
}

impl MetaStringEncoder {
    #[must_use]
    pub const fn new(special_char1: char, special_char2: char) -> Self {
        Self {
            special_char1,
            special_char2,
        }
    }

    /// Encode with the tightest encoding that fits `input`.
    pub fn encode(&self, input: &str) -> Result<MetaString, MetaStringError> {
        if input.is_empty() {
            return Ok(self.empty(input));
        }
        self.encode_with(input, self.compute_encoding(input))
    }

    /// Encode with a caller-chosen encoding.
    pub fn encode_with(
        &self,
        input: &str,
        encoding: Encoding,
    ) -> Result<MetaString, MetaStringError> {
        let len = input.chars().count();
        if len >= MAX_META_STRING_LEN {
            return Err(MetaStringError::TooLong(len));
        }
        if input.is_empty() {
            return Ok(self.empty(input));
        }
        if encoding != Encoding::Utf8 && !input.is_ascii() {
            return Err(MetaStringError::NonAscii(input.to_string()));
        }
        let bytes = match encoding {
            Encoding::Utf8 => input.as_bytes().to_vec(),
            Encoding::LowerSpecial => self.encode_lower_special(input.as_bytes())?,
            Encoding::LowerUpperDigitSpecial => self.encode_lower_upper_digit_special(input)?,
            Encoding::FirstToLowerSpecial => {
                let mut chars = input.as_bytes().to_vec();
                chars[0] = chars[0].to_ascii_lowercase();
                self.encode_lower_special(&chars)?
            }
            Encoding::AllToLowerSpecial => {
                let mut chars = Vec::with_capacity(input.len() * 2);
                for c in input.bytes() {
                    if c.is_ascii_uppercase() {
                        chars.push(b'|');
                        chars.push(c.to_ascii_lowercase());
                    } else {
                        chars.push(c);
                    }
                }
                self.encode_lower_special(&chars)?
            }
        };
        Ok(MetaString {
            original: input.to_string(),
            encoding,
            special_char1: self.special_char1,
            special_char2: self.special_char2,
            bytes,
        })
    }

    /// Pick the encoding `encode` would use.
    #[must_use]
    pub fn compute_encoding(&self, input: &str) -> Encoding {
        if input.is_empty() {
            return Encoding::LowerSpecial;
        }
        let stats = self.statistics(input);
        if stats.can_lower_special {
            return Encoding::LowerSpecial;
        }
        if stats.can_lower_upper_digit_special {
            if stats.digit_count != 0 {
                return Encoding::LowerUpperDigitSpecial;
            }
            let len = input.len();
            let first_upper = input.as_bytes()[0].is_ascii_uppercase();
            if stats.upper_count == 1 && first_upper {
                return Encoding::FirstToLowerSpecial;
            }
            if (len + stats.upper_count) * 5 < len * 6 {
                return Encoding::AllToLowerSpecial;
            }
            return Encoding::LowerUpperDigitSpecial;
        }
        Encoding::Utf8
    }

    fn empty(&self, input: &str) -> MetaString {
        MetaString {
            original: input.to_string(),
            encoding: Encoding::Utf8,
            special_char1: self.special_char1,
            special_char2: self.special_char2,
            bytes: Vec::new(),
        }
    }

    fn statistics(&self, input: &str) -> Statistics {
        let mut stats = Statistics {
            digit_count: 0,
            upper_count: 0,
            can_lower_special: true,
            can_lower_upper_digit_special: true,
        };
        for c in input.chars() {
            if stats.can_lower_upper_digit_special
                && !(c.is_ascii_alphanumeric()
                    || c == self.special_char1
                    || c == self.special_char2)
            {
                stats.can_lower_upper_digit_special = false;
            }
            if stats.can_lower_special && !is_lower_special(c) {
                stats.can_lower_special = false;
            }
            if c.is_ascii_digit() {
                stats.digit_count += 1;
            }
            if c.is_ascii_uppercase() {
                stats.upper_count += 1;
            }
        }
        stats
    }

    fn encode_lower_special(&self, chars: &[u8]) -> Result<Vec<u8>, MetaStringError> {
        let values = chars
            .iter()
            .map(|&c| {
                lower_special_value(c).ok_or(MetaStringError::UnencodableChar {
                    ch: c as char,
                    encoding: Encoding::LowerSpecial,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(pack(&values, 5))
    }

    fn encode_lower_upper_digit_special(&self, input: &str) -> Result<Vec<u8>, MetaStringError> {
        let values = input
            .chars()
            .map(|c| {
                self.lower_upper_digit_special_value(c)
                    .ok_or(MetaStringError::UnencodableChar {
                        ch: c,
                        encoding: Encoding::LowerUpperDigitSpecial,
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(pack(&values, 6))
    }

    fn lower_upper_digit_special_value(&self, c: char) -> Option<u8> {
        match c {
            'a'..='z' => Some(c as u8 - b'a'),
            'A'..='Z' => Some(c as u8 - b'A' + 26),
            '0'..='9' => Some(c as u8 - b'0' + 52),
            _ if c == self.special_char1 => Some(62),
            _ if c == self.special_char2 => Some(63),
            _ => None,
        }
    }
}

fn is_lower_special(c: char) -> bool {
    c.is_ascii_lowercase() || matches!(c, '.' | '_' | '$' | '|')
}

fn lower_special_value(c: u8) -> Option<u8> {
    match c {
        b'a'..=b'z' => Some(c - b'a'),
        b'.' => Some(26),
        b'_' => Some(27),
        b'$' => Some(28),
        b'|' => Some(29),
        _ => None,
    }
}

/// Pack values MSB-first starting at bit 1. Bit 0 flags that the trailing
/// slot is padding, not a char.
fn pack(values: &[u8], bits_per_char: usize) -> Vec<u8> {
    let total_bits = values.len() * bits_per_char + 1;
    let byte_len = total_bits.div_ceil(8);
    let mut bytes = vec![0u8; byte_len];
    let mut current_bit = 1;
    for &value in values {
        for i in (0..bits_per_char).rev() {
            if value & (1 << i) != 0 {
                bytes[current_bit / 8] |= 1 << (7 - current_bit % 8);
            }
            current_bit += 1;
        }
    }
    if byte_len * 8 >= total_bits + bits_per_char {
        bytes[0] |= 0x80;
    }
    bytes
}
