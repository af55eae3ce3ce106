// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Meta-string decoder.

use super::encoding::{Encoding, MetaStringError};

/// Decoder matching [`super::PACKAGE_ENCODER`].
pub const PACKAGE_DECODER: MetaStringDecoder = MetaStringDecoder::new('.', '_');

/// Decoder matching [`super::TYPE_NAME_ENCODER`].
pub const TYPE_NAME_DECODER: MetaStringDecoder = MetaStringDecoder::new('$', '_');

/// Inverse of [`super::MetaStringEncoder`] for the same special chars.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MetaStringDecoder {
    special_char1: char,
    special_char2: char,
}

impl MetaStringDecoder {
    #[must_use]
    pub const fn new(special_char1: char, special_char2: char) -> Self {
        Self {
            special_char1,
            special_char2,
        }
    }

    pub fn decode(&self, bytes: &[u8], encoding: Encoding) -> Result<String, MetaStringError> {
        if bytes.is_empty() {
            return Ok(String::new());
        }
        match encoding {
            Encoding::Utf8 => String::from_utf8(bytes.to_vec())
                .map_err(|e| MetaStringError::Malformed(e.to_string())),
            Encoding::LowerSpecial => decode_lower_special(bytes),
            Encoding::LowerUpperDigitSpecial => unpack(bytes, 6)
                .into_iter()
                .map(|v| self.lower_upper_digit_special_char(v))
                .collect(),
            Encoding::FirstToLowerSpecial => {
                let mut decoded = decode_lower_special(bytes)?;
                if let Some(first) = decoded.get_mut(0..1) {
                    first.make_ascii_uppercase();
                }
                Ok(decoded)
            }
            Encoding::AllToLowerSpecial => {
                let lowered = decode_lower_special(bytes)?;
                let mut decoded = String::with_capacity(lowered.len());
                let mut chars = lowered.chars();
                while let Some(c) = chars.next() {
                    if c == '|' {
                        let next = chars.next().ok_or_else(|| {
                            MetaStringError::Malformed("dangling upper-case marker".into())
                        })?;
                        decoded.push(next.to_ascii_uppercase());
                    } else {
                        decoded.push(c);
                    }
                }
                Ok(decoded)
            }
        }
    }

    fn lower_upper_digit_special_char(&self, value: u8) -> Result<char, MetaStringError> {
        match value {
            0..=25 => Ok((b'a' + value) as char),
            26..=51 => Ok((b'A' + value - 26) as char),
            52..=61 => Ok((b'0' + value - 52) as char),
            62 => Ok(self.special_char1),
            63 => Ok(self.special_char2),
            _ => Err(MetaStringError::Malformed(format!(
                "6-bit value {value} out of range"
            ))),
        }
    }
}

fn decode_lower_special(bytes: &[u8]) -> Result<String, MetaStringError> {
    unpack(bytes, 5)
        .into_iter()
        .map(|v| match v {
            0..=25 => Ok((b'a' + v) as char),
            26 => Ok('.'),
            27 => Ok('_'),
            28 => Ok('$'),
            29 => Ok('|'),
            _ => Err(MetaStringError::Malformed(format!(
                "5-bit value {v} out of range"
            ))),
        })
        .collect()
}

/// Read `bits_per_char` wide values MSB-first from bit 1, dropping the
/// padding slot when bit 0 is set.
fn unpack(bytes: &[u8], bits_per_char: usize) -> Vec<u8> {
    let total_bits = bytes.len() * 8;
    let strip_last = bytes[0] & 0x80 != 0;
    let mut count = (total_bits - 1) / bits_per_char;
    if strip_last {
        count = count.saturating_sub(1);
    }
    let mut values = Vec::with_capacity(count);
    let mut bit = 1;
    for _ in 0..count {
        let mut value = 0u8;
        for _ in 0..bits_per_char {
            let set = bytes[bit / 8] & (1 << (7 - bit % 8)) != 0;
            value = (value << 1) | u8::from(set);
            bit += 1;
        }
        values.push(value);
    }
    values
}
