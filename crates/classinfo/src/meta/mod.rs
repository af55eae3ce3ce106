// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Meta strings: compact bit-packed encodings for package and class names.
//!
//! Names on the wire are mostly lowercase ASCII with a few separators, so most
//! of them fit in 5 or 6 bits per char. The encoder picks the tightest of five
//! encodings; the decoder needs the encoding id and the two special chars of
//! the encoder that produced the bytes.
//!
//! | Encoding | Bits | Alphabet |
//! |----------|------|----------|
//! | `Utf8` | 8+ | anything |
//! | `LowerSpecial` | 5 | `a-z . _ $ \|` |
//! | `LowerUpperDigitSpecial` | 6 | `a-z A-Z 0-9` + 2 specials |
//! | `FirstToLowerSpecial` | 5 | LowerSpecial, first char upper-cased |
//! | `AllToLowerSpecial` | 5 | LowerSpecial, `\|x` marks an upper-case `X` |

pub mod decoder;
pub mod encoder;
pub mod encoding;
pub mod murmur;

pub use decoder::{MetaStringDecoder, PACKAGE_DECODER, TYPE_NAME_DECODER};
pub use encoder::{MetaString, MetaStringEncoder, PACKAGE_ENCODER, TYPE_NAME_ENCODER};
pub use encoding::{Encoding, MetaStringError};
pub use murmur::murmurhash3_x64_128;
