// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Class-header wire format.
//!
//! A class header is either a numeric id or a pair of meta strings:
//!
//! ```text
//! numeric id:   varuint32(id << 1)                       bit0 = 0
//! name path:    package header  (bit0 = 1, bit1 = back-reference)
//!               [package body]
//!               class header    (bit0 = back-reference)
//!               [class body]
//!
//! new string header:     len << shift | flags
//! back-reference header: (dyn_id + 1) << shift | flags | ref bit
//! body:                  i64 hash (len > 16) or u8 encoding, then len bytes
//! ```
//!
//! Back-reference ids are assigned per session in first-written order.

pub mod class_codec;
pub mod cursor;

pub use class_codec::{
    read_class_header, write_class_header, ClassHeader, ReadSession, WriteSession,
};
pub use cursor::{Cursor, CursorMut};

use thiserror::Error;

/// Low-level encoding or decoding failure.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WireError {
    #[error("write failed at offset {offset}: {reason}")]
    WriteFailed { offset: usize, reason: String },

    #[error("read failed at offset {offset}: {reason}")]
    ReadFailed { offset: usize, reason: String },

    #[error("var-int at offset {offset} does not fit in 32 bits")]
    VarIntOverflow { offset: usize },

    #[error("unknown meta string reference {0}")]
    UnknownStringRef(u32),

    #[error("meta string of {0} bytes is too long for a header")]
    StringTooLong(usize),

    #[error("class id {0} is out of range")]
    InvalidClassId(i64),
}

pub type WireResult<T> = core::result::Result<T, WireError>;
