// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Bounds-checked read/write cursors for class headers.

use super::{WireError, WireResult};

/// Generate little-endian write methods for fixed-width integers.
macro_rules! impl_write_le {
    ($name:ident, $type:ty) => {
        pub fn $name(&mut self, value: $type) -> WireResult<()> {
            self.write_bytes(&value.to_le_bytes())
        }
    };
}

/// Generate little-endian read methods for fixed-width integers.
macro_rules! impl_read_le {
    ($name:ident, $type:ty, $size:expr) => {
        pub fn $name(&mut self) -> WireResult<$type> {
            let mut bytes = [0u8; $size];
            bytes.copy_from_slice(self.read_bytes($size)?);
            Ok(<$type>::from_le_bytes(bytes))
        }
    };
}

/// Generate `offset` and `remaining`, shared by both cursors.
macro_rules! impl_cursor_common {
    () => {
        pub fn offset(&self) -> usize {
            self.offset
        }

        pub fn remaining(&self) -> usize {
            self.buffer.len().saturating_sub(self.offset)
        }
    };
}

/// Mutable cursor for writing into a caller-provided buffer.
pub struct CursorMut<'a> {
    buffer: &'a mut [u8],
    offset: usize,
}

impl<'a> CursorMut<'a> {
    pub fn new(buffer: &'a mut [u8]) -> Self {
        Self { buffer, offset: 0 }
    }

    impl_write_le!(write_i64_le, i64);

    pub fn write_u8(&mut self, value: u8) -> WireResult<()> {
        self.write_bytes(&[value])
    }

    /// Little-endian base-128, at most five bytes.
    pub fn write_var_u32(&mut self, mut value: u32) -> WireResult<()> {
        let mut scratch = [0u8; 5];
        let mut len = 0;
        loop {
            let low = (value & 0x7f) as u8;
            value >>= 7;
            if value == 0 {
                scratch[len] = low;
                len += 1;
                break;
            }
            scratch[len] = low | 0x80;
            len += 1;
        }
        self.write_bytes(&scratch[..len])
    }

    pub fn write_bytes(&mut self, data: &[u8]) -> WireResult<()> {
        if self.offset + data.len() > self.buffer.len() {
            return Err(WireError::WriteFailed {
                offset: self.offset,
                reason: "buffer too small".into(),
            });
        }
        self.buffer[self.offset..self.offset + data.len()].copy_from_slice(data);
        self.offset += data.len();
        Ok(())
    }

    /// Bytes written so far.
    pub fn written(&self) -> &[u8] {
        &self.buffer[..self.offset]
    }

    impl_cursor_common!();
}

/// Cursor for reading (bounds-checked, zero-copy).
pub struct Cursor<'a> {
    buffer: &'a [u8],
    offset: usize,
}

impl<'a> Cursor<'a> {
    pub fn new(buffer: &'a [u8]) -> Self {
        Self { buffer, offset: 0 }
    }

    impl_read_le!(read_i64_le, i64, 8);

    pub fn read_u8(&mut self) -> WireResult<u8> {
        Ok(self.read_bytes(1)?[0])
    }

    pub fn read_var_u32(&mut self) -> WireResult<u32> {
        let start = self.offset;
        let mut value: u32 = 0;
        for shift in (0..35).step_by(7) {
            let byte = self.read_u8()?;
            let chunk = u32::from(byte & 0x7f);
            if shift == 28 && chunk > 0x0f {
                return Err(WireError::VarIntOverflow { offset: start });
            }
            value |= chunk << shift;
            if byte & 0x80 == 0 {
                return Ok(value);
            }
        }
        Err(WireError::VarIntOverflow { offset: start })
    }

    pub fn read_bytes(&mut self, len: usize) -> WireResult<&'a [u8]> {
        if len > self.remaining() {
            return Err(WireError::ReadFailed {
                offset: self.offset,
                reason: "unexpected end of buffer".into(),
            });
        }
        let slice = &self.buffer[self.offset..self.offset + len];
        self.offset += len;
        Ok(slice)
    }

    impl_cursor_common!();

    pub fn is_eof(&self) -> bool {
        self.offset >= self.buffer.len()
    }
}
