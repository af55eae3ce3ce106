// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Class-header encoding: numeric id or package/class meta-string pair.

use std::collections::HashMap;
use std::sync::Arc;

use super::cursor::{Cursor, CursorMut};
use super::WireError;
use crate::config::{MAX_CLASS_ID, SMALL_STRING_THRESHOLD};
use crate::error::{Error, Result};
use crate::meta::Encoding;
use crate::resolver::{ClassId, ClassInfo, MetaStringBytes, MetaStringResolver};

/// Bit 0 of the first header: set for the name path.
const NAME_PATH_FLAG: u32 = 0b01;

/// Header bit layout for one meta string.
#[derive(Clone, Copy)]
struct Layout {
    shift: u32,
    flags: u32,
}

impl Layout {
    const fn ref_bit(self) -> u32 {
        1 << (self.shift - 1)
    }
}

/// Package header also carries the name-path flag.
const PACKAGE_LAYOUT: Layout = Layout {
    shift: 2,
    flags: NAME_PATH_FLAG,
};

const CLASS_NAME_LAYOUT: Layout = Layout { shift: 1, flags: 0 };

/// Meta strings already written in this session, by first-written order.
#[derive(Debug, Default)]
pub struct WriteSession {
    written: HashMap<Arc<MetaStringBytes>, u32>,
}

impl WriteSession {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Forget every back-reference (start of a new top-level message).
    pub fn reset(&mut self) {
        self.written.clear();
    }
}

/// Meta strings read so far in this session, indexed by back-reference id.
#[derive(Debug, Default)]
pub struct ReadSession {
    read: Vec<Arc<MetaStringBytes>>,
}

impl ReadSession {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reset(&mut self) {
        self.read.clear();
    }
}

/// Decoded class header, before it is resolved to a [`ClassInfo`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClassHeader {
    Id(ClassId),
    Names {
        package: Arc<MetaStringBytes>,
        class_name: Arc<MetaStringBytes>,
    },
}

/// Write the header identifying `info`.
pub fn write_class_header(
    cursor: &mut CursorMut<'_>,
    session: &mut WriteSession,
    info: &ClassInfo,
) -> Result<()> {
    if info.uses_name_path() {
        if let (Some(package), Some(class_name)) =
            (info.package_name_bytes(), info.class_name_bytes())
        {
            write_meta_string(cursor, session, package, PACKAGE_LAYOUT)?;
            write_meta_string(cursor, session, class_name, CLASS_NAME_LAYOUT)?;
            return Ok(());
        }
    }

    let id = info.class_id();
    if id.is_none() {
        return Err(Error::Invariant(format!(
            "{info:?} has neither a class id nor name bytes"
        )));
    }
    let raw = u32::try_from(id.get()).map_err(|_| WireError::InvalidClassId(id.get().into()))?;
    cursor.write_var_u32(raw << 1)?;
    Ok(())
}

/// Read one class header, interning any new meta strings into `strings`.
pub fn read_class_header(
    cursor: &mut Cursor<'_>,
    session: &mut ReadSession,
    strings: &MetaStringResolver,
) -> Result<ClassHeader> {
    let header = cursor.read_var_u32()?;
    if header & NAME_PATH_FLAG == 0 {
        let raw = header >> 1;
        return match i16::try_from(raw) {
            Ok(id) if id < MAX_CLASS_ID => Ok(ClassHeader::Id(ClassId::from_raw(id))),
            _ => Err(WireError::InvalidClassId(raw.into()).into()),
        };
    }

    let package = read_meta_string(cursor, session, strings, header, PACKAGE_LAYOUT)?;
    let class_header = cursor.read_var_u32()?;
    let class_name = read_meta_string(cursor, session, strings, class_header, CLASS_NAME_LAYOUT)?;
    Ok(ClassHeader::Names {
        package,
        class_name,
    })
}

fn write_meta_string(
    cursor: &mut CursorMut<'_>,
    session: &mut WriteSession,
    bytes: &Arc<MetaStringBytes>,
    layout: Layout,
) -> Result<()> {
    if let Some(id) = session.written.get(bytes).copied() {
        let header = ((id + 1) << layout.shift) | layout.flags | layout.ref_bit();
        cursor.write_var_u32(header)?;
        return Ok(());
    }

    let len = u32::try_from(bytes.len())
        .ok()
        .filter(|len| *len <= u32::MAX >> layout.shift)
        .ok_or(WireError::StringTooLong(bytes.len()))?;
    cursor.write_var_u32((len << layout.shift) | layout.flags)?;
    if bytes.len() > SMALL_STRING_THRESHOLD {
        cursor.write_i64_le(bytes.hash_code())?;
    } else {
        cursor.write_u8(bytes.encoding().value())?;
    }
    cursor.write_bytes(bytes.bytes())?;

    let id = u32::try_from(session.written.len()).map_err(|_| {
        WireError::StringTooLong(session.written.len())
    })?;
    session.written.insert(Arc::clone(bytes), id);
    Ok(())
}

fn read_meta_string(
    cursor: &mut Cursor<'_>,
    session: &mut ReadSession,
    strings: &MetaStringResolver,
    header: u32,
    layout: Layout,
) -> Result<Arc<MetaStringBytes>> {
    let value = header >> layout.shift;
    if header & layout.ref_bit() != 0 {
        let index = value
            .checked_sub(1)
            .and_then(|id| session.read.get(id as usize))
            .ok_or(WireError::UnknownStringRef(value.wrapping_sub(1)))?;
        return Ok(Arc::clone(index));
    }

    let len = value as usize;
    let handle = if len > SMALL_STRING_THRESHOLD {
        let hash_code = cursor.read_i64_le()?;
        let bytes = cursor.read_bytes(len)?;
        strings.get_or_create_big(bytes, hash_code)?
    } else {
        let encoding = Encoding::try_from(cursor.read_u8()?)?;
        let bytes = cursor.read_bytes(len)?;
        strings.get_or_create_small(bytes, encoding)
    };
    session.read.push(Arc::clone(&handle));
    Ok(handle)
}
