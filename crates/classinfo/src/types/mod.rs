// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Runtime type shapes.
//!
//! The resolver never walks a concrete type hierarchy. It asks a [`TypeShape`]
//! a handful of structural questions (array? enum? lambda? proxy?) and derives
//! everything else from the answers. [`ClassDescriptor`] is the bundled
//! implementation; embedders with their own reflection facility implement the
//! trait directly.

pub mod descriptor;
pub mod shape;

pub use descriptor::{ClassDescriptor, ClassKind, PRIMITIVE_NAMES};
pub use shape::{TypeKey, TypeRef, TypeShape};
