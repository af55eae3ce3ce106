// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Stub-id classification of dynamically generated types.
//!
//! Lambdas and proxies get per-process synthetic names that no receiver can
//! resolve, not even the same runtime in a later process. They are identified
//! by a reserved stub id instead; how their values actually travel is decided
//! by a substitute-object protocol outside the resolver.

use super::class_id::ClassId;
use crate::types::TypeShape;

/// Kind of dynamically generated type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StubKind {
    Lambda,
    Proxy,
}

impl StubKind {
    #[must_use]
    pub fn class_id(self) -> ClassId {
        match self {
            StubKind::Lambda => ClassId::LAMBDA_STUB,
            StubKind::Proxy => ClassId::PROXY_STUB,
        }
    }
}

/// Outcome of classifying a type against a requested id.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Classification {
    pub class_id: ClassId,
    pub stub: Option<StubKind>,
}

impl Classification {
    #[must_use]
    pub fn is_dynamic(&self) -> bool {
        self.stub.is_some()
    }
}

/// Stub kind of `shape`, lambda checked first.
#[must_use]
pub fn stub_kind(shape: &dyn TypeShape) -> Option<StubKind> {
    if shape.is_lambda() {
        Some(StubKind::Lambda)
    } else if shape.is_proxy() {
        Some(StubKind::Proxy)
    } else {
        None
    }
}

/// Final id for `shape`: the stub id for dynamic types (overriding any
/// requested id), `requested` otherwise.
#[must_use]
pub fn classify(shape: Option<&dyn TypeShape>, requested: ClassId) -> Classification {
    match shape.and_then(stub_kind) {
        Some(stub) => Classification {
            class_id: stub.class_id(),
            stub: Some(stub),
        },
        None => Classification {
            class_id: requested,
            stub: None,
        },
    }
}
