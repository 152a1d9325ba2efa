use std::fmt;

use serde::{Deserialize, Serialize};

/// Identity of a nominal class or interface declaration inside a
/// [`crate::TypeStore`].
///
/// Ids are interned per store; comparing ids from different stores is
/// meaningless.
#[derive(
    Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct ClassId(pub(crate) u32);

impl ClassId {
    pub fn from_raw(raw: u32) -> Self {
        Self(raw)
    }

    pub fn to_raw(self) -> u32 {
        self.0
    }
}

impl fmt::Debug for ClassId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ClassId({})", self.0)
    }
}

/// Identity of a type-variable declaration.
///
/// Explicit type parameters are allocated by the owning [`crate::TypeStore`].
/// Capture variables are allocated by a [`crate::CaptureContext`] overlay and
/// carry a high-bit marker so lookups route to the context's local arena (see
/// `capture.rs`).
#[derive(
    Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct TypeVarId(pub(crate) u32);

impl TypeVarId {
    pub fn from_raw(raw: u32) -> Self {
        Self(raw)
    }

    pub fn to_raw(self) -> u32 {
        self.0
    }
}

impl fmt::Debug for TypeVarId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(idx) = self.context_local_index() {
            write!(f, "TypeVarId(local {idx})")
        } else {
            write!(f, "TypeVarId({})", self.0)
        }
    }
}
