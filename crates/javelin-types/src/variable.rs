use serde::{Deserialize, Serialize};

use crate::bound::ParameterBound;
use crate::ids::TypeVarId;
use crate::model::ReferenceType;
use crate::wildcard::WildcardType;

/// A type variable occurrence.
///
/// Equality is by declaration identity, never by bound structure: two
/// variables spelled `T extends Number` on different declarations are
/// distinct. Bounds live in the owning environment's [`TypeVariableDef`]
/// arena, which is what lets self-referential bounds (`T extends
/// Comparable<T>`) exist as finite values.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum TypeVariable {
    /// A declared generic parameter.
    Explicit(TypeVarId),
    /// A fresh variable synthesized from a wildcard during capture
    /// conversion. Resolvable only through the [`crate::CaptureContext`]
    /// that allocated it.
    Capture(TypeVarId),
}

impl TypeVariable {
    pub fn id(self) -> TypeVarId {
        match self {
            TypeVariable::Explicit(id) | TypeVariable::Capture(id) => id,
        }
    }

    pub fn is_capture(self) -> bool {
        matches!(self, TypeVariable::Capture(_))
    }

    pub fn as_type(self) -> ReferenceType {
        ReferenceType::Variable(self)
    }
}

/// The environment-side record of a type variable.
///
/// Built in two phases: [`crate::TypeStore::add_type_param`] allocates a
/// shell with placeholder bounds, [`crate::TypeStore::define_type_param`]
/// fills the real ones. After the defining pass the record is never mutated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeVariableDef {
    pub name: String,
    /// Upper bound; `Object` for unbounded parameters.
    pub upper_bound: ParameterBound,
    /// Lower bound; the null type for everything except `? super` captures.
    pub lower_bound: ParameterBound,
    /// For capture variables, the wildcard the variable was minted from.
    pub captured_wildcard: Option<WildcardType>,
}

impl TypeVariableDef {
    pub fn new(name: impl Into<String>, upper_bound: ParameterBound) -> Self {
        Self {
            name: name.into(),
            upper_bound,
            lower_bound: ParameterBound::null(),
            captured_wildcard: None,
        }
    }
}
