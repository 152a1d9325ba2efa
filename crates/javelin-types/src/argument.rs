use serde::{Deserialize, Serialize};

use crate::model::ReferenceType;
use crate::store::TypeEnv;
use crate::substitution::Substitution;
use crate::wildcard::WildcardType;

/// One positional argument of an instantiated generic type.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TypeArgument {
    Reference(ReferenceType),
    Wildcard(WildcardType),
}

impl TypeArgument {
    pub fn reference(ty: ReferenceType) -> Self {
        TypeArgument::Reference(ty)
    }

    pub fn is_wildcard(&self) -> bool {
        matches!(self, TypeArgument::Wildcard(_))
    }

    /// This argument viewed as a reference type. Wildcard arguments become
    /// the (position-bound) `Wildcard` reference variant; that form is only
    /// meaningful as a substitution value during supertype derivation.
    pub fn as_reference(&self) -> ReferenceType {
        match self {
            TypeArgument::Reference(ty) => ty.clone(),
            TypeArgument::Wildcard(w) => ReferenceType::Wildcard(w.clone()),
        }
    }

    /// JLS 4.5.1 "contains" between two arguments at the same position.
    ///
    /// A concrete argument contains only itself. A wildcard contains what
    /// its bound admits: `? extends T` contains any `S` (or `? extends S`)
    /// with `S <: T`, `? super T` any `S` (or `? super S`) with `T <: S`,
    /// and the unbounded `?` contains everything.
    pub fn contains(&self, env: &dyn TypeEnv, other: &TypeArgument) -> bool {
        if self == other {
            return true;
        }
        let TypeArgument::Wildcard(w) = self else {
            return false;
        };
        if w.is_unbounded(env) {
            return true;
        }
        let empty = Substitution::empty();
        match (w, other) {
            (WildcardType::Extends(bound), TypeArgument::Reference(ty)) => {
                bound.is_upper_bound_of(env, ty, &empty)
            }
            (WildcardType::Super(bound), TypeArgument::Reference(ty)) => {
                bound.is_lower_bound_of(env, ty, &empty)
            }
            (WildcardType::Extends(bound), TypeArgument::Wildcard(WildcardType::Extends(inner))) => {
                inner
                    .leaves()
                    .into_iter()
                    .all(|leaf| bound.is_upper_bound_of(env, leaf, &empty))
            }
            (WildcardType::Super(bound), TypeArgument::Wildcard(WildcardType::Super(inner))) => {
                inner
                    .leaves()
                    .into_iter()
                    .all(|leaf| bound.is_lower_bound_of(env, leaf, &empty))
            }
            _ => false,
        }
    }
}
