use serde::{Deserialize, Serialize};

use crate::bound::ParameterBound;
use crate::model::ReferenceType;
use crate::store::TypeEnv;

/// An anonymous wildcard type (`? extends B` / `? super B`).
///
/// Wildcards only occur inside a [`crate::TypeArgument`]; they are never a
/// standalone type. An unbounded `?` is represented as `? extends
/// java.lang.Object`, so every wildcard carries exactly one bound.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WildcardType {
    Extends(Box<ParameterBound>),
    Super(Box<ParameterBound>),
}

impl WildcardType {
    pub fn extends(ty: ReferenceType) -> Self {
        WildcardType::Extends(Box::new(ParameterBound::of(ty)))
    }

    pub fn super_of(ty: ReferenceType) -> Self {
        WildcardType::Super(Box::new(ParameterBound::of(ty)))
    }

    /// The unbounded wildcard `?`, i.e. `? extends Object`.
    pub fn unbounded(env: &dyn TypeEnv) -> Self {
        WildcardType::extends(ReferenceType::Class(env.well_known().object))
    }

    pub fn bound(&self) -> &ParameterBound {
        match self {
            WildcardType::Extends(bound) | WildcardType::Super(bound) => bound,
        }
    }

    pub fn has_upper_bound(&self) -> bool {
        matches!(self, WildcardType::Extends(_))
    }

    /// Whether this is `? extends Object`, which constrains nothing.
    pub fn is_unbounded(&self, env: &dyn TypeEnv) -> bool {
        match self {
            WildcardType::Extends(bound) => {
                matches!(
                    bound.as_ref(),
                    ParameterBound::Eager(ReferenceType::Class(id))
                        if *id == env.well_known().object
                )
            }
            WildcardType::Super(_) => false,
        }
    }
}
