use serde::{Deserialize, Serialize};

use crate::ids::ClassId;
use crate::store::TypeEnv;

/// The eight Java primitive kinds.
///
/// `void` is not a primitive here; it lives as its own [`crate::JavaType`]
/// variant and participates in no conversion at all.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum PrimitiveKind {
    Boolean,
    Byte,
    Char,
    Short,
    Int,
    Long,
    Float,
    Double,
}

impl PrimitiveKind {
    pub const ALL: [PrimitiveKind; 8] = [
        PrimitiveKind::Boolean,
        PrimitiveKind::Byte,
        PrimitiveKind::Char,
        PrimitiveKind::Short,
        PrimitiveKind::Int,
        PrimitiveKind::Long,
        PrimitiveKind::Float,
        PrimitiveKind::Double,
    ];

    /// Strict widening per JLS 5.1.2: `widens_to` is irreflexive, so
    /// `Int.widens_to(Int)` is `false`. Identity conversion is the caller's
    /// concern (see [`crate::is_assignable`]).
    pub fn widens_to(self, target: PrimitiveKind) -> bool {
        use PrimitiveKind::*;
        match self {
            // boolean and double have no outgoing widening edges.
            Boolean | Double => false,
            Byte => matches!(target, Short | Int | Long | Float | Double),
            Short => matches!(target, Int | Long | Float | Double),
            Char => matches!(target, Int | Long | Float | Double),
            Int => matches!(target, Long | Float | Double),
            Long => matches!(target, Float | Double),
            Float => matches!(target, Double),
        }
    }

    /// The keyword spelling (`int`, `boolean`, ...).
    pub fn name(self) -> &'static str {
        match self {
            PrimitiveKind::Boolean => "boolean",
            PrimitiveKind::Byte => "byte",
            PrimitiveKind::Char => "char",
            PrimitiveKind::Short => "short",
            PrimitiveKind::Int => "int",
            PrimitiveKind::Long => "long",
            PrimitiveKind::Float => "float",
            PrimitiveKind::Double => "double",
        }
    }

    /// The wrapper class this kind boxes to (`int` -> `java.lang.Integer`).
    pub fn boxed(self, env: &dyn TypeEnv) -> ClassId {
        let wk = env.well_known();
        match self {
            PrimitiveKind::Boolean => wk.boolean,
            PrimitiveKind::Byte => wk.byte,
            PrimitiveKind::Char => wk.character,
            PrimitiveKind::Short => wk.short,
            PrimitiveKind::Int => wk.integer,
            PrimitiveKind::Long => wk.long,
            PrimitiveKind::Float => wk.float,
            PrimitiveKind::Double => wk.double,
        }
    }
}

/// Inverse of [`PrimitiveKind::boxed`]. Returns `None` for any class that is
/// not one of the eight wrapper classes.
pub fn unboxed(env: &dyn TypeEnv, class: ClassId) -> Option<PrimitiveKind> {
    PrimitiveKind::ALL
        .into_iter()
        .find(|kind| kind.boxed(env) == class)
}
