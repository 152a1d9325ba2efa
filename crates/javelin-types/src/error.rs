use thiserror::Error;

pub type Result<T> = std::result::Result<T, TypeError>;

/// Failures surfaced by instantiation, substitution construction, and capture
/// conversion.
///
/// "No unifier" and "no matching supertype" are deliberately *not* errors:
/// those searches return `Option` so an absent result is never conflated with
/// a malformed query.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TypeError {
    /// A parameter list and an argument list of different lengths were paired.
    /// Always a caller bug; never produced by a well-formed model walk.
    #[error("expected {expected} type argument(s), got {actual}")]
    ArityMismatch { expected: usize, actual: usize },

    /// An instantiation argument failed the lower- or upper-bound check of its
    /// parameter. Callers building a model from many declarations should skip
    /// the offending instantiation and continue.
    #[error("type argument `{argument}` violates the bound of parameter `{parameter}`")]
    BoundViolation { parameter: String, argument: String },

    /// A bound combination this model refuses to resolve, e.g. capture
    /// conversion intersecting two class bounds with no subtype relation
    /// (a compile-time error per JLS 4.9).
    #[error("unsupported bound combination: {detail}")]
    UnsupportedBoundShape { detail: String },
}
