use serde::{Deserialize, Serialize};

use crate::model::ReferenceType;
use crate::store::TypeEnv;
use crate::substitution::{substitute_reference, Substitution};
use crate::subtyping::is_reference_subtype;
use crate::variable::TypeVariable;

/// The bound of a type variable or wildcard.
///
/// The eager/lazy split is load-bearing: a lazy bound mentions type
/// variables (possibly the bounded variable itself, as in
/// `E extends Comparable<E>`) and refuses to resolve until a substitution
/// maps every variable it mentions. That precondition, not a recursion-depth
/// limiter, is what keeps self-referential bounds from looping.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ParameterBound {
    /// Fully resolved bound type; contains no type-variable occurrences.
    Eager(ReferenceType),
    /// Bound type that mentions at least one type variable.
    Lazy(ReferenceType),
    /// All member bounds must hold. By convention the class bound, if any,
    /// comes first.
    Intersection(Vec<ParameterBound>),
}

impl ParameterBound {
    /// Classify `ty` as eager or lazy by scanning for variable occurrences.
    pub fn of(ty: ReferenceType) -> Self {
        if ty.mentions_variables() {
            ParameterBound::Lazy(ty)
        } else {
            ParameterBound::Eager(ty)
        }
    }

    /// The bound of an unbounded lower position: the null type.
    pub fn null() -> Self {
        ParameterBound::Eager(ReferenceType::Null)
    }

    /// The bound of an unbounded upper position: `java.lang.Object`.
    pub fn object(env: &dyn TypeEnv) -> Self {
        ParameterBound::Eager(ReferenceType::Class(env.well_known().object))
    }

    /// Whether this is exactly the `Object` default upper bound.
    pub fn is_object(&self, env: &dyn TypeEnv) -> bool {
        matches!(
            self,
            ParameterBound::Eager(ReferenceType::Class(id))
                if *id == env.well_known().object
        )
    }

    /// Flattened leaves of this bound (intersections recursively expanded).
    pub fn leaves(&self) -> Vec<&ReferenceType> {
        match self {
            ParameterBound::Eager(ty) | ParameterBound::Lazy(ty) => vec![ty],
            ParameterBound::Intersection(parts) => {
                parts.iter().flat_map(|p| p.leaves()).collect()
            }
        }
    }

    /// Apply `subst`, re-deriving the eager/lazy classification of each leaf.
    ///
    /// A lazy leaf stays untouched unless `subst` maps *every* variable it
    /// mentions; partially resolving a recursive bound would be unsound.
    #[must_use]
    pub fn substitute(&self, subst: &Substitution) -> ParameterBound {
        match self {
            ParameterBound::Eager(_) => self.clone(),
            ParameterBound::Lazy(ty) => {
                let mut vars = Vec::new();
                ty.collect_variables(&mut vars);
                if !subst.maps_all(vars) {
                    return self.clone();
                }
                ParameterBound::of(substitute_reference(ty, subst))
            }
            ParameterBound::Intersection(parts) => ParameterBound::Intersection(
                parts.iter().map(|p| p.substitute(subst)).collect(),
            ),
        }
    }

    /// Is this bound an upper bound of `candidate` (i.e. `candidate <:
    /// bound`) once `subst` has been applied to the bound?
    pub fn is_upper_bound_of(
        &self,
        env: &dyn TypeEnv,
        candidate: &ReferenceType,
        subst: &Substitution,
    ) -> bool {
        match self {
            ParameterBound::Intersection(parts) => parts
                .iter()
                .all(|p| p.is_upper_bound_of(env, candidate, subst)),
            ParameterBound::Eager(ty) | ParameterBound::Lazy(ty) => {
                let bound = substitute_reference(ty, subst);
                upper_bound_check(env, &bound, candidate)
            }
        }
    }

    /// Is this bound a lower bound of `candidate` (i.e. `bound <:
    /// candidate`) once `subst` has been applied to the bound?
    pub fn is_lower_bound_of(
        &self,
        env: &dyn TypeEnv,
        candidate: &ReferenceType,
        subst: &Substitution,
    ) -> bool {
        match self {
            ParameterBound::Intersection(parts) => parts
                .iter()
                .all(|p| p.is_lower_bound_of(env, candidate, subst)),
            ParameterBound::Eager(ty) | ParameterBound::Lazy(ty) => {
                let bound = substitute_reference(ty, subst);
                lower_bound_check(env, &bound, candidate)
            }
        }
    }
}

fn upper_bound_check(env: &dyn TypeEnv, bound: &ReferenceType, candidate: &ReferenceType) -> bool {
    // Object admits every reference type.
    if matches!(bound, ReferenceType::Class(id) if *id == env.well_known().object) {
        return true;
    }
    if bound == candidate {
        return true;
    }

    // A variable bound delegates to the variable's lower bound: anything
    // below the lower bound is below the variable itself.
    if let ReferenceType::Variable(v) = bound {
        return match env.type_variable(v.id()) {
            Some(def) => def
                .lower_bound
                .is_upper_bound_of(env, candidate, &Substitution::empty()),
            None => false,
        };
    }

    // Parameterized candidates are capture-converted inside the subtype
    // walk; wildcard arguments of the bound stay as containment checks.
    is_reference_subtype(env, candidate, bound)
}

fn lower_bound_check(env: &dyn TypeEnv, bound: &ReferenceType, candidate: &ReferenceType) -> bool {
    // The null type is below every reference type.
    if matches!(bound, ReferenceType::Null) {
        return true;
    }
    if bound == candidate {
        return true;
    }

    // A variable bound delegates to the variable's upper bound: anything
    // above the upper bound is above the variable itself.
    if let ReferenceType::Variable(v) = bound {
        return match env.type_variable(v.id()) {
            Some(def) => def
                .upper_bound
                .is_lower_bound_of(env, candidate, &Substitution::empty()),
            None => false,
        };
    }

    is_reference_subtype(env, bound, candidate)
}

/// Conjunction over satisfied bounds, primarily for tests and diagnostics:
/// does `candidate` sit between the lower and upper bound of a variable def?
pub fn satisfies_bounds(
    env: &dyn TypeEnv,
    def: &crate::variable::TypeVariableDef,
    candidate: &ReferenceType,
    subst: &Substitution,
) -> bool {
    def.lower_bound.is_lower_bound_of(env, candidate, subst)
        && def.upper_bound.is_upper_bound_of(env, candidate, subst)
}

/// Collect the free variables of a bound (lazy leaves included).
pub fn bound_variables(bound: &ParameterBound, out: &mut Vec<TypeVariable>) {
    for leaf in bound.leaves() {
        leaf.collect_variables(out);
    }
}
