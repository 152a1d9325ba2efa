//! Subtyping (JLS 4.10) and assignability (JLS 5.2).

use std::collections::HashSet;

use crate::capture::CaptureContext;
use crate::ids::ClassId;
use crate::model::{InstantiatedType, JavaType, ReferenceType};
use crate::primitive::unboxed;
use crate::store::TypeEnv;
use crate::supertype::{direct_supertypes, matching_supertype};

/// Subtyping over the full type lattice.
///
/// Primitives relate by identity and widening; `void` only to itself;
/// references delegate to [`is_reference_subtype`]. The primitive and
/// reference worlds never mix here (boxing is a conversion, handled by
/// [`is_assignable`]).
pub fn is_subtype(env: &dyn TypeEnv, sub: &JavaType, sup: &JavaType) -> bool {
    match (sub, sup) {
        (JavaType::Void, JavaType::Void) => true,
        (JavaType::Primitive(a), JavaType::Primitive(b)) => a == b || a.widens_to(*b),
        (JavaType::Reference(a), JavaType::Reference(b)) => is_reference_subtype(env, a, b),
        _ => false,
    }
}

/// Subtyping over reference types.
pub fn is_reference_subtype(env: &dyn TypeEnv, sub: &ReferenceType, sup: &ReferenceType) -> bool {
    if sub == sup {
        return true;
    }
    // Object tops the reference lattice, the null type bottoms it.
    if matches!(sup, ReferenceType::Class(id) if *id == env.well_known().object) {
        return !matches!(sub, ReferenceType::Wildcard(_));
    }
    if matches!(sub, ReferenceType::Null) {
        return true;
    }

    // A variable is below everything its upper bound is below.
    if let ReferenceType::Variable(v) = sub {
        return match env.type_variable(v.id()) {
            Some(def) => def
                .upper_bound
                .leaves()
                .into_iter()
                .any(|leaf| is_reference_subtype(env, leaf, sup)),
            None => false,
        };
    }

    // Everything the supertype variable's lower bound is above is below the
    // variable itself.
    if let ReferenceType::Variable(v) = sup {
        return match env.type_variable(v.id()) {
            Some(def) => def
                .lower_bound
                .leaves()
                .into_iter()
                .any(|leaf| is_reference_subtype(env, sub, leaf)),
            None => false,
        };
    }

    match sup {
        // Wildcards are argument positions, not types; they never appear on
        // either side of a subtype query directly.
        ReferenceType::Wildcard(_) | ReferenceType::Null => false,
        ReferenceType::Variable(_) => unreachable!("handled above"),

        ReferenceType::Array(sup_elem) => match sub {
            ReferenceType::Array(sub_elem) => array_covariant(env, sub_elem, sup_elem),
            _ => false,
        },

        // Rawtype / non-generic goal: an erasure walk over the nominal
        // hierarchy decides. `Instantiated List<String> <: raw List` lands
        // here and holds.
        ReferenceType::Class(goal) | ReferenceType::GenericClass(crate::model::GenericClassType { def: goal }) => {
            match sub {
                ReferenceType::Array(_) => {
                    let wk = env.well_known();
                    *goal == wk.cloneable || *goal == wk.serializable
                }
                _ => match sub.class_id() {
                    Some(from) => erasure_reaches(env, from, *goal),
                    None => false,
                },
            }
        }

        ReferenceType::Instantiated(sup_inst) => match sub {
            // A rawtype is not a subtype of any parameterization; the
            // unchecked direction lives in `is_assignable` only.
            ReferenceType::Class(id) => {
                let generic = env
                    .class(*id)
                    .is_some_and(|def| !def.type_params.is_empty());
                if generic {
                    return false;
                }
                // A non-generic class can still inherit a parameterized
                // supertype (`class Ints implements List<Integer>`).
                direct_supertypes(env, sub)
                    .iter()
                    .any(|s| is_reference_subtype(env, s, sup))
            }
            ReferenceType::GenericClass(g) => {
                // The declaration seen from inside itself: apply it to its
                // own variables and compare.
                let inst = identity_instantiation(env, *g);
                instantiated_subtype(env, &inst, sup_inst)
            }
            ReferenceType::Instantiated(sub_inst) => {
                if sub_inst.has_wildcard_arguments() {
                    let mut ctx = CaptureContext::new(env);
                    return match ctx.apply_capture_conversion(sub_inst) {
                        Ok(captured) => instantiated_subtype(&ctx, &captured, sup_inst),
                        Err(_) => false,
                    };
                }
                instantiated_subtype(env, sub_inst, sup_inst)
            }
            _ => false,
        },
    }
}

/// Assignability (`to := from`), the conversion-aware relation.
///
/// Identity, reference widening, primitive widening, boxing and unboxing
/// (each optionally followed by widening), and the unchecked
/// rawtype-to-parameterized conversion. `void` is assignable to and from
/// nothing.
pub fn is_assignable(env: &dyn TypeEnv, to: &JavaType, from: &JavaType) -> bool {
    match (to, from) {
        (JavaType::Void, _) | (_, JavaType::Void) => false,
        (JavaType::Primitive(t), JavaType::Primitive(f)) => t == f || f.widens_to(*t),
        // Boxing, then reference widening.
        (JavaType::Reference(t), JavaType::Primitive(f)) => {
            let boxed = ReferenceType::Class(f.boxed(env));
            is_reference_subtype(env, &boxed, t)
        }
        // Unboxing, then primitive widening.
        (JavaType::Primitive(t), JavaType::Reference(f)) => match f.class_id() {
            Some(id) => match unboxed(env, id) {
                Some(k) => k == *t || k.widens_to(*t),
                None => false,
            },
            None => false,
        },
        (JavaType::Reference(t), JavaType::Reference(f)) => {
            if is_reference_subtype(env, f, t) {
                return true;
            }
            // Unchecked conversion: a rawtype is assignable to any
            // parameterization of its own declaration. Never the reverse
            // beyond what plain subtyping already grants.
            if let (ReferenceType::Instantiated(t_inst), ReferenceType::Class(f_id)) = (t, f) {
                let f_is_raw = env
                    .class(*f_id)
                    .is_some_and(|def| !def.type_params.is_empty());
                return f_is_raw && erasure_reaches(env, *f_id, t_inst.generic.def);
            }
            false
        }
    }
}

/// JLS 4.10.3 array subtyping: reference elements are covariant, except
/// parameterized elements which must be equal (their arguments do not
/// propagate through the array). Primitive elements must be identical.
fn array_covariant(env: &dyn TypeEnv, sub_elem: &JavaType, sup_elem: &JavaType) -> bool {
    if sub_elem == sup_elem {
        return true;
    }
    match (sub_elem.as_reference(), sup_elem.as_reference()) {
        (Some(a), Some(b)) => {
            if a.is_parameterized() || b.is_parameterized() {
                a == b
            } else {
                is_reference_subtype(env, a, b)
            }
        }
        _ => false,
    }
}

fn instantiated_subtype(
    env: &dyn TypeEnv,
    sub: &InstantiatedType,
    sup: &InstantiatedType,
) -> bool {
    let Some(matched) = matching_supertype(env, sub, sup.generic.def) else {
        return false;
    };
    matched.args.len() == sup.args.len()
        && sup
            .args
            .iter()
            .zip(&matched.args)
            .all(|(sup_arg, sub_arg)| sup_arg.contains(env, sub_arg))
}

fn identity_instantiation(
    env: &dyn TypeEnv,
    g: crate::model::GenericClassType,
) -> InstantiatedType {
    let args = g
        .type_params(env)
        .iter()
        .map(|p| {
            crate::argument::TypeArgument::Reference(ReferenceType::Variable(
                crate::variable::TypeVariable::Explicit(*p),
            ))
        })
        .collect();
    InstantiatedType::new(g, args)
}

/// Reachability in the erased nominal hierarchy.
fn erasure_reaches(env: &dyn TypeEnv, from: ClassId, to: ClassId) -> bool {
    if from == to {
        return true;
    }
    let mut seen: HashSet<ClassId> = HashSet::new();
    let mut stack = vec![from];
    while let Some(current) = stack.pop() {
        if current == to {
            return true;
        }
        if !seen.insert(current) {
            continue;
        }
        let Some(def) = env.class(current) else {
            continue;
        };
        for sup in def.super_class.iter().chain(def.interfaces.iter()) {
            if let Some(id) = sup.class_id() {
                stack.push(id);
            }
        }
    }
    false
}
