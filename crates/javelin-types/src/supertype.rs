//! Supertype enumeration and the matching-supertype search.

use std::collections::HashSet;

use crate::ids::ClassId;
use crate::model::{InstantiatedType, JavaType, ReferenceType};
use crate::store::{ClassKind, TypeEnv};
use crate::substitution::substitute_reference;
use crate::variable::TypeVariable;

/// The direct supertypes of a reference type, in declaration order
/// (superclass first, then interfaces).
///
/// A rawtype view of a generic declaration yields rawtype supertypes; an
/// instantiation yields supertypes with the instantiation's substitution
/// applied. Classes with no declared superclass get `Object` implicitly,
/// interfaces included.
pub fn direct_supertypes(env: &dyn TypeEnv, ty: &ReferenceType) -> Vec<ReferenceType> {
    match ty {
        ReferenceType::Class(id) => {
            let Some(def) = env.class(*id) else {
                return Vec::new();
            };
            let raw = !def.type_params.is_empty();
            let mut out: Vec<ReferenceType> = def
                .super_class
                .iter()
                .chain(def.interfaces.iter())
                .map(|sup| if raw { erased(sup) } else { sup.clone() })
                .collect();
            if out.is_empty() && *id != env.well_known().object {
                out.push(ReferenceType::Class(env.well_known().object));
            }
            out
        }
        ReferenceType::GenericClass(g) => {
            // The declaration seen from inside itself: supertypes keep their
            // type-variable occurrences.
            let Some(def) = env.class(g.def) else {
                return Vec::new();
            };
            let mut out: Vec<ReferenceType> = def
                .super_class
                .iter()
                .chain(def.interfaces.iter())
                .cloned()
                .collect();
            if out.is_empty() {
                out.push(ReferenceType::Class(env.well_known().object));
            }
            out
        }
        ReferenceType::Instantiated(inst) => {
            let Some(def) = env.class(inst.generic.def) else {
                return Vec::new();
            };
            let subst = inst.substitution(env);
            let mut out: Vec<ReferenceType> = def
                .super_class
                .iter()
                .chain(def.interfaces.iter())
                .map(|sup| substitute_reference(sup, &subst))
                .collect();
            if out.is_empty() {
                out.push(ReferenceType::Class(env.well_known().object));
            }
            out
        }
        ReferenceType::Variable(v) => match env.type_variable(v.id()) {
            Some(def) => def.upper_bound.leaves().into_iter().cloned().collect(),
            None => Vec::new(),
        },
        ReferenceType::Array(_) => {
            let wk = env.well_known();
            vec![
                ReferenceType::Class(wk.object),
                ReferenceType::Class(wk.cloneable),
                ReferenceType::Class(wk.serializable),
            ]
        }
        ReferenceType::Wildcard(_) | ReferenceType::Null => Vec::new(),
    }
}

/// The instantiation of `goal` that `inst` inherits, if any.
///
/// Walks the superclass chain and interface graph with the instantiation's
/// substitution threaded through each step, so `ArrayList<Integer>` finds
/// `Collection<Integer>`, not `Collection<E>`. Non-parameterized links are
/// walked through, not dropped: a parameterized supertype inherited via a
/// plain intermediate class (`class Holder<T> extends Base` with `Base
/// implements Comparable<Base>`) is still found. When the goal is an
/// interface the interface edges are explored first. A seen-set over class
/// ids keeps diamond-shaped (and, defensively, malformed cyclic) graphs from
/// being revisited.
///
/// Callers must capture-convert first if `inst` has wildcard arguments;
/// wildcards passed through here become position-bound substitution values.
pub fn matching_supertype(
    env: &dyn TypeEnv,
    inst: &InstantiatedType,
    goal: ClassId,
) -> Option<InstantiatedType> {
    let goal_is_interface = env
        .class(goal)
        .is_some_and(|def| def.kind == ClassKind::Interface);

    let mut seen: HashSet<ClassId> = HashSet::new();
    let mut stack: Vec<ReferenceType> = vec![ReferenceType::Instantiated(inst.clone())];

    while let Some(current) = stack.pop() {
        if let ReferenceType::Instantiated(cur) = &current {
            if cur.generic.def == goal {
                return Some(cur.clone());
            }
        }
        let Some(id) = current.class_id() else {
            continue;
        };
        if !seen.insert(id) {
            continue;
        }
        // `direct_supertypes` applies the current substitution for
        // instantiations and hands back plain-class supertypes as they are
        // declared (they mention no variables of the starting type).
        let mut edges = direct_supertypes(env, &current);
        // Stack discipline: superclass-first declaration order means the
        // last push pops first, which is what an interface goal wants.
        if !goal_is_interface {
            edges.reverse();
        }
        stack.extend(edges);
    }
    None
}

/// The erasure of a reference type: instantiations and generic declarations
/// collapse to their rawtype, array elements erase recursively.
pub fn erased(ty: &ReferenceType) -> ReferenceType {
    match ty {
        ReferenceType::Instantiated(inst) => inst.generic.raw(),
        ReferenceType::GenericClass(g) => g.raw(),
        ReferenceType::Array(elem) => match elem.as_ref() {
            JavaType::Reference(r) => ReferenceType::array(JavaType::Reference(erased(r))),
            other => ReferenceType::array(other.clone()),
        },
        other => other.clone(),
    }
}

/// All type variables mentioned anywhere in a type, deduplicated, in first
/// occurrence order.
pub fn free_variables(ty: &ReferenceType) -> Vec<TypeVariable> {
    let mut vars = Vec::new();
    ty.collect_variables(&mut vars);
    let mut seen = HashSet::new();
    vars.retain(|v| seen.insert(*v));
    vars
}
