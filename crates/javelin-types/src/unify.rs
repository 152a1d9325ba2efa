//! Declaration-level unification.

use crate::bound::satisfies_bounds;
use crate::model::ReferenceType;
use crate::store::TypeEnv;
use crate::substitution::Substitution;

/// The substitution that makes `goal` equal to `instantiated`, if one
/// exists.
///
/// Deliberately narrow, not inference: the goal is either already equal to
/// the instantiated type (empty substitution) or a single type variable
/// whose bounds the instantiated type must satisfy (one-entry
/// substitution). Anything else has no unifier. Callers use `None` as a
/// normal control-flow outcome ("this class does not implement that
/// generic interface"), never as an error.
pub fn instantiating_substitution(
    env: &dyn TypeEnv,
    instantiated: &ReferenceType,
    goal: &ReferenceType,
) -> Option<Substitution> {
    if instantiated == goal {
        return Some(Substitution::empty());
    }
    let ReferenceType::Variable(var) = goal else {
        tracing::trace!("goal is neither equal nor a variable, no unifier");
        return None;
    };
    let def = env.type_variable(var.id())?;
    let subst = Substitution::single(*var, instantiated.clone());
    if !satisfies_bounds(env, def, instantiated, &subst) {
        return None;
    }
    Some(subst)
}
