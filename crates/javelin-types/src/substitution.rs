use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::argument::TypeArgument;
use crate::error::{Result, TypeError};
use crate::ids::TypeVarId;
use crate::model::{JavaType, ReferenceType};
use crate::variable::TypeVariable;
use crate::wildcard::WildcardType;

/// An immutable mapping from type variables to reference types.
///
/// Keys compare by declaration identity ([`TypeVariable`]), never by bound
/// structure. Storage is ordered so that iteration, `Debug`, and serialized
/// snapshots are deterministic.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Substitution {
    map: BTreeMap<TypeVariable, ReferenceType>,
}

impl Substitution {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Pair an ordered parameter list with an equal-length argument list.
    ///
    /// Arguments are reference types by construction; primitive and void
    /// arguments are unrepresentable rather than checked at runtime.
    pub fn for_args(params: &[TypeVarId], args: &[ReferenceType]) -> Result<Self> {
        if params.len() != args.len() {
            return Err(TypeError::ArityMismatch {
                expected: params.len(),
                actual: args.len(),
            });
        }
        let map = params
            .iter()
            .zip(args)
            .map(|(param, arg)| (TypeVariable::Explicit(*param), arg.clone()))
            .collect();
        Ok(Self { map })
    }

    pub fn single(var: TypeVariable, ty: ReferenceType) -> Self {
        let mut map = BTreeMap::new();
        map.insert(var, ty);
        Self { map }
    }

    /// Composition by extension: the returned substitution maps `var` to
    /// `ty` and everything else as before. The receiver is unchanged.
    #[must_use]
    pub fn extended(&self, var: TypeVariable, ty: ReferenceType) -> Self {
        let mut map = self.map.clone();
        map.insert(var, ty);
        Self { map }
    }

    pub fn get(&self, var: TypeVariable) -> Option<&ReferenceType> {
        self.map.get(&var)
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    /// True iff every variable in `vars` has a mapping. Lazy bounds use this
    /// as the precondition for resolving (see `bound.rs`).
    pub fn maps_all<I>(&self, vars: I) -> bool
    where
        I: IntoIterator<Item = TypeVariable>,
    {
        vars.into_iter().all(|v| self.map.contains_key(&v))
    }

    pub fn iter(&self) -> impl Iterator<Item = (TypeVariable, &ReferenceType)> {
        self.map.iter().map(|(v, t)| (*v, t))
    }
}

/// Apply `subst` to a type, yielding a new value. Types without variable
/// occurrences come back equal to the input.
pub fn substitute(ty: &JavaType, subst: &Substitution) -> JavaType {
    match ty {
        JavaType::Primitive(_) | JavaType::Void => ty.clone(),
        JavaType::Reference(r) => JavaType::Reference(substitute_reference(r, subst)),
    }
}

pub fn substitute_reference(ty: &ReferenceType, subst: &Substitution) -> ReferenceType {
    match ty {
        ReferenceType::Class(_) | ReferenceType::GenericClass(_) | ReferenceType::Null => {
            ty.clone()
        }
        ReferenceType::Variable(v) => match subst.get(*v) {
            Some(mapped) => mapped.clone(),
            None => ty.clone(),
        },
        ReferenceType::Array(elem) => {
            ReferenceType::Array(Box::new(substitute(elem, subst)))
        }
        ReferenceType::Instantiated(inst) => {
            let mut out = inst.clone();
            out.args = inst
                .args
                .iter()
                .map(|arg| substitute_argument(arg, subst))
                .collect();
            ReferenceType::Instantiated(out)
        }
        ReferenceType::Wildcard(w) => ReferenceType::Wildcard(substitute_wildcard(w, subst)),
    }
}

pub fn substitute_argument(arg: &TypeArgument, subst: &Substitution) -> TypeArgument {
    match arg {
        // A variable argument can map to a wildcard (supertype derivation
        // through a wildcard instantiation); renormalize so wildcards stay
        // inside `TypeArgument`.
        TypeArgument::Reference(ty) => match substitute_reference(ty, subst) {
            ReferenceType::Wildcard(w) => TypeArgument::Wildcard(w),
            other => TypeArgument::Reference(other),
        },
        TypeArgument::Wildcard(w) => TypeArgument::Wildcard(substitute_wildcard(w, subst)),
    }
}

fn substitute_wildcard(w: &WildcardType, subst: &Substitution) -> WildcardType {
    match w {
        WildcardType::Extends(bound) => {
            WildcardType::Extends(Box::new(bound.substitute(subst)))
        }
        WildcardType::Super(bound) => WildcardType::Super(Box::new(bound.substitute(subst))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ids::TypeVarId;

    #[test]
    fn for_args_rejects_mismatched_arity() {
        let params = [TypeVarId::from_raw(0), TypeVarId::from_raw(1)];
        let args = [ReferenceType::Null];
        let err = Substitution::for_args(&params, &args).unwrap_err();
        assert_eq!(
            err,
            crate::TypeError::ArityMismatch {
                expected: 2,
                actual: 1
            }
        );
    }

    #[test]
    fn extension_does_not_mutate_the_receiver() {
        let v = TypeVariable::Explicit(TypeVarId::from_raw(7));
        let base = Substitution::empty();
        let extended = base.extended(v, ReferenceType::Null);
        assert!(base.is_empty());
        assert_eq!(extended.get(v), Some(&ReferenceType::Null));
    }

    #[test]
    fn unmapped_variables_substitute_to_themselves() {
        let v = TypeVariable::Explicit(TypeVarId::from_raw(3));
        let ty = JavaType::Reference(v.as_type());
        assert_eq!(substitute(&ty, &Substitution::empty()), ty);
    }
}
