use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU32, Ordering};

use crate::argument::TypeArgument;
use crate::bound::ParameterBound;
use crate::error::{Result, TypeError};
use crate::format::{bound_name, reference_name};
use crate::ids::{ClassId, TypeVarId};
use crate::model::{InstantiatedType, ReferenceType};
use crate::store::{ClassDef, ClassKind, TypeEnv, WellKnownTypes};
use crate::substitution::Substitution;
use crate::subtyping::is_reference_subtype;
use crate::variable::{TypeVariable, TypeVariableDef};
use crate::wildcard::WildcardType;

/// Process-wide counter minting unique capture-variable names (`CAP#n`).
/// Atomic so conversion is safe from concurrent query threads.
static CAPTURE_SEQUENCE: AtomicU32 = AtomicU32::new(0);

impl TypeVarId {
    const CONTEXT_LOCAL_BIT: u32 = 1 << 31;

    pub(crate) fn new_context_local(index: u32) -> Self {
        Self(Self::CONTEXT_LOCAL_BIT | index)
    }

    pub(crate) fn context_local_index(self) -> Option<usize> {
        if (self.0 & Self::CONTEXT_LOCAL_BIT) == 0 {
            return None;
        }
        Some((self.0 & !Self::CONTEXT_LOCAL_BIT) as usize)
    }
}

/// Per-query typing context layered over a base environment.
///
/// Capture conversion allocates fresh type variables; doing that inside the
/// shared [`crate::TypeStore`] would make queries effectfully mutate global
/// state. Instead the context owns the capture variables and resolves them
/// via the high bit of [`TypeVarId`], leaving the base store untouched.
///
/// Contexts nest: a subtype walk under one context can open another for an
/// inner wildcard instantiation. Locals are keyed by the global capture
/// sequence number, so a miss here falls through to the base context that
/// actually owns the variable.
pub struct CaptureContext<'env> {
    base: &'env dyn TypeEnv,
    locals: BTreeMap<u32, TypeVariableDef>,
}

impl<'env> CaptureContext<'env> {
    pub fn new(base: &'env dyn TypeEnv) -> Self {
        Self {
            base,
            locals: BTreeMap::new(),
        }
    }

    fn add_capture_var(
        &mut self,
        upper: ParameterBound,
        lower: ParameterBound,
        wildcard: WildcardType,
    ) -> TypeVariable {
        let seq = CAPTURE_SEQUENCE.fetch_add(1, Ordering::Relaxed);
        self.locals.insert(
            seq,
            TypeVariableDef {
                name: format!("CAP#{seq}"),
                upper_bound: upper,
                lower_bound: lower,
                captured_wildcard: Some(wildcard),
            },
        );
        TypeVariable::Capture(TypeVarId::new_context_local(seq))
    }

    /// Capture conversion per JLS 5.1.10.
    ///
    /// Returns the receiver's value unchanged when no argument is a
    /// wildcard. Otherwise each wildcard argument becomes a fresh capture
    /// variable whose upper bound combines the declared parameter bound
    /// (substituted through the instantiation) with the wildcard's own
    /// bound. Combining two unrelated class bounds is a JLS compile error
    /// and is rejected with [`TypeError::UnsupportedBoundShape`].
    pub fn apply_capture_conversion(
        &mut self,
        inst: &InstantiatedType,
    ) -> Result<InstantiatedType> {
        if !inst.has_wildcard_arguments() {
            return Ok(inst.clone());
        }

        let params = inst.generic.type_params(self.base).to_vec();
        if params.len() != inst.args.len() {
            return Err(TypeError::ArityMismatch {
                expected: params.len(),
                actual: inst.args.len(),
            });
        }

        // Phase 1: allocate a capture variable per wildcard argument, seeded
        // from the wildcard's own bound.
        let mut captures: Vec<Option<TypeVariable>> = Vec::with_capacity(inst.args.len());
        for arg in &inst.args {
            match arg {
                TypeArgument::Wildcard(w) => {
                    let (upper, lower) = match w {
                        WildcardType::Extends(bound) => {
                            ((**bound).clone(), ParameterBound::null())
                        }
                        WildcardType::Super(bound) => {
                            (ParameterBound::object(self.base), (**bound).clone())
                        }
                    };
                    captures.push(Some(self.add_capture_var(upper, lower, w.clone())));
                }
                TypeArgument::Reference(_) => captures.push(None),
            }
        }

        // Combined substitution over *all* declared parameters: wildcard
        // positions map to their capture variables, the rest to their raw
        // argument types. Declared bounds see sibling captures through it.
        let mut subst = Substitution::empty();
        for ((param, arg), capture) in params.iter().zip(&inst.args).zip(&captures) {
            let value = match capture {
                Some(var) => var.as_type(),
                None => arg.as_reference(),
            };
            subst = subst.extended(TypeVariable::Explicit(*param), value);
        }

        // Phase 2: convert each capture variable, folding the declared
        // parameter bound into the seeded wildcard bound (greatest lower
        // bound construction).
        for (param, capture) in params.iter().zip(&captures) {
            let Some(var) = capture else { continue };
            let declared = match self.base.type_variable(*param) {
                Some(def) => def.upper_bound.substitute(&subst),
                None => ParameterBound::object(self.base),
            };
            let key = var
                .id()
                .context_local_index()
                .expect("capture variables are context-local") as u32;

            let current = self.locals[&key].upper_bound.clone();
            let combined = if current.is_object(self.base) {
                // The wildcard contributed nothing; take the declared bound.
                declared
            } else if declared.is_object(self.base) {
                current
            } else {
                glb(self.base, declared, current)?
            };
            self.locals
                .get_mut(&key)
                .expect("capture variable registered in phase 1")
                .upper_bound = combined;
        }

        let args = inst
            .args
            .iter()
            .zip(&captures)
            .map(|(arg, capture)| match capture {
                Some(var) => TypeArgument::Reference(var.as_type()),
                None => arg.clone(),
            })
            .collect();

        Ok(InstantiatedType::new(inst.generic, args))
    }
}

impl TypeEnv for CaptureContext<'_> {
    fn class(&self, id: ClassId) -> Option<&ClassDef> {
        self.base.class(id)
    }

    fn type_variable(&self, id: TypeVarId) -> Option<&TypeVariableDef> {
        if let Some(index) = id.context_local_index() {
            // Miss here means an enclosing context owns the variable.
            if let Some(def) = self.locals.get(&(index as u32)) {
                return Some(def);
            }
        }
        self.base.type_variable(id)
    }

    fn lookup_class(&self, name: &str) -> Option<ClassId> {
        self.base.lookup_class(name)
    }

    fn well_known(&self) -> &WellKnownTypes {
        self.base.well_known()
    }
}

/// Greatest-lower-bound combination of a declared parameter bound with a
/// wildcard bound.
///
/// Two class (non-interface) leaves with no subtype relation in either
/// direction cannot intersect (JLS 4.9 makes this a compile error), so the
/// combination is rejected instead of producing an uninhabited bound.
fn glb(env: &dyn TypeEnv, declared: ParameterBound, current: ParameterBound) -> Result<ParameterBound> {
    let class_leaves = |bound: &ParameterBound| -> Vec<ReferenceType> {
        bound
            .leaves()
            .into_iter()
            .filter(|ty| {
                ty.class_id()
                    .and_then(|id| env.class(id))
                    .is_some_and(|def| def.kind == ClassKind::Class)
            })
            .cloned()
            .collect()
    };

    for a in class_leaves(&declared) {
        for b in class_leaves(&current) {
            if a == b {
                continue;
            }
            if !is_reference_subtype(env, &a, &b) && !is_reference_subtype(env, &b, &a) {
                return Err(TypeError::UnsupportedBoundShape {
                    detail: format!(
                        "cannot intersect unrelated class bounds `{}` and `{}`",
                        reference_name(env, &a),
                        reference_name(env, &b),
                    ),
                });
            }
        }
    }

    tracing::trace!(
        declared = %bound_name(env, &declared),
        wildcard = %bound_name(env, &current),
        "combining capture bounds"
    );
    Ok(ParameterBound::Intersection(vec![declared, current]))
}
