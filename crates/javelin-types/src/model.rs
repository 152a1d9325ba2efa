use serde::{Deserialize, Serialize};

use crate::argument::TypeArgument;
use crate::bound::satisfies_bounds;
use crate::error::{Result, TypeError};
use crate::format::reference_name;
use crate::ids::{ClassId, TypeVarId};
use crate::primitive::PrimitiveKind;
use crate::store::TypeEnv;
use crate::substitution::Substitution;
use crate::variable::TypeVariable;
use crate::wildcard::WildcardType;

/// Any Java type: primitive, `void`, or a reference type.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum JavaType {
    Primitive(PrimitiveKind),
    Void,
    Reference(ReferenceType),
}

impl JavaType {
    pub fn int() -> Self {
        JavaType::Primitive(PrimitiveKind::Int)
    }

    pub fn boolean() -> Self {
        JavaType::Primitive(PrimitiveKind::Boolean)
    }

    pub fn class(id: ClassId) -> Self {
        JavaType::Reference(ReferenceType::Class(id))
    }

    pub fn array(element: JavaType) -> Self {
        JavaType::Reference(ReferenceType::Array(Box::new(element)))
    }

    pub fn is_reference(&self) -> bool {
        matches!(self, JavaType::Reference(_))
    }

    pub fn as_reference(&self) -> Option<&ReferenceType> {
        match self {
            JavaType::Reference(r) => Some(r),
            _ => None,
        }
    }
}

impl From<ReferenceType> for JavaType {
    fn from(r: ReferenceType) -> Self {
        JavaType::Reference(r)
    }
}

/// The closed set of reference-type shapes.
///
/// `Wildcard` is a member so that substitution can thread wildcards through
/// argument positions, but a wildcard is never a type in its own right: it
/// only occurs inside a [`TypeArgument`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ReferenceType {
    /// A non-parameterized class or interface, or the rawtype view of a
    /// generic declaration.
    Class(ClassId),
    /// An array over any element type (including primitives).
    Array(Box<JavaType>),
    /// A generic declaration (rawtype identity + ordered parameters, the
    /// latter resolved through the environment).
    GenericClass(GenericClassType),
    /// A generic declaration applied to type arguments.
    Instantiated(InstantiatedType),
    /// An explicit or capture-converted type variable.
    Variable(TypeVariable),
    /// A wildcard; only legal inside a [`TypeArgument`].
    Wildcard(WildcardType),
    /// The null type: subtype of every reference type, superclass of none.
    Null,
}

impl ReferenceType {
    pub fn array(element: JavaType) -> Self {
        ReferenceType::Array(Box::new(element))
    }

    /// The nominal identity behind this type, when it has one. Variables,
    /// wildcards, and the null type have none.
    pub fn class_id(&self) -> Option<ClassId> {
        match self {
            ReferenceType::Class(id) => Some(*id),
            ReferenceType::GenericClass(g) => Some(g.def),
            ReferenceType::Instantiated(inst) => Some(inst.generic.def),
            _ => None,
        }
    }

    pub fn is_parameterized(&self) -> bool {
        matches!(self, ReferenceType::Instantiated(_))
    }

    pub fn mentions_variables(&self) -> bool {
        let mut vars = Vec::new();
        self.collect_variables(&mut vars);
        !vars.is_empty()
    }

    /// Collect every type-variable occurrence, in traversal order.
    pub fn collect_variables(&self, out: &mut Vec<TypeVariable>) {
        match self {
            ReferenceType::Class(_) | ReferenceType::GenericClass(_) | ReferenceType::Null => {}
            ReferenceType::Variable(v) => out.push(*v),
            ReferenceType::Array(elem) => {
                if let JavaType::Reference(r) = elem.as_ref() {
                    r.collect_variables(out);
                }
            }
            ReferenceType::Instantiated(inst) => {
                for arg in &inst.args {
                    match arg {
                        TypeArgument::Reference(r) => r.collect_variables(out),
                        TypeArgument::Wildcard(w) => {
                            for leaf in w.bound().leaves() {
                                leaf.collect_variables(out);
                            }
                        }
                    }
                }
            }
            ReferenceType::Wildcard(w) => {
                for leaf in w.bound().leaves() {
                    leaf.collect_variables(out);
                }
            }
        }
    }
}

/// A generic class or interface declaration.
///
/// The declaration's ordered type variables live on its
/// [`crate::ClassDef`]; carrying only the id keeps the value small and lets
/// self-referential parameter bounds resolve through the environment.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize,
)]
pub struct GenericClassType {
    pub def: ClassId,
}

impl GenericClassType {
    pub fn new(def: ClassId) -> Self {
        Self { def }
    }

    /// The rawtype view of this declaration.
    pub fn raw(self) -> ReferenceType {
        ReferenceType::Class(self.def)
    }

    /// Ordered declared type parameters; empty if the environment does not
    /// know the declaration.
    pub fn type_params<'e>(&self, env: &'e dyn TypeEnv) -> &'e [TypeVarId] {
        env.class(self.def)
            .map(|def| def.type_params.as_slice())
            .unwrap_or(&[])
    }

    /// Apply this declaration to concrete type arguments, checking each
    /// argument against its parameter's lower and upper bound.
    pub fn instantiate(
        self,
        env: &dyn TypeEnv,
        args: Vec<ReferenceType>,
    ) -> Result<InstantiatedType> {
        let params = self.type_params(env).to_vec();
        let subst = Substitution::for_args(&params, &args)?;

        for (param, arg) in params.iter().zip(&args) {
            let Some(def) = env.type_variable(*param) else {
                continue;
            };
            if !satisfies_bounds(env, def, arg, &subst) {
                return Err(TypeError::BoundViolation {
                    parameter: def.name.clone(),
                    argument: reference_name(env, arg),
                });
            }
        }

        Ok(InstantiatedType {
            generic: self,
            args: args.into_iter().map(TypeArgument::Reference).collect(),
        })
    }
}

/// A parameterized type: a generic declaration plus positional arguments.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct InstantiatedType {
    pub generic: GenericClassType,
    pub args: Vec<TypeArgument>,
}

impl InstantiatedType {
    pub fn new(generic: GenericClassType, args: Vec<TypeArgument>) -> Self {
        Self { generic, args }
    }

    pub fn as_type(&self) -> ReferenceType {
        ReferenceType::Instantiated(self.clone())
    }

    pub fn has_wildcard_arguments(&self) -> bool {
        self.args.iter().any(TypeArgument::is_wildcard)
    }

    /// The substitution this instantiation induces on its declaration's
    /// parameters. Extra parameters (malformed arity) are simply unmapped.
    pub fn substitution(&self, env: &dyn TypeEnv) -> Substitution {
        let params = self.generic.type_params(env);
        let mut subst = Substitution::empty();
        for (param, arg) in params.iter().zip(&self.args) {
            subst = subst.extended(TypeVariable::Explicit(*param), arg.as_reference());
        }
        subst
    }
}
