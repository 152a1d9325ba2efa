//! Bridges an external source of nominal declarations (reflection dumps,
//! classfile indexes, fixtures) into a [`TypeStore`].
//!
//! The loader pulls declarations on demand through a [`TypeProvider`] and
//! interns them, resolving superclass and interface references recursively.
//! Java hierarchies are full of declaration cycles (`Enum<E extends
//! Enum<E>>`, `Integer implements Comparable<Integer>`), so loading is
//! two-phase: ids and type-parameter shells first, real bounds and
//! supertypes second, with an in-progress set breaking recursion.

#![forbid(unsafe_code)]

use std::collections::{HashMap, HashSet};

use thiserror::Error;

use javelin_types::{
    ClassDef, ClassId, ClassKind, GenericClassType, InstantiatedType, JavaType, ParameterBound,
    PrimitiveKind, ReferenceType, TypeArgument, TypeEnv, TypeStore, TypeVarId, TypeVariable,
    TypeVariableDef, WildcardType,
};

/// A type reference as an external source spells it, before interning.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RawTypeRef {
    /// Binary name of a class or interface, used raw.
    Named(String),
    /// A type parameter of the enclosing declaration, by name.
    Variable(String),
    /// A generic class applied to arguments.
    Applied { name: String, args: Vec<RawTypeArg> },
    Array(Box<RawTypeRef>),
    PrimitiveArray(PrimitiveKind),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RawTypeArg {
    Type(RawTypeRef),
    Wildcard,
    WildcardExtends(RawTypeRef),
    WildcardSuper(RawTypeRef),
}

/// One declared type parameter: a name plus its bound expressions (empty
/// means `extends Object`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawTypeParam {
    pub name: String,
    pub bounds: Vec<RawTypeRef>,
}

/// A nominal declaration as the external source describes it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawClass {
    pub name: String,
    pub is_interface: bool,
    pub is_abstract: bool,
    pub is_enum: bool,
    pub type_params: Vec<RawTypeParam>,
    pub super_class: Option<RawTypeRef>,
    pub interfaces: Vec<RawTypeRef>,
}

/// Source of declarations, keyed by binary name.
pub trait TypeProvider {
    fn describe(&self, name: &str) -> Option<RawClass>;
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LoadError {
    #[error("provider has no declaration named `{0}`")]
    UnknownClass(String),
    #[error("`{class}` references undeclared type parameter `{parameter}`")]
    UnknownTypeParameter { class: String, parameter: String },
}

pub type Result<T> = std::result::Result<T, LoadError>;

/// Loads declarations from a [`TypeProvider`] into an owned [`TypeStore`].
pub struct TypeLoader<'p, P: TypeProvider> {
    store: TypeStore,
    provider: &'p P,
    loaded: HashSet<String>,
    in_progress: HashSet<String>,
    // Shells allocated by a load attempt, keyed by class name. Stores only
    // grow, so a failed attempt must hand its shells to the retry instead
    // of letting a fresh allocation orphan them.
    param_shells: HashMap<String, Vec<TypeVarId>>,
}

impl<'p, P: TypeProvider> TypeLoader<'p, P> {
    /// A loader over the minimal JDK baseline; provider declarations land
    /// on top of it.
    pub fn new(provider: &'p P) -> Self {
        Self::with_store(provider, TypeStore::with_minimal_jdk())
    }

    pub fn with_store(provider: &'p P, store: TypeStore) -> Self {
        Self {
            store,
            provider,
            loaded: HashSet::new(),
            in_progress: HashSet::new(),
            param_shells: HashMap::new(),
        }
    }

    pub fn store(&self) -> &TypeStore {
        &self.store
    }

    pub fn into_store(self) -> TypeStore {
        self.store
    }

    /// Intern `name` and everything its hierarchy references, returning its
    /// id. Idempotent; names already present in the store are returned as-is.
    pub fn ensure_class(&mut self, name: &str) -> Result<ClassId> {
        if self.loaded.contains(name) {
            return Ok(self.store.intern_class_id(name));
        }
        // Present in the baseline store (or an earlier load under another
        // spelling); nothing to pull.
        if let Some(id) = self.store.class_id(name) {
            if self.store.class(id).is_some() {
                return Ok(id);
            }
        }
        let id = self.store.intern_class_id(name);
        if !self.in_progress.insert(name.to_string()) {
            // Recursive mention of a declaration currently being defined;
            // the outer frame finishes it.
            return Ok(id);
        }
        let result = self.load_class(name, id);
        self.in_progress.remove(name);
        if result.is_ok() {
            self.loaded.insert(name.to_string());
        }
        result.map(|()| id)
    }

    fn load_class(&mut self, name: &str, id: ClassId) -> Result<()> {
        let raw = self
            .provider
            .describe(name)
            .ok_or_else(|| LoadError::UnknownClass(name.to_string()))?;
        tracing::debug!(class = %raw.name, params = raw.type_params.len(), "loading declaration");

        // Phase 1: parameter shells with placeholder bounds, so bound
        // expressions can mention any parameter of this declaration. A retry
        // after a failed attempt reuses the shells that attempt allocated.
        let reusable = self
            .param_shells
            .get(name)
            .filter(|shells| shells.len() == raw.type_params.len())
            .cloned();
        let params: Vec<TypeVarId> = match reusable {
            Some(shells) => shells,
            None => {
                let object_bound = ParameterBound::object(&self.store);
                let fresh: Vec<TypeVarId> = raw
                    .type_params
                    .iter()
                    .map(|p| self.store.add_type_param(p.name.clone(), object_bound.clone()))
                    .collect();
                self.param_shells.insert(name.to_string(), fresh.clone());
                fresh
            }
        };
        let scope: HashMap<String, TypeVarId> = raw
            .type_params
            .iter()
            .map(|p| p.name.clone())
            .zip(params.iter().copied())
            .collect();

        // Phase 2: real bounds and supertypes, now that ids exist.
        for (p, var) in raw.type_params.iter().zip(&params) {
            let bound = self.resolve_bounds(name, &p.bounds, &scope)?;
            self.store
                .define_type_param(*var, TypeVariableDef::new(p.name.clone(), bound));
        }
        let super_class = match &raw.super_class {
            Some(r) => Some(self.resolve_ref(name, r, &scope)?),
            None => None,
        };
        let interfaces = raw
            .interfaces
            .iter()
            .map(|r| self.resolve_ref(name, r, &scope))
            .collect::<Result<Vec<_>>>()?;

        let kind = if raw.is_enum {
            ClassKind::Enum
        } else if raw.is_interface {
            ClassKind::Interface
        } else {
            ClassKind::Class
        };
        self.store.define_class(
            id,
            ClassDef {
                name: raw.name,
                kind,
                is_abstract: raw.is_abstract || raw.is_interface,
                type_params: params,
                super_class,
                interfaces,
            },
        );
        self.param_shells.remove(name);
        Ok(())
    }

    fn resolve_bounds(
        &mut self,
        class: &str,
        bounds: &[RawTypeRef],
        scope: &HashMap<String, TypeVarId>,
    ) -> Result<ParameterBound> {
        match bounds {
            [] => Ok(ParameterBound::object(&self.store)),
            [single] => {
                let ty = self.resolve_ref(class, single, scope)?;
                Ok(ParameterBound::of(ty))
            }
            many => {
                let parts = many
                    .iter()
                    .map(|r| {
                        self.resolve_ref(class, r, scope)
                            .map(ParameterBound::of)
                    })
                    .collect::<Result<Vec<_>>>()?;
                Ok(ParameterBound::Intersection(parts))
            }
        }
    }

    fn resolve_ref(
        &mut self,
        class: &str,
        r: &RawTypeRef,
        scope: &HashMap<String, TypeVarId>,
    ) -> Result<ReferenceType> {
        match r {
            RawTypeRef::Named(name) => Ok(ReferenceType::Class(self.ensure_class(name)?)),
            RawTypeRef::Variable(name) => match scope.get(name) {
                Some(var) => Ok(ReferenceType::Variable(TypeVariable::Explicit(*var))),
                None => Err(LoadError::UnknownTypeParameter {
                    class: class.to_string(),
                    parameter: name.clone(),
                }),
            },
            RawTypeRef::Applied { name, args } => {
                let id = self.ensure_class(name)?;
                let args = args
                    .iter()
                    .map(|arg| self.resolve_arg(class, arg, scope))
                    .collect::<Result<Vec<_>>>()?;
                // Built structurally, not via `instantiate`: bound checks on
                // a half-loaded hierarchy would reject legal declarations.
                Ok(ReferenceType::Instantiated(InstantiatedType::new(
                    GenericClassType::new(id),
                    args,
                )))
            }
            RawTypeRef::Array(elem) => {
                let elem = self.resolve_ref(class, elem, scope)?;
                Ok(ReferenceType::array(JavaType::Reference(elem)))
            }
            RawTypeRef::PrimitiveArray(kind) => {
                Ok(ReferenceType::array(JavaType::Primitive(*kind)))
            }
        }
    }

    fn resolve_arg(
        &mut self,
        class: &str,
        arg: &RawTypeArg,
        scope: &HashMap<String, TypeVarId>,
    ) -> Result<TypeArgument> {
        Ok(match arg {
            RawTypeArg::Type(r) => TypeArgument::Reference(self.resolve_ref(class, r, scope)?),
            RawTypeArg::Wildcard => TypeArgument::Wildcard(WildcardType::unbounded(&self.store)),
            RawTypeArg::WildcardExtends(r) => {
                let ty = self.resolve_ref(class, r, scope)?;
                TypeArgument::Wildcard(WildcardType::extends(ty))
            }
            RawTypeArg::WildcardSuper(r) => {
                let ty = self.resolve_ref(class, r, scope)?;
                TypeArgument::Wildcard(WildcardType::super_of(ty))
            }
        })
    }
}

/// An in-memory provider, mainly for tests and fixtures.
#[derive(Debug, Default)]
pub struct MapProvider {
    classes: HashMap<String, RawClass>,
}

impl MapProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, class: RawClass) -> &mut Self {
        self.classes.insert(class.name.clone(), class);
        self
    }
}

impl TypeProvider for MapProvider {
    fn describe(&self, name: &str) -> Option<RawClass> {
        self.classes.get(name).cloned()
    }
}
