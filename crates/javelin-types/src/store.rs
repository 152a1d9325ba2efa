use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::argument::TypeArgument;
use crate::bound::ParameterBound;
use crate::ids::{ClassId, TypeVarId};
use crate::model::{GenericClassType, InstantiatedType, ReferenceType};
use crate::variable::{TypeVariable, TypeVariableDef};

/// Kind of a nominal declaration.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize,
)]
pub enum ClassKind {
    Class,
    Interface,
    Enum,
}

/// A nominal class/interface declaration as the engine sees it.
///
/// Member-level detail (fields, methods) is deliberately absent: the engine
/// reasons about the type lattice only, and the operation-selection layer
/// that needs members lives outside this crate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassDef {
    /// Binary name (`java.util.List`).
    pub name: String,
    pub kind: ClassKind,
    pub is_abstract: bool,
    /// Ordered declared type parameters; empty for non-generic declarations.
    pub type_params: Vec<TypeVarId>,
    /// Direct superclass; `None` for `java.lang.Object` and interfaces.
    pub super_class: Option<ReferenceType>,
    /// Direct superinterfaces, in declaration order.
    pub interfaces: Vec<ReferenceType>,
}

/// Ids of the declarations the engine needs by identity: `Object` for
/// default bounds, the wrapper classes for boxing, and the array
/// superinterfaces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WellKnownTypes {
    pub object: ClassId,
    pub string: ClassId,
    pub number: ClassId,
    pub comparable: ClassId,
    pub cloneable: ClassId,
    pub serializable: ClassId,
    pub boolean: ClassId,
    pub byte: ClassId,
    pub character: ClassId,
    pub short: ClassId,
    pub integer: ClassId,
    pub long: ClassId,
    pub float: ClassId,
    pub double: ClassId,
}

/// Read-only view of a resolved nominal model.
///
/// The engine's algorithms take `&dyn TypeEnv` so capture conversion can
/// layer context-local variables over a base store (see
/// [`crate::CaptureContext`]).
pub trait TypeEnv {
    fn class(&self, id: ClassId) -> Option<&ClassDef>;
    fn type_variable(&self, id: TypeVarId) -> Option<&TypeVariableDef>;
    fn lookup_class(&self, name: &str) -> Option<ClassId>;
    fn well_known(&self) -> &WellKnownTypes;
}

/// Caller-owned registry of nominal declarations and type variables.
///
/// All type objects reference declarations through ids into this store, so
/// equal nominal identities are canonical by construction (the name cache in
/// `by_name` dedupes interning). The store is built single-threaded through
/// `&mut self` and then shared immutably; queries never mutate it.
#[derive(Debug, Clone)]
pub struct TypeStore {
    classes: Vec<Option<ClassDef>>,
    by_name: HashMap<String, ClassId>,
    type_vars: Vec<TypeVariableDef>,
    well_known: WellKnownTypes,
}

impl TypeEnv for TypeStore {
    fn class(&self, id: ClassId) -> Option<&ClassDef> {
        self.classes.get(id.0 as usize).and_then(Option::as_ref)
    }

    fn type_variable(&self, id: TypeVarId) -> Option<&TypeVariableDef> {
        if id.context_local_index().is_some() {
            return None;
        }
        self.type_vars.get(id.0 as usize)
    }

    fn lookup_class(&self, name: &str) -> Option<ClassId> {
        if let Some(id) = self.by_name.get(name) {
            return Some(*id);
        }
        // Accept simple names for the implicit `java.lang` package.
        if !name.contains('.') {
            return self.by_name.get(&format!("java.lang.{name}")).copied();
        }
        None
    }

    fn well_known(&self) -> &WellKnownTypes {
        &self.well_known
    }
}

impl Default for TypeStore {
    fn default() -> Self {
        Self::with_core_lang()
    }
}

impl TypeStore {
    /// A store bootstrapped with the `java.lang` core the engine depends on
    /// by identity: Object, String, Number, Comparable, the array
    /// superinterfaces, and the eight wrapper classes.
    pub fn with_core_lang() -> Self {
        let mut store = Self {
            classes: Vec::new(),
            by_name: HashMap::new(),
            type_vars: Vec::new(),
            // Placeholder; every field is re-pointed below before use.
            well_known: WellKnownTypes {
                object: ClassId(0),
                string: ClassId(0),
                number: ClassId(0),
                comparable: ClassId(0),
                cloneable: ClassId(0),
                serializable: ClassId(0),
                boolean: ClassId(0),
                byte: ClassId(0),
                character: ClassId(0),
                short: ClassId(0),
                integer: ClassId(0),
                long: ClassId(0),
                float: ClassId(0),
                double: ClassId(0),
            },
        };

        let object = store.intern_class_id("java.lang.Object");
        let string = store.intern_class_id("java.lang.String");
        let number = store.intern_class_id("java.lang.Number");
        let comparable = store.intern_class_id("java.lang.Comparable");
        let cloneable = store.intern_class_id("java.lang.Cloneable");
        let serializable = store.intern_class_id("java.io.Serializable");
        let boolean = store.intern_class_id("java.lang.Boolean");
        let byte = store.intern_class_id("java.lang.Byte");
        let character = store.intern_class_id("java.lang.Character");
        let short = store.intern_class_id("java.lang.Short");
        let integer = store.intern_class_id("java.lang.Integer");
        let long = store.intern_class_id("java.lang.Long");
        let float = store.intern_class_id("java.lang.Float");
        let double = store.intern_class_id("java.lang.Double");

        store.well_known = WellKnownTypes {
            object,
            string,
            number,
            comparable,
            cloneable,
            serializable,
            boolean,
            byte,
            character,
            short,
            integer,
            long,
            float,
            double,
        };

        let object_bound = ParameterBound::Eager(ReferenceType::Class(object));

        store.define_class(
            object,
            ClassDef {
                name: "java.lang.Object".into(),
                kind: ClassKind::Class,
                is_abstract: false,
                type_params: vec![],
                super_class: None,
                interfaces: vec![],
            },
        );
        store.define_class(
            cloneable,
            ClassDef {
                name: "java.lang.Cloneable".into(),
                kind: ClassKind::Interface,
                is_abstract: true,
                type_params: vec![],
                super_class: None,
                interfaces: vec![],
            },
        );
        store.define_class(
            serializable,
            ClassDef {
                name: "java.io.Serializable".into(),
                kind: ClassKind::Interface,
                is_abstract: true,
                type_params: vec![],
                super_class: None,
                interfaces: vec![],
            },
        );

        // interface Comparable<T>
        let comparable_t = store.add_type_param("T", object_bound.clone());
        store.define_class(
            comparable,
            ClassDef {
                name: "java.lang.Comparable".into(),
                kind: ClassKind::Interface,
                is_abstract: true,
                type_params: vec![comparable_t],
                super_class: None,
                interfaces: vec![],
            },
        );

        let comparable_to = |store: &TypeStore, id: ClassId| {
            ReferenceType::Instantiated(InstantiatedType::new(
                GenericClassType::new(store.well_known.comparable),
                vec![TypeArgument::Reference(ReferenceType::Class(id))],
            ))
        };

        store.define_class(
            string,
            ClassDef {
                name: "java.lang.String".into(),
                kind: ClassKind::Class,
                is_abstract: false,
                type_params: vec![],
                super_class: Some(ReferenceType::Class(object)),
                interfaces: vec![
                    comparable_to(&store, string),
                    ReferenceType::Class(serializable),
                ],
            },
        );
        store.define_class(
            number,
            ClassDef {
                name: "java.lang.Number".into(),
                kind: ClassKind::Class,
                is_abstract: true,
                type_params: vec![],
                super_class: Some(ReferenceType::Class(object)),
                interfaces: vec![ReferenceType::Class(serializable)],
            },
        );

        // The two non-numeric wrappers sit directly under Object.
        for (id, name) in [(boolean, "java.lang.Boolean"), (character, "java.lang.Character")] {
            store.define_class(
                id,
                ClassDef {
                    name: name.into(),
                    kind: ClassKind::Class,
                    is_abstract: false,
                    type_params: vec![],
                    super_class: Some(ReferenceType::Class(object)),
                    interfaces: vec![
                        comparable_to(&store, id),
                        ReferenceType::Class(serializable),
                    ],
                },
            );
        }

        for (id, name) in [
            (byte, "java.lang.Byte"),
            (short, "java.lang.Short"),
            (integer, "java.lang.Integer"),
            (long, "java.lang.Long"),
            (float, "java.lang.Float"),
            (double, "java.lang.Double"),
        ] {
            store.define_class(
                id,
                ClassDef {
                    name: name.into(),
                    kind: ClassKind::Class,
                    is_abstract: false,
                    type_params: vec![],
                    super_class: Some(ReferenceType::Class(number)),
                    interfaces: vec![comparable_to(&store, id)],
                },
            );
        }

        store
    }

    /// The core store plus a small slice of the collections hierarchy and
    /// `java.lang.Enum`, enough to exercise every engine path in tests.
    pub fn with_minimal_jdk() -> Self {
        let mut store = Self::with_core_lang();
        let object = store.well_known.object;
        let object_bound = ParameterBound::Eager(ReferenceType::Class(object));

        let var_arg = |v: TypeVarId| {
            TypeArgument::Reference(ReferenceType::Variable(TypeVariable::Explicit(v)))
        };
        let inst = |def: ClassId, args: Vec<TypeArgument>| {
            ReferenceType::Instantiated(InstantiatedType::new(GenericClassType::new(def), args))
        };

        // interface Iterable<T>
        let iterable = store.intern_class_id("java.lang.Iterable");
        let iterable_t = store.add_type_param("T", object_bound.clone());
        store.define_class(
            iterable,
            ClassDef {
                name: "java.lang.Iterable".into(),
                kind: ClassKind::Interface,
                is_abstract: true,
                type_params: vec![iterable_t],
                super_class: None,
                interfaces: vec![],
            },
        );

        // interface Collection<E> extends Iterable<E>
        let collection = store.intern_class_id("java.util.Collection");
        let collection_e = store.add_type_param("E", object_bound.clone());
        store.define_class(
            collection,
            ClassDef {
                name: "java.util.Collection".into(),
                kind: ClassKind::Interface,
                is_abstract: true,
                type_params: vec![collection_e],
                super_class: None,
                interfaces: vec![inst(iterable, vec![var_arg(collection_e)])],
            },
        );

        // interface List<E> extends Collection<E>
        let list = store.intern_class_id("java.util.List");
        let list_e = store.add_type_param("E", object_bound.clone());
        store.define_class(
            list,
            ClassDef {
                name: "java.util.List".into(),
                kind: ClassKind::Interface,
                is_abstract: true,
                type_params: vec![list_e],
                super_class: None,
                interfaces: vec![inst(collection, vec![var_arg(list_e)])],
            },
        );

        // class ArrayList<E> implements List<E>
        let array_list = store.intern_class_id("java.util.ArrayList");
        let array_list_e = store.add_type_param("E", object_bound.clone());
        store.define_class(
            array_list,
            ClassDef {
                name: "java.util.ArrayList".into(),
                kind: ClassKind::Class,
                is_abstract: false,
                type_params: vec![array_list_e],
                super_class: Some(ReferenceType::Class(object)),
                interfaces: vec![inst(list, vec![var_arg(array_list_e)])],
            },
        );

        // interface Map<K, V> and class HashMap<K, V>
        let map = store.intern_class_id("java.util.Map");
        let map_k = store.add_type_param("K", object_bound.clone());
        let map_v = store.add_type_param("V", object_bound.clone());
        store.define_class(
            map,
            ClassDef {
                name: "java.util.Map".into(),
                kind: ClassKind::Interface,
                is_abstract: true,
                type_params: vec![map_k, map_v],
                super_class: None,
                interfaces: vec![],
            },
        );
        let hash_map = store.intern_class_id("java.util.HashMap");
        let hash_map_k = store.add_type_param("K", object_bound.clone());
        let hash_map_v = store.add_type_param("V", object_bound.clone());
        store.define_class(
            hash_map,
            ClassDef {
                name: "java.util.HashMap".into(),
                kind: ClassKind::Class,
                is_abstract: false,
                type_params: vec![hash_map_k, hash_map_v],
                super_class: Some(ReferenceType::Class(object)),
                interfaces: vec![inst(map, vec![var_arg(hash_map_k), var_arg(hash_map_v)])],
            },
        );

        // abstract class Enum<E extends Enum<E>> implements Comparable<E>
        //
        // The id is reserved before the parameter bound is defined so the
        // self-referential bound can mention it.
        let enum_id = store.intern_class_id("java.lang.Enum");
        let enum_e = store.add_type_param("E", object_bound);
        store.define_type_param(
            enum_e,
            TypeVariableDef::new(
                "E",
                ParameterBound::Lazy(inst(enum_id, vec![var_arg(enum_e)])),
            ),
        );
        store.define_class(
            enum_id,
            ClassDef {
                name: "java.lang.Enum".into(),
                kind: ClassKind::Class,
                is_abstract: true,
                type_params: vec![enum_e],
                super_class: Some(ReferenceType::Class(object)),
                interfaces: vec![inst(store.well_known.comparable, vec![var_arg(enum_e)])],
            },
        );

        store
    }

    /// Reserve (or look up) the id for `name` without defining it yet. Lets
    /// self-referential declarations mention themselves while being built.
    pub fn intern_class_id(&mut self, name: &str) -> ClassId {
        if let Some(id) = self.by_name.get(name) {
            return *id;
        }
        let id = ClassId(self.classes.len() as u32);
        self.classes.push(None);
        self.by_name.insert(name.to_string(), id);
        id
    }

    pub fn define_class(&mut self, id: ClassId, def: ClassDef) {
        self.classes[id.0 as usize] = Some(def);
    }

    /// Intern and define in one step; the usual path for non-recursive
    /// declarations.
    pub fn add_class(&mut self, def: ClassDef) -> ClassId {
        let name = def.name.clone();
        let id = self.intern_class_id(&name);
        self.define_class(id, def);
        id
    }

    /// Allocate a type-variable shell. For self-referential bounds, pass a
    /// placeholder here and fill the real bound with
    /// [`TypeStore::define_type_param`] once the ids exist.
    pub fn add_type_param(
        &mut self,
        name: impl Into<String>,
        upper_bound: ParameterBound,
    ) -> TypeVarId {
        let id = TypeVarId(self.type_vars.len() as u32);
        self.type_vars.push(TypeVariableDef::new(name, upper_bound));
        id
    }

    pub fn define_type_param(&mut self, id: TypeVarId, def: TypeVariableDef) {
        self.type_vars[id.0 as usize] = def;
    }

    /// Alias of [`TypeEnv::lookup_class`] for call sites that hold a
    /// concrete store.
    pub fn class_id(&self, name: &str) -> Option<ClassId> {
        self.lookup_class(name)
    }

    /// The generic declaration for `name`, if it is defined and generic.
    pub fn generic(&self, name: &str) -> Option<GenericClassType> {
        let id = self.lookup_class(name)?;
        let def = self.class(id)?;
        if def.type_params.is_empty() {
            return None;
        }
        Some(GenericClassType::new(id))
    }
}
