//! Reference subtyping over the minimal JDK hierarchy.

use javelin_types::{
    direct_supertypes, is_reference_subtype, matching_supertype, ClassDef, ClassKind,
    GenericClassType, InstantiatedType, JavaType, ParameterBound, ReferenceType, TypeArgument,
    TypeEnv, TypeStore, WildcardType,
};
use pretty_assertions::assert_eq;

fn class(store: &TypeStore, name: &str) -> ReferenceType {
    ReferenceType::Class(store.class_id(name).unwrap_or_else(|| panic!("{name} is not defined")))
}

fn list_of(store: &TypeStore, arg: TypeArgument) -> InstantiatedType {
    InstantiatedType::new(store.generic("java.util.List").unwrap(), vec![arg])
}

#[test]
fn nominal_hierarchy_subtyping() {
    let store = TypeStore::with_minimal_jdk();
    let integer = class(&store, "Integer");
    let number = class(&store, "Number");
    let object = class(&store, "Object");
    let string = class(&store, "String");

    assert!(is_reference_subtype(&store, &integer, &number));
    assert!(is_reference_subtype(&store, &integer, &object));
    assert!(is_reference_subtype(&store, &string, &object));
    assert!(!is_reference_subtype(&store, &number, &integer));
    assert!(!is_reference_subtype(&store, &string, &number));

    // The null type sits below everything.
    assert!(is_reference_subtype(&store, &ReferenceType::Null, &string));
    assert!(!is_reference_subtype(&store, &string, &ReferenceType::Null));
}

#[test]
fn parameterized_subtyping_walks_the_interface_graph() {
    let store = TypeStore::with_minimal_jdk();
    let integer = class(&store, "Integer");
    let array_list = store.generic("java.util.ArrayList").unwrap();
    let al_int = array_list
        .instantiate(&store, vec![integer.clone()])
        .unwrap()
        .as_type();
    let list_int = list_of(&store, TypeArgument::Reference(integer.clone())).as_type();
    let iterable_int = ReferenceType::Instantiated(InstantiatedType::new(
        store.generic("java.lang.Iterable").unwrap(),
        vec![TypeArgument::Reference(integer)],
    ));

    assert!(is_reference_subtype(&store, &al_int, &list_int));
    assert!(is_reference_subtype(&store, &al_int, &iterable_int));
    assert!(!is_reference_subtype(&store, &list_int, &al_int));

    // Arguments are invariant without wildcards.
    let list_num = list_of(&store, TypeArgument::Reference(class(&store, "Number"))).as_type();
    let al_num = array_list
        .instantiate(&store, vec![class(&store, "Number")])
        .unwrap()
        .as_type();
    assert!(!is_reference_subtype(&store, &al_int, &list_num));
    assert!(!is_reference_subtype(&store, &al_num, &list_int));
}

#[test]
fn wildcard_arguments_relax_invariance() {
    let store = TypeStore::with_minimal_jdk();
    let integer = class(&store, "Integer");
    let number = class(&store, "Number");

    let list_int = list_of(&store, TypeArgument::Reference(integer.clone())).as_type();
    let list_num = list_of(&store, TypeArgument::Reference(number.clone())).as_type();
    let list_ext_num = list_of(
        &store,
        TypeArgument::Wildcard(WildcardType::extends(number.clone())),
    )
    .as_type();
    let list_ext_int = list_of(
        &store,
        TypeArgument::Wildcard(WildcardType::extends(integer.clone())),
    )
    .as_type();
    let list_sup_int = list_of(
        &store,
        TypeArgument::Wildcard(WildcardType::super_of(integer.clone())),
    )
    .as_type();
    let list_unbounded =
        list_of(&store, TypeArgument::Wildcard(WildcardType::unbounded(&store))).as_type();

    assert!(is_reference_subtype(&store, &list_int, &list_ext_num));
    assert!(is_reference_subtype(&store, &list_ext_int, &list_ext_num));
    assert!(!is_reference_subtype(&store, &list_ext_num, &list_ext_int));

    assert!(is_reference_subtype(&store, &list_num, &list_sup_int));
    assert!(is_reference_subtype(&store, &list_int, &list_sup_int));

    assert!(is_reference_subtype(&store, &list_int, &list_unbounded));
    assert!(is_reference_subtype(&store, &list_ext_num, &list_unbounded));
    assert!(!is_reference_subtype(&store, &list_unbounded, &list_int));

    let string = class(&store, "String");
    let list_string = list_of(&store, TypeArgument::Reference(string)).as_type();
    assert!(!is_reference_subtype(&store, &list_string, &list_ext_num));
}

#[test]
fn rawtype_conversion_is_one_directional() {
    let store = TypeStore::with_minimal_jdk();
    let string = class(&store, "String");
    let raw_list = class(&store, "java.util.List");
    let list_string = list_of(&store, TypeArgument::Reference(string)).as_type();

    assert!(is_reference_subtype(&store, &list_string, &raw_list));
    assert!(!is_reference_subtype(&store, &raw_list, &list_string));

    // Erasure also crosses the hierarchy: List<String> <: raw Collection.
    let raw_collection = class(&store, "java.util.Collection");
    assert!(is_reference_subtype(&store, &list_string, &raw_collection));
}

#[test]
fn matching_supertype_threads_the_substitution() {
    let store = TypeStore::with_minimal_jdk();
    let integer = class(&store, "Integer");
    let array_list = store.generic("java.util.ArrayList").unwrap();
    let al_int = array_list.instantiate(&store, vec![integer.clone()]).unwrap();

    let collection = store.class_id("java.util.Collection").unwrap();
    let matched = matching_supertype(&store, &al_int, collection).unwrap();
    assert_eq!(matched.generic.def, collection);
    assert_eq!(matched.args, vec![TypeArgument::Reference(integer.clone())]);

    // Integer finds Comparable<Integer> among its direct supertypes.
    let comparable_int = ReferenceType::Instantiated(InstantiatedType::new(
        store.generic("java.lang.Comparable").unwrap(),
        vec![TypeArgument::Reference(integer.clone())],
    ));
    assert!(direct_supertypes(&store, &integer).contains(&comparable_int));
    assert!(is_reference_subtype(&store, &integer, &comparable_int));

    // No match across unrelated branches.
    let map = store.class_id("java.util.Map").unwrap();
    assert_eq!(matching_supertype(&store, &al_int, map), None);
}

#[test]
fn parameterized_supertype_survives_a_plain_intermediate_class() {
    // class Base implements Comparable<Base>; class Holder<T> extends Base.
    // The walk must continue through the non-generic link to reach the
    // parameterized interface Base declares.
    let mut store = TypeStore::with_minimal_jdk();
    let object = store.well_known().object;
    let comparable = store.generic("java.lang.Comparable").unwrap();
    let base = store.intern_class_id("demo.Base");
    let comparable_base = InstantiatedType::new(
        comparable,
        vec![TypeArgument::Reference(ReferenceType::Class(base))],
    );
    store.define_class(
        base,
        ClassDef {
            name: "demo.Base".into(),
            kind: ClassKind::Class,
            is_abstract: false,
            type_params: vec![],
            super_class: Some(ReferenceType::Class(object)),
            interfaces: vec![ReferenceType::Instantiated(comparable_base.clone())],
        },
    );
    let t = store.add_type_param("T", ParameterBound::Eager(ReferenceType::Class(object)));
    let holder = GenericClassType::new(store.add_class(ClassDef {
        name: "demo.Holder".into(),
        kind: ClassKind::Class,
        is_abstract: false,
        type_params: vec![t],
        super_class: Some(ReferenceType::Class(base)),
        interfaces: vec![],
    }));

    let integer = class(&store, "Integer");
    let holder_int = holder.instantiate(&store, vec![integer]).unwrap();

    let matched = matching_supertype(&store, &holder_int, comparable.def).unwrap();
    assert_eq!(matched, comparable_base);
    assert!(is_reference_subtype(
        &store,
        &holder_int.as_type(),
        &ReferenceType::Instantiated(comparable_base),
    ));
}

#[test]
fn arrays_are_covariant_in_nominal_elements_only() {
    let store = TypeStore::with_minimal_jdk();
    let integer = class(&store, "Integer");
    let number = class(&store, "Number");
    let int_array = ReferenceType::array(JavaType::Reference(integer.clone()));
    let num_array = ReferenceType::array(JavaType::Reference(number));
    let int_prim_array = ReferenceType::array(JavaType::int());

    assert!(is_reference_subtype(&store, &int_array, &num_array));
    assert!(!is_reference_subtype(&store, &num_array, &int_array));

    // Primitive element arrays relate only to themselves.
    assert!(is_reference_subtype(&store, &int_prim_array, &int_prim_array));
    assert!(!is_reference_subtype(&store, &int_prim_array, &int_array));

    // Every array is an Object, a Cloneable, and a Serializable.
    let wk = store.well_known();
    assert!(is_reference_subtype(
        &store,
        &int_prim_array,
        &ReferenceType::Class(wk.object)
    ));
    assert!(is_reference_subtype(
        &store,
        &int_array,
        &ReferenceType::Class(wk.cloneable)
    ));
    assert!(is_reference_subtype(
        &store,
        &int_array,
        &ReferenceType::Class(wk.serializable)
    ));
}
