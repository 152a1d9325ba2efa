//! Generic declarations: instantiation, bound checks, capture conversion,
//! and the self-referential bounds that must stay finite.

use javelin_types::{
    CaptureContext, ClassDef, ClassKind, GenericClassType, InstantiatedType, ParameterBound,
    ReferenceType, Substitution, TypeArgument, TypeEnv, TypeError, TypeStore, TypeVariableDef,
    WildcardType,
};
use pretty_assertions::assert_eq;

/// `class Box<T extends Number>` on top of the minimal JDK.
fn store_with_box() -> (TypeStore, GenericClassType) {
    let mut store = TypeStore::with_minimal_jdk();
    let object = store.well_known().object;
    let number = store.well_known().number;
    let t = store.add_type_param(
        "T",
        ParameterBound::Eager(ReferenceType::Class(number)),
    );
    let id = store.add_class(ClassDef {
        name: "demo.Box".into(),
        kind: ClassKind::Class,
        is_abstract: false,
        type_params: vec![t],
        super_class: Some(ReferenceType::Class(object)),
        interfaces: vec![],
    });
    (store, GenericClassType::new(id))
}

#[test]
fn instantiation_round_trip() {
    let (store, boxed) = store_with_box();
    let integer = ReferenceType::Class(store.well_known().integer);

    let inst = boxed.instantiate(&store, vec![integer.clone()]).unwrap();
    assert_eq!(inst.args, vec![TypeArgument::Reference(integer)]);
    assert_eq!(inst.generic, boxed);
}

#[test]
fn instantiation_rejects_an_argument_outside_the_bound() {
    let (store, boxed) = store_with_box();
    let string = ReferenceType::Class(store.well_known().string);

    let err = boxed.instantiate(&store, vec![string]).unwrap_err();
    assert_eq!(
        err,
        TypeError::BoundViolation {
            parameter: "T".into(),
            argument: "java.lang.String".into(),
        }
    );
}

#[test]
fn instantiation_rejects_wrong_arity() {
    let (store, boxed) = store_with_box();
    let integer = ReferenceType::Class(store.well_known().integer);

    let err = boxed
        .instantiate(&store, vec![integer.clone(), integer])
        .unwrap_err();
    assert_eq!(
        err,
        TypeError::ArityMismatch {
            expected: 1,
            actual: 2
        }
    );
}

#[test]
fn capture_conversion_is_identity_without_wildcards() {
    let store = TypeStore::with_minimal_jdk();
    let list = store.generic("java.util.List").unwrap();
    let integer = ReferenceType::Class(store.well_known().integer);
    let inst = list.instantiate(&store, vec![integer]).unwrap();

    let mut ctx = CaptureContext::new(&store);
    let converted = ctx.apply_capture_conversion(&inst).unwrap();
    assert_eq!(converted, inst);
}

#[test]
fn capture_replaces_wildcards_with_fresh_variables() {
    let store = TypeStore::with_minimal_jdk();
    let list = store.generic("java.util.List").unwrap();
    let number = ReferenceType::Class(store.well_known().number);
    let inst = InstantiatedType::new(
        list,
        vec![TypeArgument::Wildcard(WildcardType::extends(number))],
    );

    let mut ctx = CaptureContext::new(&store);
    let converted = ctx.apply_capture_conversion(&inst).unwrap();

    let [TypeArgument::Reference(ReferenceType::Variable(var))] = converted.args.as_slice()
    else {
        panic!("expected a single capture variable, got {:?}", converted.args);
    };
    assert!(var.is_capture());
    let def = ctx.type_variable(var.id()).expect("capture var resolvable");
    assert!(def.name.starts_with("CAP#"));
    assert!(def.captured_wildcard.is_some());
}

#[test]
fn capture_combines_declared_and_wildcard_bounds() {
    // Declared bound `T extends Number`, wildcard `? extends Integer`:
    // the capture variable must admit Integer and reject String.
    let (store, boxed) = store_with_box();
    let integer = ReferenceType::Class(store.well_known().integer);
    let string = ReferenceType::Class(store.well_known().string);
    let inst = InstantiatedType::new(
        boxed,
        vec![TypeArgument::Wildcard(WildcardType::extends(integer.clone()))],
    );

    let mut ctx = CaptureContext::new(&store);
    let converted = ctx.apply_capture_conversion(&inst).unwrap();
    let [TypeArgument::Reference(ReferenceType::Variable(var))] = converted.args.as_slice()
    else {
        panic!("expected a capture variable");
    };
    let upper = ctx
        .type_variable(var.id())
        .expect("capture var resolvable")
        .upper_bound
        .clone();
    assert!(upper.is_upper_bound_of(&ctx, &integer, &Substitution::empty()));
    assert!(!upper.is_upper_bound_of(&ctx, &string, &Substitution::empty()));
}

#[test]
fn capture_rejects_unrelated_class_bounds() {
    // Declared bound `T extends Number`, wildcard `? extends String`:
    // two unrelated class bounds cannot intersect.
    let (store, boxed) = store_with_box();
    let string = ReferenceType::Class(store.well_known().string);
    let inst = InstantiatedType::new(
        boxed,
        vec![TypeArgument::Wildcard(WildcardType::extends(string))],
    );

    let mut ctx = CaptureContext::new(&store);
    let err = ctx.apply_capture_conversion(&inst).unwrap_err();
    assert!(matches!(err, TypeError::UnsupportedBoundShape { .. }));
}

#[test]
fn super_wildcard_capture_keeps_the_lower_bound() {
    let store = TypeStore::with_minimal_jdk();
    let list = store.generic("java.util.List").unwrap();
    let integer = ReferenceType::Class(store.well_known().integer);
    let inst = InstantiatedType::new(
        list,
        vec![TypeArgument::Wildcard(WildcardType::super_of(integer.clone()))],
    );

    let mut ctx = CaptureContext::new(&store);
    let converted = ctx.apply_capture_conversion(&inst).unwrap();
    let [TypeArgument::Reference(ReferenceType::Variable(var))] = converted.args.as_slice()
    else {
        panic!("expected a capture variable");
    };
    let def = ctx.type_variable(var.id()).expect("capture var resolvable");
    // Upper bound defaults to the declared Object bound, lower keeps Integer.
    assert!(def.upper_bound.is_object(&ctx));
    assert_eq!(def.lower_bound, ParameterBound::Eager(integer));
}

#[test]
fn self_referential_bound_instantiates_without_recursion() {
    // `Sorted<E extends Comparable<E>>` with E = Integer.
    let mut store = TypeStore::with_minimal_jdk();
    let object = store.well_known().object;
    let comparable = store.well_known().comparable;

    let e = store.add_type_param("E", ParameterBound::Eager(ReferenceType::Class(object)));
    let self_comparable = ReferenceType::Instantiated(InstantiatedType::new(
        GenericClassType::new(comparable),
        vec![TypeArgument::Reference(ReferenceType::Variable(
            javelin_types::TypeVariable::Explicit(e),
        ))],
    ));
    store.define_type_param(e, TypeVariableDef::new("E", ParameterBound::Lazy(self_comparable)));
    let sorted = store.add_class(ClassDef {
        name: "demo.Sorted".into(),
        kind: ClassKind::Class,
        is_abstract: false,
        type_params: vec![e],
        super_class: Some(ReferenceType::Class(object)),
        interfaces: vec![],
    });
    let sorted = GenericClassType::new(sorted);

    let integer = ReferenceType::Class(store.well_known().integer);
    let inst = sorted.instantiate(&store, vec![integer.clone()]).unwrap();
    assert_eq!(inst.args, vec![TypeArgument::Reference(integer)]);

    // Object implements nothing, so it cannot satisfy E extends Comparable<E>.
    let err = sorted
        .instantiate(&store, vec![ReferenceType::Class(object)])
        .unwrap_err();
    assert!(matches!(err, TypeError::BoundViolation { .. }));
}

#[test]
fn enum_like_declarations_accept_their_subclasses() {
    // `class Color extends Enum<Color>` satisfies `E extends Enum<E>`.
    let mut store = TypeStore::with_minimal_jdk();
    let enum_generic = store.generic("java.lang.Enum").unwrap();
    let color = store.intern_class_id("demo.Color");
    store.define_class(
        color,
        ClassDef {
            name: "demo.Color".into(),
            kind: ClassKind::Enum,
            is_abstract: false,
            type_params: vec![],
            super_class: Some(ReferenceType::Instantiated(InstantiatedType::new(
                enum_generic,
                vec![TypeArgument::Reference(ReferenceType::Class(color))],
            ))),
            interfaces: vec![],
        },
    );

    let inst = enum_generic
        .instantiate(&store, vec![ReferenceType::Class(color)])
        .unwrap();
    assert_eq!(
        inst.args,
        vec![TypeArgument::Reference(ReferenceType::Class(color))]
    );

    // String does not extend Enum<String>.
    let string = ReferenceType::Class(store.well_known().string);
    assert!(enum_generic.instantiate(&store, vec![string]).is_err());
}
