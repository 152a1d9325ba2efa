//! Widening, boxing, and unboxing across the primitive/reference boundary.

use javelin_types::{
    is_assignable, is_subtype, unboxed, JavaType, PrimitiveKind, ReferenceType, TypeEnv, TypeStore,
};
use pretty_assertions::assert_eq;

#[test]
fn widening_closure_table() {
    use PrimitiveKind::*;
    let widens: &[(PrimitiveKind, &[PrimitiveKind])] = &[
        (Boolean, &[]),
        (Byte, &[Short, Int, Long, Float, Double]),
        (Short, &[Int, Long, Float, Double]),
        (Char, &[Int, Long, Float, Double]),
        (Int, &[Long, Float, Double]),
        (Long, &[Float, Double]),
        (Float, &[Double]),
        (Double, &[]),
    ];
    for (from, targets) in widens {
        for to in PrimitiveKind::ALL {
            assert_eq!(
                from.widens_to(to),
                targets.contains(&to),
                "{} -> {}",
                from.name(),
                to.name()
            );
        }
    }
}

#[test]
fn byte_reaches_double_through_int() {
    assert!(PrimitiveKind::Byte.widens_to(PrimitiveKind::Int));
    assert!(PrimitiveKind::Int.widens_to(PrimitiveKind::Double));
    assert!(PrimitiveKind::Byte.widens_to(PrimitiveKind::Double));
}

#[test]
fn boxing_is_a_bijection_onto_the_wrappers() {
    let store = TypeStore::with_minimal_jdk();
    for kind in PrimitiveKind::ALL {
        assert_eq!(unboxed(&store, kind.boxed(&store)), Some(kind));
    }
    assert_eq!(unboxed(&store, store.well_known().string), None);
    assert_eq!(unboxed(&store, store.well_known().number), None);
}

#[test]
fn boxing_assignability_widens_through_references() {
    let store = TypeStore::with_minimal_jdk();
    let int = JavaType::int();
    let integer = JavaType::class(store.well_known().integer);
    let number = JavaType::class(store.well_known().number);
    let object = JavaType::class(store.well_known().object);
    let string = JavaType::class(store.well_known().string);

    // int boxes to Integer and widens to its reference supertypes.
    assert!(is_assignable(&store, &integer, &int));
    assert!(is_assignable(&store, &number, &int));
    assert!(is_assignable(&store, &object, &int));
    assert!(!is_assignable(&store, &string, &int));

    // Integer unboxes to int and widens onward; Number does not unbox.
    assert!(is_assignable(&store, &int, &integer));
    assert!(is_assignable(
        &store,
        &JavaType::Primitive(PrimitiveKind::Long),
        &integer
    ));
    assert!(!is_assignable(&store, &int, &number));
    // No narrowing through unboxing.
    assert!(!is_assignable(
        &store,
        &JavaType::Primitive(PrimitiveKind::Short),
        &integer
    ));
}

#[test]
fn void_converts_to_and_from_nothing() {
    let store = TypeStore::with_minimal_jdk();
    let object = JavaType::class(store.well_known().object);
    assert!(!is_assignable(&store, &JavaType::Void, &JavaType::Void));
    assert!(!is_assignable(&store, &object, &JavaType::Void));
    assert!(!is_assignable(&store, &JavaType::Void, &JavaType::int()));
    // Subtyping still sees void as equal to itself.
    assert!(is_subtype(&store, &JavaType::Void, &JavaType::Void));
}

#[test]
fn primitives_and_references_never_mix_in_subtyping() {
    let store = TypeStore::with_minimal_jdk();
    let int = JavaType::int();
    let integer = JavaType::class(store.well_known().integer);
    assert!(!is_subtype(&store, &int, &integer));
    assert!(!is_subtype(&store, &integer, &int));
    assert!(is_subtype(
        &store,
        &int,
        &JavaType::Primitive(PrimitiveKind::Double)
    ));
    assert!(!is_subtype(
        &store,
        &JavaType::Primitive(PrimitiveKind::Double),
        &int
    ));
    let null = JavaType::Reference(ReferenceType::Null);
    assert!(!is_assignable(&store, &int, &null));
}
