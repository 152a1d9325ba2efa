//! A model of the Java type system for reasoning about generics.
//!
//! The crate covers the slice of JLS chapters 4 and 5 that a test-generation
//! or analysis engine needs: primitives with widening and boxing, the
//! reference-type shapes (classes, arrays, generic declarations,
//! instantiations, type variables, wildcards, the null type), parameter
//! bounds with the eager/lazy split that makes `E extends Comparable<E>`
//! finite, wildcard capture conversion, subtyping, assignability, and a
//! narrow declaration-level unifier.
//!
//! Nominal declarations live in a caller-owned [`TypeStore`]; every
//! algorithm takes `&dyn TypeEnv` so capture conversion can layer
//! context-local variables over a shared store without mutating it.
//!
//! ```
//! use javelin_types::{is_subtype, JavaType, TypeEnv, TypeStore};
//!
//! let store = TypeStore::with_minimal_jdk();
//! let integer = JavaType::class(store.well_known().integer);
//! let number = JavaType::class(store.well_known().number);
//! assert!(is_subtype(&store, &integer, &number));
//! ```

#![forbid(unsafe_code)]

mod argument;
mod bound;
mod capture;
mod error;
pub mod format;
mod ids;
mod model;
mod primitive;
mod store;
mod substitution;
mod subtyping;
mod supertype;
mod unify;
mod variable;
mod wildcard;

pub use argument::TypeArgument;
pub use bound::{bound_variables, satisfies_bounds, ParameterBound};
pub use capture::CaptureContext;
pub use error::{Result, TypeError};
pub use ids::{ClassId, TypeVarId};
pub use model::{GenericClassType, InstantiatedType, JavaType, ReferenceType};
pub use primitive::{unboxed, PrimitiveKind};
pub use store::{ClassDef, ClassKind, TypeEnv, TypeStore, WellKnownTypes};
pub use substitution::{substitute, substitute_argument, substitute_reference, Substitution};
pub use subtyping::{is_assignable, is_reference_subtype, is_subtype};
pub use supertype::{direct_supertypes, erased, free_variables, matching_supertype};
pub use unify::instantiating_substitution;
pub use variable::{TypeVariable, TypeVariableDef};
pub use wildcard::WildcardType;
