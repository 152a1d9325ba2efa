//! Human-readable rendering of types, in Java source spelling.

use crate::argument::TypeArgument;
use crate::bound::ParameterBound;
use crate::model::{JavaType, ReferenceType};
use crate::store::TypeEnv;
use crate::wildcard::WildcardType;

pub fn type_name(env: &dyn TypeEnv, ty: &JavaType) -> String {
    match ty {
        JavaType::Primitive(kind) => kind.name().to_string(),
        JavaType::Void => "void".to_string(),
        JavaType::Reference(r) => reference_name(env, r),
    }
}

pub fn reference_name(env: &dyn TypeEnv, ty: &ReferenceType) -> String {
    match ty {
        ReferenceType::Class(id) => class_name(env, *id),
        ReferenceType::GenericClass(g) => class_name(env, g.def),
        ReferenceType::Array(elem) => format!("{}[]", type_name(env, elem)),
        ReferenceType::Instantiated(inst) => {
            let args: Vec<String> = inst
                .args
                .iter()
                .map(|arg| argument_name(env, arg))
                .collect();
            format!("{}<{}>", class_name(env, inst.generic.def), args.join(", "))
        }
        ReferenceType::Variable(v) => match env.type_variable(v.id()) {
            Some(def) => def.name.clone(),
            None => format!("{v:?}"),
        },
        ReferenceType::Wildcard(w) => wildcard_name(env, w),
        ReferenceType::Null => "null".to_string(),
    }
}

pub fn argument_name(env: &dyn TypeEnv, arg: &TypeArgument) -> String {
    match arg {
        TypeArgument::Reference(ty) => reference_name(env, ty),
        TypeArgument::Wildcard(w) => wildcard_name(env, w),
    }
}

pub fn bound_name(env: &dyn TypeEnv, bound: &ParameterBound) -> String {
    match bound {
        ParameterBound::Eager(ty) | ParameterBound::Lazy(ty) => reference_name(env, ty),
        ParameterBound::Intersection(parts) => parts
            .iter()
            .map(|p| bound_name(env, p))
            .collect::<Vec<_>>()
            .join(" & "),
    }
}

fn wildcard_name(env: &dyn TypeEnv, w: &WildcardType) -> String {
    if w.is_unbounded(env) {
        return "?".to_string();
    }
    match w {
        WildcardType::Extends(bound) => format!("? extends {}", bound_name(env, bound)),
        WildcardType::Super(bound) => format!("? super {}", bound_name(env, bound)),
    }
}

fn class_name(env: &dyn TypeEnv, id: crate::ids::ClassId) -> String {
    match env.class(id) {
        Some(def) => def.name.clone(),
        None => format!("{id:?}"),
    }
}
