use super::{
    CountGetter, DescribedId, ItemInvoker, NullInvoker, ParamKind, Projection, TypeDescription,
};
use crate::error::SynthesisError;
use std::any::TypeId;

/// Outcome of searching a description for a native null-containment answer.
pub(crate) enum NullLocation {
    /// A `contains` with a nullable parameter can be asked directly.
    Native(NullInvoker),
    /// Every `contains` overload takes a non-nullable value, so the
    /// collection cannot hold null by construction.
    Impossible,
    NotFound,
}

/// A located `contains`, together with the projections that lead from the
/// described type down to the member's owner.
pub(crate) struct LocatedContains {
    pub(crate) invoke: ItemInvoker,
    pub(crate) projections: Vec<Projection>,
}

fn concrete_id(description: &TypeDescription) -> Result<TypeId, SynthesisError> {
    match description.id() {
        DescribedId::Concrete(id) => Ok(id),
        DescribedId::Opaque => Err(SynthesisError::OpaqueRuntimeType {
            type_name: description.name(),
        }),
    }
}

fn check_bound(
    description: &TypeDescription,
    id: TypeId,
    bound: TypeId,
    member: &'static str,
) -> Result<(), SynthesisError> {
    if bound == id {
        Ok(())
    } else {
        Err(SynthesisError::ForeignMember {
            type_name: description.name(),
            member,
        })
    }
}

/// Prefers a property named `count`, then one named `len`. Size is never
/// looked up through the base chain.
pub(crate) fn locate_count(
    description: &TypeDescription,
) -> Result<Option<CountGetter>, SynthesisError> {
    let id = concrete_id(description)?;
    for name in ["count", "len"] {
        if let Some(property) = description.properties.iter().find(|p| p.name == name) {
            check_bound(description, id, property.bound, property.name)?;
            return Ok(Some(property.get.clone()));
        }
    }
    Ok(None)
}

pub(crate) fn locate_null_probe(
    description: &TypeDescription,
) -> Result<NullLocation, SynthesisError> {
    let id = concrete_id(description)?;
    let mut value_overload = false;
    for method in description.methods.iter().filter(|m| m.name == "contains") {
        match (method.param, &method.invoke_null) {
            (ParamKind::Nullable { .. }, Some(probe)) => {
                check_bound(description, id, method.bound, method.name)?;
                return Ok(NullLocation::Native(probe.clone()));
            }
            (ParamKind::Value(_), _) => value_overload = true,
            _ => {}
        }
    }
    if value_overload {
        Ok(NullLocation::Impossible)
    } else {
        Ok(NullLocation::NotFound)
    }
}

/// Searches the description and then each base, most-derived-first, for a
/// `contains` accepting the item type. At each level an exact parameter
/// match is tried before a nullable parameter wrapping the item type; the
/// first structurally compatible member wins.
pub(crate) fn locate_contains(
    description: &TypeDescription,
    item: TypeId,
) -> Result<Option<LocatedContains>, SynthesisError> {
    let mut projections: Vec<Projection> = Vec::new();
    let mut current = description;
    loop {
        let id = concrete_id(current)?;
        for method in current.methods.iter().filter(|m| m.name == "contains") {
            let exact = match method.param {
                ParamKind::Value(param) => param == item,
                ParamKind::Nullable { wrapper, .. } => wrapper == item,
            };
            if exact {
                check_bound(current, id, method.bound, method.name)?;
                return Ok(Some(LocatedContains {
                    invoke: method.invoke.clone(),
                    projections,
                }));
            }
        }
        for method in current.methods.iter().filter(|m| m.name == "contains") {
            if let ParamKind::Nullable { inner, .. } = method.param {
                if inner == item {
                    if let Some(wrapped) = &method.invoke_wrapped {
                        check_bound(current, id, method.bound, method.name)?;
                        return Ok(Some(LocatedContains {
                            invoke: wrapped.clone(),
                            projections,
                        }));
                    }
                }
            }
        }
        match &current.base {
            Some(base) => {
                projections.push(base.project.clone());
                current = &base.description;
            }
            None => return Ok(None),
        }
    }
}
