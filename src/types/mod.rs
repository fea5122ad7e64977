//! Member descriptions of concrete collection types.
//!
//! A `TypeDescription` is what an `Enumerable` implementation says about its
//! own native operations: named integer properties (`count`, `len`) and
//! named boolean methods of one parameter (`contains`), each carried as an
//! erased invoker bound to one concrete type. The locator searches these by
//! name and parameter shape; it never sees the concrete types themselves.
use crate::{element::Elem, enumerable::Enumerable, error::SynthesisError};
use std::{
    any::{Any, TypeId},
    fmt::{Debug, Formatter},
    sync::Arc,
};

pub(crate) mod locate;

pub(crate) type CountGetter =
    Arc<dyn Fn(&dyn Enumerable) -> Result<usize, SynthesisError> + Send + Sync>;
pub(crate) type ItemInvoker =
    Arc<dyn Fn(&dyn Enumerable, &dyn Any) -> Result<bool, SynthesisError> + Send + Sync>;
pub(crate) type NullInvoker =
    Arc<dyn Fn(&dyn Enumerable) -> Result<bool, SynthesisError> + Send + Sync>;
pub(crate) type Projection = Arc<
    dyn for<'a> Fn(&'a dyn Enumerable) -> Result<&'a dyn Enumerable, SynthesisError> + Send + Sync,
>;

/// The identity a description binds its members to.
///
/// `Opaque` is the declared-as-interface case (`Box<dyn Enumerable>` and
/// friends): no members can be known statically, so every call is routed
/// through the cross-type cache instead.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum DescribedId {
    Concrete(TypeId),
    Opaque,
}

/// The shape of the single parameter of a described method.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub(crate) enum ParamKind {
    /// Accepts exactly this type.
    Value(TypeId),
    /// Accepts a nullable wrapper; `inner` is the wrapped type.
    Nullable { wrapper: TypeId, inner: TypeId },
}

pub(crate) struct PropertyDescription {
    pub(crate) name: &'static str,
    pub(crate) bound: TypeId,
    pub(crate) get: CountGetter,
}

pub(crate) struct MethodDescription {
    pub(crate) name: &'static str,
    pub(crate) bound: TypeId,
    pub(crate) param: ParamKind,
    pub(crate) invoke: ItemInvoker,
    /// Adapts an inner-typed item by cloning and wrapping it. Nullable
    /// parameters only.
    pub(crate) invoke_wrapped: Option<ItemInvoker>,
    /// Asks the method about the null value. Nullable parameters only.
    pub(crate) invoke_null: Option<NullInvoker>,
}

pub struct BaseDescription {
    pub(crate) description: Box<TypeDescription>,
    pub(crate) project: Projection,
}

pub struct TypeDescription {
    name: &'static str,
    id: DescribedId,
    pub(crate) properties: Vec<PropertyDescription>,
    pub(crate) methods: Vec<MethodDescription>,
    pub(crate) base: Option<BaseDescription>,
}

impl Debug for TypeDescription {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name)
    }
}

impl TypeDescription {
    pub fn of<C: Enumerable>(name: &'static str) -> Self {
        Self {
            name,
            id: DescribedId::Concrete(TypeId::of::<C>()),
            properties: Vec::new(),
            methods: Vec::new(),
            base: None,
        }
    }

    /// A description with no statically known runtime type, used where the
    /// declared type erases the value behind it.
    pub fn opaque(name: &'static str) -> Self {
        Self {
            name,
            id: DescribedId::Opaque,
            properties: Vec::new(),
            methods: Vec::new(),
            base: None,
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn id(&self) -> DescribedId {
        self.id
    }

    /// Declares an integer property named `count`.
    pub fn with_count<C: Enumerable>(self, get: fn(&C) -> usize) -> Self {
        self.property("count", get)
    }

    /// Declares an integer property named `len`.
    pub fn with_len<C: Enumerable>(self, get: fn(&C) -> usize) -> Self {
        self.property("len", get)
    }

    fn property<C: Enumerable>(mut self, name: &'static str, get: fn(&C) -> usize) -> Self {
        self.properties.push(PropertyDescription {
            name,
            bound: TypeId::of::<C>(),
            get: erase_count(self.name, name, get),
        });
        self
    }

    /// Declares a boolean method named `contains` taking one element-typed
    /// parameter. The parameter shape (value vs. nullable) is derived from
    /// the element type.
    pub fn with_contains<C: Enumerable, E: Elem>(mut self, contains: fn(&C, &E) -> bool) -> Self {
        let type_name = self.name;
        let param = if E::NULLABLE {
            ParamKind::Nullable {
                wrapper: TypeId::of::<E>(),
                inner: E::inner_id(),
            }
        } else {
            ParamKind::Value(TypeId::of::<E>())
        };
        self.methods.push(MethodDescription {
            name: "contains",
            bound: TypeId::of::<C>(),
            param,
            invoke: erase_contains(type_name, contains),
            invoke_wrapped: E::NULLABLE.then(|| erase_contains_wrapped(type_name, contains)),
            invoke_null: E::NULLABLE.then(|| erase_contains_null(type_name, contains)),
        });
        self
    }

    /// Declares that members of `base` are also members of this type,
    /// reachable through `project`. The contains locator walks this chain
    /// most-derived-first.
    pub fn inherits<C: Enumerable, B: Enumerable>(
        mut self,
        base: TypeDescription,
        project: fn(&C) -> &B,
    ) -> Self {
        self.base = Some(BaseDescription {
            description: Box::new(base),
            project: erase_projection(self.name, project),
        });
        self
    }
}

fn erase_count<C: Enumerable>(
    type_name: &'static str,
    member: &'static str,
    get: fn(&C) -> usize,
) -> CountGetter {
    Arc::new(move |value| match value.as_any().downcast_ref::<C>() {
        Some(receiver) => Ok(get(receiver)),
        None => Err(SynthesisError::ForeignReceiver { type_name, member }),
    })
}

fn erase_contains<C: Enumerable, E: Elem>(
    type_name: &'static str,
    contains: fn(&C, &E) -> bool,
) -> ItemInvoker {
    Arc::new(move |value, item| {
        let receiver = value
            .as_any()
            .downcast_ref::<C>()
            .ok_or(SynthesisError::ForeignReceiver {
                type_name,
                member: "contains",
            })?;
        let item = item
            .downcast_ref::<E>()
            .ok_or(SynthesisError::ForeignItem {
                type_name,
                member: "contains",
            })?;
        Ok(contains(receiver, item))
    })
}

fn erase_contains_wrapped<C: Enumerable, E: Elem>(
    type_name: &'static str,
    contains: fn(&C, &E) -> bool,
) -> ItemInvoker {
    Arc::new(move |value, item| {
        let receiver = value
            .as_any()
            .downcast_ref::<C>()
            .ok_or(SynthesisError::ForeignReceiver {
                type_name,
                member: "contains",
            })?;
        match E::from_inner(item) {
            Some(wrapped) => Ok(contains(receiver, &wrapped)),
            None => Err(SynthesisError::ForeignItem {
                type_name,
                member: "contains",
            }),
        }
    })
}

fn erase_contains_null<C: Enumerable, E: Elem>(
    type_name: &'static str,
    contains: fn(&C, &E) -> bool,
) -> NullInvoker {
    Arc::new(move |value| {
        let receiver = value
            .as_any()
            .downcast_ref::<C>()
            .ok_or(SynthesisError::ForeignReceiver {
                type_name,
                member: "contains",
            })?;
        match E::null_value() {
            Some(null) => Ok(contains(receiver, &null)),
            None => Err(SynthesisError::NoNullForm {
                type_name,
                member: "contains",
            }),
        }
    })
}

fn erase_projection<C: Enumerable, B: Enumerable>(
    type_name: &'static str,
    project: fn(&C) -> &B,
) -> Projection {
    fn apply<'a, C: Enumerable, B: Enumerable>(
        project: fn(&C) -> &B,
        type_name: &'static str,
        value: &'a dyn Enumerable,
    ) -> Result<&'a dyn Enumerable, SynthesisError> {
        match value.as_any().downcast_ref::<C>() {
            Some(receiver) => Ok(project(receiver) as &dyn Enumerable),
            None => Err(SynthesisError::ForeignReceiver {
                type_name,
                member: "inherits",
            }),
        }
    }
    Arc::new(move |value| apply(project, type_name, value))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn contains_param_shape_follows_element_nullability() {
        let plain = TypeDescription::of::<Vec<i32>>("Vec")
            .with_contains(|v: &Vec<i32>, item: &i32| v.as_slice().contains(item));
        assert_eq!(
            plain.methods[0].param,
            ParamKind::Value(TypeId::of::<i32>())
        );
        assert!(plain.methods[0].invoke_null.is_none());

        let nullable = TypeDescription::of::<Vec<Option<i32>>>("Vec")
            .with_contains(|v: &Vec<Option<i32>>, item: &Option<i32>| v.as_slice().contains(item));
        assert_eq!(
            nullable.methods[0].param,
            ParamKind::Nullable {
                wrapper: TypeId::of::<Option<i32>>(),
                inner: TypeId::of::<i32>(),
            }
        );
        assert!(nullable.methods[0].invoke_null.is_some());
        assert!(nullable.methods[0].invoke_wrapped.is_some());
    }

    #[test]
    fn erased_invokers_reject_foreign_receivers() {
        let description =
            TypeDescription::of::<Vec<i32>>("Vec").with_len(|v: &Vec<i32>| v.len());
        let other: Vec<String> = vec!["a".into()];
        let result = (*description.properties[0].get)(&other);
        assert_eq!(
            result,
            Err(SynthesisError::ForeignReceiver {
                type_name: "Vec",
                member: "len",
            })
        );
    }

    #[test]
    fn erased_invokers_answer_on_the_right_receiver() {
        let description = TypeDescription::of::<Vec<i32>>("Vec")
            .with_len(|v: &Vec<i32>| v.len())
            .with_contains(|v: &Vec<i32>, item: &i32| v.as_slice().contains(item));
        let value = vec![1, 2, 3];
        assert_eq!((*description.properties[0].get)(&value), Ok(3));
        assert_eq!(
            (*description.methods[0].invoke)(&value, &2i32 as &dyn Any),
            Ok(true)
        );
        assert_eq!(
            (*description.methods[0].invoke)(&value, &9i32 as &dyn Any),
            Ok(false)
        );
    }
}
