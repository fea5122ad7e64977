//! The capability an element type needs before a collection of it can be
//! guarded: identity as `&dyn Any`, equality, and nullability metadata.
//!
//! "Null" is `Option`: an element of type `Option<T>` that is `None` is a
//! null element, and a collection whose element type is not an `Option`
//! cannot contain null by construction. The locator exploits that to answer
//! null-containment questions without enumerating (see `types::locate`).
use std::any::{Any, TypeId};

pub trait Elem: Any + Clone + PartialEq {
    /// Whether values of this type can be null at all.
    const NULLABLE: bool = false;

    /// The null value of this type, if it has one (`Some(None)` for
    /// `Option<T>`).
    fn null_value() -> Option<Self> {
        None
    }

    /// For nullable wrappers, the type of the wrapped value; otherwise the
    /// type itself.
    fn inner_id() -> TypeId {
        TypeId::of::<Self>()
    }

    /// Lift an inner-typed item into this type, cloning it. Only nullable
    /// wrappers can do this; everything else answers `None`.
    fn from_inner(_item: &dyn Any) -> Option<Self> {
        None
    }

    /// The innermost non-null value, or `None` when this element is null.
    fn payload(&self) -> Option<&dyn Any> {
        Some(self as &dyn Any)
    }

    /// The element exactly as stored, nullable wrapper and all.
    fn as_raw(&self) -> &dyn Any {
        self as &dyn Any
    }

    /// Whether this particular element is null. Checks the outermost level
    /// only; `payload` is the recursive view.
    fn is_null(&self) -> bool {
        false
    }
}

impl<T: Elem> Elem for Option<T> {
    const NULLABLE: bool = true;

    fn null_value() -> Option<Self> {
        Some(None)
    }

    fn inner_id() -> TypeId {
        TypeId::of::<T>()
    }

    fn from_inner(item: &dyn Any) -> Option<Self> {
        item.downcast_ref::<T>().cloned().map(Some)
    }

    fn payload(&self) -> Option<&dyn Any> {
        self.as_ref().and_then(|value| value.payload())
    }

    fn is_null(&self) -> bool {
        self.is_none()
    }
}

/// Registers element types that carry no nullability of their own.
/// Downstream crates use this for their own element types; the requirements
/// are `Clone + PartialEq + 'static`.
#[macro_export]
macro_rules! impl_elem {
    ($($t:ty),* $(,)?) => {
        $(
            impl $crate::element::Elem for $t {}
        )*
    };
}

impl_elem!(
    i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize, f32, f64, bool, char, String,
    &'static str
);

/// An erased view of one element, as yielded by enumeration.
#[derive(Clone, Copy)]
pub struct ElementRef<'a> {
    raw: &'a dyn Any,
    payload: Option<&'a dyn Any>,
    null: bool,
}

impl<'a> ElementRef<'a> {
    pub fn of<E: Elem>(element: &'a E) -> Self {
        Self {
            raw: element.as_raw(),
            payload: element.payload(),
            null: element.is_null(),
        }
    }

    /// The element exactly as stored in the collection.
    pub fn raw(&self) -> &'a dyn Any {
        self.raw
    }

    /// The innermost non-null value, if any.
    pub fn payload(&self) -> Option<&'a dyn Any> {
        self.payload
    }

    pub fn is_null(&self) -> bool {
        self.null
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn primitives_are_not_nullable() {
        assert!(!i32::NULLABLE);
        assert!(i32::null_value().is_none());
        assert!(!3i32.is_null());
        assert_eq!(i32::inner_id(), TypeId::of::<i32>());
    }

    #[test]
    fn options_are_nullable() {
        assert!(<Option<i32>>::NULLABLE);
        assert_eq!(<Option<i32>>::null_value(), Some(None));
        assert_eq!(<Option<i32>>::inner_id(), TypeId::of::<i32>());
        assert!(None::<i32>.is_null());
        assert!(!Some(3).is_null());
    }

    #[test]
    fn payload_unwraps_nested_options() {
        let nested: Option<Option<i32>> = Some(Some(7));
        let payload = nested.payload().unwrap();
        assert_eq!(payload.downcast_ref::<i32>(), Some(&7));
        assert!(Some(None::<i32>).payload().is_none());
    }

    #[test]
    fn from_inner_wraps_and_clones() {
        let wrapped = <Option<String>>::from_inner(&"abc".to_string() as &dyn Any);
        assert_eq!(wrapped, Some(Some("abc".to_string())));
        assert!(<Option<String>>::from_inner(&3i32 as &dyn Any).is_none());
        assert!(String::from_inner(&"abc".to_string() as &dyn Any).is_none());
    }

    #[test]
    fn element_ref_views() {
        let e = ElementRef::of(&5i32);
        assert!(!e.is_null());
        assert_eq!(e.raw().downcast_ref::<i32>(), Some(&5));
        assert_eq!(e.payload().unwrap().downcast_ref::<i32>(), Some(&5));

        let n = None::<i32>;
        let e = ElementRef::of(&n);
        assert!(e.is_null());
        assert!(e.payload().is_none());
        assert!(e.raw().downcast_ref::<Option<i32>>().unwrap().is_none());
    }
}
