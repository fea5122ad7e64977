//! Shared enumeration fallbacks for types with no usable native member.
//!
//! Every scan owns its `Elements` iterator for exactly the scope of the
//! walk, so the enumerator is released on completion, on an early stop, and
//! when a panic unwinds through it.
use crate::enumerable::Enumerable;
use std::any::Any;

/// Counts elements, stopping as soon as `max` are seen. A zero threshold is
/// answered before the enumerator is even constructed.
pub(crate) fn count_up_to(value: &dyn Enumerable, max: usize) -> usize {
    if max == 0 {
        return 0;
    }
    let mut seen = 0;
    let mut elements = value.elements();
    while elements.next().is_some() {
        seen += 1;
        if seen == max {
            break;
        }
    }
    seen
}

pub(crate) fn scan_for_null(value: &dyn Enumerable) -> bool {
    value.elements().any(|element| element.is_null())
}

/// Element-wise containment. Each element is compared through its payload
/// first and its raw form second, so an item typed as the inner value and an
/// item typed as the nullable wrapper both match; elements of a foreign type
/// simply compare unequal.
pub(crate) fn scan_for_item(
    value: &dyn Enumerable,
    item: &dyn Any,
    eq: &dyn Fn(&dyn Any, &dyn Any) -> bool,
) -> bool {
    value.elements().any(|element| {
        if let Some(payload) = element.payload() {
            if eq(payload, item) {
                return true;
            }
        }
        eq(element.raw(), item)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::accessor::default_eq;

    #[test]
    fn zero_threshold_counts_nothing() {
        let v = vec![1i32, 2, 3];
        assert_eq!(count_up_to(&v, 0), 0);
    }

    #[test]
    fn counting_stops_at_the_threshold() {
        let v = vec![1i32, 2, 3, 4, 5];
        assert_eq!(count_up_to(&v, 3), 3);
        assert_eq!(count_up_to(&v, 5), 5);
        assert_eq!(count_up_to(&v, 9), 5);
    }

    #[test]
    fn null_scan_finds_the_first_none() {
        let with_null = vec![Some(1), None, Some(3)];
        assert!(scan_for_null(&with_null));
        let without: Vec<Option<i32>> = vec![Some(1), Some(2)];
        assert!(!scan_for_null(&without));
    }

    #[test]
    fn item_scan_compares_payload_and_raw() {
        let v = vec![Some(1), None, Some(3)];
        // an inner-typed item matches through the payload
        assert!(scan_for_item(&v, &3i32, &default_eq::<i32>));
        // a wrapper-typed item matches the raw element, None included
        assert!(scan_for_item(
            &v,
            &None::<i32>,
            &default_eq::<Option<i32>>
        ));
        assert!(!scan_for_item(&v, &7i32, &default_eq::<i32>));
        // a foreign item type never matches
        assert!(!scan_for_item(&v, &"3", &default_eq::<&'static str>));
    }
}
