//! Bounded-counting properties: threshold checks agree with the true length
//! and never advance an enumerator further than the threshold requires.
use guard_rs::{guard, ElementRef, Elements, Enumerable, TypeDescription};
use proptest::prelude::*;
use std::{
    any::Any,
    sync::atomic::{AtomicUsize, Ordering},
};

struct CountingIter<'a> {
    inner: std::slice::Iter<'a, i32>,
    advanced: &'a AtomicUsize,
}

impl<'a> Iterator for CountingIter<'a> {
    type Item = ElementRef<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        self.advanced.fetch_add(1, Ordering::SeqCst);
        self.inner.next().map(ElementRef::of)
    }
}

/// No native members; every count walks the enumerator.
struct LazySeq {
    items: Vec<i32>,
    advanced: AtomicUsize,
}

impl LazySeq {
    fn new(items: Vec<i32>) -> Self {
        Self {
            items,
            advanced: AtomicUsize::new(0),
        }
    }
}

impl Enumerable for LazySeq {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn elements(&self) -> Elements<'_> {
        Elements::new(CountingIter {
            inner: self.items.iter(),
            advanced: &self.advanced,
        })
    }

    fn describe() -> TypeDescription {
        TypeDescription::of::<Self>("LazySeq")
    }

    fn runtime_describe(&self) -> TypeDescription {
        Self::describe()
    }
}

proptest! {
    #[test]
    fn min_count_agrees_with_len_and_stops_early(
        items in prop::collection::vec(any::<i32>(), 0..40),
        min in 0usize..50,
    ) {
        let seq = LazySeq::new(items.clone());
        prop_assert_eq!(guard(&seq).min_count(min).is_ok(), items.len() >= min);
        let expected = if min == 0 {
            0
        } else if items.len() >= min {
            min
        } else {
            items.len() + 1
        };
        prop_assert_eq!(seq.advanced.load(Ordering::SeqCst), expected);
    }

    #[test]
    fn max_count_examines_at_most_one_past_the_threshold(
        items in prop::collection::vec(any::<i32>(), 0..40),
        max in 0usize..50,
    ) {
        let seq = LazySeq::new(items.clone());
        prop_assert_eq!(guard(&seq).max_count(max).is_ok(), items.len() <= max);
        let probe = max + 1;
        let expected = if items.len() >= probe {
            probe
        } else {
            items.len() + 1
        };
        prop_assert_eq!(seq.advanced.load(Ordering::SeqCst), expected);
    }

    #[test]
    fn native_counting_agrees_with_the_true_length(
        items in prop::collection::vec(any::<i32>(), 0..40),
    ) {
        for threshold in 0..items.len() + 2 {
            prop_assert_eq!(guard(&items).min_count(threshold).is_ok(), items.len() >= threshold);
            prop_assert_eq!(guard(&items).max_count(threshold).is_ok(), items.len() <= threshold);
        }
    }
}
