//! Concurrent first use of previously-unseen collection types: the
//! cross-type cache must synthesize each key exactly once, never deadlock,
//! and hand every thread an accessor that answers correctly.
use guard_rs::{guard, Elements, Enumerable, TypeDescription};
use std::{
    any::Any,
    sync::{
        atomic::{AtomicUsize, Ordering},
        Barrier,
    },
    thread,
};

struct SharedBag {
    items: Vec<i32>,
}

static SHARED_BAG_DESCRIBED: AtomicUsize = AtomicUsize::new(0);

impl Enumerable for SharedBag {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn elements(&self) -> Elements<'_> {
        Elements::over(self.items.iter())
    }

    fn describe() -> TypeDescription {
        SHARED_BAG_DESCRIBED.fetch_add(1, Ordering::SeqCst);
        TypeDescription::of::<Self>("SharedBag").with_len(|b: &Self| b.items.len())
    }

    fn runtime_describe(&self) -> TypeDescription {
        Self::describe()
    }
}

#[test]
fn erased_first_use_synthesizes_exactly_once() {
    const THREADS: usize = 16;
    let barrier = Barrier::new(THREADS);
    thread::scope(|scope| {
        for worker in 0..THREADS {
            let barrier = &barrier;
            scope.spawn(move || {
                let bag = SharedBag {
                    items: (0..=worker as i32).collect(),
                };
                // the declared type erases the bag, so every thread goes
                // through the cross-type cache for the same unseen key
                let erased: Box<dyn Enumerable> = Box::new(bag);
                barrier.wait();
                for _ in 0..50 {
                    assert!(guard(&erased).not_empty().is_ok());
                    assert!(guard(&erased).min_count(worker + 1).is_ok());
                    assert!(guard(&erased).min_count(worker + 2).is_err());
                }
            });
        }
    });
    // one miss won the upgradable lock; everyone else observed its entry
    assert_eq!(SHARED_BAG_DESCRIBED.load(Ordering::SeqCst), 1);
}

#[test]
fn concurrent_hits_share_the_declared_cache() {
    const THREADS: usize = 12;
    let barrier = Barrier::new(THREADS);
    thread::scope(|scope| {
        for worker in 0..THREADS {
            let barrier = &barrier;
            scope.spawn(move || {
                let values: Vec<usize> = (0..worker + 1).collect();
                barrier.wait();
                for _ in 0..100 {
                    assert!(guard(&values).count_in_range(1, THREADS).is_ok());
                    assert!(guard(&values).contains(&worker).is_ok());
                    assert!(guard(&values).does_not_contain(&(worker + 1)).is_ok());
                    assert!(guard(&values).does_not_contain_null().is_ok());
                }
            });
        }
    });
}
