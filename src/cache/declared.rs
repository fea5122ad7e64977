//! The per-declared-type accessor cache.
//!
//! Rust has no per-generic statics, so "one lazily-initialized holder per
//! declared type" is a process-wide append-only map keyed by the declared
//! `TypeId`. Reads never lock. A first-use miss synthesizes from the
//! declared type's own description and publishes by RCU; when two threads
//! race the same first use, both may synthesize but only the first
//! publication is kept, and every caller from then on observes that one
//! accessor.
use crate::{
    accessor::{synth, ContainsAccessor, CountAccessor, NullAccessor},
    enumerable::Enumerable,
    error::SynthesisError,
    types::DescribedId,
};
use arc_swap::ArcSwap;
use std::{
    any::TypeId,
    collections::HashMap,
    hash::Hash,
    sync::{Arc, LazyLock},
};

struct DeclaredMap<K, A> {
    entries: ArcSwap<HashMap<K, Arc<A>>>,
}

impl<K: Copy + Eq + Hash, A> DeclaredMap<K, A> {
    fn new() -> Self {
        Self {
            entries: ArcSwap::from_pointee(HashMap::new()),
        }
    }

    fn get(&self, key: K) -> Option<Arc<A>> {
        self.entries.load().get(&key).cloned()
    }

    /// Publishes an accessor unless one is already present; either way the
    /// accessor every caller agrees on is returned.
    fn publish(&self, key: K, accessor: Arc<A>) -> Arc<A> {
        self.entries.rcu(|current| {
            let mut next = HashMap::clone(current.as_ref());
            next.entry(key).or_insert_with(|| accessor.clone());
            next
        });
        self.entries
            .load()
            .get(&key)
            .cloned()
            .unwrap_or(accessor)
    }
}

static COUNT: LazyLock<DeclaredMap<TypeId, CountAccessor>> = LazyLock::new(DeclaredMap::new);
static NULL: LazyLock<DeclaredMap<TypeId, NullAccessor>> = LazyLock::new(DeclaredMap::new);
static CONTAINS: LazyLock<DeclaredMap<(TypeId, TypeId), ContainsAccessor>> =
    LazyLock::new(DeclaredMap::new);

pub(crate) fn count_accessor<C: Enumerable>() -> Result<Arc<CountAccessor>, SynthesisError> {
    let key = TypeId::of::<C>();
    if let Some(accessor) = COUNT.get(key) {
        return Ok(accessor);
    }
    let description = C::describe();
    let accessor = match description.id() {
        DescribedId::Opaque => CountAccessor::deferred(),
        DescribedId::Concrete(id) => CountAccessor::new(id, synth::count_op(&description)?),
    };
    Ok(COUNT.publish(key, Arc::new(accessor)))
}

pub(crate) fn null_accessor<C: Enumerable>() -> Result<Arc<NullAccessor>, SynthesisError> {
    let key = TypeId::of::<C>();
    if let Some(accessor) = NULL.get(key) {
        return Ok(accessor);
    }
    let description = C::describe();
    let accessor = match description.id() {
        DescribedId::Opaque => NullAccessor::deferred(),
        DescribedId::Concrete(id) => NullAccessor::new(id, synth::null_op(&description)?),
    };
    Ok(NULL.publish(key, Arc::new(accessor)))
}

pub(crate) fn contains_accessor<C: Enumerable>(
    item: TypeId,
) -> Result<Arc<ContainsAccessor>, SynthesisError> {
    let key = (TypeId::of::<C>(), item);
    if let Some(accessor) = CONTAINS.get(key) {
        return Ok(accessor);
    }
    let description = C::describe();
    let accessor = match description.id() {
        DescribedId::Opaque => ContainsAccessor::deferred(),
        DescribedId::Concrete(id) => {
            ContainsAccessor::new(id, synth::contains_op(&description, item)?)
        }
    };
    Ok(CONTAINS.publish(key, Arc::new(accessor)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repeated_lookups_share_one_accessor() {
        let first = count_accessor::<Vec<u16>>().unwrap();
        let second = count_accessor::<Vec<u16>>().unwrap();
        assert!(Arc::ptr_eq(&first, &second));
    }

    #[test]
    fn distinct_declared_types_get_distinct_accessors() {
        let vec = count_accessor::<Vec<u64>>().unwrap();
        let deque = count_accessor::<std::collections::VecDeque<u64>>().unwrap();
        assert!(!Arc::ptr_eq(&vec, &deque));
    }
}
