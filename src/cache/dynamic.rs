//! The cross-type accessor cache.
//!
//! Values reach this cache when their declared type could not pin down the
//! runtime type: declared as `Box<dyn Enumerable>`, or declared as a
//! concrete type whose accessor found a different runtime type behind
//! `as_any`. Strategies are keyed by the true runtime `TypeId` (plus the
//! item type for containment) and synthesized from the value's own runtime
//! description.
//!
//! Lock protocol: the hit path takes a shared read lock, so any number of
//! concurrent hits proceed without mutual exclusion. A miss re-checks under
//! an upgradable read lock (it admits readers but excludes other upgraders),
//! synthesizes while holding it, then upgrades to write just long enough to
//! insert. At most one thread ever synthesizes a given key;
//! losers of the race block briefly and then observe the winner's entry. A
//! synthesis error inserts nothing, so the next call retries.
use crate::{
    accessor::{synth, ContainsOp, ContainsStrategy, CountOp, CountStrategy, ItemProbe, NullOp,
        NullStrategy},
    enumerable::Enumerable,
    error::SynthesisError,
    types::{DescribedId, TypeDescription},
};
use parking_lot::{RwLock, RwLockUpgradableReadGuard};
use std::{
    any::TypeId,
    collections::HashMap,
    hash::Hash,
    sync::{Arc, LazyLock},
};

static COUNT: LazyLock<RwLock<HashMap<TypeId, Arc<CountOp>>>> =
    LazyLock::new(|| RwLock::new(HashMap::new()));
static NULL: LazyLock<RwLock<HashMap<TypeId, Arc<NullOp>>>> =
    LazyLock::new(|| RwLock::new(HashMap::new()));
static CONTAINS: LazyLock<RwLock<HashMap<(TypeId, TypeId), Arc<ContainsOp>>>> =
    LazyLock::new(|| RwLock::new(HashMap::new()));

/// The value's runtime description, checked against the value itself before
/// any member of it is trusted.
fn runtime_description(value: &dyn Enumerable) -> Result<TypeDescription, SynthesisError> {
    let description = value.runtime_describe();
    match description.id() {
        DescribedId::Concrete(id) if id == value.as_any().type_id() => Ok(description),
        DescribedId::Concrete(_) => Err(SynthesisError::ForeignDescription {
            type_name: description.name(),
        }),
        DescribedId::Opaque => Err(SynthesisError::OpaqueRuntimeType {
            type_name: description.name(),
        }),
    }
}

fn lookup_or_synthesize<K, O>(
    map: &RwLock<HashMap<K, Arc<O>>>,
    key: K,
    value: &dyn Enumerable,
    synthesize: impl FnOnce(&TypeDescription) -> Result<O, SynthesisError>,
) -> Result<Arc<O>, SynthesisError>
where
    K: Copy + Eq + Hash,
{
    if let Some(op) = map.read().get(&key) {
        return Ok(op.clone());
    }
    let guard = map.upgradable_read();
    if let Some(op) = guard.get(&key) {
        return Ok(op.clone());
    }
    let description = runtime_description(value)?;
    let op = Arc::new(synthesize(&description)?);
    let mut entries = RwLockUpgradableReadGuard::upgrade(guard);
    Ok(entries.entry(key).or_insert(op).clone())
}

pub(crate) fn count(value: &dyn Enumerable, max: usize) -> Result<usize, SynthesisError> {
    let key = value.as_any().type_id();
    let op = lookup_or_synthesize(&COUNT, key, value, synth::count_op)?;
    op.count(value, max)
}

pub(crate) fn contains_null(value: &dyn Enumerable) -> Result<bool, SynthesisError> {
    let key = value.as_any().type_id();
    let op = lookup_or_synthesize(&NULL, key, value, synth::null_op)?;
    op.contains_null(value)
}

pub(crate) fn contains(
    value: &dyn Enumerable,
    item: &ItemProbe<'_>,
) -> Result<bool, SynthesisError> {
    let key = (value.as_any().type_id(), item.id);
    let op = lookup_or_synthesize(&CONTAINS, key, value, |description| {
        synth::contains_op(description, item.id)
    })?;
    op.contains(value, item)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn erased_values_are_counted_through_their_runtime_type() {
        let erased: Box<dyn Enumerable> = Box::new(vec![10i64, 20, 30]);
        assert_eq!(count(&*erased, usize::MAX), Ok(3));
        assert_eq!(count(&*erased, 2), Ok(2));
    }

    #[test]
    fn strategies_are_reused_per_runtime_type() {
        let a: Box<dyn Enumerable> = Box::new(vec![1u8]);
        let b: Box<dyn Enumerable> = Box::new(vec![2u8, 3]);
        count(&*a, 1).unwrap();
        count(&*b, 1).unwrap();
        let key = a.as_any().type_id();
        assert_eq!(b.as_any().type_id(), key);
        assert!(COUNT.read().contains_key(&key));
    }
}
