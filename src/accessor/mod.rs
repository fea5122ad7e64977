//! Synthesized accessors: the once-per-type product of member location.
//!
//! Each accessor wraps a tagged strategy (a bound native member, an
//! enumeration fallback, or a redirect to the cross-type cache) so call
//! sites never branch on how a type answers a query. Accessors are immutable
//! and `Send + Sync`; the caches hand out `Arc`s of them forever.
use crate::{
    element::Elem,
    enumerable::Enumerable,
    error::SynthesisError,
    types::{CountGetter, ItemInvoker, NullInvoker, Projection},
};
use enum_dispatch::enum_dispatch;
use std::any::{Any, TypeId};

pub(crate) mod enumerate;
pub(crate) mod synth;

pub(crate) type EqFn = fn(&dyn Any, &dyn Any) -> bool;

/// Equality of two erased values of the item type `I`. Anything that is not
/// an `I` compares unequal.
pub(crate) fn default_eq<I: Elem>(a: &dyn Any, b: &dyn Any) -> bool {
    match (a.downcast_ref::<I>(), b.downcast_ref::<I>()) {
        (Some(a), Some(b)) => a == b,
        _ => false,
    }
}

/// An item to test containment of: its erased value, the item type the
/// comparison is generic over, and that type's default equality.
pub(crate) struct ItemProbe<'a> {
    pub(crate) id: TypeId,
    pub(crate) value: &'a dyn Any,
    pub(crate) eq: EqFn,
}

impl<'a> ItemProbe<'a> {
    pub(crate) fn of<I: Elem>(item: &'a I) -> Self {
        Self {
            id: TypeId::of::<I>(),
            value: item,
            eq: default_eq::<I>,
        }
    }
}

#[enum_dispatch]
pub(crate) trait CountStrategy {
    fn count(&self, value: &dyn Enumerable, max: usize) -> Result<usize, SynthesisError>;
}

#[enum_dispatch(CountStrategy)]
pub(crate) enum CountOp {
    Native(NativeCount),
    Enumerated(EnumeratedCount),
    Deferred(DeferredCount),
}

/// A bound size property. The enumerator is never touched; the result is
/// clamped to the caller's threshold.
pub(crate) struct NativeCount {
    pub(crate) get: CountGetter,
}

impl CountStrategy for NativeCount {
    fn count(&self, value: &dyn Enumerable, max: usize) -> Result<usize, SynthesisError> {
        Ok((*self.get)(value)?.min(max))
    }
}

pub(crate) struct EnumeratedCount;

impl CountStrategy for EnumeratedCount {
    fn count(&self, value: &dyn Enumerable, max: usize) -> Result<usize, SynthesisError> {
        Ok(enumerate::count_up_to(value, max))
    }
}

pub(crate) struct DeferredCount;

impl CountStrategy for DeferredCount {
    fn count(&self, value: &dyn Enumerable, max: usize) -> Result<usize, SynthesisError> {
        crate::cache::dynamic::count(value, max)
    }
}

#[enum_dispatch]
pub(crate) trait NullStrategy {
    fn contains_null(&self, value: &dyn Enumerable) -> Result<bool, SynthesisError>;
}

#[enum_dispatch(NullStrategy)]
pub(crate) enum NullOp {
    Native(NativeNull),
    Impossible(ImpossibleNull),
    Enumerated(EnumeratedNull),
    Deferred(DeferredNull),
}

pub(crate) struct NativeNull {
    pub(crate) probe: NullInvoker,
}

impl NullStrategy for NativeNull {
    fn contains_null(&self, value: &dyn Enumerable) -> Result<bool, SynthesisError> {
        (*self.probe)(value)
    }
}

/// The element type cannot hold null, so the answer is constant.
pub(crate) struct ImpossibleNull;

impl NullStrategy for ImpossibleNull {
    fn contains_null(&self, _value: &dyn Enumerable) -> Result<bool, SynthesisError> {
        Ok(false)
    }
}

pub(crate) struct EnumeratedNull;

impl NullStrategy for EnumeratedNull {
    fn contains_null(&self, value: &dyn Enumerable) -> Result<bool, SynthesisError> {
        Ok(enumerate::scan_for_null(value))
    }
}

pub(crate) struct DeferredNull;

impl NullStrategy for DeferredNull {
    fn contains_null(&self, value: &dyn Enumerable) -> Result<bool, SynthesisError> {
        crate::cache::dynamic::contains_null(value)
    }
}

#[enum_dispatch]
pub(crate) trait ContainsStrategy {
    fn contains(&self, value: &dyn Enumerable, item: &ItemProbe<'_>)
        -> Result<bool, SynthesisError>;
}

#[enum_dispatch(ContainsStrategy)]
pub(crate) enum ContainsOp {
    Native(NativeContains),
    Enumerated(EnumeratedContains),
    Deferred(DeferredContains),
}

/// A bound `contains` member, possibly reached through base projections.
pub(crate) struct NativeContains {
    pub(crate) invoke: ItemInvoker,
    pub(crate) projections: Vec<Projection>,
}

impl ContainsStrategy for NativeContains {
    fn contains(
        &self,
        value: &dyn Enumerable,
        item: &ItemProbe<'_>,
    ) -> Result<bool, SynthesisError> {
        let mut receiver = value;
        for project in &self.projections {
            receiver = (**project)(receiver)?;
        }
        (*self.invoke)(receiver, item.value)
    }
}

pub(crate) struct EnumeratedContains;

impl ContainsStrategy for EnumeratedContains {
    fn contains(
        &self,
        value: &dyn Enumerable,
        item: &ItemProbe<'_>,
    ) -> Result<bool, SynthesisError> {
        Ok(enumerate::scan_for_item(value, item.value, &item.eq))
    }
}

pub(crate) struct DeferredContains;

impl ContainsStrategy for DeferredContains {
    fn contains(
        &self,
        value: &dyn Enumerable,
        item: &ItemProbe<'_>,
    ) -> Result<bool, SynthesisError> {
        crate::cache::dynamic::contains(value, item)
    }
}

/// The per-declared-type count accessor. `expected` is the runtime type the
/// strategy's member bindings assume; a value of any other runtime type is
/// redirected to the cross-type cache.
pub(crate) struct CountAccessor {
    expected: Option<TypeId>,
    op: CountOp,
}

impl CountAccessor {
    pub(crate) fn new(expected: TypeId, op: CountOp) -> Self {
        Self {
            expected: Some(expected),
            op,
        }
    }

    pub(crate) fn deferred() -> Self {
        Self {
            expected: None,
            op: CountOp::Deferred(DeferredCount),
        }
    }

    pub(crate) fn count(&self, value: &dyn Enumerable, max: usize) -> Result<usize, SynthesisError> {
        if let Some(expected) = self.expected {
            if value.as_any().type_id() != expected {
                return crate::cache::dynamic::count(value, max);
            }
        }
        self.op.count(value, max)
    }
}

pub(crate) struct NullAccessor {
    expected: Option<TypeId>,
    op: NullOp,
}

impl NullAccessor {
    pub(crate) fn new(expected: TypeId, op: NullOp) -> Self {
        Self {
            expected: Some(expected),
            op,
        }
    }

    pub(crate) fn deferred() -> Self {
        Self {
            expected: None,
            op: NullOp::Deferred(DeferredNull),
        }
    }

    pub(crate) fn contains_null(&self, value: &dyn Enumerable) -> Result<bool, SynthesisError> {
        if let Some(expected) = self.expected {
            if value.as_any().type_id() != expected {
                return crate::cache::dynamic::contains_null(value);
            }
        }
        self.op.contains_null(value)
    }
}

pub(crate) struct ContainsAccessor {
    expected: Option<TypeId>,
    op: ContainsOp,
}

impl ContainsAccessor {
    pub(crate) fn new(expected: TypeId, op: ContainsOp) -> Self {
        Self {
            expected: Some(expected),
            op,
        }
    }

    pub(crate) fn deferred() -> Self {
        Self {
            expected: None,
            op: ContainsOp::Deferred(DeferredContains),
        }
    }

    pub(crate) fn contains(
        &self,
        value: &dyn Enumerable,
        item: &ItemProbe<'_>,
    ) -> Result<bool, SynthesisError> {
        if let Some(expected) = self.expected {
            if value.as_any().type_id() != expected {
                return crate::cache::dynamic::contains(value, item);
            }
        }
        self.op.contains(value, item)
    }
}
