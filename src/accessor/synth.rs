//! One-time construction of an operation strategy from a member description.
//!
//! Synthesis is pure: it reads the description, binds invokers, and builds a
//! strategy value. Nothing is cached here, so a synthesis error leaves the
//! process exactly as it was and a later call can retry.
use super::{
    ContainsOp, CountOp, EnumeratedContains, EnumeratedCount, EnumeratedNull, ImpossibleNull,
    NativeContains, NativeCount, NativeNull, NullOp,
};
use crate::{
    error::SynthesisError,
    types::{
        locate::{self, NullLocation},
        TypeDescription,
    },
};
use std::any::TypeId;
use tracing::debug;

pub(crate) fn count_op(description: &TypeDescription) -> Result<CountOp, SynthesisError> {
    let op = match locate::locate_count(description)? {
        Some(get) => {
            debug!(collection = description.name(), "bound native size property");
            CountOp::from(NativeCount { get })
        }
        None => {
            debug!(
                collection = description.name(),
                "no native size property, counting by enumeration"
            );
            CountOp::from(EnumeratedCount)
        }
    };
    Ok(op)
}

pub(crate) fn null_op(description: &TypeDescription) -> Result<NullOp, SynthesisError> {
    let op = match locate::locate_null_probe(description)? {
        NullLocation::Native(probe) => {
            debug!(
                collection = description.name(),
                "bound nullable `contains` as null probe"
            );
            NullOp::from(NativeNull { probe })
        }
        NullLocation::Impossible => {
            debug!(
                collection = description.name(),
                "element type cannot hold null"
            );
            NullOp::from(ImpossibleNull)
        }
        NullLocation::NotFound => {
            debug!(
                collection = description.name(),
                "no usable `contains`, scanning for null by enumeration"
            );
            NullOp::from(EnumeratedNull)
        }
    };
    Ok(op)
}

pub(crate) fn contains_op(
    description: &TypeDescription,
    item: TypeId,
) -> Result<ContainsOp, SynthesisError> {
    let op = match locate::locate_contains(description, item)? {
        Some(located) => {
            debug!(collection = description.name(), "bound native `contains`");
            ContainsOp::from(NativeContains {
                invoke: located.invoke,
                projections: located.projections,
            })
        }
        None => {
            debug!(
                collection = description.name(),
                "no matching `contains`, scanning by enumeration"
            );
            ContainsOp::from(EnumeratedContains)
        }
    };
    Ok(op)
}
