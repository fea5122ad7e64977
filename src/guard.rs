//! Fluent precondition checks.
//!
//! Wrap a value with [`guard()`] (or [`guard_named()`] to get its name into
//! the error message) and chain checks; each returns `Result<Guard, GuardError>`
//! so call sites compose with `?`:
//!
//! ```
//! use guard_rs::{guard_named, GuardError};
//!
//! fn schedule(jobs: &Vec<String>) -> Result<(), GuardError> {
//!     guard_named("jobs", jobs)
//!         .not_empty()?
//!         .max_count(16)?
//!         .does_not_contain(&String::new())?;
//!     Ok(())
//! }
//!
//! assert!(schedule(&vec!["compact".into()]).is_ok());
//! assert!(schedule(&vec![]).is_err());
//! ```
//!
//! Collection checks ask the accessor caches bounded questions instead of
//! walking the whole collection: `not_empty` looks at one element,
//! `max_count(5)` at six, and a native size or membership member is used
//! whenever the runtime type has one.
use crate::{
    accessor::{enumerate, ItemProbe},
    cache::declared,
    element::Elem,
    enumerable::Enumerable,
    error::GuardError,
};
use std::{any::Any, fmt::Debug};

#[derive(Debug)]
pub struct Guard<'a, T: ?Sized> {
    value: &'a T,
    name: &'static str,
}

/// Starts a guard over `value`, reported as plain `value` on violation.
pub fn guard<T: ?Sized>(value: &T) -> Guard<'_, T> {
    Guard {
        value,
        name: "value",
    }
}

/// Starts a guard over `value`, reported under the given argument name.
pub fn guard_named<'a, T: ?Sized>(name: &'static str, value: &'a T) -> Guard<'a, T> {
    Guard { value, name }
}

impl<'a, T: ?Sized> Guard<'a, T> {
    pub fn named(mut self, name: &'static str) -> Self {
        self.name = name;
        self
    }

    /// The guarded value, for continuing with it after the checks.
    pub fn get(self) -> &'a T {
        self.value
    }

    fn violation(&self, message: impl Into<String>) -> GuardError {
        GuardError::Violation {
            argument: self.name,
            message: message.into(),
        }
    }

    pub fn equals(self, expected: &T) -> Result<Self, GuardError>
    where
        T: PartialEq + Debug,
    {
        if self.value == expected {
            Ok(self)
        } else {
            Err(self.violation(format!("must equal {expected:?}, found {:?}", self.value)))
        }
    }

    pub fn one_of(self, allowed: &[&T]) -> Result<Self, GuardError>
    where
        T: PartialEq + Debug,
    {
        if allowed.iter().any(|candidate| *candidate == self.value) {
            Ok(self)
        } else {
            Err(self.violation(format!("must be one of the allowed values, found {:?}", self.value)))
        }
    }

    pub fn at_least(self, min: &T) -> Result<Self, GuardError>
    where
        T: PartialOrd + Debug,
    {
        if self.value >= min {
            Ok(self)
        } else {
            Err(self.violation(format!("must be at least {min:?}, found {:?}", self.value)))
        }
    }

    pub fn at_most(self, max: &T) -> Result<Self, GuardError>
    where
        T: PartialOrd + Debug,
    {
        if self.value <= max {
            Ok(self)
        } else {
            Err(self.violation(format!("must be at most {max:?}, found {:?}", self.value)))
        }
    }

    pub fn in_range(self, min: &T, max: &T) -> Result<Self, GuardError>
    where
        T: PartialOrd + Debug,
    {
        if self.value >= min && self.value <= max {
            Ok(self)
        } else {
            Err(self.violation(format!(
                "must be between {min:?} and {max:?}, found {:?}",
                self.value
            )))
        }
    }

    pub fn not_blank(self) -> Result<Self, GuardError>
    where
        T: AsRef<str>,
    {
        if self.value.as_ref().trim().is_empty() {
            Err(self.violation("must not be blank"))
        } else {
            Ok(self)
        }
    }

    pub fn len_in_range(self, min: usize, max: usize) -> Result<Self, GuardError>
    where
        T: AsRef<str>,
    {
        let len = self.value.as_ref().chars().count();
        if len < min || len > max {
            Err(self.violation(format!(
                "must be between {min} and {max} characters, found {len}"
            )))
        } else {
            Ok(self)
        }
    }
}

impl<'a, C: Enumerable> Guard<'a, C> {
    fn count_up_to(&self, max: usize) -> Result<usize, GuardError> {
        Ok(declared::count_accessor::<C>()?.count(self.value, max)?)
    }

    pub fn empty(self) -> Result<Self, GuardError> {
        if self.count_up_to(1)? == 0 {
            Ok(self)
        } else {
            Err(self.violation("must be empty"))
        }
    }

    pub fn not_empty(self) -> Result<Self, GuardError> {
        if self.count_up_to(1)? == 0 {
            Err(self.violation("must not be empty"))
        } else {
            Ok(self)
        }
    }

    pub fn min_count(self, min: usize) -> Result<Self, GuardError> {
        let found = self.count_up_to(min)?;
        if found >= min {
            Ok(self)
        } else {
            Err(self.violation(format!(
                "must contain at least {min} elements, found {found}"
            )))
        }
    }

    pub fn max_count(self, max: usize) -> Result<Self, GuardError> {
        let found = self.count_up_to(max.saturating_add(1))?;
        if found <= max {
            Ok(self)
        } else {
            Err(self.violation(format!("must contain at most {max} elements")))
        }
    }

    pub fn count_in_range(self, min: usize, max: usize) -> Result<Self, GuardError> {
        let found = self.count_up_to(max.saturating_add(1))?;
        if found < min {
            Err(self.violation(format!(
                "must contain at least {min} elements, found {found}"
            )))
        } else if found > max {
            Err(self.violation(format!("must contain at most {max} elements")))
        } else {
            Ok(self)
        }
    }

    pub fn contains<I: Elem + Debug>(self, item: &I) -> Result<Self, GuardError> {
        if self.has_item(item)? {
            Ok(self)
        } else {
            Err(self.violation(format!("must contain {item:?}")))
        }
    }

    pub fn does_not_contain<I: Elem + Debug>(self, item: &I) -> Result<Self, GuardError> {
        if self.has_item(item)? {
            Err(self.violation(format!("must not contain {item:?}")))
        } else {
            Ok(self)
        }
    }

    fn has_item<I: Elem>(&self, item: &I) -> Result<bool, GuardError> {
        let probe = ItemProbe::of(item);
        let accessor = declared::contains_accessor::<C>(probe.id)?;
        Ok(accessor.contains(self.value, &probe)?)
    }

    /// Containment under a caller-supplied equality. The comparer always
    /// forces element-wise enumeration; a native `contains` could not honor
    /// it.
    pub fn contains_with<I, F>(self, item: &I, comparer: F) -> Result<Self, GuardError>
    where
        I: Elem + Debug,
        F: Fn(&I, &I) -> bool,
    {
        if self.scan_with(item, &comparer) {
            Ok(self)
        } else {
            Err(self.violation(format!("must contain a match for {item:?}")))
        }
    }

    pub fn does_not_contain_with<I, F>(self, item: &I, comparer: F) -> Result<Self, GuardError>
    where
        I: Elem + Debug,
        F: Fn(&I, &I) -> bool,
    {
        if self.scan_with(item, &comparer) {
            Err(self.violation(format!("must not contain a match for {item:?}")))
        } else {
            Ok(self)
        }
    }

    fn scan_with<I: Elem>(&self, item: &I, comparer: &dyn Fn(&I, &I) -> bool) -> bool {
        let eq = |a: &dyn Any, b: &dyn Any| match (a.downcast_ref::<I>(), b.downcast_ref::<I>()) {
            (Some(a), Some(b)) => comparer(a, b),
            _ => false,
        };
        enumerate::scan_for_item(self.value, item as &dyn Any, &eq)
    }

    pub fn contains_null(self) -> Result<Self, GuardError> {
        if declared::null_accessor::<C>()?.contains_null(self.value)? {
            Ok(self)
        } else {
            Err(self.violation("must contain a null element"))
        }
    }

    pub fn does_not_contain_null(self) -> Result<Self, GuardError> {
        if declared::null_accessor::<C>()?.contains_null(self.value)? {
            Err(self.violation("must not contain a null element"))
        } else {
            Ok(self)
        }
    }
}

impl<'a, U> Guard<'a, Option<U>> {
    pub fn some(self) -> Result<Self, GuardError> {
        if self.value.is_some() {
            Ok(self)
        } else {
            Err(self.violation("must have a value"))
        }
    }

    pub fn none(self) -> Result<Self, GuardError> {
        if self.value.is_none() {
            Ok(self)
        } else {
            Err(self.violation("must not have a value"))
        }
    }
}

// An absent collection vacuously satisfies emptiness and absence checks; it
// never reaches the accessor layer at all.
impl<'a, C: Enumerable> Guard<'a, Option<C>> {
    pub fn none_or_empty(self) -> Result<Self, GuardError> {
        match self.value {
            None => Ok(self),
            Some(inner) => {
                guard_named(self.name, inner).empty()?;
                Ok(self)
            }
        }
    }

    pub fn none_or_does_not_contain<I: Elem + Debug>(self, item: &I) -> Result<Self, GuardError> {
        match self.value {
            None => Ok(self),
            Some(inner) => {
                guard_named(self.name, inner).does_not_contain(item)?;
                Ok(self)
            }
        }
    }

    pub fn none_or_does_not_contain_null(self) -> Result<Self, GuardError> {
        match self.value {
            None => Ok(self),
            Some(inner) => {
                guard_named(self.name, inner).does_not_contain_null()?;
                Ok(self)
            }
        }
    }
}
