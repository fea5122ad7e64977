//! Fluent precondition checks over arbitrary collection types.
//!
//! Callers wrap a value and chain checks that report descriptive errors on
//! violation. The interesting machinery is underneath the collection checks:
//! a collection's declared type often cannot say how to answer "how many
//! elements, up to N", "does it contain null", or "does it contain this
//! item" efficiently. Those answers are discovered per *runtime* type (a
//! native `count`/`len` property or `contains` method when the type declares
//! one, bounded enumeration otherwise), compiled into an accessor once, and
//! cached process-wide.
//!
//! ## Core types
//!
//! - [`guard()`] / [`guard_named()`]: start a fluent chain over any value.
//! - [`Enumerable`]: the capability collections implement to be guarded;
//!   implementations exist for the std containers and for erased
//!   `Box<dyn Enumerable>` values.
//! - [`Elem`]: the capability of an element type, including its nullability
//!   (`Option<T>` elements can be null, others cannot).
//! - [`TypeDescription`]: the native members a collection type declares,
//!   searched by name and parameter shape.

pub mod element;
pub mod enumerable;
pub mod error;
pub mod guard;
pub mod types;

mod accessor;
mod cache;

pub use element::{Elem, ElementRef};
pub use enumerable::{Elements, Enumerable};
pub use error::{GuardError, SynthesisError};
pub use guard::{guard, guard_named, Guard};
pub use types::TypeDescription;
