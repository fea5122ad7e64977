//! Process-wide accessor caches.
//!
//! Two levels, with different locking disciplines:
//!
//! - [`declared`] keys accessors by the *statically declared* collection
//!   type. It is read on every guarded call, so reads are lock-free; misses
//!   publish by copy-on-write.
//! - [`dynamic`] keys operation strategies by the *actual runtime* type (and
//!   the item type, for containment). It only sees values whose declared
//!   type erased or mismatched the runtime type, and is guarded by a
//!   reader-writer lock: unlimited concurrent hits, at most one synthesizing
//!   writer per miss.
//!
//! Neither cache ever evicts. Entries are pure functions of immutable type
//! metadata, so there is nothing to invalidate; memory grows with the number
//! of distinct concrete collection types the process actually guards.
pub(crate) mod declared;
pub(crate) mod dynamic;
