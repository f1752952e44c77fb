//! keyed-table: a single-threaded hash table over caller-owned items whose
//! keys are derived on insertion by a caller-supplied identification
//! function, never passed in explicitly.
//!
//! Internal Design:
//!
//! Summary
//! - Goal: an intrusive-style associative container. The caller keeps
//!   ownership of the items; the table holds `&'it T` references and indexes
//!   them by a `&str` key obtained from an identification function bound at
//!   construction.
//! - Layout:
//!   - `KeyedTable<'it, T, F, S>`: a `hashbrown::HashTable` index over a
//!     `slotmap::SlotMap` record store. Each record caches the item
//!     reference, the derived key, and the key's precomputed hash.
//!   - `ReentryCheck`: debug-only guard that catches re-entry into the table
//!     through user code while internals are transiently inconsistent.
//!
//! Constraints
//! - Single-threaded contract: `!Sync` by design (no atomics); external
//!   synchronization is the caller's job.
//! - Items and key bytes are never copied, allocated, or dropped by the
//!   table; only wrapper records are. Items must outlive the table, which
//!   the `'it` parameter enforces.
//! - Unique keys: inserting an item whose derived key is already present
//!   fails with `InsertError::DuplicateKey` and leaves the table unchanged.
//! - O(1) average insert/get/remove; iteration and drop are O(n).
//!
//! Key caching invariants
//! - The identification function runs exactly once per item, at insertion.
//!   The derived key and its hash are cached in the record; probing and
//!   rehashing always use the stored hash, so neither the identification
//!   function nor the hasher is re-invoked for an entry after insertion.
//! - The key returned by the identification function aliases storage
//!   reachable from the item (`for<'i> Fn(&'i T) -> &'i str`); the table
//!   performs no key copy. Keys compare by byte content, not provenance.
//!
//! Reentrancy policy
//! - Mutation during iteration is statically impossible (`iter` holds a
//!   shared borrow; all mutators take `&mut self`). The remaining hole is
//!   user code reaching back into the same table via interior mutability
//!   from inside the identification function or the hasher; `ReentryCheck`
//!   panics on that in debug builds and costs nothing in release builds.
//!
//! Notes and non-goals
//! - Iteration order is unspecified.
//! - No internal locking; concurrent use without external synchronization is
//!   ruled out by the `!Sync` marker.
//! - Dropping the table releases records only. There is no explicit destroy
//!   call; `Drop` covers it.

mod keyed_table;
mod keyed_table_proptest;
mod reentrancy;

// Public surface
pub use keyed_table::{InsertError, Iter, KeyedTable};
