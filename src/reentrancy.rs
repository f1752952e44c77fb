//! Debug-only re-entry check.
//!
//! The table calls user code (the identification function, the hasher)
//! while its index and record store can be transiently out of sync. If that
//! user code reaches back into the same table through interior mutability,
//! internals could be observed mid-update. In debug builds entering twice
//! without releasing the ticket panics; in release builds the whole thing
//! compiles away.

use core::cell::Cell;
use core::marker::PhantomData;

/// Per-table re-entry tracker. Guard entry points with
/// `let _t = self.reentry.claim();`.
#[derive(Debug, Default)]
pub(crate) struct ReentryCheck {
    #[cfg(debug_assertions)]
    engaged: Cell<bool>,
    // PhantomData<Cell<()>> keeps the containing table !Sync in every build
    // profile (the Cell above only exists in debug builds). Send is
    // unaffected; moving a table between threads stays legal.
    _marker: PhantomData<Cell<()>>,
}

impl ReentryCheck {
    pub(crate) const fn new() -> Self {
        Self {
            #[cfg(debug_assertions)]
            engaged: Cell::new(false),
            _marker: PhantomData,
        }
    }

    /// Claim the table for one operation. Panics in debug builds if an
    /// operation is already in progress on this table.
    #[inline]
    pub(crate) fn claim(&self) -> ReentryTicket<'_> {
        #[cfg(debug_assertions)]
        {
            assert!(
                !self.engaged.replace(true),
                "keyed-table: re-entered the table from user code during an operation"
            );
            return ReentryTicket { check: self };
        }

        #[cfg(not(debug_assertions))]
        {
            return ReentryTicket { _ph: PhantomData };
        }
    }
}

/// RAII ticket returned by [`ReentryCheck::claim`].
pub(crate) struct ReentryTicket<'a> {
    #[cfg(debug_assertions)]
    check: &'a ReentryCheck,
    #[cfg(not(debug_assertions))]
    _ph: PhantomData<&'a ()>,
}

impl Drop for ReentryTicket<'_> {
    fn drop(&mut self) {
        #[cfg(debug_assertions)]
        self.check.engaged.set(false);
    }
}

#[cfg(test)]
mod tests {
    use super::ReentryCheck;

    #[test]
    fn sequential_claims_are_fine() {
        let c = ReentryCheck::new();
        drop(c.claim());
        drop(c.claim());
    }

    #[cfg(debug_assertions)]
    #[test]
    fn nested_claim_panics_in_debug() {
        let c = ReentryCheck::new();
        let res = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            let _t1 = c.claim();
            let _t2 = c.claim();
        }));
        assert!(res.is_err(), "nested claim must panic in debug builds");
    }

    #[cfg(not(debug_assertions))]
    #[test]
    fn nested_claim_is_noop_in_release() {
        let c = ReentryCheck::new();
        let _t1 = c.claim();
        let _t2 = c.claim();
    }
}
