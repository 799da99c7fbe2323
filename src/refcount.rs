//! Per-resource reference counter.

use core::cell::Cell;
use core::marker::PhantomData;

/// Single-threaded reference counter for a live resource.
///
/// A counter is created by the loading call and therefore starts at 1. It
/// never reads 0 while its resource is alive: the release that brings it to
/// 0 is also the one that destroys the resource.
#[derive(Debug)]
pub struct RefCount {
    count: Cell<usize>,
    // Keep !Send + !Sync in line with single-threaded design.
    _nosend: PhantomData<*mut ()>,
}

impl RefCount {
    pub fn new() -> Self {
        Self {
            count: Cell::new(1),
            _nosend: PhantomData,
        }
    }

    #[inline]
    pub fn get(&self) -> usize {
        self.count.get()
    }

    /// Add one reference.
    #[inline]
    pub fn retain(&self) {
        let n = self.count.get().wrapping_add(1);
        self.count.set(n);
        if n == 0 {
            // Follow Rc semantics: abort on overflow rather than continue unsafely.
            std::process::abort();
        }
    }

    /// Drop one reference. Returns true if the count is now zero.
    #[inline]
    pub fn release(&self) -> bool {
        let c = self.count.get();
        assert!(c > 0, "RefCount underflow");
        let n = c - 1;
        self.count.set(n);
        n == 0
    }
}

impl Default for RefCount {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::RefCount;

    #[test]
    fn starts_at_one() {
        assert_eq!(RefCount::new().get(), 1);
    }

    #[test]
    fn retain_release_round() {
        let c = RefCount::new();
        c.retain();
        c.retain();
        assert_eq!(c.get(), 3);
        assert!(!c.release());
        assert!(!c.release());
        assert!(c.release(), "last release reports zero");
        assert_eq!(c.get(), 0);
    }

    #[test]
    #[should_panic(expected = "RefCount underflow")]
    fn release_past_zero_panics() {
        let c = RefCount::new();
        assert!(c.release());
        c.release();
    }
}
