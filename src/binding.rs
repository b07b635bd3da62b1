//! Typed once-only bindings for fields known at compile time.
//!
//! Where [`Object`](crate::object::Object) rewrites a property at runtime,
//! a struct field can hold a [`Binding`] and switch from the supplier to
//! its result the same way. The supplier gets the owner passed in
//! explicitly.

use std::sync::{Mutex, PoisonError};

use tracing::{debug, trace};

#[derive(Clone, Debug)]
pub enum Binding<T, F> {
    Pending(F),
    Evaluated(T),
}

impl<T, F> Binding<T, F> {
    pub const fn new(supplier: F) -> Self {
        Self::Pending(supplier)
    }

    pub const fn is_evaluated(&self) -> bool {
        matches!(self, Self::Evaluated(_))
    }

    /// The cached value, without evaluating.
    pub const fn get(&self) -> Option<&T> {
        match self {
            Self::Evaluated(value) => Some(value),
            Self::Pending(_) => None,
        }
    }

    pub fn into_value(self) -> Option<T> {
        match self {
            Self::Evaluated(value) => Some(value),
            Self::Pending(_) => None,
        }
    }

    /// Puts a fresh supplier in place, returning the value it replaces.
    pub fn reinstall(&mut self, supplier: F) -> Option<T> {
        std::mem::replace(self, Self::Pending(supplier)).into_value()
    }

    /// Runs the supplier on first use. On error the binding stays pending
    /// and the next call tries again.
    pub fn force<O, E>(&mut self, owner: &O) -> Result<&T, E>
    where
        O: ?Sized,
        F: FnMut(&O) -> Result<T, E>,
    {
        if let Self::Pending(supplier) = self {
            let value = supplier(owner).inspect_err(|_| {
                debug!("binding supplier failed, still pending");
            })?;
            *self = Self::Evaluated(value);
            trace!("binding evaluated");
        }

        match self {
            Self::Evaluated(value) => Ok(value),
            Self::Pending(_) => unreachable!("pending binding after evaluation"),
        }
    }

    /// [`force`](Self::force) for suppliers that cannot fail.
    pub fn get_or_eval<O>(&mut self, owner: &O) -> &T
    where
        O: ?Sized,
        F: FnMut(&O) -> T,
    {
        if let Self::Pending(supplier) = self {
            let value = supplier(owner);
            *self = Self::Evaluated(value);
            trace!("binding evaluated");
        }

        match self {
            Self::Evaluated(value) => value,
            Self::Pending(_) => unreachable!("pending binding after evaluation"),
        }
    }
}

/// A [`Binding`] behind a lock, for owners shared across threads. The
/// supplier runs at most once even when callers race.
///
/// A supplier that panics leaves the binding pending, so a poisoned lock
/// is taken over rather than propagated.
#[derive(Debug)]
pub struct SyncBinding<T, F>(Mutex<Binding<T, F>>);

impl<T, F> SyncBinding<T, F> {
    pub const fn new(supplier: F) -> Self {
        Self(Mutex::new(Binding::new(supplier)))
    }

    pub fn is_evaluated(&self) -> bool {
        self.0
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .is_evaluated()
    }

    pub fn force<O, E>(&self, owner: &O) -> Result<T, E>
    where
        O: ?Sized,
        T: Clone,
        F: FnMut(&O) -> Result<T, E>,
    {
        self.0
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .force(owner)
            .cloned()
    }

    pub fn into_value(self) -> Option<T> {
        self.0
            .into_inner()
            .unwrap_or_else(PoisonError::into_inner)
            .into_value()
    }
}

#[cfg(test)]
mod tests {
    use std::panic::{catch_unwind, AssertUnwindSafe};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    use super::*;

    struct Dims {
        w: u32,
        h: u32,
    }

    struct Rect {
        dims: Dims,
        area: Binding<u32, fn(&Dims) -> u32>,
    }

    impl Rect {
        fn new(w: u32, h: u32) -> Self {
            Self {
                dims: Dims { w, h },
                area: Binding::new(|d| d.w * d.h),
            }
        }

        fn area(&mut self) -> u32 {
            *self.area.get_or_eval(&self.dims)
        }
    }

    #[test]
    fn field_evaluates_once() {
        let mut r = Rect::new(3, 4);
        assert!(!r.area.is_evaluated());

        assert_eq!(r.area(), 12);
        r.dims.w = 100;
        assert_eq!(r.area(), 12);
        assert_eq!(r.area.get(), Some(&12));
    }

    #[test]
    fn counts_calls() {
        let mut calls = 0;
        let mut binding = Binding::new(|n: &i32| {
            calls += 1;
            n * 2
        });

        assert_eq!(*binding.get_or_eval(&5), 10);
        assert_eq!(*binding.get_or_eval(&7), 10);
        drop(binding);

        assert_eq!(calls, 1);
    }

    #[test]
    fn failure_keeps_binding_pending() {
        let mut attempts = 0;
        let mut binding = Binding::new(|_: &()| {
            attempts += 1;
            if attempts == 1 {
                Err("first try")
            } else {
                Ok(attempts)
            }
        });

        assert_eq!(binding.force(&()), Err("first try"));
        assert!(!binding.is_evaluated());
        assert_eq!(binding.force(&()), Ok(&2));
        assert_eq!(binding.force(&()), Ok(&2));
    }

    #[test]
    fn reinstall_returns_old_value() {
        let mut binding: Binding<i32, fn(&str) -> i32> = Binding::new(|s| s.len() as i32);

        assert_eq!(*binding.get_or_eval("abc"), 3);
        assert_eq!(binding.reinstall(|s| s.len() as i32 * 10), Some(3));
        assert_eq!(binding.get(), None);
        assert_eq!(*binding.get_or_eval("ab"), 20);
        assert_eq!(binding.into_value(), Some(20));
    }

    #[test]
    fn sync_binding_runs_once_across_threads() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);

        let binding = Arc::new(SyncBinding::new(move |base: &u64| {
            counter.fetch_add(1, Ordering::SeqCst);
            Ok::<_, ()>(base + 1)
        }));

        let handles = (0..8)
            .map(|_| {
                let binding = Arc::clone(&binding);
                std::thread::spawn(move || binding.force(&41))
            })
            .collect::<Vec<_>>();

        for handle in handles {
            assert_eq!(handle.join().unwrap(), Ok(42));
        }

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(binding.is_evaluated());
    }

    #[test]
    fn sync_binding_survives_a_panicking_supplier() {
        let attempts = AtomicUsize::new(0);
        let binding = SyncBinding::new(|_: &()| {
            if attempts.fetch_add(1, Ordering::SeqCst) == 0 {
                panic!("supplier blew up");
            }
            Ok::<_, ()>(7)
        });

        let first = catch_unwind(AssertUnwindSafe(|| binding.force(&())));
        assert!(first.is_err());
        assert!(!binding.is_evaluated());

        assert_eq!(binding.force(&()), Ok(7));
        assert_eq!(binding.force(&()), Ok(7));
        assert_eq!(binding.into_value(), Some(7));
        assert_eq!(attempts.load(Ordering::SeqCst), 2);
    }
}
