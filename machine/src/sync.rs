/*
 * SPDX-License-Identifier: MIT OR BlueOak-1.0.0
 * Copyright (c) 2019 Andre Richter <andre.o.richter@gmail.com>
 * Original code distributed under MIT, additional changes are under BlueOak-1.0.0
 */

//--------------------------------------------------------------------------------------------------
// Public Definitions
//--------------------------------------------------------------------------------------------------

/// Synchronization interfaces.
pub mod interface {

    /// Any object implementing this trait guarantees exclusive access to the data wrapped within
    /// the Mutex for the duration of the provided closure.
    pub trait Mutex {
        /// The type of the data that is wrapped by this mutex.
        type Data;

        /// Locks the mutex and grants the closure temporary mutable access to the wrapped data.
        fn lock<R>(&self, f: impl FnOnce(&mut Self::Data) -> R) -> R;
    }
}

/// A spinning lock.
///
/// Unlike the single-core `NullLock` it replaces, this one really excludes other cores, so it can
/// guard read-modify-write sequences on shared MMIO registers. Interrupt masking is left to the
/// caller; none of the clock operations run from interrupt context.
pub struct SpinLock<T>
where
    T: ?Sized,
{
    inner: spin::Mutex<T>,
}

//--------------------------------------------------------------------------------------------------
// Public Code
//--------------------------------------------------------------------------------------------------

impl<T> SpinLock<T> {
    /// Create an instance.
    pub const fn new(data: T) -> Self {
        Self {
            inner: spin::Mutex::new(data),
        }
    }
}

//------------------------------------------------------------------------------
// OS Interface Code
//------------------------------------------------------------------------------

impl<T> interface::Mutex for SpinLock<T> {
    type Data = T;

    fn lock<R>(&self, f: impl FnOnce(&mut Self::Data) -> R) -> R {
        let mut data = self.inner.lock();

        f(&mut data)
    }
}

//--------------------------------------------------------------------------------------------------
// Testing
//--------------------------------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use {
        super::{interface::Mutex, SpinLock},
        std::thread,
    };

    #[test]
    fn lock_serializes_increments() {
        let counter = SpinLock::new(0u32);

        thread::scope(|s| {
            for _ in 0..4 {
                s.spawn(|| {
                    for _ in 0..1000 {
                        counter.lock(|c| *c += 1);
                    }
                });
            }
        });

        assert_eq!(counter.lock(|c| *c), 4000);
    }
}
