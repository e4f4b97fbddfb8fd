//! Serialisation of bus access across devices and execution contexts.

use portable_atomic::{AtomicBool, Ordering};

/// An external mutual-exclusion object guarding one bus.
///
/// The bus does not own its lock; the lock must outlive it. Locks are not
/// expected to be re-entrant: the bus never acquires while already holding.
pub trait AccessLock: Sync {
    /// Block until the lock is held by the caller.
    fn acquire(&self);
    /// Release a lock previously taken with [`acquire`](Self::acquire).
    fn release(&self);
}

/// Scoped hold on an optional [`AccessLock`].
///
/// Releases on drop, so every exit path of the holding scope (early `?`
/// returns included) gives the bus back. With no lock installed this is a
/// no-op.
#[must_use = "the lock is released as soon as the guard is dropped"]
pub struct LockGuard<'a> {
    lock: Option<&'a dyn AccessLock>,
}

impl<'a> LockGuard<'a> {
    pub fn acquire(lock: Option<&'a dyn AccessLock>) -> Self {
        if let Some(lock) = lock {
            lock.acquire();
        }
        Self { lock }
    }
}

impl Drop for LockGuard<'_> {
    fn drop(&mut self) {
        if let Some(lock) = self.lock {
            lock.release();
        }
    }
}

/// Busy-waiting [`AccessLock`] over a single atomic flag.
///
/// Suitable when the contending contexts are threads or tasks on cores that
/// make progress independently. Do not share one with an interrupt handler
/// that can preempt the holder on the same core.
#[derive(Debug, Default)]
pub struct SpinLock {
    locked: AtomicBool,
}

impl SpinLock {
    pub const fn new() -> Self {
        Self { locked: AtomicBool::new(false) }
    }

    /// Take the lock if it is free, without waiting.
    pub fn try_acquire(&self) -> bool {
        self.locked
            .compare_exchange(false, true, Ordering::Acquire, Ordering::Relaxed)
            .is_ok()
    }

    pub fn is_locked(&self) -> bool {
        self.locked.load(Ordering::Relaxed)
    }
}

impl AccessLock for SpinLock {
    fn acquire(&self) {
        while self
            .locked
            .compare_exchange_weak(
                false,
                true,
                Ordering::Acquire,
                Ordering::Relaxed,
            )
            .is_err()
        {
            core::hint::spin_loop();
        }
    }

    fn release(&self) {
        self.locked.store(false, Ordering::Release);
    }
}
