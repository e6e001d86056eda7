//! The default pool of the current thread.
//!
//! Each thread lazily gets its own [`LocalObjectPool`]. The functions in this module are
//! shorthands for calling the same-named methods on that pool.
//!
//! # Example
//!
//! ```rust
//! use recycle_pool::current;
//!
//! let mut line = current::acquire::<String>();
//! line.push_str("hello");
//! current::release(line);
//!
//! current::with(|pool| assert!(pool.type_count() >= 1));
//! ```

use crate::{Lease, LocalObjectPool, Reflect};

thread_local! {
    static POOL: LocalObjectPool = LocalObjectPool::new();
}

/// Calls `f` with the default pool of the current thread.
///
/// # Panics
///
/// Panics if called while the thread-local storage of the current thread is being destroyed.
pub fn with<R>(f: impl FnOnce(&LocalObjectPool) -> R) -> R {
    POOL.with(f)
}

/// Acquires an object from the default pool of the current thread.
///
/// See [`LocalObjectPool::acquire()`].
#[must_use]
pub fn acquire<T: Reflect + Default>() -> Box<T> {
    with(LocalObjectPool::acquire::<T>)
}

/// Leases an object from the default pool of the current thread.
///
/// See [`LocalObjectPool::lease()`].
#[must_use]
pub fn lease<T: Reflect + Default>() -> Lease<T> {
    with(LocalObjectPool::lease::<T>)
}

/// Releases an object to the default pool of the current thread.
///
/// If the thread is already tearing down its thread-local storage, the object is disposed of
/// without the ownership check. Pool-aware objects still return to the instance that issued them.
///
/// See [`LocalObjectPool::release()`].
pub fn release<T: Reflect>(obj: Box<T>) {
    let mut slot = Some(obj);

    // Only a successful access consumes the slot.
    _ = POOL.try_with(|pool| {
        if let Some(obj) = slot.take() {
            pool.release(obj);
        }
    });

    crate::recycle_x(&mut slot);
}
