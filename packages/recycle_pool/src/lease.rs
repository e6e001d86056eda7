use std::fmt;
use std::ops::{Deref, DerefMut};

use crate::reflection::{self, Reflect};

/// An object acquired from a pool that is recycled automatically when the lease is dropped.
///
/// Dropping the lease does exactly what [`LocalObjectPool::release()`][1] would do: pool-aware
/// objects go back to the pool instance that issued them, plain objects are dropped.
///
/// [1]: crate::LocalObjectPool::release
///
/// # Example
///
/// ```rust
/// use recycle_pool::{LocalObjectPool, PoolLink, PoolObject};
///
/// #[derive(Default)]
/// struct Scratch {
///     bytes: Vec<u8>,
///     link: PoolLink<Self>,
/// }
///
/// impl PoolObject for Scratch {
///     fn pool_link(&self) -> &PoolLink<Self> {
///         &self.link
///     }
///
///     fn pool_link_mut(&mut self) -> &mut PoolLink<Self> {
///         &mut self.link
///     }
///
///     fn reset(&mut self) {
///         self.bytes.clear();
///     }
/// }
///
/// let pool = LocalObjectPool::new();
///
/// {
///     let mut scratch = pool.lease::<Scratch>();
///     scratch.bytes.extend_from_slice(b"work");
/// }
///
/// assert_eq!(pool.stats::<Scratch>().idle, 1);
/// ```
pub struct Lease<T: Reflect> {
    // Always `Some` until the lease is dropped or consumed.
    obj: Option<Box<T>>,
}

impl<T: Reflect> Lease<T> {
    pub(crate) fn new(obj: Box<T>) -> Self {
        Self { obj: Some(obj) }
    }

    /// Ends the lease without recycling the object, handing it over to the caller.
    ///
    /// The caller becomes responsible for disposing of the object, typically via
    /// [`LocalObjectPool::release()`][crate::LocalObjectPool::release] or [`recycle()`][1].
    ///
    /// [1]: crate::recycle
    #[must_use]
    pub fn into_inner(mut self) -> Box<T> {
        self.obj
            .take()
            .expect("a lease holds its object until it is dropped or consumed")
    }
}

impl<T: Reflect> Deref for Lease<T> {
    type Target = T;

    fn deref(&self) -> &T {
        self.obj
            .as_deref()
            .expect("a lease holds its object until it is dropped or consumed")
    }
}

impl<T: Reflect> DerefMut for Lease<T> {
    fn deref_mut(&mut self) -> &mut T {
        self.obj
            .as_deref_mut()
            .expect("a lease holds its object until it is dropped or consumed")
    }
}

impl<T: Reflect> Drop for Lease<T> {
    fn drop(&mut self) {
        reflection::recycle_x(&mut self.obj);
    }
}

impl<T: Reflect + fmt::Debug> fmt::Debug for Lease<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Lease").field(&self.obj).finish()
    }
}
