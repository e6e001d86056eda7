//! Compile-time detection of the [`PoolObject`] capability and uniform dispatch to it.
//!
//! Every type the pool works with implements [`Reflect`]. Pool-aware types get the
//! capability-aware implementation for free through a blanket implementation over
//! [`PoolObject`]. Plain types opt into the fallback implementation with an empty impl block
//! (or the [`plain_object!`][crate::plain_object] macro), which turns every capability
//! operation into a no-op and disposal into an ordinary drop.
//!
//! The free functions in this module are the uniform entry points. They are monomorphized per
//! type, so choosing between the two branches costs nothing at runtime.
//!
//! # Example
//!
//! ```rust
//! use recycle_pool::reflection;
//! use recycle_pool::{PoolLink, PoolObject};
//!
//! #[derive(Default)]
//! struct Aware {
//!     link: PoolLink<Self>,
//! }
//!
//! impl PoolObject for Aware {
//!     fn pool_link(&self) -> &PoolLink<Self> {
//!         &self.link
//!     }
//!
//!     fn pool_link_mut(&mut self) -> &mut PoolLink<Self> {
//!         &mut self.link
//!     }
//!
//!     fn reset(&mut self) {}
//! }
//!
//! #[derive(Default)]
//! struct Plain;
//!
//! recycle_pool::plain_object!(Plain);
//!
//! assert!(reflection::is_supported::<Aware>());
//! assert!(!reflection::is_supported::<Plain>());
//! assert!(!reflection::is_supported::<String>());
//!
//! // Neither object came from a pool, so both are simply dropped.
//! reflection::recycle(Box::new(Aware::default()));
//! reflection::recycle(Box::new(Plain));
//! ```

use crate::{PoolInstRef, PoolObject};

/// Dispatches the four capability operations either to the [`PoolObject`] implementation of a
/// type or to a silent fallback.
///
/// The provided method bodies are the fallback. Do not implement this trait for pool-aware
/// types; they already have it via a blanket implementation. For plain types, an empty impl
/// block is all that is needed:
///
/// ```rust
/// use recycle_pool::Reflect;
///
/// #[derive(Default)]
/// struct Settings {
///     verbose: bool,
/// }
///
/// impl Reflect for Settings {}
/// ```
///
/// Prefer calling the free functions of the [`reflection`][crate::reflection] module over
/// calling these methods directly.
pub trait Reflect: Sized + 'static {
    /// Whether the type implements the [`PoolObject`] capability set.
    const IS_SUPPORTED: bool = false;

    /// See [`mark_pool_object()`].
    fn reflect_mark(&mut self, _inst: &PoolInstRef<Self>) {}

    /// See [`is_pool_object()`].
    fn reflect_is_pool_object(&self) -> bool {
        false
    }

    /// See [`pool_inst()`].
    fn reflect_pool_inst(&self) -> Option<&PoolInstRef<Self>> {
        None
    }

    /// See [`give_back_to_pool()`].
    fn reflect_give_back(self: Box<Self>) {
        drop(self);
    }
}

impl<T: PoolObject> Reflect for T {
    const IS_SUPPORTED: bool = true;

    fn reflect_mark(&mut self, inst: &PoolInstRef<Self>) {
        self.mark_pool_object(inst.clone());
    }

    fn reflect_is_pool_object(&self) -> bool {
        self.is_pool_object()
    }

    fn reflect_pool_inst(&self) -> Option<&PoolInstRef<Self>> {
        self.pool_inst()
    }

    fn reflect_give_back(self: Box<Self>) {
        self.give_back_to_pool();
    }
}

/// Implements [`Reflect`] with the plain-object fallback for each listed type.
///
/// # Example
///
/// ```rust
/// #[derive(Default)]
/// struct Header {
///     length: u32,
/// }
///
/// #[derive(Default)]
/// struct Trailer {
///     checksum: u32,
/// }
///
/// recycle_pool::plain_object!(Header, Trailer);
///
/// assert!(!recycle_pool::reflection::is_supported::<Header>());
/// ```
#[macro_export]
macro_rules! plain_object {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl $crate::Reflect for $ty {}
        )+
    };
}

plain_object!(
    (),
    bool,
    char,
    u8,
    u16,
    u32,
    u64,
    u128,
    usize,
    i8,
    i16,
    i32,
    i64,
    i128,
    isize,
    f32,
    f64,
    String
);

impl<T: 'static> Reflect for Vec<T> {}

/// Returns whether `T` implements the [`PoolObject`] capability set.
#[must_use]
#[inline]
pub const fn is_supported<T: Reflect>() -> bool {
    T::IS_SUPPORTED
}

/// Binds a pool-aware object to `inst`. No-op for plain objects.
///
/// # Panics
///
/// Panics if a pool-aware object is already bound to a pool instance.
#[inline]
pub fn mark_pool_object<T: Reflect>(obj: &mut T, inst: &PoolInstRef<T>) {
    obj.reflect_mark(inst);
}

/// Returns whether the object is a checked-out pool object. Always `false` for plain objects.
#[must_use]
#[inline]
pub fn is_pool_object<T: Reflect>(obj: &T) -> bool {
    obj.reflect_is_pool_object()
}

/// Returns the pool instance that issued the object. Always `None` for plain objects.
#[must_use]
#[inline]
pub fn pool_inst<T: Reflect>(obj: &T) -> Option<&PoolInstRef<T>> {
    obj.reflect_pool_inst()
}

/// Returns a pool-aware object to the instance that issued it. Plain objects are dropped.
///
/// # Panics
///
/// Panics if a pool-aware object is not bound to a pool instance.
#[inline]
pub fn give_back_to_pool<T: Reflect>(obj: Box<T>) {
    obj.reflect_give_back();
}

/// Disposes of an object in the right way for its type: checked-out pool objects go back to
/// their pool instance, everything else is dropped.
///
/// # Example
///
/// ```rust
/// use recycle_pool::{LocalObjectPool, recycle};
///
/// let pool = LocalObjectPool::new();
///
/// let text = pool.acquire::<String>();
/// recycle(text);
///
/// recycle(Box::new(42_u64));
/// ```
#[inline]
pub fn recycle<T: Reflect>(obj: Box<T>) {
    if T::IS_SUPPORTED && obj.reflect_is_pool_object() {
        obj.reflect_give_back();
    } else {
        drop(obj);
    }
}

/// Recycles the object in `slot` (if any) and leaves `None` behind, so the object cannot be
/// used again by accident.
///
/// # Example
///
/// ```rust
/// use recycle_pool::recycle_x;
///
/// let mut slot = Some(Box::new(String::from("bye")));
/// recycle_x(&mut slot);
/// assert!(slot.is_none());
///
/// // An empty slot is fine, too.
/// recycle_x(&mut slot);
/// ```
#[inline]
pub fn recycle_x<T: Reflect>(slot: &mut Option<Box<T>>) {
    if let Some(obj) = slot.take() {
        recycle(obj);
    }
}
