use std::any::type_name;
use std::fmt;

use crate::PoolInstRef;

/// The recycling capability set. Types that implement this trait are "pool-aware": objects
/// taken from a [`LocalObjectPool`][crate::LocalObjectPool] are marked with the pool instance
/// that issued them and are returned to that instance for reuse instead of being freed.
///
/// Implementors embed a [`PoolLink`] and expose it via [`pool_link()`][Self::pool_link] and
/// [`pool_link_mut()`][Self::pool_link_mut]. The four capability operations have default
/// implementations built on top of the link. Overriding them is possible but the overrides
/// must stay consistent with each other: an object that reports itself as a pool object must be
/// bound to a pool instance.
///
/// A type either implements this trait or it does not. Types that do not are treated as plain
/// objects by the pool and are heap-allocated and dropped normally.
///
/// # Example
///
/// ```rust
/// use recycle_pool::{PoolLink, PoolObject};
///
/// #[derive(Default)]
/// struct Packet {
///     sequence: u64,
///     link: PoolLink<Self>,
/// }
///
/// impl PoolObject for Packet {
///     fn pool_link(&self) -> &PoolLink<Self> {
///         &self.link
///     }
///
///     fn pool_link_mut(&mut self) -> &mut PoolLink<Self> {
///         &mut self.link
///     }
///
///     fn reset(&mut self) {
///         self.sequence = 0;
///     }
/// }
///
/// let packet = Packet::default();
/// assert!(!packet.is_pool_object());
/// ```
pub trait PoolObject: Sized + 'static {
    /// Returns the embedded back-reference to the issuing pool instance.
    fn pool_link(&self) -> &PoolLink<Self>;

    /// Returns the embedded back-reference to the issuing pool instance.
    fn pool_link_mut(&mut self) -> &mut PoolLink<Self>;

    /// Restores the object to a clean state before it re-enters a free list.
    ///
    /// The pool calls this on every release of a pool object, so an acquired object is always in
    /// the state this hook leaves it in (or freshly constructed via [`Default`]).
    fn reset(&mut self);

    /// Binds the object to the pool instance that issued it.
    ///
    /// # Panics
    ///
    /// Panics if the object is already bound to a pool instance.
    fn mark_pool_object(&mut self, inst: PoolInstRef<Self>) {
        self.pool_link_mut().bind(inst);
    }

    /// Returns whether the object is currently checked out from a pool instance.
    fn is_pool_object(&self) -> bool {
        self.pool_link().is_bound()
    }

    /// Returns the pool instance that issued the object, if any.
    fn pool_inst(&self) -> Option<&PoolInstRef<Self>> {
        self.pool_link().inst()
    }

    /// Returns the object to the free list of the pool instance that issued it.
    ///
    /// # Panics
    ///
    /// Panics if the object is not bound to a pool instance.
    fn give_back_to_pool(self: Box<Self>) {
        let Some(inst) = self.pool_inst().cloned() else {
            panic!(
                "{} was given back to its pool but is not bound to a pool instance",
                type_name::<Self>()
            );
        };

        inst.give_back(self);
    }
}

/// The back-reference a [`PoolObject`] keeps to the pool instance that issued it.
///
/// A bound link doubles as the "is a pool object" flag. The link is unbound while the object
/// sits on a free list and whenever the object was not obtained from a pool.
///
/// Cloning a link always yields an unbound link, so cloning a pooled object produces a plain
/// object that will not be returned to the pool. Links never participate in equality: any two
/// links compare equal, which lets pool-aware types derive [`PartialEq`] on their data fields.
pub struct PoolLink<T> {
    inst: Option<PoolInstRef<T>>,
}

impl<T> PoolLink<T> {
    /// Creates an unbound link.
    #[must_use]
    pub const fn new() -> Self {
        Self { inst: None }
    }

    /// Returns whether the link is bound to a pool instance.
    #[must_use]
    pub fn is_bound(&self) -> bool {
        self.inst.is_some()
    }

    /// Returns the pool instance the link is bound to, if any.
    #[must_use]
    pub fn inst(&self) -> Option<&PoolInstRef<T>> {
        self.inst.as_ref()
    }

    /// Binds the link to a pool instance, which from now on counts the object as checked out.
    ///
    /// The binding is undone when the object is given back to that instance.
    ///
    /// # Panics
    ///
    /// Panics if the link is already bound.
    pub fn bind(&mut self, inst: PoolInstRef<T>) {
        assert!(
            self.inst.is_none(),
            "{} is already bound to a pool instance",
            type_name::<T>()
        );

        inst.note_checked_out();
        self.inst = Some(inst);
    }

    /// Unbinds the link, returning the pool instance it was bound to.
    ///
    /// The outstanding count of the instance is left alone; the caller settles it.
    pub(crate) fn unbind(&mut self) -> Option<PoolInstRef<T>> {
        self.inst.take()
    }
}

impl<T> Default for PoolLink<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Clone for PoolLink<T> {
    fn clone(&self) -> Self {
        Self::new()
    }
}

impl<T> PartialEq for PoolLink<T> {
    fn eq(&self, _other: &Self) -> bool {
        true
    }
}

impl<T> Eq for PoolLink<T> {}

impl<T> fmt::Debug for PoolLink<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PoolLink")
            .field("pool_id", &self.inst.as_ref().map(PoolInstRef::pool_id))
            .finish()
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use static_assertions::assert_not_impl_any;

    use super::*;
    use crate::LocalObjectPool;

    #[derive(Clone, Debug, Default, PartialEq)]
    struct Frame {
        bytes: Vec<u8>,
        link: PoolLink<Self>,
    }

    impl PoolObject for Frame {
        fn pool_link(&self) -> &PoolLink<Self> {
            &self.link
        }

        fn pool_link_mut(&mut self) -> &mut PoolLink<Self> {
            &mut self.link
        }

        fn reset(&mut self) {
            self.bytes.clear();
        }
    }

    // The link holds an `Rc` so pool objects stay on the thread of their pool.
    assert_not_impl_any!(PoolLink<Frame>: Send, Sync);

    #[test]
    fn new_link_is_unbound() {
        let link = PoolLink::<Frame>::new();

        assert!(!link.is_bound());
        assert!(link.inst().is_none());
    }

    #[test]
    fn bind_counts_object_as_checked_out() {
        let pool = LocalObjectPool::new();
        let inst = pool.instance::<Frame>();

        let mut frame = Box::new(Frame::default());
        frame.link.bind(inst.clone());
        assert!(frame.link.is_bound());
        assert!(frame.link.inst().is_some_and(|bound| bound.ptr_eq(&inst)));
        assert_eq!(inst.stats().outstanding, 1);

        inst.give_back(frame);

        let stats = inst.stats();
        assert_eq!(stats.outstanding, 0);
        assert_eq!(stats.idle, 1);
    }

    #[test]
    #[should_panic]
    fn double_bind_panics() {
        let pool = LocalObjectPool::new();
        let inst = pool.instance::<Frame>();

        let mut link = PoolLink::<Frame>::new();
        link.bind(inst.clone());
        link.bind(inst);
    }

    #[test]
    fn cloned_pool_object_is_plain() {
        let pool = LocalObjectPool::new();

        let mut frame = pool.acquire::<Frame>();
        frame.bytes.push(7);

        let copy = frame.clone();
        assert!(frame.is_pool_object());
        assert!(!copy.is_pool_object());
        assert_eq!(*frame, *copy);

        pool.release(frame);
    }

    #[test]
    #[should_panic]
    fn give_back_unbound_object_panics() {
        Box::new(Frame::default()).give_back_to_pool();
    }

    #[test]
    fn debug_output_shows_binding() {
        let pool = LocalObjectPool::new();
        let frame = pool.acquire::<Frame>();

        let bound = format!("{:?}", frame.link);
        let unbound = format!("{:?}", PoolLink::<Frame>::new());

        assert!(bound.contains("Some"));
        assert!(unbound.contains("None"));

        pool.release(frame);
    }
}
