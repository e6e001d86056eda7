use std::any::{TypeId, type_name};
use std::cell::RefCell;
use std::num::NonZero;
use std::rc::Rc;
use std::{fmt, thread};

use foldhash::{HashMap, HashMapExt};
use tracing::debug;

use crate::instance::ErasedInstance;
use crate::reflection::{self, Reflect};
use crate::{DropPolicy, Lease, LocalObjectPoolBuilder, PoolId, PoolInstRef, PoolObject, PoolStats};

/// A single-threaded object pool that recycles objects of any type.
///
/// The pool keeps one pool instance (a free list plus bookkeeping) per object type, created
/// lazily the first time that type is acquired. Objects of pool-aware types (those implementing
/// [`PoolObject`]) are marked with their instance when acquired and pushed back onto its free
/// list when released. Objects of plain types are constructed on every acquire and dropped on
/// release.
///
/// This type acts as a cloneable handle to a shared pool. Multiple handles can exist
/// simultaneously and all of them refer to the same pooling scope.
///
/// # Single-threaded Design
///
/// This type is designed for single-threaded use and is neither [`Send`] nor [`Sync`]. Each
/// thread that needs pooling should use its own pool, for example via the [`current`][1] module.
///
/// [1]: crate::current
///
/// # Example
///
/// ```rust
/// use recycle_pool::{LocalObjectPool, PoolLink, PoolObject};
///
/// #[derive(Default)]
/// struct Request {
///     path: String,
///     link: PoolLink<Self>,
/// }
///
/// impl PoolObject for Request {
///     fn pool_link(&self) -> &PoolLink<Self> {
///         &self.link
///     }
///
///     fn pool_link_mut(&mut self) -> &mut PoolLink<Self> {
///         &mut self.link
///     }
///
///     fn reset(&mut self) {
///         self.path.clear();
///     }
/// }
///
/// let pool = LocalObjectPool::new();
///
/// let mut request = pool.acquire::<Request>();
/// request.path.push_str("/index.html");
/// pool.release(request);
///
/// let request = pool.acquire::<Request>();
/// assert!(request.path.is_empty());
/// # pool.release(request);
/// ```
#[derive(Clone)]
pub struct LocalObjectPool {
    inner: Rc<PoolCore>,
}

struct PoolCore {
    id: PoolId,

    /// One pool instance per object type, stored type-erased. The value behind each `TypeId` key
    /// is always a `PoolInstRef<T>` for the `T` of that key.
    instances: RefCell<HashMap<TypeId, Box<dyn ErasedInstance>>>,

    drop_policy: DropPolicy,
    max_idle_per_type: Option<NonZero<usize>>,
}

impl LocalObjectPool {
    /// Creates a new pool with default configuration.
    ///
    /// # Example
    ///
    /// ```rust
    /// use recycle_pool::LocalObjectPool;
    ///
    /// let pool = LocalObjectPool::new();
    /// assert_eq!(pool.type_count(), 0);
    /// ```
    #[must_use]
    pub fn new() -> Self {
        Self::builder().build()
    }

    /// Returns a builder for creating a [`LocalObjectPool`] with custom configuration.
    ///
    /// # Example
    ///
    /// ```rust
    /// use recycle_pool::{DropPolicy, LocalObjectPool};
    ///
    /// let pool = LocalObjectPool::builder()
    ///     .drop_policy(DropPolicy::MustNotDropItems)
    ///     .build();
    /// ```
    pub fn builder() -> LocalObjectPoolBuilder {
        LocalObjectPoolBuilder::new()
    }

    pub(crate) fn new_inner(
        drop_policy: DropPolicy,
        max_idle_per_type: Option<NonZero<usize>>,
    ) -> Self {
        Self {
            inner: Rc::new(PoolCore {
                id: PoolId::next(),
                instances: RefCell::new(HashMap::new()),
                drop_policy,
                max_idle_per_type,
            }),
        }
    }

    /// The identifier of this pooling scope.
    #[must_use]
    pub fn id(&self) -> PoolId {
        self.inner.id
    }

    /// The drop policy the pool was created with.
    #[must_use]
    pub fn drop_policy(&self) -> DropPolicy {
        self.inner.drop_policy
    }

    /// Hands out an object of type `T`.
    ///
    /// The object is either taken from the free list of the pool instance for `T`, in which case
    /// it was reset when it was released, or freshly constructed via [`Default`]. Pool-aware
    /// objects are marked with the issuing pool instance before being returned.
    ///
    /// # Example
    ///
    /// ```rust
    /// use recycle_pool::LocalObjectPool;
    ///
    /// let pool = LocalObjectPool::new();
    ///
    /// let mut buffer = pool.acquire::<Vec<u8>>();
    /// buffer.push(1);
    /// pool.release(buffer);
    /// ```
    #[must_use]
    pub fn acquire<T: Reflect + Default>(&self) -> Box<T> {
        let inst = self.instance::<T>();

        let mut obj = inst.take();
        reflection::mark_pool_object(&mut *obj, &inst);

        obj
    }

    /// Hands out an object of type `T` wrapped in a [`Lease`] that recycles it when dropped.
    ///
    /// # Example
    ///
    /// ```rust
    /// use recycle_pool::LocalObjectPool;
    ///
    /// let pool = LocalObjectPool::new();
    ///
    /// {
    ///     let mut text = pool.lease::<String>();
    ///     text.push_str("temporary");
    /// } // Recycled here.
    /// ```
    #[must_use]
    pub fn lease<T: Reflect + Default>(&self) -> Lease<T> {
        Lease::new(self.acquire())
    }

    /// Disposes of an object previously obtained from this pool.
    ///
    /// Pool-aware objects are reset and returned to the free list of the instance that issued
    /// them. Plain objects are dropped.
    ///
    /// # Panics
    ///
    /// Panics if the object is a pool object issued by a different pool.
    ///
    /// # Example
    ///
    /// ```rust
    /// use recycle_pool::LocalObjectPool;
    ///
    /// let pool = LocalObjectPool::new();
    ///
    /// let value = pool.acquire::<u64>();
    /// pool.release(value);
    /// ```
    pub fn release<T: Reflect>(&self, obj: Box<T>) {
        if let Some(inst) = reflection::pool_inst(&*obj) {
            assert!(
                inst.pool_id() == self.id(),
                "{} issued by {} was released to {}",
                type_name::<T>(),
                inst.pool_id(),
                self.id()
            );
        }

        reflection::recycle(obj);
    }

    /// Promotes an object that was constructed outside the pool to a pool object, so that
    /// releasing it returns it to this pool instead of dropping it.
    ///
    /// # Panics
    ///
    /// Panics if the object is already a pool object.
    ///
    /// # Example
    ///
    /// ```rust
    /// use recycle_pool::{LocalObjectPool, PoolLink, PoolObject};
    ///
    /// #[derive(Default)]
    /// struct Token {
    ///     link: PoolLink<Self>,
    /// }
    ///
    /// impl PoolObject for Token {
    ///     fn pool_link(&self) -> &PoolLink<Self> {
    ///         &self.link
    ///     }
    ///
    ///     fn pool_link_mut(&mut self) -> &mut PoolLink<Self> {
    ///         &mut self.link
    ///     }
    ///
    ///     fn reset(&mut self) {}
    /// }
    ///
    /// let pool = LocalObjectPool::new();
    ///
    /// let token = pool.adopt(Box::new(Token::default()));
    /// assert!(token.is_pool_object());
    ///
    /// pool.release(token);
    /// assert_eq!(pool.stats::<Token>().idle, 1);
    /// ```
    #[must_use]
    pub fn adopt<T: PoolObject>(&self, mut obj: Box<T>) -> Box<T> {
        assert!(
            !obj.is_pool_object(),
            "{} cannot be adopted because it is already a pool object",
            type_name::<T>()
        );

        obj.mark_pool_object(self.instance::<T>());

        obj
    }

    /// Returns the pool instance that serves objects of type `T`, creating it if needed.
    #[must_use]
    pub fn instance<T: Reflect>(&self) -> PoolInstRef<T> {
        let mut instances = self.inner.instances.borrow_mut();

        let erased = instances.entry(TypeId::of::<T>()).or_insert_with(|| {
            Box::new(PoolInstRef::<T>::new(
                self.inner.id,
                self.inner.max_idle_per_type,
            ))
        });

        erased
            .as_any()
            .downcast_ref::<PoolInstRef<T>>()
            .expect("instances are keyed by the TypeId of their object type")
            .clone()
    }

    /// Returns a snapshot of the bookkeeping for objects of type `T`.
    ///
    /// Types that have never been acquired report all-zero statistics.
    #[must_use]
    pub fn stats<T: Reflect>(&self) -> PoolStats {
        let instances = self.inner.instances.borrow();

        instances
            .get(&TypeId::of::<T>())
            .and_then(|erased| erased.as_any().downcast_ref::<PoolInstRef<T>>())
            .map(PoolInstRef::stats)
            .unwrap_or_default()
    }

    /// Returns the number of object types the pool has created pool instances for.
    #[must_use]
    pub fn type_count(&self) -> usize {
        self.inner.instances.borrow().len()
    }

    /// Returns the total number of pool-aware objects currently checked out, across all types.
    #[must_use]
    pub fn outstanding(&self) -> usize {
        self.inner.outstanding()
    }

    /// Drops every idle object held for reuse, across all types.
    ///
    /// # Example
    ///
    /// ```rust
    /// use recycle_pool::{LocalObjectPool, PoolLink, PoolObject};
    ///
    /// #[derive(Default)]
    /// struct Chunk {
    ///     link: PoolLink<Self>,
    /// }
    ///
    /// impl PoolObject for Chunk {
    ///     fn pool_link(&self) -> &PoolLink<Self> {
    ///         &self.link
    ///     }
    ///
    ///     fn pool_link_mut(&mut self) -> &mut PoolLink<Self> {
    ///         &mut self.link
    ///     }
    ///
    ///     fn reset(&mut self) {}
    /// }
    ///
    /// let pool = LocalObjectPool::new();
    /// pool.release(pool.acquire::<Chunk>());
    /// assert_eq!(pool.stats::<Chunk>().idle, 1);
    ///
    /// pool.shrink_to_fit();
    /// assert_eq!(pool.stats::<Chunk>().idle, 0);
    /// ```
    pub fn shrink_to_fit(&self) {
        // No borrow of the map may be held while idle objects are dropped.
        let instances: Vec<Box<dyn ErasedInstance>> = self
            .inner
            .instances
            .borrow()
            .values()
            .map(|erased| erased.clone_erased())
            .collect();

        for erased in instances {
            erased.shrink_to_fit();
        }
    }
}

impl PoolCore {
    fn outstanding(&self) -> usize {
        self.instances
            .borrow()
            .values()
            .map(|erased| erased.outstanding())
            .sum()
    }
}

impl Default for LocalObjectPool {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for LocalObjectPool {
    #[cfg_attr(test, mutants::skip)] // Diagnostic output only, mutation is meaningless.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LocalObjectPool")
            .field("id", &self.inner.id)
            .field("type_count", &self.type_count())
            .field("drop_policy", &self.inner.drop_policy)
            .field("max_idle_per_type", &self.inner.max_idle_per_type)
            .finish()
    }
}

impl Drop for PoolCore {
    fn drop(&mut self) {
        let outstanding = self.outstanding();

        if outstanding == 0 {
            return;
        }

        if matches!(self.drop_policy, DropPolicy::MustNotDropItems) && !thread::panicking() {
            let types: Vec<&'static str> = self
                .instances
                .get_mut()
                .values()
                .filter(|erased| erased.outstanding() > 0)
                .map(|erased| erased.object_type())
                .collect();

            panic!(
                "{} dropped while {outstanding} pool objects are still checked out \
                 (drop policy is MustNotDropItems): {types:?}",
                self.id
            );
        }

        debug!(
            pool_id = %self.id,
            outstanding,
            "pool dropped while objects are still checked out"
        );
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use std::ptr;

    use static_assertions::assert_not_impl_any;

    use super::*;
    use crate::PoolLink;

    #[derive(Debug, Default)]
    struct Envelope {
        to: String,
        body: Vec<u8>,
        link: PoolLink<Self>,
    }

    impl PoolObject for Envelope {
        fn pool_link(&self) -> &PoolLink<Self> {
            &self.link
        }

        fn pool_link_mut(&mut self) -> &mut PoolLink<Self> {
            &mut self.link
        }

        fn reset(&mut self) {
            self.to.clear();
            self.body.clear();
        }
    }

    #[test]
    fn single_threaded_assertions() {
        // LocalObjectPool should NOT be Send or Sync - it's single-threaded only.
        assert_not_impl_any!(LocalObjectPool: Send);
        assert_not_impl_any!(LocalObjectPool: Sync);
    }

    #[test]
    fn acquire_marks_aware_objects() {
        let pool = LocalObjectPool::new();

        let envelope = pool.acquire::<Envelope>();
        assert!(envelope.is_pool_object());
        assert!(
            envelope
                .pool_inst()
                .is_some_and(|inst| inst.pool_id() == pool.id())
        );
        assert_eq!(pool.outstanding(), 1);

        pool.release(envelope);
        assert_eq!(pool.outstanding(), 0);
    }

    #[test]
    fn release_then_acquire_reuses_allocation() {
        let pool = LocalObjectPool::new();

        let mut envelope = pool.acquire::<Envelope>();
        envelope.to.push_str("alice");
        envelope.body.extend_from_slice(b"hi");
        let address = ptr::from_ref::<Envelope>(&*envelope);
        pool.release(envelope);

        let envelope = pool.acquire::<Envelope>();
        assert!(ptr::eq(address, ptr::from_ref::<Envelope>(&*envelope)));
        assert!(envelope.to.is_empty());
        assert!(envelope.body.is_empty());

        let stats = pool.stats::<Envelope>();
        assert_eq!(stats.created, 1);
        assert_eq!(stats.reused, 1);

        pool.release(envelope);
    }

    #[test]
    fn plain_objects_are_never_reused() {
        let pool = LocalObjectPool::new();

        let first = pool.acquire::<String>();
        pool.release(first);
        let second = pool.acquire::<String>();
        pool.release(second);

        let stats = pool.stats::<String>();
        assert_eq!(stats.created, 2);
        assert_eq!(stats.reused, 0);
        assert_eq!(stats.idle, 0);
        assert_eq!(stats.outstanding, 0);
    }

    #[test]
    fn instances_are_created_lazily_per_type() {
        let pool = LocalObjectPool::new();
        assert_eq!(pool.type_count(), 0);

        // Asking for statistics does not create an instance.
        assert_eq!(pool.stats::<Envelope>(), PoolStats::default());
        assert_eq!(pool.type_count(), 0);

        pool.release(pool.acquire::<Envelope>());
        pool.release(pool.acquire::<u32>());
        pool.release(pool.acquire::<Envelope>());

        assert_eq!(pool.type_count(), 2);
    }

    #[test]
    fn same_type_same_instance() {
        let pool = LocalObjectPool::new();

        assert!(pool.instance::<Envelope>().ptr_eq(&pool.instance::<Envelope>()));
    }

    #[test]
    fn clones_share_the_pool() {
        let pool = LocalObjectPool::new();
        let clone = pool.clone();

        let envelope = pool.acquire::<Envelope>();
        clone.release(envelope);

        assert_eq!(pool.stats::<Envelope>().idle, 1);
        assert_eq!(clone.id(), pool.id());
    }

    #[test]
    #[should_panic]
    fn release_to_foreign_pool_panics() {
        let pool = LocalObjectPool::new();
        let other = LocalObjectPool::new();

        let envelope = pool.acquire::<Envelope>();
        other.release(envelope);
    }

    #[test]
    fn release_of_plain_object_to_any_pool_is_fine() {
        let pool = LocalObjectPool::new();
        let other = LocalObjectPool::new();

        let value = pool.acquire::<u64>();
        other.release(value);
    }

    #[test]
    fn adopt_promotes_external_object() {
        let pool = LocalObjectPool::new();

        let envelope = pool.adopt(Box::new(Envelope::default()));
        assert!(envelope.is_pool_object());
        assert_eq!(pool.outstanding(), 1);

        pool.release(envelope);
        assert_eq!(pool.stats::<Envelope>().idle, 1);
    }

    #[test]
    #[should_panic]
    fn adopt_pool_object_panics() {
        let pool = LocalObjectPool::new();

        let envelope = pool.acquire::<Envelope>();
        let _adopted = pool.adopt(envelope);
    }

    #[test]
    fn max_idle_per_type_bounds_free_list() {
        let pool = LocalObjectPool::builder()
            .max_idle_per_type(NonZero::new(2).unwrap())
            .build();

        let objects: Vec<_> = (0..5).map(|_| pool.acquire::<Envelope>()).collect();
        for envelope in objects {
            pool.release(envelope);
        }

        let stats = pool.stats::<Envelope>();
        assert_eq!(stats.idle, 2);
        assert_eq!(stats.outstanding, 0);
    }

    #[test]
    fn shrink_to_fit_empties_free_lists() {
        let pool = LocalObjectPool::new();

        pool.release(pool.acquire::<Envelope>());
        assert_eq!(pool.stats::<Envelope>().idle, 1);

        pool.shrink_to_fit();
        assert_eq!(pool.stats::<Envelope>().idle, 0);
    }

    #[test]
    fn object_outlives_pool() {
        let pool = LocalObjectPool::new();
        let envelope = pool.acquire::<Envelope>();
        let inst = pool.instance::<Envelope>();

        drop(pool);

        // The object still knows where it came from and can be recycled.
        crate::recycle(envelope);
        assert_eq!(inst.stats().idle, 1);
    }

    #[test]
    #[should_panic]
    fn must_not_drop_items_panics_with_outstanding_objects() {
        let pool = LocalObjectPool::builder()
            .drop_policy(DropPolicy::MustNotDropItems)
            .build();

        let envelope = pool.acquire::<Envelope>();
        drop(pool);
        drop(envelope);
    }

    #[test]
    fn must_not_drop_items_is_fine_when_all_released() {
        let pool = LocalObjectPool::builder()
            .drop_policy(DropPolicy::MustNotDropItems)
            .build();

        let envelope = pool.acquire::<Envelope>();
        let text = pool.acquire::<String>();
        pool.release(envelope);
        drop(text);

        drop(pool);
    }

    #[test]
    fn debug_output() {
        let pool = LocalObjectPool::new();
        pool.release(pool.acquire::<Envelope>());

        let output = format!("{pool:?}");
        assert!(output.contains("LocalObjectPool"));
        assert!(output.contains("type_count: 1"));
    }
}
