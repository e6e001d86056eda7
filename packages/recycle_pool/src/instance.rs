use std::any::{Any, type_name};
use std::cell::RefCell;
use std::num::NonZero;
use std::rc::Rc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::{fmt, mem};

use derive_more::Display;
use tracing::{debug, trace};

use crate::PoolObject;

/// Identifies one pooling scope, i.e. one [`LocalObjectPool`][crate::LocalObjectPool].
///
/// Every pool instance records the identifier of the pool that created it, which is how a pool
/// detects objects being released to it after being issued by a different pool.
#[derive(Clone, Copy, Debug, Display, Eq, Hash, PartialEq)]
#[display("pool#{_0}")]
pub struct PoolId(u64);

impl PoolId {
    pub(crate) fn next() -> Self {
        static NEXT_ID: AtomicU64 = AtomicU64::new(1);

        // Relaxed is enough, we only need uniqueness, not ordering with other memory.
        Self(NEXT_ID.fetch_add(1, Ordering::Relaxed))
    }
}

/// A point-in-time snapshot of the bookkeeping of one pool instance.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
#[non_exhaustive]
pub struct PoolStats {
    /// How many objects the instance has constructed because its free list was empty.
    pub created: usize,

    /// How many times an object was handed out from the free list instead of being constructed.
    pub reused: usize,

    /// How many pool-aware objects are currently checked out. Always zero for plain types.
    pub outstanding: usize,

    /// How many objects are currently waiting on the free list.
    pub idle: usize,
}

/// The free list and bookkeeping for one object type within one pooling scope.
struct PoolInstance<T> {
    pool_id: PoolId,

    /// Objects ready for reuse. They have already been reset and are not bound to any instance.
    idle: Vec<Box<T>>,

    /// Released objects beyond this many idle ones are dropped instead of kept.
    max_idle: Option<NonZero<usize>>,

    created: usize,
    reused: usize,
    outstanding: usize,
}

/// A shared handle to the pool instance that serves objects of type `T` in one pooling scope.
///
/// Pool-aware objects hold one of these as their back-reference (see [`PoolLink`][1]) while they
/// are checked out, which keeps the instance alive even if the pool itself is dropped first.
///
/// The handle is cheap to clone; all clones refer to the same instance.
///
/// [1]: crate::PoolLink
///
/// # Example
///
/// ```rust
/// use recycle_pool::LocalObjectPool;
///
/// let pool = LocalObjectPool::new();
///
/// let first = pool.instance::<String>();
/// let second = pool.instance::<String>();
///
/// assert!(first.ptr_eq(&second));
/// assert_eq!(first.pool_id(), pool.id());
/// ```
pub struct PoolInstRef<T> {
    inner: Rc<RefCell<PoolInstance<T>>>,
}

impl<T> PoolInstRef<T> {
    pub(crate) fn new(pool_id: PoolId, max_idle: Option<NonZero<usize>>) -> Self {
        debug!(
            pool_id = %pool_id,
            object_type = type_name::<T>(),
            "created pool instance"
        );

        Self {
            inner: Rc::new(RefCell::new(PoolInstance {
                pool_id,
                idle: Vec::new(),
                max_idle,
                created: 0,
                reused: 0,
                outstanding: 0,
            })),
        }
    }

    /// The identifier of the pool that created this instance.
    #[must_use]
    pub fn pool_id(&self) -> PoolId {
        self.inner.borrow().pool_id
    }

    /// Returns whether both handles refer to the same pool instance.
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }

    /// Returns a snapshot of the bookkeeping of this instance.
    #[must_use]
    pub fn stats(&self) -> PoolStats {
        let inst = self.inner.borrow();

        PoolStats {
            created: inst.created,
            reused: inst.reused,
            outstanding: inst.outstanding,
            idle: inst.idle.len(),
        }
    }

    /// Pops an object from the free list or constructs a new one.
    ///
    /// The object is not marked and not yet counted as outstanding. Marking does both, and is
    /// the job of the caller, who knows whether `T` is pool-aware.
    pub(crate) fn take(&self) -> Box<T>
    where
        T: Default,
    {
        let recycled = {
            let mut inst = self.inner.borrow_mut();
            let recycled = inst.idle.pop();

            if recycled.is_some() {
                inst.reused = inst.reused.wrapping_add(1);
            } else {
                inst.created = inst.created.wrapping_add(1);
            }

            recycled
        };

        // Construction happens outside the borrow, in case `T::default()` itself uses the pool.
        recycled.unwrap_or_else(|| {
            trace!(object_type = type_name::<T>(), "constructing new object");
            Box::new(T::default())
        })
    }

    /// Records one more object as checked out from this instance. Called whenever a link binds.
    pub(crate) fn note_checked_out(&self) {
        let mut inst = self.inner.borrow_mut();

        inst.outstanding = inst
            .outstanding
            .checked_add(1)
            .expect("outstanding object count cannot realistically overflow usize");
    }

    /// Resets a pool-aware object and pushes it onto the free list of this instance.
    ///
    /// This is what [`PoolObject::give_back_to_pool()`] does by default. Custom implementations
    /// of that method should end by calling this.
    ///
    /// # Panics
    ///
    /// Panics if the object is not bound to this pool instance, or if more objects are returned
    /// to this instance than it has issued.
    pub fn give_back(&self, mut obj: Box<T>)
    where
        T: PoolObject,
    {
        // Idle objects must not point back at their own instance, or the two keep each other
        // alive forever.
        let Some(bound) = obj.pool_link_mut().unbind() else {
            panic!(
                "{} was returned to a pool instance but is not bound to any",
                type_name::<T>()
            );
        };

        assert!(
            bound.ptr_eq(self),
            "{} was returned to a pool instance that did not issue it",
            type_name::<T>()
        );

        // The hook runs before we borrow the instance, as it may itself release nested objects.
        obj.reset();

        let evicted = {
            let mut inst = self.inner.borrow_mut();
            let pool_id = inst.pool_id;

            inst.outstanding = inst.outstanding.checked_sub(1).unwrap_or_else(|| {
                panic!(
                    "{} was returned to {pool_id} more times than it was issued",
                    type_name::<T>()
                )
            });

            let at_limit = inst
                .max_idle
                .is_some_and(|max_idle| inst.idle.len() >= max_idle.get());

            if at_limit {
                Some(obj)
            } else {
                inst.idle.push(obj);
                None
            }
        };

        if let Some(evicted) = evicted {
            debug!(
                object_type = type_name::<T>(),
                "idle limit reached, dropping released object"
            );

            // Dropped outside the borrow, in case the drop logic uses the pool.
            drop(evicted);
        }
    }

    /// Drops all idle objects.
    pub(crate) fn drop_idle(&self) {
        let idle = mem::take(&mut self.inner.borrow_mut().idle);

        // Dropped outside the borrow, in case the drop logic uses the pool.
        drop(idle);
    }
}

impl<T> Clone for PoolInstRef<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<T> fmt::Debug for PoolInstRef<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let stats = self.stats();

        f.debug_struct("PoolInstRef")
            .field("object_type", &type_name::<T>())
            .field("pool_id", &self.pool_id())
            .field("stats", &stats)
            .finish()
    }
}

/// Type-erased view of a pool instance, used by the pool to store instances of different types
/// in one map and to inspect them without knowing their type.
pub(crate) trait ErasedInstance {
    fn as_any(&self) -> &dyn Any;

    fn clone_erased(&self) -> Box<dyn ErasedInstance>;

    fn object_type(&self) -> &'static str;

    fn outstanding(&self) -> usize;

    fn shrink_to_fit(&self);
}

impl<T: 'static> ErasedInstance for PoolInstRef<T> {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn clone_erased(&self) -> Box<dyn ErasedInstance> {
        Box::new(self.clone())
    }

    fn object_type(&self) -> &'static str {
        type_name::<T>()
    }

    fn outstanding(&self) -> usize {
        self.inner.borrow().outstanding
    }

    fn shrink_to_fit(&self) {
        self.drop_idle();
    }
}
