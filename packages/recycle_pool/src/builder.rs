use std::num::NonZero;

use crate::{DropPolicy, LocalObjectPool};

/// Builder for creating an instance of [`LocalObjectPool`].
///
/// This builder allows configuration of pool behavior before creation.
///
/// # Examples
///
/// ```
/// use std::num::NonZero;
///
/// use recycle_pool::{DropPolicy, LocalObjectPool};
///
/// // Default pool.
/// let pool = LocalObjectPool::builder().build();
///
/// // With leak detection and a bounded free list per type.
/// let pool = LocalObjectPool::builder()
///     .drop_policy(DropPolicy::MustNotDropItems)
///     .max_idle_per_type(NonZero::new(64).unwrap())
///     .build();
/// ```
#[derive(Debug)]
#[must_use]
pub struct LocalObjectPoolBuilder {
    drop_policy: DropPolicy,
    max_idle_per_type: Option<NonZero<usize>>,
}

impl LocalObjectPoolBuilder {
    pub(crate) fn new() -> Self {
        Self {
            drop_policy: DropPolicy::default(),
            max_idle_per_type: None,
        }
    }

    /// Sets the [drop policy][DropPolicy] for the pool. This governs how to treat pool-aware
    /// objects that are still checked out when the pool is dropped.
    ///
    /// # Examples
    ///
    /// ```
    /// use recycle_pool::{DropPolicy, LocalObjectPool};
    ///
    /// let pool = LocalObjectPool::builder()
    ///     .drop_policy(DropPolicy::MustNotDropItems)
    ///     .build();
    /// ```
    pub fn drop_policy(mut self, policy: DropPolicy) -> Self {
        self.drop_policy = policy;
        self
    }

    /// Limits how many released objects each pool instance keeps for reuse. Objects released
    /// while the free list is already at the limit are dropped.
    ///
    /// By default, free lists are unbounded.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::num::NonZero;
    ///
    /// use recycle_pool::LocalObjectPool;
    ///
    /// let pool = LocalObjectPool::builder()
    ///     .max_idle_per_type(NonZero::new(16).unwrap())
    ///     .build();
    /// ```
    pub fn max_idle_per_type(mut self, max_idle: NonZero<usize>) -> Self {
        self.max_idle_per_type = Some(max_idle);
        self
    }

    /// Builds the pool with the specified configuration.
    ///
    /// # Examples
    ///
    /// ```
    /// use recycle_pool::LocalObjectPool;
    ///
    /// let pool = LocalObjectPool::builder().build();
    /// ```
    #[must_use]
    pub fn build(self) -> LocalObjectPool {
        LocalObjectPool::new_inner(self.drop_policy, self.max_idle_per_type)
    }
}
