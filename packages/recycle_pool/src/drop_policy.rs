/// Determines what happens when a pool is dropped while pool-aware objects it issued are still
/// checked out.
///
/// By default, the pool may be dropped at any time. Objects that are still checked out keep
/// their pool instance alive and can still be released afterwards.
///
/// # Examples
///
/// ```
/// use recycle_pool::{DropPolicy, LocalObjectPool};
///
/// // The drop policy is set at pool creation time.
/// let pool = LocalObjectPool::builder()
///     .drop_policy(DropPolicy::MustNotDropItems)
///     .build();
/// ```
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
#[non_exhaustive]
pub enum DropPolicy {
    /// The pool may be dropped while objects are still checked out. This is the default.
    #[default]
    MayDropItems,

    /// The pool will panic if it is dropped while any pool-aware object it issued is still
    /// checked out.
    ///
    /// This is useful for catching leaked or forgotten objects in tests and in code where every
    /// object is expected to be released before the owning scope ends.
    MustNotDropItems,
}
