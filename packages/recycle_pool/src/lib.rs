#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! This package provides [`LocalObjectPool`], an object pool that recycles objects of any type
//! without forcing them into a common base type.
//!
//! Types opt into recycling by implementing [`PoolObject`]. Such "pool-aware" objects are marked
//! with the pool instance that issued them and, when released, are reset and pushed back onto the
//! free list of that same instance instead of being freed. Every other type ("plain objects")
//! is still accepted by the pool, which then degrades gracefully to ordinary heap allocation.
//!
//! The choice between the two behaviors is made at compile time through the [`Reflect`] trait,
//! so there is no virtual dispatch or runtime type check on the allocation path.
//!
//! # Features
//!
//! - **Heterogeneous types**: one pool serves any number of object types, each with its own
//!   lazily created pool instance.
//! - **Opt-in recycling**: pool-aware types are reused, plain types are simply heap-allocated.
//! - **Fail-fast ownership checks**: releasing an object to a pool that did not issue it panics.
//! - **Thread-confined**: pools are neither [`Send`] nor [`Sync`]; each thread gets its own
//!   default pool via the [`current`] module.
//! - **Optional leak detection**: a pool can be configured to panic on drop if pool-aware objects
//!   are still checked out.
//!
//! # Example
//!
//! ```rust
//! use recycle_pool::{LocalObjectPool, PoolLink, PoolObject};
//!
//! #[derive(Default)]
//! struct Message {
//!     payload: Vec<u8>,
//!     link: PoolLink<Self>,
//! }
//!
//! impl PoolObject for Message {
//!     fn pool_link(&self) -> &PoolLink<Self> {
//!         &self.link
//!     }
//!
//!     fn pool_link_mut(&mut self) -> &mut PoolLink<Self> {
//!         &mut self.link
//!     }
//!
//!     fn reset(&mut self) {
//!         self.payload.clear();
//!     }
//! }
//!
//! let pool = LocalObjectPool::new();
//!
//! let mut message = pool.acquire::<Message>();
//! message.payload.extend_from_slice(b"hello");
//! pool.release(message);
//!
//! // The released object is handed out again, already reset.
//! let message = pool.acquire::<Message>();
//! assert!(message.payload.is_empty());
//! assert_eq!(pool.stats::<Message>().created, 1);
//! assert_eq!(pool.stats::<Message>().reused, 1);
//! # pool.release(message);
//! ```
//!
//! Plain types work with the same API but are never recycled:
//!
//! ```rust
//! use recycle_pool::LocalObjectPool;
//!
//! let pool = LocalObjectPool::new();
//!
//! let numbers = pool.acquire::<Vec<u32>>();
//! pool.release(numbers);
//!
//! assert_eq!(pool.stats::<Vec<u32>>().reused, 0);
//! ```

mod builder;
mod capability;
pub mod current;
mod drop_policy;
mod instance;
mod lease;
mod pool;
pub mod reflection;

pub use builder::*;
pub use capability::*;
pub use drop_policy::*;
pub use instance::*;
pub use lease::*;
pub use pool::*;
pub use reflection::{Reflect, recycle, recycle_x};
