//! Storage side of the restless client cache.
//!
//! - [`Backend`] is the optional persistent-cache capability: raw reads,
//!   writes and removals of serialized entries.
//! - [`NoopBackend`] stands in when no such capability exists; every read
//!   misses and every write is dropped, so the client always goes to the network.
//! - [`ResponseStore`] decides what gets stored, serves lookups and prunes
//!   expired entries on read.
//!
//! If you want to plug in your own storage, implement [`Backend`].
mod backend;
mod error;
pub mod format;
mod locks;
pub mod metrics;
mod noop;
pub mod store;
mod value;

pub use backend::{Backend, BackendResult};
pub use error::BackendError;
pub use format::{Format, FormatError, JsonFormat};
pub use locks::{KeyGuard, KeyLocks};
pub use noop::NoopBackend;
pub use store::{Lookup, ResponseStore};
pub use value::CacheValue;

/// Status of deleting result.
#[derive(Debug, PartialEq, Eq)]
pub enum DeleteStatus {
    /// Record successfully deleted.
    Deleted(u32),
    /// Record already missing.
    Missing,
}
