//! In-memory storage capability for the restless response cache.
//!
//! [`MokaBackend`] keeps serialized responses in a bounded, concurrent
//! [Moka](https://docs.rs/moka) cache. Entries are evicted only for capacity;
//! expired entries stay until the response store prunes them on read.
//!
//! ```
//! use restless_backend::ResponseStore;
//! use restless_moka::MokaBackend;
//!
//! let backend = MokaBackend::builder().max_entries(10_000).build();
//! let store = ResponseStore::new(backend);
//! ```
#![warn(missing_docs)]

mod backend;
mod builder;

pub use backend::MokaBackend;
pub use builder::{ByteCapacity, EntryCapacity, MokaBackendBuilder, NoCapacity};
pub use moka::policy::EvictionPolicy;
