//! Project registry for Folio.
//!
//! The registry maps a project name to the id of its *live* version, the
//! version currently served for the project. It is the only mutable state in
//! the system besides append-only stores, and it changes through exactly one
//! operation: [`ProjectRegistry::compare_and_swap`].
//!
//! # Architecture
//!
//! - **Creation** is create-if-absent: two concurrent creations of the same
//!   name produce one winner and one [`RegistryError::AlreadyExists`].
//! - **Live pointer moves** are compare-and-swap keyed by the version the
//!   writer read. A writer whose expectation is stale gets
//!   [`RegistryError::ConcurrentModification`] instead of silently
//!   overwriting a newer pointer, which rules out lost updates.
//! - Project names are immutable and projects are never deleted.

pub mod error;
pub mod fs;
pub mod memory;
pub mod traits;
pub mod types;

pub use error::{RegistryError, RegistryResult};
pub use fs::FsProjectRegistry;
pub use memory::InMemoryProjectRegistry;
pub use traits::ProjectRegistry;
pub use types::Project;
