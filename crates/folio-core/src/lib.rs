//! Versioned, content-addressed project store for Folio.
//!
//! [`ProjectStore`] composes the blob store, the version graph and the
//! project registry into the create / read / update / list operations of a
//! multi-tenant document host. Every update is copy-on-write: the live
//! version's page list is copied, the requested page diffs are applied to the
//! copy, the result is appended as a new immutable version, and the project's
//! live pointer is moved to it with a compare-and-swap.
//!
//! The [`resolve`] module maps external addresses (`project[_version]` plus a
//! page name) to page bytes, and [`import`] loads a directory of HTML files
//! as a project.

pub mod config;
pub mod diff;
pub mod error;
pub mod import;
pub mod resolve;
pub mod store;
pub mod view;

pub use config::ProjectStoreConfig;
pub use diff::{NewPage, PageChange, PageDiff};
pub use error::{ProjectError, ProjectResult};
pub use import::{import_directory, ImportReport};
pub use resolve::{route_host, HostRoute, ProjectSelector, ResolvedPage, SiteAddress, DEFAULT_PAGE};
pub use store::ProjectStore;
pub use view::ProjectView;

// Re-export key types
pub use folio_registry::Project;
pub use folio_types::{ContentHash, Metadata, PageId, PageName, ProjectName, VersionId};
pub use folio_versions::{PageMeta, Version, VersionSummary};
