//! Foundation types for Folio.
//!
//! Folio hosts projects made of named pages. Every mutation of a project
//! produces a new immutable version of its page set, and page bodies are
//! stored by content hash. This crate provides the identifiers and names
//! shared by every other Folio crate.
//!
//! # Key Types
//!
//! - [`ContentHash`] -- SHA-256 content address of a page body
//! - [`VersionId`] -- hostname-safe version identifier (coarse timestamp + random suffix)
//! - [`PageId`] -- UUID v7 identity of a page, stable across versions
//! - [`ProjectName`] -- validated project name (`[a-z0-9-]+`)
//! - [`PageName`] -- validated page name
//! - [`Metadata`] -- ordered, schema-less page metadata

pub mod error;
pub mod hash;
pub mod id;
pub mod metadata;
pub mod name;

pub use error::TypeError;
pub use hash::ContentHash;
pub use id::{PageId, VersionId};
pub use metadata::Metadata;
pub use name::{validate_page_name, validate_project_name, API_LABEL, PageName, ProjectName};
