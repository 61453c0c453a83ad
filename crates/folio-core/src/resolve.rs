//! External addressing: from hostnames and paths to pages.
//!
//! A project is addressed by a hostname label under the base domain:
//!
//! ```text
//! docs.example.com              live version of project "docs"
//! docs_k3x9a0c4f2m8q1z.example.com  version k3x9a0c4f2m8q1z of "docs"
//! api.example.com               the API host
//! example.com                   the apex
//! ```
//!
//! The path names the page; an empty path selects [`DEFAULT_PAGE`]. Project
//! names never contain `_` and version ids never contain `_` either, so the
//! first `_` in a label is always the separator.

use std::fmt;
use std::str::FromStr;

use bytes::Bytes;
use folio_types::{ProjectName, VersionId, API_LABEL};
use folio_versions::PageMeta;

use crate::error::{ProjectError, ProjectResult};

/// Page served when an address names no page.
pub const DEFAULT_PAGE: &str = "index";

/// `project` or `project_version`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProjectSelector {
    pub project: String,
    pub version: Option<VersionId>,
}

impl ProjectSelector {
    pub fn live(project: impl Into<String>) -> Self {
        Self {
            project: project.into(),
            version: None,
        }
    }

    pub fn pinned(project: impl Into<String>, version: VersionId) -> Self {
        Self {
            project: project.into(),
            version: Some(version),
        }
    }
}

impl FromStr for ProjectSelector {
    type Err = ProjectError;

    /// A label that cannot name a project or version resolves to nothing,
    /// so parse failures are reported as not-found rather than as bad input.
    fn from_str(label: &str) -> ProjectResult<Self> {
        let (project, version) = match label.split_once('_') {
            Some((project, version)) => (project, Some(version)),
            None => (label, None),
        };

        if ProjectName::new(project).is_err() {
            return Err(ProjectError::ProjectNotFound(project.to_string()));
        }
        let version = version
            .map(|v| {
                VersionId::parse(v).map_err(|_| ProjectError::VersionNotFound {
                    project: project.to_string(),
                    version: v.to_string(),
                })
            })
            .transpose()?;

        Ok(Self {
            project: project.to_string(),
            version,
        })
    }
}

impl fmt::Display for ProjectSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.version {
            Some(version) => write!(f, "{}_{}", self.project, version),
            None => f.write_str(&self.project),
        }
    }
}

/// A fully parsed external address.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SiteAddress {
    pub selector: ProjectSelector,
    /// `None` selects [`DEFAULT_PAGE`].
    pub page: Option<String>,
}

impl SiteAddress {
    pub fn new(project: impl Into<String>, version: Option<VersionId>, page: Option<String>) -> Self {
        Self {
            selector: ProjectSelector {
                project: project.into(),
                version,
            },
            page,
        }
    }

    /// Build an address from a project selector and a request path.
    ///
    /// Leading and trailing slashes are ignored and an empty path selects
    /// the default page.
    pub fn from_path(selector: ProjectSelector, path: &str) -> Self {
        let page = path.trim_matches('/');
        Self {
            selector,
            page: (!page.is_empty()).then(|| page.to_string()),
        }
    }

    pub fn page_name(&self) -> &str {
        self.page.as_deref().unwrap_or(DEFAULT_PAGE)
    }
}

/// What a request's `Host` header addresses.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum HostRoute {
    /// `api.<base>`.
    Api,
    /// `<base>` itself.
    Apex,
    /// `<project>[_<version>].<base>`.
    Project(ProjectSelector),
    /// A host outside the base domain.
    Foreign,
}

/// Classify a `Host` header value against `base_domain`.
///
/// Matching is case-insensitive and ignores a trailing port. Only a single
/// label under the base domain addresses a project.
pub fn route_host(host: &str, base_domain: &str) -> ProjectResult<HostRoute> {
    let host = strip_port(host).trim_end_matches('.').to_ascii_lowercase();
    let base = base_domain.trim_end_matches('.').to_ascii_lowercase();

    if host == base {
        return Ok(HostRoute::Apex);
    }
    let Some(label) = host
        .strip_suffix(base.as_str())
        .and_then(|rest| rest.strip_suffix('.'))
    else {
        return Ok(HostRoute::Foreign);
    };

    if label.is_empty() || label.contains('.') {
        return Ok(HostRoute::Foreign);
    }
    if label == API_LABEL {
        return Ok(HostRoute::Api);
    }
    label.parse().map(HostRoute::Project)
}

fn strip_port(host: &str) -> &str {
    match host.rsplit_once(':') {
        Some((name, port)) if port.bytes().all(|b| b.is_ascii_digit()) => name,
        _ => host,
    }
}

/// A page located by [`ProjectStore::resolve`](crate::ProjectStore::resolve).
#[derive(Clone, Debug, PartialEq)]
pub struct ResolvedPage {
    pub project: ProjectName,
    pub version_id: VersionId,
    pub page: PageMeta,
    pub content: Bytes,
}
