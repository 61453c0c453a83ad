//! Version and page snapshot records.

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use folio_types::{ContentHash, Metadata, PageId, PageName, ProjectName, VersionId};

use crate::error::{GraphError, GraphResult};

/// One page entry of a version's snapshot.
///
/// Page identity across versions is tied only by name: an update that
/// changes the content of `about` keeps its `id`, while deleting `about` and
/// adding it again later yields a fresh `id`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PageMeta {
    pub id: PageId,
    pub name: PageName,
    /// Content address of the page body at this version.
    pub hash: ContentHash,
    #[serde(default)]
    pub metadata: Metadata,
}

impl PageMeta {
    /// A new page with a fresh identity.
    pub fn new(name: PageName, hash: ContentHash, metadata: Metadata) -> Self {
        Self {
            id: PageId::new(),
            name,
            hash,
            metadata,
        }
    }
}

/// An immutable snapshot of a project's full page set.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Version {
    pub id: VersionId,
    pub project_name: ProjectName,
    /// The version this one was derived from; `None` for a project's first
    /// version.
    pub parent_id: Option<VersionId>,
    pub pages: Vec<PageMeta>,
    pub created_at: DateTime<Utc>,
}

impl Version {
    /// Build a new version with a freshly generated id.
    pub fn new(
        project_name: ProjectName,
        parent_id: Option<VersionId>,
        pages: Vec<PageMeta>,
    ) -> Self {
        let created_at = Utc::now();
        Self {
            id: VersionId::generate_at(created_at),
            project_name,
            parent_id,
            pages,
            created_at,
        }
    }

    /// Returns `true` if this is the first version of its project.
    pub fn is_root(&self) -> bool {
        self.parent_id.is_none()
    }

    /// Look up a page by name.
    pub fn page(&self, name: &str) -> Option<&PageMeta> {
        self.pages.iter().find(|p| p.name.as_str() == name)
    }

    pub fn summary(&self) -> VersionSummary {
        VersionSummary {
            id: self.id.clone(),
            created_at: self.created_at,
            parent_id: self.parent_id.clone(),
        }
    }

    /// Check the invariants a version must satisfy before it is appended.
    ///
    /// `parent` is the resolved parent record, or `None` if `parent_id` did
    /// not resolve.
    pub(crate) fn check_append(&self, parent: Option<&Version>) -> GraphResult<()> {
        let mut seen = HashSet::with_capacity(self.pages.len());
        for page in &self.pages {
            if !seen.insert(page.name.as_str()) {
                return Err(GraphError::DuplicatePageName {
                    version: self.id.clone(),
                    name: page.name.clone(),
                });
            }
        }

        match (&self.parent_id, parent) {
            (None, _) => Ok(()),
            (Some(parent_id), None) => Err(GraphError::DanglingParent {
                version: self.id.clone(),
                parent: parent_id.clone(),
            }),
            (Some(parent_id), Some(parent)) if parent.project_name != self.project_name => {
                Err(GraphError::CrossProjectParent {
                    version: self.id.clone(),
                    project: self.project_name.clone(),
                    parent: parent_id.clone(),
                    parent_project: parent.project_name.clone(),
                })
            }
            (Some(_), Some(_)) => Ok(()),
        }
    }
}

/// Listing entry for a version: id, timestamp and parent link.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct VersionSummary {
    pub id: VersionId,
    pub created_at: DateTime<Utc>,
    pub parent_id: Option<VersionId>,
}
