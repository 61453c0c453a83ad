use folio_registry::Project;
use folio_versions::{PageMeta, Version, VersionSummary};
use serde::{Deserialize, Serialize};

/// A project as seen at one version: the project record, the version's
/// summary and that version's full page list.
///
/// Pages carry content hashes, never content; bodies are fetched separately
/// by hash.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ProjectView {
    pub project: Project,
    pub version: VersionSummary,
    pub pages: Vec<PageMeta>,
}

impl ProjectView {
    pub(crate) fn compose(project: Project, version: Version) -> Self {
        Self {
            project,
            version: version.summary(),
            pages: version.pages,
        }
    }

    /// Look up a page of this view by name.
    pub fn page(&self, name: &str) -> Option<&PageMeta> {
        self.pages.iter().find(|p| p.name.as_str() == name)
    }

    /// Returns `true` if this view shows the project's live version.
    pub fn is_live(&self) -> bool {
        self.project.live_version_id == self.version.id
    }
}
