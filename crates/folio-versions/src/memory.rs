//! In-memory version graph.
//!
//! [`InMemoryVersionGraph`] keeps every version in a `HashMap` and maintains
//! a per-project append index and a forward-edge index (`children`) for
//! descendant queries, all behind one `RwLock` so an append updates the
//! indexes atomically.

use std::collections::HashMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use folio_types::{ProjectName, VersionId};
use tracing::debug;

use crate::error::{GraphError, GraphResult};
use crate::traits::VersionGraph;
use crate::version::{Version, VersionSummary};

#[derive(Debug, Default)]
struct GraphState {
    /// All versions, keyed by id.
    versions: HashMap<VersionId, Version>,
    /// Append order per project.
    by_project: HashMap<ProjectName, Vec<VersionId>>,
    /// Forward-edge index: parent -> children.
    children: HashMap<VersionId, Vec<VersionId>>,
}

/// An in-memory implementation of [`VersionGraph`].
#[derive(Debug, Default)]
pub struct InMemoryVersionGraph {
    inner: RwLock<GraphState>,
}

impl InMemoryVersionGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Total number of versions across all projects.
    pub fn len(&self) -> usize {
        self.inner
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .versions
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn read_state(&self) -> GraphResult<RwLockReadGuard<'_, GraphState>> {
        self.inner
            .read()
            .map_err(|e| GraphError::LockPoisoned(e.to_string()))
    }

    fn write_state(&self) -> GraphResult<RwLockWriteGuard<'_, GraphState>> {
        self.inner
            .write()
            .map_err(|e| GraphError::LockPoisoned(e.to_string()))
    }
}

impl VersionGraph for InMemoryVersionGraph {
    fn append(&self, version: &Version) -> GraphResult<()> {
        let mut state = self.write_state()?;
        if state.versions.contains_key(&version.id) {
            return Err(GraphError::DuplicateVersion(version.id.clone()));
        }

        let parent = version
            .parent_id
            .as_ref()
            .and_then(|id| state.versions.get(id));
        version.check_append(parent)?;

        if let Some(parent_id) = &version.parent_id {
            state
                .children
                .entry(parent_id.clone())
                .or_default()
                .push(version.id.clone());
        }
        state
            .by_project
            .entry(version.project_name.clone())
            .or_default()
            .push(version.id.clone());
        state.versions.insert(version.id.clone(), version.clone());

        debug!(
            version = %version.id,
            project = %version.project_name,
            pages = version.pages.len(),
            "appended version"
        );
        Ok(())
    }

    fn get(&self, id: &VersionId) -> GraphResult<Option<Version>> {
        Ok(self.read_state()?.versions.get(id).cloned())
    }

    fn versions_of(&self, project: &ProjectName) -> GraphResult<Vec<VersionSummary>> {
        let state = self.read_state()?;
        let Some(ids) = state.by_project.get(project) else {
            return Ok(Vec::new());
        };
        Ok(ids
            .iter()
            .rev()
            .filter_map(|id| state.versions.get(id))
            .map(Version::summary)
            .collect())
    }

    fn children(&self, id: &VersionId) -> GraphResult<Vec<VersionId>> {
        Ok(self
            .read_state()?
            .children
            .get(id)
            .cloned()
            .unwrap_or_default())
    }

    fn contains(&self, id: &VersionId) -> GraphResult<bool> {
        Ok(self.read_state()?.versions.contains_key(id))
    }
}
