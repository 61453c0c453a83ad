use std::path::Path;
use std::sync::Arc;

use bytes::Bytes;
use tracing::{debug, error, info, warn};

use folio_registry::{
    FsProjectRegistry, InMemoryProjectRegistry, Project, ProjectRegistry, RegistryError,
};
use folio_store::{BlobStore, FsBlobStore, InMemoryBlobStore};
use folio_types::{ContentHash, ProjectName, VersionId};
use folio_versions::{FsVersionGraph, InMemoryVersionGraph, Version, VersionGraph, VersionSummary};

use crate::config::ProjectStoreConfig;
use crate::diff::{self, NewPage, PageDiff};
use crate::error::{ProjectError, ProjectResult};
use crate::resolve::{ResolvedPage, SiteAddress, DEFAULT_PAGE};
use crate::view::ProjectView;

/// The versioned, content-addressed project store.
///
/// All state lives in the three backends; clones share them.
#[derive(Clone)]
pub struct ProjectStore {
    blobs: Arc<dyn BlobStore>,
    registry: Arc<dyn ProjectRegistry>,
    versions: Arc<dyn VersionGraph>,
    config: ProjectStoreConfig,
}

impl ProjectStore {
    pub fn new(
        blobs: Arc<dyn BlobStore>,
        registry: Arc<dyn ProjectRegistry>,
        versions: Arc<dyn VersionGraph>,
        config: ProjectStoreConfig,
    ) -> Self {
        Self {
            blobs,
            registry,
            versions,
            config,
        }
    }

    /// A store whose backends all live in memory.
    pub fn in_memory() -> Self {
        Self::new(
            Arc::new(InMemoryBlobStore::new()),
            Arc::new(InMemoryProjectRegistry::new()),
            Arc::new(InMemoryVersionGraph::new()),
            ProjectStoreConfig::default(),
        )
    }

    /// Open a durable store under `data_dir`, creating it if necessary.
    ///
    /// Blobs go to `blobs/`, version records to `versions/` and project
    /// records to `registry/`.
    pub fn open(data_dir: impl AsRef<Path>, config: ProjectStoreConfig) -> ProjectResult<Self> {
        let data_dir = data_dir.as_ref();
        let blobs = FsBlobStore::open(data_dir.join("blobs"))?;
        let versions = FsVersionGraph::open(data_dir.join("versions"))?;
        let registry = FsProjectRegistry::open(data_dir.join("registry"))?;
        info!(path = ?data_dir, "opened project store");
        Ok(Self::new(
            Arc::new(blobs),
            Arc::new(registry),
            Arc::new(versions),
            config,
        ))
    }

    pub fn with_config(mut self, config: ProjectStoreConfig) -> Self {
        self.config = config;
        self
    }

    pub fn config(&self) -> &ProjectStoreConfig {
        &self.config
    }

    // ---- Mutations ----

    /// Create a project whose first version holds `pages`.
    ///
    /// Pages are applied in order like a list of puts onto an empty
    /// snapshot, so a repeated page name keeps the last body given.
    pub fn create_project(&self, name: &str, pages: Vec<NewPage>) -> ProjectResult<ProjectView> {
        let name = ProjectName::new(name)?;
        if self.registry.exists(&name)? {
            return Err(ProjectError::DuplicateName(name.to_string()));
        }

        let diffs: Vec<PageDiff> = pages.into_iter().map(PageDiff::from).collect();
        let prepared = diff::prepare(self.blobs.as_ref(), &diffs)?;
        let version = Version::new(name.clone(), None, diff::apply(&[], &prepared));
        self.versions.append(&version)?;

        let project = Project::new(name, version.id.clone());
        self.registry.create(&project)?;

        info!(
            project = %project.name,
            version = %version.id,
            pages = version.pages.len(),
            "created project"
        );
        Ok(ProjectView::compose(project, version))
    }

    /// Apply `diffs` to the live version and make the result live.
    ///
    /// The new version's parent is the live version that was read. If another
    /// writer moves the live pointer first, the diffs are re-applied to the
    /// newer snapshot, up to `update_attempts` times in total; after that the
    /// conflict is returned as [`ProjectError::ConcurrentModification`].
    pub fn update_project(&self, name: &str, diffs: &[PageDiff]) -> ProjectResult<ProjectView> {
        let name = self.known_name(name)?;
        // Nothing is written for a project that does not exist.
        self.project_record(&name)?;
        let prepared = diff::prepare(self.blobs.as_ref(), diffs)?;
        let attempts = self.config.update_attempts.max(1);

        let mut attempt = 1;
        loop {
            let project = self.project_record(&name)?;
            let live = self.version_of(&project, &project.live_version_id)?;

            let version = Version::new(
                name.clone(),
                Some(live.id.clone()),
                diff::apply(&live.pages, &prepared),
            );
            self.versions.append(&version)?;

            match self
                .registry
                .compare_and_swap(&name, &live.id, &version.id)
            {
                Ok(project) => {
                    info!(
                        project = %name,
                        parent = %live.id,
                        version = %version.id,
                        pages = version.pages.len(),
                        "updated project"
                    );
                    return Ok(ProjectView::compose(project, version));
                }
                Err(RegistryError::ConcurrentModification { actual, .. }) if attempt < attempts => {
                    warn!(
                        project = %name,
                        expected = %live.id,
                        actual = %actual,
                        attempt,
                        "live version moved during update, retrying"
                    );
                    attempt += 1;
                }
                Err(e) => return Err(e.into()),
            }
        }
    }

    // ---- Reads ----

    /// The project at `version`, or at its live version when `None`.
    pub fn get_project(&self, name: &str, version: Option<&VersionId>) -> ProjectResult<ProjectView> {
        let name = self.known_name(name)?;
        let project = self.project_record(&name)?;
        let version_id = version.unwrap_or(&project.live_version_id).clone();
        let version = self.version_of(&project, &version_id)?;
        Ok(ProjectView::compose(project, version))
    }

    /// All projects, ordered by name.
    pub fn list_projects(&self) -> ProjectResult<Vec<Project>> {
        Ok(self.registry.list()?)
    }

    pub fn project_exists(&self, name: &str) -> ProjectResult<bool> {
        match ProjectName::new(name) {
            Ok(name) => Ok(self.registry.exists(&name)?),
            Err(_) => Ok(false),
        }
    }

    /// The project's version history, newest first: the live version and
    /// its chain of parents down to the first version.
    pub fn list_project_versions(&self, name: &str) -> ProjectResult<Vec<VersionSummary>> {
        let name = self.known_name(name)?;
        let project = self.project_record(&name)?;
        Ok(self.versions.history(&project.live_version_id)?)
    }

    /// Fetch a blob by content hash.
    pub fn get_content(&self, hash: &ContentHash) -> ProjectResult<Bytes> {
        self.blobs
            .get(hash)?
            .ok_or(ProjectError::ContentNotFound(*hash))
    }

    /// Fetch the body of one page, at `version` or at the live version.
    pub fn page_content(
        &self,
        project: &str,
        page: &str,
        version: Option<&VersionId>,
    ) -> ProjectResult<Bytes> {
        let address = SiteAddress::new(project, version.cloned(), Some(page.to_string()));
        Ok(self.resolve(&address)?.content)
    }

    /// Resolve an external address to a page and its bytes.
    ///
    /// A page whose hash has no blob is reported as
    /// [`ProjectError::ContentMissing`] and logged as a correctness fault.
    pub fn resolve(&self, address: &SiteAddress) -> ProjectResult<ResolvedPage> {
        let view = self.get_project(&address.selector.project, address.selector.version.as_ref())?;
        let page_name = address.page.as_deref().unwrap_or(DEFAULT_PAGE);

        let page = view
            .page(page_name)
            .cloned()
            .ok_or_else(|| ProjectError::PageNotFound {
                project: view.project.name.to_string(),
                version: view.version.id.clone(),
                page: page_name.to_string(),
            })?;

        let Some(content) = self.blobs.get(&page.hash)? else {
            error!(
                project = %view.project.name,
                version = %view.version.id,
                page = %page.name,
                hash = %page.hash,
                "page references content missing from the blob store"
            );
            return Err(ProjectError::ContentMissing {
                project: view.project.name.to_string(),
                page: page.name.to_string(),
                hash: page.hash,
            });
        };

        debug!(project = %view.project.name, page = %page.name, size = content.len(), "resolved page");
        Ok(ResolvedPage {
            project: view.project.name,
            version_id: view.version.id,
            page,
            content,
        })
    }

    // ---- Internals ----

    /// A name that fails the grammar cannot belong to any project.
    fn known_name(&self, name: &str) -> ProjectResult<ProjectName> {
        ProjectName::new(name).map_err(|_| ProjectError::ProjectNotFound(name.to_string()))
    }

    fn project_record(&self, name: &ProjectName) -> ProjectResult<Project> {
        self.registry
            .get(name)?
            .ok_or_else(|| ProjectError::ProjectNotFound(name.to_string()))
    }

    fn version_of(&self, project: &Project, id: &VersionId) -> ProjectResult<Version> {
        match self.versions.get(id)? {
            Some(version) if version.project_name == project.name => Ok(version),
            _ => Err(ProjectError::VersionNotFound {
                project: project.name.to_string(),
                version: id.to_string(),
            }),
        }
    }
}

impl std::fmt::Debug for ProjectStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProjectStore")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
