//! Filesystem version graph.
//!
//! Layout under the root directory:
//!
//! ```text
//! <root>/versions/<id>.json        one immutable JSON record per version
//! <root>/projects/<project>/<id>   empty marker indexing versions by project
//! <root>/tmp/                      staging area for in-flight writes
//! ```
//!
//! A record is written to a temp file and linked into place without
//! clobbering, which makes the append atomic and rejects duplicate ids even
//! across processes.

use std::fs::{self, File};
use std::io::{self, BufReader, Write};
use std::path::{Path, PathBuf};

use folio_types::{ProjectName, VersionId};
use tempfile::NamedTempFile;
use tracing::{debug, warn};

use crate::error::{GraphError, GraphResult};
use crate::traits::VersionGraph;
use crate::version::{Version, VersionSummary};

/// Version graph backed by one JSON file per version.
#[derive(Debug, Clone)]
pub struct FsVersionGraph {
    root: PathBuf,
}

impl FsVersionGraph {
    /// Open (creating if necessary) a version graph rooted at `root`.
    pub fn open(root: impl AsRef<Path>) -> GraphResult<Self> {
        let root = root.as_ref().to_path_buf();
        for dir in ["versions", "projects", "tmp"] {
            fs::create_dir_all(root.join(dir))?;
        }
        Ok(Self { root })
    }

    fn version_path(&self, id: &VersionId) -> PathBuf {
        self.root.join("versions").join(format!("{id}.json"))
    }

    fn project_dir(&self, project: &ProjectName) -> PathBuf {
        self.root.join("projects").join(project.as_str())
    }

    fn load_all_of(&self, project: &ProjectName) -> GraphResult<Vec<Version>> {
        let dir = self.project_dir(project);
        let entries = match fs::read_dir(&dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let mut versions = Vec::new();
        for entry in entries {
            let entry = entry?;
            let file_name = entry.file_name();
            let Some(id) = file_name.to_str().and_then(|s| VersionId::parse(s).ok()) else {
                warn!(path = ?entry.path(), "ignoring unexpected file in project index");
                continue;
            };
            match self.get(&id)? {
                Some(version) => versions.push(version),
                None => warn!(version = %id, project = %project, "index marker without record"),
            }
        }
        Ok(versions)
    }
}

impl VersionGraph for FsVersionGraph {
    fn append(&self, version: &Version) -> GraphResult<()> {
        let parent = match &version.parent_id {
            Some(parent_id) => self.get(parent_id)?,
            None => None,
        };
        version.check_append(parent.as_ref())?;

        let mut staged = NamedTempFile::new_in(self.root.join("tmp"))?;
        serde_json::to_writer_pretty(&mut staged, version)?;
        staged.flush()?;
        staged.as_file().sync_all()?;
        staged
            .persist_noclobber(self.version_path(&version.id))
            .map_err(|e| match e.error.kind() {
                io::ErrorKind::AlreadyExists => GraphError::DuplicateVersion(version.id.clone()),
                _ => GraphError::Io(e.error),
            })?;

        let index_dir = self.project_dir(&version.project_name);
        fs::create_dir_all(&index_dir)?;
        File::create(index_dir.join(version.id.as_str()))?;

        debug!(
            version = %version.id,
            project = %version.project_name,
            pages = version.pages.len(),
            "appended version"
        );
        Ok(())
    }

    fn get(&self, id: &VersionId) -> GraphResult<Option<Version>> {
        let file = match File::open(self.version_path(id)) {
            Ok(file) => file,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        Ok(Some(serde_json::from_reader(BufReader::new(file))?))
    }

    fn versions_of(&self, project: &ProjectName) -> GraphResult<Vec<VersionSummary>> {
        let mut versions = self.load_all_of(project)?;
        versions.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| b.id.cmp(&a.id))
        });
        Ok(versions.iter().map(Version::summary).collect())
    }

    fn children(&self, id: &VersionId) -> GraphResult<Vec<VersionId>> {
        let Some(version) = self.get(id)? else {
            return Ok(Vec::new());
        };
        let mut children: Vec<VersionId> = self
            .load_all_of(&version.project_name)?
            .into_iter()
            .filter(|v| v.parent_id.as_ref() == Some(id))
            .map(|v| v.id)
            .collect();
        children.sort();
        Ok(children)
    }

    fn contains(&self, id: &VersionId) -> GraphResult<bool> {
        Ok(self.version_path(id).is_file())
    }
}
