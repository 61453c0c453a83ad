//! Filesystem project registry.
//!
//! Layout under the root directory:
//!
//! ```text
//! <root>/projects/<name>.json   one JSON record per project
//! <root>/tmp/                   staging area for in-flight writes
//! ```
//!
//! Records are replaced by renaming a fully written temp file over the old
//! one, so readers always see a complete record. Creation links the temp
//! file without clobbering. The compare-and-swap read-check-write sequence
//! is serialized by an in-process lock; two processes sharing one data
//! directory are not coordinated.

use std::fs::{self, File};
use std::io::{self, BufReader, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use folio_types::{ProjectName, VersionId};
use tempfile::NamedTempFile;
use tracing::{debug, warn};

use crate::error::{RegistryError, RegistryResult};
use crate::traits::ProjectRegistry;
use crate::types::Project;

/// Registry backed by one JSON file per project.
#[derive(Debug)]
pub struct FsProjectRegistry {
    root: PathBuf,
    write_lock: Mutex<()>,
}

impl FsProjectRegistry {
    /// Open (creating if necessary) a registry rooted at `root`.
    pub fn open(root: impl AsRef<Path>) -> RegistryResult<Self> {
        let root = root.as_ref().to_path_buf();
        fs::create_dir_all(root.join("projects"))?;
        fs::create_dir_all(root.join("tmp"))?;
        Ok(Self {
            root,
            write_lock: Mutex::new(()),
        })
    }

    fn project_path(&self, name: &ProjectName) -> PathBuf {
        self.root.join("projects").join(format!("{name}.json"))
    }

    fn stage(&self, project: &Project) -> RegistryResult<NamedTempFile> {
        let mut staged = NamedTempFile::new_in(self.root.join("tmp"))?;
        serde_json::to_writer_pretty(&mut staged, project)?;
        staged.flush()?;
        staged.as_file().sync_all()?;
        Ok(staged)
    }
}

impl ProjectRegistry for FsProjectRegistry {
    fn get(&self, name: &ProjectName) -> RegistryResult<Option<Project>> {
        let file = match File::open(self.project_path(name)) {
            Ok(file) => file,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        Ok(Some(serde_json::from_reader(BufReader::new(file))?))
    }

    fn create(&self, project: &Project) -> RegistryResult<()> {
        let staged = self.stage(project)?;
        staged
            .persist_noclobber(self.project_path(&project.name))
            .map_err(|e| match e.error.kind() {
                io::ErrorKind::AlreadyExists => RegistryError::AlreadyExists(project.name.clone()),
                _ => RegistryError::Io(e.error),
            })?;
        debug!(project = %project.name, live = %project.live_version_id, "registered project");
        Ok(())
    }

    fn compare_and_swap(
        &self,
        name: &ProjectName,
        expected: &VersionId,
        new: &VersionId,
    ) -> RegistryResult<Project> {
        let _guard = self
            .write_lock
            .lock()
            .map_err(|e| RegistryError::LockPoisoned(e.to_string()))?;

        let mut project = self
            .get(name)?
            .ok_or_else(|| RegistryError::NotFound(name.clone()))?;
        if project.live_version_id != *expected {
            return Err(RegistryError::ConcurrentModification {
                name: name.clone(),
                expected: expected.clone(),
                actual: project.live_version_id,
            });
        }

        project.live_version_id = new.clone();
        self.stage(&project)?
            .persist(self.project_path(name))
            .map_err(|e| RegistryError::Io(e.error))?;
        debug!(project = %name, from = %expected, to = %new, "moved live pointer");
        Ok(project)
    }

    fn list(&self) -> RegistryResult<Vec<Project>> {
        let mut projects = Vec::new();
        for entry in fs::read_dir(self.root.join("projects"))? {
            let path = entry?.path();
            let name = path
                .file_stem()
                .and_then(|s| s.to_str())
                .and_then(|s| ProjectName::new(s).ok());
            match name {
                Some(name) if path.extension().is_some_and(|e| e == "json") => {
                    if let Some(project) = self.get(&name)? {
                        projects.push(project);
                    }
                }
                _ => warn!(path = ?path, "ignoring unexpected file in registry"),
            }
        }
        projects.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(projects)
    }
}
