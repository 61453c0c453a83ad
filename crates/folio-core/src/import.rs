//! Bootstrap importer: load a directory of HTML files as a project.
//!
//! The project is named after the directory. Every `*.html` file becomes a
//! page named after its file stem; a sibling `<stem>.md` file, if present,
//! is stored as the page's `spec` metadata. Importing into an existing
//! project applies the files as an update, so pages not present in the
//! directory are kept.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use folio_types::{Metadata, ProjectName, VersionId};
use serde::Serialize;
use tracing::{debug, info};

use crate::diff::{NewPage, PageDiff};
use crate::error::{ProjectError, ProjectResult};
use crate::store::ProjectStore;

/// Metadata key holding the text of a page's companion `.md` file.
pub const SPEC_METADATA_KEY: &str = "spec";

/// Outcome of importing one directory.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ImportReport {
    pub project: ProjectName,
    pub version_id: VersionId,
    pub pages: usize,
    /// `false` if an existing project was updated.
    pub created: bool,
}

/// Import `dir` into `store`.
pub fn import_directory(store: &ProjectStore, dir: impl AsRef<Path>) -> ProjectResult<ImportReport> {
    let dir = dir.as_ref();
    let name = project_name_for(dir)?;
    let pages = read_pages(dir)?;
    let count = pages.len();

    let (view, created) = if store.project_exists(&name)? {
        let diffs: Vec<PageDiff> = pages.into_iter().map(PageDiff::from).collect();
        (store.update_project(&name, &diffs)?, false)
    } else {
        (store.create_project(&name, pages)?, true)
    };

    info!(
        project = %view.project.name,
        version = %view.version.id,
        pages = count,
        created,
        "imported directory"
    );
    Ok(ImportReport {
        project: view.project.name,
        version_id: view.version.id,
        pages: count,
        created,
    })
}

fn project_name_for(dir: &Path) -> ProjectResult<String> {
    let canonical = dir.canonicalize().map_err(|source| ProjectError::Import {
        path: dir.to_path_buf(),
        source,
    })?;
    canonical
        .file_name()
        .and_then(|n| n.to_str())
        .map(str::to_string)
        .ok_or_else(|| ProjectError::InvalidName {
            name: canonical.display().to_string(),
            reason: "directory has no usable name".into(),
        })
}

/// Read every `*.html` page of `dir`, in file name order.
fn read_pages(dir: &Path) -> ProjectResult<Vec<NewPage>> {
    let mut html: Vec<PathBuf> = Vec::new();
    for entry in fs::read_dir(dir).map_err(import_error(dir))? {
        let path = entry.map_err(import_error(dir))?.path();
        if path.is_file() && path.extension().is_some_and(|e| e == "html") {
            html.push(path);
        }
    }
    html.sort();

    let mut pages = Vec::with_capacity(html.len());
    for path in html {
        let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
            continue;
        };
        let content = fs::read(&path).map_err(import_error(&path))?;

        let mut metadata = Metadata::new();
        let spec_path = path.with_extension("md");
        if spec_path.is_file() {
            let spec = fs::read_to_string(&spec_path).map_err(import_error(&spec_path))?;
            metadata.insert(SPEC_METADATA_KEY.to_string(), spec.into());
        }

        debug!(page = stem, size = content.len(), "read page");
        pages.push(NewPage::new(stem, content).with_metadata(metadata));
    }
    Ok(pages)
}

fn import_error(path: &Path) -> impl FnOnce(io::Error) -> ProjectError {
    let path = path.to_path_buf();
    move |source| ProjectError::Import { path, source }
}
