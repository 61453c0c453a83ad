//! The project record.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use folio_types::{ProjectName, VersionId};

/// A named collection of pages with one designated live version.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    /// Unique, immutable project name.
    pub name: ProjectName,
    /// The version currently considered current for this project. Only
    /// [`ProjectRegistry::compare_and_swap`](crate::ProjectRegistry::compare_and_swap)
    /// changes it.
    pub live_version_id: VersionId,
    pub created_at: DateTime<Utc>,
}

impl Project {
    pub fn new(name: ProjectName, live_version_id: VersionId) -> Self {
        Self {
            name,
            live_version_id,
            created_at: Utc::now(),
        }
    }
}
