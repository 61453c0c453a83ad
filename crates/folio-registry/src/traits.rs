//! The [`ProjectRegistry`] trait defining the registry storage interface.

use folio_types::{ProjectName, VersionId};

use crate::error::RegistryResult;
use crate::types::Project;

/// Storage backend for project records.
///
/// Implementations must be thread-safe (`Send + Sync`) and make `create`
/// and `compare_and_swap` atomic with respect to each other.
pub trait ProjectRegistry: Send + Sync {
    /// Read a project by name. Returns `Ok(None)` if it does not exist.
    fn get(&self, name: &ProjectName) -> RegistryResult<Option<Project>>;

    /// Insert a new project record.
    ///
    /// Fails with [`RegistryError::AlreadyExists`](crate::RegistryError::AlreadyExists)
    /// if the name is taken; the existing record is left untouched.
    fn create(&self, project: &Project) -> RegistryResult<()>;

    /// Move `name`'s live pointer from `expected` to `new`.
    ///
    /// Fails with [`RegistryError::ConcurrentModification`](crate::RegistryError::ConcurrentModification)
    /// if the live pointer is no longer `expected`, and with
    /// [`RegistryError::NotFound`](crate::RegistryError::NotFound) if the
    /// project does not exist. Returns the updated record.
    fn compare_and_swap(
        &self,
        name: &ProjectName,
        expected: &VersionId,
        new: &VersionId,
    ) -> RegistryResult<Project>;

    /// All projects, ordered by name.
    fn list(&self) -> RegistryResult<Vec<Project>>;

    fn exists(&self, name: &ProjectName) -> RegistryResult<bool> {
        Ok(self.get(name)?.is_some())
    }
}
