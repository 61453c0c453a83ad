//! In-memory project registry for testing and ephemeral use.
//!
//! [`InMemoryProjectRegistry`] stores all projects in a `BTreeMap` protected
//! by a `RwLock`, which keeps listings ordered by name for free.

use std::collections::btree_map::Entry;
use std::collections::BTreeMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use folio_types::{ProjectName, VersionId};
use tracing::debug;

use crate::error::{RegistryError, RegistryResult};
use crate::traits::ProjectRegistry;
use crate::types::Project;

/// An in-memory implementation of [`ProjectRegistry`].
#[derive(Debug, Default)]
pub struct InMemoryProjectRegistry {
    projects: RwLock<BTreeMap<ProjectName, Project>>,
}

impl InMemoryProjectRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    fn read_map(&self) -> RegistryResult<RwLockReadGuard<'_, BTreeMap<ProjectName, Project>>> {
        self.projects
            .read()
            .map_err(|e| RegistryError::LockPoisoned(e.to_string()))
    }

    fn write_map(&self) -> RegistryResult<RwLockWriteGuard<'_, BTreeMap<ProjectName, Project>>> {
        self.projects
            .write()
            .map_err(|e| RegistryError::LockPoisoned(e.to_string()))
    }
}

impl ProjectRegistry for InMemoryProjectRegistry {
    fn get(&self, name: &ProjectName) -> RegistryResult<Option<Project>> {
        Ok(self.read_map()?.get(name).cloned())
    }

    fn create(&self, project: &Project) -> RegistryResult<()> {
        match self.write_map()?.entry(project.name.clone()) {
            Entry::Occupied(_) => Err(RegistryError::AlreadyExists(project.name.clone())),
            Entry::Vacant(slot) => {
                slot.insert(project.clone());
                debug!(project = %project.name, live = %project.live_version_id, "registered project");
                Ok(())
            }
        }
    }

    fn compare_and_swap(
        &self,
        name: &ProjectName,
        expected: &VersionId,
        new: &VersionId,
    ) -> RegistryResult<Project> {
        let mut projects = self.write_map()?;
        let project = projects
            .get_mut(name)
            .ok_or_else(|| RegistryError::NotFound(name.clone()))?;

        if project.live_version_id != *expected {
            return Err(RegistryError::ConcurrentModification {
                name: name.clone(),
                expected: expected.clone(),
                actual: project.live_version_id.clone(),
            });
        }

        project.live_version_id = new.clone();
        debug!(project = %name, from = %expected, to = %new, "moved live pointer");
        Ok(project.clone())
    }

    fn list(&self) -> RegistryResult<Vec<Project>> {
        Ok(self.read_map()?.values().cloned().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    fn name(s: &str) -> ProjectName {
        ProjectName::new(s).unwrap()
    }

    #[test]
    fn create_and_get() {
        let registry = InMemoryProjectRegistry::new();
        let project = Project::new(name("docs"), VersionId::generate());
        registry.create(&project).unwrap();
        assert_eq!(registry.get(&name("docs")).unwrap(), Some(project));
        assert!(registry.exists(&name("docs")).unwrap());
    }

    #[test]
    fn get_missing_is_none() {
        let registry = InMemoryProjectRegistry::new();
        assert!(registry.get(&name("ghost")).unwrap().is_none());
        assert!(!registry.exists(&name("ghost")).unwrap());
    }

    #[test]
    fn duplicate_create_leaves_first_untouched() {
        let registry = InMemoryProjectRegistry::new();
        let first = Project::new(name("dup"), VersionId::generate());
        registry.create(&first).unwrap();

        let second = Project::new(name("dup"), VersionId::generate());
        assert!(matches!(
            registry.create(&second),
            Err(RegistryError::AlreadyExists(n)) if n == name("dup")
        ));
        assert_eq!(registry.get(&name("dup")).unwrap(), Some(first));
    }

    #[test]
    fn compare_and_swap_moves_pointer() {
        let registry = InMemoryProjectRegistry::new();
        let v1 = VersionId::generate();
        let v2 = VersionId::generate();
        registry.create(&Project::new(name("docs"), v1.clone())).unwrap();

        let updated = registry.compare_and_swap(&name("docs"), &v1, &v2).unwrap();
        assert_eq!(updated.live_version_id, v2);
        assert_eq!(registry.get(&name("docs")).unwrap().unwrap().live_version_id, v2);
    }

    #[test]
    fn stale_compare_and_swap_is_rejected() {
        let registry = InMemoryProjectRegistry::new();
        let v1 = VersionId::generate();
        let v2 = VersionId::generate();
        let v3 = VersionId::generate();
        registry.create(&Project::new(name("docs"), v1.clone())).unwrap();
        registry.compare_and_swap(&name("docs"), &v1, &v2).unwrap();

        let err = registry.compare_and_swap(&name("docs"), &v1, &v3).unwrap_err();
        assert!(matches!(
            err,
            RegistryError::ConcurrentModification { ref actual, .. } if *actual == v2
        ));
        assert_eq!(registry.get(&name("docs")).unwrap().unwrap().live_version_id, v2);
    }

    #[test]
    fn compare_and_swap_on_missing_project() {
        let registry = InMemoryProjectRegistry::new();
        let v = VersionId::generate();
        assert!(matches!(
            registry.compare_and_swap(&name("ghost"), &v, &v),
            Err(RegistryError::NotFound(_))
        ));
    }

    #[test]
    fn list_is_ordered_by_name() {
        let registry = InMemoryProjectRegistry::new();
        for n in ["zeta", "alpha", "mid"] {
            registry
                .create(&Project::new(name(n), VersionId::generate()))
                .unwrap();
        }
        let names: Vec<_> = registry
            .list()
            .unwrap()
            .into_iter()
            .map(|p| p.name.to_string())
            .collect();
        assert_eq!(names, vec!["alpha", "mid", "zeta"]);
    }

    #[test]
    fn concurrent_swaps_from_same_base_have_one_winner() {
        let registry = Arc::new(InMemoryProjectRegistry::new());
        let base = VersionId::generate();
        registry.create(&Project::new(name("race"), base.clone())).unwrap();

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let registry = Arc::clone(&registry);
                let base = base.clone();
                thread::spawn(move || {
                    registry
                        .compare_and_swap(&name("race"), &base, &VersionId::generate())
                        .is_ok()
                })
            })
            .collect();

        let winners = handles
            .into_iter()
            .map(|h| h.join().expect("thread should not panic"))
            .filter(|won| *won)
            .count();
        assert_eq!(winners, 1);
    }
}
