use serde::{Deserialize, Serialize};

/// Tuning for [`ProjectStore`](crate::ProjectStore).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectStoreConfig {
    /// How many read-modify-write attempts an update makes when another
    /// writer moved the live pointer first. With `1` the first conflict is
    /// returned as `ConcurrentModification`.
    pub update_attempts: u32,
}

impl Default for ProjectStoreConfig {
    fn default() -> Self {
        Self { update_attempts: 3 }
    }
}
