//! Branch schedule settings repository trait.

use async_trait::async_trait;

use super::error::RepositoryResult;
use crate::api::{BranchId, BranchScheduleSettings};

/// Repository trait for branch-level schooling-hours configuration.
///
/// The scheduling core only reads these settings; writes come from the
/// branch administration surface.
#[async_trait]
pub trait SettingsRepository: Send + Sync {
    /// Fetch the schedule settings for a branch.
    ///
    /// # Returns
    /// * `Ok(BranchScheduleSettings)` - The branch configuration
    /// * `Err(RepositoryError::NotFound)` - If the branch has no settings
    async fn get_settings(&self, branch: BranchId) -> RepositoryResult<BranchScheduleSettings>;

    /// Replace the schedule settings for a branch.
    async fn update_settings(
        &self,
        branch: BranchId,
        settings: &BranchScheduleSettings,
    ) -> RepositoryResult<()>;
}
