//! Catalog repository trait: class-subject bindings and rooms.
//!
//! Catalog entities are owned by the CRUD screens outside this core; the
//! scheduling engine reads them to resolve teachers and enumerate rooms.

use async_trait::async_trait;

use super::error::RepositoryResult;
use crate::api::{BranchId, ClassId, ClassSubject, ClassSubjectId, Room};

#[async_trait]
pub trait CatalogRepository: Send + Sync {
    /// List the class-subject bindings of a branch, optionally restricted to
    /// one class.
    async fn list_class_subjects(
        &self,
        branch: BranchId,
        class: Option<ClassId>,
    ) -> RepositoryResult<Vec<ClassSubject>>;

    /// Fetch a single class-subject binding.
    ///
    /// # Returns
    /// * `Err(RepositoryError::NotFound)` - If the binding doesn't exist
    async fn get_class_subject(&self, id: ClassSubjectId) -> RepositoryResult<ClassSubject>;

    /// List all rooms of a branch.
    async fn list_rooms(&self, branch: BranchId) -> RepositoryResult<Vec<Room>>;
}
