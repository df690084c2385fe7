//! Repository trait definitions for persistence operations.
//!
//! This module provides a collection of focused repository traits that
//! abstract the persistence collaborator. By splitting responsibilities across
//! multiple traits, implementations stay focused and testable.
//!
//! # Module Organization
//!
//! - [`error`]: Error types for repository operations
//! - [`settings`]: Branch schooling-hours configuration
//! - [`catalog`]: Class-subject bindings and rooms (read-only for the core)
//! - [`timetable`]: Recurring weekly templates and their slots
//! - [`lesson`]: Concrete, dated lesson instances
//!
//! # Convenience Trait Bound
//!
//! For functions that need all repository capabilities, use the
//! [`FullRepository`] trait bound:
//!
//! ```ignore
//! async fn my_service<R: FullRepository>(repo: &R) -> RepositoryResult<()> {
//!     let settings = repo.get_settings(branch).await?;
//!     let slots = repo.list_slots(timetable, None).await?;
//!     Ok(())
//! }
//! ```

pub mod catalog;
pub mod error;
pub mod lesson;
pub mod settings;
pub mod timetable;

// Re-export error types
pub use error::{ErrorContext, RepositoryError, RepositoryResult};

// Re-export all traits
pub use catalog::CatalogRepository;
pub use lesson::LessonRepository;
pub use settings::SettingsRepository;
pub use timetable::{NewTimetableSlot, TimetableRepository};

/// Composite trait bound for a complete repository implementation.
///
/// Automatically implemented for any type that implements all four focused
/// traits; use it when a service needs the whole persistence surface.
pub trait FullRepository:
    SettingsRepository + CatalogRepository + TimetableRepository + LessonRepository
{
}

// Blanket implementation: implementing the four traits is implementing FullRepository
impl<T> FullRepository for T where
    T: SettingsRepository + CatalogRepository + TimetableRepository + LessonRepository
{
}
