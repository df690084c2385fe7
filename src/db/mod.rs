//! Database module for timetable data storage.
//!
//! This module provides abstractions for persistence via the Repository
//! pattern, allowing different storage backends to be swapped easily.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │  Application Layer (REST API, scheduling services)      │
//! └───────────────────┬─────────────────────────────────────┘
//!                     │
//! ┌───────────────────▼─────────────────────────────────────┐
//! │  Service Layer (services.rs) - thin orchestration       │
//! └───────────────────┬─────────────────────────────────────┘
//!                     │
//! ┌───────────────────▼─────────────────────────────────────┐
//! │  Repository Traits (repository/) - Abstract Interface   │
//! └───────────────────┬─────────────────────────────────────┘
//!                     │
//!     ┌──────────────────────────────────────────────┐
//!     │             Local Repository                  │
//!     │               (in-memory)                     │
//!     └──────────────────────────────────────────────┘
//! ```
//!
//! The local repository enforces the booking uniqueness invariants as hard
//! constraints at write time; callers treat a `ConflictError` from a write as
//! the authoritative conflict signal (read-time availability is advisory).

#[cfg(not(feature = "local-repo"))]
compile_error!("Enable at least one repository backend feature.");

pub mod factory;
pub mod models;
pub mod repo_config;
pub mod repositories;
pub mod repository;
pub mod services;

// ==================== Service Layer (Recommended for new code) ====================

pub use services::{
    create_slot, create_template, delete_lesson, delete_slot, find_lesson, get_lesson,
    get_settings, health_check, list_class_subjects, list_lessons, list_rooms, list_slots,
    list_templates, update_lesson, update_settings, update_slot,
};

// ==================== Repository Pattern Exports ====================

pub use factory::{RepositoryFactory, RepositoryType};
pub use models::LessonFilter;
pub use repo_config::RepositoryConfig;
pub use repositories::LocalRepository;
pub use repository::{
    CatalogRepository, ErrorContext, FullRepository, LessonRepository, NewTimetableSlot,
    RepositoryError, RepositoryResult, SettingsRepository, TimetableRepository,
};

use anyhow::{Context, Result};
use std::sync::{Arc, OnceLock};

/// Global repository instance initialized once per process.
static REPOSITORY: OnceLock<Arc<dyn FullRepository>> = OnceLock::new();

fn create_selected_repository() -> RepositoryResult<Arc<dyn FullRepository>> {
    RepositoryFactory::create(RepositoryType::from_env())
}

/// Initialize the global repository singleton for the selected backend.
pub fn init_repository() -> Result<()> {
    if REPOSITORY.get().is_some() {
        return Ok(());
    }

    let repo = create_selected_repository().map_err(|e| anyhow::Error::msg(e.to_string()))?;
    let _ = REPOSITORY.set(repo);
    Ok(())
}

/// Get a reference to the global repository instance.
pub fn get_repository() -> Result<&'static Arc<dyn FullRepository>> {
    if REPOSITORY.get().is_none() {
        let _ = init_repository();
    }

    REPOSITORY
        .get()
        .context("Repository not initialized. Call init_repository() first.")
}
