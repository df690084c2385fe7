//! Router and HTTP-layer tests: construction, error mapping, wire formats.

#![cfg(feature = "http-server")]

use std::sync::Arc;

use axum::http::StatusCode;
use axum::response::IntoResponse;

use stms_rust::api::{ConflictResource, ScheduleConflict};
use stms_rust::db::repository::RepositoryError;
use stms_rust::db::LocalRepository;
use stms_rust::http::error::AppError;
use stms_rust::http::{create_router, AppState};
use stms_rust::services::ServiceError;

fn state() -> AppState {
    let repo = Arc::new(LocalRepository::new()) as Arc<dyn stms_rust::db::FullRepository>;
    AppState::new(repo)
}

#[test]
fn test_router_creation() {
    let _router = create_router(state());
    // If we got here, router was created successfully
}

#[test]
fn test_conflict_maps_to_409() {
    let conflicts = vec![ScheduleConflict::new(
        ConflictResource::Teacher,
        "Teacher 500 is already booked 08:00-08:45 on 2024-09-02",
    )];
    let response = AppError::Conflict(conflicts).into_response();
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[test]
fn test_not_found_maps_to_404() {
    let err: AppError = RepositoryError::not_found("Lesson 7 not found").into();
    assert_eq!(err.into_response().status(), StatusCode::NOT_FOUND);
}

#[test]
fn test_transient_repository_error_maps_to_503() {
    let err: AppError = RepositoryError::connection("backend unreachable").into();
    assert_eq!(err.into_response().status(), StatusCode::SERVICE_UNAVAILABLE);
}

#[test]
fn test_repository_conflict_maps_to_409() {
    let err: AppError = RepositoryError::conflict("Room 700 already booked").into();
    assert_eq!(err.into_response().status(), StatusCode::CONFLICT);
}

#[test]
fn test_invalid_range_maps_to_400() {
    let err: AppError = ServiceError::InvalidRange("start after end".to_string()).into();
    assert_eq!(err.into_response().status(), StatusCode::BAD_REQUEST);
}

#[test]
fn test_service_conflict_keeps_item_list() {
    let conflicts = vec![
        ScheduleConflict::new(ConflictResource::Class, "Class 10 is already booked"),
        ScheduleConflict::new(ConflictResource::Room, "Room 700 is already booked"),
    ];
    let err: AppError = ServiceError::Conflict(conflicts).into();
    match err {
        AppError::Conflict(items) => assert_eq!(items.len(), 2),
        other => panic!("expected conflict, got {:?}", other),
    }
}
