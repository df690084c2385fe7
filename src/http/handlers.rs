//! HTTP handlers for the REST API.
//!
//! Each handler corresponds to an API endpoint and delegates to the
//! service layer for business logic.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};

use super::dto::{
    AvailabilityQuery, CreateLessonRequest, CreateTemplateRequest, DaySlot,
    GenerateLessonsRequest, HealthResponse, LessonListResponse, LessonsQuery, SlotPayload,
    SlotsQuery, TemplateListResponse, UpdateLessonRequest,
};
use super::error::AppError;
use super::state::AppState;
use crate::api::{
    BranchId, BranchScheduleSettings, LessonId, LessonInstance, ScheduleAvailabilityResult,
    TimetableId, TimetableSlot, TimetableSlotId, TimetableTemplate,
};
use crate::db::models::LessonFilter;
use crate::db::repository::{NewTimetableSlot, RepositoryError};
use crate::db::services as db_services;
use crate::services;
use crate::timetable::{generate_day_slots, SlotTable};

/// Result type for handlers.
pub type HandlerResult<T> = Result<Json<T>, AppError>;

// =============================================================================
// Health Check
// =============================================================================

/// GET /health
///
/// Health check endpoint to verify the service is running and the repository
/// is reachable.
pub async fn health_check(State(state): State<AppState>) -> HandlerResult<HealthResponse> {
    let db_status = match db_services::health_check(state.repository.as_ref()).await {
        Ok(true) => "connected".to_string(),
        Ok(false) => "disconnected".to_string(),
        Err(e) => format!("error: {}", e),
    };

    Ok(Json(HealthResponse {
        status: "ok".to_string(),
        version: "v1".to_string(),
        database: db_status,
    }))
}

// =============================================================================
// Branch settings and day structure
// =============================================================================

/// GET /v1/branches/{branch_id}/settings
pub async fn get_settings(
    State(state): State<AppState>,
    Path(branch_id): Path<i64>,
) -> HandlerResult<BranchScheduleSettings> {
    let settings =
        db_services::get_settings(state.repository.as_ref(), BranchId::new(branch_id)).await?;
    Ok(Json(settings))
}

/// PUT /v1/branches/{branch_id}/settings
pub async fn update_settings(
    State(state): State<AppState>,
    Path(branch_id): Path<i64>,
    Json(settings): Json<BranchScheduleSettings>,
) -> HandlerResult<BranchScheduleSettings> {
    settings
        .validate()
        .map_err(|e| AppError::BadRequest(e.to_string()))?;
    db_services::update_settings(state.repository.as_ref(), BranchId::new(branch_id), &settings)
        .await?;
    Ok(Json(settings))
}

/// GET /v1/branches/{branch_id}/day-slots
///
/// The ordered slot structure of one school day, generated from the branch
/// settings (lunch spliced in as an unnumbered entry).
pub async fn get_day_slots(
    State(state): State<AppState>,
    Path(branch_id): Path<i64>,
) -> HandlerResult<Vec<DaySlot>> {
    let settings =
        db_services::get_settings(state.repository.as_ref(), BranchId::new(branch_id)).await?;
    let slots = generate_day_slots(&settings).map_err(|e| AppError::BadRequest(e.to_string()))?;
    Ok(Json(slots))
}

// =============================================================================
// Timetable templates and slots
// =============================================================================

/// GET /v1/branches/{branch_id}/timetables
pub async fn list_templates(
    State(state): State<AppState>,
    Path(branch_id): Path<i64>,
) -> HandlerResult<TemplateListResponse> {
    let timetables =
        db_services::list_templates(state.repository.as_ref(), BranchId::new(branch_id)).await?;
    let total = timetables.len();
    Ok(Json(TemplateListResponse { timetables, total }))
}

/// POST /v1/timetables
pub async fn create_template(
    State(state): State<AppState>,
    Json(request): Json<CreateTemplateRequest>,
) -> Result<(StatusCode, Json<TimetableTemplate>), AppError> {
    let template =
        db_services::create_template(state.repository.as_ref(), request.branch_id, &request.name)
            .await?;
    Ok((StatusCode::CREATED, Json(template)))
}

/// GET /v1/timetables/{timetable_id}/slots
pub async fn list_slots(
    State(state): State<AppState>,
    Path(timetable_id): Path<i64>,
    Query(query): Query<SlotsQuery>,
) -> HandlerResult<Vec<TimetableSlot>> {
    let slots = db_services::list_slots(
        state.repository.as_ref(),
        TimetableId::new(timetable_id),
        query.day_of_week,
    )
    .await?;
    Ok(Json(slots))
}

/// POST /v1/timetables/{timetable_id}/slots
pub async fn create_slot(
    State(state): State<AppState>,
    Path(timetable_id): Path<i64>,
    Json(payload): Json<SlotPayload>,
) -> Result<(StatusCode, Json<TimetableSlot>), AppError> {
    if payload.timetable != TimetableId::new(timetable_id) {
        return Err(AppError::BadRequest(
            "Payload timetable does not match the path".to_string(),
        ));
    }
    let slot: NewTimetableSlot = payload.into();
    validate_slot_against_table(&state, &slot).await?;
    let stored = db_services::create_slot(state.repository.as_ref(), &slot).await?;
    Ok((StatusCode::CREATED, Json(stored)))
}

/// PUT /v1/slots/{slot_id}
///
/// Full slot replacement; drag-and-drop reassignment in the template editor
/// is this same operation with a new (class, day, lesson_number) target.
pub async fn update_slot(
    State(state): State<AppState>,
    Path(slot_id): Path<i64>,
    Json(payload): Json<SlotPayload>,
) -> HandlerResult<TimetableSlot> {
    let slot: NewTimetableSlot = payload.into();
    validate_slot_against_table(&state, &slot).await?;
    let stored =
        db_services::update_slot(state.repository.as_ref(), TimetableSlotId::new(slot_id), &slot)
            .await?;
    Ok(Json(stored))
}

/// DELETE /v1/slots/{slot_id}
pub async fn delete_slot(
    State(state): State<AppState>,
    Path(slot_id): Path<i64>,
) -> Result<StatusCode, AppError> {
    db_services::delete_slot(state.repository.as_ref(), TimetableSlotId::new(slot_id)).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Slot payloads must name an exact slot from the branch's table, and their
/// lesson_number is always derived from the start time, never trusted as
/// sent. Falls back to the canonical table when the branch has no settings.
async fn validate_slot_against_table(
    state: &AppState,
    slot: &NewTimetableSlot,
) -> Result<(), AppError> {
    let template = state.repository.get_template(slot.timetable).await?;
    let table = match state.repository.get_settings(template.branch).await {
        Ok(settings) => {
            SlotTable::from_settings(&settings).map_err(|e| AppError::BadRequest(e.to_string()))?
        }
        Err(RepositoryError::NotFound { .. }) => SlotTable::standard(),
        Err(e) => return Err(e.into()),
    };

    if !table.is_valid_range(slot.start_time, slot.end_time) {
        return Err(AppError::BadRequest(format!(
            "{}-{} is not a known lesson slot",
            slot.start_time, slot.end_time
        )));
    }
    let expected = table
        .lesson_number_from_start_time(slot.start_time)
        .map_err(|e| AppError::BadRequest(e.to_string()))?;
    if expected != slot.lesson_number {
        return Err(AppError::BadRequest(format!(
            "lesson_number {} does not match the slot starting at {} (expected {})",
            slot.lesson_number, slot.start_time, expected
        )));
    }
    Ok(())
}

// =============================================================================
// Lesson instances
// =============================================================================

/// GET /v1/lessons
pub async fn list_lessons(
    State(state): State<AppState>,
    Query(query): Query<LessonsQuery>,
) -> HandlerResult<LessonListResponse> {
    let filter = LessonFilter {
        branch: query.branch_id,
        class: query.class_id,
        date: query.date,
        date_from: query.date_from,
        date_to: query.date_to,
    };
    let lessons = db_services::list_lessons(state.repository.as_ref(), &filter).await?;
    let total = lessons.len();
    Ok(Json(LessonListResponse { lessons, total }))
}

/// POST /v1/lessons
///
/// Availability-checked single-lesson creation. Conflicts come back as an
/// itemized 409, never a generic failure.
pub async fn create_lesson(
    State(state): State<AppState>,
    Json(request): Json<CreateLessonRequest>,
) -> Result<(StatusCode, Json<LessonInstance>), AppError> {
    let (branch, lesson) = request.into_new_lesson();
    let stored =
        services::create_lesson_checked(state.repository.as_ref(), branch, &lesson).await?;
    Ok((StatusCode::CREATED, Json(stored)))
}

/// PUT /v1/lessons/{lesson_id}
pub async fn update_lesson(
    State(state): State<AppState>,
    Path(lesson_id): Path<i64>,
    Json(patch): Json<UpdateLessonRequest>,
) -> HandlerResult<LessonInstance> {
    let mut lesson =
        db_services::get_lesson(state.repository.as_ref(), LessonId::new(lesson_id)).await?;
    if let Some(status) = patch.status {
        lesson.status = status;
    }
    if let Some(topic) = patch.topic {
        lesson.topic = Some(topic);
    }
    if let Some(homework) = patch.homework {
        lesson.homework = Some(homework);
    }
    if let Some(notes) = patch.teacher_notes {
        lesson.teacher_notes = Some(notes);
    }
    if let Some(room) = patch.room {
        lesson.room = Some(room);
    }
    let stored = db_services::update_lesson(state.repository.as_ref(), &lesson).await?;
    Ok(Json(stored))
}

/// DELETE /v1/lessons/{lesson_id}
pub async fn delete_lesson(
    State(state): State<AppState>,
    Path(lesson_id): Path<i64>,
) -> Result<StatusCode, AppError> {
    db_services::delete_lesson(state.repository.as_ref(), LessonId::new(lesson_id)).await?;
    Ok(StatusCode::NO_CONTENT)
}

// =============================================================================
// Availability and bulk generation
// =============================================================================

/// GET /v1/availability
pub async fn check_availability(
    State(state): State<AppState>,
    Query(query): Query<AvailabilityQuery>,
) -> HandlerResult<ScheduleAvailabilityResult> {
    let result = services::check_availability(
        state.repository.as_ref(),
        query.branch_id,
        query.class_id,
        query.date,
        query.start_time,
        query.end_time,
    )
    .await?;
    Ok(Json(result))
}

/// POST /v1/timetables/{timetable_id}/generate
///
/// Materialize concrete lessons from the template over a date range. The
/// summary always carries partial counts; individual failures are listed,
/// not fatal.
pub async fn generate_lessons(
    State(state): State<AppState>,
    Path(timetable_id): Path<i64>,
    Json(request): Json<GenerateLessonsRequest>,
) -> HandlerResult<crate::api::GenerationSummary> {
    let summary = services::generate_lessons(
        state.repository.as_ref(),
        TimetableId::new(timetable_id),
        request.start_date,
        request.end_date,
        request.skip_existing,
    )
    .await?;
    Ok(Json(summary))
}
