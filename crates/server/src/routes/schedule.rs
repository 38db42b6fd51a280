use crate::{
    dtos::schedule::{
        ConflictQuery, CreateScheduleRequest, ScheduleResponse, UpdateScheduleRequest,
    },
    error::{ApiError, ErrorResponse},
    routes::auth::caller_from_claims,
    state::AppState,
};
use axum::{
    Extension, Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use database::services::schedule::{ScheduleChanges, ScheduleService};
use tower_oauth2_resource_server::claims::DefaultClaims;
use uuid::Uuid;

/// Books a room for a section
#[utoipa::path(
    post,
    path = "/schedules",
    request_body = CreateScheduleRequest,
    responses(
        (status = 201, description = "Schedule created", body = ScheduleResponse),
        (status = 400, description = "Invalid interval, room or day", body = ErrorResponse),
        (status = 403, description = "Caller may not book rooms", body = ErrorResponse),
        (status = 404, description = "Section not found", body = ErrorResponse),
        (status = 409, description = "Room already booked for an overlapping interval", body = ErrorResponse)
    ),
    security(
        ("jwt" = [])
    ),
    tag = "Schedules"
)]
pub async fn create_schedule(
    State(state): State<AppState>,
    Extension(claims): Extension<DefaultClaims>,
    Json(request): Json<CreateScheduleRequest>,
) -> Result<(StatusCode, Json<ScheduleResponse>), ApiError> {
    let caller = caller_from_claims(&state, &claims)?;
    let (section_id, schedule) = request.into_new_schedule()?;

    let created =
        ScheduleService::validate_and_create_schedule(&state.db, &caller, schedule, section_id)
            .await?;

    Ok((StatusCode::CREATED, Json(created.into())))
}

/// Changes the day, interval, room or status of a schedule
#[utoipa::path(
    patch,
    path = "/schedules/{id}",
    params(
        ("id" = Uuid, Path, description = "Schedule ID")
    ),
    request_body = UpdateScheduleRequest,
    responses(
        (status = 200, description = "Schedule updated", body = ScheduleResponse),
        (status = 400, description = "Invalid interval, room, day or status", body = ErrorResponse),
        (status = 404, description = "Schedule not found", body = ErrorResponse),
        (status = 409, description = "Room already booked for an overlapping interval", body = ErrorResponse)
    ),
    security(
        ("jwt" = [])
    ),
    tag = "Schedules"
)]
pub async fn update_schedule(
    State(state): State<AppState>,
    Extension(claims): Extension<DefaultClaims>,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateScheduleRequest>,
) -> Result<Json<ScheduleResponse>, ApiError> {
    let caller = caller_from_claims(&state, &claims)?;
    let changes = ScheduleChanges::try_from(request)?;

    let updated =
        ScheduleService::validate_and_update_schedule(&state.db, &caller, id, changes).await?;

    Ok(Json(updated.into()))
}

#[utoipa::path(
    delete,
    path = "/schedules/{id}",
    params(
        ("id" = Uuid, Path, description = "Schedule ID")
    ),
    responses(
        (status = 204, description = "Schedule deleted"),
        (status = 404, description = "Schedule not found", body = ErrorResponse)
    ),
    security(
        ("jwt" = [])
    ),
    tag = "Schedules"
)]
pub async fn delete_schedule(
    State(state): State<AppState>,
    Extension(claims): Extension<DefaultClaims>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    let caller = caller_from_claims(&state, &claims)?;

    ScheduleService::delete_schedule(&state.db, &caller, id).await?;

    Ok(StatusCode::NO_CONTENT)
}

/// Lists active schedules overlapping an interval
#[utoipa::path(
    get,
    path = "/schedules/conflicts",
    params(ConflictQuery),
    responses(
        (status = 200, description = "Overlapping schedules, earliest first", body = Vec<ScheduleResponse>),
        (status = 400, description = "Invalid day or interval", body = ErrorResponse)
    ),
    security(
        ("jwt" = [])
    ),
    tag = "Schedules"
)]
pub async fn find_conflicts(
    State(state): State<AppState>,
    Query(query): Query<ConflictQuery>,
) -> Result<Json<Vec<ScheduleResponse>>, ApiError> {
    let (day, slot) = query.parse()?;

    let conflicts =
        ScheduleService::find_conflicts(&state.db, day, slot, query.room.as_deref(), query.exclude)
            .await?;

    Ok(Json(conflicts.into_iter().map(Into::into).collect()))
}

/// Every schedule booked for a section
#[utoipa::path(
    get,
    path = "/sections/{id}/schedules",
    params(
        ("id" = Uuid, Path, description = "Section ID")
    ),
    responses(
        (status = 200, description = "Schedules of the section", body = Vec<ScheduleResponse>)
    ),
    security(
        ("jwt" = [])
    ),
    tag = "Schedules"
)]
pub async fn section_schedules(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Vec<ScheduleResponse>>, ApiError> {
    let schedules = ScheduleService::schedules_for_section(&state.db, id).await?;

    Ok(Json(schedules.into_iter().map(Into::into).collect()))
}
