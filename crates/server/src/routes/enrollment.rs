use crate::{
    dtos::enrollment::{ChangeStatusRequest, CreditsResponse, EnrolledCourseResponse},
    error::{ApiError, ErrorResponse},
    routes::auth::caller_from_claims,
    state::AppState,
};
use axum::{
    Extension, Json,
    extract::{Path, State},
};
use database::services::{credit::CreditService, enrollment::EnrollmentService};
use models::status::EnrollmentStatus;
use tower_oauth2_resource_server::claims::DefaultClaims;
use uuid::Uuid;

/// Recomputes and stores the credit load of a semester enrollment
#[utoipa::path(
    post,
    path = "/enrollments/{id}/credits/recompute",
    params(
        ("id" = Uuid, Path, description = "Semester enrollment ID")
    ),
    responses(
        (status = 200, description = "Credit load recomputed", body = CreditsResponse),
        (status = 403, description = "Caller may not manage enrollments", body = ErrorResponse),
        (status = 404, description = "Semester enrollment not found", body = ErrorResponse),
        (status = 500, description = "A registration does not resolve to a course", body = ErrorResponse)
    ),
    security(
        ("jwt" = [])
    ),
    tag = "Enrollments"
)]
pub async fn recompute_credits(
    State(state): State<AppState>,
    Extension(claims): Extension<DefaultClaims>,
    Path(id): Path<Uuid>,
) -> Result<Json<CreditsResponse>, ApiError> {
    let caller = caller_from_claims(&state, &claims)?;

    let total_credits = CreditService::recompute_total_credits(&state.db, &caller, id).await?;

    Ok(Json(CreditsResponse {
        semester_enrollment_id: id,
        total_credits,
    }))
}

/// Drops, withdraws or completes a registration and refreshes the term's load
#[utoipa::path(
    put,
    path = "/enrolled-courses/{id}/status",
    params(
        ("id" = Uuid, Path, description = "Enrolled course ID")
    ),
    request_body = ChangeStatusRequest,
    responses(
        (status = 200, description = "Status changed", body = EnrolledCourseResponse),
        (status = 400, description = "Unknown status or illegal transition", body = ErrorResponse),
        (status = 403, description = "Caller may not manage enrollments", body = ErrorResponse),
        (status = 404, description = "Enrolled course not found", body = ErrorResponse)
    ),
    security(
        ("jwt" = [])
    ),
    tag = "Enrollments"
)]
pub async fn change_status(
    State(state): State<AppState>,
    Extension(claims): Extension<DefaultClaims>,
    Path(id): Path<Uuid>,
    Json(request): Json<ChangeStatusRequest>,
) -> Result<Json<EnrolledCourseResponse>, ApiError> {
    let caller = caller_from_claims(&state, &claims)?;
    let status = request
        .status
        .parse::<EnrollmentStatus>()
        .map_err(|e| ApiError::BadRequest(e.to_string()))?;

    let (updated, total_credits) =
        EnrollmentService::change_status_and_recompute(&state.db, &caller, id, status).await?;

    Ok(Json(EnrolledCourseResponse::new(updated, total_credits)))
}
