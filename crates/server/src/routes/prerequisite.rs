use crate::{
    dtos::prerequisite::{AddPrerequisiteRequest, PrerequisiteEdgeResponse, PrerequisitesResponse},
    error::{ApiError, ErrorResponse},
    routes::auth::caller_from_claims,
    state::AppState,
};
use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
};
use database::services::{course::CourseService, prerequisite::PrerequisiteService};
use tower_oauth2_resource_server::claims::DefaultClaims;
use uuid::Uuid;

/// Requires `prerequisite_id` to be taken before the course
#[utoipa::path(
    post,
    path = "/courses/{id}/prerequisites",
    params(
        ("id" = Uuid, Path, description = "Course ID")
    ),
    request_body = AddPrerequisiteRequest,
    responses(
        (status = 201, description = "Prerequisite added", body = PrerequisiteEdgeResponse),
        (status = 403, description = "Caller may not edit the catalog", body = ErrorResponse),
        (status = 404, description = "Course not found", body = ErrorResponse),
        (status = 409, description = "Edge already exists or would create a cycle", body = ErrorResponse)
    ),
    security(
        ("jwt" = [])
    ),
    tag = "Prerequisites"
)]
pub async fn add_prerequisite(
    State(state): State<AppState>,
    Extension(claims): Extension<DefaultClaims>,
    Path(id): Path<Uuid>,
    Json(request): Json<AddPrerequisiteRequest>,
) -> Result<(StatusCode, Json<PrerequisiteEdgeResponse>), ApiError> {
    let caller = caller_from_claims(&state, &claims)?;

    let edge = PrerequisiteService::validate_and_create_edge(
        &state.db,
        &caller,
        id,
        request.prerequisite_id,
    )
    .await?;

    Ok((StatusCode::CREATED, Json(edge.into())))
}

/// Direct and transitive prerequisites of a course
#[utoipa::path(
    get,
    path = "/courses/{id}/prerequisites",
    params(
        ("id" = Uuid, Path, description = "Course ID")
    ),
    responses(
        (status = 200, description = "Prerequisites of the course", body = PrerequisitesResponse),
        (status = 404, description = "Course not found", body = ErrorResponse)
    ),
    security(
        ("jwt" = [])
    ),
    tag = "Prerequisites"
)]
pub async fn get_prerequisites(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<PrerequisitesResponse>, ApiError> {
    CourseService::get_course(&state.db, id).await?;

    let (direct, all) = futures::try_join!(
        PrerequisiteService::direct_prerequisites(&state.db, id),
        PrerequisiteService::all_prerequisites(&state.db, id),
    )?;

    Ok(Json(PrerequisitesResponse {
        course_id: id,
        direct: direct.into_iter().map(Into::into).collect(),
        all: all.into_iter().map(Into::into).collect(),
    }))
}

#[utoipa::path(
    delete,
    path = "/courses/{id}/prerequisites/{prerequisite_id}",
    params(
        ("id" = Uuid, Path, description = "Course ID"),
        ("prerequisite_id" = Uuid, Path, description = "Prerequisite course ID")
    ),
    responses(
        (status = 204, description = "Prerequisite removed"),
        (status = 404, description = "No such prerequisite edge", body = ErrorResponse)
    ),
    security(
        ("jwt" = [])
    ),
    tag = "Prerequisites"
)]
pub async fn remove_prerequisite(
    State(state): State<AppState>,
    Extension(claims): Extension<DefaultClaims>,
    Path((id, prerequisite_id)): Path<(Uuid, Uuid)>,
) -> Result<StatusCode, ApiError> {
    let caller = caller_from_claims(&state, &claims)?;

    PrerequisiteService::remove_edge(&state.db, &caller, id, prerequisite_id).await?;

    Ok(StatusCode::NO_CONTENT)
}
