use crate::{error::ApiError, state::AppState};
use axum::{Extension, Json, extract::State};
use models::caller::Caller;
use tower_oauth2_resource_server::claims::DefaultClaims;

/// Resolves the JWT subject to the caller the services act for
pub fn caller_from_claims(state: &AppState, claims: &DefaultClaims) -> Result<Caller, ApiError> {
    let sub = claims.sub.as_ref().ok_or(ApiError::Unauthorized)?;

    Ok(state.config.caller_for(sub))
}

/// Returns the authenticated subject and the role it acts with
#[utoipa::path(
    get,
    path = "/me",
    responses(
        (status = 200, description = "Successfully authenticated"),
        (status = 401, description = "Unauthorized - invalid or missing JWT")
    ),
    security(
        ("jwt" = [])
    ),
    tag = "Authentication"
)]
pub async fn me(
    State(state): State<AppState>,
    Extension(claims): Extension<DefaultClaims>,
) -> Result<Json<Caller>, ApiError> {
    let caller = caller_from_claims(&state, &claims)?;

    Ok(Json(caller))
}
