use axum::{
    extract::{rejection::JsonRejection, State},
    Extension, Json,
};

use crate::app::AppState;
use crate::database::Project;
use crate::middleware::{ApiResponse, ApiResult, AuthUser};
use crate::services::ProjectInput;

/// GET /api/projects - every project, in store order
pub async fn list(State(state): State<AppState>) -> ApiResult<Vec<Project>> {
    let projects = state.projects.list().await?;
    Ok(ApiResponse::success(projects))
}

/// POST /api/projects - create a project owned by the requester
pub async fn create(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    payload: Result<Json<ProjectInput>, JsonRejection>,
) -> ApiResult<Project> {
    let Json(input) = payload?;
    let project = state.projects.create(input, auth_user.user_id).await?;
    Ok(ApiResponse::created(project))
}
