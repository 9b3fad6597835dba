use axum::{
    extract::{rejection::JsonRejection, Path, State},
    Extension, Json,
};
use serde::{Deserialize, Serialize};

use crate::app::AppState;
use crate::database::Project;
use crate::middleware::{ApiResponse, ApiResult, AuthUser};
use crate::services::ProjectInput;

/// Body returned by a successful delete
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteConfirmation {
    pub id: String,
    pub message: String,
}

/// GET /api/projects/:id
pub async fn get(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<Project> {
    let project = state.projects.get(&id).await?;
    Ok(ApiResponse::success(project))
}

/// PUT /api/projects/:id - replace title and description; 404 when the id is unknown
pub async fn put(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<ProjectInput>, JsonRejection>,
) -> ApiResult<Project> {
    let Json(input) = payload?;
    let project = state.projects.update(&id, input).await?;
    Ok(ApiResponse::success(project))
}

/// DELETE /api/projects/:id - owner only; unknown ids still succeed
pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Extension(auth_user): Extension<AuthUser>,
) -> ApiResult<DeleteConfirmation> {
    state.projects.delete(&id, auth_user.user_id).await?;
    Ok(ApiResponse::success(DeleteConfirmation {
        id,
        message: "ok".to_string(),
    }))
}
