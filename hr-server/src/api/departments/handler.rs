//! Department API Handlers

use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::IntoResponse,
};

use shared::models::{Department, DepartmentCreate};

use crate::AppError;
use crate::auth::{Action, CurrentUser, Target, authorize};
use crate::core::ServerState;
use crate::db::repository;
use crate::utils::AppResult;
use crate::utils::validation::{MAX_NAME_LEN, MAX_SHORT_TEXT_LEN, validate_optional_text, validate_required_text};

/// GET /api/departments - 部门列表 (任何已登录用户)
pub async fn list(
    State(state): State<ServerState>,
    _user: CurrentUser,
) -> AppResult<Json<Vec<Department>>> {
    let departments = repository::department::list(state.get_db().pool()).await?;
    Ok(Json(departments))
}

/// POST /api/departments - 新建部门 (仅 HR)
pub async fn create(
    State(state): State<ServerState>,
    user: CurrentUser,
    Json(payload): Json<DepartmentCreate>,
) -> AppResult<impl IntoResponse> {
    authorize(&user, Action::DepartmentCreate, Target::none())?;
    validate_required_text(&payload.name, "name", MAX_NAME_LEN)?;
    validate_optional_text(&payload.code, "code", MAX_SHORT_TEXT_LEN)?;

    let pool = state.get_db().pool();
    if repository::department::find_by_name(pool, &payload.name)
        .await?
        .is_some()
    {
        return Err(AppError::conflict("Department name already exists"));
    }

    let department = repository::department::create(pool, &payload).await?;
    Ok((StatusCode::CREATED, Json(department)))
}
