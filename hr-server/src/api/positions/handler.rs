//! Position API Handlers

use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};

use shared::models::{Position, PositionCreate};

use crate::auth::{Action, CurrentUser, Target, authorize};
use crate::core::ServerState;
use crate::db::repository;
use crate::utils::AppResult;
use crate::utils::validation::{
    MAX_NAME_LEN, MAX_SHORT_TEXT_LEN, validate_optional_text, validate_required_text,
};

/// GET /api/positions - 职位列表 (任何已登录用户)
pub async fn list(
    State(state): State<ServerState>,
    _user: CurrentUser,
) -> AppResult<Json<Vec<Position>>> {
    let positions = repository::position::list(state.get_db().pool()).await?;
    Ok(Json(positions))
}

/// POST /api/positions - 新建职位 (仅 HR)
pub async fn create(
    State(state): State<ServerState>,
    user: CurrentUser,
    Json(payload): Json<PositionCreate>,
) -> AppResult<impl IntoResponse> {
    authorize(&user, Action::PositionCreate, Target::none())?;
    validate_required_text(&payload.title, "title", MAX_NAME_LEN)?;
    validate_optional_text(&payload.code, "code", MAX_SHORT_TEXT_LEN)?;

    let position = repository::position::create(state.get_db().pool(), &payload).await?;
    Ok((StatusCode::CREATED, Json(position)))
}
