//! Performance Review API Handlers
//!
//! 绩效评审由 HR 建立周期, 经理或本人提交反馈后即关闭。

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde::Deserialize;

use shared::ErrorCode;
use shared::models::{FeedbackCreate, PerformanceReview, PerformanceReviewCreate, UserRole};

use crate::AppError;
use crate::auth::{Action, CurrentUser, Target, authorize};
use crate::core::ServerState;
use crate::db::repository;
use crate::utils::AppResult;
use crate::utils::time::parse_date;
use crate::utils::validation::{MAX_NOTE_LEN, validate_optional_text, validate_rating};

/// Page size when the client does not pass `limit`
const DEFAULT_PAGE_SIZE: i64 = 100;

#[derive(Debug, Default, Deserialize)]
pub struct PageQuery {
    #[serde(default)]
    skip: i64,
    limit: Option<i64>,
}

/// POST /api/performance/reviews - 建立评审周期 (HR)
pub async fn create_review(
    State(state): State<ServerState>,
    user: CurrentUser,
    Json(payload): Json<PerformanceReviewCreate>,
) -> AppResult<impl IntoResponse> {
    authorize(&user, Action::ReviewCreate, Target::none())?;
    let pool = state.get_db().pool();

    parse_date(&payload.review_period_start)?;
    parse_date(&payload.review_period_end)?;

    let employee = repository::employee::find_by_id(pool, payload.employee_id).await?;
    let reviewer = repository::employee::find_by_id(pool, payload.reviewer_id).await?;
    if employee.is_none() || reviewer.is_none() {
        return Err(AppError::new(ErrorCode::ReviewParticipantNotFound));
    }

    let review = repository::performance::create(pool, &payload).await?;
    Ok((StatusCode::CREATED, Json(review)))
}

/// POST /api/performance/reviews/{id}/feedback - 提交反馈
///
/// 经理对直属下属、员工对自己的评审有效。反馈落库后评审即
/// COMPLETED, 不做状态前置检查, 重复提交只会覆盖评分。
pub async fn submit_feedback(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<i64>,
    Json(payload): Json<FeedbackCreate>,
) -> AppResult<Json<PerformanceReview>> {
    let pool = state.get_db().pool();

    let review = repository::performance::find_by_id(pool, id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::ReviewNotFound))?;

    let target = match repository::employee::find_by_id(pool, review.employee_id).await? {
        Some(employee) => Target::with_manager(review.employee_id, employee.manager_id),
        None => Target::employee(review.employee_id),
    };
    authorize(&user, Action::ReviewFeedback, target)?;

    if let Some(rating) = payload.overall_rating {
        validate_rating(rating)?;
    }
    // Empty comments leave the stored text alone.
    let comments = payload.comments.filter(|c| !c.is_empty());
    validate_optional_text(&comments, "comments", MAX_NOTE_LEN)?;

    let updated =
        repository::performance::apply_feedback(pool, id, payload.overall_rating, comments.as_deref())
            .await?;
    Ok(Json(updated))
}

/// GET /api/performance/reviews/manager/{id} - 经理待办评审
///
/// 经理只能查自己名下的队列, HR 可以查任何经理的。
pub async fn list_manager_reviews(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(manager_id): Path<i64>,
    Query(query): Query<PageQuery>,
) -> AppResult<Json<Vec<PerformanceReview>>> {
    authorize(&user, Action::ManagerReviewsList, Target::none())?;
    if user.role == UserRole::Manager && user.employee_id != Some(manager_id) {
        return Err(AppError::forbidden("Not authorized to view these reviews"));
    }

    let limit = query.limit.unwrap_or(DEFAULT_PAGE_SIZE);
    let reviews = repository::performance::list_pending_by_reviewer(
        state.get_db().pool(),
        manager_id,
        query.skip,
        limit,
    )
    .await?;
    Ok(Json(reviews))
}
