//! Training API Handlers

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde::Deserialize;

use shared::ErrorCode;
use shared::models::{EnrollmentCreate, TrainingCourse, TrainingCourseCreate, TrainingEnrollment};

use crate::AppError;
use crate::auth::{Action, CurrentUser, Target, authorize};
use crate::core::ServerState;
use crate::db::repository;
use crate::utils::AppResult;
use crate::utils::time::{format_date, parse_date, today_in};
use crate::utils::validation::{
    MAX_NAME_LEN, MAX_NOTE_LEN, MAX_SHORT_TEXT_LEN, validate_optional_text, validate_required_text,
};

/// Page size when the client does not pass `limit`
const DEFAULT_PAGE_SIZE: i64 = 100;

#[derive(Debug, Default, Deserialize)]
pub struct PageQuery {
    #[serde(default)]
    skip: i64,
    limit: Option<i64>,
}

/// GET /api/training/courses - 在售课程 (任何已登录用户)
pub async fn list_courses(
    State(state): State<ServerState>,
    _user: CurrentUser,
    Query(query): Query<PageQuery>,
) -> AppResult<Json<Vec<TrainingCourse>>> {
    let limit = query.limit.unwrap_or(DEFAULT_PAGE_SIZE);
    let courses =
        repository::training::list_active_courses(state.get_db().pool(), query.skip, limit).await?;
    Ok(Json(courses))
}

/// POST /api/training/courses - 新建课程 (HR)
pub async fn create_course(
    State(state): State<ServerState>,
    user: CurrentUser,
    Json(payload): Json<TrainingCourseCreate>,
) -> AppResult<impl IntoResponse> {
    authorize(&user, Action::CourseCreate, Target::none())?;

    validate_required_text(&payload.title, "title", MAX_NAME_LEN)?;
    validate_optional_text(&payload.description, "description", MAX_NOTE_LEN)?;
    validate_optional_text(&payload.instructor, "instructor", MAX_SHORT_TEXT_LEN)?;
    if let Some(hours) = payload.duration_hours
        && hours < 0
    {
        return Err(AppError::validation("duration_hours must be non-negative"));
    }

    let course = repository::training::create_course(state.get_db().pool(), &payload).await?;
    Ok((StatusCode::CREATED, Json(course)))
}

/// POST /api/training/enrollments - 报名课程 (本人或 HR)
pub async fn enroll(
    State(state): State<ServerState>,
    user: CurrentUser,
    Json(payload): Json<EnrollmentCreate>,
) -> AppResult<impl IntoResponse> {
    let pool = state.get_db().pool();

    let course = repository::training::find_course_by_id(pool, payload.course_id).await?;
    if !course.is_some_and(|c| c.is_active) {
        return Err(AppError::new(ErrorCode::CourseNotFound));
    }

    authorize(
        &user,
        Action::TrainingEnroll,
        Target::employee(payload.employee_id),
    )?;

    if repository::training::find_enrollment(pool, payload.employee_id, payload.course_id)
        .await?
        .is_some()
    {
        return Err(AppError::new(ErrorCode::AlreadyEnrolled));
    }

    let enrollment_date = match payload.enrollment_date.as_deref() {
        Some(date) => {
            parse_date(date)?;
            date.to_string()
        }
        None => format_date(today_in(state.config.timezone)),
    };

    let enrollment = repository::training::create_enrollment(
        pool,
        payload.employee_id,
        payload.course_id,
        &enrollment_date,
    )
    .await?;
    Ok((StatusCode::CREATED, Json(enrollment)))
}

/// GET /api/training/enrollments/{employee_id} - 员工报名记录 (本人或 HR)
pub async fn list_enrollments(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(employee_id): Path<i64>,
    Query(query): Query<PageQuery>,
) -> AppResult<Json<Vec<TrainingEnrollment>>> {
    authorize(&user, Action::EnrollmentsView, Target::employee(employee_id))?;

    let limit = query.limit.unwrap_or(DEFAULT_PAGE_SIZE);
    let rows =
        repository::training::list_enrollments(state.get_db().pool(), employee_id, query.skip, limit)
            .await?;
    Ok(Json(rows))
}
