//! Employee API Handlers
//!
//! 员工档案的查询、入职建档、更新和文档管理。

use axum::{
    Json,
    body::Bytes,
    extract::{Multipart, Path, Query, State, multipart::Field},
    http::{StatusCode, header},
    response::IntoResponse,
};

use shared::ErrorCode;
use shared::models::{
    DocumentPublic, Employee, EmployeeCreate, EmployeeDetail, EmployeeListQuery, EmployeeUpdate,
    UserRole,
};

use crate::AppError;
use crate::auth::{Action, CurrentUser, Target, authorize};
use crate::core::ServerState;
use crate::db::repository;
use crate::utils::AppResult;
use crate::utils::time::parse_date;
use crate::utils::validation::{
    MAX_ADDRESS_LEN, MAX_NAME_LEN, MAX_NOTE_LEN, MAX_SHORT_TEXT_LEN, validate_email,
    validate_optional_text, validate_required_text,
};

/// Page size when the client does not pass `limit`
const DEFAULT_PAGE_SIZE: i64 = 100;

/// GET /api/employees - 员工目录 (HR 看全部, 经理只看直属下属)
pub async fn list(
    State(state): State<ServerState>,
    user: CurrentUser,
    Query(query): Query<EmployeeListQuery>,
) -> AppResult<Json<Vec<Employee>>> {
    authorize(&user, Action::EmployeeList, Target::none())?;

    // A manager without an employee profile has no reports to see.
    let manager_scope = if user.role == UserRole::Manager {
        match user.employee_id {
            Some(id) => Some(id),
            None => return Ok(Json(Vec::new())),
        }
    } else {
        None
    };

    let employees = repository::employee::list(
        state.get_db().pool(),
        query.department_id,
        query.status,
        manager_scope,
        query.skip,
        query.limit.unwrap_or(DEFAULT_PAGE_SIZE),
    )
    .await?;
    Ok(Json(employees))
}

/// POST /api/employees - 入职建档 (仅 HR)
pub async fn create(
    State(state): State<ServerState>,
    user: CurrentUser,
    Json(payload): Json<EmployeeCreate>,
) -> AppResult<impl IntoResponse> {
    authorize(&user, Action::EmployeeCreate, Target::none())?;
    validate_create(&payload)?;

    let pool = state.get_db().pool();
    if repository::employee::find_by_employee_number(pool, &payload.employee_number)
        .await?
        .is_some()
    {
        return Err(AppError::new(ErrorCode::EmployeeNumberExists));
    }
    if repository::employee::find_by_email(pool, &payload.email)
        .await?
        .is_some()
    {
        return Err(AppError::new(ErrorCode::EmployeeEmailExists));
    }

    let employee = repository::employee::create(pool, &payload).await?;
    Ok((StatusCode::CREATED, Json(employee)))
}

/// GET /api/employees/{id} - 档案详情 (含部门与职位)
pub async fn get_by_id(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<i64>,
) -> AppResult<Json<EmployeeDetail>> {
    let detail = repository::employee::find_detail(state.get_db().pool(), id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::EmployeeNotFound))?;

    authorize(
        &user,
        Action::EmployeeView,
        Target::with_manager(id, detail.employee.manager_id),
    )?;
    Ok(Json(detail))
}

/// PUT /api/employees/{id} - 更新档案
///
/// HR touches any field. Everyone else only their own phone, address and
/// email; any other field present is rejected by name. Reassigning
/// `manager_id` is refused when it would close a reporting cycle.
pub async fn update(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<i64>,
    Json(payload): Json<EmployeeUpdate>,
) -> AppResult<Json<Employee>> {
    let pool = state.get_db().pool();
    if repository::employee::find_by_id(pool, id).await?.is_none() {
        return Err(AppError::new(ErrorCode::EmployeeNotFound));
    }

    if !user.is_hr_admin() {
        if user.employee_id != Some(id) {
            return Err(AppError::forbidden(
                "Not authorized to update this employee",
            ));
        }
        if let Some(field) = first_restricted_field(&payload) {
            return Err(AppError::forbidden(format!(
                "Not authorized to update field: {field}"
            )));
        }
    }

    validate_update(&payload)?;

    if let Some(new_manager) = payload.manager_id
        && repository::employee::manager_would_cycle(pool, id, new_manager).await?
    {
        return Err(AppError::new(ErrorCode::ManagerCycle));
    }

    let employee = repository::employee::update(pool, id, &payload).await?;
    Ok(Json(employee))
}

/// POST /api/employees/{id}/documents - 上传员工文档
///
/// Multipart fields: `file` (required), `document_type` (required),
/// `description` (optional). The stored copy gets a timestamp prefix so
/// re-uploads of the same file never collide.
pub async fn upload_document(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<i64>,
    mut multipart: Multipart,
) -> AppResult<Json<DocumentPublic>> {
    let pool = state.get_db().pool();
    if repository::employee::find_by_id(pool, id).await?.is_none() {
        return Err(AppError::new(ErrorCode::EmployeeNotFound));
    }
    authorize(&user, Action::DocumentUpload, Target::employee(id))?;

    let upload = read_document_form(&mut multipart).await?;
    validate_required_text(&upload.document_type, "document_type", MAX_SHORT_TEXT_LEN)?;
    validate_optional_text(&upload.description, "description", MAX_NOTE_LEN)?;

    let extension = upload
        .file_name
        .rsplit('.')
        .next()
        .unwrap_or("")
        .to_lowercase();
    if !state.config.allowed_extensions.contains(&extension) {
        return Err(AppError::with_message(
            ErrorCode::UnsupportedFileFormat,
            format!(
                "File type not allowed. Allowed: {}",
                state.config.allowed_extensions.join(",")
            ),
        ));
    }
    if upload.bytes.len() as u64 > state.config.max_upload_size {
        return Err(AppError::with_message(
            ErrorCode::FileTooLarge,
            format!(
                "File too large. Maximum size: {} bytes",
                state.config.max_upload_size
            ),
        ));
    }

    // Strip any path the client smuggled into the file name before it
    // touches the filesystem.
    let base_name = std::path::Path::new(&upload.file_name)
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| upload.file_name.clone());

    let dir = std::path::Path::new(&state.config.upload_dir)
        .join("employees")
        .join(id.to_string());
    tokio::fs::create_dir_all(&dir)
        .await
        .map_err(|e| AppError::internal(format!("Failed to create upload directory: {e}")))?;

    let timestamp = chrono::Utc::now()
        .with_timezone(&state.config.timezone)
        .format("%Y%m%d_%H%M%S");
    let stored_path = dir.join(format!("{timestamp}_{base_name}"));
    tokio::fs::write(&stored_path, &upload.bytes)
        .await
        .map_err(|e| AppError::internal(format!("Failed to store file: {e}")))?;

    let doc = repository::document::create(
        pool,
        id,
        &upload.document_type,
        &upload.file_name,
        &stored_path.to_string_lossy(),
        upload.bytes.len() as i64,
        upload.description.as_deref(),
        user.id,
    )
    .await?;
    Ok(Json(DocumentPublic::from(doc)))
}

/// GET /api/employees/{id}/documents/{document_id} - 下载员工文档
pub async fn download_document(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path((id, document_id)): Path<(i64, i64)>,
) -> AppResult<impl IntoResponse> {
    let doc = repository::document::find_for_employee(state.get_db().pool(), document_id, id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::DocumentNotFound))?;

    authorize(&user, Action::DocumentDownload, Target::employee(id))?;

    let bytes = tokio::fs::read(&doc.file_path).await.map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            AppError::new(ErrorCode::StoredFileMissing)
        } else {
            AppError::internal(format!("Failed to read stored file: {e}"))
        }
    })?;

    let headers = [
        (header::CONTENT_TYPE, "application/octet-stream".to_string()),
        (
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{}\"", doc.file_name),
        ),
    ];
    Ok((headers, bytes))
}

struct UploadForm {
    file_name: String,
    bytes: Bytes,
    document_type: String,
    description: Option<String>,
}

async fn read_document_form(multipart: &mut Multipart) -> Result<UploadForm, AppError> {
    let mut file: Option<(String, Bytes)> = None;
    let mut document_type: Option<String> = None;
    let mut description: Option<String> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::validation(format!("Malformed multipart body: {e}")))?
    {
        match field.name() {
            Some("file") => {
                let name = field
                    .file_name()
                    .map(str::to_string)
                    .ok_or_else(|| AppError::validation("File name is required"))?;
                let bytes = field.bytes().await.map_err(|e| {
                    AppError::validation(format!("Failed to read file field: {e}"))
                })?;
                file = Some((name, bytes));
            }
            Some("document_type") => document_type = Some(read_text_field(field).await?),
            Some("description") => description = Some(read_text_field(field).await?),
            _ => {}
        }
    }

    let (file_name, bytes) =
        file.ok_or_else(|| AppError::validation("Missing multipart field: file"))?;
    let document_type = document_type
        .ok_or_else(|| AppError::validation("Missing multipart field: document_type"))?;
    Ok(UploadForm {
        file_name,
        bytes,
        document_type,
        description,
    })
}

async fn read_text_field(field: Field<'_>) -> Result<String, AppError> {
    field
        .text()
        .await
        .map_err(|e| AppError::validation(format!("Malformed multipart body: {e}")))
}

fn validate_create(payload: &EmployeeCreate) -> Result<(), AppError> {
    validate_required_text(
        &payload.employee_number,
        "employee_number",
        MAX_SHORT_TEXT_LEN,
    )?;
    validate_required_text(&payload.first_name, "first_name", MAX_NAME_LEN)?;
    validate_required_text(&payload.last_name, "last_name", MAX_NAME_LEN)?;
    validate_email(&payload.email)?;
    validate_optional_text(&payload.phone, "phone", MAX_SHORT_TEXT_LEN)?;
    validate_optional_text(&payload.gender, "gender", MAX_SHORT_TEXT_LEN)?;
    validate_optional_text(&payload.address, "address", MAX_ADDRESS_LEN)?;
    parse_date(&payload.hire_date)?;
    if let Some(dob) = &payload.date_of_birth {
        parse_date(dob)?;
    }
    Ok(())
}

fn validate_update(payload: &EmployeeUpdate) -> Result<(), AppError> {
    if let Some(email) = &payload.email {
        validate_email(email)?;
    }
    validate_optional_text(&payload.first_name, "first_name", MAX_NAME_LEN)?;
    validate_optional_text(&payload.last_name, "last_name", MAX_NAME_LEN)?;
    validate_optional_text(&payload.phone, "phone", MAX_SHORT_TEXT_LEN)?;
    validate_optional_text(&payload.gender, "gender", MAX_SHORT_TEXT_LEN)?;
    validate_optional_text(&payload.address, "address", MAX_ADDRESS_LEN)?;
    if let Some(dob) = &payload.date_of_birth {
        parse_date(dob)?;
    }
    Ok(())
}

/// Fields outside the self-service set (`phone`, `address`, `email`),
/// reported in payload declaration order.
fn first_restricted_field(payload: &EmployeeUpdate) -> Option<&'static str> {
    let restricted = [
        ("first_name", payload.first_name.is_some()),
        ("last_name", payload.last_name.is_some()),
        ("date_of_birth", payload.date_of_birth.is_some()),
        ("gender", payload.gender.is_some()),
        ("employment_status", payload.employment_status.is_some()),
        ("department_id", payload.department_id.is_some()),
        ("position_id", payload.position_id.is_some()),
        ("manager_id", payload.manager_id.is_some()),
        ("salary", payload.salary.is_some()),
    ];
    restricted
        .into_iter()
        .find(|(_, present)| *present)
        .map(|(name, _)| name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_restricted_field_detection() {
        let payload = EmployeeUpdate {
            phone: Some("555-0100".into()),
            address: Some("1 Main St".into()),
            email: Some("new@example.com".into()),
            ..Default::default()
        };
        assert_eq!(first_restricted_field(&payload), None);

        let payload = EmployeeUpdate {
            phone: Some("555-0100".into()),
            salary: Some(90000.0),
            ..Default::default()
        };
        assert_eq!(first_restricted_field(&payload), Some("salary"));
    }
}
