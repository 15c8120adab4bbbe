//! Employee document metadata

use serde::{Deserialize, Serialize};

/// Stored document row. `file_path` stays server-side; responses
/// go out as [`DocumentPublic`].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct EmployeeDocument {
    pub id: i64,
    pub employee_id: i64,
    pub document_type: String,
    pub file_name: String,
    pub file_path: String,
    pub file_size: Option<i64>,
    pub description: Option<String>,
    pub uploaded_by: Option<i64>,
    pub uploaded_at: i64,
}

/// Document metadata without the storage path
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentPublic {
    pub id: i64,
    pub employee_id: i64,
    pub document_type: String,
    pub file_name: String,
    pub file_size: Option<i64>,
    pub description: Option<String>,
    pub uploaded_at: i64,
}

impl From<EmployeeDocument> for DocumentPublic {
    fn from(doc: EmployeeDocument) -> Self {
        Self {
            id: doc.id,
            employee_id: doc.employee_id,
            document_type: doc.document_type,
            file_name: doc.file_name,
            file_size: doc.file_size,
            description: doc.description,
            uploaded_at: doc.uploaded_at,
        }
    }
}
