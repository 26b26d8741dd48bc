use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

/// Metadata of an uploaded file. The bytes themselves are not stored.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Document {
    pub id: Uuid,
    pub name: String,
    pub url: String,
    pub content_type: String,
    pub size: i64,
    pub user_id: Uuid,
    pub enrollment_id: Option<Uuid>,
    pub uploaded_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewDocument {
    pub name: String,
    pub content_type: String,
    pub size: i64,
    pub enrollment_id: Option<Uuid>,
}

/// Shape of the multipart upload, for the API docs.
#[derive(ToSchema)]
#[allow(dead_code)]
pub struct UploadDocumentForm {
    #[schema(value_type = String, format = Binary)]
    pub file: Vec<u8>,
    pub enrollment_id: Option<Uuid>,
}

/// `{base}/{key}/{name}`, tolerating a trailing slash on `base`.
pub fn document_url(base_url: &str, key: Uuid, name: &str) -> String {
    format!("{}/{}/{}", base_url.trim_end_matches('/'), key, name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_url() {
        let key = Uuid::nil();
        assert_eq!(
            document_url("https://example.com/files/", key, "transcript.pdf"),
            "https://example.com/files/00000000-0000-0000-0000-000000000000/transcript.pdf"
        );
        assert_eq!(
            document_url("https://cdn.test", key, "a.png"),
            format!("https://cdn.test/{}/a.png", key)
        );
    }
}
