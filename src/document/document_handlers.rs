use axum::{
    extract::{Multipart, Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use uuid::Uuid;

use crate::{
    error::{AppError, Result},
    middleware::CurrentUser,
    state::AppState,
};
use super::document_models::{Document, NewDocument, UploadDocumentForm};

/// Record an uploaded file (multipart: `file`, optional `enrollment_id`)
#[utoipa::path(
    post,
    path = "/api/documents",
    tag = "documents",
    request_body(content = UploadDocumentForm, content_type = "multipart/form-data"),
    responses(
        (status = 201, description = "Document recorded", body = Document),
        (status = 400, description = "Missing or malformed file")
    ),
    security(("bearer_auth" = []))
)]
pub async fn upload_document(
    State(state): State<AppState>,
    user: CurrentUser,
    mut multipart: Multipart,
) -> Result<impl IntoResponse> {
    let mut file: Option<(String, String, i64)> = None;
    let mut enrollment_id = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(e.to_string()))?
    {
        let field_name = field.name().map(str::to_string);
        match field_name.as_deref() {
            Some("file") => {
                let name = field
                    .file_name()
                    .map(str::to_string)
                    .ok_or_else(|| AppError::BadRequest("File name is required".into()))?;
                let content_type = field
                    .content_type()
                    .unwrap_or("application/octet-stream")
                    .to_string();
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::BadRequest(e.to_string()))?;
                file = Some((name, content_type, bytes.len() as i64));
            }
            Some("enrollment_id") => {
                let text = field
                    .text()
                    .await
                    .map_err(|e| AppError::BadRequest(e.to_string()))?;
                if !text.trim().is_empty() {
                    let id = Uuid::parse_str(text.trim())
                        .map_err(|_| AppError::BadRequest("Invalid enrollment_id".into()))?;
                    enrollment_id = Some(id);
                }
            }
            _ => {}
        }
    }

    let (name, content_type, size) =
        file.ok_or_else(|| AppError::BadRequest("No file provided".into()))?;

    let document = state
        .document_service
        .upload(
            user.id,
            NewDocument {
                name,
                content_type,
                size,
                enrollment_id,
            },
        )
        .await?;

    Ok((StatusCode::CREATED, Json(document)))
}

#[utoipa::path(
    get,
    path = "/api/documents/me",
    tag = "documents",
    responses(
        (status = 200, description = "Caller's documents", body = Vec<Document>)
    ),
    security(("bearer_auth" = []))
)]
pub async fn get_my_documents(
    State(state): State<AppState>,
    user: CurrentUser,
) -> Result<Json<Vec<Document>>> {
    Ok(Json(state.document_service.list_for_user(user, user.id).await?))
}

/// Documents of a user (self or admin)
#[utoipa::path(
    get,
    path = "/api/users/{id}/documents",
    tag = "documents",
    params(("id" = Uuid, Path, description = "User ID")),
    responses(
        (status = 200, description = "Documents, newest first", body = Vec<Document>),
        (status = 403, description = "Admin access required")
    ),
    security(("bearer_auth" = []))
)]
pub async fn get_user_documents(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(user_id): Path<Uuid>,
) -> Result<Json<Vec<Document>>> {
    Ok(Json(state.document_service.list_for_user(user, user_id).await?))
}

/// Documents attached to an enrollment (staff only)
#[utoipa::path(
    get,
    path = "/api/enrollments/{id}/documents",
    tag = "documents",
    params(("id" = Uuid, Path, description = "Enrollment ID")),
    responses(
        (status = 200, description = "Documents, newest first", body = Vec<Document>),
        (status = 403, description = "Staff access required")
    ),
    security(("bearer_auth" = []))
)]
pub async fn get_enrollment_documents(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(enrollment_id): Path<Uuid>,
) -> Result<Json<Vec<Document>>> {
    user.require_staff()?;
    Ok(Json(state.document_service.list_for_enrollment(enrollment_id).await?))
}

#[utoipa::path(
    delete,
    path = "/api/documents/{id}",
    tag = "documents",
    params(("id" = Uuid, Path, description = "Document ID")),
    responses(
        (status = 204, description = "Document deleted"),
        (status = 403, description = "Not the owner"),
        (status = 404, description = "Document not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn delete_document(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode> {
    state.document_service.delete(user, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
