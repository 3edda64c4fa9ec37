//! Template management routes
//!
//! Thin transport over the repository: every handler maps one request to one
//! repository operation and one response shape.

use axum::{
    Json, Router,
    body::Body,
    extract::{Multipart, Path, State},
    http::{StatusCode, header},
    response::Response,
    routing::get,
};
use tracing::{debug, info};

use crate::{
    AppState,
    error::{ApiError, Result},
    models::{DeleteResponse, TemplateSummary, UploadResponse},
};

/// Create template routes
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_templates).post(upload_template))
        .route("/{id}", get(download_template).delete(delete_template))
}

/// List all stored templates, metadata only
async fn list_templates(State(state): State<AppState>) -> Result<Json<Vec<TemplateSummary>>> {
    debug!("Listing templates");

    let records = state.repository.list().await?;
    let summaries = records.into_iter().map(TemplateSummary::from).collect();

    Ok(Json(summaries))
}

/// Upload a new template from a multipart `file` field
async fn upload_template(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>> {
    let mut upload: Option<(Vec<u8>, String, Option<String>)> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::BadRequest(format!("Multipart error: {}", e)))?
    {
        if field.name() != Some("file") {
            continue;
        }

        let file_name = field.file_name().unwrap_or("upload.bin").to_string();
        let content_type = field.content_type().map(|m| m.to_string()).or_else(|| {
            mime_guess::from_path(&file_name)
                .first()
                .map(|m| m.to_string())
        });
        let bytes = field
            .bytes()
            .await
            .map_err(|e| ApiError::BadRequest(format!("Upload read error: {}", e)))?;

        upload = Some((bytes.to_vec(), file_name, content_type));
    }

    let (bytes, file_name, content_type) =
        upload.ok_or_else(|| ApiError::bad_request("No file uploaded"))?;

    info!(file_name = %file_name, size = bytes.len(), "Uploading template");

    let record = state
        .repository
        .upload(bytes, &file_name, content_type)
        .await?;

    Ok(Json(UploadResponse::from(record)))
}

/// Download one template's raw content
async fn download_template(State(state): State<AppState>, Path(id): Path<i64>) -> Result<Response> {
    debug!(id, "Fetching template");

    let (record, bytes) = state.repository.fetch(id).await?;

    let content_type = record
        .content_type
        .as_deref()
        .unwrap_or("application/octet-stream");

    let response = Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, content_type)
        .header(header::CONTENT_LENGTH, bytes.len())
        .header(
            header::CONTENT_DISPOSITION,
            content_disposition_value(&record.display_name),
        )
        .body(Body::from(bytes))
        .map_err(|e| ApiError::internal(&format!("Failed to build response: {}", e)))?;

    Ok(response)
}

/// Delete a template and its stored content
async fn delete_template(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<DeleteResponse>> {
    info!(id, "Deleting template");

    state.repository.delete(id).await?;

    Ok(Json(DeleteResponse { success: true }))
}

/// Build a safe `Content-Disposition` header value
fn content_disposition_value(filename: &str) -> String {
    let safe: String = filename
        .chars()
        .filter(|c| c.is_ascii_graphic() && !matches!(c, '"' | ';' | '\\'))
        .collect();
    let name = if safe.is_empty() { "template" } else { &safe };

    format!("inline; filename=\"{}\"", name)
}

#[cfg(test)]
mod tests {
    use crate::{AppState, config::ServerConfig, create_router};
    use axum::Router;
    use axum::body::Body;
    use axum::http::{Request, StatusCode, header};
    use draftstore::TemplateRepository;
    use draftstore::storage::{MemoryBlobStorage, MemoryCatalog};
    use http_body_util::BodyExt;
    use std::sync::Arc;
    use tower::ServiceExt;

    const BOUNDARY: &str = "x-draftstore-test-boundary";

    fn test_app() -> Router {
        let repository = Arc::new(TemplateRepository::new(
            Arc::new(MemoryBlobStorage::new()),
            Arc::new(MemoryCatalog::new()),
        ));
        create_router(AppState {
            repository,
            config: ServerConfig::default(),
            http: reqwest::Client::new(),
        })
    }

    fn multipart_body(field: &str, filename: &str, content_type: &str, data: &[u8]) -> Vec<u8> {
        let mut body = Vec::new();
        body.extend_from_slice(format!("--{}\r\n", BOUNDARY).as_bytes());
        body.extend_from_slice(
            format!(
                "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\nContent-Type: {}\r\n\r\n",
                field, filename, content_type
            )
            .as_bytes(),
        );
        body.extend_from_slice(data);
        body.extend_from_slice(format!("\r\n--{}--\r\n", BOUNDARY).as_bytes());
        body
    }

    fn upload_request(body: Vec<u8>) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/api/templates")
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={}", BOUNDARY),
            )
            .body(Body::from(body))
            .unwrap()
    }

    async fn json_body(response: axum::response::Response) -> serde_json::Value {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn upload_without_file_field_is_rejected() {
        let app = test_app();

        let body = multipart_body("attachment", "contract.txt", "text/plain", b"0123456789");
        let response = app.oneshot(upload_request(body)).await.unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let payload = json_body(response).await;
        assert_eq!(payload["error"], "No file uploaded");
    }

    #[tokio::test]
    async fn rest_round_trip() {
        let app = test_app();

        // Upload
        let body = multipart_body("file", "contract.txt", "text/plain", b"0123456789");
        let response = app.clone().oneshot(upload_request(body)).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let created = json_body(response).await;
        assert_eq!(created["id"], 1);
        assert_eq!(created["displayName"], "contract.txt");
        assert_eq!(created["contentType"], "text/plain");
        assert_eq!(created["sizeBytes"], 10);

        // List
        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .uri("/api/templates")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let listed = json_body(response).await;
        assert_eq!(listed.as_array().unwrap().len(), 1);
        assert_eq!(listed[0]["displayName"], "contract.txt");
        assert!(listed[0]["uploadedAt"].is_string());
        assert!(listed[0].get("storageKey").is_none());

        // Download
        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .uri("/api/templates/1")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()[header::CONTENT_TYPE].to_str().unwrap(),
            "text/plain"
        );
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        assert_eq!(&bytes[..], b"0123456789");

        // Delete
        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .method("DELETE")
                    .uri("/api/templates/1")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let payload = json_body(response).await;
        assert_eq!(payload["success"], true);

        // Fetch after delete
        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/templates/1")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let payload = json_body(response).await;
        assert_eq!(payload["error"], "Template not found");
    }

    #[tokio::test]
    async fn download_of_unknown_id_is_not_found() {
        let app = test_app();

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/templates/42")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let payload = json_body(response).await;
        assert_eq!(payload["error"], "Template not found");
    }
}
