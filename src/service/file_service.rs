use crate::api::model::common::{ListQuery, MessageResponse, PaginatedResponse};
use crate::api::model::file::StoredFile;
use crate::config::app_config::AppState;
use crate::error::error_model::{AppError, ErrorType};
use crate::service::bad_request;
use axum::http::{header, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use chrono::{DateTime, Utc};
use std::io::ErrorKind;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::fs;
use tracing::{error, info};

/// Rejects names that could escape the uploads directory.
fn checked_filename(filename: &str) -> Result<&str, AppError> {
    let name = filename.trim();
    if name.is_empty() || name.contains('/') || name.contains('\\') || name.contains("..") {
        return Err(bad_request("Invalid filename", "INVALID_FILENAME"));
    }
    Ok(name)
}

fn file_path(state: &AppState, filename: &str) -> Result<PathBuf, AppError> {
    Ok(state.config.uploads_dir.join(checked_filename(filename)?))
}

fn io_error(e: std::io::Error, action: &str) -> AppError {
    if e.kind() == ErrorKind::NotFound {
        AppError::new(ErrorType::NotFound, "File not found").with_code("FILE_NOT_FOUND")
    } else {
        error!("Error trying to {} file: {:?}", action, e);
        AppError::new(ErrorType::Internal, "File operation failed").with_details(e.to_string())
    }
}

fn content_type_for(filename: &str) -> &'static str {
    if filename.to_ascii_lowercase().ends_with(".pdf") {
        "application/pdf"
    } else {
        "application/octet-stream"
    }
}

/// Lists regular files in the uploads directory, newest first.
///
/// A missing uploads directory is an empty listing.
#[tracing::instrument(
    skip(state),
    fields(service.name = "file_service", service.operation = "list_files")
)]
pub async fn list_files(state: Arc<AppState>, query: ListQuery) -> Result<Response, AppError> {
    let window = query.window();
    let mut files = Vec::new();

    match fs::read_dir(&state.config.uploads_dir).await {
        Ok(mut entries) => {
            while let Some(entry) = entries.next_entry().await.map_err(|e| io_error(e, "list"))? {
                let metadata = entry.metadata().await.map_err(|e| io_error(e, "list"))?;
                if !metadata.is_file() {
                    continue;
                }
                files.push(StoredFile {
                    filename: entry.file_name().to_string_lossy().into_owned(),
                    size: metadata.len(),
                    modified_at: metadata.modified().ok().map(DateTime::<Utc>::from),
                });
            }
        }
        Err(e) if e.kind() == ErrorKind::NotFound => {}
        Err(e) => return Err(io_error(e, "list")),
    }

    if let Some(search) = query.search.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
        let search = search.to_lowercase();
        files.retain(|f| f.filename.to_lowercase().contains(&search));
    }
    files.sort_by(|a, b| {
        b.modified_at
            .cmp(&a.modified_at)
            .then_with(|| a.filename.cmp(&b.filename))
    });

    let total = files.len() as i64;
    let page: Vec<StoredFile> = files
        .into_iter()
        .skip(usize::try_from(window.offset()).unwrap_or(usize::MAX))
        .take(window.limit as usize)
        .collect();

    Ok((
        StatusCode::OK,
        Json(PaginatedResponse::new(
            "Files retrieved successfully",
            page,
            window,
            total,
        )),
    )
        .into_response())
}

#[tracing::instrument(
    skip(state),
    fields(service.name = "file_service", service.operation = "download_file")
)]
pub async fn download_file(state: Arc<AppState>, filename: String) -> Result<Response, AppError> {
    let path = file_path(&state, &filename)?;
    let bytes = fs::read(&path).await.map_err(|e| io_error(e, "read"))?;
    let name = checked_filename(&filename)?;

    let mut response = (StatusCode::OK, bytes).into_response();
    response.headers_mut().insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static(content_type_for(name)),
    );
    if let Ok(value) = HeaderValue::from_str(&format!("attachment; filename=\"{}\"", name)) {
        response
            .headers_mut()
            .insert(header::CONTENT_DISPOSITION, value);
    }
    Ok(response)
}

#[tracing::instrument(
    skip(state),
    fields(service.name = "file_service", service.operation = "delete_file")
)]
pub async fn delete_file(state: Arc<AppState>, filename: String) -> Result<Response, AppError> {
    let path = file_path(&state, &filename)?;
    fs::remove_file(&path)
        .await
        .map_err(|e| io_error(e, "delete"))?;
    info!(file = %filename, "File deleted");
    Ok((
        StatusCode::OK,
        Json(MessageResponse::new("File deleted successfully")),
    )
        .into_response())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn traversal_names_are_rejected() {
        for name in ["../secret.pdf", "a/b.pdf", "a\\b.pdf", "..", "  "] {
            let err = checked_filename(name).unwrap_err();
            assert_eq!(err.code, "INVALID_FILENAME");
            assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        }
        assert_eq!(checked_filename(" report.pdf ").unwrap(), "report.pdf");
    }

    #[test]
    fn pdf_files_get_pdf_content_type() {
        assert_eq!(content_type_for("Report.PDF"), "application/pdf");
        assert_eq!(content_type_for("data.bin"), "application/octet-stream");
    }

    #[test]
    fn missing_file_maps_to_not_found() {
        let err = io_error(std::io::Error::from(ErrorKind::NotFound), "read");
        assert_eq!(err.status(), StatusCode::NOT_FOUND);
        assert_eq!(err.code, "FILE_NOT_FOUND");
    }
}
