use axum::Json;
use axum::extract::{Multipart, Path as AxumPath};
use axum::http::header::CONTENT_TYPE;
use axum::response::IntoResponse;
use serde_json::{Value, json};

use crate::pkg::internal::uploads::{content_type_for, save_upload, upload_dir};
use crate::prelude::{Error, Result};

pub async fn upload(mut multipart: Multipart) -> Result<Json<Value>> {
    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some("file") {
            let _ = field.bytes().await?;
            continue;
        }
        let file_name = field.file_name().unwrap_or("unknown").to_string();
        let data = field.bytes().await?;
        if data.is_empty() {
            return Err(Error::Validation("File is empty".to_string()));
        }
        let url = save_upload(&file_name, &data).await?;
        return Ok(Json(json!({ "url": url })));
    }
    Err(Error::Validation("missing 'file' field".to_string()))
}

pub async fn retrieve(AxumPath(filename): AxumPath<String>) -> Result<impl IntoResponse> {
    // The route only matches a single path segment, but don't trust the name.
    if filename.contains("..") || filename.contains('/') {
        return Err(Error::Validation("invalid filename".to_string()));
    }
    let data = tokio::fs::read(upload_dir().join(&filename))
        .await
        .map_err(|_| Error::NotFound("file"))?;
    tracing::debug!("retrieved {}, size: {} bytes", &filename, data.len());
    Ok((
        [(CONTENT_TYPE, content_type_for(&filename).to_string())],
        data,
    ))
}
