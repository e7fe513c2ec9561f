/// Media upload handlers and the shared multipart reader
use crate::error::{AppError, Result};
use crate::services::media::{absolute_url, MediaStorage};
use actix_multipart::Multipart;
use actix_web::{web, HttpRequest, HttpResponse};
use futures_util::StreamExt;
use std::collections::HashMap;

/// A file part extracted from a multipart request
#[derive(Debug)]
pub struct UploadedFile {
    pub file_name: String,
    pub content_type: String,
    pub data: Vec<u8>,
}

/// Drain a multipart payload into at most one file part (field "file")
/// plus the remaining text fields. Enforces the byte cap while reading
/// so an oversized upload is rejected before it is buffered whole.
pub async fn read_multipart(
    payload: &mut Multipart,
    max_bytes: usize,
) -> Result<(Option<UploadedFile>, HashMap<String, String>)> {
    let mut file = None;
    let mut fields = HashMap::new();

    while let Some(item) = payload.next().await {
        let mut field =
            item.map_err(|e| AppError::BadRequest(format!("Multipart error: {}", e)))?;

        let name = field.name().to_string();
        let file_name = field
            .content_disposition()
            .get_filename()
            .map(str::to_owned);
        let content_type = field
            .content_type()
            .map(|m| m.to_string())
            .unwrap_or_else(|| "application/octet-stream".to_string());

        let mut data = Vec::new();
        while let Some(chunk) = field.next().await {
            let bytes =
                chunk.map_err(|e| AppError::BadRequest(format!("Upload read error: {}", e)))?;
            if data.len() + bytes.len() > max_bytes {
                return Err(AppError::PayloadTooLarge(format!(
                    "File too large. Max {} bytes",
                    max_bytes
                )));
            }
            data.extend_from_slice(&bytes);
        }

        match file_name {
            Some(original_name) if name == "file" => {
                file = Some(UploadedFile {
                    file_name: original_name,
                    content_type,
                    data,
                });
            }
            _ => {
                fields.insert(name, String::from_utf8_lossy(&data).to_string());
            }
        }
    }

    Ok((file, fields))
}

/// Upload a single file and return its public URL and detected type
pub async fn upload(
    req: HttpRequest,
    storage: web::Data<MediaStorage>,
    mut payload: Multipart,
) -> Result<HttpResponse> {
    let (file, _fields) = read_multipart(&mut payload, storage.max_bytes()).await?;

    let file = file.ok_or_else(|| AppError::BadRequest("No file uploaded".to_string()))?;

    let stored = storage
        .save(&file.file_name, &file.content_type, &file.data)
        .await?;

    let info = req.connection_info();
    let url = absolute_url(info.scheme(), info.host(), &stored.relative_url);

    Ok(HttpResponse::Created().json(serde_json::json!({
        "url": url,
        "type": stored.kind,
        "filename": file.file_name,
        "size": stored.size,
    })))
}
