//! Uploaded resume handling: type/size checks, text extraction, storage.

use aws_sdk_s3::primitives::ByteStream;
use bytes::Bytes;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::errors::AppError;

pub const PDF_CONTENT_TYPE: &str = "application/pdf";
/// Keeps screening prompts bounded for very long resumes.
const MAX_RESUME_CHARS: usize = 20_000;

#[derive(Debug, Clone)]
pub struct ResumeFile {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Bytes,
}

impl ResumeFile {
    pub fn new(file_name: Option<&str>, content_type: Option<&str>, bytes: Bytes) -> Self {
        let file_name = file_name
            .map(sanitize_file_name)
            .filter(|name| !name.is_empty())
            .unwrap_or_else(|| "resume".to_string());
        let content_type = content_type
            .map(|ct| ct.trim().to_ascii_lowercase())
            .filter(|ct| !ct.is_empty() && ct != "application/octet-stream")
            .unwrap_or_else(|| guess_content_type(&file_name).to_string());
        Self {
            file_name,
            content_type,
            bytes,
        }
    }

    pub fn is_pdf(&self) -> bool {
        self.content_type == PDF_CONTENT_TYPE
    }

    fn is_image(&self) -> bool {
        self.content_type.starts_with("image/")
    }
}

/// Only non-empty PDFs and images up to `max_bytes` are accepted.
pub fn validate_resume(file: &ResumeFile, max_bytes: usize) -> Result<(), AppError> {
    if file.bytes.is_empty() {
        return Err(AppError::Validation("Resume file is empty".to_string()));
    }
    if file.bytes.len() > max_bytes {
        return Err(AppError::Validation(format!(
            "Resume file exceeds the {max_bytes} byte limit"
        )));
    }
    if !file.is_pdf() && !file.is_image() {
        return Err(AppError::Validation(
            "Only PDF and image files are allowed".to_string(),
        ));
    }
    Ok(())
}

/// Best-effort plain text for screening. Images and unreadable PDFs fall
/// back to a short placeholder naming the candidate and file.
pub async fn extract_resume_text(file: &ResumeFile, candidate_name: &str) -> String {
    if file.is_pdf() {
        let bytes = file.bytes.clone();
        match tokio::task::spawn_blocking(move || pdf_extract::extract_text_from_mem(&bytes)).await
        {
            Ok(Ok(text)) => {
                let text = tidy_text(&text);
                if !text.is_empty() {
                    return text;
                }
                debug!(file = %file.file_name, "PDF contained no extractable text");
            }
            Ok(Err(e)) => warn!(file = %file.file_name, error = ?e, "PDF text extraction failed"),
            Err(e) => warn!(file = %file.file_name, error = %e, "PDF text extraction panicked"),
        }
    }
    placeholder_text(candidate_name, &file.file_name)
}

/// Uploads the file and returns its object key.
pub async fn store_resume(
    s3: &aws_sdk_s3::Client,
    bucket: &str,
    file: &ResumeFile,
) -> Result<String, AppError> {
    let key = format!("resumes/{}/{}", Uuid::new_v4(), file.file_name);
    s3.put_object()
        .bucket(bucket)
        .key(&key)
        .body(ByteStream::from(file.bytes.clone()))
        .content_type(&file.content_type)
        .send()
        .await
        .map_err(|e| AppError::Storage(format!("Resume upload failed: {e}")))?;

    info!("Uploaded resume to s3://{bucket}/{key}");
    Ok(key)
}

fn placeholder_text(candidate_name: &str, file_name: &str) -> String {
    format!("Resume submitted by {candidate_name} ({file_name}). The document text could not be extracted.")
}

/// Trims lines, drops blank ones and caps the length.
fn tidy_text(raw: &str) -> String {
    let joined = raw
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n");
    joined.chars().take(MAX_RESUME_CHARS).collect()
}

/// Last path segment with anything outside `[A-Za-z0-9._-]` replaced.
fn sanitize_file_name(name: &str) -> String {
    let base = name.rsplit(|c: char| c == '/' || c == '\\').next().unwrap_or(name);
    base.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                c
            } else {
                '_'
            }
        })
        .collect::<String>()
        .trim_matches('.')
        .to_string()
}

fn guess_content_type(file_name: &str) -> &'static str {
    let ext = file_name
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .unwrap_or_default();
    match ext.as_str() {
        "pdf" => PDF_CONTENT_TYPE,
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "webp" => "image/webp",
        _ => "application/octet-stream",
    }
}
