use std::path::{Path, PathBuf};

use chrono::Local;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use uuid::Uuid;

use crate::{conf::settings, prelude::Result};

pub fn upload_dir() -> PathBuf {
    PathBuf::from(&settings.upload_dir)
}

/// Writes uploaded bytes under the configured directory and returns the
/// relative URL the stored file is served from. Filenames are
/// `<timestamp>_<random><ext>` so repeated uploads of the same file never
/// collide.
pub async fn save_upload(original_name: &str, data: &[u8]) -> Result<String> {
    let dir = upload_dir();
    fs::create_dir_all(&dir).await?;

    let extension = Path::new(original_name)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| format!(".{}", ext.to_lowercase()))
        .unwrap_or_default();
    let timestamp = Local::now().format("%Y%m%d%H%M%S");
    let suffix = Uuid::new_v4().simple().to_string();
    let filename = format!("{}_{}{}", timestamp, &suffix[..6], extension);

    let mut file = fs::File::create(dir.join(&filename)).await?;
    file.write_all(data).await?;

    tracing::debug!("stored upload {} ({} bytes)", &filename, data.len());
    Ok(format!("/uploads/{}", filename))
}

pub fn content_type_for(filename: &str) -> &'static str {
    let extension = Path::new(filename)
        .extension()
        .and_then(|ext| ext.to_str())
        .unwrap_or("")
        .to_lowercase();
    match extension.as_str() {
        "pdf" => "application/pdf",
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "webp" => "image/webp",
        "gif" => "image/gif",
        "txt" => "text/plain; charset=utf-8",
        "doc" => "application/msword",
        "docx" => "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
        _ => "application/octet-stream",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn content_type_covers_common_uploads() {
        assert_eq!(content_type_for("resume.pdf"), "application/pdf");
        assert_eq!(content_type_for("shot.PNG"), "image/png");
        assert_eq!(content_type_for("photo.jpeg"), "image/jpeg");
        assert_eq!(content_type_for("mystery"), "application/octet-stream");
    }
}
