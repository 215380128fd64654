use crate::shared::error::AppError;
use base64::engine::general_purpose::STANDARD as BASE64_STANDARD;
use base64::Engine as _;
use std::path::Path;

/// 管理フォームに添付された画像
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageUpload {
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

impl ImageUpload {
    pub fn new(mime_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            mime_type: mime_type.into(),
            bytes,
        }
    }

    /// 拡張子から MIME タイプを決めて読み込む
    pub fn from_path(path: &Path) -> Result<Self, AppError> {
        let mime_type = path
            .extension()
            .and_then(|ext| ext.to_str())
            .and_then(mime_for_extension)
            .ok_or_else(|| {
                AppError::InvalidInput(format!("Unsupported image type: {}", path.display()))
            })?;
        let bytes = std::fs::read(path)?;
        Ok(Self::new(mime_type, bytes))
    }

    pub fn to_data_uri(&self) -> String {
        format!(
            "data:{};base64,{}",
            self.mime_type,
            BASE64_STANDARD.encode(&self.bytes)
        )
    }
}

fn mime_for_extension(ext: &str) -> Option<&'static str> {
    match ext.to_ascii_lowercase().as_str() {
        "png" => Some("image/png"),
        "jpg" | "jpeg" => Some("image/jpeg"),
        "gif" => Some("image/gif"),
        "webp" => Some("image/webp"),
        "svg" => Some("image/svg+xml"),
        _ => None,
    }
}
