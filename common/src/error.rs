//! エラー型定義

use thiserror::Error;

/// 共通エラー型
#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Config error: {0}")]
    Config(String),

    #[error("Manifest unavailable ({0}). Run the OCR batch step to generate out/manifest.json first")]
    ManifestUnavailable(String),
}

/// 座標変換を実行できない状態
///
/// どちらも描画スキップとして扱う（エラー表示はしない）
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum GeometryError {
    #[error("image is not loaded yet (natural size is zero)")]
    ImageNotLoaded,

    #[error("image is not laid out yet (displayed size is zero)")]
    NotLaidOut,
}

/// Result型エイリアス
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_io() {
        let io_error = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let error = Error::Io(io_error);
        let display = format!("{}", error);
        assert!(display.contains("IO error"));
        assert!(display.contains("file not found"));
    }

    #[test]
    fn test_error_display_json() {
        let json_error = serde_json::from_str::<serde_json::Value>("invalid json").unwrap_err();
        let error = Error::Json(json_error);
        assert!(format!("{}", error).contains("JSON error"));
    }

    #[test]
    fn test_error_display_manifest_unavailable() {
        let error = Error::ManifestUnavailable("HTTP 404".to_string());
        let display = format!("{}", error);
        assert!(display.contains("HTTP 404"));
        assert!(display.contains("OCR batch"));
    }

    #[test]
    fn test_error_from_io() {
        let io_error = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "access denied");
        let error: Error = io_error.into();
        assert!(matches!(error, Error::Io(_)));
    }

    #[test]
    fn test_error_from_json() {
        let json_error = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let error: Error = json_error.into();
        assert!(matches!(error, Error::Json(_)));
    }

    #[test]
    fn test_geometry_error_display() {
        assert!(GeometryError::ImageNotLoaded.to_string().contains("not loaded"));
        assert!(GeometryError::NotLaidOut.to_string().contains("not laid out"));
    }
}
