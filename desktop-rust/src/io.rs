use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use image::ImageReader;
use ocr_review_common::{Error, Manifest};

/// デコード済み画像（テクスチャ用に縮小済み）
pub struct DecodedImage {
    /// 元画像のサイズ。単語ボックスはこの座標系
    pub natural: [u32; 2],
    pub size: [usize; 2],
    pub pixels: Vec<u8>,
}

pub fn load_manifest(path: &Path) -> Result<Manifest> {
    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            return Err(Error::ManifestUnavailable(format!("{} not found", path.display())).into());
        }
        Err(err) => return Err(Error::Io(err)).with_context(|| format!("read {}", path.display())),
    };
    let manifest = Manifest::from_json(&content).with_context(|| format!("parse {}", path.display()))?;
    Ok(manifest)
}

/// image_rel_path をマニフェストの場所基準で解決
pub fn resolve_image_path(manifest_path: &Path, image_rel_path: &str) -> PathBuf {
    let path = Path::new(image_rel_path);
    if path.is_absolute() {
        return path.to_path_buf();
    }
    let base_dir = manifest_path.parent().unwrap_or(Path::new("."));
    base_dir.join(path)
}

/// 画像を読み込み、長辺 max_side 以下に縮小して RGBA にする
pub fn decode_image(path: &Path, max_side: u32) -> Result<DecodedImage> {
    let image = ImageReader::open(path)
        .with_context(|| format!("open {}", path.display()))?
        .with_guessed_format()
        .with_context(|| format!("detect format {}", path.display()))?
        .decode()
        .with_context(|| format!("decode {}", path.display()))?;

    let natural = [image.width(), image.height()];
    let image = if max_side > 0 && (image.width() > max_side || image.height() > max_side) {
        image.thumbnail(max_side, max_side)
    } else {
        image
    };
    let size = [image.width() as usize, image.height() as usize];
    let pixels = image.to_rgba8().into_raw();
    Ok(DecodedImage { natural, size, pixels })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_resolve_relative_to_manifest_dir() {
        let resolved = resolve_image_path(Path::new("/demo/out/manifest.json"), "../images/a.jpg");
        assert_eq!(resolved, PathBuf::from("/demo/out/../images/a.jpg"));
    }

    #[test]
    fn test_resolve_absolute_path_unchanged() {
        let resolved = resolve_image_path(Path::new("/demo/out/manifest.json"), "/srv/scans/a.jpg");
        assert_eq!(resolved, PathBuf::from("/srv/scans/a.jpg"));
    }

    #[test]
    fn test_resolve_bare_manifest_name() {
        let resolved = resolve_image_path(Path::new("manifest.json"), "a.jpg");
        assert_eq!(resolved, PathBuf::from("a.jpg"));
    }

    #[test]
    fn test_load_missing_manifest() {
        let dir = tempdir().expect("Failed to create temp dir");
        let err = load_manifest(&dir.path().join("manifest.json")).unwrap_err();
        assert!(matches!(err.downcast_ref::<Error>(), Some(Error::ManifestUnavailable(_))));
    }

    #[test]
    fn test_load_unreadable_manifest_is_io_error() {
        let dir = tempdir().expect("Failed to create temp dir");
        // ディレクトリは読めない（NotFound ではない）
        let err = load_manifest(dir.path()).unwrap_err();
        assert!(matches!(err.downcast_ref::<Error>(), Some(Error::Io(_))));
        assert!(format!("{err:#}").contains("read"));
    }

    #[test]
    fn test_load_manifest_defaults() {
        let dir = tempdir().expect("Failed to create temp dir");
        let path = dir.path().join("manifest.json");
        std::fs::write(&path, r#"{"items": [{"id": "a", "file_name": "a.jpg"}]}"#).unwrap();

        let manifest = load_manifest(&path).expect("マニフェスト読み込み失敗");
        assert_eq!(manifest.len(), 1);
        assert!(manifest.items[0].words.is_empty());
    }

    #[test]
    fn test_load_broken_manifest() {
        let dir = tempdir().expect("Failed to create temp dir");
        let path = dir.path().join("manifest.json");
        std::fs::write(&path, "{\"items\": [").unwrap();
        let err = load_manifest(&path).unwrap_err();
        assert!(format!("{err:#}").contains("parse"));
    }

    #[test]
    fn test_decode_downscales_but_keeps_natural_size() {
        let dir = tempdir().expect("Failed to create temp dir");
        let path = dir.path().join("scan.png");
        image::RgbaImage::new(400, 200).save(&path).expect("画像保存失敗");

        let decoded = decode_image(&path, 100).expect("デコード失敗");
        assert_eq!(decoded.natural, [400, 200]);
        assert_eq!(decoded.size, [100, 50]);
        assert_eq!(decoded.pixels.len(), 100 * 50 * 4);
    }

    #[test]
    fn test_decode_missing_file() {
        let dir = tempdir().expect("Failed to create temp dir");
        assert!(decode_image(&dir.path().join("missing.png"), 100).is_err());
    }
}
