//! ビューア設定
//!
//! ~/.config/ocr-review/config.json を読むだけで、書き戻さない

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use ocr_review_common::table::{GALLERY_SNIPPET_CHARS, TABLE_SNIPPET_CHARS};
use ocr_review_common::Error;
use serde::{Deserialize, Serialize};

pub const MANIFEST_ENV: &str = "OCR_REVIEW_MANIFEST";
pub const VERBOSE_ENV: &str = "OCR_REVIEW_VERBOSE";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    pub manifest_path: PathBuf,
    /// 無視フレーズ欄の初期値（1行1フレーズ）
    pub ignore_phrases: String,
    pub hide_ignored: bool,
    pub gallery_hide_ignored: bool,
    pub thumbnail_max_side: u32,
    pub detail_max_side: u32,
    pub table_snippet_chars: usize,
    pub gallery_snippet_chars: usize,
    pub gallery_limit: Option<usize>,
    pub verbose: bool,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            manifest_path: PathBuf::from("out/manifest.json"),
            ignore_phrases: String::new(),
            hide_ignored: false,
            gallery_hide_ignored: false,
            thumbnail_max_side: 320,
            detail_max_side: 2048,
            table_snippet_chars: TABLE_SNIPPET_CHARS,
            gallery_snippet_chars: GALLERY_SNIPPET_CHARS,
            gallery_limit: None,
            verbose: false,
        }
    }
}

impl ViewerConfig {
    /// 設定ファイル + 環境変数
    pub fn load() -> Result<Self> {
        let mut config = match Self::config_path() {
            Some(path) if path.exists() => Self::load_from(&path)?,
            _ => Self::default(),
        };
        config.apply_env(|key| std::env::var(key).ok());
        Ok(config)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("read {}", path.display()))?;
        let config: ViewerConfig = serde_json::from_str(&content)
            .with_context(|| format!("parse {}", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> std::result::Result<(), Error> {
        if self.thumbnail_max_side == 0 || self.detail_max_side == 0 {
            return Err(Error::Config("image max side must be positive".to_string()));
        }
        Ok(())
    }

    pub fn config_path() -> Option<PathBuf> {
        dirs::home_dir().map(|home| home.join(".config").join("ocr-review").join("config.json"))
    }

    fn apply_env(&mut self, var: impl Fn(&str) -> Option<String>) {
        if let Some(path) = var(MANIFEST_ENV).filter(|v| !v.trim().is_empty()) {
            self.manifest_path = PathBuf::from(path);
        }
        if let Some(flag) = var(VERBOSE_ENV) {
            self.verbose = !matches!(flag.trim(), "" | "0" | "false");
        }
    }
}
