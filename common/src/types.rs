//! マニフェストの型定義
//!
//! OCRバッチ処理が出力する manifest.json を表す:
//! - Manifest: 全体（items の並び）
//! - Item: 画像1枚と抽出テキスト・単語ボックス
//! - Word: 単語1つ分のテキストとボックス（元画像のピクセル座標）

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// manifest.json のルート
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Manifest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,

    /// OCR言語（例: "pol"）
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lang: Option<String>,

    pub items: Vec<Item>,
}

/// 画像1枚分のOCR結果
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Item {
    pub id: String,
    pub file_name: String,

    /// ビューアから見た画像の相対パス
    pub image_rel_path: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub tsv_rel_path: Option<String>,

    pub full_text: String,
    pub words: Vec<Word>,
}

/// OCRで検出された単語
///
/// 座標はすべて元画像（natural）のピクセル単位
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Word {
    pub text: String,

    /// 信頼度 (0..100)。表示用のみ
    #[serde(skip_serializing_if = "Option::is_none")]
    pub conf: Option<f64>,

    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl Manifest {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// id で Item を探す（線形探索。マニフェストは小さい前提）
    pub fn item(&self, id: &str) -> Option<&Item> {
        self.items.iter().find(|item| item.id == id)
    }

    pub fn position(&self, id: &str) -> Option<usize> {
        self.items.iter().position(|item| item.id == id)
    }

    pub fn first(&self) -> Option<&Item> {
        self.items.first()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
