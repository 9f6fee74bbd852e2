//! ビューコントローラ
//!
//! 詳細ビュー（1枚）とギャラリー（サムネイル一覧）の再描画プロトコル。
//! 描画先（egui / ブラウザ）に依存しない状態機械として実装する。

pub mod detail;
pub mod gallery;

pub use detail::{DetailState, DetailView, ImageRequest, LoadTicket};
pub use gallery::{GalleryCard, GalleryView};

/// 画像の読み込み状態
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ImageStatus {
    #[default]
    Loading,
    Ready,
    Failed,
}
