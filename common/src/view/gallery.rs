//! ギャラリービュー
//!
//! カードごとに独立した状態（展開フラグ・画像状態・再描画待ち）を持つ。
//! 無視フレーズやトグルが変わると全カードがそれぞれ再描画を要求し、
//! 実際の描画は次のフレームで行う。

use std::borrow::Cow;

use super::ImageStatus;
use crate::table::{snippet, NO_TEXT};
use crate::types::{Item, Manifest};

/// ギャラリーのカード1枚分
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GalleryCard {
    item_id: String,
    expanded: bool,
    image: ImageStatus,
    redraw_pending: bool,
}

impl GalleryCard {
    pub fn new(item_id: impl Into<String>) -> Self {
        Self {
            item_id: item_id.into(),
            expanded: false,
            image: ImageStatus::Loading,
            redraw_pending: false,
        }
    }

    pub fn item_id(&self) -> &str {
        &self.item_id
    }

    pub fn is_expanded(&self) -> bool {
        self.expanded
    }

    pub fn image_status(&self) -> ImageStatus {
        self.image
    }

    pub fn is_redraw_pending(&self) -> bool {
        self.redraw_pending
    }

    pub fn on_image_loaded(&mut self) {
        self.image = ImageStatus::Ready;
        self.request_redraw();
    }

    pub fn on_image_failed(&mut self) {
        self.image = ImageStatus::Failed;
        self.redraw_pending = false;
    }

    /// 再描画を要求（実行は次のフレーム）
    pub fn request_redraw(&mut self) {
        self.redraw_pending = true;
    }

    /// フレーム到来時に呼ぶ。要求を消費し、描画してよいかを返す
    ///
    /// 同じフレーム内の複数要求は1回の描画にまとまる
    pub fn take_redraw(&mut self, displayed_width: f64, displayed_height: f64) -> bool {
        if !std::mem::take(&mut self.redraw_pending) {
            return false;
        }
        let drawable = self.is_drawable(displayed_width, displayed_height);
        if !drawable {
            tracing::debug!(item_id = %self.item_id, "gallery redraw skipped");
        }
        drawable
    }

    /// 画像が読み込み済みかつレイアウト済みか
    pub fn is_drawable(&self, displayed_width: f64, displayed_height: f64) -> bool {
        self.image == ImageStatus::Ready && displayed_width > 0.0 && displayed_height > 0.0
    }

    /// テキスト欄の展開を切り替える
    ///
    /// テキスト選択中はクリックを無視する（コピー操作を妨げない）
    pub fn toggle_expanded(&mut self, selecting_text: bool) -> bool {
        if !selecting_text {
            self.expanded = !self.expanded;
        }
        self.expanded
    }

    /// 表示するテキスト（展開時は全文、それ以外は抜粋）
    pub fn text<'a>(&self, item: &'a Item, snippet_chars: usize) -> Cow<'a, str> {
        if item.full_text.trim().is_empty() {
            return Cow::Borrowed(NO_TEXT);
        }
        if self.expanded {
            Cow::Borrowed(item.full_text.as_str())
        } else {
            snippet(&item.full_text, snippet_chars)
        }
    }
}

/// ギャラリー全体のコントローラ
#[derive(Debug, Clone, Default)]
pub struct GalleryView {
    cards: Vec<GalleryCard>,
    hide_ignored: bool,
}

impl GalleryView {
    /// limit が Some(n>0) なら先頭 n 件だけカードを作る
    pub fn new(manifest: &Manifest, limit: Option<usize>) -> Self {
        let count = match limit {
            Some(n) if n > 0 => n.min(manifest.len()),
            _ => manifest.len(),
        };
        let cards = manifest.items[..count]
            .iter()
            .map(|item| GalleryCard::new(item.id.as_str()))
            .collect();
        Self {
            cards,
            hide_ignored: false,
        }
    }

    pub fn cards(&self) -> &[GalleryCard] {
        &self.cards
    }

    pub fn cards_mut(&mut self) -> &mut [GalleryCard] {
        &mut self.cards
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn card(&self, item_id: &str) -> Option<&GalleryCard> {
        self.cards.iter().find(|card| card.item_id == item_id)
    }

    pub fn card_mut(&mut self, item_id: &str) -> Option<&mut GalleryCard> {
        self.cards.iter_mut().find(|card| card.item_id == item_id)
    }

    pub fn hide_ignored(&self) -> bool {
        self.hide_ignored
    }

    pub fn set_hide_ignored(&mut self, hide: bool) {
        self.hide_ignored = hide;
        self.request_redraw_all();
    }

    pub fn on_ignore_changed(&mut self) {
        self.request_redraw_all();
    }

    /// カードごとに独立して再描画を要求
    pub fn request_redraw_all(&mut self) {
        for card in &mut self.cards {
            card.request_redraw();
        }
    }
}
