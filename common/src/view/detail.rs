//! 詳細ビュー
//!
//! 状態: Empty / Showing(item)。
//! 選択のたびに LoadTicket を発行し、読み込み完了時に最新のチケットと
//! 照合する。古い読み込みの完了は破棄する（別アイテムのオーバーレイで上書きしない）。

use std::fmt;
use std::num::ParseIntError;
use std::str::FromStr;

use super::ImageStatus;
use crate::types::{Item, Manifest};

/// 画像読み込みの世代番号
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct LoadTicket(u64);

impl LoadTicket {
    pub fn value(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for LoadTicket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for LoadTicket {
    type Err = ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse().map(LoadTicket)
    }
}

/// 描画先に依頼する画像読み込み
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageRequest {
    pub ticket: LoadTicket,
    pub item_id: String,
    pub image_rel_path: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum DetailState {
    #[default]
    Empty,
    Showing {
        item_id: String,
        ticket: LoadTicket,
        image: ImageStatus,
    },
}

/// 詳細ビューのコントローラ
#[derive(Debug, Clone, Default)]
pub struct DetailView {
    state: DetailState,
    last_ticket: u64,
    hide_ignored: bool,
}

impl DetailView {
    /// 先頭アイテムを選択した状態で開始（アイテムがなければ Empty）
    pub fn new(manifest: &Manifest) -> (Self, Option<ImageRequest>) {
        let mut view = Self::default();
        let request = manifest.first().map(|item| view.select(item));
        (view, request)
    }

    pub fn state(&self) -> &DetailState {
        &self.state
    }

    pub fn current_item_id(&self) -> Option<&str> {
        match &self.state {
            DetailState::Empty => None,
            DetailState::Showing { item_id, .. } => Some(item_id.as_str()),
        }
    }

    pub fn image_status(&self) -> Option<ImageStatus> {
        match &self.state {
            DetailState::Empty => None,
            DetailState::Showing { image, .. } => Some(*image),
        }
    }

    pub fn hide_ignored(&self) -> bool {
        self.hide_ignored
    }

    pub fn set_hide_ignored(&mut self, hide: bool) {
        self.hide_ignored = hide;
    }

    /// アイテムを選択し、新しい画像読み込みを依頼する
    pub fn select(&mut self, item: &Item) -> ImageRequest {
        self.last_ticket += 1;
        let ticket = LoadTicket(self.last_ticket);
        self.state = DetailState::Showing {
            item_id: item.id.clone(),
            ticket,
            image: ImageStatus::Loading,
        };
        ImageRequest {
            ticket,
            item_id: item.id.clone(),
            image_rel_path: item.image_rel_path.clone(),
        }
    }

    /// 画像読み込み完了
    ///
    /// 最新の選択に対応する完了なら描画対象のアイテムIDを返す
    pub fn on_image_loaded(&mut self, ticket: LoadTicket) -> Option<&str> {
        match &mut self.state {
            DetailState::Showing {
                item_id,
                ticket: current,
                image,
            } if *current == ticket => {
                *image = ImageStatus::Ready;
                Some(item_id.as_str())
            }
            _ => {
                tracing::debug!(%ticket, "stale image load discarded");
                None
            }
        }
    }

    /// 画像読み込み失敗（オーバーレイは描かない）
    pub fn on_image_failed(&mut self, ticket: LoadTicket) {
        match &mut self.state {
            DetailState::Showing {
                ticket: current,
                image,
                ..
            } if *current == ticket => *image = ImageStatus::Failed,
            _ => tracing::debug!(%ticket, "stale image failure discarded"),
        }
    }

    /// 無視フレーズ・トグル変更時の再描画対象
    ///
    /// 画像が読み込み済みのときだけ現在のアイテムIDを返す
    pub fn redraw_target(&self) -> Option<&str> {
        match &self.state {
            DetailState::Showing {
                item_id,
                image: ImageStatus::Ready,
                ..
            } => Some(item_id.as_str()),
            _ => None,
        }
    }

    /// 現在のチケットか
    pub fn is_current(&self, ticket: LoadTicket) -> bool {
        matches!(&self.state, DetailState::Showing { ticket: current, .. } if *current == ticket)
    }
}
