use std::path::{Path, PathBuf};

use ocr_review_common::{DetailView, GalleryView, ImageRequest, Item, Manifest};

/// マニフェスト1つ分の閲覧状態
pub struct Session {
    /// 別セッションの読み込み完了を区別する番号
    pub id: u64,
    pub manifest: Manifest,
    pub manifest_path: PathBuf,
    pub detail: DetailView,
    pub gallery: GalleryView,
}

impl Session {
    pub fn new(
        id: u64,
        manifest: Manifest,
        manifest_path: &Path,
        gallery_limit: Option<usize>,
    ) -> (Self, Option<ImageRequest>) {
        let (detail, request) = DetailView::new(&manifest);
        let gallery = GalleryView::new(&manifest, gallery_limit);
        let session = Self {
            id,
            manifest,
            manifest_path: manifest_path.to_path_buf(),
            detail,
            gallery,
        };
        (session, request)
    }

    pub fn current_item(&self) -> Option<&Item> {
        self.detail
            .current_item_id()
            .and_then(|id| self.manifest.item(id))
    }
}

/// 起動時のマニフェスト読み込み結果
pub enum LoadState {
    Ready(Session),
    /// 致命的。エラー画面だけを出す
    Failed(String),
}
