//! メインアプリケーションコンポーネント

use std::sync::Arc;

use gloo::console;
use leptos::prelude::*;
use leptos::task::spawn_local;
use ocr_review_common::Manifest;

use crate::api::manifest::{fetch_manifest, MANIFEST_URL};
use crate::components::{
    detail_view::DetailPanel,
    gallery::Gallery,
    header::Header,
    ignore_panel::IgnorePanel,
    results_table::ResultsTable,
};

/// マニフェストの読み込み状態
#[derive(Clone)]
pub enum LoadState {
    Loading,
    Failed(String),
    Ready(Arc<Manifest>),
}

/// メインアプリケーションコンポーネント
#[component]
pub fn App() -> impl IntoView {
    let (state, set_state) = signal(LoadState::Loading);

    spawn_local(async move {
        match fetch_manifest(MANIFEST_URL).await {
            Ok(manifest) => {
                console::log!(format!("manifest loaded: {} items", manifest.len()));
                set_state.set(LoadState::Ready(Arc::new(manifest)));
            }
            Err(e) => {
                console::error!(e.to_string());
                set_state.set(LoadState::Failed(e.to_string()));
            }
        }
    });

    view! {
        <div class="container">
            <Header />
            {move || match state.get() {
                LoadState::Loading => view! { <p class="text-muted">"読み込み中..."</p> }.into_any(),
                LoadState::Failed(message) => view! {
                    <div class="fatal">
                        <h2>"マニフェストを読み込めません"</h2>
                        <p>{message}</p>
                    </div>
                }.into_any(),
                LoadState::Ready(manifest) => view! { <Viewer manifest=manifest /> }.into_any(),
            }}
        </div>
    }
}

/// 表・詳細・ギャラリー
#[component]
fn Viewer(manifest: Arc<Manifest>) -> impl IntoView {
    let ignore_text = RwSignal::new(String::new());
    let detail_hide = RwSignal::new(false);
    let gallery_hide = RwSignal::new(false);
    let selected = RwSignal::new(manifest.first().map(|item| item.id.clone()));

    let on_select = Callback::new(move |item_id: String| selected.set(Some(item_id)));

    view! {
        <IgnorePanel ignore_text=ignore_text />
        <div class="main-grid">
            <ResultsTable manifest=manifest.clone() selected=selected.read_only() on_select=on_select />
            <DetailPanel
                manifest=manifest.clone()
                selected=selected.read_only()
                ignore_text=ignore_text
                hide_ignored=detail_hide
            />
        </div>
        <Gallery manifest=manifest ignore_text=ignore_text hide_ignored=gallery_hide />
    }
}
