//! ギャラリー
//!
//! カードごとに画像・キャンバス・テキストを持ち、再描画は次のアニメーションフレームで行う

use std::sync::Arc;

use leptos::ev;
use leptos::html;
use leptos::prelude::*;
use ocr_review_common::table::GALLERY_SNIPPET_CHARS;
use ocr_review_common::{GalleryCard, GalleryView, IgnoreList, Item, Manifest};

use crate::canvas::draw_overlay;

#[component]
pub fn Gallery(
    manifest: Arc<Manifest>,
    ignore_text: RwSignal<String>,
    hide_ignored: RwSignal<bool>,
) -> impl IntoView {
    let gallery = GalleryView::new(&manifest, None);
    let cards: Vec<(GalleryCard, Item)> = gallery
        .cards()
        .iter()
        .filter_map(|card| manifest.item(card.item_id()).map(|item| (card.clone(), item.clone())))
        .collect();

    view! {
        <section class="gallery-panel">
            <div class="gallery-toolbar">
                <h2>"ギャラリー"</h2>
                <label>
                    <input
                        type="checkbox"
                        prop:checked=move || hide_ignored.get()
                        on:change=move |ev| hide_ignored.set(event_target_checked(&ev))
                    />
                    "無視語を隠す（ギャラリー）"
                </label>
            </div>
            <div class="card-grid">
                {cards
                    .into_iter()
                    .map(|(card, item)| {
                        view! {
                            <OcrCard
                                card=card
                                item=item
                                ignore_text=ignore_text
                                hide_ignored=hide_ignored
                            />
                        }
                    })
                    .collect_view()}
            </div>
        </section>
    }
}

#[component]
fn OcrCard(
    card: GalleryCard,
    item: Item,
    ignore_text: RwSignal<String>,
    hide_ignored: RwSignal<bool>,
) -> impl IntoView {
    let item = StoredValue::new(item);
    let card = StoredValue::new(card);
    let expanded = RwSignal::new(false);
    let failed = RwSignal::new(false);
    let img_ref = NodeRef::<html::Img>::new();
    let canvas_ref = NodeRef::<html::Canvas>::new();

    // 次のフレームで描く。その時点のサイズ・無視フレーズを使う
    let schedule = move || {
        request_animation_frame(move || {
            let (Some(img), Some(canvas)) = (img_ref.get_untracked(), canvas_ref.get_untracked()) else {
                return;
            };
            let (w, h) = (img.client_width() as f64, img.client_height() as f64);
            let drawable = card
                .try_update_value(|c| c.take_redraw(w, h))
                .unwrap_or(false);
            if !drawable {
                return;
            }
            let ignore_list = ignore_text.with_untracked(|text| IgnoreList::from_input(text));
            let hide = hide_ignored.get_untracked();
            item.with_value(|item| draw_overlay(&img, canvas, &item.words, &ignore_list, hide));
        });
    };

    Effect::new(move |_| {
        ignore_text.track();
        hide_ignored.track();
        card.update_value(GalleryCard::request_redraw);
        schedule();
    });

    let _ = window_event_listener(ev::resize, move |_| {
        card.update_value(GalleryCard::request_redraw);
        schedule();
    });

    let on_load = move |_| {
        card.update_value(GalleryCard::on_image_loaded);
        schedule();
    };

    let on_error = move |_| {
        card.update_value(GalleryCard::on_image_failed);
        failed.set(true);
    };

    // テキスト選択中のクリックは展開を切り替えない
    let on_click = move |_| {
        let selecting = window()
            .get_selection()
            .ok()
            .flatten()
            .is_some_and(|selection| !selection.is_collapsed());
        let next = card
            .try_update_value(|c| c.toggle_expanded(selecting))
            .unwrap_or(false);
        expanded.set(next);
    };

    let text = move || {
        expanded.track();
        card.with_value(|c| item.with_value(|item| c.text(item, GALLERY_SNIPPET_CHARS).into_owned()))
    };

    let (file_name, src) = item.with_value(|item| (item.file_name.clone(), item.image_rel_path.clone()));

    view! {
        <div class="ocr-card" class:expanded=move || expanded.get() on:click=on_click>
            <h4>{file_name.clone()}</h4>
            <div class="overlay-stack thumb">
                <img
                    node_ref=img_ref
                    src=src
                    alt=file_name
                    loading="lazy"
                    on:load=on_load
                    on:error=on_error
                />
                <canvas node_ref=canvas_ref class="overlay" />
            </div>
            <Show when=move || failed.get()>
                <p class="error">"画像なし"</p>
            </Show>
            <div class="card-info">
                <span class="text-muted">"OCR:"</span>
                <pre class="card-text">{text}</pre>
            </div>
        </div>
    }
}

