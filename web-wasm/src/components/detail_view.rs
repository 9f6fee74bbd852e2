//! 詳細ビュー（選択中アイテムの画像 + オーバーレイ + 全文）

use std::sync::Arc;

use leptos::ev;
use leptos::html;
use leptos::prelude::*;
use ocr_review_common::table::NO_TEXT;
use ocr_review_common::{
    DetailView, IgnoreList, ImageRequest, ImageStatus, LoadTicket, Manifest, RenderStats,
};

use crate::canvas::draw_overlay;

#[component]
pub fn DetailPanel(
    manifest: Arc<Manifest>,
    selected: ReadSignal<Option<String>>,
    ignore_text: RwSignal<String>,
    hide_ignored: RwSignal<bool>,
) -> impl IntoView {
    let (initial_view, initial_request) = DetailView::new(&manifest);
    let detail = StoredValue::new(initial_view);
    let request = RwSignal::new(initial_request);
    let image_status = RwSignal::new(detail.with_value(|d| d.image_status()));
    let stats = RwSignal::new(None::<RenderStats>);
    let img_ref = NodeRef::<html::Img>::new();
    let canvas_ref = NodeRef::<html::Canvas>::new();

    // 描画時点の選択・無視フレーズで描く
    let redraw = {
        let manifest = manifest.clone();
        move || {
            let Some(item_id) = detail.with_value(|d| d.redraw_target().map(str::to_string)) else {
                return;
            };
            let Some(item) = manifest.item(&item_id) else {
                return;
            };
            let (Some(img), Some(canvas)) = (img_ref.get_untracked(), canvas_ref.get_untracked()) else {
                return;
            };
            let ignore_list = ignore_text.with_untracked(|text| IgnoreList::from_input(text));
            let hide = detail.with_value(|d| d.hide_ignored());
            stats.set(draw_overlay(&img, canvas, &item.words, &ignore_list, hide));
        }
    };

    // 行クリックによる選択
    {
        let manifest = manifest.clone();
        Effect::new(move |_| {
            let Some(item_id) = selected.get() else {
                return;
            };
            if detail.with_value(|d| d.current_item_id() == Some(item_id.as_str())) {
                return;
            }
            let Some(item) = manifest.item(&item_id) else {
                return;
            };
            let next = detail.try_update_value(|d| d.select(item));
            image_status.set(Some(ImageStatus::Loading));
            stats.set(None);
            request.set(next);
        });
    }

    // 無視フレーズ・トグル変更は現在のアイテムだけ描き直す
    {
        let redraw = redraw.clone();
        Effect::new(move |_| {
            ignore_text.track();
            let hide = hide_ignored.get();
            detail.update_value(|d| d.set_hide_ignored(hide));
            redraw();
        });
    }

    {
        let redraw = redraw.clone();
        let _ = window_event_listener(ev::resize, move |_| redraw());
    }

    // 完了した読み込み自身のチケットで判定する（古い読み込みは捨てられる）
    let on_loaded = move |ticket: LoadTicket| {
        let current = detail
            .try_update_value(|d| d.on_image_loaded(ticket).is_some())
            .unwrap_or(false);
        if current {
            image_status.set(Some(ImageStatus::Ready));
            redraw();
        }
    };

    let on_failed = move |ticket: LoadTicket| {
        detail.update_value(|d| d.on_image_failed(ticket));
        image_status.set(detail.with_value(|d| d.image_status()));
    };

    let full_text = move || {
        request.with(|req| {
            req.as_ref()
                .and_then(|r| manifest.item(&r.item_id))
                .map(|item| item.full_text.clone())
                .filter(|text| !text.trim().is_empty())
                .unwrap_or_else(|| NO_TEXT.to_string())
        })
    };

    view! {
        <section class="detail-panel">
            <div class="detail-toolbar">
                <label>
                    <input
                        type="checkbox"
                        prop:checked=move || hide_ignored.get()
                        on:change=move |ev| hide_ignored.set(event_target_checked(&ev))
                    />
                    "無視語を隠す（詳細）"
                </label>
                <span class="stats">
                    {move || stats.get().map(|s| format!("{} 件表示 / {} 件非表示", s.drawn, s.hidden))}
                </span>
            </div>
            <Show when=move || request.with(Option::is_none)>
                <p class="text-muted">"アイテムがありません"</p>
            </Show>
            <div class="overlay-stack" class:hidden=move || request.with(Option::is_none)>
                // 選択ごとに新しい <img> を作る。同じパスでも load が必ず発火する
                <For
                    each=move || request.get()
                    key=|req: &ImageRequest| req.ticket
                    children=move |req: ImageRequest| {
                        let on_loaded = on_loaded.clone();
                        let ticket = req.ticket;
                        view! {
                            <img
                                node_ref=img_ref
                                src=req.image_rel_path
                                on:load=move |_| on_loaded(ticket)
                                on:error=move |_| on_failed(ticket)
                            />
                        }
                    }
                />
                <canvas
                    node_ref=canvas_ref
                    class="overlay"
                    class:hidden=move || image_status.get() != Some(ImageStatus::Ready)
                />
            </div>
            <Show when=move || image_status.get() == Some(ImageStatus::Failed)>
                <p class="error">"画像を読み込めませんでした"</p>
            </Show>
            <h3>"全文"</h3>
            <pre class="full-text">{full_text}</pre>
        </section>
    }
}
