//! 結果一覧テーブル

use std::sync::Arc;

use leptos::prelude::*;
use ocr_review_common::table::{filter_items, snippet, TABLE_SNIPPET_CHARS};
use ocr_review_common::Manifest;

#[component]
pub fn ResultsTable(
    manifest: Arc<Manifest>,
    selected: ReadSignal<Option<String>>,
    on_select: Callback<String>,
) -> impl IntoView {
    let (query, set_query) = signal(String::new());

    let rows = move || {
        query.with(|q| {
            filter_items(&manifest.items, q)
                .into_iter()
                .map(|item| {
                    (
                        item.id.clone(),
                        item.file_name.clone(),
                        snippet(&item.full_text, TABLE_SNIPPET_CHARS).into_owned(),
                    )
                })
                .collect::<Vec<_>>()
        })
    };

    view! {
        <section class="results-panel">
            <input
                type="search"
                class="table-filter"
                placeholder="絞り込み..."
                prop:value=move || query.get()
                on:input=move |ev| set_query.set(event_target_value(&ev))
            />
            <table class="results-table">
                <thead>
                    <tr><th>"ファイル"</th><th>"テキスト"</th></tr>
                </thead>
                <tbody>
                    <For
                        each=rows
                        key=|(id, _, _)| id.clone()
                        children=move |(id, file_name, text)| {
                            let is_selected = {
                                let id = id.clone();
                                move || selected.get().as_deref() == Some(id.as_str())
                            };
                            view! {
                                <tr
                                    class:selected=is_selected
                                    on:click=move |_| on_select.run(id.clone())
                                >
                                    <td class="file-name">{file_name}</td>
                                    <td class="snippet">{text}</td>
                                </tr>
                            }
                        }
                    />
                </tbody>
            </table>
        </section>
    }
}
