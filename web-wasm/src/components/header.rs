//! ヘッダーコンポーネント

use leptos::prelude::*;

#[component]
pub fn Header() -> impl IntoView {
    view! {
        <header class="header">
            <h1>"OCR Review - 認識結果ビューア"</h1>
        </header>
    }
}
