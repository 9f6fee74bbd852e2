//! 無視フレーズ入力

use leptos::prelude::*;

#[component]
pub fn IgnorePanel(ignore_text: RwSignal<String>) -> impl IntoView {
    view! {
        <div class="settings-panel">
            <div class="form-group">
                <label for="ignore-phrases">"無視フレーズ（1行に1つ）"</label>
                <textarea
                    id="ignore-phrases"
                    rows="4"
                    placeholder="例: 2024"
                    prop:value=move || ignore_text.get()
                    on:input=move |ev| {
                        ignore_text.set(event_target_value(&ev));
                    }
                />
            </div>
        </div>
    }
}
