//! マニフェスト取得
//!
//! OCRバッチが書き出した out/manifest.json をページからの相対URLで読む

use ocr_review_common::{Error, Manifest};
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;
use web_sys::{Request, RequestInit, RequestMode, Response};

pub const MANIFEST_URL: &str = "../out/manifest.json";

/// マニフェストを取得してパース
///
/// 取得できない（404・ネットワークエラー）場合は ManifestUnavailable
pub async fn fetch_manifest(url: &str) -> Result<Manifest, Error> {
    let text = fetch_text(url)
        .await
        .map_err(|e| Error::ManifestUnavailable(format!("{url}: {}", js_message(&e))))?;
    Manifest::from_json(&text)
}

async fn fetch_text(url: &str) -> Result<String, JsValue> {
    let opts = RequestInit::new();
    opts.set_method("GET");
    opts.set_mode(RequestMode::SameOrigin);

    let request = Request::new_with_str_and_init(url, &opts)?;
    let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
    let resp_value = JsFuture::from(window.fetch_with_request(&request)).await?;
    let resp: Response = resp_value.dyn_into()?;

    if !resp.ok() {
        return Err(JsValue::from_str(&format!("HTTP {}", resp.status())));
    }

    let text = JsFuture::from(resp.text()?).await?;
    text.as_string()
        .ok_or_else(|| JsValue::from_str("response body is not text"))
}

/// JsValue のエラーを表示用文字列に
pub fn js_message(value: &JsValue) -> String {
    value
        .as_string()
        .unwrap_or_else(|| format!("{value:?}"))
}
