//! 一覧表示用ヘルパー

use std::borrow::Cow;

use crate::types::Item;

/// テキストがないときの表示
pub const NO_TEXT: &str = "(no text)";

/// 一覧の行に出す抜粋の文字数
pub const TABLE_SNIPPET_CHARS: usize = 80;

/// ギャラリーカードの抜粋の文字数
pub const GALLERY_SNIPPET_CHARS: usize = 220;

/// 先頭 n 文字の抜粋（超えたら "…" を付ける）
pub fn snippet(text: &str, n: usize) -> Cow<'_, str> {
    let text = text.trim();
    match text.char_indices().nth(n) {
        None => Cow::Borrowed(text),
        Some((end, _)) => Cow::Owned(format!("{}…", &text[..end])),
    }
}

/// ファイル名・全文の部分一致で絞り込む（大文字小文字を区別しない）
pub fn filter_items<'a>(items: &'a [Item], query: &str) -> Vec<&'a Item> {
    let query = query.trim().to_lowercase();
    if query.is_empty() {
        return items.iter().collect();
    }
    items
        .iter()
        .filter(|item| {
            item.file_name.to_lowercase().contains(&query)
                || item.full_text.to_lowercase().contains(&query)
        })
        .collect()
}
