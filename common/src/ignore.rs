//! 無視フレーズ判定
//!
//! 単語とフレーズの双方向部分一致で判定する。
//! 1文字のフレーズでほとんどの単語が無視されるが、この挙動はそのまま維持する。

use std::collections::BTreeSet;

/// 無視フレーズの集合（小文字・trim済み・空行なし）
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IgnoreList {
    phrases: BTreeSet<String>,
}

impl IgnoreList {
    /// 入力欄のテキスト（1行1フレーズ）から生成
    pub fn from_input(raw: &str) -> Self {
        raw.lines().collect()
    }

    pub fn is_empty(&self) -> bool {
        self.phrases.is_empty()
    }

    pub fn len(&self) -> usize {
        self.phrases.len()
    }

    pub fn phrases(&self) -> impl Iterator<Item = &str> {
        self.phrases.iter().map(String::as_str)
    }

    pub fn is_ignored(&self, word_text: &str) -> bool {
        is_ignored(word_text, self)
    }
}

impl<S: AsRef<str>> FromIterator<S> for IgnoreList {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let phrases = iter
            .into_iter()
            .map(|s| s.as_ref().trim().to_lowercase())
            .filter(|s| !s.is_empty())
            .collect();
        Self { phrases }
    }
}

/// 単語が無視対象かどうか
///
/// 空白のみの単語は常に false（空フレーズに全単語がマッチするのを防ぐ）
pub fn is_ignored(word_text: &str, ignore_list: &IgnoreList) -> bool {
    if word_text.trim().is_empty() {
        return false;
    }
    let text = word_text.to_lowercase();
    ignore_list
        .phrases()
        .any(|phrase| text.contains(phrase) || phrase.contains(text.as_str()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn list(phrases: &[&str]) -> IgnoreList {
        phrases.iter().collect()
    }

    #[test]
    fn test_from_input_normalizes_lines() {
        let ignore = IgnoreList::from_input("  Faktura \n\n2024\r\n   \nFAKTURA");
        let phrases: Vec<&str> = ignore.phrases().collect();
        assert_eq!(phrases, vec!["2024", "faktura"]);
        assert_eq!(ignore.len(), 2);
    }

    #[test]
    fn test_from_input_empty() {
        assert!(IgnoreList::from_input("").is_empty());
        assert!(IgnoreList::from_input("\n  \n\t").is_empty());
    }

    #[test]
    fn test_word_contains_phrase() {
        assert!(is_ignored("Faktura/2024", &list(&["2024"])));
    }

    #[test]
    fn test_phrase_contains_word() {
        assert!(is_ignored("VAT", &list(&["faktura vat"])));
    }

    #[test]
    fn test_case_insensitive() {
        assert!(is_ignored("INVOICE", &list(&["invoice"])));
        assert!(is_ignored("invoice", &list(&["INVOICE"])));
    }

    #[test]
    fn test_unrelated_word_kept() {
        assert!(!is_ignored("Invoice", &list(&["2024"])));
    }

    #[test]
    fn test_empty_word_never_ignored() {
        assert!(!is_ignored("", &list(&["a", "invoice"])));
        assert!(!is_ignored("   ", &list(&["a"])));
    }

    #[test]
    fn test_empty_list_never_ignores() {
        let empty = IgnoreList::default();
        for word in ["Invoice", "2024", "a", "Łódź"] {
            assert!(!is_ignored(word, &empty));
        }
    }

    #[test]
    fn test_single_letter_phrase_over_matches() {
        let ignore = list(&["a"]);
        assert!(is_ignored("Faktura", &ignore));
        assert!(is_ignored("a", &ignore));
        assert!(!is_ignored("2024", &ignore));
    }

    #[test]
    fn test_non_ascii_lowercase() {
        assert!(is_ignored("ŁÓDŹ", &list(&["łódź"])));
    }

    #[test]
    fn test_order_independent() {
        let phrases = ["faktura", "2024", "nip", "x"];
        let words = ["Faktura", "2024r.", "NIP:", "kwota", "x", "", "Razem"];
        let expected: Vec<bool> = words.iter().map(|w| is_ignored(w, &list(&phrases))).collect();

        // 全順列で結果が変わらないこと
        let mut perm = phrases.to_vec();
        let n = perm.len();
        let mut c = vec![0usize; n];
        let mut i = 0;
        while i < n {
            if c[i] < i {
                if i % 2 == 0 {
                    perm.swap(0, i);
                } else {
                    perm.swap(c[i], i);
                }
                let ignore = list(&perm);
                let actual: Vec<bool> = words.iter().map(|w| is_ignored(w, &ignore)).collect();
                assert_eq!(actual, expected, "permutation {:?}", perm);
                c[i] += 1;
                i = 0;
            } else {
                c[i] = 0;
                i += 1;
            }
        }
    }

    #[test]
    fn test_method_matches_free_function() {
        let ignore = IgnoreList::from_input("2024");
        assert_eq!(ignore.is_ignored("2024"), is_ignored("2024", &ignore));
    }
}
