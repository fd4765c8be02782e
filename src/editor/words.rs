//! 単語境界の計算
//!
//! emacs系の単語は英数字と `WORDCHARS` の文字で構成される。
//! vi系は「単語」（英数字と `_`）と「記号列」を区別し、大文字版（W/B/E）は空白以外すべてを一続きとみなす。

use crate::options::DEFAULT_WORDCHARS;

/// emacs系単語の構成文字
#[derive(Debug, Clone)]
pub struct WordChars {
    extra: String,
}

impl Default for WordChars {
    fn default() -> Self {
        Self::new(DEFAULT_WORDCHARS)
    }
}

impl WordChars {
    pub fn new(extra: &str) -> Self {
        Self { extra: extra.to_string() }
    }

    pub fn is_word(&self, c: char) -> bool {
        c.is_alphanumeric() || self.extra.contains(c)
    }
}

/// 単語末尾へ（空白・区切りを飛ばしてから単語を飛ばす）
pub fn forward_word(chars: &[char], pos: usize, wc: &WordChars) -> usize {
    let mut i = pos.min(chars.len());
    while i < chars.len() && !wc.is_word(chars[i]) {
        i += 1;
    }
    while i < chars.len() && wc.is_word(chars[i]) {
        i += 1;
    }
    i
}

/// 単語先頭へ
pub fn backward_word(chars: &[char], pos: usize, wc: &WordChars) -> usize {
    let mut i = pos.min(chars.len());
    while i > 0 && !wc.is_word(chars[i - 1]) {
        i -= 1;
    }
    while i > 0 && wc.is_word(chars[i - 1]) {
        i -= 1;
    }
    i
}

/// emacs本来の英数字のみの単語境界（前方）
pub fn forward_alnum_word(chars: &[char], pos: usize) -> usize {
    forward_word(chars, pos, &WordChars::new(""))
}

/// emacs本来の英数字のみの単語境界（後方）
pub fn backward_alnum_word(chars: &[char], pos: usize) -> usize {
    backward_word(chars, pos, &WordChars::new(""))
}

/// vi の文字分類。0 は空白
fn vi_class(c: char, blank: bool) -> u8 {
    if c.is_whitespace() {
        0
    } else if blank || c.is_alphanumeric() || c == '_' {
        1
    } else {
        2
    }
}

/// `w` / `W`
pub fn vi_forward_word(chars: &[char], pos: usize, blank: bool) -> usize {
    let len = chars.len();
    let mut i = pos.min(len);
    if i < len {
        let cls = vi_class(chars[i], blank);
        if cls != 0 {
            while i < len && vi_class(chars[i], blank) == cls {
                i += 1;
            }
        }
    }
    while i < len && vi_class(chars[i], blank) == 0 {
        i += 1;
    }
    i
}

/// `e` / `E`（単語の最終文字）
pub fn vi_forward_word_end(chars: &[char], pos: usize, blank: bool) -> usize {
    let len = chars.len();
    if len == 0 {
        return 0;
    }
    let mut i = pos + 1;
    while i < len && vi_class(chars[i], blank) == 0 {
        i += 1;
    }
    if i >= len {
        return len - 1;
    }
    let cls = vi_class(chars[i], blank);
    while i + 1 < len && vi_class(chars[i + 1], blank) == cls {
        i += 1;
    }
    i
}

/// `b` / `B`
pub fn vi_backward_word(chars: &[char], pos: usize, blank: bool) -> usize {
    let mut i = pos.min(chars.len());
    while i > 0 && vi_class(chars[i - 1], blank) == 0 {
        i -= 1;
    }
    if i == 0 {
        return 0;
    }
    let cls = vi_class(chars[i - 1], blank);
    while i > 0 && vi_class(chars[i - 1], blank) == cls {
        i -= 1;
    }
    i
}

/// `pos` を含む単語の最終文字（`cw` は空白を越えない）
pub fn vi_word_end_at(chars: &[char], pos: usize, blank: bool) -> usize {
    let len = chars.len();
    if pos >= len {
        return pos;
    }
    let cls = vi_class(chars[pos], blank);
    let mut i = pos;
    while i + 1 < len && vi_class(chars[i + 1], blank) == cls {
        i += 1;
    }
    i
}

/// `ge` / `gE`（前の単語の最終文字）
pub fn vi_backward_word_end(chars: &[char], pos: usize, blank: bool) -> usize {
    let len = chars.len();
    if len == 0 || pos == 0 {
        return 0;
    }
    let mut i = pos.min(len - 1);
    let cls = vi_class(chars[i], blank);
    if cls != 0 {
        while i > 0 && vi_class(chars[i], blank) == cls {
            i -= 1;
        }
    }
    while i > 0 && vi_class(chars[i], blank) == 0 {
        i -= 1;
    }
    i
}

/// 対応する括弧の位置
pub fn matching_bracket(chars: &[char], pos: usize) -> Option<usize> {
    let (open, close, forward) = match chars.get(pos)? {
        '(' => ('(', ')', true),
        '[' => ('[', ']', true),
        '{' => ('{', '}', true),
        ')' => ('(', ')', false),
        ']' => ('[', ']', false),
        '}' => ('{', '}', false),
        _ => return None,
    };

    let mut depth = 0usize;
    if forward {
        for (i, &c) in chars.iter().enumerate().skip(pos) {
            if c == open {
                depth += 1;
            } else if c == close {
                depth -= 1;
                if depth == 0 {
                    return Some(i);
                }
            }
        }
    } else {
        for i in (0..=pos).rev() {
            let c = chars[i];
            if c == close {
                depth += 1;
            } else if c == open {
                depth -= 1;
                if depth == 0 {
                    return Some(i);
                }
            }
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chars(s: &str) -> Vec<char> {
        s.chars().collect()
    }

    #[test]
    fn test_emacs_words() {
        let text = chars("foo bar.baz  qux");
        let wc = WordChars::new("");
        assert_eq!(forward_word(&text, 0, &wc), 3);
        assert_eq!(forward_word(&text, 3, &wc), 7);
        assert_eq!(backward_word(&text, 16, &wc), 13);
        assert_eq!(backward_word(&text, 8, &wc), 4);

        let wc = WordChars::new(".");
        assert_eq!(forward_word(&text, 3, &wc), 11);
    }

    #[test]
    fn test_vi_forward_motions() {
        let text = chars("foo.bar baz");
        assert_eq!(vi_forward_word(&text, 0, false), 3);
        assert_eq!(vi_forward_word(&text, 3, false), 4);
        assert_eq!(vi_forward_word(&text, 0, true), 8);
        assert_eq!(vi_forward_word_end(&text, 0, false), 2);
        assert_eq!(vi_forward_word_end(&text, 2, false), 3);
        assert_eq!(vi_forward_word_end(&text, 0, true), 6);
        assert_eq!(vi_forward_word_end(&text, 9, true), 10);
        assert_eq!(vi_word_end_at(&text, 0, false), 2);
        assert_eq!(vi_word_end_at(&text, 3, false), 3);
        assert_eq!(vi_word_end_at(&text, 7, false), 7);
    }

    #[test]
    fn test_vi_backward_motions() {
        let text = chars("foo.bar baz");
        assert_eq!(vi_backward_word(&text, 8, false), 4);
        assert_eq!(vi_backward_word(&text, 4, false), 3);
        assert_eq!(vi_backward_word(&text, 8, true), 0);
        assert_eq!(vi_backward_word_end(&text, 9, false), 6);
        assert_eq!(vi_backward_word_end(&text, 5, false), 3);
    }

    #[test]
    fn test_matching_bracket() {
        let text = chars("f(a[b]c)");
        assert_eq!(matching_bracket(&text, 1), Some(7));
        assert_eq!(matching_bracket(&text, 5), Some(3));
        assert_eq!(matching_bracket(&text, 0), None);
        assert_eq!(matching_bracket(&chars("(("), 0), None);
    }
}
