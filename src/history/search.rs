//! インクリメンタル検索の状態管理

use crate::editor::Snapshot;
use regex::Regex;

/// 検索方向
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchDirection {
    Backward,
    Forward,
}

impl SearchDirection {
    pub fn reversed(self) -> Self {
        match self {
            SearchDirection::Backward => SearchDirection::Forward,
            SearchDirection::Forward => SearchDirection::Backward,
        }
    }
}

/// インクリメンタル検索の内部状態
#[derive(Debug, Clone)]
pub struct SearchState {
    /// 検索パターン
    pub pattern: String,
    /// 検索方向
    pub direction: SearchDirection,
    /// グロブパターンとして扱うか
    pub glob: bool,
    /// vi の `/` `?` 由来（Enterで確定する）
    pub vi: bool,
    /// マッチ失敗状態
    pub failed: bool,
    /// 現在一致している履歴位置
    pub match_index: usize,
    /// 検索開始時のバッファ
    pub origin: Snapshot,
    /// 検索開始時の履歴位置
    pub origin_index: usize,
}

impl SearchState {
    pub fn new(direction: SearchDirection, origin: Snapshot, origin_index: usize) -> Self {
        Self {
            pattern: String::new(),
            direction,
            glob: false,
            vi: false,
            failed: false,
            match_index: origin_index,
            origin,
            origin_index,
        }
    }

    /// 表示用の検索プロンプト
    pub fn prompt(&self) -> String {
        let mut prompt = String::new();
        if self.failed {
            prompt.push_str("failing ");
        }
        if self.glob {
            prompt.push_str("pattern ");
        }
        match self.direction {
            SearchDirection::Backward => prompt.push_str("bck-i-search: "),
            SearchDirection::Forward => prompt.push_str("fwd-i-search: "),
        }
        prompt.push_str(&self.pattern);
        prompt
    }
}

/// 検索パターンの照合器
#[derive(Debug, Clone)]
pub enum SearchMatcher {
    Literal(String),
    Pattern(Regex),
}

impl SearchMatcher {
    /// パターンから作成。グロブが正規表現にならない場合は None
    pub fn new(pattern: &str, glob: bool) -> Option<Self> {
        if glob {
            Regex::new(&glob_to_regex(pattern)).ok().map(SearchMatcher::Pattern)
        } else {
            Some(SearchMatcher::Literal(pattern.to_string()))
        }
    }

    /// 一致位置（文字単位）。後方検索では最後の一致を返す
    pub fn find(&self, text: &str, backward: bool) -> Option<usize> {
        let byte = match self {
            SearchMatcher::Literal(pattern) => {
                if backward {
                    text.rfind(pattern.as_str())
                } else {
                    text.find(pattern.as_str())
                }
            }
            SearchMatcher::Pattern(regex) => {
                let mut found = regex.find_iter(text).map(|m| m.start());
                if backward {
                    found.last()
                } else {
                    found.next()
                }
            }
        }?;
        Some(text[..byte].chars().count())
    }
}

/// グロブ（`*` `?` `[...]`）を正規表現へ変換する
pub fn glob_to_regex(glob: &str) -> String {
    let mut out = String::with_capacity(glob.len() * 2);
    let mut chars = glob.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '*' => out.push_str(".*"),
            '?' => out.push('.'),
            '[' => {
                let mut class = String::new();
                let mut closed = false;
                for inner in chars.by_ref() {
                    if inner == ']' {
                        closed = true;
                        break;
                    }
                    class.push(inner);
                }
                if closed && !class.is_empty() {
                    out.push('[');
                    if let Some(rest) = class.strip_prefix('!') {
                        out.push('^');
                        out.push_str(&rest.replace('\\', "\\\\"));
                    } else {
                        out.push_str(&class.replace('\\', "\\\\"));
                    }
                    out.push(']');
                } else {
                    out.push_str(&regex::escape("["));
                    out.push_str(&regex::escape(&class));
                    if closed {
                        out.push_str(&regex::escape("]"));
                    }
                }
            }
            '\\' => {
                if let Some(next) = chars.next() {
                    out.push_str(&regex::escape(&next.to_string()));
                }
            }
            other => out.push_str(&regex::escape(&other.to_string())),
        }
    }
    out
}
