//! 補完
//!
//! 候補の生成は `Completer` に任せ、エンジンは返された順序のまま扱う。
//! 絞り込みや並べ替えは行わない。

use crate::parser::ParsedLine;
use std::fs;
use std::path::{Path, PathBuf};

/// 補完候補
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    /// 挿入する値
    pub value: String,
    /// 一覧表示用の文字列
    pub display: String,
    /// 確定後に区切りの空白を付けるか
    pub complete: bool,
}

impl Candidate {
    pub fn new(value: impl Into<String>) -> Self {
        let value = value.into();
        Self {
            display: value.clone(),
            value,
            complete: true,
        }
    }

    pub fn with_display(mut self, display: impl Into<String>) -> Self {
        self.display = display.into();
        self
    }

    /// 続けて入力する候補（ディレクトリなど）
    pub fn incomplete(mut self) -> Self {
        self.complete = false;
        self
    }
}

/// 補完候補の生成器
pub trait Completer {
    fn complete(&self, line: &ParsedLine) -> Vec<Candidate>;
}

/// 候補を返さない補完器
#[derive(Debug, Clone, Copy, Default)]
pub struct NullCompleter;

impl Completer for NullCompleter {
    fn complete(&self, _line: &ParsedLine) -> Vec<Candidate> {
        Vec::new()
    }
}

/// 固定の単語列から接頭辞一致で返す補完器
#[derive(Debug, Clone, Default)]
pub struct StringsCompleter {
    words: Vec<String>,
}

impl StringsCompleter {
    pub fn new<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            words: words.into_iter().map(Into::into).collect(),
        }
    }
}

impl Completer for StringsCompleter {
    fn complete(&self, line: &ParsedLine) -> Vec<Candidate> {
        let prefix = line.word_prefix();
        self.words
            .iter()
            .filter(|w| w.starts_with(prefix.as_str()))
            .map(|w| Candidate::new(w.as_str()))
            .collect()
    }
}

/// ファイルパス補完器
#[derive(Debug, Clone, Default)]
pub struct PathCompleter {
    /// 隠しファイルを表示するか
    show_hidden: bool,
}

impl PathCompleter {
    pub fn new() -> Self {
        Self::default()
    }

    /// 隠しファイル表示を設定
    pub fn with_hidden_files(mut self, show: bool) -> Self {
        self.show_hidden = show;
        self
    }

    /// 入力パスからディレクトリと部分ファイル名を分離
    fn split_path(input: &str) -> (String, PathBuf, String) {
        match input.rfind('/') {
            Some(idx) => {
                let dir_part = &input[..=idx];
                let expanded = shellexpand::tilde(dir_part).into_owned();
                (dir_part.to_string(), PathBuf::from(expanded), input[idx + 1..].to_string())
            }
            None => (String::new(), PathBuf::from("."), input.to_string()),
        }
    }

    fn entries(&self, dir: &Path) -> Vec<(String, bool)> {
        let Ok(read) = fs::read_dir(dir) else {
            return Vec::new();
        };
        let mut entries: Vec<(String, bool)> = read
            .filter_map(|entry| entry.ok())
            .map(|entry| {
                let name = entry.file_name().to_string_lossy().to_string();
                let is_dir = entry.file_type().map(|t| t.is_dir()).unwrap_or(false);
                (name, is_dir)
            })
            .filter(|(name, _)| self.show_hidden || !name.starts_with('.'))
            .collect();
        entries.sort();
        entries
    }
}

impl Completer for PathCompleter {
    fn complete(&self, line: &ParsedLine) -> Vec<Candidate> {
        let prefix = line.word_prefix();
        let (dir_part, dir, file_prefix) = Self::split_path(&prefix);
        self.entries(&dir)
            .into_iter()
            .filter(|(name, _)| name.starts_with(file_prefix.as_str()))
            .map(|(name, is_dir)| {
                if is_dir {
                    Candidate::new(format!("{}{}/", dir_part, name))
                        .with_display(format!("{}/", name))
                        .incomplete()
                } else {
                    Candidate::new(format!("{}{}", dir_part, name)).with_display(name)
                }
            })
            .collect()
    }
}

/// 補完中の状態（メニュー補完の巡回に使う）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletionState {
    pub candidates: Vec<Candidate>,
    /// メニューで選択中の候補
    pub selected: Option<usize>,
    /// 置き換え対象の開始位置
    pub start: usize,
    /// 現在挿入されている文字列の長さ（文字数）
    pub inserted_len: usize,
    /// 補完前の単語
    pub original: String,
}

impl CompletionState {
    /// 次（負なら前）の候補を選ぶ
    pub fn advance(&mut self, step: i64) -> Option<&Candidate> {
        let len = self.candidates.len() as i64;
        if len == 0 {
            return None;
        }
        let next = match self.selected {
            Some(i) => (i as i64 + step).rem_euclid(len),
            None if step >= 0 => 0,
            None => len - 1,
        };
        self.selected = Some(next as usize);
        self.candidates.get(next as usize)
    }
}

/// 候補の共通接頭辞
pub fn common_prefix(candidates: &[Candidate], case_insensitive: bool) -> String {
    let mut iter = candidates.iter();
    let Some(first) = iter.next() else {
        return String::new();
    };
    let mut prefix: Vec<char> = first.value.chars().collect();
    for candidate in iter {
        let common = prefix
            .iter()
            .zip(candidate.value.chars())
            .take_while(|(a, b)| {
                if case_insensitive {
                    a.to_lowercase().eq(b.to_lowercase())
                } else {
                    **a == *b
                }
            })
            .count();
        prefix.truncate(common);
    }
    prefix.into_iter().collect()
}
