//! 履歴
//!
//! 確定済みの行の追記専用ログと、その上を移動するセッションカーソル。
//! 入力途中の行はログに含まれず、境界を離れるときに退避される。

pub mod expand;
pub mod search;

pub use expand::{expand_events, ExpandError};
pub use search::{SearchDirection, SearchMatcher, SearchState};

use crate::editor::{Buffer, Snapshot};
use std::collections::VecDeque;

/// セッション内履歴の既定の最大保存数
const MAX_HISTORY_SIZE: usize = 500;

/// 履歴ストア
///
/// 添字 0 が最古。エンジンは `add` 以外で既存エントリを書き換えない。
pub trait History {
    fn len(&self) -> usize;

    fn get(&self, index: usize) -> Option<&str>;

    /// 確定した行を追記
    fn add(&mut self, line: &str);

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// メモリ上の履歴
#[derive(Debug, Clone)]
pub struct MemoryHistory {
    entries: VecDeque<String>,
    max_size: usize,
}

impl Default for MemoryHistory {
    fn default() -> Self {
        Self::with_capacity(MAX_HISTORY_SIZE)
    }
}

impl MemoryHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(max_size: usize) -> Self {
        Self {
            entries: VecDeque::with_capacity(max_size.min(MAX_HISTORY_SIZE)),
            max_size: max_size.max(1),
        }
    }

    /// 古い順の反復子
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(String::as_str)
    }
}

impl History for MemoryHistory {
    fn len(&self) -> usize {
        self.entries.len()
    }

    fn get(&self, index: usize) -> Option<&str> {
        self.entries.get(index).map(String::as_str)
    }

    fn add(&mut self, line: &str) {
        // 空行と直前と同じ行は追加しない
        if line.trim().is_empty() || self.entries.back().map(String::as_str) == Some(line) {
            return;
        }
        self.entries.push_back(line.to_string());
        while self.entries.len() > self.max_size {
            self.entries.pop_front();
        }
    }
}

/// 履歴上のカーソル
pub struct HistorySession {
    store: Box<dyn History + Send>,
    index: usize,
    saved: Option<Snapshot>,
    /// インクリメンタル検索中のみ Some
    pub search: Option<SearchState>,
    last_search: Option<(String, SearchDirection, bool)>,
}

impl std::fmt::Debug for HistorySession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HistorySession")
            .field("len", &self.store.len())
            .field("index", &self.index)
            .field("search", &self.search)
            .finish_non_exhaustive()
    }
}

impl Default for HistorySession {
    fn default() -> Self {
        Self::new(Box::new(MemoryHistory::new()))
    }
}

impl HistorySession {
    pub fn new(store: Box<dyn History + Send>) -> Self {
        let index = store.len();
        Self {
            store,
            index,
            saved: None,
            search: None,
            last_search: None,
        }
    }

    pub fn store(&self) -> &dyn History {
        self.store.as_ref()
    }

    pub fn store_mut(&mut self) -> &mut (dyn History + Send) {
        self.store.as_mut()
    }

    pub fn len(&self) -> usize {
        self.store.len()
    }

    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }

    /// 現在位置（`len()` は入力中の行）
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn at_end(&self) -> bool {
        self.index >= self.store.len()
    }

    pub fn entry(&self, index: usize) -> Option<&str> {
        self.store.get(index)
    }

    /// 行の読み取り開始時に末尾へ戻す
    pub fn reset(&mut self) {
        self.index = self.store.len();
        self.saved = None;
        self.search = None;
    }

    /// 確定した行を追加
    pub fn add(&mut self, line: &str) {
        self.store.add(line);
        self.index = self.store.len();
        self.saved = None;
    }

    /// 指定位置のエントリをバッファへ読み込む
    ///
    /// 入力中の行から離れるときはその内容を退避し、戻ったときに復元する。
    pub fn move_to(&mut self, target: usize, buffer: &mut Buffer) -> bool {
        let len = self.store.len();
        if target > len || target == self.index {
            return false;
        }
        if self.index >= len {
            self.saved = Some(buffer.snapshot());
        }
        self.index = target;
        if target == len {
            match self.saved.take() {
                Some(saved) => buffer.restore(&saved),
                None => buffer.set_text(""),
            }
        } else if let Some(entry) = self.store.get(target) {
            buffer.set_text(entry);
        }
        true
    }

    /// `count` 件古いエントリへ（負なら新しい方へ）
    pub fn previous(&mut self, count: i64, buffer: &mut Buffer) -> bool {
        if count < 0 {
            return self.next(-count, buffer);
        }
        let count = count as usize;
        match self.index.checked_sub(count) {
            Some(target) if count > 0 => self.move_to(target, buffer),
            _ => false,
        }
    }

    /// `count` 件新しいエントリへ
    pub fn next(&mut self, count: i64, buffer: &mut Buffer) -> bool {
        if count < 0 {
            return self.previous(-count, buffer);
        }
        let target = self.index.saturating_add(count as usize);
        if count == 0 || target > self.store.len() {
            return false;
        }
        self.move_to(target, buffer)
    }

    /// 接頭辞で前後のエントリを探す（現在の内容と同じものは飛ばす）
    pub fn find_prefix(&self, prefix: &str, current: &str, direction: SearchDirection) -> Option<usize> {
        let len = self.store.len();
        let matches = |i: &usize| {
            self.store
                .get(*i)
                .is_some_and(|e| e.starts_with(prefix) && e != current)
        };
        match direction {
            SearchDirection::Backward => (0..self.index.min(len)).rev().find(matches),
            SearchDirection::Forward => (self.index + 1..len).find(matches),
        }
    }

    /// 照合器で探索する。`start` を含めてその方向へ
    pub fn find_from(
        &self,
        matcher: &SearchMatcher,
        start: usize,
        direction: SearchDirection,
    ) -> Option<(usize, usize)> {
        let len = self.store.len();
        let backward = direction == SearchDirection::Backward;
        let hit = |i: usize| self.store.get(i).and_then(|e| matcher.find(e, backward)).map(|pos| (i, pos));
        match direction {
            SearchDirection::Backward => (0..=start.min(len.saturating_sub(1))).rev().find_map(hit),
            SearchDirection::Forward => (start..len).find_map(hit),
        }
    }

    /// インクリメンタル検索を開始
    pub fn begin_search(&mut self, direction: SearchDirection, glob: bool, vi: bool, buffer: &Buffer) {
        let mut state = SearchState::new(direction, buffer.snapshot(), self.index);
        state.glob = glob;
        state.vi = vi;
        self.search = Some(state);
    }

    /// 検索を更新する。`repeat` なら現在の一致の次から探す。一致したら true
    pub fn search_update(&mut self, buffer: &mut Buffer, repeat: bool) -> bool {
        let Some(mut state) = self.search.take() else {
            return false;
        };
        if state.pattern.is_empty() {
            if let Some((pattern, _, _)) = self.last_search.as_ref().filter(|_| repeat) {
                state.pattern = pattern.clone();
            } else {
                state.failed = false;
                self.search = Some(state);
                return false;
            }
        }

        let len = self.store.len();
        let start = match (state.direction, repeat) {
            (SearchDirection::Backward, true) => state.match_index.checked_sub(1),
            (SearchDirection::Forward, true) => Some(state.match_index + 1),
            (SearchDirection::Backward, false) => {
                if state.match_index >= len {
                    len.checked_sub(1)
                } else {
                    Some(state.match_index)
                }
            }
            (SearchDirection::Forward, false) => Some(state.match_index),
        };

        let found = match (start, SearchMatcher::new(&state.pattern, state.glob)) {
            (Some(start), Some(matcher)) => self.find_from(&matcher, start, state.direction),
            _ => None,
        };

        match found {
            Some((index, pos)) => {
                if index != self.index {
                    self.move_to(index, buffer);
                }
                buffer.set_cursor(pos);
                state.match_index = index;
                state.failed = false;
            }
            None => state.failed = true,
        }
        let matched = !state.failed;
        self.search = Some(state);
        matched
    }

    /// パターンを1文字削って検索し直す
    pub fn search_backspace(&mut self, buffer: &mut Buffer) {
        let Some(state) = self.search.as_mut() else {
            return;
        };
        state.pattern.pop();
        state.match_index = state.origin_index;
        state.failed = false;
        if state.pattern.is_empty() {
            let origin = state.origin.clone();
            let origin_index = state.origin_index;
            self.move_to(origin_index, buffer);
            buffer.restore(&origin);
        } else {
            let origin_index = state.origin_index;
            self.move_to(origin_index, buffer);
            self.search_update(buffer, false);
        }
    }

    /// 検索を確定して終了（一致した位置に留まる）
    pub fn end_search(&mut self) -> Option<SearchState> {
        let state = self.search.take()?;
        if !state.pattern.is_empty() {
            self.last_search = Some((state.pattern.clone(), state.direction, state.glob));
        }
        Some(state)
    }

    /// 検索を取り消して開始時の状態へ戻す
    pub fn abort_search(&mut self, buffer: &mut Buffer) {
        if let Some(state) = self.search.take() {
            self.move_to(state.origin_index, buffer);
            buffer.restore(&state.origin);
        }
    }

    /// 直前の検索パターンで続けて探す（vi の n / N）
    pub fn repeat_last_search(&mut self, reverse: bool, buffer: &mut Buffer) -> bool {
        let Some((pattern, direction, glob)) = self.last_search.clone() else {
            return false;
        };
        let direction = if reverse { direction.reversed() } else { direction };
        let start = match direction {
            SearchDirection::Backward => self.index.checked_sub(1),
            SearchDirection::Forward => Some(self.index + 1),
        };
        let found = match (start, SearchMatcher::new(&pattern, glob)) {
            (Some(start), Some(matcher)) => self.find_from(&matcher, start, direction),
            _ => None,
        };
        match found {
            Some((index, pos)) => {
                self.move_to(index, buffer);
                buffer.set_cursor(pos);
                true
            }
            None => false,
        }
    }

    pub fn last_search(&self) -> Option<&str> {
        self.last_search.as_ref().map(|(p, _, _)| p.as_str())
    }
}
