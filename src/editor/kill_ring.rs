//! キルリング実装

use std::collections::VecDeque;

const DEFAULT_CAPACITY: usize = 32;

/// キルの方向。連続キルで前後どちらへ結合するかを決める
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KillDirection {
    /// カーソルより後ろを削除した（末尾に結合）
    Forward,
    /// カーソルより前を削除した（先頭に結合）
    Backward,
}

/// 直前のコマンドがキルリングに何をしたか
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum KillContext {
    #[default]
    None,
    Kill,
    Yank,
}

/// Emacs風キルリング。
///
/// 先頭が最新。ヤンク位置 `yank_index` は常に有効な添字か、リングが空。
/// 行をまたいで保持される。
#[derive(Debug, Clone)]
pub struct KillRing {
    entries: VecDeque<String>,
    capacity: usize,
    yank_index: usize,
    last: KillContext,
    current: KillContext,
}

impl Default for KillRing {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }
}

impl KillRing {
    /// 新しいキルリングを作成
    pub fn new() -> Self {
        Self::default()
    }

    /// 最大保持数を設定
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            entries: VecDeque::with_capacity(capacity),
            capacity,
            yank_index: 0,
            last: KillContext::None,
            current: KillContext::None,
        }
    }

    /// 文字列をキルリングに追加（空文字は無視）
    pub fn push(&mut self, text: String) {
        if text.is_empty() {
            return;
        }
        if self.entries.len() == self.capacity {
            self.entries.pop_back();
        }
        self.entries.push_front(text);
        self.yank_index = 0;
    }

    /// キル操作として記録する
    ///
    /// 直前のコマンドもキルだった場合は同じエントリへ結合する。
    pub fn kill(&mut self, text: &str, direction: KillDirection) {
        if text.is_empty() {
            // 何も消えなくても連続キルは途切れさせない
            if self.last == KillContext::Kill {
                self.current = KillContext::Kill;
            }
            return;
        }
        if self.last == KillContext::Kill || self.current == KillContext::Kill {
            match direction {
                KillDirection::Forward => self.append_to_front(text),
                KillDirection::Backward => self.prepend_to_front(text),
            }
        } else {
            self.push(text.to_string());
        }
        self.yank_index = 0;
        self.current = KillContext::Kill;
    }

    /// 既存の最新エントリに追記（末尾に結合）
    pub fn append_to_front(&mut self, text: &str) {
        if text.is_empty() {
            return;
        }

        if let Some(front) = self.entries.front_mut() {
            front.push_str(text);
        } else {
            self.entries.push_front(text.to_string());
        }
    }

    /// 既存の最新エントリの先頭に結合
    pub fn prepend_to_front(&mut self, text: &str) {
        if text.is_empty() {
            return;
        }

        if let Some(front) = self.entries.front_mut() {
            front.insert_str(0, text);
        } else {
            self.entries.push_front(text.to_string());
        }
    }

    /// キルリングの先頭を取得
    pub fn front(&self) -> Option<&str> {
        self.entries.front().map(String::as_str)
    }

    /// ヤンク位置のエントリ
    pub fn current(&self) -> Option<&str> {
        self.entries.get(self.yank_index).map(String::as_str)
    }

    /// ヤンク対象を取得してヤンク操作として記録
    pub fn yank(&mut self) -> Option<String> {
        let text = self.current()?.to_string();
        self.current = KillContext::Yank;
        Some(text)
    }

    /// 次に古いエントリへ巡回する。直前がヤンクでなければ None
    pub fn yank_pop(&mut self) -> Option<String> {
        if self.last != KillContext::Yank || self.entries.is_empty() {
            return None;
        }
        self.yank_index = (self.yank_index + 1) % self.entries.len();
        self.current = KillContext::Yank;
        self.current().map(str::to_string)
    }

    /// 直前のコマンドがヤンクだったか
    pub fn last_was_yank(&self) -> bool {
        self.last == KillContext::Yank
    }

    /// 直前のコマンドがキルだったか
    pub fn last_was_kill(&self) -> bool {
        self.last == KillContext::Kill
    }

    /// コマンド1回分の区切り
    pub fn finish_command(&mut self) {
        self.last = self.current;
        self.current = KillContext::None;
    }

    /// エントリをクリア
    pub fn clear(&mut self) {
        self.entries.clear();
        self.yank_index = 0;
    }

    /// エントリ数
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// 空かどうか
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn push_and_front() {
        let mut ring = KillRing::new();
        ring.push("foo".to_string());
        assert_eq!(ring.front(), Some("foo"));
    }

    #[test]
    fn consecutive_kills_merge_in_buffer_order() {
        let mut ring = KillRing::new();
        ring.kill("world", KillDirection::Backward);
        ring.finish_command();
        ring.kill("hello ", KillDirection::Backward);
        ring.finish_command();
        ring.kill("!", KillDirection::Forward);
        ring.finish_command();
        assert_eq!(ring.len(), 1);
        assert_eq!(ring.front(), Some("hello world!"));
    }

    #[test]
    fn interrupted_kills_create_new_entries() {
        let mut ring = KillRing::new();
        ring.kill("one", KillDirection::Forward);
        ring.finish_command();
        ring.finish_command();
        ring.kill("two", KillDirection::Forward);
        assert_eq!(ring.len(), 2);
        assert_eq!(ring.front(), Some("two"));
    }

    #[test]
    fn yank_pop_rotates_only_after_yank() {
        let mut ring = KillRing::new();
        ring.push("first".to_string());
        ring.push("second".to_string());
        ring.push("third".to_string());

        assert!(ring.yank_pop().is_none());
        assert_eq!(ring.yank().as_deref(), Some("third"));
        ring.finish_command();
        assert_eq!(ring.yank_pop().as_deref(), Some("second"));
        ring.finish_command();
        assert_eq!(ring.yank_pop().as_deref(), Some("first"));
        ring.finish_command();
        assert_eq!(ring.yank_pop().as_deref(), Some("third"));
        ring.finish_command();
        ring.finish_command();
        assert!(ring.yank_pop().is_none());
    }

    #[test]
    fn kill_resets_yank_pointer() {
        let mut ring = KillRing::new();
        ring.push("a".to_string());
        ring.push("b".to_string());
        ring.yank();
        ring.finish_command();
        ring.yank_pop();
        ring.finish_command();
        assert_eq!(ring.current(), Some("a"));
        ring.kill("c", KillDirection::Forward);
        assert_eq!(ring.current(), Some("c"));
    }

    #[test]
    fn capacity_evicts_oldest() {
        let mut ring = KillRing::with_capacity(2);
        ring.push("1".to_string());
        ring.push("2".to_string());
        ring.push("3".to_string());
        assert_eq!(ring.len(), 2);
        assert_eq!(ring.front(), Some("3"));
    }

    #[test]
    fn clear_resets_entries() {
        let mut ring = KillRing::new();
        ring.push("data".to_string());
        ring.clear();
        assert!(ring.is_empty());
        assert!(ring.current().is_none());
    }
}
