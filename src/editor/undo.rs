//! アンドゥ・リドゥ履歴

use super::buffer::Snapshot;

const DEFAULT_LIMIT: usize = 256;

/// スナップショット単位の編集履歴
#[derive(Debug, Clone)]
pub struct UndoLog {
    undo: Vec<Snapshot>,
    redo: Vec<Snapshot>,
    limit: usize,
}

impl Default for UndoLog {
    fn default() -> Self {
        Self::with_limit(DEFAULT_LIMIT)
    }
}

impl UndoLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_limit(limit: usize) -> Self {
        Self {
            undo: Vec::new(),
            redo: Vec::new(),
            limit: limit.max(1),
        }
    }

    pub fn can_undo(&self) -> bool {
        !self.undo.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo.is_empty()
    }

    /// 変更前の状態を記録する。新しい変更が入るとリドゥ履歴は破棄される
    pub fn record(&mut self, before: Snapshot) {
        if self.undo.len() == self.limit {
            self.undo.remove(0);
        }
        self.undo.push(before);
        self.redo.clear();
    }

    /// 直前の状態を取り出し、現在の状態をリドゥ側へ積む
    pub fn undo(&mut self, current: Snapshot) -> Option<Snapshot> {
        let restored = self.undo.pop()?;
        self.redo.push(current);
        Some(restored)
    }

    /// アンドゥを取り消す
    pub fn redo(&mut self, current: Snapshot) -> Option<Snapshot> {
        let restored = self.redo.pop()?;
        self.undo.push(current);
        Some(restored)
    }

    /// 記録済みの最古の状態（vi-undo-change で使う行頭の状態）
    pub fn oldest(&self) -> Option<&Snapshot> {
        self.undo.first()
    }

    pub fn clear(&mut self) {
        self.undo.clear();
        self.redo.clear();
    }
}
