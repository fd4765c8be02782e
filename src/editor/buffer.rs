//! 行バッファ
//!
//! 文字単位で管理する編集中のテキスト。カーソルとマークはどの操作の後でも
//! `0..=len` に収まる。

use std::ops::Range;

/// アンドゥ用のバッファ状態
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Snapshot {
    pub text: String,
    pub cursor: usize,
}

/// 編集中の行
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Buffer {
    chars: Vec<char>,
    cursor: usize,
    mark: Option<usize>,
    multi_line: bool,
    overwrite: bool,
}

impl Buffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// 文字列から作成（カーソルは末尾）
    pub fn from_text(text: &str) -> Self {
        let chars: Vec<char> = text.chars().collect();
        let cursor = chars.len();
        Self {
            chars,
            cursor,
            ..Self::default()
        }
    }

    pub fn text(&self) -> String {
        self.chars.iter().collect()
    }

    pub fn chars(&self) -> &[char] {
        &self.chars
    }

    pub fn len(&self) -> usize {
        self.chars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chars.is_empty()
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// カーソルを移動（範囲外は丸める）
    pub fn set_cursor(&mut self, pos: usize) {
        self.cursor = pos.min(self.chars.len());
    }

    /// 相対移動して実際に動いた量を返す
    pub fn move_by(&mut self, delta: isize) -> isize {
        let before = self.cursor as isize;
        let target = (before + delta).clamp(0, self.chars.len() as isize);
        self.cursor = target as usize;
        target - before
    }

    pub fn char_at(&self, pos: usize) -> Option<char> {
        self.chars.get(pos).copied()
    }

    /// カーソル位置の文字
    pub fn current_char(&self) -> Option<char> {
        self.char_at(self.cursor)
    }

    /// カーソル直前の文字
    pub fn prev_char(&self) -> Option<char> {
        self.cursor.checked_sub(1).and_then(|p| self.char_at(p))
    }

    pub fn mark(&self) -> Option<usize> {
        self.mark
    }

    pub fn set_mark(&mut self, mark: Option<usize>) {
        self.mark = mark.map(|m| m.min(self.chars.len()));
    }

    /// マークとカーソルで囲まれた範囲
    pub fn region(&self) -> Option<Range<usize>> {
        self.mark.map(|m| m.min(self.cursor)..m.max(self.cursor))
    }

    pub fn is_multi_line(&self) -> bool {
        self.multi_line
    }

    pub fn set_multi_line(&mut self, multi_line: bool) {
        self.multi_line = multi_line;
    }

    pub fn is_overwrite(&self) -> bool {
        self.overwrite
    }

    pub fn set_overwrite(&mut self, overwrite: bool) {
        self.overwrite = overwrite;
    }

    /// カーソル位置に1文字挿入
    pub fn insert_char(&mut self, ch: char) {
        let pos = self.cursor;
        self.insert_at(pos, &[ch]);
        self.cursor = pos + 1;
    }

    /// カーソル位置に文字列を挿入し、カーソルを挿入末尾へ
    pub fn insert_str(&mut self, text: &str) {
        let chars: Vec<char> = text.chars().collect();
        let pos = self.cursor;
        self.insert_at(pos, &chars);
        self.cursor = pos + chars.len();
    }

    /// 指定位置へ挿入（カーソルは後ろにあればずらす）
    pub fn insert_at(&mut self, pos: usize, chars: &[char]) {
        let pos = pos.min(self.chars.len());
        let n = chars.len();
        self.chars.splice(pos..pos, chars.iter().copied());
        if self.cursor > pos {
            self.cursor += n;
        }
        if let Some(mark) = self.mark.as_mut() {
            if *mark > pos {
                *mark += n;
            }
        }
    }

    /// 範囲を削除して取り除いた文字列を返す
    pub fn delete_range(&mut self, range: Range<usize>) -> String {
        let start = range.start.min(self.chars.len());
        let end = range.end.clamp(start, self.chars.len());
        let removed: String = self.chars.drain(start..end).collect();
        let n = end - start;
        self.cursor = Self::shift_after_delete(self.cursor, start, end, n);
        self.mark = self.mark.map(|m| Self::shift_after_delete(m, start, end, n));
        removed
    }

    fn shift_after_delete(pos: usize, start: usize, end: usize, n: usize) -> usize {
        if pos >= end {
            pos - n
        } else if pos > start {
            start
        } else {
            pos
        }
    }

    /// カーソルから前方 n 文字を削除
    pub fn delete_forward(&mut self, n: usize) -> String {
        let end = (self.cursor + n).min(self.chars.len());
        self.delete_range(self.cursor..end)
    }

    /// カーソルから後方 n 文字を削除
    pub fn delete_backward(&mut self, n: usize) -> String {
        let start = self.cursor.saturating_sub(n);
        self.delete_range(start..self.cursor)
    }

    /// 範囲を置き換え、カーソルを置換後の末尾へ
    pub fn replace_range(&mut self, range: Range<usize>, text: &str) {
        let start = range.start.min(self.chars.len());
        self.delete_range(range);
        let chars: Vec<char> = text.chars().collect();
        self.insert_at(start, &chars);
        self.cursor = start + chars.len();
    }

    pub fn substring(&self, range: Range<usize>) -> String {
        let start = range.start.min(self.chars.len());
        let end = range.end.clamp(start, self.chars.len());
        self.chars[start..end].iter().collect()
    }

    /// 内容を置き換え、カーソルを末尾へ
    pub fn set_text(&mut self, text: &str) {
        self.chars = text.chars().collect();
        self.cursor = self.chars.len();
        self.mark = None;
    }

    pub fn clear(&mut self) {
        self.chars.clear();
        self.cursor = 0;
        self.mark = None;
        self.multi_line = false;
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            text: self.text(),
            cursor: self.cursor,
        }
    }

    pub fn restore(&mut self, snapshot: &Snapshot) {
        self.chars = snapshot.text.chars().collect();
        self.cursor = snapshot.cursor.min(self.chars.len());
        self.mark = self.mark.map(|m| m.min(self.chars.len()));
    }

    /// `pos` を含む行の先頭
    pub fn line_start(&self, pos: usize) -> usize {
        let pos = pos.min(self.chars.len());
        self.chars[..pos]
            .iter()
            .rposition(|&c| c == '\n')
            .map(|i| i + 1)
            .unwrap_or(0)
    }

    /// `pos` を含む行の末尾（改行の手前）
    pub fn line_end(&self, pos: usize) -> usize {
        let pos = pos.min(self.chars.len());
        self.chars[pos..]
            .iter()
            .position(|&c| c == '\n')
            .map(|i| pos + i)
            .unwrap_or(self.chars.len())
    }

    /// 行内の桁位置
    pub fn column(&self, pos: usize) -> usize {
        pos.min(self.chars.len()) - self.line_start(pos)
    }

    /// 複数行バッファで上の行へ。先頭行なら false
    pub fn move_line_up(&mut self) -> bool {
        let start = self.line_start(self.cursor);
        if start == 0 {
            return false;
        }
        let column = self.cursor - start;
        let prev_start = self.line_start(start - 1);
        let prev_len = start - 1 - prev_start;
        self.cursor = prev_start + column.min(prev_len);
        true
    }

    /// 複数行バッファで下の行へ。最終行なら false
    pub fn move_line_down(&mut self) -> bool {
        let end = self.line_end(self.cursor);
        if end >= self.chars.len() {
            return false;
        }
        let column = self.column(self.cursor);
        let next_start = end + 1;
        let next_len = self.line_end(next_start) - next_start;
        self.cursor = next_start + column.min(next_len);
        true
    }

    /// 最初の非空白文字の位置（行内）
    pub fn first_non_blank(&self, pos: usize) -> usize {
        let start = self.line_start(pos);
        let end = self.line_end(pos);
        (start..end)
            .find(|&i| !self.chars[i].is_whitespace())
            .unwrap_or(end)
    }
}
