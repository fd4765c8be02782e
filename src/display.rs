//! 再表示
//!
//! エンジンは描画の見た目を規定しない。各ループでバッファ・カーソル・マーク・
//! モードなどの状態を `EditorView` として渡すだけ。

use crate::completion::Candidate;
use crate::error::Result;
use crossterm::{
    cursor::{MoveToColumn, MoveUp},
    queue,
    style::Print,
    terminal::{self, Clear, ClearType},
};
use std::io::{self, Write};
use unicode_width::UnicodeWidthChar;

/// ベルの鳴らし方
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BellStyle {
    None,
    Audible,
    Visible,
}

impl BellStyle {
    /// `bell-style` と `prefer-visible-bell` から決める
    pub fn from_variables(style: Option<&str>, prefer_visible: bool) -> Self {
        match style.map(str::to_ascii_lowercase).as_deref() {
            Some("none") | Some("off") => BellStyle::None,
            Some("visible") => BellStyle::Visible,
            _ if prefer_visible => BellStyle::Visible,
            _ => BellStyle::Audible,
        }
    }
}

/// 描画に必要な編集状態
#[derive(Debug, Clone)]
pub struct EditorView<'a> {
    pub prompt: &'a str,
    pub text: &'a [char],
    pub cursor: usize,
    pub mark: Option<usize>,
    /// 有効なキーマップ（優先順）
    pub keymaps: Vec<&'static str>,
    /// インクリメンタル検索中のプロンプト
    pub search: Option<String>,
    /// 検索が失敗しているか
    pub search_failed: bool,
    /// 一覧表示する補完候補
    pub listing: Option<&'a [Candidate]>,
    /// メニュー選択中の候補
    pub menu_selected: Option<usize>,
    /// 入力中の数値引数
    pub argument: Option<i64>,
    /// 上書きモード
    pub overwrite: bool,
    /// 再帰編集の深さ
    pub depth: usize,
    /// ウィジェットからの一行メッセージ
    pub message: Option<&'a str>,
}

/// 再表示の担当
pub trait Redisplay {
    /// 現在の状態を描画
    fn redisplay(&mut self, view: &EditorView<'_>) -> Result<()>;

    /// ベル
    fn bell(&mut self, style: BellStyle) -> Result<()>;

    /// 画面消去
    fn clear_screen(&mut self) -> Result<()> {
        Ok(())
    }

    /// 行の確定・破棄時の後始末
    fn finish(&mut self, _view: &EditorView<'_>) -> Result<()> {
        Ok(())
    }
}

/// 何も描画しない
#[derive(Debug, Clone, Copy, Default)]
pub struct NullDisplay;

impl Redisplay for NullDisplay {
    fn redisplay(&mut self, _view: &EditorView<'_>) -> Result<()> {
        Ok(())
    }

    fn bell(&mut self, _style: BellStyle) -> Result<()> {
        Ok(())
    }
}

/// 文字の表示幅（制御文字は `^X` 表記で2桁）
fn char_width(c: char) -> usize {
    if c.is_control() {
        2
    } else {
        c.width().unwrap_or(0)
    }
}

fn push_visible(out: &mut String, c: char) {
    if c.is_control() {
        out.push('^');
        out.push(char::from_u32((c as u32) ^ 0x40).unwrap_or('?'));
    } else {
        out.push(c);
    }
}

/// crossterm による単純な行描画
///
/// 複数行バッファは行ごとに改行して描画する。端末は呼び出し側でrawモードにしておくこと。
pub struct TerminalDisplay<W: Write> {
    out: W,
    /// 前回描画時のカーソル行（先頭行からの相対）
    cursor_row: u16,
    /// 前回描画した行数
    rows: u16,
}

impl TerminalDisplay<io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write> TerminalDisplay<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            cursor_row: 0,
            rows: 1,
        }
    }

    fn width(&self) -> usize {
        terminal::size().map(|(w, _)| w.max(1) as usize).unwrap_or(80)
    }

    /// 前回の描画を消して先頭行の行頭へ戻る
    fn rewind(&mut self) -> Result<()> {
        if self.cursor_row > 0 {
            queue!(self.out, MoveUp(self.cursor_row))?;
        }
        queue!(self.out, MoveToColumn(0), Clear(ClearType::FromCursorDown))?;
        self.cursor_row = 0;
        Ok(())
    }

    fn render_lines(&self, view: &EditorView<'_>) -> (Vec<String>, u16, u16) {
        let width = self.width();
        let prompt = match &view.search {
            Some(search) => format!("{}{}", view.prompt, search),
            None => match view.argument {
                Some(arg) => format!("(arg: {}) {}", arg, view.prompt),
                None => view.prompt.to_string(),
            },
        };

        let mut lines = vec![String::new()];
        let mut col = 0usize;
        let mut cursor = (0u16, 0u16);
        for c in prompt.chars() {
            lines[0].push(c);
            col += char_width(c);
        }
        for (i, &c) in view.text.iter().enumerate() {
            if i == view.cursor {
                cursor = ((lines.len() - 1) as u16, (col % width) as u16);
            }
            if c == '\n' {
                lines.push(String::new());
                col = 0;
                continue;
            }
            let last = lines.len() - 1;
            push_visible(&mut lines[last], c);
            col += char_width(c);
        }
        if view.cursor >= view.text.len() {
            cursor = ((lines.len() - 1) as u16, (col % width) as u16);
        }

        if let Some(message) = view.message {
            lines.push(message.to_string());
        }
        if let Some(listing) = view.listing {
            for (i, candidate) in listing.iter().enumerate() {
                let marker = if view.menu_selected == Some(i) { "> " } else { "  " };
                lines.push(format!("{}{}", marker, candidate.display));
            }
        }
        (lines, cursor.0, cursor.1)
    }
}

impl<W: Write + Send> Redisplay for TerminalDisplay<W> {
    fn redisplay(&mut self, view: &EditorView<'_>) -> Result<()> {
        let (lines, row, col) = self.render_lines(view);
        self.rewind()?;
        for (i, line) in lines.iter().enumerate() {
            if i > 0 {
                queue!(self.out, Print("\r\n"))?;
            }
            queue!(self.out, Print(line))?;
        }
        let last_row = (lines.len() - 1) as u16;
        if last_row > row {
            queue!(self.out, MoveUp(last_row - row))?;
        }
        queue!(self.out, MoveToColumn(col))?;
        self.cursor_row = row;
        self.rows = lines.len() as u16;
        self.out.flush()?;
        Ok(())
    }

    fn bell(&mut self, style: BellStyle) -> Result<()> {
        if style == BellStyle::Audible {
            queue!(self.out, Print('\x07'))?;
            self.out.flush()?;
        }
        Ok(())
    }

    fn clear_screen(&mut self) -> Result<()> {
        queue!(
            self.out,
            Clear(ClearType::All),
            crossterm::cursor::MoveTo(0, 0)
        )?;
        self.cursor_row = 0;
        self.rows = 1;
        self.out.flush()?;
        Ok(())
    }

    fn finish(&mut self, view: &EditorView<'_>) -> Result<()> {
        let finished = EditorView {
            listing: None,
            search: None,
            argument: None,
            message: None,
            cursor: view.text.len(),
            ..view.clone()
        };
        self.redisplay(&finished)?;
        queue!(self.out, Print("\r\n"))?;
        self.cursor_row = 0;
        self.rows = 1;
        self.out.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn view<'a>(prompt: &'a str, text: &'a [char], cursor: usize) -> EditorView<'a> {
        EditorView {
            prompt,
            text,
            cursor,
            mark: None,
            keymaps: vec!["emacs"],
            search: None,
            search_failed: false,
            listing: None,
            menu_selected: None,
            argument: None,
            overwrite: false,
            depth: 0,
            message: None,
        }
    }

    #[test]
    fn test_bell_style_from_variables() {
        assert_eq!(BellStyle::from_variables(Some("none"), true), BellStyle::None);
        assert_eq!(BellStyle::from_variables(Some("audible"), true), BellStyle::Visible);
        assert_eq!(BellStyle::from_variables(None, false), BellStyle::Audible);
    }

    #[test]
    fn test_render_wide_and_control_chars() {
        let display = TerminalDisplay::new(Vec::new());
        let text: Vec<char> = "日本\x01".chars().collect();
        let (lines, row, col) = display.render_lines(&view("> ", &text, 2));
        assert_eq!(lines, vec!["> 日本^A".to_string()]);
        assert_eq!((row, col), (0, 6));
    }

    #[test]
    fn test_render_multi_line_and_listing() {
        let display = TerminalDisplay::new(Vec::new());
        let text: Vec<char> = "ab\ncd".chars().collect();
        let candidates = vec![Candidate::new("one"), Candidate::new("two")];
        let mut v = view("$ ", &text, 5);
        v.listing = Some(&candidates);
        v.menu_selected = Some(1);
        let (lines, row, col) = display.render_lines(&v);
        assert_eq!(lines, vec!["$ ab", "cd", "  one", "> two"]);
        assert_eq!((row, col), (1, 2));
    }
}
