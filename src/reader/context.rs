//! ウィジェットに渡す編集コンテキスト

use super::{InputQueue, LineState};
use crate::completion::Completer;
use crate::display::{BellStyle, EditorView, Redisplay};
use crate::editor::{Buffer, KillRing, Snapshot, UndoLog, WordChars};
use crate::error::Result;
use crate::history::HistorySession;
use crate::input::key::Key;
use crate::input::keymap::KeyMaps;
use crate::mode::{ModeController, SubMode, MAX_ARGUMENT};
use crate::options::{vars, Options, ReadlineOption, Variables, DEFAULT_WORDCHARS};
use crate::parser::{ParseContext, ParseError, ParsedLine, Parser};
use crate::widget::{MotionKind, WidgetName, WidgetOutcome, WidgetRegistry};

/// ウィジェット1回の呼び出しに付随するフラグ
#[derive(Debug, Clone, Default)]
pub(crate) struct InvocationFlags {
    pub(crate) bell: bool,
    pub(crate) retain_argument: bool,
    pub(crate) keep_menu: bool,
    /// 移動ウィジェットとして呼ばれたか
    pub(crate) motion: bool,
    /// 実行時に決まる範囲の扱い
    pub(crate) motion_kind: Option<MotionKind>,
    /// ウィジェットを起動したキー列
    pub(crate) keys: Vec<Key>,
    /// この呼び出しで変更があればアンドゥに積む状態
    pub(crate) undo_base: Option<Snapshot>,
}

/// 編集セッションの状態一式
///
/// ウィジェットはこれを通してのみバッファ・履歴・モードを変更する。
pub struct EditContext<'a> {
    pub buffer: &'a mut Buffer,
    pub undo: &'a mut UndoLog,
    pub kill_ring: &'a mut KillRing,
    pub mode: &'a mut ModeController,
    pub history: &'a mut HistorySession,
    pub options: &'a mut Options,
    pub variables: &'a mut Variables,
    pub line: &'a mut LineState,
    pub(crate) keymaps: &'a KeyMaps,
    pub(crate) registry: &'a WidgetRegistry,
    pub(crate) completer: &'a dyn Completer,
    pub(crate) parser: &'a dyn Parser,
    pub(crate) input: &'a mut InputQueue,
    pub(crate) display: &'a mut dyn Redisplay,
    pub(crate) prompt: &'a str,
    pub(crate) flags: InvocationFlags,
}

impl<'a> EditContext<'a> {
    /// 繰り返し回数（数値引数、既定は1）
    ///
    /// オペレータ待ちの移動ではオペレータ側の回数を掛け合わせる。
    pub fn count(&self) -> i64 {
        let count = self.mode.argument.count();
        match self.mode.pending_operator {
            Some(op) if self.flags.motion => count.saturating_mul(op.count).clamp(-MAX_ARGUMENT, MAX_ARGUMENT),
            _ => count,
        }
    }

    /// 明示的に与えられた数値引数
    pub fn explicit_argument(&self) -> Option<i64> {
        self.mode.argument.explicit()
    }

    /// 起動したキー列の最後のキー
    pub fn last_key(&self) -> Option<Key> {
        self.flags.keys.last().copied()
    }

    /// 起動したキー列
    pub fn keys(&self) -> &[Key] {
        &self.flags.keys
    }

    /// ベルを要求する
    pub fn beep(&mut self) {
        self.flags.bell = true;
    }

    /// ベルを鳴らして何もせず続行
    pub fn fail(&mut self) -> Result<WidgetOutcome> {
        self.beep();
        Ok(WidgetOutcome::Continue)
    }

    /// 数値引数を次のウィジェットへ持ち越す
    pub fn retain_argument(&mut self) {
        self.flags.retain_argument = true;
    }

    /// ここまでの変更を1つのアンドゥ単位として閉じる
    ///
    /// 複数の編集を行うウィジェットの途中で呼ぶと、以降の変更は別の単位になる。
    pub fn split_undo(&mut self) {
        if let Some(base) = self.flags.undo_base.take() {
            if base.text != self.buffer.text() {
                self.undo.record(base);
            }
            self.flags.undo_base = Some(self.buffer.snapshot());
        }
    }

    /// 補完メニューと一覧を維持する
    pub fn keep_menu(&mut self) {
        self.flags.keep_menu = true;
    }

    /// オペレータに渡す範囲の扱いを実行時に指定
    pub fn set_motion_kind(&mut self, kind: MotionKind) {
        self.flags.motion_kind = Some(kind);
    }

    pub fn option(&self, option: ReadlineOption) -> bool {
        self.options.is_set(option)
    }

    /// 履歴移動の失敗時にベルを鳴らす
    pub fn history_beep(&mut self) {
        if self.option(ReadlineOption::HistoryBeep) {
            self.beep();
        }
    }

    /// `WORDCHARS` に基づく単語構成文字
    pub fn word_chars(&self) -> WordChars {
        WordChars::new(self.variables.get_str(vars::WORDCHARS).unwrap_or(DEFAULT_WORDCHARS))
    }

    /// 別のウィジェットを直接呼ぶ（アンドゥ記録などは呼び出し元のものに含まれる）
    pub fn call_widget(&mut self, name: &WidgetName) -> Result<WidgetOutcome> {
        let registry = self.registry;
        match registry.get(name) {
            Some(widget) => widget.call(self),
            None => {
                log::warn!("widget not found: {}", name);
                self.fail()
            }
        }
    }

    /// 現在のバッファを解析する
    pub fn parse(&self, context: ParseContext) -> std::result::Result<ParsedLine, ParseError> {
        self.parser.parse(&self.buffer.text(), self.buffer.cursor(), context)
    }

    pub fn completer(&self) -> &dyn Completer {
        self.completer
    }

    pub fn keymaps(&self) -> &KeyMaps {
        self.keymaps
    }

    /// 表示用の状態
    pub fn view(&self) -> EditorView<'_> {
        build_view(self.prompt, self.buffer, self.mode, self.history, self.line)
    }

    /// 再表示
    pub fn redisplay(&mut self) -> Result<()> {
        let view = build_view(self.prompt, self.buffer, self.mode, self.history, self.line);
        self.display.redisplay(&view)
    }

    pub fn clear_screen(&mut self) -> Result<()> {
        self.display.clear_screen()
    }

    /// 行の読み取り終了時の後始末
    pub(crate) fn finish(&mut self) -> Result<()> {
        let view = build_view(self.prompt, self.buffer, self.mode, self.history, self.line);
        self.display.finish(&view)
    }

    /// 要求されていればベルを鳴らす
    pub(crate) fn ring_pending_bell(&mut self) -> Result<()> {
        if !std::mem::take(&mut self.flags.bell) {
            return Ok(());
        }
        let style = BellStyle::from_variables(
            self.variables.get_str(vars::BELL_STYLE),
            self.variables.get_bool(vars::PREFER_VISIBLE_BELL, false),
        );
        self.line.bells += 1;
        if style != BellStyle::None {
            self.display.bell(style)?;
        }
        Ok(())
    }
}

fn build_view<'v>(
    prompt: &'v str,
    buffer: &'v Buffer,
    mode: &ModeController,
    history: &HistorySession,
    line: &'v LineState,
) -> EditorView<'v> {
    let searching = matches!(mode.sub_mode, Some(SubMode::IncrementalSearch));
    let search = history.search.as_ref().filter(|_| searching);
    let menu = mode.has_overlay(crate::mode::Overlay::MenuSelect);
    EditorView {
        prompt,
        text: buffer.chars(),
        cursor: buffer.cursor(),
        mark: buffer.mark(),
        keymaps: mode.keymap_chain(),
        search: search.map(|s| s.prompt()),
        search_failed: search.is_some_and(|s| s.failed),
        listing: line.listing.as_deref(),
        menu_selected: line.completion.as_ref().and_then(|c| c.selected).filter(|_| menu),
        argument: mode.argument.explicit(),
        overwrite: buffer.is_overwrite(),
        depth: mode.depth(),
        message: line.message.as_deref(),
    }
}
