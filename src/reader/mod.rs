//! 行読み取りセッション
//!
//! `LineReader` はキーマップ・ウィジェット・モード・履歴・キルリングをまとめて保持し、
//! `read_line` ごとに新しいバッファを作ってディスパッチャを回す。

mod context;
pub(crate) mod dispatcher;

pub use context::EditContext;

use crate::completion::{Candidate, Completer, CompletionState, NullCompleter};
use crate::display::{NullDisplay, Redisplay};
use crate::editor::{Buffer, KillRing, UndoLog};
use crate::error::{ReadlineError, Result};
use crate::history::{History, HistorySession};
use crate::input::defaults::default_keymaps;
use crate::input::key::Key;
use crate::input::keymap::{names, KeyMaps};
use crate::input::source::{KeyInput, KeySource};
use crate::mode::{BaseMode, ModeController};
use crate::options::{vars, Options, Variables};
use crate::parser::{DefaultParser, Parser};
use crate::widget::{Widget, WidgetName, WidgetOutcome, WidgetRegistry};
use std::collections::VecDeque;
use std::ops::Range;
use std::time::Duration;

/// 1行の編集中だけ有効な補助状態
#[derive(Debug, Default)]
pub struct LineState {
    /// メニュー補完の巡回状態
    pub completion: Option<CompletionState>,
    /// 一覧表示中の候補
    pub listing: Option<Vec<Candidate>>,
    /// 直前の yank で挿入した範囲
    pub last_yank: Option<Range<usize>>,
    /// 次の入力次第で取り除く補完の接尾辞
    pub auto_suffix: Option<Range<usize>>,
    /// HISTORY_VERIFY で展開済みとして提示した行
    pub verified_text: Option<String>,
    /// insert-last-word で挿入した (履歴位置, 範囲)
    pub last_word: Option<(usize, Range<usize>)>,
    /// 表示用メッセージ
    pub message: Option<String>,
    /// execute-named-cmd で入力中の名前
    pub(crate) command_name: Option<String>,
    pub(crate) bells: usize,
}

/// キー入力元と押し戻しキュー
pub(crate) struct InputQueue {
    source: Box<dyn KeySource + Send>,
    pushback: VecDeque<Key>,
}

impl InputQueue {
    pub(crate) fn new(source: Box<dyn KeySource + Send>) -> Self {
        Self {
            source,
            pushback: VecDeque::new(),
        }
    }

    /// 次のキー。押し戻されたキーを優先する
    pub(crate) fn read(&mut self, timeout: Option<Duration>) -> Result<KeyInput> {
        if let Some(key) = self.pushback.pop_front() {
            return Ok(KeyInput::Key(key));
        }
        match timeout {
            Some(timeout) => self.source.read_key_timeout(timeout),
            None => self.source.read_key(),
        }
    }

    /// 順序を保ったまま先頭へ戻す
    pub(crate) fn push_back(&mut self, keys: &[Key]) {
        for key in keys.iter().rev() {
            self.pushback.push_front(*key);
        }
    }
}

/// 対話的な行エディタ
pub struct LineReader {
    keymaps: KeyMaps,
    registry: WidgetRegistry,
    mode: ModeController,
    history: HistorySession,
    kill_ring: KillRing,
    options: Options,
    variables: Variables,
    completer: Box<dyn Completer + Send>,
    parser: Box<dyn Parser + Send>,
    input: InputQueue,
    display: Box<dyn Redisplay + Send>,
    bell_count: usize,
}

impl LineReader {
    /// 既定のキーマップと組み込みウィジェットで作成
    pub fn new(source: impl KeySource + Send + 'static) -> Self {
        Self {
            keymaps: default_keymaps(),
            registry: WidgetRegistry::with_builtins(),
            mode: ModeController::default(),
            history: HistorySession::default(),
            kill_ring: KillRing::new(),
            options: Options::new(),
            variables: Variables::new(),
            completer: Box::new(NullCompleter),
            parser: Box::new(DefaultParser),
            input: InputQueue::new(Box::new(source)),
            display: Box::new(NullDisplay),
            bell_count: 0,
        }
    }

    pub fn with_display(mut self, display: impl Redisplay + Send + 'static) -> Self {
        self.display = Box::new(display);
        self
    }

    pub fn with_completer(mut self, completer: impl Completer + Send + 'static) -> Self {
        self.completer = Box::new(completer);
        self
    }

    pub fn with_parser(mut self, parser: impl Parser + Send + 'static) -> Self {
        self.parser = Box::new(parser);
        self
    }

    pub fn with_history(mut self, history: impl History + Send + 'static) -> Self {
        self.history = HistorySession::new(Box::new(history));
        self
    }

    /// 編集モード（`emacs` / `vi`）を設定
    pub fn with_editing_mode(mut self, mode: &str) -> Self {
        self.variables.set(vars::EDITING_MODE, mode);
        self
    }

    pub fn with_keymaps(mut self, keymaps: KeyMaps) -> Self {
        self.keymaps = keymaps;
        self
    }

    /// 入力元を差し替える（押し戻し済みのキーは破棄される）
    pub fn set_source(&mut self, source: impl KeySource + Send + 'static) {
        self.input = InputQueue::new(Box::new(source));
    }

    pub fn keymaps(&self) -> &KeyMaps {
        &self.keymaps
    }

    pub fn keymaps_mut(&mut self) -> &mut KeyMaps {
        &mut self.keymaps
    }

    pub fn registry(&self) -> &WidgetRegistry {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut WidgetRegistry {
        &mut self.registry
    }

    /// ウィジェットを登録（組み込みと同じ名前空間）
    pub fn register_widget(&mut self, name: impl Into<WidgetName>, widget: Widget) -> Option<Widget> {
        self.registry.register(name, widget)
    }

    /// `"C-x C-u"` 形式でキーを割り当てる
    pub fn bind(&mut self, keymap: &str, keys: &str, widget: impl Into<WidgetName>) -> Result<()> {
        self.keymaps.bind_str(keymap, keys, widget)?;
        Ok(())
    }

    pub fn options(&self) -> &Options {
        &self.options
    }

    pub fn options_mut(&mut self) -> &mut Options {
        &mut self.options
    }

    pub fn variables(&self) -> &Variables {
        &self.variables
    }

    pub fn variables_mut(&mut self) -> &mut Variables {
        &mut self.variables
    }

    pub fn history(&self) -> &HistorySession {
        &self.history
    }

    pub fn history_mut(&mut self) -> &mut HistorySession {
        &mut self.history
    }

    pub fn kill_ring(&self) -> &KillRing {
        &self.kill_ring
    }

    pub fn mode(&self) -> &ModeController {
        &self.mode
    }

    /// これまでに鳴らしたベルの回数
    pub fn bell_count(&self) -> usize {
        self.bell_count
    }

    /// `keymap` 変数、次に `editing-mode` 変数から開始モードを決める
    fn initial_mode(&self) -> BaseMode {
        let from_editing_mode = || {
            self.variables
                .get_str(vars::EDITING_MODE)
                .and_then(BaseMode::from_editing_mode)
                .unwrap_or(BaseMode::Emacs)
        };
        match self.variables.get_str(vars::KEYMAP) {
            Some(names::MAIN) | None => from_editing_mode(),
            Some(name) => BaseMode::from_keymap_name(name).unwrap_or_else(from_editing_mode),
        }
    }

    /// 1行読み取る
    ///
    /// 確定した行を返す。中断は `ReadlineError::Interrupted`、空行での入力終端は
    /// `ReadlineError::EndOfInput`。
    pub fn read_line(&mut self, prompt: &str) -> Result<String> {
        let base = self.initial_mode();
        self.keymaps.set_main(base.keymap_name());
        self.mode.reset_for_line(base);
        self.history.reset();
        log::debug!("read_line start: mode={:?}", base);

        let mut buffer = Buffer::new();
        let mut undo = UndoLog::new();
        let mut line = LineState::default();

        let result = {
            let mut ctx = EditContext {
                buffer: &mut buffer,
                undo: &mut undo,
                kill_ring: &mut self.kill_ring,
                mode: &mut self.mode,
                history: &mut self.history,
                options: &mut self.options,
                variables: &mut self.variables,
                line: &mut line,
                keymaps: &self.keymaps,
                registry: &self.registry,
                completer: self.completer.as_ref(),
                parser: self.parser.as_ref(),
                input: &mut self.input,
                display: self.display.as_mut(),
                prompt,
                flags: Default::default(),
            };
            let result = dispatcher::run(&mut ctx);
            if !matches!(result, Err(ReadlineError::Io(_))) {
                ctx.finish()?;
            }
            result
        };
        self.bell_count += line.bells;

        match result? {
            WidgetOutcome::Accept => {
                let text = buffer.text();
                if !self.variables.get_bool(vars::DISABLE_HISTORY, false) {
                    self.history.add(&text);
                }
                log::debug!("read_line accepted {} chars", text.chars().count());
                Ok(text)
            }
            WidgetOutcome::Abort | WidgetOutcome::Continue => Err(ReadlineError::Interrupted),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::source::ScriptedKeySource;

    #[test]
    fn test_input_queue_pushback_order() {
        let mut queue = InputQueue::new(Box::new(ScriptedKeySource::new().text("z")));
        queue.push_back(&[Key::char('a'), Key::char('b')]);
        queue.push_back(&[Key::char('c')]);
        let mut read = Vec::new();
        while let Ok(KeyInput::Key(key)) = queue.read(None) {
            read.push(key.to_char().unwrap_or('?'));
        }
        assert_eq!(read, vec!['c', 'a', 'b', 'z']);
    }

    #[test]
    fn test_read_line_simple_text() {
        let mut reader = LineReader::new(ScriptedKeySource::new().text("hello").key(Key::plain(crate::input::key::KeyCode::Enter)));
        assert_eq!(reader.read_line("> ").unwrap(), "hello");
        assert_eq!(reader.history().len(), 1);
    }

    #[test]
    fn test_eof_on_empty_line() {
        let mut reader = LineReader::new(ScriptedKeySource::new());
        assert!(matches!(reader.read_line("> "), Err(ReadlineError::EndOfInput)));
    }

    #[test]
    fn test_initial_mode_from_variables() {
        let mut reader = LineReader::new(ScriptedKeySource::new()).with_editing_mode("vi");
        assert_eq!(reader.initial_mode(), BaseMode::ViInsert);
        reader.variables_mut().set(vars::KEYMAP, "vicmd");
        assert_eq!(reader.initial_mode(), BaseMode::ViCommand);
        reader.variables_mut().set(vars::KEYMAP, "main");
        assert_eq!(reader.initial_mode(), BaseMode::ViInsert);
    }
}
