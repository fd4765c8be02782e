//! 既定のキーマップ
//!
//! emacs / viins / vicmd の基底キーマップと、viopp / visual / menu のオーバーレイ、
//! 壊れた設定からの退避用の `.safe` を作る。
//! emacs の Meta 割り当ては `Esc` 前置でも同じウィジェットに届く。

use super::key::{Key, KeyCode, KeyModifiers};
use super::keymap::{names as maps, KeyMap, KeyMaps};
use crate::widget::{names, WidgetName};

const ENTER: Key = Key::plain(KeyCode::Enter);
const TAB: Key = Key::plain(KeyCode::Tab);
const BACKTAB: Key = Key::plain(KeyCode::BackTab);
const ESC: Key = Key::plain(KeyCode::Esc);
const BACKSPACE: Key = Key::plain(KeyCode::Backspace);
const DELETE: Key = Key::plain(KeyCode::Delete);
const UP: Key = Key::plain(KeyCode::Up);
const DOWN: Key = Key::plain(KeyCode::Down);
const LEFT: Key = Key::plain(KeyCode::Left);
const RIGHT: Key = Key::plain(KeyCode::Right);
const HOME: Key = Key::plain(KeyCode::Home);
const END: Key = Key::plain(KeyCode::End);
const INSERT: Key = Key::plain(KeyCode::Insert);

type Bindings<'a> = &'a [(&'a [Key], WidgetName)];

fn bind_all(map: &mut KeyMap, bindings: Bindings<'_>) {
    for (keys, widget) in bindings {
        map.bind(keys, widget.clone());
    }
}

/// Meta 付きの単一キー割り当てを `Esc` 前置のシーケンスにも複製する
fn add_escape_prefixes(map: &mut KeyMap) {
    let meta: Vec<(Key, WidgetName)> = map
        .bindings()
        .into_iter()
        .filter_map(|(seq, widget)| match seq.as_slice() {
            [key] if key.modifiers.alt => Some((*key, widget)),
            _ => None,
        })
        .collect();
    for (key, widget) in meta {
        let plain = Key::new(key.code, KeyModifiers { alt: false, ..key.modifiers });
        map.bind(&[ESC, plain], widget);
    }
}

/// 既定のキーマップ一式
pub fn default_keymaps() -> KeyMaps {
    let mut keymaps = KeyMaps::new();
    keymaps.insert(emacs());
    keymaps.insert(viins());
    keymaps.insert(vicmd());
    keymaps.insert(viopp());
    keymaps.insert(visual());
    keymaps.insert(menu());
    keymaps.insert(safe());
    keymaps.set_main(maps::EMACS);
    keymaps
}

fn emacs() -> KeyMap {
    let mut map = KeyMap::new(maps::EMACS).with_default_widget(names::SELF_INSERT);
    bind_all(
        &mut map,
        &[
            (&[ENTER], names::ACCEPT_LINE),
            (&[Key::ctrl('j')], names::ACCEPT_LINE),
            (&[Key::ctrl('m')], names::ACCEPT_LINE),
            (&[Key::ctrl('g')], names::ABORT),
            (&[Key::ctrl('l')], names::CLEAR_SCREEN),
            // 移動
            (&[Key::ctrl('a')], names::BEGINNING_OF_LINE),
            (&[Key::ctrl('e')], names::END_OF_LINE),
            (&[HOME], names::BEGINNING_OF_LINE),
            (&[END], names::END_OF_LINE),
            (&[Key::ctrl('f')], names::FORWARD_CHAR),
            (&[Key::ctrl('b')], names::BACKWARD_CHAR),
            (&[RIGHT], names::FORWARD_CHAR),
            (&[LEFT], names::BACKWARD_CHAR),
            (&[Key::alt('f')], names::FORWARD_WORD),
            (&[Key::alt('b')], names::BACKWARD_WORD),
            (&[Key::ctrl('p')], names::UP_LINE_OR_HISTORY),
            (&[Key::ctrl('n')], names::DOWN_LINE_OR_HISTORY),
            (&[UP], names::UP_LINE_OR_HISTORY),
            (&[DOWN], names::DOWN_LINE_OR_HISTORY),
            (&[Key::alt('<')], names::BEGINNING_OF_BUFFER_OR_HISTORY),
            (&[Key::alt('>')], names::END_OF_BUFFER_OR_HISTORY),
            (&[Key::ctrl(' ')], names::SET_MARK_COMMAND),
            (&[Key::ctrl('@')], names::SET_MARK_COMMAND),
            (&[Key::ctrl('x'), Key::ctrl('x')], names::EXCHANGE_POINT_AND_MARK),
            (&[Key::ctrl(']')], names::CHARACTER_SEARCH),
            (&[Key::ctrl_alt(']')], names::CHARACTER_SEARCH_BACKWARD),
            (&[Key::ctrl('x'), Key::ctrl('b')], names::VI_MATCH_BRACKET),
            (&[Key::ctrl('x'), Key::ctrl('f')], names::VI_FIND_NEXT_CHAR),
            (&[Key::alt('|')], names::VI_GOTO_COLUMN),
            (&[Key::ctrl('x'), Key::char('=')], names::WHAT_CURSOR_POSITION),
            // 編集
            (&[BACKSPACE], names::BACKWARD_DELETE_CHAR),
            (&[Key::ctrl('h')], names::BACKWARD_DELETE_CHAR),
            (&[DELETE], names::DELETE_CHAR),
            (&[Key::ctrl('d')], names::DELETE_CHAR_OR_LIST),
            (&[Key::ctrl('t')], names::TRANSPOSE_CHARS),
            (&[Key::alt('t')], names::TRANSPOSE_WORDS),
            (&[Key::alt('c')], names::CAPITALIZE_WORD),
            (&[Key::alt('u')], names::UP_CASE_WORD),
            (&[Key::alt('l')], names::DOWN_CASE_WORD),
            (&[Key::ctrl('v')], names::QUOTED_INSERT),
            (&[Key::ctrl('x'), Key::ctrl('o')], names::OVERWRITE_MODE),
            (&[INSERT], names::OVERWRITE_MODE),
            (&[Key::alt('#')], names::INSERT_COMMENT),
            (&[Key::ctrl_alt('_')], names::COPY_PREV_WORD),
            (&[Key::char(')')], names::INSERT_CLOSE_PAREN),
            (&[Key::char(']')], names::INSERT_CLOSE_SQUARE),
            (&[Key::char('}')], names::INSERT_CLOSE_CURLY),
            (&[Key::ctrl('_')], names::UNDO),
            (&[Key::ctrl('x'), Key::char('u')], names::UNDO),
            (&[Key::ctrl('x'), Key::ctrl('u')], names::UNDO),
            (&[Key::ctrl('x'), Key::ctrl('r')], names::REDO),
            // キル
            (&[Key::alt('d')], names::KILL_WORD),
            (&[Key::alt_code(KeyCode::Backspace)], names::BACKWARD_KILL_WORD),
            (&[Key::ctrl_alt('h')], names::BACKWARD_KILL_WORD),
            (&[Key::ctrl('w')], names::BACKWARD_KILL_WORD),
            (&[Key::ctrl('k')], names::KILL_LINE),
            (&[Key::ctrl('u')], names::KILL_WHOLE_LINE),
            (&[Key::ctrl('x'), Key::ctrl('k')], names::KILL_BUFFER),
            (&[Key::alt('w')], names::COPY_REGION_AS_KILL),
            (&[Key::ctrl('y')], names::YANK),
            (&[Key::alt('y')], names::YANK_POP),
            // 履歴
            (&[Key::ctrl('r')], names::HISTORY_INCREMENTAL_SEARCH_BACKWARD),
            (&[Key::ctrl('s')], names::HISTORY_INCREMENTAL_SEARCH_FORWARD),
            (&[Key::alt('p')], names::HISTORY_SEARCH_BACKWARD),
            (&[Key::alt('n')], names::HISTORY_SEARCH_FORWARD),
            (&[Key::alt('.')], names::INSERT_LAST_WORD),
            (&[Key::alt('_')], names::INSERT_LAST_WORD),
            (&[Key::ctrl('x'), Key::ctrl('n')], names::INFER_NEXT_HISTORY),
            (&[Key::alt('^')], names::EXPAND_HISTORY),
            (&[Key::alt('!')], names::EXPAND_HISTORY),
            // 補完
            (&[TAB], names::EXPAND_OR_COMPLETE),
            (&[Key::alt('?')], names::LIST_CHOICES),
            (&[Key::alt('=')], names::LIST_CHOICES),
            (&[BACKTAB], names::REVERSE_MENU_COMPLETE),
            // 数値引数
            (&[Key::alt('-')], names::NEG_ARGUMENT),
            (&[Key::alt('0')], names::DIGIT_ARGUMENT),
            (&[Key::alt('1')], names::DIGIT_ARGUMENT),
            (&[Key::alt('2')], names::DIGIT_ARGUMENT),
            (&[Key::alt('3')], names::DIGIT_ARGUMENT),
            (&[Key::alt('4')], names::DIGIT_ARGUMENT),
            (&[Key::alt('5')], names::DIGIT_ARGUMENT),
            (&[Key::alt('6')], names::DIGIT_ARGUMENT),
            (&[Key::alt('7')], names::DIGIT_ARGUMENT),
            (&[Key::alt('8')], names::DIGIT_ARGUMENT),
            (&[Key::alt('9')], names::DIGIT_ARGUMENT),
            // モード
            (&[Key::ctrl('x'), Key::ctrl('v')], names::VI_CMD_MODE),
            (&[Key::alt('x')], names::EXECUTE_NAMED_CMD),
        ],
    );
    // 大文字のMetaキーは小文字の割り当てを使う
    for c in 'A'..='Z' {
        map.bind(&[Key::alt(c)], names::DO_LOWERCASE_VERSION);
    }
    add_escape_prefixes(&mut map);
    map
}

fn viins() -> KeyMap {
    let mut map = KeyMap::new(maps::VIINS).with_default_widget(names::SELF_INSERT);
    bind_all(
        &mut map,
        &[
            (&[ESC], names::VI_CMD_MODE),
            (&[ENTER], names::ACCEPT_LINE),
            (&[Key::ctrl('j')], names::ACCEPT_LINE),
            (&[Key::ctrl('m')], names::ACCEPT_LINE),
            (&[BACKSPACE], names::VI_BACKWARD_DELETE_CHAR),
            (&[Key::ctrl('h')], names::VI_BACKWARD_DELETE_CHAR),
            (&[DELETE], names::DELETE_CHAR),
            (&[Key::ctrl('w')], names::VI_BACKWARD_KILL_WORD),
            (&[Key::ctrl('u')], names::VI_KILL_LINE),
            (&[Key::ctrl('v')], names::VI_QUOTED_INSERT),
            (&[Key::ctrl('r')], names::REDISPLAY),
            (&[Key::ctrl('l')], names::CLEAR_SCREEN),
            (&[TAB], names::EXPAND_OR_COMPLETE),
            (&[BACKTAB], names::REVERSE_MENU_COMPLETE),
            (&[Key::ctrl('d')], names::LIST_CHOICES),
            (&[UP], names::UP_LINE_OR_HISTORY),
            (&[DOWN], names::DOWN_LINE_OR_HISTORY),
            (&[LEFT], names::BACKWARD_CHAR),
            (&[RIGHT], names::FORWARD_CHAR),
            (&[HOME], names::BEGINNING_OF_LINE),
            (&[END], names::END_OF_LINE),
        ],
    );
    map
}

fn vicmd() -> KeyMap {
    let mut map = KeyMap::new(maps::VICMD);
    bind_all(
        &mut map,
        &[
            (&[ENTER], names::ACCEPT_LINE),
            (&[Key::ctrl('j')], names::ACCEPT_LINE),
            (&[Key::ctrl('m')], names::ACCEPT_LINE),
            (&[Key::ctrl('l')], names::CLEAR_SCREEN),
            (&[Key::ctrl('d')], names::LIST_CHOICES),
            (&[Key::char('=')], names::LIST_CHOICES),
            // 数値引数
            (&[Key::char('0')], names::VI_DIGIT_OR_BEGINNING_OF_LINE),
            (&[Key::char('1')], names::DIGIT_ARGUMENT),
            (&[Key::char('2')], names::DIGIT_ARGUMENT),
            (&[Key::char('3')], names::DIGIT_ARGUMENT),
            (&[Key::char('4')], names::DIGIT_ARGUMENT),
            (&[Key::char('5')], names::DIGIT_ARGUMENT),
            (&[Key::char('6')], names::DIGIT_ARGUMENT),
            (&[Key::char('7')], names::DIGIT_ARGUMENT),
            (&[Key::char('8')], names::DIGIT_ARGUMENT),
            (&[Key::char('9')], names::DIGIT_ARGUMENT),
            // 移動
            (&[Key::char('h')], names::VI_BACKWARD_CHAR),
            (&[BACKSPACE], names::VI_BACKWARD_CHAR),
            (&[LEFT], names::VI_BACKWARD_CHAR),
            (&[Key::char('l')], names::VI_FORWARD_CHAR),
            (&[Key::char(' ')], names::VI_FORWARD_CHAR),
            (&[RIGHT], names::VI_FORWARD_CHAR),
            (&[Key::char('w')], names::VI_FORWARD_WORD),
            (&[Key::char('W')], names::VI_FORWARD_BLANK_WORD),
            (&[Key::char('e')], names::VI_FORWARD_WORD_END),
            (&[Key::char('E')], names::VI_FORWARD_BLANK_WORD_END),
            (&[Key::char('b')], names::VI_BACKWARD_WORD),
            (&[Key::char('B')], names::VI_BACKWARD_BLANK_WORD),
            (&[Key::char('g'), Key::char('e')], names::VI_BACKWARD_WORD_END),
            (&[Key::char('g'), Key::char('E')], names::VI_BACKWARD_BLANK_WORD_END),
            (&[Key::char('^')], names::VI_FIRST_NON_BLANK),
            (&[Key::char('$')], names::VI_END_OF_LINE),
            (&[HOME], names::VI_BEGINNING_OF_LINE),
            (&[END], names::VI_END_OF_LINE),
            (&[Key::char('|')], names::VI_GOTO_COLUMN),
            (&[Key::char('%')], names::VI_MATCH_BRACKET),
            (&[Key::char('f')], names::VI_FIND_NEXT_CHAR),
            (&[Key::char('t')], names::VI_FIND_NEXT_CHAR_SKIP),
            (&[Key::char('F')], names::VI_FIND_PREV_CHAR),
            (&[Key::char('T')], names::VI_FIND_PREV_CHAR_SKIP),
            (&[Key::char(';')], names::VI_REPEAT_FIND),
            (&[Key::char(',')], names::VI_REV_REPEAT_FIND),
            // オペレータ
            (&[Key::char('d')], names::VI_DELETE),
            (&[Key::char('c')], names::VI_CHANGE_TO),
            (&[Key::char('y')], names::VI_YANK),
            (&[Key::char('g'), Key::char('~')], names::VI_OPER_SWAP_CASE),
            // 編集
            (&[Key::char('x')], names::VI_DELETE_CHAR),
            (&[DELETE], names::VI_DELETE_CHAR),
            (&[Key::char('X')], names::VI_BACKWARD_DELETE_CHAR),
            (&[Key::char('D')], names::VI_KILL_EOL),
            (&[Key::char('C')], names::VI_CHANGE_EOL),
            (&[Key::char('S')], names::VI_CHANGE_WHOLE_LINE),
            (&[Key::char('Y')], names::VI_YANK_WHOLE_LINE),
            (&[Key::char('s')], names::VI_SUBSTITUTE),
            (&[Key::char('r')], names::VI_REPLACE_CHARS),
            (&[Key::char('R')], names::VI_REPLACE),
            (&[Key::char('~')], names::VI_SWAP_CASE),
            (&[Key::char('p')], names::VI_PUT_AFTER),
            (&[Key::char('P')], names::VI_PUT_BEFORE),
            (&[Key::char('J')], names::VI_JOIN),
            (&[Key::char('u')], names::VI_UNDO_CHANGE),
            (&[Key::ctrl('r')], names::REDO),
            (&[Key::char('#')], names::VI_INSERT_COMMENT),
            // 挿入モードへ
            (&[Key::char('i')], names::VI_INSERT),
            (&[Key::char('I')], names::VI_INSERT_BOL),
            (&[Key::char('a')], names::VI_ADD_NEXT),
            (&[Key::char('A')], names::VI_ADD_EOL),
            (&[Key::char('o')], names::VI_OPEN_LINE_BELOW),
            (&[Key::char('O')], names::VI_OPEN_LINE_ABOVE),
            (&[Key::char('v')], names::VISUAL_MODE),
            (&[Key::char('V')], names::VISUAL_LINE_MODE),
            // 履歴
            (&[Key::char('k')], names::UP_LINE_OR_HISTORY),
            (&[Key::char('j')], names::DOWN_LINE_OR_HISTORY),
            (&[UP], names::UP_LINE_OR_HISTORY),
            (&[DOWN], names::DOWN_LINE_OR_HISTORY),
            (&[Key::char('-')], names::VI_UP_LINE_OR_HISTORY),
            (&[Key::char('+')], names::VI_DOWN_LINE_OR_HISTORY),
            (&[Key::char('G')], names::VI_FETCH_HISTORY),
            (&[Key::char('g'), Key::char('g')], names::BEGINNING_OF_BUFFER_OR_HISTORY),
            (&[Key::char('/')], names::VI_HISTORY_SEARCH_BACKWARD),
            (&[Key::char('?')], names::VI_HISTORY_SEARCH_FORWARD),
            (&[Key::char('n')], names::VI_REPEAT_SEARCH),
            (&[Key::char('N')], names::VI_REV_REPEAT_SEARCH),
        ],
    );
    map
}

/// オペレータ待ち。ここにないキーは vicmd へ落ちる
fn viopp() -> KeyMap {
    let mut map = KeyMap::new(maps::VIOPP);
    bind_all(
        &mut map,
        &[
            (&[ESC], names::VI_CMD_MODE),
            (&[Key::char('j')], names::DOWN_LINE),
            (&[Key::char('k')], names::UP_LINE),
        ],
    );
    map
}

fn visual() -> KeyMap {
    let mut map = KeyMap::new(maps::VISUAL);
    bind_all(
        &mut map,
        &[
            (&[ESC], names::VI_CMD_MODE),
            (&[Key::char('d')], names::VI_DELETE),
            (&[Key::char('x')], names::VI_DELETE),
            (&[Key::char('y')], names::VI_YANK),
            (&[Key::char('c')], names::VI_CHANGE_TO),
            (&[Key::char('s')], names::VI_CHANGE_TO),
            (&[Key::char('~')], names::VI_OPER_SWAP_CASE),
            (&[Key::char('o')], names::EXCHANGE_POINT_AND_MARK),
            (&[Key::char('J')], names::VI_JOIN),
            (&[Key::char('p')], names::PUT_REPLACE_SELECTION),
            (&[Key::char('P')], names::PUT_REPLACE_SELECTION),
            (&[Key::char('v')], names::VISUAL_MODE),
            (&[Key::char('V')], names::VISUAL_LINE_MODE),
        ],
    );
    map
}

/// メニュー選択中
fn menu() -> KeyMap {
    let mut map = KeyMap::new(maps::MENU);
    bind_all(
        &mut map,
        &[
            (&[TAB], names::MENU_COMPLETE),
            (&[DOWN], names::MENU_COMPLETE),
            (&[RIGHT], names::MENU_COMPLETE),
            (&[Key::ctrl('n')], names::MENU_COMPLETE),
            (&[BACKTAB], names::REVERSE_MENU_COMPLETE),
            (&[UP], names::REVERSE_MENU_COMPLETE),
            (&[LEFT], names::REVERSE_MENU_COMPLETE),
            (&[Key::ctrl('p')], names::REVERSE_MENU_COMPLETE),
            (&[ENTER], names::ACCEPT_LINE),
            (&[Key::ctrl('g')], names::ABORT),
        ],
    );
    map
}

/// 最小限の退避用キーマップ
fn safe() -> KeyMap {
    let mut map = KeyMap::new(maps::SAFE).with_default_widget(names::SELF_INSERT);
    bind_all(
        &mut map,
        &[
            (&[ENTER], names::ACCEPT_LINE),
            (&[Key::ctrl('j')], names::ACCEPT_LINE),
            (&[Key::ctrl('m')], names::ACCEPT_LINE),
            (&[BACKSPACE], names::BACKWARD_DELETE_CHAR),
        ],
    );
    map
}
