//! 読み取り・評価ループ
//!
//! キーを読み、有効なキーマップ（オーバーレイ上段から基底まで）で解決し、
//! ウィジェットを呼ぶ。1キーを直接受け取るサブモードもここで処理する。

use super::context::InvocationFlags;
use super::EditContext;
use crate::error::{ReadlineError, Result};
use crate::input::key::{Key, KeyCode};
use crate::input::keymap::{resolve_layered, KeyMap, Resolution};
use crate::input::source::KeyInput;
use crate::mode::{Overlay, SubMode};
use crate::options::{vars, DEFAULT_AMBIGUOUS_TIMEOUT_MS, DEFAULT_SEARCH_TERMINATORS};
use crate::widget::builtin::{control, edit, motion, vi};
use crate::widget::{names, WidgetName, WidgetOutcome};
use std::time::Duration;

/// 解決済みの割り当て
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Binding {
    pub(crate) widget: WidgetName,
    pub(crate) keys: Vec<Key>,
}

/// `Accept` か `Abort` になるまでループする
pub(crate) fn run(ctx: &mut EditContext<'_>) -> Result<WidgetOutcome> {
    loop {
        ctx.redisplay()?;

        if let Some(sub_mode) = ctx.mode.sub_mode {
            match run_sub_mode(ctx, sub_mode)? {
                WidgetOutcome::Continue => continue,
                outcome => return Ok(outcome),
            }
        }

        let Some(binding) = read_binding(ctx)? else {
            // 入力終端。内容があればそのまま確定する
            if ctx.buffer.is_empty() {
                return Err(ReadlineError::EndOfInput);
            }
            log::debug!("end of input with pending text, accepting");
            return Ok(WidgetOutcome::Accept);
        };

        match invoke(ctx, &binding.widget, binding.keys)? {
            WidgetOutcome::Continue => {}
            outcome => return Ok(outcome),
        }
    }
}

/// 入れ子の編集ループ。内側の確定・中断で外側へ戻る
pub(crate) fn recursive_edit(ctx: &mut EditContext<'_>) -> Result<WidgetOutcome> {
    let saved_flags = std::mem::take(&mut ctx.flags);
    let saved_argument = ctx.mode.argument;
    ctx.mode.argument.clear();
    ctx.mode.enter_recursive();
    log::debug!("recursive-edit: depth {}", ctx.mode.depth());

    let result = run(ctx);

    ctx.mode.leave_recursive();
    ctx.mode.argument = saved_argument;
    ctx.flags = saved_flags;
    if result? == WidgetOutcome::Abort {
        ctx.beep();
    }
    Ok(WidgetOutcome::Continue)
}

/// ウィジェットを1回呼び、呼び出し後の後処理を行う
pub(crate) fn invoke(ctx: &mut EditContext<'_>, name: &WidgetName, keys: Vec<Key>) -> Result<WidgetOutcome> {
    let registry = ctx.registry;
    let Some(widget) = registry.get(name) else {
        log::warn!("unknown widget bound: {}", name);
        ctx.flags = InvocationFlags {
            keys,
            ..Default::default()
        };
        ctx.beep();
        finish_invocation(ctx, name);
        ctx.ring_pending_bell()?;
        return Ok(WidgetOutcome::Continue);
    };

    ctx.flags = InvocationFlags {
        keys,
        motion: widget.motion_kind().is_some(),
        undo_base: widget.records_undo().then(|| ctx.buffer.snapshot()),
        ..Default::default()
    };
    let origin = ctx.buffer.cursor();
    let had_operator = ctx.mode.pending_operator.is_some();
    log::trace!("invoke {} (count {})", name, ctx.mode.argument.count());

    let outcome = widget.call(ctx)?;

    if outcome == WidgetOutcome::Continue && had_operator && ctx.mode.pending_operator.is_some() && ctx.mode.sub_mode.is_none() {
        match ctx.flags.motion_kind.or(widget.motion_kind()) {
            Some(kind) if !ctx.flags.retain_argument => vi::apply_pending_operator(ctx, origin, kind),
            Some(_) => {}
            None if ctx.flags.retain_argument => {}
            None => {
                // 移動以外のウィジェットでオペレータは取り消す
                ctx.mode.cancel_operator();
                ctx.beep();
            }
        }
    }

    if let Some(before) = ctx.flags.undo_base.take() {
        if before.text != ctx.buffer.text() {
            ctx.undo.record(before);
        }
    }
    finish_invocation(ctx, name);
    ctx.ring_pending_bell()?;
    Ok(outcome)
}

fn finish_invocation(ctx: &mut EditContext<'_>, name: &WidgetName) {
    if !ctx.flags.retain_argument {
        ctx.mode.argument.clear();
        ctx.kill_ring.finish_command();
        ctx.mode.last_widget = Some(name.clone());
    }
    if !ctx.flags.keep_menu {
        ctx.mode.remove_overlay(Overlay::MenuSelect);
        ctx.line.completion = None;
        ctx.line.listing = None;
        ctx.line.auto_suffix = None;
    }
    if name != &names::WHAT_CURSOR_POSITION && name != &names::EXECUTE_NAMED_CMD {
        ctx.line.message = None;
    }
}

/// 有効なキーマップ（優先順）。基底キーマップが無ければ `.safe`
fn active_maps<'m>(ctx: &EditContext<'m>) -> Vec<&'m KeyMap> {
    let keymaps = ctx.keymaps;
    let chain = ctx.mode.keymap_chain();
    let last = chain.len().saturating_sub(1);
    chain
        .iter()
        .enumerate()
        .filter_map(|(i, name)| if i == last { keymaps.get_or_safe(name) } else { keymaps.get(name) })
        .collect()
}

/// 曖昧な割り当てで待つ時間。0以下なら無制限に待つ
fn ambiguous_timeout(ctx: &EditContext<'_>) -> Option<Duration> {
    let ms = ctx.variables.get_int(vars::AMBIGUOUS_BINDING, DEFAULT_AMBIGUOUS_TIMEOUT_MS);
    (ms > 0).then(|| Duration::from_millis(ms as u64))
}

/// 次のキーを読む。割り込みキーはここでエラーにする
fn next_key(ctx: &mut EditContext<'_>, timeout: Option<Duration>) -> Result<KeyInput> {
    let input = ctx.input.read(timeout)?;
    if let KeyInput::Key(key) = input {
        if key == Key::ctrl('c') && ctx.variables.get_bool(vars::BIND_TTY_SPECIAL_CHARS, true) {
            log::debug!("interrupt key");
            return Err(ReadlineError::Interrupted);
        }
    }
    Ok(input)
}

/// キー列を読み、ウィジェットに解決する。入力終端なら None
pub(crate) fn read_binding(ctx: &mut EditContext<'_>) -> Result<Option<Binding>> {
    let mut keys: Vec<Key> = Vec::new();
    // 途中で見つかった完全一致（ウィジェット, キー数）
    let mut shorter: Option<(WidgetName, usize)> = None;

    loop {
        let waiting_ambiguous = shorter.as_ref().is_some_and(|(_, len)| *len == keys.len());
        let timeout = if waiting_ambiguous { ambiguous_timeout(ctx) } else { None };

        let key = match next_key(ctx, timeout)? {
            KeyInput::Key(key) => key,
            KeyInput::Timeout | KeyInput::Eof if waiting_ambiguous => {
                // 時間切れは短い方の割り当てを採用
                if let Some((widget, _)) = shorter {
                    log::trace!("ambiguous binding timed out: {}", widget);
                    return Ok(Some(Binding { widget, keys }));
                }
                continue;
            }
            KeyInput::Timeout => continue,
            KeyInput::Eof => {
                if keys.is_empty() {
                    return Ok(None);
                }
                return Ok(Some(fallback(ctx, keys, shorter)));
            }
        };

        if keys.is_empty()
            && key == Key::ctrl('d')
            && ctx.buffer.is_empty()
            && ctx.variables.get_bool(vars::BIND_TTY_SPECIAL_CHARS, true)
        {
            return Err(ReadlineError::EndOfInput);
        }

        keys.push(key);
        let maps = active_maps(ctx);
        match resolve_layered(&maps, &keys) {
            Resolution::Bound(widget) => {
                return Ok(Some(Binding {
                    widget: widget.clone(),
                    keys,
                }))
            }
            Resolution::Ambiguous(widget) => shorter = Some((widget.clone(), keys.len())),
            Resolution::Prefix => {}
            Resolution::Unbound => return Ok(Some(fallback(ctx, keys, shorter))),
        }
    }
}

/// 一致しなかったキー列の扱い
///
/// 途中で完全一致があればそれを採用し残りを押し戻す。なければ先頭キーを既定ウィジェットへ。
fn fallback(ctx: &mut EditContext<'_>, mut keys: Vec<Key>, shorter: Option<(WidgetName, usize)>) -> Binding {
    if let Some((widget, len)) = shorter {
        let rest = keys.split_off(len);
        ctx.input.push_back(&rest);
        return Binding { widget, keys };
    }
    let rest = keys.split_off(1.min(keys.len()));
    ctx.input.push_back(&rest);
    let widget = keys
        .first()
        .and_then(|first| active_maps(ctx).into_iter().find_map(|map| map.default_for(first)))
        .cloned()
        .unwrap_or(names::UNDEFINED_KEY);
    Binding { widget, keys }
}

/// 1キーずつ入力を受け取るサブモードを処理する
///
/// 名前入力で確定したウィジェットの結果だけが `Continue` 以外を返しうる。
pub(crate) fn run_sub_mode(ctx: &mut EditContext<'_>, sub_mode: SubMode) -> Result<WidgetOutcome> {
    if sub_mode == SubMode::IncrementalSearch {
        search_step(ctx)?;
        return Ok(WidgetOutcome::Continue);
    }

    let key = match next_key(ctx, None)? {
        KeyInput::Key(key) => key,
        KeyInput::Timeout => return Ok(WidgetOutcome::Continue),
        KeyInput::Eof => {
            ctx.mode.sub_mode = None;
            ctx.mode.cancel_operator();
            if sub_mode == SubMode::ExecuteNamed {
                control::cancel_named_command(ctx);
            }
            return Ok(WidgetOutcome::Continue);
        }
    };
    ctx.mode.sub_mode = None;
    ctx.flags = InvocationFlags {
        keys: vec![key],
        ..Default::default()
    };

    if sub_mode == SubMode::ExecuteNamed {
        return match control::execute_named_step(ctx, key) {
            Some(name) => invoke(ctx, &name, vec![key]),
            None => {
                ctx.ring_pending_bell()?;
                Ok(WidgetOutcome::Continue)
            }
        };
    }

    let before = ctx.buffer.snapshot();
    match sub_mode {
        SubMode::CharacterSearch { backward, count } => motion::character_search_step(ctx, key, backward, count),
        SubMode::ViFindChar { kind, count } => vi::find_char_step(ctx, key, kind, count),
        SubMode::QuotedInsert { count } => edit::quoted_insert_step(ctx, key, count),
        SubMode::ViReplaceChars { count } => vi::replace_chars_step(ctx, key, count),
        SubMode::IncrementalSearch | SubMode::ExecuteNamed => {}
    }

    if before.text != ctx.buffer.text() {
        ctx.undo.record(before);
    }
    ctx.kill_ring.finish_command();
    ctx.ring_pending_bell()?;
    Ok(WidgetOutcome::Continue)
}

fn is_search_widget(name: &WidgetName) -> Option<bool> {
    // Some(後方検索か)
    if *name == names::HISTORY_INCREMENTAL_SEARCH_BACKWARD
        || *name == names::HISTORY_INCREMENTAL_PATTERN_SEARCH_BACKWARD
        || *name == names::VI_HISTORY_SEARCH_BACKWARD
    {
        Some(true)
    } else if *name == names::HISTORY_INCREMENTAL_SEARCH_FORWARD
        || *name == names::HISTORY_INCREMENTAL_PATTERN_SEARCH_FORWARD
        || *name == names::VI_HISTORY_SEARCH_FORWARD
    {
        Some(false)
    } else {
        None
    }
}

/// インクリメンタル検索中の1キー
fn search_step(ctx: &mut EditContext<'_>) -> Result<()> {
    use crate::history::SearchDirection;

    let key = match next_key(ctx, None)? {
        KeyInput::Key(key) => key,
        KeyInput::Timeout => return Ok(()),
        KeyInput::Eof => {
            end_search(ctx);
            return Ok(());
        }
    };
    ctx.flags = InvocationFlags {
        keys: vec![key],
        ..Default::default()
    };

    let terminators = ctx
        .variables
        .get_str(vars::SEARCH_TERMINATORS)
        .unwrap_or(DEFAULT_SEARCH_TERMINATORS)
        .to_string();
    let vi_search = ctx.history.search.as_ref().is_some_and(|s| s.vi);
    let is_terminator = key.raw_char().is_some_and(|c| terminators.contains(c))
        || (vi_search && key == Key::plain(KeyCode::Enter));

    let maps = active_maps(ctx);
    let bound = resolve_layered(&maps, &[key]).widget().cloned();

    if is_terminator {
        end_search(ctx);
    } else if key.is_insertable_char() {
        if let (Some(c), Some(state)) = (key.to_char(), ctx.history.search.as_mut()) {
            state.pattern.push(c);
        }
        if !ctx.history.search_update(ctx.buffer, false) {
            ctx.history_beep();
        }
    } else if let Some(backward) = bound.as_ref().and_then(is_search_widget) {
        let direction = if backward { SearchDirection::Backward } else { SearchDirection::Forward };
        let mut repeat = true;
        if let Some(state) = ctx.history.search.as_mut() {
            if state.direction != direction {
                state.direction = direction;
                repeat = !state.pattern.is_empty();
            }
        }
        if !ctx.history.search_update(ctx.buffer, repeat) {
            ctx.history_beep();
        }
    } else if key == Key::plain(KeyCode::Backspace)
        || bound.as_ref().is_some_and(|w| *w == names::BACKWARD_DELETE_CHAR || *w == names::VI_BACKWARD_DELETE_CHAR)
    {
        ctx.history.search_backspace(ctx.buffer);
    } else if bound.as_ref().is_some_and(|w| *w == names::ABORT) {
        ctx.history.abort_search(ctx.buffer);
        ctx.mode.sub_mode = None;
    } else {
        end_search(ctx);
        ctx.input.push_back(&[key]);
    }
    ctx.ring_pending_bell()
}

/// 一致した行に留まって検索を終える
fn end_search(ctx: &mut EditContext<'_>) {
    ctx.mode.sub_mode = None;
    if let Some(state) = ctx.history.end_search() {
        if state.origin.text != ctx.buffer.text() {
            ctx.undo.record(state.origin);
        }
    }
}
