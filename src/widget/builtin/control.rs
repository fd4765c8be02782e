//! 確定・中断・モード切り替え

use super::{add, add_without_undo};
use crate::error::Result;
use crate::history::expand_events;
use crate::input::key::{Key, KeyCode};
use crate::mode::{Overlay, SubMode};
use crate::options::ReadlineOption;
use crate::parser::{ParseContext, ParseError};
use crate::reader::dispatcher::recursive_edit;
use crate::reader::EditContext;
use crate::widget::{names, WidgetName, WidgetOutcome, WidgetRegistry};

pub(crate) fn register(registry: &mut WidgetRegistry) {
    add(registry, names::ACCEPT_LINE, accept_line);
    add(registry, names::ABORT, abort);
    add_without_undo(registry, names::BEEP, |ctx| ctx.fail());
    add_without_undo(registry, names::UNDEFINED_KEY, undefined_key);
    add_without_undo(registry, names::CLEAR_SCREEN, |ctx| {
        ctx.clear_screen()?;
        Ok(WidgetOutcome::Continue)
    });
    add_without_undo(registry, names::REDISPLAY, |ctx| {
        ctx.redisplay()?;
        Ok(WidgetOutcome::Continue)
    });
    add_without_undo(registry, names::RECURSIVE_EDIT, recursive_edit);
    add_without_undo(registry, names::EXECUTE_NAMED_CMD, execute_named_cmd);
    add_without_undo(registry, names::DO_LOWERCASE_VERSION, do_lowercase_version);
    add_without_undo(registry, names::EMACS_EDITING_MODE, emacs_editing_mode);
    add_without_undo(registry, names::VI_CMD_MODE, vi_cmd_mode);
    add_without_undo(registry, names::VI_INSERT, vi_insert);
    add_without_undo(registry, names::VI_INSERT_BOL, vi_insert_bol);
    add_without_undo(registry, names::VI_ADD_NEXT, vi_add_next);
    add_without_undo(registry, names::VI_ADD_EOL, vi_add_eol);
    add_without_undo(registry, names::VISUAL_MODE, |ctx| toggle_visual(ctx, Overlay::Visual));
    add_without_undo(registry, names::VISUAL_LINE_MODE, |ctx| toggle_visual(ctx, Overlay::VisualLine));
}

/// 行を確定する
///
/// メニュー選択中は選択の確定だけを行う。引用符が閉じていなければ改行を挿入して続行する。
/// 履歴参照は展開し、`HISTORY_VERIFY` なら展開結果を一度バッファに戻す。
fn accept_line(ctx: &mut EditContext<'_>) -> Result<WidgetOutcome> {
    if ctx.mode.remove_overlay(Overlay::MenuSelect) {
        return Ok(WidgetOutcome::Continue);
    }
    if ctx.mode.depth() > 0 {
        return Ok(WidgetOutcome::Accept);
    }

    match ctx.parse(ParseContext::AcceptLine) {
        Err(ParseError::Incomplete { missing }) => {
            log::debug!("accept-line: incomplete input, missing {}", missing);
            let end = ctx.buffer.len();
            ctx.buffer.set_cursor(end);
            ctx.buffer.insert_char('\n');
            ctx.buffer.set_multi_line(true);
            return Ok(WidgetOutcome::Continue);
        }
        Err(ParseError::Syntax(message)) => log::debug!("accept-line: {}", message),
        Ok(_) => {}
    }

    let text = ctx.buffer.text();
    let verified = ctx.line.verified_text.as_deref() == Some(text.as_str());
    if !verified && !ctx.option(ReadlineOption::DisableEventExpansion) {
        match expand_events(&text, ctx.history.store()) {
            Err(e) => {
                log::debug!("accept-line: {}", e);
                return ctx.fail();
            }
            Ok(expanded) if expanded != text => {
                ctx.buffer.set_text(&expanded);
                if ctx.option(ReadlineOption::HistoryVerify) {
                    ctx.line.verified_text = Some(expanded);
                    return Ok(WidgetOutcome::Continue);
                }
            }
            Ok(_) => {}
        }
    }

    ctx.mode.clear_overlays();
    Ok(WidgetOutcome::Accept)
}

/// オーバーレイやオペレータ待ちがあればそれだけを取り消す
fn abort(ctx: &mut EditContext<'_>) -> Result<WidgetOutcome> {
    if ctx.mode.overlays().is_empty() && ctx.mode.pending_operator.is_none() {
        return Ok(WidgetOutcome::Abort);
    }
    if ctx.mode.has_overlay(Overlay::MenuSelect) {
        if let Some(state) = ctx.line.completion.take() {
            let end = state.start + state.inserted_len;
            ctx.buffer.replace_range(state.start..end, &state.original);
        }
    }
    if ctx.mode.overlays().iter().any(|o| o.is_visual()) {
        ctx.buffer.set_mark(None);
    }
    ctx.mode.clear_overlays();
    ctx.fail()
}

fn undefined_key(ctx: &mut EditContext<'_>) -> Result<WidgetOutcome> {
    log::trace!("undefined key: {:?}", ctx.keys());
    ctx.fail()
}

fn emacs_editing_mode(ctx: &mut EditContext<'_>) -> Result<WidgetOutcome> {
    ctx.mode.enter_emacs();
    ctx.buffer.set_overwrite(false);
    Ok(WidgetOutcome::Continue)
}

/// 挿入モードから来たときだけカーソルを1つ左へ
fn vi_cmd_mode(ctx: &mut EditContext<'_>) -> Result<WidgetOutcome> {
    if ctx.mode.overlays().iter().any(|o| o.is_visual()) {
        ctx.buffer.set_mark(None);
    }
    if ctx.mode.enter_vi_command() {
        let cursor = ctx.buffer.cursor();
        if cursor > ctx.buffer.line_start(cursor) {
            ctx.buffer.set_cursor(cursor - 1);
        }
    }
    ctx.buffer.set_overwrite(false);
    super::vi::clamp_cursor(ctx);
    Ok(WidgetOutcome::Continue)
}

fn vi_insert(ctx: &mut EditContext<'_>) -> Result<WidgetOutcome> {
    ctx.mode.enter_vi_insert();
    Ok(WidgetOutcome::Continue)
}

fn vi_insert_bol(ctx: &mut EditContext<'_>) -> Result<WidgetOutcome> {
    let first = ctx.buffer.first_non_blank(ctx.buffer.cursor());
    ctx.buffer.set_cursor(first);
    ctx.mode.enter_vi_insert();
    Ok(WidgetOutcome::Continue)
}

fn vi_add_next(ctx: &mut EditContext<'_>) -> Result<WidgetOutcome> {
    let cursor = ctx.buffer.cursor();
    if cursor < ctx.buffer.line_end(cursor) {
        ctx.buffer.set_cursor(cursor + 1);
    }
    ctx.mode.enter_vi_insert();
    Ok(WidgetOutcome::Continue)
}

fn vi_add_eol(ctx: &mut EditContext<'_>) -> Result<WidgetOutcome> {
    let end = ctx.buffer.line_end(ctx.buffer.cursor());
    ctx.buffer.set_cursor(end);
    ctx.mode.enter_vi_insert();
    Ok(WidgetOutcome::Continue)
}

const NAMED_COMMAND_PROMPT: &str = "execute: ";

/// ウィジェット名を読んで実行する。数値引数は実行するウィジェットへ渡す
fn execute_named_cmd(ctx: &mut EditContext<'_>) -> Result<WidgetOutcome> {
    ctx.retain_argument();
    ctx.line.command_name = Some(String::new());
    ctx.line.message = Some(NAMED_COMMAND_PROMPT.to_string());
    ctx.mode.sub_mode = Some(SubMode::ExecuteNamed);
    Ok(WidgetOutcome::Continue)
}

/// 名前入力中の1キー。確定して実行すべきウィジェットがあれば返す
///
/// Enter で確定、Tab で登録名の共通接頭辞まで補完、`C-g` と Esc で取り消す。
pub(crate) fn execute_named_step(ctx: &mut EditContext<'_>, key: Key) -> Option<WidgetName> {
    let mut name = ctx.line.command_name.take().unwrap_or_default();

    if key.code == KeyCode::Enter || key == Key::ctrl('j') || key == Key::ctrl('m') {
        ctx.line.message = None;
        let name = WidgetName::from(name);
        if ctx.registry.contains(&name) {
            log::debug!("execute-named-cmd: {}", name);
            return Some(name);
        }
        log::debug!("execute-named-cmd: no such widget {:?}", name.as_str());
        ctx.mode.argument.clear();
        ctx.beep();
        return None;
    }
    if key.code == KeyCode::Esc || key == Key::ctrl('g') {
        cancel_named_command(ctx);
        return None;
    }

    if key.code == KeyCode::Backspace || key == Key::ctrl('h') {
        if name.pop().is_none() {
            ctx.beep();
        }
    } else if key.code == KeyCode::Tab {
        match complete_widget_name(ctx.registry, &name) {
            Some(completed) if completed.len() > name.len() => name = completed,
            _ => ctx.beep(),
        }
    } else if key.is_insertable_char() {
        if let KeyCode::Char(c) = key.code {
            name.push(c);
        }
    } else {
        ctx.beep();
    }

    ctx.line.message = Some(format!("{}{}", NAMED_COMMAND_PROMPT, name));
    ctx.line.command_name = Some(name);
    ctx.mode.sub_mode = Some(SubMode::ExecuteNamed);
    None
}

pub(crate) fn cancel_named_command(ctx: &mut EditContext<'_>) {
    ctx.line.command_name = None;
    ctx.line.message = None;
    ctx.mode.argument.clear();
}

/// `prefix` で始まる登録名の最長共通接頭辞
fn complete_widget_name(registry: &WidgetRegistry, prefix: &str) -> Option<String> {
    let mut matches = registry.names().into_iter().map(|n| n.as_str()).filter(|n| n.starts_with(prefix));
    let first = matches.next()?;
    let common = matches.fold(first.chars().count(), |len, other| {
        first.chars().zip(other.chars()).take(len).take_while(|(a, b)| a == b).count()
    });
    Some(first.chars().take(common).collect())
}

/// 大文字の最後のキーを小文字にして割り当てを引き直す
fn do_lowercase_version(ctx: &mut EditContext<'_>) -> Result<WidgetOutcome> {
    let keys = ctx.keys().to_vec();
    let Some((last, prefix)) = keys.split_last() else {
        return ctx.fail();
    };
    let lowered = match last.code {
        KeyCode::Char(c) if c.is_uppercase() => c.to_lowercase().next().unwrap_or(c),
        _ => return ctx.fail(),
    };
    let mut replay = prefix.to_vec();
    replay.push(Key::new(KeyCode::Char(lowered), last.modifiers));
    ctx.retain_argument();
    ctx.input.push_back(&replay);
    Ok(WidgetOutcome::Continue)
}

/// 同じビジュアルモードなら抜け、別のビジュアルモードからは切り替える
fn toggle_visual(ctx: &mut EditContext<'_>, overlay: Overlay) -> Result<WidgetOutcome> {
    if ctx.mode.remove_overlay(overlay) {
        ctx.buffer.set_mark(None);
        return Ok(WidgetOutcome::Continue);
    }
    let switching = ctx.mode.overlays().iter().any(|o| o.is_visual());
    if switching {
        ctx.mode.remove_overlay(Overlay::Visual);
        ctx.mode.remove_overlay(Overlay::VisualLine);
    } else {
        let cursor = ctx.buffer.cursor();
        ctx.buffer.set_mark(Some(cursor));
    }
    ctx.mode.push_overlay(overlay);
    Ok(WidgetOutcome::Continue)
}
