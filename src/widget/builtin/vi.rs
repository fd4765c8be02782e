//! viコマンド
//!
//! オペレータ（d / c / y / g~）は移動先待ちの状態を `ModeController` に置き、
//! 続く移動ウィジェットの後でディスパッチャが `apply_pending_operator` を呼ぶ。
//! 同じオペレータの二度打ちは行単位、ビジュアルモードでは選択範囲に作用する。

use super::kill::kill_words;
use super::{add, add_motion, repeat};
use crate::editor::{words, KillDirection};
use crate::error::Result;
use crate::input::key::{Key, KeyCode};
use crate::mode::{BaseMode, FindKind, Overlay, PendingOperator, SubMode, ViOperator};
use crate::reader::EditContext;
use crate::widget::{names, MotionKind, WidgetOutcome, WidgetRegistry};
use std::ops::Range;

pub(crate) fn register(registry: &mut WidgetRegistry) {
    use MotionKind::{Exclusive, Inclusive};

    add_motion(registry, names::VI_FORWARD_CHAR, Exclusive, vi_forward_char);
    add_motion(registry, names::VI_BACKWARD_CHAR, Exclusive, vi_backward_char);
    add_motion(registry, names::VI_FORWARD_WORD, Exclusive, |ctx| vi_forward_word(ctx, false));
    add_motion(registry, names::VI_FORWARD_BLANK_WORD, Exclusive, |ctx| vi_forward_word(ctx, true));
    add_motion(registry, names::VI_FORWARD_WORD_END, Inclusive, |ctx| {
        vi_word_motion(ctx, |c, p| words::vi_forward_word_end(c, p, false))
    });
    add_motion(registry, names::VI_FORWARD_BLANK_WORD_END, Inclusive, |ctx| {
        vi_word_motion(ctx, |c, p| words::vi_forward_word_end(c, p, true))
    });
    add_motion(registry, names::VI_BACKWARD_WORD, Exclusive, |ctx| {
        vi_word_motion(ctx, |c, p| words::vi_backward_word(c, p, false))
    });
    add_motion(registry, names::VI_BACKWARD_BLANK_WORD, Exclusive, |ctx| {
        vi_word_motion(ctx, |c, p| words::vi_backward_word(c, p, true))
    });
    add_motion(registry, names::VI_BACKWARD_WORD_END, Inclusive, |ctx| {
        vi_word_motion(ctx, |c, p| words::vi_backward_word_end(c, p, false))
    });
    add_motion(registry, names::VI_BACKWARD_BLANK_WORD_END, Inclusive, |ctx| {
        vi_word_motion(ctx, |c, p| words::vi_backward_word_end(c, p, true))
    });
    add_motion(registry, names::VI_BEGINNING_OF_LINE, Exclusive, vi_beginning_of_line);
    add_motion(registry, names::VI_END_OF_LINE, Inclusive, vi_end_of_line);
    add_motion(registry, names::VI_FIRST_NON_BLANK, Exclusive, vi_first_non_blank);
    add_motion(registry, names::VI_GOTO_COLUMN, Exclusive, vi_goto_column);
    add_motion(registry, names::VI_MATCH_BRACKET, Inclusive, vi_match_bracket);
    add_motion(registry, names::VI_FIND_NEXT_CHAR, Inclusive, |ctx| begin_find(ctx, FindKind::NextChar));
    add_motion(registry, names::VI_FIND_NEXT_CHAR_SKIP, Inclusive, |ctx| {
        begin_find(ctx, FindKind::NextCharSkip)
    });
    add_motion(registry, names::VI_FIND_PREV_CHAR, Exclusive, |ctx| begin_find(ctx, FindKind::PrevChar));
    add_motion(registry, names::VI_FIND_PREV_CHAR_SKIP, Exclusive, |ctx| {
        begin_find(ctx, FindKind::PrevCharSkip)
    });
    add_motion(registry, names::VI_REPEAT_FIND, Exclusive, |ctx| repeat_find(ctx, false));
    add_motion(registry, names::VI_REV_REPEAT_FIND, Exclusive, |ctx| repeat_find(ctx, true));

    add(registry, names::VI_DELETE, |ctx| operator(ctx, ViOperator::Delete));
    add(registry, names::VI_CHANGE_TO, |ctx| operator(ctx, ViOperator::Change));
    add(registry, names::VI_YANK, |ctx| operator(ctx, ViOperator::Yank));
    add(registry, names::VI_OPER_SWAP_CASE, |ctx| operator(ctx, ViOperator::SwapCase));

    add(registry, names::VI_DELETE_CHAR, vi_delete_char);
    add(registry, names::VI_BACKWARD_DELETE_CHAR, vi_backward_delete_char);
    add(registry, names::VI_KILL_EOL, vi_kill_eol);
    add(registry, names::VI_CHANGE_EOL, vi_change_eol);
    add(registry, names::VI_CHANGE_WHOLE_LINE, vi_change_whole_line);
    add(registry, names::VI_YANK_WHOLE_LINE, vi_yank_whole_line);
    add(registry, names::VI_YANK_EOL, vi_yank_eol);
    add(registry, names::VI_SUBSTITUTE, vi_substitute);
    add(registry, names::VI_REPLACE_CHARS, vi_replace_chars);
    add(registry, names::VI_REPLACE, vi_replace);
    add(registry, names::VI_SWAP_CASE, vi_swap_case);
    add(registry, names::VI_PUT_AFTER, |ctx| vi_put(ctx, true));
    add(registry, names::VI_PUT_BEFORE, |ctx| vi_put(ctx, false));
    add(registry, names::PUT_REPLACE_SELECTION, put_replace_selection);
    add(registry, names::VI_JOIN, vi_join);
    add(registry, names::VI_OPEN_LINE_ABOVE, |ctx| vi_open_line(ctx, true));
    add(registry, names::VI_OPEN_LINE_BELOW, |ctx| vi_open_line(ctx, false));
    add(registry, names::VI_INSERT_COMMENT, vi_insert_comment);
    add(registry, names::VI_BACKWARD_KILL_WORD, vi_backward_kill_word);
    add(registry, names::VI_KILL_LINE, vi_kill_line);
    add(registry, names::VI_QUOTED_INSERT, vi_quoted_insert);
}

fn in_command_mode(ctx: &EditContext<'_>) -> bool {
    ctx.mode.base() == BaseMode::ViCommand
}

/// コマンドモードではカーソルを行の最終文字より後ろに置かない
pub(crate) fn clamp_cursor(ctx: &mut EditContext<'_>) {
    let cursor = ctx.buffer.cursor();
    let start = ctx.buffer.line_start(cursor);
    let end = ctx.buffer.line_end(cursor);
    if end > start && cursor >= end {
        ctx.buffer.set_cursor(end - 1);
    }
}

/// 移動後の後始末。オペレータ待ちでなければ行内へ丸める
fn finish_motion(ctx: &mut EditContext<'_>) {
    if ctx.mode.pending_operator.is_none() && in_command_mode(ctx) {
        clamp_cursor(ctx);
    }
}

/// 右へ移動できる上限。オペレータ待ちや挿入モードでは行末まで
fn right_limit(ctx: &EditContext<'_>, pos: usize) -> usize {
    let start = ctx.buffer.line_start(pos);
    let end = ctx.buffer.line_end(pos);
    if ctx.mode.pending_operator.is_some() || !in_command_mode(ctx) || end == start {
        end
    } else {
        end - 1
    }
}

fn vi_forward_char(ctx: &mut EditContext<'_>) -> Result<WidgetOutcome> {
    let count = ctx.count();
    if count < 0 {
        return move_left(ctx, count.unsigned_abs() as usize);
    }
    let cursor = ctx.buffer.cursor();
    let target = (cursor + count as usize).min(right_limit(ctx, cursor));
    if target == cursor && count > 0 {
        return ctx.fail();
    }
    ctx.buffer.set_cursor(target);
    Ok(WidgetOutcome::Continue)
}

fn move_left(ctx: &mut EditContext<'_>, n: usize) -> Result<WidgetOutcome> {
    let cursor = ctx.buffer.cursor();
    let target = cursor.saturating_sub(n).max(ctx.buffer.line_start(cursor));
    if target == cursor && n > 0 {
        return ctx.fail();
    }
    ctx.buffer.set_cursor(target);
    Ok(WidgetOutcome::Continue)
}

fn vi_backward_char(ctx: &mut EditContext<'_>) -> Result<WidgetOutcome> {
    let count = ctx.count();
    if count < 0 {
        let cursor = ctx.buffer.cursor();
        let target = (cursor + count.unsigned_abs() as usize).min(right_limit(ctx, cursor));
        ctx.buffer.set_cursor(target);
        return Ok(WidgetOutcome::Continue);
    }
    move_left(ctx, count as usize)
}

/// 単語移動を回数分くり返す
fn vi_word_motion(ctx: &mut EditContext<'_>, step: fn(&[char], usize) -> usize) -> Result<WidgetOutcome> {
    let count = ctx.count().max(1);
    let buffer = &mut *ctx.buffer;
    let moved = repeat(count, |_| {
        let pos = buffer.cursor();
        let next = step(buffer.chars(), pos);
        buffer.set_cursor(next);
        next != pos
    });
    if moved == 0 {
        ctx.beep();
    }
    finish_motion(ctx);
    Ok(WidgetOutcome::Continue)
}

/// `w` / `W`。`cw` は `ce` と同じく単語末尾まで、`dw` は行をまたがない
fn vi_forward_word(ctx: &mut EditContext<'_>, blank: bool) -> Result<WidgetOutcome> {
    let count = ctx.count().max(1);
    let cursor = ctx.buffer.cursor();
    let changing = ctx
        .mode
        .pending_operator
        .is_some_and(|op| op.operator == ViOperator::Change);

    if changing && ctx.buffer.current_char().is_some_and(|c| !c.is_whitespace()) {
        let chars = ctx.buffer.chars();
        let mut end = words::vi_word_end_at(chars, cursor, blank);
        for _ in 1..count {
            end = words::vi_forward_word_end(chars, end, blank);
        }
        ctx.buffer.set_cursor(end);
        ctx.set_motion_kind(MotionKind::Inclusive);
        return Ok(WidgetOutcome::Continue);
    }

    let chars = ctx.buffer.chars();
    let mut pos = cursor;
    let mut last_from = cursor;
    for _ in 0..count {
        let next = words::vi_forward_word(chars, pos, blank);
        if next == pos {
            break;
        }
        last_from = pos;
        pos = next;
    }
    if ctx.mode.pending_operator.is_some() {
        let line_end = ctx.buffer.line_end(last_from);
        if pos > line_end {
            pos = line_end;
        }
    }
    if pos == cursor {
        ctx.beep();
    }
    ctx.buffer.set_cursor(pos);
    finish_motion(ctx);
    Ok(WidgetOutcome::Continue)
}

fn vi_beginning_of_line(ctx: &mut EditContext<'_>) -> Result<WidgetOutcome> {
    let start = ctx.buffer.line_start(ctx.buffer.cursor());
    ctx.buffer.set_cursor(start);
    Ok(WidgetOutcome::Continue)
}

/// `$`。回数 n なら n-1 行下の行末
fn vi_end_of_line(ctx: &mut EditContext<'_>) -> Result<WidgetOutcome> {
    for _ in 1..ctx.count().max(1) {
        if !ctx.buffer.move_line_down() {
            break;
        }
    }
    let cursor = ctx.buffer.cursor();
    let start = ctx.buffer.line_start(cursor);
    let end = ctx.buffer.line_end(cursor);
    if end == start {
        ctx.set_motion_kind(MotionKind::Exclusive);
        ctx.buffer.set_cursor(start);
    } else {
        ctx.buffer.set_cursor(end - 1);
    }
    Ok(WidgetOutcome::Continue)
}

fn vi_first_non_blank(ctx: &mut EditContext<'_>) -> Result<WidgetOutcome> {
    let first = ctx.buffer.first_non_blank(ctx.buffer.cursor());
    ctx.buffer.set_cursor(first);
    finish_motion(ctx);
    Ok(WidgetOutcome::Continue)
}

/// `|`。数値引数を1始まりの桁として使う
fn vi_goto_column(ctx: &mut EditContext<'_>) -> Result<WidgetOutcome> {
    let column = ctx.count().max(1) as usize - 1;
    let cursor = ctx.buffer.cursor();
    let start = ctx.buffer.line_start(cursor);
    let target = (start + column).min(right_limit(ctx, cursor));
    ctx.buffer.set_cursor(target);
    Ok(WidgetOutcome::Continue)
}

/// `%`。カーソル位置が括弧でなければ行内で次の括弧を探す
fn vi_match_bracket(ctx: &mut EditContext<'_>) -> Result<WidgetOutcome> {
    let cursor = ctx.buffer.cursor();
    let end = ctx.buffer.line_end(cursor);
    let chars = ctx.buffer.chars();
    let found = (cursor..end)
        .find(|&i| matches!(chars[i], '(' | ')' | '[' | ']' | '{' | '}'))
        .and_then(|i| words::matching_bracket(chars, i));
    match found {
        Some(target) => {
            ctx.buffer.set_cursor(target);
            Ok(WidgetOutcome::Continue)
        }
        None => {
            ctx.mode.cancel_operator();
            ctx.fail()
        }
    }
}

fn begin_find(ctx: &mut EditContext<'_>, kind: FindKind) -> Result<WidgetOutcome> {
    let count = ctx.count();
    ctx.mode.sub_mode = Some(SubMode::ViFindChar { kind, count });
    Ok(WidgetOutcome::Continue)
}

fn find_motion_kind(kind: FindKind) -> MotionKind {
    if kind.is_forward() {
        MotionKind::Inclusive
    } else {
        MotionKind::Exclusive
    }
}

/// 行内で文字を探した移動先。`repeating` なら t/T が隣の一致で止まらない
fn find_target(ctx: &EditContext<'_>, kind: FindKind, target: char, count: i64, repeating: bool) -> Option<usize> {
    let chars = ctx.buffer.chars();
    let cursor = ctx.buffer.cursor();
    let start = ctx.buffer.line_start(cursor);
    let end = ctx.buffer.line_end(cursor);
    let skip = matches!(kind, FindKind::NextCharSkip | FindKind::PrevCharSkip);

    let mut pos = cursor;
    for i in 0..count.max(1) {
        let nudge = usize::from(skip && repeating && i == 0);
        pos = if kind.is_forward() {
            let from = pos + 1 + nudge;
            (from..end).find(|&p| chars[p] == target)?
        } else {
            let to = pos.checked_sub(nudge)?;
            (start..to).rev().find(|&p| chars[p] == target)?
        };
    }
    Some(match kind {
        FindKind::NextCharSkip => pos - 1,
        FindKind::PrevCharSkip => pos + 1,
        _ => pos,
    })
}

/// f/t/F/T で読んだ1文字を探す。オペレータ待ちならここで適用する
pub(crate) fn find_char_step(ctx: &mut EditContext<'_>, key: Key, kind: FindKind, count: i64) {
    if key.code == KeyCode::Esc {
        ctx.mode.cancel_operator();
        return;
    }
    let Some(c) = key.raw_char() else {
        ctx.mode.cancel_operator();
        ctx.beep();
        return;
    };
    ctx.mode.last_find = Some((kind, c));
    let origin = ctx.buffer.cursor();
    match find_target(ctx, kind, c, count, false) {
        Some(target) => {
            ctx.buffer.set_cursor(target);
            if ctx.mode.pending_operator.is_some() {
                apply_pending_operator(ctx, origin, find_motion_kind(kind));
            } else {
                finish_motion(ctx);
            }
        }
        None => {
            ctx.mode.cancel_operator();
            ctx.beep();
        }
    }
}

/// `;` / `,`
fn repeat_find(ctx: &mut EditContext<'_>, reverse: bool) -> Result<WidgetOutcome> {
    let Some((kind, c)) = ctx.mode.last_find else {
        ctx.mode.cancel_operator();
        return ctx.fail();
    };
    let kind = if reverse { kind.reversed() } else { kind };
    let count = ctx.count();
    match find_target(ctx, kind, c, count, true) {
        Some(target) => {
            ctx.buffer.set_cursor(target);
            ctx.set_motion_kind(find_motion_kind(kind));
            finish_motion(ctx);
            Ok(WidgetOutcome::Continue)
        }
        None => {
            ctx.mode.cancel_operator();
            ctx.fail()
        }
    }
}

/// オペレータ入力。ビジュアル中なら選択範囲、二度打ちなら行単位、それ以外は移動先待ち
fn operator(ctx: &mut EditContext<'_>, op: ViOperator) -> Result<WidgetOutcome> {
    if let Some(visual) = ctx.mode.overlays().iter().rev().copied().find(|o| o.is_visual()) {
        let cursor = ctx.buffer.cursor();
        let mark = ctx.buffer.mark().unwrap_or(cursor);
        let (low, high) = (mark.min(cursor), mark.max(cursor));
        ctx.mode.remove_overlay(visual);
        ctx.buffer.set_mark(None);
        let span = if visual == Overlay::VisualLine {
            Span::Lines(low, high)
        } else {
            Span::Chars(low..(high + 1).min(ctx.buffer.len()))
        };
        apply_operator(ctx, op, span, low);
        return Ok(WidgetOutcome::Continue);
    }

    match ctx.mode.pending_operator {
        Some(pending) if pending.operator == op => {
            let lines = pending.count.saturating_mul(ctx.count()).max(1);
            ctx.mode.cancel_operator();
            let cursor = ctx.buffer.cursor();
            let mut last = cursor;
            for _ in 1..lines {
                let end = ctx.buffer.line_end(last);
                if end >= ctx.buffer.len() {
                    break;
                }
                last = end + 1;
            }
            apply_operator(ctx, op, Span::Lines(cursor, last), cursor);
            Ok(WidgetOutcome::Continue)
        }
        Some(_) => {
            ctx.mode.cancel_operator();
            ctx.fail()
        }
        None => {
            let count = ctx.count();
            ctx.mode.pending_operator = Some(PendingOperator { operator: op, count });
            ctx.mode.push_overlay(Overlay::OperatorPending);
            Ok(WidgetOutcome::Continue)
        }
    }
}

/// `low` と `high` を含む行全体。削除では改行も含める（変更は改行を残す）
fn linewise_range(ctx: &EditContext<'_>, low: usize, high: usize, op: ViOperator) -> Range<usize> {
    let start = ctx.buffer.line_start(low);
    let end = ctx.buffer.line_end(high);
    match op {
        ViOperator::Delete if end < ctx.buffer.len() => start..end + 1,
        ViOperator::Delete if start > 0 => start - 1..end,
        _ => start..end,
    }
}

/// 移動ウィジェットの後で待機中のオペレータを適用する
pub(crate) fn apply_pending_operator(ctx: &mut EditContext<'_>, origin: usize, kind: MotionKind) {
    let Some(pending) = ctx.mode.pending_operator else {
        return;
    };
    ctx.mode.cancel_operator();
    let target = ctx.buffer.cursor();
    let (low, high) = (origin.min(target), origin.max(target));
    log::trace!("apply {:?} over {}..{} ({:?})", pending.operator, low, high, kind);

    let span = match kind {
        MotionKind::Exclusive => Span::Chars(low..high),
        MotionKind::Inclusive => Span::Chars(low..(high + 1).min(ctx.buffer.len())),
        MotionKind::Linewise => Span::Lines(low, high),
    };
    apply_operator(ctx, pending.operator, span, origin);
}

/// `low` から `high` までの行の内容（末尾に改行を付ける）
fn linewise_text(ctx: &EditContext<'_>, low: usize, high: usize) -> String {
    let start = ctx.buffer.line_start(low);
    let end = ctx.buffer.line_end(high).max(start);
    format!("{}\n", ctx.buffer.substring(start..end))
}

fn swap_case(text: &str) -> String {
    text.chars()
        .flat_map(|c| {
            let swapped: Vec<char> = if c.is_uppercase() {
                c.to_lowercase().collect()
            } else {
                c.to_uppercase().collect()
            };
            swapped
        })
        .collect()
}

/// オペレータの対象
enum Span {
    Chars(Range<usize>),
    /// 両端の位置を含む行全体
    Lines(usize, usize),
}

/// オペレータを範囲に適用する
fn apply_operator(ctx: &mut EditContext<'_>, op: ViOperator, span: Span, origin: usize) {
    let (range, register, linewise) = match span {
        Span::Chars(range) => {
            let text = ctx.buffer.substring(range.clone());
            (range, text, false)
        }
        Span::Lines(low, high) => (linewise_range(ctx, low, high, op), linewise_text(ctx, low, high), true),
    };

    match op {
        ViOperator::Delete => {
            ctx.buffer.delete_range(range.clone());
            ctx.kill_ring.push(register);
            if linewise {
                let pos = range.start.min(ctx.buffer.len());
                let first = ctx.buffer.first_non_blank(pos);
                ctx.buffer.set_cursor(first);
            } else {
                ctx.buffer.set_cursor(range.start);
            }
            clamp_cursor(ctx);
        }
        ViOperator::Change => {
            ctx.buffer.delete_range(range.clone());
            ctx.kill_ring.push(register);
            ctx.buffer.set_cursor(range.start);
            ctx.mode.enter_vi_insert();
        }
        ViOperator::Yank => {
            ctx.kill_ring.push(register);
            ctx.buffer.set_cursor(if linewise { origin } else { range.start });
            clamp_cursor(ctx);
        }
        ViOperator::SwapCase => {
            let swapped = swap_case(&ctx.buffer.substring(range.clone()));
            ctx.buffer.replace_range(range.clone(), &swapped);
            ctx.buffer.set_cursor(if linewise { origin } else { range.start });
            clamp_cursor(ctx);
        }
    }
}

/// `x`。行内の文字だけを消す
fn vi_delete_char(ctx: &mut EditContext<'_>) -> Result<WidgetOutcome> {
    let count = ctx.count().max(1) as usize;
    let cursor = ctx.buffer.cursor();
    let end = (cursor + count).min(ctx.buffer.line_end(cursor));
    if end == cursor {
        return ctx.fail();
    }
    let removed = ctx.buffer.delete_range(cursor..end);
    ctx.kill_ring.push(removed);
    clamp_cursor(ctx);
    Ok(WidgetOutcome::Continue)
}

/// `X`。挿入モードでは行頭で止まる Backspace として使う
fn vi_backward_delete_char(ctx: &mut EditContext<'_>) -> Result<WidgetOutcome> {
    let count = ctx.count().max(1) as usize;
    let cursor = ctx.buffer.cursor();
    let start = cursor.saturating_sub(count).max(ctx.buffer.line_start(cursor));
    if start == cursor {
        return ctx.fail();
    }
    let removed = ctx.buffer.delete_range(start..cursor);
    if in_command_mode(ctx) {
        ctx.kill_ring.push(removed);
    }
    Ok(WidgetOutcome::Continue)
}

/// カーソルから行末まで
fn to_eol(ctx: &EditContext<'_>) -> Range<usize> {
    let cursor = ctx.buffer.cursor();
    cursor..ctx.buffer.line_end(cursor)
}

fn vi_kill_eol(ctx: &mut EditContext<'_>) -> Result<WidgetOutcome> {
    let range = to_eol(ctx);
    if range.is_empty() {
        return ctx.fail();
    }
    let removed = ctx.buffer.delete_range(range);
    ctx.kill_ring.push(removed);
    clamp_cursor(ctx);
    Ok(WidgetOutcome::Continue)
}

fn vi_change_eol(ctx: &mut EditContext<'_>) -> Result<WidgetOutcome> {
    let range = to_eol(ctx);
    let removed = ctx.buffer.delete_range(range);
    ctx.kill_ring.push(removed);
    ctx.mode.enter_vi_insert();
    Ok(WidgetOutcome::Continue)
}

fn vi_change_whole_line(ctx: &mut EditContext<'_>) -> Result<WidgetOutcome> {
    let cursor = ctx.buffer.cursor();
    let range = ctx.buffer.line_start(cursor)..ctx.buffer.line_end(cursor);
    let removed = ctx.buffer.delete_range(range);
    ctx.kill_ring.push(removed);
    ctx.mode.enter_vi_insert();
    Ok(WidgetOutcome::Continue)
}

fn vi_yank_whole_line(ctx: &mut EditContext<'_>) -> Result<WidgetOutcome> {
    let cursor = ctx.buffer.cursor();
    let mut last = cursor;
    for _ in 1..ctx.count().max(1) {
        let end = ctx.buffer.line_end(last);
        if end >= ctx.buffer.len() {
            break;
        }
        last = end + 1;
    }
    let text = linewise_text(ctx, cursor, last);
    ctx.kill_ring.push(text);
    Ok(WidgetOutcome::Continue)
}

fn vi_yank_eol(ctx: &mut EditContext<'_>) -> Result<WidgetOutcome> {
    let range = to_eol(ctx);
    if range.is_empty() {
        return ctx.fail();
    }
    let text = ctx.buffer.substring(range);
    ctx.kill_ring.push(text);
    Ok(WidgetOutcome::Continue)
}

/// `s`。回数分の文字を消して挿入モードへ
fn vi_substitute(ctx: &mut EditContext<'_>) -> Result<WidgetOutcome> {
    let count = ctx.count().max(1) as usize;
    let cursor = ctx.buffer.cursor();
    let end = (cursor + count).min(ctx.buffer.line_end(cursor));
    let removed = ctx.buffer.delete_range(cursor..end);
    ctx.kill_ring.push(removed);
    ctx.mode.enter_vi_insert();
    Ok(WidgetOutcome::Continue)
}

fn vi_replace_chars(ctx: &mut EditContext<'_>) -> Result<WidgetOutcome> {
    let count = ctx.count();
    ctx.mode.sub_mode = Some(SubMode::ViReplaceChars { count });
    Ok(WidgetOutcome::Continue)
}

/// `r` で読んだ文字で回数分を置き換える。行末を越える場合は何もしない
pub(crate) fn replace_chars_step(ctx: &mut EditContext<'_>, key: Key, count: i64) {
    if key.code == KeyCode::Esc {
        return;
    }
    let Some(c) = key.raw_char() else {
        ctx.beep();
        return;
    };
    let n = count.max(1) as usize;
    let cursor = ctx.buffer.cursor();
    if cursor + n > ctx.buffer.line_end(cursor) {
        ctx.beep();
        return;
    }
    if c == '\r' || c == '\n' {
        ctx.buffer.replace_range(cursor..cursor + n, "\n");
    } else {
        let replacement: String = std::iter::repeat(c).take(n).collect();
        ctx.buffer.replace_range(cursor..cursor + n, &replacement);
        ctx.buffer.set_cursor(cursor + n - 1);
    }
}

/// `R`。上書きの挿入モード
fn vi_replace(ctx: &mut EditContext<'_>) -> Result<WidgetOutcome> {
    ctx.mode.enter_vi_insert();
    ctx.buffer.set_overwrite(true);
    Ok(WidgetOutcome::Continue)
}

/// `~`。回数分の大文字小文字を入れ替えて進む
fn vi_swap_case(ctx: &mut EditContext<'_>) -> Result<WidgetOutcome> {
    let count = ctx.count().max(1) as usize;
    let cursor = ctx.buffer.cursor();
    let end = (cursor + count).min(ctx.buffer.line_end(cursor));
    if end == cursor {
        return ctx.fail();
    }
    let swapped = swap_case(&ctx.buffer.substring(cursor..end));
    ctx.buffer.replace_range(cursor..end, &swapped);
    clamp_cursor(ctx);
    Ok(WidgetOutcome::Continue)
}

/// `p` / `P`。改行で終わるレジスタは行単位で貼り付ける
fn vi_put(ctx: &mut EditContext<'_>, after: bool) -> Result<WidgetOutcome> {
    let Some(text) = ctx.kill_ring.yank() else {
        return ctx.fail();
    };
    let count = ctx.count().max(1) as usize;
    let cursor = ctx.buffer.cursor();

    if let Some(line) = text.strip_suffix('\n') {
        let block: Vec<&str> = std::iter::repeat(line).take(count).collect();
        let block = block.join("\n");
        if after {
            let end = ctx.buffer.line_end(cursor);
            let inserted: Vec<char> = format!("\n{}", block).chars().collect();
            ctx.buffer.insert_at(end, &inserted);
            ctx.buffer.set_cursor(end + 1);
        } else {
            let start = ctx.buffer.line_start(cursor);
            let inserted: Vec<char> = format!("{}\n", block).chars().collect();
            ctx.buffer.insert_at(start, &inserted);
            ctx.buffer.set_cursor(start);
        }
        ctx.buffer.set_multi_line(true);
        let first = ctx.buffer.first_non_blank(ctx.buffer.cursor());
        ctx.buffer.set_cursor(first);
        return Ok(WidgetOutcome::Continue);
    }

    let pos = if after && cursor < ctx.buffer.line_end(cursor) { cursor + 1 } else { cursor };
    let inserted: Vec<char> = text.repeat(count).chars().collect();
    if inserted.is_empty() {
        return ctx.fail();
    }
    ctx.buffer.insert_at(pos, &inserted);
    ctx.buffer.set_cursor(pos + inserted.len() - 1);
    Ok(WidgetOutcome::Continue)
}

/// ビジュアル中の `p`。選択範囲を貼り付けで置き換え、置き換えられた文字列をキルリングへ入れる
fn put_replace_selection(ctx: &mut EditContext<'_>) -> Result<WidgetOutcome> {
    let Some(visual) = ctx.mode.overlays().iter().rev().copied().find(|o| o.is_visual()) else {
        return vi_put(ctx, true);
    };
    let Some(text) = ctx.kill_ring.yank() else {
        return ctx.fail();
    };
    let count = ctx.count().max(1) as usize;
    let cursor = ctx.buffer.cursor();
    let mark = ctx.buffer.mark().unwrap_or(cursor);
    let (low, high) = (mark.min(cursor), mark.max(cursor));
    ctx.mode.remove_overlay(visual);
    ctx.buffer.set_mark(None);

    let (range, replaced, replacement) = if visual == Overlay::VisualLine {
        let line = text.strip_suffix('\n').unwrap_or(&text);
        let block: Vec<&str> = std::iter::repeat(line).take(count).collect();
        let start = ctx.buffer.line_start(low);
        (start..ctx.buffer.line_end(high), linewise_text(ctx, low, high), block.join("\n"))
    } else {
        let range = low..(high + 1).min(ctx.buffer.len());
        let replaced = ctx.buffer.substring(range.clone());
        (range, replaced, text.repeat(count))
    };

    ctx.buffer.replace_range(range.clone(), &replacement);
    ctx.kill_ring.push(replaced);
    if replacement.contains('\n') {
        ctx.buffer.set_multi_line(true);
    }
    let inserted = replacement.chars().count();
    ctx.buffer.set_cursor(range.start + inserted.saturating_sub(1));
    clamp_cursor(ctx);
    Ok(WidgetOutcome::Continue)
}

/// `J`。次の行の先頭の空白を1つの空白にまとめて連結する
fn vi_join(ctx: &mut EditContext<'_>) -> Result<WidgetOutcome> {
    if let Some(visual) = ctx.mode.overlays().iter().rev().copied().find(|o| o.is_visual()) {
        ctx.mode.remove_overlay(visual);
        ctx.buffer.set_mark(None);
    }
    let joins = (ctx.count().max(2) - 1) as usize;
    for _ in 0..joins {
        let end = ctx.buffer.line_end(ctx.buffer.cursor());
        if end >= ctx.buffer.len() {
            return ctx.fail();
        }
        let chars = ctx.buffer.chars();
        let mut next = end + 1;
        while next < chars.len() && matches!(chars[next], ' ' | '\t') {
            next += 1;
        }
        let separator = match (ctx.buffer.char_at(next), end.checked_sub(1).and_then(|p| ctx.buffer.char_at(p))) {
            (None | Some('\n'), _) | (_, Some(' ')) => "",
            (Some(')'), _) => "",
            _ => " ",
        };
        ctx.buffer.replace_range(end..next, separator);
        ctx.buffer.set_cursor(end);
    }
    Ok(WidgetOutcome::Continue)
}

/// `O` / `o`
fn vi_open_line(ctx: &mut EditContext<'_>, above: bool) -> Result<WidgetOutcome> {
    let cursor = ctx.buffer.cursor();
    if above {
        let start = ctx.buffer.line_start(cursor);
        ctx.buffer.insert_at(start, &['\n']);
        ctx.buffer.set_cursor(start);
    } else {
        let end = ctx.buffer.line_end(cursor);
        ctx.buffer.insert_at(end, &['\n']);
        ctx.buffer.set_cursor(end + 1);
    }
    ctx.buffer.set_multi_line(true);
    ctx.mode.enter_vi_insert();
    Ok(WidgetOutcome::Continue)
}

fn vi_insert_comment(ctx: &mut EditContext<'_>) -> Result<WidgetOutcome> {
    ctx.mode.enter_vi_insert();
    super::edit::toggle_comment_and_accept(ctx)
}

/// 挿入モードの `C-w`
fn vi_backward_kill_word(ctx: &mut EditContext<'_>) -> Result<WidgetOutcome> {
    let count = ctx.count().max(1);
    let cursor = ctx.buffer.cursor();
    let line_start = ctx.buffer.line_start(cursor);
    let chars = ctx.buffer.chars();
    let mut pos = cursor;
    for _ in 0..count {
        pos = words::vi_backward_word(chars, pos, false).max(line_start);
    }
    if pos == cursor {
        return kill_words(ctx, -count);
    }
    let removed = ctx.buffer.delete_range(pos..cursor);
    ctx.kill_ring.kill(&removed, KillDirection::Backward);
    Ok(WidgetOutcome::Continue)
}

/// 挿入モードの `C-u`。行頭からカーソルまで
fn vi_kill_line(ctx: &mut EditContext<'_>) -> Result<WidgetOutcome> {
    let cursor = ctx.buffer.cursor();
    let start = ctx.buffer.line_start(cursor);
    if start == cursor {
        return ctx.fail();
    }
    let removed = ctx.buffer.delete_range(start..cursor);
    ctx.kill_ring.kill(&removed, KillDirection::Backward);
    Ok(WidgetOutcome::Continue)
}

fn vi_quoted_insert(ctx: &mut EditContext<'_>) -> Result<WidgetOutcome> {
    let count = ctx.count();
    ctx.mode.sub_mode = Some(SubMode::QuotedInsert { count });
    Ok(WidgetOutcome::Continue)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::widget::builtin::testing::Harness;

    fn keys(h: &mut Harness, names: &[crate::widget::WidgetName]) {
        for name in names {
            h.call(name.clone(), None);
        }
    }

    #[test]
    fn test_dw_deletes_word() {
        let mut h = Harness::new("one two three").cursor(0).vi_command();
        h.call(names::VI_DELETE, Some(Key::char('d')));
        assert!(h.mode.has_overlay(Overlay::OperatorPending));
        h.call(names::VI_FORWARD_WORD, Some(Key::char('w')));
        assert_eq!(h.text(), "two three");
        assert_eq!(h.kill_ring.front(), Some("one "));
        assert!(h.mode.pending_operator.is_none());
        assert!(!h.mode.has_overlay(Overlay::OperatorPending));
    }

    #[test]
    fn test_dw_on_last_word_stays_on_line() {
        let mut h = Harness::new("ab cd\nef").cursor(3).vi_command();
        keys(&mut h, &[names::VI_DELETE, names::VI_FORWARD_WORD]);
        assert_eq!(h.text(), "ab \nef");
    }

    #[test]
    fn test_cw_behaves_like_ce() {
        let mut h = Harness::new("foo bar").cursor(0).vi_command();
        keys(&mut h, &[names::VI_CHANGE_TO, names::VI_FORWARD_WORD]);
        assert_eq!(h.text(), " bar");
        assert_eq!(h.mode.base(), BaseMode::ViInsert);
    }

    #[test]
    fn test_operator_counts_multiply() {
        let mut h = Harness::new("a b c d e f g").cursor(0).vi_command();
        h.call(names::DIGIT_ARGUMENT, Some(Key::char('2')));
        h.call(names::VI_DELETE, None);
        h.call(names::DIGIT_ARGUMENT, Some(Key::char('2')));
        h.call(names::VI_FORWARD_WORD, None);
        assert_eq!(h.text(), "e f g");
    }

    #[test]
    fn test_dd_and_linewise_put() {
        let mut h = Harness::new("first\nsecond\nthird").cursor(8).vi_command();
        keys(&mut h, &[names::VI_DELETE, names::VI_DELETE]);
        assert_eq!(h.text(), "first\nthird");
        assert_eq!(h.kill_ring.front(), Some("second\n"));
        assert_eq!(h.buffer.cursor(), 6);

        h.call(names::VI_PUT_AFTER, None);
        assert_eq!(h.text(), "first\nthird\nsecond");
        assert_eq!(h.buffer.cursor(), 12);
    }

    #[test]
    fn test_mismatched_operator_cancels() {
        let mut h = Harness::new("abc").cursor(0).vi_command();
        keys(&mut h, &[names::VI_DELETE, names::VI_YANK]);
        assert!(h.mode.pending_operator.is_none());
        assert_eq!(h.bells, 1);
        assert_eq!(h.text(), "abc");
    }

    #[test]
    fn test_non_motion_cancels_operator() {
        let mut h = Harness::new("abc").cursor(0).vi_command();
        keys(&mut h, &[names::VI_DELETE, names::VI_SWAP_CASE]);
        assert!(h.mode.pending_operator.is_none());
        assert_eq!(h.bells, 1);
    }

    #[test]
    fn test_yank_dollar_and_put() {
        let mut h = Harness::new("hello world").cursor(6).vi_command();
        keys(&mut h, &[names::VI_YANK, names::VI_END_OF_LINE]);
        assert_eq!(h.kill_ring.front(), Some("world"));
        assert_eq!(h.text(), "hello world");
        assert_eq!(h.buffer.cursor(), 6);

        h.buffer.set_cursor(4);
        h.call(names::VI_PUT_AFTER, None);
        assert_eq!(h.text(), "helloworld world");
        assert_eq!(h.buffer.cursor(), 9);
        h.buffer.set_cursor(0);
        h.call(names::VI_PUT_BEFORE, None);
        assert_eq!(h.text(), "worldhelloworld world");
    }

    #[test]
    fn test_find_char_sub_mode_with_operator() {
        let mut h = Harness::new("a,b,c,d").cursor(0).vi_command();
        h.call(names::VI_DELETE, None);
        h.call(names::VI_FIND_NEXT_CHAR_SKIP, None);
        assert!(matches!(h.mode.sub_mode, Some(SubMode::ViFindChar { .. })));
        assert!(h.mode.pending_operator.is_some());
        h.press(Key::char(','));
        assert_eq!(h.text(), ",b,c,d");
        assert_eq!(h.mode.last_find, Some((FindKind::NextCharSkip, ',')));
    }

    #[test]
    fn test_replace_chars_reads_one_key() {
        let mut h = Harness::new("abcd").cursor(1).vi_command();
        h.call_n(names::VI_REPLACE_CHARS, 2);
        h.press(Key::char('x'));
        assert_eq!(h.text(), "axxd");
        assert_eq!(h.buffer.cursor(), 2);

        h.call_n(names::VI_REPLACE_CHARS, 5);
        h.press(Key::char('y'));
        assert_eq!(h.text(), "axxd");
        assert_eq!(h.bells, 1);
    }

    #[test]
    fn test_repeat_find_and_reverse() {
        let mut h = Harness::new("a,b,c,d").cursor(0).vi_command();
        h.mode.last_find = Some((FindKind::NextChar, ','));
        h.call(names::VI_REPEAT_FIND, None);
        assert_eq!(h.buffer.cursor(), 1);
        h.call_n(names::VI_REPEAT_FIND, 2);
        assert_eq!(h.buffer.cursor(), 5);
        h.call(names::VI_REV_REPEAT_FIND, None);
        assert_eq!(h.buffer.cursor(), 3);
    }

    #[test]
    fn test_command_mode_cursor_stays_on_last_char() {
        let mut h = Harness::new("abc").cursor(1).vi_command();
        h.call_n(names::VI_FORWARD_CHAR, 5);
        assert_eq!(h.buffer.cursor(), 2);
        h.call(names::VI_FORWARD_CHAR, None);
        assert_eq!(h.bells, 1);
        h.call(names::VI_FORWARD_WORD, None);
        assert_eq!(h.buffer.cursor(), 2);
    }

    #[test]
    fn test_x_and_swap_case() {
        let mut h = Harness::new("abcd").cursor(3).vi_command();
        h.call(names::VI_DELETE_CHAR, None);
        assert_eq!(h.text(), "abc");
        assert_eq!(h.buffer.cursor(), 2);

        h.buffer.set_cursor(0);
        h.call_n(names::VI_SWAP_CASE, 2);
        assert_eq!(h.text(), "ABc");
        assert_eq!(h.buffer.cursor(), 2);
    }

    #[test]
    fn test_visual_mode_delete() {
        let mut h = Harness::new("hello world").cursor(0).vi_command();
        h.call(names::VISUAL_MODE, None);
        h.call_n(names::VI_FORWARD_CHAR, 4);
        h.call(names::VI_DELETE, None);
        assert_eq!(h.text(), " world");
        assert!(h.mode.overlays().is_empty());
        assert_eq!(h.buffer.mark(), None);
    }

    #[test]
    fn test_visual_put_replaces_selection() {
        let mut h = Harness::new("one two").cursor(0).vi_command();
        h.kill_ring.push("xyz".to_string());
        h.call(names::VISUAL_MODE, None);
        h.call_n(names::VI_FORWARD_CHAR, 2);
        h.call(names::PUT_REPLACE_SELECTION, None);
        assert_eq!(h.text(), "xyz two");
        assert_eq!(h.buffer.cursor(), 2);
        assert!(h.mode.overlays().is_empty());
        assert_eq!(h.kill_ring.front(), Some("one"));

        h.call(names::UNDO, None);
        assert_eq!(h.text(), "one two");
    }

    #[test]
    fn test_visual_line_put_replaces_lines() {
        let mut h = Harness::new("one\ntwo").cursor(5).vi_command();
        h.kill_ring.push("new\n".to_string());
        h.call(names::VISUAL_LINE_MODE, None);
        h.call(names::PUT_REPLACE_SELECTION, None);
        assert_eq!(h.text(), "one\nnew");
        assert_eq!(h.kill_ring.front(), Some("two\n"));
    }

    #[test]
    fn test_put_replace_selection_without_register_beeps() {
        let mut h = Harness::new("abc").cursor(0).vi_command();
        h.call(names::VISUAL_MODE, None);
        h.call(names::PUT_REPLACE_SELECTION, None);
        assert_eq!(h.text(), "abc");
        assert_eq!(h.bells, 1);
    }

    #[test]
    fn test_visual_line_yank() {
        let mut h = Harness::new("one\ntwo").cursor(1).vi_command();
        h.call(names::VISUAL_LINE_MODE, None);
        h.call(names::VI_YANK, None);
        assert_eq!(h.kill_ring.front(), Some("one\n"));
        assert_eq!(h.buffer.cursor(), 1);
    }

    #[test]
    fn test_change_eol_and_whole_line() {
        let mut h = Harness::new("keep drop").cursor(5).vi_command();
        h.call(names::VI_CHANGE_EOL, None);
        assert_eq!(h.text(), "keep ");
        assert_eq!(h.mode.base(), BaseMode::ViInsert);

        let mut h = Harness::new("all gone").cursor(3).vi_command();
        h.call(names::VI_CHANGE_WHOLE_LINE, None);
        assert_eq!(h.text(), "");
        assert_eq!(h.kill_ring.front(), Some("all gone"));
    }

    #[test]
    fn test_join_lines() {
        let mut h = Harness::new("foo\n   bar").cursor(0).vi_command();
        h.call(names::VI_JOIN, None);
        assert_eq!(h.text(), "foo bar");
        assert_eq!(h.buffer.cursor(), 3);
        h.call(names::VI_JOIN, None);
        assert_eq!(h.bells, 1);
    }

    #[test]
    fn test_open_line_below() {
        let mut h = Harness::new("top").cursor(1).vi_command();
        h.call(names::VI_OPEN_LINE_BELOW, None);
        assert_eq!(h.text(), "top\n");
        assert_eq!(h.buffer.cursor(), 4);
        assert!(h.buffer.is_multi_line());
        assert_eq!(h.mode.base(), BaseMode::ViInsert);
    }

    #[test]
    fn test_match_bracket() {
        let mut h = Harness::new("f(a[1])").cursor(0).vi_command();
        h.call(names::VI_MATCH_BRACKET, None);
        assert_eq!(h.buffer.cursor(), 6);
        h.call(names::VI_MATCH_BRACKET, None);
        assert_eq!(h.buffer.cursor(), 1);
    }

    #[test]
    fn test_goto_column() {
        let mut h = Harness::new("abcdef").cursor(0).vi_command();
        h.call_n(names::VI_GOTO_COLUMN, 4);
        assert_eq!(h.buffer.cursor(), 3);
    }

    #[test]
    fn test_insert_mode_kills() {
        let mut h = Harness::new("ls some/path");
        h.mode.set_base(BaseMode::ViInsert);
        h.call(names::VI_BACKWARD_KILL_WORD, None);
        assert_eq!(h.text(), "ls some/");
        h.call(names::VI_KILL_LINE, None);
        assert_eq!(h.text(), "");
        assert_eq!(h.kill_ring.front(), Some("ls some/path"));
    }
}
