//! カーソル移動

use super::{add, add_motion, repeat};
use crate::editor::words;
use crate::error::Result;
use crate::input::key::Key;
use crate::mode::SubMode;
use crate::reader::EditContext;
use crate::widget::{names, MotionKind, WidgetOutcome, WidgetRegistry};

pub(crate) fn register(registry: &mut WidgetRegistry) {
    use MotionKind::Exclusive;

    add_motion(registry, names::FORWARD_CHAR, Exclusive, forward_char);
    add_motion(registry, names::BACKWARD_CHAR, Exclusive, backward_char);
    add_motion(registry, names::FORWARD_WORD, Exclusive, forward_word);
    add_motion(registry, names::BACKWARD_WORD, Exclusive, backward_word);
    add_motion(registry, names::EMACS_FORWARD_WORD, Exclusive, emacs_forward_word);
    add_motion(registry, names::EMACS_BACKWARD_WORD, Exclusive, emacs_backward_word);
    add_motion(registry, names::BEGINNING_OF_LINE, Exclusive, beginning_of_line);
    add_motion(registry, names::END_OF_LINE, Exclusive, end_of_line);
    add_motion(registry, names::UP_LINE, MotionKind::Linewise, up_line);
    add_motion(registry, names::DOWN_LINE, MotionKind::Linewise, down_line);
    add(registry, names::BEGINNING_OF_BUFFER_OR_HISTORY, beginning_of_buffer_or_history);
    add(registry, names::END_OF_BUFFER_OR_HISTORY, end_of_buffer_or_history);
    add(registry, names::BEGINNING_OF_LINE_HIST, beginning_of_line_hist);
    add(registry, names::END_OF_LINE_HIST, end_of_line_hist);
    add(registry, names::SET_MARK_COMMAND, set_mark_command);
    add(registry, names::EXCHANGE_POINT_AND_MARK, exchange_point_and_mark);
    add(registry, names::CHARACTER_SEARCH, character_search);
    add(registry, names::CHARACTER_SEARCH_BACKWARD, character_search_backward);
    add(registry, names::WHAT_CURSOR_POSITION, what_cursor_position);
}

fn move_chars(ctx: &mut EditContext<'_>, count: i64) -> Result<WidgetOutcome> {
    let delta = count.clamp(isize::MIN as i64, isize::MAX as i64) as isize;
    if ctx.buffer.move_by(delta) == 0 && delta != 0 {
        ctx.beep();
    }
    Ok(WidgetOutcome::Continue)
}

fn forward_char(ctx: &mut EditContext<'_>) -> Result<WidgetOutcome> {
    let count = ctx.count();
    move_chars(ctx, count)
}

fn backward_char(ctx: &mut EditContext<'_>) -> Result<WidgetOutcome> {
    let count = ctx.count();
    move_chars(ctx, -count)
}

/// 単語単位の移動。`alnum` なら英数字のみを単語とみなす
fn move_words(ctx: &mut EditContext<'_>, count: i64, alnum: bool) -> Result<WidgetOutcome> {
    let wc = ctx.word_chars();
    let buffer = &mut *ctx.buffer;
    repeat(count, |forward| {
        let pos = buffer.cursor();
        let target = match (forward, alnum) {
            (true, false) => words::forward_word(buffer.chars(), pos, &wc),
            (false, false) => words::backward_word(buffer.chars(), pos, &wc),
            (true, true) => words::forward_alnum_word(buffer.chars(), pos),
            (false, true) => words::backward_alnum_word(buffer.chars(), pos),
        };
        buffer.set_cursor(target);
        target != pos
    });
    Ok(WidgetOutcome::Continue)
}

fn forward_word(ctx: &mut EditContext<'_>) -> Result<WidgetOutcome> {
    let count = ctx.count();
    move_words(ctx, count, false)
}

fn backward_word(ctx: &mut EditContext<'_>) -> Result<WidgetOutcome> {
    let count = ctx.count();
    move_words(ctx, -count, false)
}

fn emacs_forward_word(ctx: &mut EditContext<'_>) -> Result<WidgetOutcome> {
    let count = ctx.count();
    move_words(ctx, count, true)
}

fn emacs_backward_word(ctx: &mut EditContext<'_>) -> Result<WidgetOutcome> {
    let count = ctx.count();
    move_words(ctx, -count, true)
}

fn beginning_of_line(ctx: &mut EditContext<'_>) -> Result<WidgetOutcome> {
    let start = ctx.buffer.line_start(ctx.buffer.cursor());
    ctx.buffer.set_cursor(start);
    Ok(WidgetOutcome::Continue)
}

fn end_of_line(ctx: &mut EditContext<'_>) -> Result<WidgetOutcome> {
    let end = ctx.buffer.line_end(ctx.buffer.cursor());
    ctx.buffer.set_cursor(end);
    Ok(WidgetOutcome::Continue)
}

fn move_lines(ctx: &mut EditContext<'_>, count: i64) -> Result<WidgetOutcome> {
    let buffer = &mut *ctx.buffer;
    let moved = repeat(count, |forward| if forward { buffer.move_line_down() } else { buffer.move_line_up() });
    if moved == 0 && count != 0 {
        ctx.beep();
    }
    Ok(WidgetOutcome::Continue)
}

fn up_line(ctx: &mut EditContext<'_>) -> Result<WidgetOutcome> {
    let count = ctx.count();
    move_lines(ctx, -count)
}

fn down_line(ctx: &mut EditContext<'_>) -> Result<WidgetOutcome> {
    let count = ctx.count();
    move_lines(ctx, count)
}

fn beginning_of_buffer_or_history(ctx: &mut EditContext<'_>) -> Result<WidgetOutcome> {
    if ctx.buffer.cursor() > 0 {
        ctx.buffer.set_cursor(0);
        return Ok(WidgetOutcome::Continue);
    }
    ctx.call_widget(&names::BEGINNING_OF_HISTORY)
}

fn end_of_buffer_or_history(ctx: &mut EditContext<'_>) -> Result<WidgetOutcome> {
    if ctx.buffer.cursor() < ctx.buffer.len() {
        let len = ctx.buffer.len();
        ctx.buffer.set_cursor(len);
        return Ok(WidgetOutcome::Continue);
    }
    ctx.call_widget(&names::END_OF_HISTORY)
}

/// 行頭へ。既にバッファ先頭なら前の履歴へ
fn beginning_of_line_hist(ctx: &mut EditContext<'_>) -> Result<WidgetOutcome> {
    let cursor = ctx.buffer.cursor();
    let start = ctx.buffer.line_start(cursor);
    if cursor > start {
        ctx.buffer.set_cursor(start);
        return Ok(WidgetOutcome::Continue);
    }
    if start > 0 {
        ctx.buffer.move_line_up();
        let start = ctx.buffer.line_start(ctx.buffer.cursor());
        ctx.buffer.set_cursor(start);
        return Ok(WidgetOutcome::Continue);
    }
    ctx.call_widget(&names::UP_HISTORY)?;
    ctx.buffer.set_cursor(0);
    Ok(WidgetOutcome::Continue)
}

/// 行末へ。既にバッファ末尾なら次の履歴へ
fn end_of_line_hist(ctx: &mut EditContext<'_>) -> Result<WidgetOutcome> {
    let cursor = ctx.buffer.cursor();
    let end = ctx.buffer.line_end(cursor);
    if cursor < end {
        ctx.buffer.set_cursor(end);
        return Ok(WidgetOutcome::Continue);
    }
    if end < ctx.buffer.len() {
        ctx.buffer.move_line_down();
        let end = ctx.buffer.line_end(ctx.buffer.cursor());
        ctx.buffer.set_cursor(end);
        return Ok(WidgetOutcome::Continue);
    }
    ctx.call_widget(&names::DOWN_HISTORY)
}

/// マークを置く。負の引数でマークを外す
fn set_mark_command(ctx: &mut EditContext<'_>) -> Result<WidgetOutcome> {
    if ctx.count() < 0 {
        ctx.buffer.set_mark(None);
    } else {
        let cursor = ctx.buffer.cursor();
        ctx.buffer.set_mark(Some(cursor));
    }
    Ok(WidgetOutcome::Continue)
}

fn exchange_point_and_mark(ctx: &mut EditContext<'_>) -> Result<WidgetOutcome> {
    let Some(mark) = ctx.buffer.mark() else {
        return ctx.fail();
    };
    let cursor = ctx.buffer.cursor();
    ctx.buffer.set_mark(Some(cursor));
    ctx.buffer.set_cursor(mark);
    Ok(WidgetOutcome::Continue)
}

fn character_search(ctx: &mut EditContext<'_>) -> Result<WidgetOutcome> {
    let count = ctx.count();
    ctx.mode.sub_mode = Some(SubMode::CharacterSearch { backward: false, count });
    Ok(WidgetOutcome::Continue)
}

fn character_search_backward(ctx: &mut EditContext<'_>) -> Result<WidgetOutcome> {
    let count = ctx.count();
    ctx.mode.sub_mode = Some(SubMode::CharacterSearch { backward: true, count });
    Ok(WidgetOutcome::Continue)
}

/// character-search で読んだ1文字を探して移動する
pub(crate) fn character_search_step(ctx: &mut EditContext<'_>, key: Key, backward: bool, count: i64) {
    if count == 0 {
        return;
    }
    let Some(target) = key.raw_char() else {
        ctx.beep();
        return;
    };
    let backward = backward != (count < 0);
    let chars = ctx.buffer.chars();
    let mut pos = ctx.buffer.cursor();
    for _ in 0..count.unsigned_abs() {
        let found = if backward {
            chars[..pos].iter().rposition(|&c| c == target)
        } else {
            chars.iter().skip(pos + 1).position(|&c| c == target).map(|i| pos + 1 + i)
        };
        match found {
            Some(p) => pos = p,
            None => {
                ctx.beep();
                return;
            }
        }
    }
    ctx.buffer.set_cursor(pos);
}

fn what_cursor_position(ctx: &mut EditContext<'_>) -> Result<WidgetOutcome> {
    let cursor = ctx.buffer.cursor();
    let len = ctx.buffer.len();
    let percent = if len == 0 { 100 } else { cursor * 100 / len };
    let column = ctx.buffer.column(cursor);
    let message = match ctx.buffer.current_char() {
        Some(c) => format!(
            "Char: {} (0{:o}, {}, 0x{:x})  point {} of {} ({}%)  column {}",
            c.escape_debug(),
            c as u32,
            c as u32,
            c as u32,
            cursor + 1,
            len + 1,
            percent,
            column
        ),
        None => format!("point {} of {} ({}%)  column {}", cursor + 1, len + 1, percent, column),
    };
    ctx.line.message = Some(message);
    Ok(WidgetOutcome::Continue)
}
