//! キルとヤンク

use super::add;
use super::edit::word_range;
use crate::editor::KillDirection;
use crate::error::Result;
use crate::reader::EditContext;
use crate::widget::{names, WidgetOutcome, WidgetRegistry};
use std::ops::Range;

pub(crate) fn register(registry: &mut WidgetRegistry) {
    add(registry, names::KILL_WORD, kill_word);
    add(registry, names::BACKWARD_KILL_WORD, backward_kill_word);
    add(registry, names::KILL_LINE, kill_line);
    add(registry, names::BACKWARD_KILL_LINE, backward_kill_line);
    add(registry, names::KILL_WHOLE_LINE, kill_whole_line);
    add(registry, names::KILL_BUFFER, kill_buffer);
    add(registry, names::KILL_REGION, kill_region);
    add(registry, names::COPY_REGION_AS_KILL, copy_region_as_kill);
    add(registry, names::YANK, yank);
    add(registry, names::YANK_POP, yank_pop);
}

/// 範囲を削除してキルリングへ送る
pub(crate) fn kill_range(ctx: &mut EditContext<'_>, range: Range<usize>, direction: KillDirection) {
    let removed = ctx.buffer.delete_range(range);
    ctx.kill_ring.kill(&removed, direction);
}

/// 符号付きの回数で単語をキルする
pub(crate) fn kill_words(ctx: &mut EditContext<'_>, count: i64) -> Result<WidgetOutcome> {
    let range = word_range(ctx, count);
    if range.is_empty() {
        return ctx.fail();
    }
    let direction = if count >= 0 { KillDirection::Forward } else { KillDirection::Backward };
    kill_range(ctx, range, direction);
    Ok(WidgetOutcome::Continue)
}

fn kill_word(ctx: &mut EditContext<'_>) -> Result<WidgetOutcome> {
    let count = ctx.count();
    kill_words(ctx, count)
}

fn backward_kill_word(ctx: &mut EditContext<'_>) -> Result<WidgetOutcome> {
    let count = ctx.count();
    kill_words(ctx, -count)
}

/// カーソルから `count` 行分の範囲。行末では改行を含める
fn line_kill_range(ctx: &EditContext<'_>, count: i64) -> Range<usize> {
    let buffer = &*ctx.buffer;
    let cursor = buffer.cursor();
    let mut pos = cursor;
    super::repeat(count, |forward| {
        let next = if forward {
            let end = buffer.line_end(pos);
            if end == pos && pos < buffer.len() {
                pos + 1
            } else {
                end
            }
        } else {
            let start = buffer.line_start(pos);
            if start == pos && pos > 0 {
                pos - 1
            } else {
                start
            }
        };
        let moved = next != pos;
        pos = next;
        moved
    });
    pos.min(cursor)..pos.max(cursor)
}

fn kill_lines(ctx: &mut EditContext<'_>, count: i64) -> Result<WidgetOutcome> {
    let range = line_kill_range(ctx, count);
    if range.is_empty() {
        return ctx.fail();
    }
    let direction = if count >= 0 { KillDirection::Forward } else { KillDirection::Backward };
    kill_range(ctx, range, direction);
    Ok(WidgetOutcome::Continue)
}

fn kill_line(ctx: &mut EditContext<'_>) -> Result<WidgetOutcome> {
    let count = ctx.count();
    kill_lines(ctx, count)
}

fn backward_kill_line(ctx: &mut EditContext<'_>) -> Result<WidgetOutcome> {
    let count = ctx.count();
    kill_lines(ctx, -count)
}

/// カーソルのある行全体（複数行バッファでは改行も）
fn kill_whole_line(ctx: &mut EditContext<'_>) -> Result<WidgetOutcome> {
    let count = ctx.count().unsigned_abs();
    if count == 0 {
        return Ok(WidgetOutcome::Continue);
    }
    let cursor = ctx.buffer.cursor();
    let start = ctx.buffer.line_start(cursor);
    let mut end = ctx.buffer.line_end(cursor);
    for _ in 1..count {
        if end >= ctx.buffer.len() {
            break;
        }
        end = ctx.buffer.line_end(end + 1);
    }
    let range = if end < ctx.buffer.len() {
        start..end + 1
    } else if start > 0 {
        start - 1..end
    } else {
        start..end
    };
    if range.is_empty() {
        return ctx.fail();
    }
    kill_range(ctx, range, KillDirection::Forward);
    Ok(WidgetOutcome::Continue)
}

fn kill_buffer(ctx: &mut EditContext<'_>) -> Result<WidgetOutcome> {
    if ctx.buffer.is_empty() {
        return ctx.fail();
    }
    let len = ctx.buffer.len();
    kill_range(ctx, 0..len, KillDirection::Forward);
    Ok(WidgetOutcome::Continue)
}

/// マークとカーソルの間と、キルの向き
fn region_with_direction(ctx: &EditContext<'_>) -> Option<(Range<usize>, KillDirection)> {
    let mark = ctx.buffer.mark()?;
    let region = ctx.buffer.region()?;
    let direction = if mark >= ctx.buffer.cursor() {
        KillDirection::Forward
    } else {
        KillDirection::Backward
    };
    Some((region, direction))
}

fn kill_region(ctx: &mut EditContext<'_>) -> Result<WidgetOutcome> {
    let Some((region, direction)) = region_with_direction(ctx) else {
        return ctx.fail();
    };
    kill_range(ctx, region, direction);
    Ok(WidgetOutcome::Continue)
}

fn copy_region_as_kill(ctx: &mut EditContext<'_>) -> Result<WidgetOutcome> {
    let Some((region, direction)) = region_with_direction(ctx) else {
        return ctx.fail();
    };
    let text = ctx.buffer.substring(region);
    ctx.kill_ring.kill(&text, direction);
    Ok(WidgetOutcome::Continue)
}

/// 挿入した範囲を記録しつつカーソル位置へ挿入する
pub(crate) fn insert_yanked(ctx: &mut EditContext<'_>, text: &str) {
    let start = ctx.buffer.cursor();
    ctx.buffer.insert_str(text);
    let end = ctx.buffer.cursor();
    ctx.buffer.set_mark(Some(start));
    ctx.line.last_yank = Some(start..end);
}

fn yank(ctx: &mut EditContext<'_>) -> Result<WidgetOutcome> {
    let Some(text) = ctx.kill_ring.yank() else {
        return ctx.fail();
    };
    insert_yanked(ctx, &text);
    Ok(WidgetOutcome::Continue)
}

/// 直前のヤンクを1つ古いエントリに置き換える
fn yank_pop(ctx: &mut EditContext<'_>) -> Result<WidgetOutcome> {
    let Some(range) = ctx.line.last_yank.clone().filter(|_| ctx.kill_ring.last_was_yank()) else {
        return ctx.fail();
    };
    let Some(text) = ctx.kill_ring.yank_pop() else {
        return ctx.fail();
    };
    let start = range.start;
    ctx.buffer.replace_range(range, &text);
    let end = ctx.buffer.cursor();
    ctx.buffer.set_mark(Some(start));
    ctx.line.last_yank = Some(start..end);
    Ok(WidgetOutcome::Continue)
}
