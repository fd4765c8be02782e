//! 履歴の移動と検索

use super::add;
use crate::error::Result;
use crate::history::{expand_events, SearchDirection};
use crate::mode::SubMode;
use crate::options::ReadlineOption;
use crate::reader::EditContext;
use crate::widget::{names, WidgetOutcome, WidgetRegistry};

pub(crate) fn register(registry: &mut WidgetRegistry) {
    add(registry, names::UP_HISTORY, up_history);
    add(registry, names::DOWN_HISTORY, down_history);
    add(registry, names::UP_LINE_OR_HISTORY, up_line_or_history);
    add(registry, names::DOWN_LINE_OR_HISTORY, down_line_or_history);
    add(registry, names::UP_LINE_OR_SEARCH, up_line_or_search);
    add(registry, names::DOWN_LINE_OR_SEARCH, down_line_or_search);
    add(registry, names::BEGINNING_OF_HISTORY, beginning_of_history);
    add(registry, names::END_OF_HISTORY, end_of_history);
    add(registry, names::HISTORY_SEARCH_BACKWARD, history_search_backward);
    add(registry, names::HISTORY_SEARCH_FORWARD, history_search_forward);
    add(registry, names::HISTORY_BEGINNING_SEARCH_BACKWARD, history_beginning_search_backward);
    add(registry, names::HISTORY_BEGINNING_SEARCH_FORWARD, history_beginning_search_forward);
    add(registry, names::HISTORY_INCREMENTAL_SEARCH_BACKWARD, |ctx| {
        begin_incremental(ctx, SearchDirection::Backward, false, false)
    });
    add(registry, names::HISTORY_INCREMENTAL_SEARCH_FORWARD, |ctx| {
        begin_incremental(ctx, SearchDirection::Forward, false, false)
    });
    add(registry, names::HISTORY_INCREMENTAL_PATTERN_SEARCH_BACKWARD, |ctx| {
        begin_incremental(ctx, SearchDirection::Backward, true, false)
    });
    add(registry, names::HISTORY_INCREMENTAL_PATTERN_SEARCH_FORWARD, |ctx| {
        begin_incremental(ctx, SearchDirection::Forward, true, false)
    });
    add(registry, names::INSERT_LAST_WORD, insert_last_word);
    add(registry, names::INFER_NEXT_HISTORY, infer_next_history);
    add(registry, names::EXPAND_HISTORY, expand_history);
    add(registry, names::VI_FETCH_HISTORY, vi_fetch_history);
    add(registry, names::VI_UP_LINE_OR_HISTORY, vi_up_line_or_history);
    add(registry, names::VI_DOWN_LINE_OR_HISTORY, vi_down_line_or_history);
    add(registry, names::VI_HISTORY_SEARCH_BACKWARD, |ctx| {
        begin_incremental(ctx, SearchDirection::Backward, false, true)
    });
    add(registry, names::VI_HISTORY_SEARCH_FORWARD, |ctx| {
        begin_incremental(ctx, SearchDirection::Forward, false, true)
    });
    add(registry, names::VI_REPEAT_SEARCH, |ctx| repeat_search(ctx, false));
    add(registry, names::VI_REV_REPEAT_SEARCH, |ctx| repeat_search(ctx, true));
}

/// 符号付きの回数で履歴を移動する。正なら古い方へ
fn move_history(ctx: &mut EditContext<'_>, count: i64) -> bool {
    let moved = if count >= 0 {
        ctx.history.previous(count, ctx.buffer)
    } else {
        ctx.history.next(-count, ctx.buffer)
    };
    if !moved && count != 0 {
        ctx.history_beep();
    }
    moved
}

fn up_history(ctx: &mut EditContext<'_>) -> Result<WidgetOutcome> {
    let count = ctx.count();
    move_history(ctx, count);
    Ok(WidgetOutcome::Continue)
}

fn down_history(ctx: &mut EditContext<'_>) -> Result<WidgetOutcome> {
    let count = ctx.count();
    move_history(ctx, -count);
    Ok(WidgetOutcome::Continue)
}

/// 複数行バッファ内を行移動し、端に着いたら履歴へ
fn line_or(ctx: &mut EditContext<'_>, up: bool, at_edge: fn(&mut EditContext<'_>, i64) -> bool) -> bool {
    let count = ctx.count();
    let mut remaining = count.unsigned_abs() as i64;
    let up = up != (count < 0);
    while remaining > 0 {
        let moved = if up { ctx.buffer.move_line_up() } else { ctx.buffer.move_line_down() };
        if !moved {
            break;
        }
        remaining -= 1;
    }
    if remaining == 0 {
        return true;
    }
    at_edge(ctx, if up { remaining } else { -remaining })
}

fn up_line_or_history(ctx: &mut EditContext<'_>) -> Result<WidgetOutcome> {
    line_or(ctx, true, move_history);
    Ok(WidgetOutcome::Continue)
}

fn down_line_or_history(ctx: &mut EditContext<'_>) -> Result<WidgetOutcome> {
    line_or(ctx, false, move_history);
    Ok(WidgetOutcome::Continue)
}

fn up_line_or_search(ctx: &mut EditContext<'_>) -> Result<WidgetOutcome> {
    line_or(ctx, true, search_first_word);
    Ok(WidgetOutcome::Continue)
}

fn down_line_or_search(ctx: &mut EditContext<'_>) -> Result<WidgetOutcome> {
    line_or(ctx, false, search_first_word);
    Ok(WidgetOutcome::Continue)
}

fn beginning_of_history(ctx: &mut EditContext<'_>) -> Result<WidgetOutcome> {
    if ctx.history.is_empty() || !ctx.history.move_to(0, ctx.buffer) {
        ctx.history_beep();
    }
    Ok(WidgetOutcome::Continue)
}

fn end_of_history(ctx: &mut EditContext<'_>) -> Result<WidgetOutcome> {
    let len = ctx.history.len();
    if !ctx.history.move_to(len, ctx.buffer) {
        ctx.history_beep();
    }
    Ok(WidgetOutcome::Continue)
}

/// 接頭辞が一致するエントリへ `count` 回移動する。正なら古い方へ
fn search_prefix(ctx: &mut EditContext<'_>, prefix: &str, count: i64) -> bool {
    let direction = if count >= 0 { SearchDirection::Backward } else { SearchDirection::Forward };
    for _ in 0..count.unsigned_abs() {
        let current = ctx.buffer.text();
        match ctx.history.find_prefix(prefix, &current, direction) {
            Some(index) => {
                ctx.history.move_to(index, ctx.buffer);
            }
            None => {
                ctx.history_beep();
                return false;
            }
        }
    }
    true
}

/// 行の最初の単語で検索する
fn search_first_word(ctx: &mut EditContext<'_>, count: i64) -> bool {
    let text = ctx.buffer.text();
    let first = text.split_whitespace().next().unwrap_or("").to_string();
    search_prefix(ctx, &first, count)
}

fn history_search_backward(ctx: &mut EditContext<'_>) -> Result<WidgetOutcome> {
    let count = ctx.count();
    search_first_word(ctx, count);
    Ok(WidgetOutcome::Continue)
}

fn history_search_forward(ctx: &mut EditContext<'_>) -> Result<WidgetOutcome> {
    let count = ctx.count();
    search_first_word(ctx, -count);
    Ok(WidgetOutcome::Continue)
}

/// カーソルまでの文字列で検索し、カーソル位置は保つ
fn beginning_search(ctx: &mut EditContext<'_>, count: i64) -> Result<WidgetOutcome> {
    let cursor = ctx.buffer.cursor();
    let prefix = ctx.buffer.substring(0..cursor);
    if search_prefix(ctx, &prefix, count) {
        ctx.buffer.set_cursor(cursor);
    }
    Ok(WidgetOutcome::Continue)
}

fn history_beginning_search_backward(ctx: &mut EditContext<'_>) -> Result<WidgetOutcome> {
    let count = ctx.count();
    beginning_search(ctx, count)
}

fn history_beginning_search_forward(ctx: &mut EditContext<'_>) -> Result<WidgetOutcome> {
    let count = ctx.count();
    beginning_search(ctx, -count)
}

/// インクリメンタル検索のサブモードへ入る
fn begin_incremental(ctx: &mut EditContext<'_>, direction: SearchDirection, glob: bool, vi: bool) -> Result<WidgetOutcome> {
    ctx.history.begin_search(direction, glob, vi, ctx.buffer);
    ctx.mode.sub_mode = Some(SubMode::IncrementalSearch);
    log::debug!("incremental search: {:?} glob={} vi={}", direction, glob, vi);
    Ok(WidgetOutcome::Continue)
}

fn repeat_search(ctx: &mut EditContext<'_>, reverse: bool) -> Result<WidgetOutcome> {
    if !ctx.history.repeat_last_search(reverse, ctx.buffer) {
        ctx.history_beep();
    }
    Ok(WidgetOutcome::Continue)
}

/// 前の履歴行の最後の単語を挿入する。続けて呼ぶとさらに前の行へ
///
/// 数値引数 n では後ろから n 番目の単語。
fn insert_last_word(ctx: &mut EditContext<'_>) -> Result<WidgetOutcome> {
    let repeated = ctx.mode.last_widget.as_ref() == Some(&names::INSERT_LAST_WORD);
    let previous = ctx.line.last_word.take().filter(|_| repeated);
    let start_index = match &previous {
        Some((index, _)) => *index,
        None => ctx.history.index().min(ctx.history.len()),
    };
    let nth = ctx.count().max(1) as usize;

    let found = (0..start_index).rev().find_map(|i| {
        let entry = ctx.history.entry(i)?;
        let words: Vec<&str> = entry.split_whitespace().collect();
        words
            .len()
            .checked_sub(nth)
            .map(|w| (i, words[w].to_string()))
    });
    let Some((index, word)) = found else {
        ctx.line.last_word = previous;
        return ctx.fail();
    };

    let start = match previous {
        Some((_, range)) => {
            let start = range.start;
            ctx.buffer.delete_range(range);
            ctx.buffer.set_cursor(start);
            start
        }
        None => ctx.buffer.cursor(),
    };
    ctx.buffer.insert_str(&word);
    ctx.line.last_word = Some((index, start..ctx.buffer.cursor()));
    Ok(WidgetOutcome::Continue)
}

/// 現在の行と同じ履歴行を探し、その次の行を取り出す
fn infer_next_history(ctx: &mut EditContext<'_>) -> Result<WidgetOutcome> {
    let text = ctx.buffer.text();
    let len = ctx.history.len();
    let found = (0..len.saturating_sub(1))
        .rev()
        .find(|&i| ctx.history.entry(i) == Some(text.as_str()));
    match found {
        Some(index) => {
            ctx.history.move_to(index + 1, ctx.buffer);
            Ok(WidgetOutcome::Continue)
        }
        None => ctx.fail(),
    }
}

fn expand_history(ctx: &mut EditContext<'_>) -> Result<WidgetOutcome> {
    if ctx.option(ReadlineOption::DisableEventExpansion) {
        return Ok(WidgetOutcome::Continue);
    }
    let text = ctx.buffer.text();
    match expand_events(&text, ctx.history.store()) {
        Ok(expanded) => {
            if expanded != text {
                ctx.buffer.set_text(&expanded);
            }
            Ok(WidgetOutcome::Continue)
        }
        Err(e) => {
            log::debug!("expand-history: {}", e);
            ctx.fail()
        }
    }
}

/// 数値引数 n なら n 番目（1始まり）の履歴、なければ最古の履歴
fn vi_fetch_history(ctx: &mut EditContext<'_>) -> Result<WidgetOutcome> {
    let target = match ctx.explicit_argument() {
        Some(n) if n >= 1 => (n - 1) as usize,
        Some(_) => return ctx.fail(),
        None => 0,
    };
    if target >= ctx.history.len() {
        return ctx.fail();
    }
    if ctx.history.index() != target {
        ctx.history.move_to(target, ctx.buffer);
    }
    let first = ctx.buffer.first_non_blank(0);
    ctx.buffer.set_cursor(first);
    Ok(WidgetOutcome::Continue)
}

fn vi_line_or_history(ctx: &mut EditContext<'_>, up: bool) -> Result<WidgetOutcome> {
    line_or(ctx, up, move_history);
    let first = ctx.buffer.first_non_blank(ctx.buffer.cursor());
    ctx.buffer.set_cursor(first);
    Ok(WidgetOutcome::Continue)
}

fn vi_up_line_or_history(ctx: &mut EditContext<'_>) -> Result<WidgetOutcome> {
    vi_line_or_history(ctx, true)
}

fn vi_down_line_or_history(ctx: &mut EditContext<'_>) -> Result<WidgetOutcome> {
    vi_line_or_history(ctx, false)
}
