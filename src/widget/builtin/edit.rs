//! 文字の挿入・削除・変換とアンドゥ

use super::{add, add_without_undo, repeat};
use crate::editor::words;
use crate::error::Result;
use crate::history::expand_events;
use crate::input::key::Key;
use crate::mode::SubMode;
use crate::options::{vars, ReadlineOption, DEFAULT_REMOVE_SUFFIX_CHARS};
use crate::reader::EditContext;
use crate::widget::{names, WidgetOutcome, WidgetRegistry};

pub(crate) fn register(registry: &mut WidgetRegistry) {
    add(registry, names::SELF_INSERT, self_insert);
    add(registry, names::SELF_INSERT_UNMETA, self_insert_unmeta);
    add(registry, names::BACKWARD_DELETE_CHAR, backward_delete_char);
    add(registry, names::DELETE_CHAR, delete_char);
    add(registry, names::BACKWARD_DELETE_WORD, backward_delete_word);
    add(registry, names::DELETE_WORD, delete_word);
    add(registry, names::TRANSPOSE_CHARS, transpose_chars);
    add(registry, names::TRANSPOSE_WORDS, transpose_words);
    add(registry, names::CAPITALIZE_WORD, capitalize_word);
    add(registry, names::UP_CASE_WORD, up_case_word);
    add(registry, names::DOWN_CASE_WORD, down_case_word);
    add(registry, names::QUOTED_INSERT, quoted_insert);
    add(registry, names::OVERWRITE_MODE, overwrite_mode);
    add(registry, names::INSERT_COMMENT, insert_comment);
    add(registry, names::COPY_PREV_WORD, copy_prev_word);
    add(registry, names::INSERT_CLOSE_PAREN, insert_close_bracket);
    add(registry, names::INSERT_CLOSE_CURLY, insert_close_bracket);
    add(registry, names::INSERT_CLOSE_SQUARE, insert_close_bracket);
    add(registry, names::MAGIC_SPACE, magic_space);
    add_without_undo(registry, names::UNDO, undo);
    add_without_undo(registry, names::REDO, redo);
    add_without_undo(registry, names::VI_UNDO_CHANGE, vi_undo_change);
    add_without_undo(registry, names::SPLIT_UNDO, |ctx| {
        ctx.split_undo();
        Ok(WidgetOutcome::Continue)
    });
}

/// キーから挿入する文字。`unmeta` なら Meta を無視する
fn char_for_key(key: Key, unmeta: bool) -> Option<char> {
    if key.modifiers.alt && !unmeta {
        return None;
    }
    match key.raw_char()? {
        '\r' => Some('\n'),
        c => Some(c),
    }
}

/// カーソル位置に `count` 個挿入する（上書きモードでは置き換え）
pub(crate) fn insert_repeated(ctx: &mut EditContext<'_>, c: char, count: i64) {
    if count <= 0 {
        return;
    }
    remove_auto_suffix(ctx, c);
    let overwrite = ctx.buffer.is_overwrite();
    for _ in 0..count {
        if overwrite && ctx.buffer.current_char().is_some_and(|cur| cur != '\n') {
            ctx.buffer.delete_forward(1);
        }
        ctx.buffer.insert_char(c);
    }
}

/// 補完で付けた接尾辞を、区切り文字の入力時に取り除く
fn remove_auto_suffix(ctx: &mut EditContext<'_>, typed: char) {
    let Some(suffix) = ctx.line.auto_suffix.take() else {
        return;
    };
    let removable = ctx
        .variables
        .get_str(vars::REMOVE_SUFFIX_CHARS)
        .unwrap_or(DEFAULT_REMOVE_SUFFIX_CHARS);
    if removable.contains(typed) && suffix.end == ctx.buffer.cursor() {
        ctx.buffer.delete_range(suffix);
    }
}

fn self_insert(ctx: &mut EditContext<'_>) -> Result<WidgetOutcome> {
    let Some(c) = ctx.last_key().and_then(|k| char_for_key(k, false)) else {
        return ctx.fail();
    };
    let count = ctx.count();
    insert_repeated(ctx, c, count);
    Ok(WidgetOutcome::Continue)
}

fn self_insert_unmeta(ctx: &mut EditContext<'_>) -> Result<WidgetOutcome> {
    let Some(c) = ctx.last_key().and_then(|k| char_for_key(k, true)) else {
        return ctx.fail();
    };
    let count = ctx.count();
    insert_repeated(ctx, c, count);
    Ok(WidgetOutcome::Continue)
}

/// 符号付きの回数で文字を削除する。正なら前方
fn delete_chars(ctx: &mut EditContext<'_>, count: i64) -> Result<WidgetOutcome> {
    let n = count.unsigned_abs() as usize;
    let removed = if count >= 0 {
        ctx.buffer.delete_forward(n)
    } else {
        ctx.buffer.delete_backward(n)
    };
    if removed.is_empty() && n > 0 {
        ctx.beep();
    }
    Ok(WidgetOutcome::Continue)
}

fn backward_delete_char(ctx: &mut EditContext<'_>) -> Result<WidgetOutcome> {
    let count = ctx.count();
    delete_chars(ctx, -count)
}

fn delete_char(ctx: &mut EditContext<'_>) -> Result<WidgetOutcome> {
    let count = ctx.count();
    delete_chars(ctx, count)
}

/// カーソルから `count` 単語分の範囲
pub(crate) fn word_range(ctx: &EditContext<'_>, count: i64) -> std::ops::Range<usize> {
    let wc = ctx.word_chars();
    let chars = ctx.buffer.chars();
    let cursor = ctx.buffer.cursor();
    let mut pos = cursor;
    repeat(count, |forward| {
        let next = if forward {
            words::forward_word(chars, pos, &wc)
        } else {
            words::backward_word(chars, pos, &wc)
        };
        let moved = next != pos;
        pos = next;
        moved
    });
    pos.min(cursor)..pos.max(cursor)
}

fn delete_words(ctx: &mut EditContext<'_>, count: i64) -> Result<WidgetOutcome> {
    let range = word_range(ctx, count);
    if range.is_empty() {
        return ctx.fail();
    }
    ctx.buffer.delete_range(range);
    Ok(WidgetOutcome::Continue)
}

fn backward_delete_word(ctx: &mut EditContext<'_>) -> Result<WidgetOutcome> {
    let count = ctx.count();
    delete_words(ctx, -count)
}

fn delete_word(ctx: &mut EditContext<'_>) -> Result<WidgetOutcome> {
    let count = ctx.count();
    delete_words(ctx, count)
}

/// カーソル前後の2文字を入れ替えて進む。行末では直前の2文字を入れ替える
fn transpose_chars(ctx: &mut EditContext<'_>) -> Result<WidgetOutcome> {
    let count = ctx.count();
    for _ in 0..count.unsigned_abs() {
        let cursor = ctx.buffer.cursor();
        let at_line_end = ctx.buffer.current_char().map_or(true, |c| c == '\n');
        let (left, right) = if at_line_end {
            (cursor.checked_sub(2), cursor.checked_sub(1))
        } else {
            (cursor.checked_sub(1), Some(cursor))
        };
        let (Some(left), Some(right)) = (left, right) else {
            return ctx.fail();
        };
        let (Some(a), Some(b)) = (ctx.buffer.char_at(left), ctx.buffer.char_at(right)) else {
            return ctx.fail();
        };
        if a == '\n' || b == '\n' {
            return ctx.fail();
        }
        ctx.buffer.replace_range(left..right + 1, &format!("{}{}", b, a));
        ctx.buffer.set_cursor(right + 1);
    }
    Ok(WidgetOutcome::Continue)
}

/// 直前の単語とカーソル位置（以降）の単語を入れ替える
fn transpose_words(ctx: &mut EditContext<'_>) -> Result<WidgetOutcome> {
    let wc = ctx.word_chars();
    let chars = ctx.buffer.chars();
    let cursor = ctx.buffer.cursor();

    let end2 = words::forward_word(chars, cursor, &wc);
    let start2 = words::backward_word(chars, end2, &wc);
    let start1 = words::backward_word(chars, start2, &wc);
    let end1 = words::forward_word(chars, start1, &wc);
    if start1 >= start2 || end1 > start2 || start2 >= end2 {
        return ctx.fail();
    }

    let first = ctx.buffer.substring(start1..end1);
    let between = ctx.buffer.substring(end1..start2);
    let second = ctx.buffer.substring(start2..end2);
    ctx.buffer
        .replace_range(start1..end2, &format!("{}{}{}", second, between, first));
    Ok(WidgetOutcome::Continue)
}

#[derive(Clone, Copy)]
enum CaseChange {
    Capitalize,
    Upper,
    Lower,
}

/// 単語の大文字小文字を変換する。負の回数では直前の単語を変換しカーソルは動かさない
fn change_case_words(ctx: &mut EditContext<'_>, change: CaseChange) -> Result<WidgetOutcome> {
    let count = ctx.count();
    let range = word_range(ctx, count);
    if range.is_empty() {
        return ctx.fail();
    }
    let wc = ctx.word_chars();
    let text = ctx.buffer.substring(range.clone());
    let mut converted = String::with_capacity(text.len());
    let mut at_word_start = true;
    for c in text.chars() {
        let word = wc.is_word(c) && c.is_alphanumeric();
        match change {
            CaseChange::Upper => converted.extend(c.to_uppercase()),
            CaseChange::Lower => converted.extend(c.to_lowercase()),
            CaseChange::Capitalize if word && at_word_start => converted.extend(c.to_uppercase()),
            CaseChange::Capitalize => converted.extend(c.to_lowercase()),
        }
        at_word_start = !word;
    }

    let cursor = ctx.buffer.cursor();
    ctx.buffer.replace_range(range.clone(), &converted);
    if count < 0 {
        ctx.buffer.set_cursor(cursor);
    }
    Ok(WidgetOutcome::Continue)
}

fn capitalize_word(ctx: &mut EditContext<'_>) -> Result<WidgetOutcome> {
    change_case_words(ctx, CaseChange::Capitalize)
}

fn up_case_word(ctx: &mut EditContext<'_>) -> Result<WidgetOutcome> {
    change_case_words(ctx, CaseChange::Upper)
}

fn down_case_word(ctx: &mut EditContext<'_>) -> Result<WidgetOutcome> {
    change_case_words(ctx, CaseChange::Lower)
}

fn quoted_insert(ctx: &mut EditContext<'_>) -> Result<WidgetOutcome> {
    let count = ctx.count();
    ctx.mode.sub_mode = Some(SubMode::QuotedInsert { count });
    Ok(WidgetOutcome::Continue)
}

/// quoted-insert で読んだキーを解釈せずに挿入する
pub(crate) fn quoted_insert_step(ctx: &mut EditContext<'_>, key: Key, count: i64) {
    match key.raw_char() {
        Some(c) => {
            for _ in 0..count.max(0) {
                ctx.buffer.insert_char(c);
            }
        }
        None => ctx.beep(),
    }
}

fn overwrite_mode(ctx: &mut EditContext<'_>) -> Result<WidgetOutcome> {
    let overwrite = ctx.buffer.is_overwrite();
    ctx.buffer.set_overwrite(!overwrite);
    Ok(WidgetOutcome::Continue)
}

/// 各行の先頭に `comment-begin` を付けて確定する
///
/// 数値引数があり既にコメントなら外す。
pub(crate) fn toggle_comment_and_accept(ctx: &mut EditContext<'_>) -> Result<WidgetOutcome> {
    let comment = ctx.variables.get_str(vars::COMMENT_BEGIN).unwrap_or("#").to_string();
    let text = ctx.buffer.text();
    let uncomment = ctx.explicit_argument().is_some() && text.starts_with(&comment);
    let lines: Vec<String> = text
        .split('\n')
        .map(|line| {
            if uncomment {
                line.strip_prefix(comment.as_str()).unwrap_or(line).to_string()
            } else {
                format!("{}{}", comment, line)
            }
        })
        .collect();
    ctx.buffer.set_text(&lines.join("\n"));
    ctx.buffer.set_cursor(0);
    ctx.call_widget(&names::ACCEPT_LINE)
}

fn insert_comment(ctx: &mut EditContext<'_>) -> Result<WidgetOutcome> {
    toggle_comment_and_accept(ctx)
}

/// 直前の空白区切りの単語を複製する
fn copy_prev_word(ctx: &mut EditContext<'_>) -> Result<WidgetOutcome> {
    let chars = ctx.buffer.chars();
    let mut end = ctx.buffer.cursor();
    while end > 0 && chars[end - 1].is_whitespace() {
        end -= 1;
    }
    let mut start = end;
    while start > 0 && !chars[start - 1].is_whitespace() {
        start -= 1;
    }
    if start == end {
        return ctx.fail();
    }
    let word = ctx.buffer.substring(start..end);
    ctx.buffer.insert_str(&word);
    Ok(WidgetOutcome::Continue)
}

/// 閉じ括弧を挿入する。`blink-matching-paren` なら対応が無いときにベル
fn insert_close_bracket(ctx: &mut EditContext<'_>) -> Result<WidgetOutcome> {
    let Some(c) = ctx.last_key().and_then(|k| char_for_key(k, false)) else {
        return ctx.fail();
    };
    let count = ctx.count();
    insert_repeated(ctx, c, count);
    if ctx.variables.get_bool(vars::BLINK_MATCHING_PAREN, false) {
        let pos = ctx.buffer.cursor().saturating_sub(1);
        if words::matching_bracket(ctx.buffer.chars(), pos).is_none() {
            ctx.beep();
        }
    }
    Ok(WidgetOutcome::Continue)
}

/// 行のヒストリ参照を展開してから空白を挿入する
fn magic_space(ctx: &mut EditContext<'_>) -> Result<WidgetOutcome> {
    if !ctx.option(ReadlineOption::DisableEventExpansion) {
        let text = ctx.buffer.text();
        match expand_events(&text, ctx.history.store()) {
            Ok(expanded) if expanded != text => ctx.buffer.set_text(&expanded),
            Ok(_) => {}
            Err(e) => {
                log::debug!("magic-space: {}", e);
                ctx.beep();
            }
        }
    }
    ctx.buffer.insert_char(' ');
    Ok(WidgetOutcome::Continue)
}

fn undo(ctx: &mut EditContext<'_>) -> Result<WidgetOutcome> {
    for _ in 0..ctx.count().unsigned_abs() {
        match ctx.undo.undo(ctx.buffer.snapshot()) {
            Some(snapshot) => ctx.buffer.restore(&snapshot),
            None => return ctx.fail(),
        }
    }
    Ok(WidgetOutcome::Continue)
}

fn redo(ctx: &mut EditContext<'_>) -> Result<WidgetOutcome> {
    for _ in 0..ctx.count().unsigned_abs() {
        match ctx.undo.redo(ctx.buffer.snapshot()) {
            Some(snapshot) => ctx.buffer.restore(&snapshot),
            None => return ctx.fail(),
        }
    }
    Ok(WidgetOutcome::Continue)
}

/// 直前も vi-undo-change ならやり直し、そうでなければ取り消し
fn vi_undo_change(ctx: &mut EditContext<'_>) -> Result<WidgetOutcome> {
    let repeated = ctx.mode.last_widget.as_ref() == Some(&names::VI_UNDO_CHANGE);
    let outcome = if repeated { redo(ctx)? } else { undo(ctx)? };
    if ctx.mode.base() == crate::mode::BaseMode::ViCommand {
        super::vi::clamp_cursor(ctx);
    }
    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::widget::builtin::testing::Harness;
    use crate::widget::{Widget, WidgetName};

    #[test]
    fn test_self_insert_and_overwrite() {
        let mut h = Harness::new("");
        h.call(names::SELF_INSERT, Some(Key::char('a')));
        h.call(names::SELF_INSERT, Some(Key::char('b')));
        assert_eq!(h.text(), "ab");

        let mut h = Harness::new("abc").cursor(0);
        h.call(names::OVERWRITE_MODE, None);
        h.call(names::SELF_INSERT, Some(Key::char('x')));
        assert_eq!(h.text(), "xbc");
        assert_eq!(h.buffer.cursor(), 1);
    }

    #[test]
    fn test_self_insert_rejects_meta_keys() {
        let mut h = Harness::new("");
        h.call(names::SELF_INSERT, Some(Key::alt('x')));
        assert_eq!(h.text(), "");
        assert_eq!(h.bells, 1);
        h.call(names::SELF_INSERT_UNMETA, Some(Key::alt('x')));
        assert_eq!(h.text(), "x");
    }

    #[test]
    fn test_zero_count_insert_is_noop() {
        let mut h = Harness::new("");
        h.mode.argument.push_digit(0);
        h.call(names::SELF_INSERT, Some(Key::char('q')));
        assert_eq!(h.text(), "");
    }

    #[test]
    fn test_delete_chars_with_direction() {
        let mut h = Harness::new("abcdef").cursor(3);
        h.call(names::BACKWARD_DELETE_CHAR, None);
        assert_eq!(h.text(), "abdef");
        h.call_n(names::DELETE_CHAR, 2);
        assert_eq!(h.text(), "abf");
        h.call_n(names::DELETE_CHAR, -2);
        assert_eq!(h.text(), "f");
        h.call(names::BACKWARD_DELETE_CHAR, None);
        assert_eq!(h.bells, 1);
    }

    #[test]
    fn test_word_deletion_does_not_touch_kill_ring() {
        let mut h = Harness::new("one two three");
        h.call(names::BACKWARD_DELETE_WORD, None);
        assert_eq!(h.text(), "one two ");
        assert!(h.kill_ring.is_empty());
        h.buffer.set_cursor(0);
        h.call(names::DELETE_WORD, None);
        assert_eq!(h.text(), " two ");
    }

    #[test]
    fn test_transpose_chars() {
        let mut h = Harness::new("abc").cursor(1);
        h.call(names::TRANSPOSE_CHARS, None);
        assert_eq!(h.text(), "bac");
        assert_eq!(h.buffer.cursor(), 2);

        let mut h = Harness::new("abc");
        h.call(names::TRANSPOSE_CHARS, None);
        assert_eq!(h.text(), "acb");

        let mut h = Harness::new("a").cursor(0);
        h.call(names::TRANSPOSE_CHARS, None);
        assert_eq!(h.bells, 1);
    }

    #[test]
    fn test_transpose_words() {
        let mut h = Harness::new("hello big world").cursor(7);
        h.call(names::TRANSPOSE_WORDS, None);
        assert_eq!(h.text(), "big hello world");
        assert_eq!(h.buffer.cursor(), 9);

        let mut h = Harness::new("alone");
        h.call(names::TRANSPOSE_WORDS, None);
        assert_eq!(h.bells, 1);
    }

    #[test]
    fn test_case_words() {
        let mut h = Harness::new("hello WORLD").cursor(0);
        h.call(names::CAPITALIZE_WORD, None);
        assert_eq!(h.text(), "Hello WORLD");
        h.call(names::DOWN_CASE_WORD, None);
        assert_eq!(h.text(), "Hello world");
        assert_eq!(h.buffer.cursor(), 11);

        h.call_n(names::UP_CASE_WORD, -2);
        assert_eq!(h.text(), "HELLO WORLD");
        assert_eq!(h.buffer.cursor(), 11);
    }

    #[test]
    fn test_undo_redo_round_trip() {
        let mut h = Harness::new("");
        for c in "abc".chars() {
            h.call(names::SELF_INSERT, Some(Key::char(c)));
        }
        h.call(names::UNDO, None);
        assert_eq!(h.text(), "ab");
        h.call(names::UNDO, None);
        assert_eq!(h.text(), "a");
        h.call(names::REDO, None);
        h.call(names::REDO, None);
        assert_eq!(h.text(), "abc");
        h.call(names::REDO, None);
        assert_eq!(h.bells, 1);
    }

    #[test]
    fn test_undo_with_count() {
        let mut h = Harness::new("");
        for c in "abc".chars() {
            h.call(names::SELF_INSERT, Some(Key::char(c)));
        }
        h.call_n(names::UNDO, 0);
        assert_eq!(h.text(), "abc");
        h.call_n(names::UNDO, 2);
        assert_eq!(h.text(), "a");
        h.call_n(names::REDO, 0);
        assert_eq!(h.text(), "a");
        h.call_n(names::REDO, 2);
        assert_eq!(h.text(), "abc");
        assert_eq!(h.bells, 0);
    }

    #[test]
    fn test_split_undo_inside_widget() {
        let mut h = Harness::new("");
        h.registry.register(
            "insert-two-steps",
            Widget::new(|ctx| {
                ctx.buffer.insert_str("foo");
                ctx.call_widget(&names::SPLIT_UNDO)?;
                ctx.buffer.insert_str(" bar");
                Ok(WidgetOutcome::Continue)
            }),
        );
        h.call(WidgetName::from("insert-two-steps"), None);
        assert_eq!(h.text(), "foo bar");
        h.call(names::UNDO, None);
        assert_eq!(h.text(), "foo");
        h.call(names::UNDO, None);
        assert_eq!(h.text(), "");
    }

    #[test]
    fn test_split_undo_alone_changes_nothing() {
        let mut h = Harness::new("ab");
        h.call(names::SPLIT_UNDO, None);
        assert!(!h.undo.can_undo());
        assert_eq!(h.bells, 0);
    }

    #[test]
    fn test_vi_undo_change_toggles() {
        let mut h = Harness::new("").vi_command();
        h.mode.set_base(crate::mode::BaseMode::ViInsert);
        h.call(names::SELF_INSERT, Some(Key::char('x')));
        h.mode.set_base(crate::mode::BaseMode::ViCommand);
        h.call(names::VI_UNDO_CHANGE, None);
        assert_eq!(h.text(), "");
        h.call(names::VI_UNDO_CHANGE, None);
        assert_eq!(h.text(), "x");
    }

    #[test]
    fn test_copy_prev_word() {
        let mut h = Harness::new("cp file.txt ");
        h.call(names::COPY_PREV_WORD, None);
        assert_eq!(h.text(), "cp file.txt file.txt");
    }

    #[test]
    fn test_insert_comment_accepts() {
        let mut h = Harness::new("echo hi");
        let outcome = h.call(names::INSERT_COMMENT, None);
        assert_eq!(outcome, WidgetOutcome::Accept);
        assert_eq!(h.text(), "#echo hi");

        let mut h = Harness::new("#echo hi");
        h.mode.argument.push_digit(1);
        h.call(names::INSERT_COMMENT, None);
        assert_eq!(h.text(), "echo hi");
    }

    #[test]
    fn test_magic_space_expands_events() {
        let mut h = Harness::new("sudo !!").with_history(&["make install"]);
        h.call(names::MAGIC_SPACE, None);
        assert_eq!(h.text(), "sudo make install ");
    }

    #[test]
    fn test_auto_suffix_removed_by_separator() {
        let mut h = Harness::new("ls dir/");
        h.line.auto_suffix = Some(6..7);
        h.call(names::SELF_INSERT, Some(Key::char(' ')));
        assert_eq!(h.text(), "ls dir ");
    }
}
