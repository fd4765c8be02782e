//! 補完ウィジェット
//!
//! 候補は `Completer` が返した順序のまま使う。単一候補なら挿入、複数なら共通接頭辞を
//! 挿入し、それ以上進まなければ一覧表示かメニュー選択に移る。

use super::add;
use crate::completion::{common_prefix, Candidate, CompletionState};
use crate::error::Result;
use crate::history::expand_events;
use crate::mode::Overlay;
use crate::options::{vars, ReadlineOption};
use crate::parser::{ParseContext, ParsedLine};
use crate::reader::EditContext;
use crate::widget::{names, WidgetOutcome, WidgetRegistry};

pub(crate) fn register(registry: &mut WidgetRegistry) {
    add(registry, names::COMPLETE_WORD, |ctx| complete(ctx, false));
    add(registry, names::COMPLETE_PREFIX, |ctx| complete(ctx, true));
    add(registry, names::EXPAND_OR_COMPLETE, |ctx| expand_or_complete(ctx, false));
    add(registry, names::EXPAND_OR_COMPLETE_PREFIX, |ctx| expand_or_complete(ctx, true));
    add(registry, names::MENU_COMPLETE, |ctx| menu_complete(ctx, 1));
    add(registry, names::REVERSE_MENU_COMPLETE, |ctx| menu_complete(ctx, -1));
    add(registry, names::MENU_SELECT, menu_select);
    add(registry, names::MENU_EXPAND_OR_COMPLETE, menu_expand_or_complete);
    add(registry, names::LIST_CHOICES, list_choices);
    add(registry, names::DELETE_CHAR_OR_LIST, delete_char_or_list);
}

/// 補完対象の単語
struct Target {
    line: ParsedLine,
    /// 置き換え範囲の先頭
    start: usize,
}

/// カーソル位置の単語を解析する
///
/// `prefix_only` か COMPLETE_IN_WORD なら カーソルより前だけを対象にし、
/// そうでなければカーソルを単語末尾へ移してから解析し直す。
fn target(ctx: &mut EditContext<'_>, prefix_only: bool) -> Option<Target> {
    let line = ctx.parse(ParseContext::Complete).ok()?;
    let (start, end) = line.word_span();
    if prefix_only || ctx.option(ReadlineOption::CompleteInWord) || end <= ctx.buffer.cursor() {
        return Some(Target { line, start });
    }
    ctx.buffer.set_cursor(end);
    let line = ctx.parse(ParseContext::Complete).ok()?;
    Some(Target { line, start })
}

/// 補完が無効ならキーをそのまま挿入して true
fn completion_disabled(ctx: &mut EditContext<'_>) -> bool {
    if !ctx.variables.get_bool(vars::DISABLE_COMPLETION, false) {
        return false;
    }
    match ctx.last_key().and_then(|k| k.raw_char()) {
        Some(c) => ctx.buffer.insert_char(c),
        None => ctx.beep(),
    }
    true
}

fn candidates_for(ctx: &EditContext<'_>, target: &Target) -> Vec<Candidate> {
    let candidates = ctx.completer().complete(&target.line);
    log::trace!("completion of {:?}: {} candidates", target.line.word_prefix(), candidates.len());
    candidates
}

/// 単語の先頭からカーソルまでを置き換える
fn replace_word(ctx: &mut EditContext<'_>, start: usize, value: &str) {
    let cursor = ctx.buffer.cursor().max(start);
    ctx.buffer.replace_range(start..cursor, value);
}

/// 確定した候補を挿入し、区切りの接尾辞を付ける
fn accept_candidate(ctx: &mut EditContext<'_>, start: usize, candidate: &Candidate) {
    replace_word(ctx, start, &candidate.value);
    let end = ctx.buffer.cursor();
    if candidate.complete {
        if ctx.buffer.current_char() != Some(' ') {
            ctx.buffer.insert_char(' ');
            ctx.line.auto_suffix = Some(end..end + 1);
        } else {
            ctx.buffer.set_cursor(end + 1);
        }
    } else if candidate.value.ends_with('/') && ctx.option(ReadlineOption::AutoRemoveSlash) {
        ctx.line.auto_suffix = Some(end - 1..end);
    }
    ctx.keep_menu();
}

fn complete(ctx: &mut EditContext<'_>, prefix_only: bool) -> Result<WidgetOutcome> {
    if completion_disabled(ctx) {
        return Ok(WidgetOutcome::Continue);
    }
    if ctx.line.completion.is_some() {
        // メニュー巡回中の再入力は次の候補へ
        return menu_complete(ctx, 1);
    }
    let repeated = ctx.line.listing.is_some();
    let Some(target) = target(ctx, prefix_only) else {
        return ctx.fail();
    };
    let candidates = candidates_for(ctx, &target);

    match candidates.len() {
        0 => ctx.fail(),
        1 => {
            accept_candidate(ctx, target.start, &candidates[0]);
            Ok(WidgetOutcome::Continue)
        }
        _ => complete_ambiguous(ctx, target, candidates, repeated),
    }
}

/// 複数候補の場合
fn complete_ambiguous(
    ctx: &mut EditContext<'_>,
    target: Target,
    candidates: Vec<Candidate>,
    repeated: bool,
) -> Result<WidgetOutcome> {
    let word = target.line.word_prefix();
    let prefix = common_prefix(&candidates, ctx.option(ReadlineOption::CaseInsensitive));

    if prefix.chars().count() > word.chars().count() {
        replace_word(ctx, target.start, &prefix);
        if ctx.option(ReadlineOption::AutoList) && !ctx.option(ReadlineOption::ListAmbiguous) {
            show_listing(ctx, candidates);
        }
        return Ok(WidgetOutcome::Continue);
    }

    if ctx.option(ReadlineOption::RecognizeExact) {
        if let Some(exact) = candidates.iter().find(|c| c.value == word) {
            let exact = exact.clone();
            accept_candidate(ctx, target.start, &exact);
            return Ok(WidgetOutcome::Continue);
        }
    }

    if ctx.option(ReadlineOption::MenuComplete) || (repeated && ctx.option(ReadlineOption::AutoMenu)) {
        start_menu(ctx, target, candidates, 1, repeated);
        return Ok(WidgetOutcome::Continue);
    }

    if ctx.option(ReadlineOption::AutoList) {
        show_listing(ctx, candidates);
    } else {
        ctx.beep();
    }
    Ok(WidgetOutcome::Continue)
}

fn show_listing(ctx: &mut EditContext<'_>, candidates: Vec<Candidate>) {
    ctx.line.listing = Some(candidates);
    ctx.keep_menu();
}

/// メニュー補完を始めて最初の候補を挿入する。`select` ならメニュー選択オーバーレイを積む
fn start_menu(ctx: &mut EditContext<'_>, target: Target, candidates: Vec<Candidate>, step: i64, select: bool) {
    let cursor = ctx.buffer.cursor();
    let state = CompletionState {
        candidates: candidates.clone(),
        selected: None,
        start: target.start,
        inserted_len: cursor.saturating_sub(target.start),
        original: ctx.buffer.substring(target.start..cursor),
    };
    ctx.line.completion = Some(state);
    ctx.line.listing = Some(candidates);
    if select {
        ctx.mode.push_overlay(Overlay::MenuSelect);
    }
    advance_menu(ctx, step);
}

/// メニューの選択を進め、挿入中の候補を置き換える
fn advance_menu(ctx: &mut EditContext<'_>, step: i64) {
    let Some(mut state) = ctx.line.completion.take() else {
        return;
    };
    if let Some(value) = state.advance(step).map(|c| c.value.clone()) {
        let end = state.start + state.inserted_len;
        ctx.buffer.replace_range(state.start..end, &value);
        state.inserted_len = value.chars().count();
    }
    ctx.line.completion = Some(state);
    ctx.keep_menu();
}

fn menu_complete(ctx: &mut EditContext<'_>, step: i64) -> Result<WidgetOutcome> {
    if ctx.line.completion.is_some() {
        advance_menu(ctx, step);
        return Ok(WidgetOutcome::Continue);
    }
    if completion_disabled(ctx) {
        return Ok(WidgetOutcome::Continue);
    }
    let Some(target) = target(ctx, false) else {
        return ctx.fail();
    };
    let candidates = candidates_for(ctx, &target);
    match candidates.len() {
        0 => ctx.fail(),
        1 => {
            accept_candidate(ctx, target.start, &candidates[0]);
            Ok(WidgetOutcome::Continue)
        }
        _ => {
            start_menu(ctx, target, candidates, step, false);
            Ok(WidgetOutcome::Continue)
        }
    }
}

/// メニュー選択に入る
fn menu_select(ctx: &mut EditContext<'_>) -> Result<WidgetOutcome> {
    if ctx.line.completion.is_some() {
        ctx.mode.push_overlay(Overlay::MenuSelect);
        ctx.keep_menu();
        return Ok(WidgetOutcome::Continue);
    }
    let Some(target) = target(ctx, false) else {
        return ctx.fail();
    };
    let candidates = candidates_for(ctx, &target);
    match candidates.len() {
        0 => ctx.fail(),
        1 => {
            accept_candidate(ctx, target.start, &candidates[0]);
            Ok(WidgetOutcome::Continue)
        }
        _ => {
            start_menu(ctx, target, candidates, 1, true);
            Ok(WidgetOutcome::Continue)
        }
    }
}

/// ヒストリ参照を含む行なら展開する。展開したら true
fn try_expand(ctx: &mut EditContext<'_>) -> bool {
    if ctx.option(ReadlineOption::DisableEventExpansion) {
        return false;
    }
    let text = ctx.buffer.text();
    if !text.contains('!') && !text.starts_with('^') {
        return false;
    }
    match expand_events(&text, ctx.history.store()) {
        Ok(expanded) if expanded != text => {
            ctx.buffer.set_text(&expanded);
            true
        }
        _ => false,
    }
}

fn expand_or_complete(ctx: &mut EditContext<'_>, prefix_only: bool) -> Result<WidgetOutcome> {
    if ctx.line.completion.is_none() && try_expand(ctx) {
        return Ok(WidgetOutcome::Continue);
    }
    complete(ctx, prefix_only)
}

fn menu_expand_or_complete(ctx: &mut EditContext<'_>) -> Result<WidgetOutcome> {
    if ctx.line.completion.is_none() && try_expand(ctx) {
        return Ok(WidgetOutcome::Continue);
    }
    menu_complete(ctx, 1)
}

fn list_choices(ctx: &mut EditContext<'_>) -> Result<WidgetOutcome> {
    let line = match ctx.parse(ParseContext::Complete) {
        Ok(line) => line,
        Err(_) => return ctx.fail(),
    };
    let candidates = ctx.completer().complete(&line);
    if candidates.is_empty() {
        return ctx.fail();
    }
    show_listing(ctx, candidates);
    Ok(WidgetOutcome::Continue)
}

/// 行末以外では delete-char、行末では候補一覧
fn delete_char_or_list(ctx: &mut EditContext<'_>) -> Result<WidgetOutcome> {
    if ctx.buffer.cursor() < ctx.buffer.len() {
        return ctx.call_widget(&names::DELETE_CHAR);
    }
    list_choices(ctx)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::completion::StringsCompleter;
    use crate::input::key::Key;
    use crate::widget::builtin::testing::Harness;

    fn harness(text: &str) -> Harness {
        Harness::new(text).with_completer(StringsCompleter::new(["checkout", "cherry-pick", "commit", "status"]))
    }

    #[test]
    fn test_single_candidate_gets_suffix() {
        let mut h = harness("git sta");
        h.call(names::COMPLETE_WORD, None);
        assert_eq!(h.text(), "git status ");
        assert_eq!(h.line.auto_suffix, Some(10..11));
    }

    #[test]
    fn test_suffix_removed_by_separator() {
        let mut h = harness("git sta");
        h.call(names::COMPLETE_WORD, None);
        h.call(names::SELF_INSERT, Some(Key::char(';')));
        assert_eq!(h.text(), "git status;");
    }

    #[test]
    fn test_suffix_kept_by_ordinary_char() {
        let mut h = harness("git sta");
        h.call(names::COMPLETE_WORD, None);
        h.call(names::SELF_INSERT, Some(Key::char('x')));
        assert_eq!(h.text(), "git status x");
    }

    #[test]
    fn test_ambiguous_inserts_common_prefix_then_lists() {
        let mut h = harness("git c");
        h.call(names::COMPLETE_WORD, None);
        assert_eq!(h.text(), "git c");
        assert_eq!(h.line.listing.as_ref().map(Vec::len), Some(3));

        let mut h = harness("git ch");
        h.call(names::COMPLETE_WORD, None);
        assert_eq!(h.text(), "git che");
    }

    #[test]
    fn test_repeated_tab_enters_menu_selection() {
        let mut h = harness("git c");
        h.call(names::EXPAND_OR_COMPLETE, None);
        assert!(h.line.listing.is_some());
        h.call(names::EXPAND_OR_COMPLETE, None);
        assert_eq!(h.text(), "git checkout");
        assert!(h.mode.has_overlay(Overlay::MenuSelect));
        h.call(names::MENU_COMPLETE, None);
        assert_eq!(h.text(), "git cherry-pick");
        h.call(names::REVERSE_MENU_COMPLETE, None);
        assert_eq!(h.text(), "git checkout");

        h.call(names::FORWARD_CHAR, None);
        assert!(!h.mode.has_overlay(Overlay::MenuSelect));
        assert!(h.line.completion.is_none());
    }

    #[test]
    fn test_no_candidates_beeps() {
        let mut h = harness("git zz");
        h.call(names::COMPLETE_WORD, None);
        assert_eq!(h.text(), "git zz");
        assert_eq!(h.bells, 1);
    }

    #[test]
    fn test_menu_complete_cycles_without_overlay() {
        let mut h = harness("git c");
        h.call(names::MENU_COMPLETE, None);
        assert_eq!(h.text(), "git checkout");
        assert!(!h.mode.has_overlay(Overlay::MenuSelect));
        h.call(names::MENU_COMPLETE, None);
        h.call(names::MENU_COMPLETE, None);
        assert_eq!(h.text(), "git commit");
        h.call(names::MENU_COMPLETE, None);
        assert_eq!(h.text(), "git checkout");
    }

    #[test]
    fn test_complete_moves_to_word_end() {
        let mut h = harness("git stxx").cursor(6);
        h.call(names::COMPLETE_WORD, None);
        assert_eq!(h.text(), "git stxx");
        assert_eq!(h.bells, 1);

        let mut h = harness("git stxx").cursor(6);
        h.call(names::COMPLETE_PREFIX, None);
        assert_eq!(h.text(), "git status xx");
    }

    #[test]
    fn test_expand_or_complete_expands_first() {
        let mut h = harness("!!").with_history(&["git status"]);
        h.buffer.set_text("!!");
        h.call(names::EXPAND_OR_COMPLETE, None);
        assert_eq!(h.text(), "git status");
    }

    #[test]
    fn test_delete_char_or_list() {
        let mut h = harness("git c").cursor(4);
        h.call(names::DELETE_CHAR_OR_LIST, None);
        assert_eq!(h.text(), "git ");

        let mut h = harness("git c");
        h.call(names::DELETE_CHAR_OR_LIST, None);
        assert_eq!(h.line.listing.as_ref().map(Vec::len), Some(3));
        assert_eq!(h.text(), "git c");
    }

    #[test]
    fn test_disable_completion_inserts_key() {
        let mut h = harness("git c");
        h.variables.set(vars::DISABLE_COMPLETION, true);
        h.call(names::COMPLETE_WORD, Some(Key::plain(crate::input::key::KeyCode::Tab)));
        assert_eq!(h.text(), "git c\t");
    }
}
