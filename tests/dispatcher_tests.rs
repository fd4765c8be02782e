// dispatcher_tests.rs - 読み取りループの統合テスト

use altre_readline::input::{Key, KeyCode, ScriptedKeySource};
use altre_readline::widget::names;
use altre_readline::{LineReader, ReadlineError, StringsCompleter, Widget, WidgetOutcome};

fn enter() -> Key {
    Key::plain(KeyCode::Enter)
}

fn reader(source: ScriptedKeySource) -> LineReader {
    LineReader::new(source)
}

/// 呼ばれるたびに `text` を挿入するウィジェット
fn inserter(text: &'static str) -> Widget {
    Widget::new(move |ctx| {
        ctx.buffer.insert_str(text);
        Ok(WidgetOutcome::Continue)
    })
}

#[test]
fn test_self_insert_and_accept() {
    let mut r = reader(ScriptedKeySource::new().text("hello").key(enter()));
    assert_eq!(r.read_line("> ").unwrap(), "hello");
    assert_eq!(r.bell_count(), 0);
}

#[test]
fn test_motion_and_editing() {
    // "world" の前に "hello " を差し込む
    let source = ScriptedKeySource::new()
        .text("world")
        .key(Key::ctrl('a'))
        .text("hello ")
        .key(Key::ctrl('e'))
        .text("!")
        .key(enter());
    let mut r = reader(source);
    assert_eq!(r.read_line("> ").unwrap(), "hello world!");
}

#[test]
fn test_backward_kill_word_then_yank() {
    let source = ScriptedKeySource::new()
        .text("hello")
        .key(Key::ctrl('w'))
        .key(Key::ctrl('y'))
        .key(enter());
    let mut r = reader(source);
    assert_eq!(r.read_line("> ").unwrap(), "hello");
    assert_eq!(r.kill_ring().current(), Some("hello"));
}

#[test]
fn test_kill_ring_survives_between_lines() {
    let mut r = reader(ScriptedKeySource::new().text("abc").key(Key::ctrl('u')).text("x").key(enter()));
    assert_eq!(r.read_line("> ").unwrap(), "x");

    r.set_source(ScriptedKeySource::new().key(Key::ctrl('y')).key(enter()));
    assert_eq!(r.read_line("> ").unwrap(), "abc");
}

#[test]
fn test_numeric_argument_accumulates_digits() {
    let source = ScriptedKeySource::new()
        .key(Key::alt('2'))
        .key(Key::alt('5'))
        .text("x")
        .key(enter());
    let mut r = reader(source);
    assert_eq!(r.read_line("> ").unwrap(), "x".repeat(25));
}

#[test]
fn test_numeric_argument_applies_to_motion() {
    let source = ScriptedKeySource::new()
        .text("abcdef")
        .key(Key::alt('3'))
        .key(Key::ctrl('b'))
        .text("-")
        .key(enter());
    let mut r = reader(source);
    assert_eq!(r.read_line("> ").unwrap(), "abc-def");
}

#[test]
fn test_neg_argument_reverses_motion() {
    // M-- C-f は1文字戻る
    let source = ScriptedKeySource::new()
        .text("abc")
        .key(Key::alt('-'))
        .key(Key::ctrl('f'))
        .text("|")
        .key(enter());
    let mut r = reader(source);
    assert_eq!(r.read_line("> ").unwrap(), "ab|c");
}

#[test]
fn test_escape_prefix_reaches_meta_binding() {
    // Esc b は M-b と同じ
    let source = ScriptedKeySource::new()
        .text("one two")
        .key(Key::plain(KeyCode::Esc))
        .text("b")
        .text("_")
        .key(enter());
    let mut r = reader(source);
    assert_eq!(r.read_line("> ").unwrap(), "one _two");
}

#[test]
fn test_ambiguous_binding_resolves_on_timeout() {
    let source = ScriptedKeySource::new().key(Key::ctrl('o')).pause().key(enter());
    let mut r = reader(source);
    r.register_widget("insert-short", inserter("short"));
    r.register_widget("insert-long", inserter("long"));
    r.bind("emacs", "C-o", "insert-short").unwrap();
    r.bind("emacs", "C-o C-p", "insert-long").unwrap();
    assert_eq!(r.read_line("> ").unwrap(), "short");
}

#[test]
fn test_ambiguous_binding_prefers_longer_match() {
    let source = ScriptedKeySource::new().key(Key::ctrl('o')).key(Key::ctrl('p')).key(enter());
    let mut r = reader(source);
    r.register_widget("insert-short", inserter("short"));
    r.register_widget("insert-long", inserter("long"));
    r.bind("emacs", "C-o", "insert-short").unwrap();
    r.bind("emacs", "C-o C-p", "insert-long").unwrap();
    assert_eq!(r.read_line("> ").unwrap(), "long");
}

#[test]
fn test_ambiguous_binding_pushes_back_unmatched_key() {
    // C-o a は C-o の短い割り当て + a の挿入
    let source = ScriptedKeySource::new().key(Key::ctrl('o')).text("a").key(enter());
    let mut r = reader(source);
    r.register_widget("insert-short", inserter("short"));
    r.register_widget("insert-long", inserter("long"));
    r.bind("emacs", "C-o", "insert-short").unwrap();
    r.bind("emacs", "C-o C-p", "insert-long").unwrap();
    assert_eq!(r.read_line("> ").unwrap(), "shorta");
}

#[test]
fn test_unbound_prefix_sequence_beeps() {
    // C-x z はどこにも割り当てがない。C-x は undefined-key、z は通常挿入
    let source = ScriptedKeySource::new().key(Key::ctrl('x')).text("z").key(enter());
    let mut r = reader(source);
    assert_eq!(r.read_line("> ").unwrap(), "z");
    assert_eq!(r.bell_count(), 1);
}

#[test]
fn test_custom_widget_bound_and_invoked() {
    let source = ScriptedKeySource::new().text("ab").key(Key::ctrl('t')).key(enter());
    let mut r = reader(source);
    r.register_widget(
        "shout",
        Widget::new(|ctx| {
            let upper = ctx.buffer.text().to_uppercase();
            ctx.buffer.set_text(&upper);
            Ok(WidgetOutcome::Continue)
        }),
    );
    r.bind("emacs", "C-t", "shout").unwrap();
    assert_eq!(r.read_line("> ").unwrap(), "AB");
}

#[test]
fn test_interrupt_and_end_of_input() {
    let mut r = reader(ScriptedKeySource::new().text("abc").key(Key::ctrl('c')));
    assert!(matches!(r.read_line("> "), Err(ReadlineError::Interrupted)));

    r.set_source(ScriptedKeySource::new().key(Key::ctrl('d')));
    assert!(matches!(r.read_line("> "), Err(ReadlineError::EndOfInput)));

    // 内容がある状態で入力が尽きたら確定
    r.set_source(ScriptedKeySource::new().text("partial"));
    assert_eq!(r.read_line("> ").unwrap(), "partial");
}

#[test]
fn test_abort_at_top_level_interrupts() {
    let mut r = reader(ScriptedKeySource::new().text("abc").key(Key::ctrl('g')));
    assert!(matches!(r.read_line("> "), Err(ReadlineError::Interrupted)));
}

#[test]
fn test_undo_restores_previous_text() {
    let source = ScriptedKeySource::new()
        .text("abc")
        .key(Key::ctrl('u'))
        .key(Key::ctrl('_'))
        .key(enter());
    let mut r = reader(source);
    assert_eq!(r.read_line("> ").unwrap(), "abc");
}

#[test]
fn test_tab_completes_unique_candidate() {
    let source = ScriptedKeySource::new().text("hist").key(Key::plain(KeyCode::Tab)).key(enter());
    let mut r = reader(source).with_completer(StringsCompleter::new(["history", "help"]));
    assert_eq!(r.read_line("> ").unwrap().trim_end(), "history");
}

#[test]
fn test_widget_names_are_registered_by_default() {
    let r = reader(ScriptedKeySource::new());
    for name in [
        names::ACCEPT_LINE,
        names::YANK,
        names::VI_DELETE,
        names::RECURSIVE_EDIT,
        names::EXECUTE_NAMED_CMD,
        names::SPLIT_UNDO,
        names::PUT_REPLACE_SELECTION,
        names::DO_LOWERCASE_VERSION,
    ] {
        assert!(r.registry().get(&name).is_some(), "missing {}", name);
    }
}

#[test]
fn test_zero_argument_leaves_line_unchanged() {
    let cases = [
        ("abc", ScriptedKeySource::new().text("abc").key(Key::ctrl('b')).key(Key::alt('0')).key(Key::ctrl('t'))),
        ("hello", ScriptedKeySource::new().text("hello").key(Key::alt('0')).key(Key::ctrl('u'))),
        ("ab", ScriptedKeySource::new().text("ab").key(Key::alt('0')).key(Key::ctrl('v')).text("z")),
        ("ab", ScriptedKeySource::new().text("ab").key(Key::alt('0')).key(Key::ctrl('_'))),
        ("ab", ScriptedKeySource::new().text("ab").key(Key::alt('0')).text("z")),
    ];
    for (expected, source) in cases {
        let mut r = reader(source.key(enter()));
        assert_eq!(r.read_line("> ").unwrap(), expected);
        assert_eq!(r.bell_count(), 0, "bell while keeping {:?}", expected);
    }
}

#[test]
fn test_zero_argument_character_search_stays() {
    // M-0 C-] c は移動しない
    let source = ScriptedKeySource::new()
        .text("abcabc")
        .key(Key::ctrl('a'))
        .key(Key::alt('0'))
        .key(Key::ctrl(']'))
        .text("c")
        .text("|")
        .key(enter());
    let mut r = reader(source);
    assert_eq!(r.read_line("> ").unwrap(), "|abcabc");
}

#[test]
fn test_zero_argument_redo_keeps_undone_state() {
    let source = ScriptedKeySource::new()
        .text("ab")
        .key(Key::ctrl('_'))
        .key(Key::alt('0'))
        .key(Key::ctrl('x'))
        .key(Key::ctrl('r'))
        .key(enter());
    let mut r = reader(source);
    assert_eq!(r.read_line("> ").unwrap(), "a");
    assert_eq!(r.bell_count(), 0);
}

#[test]
fn test_undo_and_redo_take_a_count() {
    // 履歴: "" → "a" → "ab" → C-u で "" → "c" → "cd"
    let source = ScriptedKeySource::new()
        .text("ab")
        .key(Key::ctrl('u'))
        .text("cd")
        .key(Key::alt('3'))
        .key(Key::ctrl('_'))
        .key(enter());
    let mut r = reader(source);
    assert_eq!(r.read_line("> ").unwrap(), "ab");

    let source = ScriptedKeySource::new()
        .text("ab")
        .key(Key::ctrl('u'))
        .text("cd")
        .key(Key::alt('3'))
        .key(Key::ctrl('_'))
        .key(Key::alt('2'))
        .key(Key::ctrl('x'))
        .key(Key::ctrl('r'))
        .key(enter());
    let mut r = reader(source);
    assert_eq!(r.read_line("> ").unwrap(), "c");
    assert_eq!(r.bell_count(), 0);
}

#[test]
fn test_undo_count_beyond_history_beeps() {
    let source = ScriptedKeySource::new()
        .text("ab")
        .key(Key::alt('5'))
        .key(Key::ctrl('_'))
        .key(enter());
    let mut r = reader(source);
    assert_eq!(r.read_line("> ").unwrap(), "");
    assert_eq!(r.bell_count(), 1);
}

#[test]
fn test_execute_named_cmd_passes_argument() {
    let source = ScriptedKeySource::new()
        .text("abcd")
        .key(Key::alt('2'))
        .key(Key::alt('x'))
        .text("backward-char")
        .key(enter())
        .text("|")
        .key(enter());
    let mut r = reader(source);
    assert_eq!(r.read_line("> ").unwrap(), "ab|cd");
    assert_eq!(r.bell_count(), 0);
}

#[test]
fn test_execute_named_cmd_can_accept_line() {
    let source = ScriptedKeySource::new()
        .text("done")
        .key(Key::alt('x'))
        .text("accept-line")
        .key(enter());
    let mut r = reader(source);
    assert_eq!(r.read_line("> ").unwrap(), "done");
}

#[test]
fn test_uppercase_meta_uses_lowercase_binding() {
    let source = ScriptedKeySource::new()
        .text("one two")
        .key(Key::ctrl('a'))
        .key(Key::alt('F'))
        .text("_")
        .key(Key::plain(KeyCode::Esc))
        .text("F")
        .text("_")
        .key(enter());
    let mut r = reader(source);
    assert_eq!(r.read_line("> ").unwrap(), "one_ two_");
}
