// history_tests.rs - 履歴操作の統合テスト

use altre_readline::input::{Key, KeyCode, ScriptedKeySource};
use altre_readline::options::vars;
use altre_readline::{History, LineReader, MemoryHistory, ReadlineOption};

fn enter() -> Key {
    Key::plain(KeyCode::Enter)
}

fn up() -> Key {
    Key::plain(KeyCode::Up)
}

fn seeded(lines: &[&str]) -> MemoryHistory {
    let mut history = MemoryHistory::new();
    for line in lines {
        history.add(line);
    }
    history
}

fn reader_with(lines: &[&str]) -> LineReader {
    LineReader::new(ScriptedKeySource::new()).with_history(seeded(lines))
}

#[test]
fn test_accepted_lines_are_recorded() {
    let mut r = LineReader::new(ScriptedKeySource::new().text("first").key(enter()));
    r.read_line("> ").unwrap();
    r.set_source(ScriptedKeySource::new().text("first").key(enter()));
    r.read_line("> ").unwrap();
    r.set_source(ScriptedKeySource::new().text("  ").key(enter()));
    r.read_line("> ").unwrap();

    // 連続した重複と空白のみの行は記録しない
    assert_eq!(r.history().len(), 1);
    assert_eq!(r.history().entry(0), Some("first"));
}

#[test]
fn test_disable_history_variable() {
    let mut r = LineReader::new(ScriptedKeySource::new().text("secret").key(enter()));
    r.variables_mut().set(vars::DISABLE_HISTORY, true);
    r.read_line("> ").unwrap();
    assert!(r.history().is_empty());
}

#[test]
fn test_up_recalls_previous_entries() {
    let mut r = reader_with(&["ls", "pwd"]);
    r.set_source(ScriptedKeySource::new().key(up()).key(up()).key(enter()));
    assert_eq!(r.read_line("> ").unwrap(), "ls");
}

#[test]
fn test_returning_to_edit_line_restores_it() {
    let mut r = reader_with(&["ls"]);
    r.set_source(
        ScriptedKeySource::new()
            .text("draft")
            .key(up())
            .key(Key::plain(KeyCode::Down))
            .key(enter()),
    );
    assert_eq!(r.read_line("> ").unwrap(), "draft");
}

#[test]
fn test_up_past_oldest_beeps() {
    let mut r = reader_with(&["only"]);
    r.set_source(ScriptedKeySource::new().key(up()).key(up()).key(enter()));
    assert_eq!(r.read_line("> ").unwrap(), "only");
    assert_eq!(r.bell_count(), 1);
}

#[test]
fn test_incremental_search_backward() {
    let mut r = reader_with(&["git status", "cargo build", "git commit"]);
    r.set_source(
        ScriptedKeySource::new()
            .key(Key::ctrl('r'))
            .text("stat")
            .key(Key::ctrl('j'))
            .key(enter()),
    );
    assert_eq!(r.read_line("> ").unwrap(), "git status");
}

#[test]
fn test_prefix_search_backward() {
    let mut r = reader_with(&["make test", "ls", "make build"]);
    r.set_source(
        ScriptedKeySource::new()
            .text("make")
            .key(Key::alt('p'))
            .key(Key::alt('p'))
            .key(enter()),
    );
    assert_eq!(r.read_line("> ").unwrap(), "make test");
}

#[test]
fn test_insert_last_word() {
    let mut r = reader_with(&["cp a.txt b.txt"]);
    r.set_source(ScriptedKeySource::new().text("cat ").key(Key::alt('.')).key(enter()));
    assert_eq!(r.read_line("> ").unwrap(), "cat b.txt");
}

#[test]
fn test_event_expansion_on_accept() {
    let mut r = reader_with(&["echo hi"]);
    r.set_source(ScriptedKeySource::new().text("!! there").key(enter()));
    assert_eq!(r.read_line("> ").unwrap(), "echo hi there");
}

#[test]
fn test_history_verify_returns_expansion_for_editing() {
    let mut r = reader_with(&["echo hi"]);
    r.options_mut().set(ReadlineOption::HistoryVerify, true);
    // 1回目の確定で展開結果がバッファに戻り、2回目で確定する
    r.set_source(ScriptedKeySource::new().text("!!").key(enter()).text(" x").key(enter()));
    assert_eq!(r.read_line("> ").unwrap(), "echo hi x");
}

#[test]
fn test_disable_event_expansion() {
    let mut r = reader_with(&["echo hi"]);
    r.options_mut().set(ReadlineOption::DisableEventExpansion, true);
    r.set_source(ScriptedKeySource::new().text("!!").key(enter()));
    assert_eq!(r.read_line("> ").unwrap(), "!!");
}
