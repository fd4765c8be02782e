// keymap_tests.rs - 既定キーマップと重ね合わせの統合テスト

use altre_readline::input::keymap::names as maps;
use altre_readline::input::{default_keymaps, resolve_layered, Key, KeyCode, KeySequence, Resolution, ScriptedKeySource};
use altre_readline::widget::names;
use altre_readline::LineReader;

fn keys(s: &str) -> Vec<Key> {
    KeySequence::parse(s).unwrap().keys
}

#[test]
fn test_operator_pending_falls_through_to_command_map() {
    let keymaps = default_keymaps();
    let layers = [keymaps.get(maps::VIOPP).unwrap(), keymaps.get(maps::VICMD).unwrap()];

    assert_eq!(resolve_layered(&layers, &keys("w")), Resolution::Bound(&names::VI_FORWARD_WORD));
    assert_eq!(resolve_layered(&layers, &keys("j")), Resolution::Bound(&names::DOWN_LINE));
    assert_eq!(resolve_layered(&layers, &keys("g")), Resolution::Prefix);
    assert_eq!(resolve_layered(&layers, &keys("C-y")), Resolution::Unbound);
}

#[test]
fn test_undefined_key_in_overlay_masks_base_binding() {
    let mut keymaps = default_keymaps();
    keymaps.bind(maps::VISUAL, &keys("p"), names::UNDEFINED_KEY).unwrap();
    let layers = [keymaps.get(maps::VISUAL).unwrap(), keymaps.get(maps::VICMD).unwrap()];

    assert_eq!(resolve_layered(&layers, &keys("p")), Resolution::Bound(&names::UNDEFINED_KEY));
    // 上書きしていないキーは従来どおり
    assert_eq!(resolve_layered(&layers, &keys("P")), Resolution::Bound(&names::VI_PUT_BEFORE));
}

#[test]
fn test_main_alias_follows_editing_mode() {
    let mut keymaps = default_keymaps();
    assert_eq!(keymaps.get(maps::MAIN).unwrap().name(), maps::EMACS);
    keymaps.set_main(maps::VIINS);
    assert_eq!(keymaps.get(maps::MAIN).unwrap().name(), maps::VIINS);
    assert!(keymaps.contains(maps::MAIN));
}

#[test]
fn test_unknown_keymap_falls_back_to_safe() {
    let keymaps = default_keymaps();
    assert!(keymaps.get("nowhere").is_none());
    assert_eq!(keymaps.get_or_safe("nowhere").unwrap().name(), maps::SAFE);
}

#[test]
fn test_key_sequence_parsing() {
    assert_eq!(keys("C-x C-u"), vec![Key::ctrl('x'), Key::ctrl('u')]);
    assert_eq!(keys("M-f"), vec![Key::alt('f')]);
    assert_eq!(keys("C--"), vec![Key::ctrl('-')]);
    assert_eq!(keys("Esc RET"), vec![Key::plain(KeyCode::Esc), Key::plain(KeyCode::Enter)]);
    assert!(KeySequence::parse("").is_err());
    assert!(KeySequence::parse("C-x Nope").is_err());
}

#[test]
fn test_rebinding_changes_reader_behaviour() {
    let source = ScriptedKeySource::new()
        .text("abc")
        .key(Key::plain(KeyCode::Esc))
        .text("0Qz")
        .key(Key::plain(KeyCode::Enter));
    let mut reader = LineReader::new(source).with_editing_mode("vi");
    reader.bind(maps::VICMD, "Q", names::VI_ADD_EOL).unwrap();
    assert_eq!(reader.read_line("$ ").unwrap(), "abcz");
}

#[test]
fn test_unbinding_leaves_longer_sequences() {
    let mut keymaps = default_keymaps();
    let removed = keymaps.unbind(maps::EMACS, &keys("C-x C-u")).unwrap();
    assert_eq!(removed, Some(names::UNDO));
    let emacs = keymaps.get(maps::EMACS).unwrap();
    assert_eq!(emacs.resolve(&keys("C-x C-u")), Resolution::Unbound);
    assert_eq!(emacs.resolve(&keys("C-x")), Resolution::Prefix);
}
