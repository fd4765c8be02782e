//! Buffer / UndoLog property tests
//!
//! 公開APIだけを使い、任意の編集列の後でもカーソルとマークが範囲内に収まること、
//! アンドゥで元の状態へ戻れることを確かめる。

use altre_readline::editor::{Buffer, UndoLog};
use proptest::test_runner::Config as ProptestConfig;
use proptest::{prelude::*, prop_oneof};

#[derive(Debug, Clone)]
enum Operation {
    InsertStr(String),
    InsertAt { pos: usize, text: String },
    DeleteForward(usize),
    DeleteBackward(usize),
    DeleteRange { start: usize, end: usize },
    Replace { start: usize, end: usize, text: String },
    SetCursor(usize),
    SetMark(usize),
}

fn short_text() -> impl Strategy<Value = String> {
    proptest::collection::vec(prop_oneof![any::<char>(), Just('\n'), Just(' ')], 0..6)
        .prop_map(|chars| chars.into_iter().collect())
}

fn operation_strategy() -> impl Strategy<Value = Operation> {
    prop_oneof![
        short_text().prop_map(Operation::InsertStr),
        (0usize..64, short_text()).prop_map(|(pos, text)| Operation::InsertAt { pos, text }),
        (0usize..8).prop_map(Operation::DeleteForward),
        (0usize..8).prop_map(Operation::DeleteBackward),
        (0usize..64, 0usize..64).prop_map(|(start, end)| Operation::DeleteRange { start, end }),
        (0usize..64, 0usize..64, short_text()).prop_map(|(start, end, text)| Operation::Replace { start, end, text }),
        (0usize..64).prop_map(Operation::SetCursor),
        (0usize..64).prop_map(Operation::SetMark),
    ]
}

fn apply(buffer: &mut Buffer, op: &Operation) {
    match op {
        Operation::InsertStr(text) => buffer.insert_str(text),
        Operation::InsertAt { pos, text } => {
            let chars: Vec<char> = text.chars().collect();
            buffer.insert_at(*pos, &chars);
        }
        Operation::DeleteForward(n) => {
            buffer.delete_forward(*n);
        }
        Operation::DeleteBackward(n) => {
            buffer.delete_backward(*n);
        }
        Operation::DeleteRange { start, end } => {
            let (start, end) = (*start.min(end), *start.max(end));
            buffer.delete_range(start..end);
        }
        Operation::Replace { start, end, text } => {
            let (start, end) = (*start.min(end), *start.max(end));
            buffer.replace_range(start..end, text);
        }
        Operation::SetCursor(pos) => buffer.set_cursor(*pos),
        Operation::SetMark(pos) => buffer.set_mark(Some(*pos)),
    }
}

proptest! {
    #![proptest_config(ProptestConfig { cases: 128, .. ProptestConfig::default() })]

    #[test]
    fn positions_stay_within_buffer(
        initial in short_text(),
        ops in proptest::collection::vec(operation_strategy(), 0..24)
    ) {
        let mut buffer = Buffer::from_text(&initial);
        for op in &ops {
            apply(&mut buffer, op);
            prop_assert!(buffer.cursor() <= buffer.len());
            if let Some(mark) = buffer.mark() {
                prop_assert!(mark <= buffer.len());
            }
            prop_assert_eq!(buffer.text().chars().count(), buffer.len());
        }
    }

    #[test]
    fn undo_everything_restores_initial_state(
        initial in short_text(),
        ops in proptest::collection::vec(operation_strategy(), 1..16)
    ) {
        let mut buffer = Buffer::from_text(&initial);
        let start = buffer.snapshot();
        let mut undo = UndoLog::with_limit(64);

        for op in &ops {
            let before = buffer.snapshot();
            apply(&mut buffer, op);
            if before.text != buffer.text() {
                undo.record(before);
            }
        }

        let end = buffer.snapshot();
        while let Some(previous) = undo.undo(buffer.snapshot()) {
            buffer.restore(&previous);
        }
        prop_assert_eq!(buffer.text(), start.text.clone());

        // すべてやり直すと最後の状態に戻る
        while let Some(next) = undo.redo(buffer.snapshot()) {
            buffer.restore(&next);
        }
        prop_assert_eq!(buffer.text(), end.text);
    }

    #[test]
    fn line_bounds_surround_position(text in short_text(), pos in 0usize..16) {
        let buffer = Buffer::from_text(&text);
        let pos = pos.min(buffer.len());
        let start = buffer.line_start(pos);
        let end = buffer.line_end(pos);
        prop_assert!(start <= pos && pos <= end);
        prop_assert!(end <= buffer.len());
        let inner = buffer.substring(start..end);
        prop_assert!(!inner.contains('\n'));
    }
}
