//! 数値引数

use super::{add, add_motion};
use crate::error::Result;
use crate::reader::EditContext;
use crate::widget::{names, MotionKind, WidgetOutcome, WidgetRegistry};

pub(crate) fn register(registry: &mut WidgetRegistry) {
    add(registry, names::DIGIT_ARGUMENT, digit_argument);
    add(registry, names::NEG_ARGUMENT, neg_argument);
    add(registry, names::UNIVERSAL_ARGUMENT, universal_argument);
    add_motion(
        registry,
        names::VI_DIGIT_OR_BEGINNING_OF_LINE,
        MotionKind::Exclusive,
        vi_digit_or_beginning_of_line,
    );
}

/// 起動キーの数字を追加。数字が未入力の `-` は符号反転
fn digit_argument(ctx: &mut EditContext<'_>) -> Result<WidgetOutcome> {
    let key = ctx.last_key();
    match (key.and_then(|k| k.digit()), key.and_then(|k| k.to_char())) {
        (Some(digit), _) => ctx.mode.argument.push_digit(digit),
        (None, Some('-')) if !ctx.mode.argument.has_digits() => ctx.mode.argument.negate(),
        _ => return ctx.fail(),
    }
    ctx.retain_argument();
    Ok(WidgetOutcome::Continue)
}

fn neg_argument(ctx: &mut EditContext<'_>) -> Result<WidgetOutcome> {
    ctx.mode.argument.negate();
    ctx.retain_argument();
    Ok(WidgetOutcome::Continue)
}

fn universal_argument(ctx: &mut EditContext<'_>) -> Result<WidgetOutcome> {
    ctx.mode.argument.universal();
    ctx.retain_argument();
    Ok(WidgetOutcome::Continue)
}

/// 引数入力中なら `0` を追加、そうでなければ行頭へ
fn vi_digit_or_beginning_of_line(ctx: &mut EditContext<'_>) -> Result<WidgetOutcome> {
    if ctx.mode.argument.has_digits() {
        ctx.mode.argument.push_digit(0);
        ctx.retain_argument();
    } else {
        let start = ctx.buffer.line_start(ctx.buffer.cursor());
        ctx.buffer.set_cursor(start);
    }
    Ok(WidgetOutcome::Continue)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::key::Key;
    use crate::widget::builtin::testing::Harness;

    #[test]
    fn test_digits_accumulate() {
        let mut h = Harness::new("");
        h.call(names::DIGIT_ARGUMENT, Some(Key::alt('2')));
        h.call(names::DIGIT_ARGUMENT, Some(Key::alt('5')));
        assert_eq!(h.mode.argument.count(), 25);
        h.call(names::SELF_INSERT, Some(Key::char('x')));
        assert_eq!(h.text(), "x".repeat(25));
        assert!(!h.mode.argument.is_active());
    }

    #[test]
    fn test_bare_neg_argument_is_minus_one() {
        let mut h = Harness::new("");
        h.call(names::NEG_ARGUMENT, Some(Key::alt('-')));
        assert_eq!(h.mode.argument.count(), -1);

        let mut h = Harness::new("");
        h.call(names::DIGIT_ARGUMENT, Some(Key::alt('-')));
        h.call(names::DIGIT_ARGUMENT, Some(Key::alt('3')));
        assert_eq!(h.mode.argument.count(), -3);
    }

    #[test]
    fn test_universal_argument_multiplies() {
        let mut h = Harness::new("");
        h.call(names::UNIVERSAL_ARGUMENT, None);
        assert_eq!(h.mode.argument.count(), 4);
        h.call(names::UNIVERSAL_ARGUMENT, None);
        assert_eq!(h.mode.argument.count(), 16);
    }

    #[test]
    fn test_vi_zero_is_digit_only_while_counting() {
        let mut h = Harness::new("abc def").cursor(5).vi_command();
        h.call(names::VI_DIGIT_OR_BEGINNING_OF_LINE, Some(Key::char('0')));
        assert_eq!(h.buffer.cursor(), 0);

        h.call(names::DIGIT_ARGUMENT, Some(Key::char('1')));
        h.call(names::VI_DIGIT_OR_BEGINNING_OF_LINE, Some(Key::char('0')));
        assert_eq!(h.mode.argument.count(), 10);
    }
}
