//! 組み込みウィジェット
//!
//! すべてアプリケーション定義のウィジェットと同じ `WidgetRegistry::register` で登録する。

pub(crate) mod argument;
pub(crate) mod complete;
pub(crate) mod control;
pub(crate) mod edit;
pub(crate) mod history;
pub(crate) mod kill;
pub(crate) mod motion;
pub(crate) mod vi;

use super::{MotionKind, Widget, WidgetName, WidgetOutcome, WidgetRegistry};
use crate::error::Result;
use crate::reader::EditContext;

type Handler = fn(&mut EditContext<'_>) -> Result<WidgetOutcome>;

/// 組み込みウィジェットをすべて登録する
pub fn register_all(registry: &mut WidgetRegistry) {
    argument::register(registry);
    motion::register(registry);
    edit::register(registry);
    kill::register(registry);
    history::register(registry);
    complete::register(registry);
    control::register(registry);
    vi::register(registry);
}

/// 通常のウィジェット
fn add(registry: &mut WidgetRegistry, name: WidgetName, handler: Handler) {
    registry.register(name, Widget::new(handler));
}

/// 移動ウィジェット
fn add_motion(registry: &mut WidgetRegistry, name: WidgetName, kind: MotionKind, handler: Handler) {
    registry.register(name, Widget::new(handler).motion(kind));
}

/// アンドゥ履歴を積まないウィジェット
fn add_without_undo(registry: &mut WidgetRegistry, name: WidgetName, handler: Handler) {
    registry.register(name, Widget::new(handler).without_undo());
}

/// `count` の符号で向きを決め、絶対値回だけ `step` を繰り返す。動けた回数を返す
fn repeat(count: i64, mut step: impl FnMut(bool) -> bool) -> usize {
    let forward = count >= 0;
    let mut moved = 0;
    for _ in 0..count.unsigned_abs() {
        if !step(forward) {
            break;
        }
        moved += 1;
    }
    moved
}
