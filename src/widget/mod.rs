//! ウィジェット
//!
//! ウィジェットは名前付きの編集操作。組み込みもアプリケーション定義も
//! 同じ `WidgetRegistry::register` で登録され、同じ名前空間を共有する。

pub mod builtin;
pub mod names;

use crate::error::Result;
use crate::reader::EditContext;
use std::borrow::Cow;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// ウィジェットの識別子
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct WidgetName(Cow<'static, str>);

impl WidgetName {
    pub const fn from_static(name: &'static str) -> Self {
        Self(Cow::Borrowed(name))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for WidgetName {
    fn from(name: &str) -> Self {
        Self(Cow::Owned(name.to_string()))
    }
}

impl From<String> for WidgetName {
    fn from(name: String) -> Self {
        Self(Cow::Owned(name))
    }
}

impl From<&WidgetName> for WidgetName {
    fn from(name: &WidgetName) -> Self {
        name.clone()
    }
}

impl AsRef<str> for WidgetName {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for WidgetName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// ウィジェット実行後にディスパッチャへ返す指示
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WidgetOutcome {
    /// 読み取りを続ける
    Continue,
    /// 行を確定して返す
    Accept,
    /// 行を破棄して中断する
    Abort,
}

/// viオペレータと組み合わせたときの範囲の扱い
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MotionKind {
    /// 移動先の文字を含まない
    Exclusive,
    /// 移動先の文字を含む
    Inclusive,
    /// 行全体
    Linewise,
}

/// ウィジェットの処理本体
pub type WidgetFn = dyn Fn(&mut EditContext<'_>) -> Result<WidgetOutcome> + Send + Sync;

/// 登録されたウィジェット
#[derive(Clone)]
pub struct Widget {
    handler: Arc<WidgetFn>,
    records_undo: bool,
    motion: Option<MotionKind>,
}

impl Widget {
    pub fn new<F>(handler: F) -> Self
    where
        F: Fn(&mut EditContext<'_>) -> Result<WidgetOutcome> + Send + Sync + 'static,
    {
        Self {
            handler: Arc::new(handler),
            records_undo: true,
            motion: None,
        }
    }

    /// 実行前のスナップショットをアンドゥ履歴に積まない
    pub fn without_undo(mut self) -> Self {
        self.records_undo = false;
        self
    }

    /// viオペレータの移動先として使えるウィジェットにする
    pub fn motion(mut self, kind: MotionKind) -> Self {
        self.motion = Some(kind);
        self
    }

    pub fn records_undo(&self) -> bool {
        self.records_undo
    }

    pub fn motion_kind(&self) -> Option<MotionKind> {
        self.motion
    }

    pub fn call(&self, ctx: &mut EditContext<'_>) -> Result<WidgetOutcome> {
        (self.handler)(ctx)
    }
}

impl fmt::Debug for Widget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Widget")
            .field("records_undo", &self.records_undo)
            .field("motion", &self.motion)
            .finish_non_exhaustive()
    }
}

/// 名前からウィジェットを引く表
#[derive(Debug, Clone, Default)]
pub struct WidgetRegistry {
    widgets: HashMap<WidgetName, Widget>,
}

impl WidgetRegistry {
    /// 空のレジストリ
    pub fn new() -> Self {
        Self::default()
    }

    /// 組み込みウィジェットを登録済みのレジストリ
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        builtin::register_all(&mut registry);
        registry
    }

    /// 登録（同名があれば置き換えて古い方を返す）
    pub fn register(&mut self, name: impl Into<WidgetName>, widget: Widget) -> Option<Widget> {
        self.widgets.insert(name.into(), widget)
    }

    /// 既存ウィジェットに別名を付ける
    pub fn alias(&mut self, alias: impl Into<WidgetName>, target: &WidgetName) -> bool {
        match self.widgets.get(target).cloned() {
            Some(widget) => {
                self.widgets.insert(alias.into(), widget);
                true
            }
            None => false,
        }
    }

    pub fn unregister(&mut self, name: &WidgetName) -> Option<Widget> {
        self.widgets.remove(name)
    }

    pub fn get(&self, name: &WidgetName) -> Option<&Widget> {
        self.widgets.get(name)
    }

    pub fn contains(&self, name: &WidgetName) -> bool {
        self.widgets.contains_key(name)
    }

    /// 登録名一覧（ソート済み）
    pub fn names(&self) -> Vec<&WidgetName> {
        let mut names: Vec<&WidgetName> = self.widgets.keys().collect();
        names.sort();
        names
    }

    pub fn len(&self) -> usize {
        self.widgets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.widgets.is_empty()
    }
}
