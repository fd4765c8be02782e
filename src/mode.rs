//! モード管理
//!
//! 基底モード（emacs / vi挿入 / viコマンド）とその上に積むオーバーレイ、
//! 数値引数、直前のウィジェット名、1キーずつ処理するサブモードを保持する。
//! `read_line` をまたいで保持される。

use crate::input::keymap::names;
use crate::widget::WidgetName;

/// 基底モード
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BaseMode {
    Emacs,
    ViInsert,
    ViCommand,
}

impl BaseMode {
    pub fn keymap_name(self) -> &'static str {
        match self {
            BaseMode::Emacs => names::EMACS,
            BaseMode::ViInsert => names::VIINS,
            BaseMode::ViCommand => names::VICMD,
        }
    }

    /// キーマップ名から（`main` は呼び出し側で解決済みであること）
    pub fn from_keymap_name(name: &str) -> Option<Self> {
        match name {
            names::EMACS => Some(BaseMode::Emacs),
            names::VIINS => Some(BaseMode::ViInsert),
            names::VICMD => Some(BaseMode::ViCommand),
            _ => None,
        }
    }

    /// `editing-mode` 変数の値から
    pub fn from_editing_mode(value: &str) -> Option<Self> {
        match value.to_ascii_lowercase().as_str() {
            "emacs" => Some(BaseMode::Emacs),
            "vi" | "viins" => Some(BaseMode::ViInsert),
            "vicmd" => Some(BaseMode::ViCommand),
            _ => None,
        }
    }

    pub fn is_vi(self) -> bool {
        !matches!(self, BaseMode::Emacs)
    }
}

/// 基底キーマップより優先されるモード
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Overlay {
    Visual,
    VisualLine,
    MenuSelect,
    /// viオペレータの移動先待ち
    OperatorPending,
}

impl Overlay {
    pub fn keymap_name(self) -> &'static str {
        match self {
            Overlay::Visual | Overlay::VisualLine => names::VISUAL,
            Overlay::MenuSelect => names::MENU,
            Overlay::OperatorPending => names::VIOPP,
        }
    }

    pub fn is_visual(self) -> bool {
        matches!(self, Overlay::Visual | Overlay::VisualLine)
    }
}

/// 数値引数の上限
pub const MAX_ARGUMENT: i64 = 1_000_000;

/// 数値引数の蓄積
///
/// 値は `MAX_ARGUMENT` で頭打ちになる。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NumericArgument {
    value: Option<i64>,
    negative: bool,
    multiplier: i64,
}

impl Default for NumericArgument {
    fn default() -> Self {
        Self {
            value: None,
            negative: false,
            multiplier: 1,
        }
    }
}

impl NumericArgument {
    /// 10進で1桁追加
    pub fn push_digit(&mut self, digit: u32) {
        let current = self.value.unwrap_or(0);
        self.value = Some(current.saturating_mul(10).saturating_add(digit as i64).min(MAX_ARGUMENT));
    }

    /// 符号反転
    pub fn negate(&mut self) {
        self.negative = !self.negative;
    }

    /// universal-argument（4倍）
    pub fn universal(&mut self) {
        match self.value.as_mut() {
            Some(v) => *v = v.saturating_mul(4).min(MAX_ARGUMENT),
            None => self.multiplier = self.multiplier.saturating_mul(4).min(MAX_ARGUMENT),
        }
    }

    /// 入力途中かどうか
    pub fn is_active(&self) -> bool {
        self.value.is_some() || self.negative || self.multiplier != 1
    }

    /// 数字がまだ入力されていないか
    pub fn has_digits(&self) -> bool {
        self.value.is_some()
    }

    /// 次のウィジェットへ渡す回数（既定は1）
    pub fn count(&self) -> i64 {
        let magnitude = self.value.unwrap_or(self.multiplier);
        if self.negative {
            -magnitude
        } else {
            magnitude
        }
    }

    /// 明示的に与えられた値（未入力なら None）
    pub fn explicit(&self) -> Option<i64> {
        self.is_active().then(|| self.count())
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

/// viの文字検索の種類
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FindKind {
    /// f
    NextChar,
    /// t
    NextCharSkip,
    /// F
    PrevChar,
    /// T
    PrevCharSkip,
}

impl FindKind {
    pub fn reversed(self) -> Self {
        match self {
            FindKind::NextChar => FindKind::PrevChar,
            FindKind::NextCharSkip => FindKind::PrevCharSkip,
            FindKind::PrevChar => FindKind::NextChar,
            FindKind::PrevCharSkip => FindKind::NextCharSkip,
        }
    }

    pub fn is_forward(self) -> bool {
        matches!(self, FindKind::NextChar | FindKind::NextCharSkip)
    }
}

/// viオペレータ
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViOperator {
    Delete,
    Change,
    Yank,
    SwapCase,
}

/// 移動先待ちのオペレータ
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PendingOperator {
    pub operator: ViOperator,
    /// オペレータ入力時の数値引数
    pub count: i64,
}

/// 次の1キーを直接受け取るサブモード
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubMode {
    /// インクリメンタル検索（状態は履歴セッション側）
    IncrementalSearch,
    /// emacsの character-search
    CharacterSearch { backward: bool, count: i64 },
    /// vi の f/t/F/T
    ViFindChar { kind: FindKind, count: i64 },
    /// 次のキーをそのまま挿入
    QuotedInsert { count: i64 },
    /// vi の r
    ViReplaceChars { count: i64 },
    /// execute-named-cmd のウィジェット名入力
    ExecuteNamed,
}

/// セッションのモード状態
#[derive(Debug, Clone)]
pub struct ModeController {
    base: BaseMode,
    overlays: Vec<Overlay>,
    saved_overlays: Vec<Vec<Overlay>>,
    pub argument: NumericArgument,
    pub last_widget: Option<WidgetName>,
    pub sub_mode: Option<SubMode>,
    pub pending_operator: Option<PendingOperator>,
    pub last_find: Option<(FindKind, char)>,
}

impl Default for ModeController {
    fn default() -> Self {
        Self::new(BaseMode::Emacs)
    }
}

impl ModeController {
    pub fn new(base: BaseMode) -> Self {
        Self {
            base,
            overlays: Vec::new(),
            saved_overlays: Vec::new(),
            argument: NumericArgument::default(),
            last_widget: None,
            sub_mode: None,
            pending_operator: None,
            last_find: None,
        }
    }

    pub fn base(&self) -> BaseMode {
        self.base
    }

    pub fn set_base(&mut self, base: BaseMode) {
        self.base = base;
    }

    /// vi挿入モードへ
    pub fn enter_vi_insert(&mut self) {
        self.cancel_operator();
        self.remove_visual();
        self.base = BaseMode::ViInsert;
    }

    /// viコマンドモードへ。挿入モードから来た場合のみ true
    pub fn enter_vi_command(&mut self) -> bool {
        self.cancel_operator();
        self.remove_visual();
        let from_insert = self.base == BaseMode::ViInsert;
        self.base = BaseMode::ViCommand;
        from_insert
    }

    /// emacsモードへ
    pub fn enter_emacs(&mut self) {
        self.cancel_operator();
        self.overlays.clear();
        self.base = BaseMode::Emacs;
    }

    pub fn overlays(&self) -> &[Overlay] {
        &self.overlays
    }

    pub fn top_overlay(&self) -> Option<Overlay> {
        self.overlays.last().copied()
    }

    pub fn has_overlay(&self, overlay: Overlay) -> bool {
        self.overlays.contains(&overlay)
    }

    /// オーバーレイを積む（同じものが既にあれば最上段へ移す）
    pub fn push_overlay(&mut self, overlay: Overlay) {
        self.overlays.retain(|o| *o != overlay);
        self.overlays.push(overlay);
    }

    pub fn pop_overlay(&mut self) -> Option<Overlay> {
        self.overlays.pop()
    }

    /// 指定したオーバーレイを外す。外したら true
    pub fn remove_overlay(&mut self, overlay: Overlay) -> bool {
        let before = self.overlays.len();
        self.overlays.retain(|o| *o != overlay);
        before != self.overlays.len()
    }

    fn remove_visual(&mut self) {
        self.overlays.retain(|o| !o.is_visual());
    }

    pub fn clear_overlays(&mut self) {
        self.overlays.clear();
        self.pending_operator = None;
    }

    /// 移動先待ちのオペレータを取り消す
    pub fn cancel_operator(&mut self) {
        self.pending_operator = None;
        self.remove_overlay(Overlay::OperatorPending);
    }

    /// 解決に使うキーマップ名（優先順）
    pub fn keymap_chain(&self) -> Vec<&'static str> {
        let mut chain: Vec<&'static str> = self.overlays.iter().rev().map(|o| o.keymap_name()).collect();
        chain.push(self.base.keymap_name());
        chain
    }

    /// 再帰編集に入る。外側のオーバーレイは退避される
    pub fn enter_recursive(&mut self) {
        self.saved_overlays.push(std::mem::take(&mut self.overlays));
    }

    /// 再帰編集から戻る
    pub fn leave_recursive(&mut self) {
        self.overlays = self.saved_overlays.pop().unwrap_or_default();
    }

    /// 再帰編集の深さ
    pub fn depth(&self) -> usize {
        self.saved_overlays.len()
    }

    /// 行の読み取り開始時の状態へ戻す
    pub fn reset_for_line(&mut self, base: BaseMode) {
        self.base = base;
        self.overlays.clear();
        self.saved_overlays.clear();
        self.argument.clear();
        self.sub_mode = None;
        self.pending_operator = None;
        self.last_widget = None;
    }
}
