//! キー表現
//!
//! 端末イベントを内部のキー表現へ正規化し、`"C-x C-u"` 形式の文字列と相互変換する。

use crate::error::KeyParseError;
use crossterm::event::{KeyCode as CrosstermKeyCode, KeyEvent, KeyModifiers as CrosstermModifiers};
use std::fmt;
use std::str::FromStr;

/// キー入力の内部表現
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Key {
    /// 修飾キー
    pub modifiers: KeyModifiers,
    /// 基本キー
    pub code: KeyCode,
}

/// 修飾キーの組み合わせ
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct KeyModifiers {
    pub ctrl: bool,
    pub alt: bool,
    pub shift: bool,
}

impl KeyModifiers {
    pub const NONE: Self = Self { ctrl: false, alt: false, shift: false };
    pub const CTRL: Self = Self { ctrl: true, alt: false, shift: false };
    pub const ALT: Self = Self { ctrl: false, alt: true, shift: false };
    pub const CTRL_ALT: Self = Self { ctrl: true, alt: true, shift: false };

    pub fn is_empty(&self) -> bool {
        !self.ctrl && !self.alt && !self.shift
    }
}

/// 基本キーコード
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum KeyCode {
    Char(char),
    Enter,
    Backspace,
    Delete,
    Tab,
    BackTab,
    Up,
    Down,
    Left,
    Right,
    Home,
    End,
    PageUp,
    PageDown,
    Insert,
    F(u8),
    Esc,
    Unknown,
}

impl Key {
    /// 修飾キーを正規化して作成
    ///
    /// 文字キーのShiftは文字自体に含まれるため落とし、Ctrl付き英字は小文字に揃える。
    pub const fn new(code: KeyCode, modifiers: KeyModifiers) -> Self {
        match code {
            KeyCode::Char(c) => {
                let c = if modifiers.ctrl { c.to_ascii_lowercase() } else { c };
                Self {
                    modifiers: KeyModifiers { ctrl: modifiers.ctrl, alt: modifiers.alt, shift: false },
                    code: KeyCode::Char(c),
                }
            }
            _ => Self { modifiers, code },
        }
    }

    /// 修飾なしのキー
    pub const fn plain(code: KeyCode) -> Self {
        Self::new(code, KeyModifiers::NONE)
    }

    /// 修飾なしの文字キー
    pub const fn char(c: char) -> Self {
        Self::new(KeyCode::Char(c), KeyModifiers::NONE)
    }

    /// Ctrl+文字
    pub const fn ctrl(c: char) -> Self {
        Self::new(KeyCode::Char(c), KeyModifiers::CTRL)
    }

    /// Alt(Meta)+文字
    pub const fn alt(c: char) -> Self {
        Self::new(KeyCode::Char(c), KeyModifiers::ALT)
    }

    /// Alt(Meta)+任意のキー
    pub const fn alt_code(code: KeyCode) -> Self {
        Self::new(code, KeyModifiers::ALT)
    }

    /// Ctrl+Alt+文字
    pub const fn ctrl_alt(c: char) -> Self {
        Self::new(KeyCode::Char(c), KeyModifiers::CTRL_ALT)
    }

    /// 挿入可能な文字かどうかを判定
    pub fn is_insertable_char(&self) -> bool {
        match self.code {
            KeyCode::Char(c) => !self.modifiers.ctrl && !self.modifiers.alt && !c.is_control(),
            _ => false,
        }
    }

    /// 文字キーであれば修飾に関係なくその文字を返す
    pub fn to_char(&self) -> Option<char> {
        match self.code {
            KeyCode::Char(c) => Some(c),
            _ => None,
        }
    }

    /// 数字キー（修飾はMetaのみ許容）の値
    pub fn digit(&self) -> Option<u32> {
        if self.modifiers.ctrl {
            return None;
        }
        self.to_char().and_then(|c| c.to_digit(10))
    }

    /// quoted-insert で挿入される生の文字
    pub fn raw_char(&self) -> Option<char> {
        match self.code {
            KeyCode::Char(c) if self.modifiers.ctrl => {
                let upper = c.to_ascii_uppercase();
                if ('@'..='_').contains(&upper) {
                    char::from_u32(upper as u32 & 0x1f)
                } else {
                    Some(c)
                }
            }
            KeyCode::Char(c) => Some(c),
            KeyCode::Enter => Some('\r'),
            KeyCode::Tab => Some('\t'),
            KeyCode::Esc => Some('\x1b'),
            KeyCode::Backspace => Some('\x7f'),
            _ => None,
        }
    }
}

/// crossterm統合
impl From<KeyEvent> for Key {
    fn from(event: KeyEvent) -> Self {
        let modifiers = KeyModifiers {
            ctrl: event.modifiers.contains(CrosstermModifiers::CONTROL),
            alt: event.modifiers.contains(CrosstermModifiers::ALT),
            shift: event.modifiers.contains(CrosstermModifiers::SHIFT),
        };

        let code = match event.code {
            CrosstermKeyCode::Char(c) => KeyCode::Char(c),
            CrosstermKeyCode::Enter => KeyCode::Enter,
            CrosstermKeyCode::Backspace => KeyCode::Backspace,
            CrosstermKeyCode::Delete => KeyCode::Delete,
            CrosstermKeyCode::Tab => KeyCode::Tab,
            CrosstermKeyCode::BackTab => KeyCode::BackTab,
            CrosstermKeyCode::Up => KeyCode::Up,
            CrosstermKeyCode::Down => KeyCode::Down,
            CrosstermKeyCode::Left => KeyCode::Left,
            CrosstermKeyCode::Right => KeyCode::Right,
            CrosstermKeyCode::Home => KeyCode::Home,
            CrosstermKeyCode::End => KeyCode::End,
            CrosstermKeyCode::PageUp => KeyCode::PageUp,
            CrosstermKeyCode::PageDown => KeyCode::PageDown,
            CrosstermKeyCode::Insert => KeyCode::Insert,
            CrosstermKeyCode::F(n) => KeyCode::F(n),
            CrosstermKeyCode::Esc => KeyCode::Esc,
            _ => KeyCode::Unknown,
        };

        // BackTabはShift込みの表現なので修飾から外す
        let modifiers = if code == KeyCode::BackTab {
            KeyModifiers { shift: false, ..modifiers }
        } else {
            modifiers
        };
        Key::new(code, modifiers)
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.modifiers.ctrl {
            f.write_str("C-")?;
        }
        if self.modifiers.alt {
            f.write_str("M-")?;
        }
        if self.modifiers.shift {
            f.write_str("S-")?;
        }
        match self.code {
            KeyCode::Char(' ') => f.write_str("SPC"),
            KeyCode::Char(c) => write!(f, "{}", c),
            KeyCode::Enter => f.write_str("Enter"),
            KeyCode::Backspace => f.write_str("Backspace"),
            KeyCode::Delete => f.write_str("Delete"),
            KeyCode::Tab => f.write_str("Tab"),
            KeyCode::BackTab => f.write_str("BackTab"),
            KeyCode::Up => f.write_str("Up"),
            KeyCode::Down => f.write_str("Down"),
            KeyCode::Left => f.write_str("Left"),
            KeyCode::Right => f.write_str("Right"),
            KeyCode::Home => f.write_str("Home"),
            KeyCode::End => f.write_str("End"),
            KeyCode::PageUp => f.write_str("PageUp"),
            KeyCode::PageDown => f.write_str("PageDown"),
            KeyCode::Insert => f.write_str("Insert"),
            KeyCode::F(n) => write!(f, "F{}", n),
            KeyCode::Esc => f.write_str("Esc"),
            KeyCode::Unknown => f.write_str("Unknown"),
        }
    }
}

/// キーシーケンス（連続キー対応）
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct KeySequence {
    pub keys: Vec<Key>,
}

impl KeySequence {
    /// 単一キーからシーケンスを作成
    pub fn single(key: Key) -> Self {
        Self { keys: vec![key] }
    }

    /// 複数キーからシーケンスを作成
    pub fn multi(keys: Vec<Key>) -> Self {
        Self { keys }
    }

    /// 文字列の各文字を修飾なしキーとして並べる
    pub fn from_text(text: &str) -> Self {
        Self { keys: text.chars().map(Key::char).collect() }
    }

    pub fn as_slice(&self) -> &[Key] {
        &self.keys
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// 文字列表現からパース
    pub fn parse(s: &str) -> Result<Self, KeyParseError> {
        let parts: Vec<&str> = s.split_whitespace().collect();
        if parts.is_empty() {
            return Err(KeyParseError::EmptySequence);
        }

        let keys = parts
            .into_iter()
            .map(Self::parse_single_key)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { keys })
    }

    fn parse_single_key(s: &str) -> Result<Key, KeyParseError> {
        let mut modifiers = KeyModifiers::NONE;
        let mut remaining = s;

        // 修飾キーの解析（"C--" のように修飾の後ろの "-" はキー本体）
        while remaining.len() > 2 && remaining.as_bytes()[1] == b'-' {
            match &remaining[..2] {
                "C-" => modifiers.ctrl = true,
                "M-" => modifiers.alt = true,
                "S-" => modifiers.shift = true,
                other => {
                    if remaining.chars().count() > 2 {
                        return Err(KeyParseError::UnknownModifier(other.to_string()));
                    }
                    break;
                }
            }
            remaining = &remaining[2..];
        }

        let code = match remaining {
            "Enter" | "RET" => KeyCode::Enter,
            "Backspace" | "DEL" => KeyCode::Backspace,
            "Delete" => KeyCode::Delete,
            "Tab" | "TAB" => KeyCode::Tab,
            "BackTab" => KeyCode::BackTab,
            "Up" => KeyCode::Up,
            "Down" => KeyCode::Down,
            "Left" => KeyCode::Left,
            "Right" => KeyCode::Right,
            "Home" => KeyCode::Home,
            "End" => KeyCode::End,
            "PageUp" => KeyCode::PageUp,
            "PageDown" => KeyCode::PageDown,
            "Insert" => KeyCode::Insert,
            "Esc" | "ESC" => KeyCode::Esc,
            "SPC" | "Space" => KeyCode::Char(' '),
            _ => {
                let mut chars = remaining.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => KeyCode::Char(c),
                    _ => match remaining.strip_prefix('F').and_then(|n| n.parse::<u8>().ok()) {
                        Some(n) if (1..=24).contains(&n) => KeyCode::F(n),
                        _ => return Err(KeyParseError::UnknownKey(remaining.to_string())),
                    },
                }
            }
        };

        Ok(Key::new(code, modifiers))
    }
}

impl FromStr for KeySequence {
    type Err = KeyParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for KeySequence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, key) in self.keys.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{}", key)?;
        }
        Ok(())
    }
}

impl From<Key> for KeySequence {
    fn from(key: Key) -> Self {
        Self::single(key)
    }
}
