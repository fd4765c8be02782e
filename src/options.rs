//! オプションと変数
//!
//! オプションは真偽値フラグ、変数は名前付きの設定値。どちらも実行中に変更でき、
//! ウィジェットは呼び出しのたびに同期的に参照する。

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;

/// 真偽値オプション
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReadlineOption {
    CompleteInWord,
    DisableEventExpansion,
    HistoryVerify,
    HistoryBeep,
    AutoMenu,
    AutoList,
    RecognizeExact,
    PadPrompts,
    Group,
    CaseInsensitive,
    ListAmbiguous,
    ListPacked,
    ListRowsFirst,
    GlobComplete,
    MenuComplete,
    AutoParamSlash,
    AutoRemoveSlash,
}

impl ReadlineOption {
    pub const ALL: [ReadlineOption; 17] = [
        ReadlineOption::CompleteInWord,
        ReadlineOption::DisableEventExpansion,
        ReadlineOption::HistoryVerify,
        ReadlineOption::HistoryBeep,
        ReadlineOption::AutoMenu,
        ReadlineOption::AutoList,
        ReadlineOption::RecognizeExact,
        ReadlineOption::PadPrompts,
        ReadlineOption::Group,
        ReadlineOption::CaseInsensitive,
        ReadlineOption::ListAmbiguous,
        ReadlineOption::ListPacked,
        ReadlineOption::ListRowsFirst,
        ReadlineOption::GlobComplete,
        ReadlineOption::MenuComplete,
        ReadlineOption::AutoParamSlash,
        ReadlineOption::AutoRemoveSlash,
    ];

    /// 既定値
    pub fn default_value(self) -> bool {
        matches!(
            self,
            ReadlineOption::HistoryBeep
                | ReadlineOption::AutoMenu
                | ReadlineOption::AutoList
                | ReadlineOption::AutoParamSlash
                | ReadlineOption::AutoRemoveSlash
        )
    }

    pub fn name(self) -> &'static str {
        match self {
            ReadlineOption::CompleteInWord => "COMPLETE_IN_WORD",
            ReadlineOption::DisableEventExpansion => "DISABLE_EVENT_EXPANSION",
            ReadlineOption::HistoryVerify => "HISTORY_VERIFY",
            ReadlineOption::HistoryBeep => "HISTORY_BEEP",
            ReadlineOption::AutoMenu => "AUTO_MENU",
            ReadlineOption::AutoList => "AUTO_LIST",
            ReadlineOption::RecognizeExact => "RECOGNIZE_EXACT",
            ReadlineOption::PadPrompts => "PAD_PROMPTS",
            ReadlineOption::Group => "GROUP",
            ReadlineOption::CaseInsensitive => "CASE_INSENSITIVE",
            ReadlineOption::ListAmbiguous => "LIST_AMBIGUOUS",
            ReadlineOption::ListPacked => "LIST_PACKED",
            ReadlineOption::ListRowsFirst => "LIST_ROWS_FIRST",
            ReadlineOption::GlobComplete => "GLOB_COMPLETE",
            ReadlineOption::MenuComplete => "MENU_COMPLETE",
            ReadlineOption::AutoParamSlash => "AUTO_PARAM_SLASH",
            ReadlineOption::AutoRemoveSlash => "AUTO_REMOVE_SLASH",
        }
    }

    /// 名前から検索（大文字小文字と `-`/`_` の違いは無視）
    pub fn from_name(name: &str) -> Option<Self> {
        let normalized = name.trim().to_ascii_uppercase().replace('-', "_");
        Self::ALL.into_iter().find(|opt| opt.name() == normalized)
    }
}

impl fmt::Display for ReadlineOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// オプションの現在値
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Options {
    values: BTreeMap<ReadlineOption, bool>,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            values: ReadlineOption::ALL
                .into_iter()
                .map(|opt| (opt, opt.default_value()))
                .collect(),
        }
    }
}

impl Options {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_set(&self, option: ReadlineOption) -> bool {
        self.values.get(&option).copied().unwrap_or_else(|| option.default_value())
    }

    pub fn set(&mut self, option: ReadlineOption, value: bool) {
        self.values.insert(option, value);
    }

    pub fn unset(&mut self, option: ReadlineOption) {
        self.set(option, false);
    }

    /// 既定値に戻す
    pub fn reset(&mut self, option: ReadlineOption) {
        self.values.insert(option, option.default_value());
    }

    /// 全オプションと現在値
    pub fn iter(&self) -> impl Iterator<Item = (ReadlineOption, bool)> + '_ {
        ReadlineOption::ALL.into_iter().map(move |opt| (opt, self.is_set(opt)))
    }
}

/// 変数名
pub mod vars {
    pub const BIND_TTY_SPECIAL_CHARS: &str = "bind-tty-special-chars";
    pub const COMMENT_BEGIN: &str = "comment-begin";
    pub const BELL_STYLE: &str = "bell-style";
    pub const PREFER_VISIBLE_BELL: &str = "prefer-visible-bell";
    pub const LIST_MAX: &str = "list-max";
    pub const DISABLE_HISTORY: &str = "disable-history";
    pub const DISABLE_COMPLETION: &str = "disable-completion";
    pub const EDITING_MODE: &str = "editing-mode";
    pub const KEYMAP: &str = "keymap";
    pub const BLINK_MATCHING_PAREN: &str = "blink-matching-paren";
    pub const WORDCHARS: &str = "WORDCHARS";
    pub const REMOVE_SUFFIX_CHARS: &str = "REMOVE_SUFFIX_CHARS";
    pub const SEARCH_TERMINATORS: &str = "search-terminators";
    pub const ERRORS: &str = "errors";
    /// 曖昧な割り当ての待ち時間（ミリ秒）
    pub const AMBIGUOUS_BINDING: &str = "ambiguous-binding";
}

pub const DEFAULT_AMBIGUOUS_TIMEOUT_MS: i64 = 1000;
pub const DEFAULT_WORDCHARS: &str = "*?_-.[]~=/&;!#$%^(){}<>";
pub const DEFAULT_REMOVE_SUFFIX_CHARS: &str = " \t\n;&|";
pub const DEFAULT_SEARCH_TERMINATORS: &str = "\x1b\x0a";

/// 名前付き設定値
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Variables {
    values: BTreeMap<String, Value>,
}

impl Default for Variables {
    fn default() -> Self {
        let mut values = BTreeMap::new();
        values.insert(vars::BIND_TTY_SPECIAL_CHARS.to_string(), Value::Bool(true));
        values.insert(vars::COMMENT_BEGIN.to_string(), Value::from("#"));
        values.insert(vars::BELL_STYLE.to_string(), Value::from("audible"));
        values.insert(vars::LIST_MAX.to_string(), Value::from(100));
        values.insert(vars::EDITING_MODE.to_string(), Value::from("emacs"));
        values.insert(vars::BLINK_MATCHING_PAREN.to_string(), Value::Bool(false));
        values.insert(vars::WORDCHARS.to_string(), Value::from(DEFAULT_WORDCHARS));
        values.insert(vars::REMOVE_SUFFIX_CHARS.to_string(), Value::from(DEFAULT_REMOVE_SUFFIX_CHARS));
        values.insert(vars::SEARCH_TERMINATORS.to_string(), Value::from(DEFAULT_SEARCH_TERMINATORS));
        values.insert(vars::ERRORS.to_string(), Value::from(2));
        values.insert(vars::AMBIGUOUS_BINDING.to_string(), Value::from(DEFAULT_AMBIGUOUS_TIMEOUT_MS));
        Self { values }
    }
}

impl Variables {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.values.get(name)
    }

    pub fn set(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        self.values.insert(name.into(), value.into());
    }

    pub fn remove(&mut self, name: &str) -> Option<Value> {
        self.values.remove(name)
    }

    /// 真偽値として読む（"on"/"off" 等の文字列も解釈する）
    pub fn get_bool(&self, name: &str, default: bool) -> bool {
        match self.values.get(name) {
            Some(Value::Bool(b)) => *b,
            Some(Value::Number(n)) => n.as_i64().map(|v| v != 0).unwrap_or(default),
            Some(Value::String(s)) => match s.to_ascii_lowercase().as_str() {
                "on" | "true" | "yes" | "1" => true,
                "off" | "false" | "no" | "0" => false,
                _ => default,
            },
            _ => default,
        }
    }

    /// 整数として読む
    pub fn get_int(&self, name: &str, default: i64) -> i64 {
        match self.values.get(name) {
            Some(Value::Number(n)) => n.as_i64().unwrap_or(default),
            Some(Value::String(s)) => s.trim().parse().unwrap_or(default),
            _ => default,
        }
    }

    /// 文字列として読む
    pub fn get_str(&self, name: &str) -> Option<&str> {
        match self.values.get(name) {
            Some(Value::String(s)) => Some(s.as_str()),
            _ => None,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_option_defaults() {
        let options = Options::new();
        assert!(options.is_set(ReadlineOption::HistoryBeep));
        assert!(options.is_set(ReadlineOption::AutoMenu));
        assert!(!options.is_set(ReadlineOption::HistoryVerify));
        assert_eq!(options.iter().count(), ReadlineOption::ALL.len());
    }

    #[test]
    fn test_option_names() {
        assert_eq!(ReadlineOption::from_name("history_verify"), Some(ReadlineOption::HistoryVerify));
        assert_eq!(ReadlineOption::from_name("AUTO-LIST"), Some(ReadlineOption::AutoList));
        assert_eq!(ReadlineOption::from_name("NOPE"), None);
        let json = serde_json::to_string(&ReadlineOption::DisableEventExpansion).unwrap();
        assert_eq!(json, "\"DISABLE_EVENT_EXPANSION\"");
    }

    #[test]
    fn test_option_set_and_reset() {
        let mut options = Options::new();
        options.set(ReadlineOption::HistoryVerify, true);
        assert!(options.is_set(ReadlineOption::HistoryVerify));
        options.unset(ReadlineOption::AutoList);
        assert!(!options.is_set(ReadlineOption::AutoList));
        options.reset(ReadlineOption::AutoList);
        assert!(options.is_set(ReadlineOption::AutoList));
    }

    #[test]
    fn test_variable_typed_getters() {
        let mut variables = Variables::new();
        assert_eq!(variables.get_int(vars::AMBIGUOUS_BINDING, 0), DEFAULT_AMBIGUOUS_TIMEOUT_MS);
        assert!(variables.get_bool(vars::BIND_TTY_SPECIAL_CHARS, false));

        variables.set(vars::DISABLE_HISTORY, "on");
        assert!(variables.get_bool(vars::DISABLE_HISTORY, false));
        variables.set(vars::LIST_MAX, "25");
        assert_eq!(variables.get_int(vars::LIST_MAX, 100), 25);
        variables.set(vars::EDITING_MODE, "vi");
        assert_eq!(variables.get_str(vars::EDITING_MODE), Some("vi"));
        assert_eq!(variables.get_str(vars::KEYMAP), None);
    }
}
