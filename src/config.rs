//! 設定ファイル
//!
//! JSON でオプション・変数・追加のキー割り当てを記述する。
//!
//! ```json
//! {
//!   "options": { "HISTORY_VERIFY": true },
//!   "variables": { "editing-mode": "vi", "bell-style": "none" },
//!   "bindings": [ { "keymap": "emacs", "keys": "C-x C-e", "widget": "vi-cmd-mode" } ]
//! }
//! ```

use crate::error::{ConfigError, KeyMapError};
use crate::options::ReadlineOption;
use crate::reader::LineReader;
use crate::widget::WidgetName;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

/// キー割り当て1件
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BindingConfig {
    pub keymap: String,
    /// `"C-x C-u"` 形式
    pub keys: String,
    pub widget: String,
}

/// 設定ファイルの内容
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReaderConfig {
    pub options: BTreeMap<String, bool>,
    pub variables: BTreeMap<String, Value>,
    pub bindings: Vec<BindingConfig>,
}

/// 既定の設定ファイルの場所
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("altre").join("readline.json"))
}

/// `~` を展開したパス
pub fn expand_path(path: &str) -> PathBuf {
    PathBuf::from(shellexpand::tilde(path).into_owned())
}

impl ReaderConfig {
    pub fn from_json_str(text: &str, origin: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(text).map_err(|e| ConfigError::InvalidFile {
            path: origin.to_string(),
            message: e.to_string(),
        })
    }

    /// ファイルから読み込む
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let display = path.display().to_string();
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: display.clone(),
            source,
        })?;
        Self::from_json_str(&text, &display)
    }

    /// 既定の場所から読み込む。ファイルがなければ空の設定
    pub fn load_default() -> Result<Self, ConfigError> {
        match default_config_path() {
            Some(path) if path.exists() => Self::load(&path),
            _ => Ok(Self::default()),
        }
    }

    /// 読み取りセッションへ反映する
    ///
    /// 不明なオプション名・未登録のウィジェット・解析できないキー表記はエラー。
    /// エラーの時点までの項目は反映済みになる。
    pub fn apply(&self, reader: &mut LineReader) -> Result<(), ConfigError> {
        for (name, value) in &self.options {
            let option = ReadlineOption::from_name(name).ok_or_else(|| ConfigError::InvalidValue {
                key: "options".to_string(),
                value: name.clone(),
            })?;
            reader.options_mut().set(option, *value);
        }

        for (name, value) in &self.variables {
            reader.variables_mut().set(name.clone(), value.clone());
        }

        for binding in &self.bindings {
            let widget = WidgetName::from(binding.widget.as_str());
            if reader.registry().get(&widget).is_none() {
                return Err(KeyMapError::UnknownWidget(binding.widget.clone()).into());
            }
            reader.keymaps_mut().bind_str(&binding.keymap, &binding.keys, widget)?;
        }

        log::debug!(
            "configuration applied: {} options, {} variables, {} bindings",
            self.options.len(),
            self.variables.len(),
            self.bindings.len()
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::key::Key;
    use crate::input::source::ScriptedKeySource;
    use crate::options::vars;
    use crate::widget::names;
    use std::io::Write;

    const SAMPLE: &str = r#"{
        "options": { "history-verify": true, "AUTO_MENU": false },
        "variables": { "bell-style": "none", "list-max": 20 },
        "bindings": [ { "keymap": "emacs", "keys": "C-x C-e", "widget": "vi-cmd-mode" } ]
    }"#;

    #[test]
    fn test_load_and_apply() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(SAMPLE.as_bytes()).unwrap();
        let config = ReaderConfig::load(file.path()).unwrap();

        let mut reader = LineReader::new(ScriptedKeySource::new());
        config.apply(&mut reader).unwrap();
        assert!(reader.options().is_set(ReadlineOption::HistoryVerify));
        assert!(!reader.options().is_set(ReadlineOption::AutoMenu));
        assert_eq!(reader.variables().get_str(vars::BELL_STYLE), Some("none"));
        assert_eq!(reader.variables().get_int(vars::LIST_MAX, 0), 20);
        let emacs = reader.keymaps().get("emacs").unwrap();
        assert_eq!(emacs.lookup(&[Key::ctrl('x'), Key::ctrl('e')]), Some(&names::VI_CMD_MODE));
    }

    #[test]
    fn test_missing_sections_default_to_empty() {
        let config = ReaderConfig::from_json_str("{}", "inline").unwrap();
        assert_eq!(config, ReaderConfig::default());
    }

    #[test]
    fn test_invalid_json_reports_path() {
        let err = ReaderConfig::from_json_str("{ nope", "broken.json").unwrap_err();
        assert!(err.to_string().contains("broken.json"));
    }

    #[test]
    fn test_missing_file_is_read_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = ReaderConfig::load(&dir.path().join("absent.json")).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }

    #[test]
    fn test_apply_rejects_unknown_names() {
        let mut reader = LineReader::new(ScriptedKeySource::new());

        let config = ReaderConfig::from_json_str(r#"{"options": {"NO_SUCH_OPTION": true}}"#, "inline").unwrap();
        assert!(matches!(config.apply(&mut reader), Err(ConfigError::InvalidValue { .. })));

        let config = ReaderConfig::from_json_str(
            r#"{"bindings": [{"keymap": "emacs", "keys": "C-a", "widget": "no-such-widget"}]}"#,
            "inline",
        )
        .unwrap();
        assert!(matches!(
            config.apply(&mut reader),
            Err(ConfigError::Binding(KeyMapError::UnknownWidget(_)))
        ));

        let config = ReaderConfig::from_json_str(
            r#"{"bindings": [{"keymap": "nowhere", "keys": "C-a", "widget": "yank"}]}"#,
            "inline",
        )
        .unwrap();
        assert!(matches!(
            config.apply(&mut reader),
            Err(ConfigError::Binding(KeyMapError::UnknownKeyMap(_)))
        ));
    }

    #[test]
    fn test_expand_path_tilde() {
        let expanded = expand_path("~/readline.json");
        assert!(!expanded.to_string_lossy().starts_with('~') || dirs::home_dir().is_none());
        assert_eq!(expand_path("/etc/x.json"), PathBuf::from("/etc/x.json"));
    }
}
