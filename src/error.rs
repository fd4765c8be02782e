//! エラーハンドリング
//!
//! 行編集エンジン全体で使用するエラー型を定義する。
//! 未割り当てキーや前提条件違反はエラーではなくベルで通知されるため、
//! ここに現れるのは呼び出し元へ伝播すべきものだけ。

use thiserror::Error;

/// 行読み取り全体のエラー型
#[derive(Error, Debug)]
pub enum ReadlineError {
    /// 割り込みキー、またはトップレベルでの abort
    #[error("Interrupted")]
    Interrupted,

    /// 空バッファでの入力終端
    #[error("End of input")]
    EndOfInput,

    /// キー入力元・表示先のI/O失敗（致命的）
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// キーマップ操作エラー
    #[error("Key map error: {0}")]
    KeyMap(#[from] KeyMapError),

    /// 設定エラー
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

/// キーシーケンス文字列の解析エラー
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum KeyParseError {
    #[error("Invalid key sequence format: {0}")]
    InvalidFormat(String),

    #[error("Unknown modifier: {0}")]
    UnknownModifier(String),

    #[error("Unknown key: {0}")]
    UnknownKey(String),

    #[error("Empty key sequence")]
    EmptySequence,
}

/// キーマップ操作エラー
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum KeyMapError {
    #[error("Unknown keymap: {0}")]
    UnknownKeyMap(String),

    #[error("Unknown widget: {0}")]
    UnknownWidget(String),

    #[error("Invalid key sequence: {0}")]
    InvalidSequence(#[from] KeyParseError),
}

/// 設定ファイル固有のエラー
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Cannot read configuration file {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid configuration file {path}: {message}")]
    InvalidFile { path: String, message: String },

    #[error("Invalid value for {key}: {value}")]
    InvalidValue { key: String, value: String },

    #[error("Invalid binding: {0}")]
    Binding(#[from] KeyMapError),
}

/// 結果型のエイリアス
pub type Result<T> = std::result::Result<T, ReadlineError>;

impl ReadlineError {
    /// 呼び出し元が次の行の読み取りを続けてよいかどうか
    pub fn is_recoverable(&self) -> bool {
        matches!(self, ReadlineError::Interrupted)
    }
}
