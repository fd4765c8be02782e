//! altre-readline - 対話的な行編集エンジン
//!
//! キーマップ、ウィジェット、emacs/vi モード、履歴、補完を備えた行エディタ

// コアモジュール
pub mod error;
pub mod logging;
pub mod config;
pub mod options;

// 編集層
pub mod editor;
pub mod history;
pub mod completion;
pub mod parser;

// 入力・ディスパッチ
pub mod input;
pub mod mode;
pub mod widget;
pub mod reader;

// 表示層
pub mod display;

// 公開API
pub use completion::{Candidate, Completer, PathCompleter, StringsCompleter};
pub use config::ReaderConfig;
pub use display::{BellStyle, NullDisplay, Redisplay, TerminalDisplay};
pub use error::{ReadlineError, Result};
pub use history::{History, MemoryHistory};
pub use input::{default_keymaps, CrosstermKeySource, Key, KeyMaps, KeySequence, KeySource, ScriptedKeySource};
pub use logging::FileLogger;
pub use options::{Options, ReadlineOption, Variables};
pub use parser::{DefaultParser, Parser};
pub use reader::{EditContext, LineReader};
pub use widget::{Widget, WidgetName, WidgetOutcome, WidgetRegistry};
