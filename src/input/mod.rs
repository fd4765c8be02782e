//! 入力処理モジュール
//!
//! キー表現、キーマップ、キー入力元、既定の割り当てを提供

pub mod defaults;
pub mod key;
pub mod keymap;
pub mod source;

// 公開API
pub use defaults::default_keymaps;
pub use key::{Key, KeyCode, KeyModifiers, KeySequence};
pub use keymap::{resolve_layered, KeyMap, KeyMaps, Resolution};
pub use source::{CrosstermKeySource, KeyInput, KeySource, ScriptedKeySource};
