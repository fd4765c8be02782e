//! 編集モジュール
//!
//! 行バッファ、アンドゥ履歴、キルリング、単語境界計算を提供

pub mod buffer;
pub mod kill_ring;
pub mod undo;
pub mod words;

pub use buffer::{Buffer, Snapshot};
pub use kill_ring::{KillDirection, KillRing};
pub use undo::UndoLog;
pub use words::WordChars;
