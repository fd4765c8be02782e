//! キー入力元
//!
//! 端末から読む `CrosstermKeySource` と、テスト用にあらかじめ並べたキーを返す
//! `ScriptedKeySource` を提供する。どちらも曖昧な割り当ての解決に使う
//! タイムアウト付き読み取りをサポートする。

use super::key::{Key, KeySequence};
use crate::error::Result;
use crossterm::event::{self, Event, KeyEventKind};
use std::collections::VecDeque;
use std::time::{Duration, Instant};

/// 入力元から得られる1イベント
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyInput {
    Key(Key),
    /// タイムアウト付き読み取りで時間切れ
    Timeout,
    /// 入力終端
    Eof,
}

/// 生のキー入力元
pub trait KeySource {
    /// 次のキーを待つ（時間制限なし）
    fn read_key(&mut self) -> Result<KeyInput>;

    /// 指定時間内に届いたキーを返す。届かなければ `Timeout`
    fn read_key_timeout(&mut self, timeout: Duration) -> Result<KeyInput>;
}

/// crossterm のイベントキューからキーを読む
///
/// 端末は呼び出し側でrawモードにしておくこと。
#[derive(Debug, Default)]
pub struct CrosstermKeySource {
    pasted: VecDeque<Key>,
}

impl CrosstermKeySource {
    pub fn new() -> Self {
        Self::default()
    }

    fn translate(&mut self, event: Event) -> Option<Key> {
        match event {
            Event::Key(key) if key.kind != KeyEventKind::Release => Some(Key::from(key)),
            Event::Paste(text) => {
                self.pasted.extend(text.chars().map(Key::char));
                self.pasted.pop_front()
            }
            _ => None,
        }
    }
}

impl KeySource for CrosstermKeySource {
    fn read_key(&mut self) -> Result<KeyInput> {
        if let Some(key) = self.pasted.pop_front() {
            return Ok(KeyInput::Key(key));
        }
        loop {
            let event = event::read()?;
            if let Some(key) = self.translate(event) {
                return Ok(KeyInput::Key(key));
            }
        }
    }

    fn read_key_timeout(&mut self, timeout: Duration) -> Result<KeyInput> {
        if let Some(key) = self.pasted.pop_front() {
            return Ok(KeyInput::Key(key));
        }
        let deadline = Instant::now() + timeout;
        loop {
            let remaining = deadline.saturating_duration_since(Instant::now());
            if remaining.is_zero() || !event::poll(remaining)? {
                return Ok(KeyInput::Timeout);
            }
            let event = event::read()?;
            if let Some(key) = self.translate(event) {
                return Ok(KeyInput::Key(key));
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Step {
    Key(Key),
    Pause,
}

/// 事前に並べたキーを順に返す入力元
///
/// `pause()` はタイムアウト付き読み取りでのみ `Timeout` として消費され、
/// 通常の読み取りでは読み飛ばされる。キーを使い切ると `Eof` を返し続ける。
#[derive(Debug, Clone, Default)]
pub struct ScriptedKeySource {
    steps: VecDeque<Step>,
}

impl ScriptedKeySource {
    pub fn new() -> Self {
        Self::default()
    }

    /// 文字列の各文字を修飾なしキーとして追加
    pub fn text(mut self, text: &str) -> Self {
        self.steps.extend(text.chars().map(|c| Step::Key(Key::char(c))));
        self
    }

    pub fn key(mut self, key: Key) -> Self {
        self.steps.push_back(Step::Key(key));
        self
    }

    pub fn keys(mut self, seq: &KeySequence) -> Self {
        self.steps.extend(seq.keys.iter().copied().map(Step::Key));
        self
    }

    /// 打鍵間の間（曖昧割り当てのタイムアウトを発生させる）
    pub fn pause(mut self) -> Self {
        self.steps.push_back(Step::Pause);
        self
    }

    /// 残りのキー数（間は数えない）
    pub fn remaining(&self) -> usize {
        self.steps.iter().filter(|s| matches!(s, Step::Key(_))).count()
    }
}

impl KeySource for ScriptedKeySource {
    fn read_key(&mut self) -> Result<KeyInput> {
        while let Some(step) = self.steps.pop_front() {
            if let Step::Key(key) = step {
                return Ok(KeyInput::Key(key));
            }
        }
        Ok(KeyInput::Eof)
    }

    fn read_key_timeout(&mut self, _timeout: Duration) -> Result<KeyInput> {
        match self.steps.pop_front() {
            Some(Step::Key(key)) => Ok(KeyInput::Key(key)),
            Some(Step::Pause) => Ok(KeyInput::Timeout),
            None => Ok(KeyInput::Eof),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scripted_pause_only_affects_timed_reads() {
        let mut source = ScriptedKeySource::new().text("a").pause().text("b").pause();
        assert_eq!(source.remaining(), 2);
        assert_eq!(source.read_key().unwrap(), KeyInput::Key(Key::char('a')));
        assert_eq!(source.read_key_timeout(Duration::from_millis(10)).unwrap(), KeyInput::Timeout);
        assert_eq!(source.read_key_timeout(Duration::from_millis(10)).unwrap(), KeyInput::Key(Key::char('b')));
        assert_eq!(source.read_key().unwrap(), KeyInput::Eof);
        assert_eq!(source.read_key().unwrap(), KeyInput::Eof);
    }

    #[test]
    fn test_scripted_sequences() {
        let seq = KeySequence::parse("C-x C-u").unwrap();
        let mut source = ScriptedKeySource::new().keys(&seq).key(Key::ctrl('a'));
        assert_eq!(source.read_key().unwrap(), KeyInput::Key(Key::ctrl('x')));
        assert_eq!(source.read_key().unwrap(), KeyInput::Key(Key::ctrl('u')));
        assert_eq!(source.read_key().unwrap(), KeyInput::Key(Key::ctrl('a')));
    }
}
