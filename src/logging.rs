//! ロギングシステム
//!
//! ライブラリは `log` ファサード経由で出力する。端末がrawモードの間は標準エラーを
//! 使えないため、`FileLogger` は既定でファイルへ追記する。

use log::{LevelFilter, Log, Metadata, Record};
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// 既定のログファイル
pub fn default_log_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".altre-log").join("readline.log"))
}

/// `log::Log` 実装
///
/// * レベルで絞り込み
/// * 任意で標準エラーへも出力
/// * ファイルへの追記（親ディレクトリは作成する）
#[derive(Debug)]
pub struct FileLogger {
    level: LevelFilter,
    output_stderr: bool,
    output_file: Option<PathBuf>,
    lock: Mutex<()>,
}

impl FileLogger {
    pub fn new(level: LevelFilter) -> Self {
        Self {
            level,
            output_stderr: false,
            output_file: None,
            lock: Mutex::new(()),
        }
    }

    /// 開発時向け（debug レベル、既定ファイル）
    pub fn for_development() -> Self {
        let logger = Self::new(LevelFilter::Debug);
        match default_log_path() {
            Some(path) => logger.with_file_output(path),
            None => logger,
        }
    }

    pub fn level(&self) -> LevelFilter {
        self.level
    }

    pub fn with_level(mut self, level: LevelFilter) -> Self {
        self.level = level;
        self
    }

    pub fn with_file_output<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.output_file = Some(path.into());
        self
    }

    /// 標準エラーへも出す（rawモードでない場合のみ有用）
    pub fn with_stderr(mut self) -> Self {
        self.output_stderr = true;
        self
    }

    pub fn file(&self) -> Option<&Path> {
        self.output_file.as_deref()
    }

    /// グローバルロガーとして登録する
    pub fn install(self) -> Result<(), log::SetLoggerError> {
        let level = self.level;
        log::set_logger(Box::leak(Box::new(self)))?;
        log::set_max_level(level);
        Ok(())
    }

    fn write_line(&self, line: &str) {
        let _guard = self.lock.lock();
        if self.output_stderr {
            eprintln!("{}", line);
        }
        if let Some(path) = &self.output_file {
            if let Some(parent) = path.parent() {
                let _ = fs::create_dir_all(parent);
            }
            if let Ok(mut file) = OpenOptions::new().create(true).append(true).open(path) {
                let _ = writeln!(file, "{}", line);
            }
        }
    }
}

impl Log for FileLogger {
    fn enabled(&self, metadata: &Metadata<'_>) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record<'_>) {
        if !self.enabled(record.metadata()) {
            return;
        }
        self.write_line(&format!("{}: [{}] {}", record.level(), record.target(), record.args()));
    }

    fn flush(&self) {}
}
