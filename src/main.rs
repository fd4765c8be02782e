use altre_readline::config::{expand_path, ReaderConfig};
use altre_readline::{
    CrosstermKeySource, FileLogger, LineReader, ReadlineError, StringsCompleter, TerminalDisplay,
};
use anyhow::{Context, Result};
use crossterm::terminal;
use log::LevelFilter;
use std::io::Write;
use std::path::PathBuf;

const COMMANDS: &[&str] = &["help", "history", "exit", "quit", "clear"];

#[derive(Debug, Default)]
struct RunOptions {
    vi: bool,
    config: Option<PathBuf>,
    log: Option<PathBuf>,
}

fn parse_args(args: &[String]) -> Result<RunOptions> {
    let mut options = RunOptions::default();
    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--vi" => options.vi = true,
            "--config" => {
                let path = iter.next().context("--config requires a path")?;
                options.config = Some(expand_path(path));
            }
            "--log" => {
                let path = iter.next().context("--log requires a path")?;
                options.log = Some(expand_path(path));
            }
            other => anyhow::bail!("unknown argument: {}", other),
        }
    }
    Ok(options)
}

/// rawモードを抜けるためのガード
struct RawModeGuard;

impl RawModeGuard {
    fn enable() -> Result<Self> {
        terminal::enable_raw_mode().context("failed to enable raw mode")?;
        Ok(Self)
    }
}

impl Drop for RawModeGuard {
    fn drop(&mut self) {
        let _ = terminal::disable_raw_mode();
    }
}

fn main() -> Result<()> {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let options = parse_args(&args)?;

    let logger = match &options.log {
        Some(path) => FileLogger::new(LevelFilter::Debug).with_file_output(path),
        None => FileLogger::new(LevelFilter::Warn),
    };
    logger
        .install()
        .map_err(|e| anyhow::anyhow!("failed to install logger: {}", e))?;

    let config = match &options.config {
        Some(path) => ReaderConfig::load(path)?,
        None => ReaderConfig::load_default()?,
    };

    let mut reader = LineReader::new(CrosstermKeySource::new())
        .with_display(TerminalDisplay::stdout())
        .with_completer(StringsCompleter::new(COMMANDS.iter().copied()));
    if options.vi {
        reader = reader.with_editing_mode("vi");
    }
    config.apply(&mut reader)?;

    println!("altre-readline {}", env!("CARGO_PKG_VERSION"));
    run_repl(&mut reader)
}

fn run_repl(reader: &mut LineReader) -> Result<()> {
    loop {
        let line = {
            let _raw = RawModeGuard::enable()?;
            reader.read_line("altre> ")
        };
        let line = match line {
            Ok(line) => line,
            Err(ReadlineError::Interrupted) => {
                println!("^C");
                continue;
            }
            Err(ReadlineError::EndOfInput) => break,
            Err(err) => return Err(err.into()),
        };

        match line.trim() {
            "exit" | "quit" => break,
            "history" => {
                let history = reader.history();
                for index in 0..history.len() {
                    if let Some(entry) = history.entry(index) {
                        println!("{:>4}  {}", index + 1, entry);
                    }
                }
            }
            "help" => println!("commands: {}", COMMANDS.join(" ")),
            _ => println!("{}", line),
        }
        std::io::stdout().flush()?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_parse_args() {
        let parsed = parse_args(&args(&["--vi", "--config", "/tmp/r.json"])).unwrap();
        assert!(parsed.vi);
        assert_eq!(parsed.config, Some(PathBuf::from("/tmp/r.json")));
        assert!(parsed.log.is_none());
    }

    #[test]
    fn test_parse_args_errors() {
        assert!(parse_args(&args(&["--log"])).is_err());
        assert!(parse_args(&args(&["--bogus"])).is_err());
    }
}
