//! ロギングシステム
//!
//! 端末は UI が占有しているため、`log` ファサードの出力は JSON Lines 形式でファイルへ書き出す。

use log::{LevelFilter, Log, Metadata, Record};
use serde::Serialize;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::{SystemTime, UNIX_EPOCH};

/// ログレベルを指定する環境変数
pub const LOG_LEVEL_ENV: &str = "SHELLPAD_LOG";

/// ログファイル名
pub const LOG_FILE_NAME: &str = "shellpad.log";

/// 1行分のログレコード
#[derive(Debug, Serialize)]
struct LogRecord<'a> {
    level: &'a str,
    target: &'a str,
    ts: u128,
    message: String,
}

/// ファイル出力ロガー
#[derive(Debug)]
pub struct FileLogger {
    level: LevelFilter,
    path: PathBuf,
    // 複数スレッドからの書き込みで行が混ざらないようにする
    lock: Mutex<()>,
}

impl FileLogger {
    pub fn new<P: Into<PathBuf>>(path: P, level: LevelFilter) -> Self {
        Self {
            level,
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    /// ログファイルのパス
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// ログレベル
    pub fn level(&self) -> LevelFilter {
        self.level
    }

    fn format_line(record: &Record<'_>) -> Option<String> {
        let entry = LogRecord {
            level: record.level().as_str(),
            target: record.target(),
            ts: timestamp_ms(),
            message: record.args().to_string(),
        };
        serde_json::to_string(&entry).ok()
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
        let Some(line) = Self::format_line(record) else {
            return;
        };

        let _guard = self.lock.lock();
        if let Ok(mut file) = OpenOptions::new().create(true).append(true).open(&self.path) {
            let _ = writeln!(file, "{}", line);
        }
    }

    fn flush(&self) {}
}

/// 環境変数の値からログレベルを解決する（未指定・不正値は warn）
pub fn level_from_env(value: Option<&str>) -> LevelFilter {
    match value.map(|v| v.trim().to_ascii_lowercase()).as_deref() {
        Some("off") => LevelFilter::Off,
        Some("error") => LevelFilter::Error,
        Some("info") => LevelFilter::Info,
        Some("debug") => LevelFilter::Debug,
        Some("trace") => LevelFilter::Trace,
        _ => LevelFilter::Warn,
    }
}

/// グローバルロガーを登録する
///
/// 既に登録済みの場合は何もしない。
pub fn init(path: &Path, level: LevelFilter) {
    if level == LevelFilter::Off {
        return;
    }
    if let Some(parent) = path.parent() {
        let _ = std::fs::create_dir_all(parent);
    }
    let logger = FileLogger::new(path, level);
    if log::set_boxed_logger(Box::new(logger)).is_ok() {
        log::set_max_level(level);
    }
}

fn timestamp_ms() -> u128 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|dur| dur.as_millis())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn level_parsing_defaults_to_warn() {
        assert_eq!(level_from_env(None), LevelFilter::Warn);
        assert_eq!(level_from_env(Some("bogus")), LevelFilter::Warn);
        assert_eq!(level_from_env(Some(" DEBUG ")), LevelFilter::Debug);
        assert_eq!(level_from_env(Some("off")), LevelFilter::Off);
    }

    #[test]
    fn logger_writes_json_lines_and_respects_level() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("test.log");
        let logger = FileLogger::new(&path, LevelFilter::Info);

        logger.log(
            &Record::builder()
                .level(log::Level::Info)
                .target("shellpad::test")
                .args(format_args!("saved {} notes", 3))
                .build(),
        );
        logger.log(
            &Record::builder()
                .level(log::Level::Debug)
                .target("shellpad::test")
                .args(format_args!("hidden"))
                .build(),
        );

        let content = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 1);

        let value: serde_json::Value = serde_json::from_str(lines[0]).unwrap();
        assert_eq!(value["level"], "INFO");
        assert_eq!(value["message"], "saved 3 notes");
        assert_eq!(value["target"], "shellpad::test");
    }
}
