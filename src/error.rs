//! エラーハンドリングシステム
//!
//! shellpad 全体で使用される統一エラー型と、ステータス行に出す一時メッセージを定義する。
//! 致命的でないエラー（クリップボード、保存失敗など）はメッセージとして表示し、編集を継続する。

use std::time::{Duration, Instant};
use thiserror::Error;

/// ステータスメッセージの表示時間
const STATUS_LIFETIME: Duration = Duration::from_secs(4);

/// アプリケーション全体のエラー型
#[derive(Error, Debug, Clone)]
pub enum ShellpadError {
    /// ファイル操作エラー
    #[error("File operation failed: {0}")]
    File(#[from] FileError),

    /// ノートブック操作エラー
    #[error("Notebook operation failed: {0}")]
    Notebook(#[from] NotebookError),

    /// 設定エラー
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// UI操作エラー
    #[error("UI operation failed: {0}")]
    Ui(#[from] UiError),
}

/// ファイル操作固有のエラー
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FileError {
    #[error("File not found: {path}")]
    NotFound { path: String },

    #[error("Permission denied: {path}")]
    PermissionDenied { path: String },

    #[error("Invalid path: {path}")]
    InvalidPath { path: String },

    #[error("Encoding error: {message}")]
    Encoding { message: String },

    #[error("IO error: {message}")]
    Io { message: String },
}

/// ノートブック操作固有のエラー
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NotebookError {
    #[error("No note at index {index}")]
    NoSuchNote { index: usize },

    #[error("Note title must not be empty")]
    EmptyTitle,
}

/// 設定固有のエラー
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Invalid configuration file: {path}")]
    InvalidFile { path: String },

    #[error("Invalid value for {key}: {value}")]
    InvalidValue { key: String, value: String },
}

/// UI操作固有のエラー
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum UiError {
    #[error("Terminal initialization failed")]
    TerminalInit,

    #[error("Rendering failed: {component}")]
    RenderingFailed { component: String },
}

/// メッセージレベル分類
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageLevel {
    Info,
    Warning,
    Error,
}

/// ステータス行に表示する一時メッセージ
#[derive(Debug, Clone)]
pub struct StatusMessage {
    /// 表示テキスト
    pub text: String,
    /// レベル
    pub level: MessageLevel,
    /// 表示開始時刻
    pub start_time: Instant,
    /// 表示持続時間
    pub duration: Duration,
}

impl StatusMessage {
    pub fn info(text: impl Into<String>) -> Self {
        Self::with_level(text, MessageLevel::Info)
    }

    pub fn warning(text: impl Into<String>) -> Self {
        Self::with_level(text, MessageLevel::Warning)
    }

    pub fn from_error(error: &ShellpadError) -> Self {
        let (text, level) = Self::format_error(error);
        Self::with_level(text, level)
    }

    fn with_level(text: impl Into<String>, level: MessageLevel) -> Self {
        Self {
            text: text.into(),
            level,
            start_time: Instant::now(),
            duration: STATUS_LIFETIME,
        }
    }

    fn format_error(error: &ShellpadError) -> (String, MessageLevel) {
        match error {
            ShellpadError::File(FileError::PermissionDenied { path }) => {
                (format!("Permission denied: {}", path), MessageLevel::Error)
            }
            ShellpadError::File(FileError::Io { message }) => {
                (format!("Save failed: {}", message), MessageLevel::Error)
            }
            ShellpadError::Notebook(NotebookError::EmptyTitle) => {
                ("Title must not be empty".to_string(), MessageLevel::Warning)
            }
            ShellpadError::Notebook(NotebookError::NoSuchNote { .. }) => {
                ("No note selected".to_string(), MessageLevel::Warning)
            }
            _ => (format!("Error: {}", error), MessageLevel::Error),
        }
    }

    pub fn is_expired(&self) -> bool {
        self.start_time.elapsed() >= self.duration
    }
}

/// パニックハンドラの設定
///
/// 端末を raw モードのまま残すと入力できなくなるため、出力前に復元する。
pub fn setup_panic_handler() {
    let default_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        crate::frontend::restore_terminal();

        let location = panic_info
            .location()
            .map(|loc| format!("{}:{}", loc.file(), loc.line()))
            .unwrap_or_else(|| "unknown location".to_string());

        let message = if let Some(s) = panic_info.payload().downcast_ref::<&str>() {
            s
        } else if let Some(s) = panic_info.payload().downcast_ref::<String>() {
            s
        } else {
            "Unknown panic payload"
        };

        log::error!("panic at {}: {}", location, message);
        default_hook(panic_info);
    }));
}

/// プロジェクト標準のResult型
pub type Result<T> = std::result::Result<T, ShellpadError>;

// std::io::Error から ShellpadError への変換
impl From<std::io::Error> for ShellpadError {
    fn from(error: std::io::Error) -> Self {
        ShellpadError::File(FileError::Io {
            message: error.to_string(),
        })
    }
}

// UTF-8エラーの変換
impl From<std::str::Utf8Error> for ShellpadError {
    fn from(error: std::str::Utf8Error) -> Self {
        ShellpadError::File(FileError::Encoding {
            message: format!("invalid UTF-8 after byte {}", error.valid_up_to()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_message_from_io_error() {
        let error: ShellpadError = std::io::Error::new(std::io::ErrorKind::Other, "disk full").into();
        let message = StatusMessage::from_error(&error);

        assert_eq!(message.level, MessageLevel::Error);
        assert!(message.text.contains("disk full"));
        assert!(!message.is_expired());
    }

    #[test]
    fn status_message_expiry() {
        let mut message = StatusMessage::info("Saved");
        assert!(!message.is_expired());

        // 時間経過をシミュレート
        message.start_time = Instant::now() - Duration::from_secs(5);
        assert!(message.is_expired());
    }

    #[test]
    fn utf8_error_conversion() {
        let bytes = [b'a', 0xff, 0xfe];
        let utf8_error = std::str::from_utf8(&bytes).unwrap_err();
        let error: ShellpadError = utf8_error.into();

        match error {
            ShellpadError::File(FileError::Encoding { message }) => {
                assert!(message.contains('1'));
            }
            other => panic!("Expected Encoding error, got {other:?}"),
        }
    }
}
