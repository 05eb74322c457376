//! shellpad - terminal notebook
//!
//! `# タイトル` 区切りの Markdown ファイルにノートを保存する、端末向けのノート帳

// コアモジュール
pub mod config;
pub mod error;
pub mod frontend;
pub mod logging;

// データ層
pub mod notebook;

// 編集層
pub mod editor;

// ロジック層
pub mod app;
pub mod clipboard;
pub mod input;

// 表示層
pub mod ui;

// 公開API
pub use app::{App, AppAction};
pub use config::Config;
pub use editor::{EditSession, EditorCommand, SessionConfig, SessionHost, TextBuffer, UndoHistory};
pub use error::{Result, ShellpadError};
pub use frontend::TuiApplication;
pub use notebook::{Note, Notebook, NotebookStore};
