//! エディタモジュール
//!
//! ノート本文を編集するためのバッファ、履歴、表示レイアウト、セッション

pub mod history;
pub mod layout;
pub mod session;
pub mod text_buffer;
pub mod view;

// 公開API
pub use history::{Snapshot, UndoHistory, DEFAULT_HISTORY_CAPACITY};
pub use layout::{VisualCursor, VisualLayout, VisualSegment};
pub use session::{
    CommandSource, EditSession, EditorCommand, SessionConfig, SessionHost, SessionOutcome,
    SessionStats,
};
pub use text_buffer::{CursorPosition, TextBuffer};
pub use view::draw_text;
