//! クリップボード機能
//!
//! コアは取得・設定ができることだけを前提とし、失敗しても編集は続ける。

use std::cell::RefCell;

/// クリップボード
pub trait Clipboard {
    /// 内容を取得する（利用できなければ空文字列）
    fn paste(&self) -> String;

    /// 内容を設定する。成功したかどうかを返す
    fn copy(&self, text: &str) -> bool;
}

/// プロセス内だけで共有するクリップボード
#[derive(Debug, Default)]
pub struct MemoryClipboard {
    content: RefCell<String>,
}

impl MemoryClipboard {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Clipboard for MemoryClipboard {
    fn paste(&self) -> String {
        self.content.borrow().clone()
    }

    fn copy(&self, text: &str) -> bool {
        *self.content.borrow_mut() = text.to_string();
        true
    }
}

/// 常に利用できないクリップボード
#[derive(Debug, Default, Clone, Copy)]
pub struct UnavailableClipboard;

impl Clipboard for UnavailableClipboard {
    fn paste(&self) -> String {
        String::new()
    }

    fn copy(&self, _text: &str) -> bool {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_clipboard_round_trip() {
        let clipboard = MemoryClipboard::new();
        assert_eq!(clipboard.paste(), "");
        assert!(clipboard.copy("note body"));
        assert_eq!(clipboard.paste(), "note body");
    }

    #[test]
    fn unavailable_clipboard_degrades() {
        let clipboard = UnavailableClipboard;
        assert!(!clipboard.copy("x"));
        assert!(clipboard.paste().is_empty());
    }
}
