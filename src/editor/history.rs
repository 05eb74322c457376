//! 編集履歴（スナップショット方式）
//!
//! undo スタックの最上段は常に「現在の状態」。undo は最上段を redo へ移し、
//! 新しい最上段（一つ前の状態）を復元対象として返す。

use super::text_buffer::CursorPosition;
use std::collections::VecDeque;

/// 既定で保持する undo 可能な手数
pub const DEFAULT_HISTORY_CAPACITY: usize = 300;

/// バッファ全体とカーソルのコピー
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    pub lines: Vec<String>,
    pub cursor: CursorPosition,
}

/// undo / redo スタック
#[derive(Debug, Clone)]
pub struct UndoHistory {
    undo: VecDeque<Snapshot>,
    redo: Vec<Snapshot>,
    capacity: usize,
}

impl UndoHistory {
    /// 初期状態を1件積んだ履歴を作る
    pub fn new(initial: Snapshot) -> Self {
        Self::with_capacity(initial, DEFAULT_HISTORY_CAPACITY)
    }

    /// undo 可能な手数の上限を指定して作る（最低1）
    pub fn with_capacity(initial: Snapshot, capacity: usize) -> Self {
        let capacity = capacity.max(1);
        let mut undo = VecDeque::with_capacity(capacity.min(64) + 1);
        undo.push_back(initial);
        Self {
            undo,
            redo: Vec::new(),
            capacity,
        }
    }

    /// 変更後の状態を積む。redo は破棄される
    pub fn push(&mut self, snapshot: Snapshot) {
        self.undo.push_back(snapshot);
        // 現在状態の1件 + undo 可能な capacity 件
        while self.undo.len() > self.capacity + 1 {
            self.undo.pop_front();
        }
        self.redo.clear();
    }

    /// 一つ前の状態を返す。初期状態しか無ければ `None`
    pub fn undo(&mut self) -> Option<&Snapshot> {
        if self.undo.len() <= 1 {
            return None;
        }
        let current = self.undo.pop_back()?;
        self.redo.push(current);
        self.undo.back()
    }

    /// 取り消した状態を返す。redo が空なら `None`
    pub fn redo(&mut self) -> Option<&Snapshot> {
        let state = self.redo.pop()?;
        self.undo.push_back(state);
        self.undo.back()
    }

    pub fn can_undo(&self) -> bool {
        self.undo.len() > 1
    }

    pub fn can_redo(&self) -> bool {
        !self.redo.is_empty()
    }

    /// 現在 undo できる手数
    pub fn undo_depth(&self) -> usize {
        self.undo.len() - 1
    }

    pub fn redo_depth(&self) -> usize {
        self.redo.len()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// 現在の状態（undo スタックの最上段）
    pub fn current(&self) -> Option<&Snapshot> {
        self.undo.back()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snap(text: &str) -> Snapshot {
        Snapshot {
            lines: vec![text.to_string()],
            cursor: CursorPosition::new(0, text.chars().count()),
        }
    }

    #[test]
    fn undo_returns_previous_state() {
        let mut history = UndoHistory::new(snap(""));
        history.push(snap("a"));
        history.push(snap("ab"));

        assert_eq!(history.undo(), Some(&snap("a")));
        assert_eq!(history.undo(), Some(&snap("")));
        assert_eq!(history.undo(), None);
        assert_eq!(history.current(), Some(&snap("")));
    }

    #[test]
    fn redo_reapplies_in_order() {
        let mut history = UndoHistory::new(snap(""));
        history.push(snap("a"));
        history.push(snap("ab"));
        history.undo();
        history.undo();

        assert_eq!(history.redo(), Some(&snap("a")));
        assert_eq!(history.redo(), Some(&snap("ab")));
        assert_eq!(history.redo(), None);
    }

    #[test]
    fn push_clears_redo() {
        let mut history = UndoHistory::new(snap(""));
        history.push(snap("a"));
        history.undo();
        assert!(history.can_redo());

        history.push(snap("b"));
        assert!(!history.can_redo());
        assert_eq!(history.redo(), None);
    }

    #[test]
    fn capacity_drops_oldest() {
        let mut history = UndoHistory::with_capacity(snap(""), 3);
        for text in ["a", "ab", "abc", "abcd", "abcde"] {
            history.push(snap(text));
        }
        assert_eq!(history.undo_depth(), 3);

        assert_eq!(history.undo(), Some(&snap("abcd")));
        assert_eq!(history.undo(), Some(&snap("abc")));
        assert_eq!(history.undo(), Some(&snap("ab")));
        assert_eq!(history.undo(), None);
    }
}
