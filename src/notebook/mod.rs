//! ノートブックモジュール
//!
//! ノートの並びとその永続化（単一テキストファイル）を扱う。

pub mod store;
pub mod todo;

pub use store::{parse_notebook, serialize_notebook, NotebookStore};
pub use todo::{classify_line, todo_stats, TodoLine};

use crate::error::{NotebookError, Result};

/// 初回起動時のノートタイトル
pub const WELCOME_TITLE: &str = "Welcome to Shellpad";
/// 初回起動時のノート本文
pub const WELCOME_BODY: &str = "This is your first note.\n\n[ ] Try a todo\n[x] Done task";

/// タイトル付きのテキストブロック
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Note {
    pub title: String,
    pub body: String,
}

impl Note {
    pub fn new(title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            body: body.into(),
        }
    }

    /// ノートファイルが無いときに作るノート
    pub fn welcome() -> Self {
        Self::new(WELCOME_TITLE, WELCOME_BODY)
    }
}

/// 順序付きのノート集合
///
/// 並び順がそのまま表示順・保存順になる。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Notebook {
    notes: Vec<Note>,
}

impl Notebook {
    pub fn new(notes: Vec<Note>) -> Self {
        Self { notes }
    }

    pub fn notes(&self) -> &[Note] {
        &self.notes
    }

    pub fn len(&self) -> usize {
        self.notes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.notes.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Note> {
        self.notes.get(index)
    }

    /// 末尾に追加し、そのインデックスを返す
    pub fn add(&mut self, note: Note) -> usize {
        self.notes.push(note);
        self.notes.len() - 1
    }

    pub fn rename(&mut self, index: usize, title: &str) -> Result<()> {
        let title = title.trim();
        if title.is_empty() {
            return Err(NotebookError::EmptyTitle.into());
        }
        self.note_mut(index)?.title = title.to_string();
        Ok(())
    }

    pub fn remove(&mut self, index: usize) -> Result<Note> {
        self.check_index(index)?;
        Ok(self.notes.remove(index))
    }

    /// 本文を置き換える（編集セッションからの書き戻し）
    pub fn set_body(&mut self, index: usize, body: &str) -> Result<()> {
        let note = self.note_mut(index)?;
        *note = Note::new(note.title.clone(), body);
        Ok(())
    }

    /// 一つ上と入れ替える。移動後のインデックスを返す
    pub fn move_up(&mut self, index: usize) -> Result<usize> {
        self.check_index(index)?;
        if index == 0 {
            return Ok(index);
        }
        self.notes.swap(index, index - 1);
        Ok(index - 1)
    }

    /// 一つ下と入れ替える。移動後のインデックスを返す
    pub fn move_down(&mut self, index: usize) -> Result<usize> {
        self.check_index(index)?;
        if index + 1 >= self.notes.len() {
            return Ok(index);
        }
        self.notes.swap(index, index + 1);
        Ok(index + 1)
    }

    /// タイトルで検索（大文字小文字を区別しない、最初の一致）
    pub fn position_by_title(&self, title: &str) -> Option<usize> {
        let wanted = title.trim().to_lowercase();
        if wanted.is_empty() {
            return None;
        }
        self.notes
            .iter()
            .position(|note| note.title.to_lowercase() == wanted)
    }

    fn note_mut(&mut self, index: usize) -> Result<&mut Note> {
        self.notes
            .get_mut(index)
            .ok_or_else(|| NotebookError::NoSuchNote { index }.into())
    }

    fn check_index(&self, index: usize) -> Result<()> {
        if index < self.notes.len() {
            Ok(())
        } else {
            Err(NotebookError::NoSuchNote { index }.into())
        }
    }
}
