//! キーバインド
//!
//! crossterm のキーイベントを一覧画面・プロンプト・エディタそれぞれのコマンドへ変換する。

use crate::editor::EditorCommand;
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

/// 一覧画面のコマンド
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListCommand {
    Quit,
    Next,
    Previous,
    Add,
    Open,
    CopyInternal,
    Paste,
    CopyToClipboard,
    Rename,
    Delete,
    Help,
    MoveUp,
    MoveDown,
}

/// プロンプト入力のコマンド
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptCommand {
    Submit,
    Cancel,
    Backspace,
    Char(char),
}

fn is_press(key: &KeyEvent) -> bool {
    key.kind != KeyEventKind::Release
}

fn is_ctrl(key: &KeyEvent) -> bool {
    key.modifiers.contains(KeyModifiers::CONTROL)
}

/// 挿入可能な文字かどうか（Ctrl / Alt 付きは除く）
fn insertable(key: &KeyEvent) -> Option<char> {
    match key.code {
        KeyCode::Char(ch)
            if !key
                .modifiers
                .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT)
                && !ch.is_control() =>
        {
            Some(ch)
        }
        _ => None,
    }
}

pub fn list_command(key: &KeyEvent) -> Option<ListCommand> {
    if !is_press(key) || is_ctrl(key) {
        return None;
    }
    let command = match key.code {
        KeyCode::Char('q') => ListCommand::Quit,
        KeyCode::Char('j') | KeyCode::Down => ListCommand::Next,
        KeyCode::Char('k') | KeyCode::Up => ListCommand::Previous,
        KeyCode::Char('a') => ListCommand::Add,
        KeyCode::Char('o') | KeyCode::Enter => ListCommand::Open,
        KeyCode::Char('y') => ListCommand::CopyInternal,
        KeyCode::Char('p') => ListCommand::Paste,
        KeyCode::Char('Y') => ListCommand::CopyToClipboard,
        KeyCode::Char('r') => ListCommand::Rename,
        KeyCode::Char('d') => ListCommand::Delete,
        KeyCode::Char('?') => ListCommand::Help,
        KeyCode::Char('[') => ListCommand::MoveUp,
        KeyCode::Char(']') => ListCommand::MoveDown,
        _ => return None,
    };
    Some(command)
}

pub fn prompt_command(key: &KeyEvent) -> Option<PromptCommand> {
    if !is_press(key) {
        return None;
    }
    match key.code {
        KeyCode::Enter => Some(PromptCommand::Submit),
        KeyCode::Esc => Some(PromptCommand::Cancel),
        KeyCode::Backspace => Some(PromptCommand::Backspace),
        _ => insertable(key).map(PromptCommand::Char),
    }
}

pub fn editor_command(key: &KeyEvent) -> Option<EditorCommand> {
    if !is_press(key) {
        return None;
    }
    if is_ctrl(key) {
        return match key.code {
            KeyCode::Char('z') => Some(EditorCommand::Undo),
            KeyCode::Char('r') => Some(EditorCommand::Redo),
            KeyCode::Char('v') => Some(EditorCommand::Paste),
            KeyCode::Char('w') | KeyCode::Backspace => Some(EditorCommand::DeletePreviousWord),
            KeyCode::Char('o') => Some(EditorCommand::ShowLink),
            KeyCode::Char('h') => Some(EditorCommand::Backspace),
            _ => None,
        };
    }

    let command = match key.code {
        KeyCode::Esc => EditorCommand::Exit,
        KeyCode::Enter => EditorCommand::Newline,
        KeyCode::Backspace => EditorCommand::Backspace,
        KeyCode::Left => EditorCommand::Left,
        KeyCode::Right => EditorCommand::Right,
        KeyCode::Up => EditorCommand::Up,
        KeyCode::Down => EditorCommand::Down,
        KeyCode::Home => EditorCommand::Home,
        KeyCode::End => EditorCommand::End,
        _ => return insertable(key).map(|ch| EditorCommand::Insert(ch.to_string())),
    };
    Some(command)
}
