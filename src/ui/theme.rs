//! テーマ
//!
//! 画面要素ごとの配色。16色端末でも読めるよう名前付きの色だけを使う。

use crate::error::MessageLevel;
use ratatui::{
    style::{Color, Modifier, Style},
    widgets::BorderType,
};

/// UIコンポーネントの種類
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ComponentType {
    /// 画面上端の見出し
    Header,
    /// 枠のタイトル
    PanelTitle,
    /// ノート一覧の項目
    ListItem,
    /// 選択中の項目
    ListSelected,
    /// プレビュー本文
    Preview,
    /// 完了済み todo
    DoneTodo,
    /// ステータスライン
    StatusLine,
    /// プロンプト
    Prompt,
    /// 枠線
    Border,
    Warning,
    Error,
}

/// テーマ設定
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Theme {
    pub border_type: BorderType,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            border_type: BorderType::Rounded,
        }
    }
}

impl Theme {
    /// 特定のコンポーネントのスタイルを取得
    pub fn style(&self, component: ComponentType) -> Style {
        let base = Style::default();
        match component {
            ComponentType::Header => base.fg(Color::Magenta).add_modifier(Modifier::BOLD),
            ComponentType::PanelTitle => base.fg(Color::White).add_modifier(Modifier::BOLD),
            ComponentType::ListItem => base.fg(Color::Cyan),
            ComponentType::ListSelected => base.fg(Color::Cyan).add_modifier(Modifier::BOLD),
            ComponentType::Preview => base,
            ComponentType::DoneTodo => base.fg(Color::Green).add_modifier(Modifier::DIM),
            ComponentType::StatusLine => base.fg(Color::Yellow),
            ComponentType::Prompt => base.fg(Color::Cyan),
            ComponentType::Border => base.fg(Color::Gray),
            ComponentType::Warning => base.fg(Color::Yellow).add_modifier(Modifier::BOLD),
            ComponentType::Error => base.fg(Color::Red).add_modifier(Modifier::BOLD),
        }
    }

    /// ステータスメッセージのレベルに応じたスタイル
    pub fn message_style(&self, level: MessageLevel) -> Style {
        match level {
            MessageLevel::Info => self.style(ComponentType::StatusLine),
            MessageLevel::Warning => self.style(ComponentType::Warning),
            MessageLevel::Error => self.style(ComponentType::Error),
        }
    }
}
