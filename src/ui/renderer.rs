//! 画面描画
//!
//! 一覧画面とエディタ画面を ratatui のフレームへ描く。状態は持たない。

use crate::app::{App, Mode};
use crate::editor::{draw_text, EditSession};
use crate::error::StatusMessage;
use crate::notebook::{todo_stats, todo::preview_line};
use crate::ui::surface::BufferSurface;
use crate::ui::theme::{ComponentType, Theme};
use ratatui::{
    layout::{Alignment, Constraint, Layout, Position, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph},
    Frame,
};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// これより小さい端末では描画しない
pub const MIN_WIDTH: u16 = 40;
pub const MIN_HEIGHT: u16 = 10;

const APP_TITLE: &str = "Shellpad";
const SELECTED_MARKER: &str = "→ ";
const UNSELECTED_MARKER: &str = "  ";
const MIN_LIST_WIDTH: u16 = 28;

const HELP_LINES: &[&str] = &[
    "j / Down     next note",
    "k / Up       previous note",
    "a            add note",
    "o / Enter    open note in editor",
    "y            copy note (internal)",
    "p            paste copy as new note, or clipboard into note",
    "Y            copy note body to clipboard",
    "r            rename note",
    "d            delete note",
    "[ / ]        move note up / down",
    "?            this help",
    "q            quit",
    "",
    "Editor: Esc save & exit, Ctrl+Z undo, Ctrl+R redo,",
    "Ctrl+V paste, Ctrl+W delete word, Ctrl+O show link",
];

pub fn is_too_small(area: Rect) -> bool {
    area.width < MIN_WIDTH || area.height < MIN_HEIGHT
}

fn render_too_small(frame: &mut Frame<'_>, area: Rect, theme: &Theme) {
    let message = Paragraph::new("Terminal too small")
        .alignment(Alignment::Center)
        .style(theme.style(ComponentType::Warning));
    let row = Rect::new(area.x, area.y + area.height / 2, area.width, area.height.min(1));
    frame.render_widget(message, row);
}

/// 表示幅が `max_width` に収まるよう切り詰め、切った場合は末尾を `…` にする
pub fn truncate_to_width(text: &str, max_width: usize) -> String {
    if text.width() <= max_width {
        return text.to_string();
    }
    if max_width == 0 {
        return String::new();
    }

    let mut result = String::new();
    let mut used = 0;
    for ch in text.chars() {
        let ch_width = ch.width().unwrap_or(0);
        if used + ch_width > max_width - 1 {
            break;
        }
        used += ch_width;
        result.push(ch);
    }
    result.push('…');
    result
}

fn panel_block<'a>(title: impl Into<Line<'a>>, theme: &Theme) -> Block<'a> {
    Block::default()
        .borders(Borders::ALL)
        .border_type(theme.border_type)
        .border_style(theme.style(ComponentType::Border))
        .title(title)
        .title_style(theme.style(ComponentType::PanelTitle))
}

fn header(text: &str, theme: &Theme) -> Paragraph<'static> {
    Paragraph::new(text.to_string())
        .alignment(Alignment::Center)
        .style(theme.style(ComponentType::Header))
}

/// 一覧画面
pub fn render_app(frame: &mut Frame<'_>, app: &App) {
    let theme = Theme::default();
    let area = frame.area();
    if is_too_small(area) {
        render_too_small(frame, area, &theme);
        return;
    }

    let [header_area, body_area, status_area] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Min(0),
        Constraint::Length(1),
    ])
    .areas(area);
    let list_width = (area.width / 3).max(MIN_LIST_WIDTH) + 1;
    let [list_area, preview_area] =
        Layout::horizontal([Constraint::Length(list_width), Constraint::Min(0)]).areas(body_area);

    frame.render_widget(header(APP_TITLE, &theme), header_area);
    render_note_list(frame, list_area, app, &theme);
    render_preview(frame, preview_area, app, &theme);

    match app.mode() {
        Mode::Prompt(prompt) => render_prompt(frame, status_area, &prompt.label, &prompt.input, &theme),
        _ => {
            let status = Paragraph::new(app.status().to_string())
                .style(theme.style(ComponentType::StatusLine));
            frame.render_widget(status, status_area);
        }
    }

    if *app.mode() == Mode::Help {
        render_help(frame, area, &theme);
    }
}

fn render_note_list(frame: &mut Frame<'_>, area: Rect, app: &App, theme: &Theme) {
    let block = panel_block(format!(" Notes ({}) ", app.notebook().len()), theme);
    let title_width = usize::from(area.width.saturating_sub(2)).saturating_sub(SELECTED_MARKER.width());

    let items: Vec<ListItem<'_>> = app
        .notebook()
        .notes()
        .iter()
        .enumerate()
        .map(|(index, note)| {
            let selected = index == app.selected();
            let marker = if selected { SELECTED_MARKER } else { UNSELECTED_MARKER };
            let style = if selected {
                theme.style(ComponentType::ListSelected)
            } else {
                theme.style(ComponentType::ListItem)
            };
            let text = format!("{}{}", marker, truncate_to_width(&note.title, title_width));
            ListItem::new(Line::styled(text, style))
        })
        .collect();

    let mut state = ListState::default();
    if !app.notebook().is_empty() {
        state.select(Some(app.selected()));
    }
    frame.render_stateful_widget(List::new(items).block(block), area, &mut state);
}

fn render_preview(frame: &mut Frame<'_>, area: Rect, app: &App, theme: &Theme) {
    let Some(note) = app.selected_note() else {
        frame.render_widget(panel_block(" Preview ", theme), area);
        return;
    };

    let (done, total) = todo_stats(&note.body);
    let title = if total > 0 {
        format!(" Preview [{}/{}] ", done, total)
    } else {
        " Preview ".to_string()
    };
    let block = panel_block(title, theme);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let width = usize::from(inner.width);
    let height = usize::from(inner.height);
    if width == 0 || height == 0 {
        return;
    }

    let config = app.config();
    let mut lines: Vec<Line<'static>> = Vec::new();
    for body_line in note.body.lines() {
        let (text, is_done) = preview_line(body_line, &config.doing_symbol, &config.done_symbol);
        let style = if is_done {
            theme.style(ComponentType::DoneTodo)
        } else {
            theme.style(ComponentType::Preview)
        };
        for (_, chunk) in crate::editor::layout::chunk_line_cells(&text, width) {
            lines.push(Line::styled(chunk, style));
        }
    }
    if lines.len() > height {
        lines.truncate(height);
        lines[height - 1] = Line::styled("...", theme.style(ComponentType::Preview));
    }

    frame.render_widget(Paragraph::new(lines), inner);
}

fn render_prompt(frame: &mut Frame<'_>, area: Rect, label: &str, input: &str, theme: &Theme) {
    frame.render_widget(Clear, area);
    let line = Line::from(vec![
        Span::styled(label.to_string(), theme.style(ComponentType::Prompt)),
        Span::raw(input.to_string()),
    ]);
    frame.render_widget(Paragraph::new(line), area);

    let column = (label.width() + input.width()).min(usize::from(area.width.saturating_sub(1)));
    let column = u16::try_from(column).unwrap_or(0);
    frame.set_cursor_position(Position::new(area.x + column, area.y));
}

fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect::new(
        area.x + (area.width - width) / 2,
        area.y + (area.height - height) / 2,
        width,
        height,
    )
}

fn render_help(frame: &mut Frame<'_>, area: Rect, theme: &Theme) {
    let popup = centered(
        area,
        area.width.saturating_sub(8).min(80),
        area.height.saturating_sub(4).min(24),
    );
    frame.render_widget(Clear, popup);

    let mut lines: Vec<Line<'static>> = HELP_LINES.iter().map(|line| Line::raw(*line)).collect();
    lines.push(Line::raw(""));
    lines.push(Line::styled(
        "Press any key to close...",
        theme.style(ComponentType::StatusLine),
    ));
    let help = Paragraph::new(lines).block(panel_block(" Help ", theme));
    frame.render_widget(help, popup);
}

/// エディタ画面
pub fn render_editor(frame: &mut Frame<'_>, session: &EditSession) {
    let theme = Theme::default();
    let area = frame.area();
    if is_too_small(area) {
        render_too_small(frame, area, &theme);
        return;
    }

    let [header_area, box_row, status_area] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Min(0),
        Constraint::Length(1),
    ])
    .areas(area);
    let [_, box_area, _] = Layout::horizontal([
        Constraint::Length(1),
        Constraint::Min(0),
        Constraint::Length(1),
    ])
    .areas(box_row);

    frame.render_widget(header(&format!(" {} ", session.title()), &theme), header_area);

    let block = panel_block(" Esc: save & exit ", &theme);
    let inner = block.inner(box_area);
    frame.render_widget(block, box_area);

    // 左右に1桁ずつ余白
    let text_area = Rect::new(
        inner.x.saturating_add(1),
        inner.y,
        inner.width.saturating_sub(2),
        inner.height,
    );
    let cursor = {
        let mut surface = BufferSurface::new(frame.buffer_mut(), text_area)
            .with_style(theme.style(ComponentType::Preview));
        draw_text(session.buffer(), session.config().wrap_lines, &mut surface);
        surface.cursor()
    };
    if let Some(position) = cursor {
        frame.set_cursor_position(position);
    }

    let status = match session.status() {
        Some(StatusMessage { text, level, .. }) => {
            Paragraph::new(text.clone()).style(theme.message_style(*level))
        }
        None => Paragraph::new(session.stats().to_string())
            .style(theme.style(ComponentType::StatusLine)),
    };
    frame.render_widget(status, status_area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clipboard::MemoryClipboard;
    use crate::config::Config;
    use crate::editor::SessionConfig;
    use crate::notebook::Note;
    use ratatui::{backend::TestBackend, buffer::Buffer, Terminal};
    use std::fs;
    use tempfile::tempdir;

    fn screen_text(buffer: &Buffer) -> String {
        let area = buffer.area;
        (0..area.height)
            .map(|y| {
                (0..area.width)
                    .map(|x| buffer[(x, y)].symbol().to_string())
                    .collect::<String>()
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[test]
    fn truncation_respects_display_width() {
        assert_eq!(truncate_to_width("short", 10), "short");
        assert_eq!(truncate_to_width("abcdefgh", 5), "abcd…");
        assert_eq!(truncate_to_width("日本語のノート", 7), "日本語…");
        assert_eq!(truncate_to_width("abc", 0), "");
    }

    #[test]
    fn tiny_terminal_shows_warning() {
        let session = EditSession::new(&Note::new("T", "body"), SessionConfig::default());
        let mut terminal = Terminal::new(TestBackend::new(30, 8)).unwrap();
        terminal.draw(|frame| render_editor(frame, &session)).unwrap();
        assert!(screen_text(terminal.backend().buffer()).contains("Terminal too small"));
    }

    #[test]
    fn editor_shows_title_body_and_stats() {
        let note = Note::new("Groceries", "milk\neggs");
        let session = EditSession::new(&note, SessionConfig::default());
        let mut terminal = Terminal::new(TestBackend::new(50, 12)).unwrap();
        terminal.draw(|frame| render_editor(frame, &session)).unwrap();

        let text = screen_text(terminal.backend().buffer());
        assert!(text.contains("Groceries"));
        assert!(text.contains("milk"));
        assert!(text.contains("eggs"));
        assert!(text.contains("Lines:2 | Words:2 | Chars:9"));
    }

    #[test]
    fn list_marks_selection_and_previews_todos() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("notes.md");
        fs::write(&path, "# Todo\n[ ] buy milk\n[x] call mom\n\n# Other\n").unwrap();
        let config = Config {
            notebook_file: path,
            ..Config::default()
        };
        let app = App::new(config, Box::new(MemoryClipboard::new())).unwrap();

        let mut terminal = Terminal::new(TestBackend::new(80, 16)).unwrap();
        terminal.draw(|frame| render_app(frame, &app)).unwrap();

        let text = screen_text(terminal.backend().buffer());
        assert!(text.contains("→ Todo"));
        assert!(text.contains("  Other"));
        assert!(text.contains("+ buy milk"));
        assert!(text.contains("- call mom"));
        assert!(text.contains("Preview [1/2]"));
        assert!(text.contains("Welcome to Shellpad!"));
    }
}
