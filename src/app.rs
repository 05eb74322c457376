//! メインアプリケーション構造体
//!
//! ノート一覧画面の状態（選択、プロンプト、ヘルプ）を管理する。
//! ノートブックを変更した操作は、その場でファイルへ保存する。

use crate::clipboard::Clipboard;
use crate::config::Config;
use crate::editor::{EditSession, SessionHost};
use crate::error::{Result, ShellpadError, StatusMessage};
use crate::input::{list_command, prompt_command, ListCommand, PromptCommand};
use crate::notebook::{Note, Notebook, NotebookStore};
use crossterm::event::KeyEvent;

/// 起動直後のステータス
pub const WELCOME_STATUS: &str = "Welcome to Shellpad! Press ? for help";

/// プロンプトの用途
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PromptKind {
    NewNote,
    Rename { index: usize },
    PasteAs { default_title: String },
    ConfirmDelete { index: usize, title: String },
}

/// 1行入力の状態
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prompt {
    pub kind: PromptKind,
    pub label: String,
    pub input: String,
}

impl Prompt {
    fn new(kind: PromptKind, label: impl Into<String>) -> Self {
        Self {
            kind,
            label: label.into(),
            input: String::new(),
        }
    }
}

/// 画面モード
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mode {
    List,
    Prompt(Prompt),
    Help,
}

/// キー処理の結果としてフロントエンドに依頼する動作
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppAction {
    None,
    OpenEditor(usize),
    Quit,
}

/// ノート一覧アプリケーション
pub struct App {
    config: Config,
    store: NotebookStore,
    notebook: Notebook,
    clipboard: Box<dyn Clipboard>,
    selected: usize,
    status: String,
    internal_copy: Option<Note>,
    mode: Mode,
    running: bool,
}

impl App {
    /// 設定のノートブックファイルを読み込んで起動する
    pub fn new(config: Config, clipboard: Box<dyn Clipboard>) -> Result<Self> {
        let store = NotebookStore::new(&config.notebook_file);
        let notes = store.load()?;
        log::info!("opened {} with {} notes", store.path().display(), notes.len());
        Ok(Self {
            config,
            store,
            notebook: Notebook::new(notes),
            clipboard,
            selected: 0,
            status: WELCOME_STATUS.to_string(),
            internal_copy: None,
            mode: Mode::List,
            running: true,
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn notebook(&self) -> &Notebook {
        &self.notebook
    }

    pub fn selected(&self) -> usize {
        self.selected
    }

    pub fn selected_note(&self) -> Option<&Note> {
        self.notebook.get(self.selected)
    }

    pub fn status(&self) -> &str {
        &self.status
    }

    pub fn mode(&self) -> &Mode {
        &self.mode
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// `startup_note` に一致するノート
    pub fn startup_target(&self) -> Option<usize> {
        self.notebook.position_by_title(&self.config.startup_note)
    }

    /// キー入力を現在のモードに応じて処理する
    pub fn handle_key(&mut self, key: &KeyEvent) -> AppAction {
        match &self.mode {
            Mode::Help => {
                self.mode = Mode::List;
                self.status = "Help closed".to_string();
                AppAction::None
            }
            Mode::Prompt(_) => {
                if let Some(command) = prompt_command(key) {
                    self.prompt_input(command);
                }
                AppAction::None
            }
            Mode::List => match list_command(key) {
                Some(command) => self.execute(command),
                None => AppAction::None,
            },
        }
    }

    /// 一覧画面のコマンドを実行する
    pub fn execute(&mut self, command: ListCommand) -> AppAction {
        match command {
            ListCommand::Quit => {
                self.running = false;
                return AppAction::Quit;
            }
            ListCommand::Next => {
                if !self.notebook.is_empty() {
                    self.selected = (self.selected + 1).min(self.notebook.len() - 1);
                    self.announce_selection();
                }
            }
            ListCommand::Previous => {
                if !self.notebook.is_empty() {
                    self.selected = self.selected.saturating_sub(1);
                    self.announce_selection();
                }
            }
            ListCommand::Add => {
                self.mode = Mode::Prompt(Prompt::new(PromptKind::NewNote, "New note title: "));
            }
            ListCommand::Open => {
                if self.selected_note().is_some() {
                    return AppAction::OpenEditor(self.selected);
                }
            }
            ListCommand::CopyInternal => match self.selected_note().cloned() {
                Some(note) => {
                    self.status = format!("Copied '{}' (internal)", note.title);
                    self.internal_copy = Some(note);
                }
                None => self.status = "No notes to copy".to_string(),
            },
            ListCommand::Paste => self.paste(),
            ListCommand::CopyToClipboard => match self.selected_note() {
                Some(note) => {
                    self.status = if self.clipboard.copy(&note.body) {
                        format!("Copied '{}' to clipboard", note.title)
                    } else {
                        "Clipboard not available".to_string()
                    };
                }
                None => self.status = "No notes to copy".to_string(),
            },
            ListCommand::Rename => {
                if self.selected_note().is_some() {
                    let kind = PromptKind::Rename {
                        index: self.selected,
                    };
                    self.mode = Mode::Prompt(Prompt::new(kind, "Rename to: "));
                }
            }
            ListCommand::Delete => {
                if let Some(note) = self.selected_note() {
                    let label = format!("Delete '{}'? (y/N): ", note.title);
                    let kind = PromptKind::ConfirmDelete {
                        index: self.selected,
                        title: note.title.clone(),
                    };
                    self.mode = Mode::Prompt(Prompt::new(kind, label));
                }
            }
            ListCommand::Help => self.mode = Mode::Help,
            ListCommand::MoveUp => self.reorder(true),
            ListCommand::MoveDown => self.reorder(false),
        }
        AppAction::None
    }

    /// プロンプトへの入力
    pub fn prompt_input(&mut self, command: PromptCommand) {
        let Mode::Prompt(prompt) = &mut self.mode else {
            return;
        };
        match command {
            PromptCommand::Char(ch) => prompt.input.push(ch),
            PromptCommand::Backspace => {
                prompt.input.pop();
            }
            PromptCommand::Cancel => {
                let cancelled = std::mem::replace(&mut self.mode, Mode::List);
                if let Mode::Prompt(Prompt {
                    kind: PromptKind::PasteAs { .. },
                    ..
                }) = cancelled
                {
                    self.status = "Paste cancelled".to_string();
                }
            }
            PromptCommand::Submit => {
                if let Mode::Prompt(prompt) = std::mem::replace(&mut self.mode, Mode::List) {
                    self.submit(prompt);
                }
            }
        }
    }

    fn submit(&mut self, prompt: Prompt) {
        let input = prompt.input.trim();
        match prompt.kind {
            PromptKind::NewNote => {
                if input.is_empty() {
                    return;
                }
                self.selected = self.notebook.add(Note::new(input, ""));
                if self.persist() {
                    self.status = format!("Created '{}'", input);
                }
            }
            PromptKind::Rename { index } => {
                if input.is_empty() {
                    return;
                }
                match self.notebook.rename(index, input) {
                    Ok(()) => {
                        if self.persist() {
                            self.status = format!("Renamed to '{}'", input);
                        }
                    }
                    Err(err) => self.report(&err),
                }
            }
            PromptKind::PasteAs { default_title } => {
                let Some(copied) = self.internal_copy.clone() else {
                    return;
                };
                let title = if input.is_empty() {
                    default_title
                } else {
                    input.to_string()
                };
                self.selected = self.notebook.add(Note::new(title.clone(), copied.body));
                if self.persist() {
                    self.status = format!("Pasted as '{}'", title);
                }
            }
            PromptKind::ConfirmDelete { index, title } => {
                if !input.eq_ignore_ascii_case("y") {
                    self.status = "Delete cancelled".to_string();
                    return;
                }
                match self.notebook.remove(index) {
                    Ok(_) => {
                        self.selected = self.selected.min(self.notebook.len().saturating_sub(1));
                        if self.persist() {
                            self.status = format!("Deleted '{}'", title);
                        }
                    }
                    Err(err) => self.report(&err),
                }
            }
        }
    }

    fn paste(&mut self) {
        if let Some(copied) = &self.internal_copy {
            let default_title = format!("{}_copy1", copied.title);
            let label = format!("Paste as (name) [{}]: ", default_title);
            self.mode = Mode::Prompt(Prompt::new(PromptKind::PasteAs { default_title }, label));
            return;
        }

        let Some(note) = self.selected_note() else {
            self.status = "No notes to paste into".to_string();
            return;
        };
        let pasted = self.clipboard.paste();
        if pasted.is_empty() {
            self.status = "Clipboard empty or unavailable".to_string();
            return;
        }

        let body = format!("{}\n{}", note.body, pasted);
        let body = body.trim_start_matches('\n').to_string();
        match self.notebook.set_body(self.selected, &body) {
            Ok(()) => {
                if self.persist() {
                    self.status = "Pasted clipboard into note".to_string();
                }
            }
            Err(err) => self.report(&err),
        }
    }

    fn reorder(&mut self, up: bool) {
        if self.notebook.is_empty() {
            return;
        }
        let moved = if up {
            self.notebook.move_up(self.selected)
        } else {
            self.notebook.move_down(self.selected)
        };
        match moved {
            Ok(index) if index != self.selected => {
                self.selected = index;
                if self.persist() {
                    self.status = if up { "Moved up" } else { "Moved down" }.to_string();
                }
            }
            Ok(_) => {}
            Err(err) => self.report(&err),
        }
    }

    fn announce_selection(&mut self) {
        if let Some(note) = self.selected_note() {
            self.status = format!("Selected: {}", note.title);
        }
    }

    /// 編集セッションを開始する（ノートのコピーを渡す）
    pub fn begin_edit(&self, index: usize) -> Option<EditSession> {
        let note = self.notebook.get(index)?;
        log::debug!("opening editor for '{}'", note.title);
        Some(EditSession::new(note, self.config.session_config()))
    }

    /// 編集セッションの書き戻し先
    pub fn session_host(&mut self, index: usize) -> NoteWriter<'_> {
        NoteWriter {
            store: &self.store,
            notebook: &mut self.notebook,
            index,
            clipboard: self.clipboard.as_ref(),
        }
    }

    /// 編集セッション終了後の後処理
    pub fn finish_edit(&mut self, index: usize, result: Result<String>) {
        self.mode = Mode::List;
        match result {
            Ok(_) => {
                if let Some(note) = self.notebook.get(index) {
                    self.status = format!("Saved '{}'", note.title);
                }
            }
            Err(err) => self.report(&err),
        }
    }

    /// ノートブックを保存する。失敗時はステータスに表示して `false`
    fn persist(&mut self) -> bool {
        match self.store.save(self.notebook.notes()) {
            Ok(()) => true,
            Err(err) => {
                log::error!("saving notebook failed: {}", err);
                self.report(&err);
                false
            }
        }
    }

    fn report(&mut self, err: &ShellpadError) {
        self.status = StatusMessage::from_error(err).text;
    }
}

/// 編集中のノートをノートブックへ書き戻して保存する
pub struct NoteWriter<'a> {
    store: &'a NotebookStore,
    notebook: &'a mut Notebook,
    index: usize,
    clipboard: &'a dyn Clipboard,
}

impl SessionHost for NoteWriter<'_> {
    fn autosave(&mut self, body: &str) -> Result<()> {
        self.notebook.set_body(self.index, body)?;
        self.store.save(self.notebook.notes())
    }

    fn paste(&mut self) -> String {
        self.clipboard.paste()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clipboard::MemoryClipboard;
    use crate::editor::EditorCommand;
    use crate::notebook::parse_notebook;
    use crossterm::event::{KeyCode, KeyModifiers};
    use std::fs;
    use tempfile::{tempdir, TempDir};

    fn app_with(contents: &str) -> (TempDir, App) {
        let dir = tempdir().unwrap();
        let path = dir.path().join("notes.md");
        fs::write(&path, contents).unwrap();
        let config = Config {
            notebook_file: path,
            ..Config::default()
        };
        let app = App::new(config, Box::new(MemoryClipboard::new())).unwrap();
        (dir, app)
    }

    fn saved(app: &App) -> Vec<Note> {
        parse_notebook(&fs::read_to_string(&app.config().notebook_file).unwrap())
    }

    fn press(app: &mut App, code: KeyCode) -> AppAction {
        app.handle_key(&KeyEvent::new(code, KeyModifiers::NONE))
    }

    fn type_text(app: &mut App, text: &str) {
        for ch in text.chars() {
            press(app, KeyCode::Char(ch));
        }
    }

    #[test]
    fn add_note_through_prompt() {
        let (_dir, mut app) = app_with("# A\na\n");
        press(&mut app, KeyCode::Char('a'));
        assert!(matches!(app.mode(), Mode::Prompt(_)));

        type_text(&mut app, "Groceries");
        press(&mut app, KeyCode::Enter);

        assert_eq!(app.mode(), &Mode::List);
        assert_eq!(app.selected(), 1);
        assert_eq!(app.status(), "Created 'Groceries'");
        assert_eq!(saved(&app)[1], Note::new("Groceries", ""));
    }

    #[test]
    fn delete_requires_confirmation() {
        let (_dir, mut app) = app_with("# A\na\n\n# B\nb\n");
        press(&mut app, KeyCode::Char('j'));
        press(&mut app, KeyCode::Char('d'));
        type_text(&mut app, "n");
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.notebook().len(), 2);

        press(&mut app, KeyCode::Char('d'));
        type_text(&mut app, "Y");
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.notebook().len(), 1);
        assert_eq!(app.selected(), 0);
        assert_eq!(app.status(), "Deleted 'B'");
        assert_eq!(saved(&app), vec![Note::new("A", "a")]);
    }

    #[test]
    fn reorder_persists() {
        let (_dir, mut app) = app_with("# A\n\n# B\n");
        press(&mut app, KeyCode::Char(']'));
        assert_eq!(app.selected(), 1);
        let titles: Vec<String> = saved(&app).into_iter().map(|n| n.title).collect();
        assert_eq!(titles, ["B", "A"]);

        press(&mut app, KeyCode::Char(']'));
        assert_eq!(app.selected(), 1);
    }

    #[test]
    fn internal_copy_paste_uses_default_name() {
        let (_dir, mut app) = app_with("# Todo\n[ ] x\n");
        press(&mut app, KeyCode::Char('y'));
        press(&mut app, KeyCode::Char('p'));
        press(&mut app, KeyCode::Enter);

        assert_eq!(app.notebook().get(1), Some(&Note::new("Todo_copy1", "[ ] x")));
        assert_eq!(app.selected(), 1);
    }

    #[test]
    fn paste_cancel_reports() {
        let (_dir, mut app) = app_with("# Todo\n");
        press(&mut app, KeyCode::Char('y'));
        press(&mut app, KeyCode::Char('p'));
        press(&mut app, KeyCode::Esc);
        assert_eq!(app.status(), "Paste cancelled");
        assert_eq!(app.notebook().len(), 1);
    }

    #[test]
    fn clipboard_paste_appends_to_note() {
        let (_dir, mut app) = app_with("# A\nfirst\n\n# B\n");
        press(&mut app, KeyCode::Char('Y'));
        assert_eq!(app.status(), "Copied 'A' to clipboard");

        press(&mut app, KeyCode::Char('j'));
        press(&mut app, KeyCode::Char('p'));
        assert_eq!(app.notebook().get(1).unwrap().body, "first");

        press(&mut app, KeyCode::Char('k'));
        press(&mut app, KeyCode::Char('p'));
        assert_eq!(app.notebook().get(0).unwrap().body, "first\nfirst");
    }

    #[test]
    fn rename_ignores_blank_input() {
        let (_dir, mut app) = app_with("# A\n");
        press(&mut app, KeyCode::Char('r'));
        type_text(&mut app, "  ");
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.notebook().get(0).unwrap().title, "A");

        press(&mut app, KeyCode::Char('r'));
        type_text(&mut app, "Alpha");
        press(&mut app, KeyCode::Backspace);
        press(&mut app, KeyCode::Enter);
        assert_eq!(saved(&app)[0].title, "Alph");
    }

    #[test]
    fn help_closes_on_any_key() {
        let (_dir, mut app) = app_with("# A\n");
        press(&mut app, KeyCode::Char('?'));
        assert_eq!(app.mode(), &Mode::Help);
        press(&mut app, KeyCode::Char('x'));
        assert_eq!(app.mode(), &Mode::List);
        assert_eq!(app.status(), "Help closed");
    }

    #[test]
    fn open_and_quit_actions() {
        let (_dir, mut app) = app_with("# A\n");
        assert_eq!(press(&mut app, KeyCode::Enter), AppAction::OpenEditor(0));
        assert_eq!(press(&mut app, KeyCode::Char('q')), AppAction::Quit);
        assert!(!app.is_running());
    }

    #[test]
    fn edit_session_writes_back_through_host() {
        let (_dir, mut app) = app_with("# A\nold\n\n# B\nkeep\n");
        let mut session = app.begin_edit(0).unwrap();
        let result = {
            let mut host = app.session_host(0);
            session
                .handle(EditorCommand::Insert(" text".into()), &mut host)
                .unwrap();
            assert_eq!(saved_body(&host), "old text");
            session.handle(EditorCommand::Exit, &mut host).map(|_| session.body())
        };
        app.finish_edit(0, result);

        assert_eq!(app.status(), "Saved 'A'");
        assert_eq!(
            saved(&app),
            vec![Note::new("A", "old text"), Note::new("B", "keep")]
        );
    }

    fn saved_body(host: &NoteWriter<'_>) -> String {
        parse_notebook(&fs::read_to_string(host.store.path()).unwrap())[host.index]
            .body
            .clone()
    }

    #[test]
    fn startup_note_lookup() {
        let (dir, _) = app_with("# Inbox\n\n# Work\n");
        let config = Config {
            notebook_file: dir.path().join("notes.md"),
            startup_note: "work".to_string(),
            ..Config::default()
        };
        let app = App::new(config, Box::new(MemoryClipboard::new())).unwrap();
        assert_eq!(app.startup_target(), Some(1));
    }
}
