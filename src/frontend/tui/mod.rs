use crate::app::{App, AppAction};
use crate::editor::{CommandSource, EditSession, EditorCommand, SessionHost};
use crate::error::{Result, ShellpadError, UiError};
use crate::input::editor_command;
use crate::ui::{render_app, render_editor};
use crossterm::event::{self, DisableBracketedPaste, EnableBracketedPaste, Event};
use crossterm::terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen};
use crossterm::{cursor, execute};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io::stdout;

pub struct TuiApplication {
    app: App,
}

impl TuiApplication {
    pub fn new(app: App) -> Self {
        Self { app }
    }

    pub fn run(&mut self) -> Result<()> {
        enter_terminal()?;

        let backend = CrosstermBackend::new(stdout());
        let mut terminal = match Terminal::new(backend) {
            Ok(terminal) => terminal,
            Err(err) => {
                let _ = leave_terminal();
                log::error!("terminal init failed: {}", err);
                return Err(UiError::TerminalInit.into());
            }
        };

        let loop_result = self.event_loop(&mut terminal);
        let show_cursor_result = terminal.show_cursor().map_err(|err| terminal_error("show cursor", err));
        drop(terminal);
        let cleanup_result = leave_terminal();

        loop_result.and(show_cursor_result).and(cleanup_result)
    }

    fn event_loop<B: ratatui::backend::Backend>(&mut self, terminal: &mut Terminal<B>) -> Result<()> {
        if let Some(index) = self.app.startup_target() {
            self.edit(terminal, index)?;
        }

        while self.app.is_running() {
            terminal
                .draw(|frame| render_app(frame, &self.app))
                .map_err(|err| terminal_error("render", err))?;

            match event::read().map_err(|err| terminal_error("event read", err))? {
                Event::Key(key_event) => {
                    if let AppAction::OpenEditor(index) = self.app.handle_key(&key_event) {
                        self.edit(terminal, index)?;
                    }
                }
                Event::Resize(_, _) => {}
                Event::Mouse(_) | Event::FocusGained | Event::FocusLost | Event::Paste(_) => {}
            }
        }

        Ok(())
    }

    /// ノートを開いて編集し、閉じたら一覧へ戻る
    fn edit<B: ratatui::backend::Backend>(&mut self, terminal: &mut Terminal<B>, index: usize) -> Result<()> {
        let Some(mut session) = self.app.begin_edit(index) else {
            return Ok(());
        };

        let result = {
            let mut source = TerminalCommands { terminal };
            let mut host = self.app.session_host(index);
            session.run(&mut source, &mut host)
        };

        match result {
            // 端末が使えなくなった場合も、編集内容だけは書き戻してから終了する
            Err(ShellpadError::Ui(err)) => {
                let mut host = self.app.session_host(index);
                if let Err(save_err) = host.autosave(&session.body()) {
                    log::error!("saving '{}' after terminal failure: {}", session.title(), save_err);
                }
                Err(err.into())
            }
            other => {
                self.app.finish_edit(index, other);
                Ok(())
            }
        }
    }
}

/// 端末イベントをエディタコマンドへ変換する
struct TerminalCommands<'a, B: ratatui::backend::Backend> {
    terminal: &'a mut Terminal<B>,
}

impl<B: ratatui::backend::Backend> CommandSource for TerminalCommands<'_, B> {
    fn next_command(&mut self, session: &EditSession) -> Result<EditorCommand> {
        loop {
            self.terminal
                .draw(|frame| render_editor(frame, session))
                .map_err(|err| terminal_error("render", err))?;

            match event::read().map_err(|err| terminal_error("event read", err))? {
                Event::Key(key_event) => {
                    if let Some(command) = editor_command(&key_event) {
                        return Ok(command);
                    }
                }
                Event::Paste(text) => return Ok(EditorCommand::Insert(text)),
                Event::Resize(_, _) | Event::Mouse(_) | Event::FocusGained | Event::FocusLost => {}
            }
        }
    }
}

fn enter_terminal() -> Result<()> {
    enable_raw_mode().map_err(|err| terminal_error("enable raw mode", err))?;
    let mut out = stdout();
    execute!(out, EnterAlternateScreen, EnableBracketedPaste)
        .map_err(|err| terminal_error("enter alternate screen", err))?;
    Ok(())
}

fn leave_terminal() -> Result<()> {
    let mut out = stdout();
    execute!(out, DisableBracketedPaste, LeaveAlternateScreen)
        .map_err(|err| terminal_error("leave alternate screen", err))?;
    disable_raw_mode().map_err(|err| terminal_error("disable raw mode", err))?;
    Ok(())
}

/// パニック時などに端末を通常状態へ戻す（失敗は無視）
pub fn restore_terminal() {
    let mut out = stdout();
    let _ = execute!(out, DisableBracketedPaste, LeaveAlternateScreen, cursor::Show);
    let _ = disable_raw_mode();
}

fn terminal_error(context: &str, err: impl std::fmt::Display) -> ShellpadError {
    ShellpadError::Ui(UiError::RenderingFailed {
        component: format!("{}: {}", context, err),
    })
}
