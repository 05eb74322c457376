//! 編集セッション
//!
//! テキストバッファ・履歴・レイアウトをまとめ、入力コマンドを順に適用する。
//! 変更のたびにスナップショットを積み、リアルタイム保存が有効ならホストへ本文を渡す。
//! 終了時は設定に関わらず必ず保存を呼ぶ。

use super::history::{UndoHistory, DEFAULT_HISTORY_CAPACITY};
use super::text_buffer::{byte_offset, TextBuffer};
use crate::error::{Result, StatusMessage};
use crate::notebook::Note;
use regex::Regex;
use std::fmt;
use std::sync::OnceLock;

/// セッション設定（起動時に明示的に渡す）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionConfig {
    /// 変更のたびに保存する
    pub realtime_save: bool,
    /// 長い行を折り返して表示する
    pub wrap_lines: bool,
    /// undo 可能な手数
    pub history_capacity: usize,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            realtime_save: true,
            wrap_lines: true,
            history_capacity: DEFAULT_HISTORY_CAPACITY,
        }
    }
}

/// エディタへの入力コマンド
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditorCommand {
    Insert(String),
    Newline,
    Backspace,
    DeletePreviousWord,
    Left,
    Right,
    Up,
    Down,
    Home,
    End,
    Undo,
    Redo,
    Paste,
    ShowLink,
    Exit,
}

/// コマンド適用結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionOutcome {
    Continue,
    /// 終了した（最終的な本文）
    Exited(String),
}

/// セッションを開いた側が提供する機能
pub trait SessionHost {
    /// 本文をノートへ書き戻して永続化する
    fn autosave(&mut self, body: &str) -> Result<()>;

    /// クリップボードの内容（取得できなければ空文字列）
    fn paste(&mut self) -> String;
}

/// 入力コマンドの供給元（描画してから次の入力を待つ）
pub trait CommandSource {
    fn next_command(&mut self, session: &EditSession) -> Result<EditorCommand>;
}

/// 行数・単語数・文字数
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionStats {
    pub lines: usize,
    pub words: usize,
    pub chars: usize,
}

impl fmt::Display for SessionStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Lines:{} | Words:{} | Chars:{}",
            self.lines, self.words, self.chars
        )
    }
}

fn url_pattern() -> &'static Regex {
    static URL: OnceLock<Regex> = OnceLock::new();
    URL.get_or_init(|| Regex::new(r"https?://[^\s]+").expect("url pattern is valid"))
}

/// 1つのノートに対する編集セッション
#[derive(Debug)]
pub struct EditSession {
    title: String,
    buffer: TextBuffer,
    history: UndoHistory,
    config: SessionConfig,
    status: Option<StatusMessage>,
    finished: bool,
}

impl EditSession {
    /// ノートの本文をコピーしてセッションを開始する
    pub fn new(note: &Note, config: SessionConfig) -> Self {
        let buffer = TextBuffer::from_body(&note.body);
        let history = UndoHistory::with_capacity(buffer.snapshot(), config.history_capacity);
        Self {
            title: note.title.clone(),
            buffer,
            history,
            config,
            status: None,
            finished: false,
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn buffer(&self) -> &TextBuffer {
        &self.buffer
    }

    pub fn history(&self) -> &UndoHistory {
        &self.history
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn body(&self) -> String {
        self.buffer.to_body()
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// 期限切れでないステータスメッセージ
    pub fn status(&self) -> Option<&StatusMessage> {
        self.status.as_ref().filter(|message| !message.is_expired())
    }

    /// 入力が尽きるか終了コマンドが来るまでコマンドを処理し、最終的な本文を返す
    pub fn run(
        &mut self,
        source: &mut dyn CommandSource,
        host: &mut dyn SessionHost,
    ) -> Result<String> {
        self.buffer.clamp_cursor();
        loop {
            let command = source.next_command(self)?;
            if let SessionOutcome::Exited(body) = self.handle(command, host)? {
                return Ok(body);
            }
        }
    }

    /// コマンドを1つ適用する
    ///
    /// 終了時の保存失敗のみエラーとして返す。
    pub fn handle(
        &mut self,
        command: EditorCommand,
        host: &mut dyn SessionHost,
    ) -> Result<SessionOutcome> {
        if self.finished {
            return Ok(SessionOutcome::Exited(self.body()));
        }

        match command {
            EditorCommand::Insert(text) => {
                if self.buffer.insert(&text) {
                    self.commit(host);
                }
            }
            EditorCommand::Newline => {
                self.buffer.insert_newline();
                self.commit(host);
            }
            EditorCommand::Backspace => {
                if self.buffer.backspace() {
                    self.commit(host);
                }
            }
            EditorCommand::DeletePreviousWord => {
                if self.buffer.delete_previous_word() {
                    self.commit(host);
                }
            }
            EditorCommand::Left => {
                self.buffer.move_left();
            }
            EditorCommand::Right => {
                self.buffer.move_right();
            }
            EditorCommand::Up => {
                self.buffer.move_up();
            }
            EditorCommand::Down => {
                self.buffer.move_down();
            }
            EditorCommand::Home => self.buffer.move_home(),
            EditorCommand::End => self.buffer.move_end(),
            EditorCommand::Undo => self.undo(host),
            EditorCommand::Redo => self.redo(host),
            EditorCommand::Paste => {
                let pasted = host.paste();
                if pasted.is_empty() {
                    self.status = Some(StatusMessage::warning("Clipboard empty or unavailable"));
                } else if self.buffer.insert(&pasted) {
                    self.commit(host);
                }
            }
            EditorCommand::ShowLink => {
                self.status = Some(match self.link_under_cursor() {
                    Some(url) => StatusMessage::info(format!("Link: {}", url)),
                    None => StatusMessage::info("No link under cursor"),
                });
            }
            EditorCommand::Exit => return self.finish(host),
        }

        Ok(SessionOutcome::Continue)
    }

    /// 直前の変更を取り消す（履歴が無ければ何もしない）
    pub fn undo(&mut self, host: &mut dyn SessionHost) {
        let Some(snapshot) = self.history.undo() else {
            return;
        };
        self.buffer.restore(snapshot);
        self.realtime_save(host);
    }

    /// 取り消した変更をやり直す（redo が無ければ何もしない）
    pub fn redo(&mut self, host: &mut dyn SessionHost) {
        let Some(snapshot) = self.history.redo() else {
            return;
        };
        self.buffer.restore(snapshot);
        self.realtime_save(host);
    }

    /// 行数・単語数・文字数
    pub fn stats(&self) -> SessionStats {
        let text = self.buffer.to_body();
        SessionStats {
            lines: self.buffer.line_count(),
            words: text.split_whitespace().count(),
            chars: text.chars().count(),
        }
    }

    /// カーソル位置を含む URL
    pub fn link_under_cursor(&self) -> Option<&str> {
        let line = self.buffer.current_line();
        let cursor = byte_offset(line, self.buffer.cursor().col);
        url_pattern()
            .find_iter(line)
            .find(|m| m.start() <= cursor && cursor < m.end())
            .map(|m| m.as_str())
    }

    fn commit(&mut self, host: &mut dyn SessionHost) {
        self.history.push(self.buffer.snapshot());
        self.realtime_save(host);
    }

    fn realtime_save(&mut self, host: &mut dyn SessionHost) {
        if !self.config.realtime_save {
            return;
        }
        if let Err(err) = host.autosave(&self.buffer.to_body()) {
            log::warn!("realtime save of '{}' failed: {}", self.title, err);
            self.status = Some(StatusMessage::from_error(&err));
        }
    }

    fn finish(&mut self, host: &mut dyn SessionHost) -> Result<SessionOutcome> {
        self.finished = true;
        let body = self.body();
        host.autosave(&body)?;
        log::debug!("closed editor for '{}'", self.title);
        Ok(SessionOutcome::Exited(body))
    }
}
