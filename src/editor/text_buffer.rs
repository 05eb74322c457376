//! 行指向テキストバッファ
//!
//! 論理行の並びとカーソル位置を保持する。列は文字単位で、行長と等しい値（行末の後ろ）を取り得る。
//! 行の並びは空にならない（最低でも空行が1つある）。

use super::history::Snapshot;

/// カーソル位置（0ベース、列は文字単位）
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord)]
pub struct CursorPosition {
    pub row: usize,
    pub col: usize,
}

impl CursorPosition {
    pub fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }
}

/// 編集中のテキスト
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextBuffer {
    lines: Vec<String>,
    cursor: CursorPosition,
}

impl Default for TextBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl TextBuffer {
    /// 空行1つのバッファ
    pub fn new() -> Self {
        Self {
            lines: vec![String::new()],
            cursor: CursorPosition::default(),
        }
    }

    /// ノート本文からバッファを作る。カーソルは最終行の末尾
    pub fn from_body(body: &str) -> Self {
        let lines: Vec<String> = if body.is_empty() {
            vec![String::new()]
        } else {
            body.split('\n')
                .map(|line| line.strip_suffix('\r').unwrap_or(line).to_string())
                .collect()
        };
        let row = lines.len() - 1;
        let col = char_len(&lines[row]);
        Self {
            lines,
            cursor: CursorPosition { row, col },
        }
    }

    /// 行とカーソルを直接指定して作る（範囲外のカーソルは補正される）
    pub fn with_lines<I, S>(lines: I, cursor: CursorPosition) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut buffer = Self {
            lines: lines.into_iter().map(Into::into).collect(),
            cursor,
        };
        buffer.clamp_cursor();
        buffer
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    /// 指定行の文字数（範囲外は0）
    pub fn line_len(&self, row: usize) -> usize {
        self.lines.get(row).map_or(0, |line| char_len(line))
    }

    pub fn cursor(&self) -> CursorPosition {
        self.cursor
    }

    pub fn current_line(&self) -> &str {
        &self.lines[self.cursor.row]
    }

    /// 改行で連結した本文
    pub fn to_body(&self) -> String {
        self.lines.join("\n")
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            lines: self.lines.clone(),
            cursor: self.cursor,
        }
    }

    /// スナップショットの状態に戻す
    pub fn restore(&mut self, snapshot: &Snapshot) {
        self.lines = snapshot.lines.clone();
        self.cursor = snapshot.cursor;
        self.clamp_cursor();
    }

    /// 不変条件を満たすようにカーソル（と行の並び）を補正する
    pub fn clamp_cursor(&mut self) {
        if self.lines.is_empty() {
            self.lines.push(String::new());
        }
        self.cursor.row = self.cursor.row.min(self.lines.len() - 1);
        self.cursor.col = self.cursor.col.min(self.line_len(self.cursor.row));
    }

    /// テキストを挿入する
    ///
    /// 改行を含む場合は現在行をカーソル位置で分割し、最後の断片の末尾にカーソルを置く。
    /// 空文字列は何もせず `false` を返す。
    pub fn insert(&mut self, text: &str) -> bool {
        let normalized = text.replace("\r\n", "\n").replace('\r', "\n");
        let parts: Vec<&str> = normalized.lines().collect();
        if parts.is_empty() {
            return false;
        }

        let CursorPosition { row, col } = self.cursor;
        let split_at = byte_offset(&self.lines[row], col);
        let tail = self.lines[row].split_off(split_at);

        if let [single] = parts.as_slice() {
            self.lines[row].push_str(single);
            self.lines[row].push_str(&tail);
            self.cursor.col = col + char_len(single);
            return true;
        }

        self.lines[row].push_str(parts[0]);
        for (offset, part) in parts[1..].iter().enumerate() {
            self.lines.insert(row + 1 + offset, (*part).to_string());
        }
        let last_row = row + parts.len() - 1;
        let last_len = char_len(&self.lines[last_row]);
        self.lines[last_row].push_str(&tail);
        self.cursor = CursorPosition {
            row: last_row,
            col: last_len,
        };
        true
    }

    /// カーソル位置で行を分割する
    pub fn insert_newline(&mut self) {
        let CursorPosition { row, col } = self.cursor;
        let split_at = byte_offset(&self.lines[row], col);
        let tail = self.lines[row].split_off(split_at);
        self.lines.insert(row + 1, tail);
        self.cursor = CursorPosition { row: row + 1, col: 0 };
    }

    /// カーソル前の1文字を削除する。行頭では前の行と結合する
    ///
    /// 先頭行の行頭では何もせず `false` を返す。
    pub fn backspace(&mut self) -> bool {
        let CursorPosition { row, col } = self.cursor;
        if col > 0 {
            let line = &mut self.lines[row];
            let start = byte_offset(line, col - 1);
            let end = byte_offset(line, col);
            line.replace_range(start..end, "");
            self.cursor.col = col - 1;
            true
        } else if row > 0 {
            self.join_with_previous();
            true
        } else {
            false
        }
    }

    /// 直前の単語を削除する
    ///
    /// カーソル直前の空白の連続を飛ばし、続く非空白の連続を飛ばした位置からカーソルまでを削除する。
    /// 区切りは半角スペースのみ。行頭では前の行と結合する。
    pub fn delete_previous_word(&mut self) -> bool {
        let CursorPosition { row, col } = self.cursor;
        if col == 0 {
            if row == 0 {
                return false;
            }
            self.join_with_previous();
            return true;
        }

        let chars: Vec<char> = self.lines[row].chars().collect();
        let mut start = col;
        while start > 0 && chars[start - 1] == ' ' {
            start -= 1;
        }
        while start > 0 && chars[start - 1] != ' ' {
            start -= 1;
        }

        let line = &mut self.lines[row];
        let from = byte_offset(line, start);
        let to = byte_offset(line, col);
        line.replace_range(from..to, "");
        self.cursor.col = start;
        true
    }

    fn join_with_previous(&mut self) {
        let row = self.cursor.row;
        let current = self.lines.remove(row);
        let previous = &mut self.lines[row - 1];
        let boundary = char_len(previous);
        previous.push_str(&current);
        self.cursor = CursorPosition {
            row: row - 1,
            col: boundary,
        };
    }

    /// 左へ移動。行頭では前の行の末尾へ
    pub fn move_left(&mut self) -> bool {
        if self.cursor.col > 0 {
            self.cursor.col -= 1;
            true
        } else if self.cursor.row > 0 {
            self.cursor.row -= 1;
            self.cursor.col = self.line_len(self.cursor.row);
            true
        } else {
            false
        }
    }

    /// 右へ移動。行末では次の行の先頭へ
    pub fn move_right(&mut self) -> bool {
        if self.cursor.col < self.line_len(self.cursor.row) {
            self.cursor.col += 1;
            true
        } else if self.cursor.row + 1 < self.lines.len() {
            self.cursor.row += 1;
            self.cursor.col = 0;
            true
        } else {
            false
        }
    }

    pub fn move_up(&mut self) -> bool {
        if self.cursor.row == 0 {
            return false;
        }
        self.cursor.row -= 1;
        self.cursor.col = self.cursor.col.min(self.line_len(self.cursor.row));
        true
    }

    pub fn move_down(&mut self) -> bool {
        if self.cursor.row + 1 >= self.lines.len() {
            return false;
        }
        self.cursor.row += 1;
        self.cursor.col = self.cursor.col.min(self.line_len(self.cursor.row));
        true
    }

    pub fn move_home(&mut self) {
        self.cursor.col = 0;
    }

    pub fn move_end(&mut self) {
        self.cursor.col = self.line_len(self.cursor.row);
    }
}

/// 文字数
pub(crate) fn char_len(text: &str) -> usize {
    text.chars().count()
}

/// 文字位置からバイト位置への変換（行末を超える場合は行長）
pub(crate) fn byte_offset(text: &str, char_pos: usize) -> usize {
    text.char_indices()
        .nth(char_pos)
        .map_or(text.len(), |(idx, _)| idx)
}
