//! 論理行から表示行へのレイアウト
//!
//! 各論理行を幅 `W` 文字ごとに単純分割する（単語単位の折り返しはしない）。
//! 空行も1行分の表示行を占める。描画のたびに作り直し、保存はしない。
//! 端末へ描くときは文字数ではなく表示セル数で分割した [`VisualLayout::build_cells`] を使う。

use super::text_buffer::{char_len, CursorPosition};
use unicode_width::UnicodeWidthChar;

/// 表示行1行分
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VisualSegment {
    /// 元の論理行
    pub logical_row: usize,
    /// 論理行内の開始列（文字単位）
    pub start_col: usize,
    /// 表示テキスト
    pub text: String,
}

impl VisualSegment {
    /// 文字数
    pub fn len(&self) -> usize {
        char_len(&self.text)
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}

/// 表示上のカーソル位置（表示行・表示列）
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct VisualCursor {
    pub row: usize,
    pub col: usize,
}

/// バッファ全体の表示行
#[derive(Debug, Clone)]
pub struct VisualLayout {
    segments: Vec<VisualSegment>,
    width: usize,
}

impl VisualLayout {
    /// 幅 `width` で折り返したレイアウトを作る
    ///
    /// `wrap` が偽なら論理行をそのまま1表示行にする（横スクロール用）。
    pub fn build(lines: &[String], width: usize, wrap: bool) -> Self {
        Self::build_with(lines, width, wrap, chunk_line)
    }

    /// 表示セル幅 `width` で折り返したレイアウトを作る（全角文字は2セル）
    pub fn build_cells(lines: &[String], width: usize, wrap: bool) -> Self {
        Self::build_with(lines, width, wrap, chunk_line_cells)
    }

    fn build_with(
        lines: &[String],
        width: usize,
        wrap: bool,
        chunker: fn(&str, usize) -> Vec<(usize, String)>,
    ) -> Self {
        let width = width.max(1);
        let mut segments = Vec::with_capacity(lines.len());
        for (row, line) in lines.iter().enumerate() {
            if wrap {
                segments.extend(chunker(line, width).into_iter().map(|(start_col, text)| {
                    VisualSegment {
                        logical_row: row,
                        start_col,
                        text,
                    }
                }));
            } else {
                segments.push(VisualSegment {
                    logical_row: row,
                    start_col: 0,
                    text: line.clone(),
                });
            }
        }
        Self { segments, width }
    }

    pub fn segments(&self) -> &[VisualSegment] {
        &self.segments
    }

    pub fn width(&self) -> usize {
        self.width
    }

    /// 表示行数
    pub fn row_count(&self) -> usize {
        self.segments.len()
    }

    /// 論理カーソルを表示位置へ変換する
    ///
    /// カーソル行の表示行を上から順に調べ、`[start, start + len]`（両端を含む）に列が入る最初の
    /// 表示行を採用する。該当が無ければその論理行の最後の表示行の末尾に置く。
    pub fn cursor_to_visual(&self, cursor: CursorPosition) -> VisualCursor {
        let mut last_of_row: Option<(usize, &VisualSegment)> = None;
        for (index, segment) in self.segments.iter().enumerate() {
            if segment.logical_row != cursor.row {
                if last_of_row.is_some() {
                    break;
                }
                continue;
            }
            let start = segment.start_col;
            if start <= cursor.col && cursor.col <= start + segment.len() {
                return VisualCursor {
                    row: index,
                    col: cursor.col - start,
                };
            }
            last_of_row = Some((index, segment));
        }

        match last_of_row {
            Some((index, segment)) => VisualCursor {
                row: index,
                col: segment.len(),
            },
            None => VisualCursor::default(),
        }
    }

    /// 表示位置を論理カーソルへ戻す（表示行の範囲外は末尾の表示行に寄せる）
    pub fn visual_to_logical(&self, visual: VisualCursor) -> CursorPosition {
        let Some(segment) = self
            .segments
            .get(visual.row)
            .or_else(|| self.segments.last())
        else {
            return CursorPosition::default();
        };
        CursorPosition {
            row: segment.logical_row,
            col: segment.start_col + visual.col.min(segment.len()),
        }
    }
}

/// 行を `width` 文字ごとに分割し `(開始列, テキスト)` を返す。空行は空の1件
pub fn chunk_line(line: &str, width: usize) -> Vec<(usize, String)> {
    let width = width.max(1);
    if line.is_empty() {
        return vec![(0, String::new())];
    }

    let chars: Vec<char> = line.chars().collect();
    chars
        .chunks(width)
        .enumerate()
        .map(|(index, chunk)| (index * width, chunk.iter().collect()))
        .collect()
}

/// 行を表示セル幅 `width` ごとに分割し `(開始列, テキスト)` を返す
///
/// 開始列は文字単位。幅に収まらない全角文字は次の表示行へ送る。1文字で幅を超える場合は単独で1行。
pub fn chunk_line_cells(line: &str, width: usize) -> Vec<(usize, String)> {
    let width = width.max(1);
    if line.is_empty() {
        return vec![(0, String::new())];
    }

    let mut chunks = Vec::new();
    let mut start = 0;
    let mut text = String::new();
    let mut cells = 0;
    for (index, ch) in line.chars().enumerate() {
        let ch_cells = char_cells(ch);
        if cells + ch_cells > width && !text.is_empty() {
            chunks.push((start, std::mem::take(&mut text)));
            start = index;
            cells = 0;
        }
        text.push(ch);
        cells += ch_cells;
    }
    chunks.push((start, text));
    chunks
}

fn char_cells(ch: char) -> usize {
    ch.width().unwrap_or(0)
}

/// 先頭 `chars` 文字の表示セル数
pub fn prefix_cells(text: &str, chars: usize) -> usize {
    text.chars().take(chars).map(char_cells).sum()
}

/// セル位置 `left` から幅 `width` セル分の表示テキスト
///
/// 左端で途中から切れる全角文字は空白で埋め、右端に収まらない文字は描かない。
pub fn visible_cells(text: &str, left: usize, width: usize) -> String {
    let mut visible = String::new();
    let mut end = 0;
    for ch in text.chars() {
        let start = end;
        end += char_cells(ch);
        if start < left {
            if end > left {
                visible.extend(std::iter::repeat(' ').take(end - left));
            }
            continue;
        }
        if end > left + width {
            break;
        }
        visible.push(ch);
    }
    visible
}

/// カーソル表示行がビューポート最下段に来るような先頭表示行
///
/// 手前の行が足りない場合は 0。
pub fn scroll_top(cursor_visual_row: usize, viewport_height: usize) -> usize {
    cursor_visual_row.saturating_sub(viewport_height.max(1) - 1)
}

/// 折り返し無効時の横スクロール量
pub fn scroll_left(cursor_visual_col: usize, viewport_width: usize) -> usize {
    cursor_visual_col.saturating_sub(viewport_width.max(1) - 1)
}

/// ビューポート相対座標を矩形内に収める
pub fn clamp_to_viewport(row: usize, col: usize, width: usize, height: usize) -> (usize, usize) {
    (
        row.min(height.max(1) - 1),
        col.min(width.max(1) - 1),
    )
}
