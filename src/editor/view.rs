//! テキスト領域の描画
//!
//! 状態は持たない。スクロール位置はカーソルから毎回計算する。
//! 折り返し・横スクロール・カーソル位置はすべて表示セル単位で扱う。

use super::layout::{
    clamp_to_viewport, prefix_cells, scroll_left, scroll_top, visible_cells, VisualLayout,
};
use super::text_buffer::TextBuffer;
use crate::ui::surface::Surface;

/// バッファの可視部分を描画し、カーソルを置く
pub fn draw_text(buffer: &TextBuffer, wrap_lines: bool, surface: &mut dyn Surface) {
    let (width, height) = surface.size();
    if width == 0 || height == 0 {
        return;
    }
    let (width, height) = (usize::from(width), usize::from(height));

    let layout = VisualLayout::build_cells(buffer.lines(), width, wrap_lines);
    let cursor = layout.cursor_to_visual(buffer.cursor());
    let cursor_cell = layout
        .segments()
        .get(cursor.row)
        .map_or(0, |segment| prefix_cells(&segment.text, cursor.col));
    let top = scroll_top(cursor.row, height);
    let left = if wrap_lines {
        0
    } else {
        scroll_left(cursor_cell, width)
    };

    for (screen_row, segment) in layout.segments().iter().skip(top).take(height).enumerate() {
        let visible = visible_cells(&segment.text, left, width);
        if !visible.is_empty() {
            surface.put_str(to_u16(screen_row), 0, &visible);
        }
    }

    let (row, col) = clamp_to_viewport(cursor.row - top, cursor_cell - left, width, height);
    surface.place_cursor(to_u16(row), to_u16(col));
}

fn to_u16(value: usize) -> u16 {
    u16::try_from(value).unwrap_or(u16::MAX)
}
