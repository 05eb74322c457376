//! 描画先の抽象
//!
//! エディタが必要とするのは「大きさの分かる矩形」「文字列の書き込み」「カーソル配置」だけ。
//! 範囲外への書き込みは黙って捨てる。

use ratatui::buffer::Buffer;
use ratatui::layout::{Position, Rect};
use ratatui::style::Style;

/// 矩形の描画領域（座標は領域相対）
pub trait Surface {
    /// `(幅, 高さ)`
    fn size(&self) -> (u16, u16);

    /// `row` 行 `col` 列から文字列を書く（はみ出した分は切り捨て）
    fn put_str(&mut self, row: u16, col: u16, text: &str);

    /// カーソルを置く
    fn place_cursor(&mut self, row: u16, col: u16);
}

/// ratatui のバッファへ描画する `Surface`
pub struct BufferSurface<'a> {
    buffer: &'a mut Buffer,
    area: Rect,
    style: Style,
    cursor: Option<Position>,
}

impl<'a> BufferSurface<'a> {
    /// `area` はバッファ内の描画領域（バッファ外にはみ出す部分は切り詰める）
    pub fn new(buffer: &'a mut Buffer, area: Rect) -> Self {
        let area = area.intersection(buffer.area);
        Self {
            buffer,
            area,
            style: Style::default(),
            cursor: None,
        }
    }

    pub fn with_style(mut self, style: Style) -> Self {
        self.style = style;
        self
    }

    /// 配置されたカーソルの絶対座標
    pub fn cursor(&self) -> Option<Position> {
        self.cursor
    }
}

impl Surface for BufferSurface<'_> {
    fn size(&self) -> (u16, u16) {
        (self.area.width, self.area.height)
    }

    fn put_str(&mut self, row: u16, col: u16, text: &str) {
        if row >= self.area.height || col >= self.area.width {
            return;
        }
        let x = self.area.x + col;
        let y = self.area.y + row;
        let max_width = usize::from(self.area.width - col);
        self.buffer.set_stringn(x, y, text, max_width, self.style);
    }

    fn place_cursor(&mut self, row: u16, col: u16) {
        if row >= self.area.height || col >= self.area.width {
            return;
        }
        self.cursor = Some(Position::new(self.area.x + col, self.area.y + row));
    }
}
