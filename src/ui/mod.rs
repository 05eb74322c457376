//! UIモジュール
//!
//! ratatuiベースのターミナルUI機能

pub mod renderer;
pub mod surface;
pub mod theme;

// 公開API
pub use renderer::{render_app, render_editor, truncate_to_width, MIN_HEIGHT, MIN_WIDTH};
pub use surface::{BufferSurface, Surface};
pub use theme::{ComponentType, Theme};
