//! 入力処理モジュール

pub mod keymap;

pub use keymap::{editor_command, list_command, prompt_command, ListCommand, PromptCommand};
