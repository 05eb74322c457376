//! 設定ファイル
//!
//! `<config dir>/shellpad/config.cfg` を `key: value` 形式で読み込む。
//! 値はすべて明示的な [`Config`] に集約し、エディタには [`SessionConfig`] として渡す。

use crate::editor::session::SessionConfig;
use crate::editor::history::DEFAULT_HISTORY_CAPACITY;
use crate::error::{ConfigError, Result, ShellpadError};
use std::fs;
use std::path::{Path, PathBuf};

/// 設定ディレクトリ名
pub const CONFIG_DIR_NAME: &str = "shellpad";
/// 設定ファイル名
pub const CONFIG_FILE_NAME: &str = "config.cfg";

/// アプリケーション設定
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// ノートブックファイル（`~` と環境変数は展開済み）
    pub notebook_file: PathBuf,
    /// エディタで長い行を折り返すか
    pub wrap_lines: bool,
    /// 起動時に開くノートのタイトル（空なら一覧表示）
    pub startup_note: String,
    /// 編集のたびに保存するか
    pub realtime_save: bool,
    /// 未完了 todo のプレビュー記号
    pub doing_symbol: String,
    /// 完了 todo のプレビュー記号
    pub done_symbol: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            notebook_file: default_notebook_file(),
            wrap_lines: true,
            startup_note: String::new(),
            realtime_save: true,
            doing_symbol: "+".to_string(),
            done_symbol: "-".to_string(),
        }
    }
}

impl Config {
    /// 既定の場所から設定を読み込む（ファイルが無ければ既定値）
    pub fn load() -> Result<Self> {
        match default_config_path() {
            Some(path) => Self::load_from(&path),
            None => Ok(Self::default()),
        }
    }

    /// 指定ファイルから設定を読み込む
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            log::debug!("no config file at {}, using defaults", path.display());
            return Ok(Self::default());
        }
        let text = fs::read_to_string(path).map_err(|err| {
            log::warn!("cannot read config {}: {}", path.display(), err);
            ShellpadError::Config(ConfigError::InvalidFile {
                path: path.display().to_string(),
            })
        })?;
        Self::parse(&text)
    }

    /// 設定テキストを解析する
    pub fn parse(text: &str) -> Result<Self> {
        let mut config = Self::default();
        for line in text.lines() {
            let Some((key, value)) = line.split_once(':') else {
                continue;
            };
            config.apply(key.trim(), value.trim())?;
        }
        Ok(config)
    }

    fn apply(&mut self, key: &str, value: &str) -> Result<()> {
        match key {
            "notebook_file" => self.notebook_file = expand_path(value)?,
            "wrap_lines" => self.wrap_lines = parse_flag(value),
            "startup_note" => self.startup_note = value.to_string(),
            "realtime_save" => self.realtime_save = parse_flag(value),
            "doing_symbol" => self.doing_symbol = value.to_string(),
            "done_symbol" => self.done_symbol = value.to_string(),
            other => log::debug!("ignoring unknown config key {:?}", other),
        }
        Ok(())
    }

    /// ノートブックファイルを上書きする（コマンドライン引数用）
    pub fn with_notebook_file(mut self, path: &str) -> Result<Self> {
        self.notebook_file = expand_path(path)?;
        Ok(self)
    }

    /// 編集セッションへ渡す設定
    pub fn session_config(&self) -> SessionConfig {
        SessionConfig {
            realtime_save: self.realtime_save,
            wrap_lines: self.wrap_lines,
            history_capacity: DEFAULT_HISTORY_CAPACITY,
        }
    }
}

/// 真偽値の解釈（`1|true|yes|on` のみ真）
pub fn parse_flag(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

/// 既定の設定ファイルパス
pub fn default_config_path() -> Option<PathBuf> {
    config_dir().map(|dir| dir.join(CONFIG_FILE_NAME))
}

/// shellpad の設定ディレクトリ
pub fn config_dir() -> Option<PathBuf> {
    dirs::config_dir().map(|base| base.join(CONFIG_DIR_NAME))
}

fn default_notebook_file() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("shellpad.md")
}

fn expand_path(value: &str) -> Result<PathBuf> {
    match shellexpand::full(value) {
        Ok(expanded) => Ok(PathBuf::from(expanded.as_ref())),
        Err(err) => Err(ShellpadError::Config(ConfigError::InvalidValue {
            key: "notebook_file".to_string(),
            value: format!("{} ({})", value, err),
        })),
    }
}
