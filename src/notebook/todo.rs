//! todo 行の判定
//!
//! 行頭（空白は許容）の `[ ]` / `[]` を未完了、`[x]` / `[X]` を完了として扱う。

/// 行の分類結果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TodoLine<'a> {
    /// 未完了（マーカー以降のテキスト）
    Open(&'a str),
    /// 完了（マーカー以降のテキスト）
    Done(&'a str),
    /// todo ではない行
    Plain(&'a str),
}

impl TodoLine<'_> {
    pub fn is_todo(&self) -> bool {
        !matches!(self, TodoLine::Plain(_))
    }
}

pub fn classify_line(line: &str) -> TodoLine<'_> {
    let trimmed = line.trim_start();
    for marker in ["[ ]", "[]"] {
        if let Some(rest) = trimmed.strip_prefix(marker) {
            return TodoLine::Open(rest.trim_start());
        }
    }
    for marker in ["[x]", "[X]"] {
        if let Some(rest) = trimmed.strip_prefix(marker) {
            return TodoLine::Done(rest.trim_start());
        }
    }
    TodoLine::Plain(line)
}

/// 本文中の todo 数を `(完了, 合計)` で返す
pub fn todo_stats(body: &str) -> (usize, usize) {
    body.lines()
        .map(classify_line)
        .fold((0, 0), |(done, total), line| match line {
            TodoLine::Done(_) => (done + 1, total + 1),
            TodoLine::Open(_) => (done, total + 1),
            TodoLine::Plain(_) => (done, total),
        })
}

/// プレビュー用の表示テキストと完了フラグ
pub fn preview_line(line: &str, doing_symbol: &str, done_symbol: &str) -> (String, bool) {
    match classify_line(line) {
        TodoLine::Open(rest) => (format!("{} {}", doing_symbol, rest), false),
        TodoLine::Done(rest) => (format!("{} {}", done_symbol, rest), true),
        TodoLine::Plain(text) => (text.to_string(), false),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_markers() {
        assert_eq!(classify_line("[ ] buy milk"), TodoLine::Open("buy milk"));
        assert_eq!(classify_line("  []call mom"), TodoLine::Open("call mom"));
        assert_eq!(classify_line("[x] done"), TodoLine::Done("done"));
        assert_eq!(classify_line("\t[X]   shout"), TodoLine::Done("shout"));
        assert_eq!(classify_line("[y] nope"), TodoLine::Plain("[y] nope"));
        assert_eq!(classify_line("text [ ] later"), TodoLine::Plain("text [ ] later"));
    }

    #[test]
    fn counts_todos() {
        let body = "intro\n[ ] a\n[x] b\n [X] c\nplain";
        assert_eq!(todo_stats(body), (2, 3));
        assert_eq!(todo_stats(""), (0, 0));
    }

    #[test]
    fn preview_uses_symbols() {
        assert_eq!(preview_line("[ ] task", "+", "-"), ("+ task".to_string(), false));
        assert_eq!(preview_line("[x] task", "+", "-"), ("- task".to_string(), true));
        assert_eq!(preview_line("note", "+", "-"), ("note".to_string(), false));
    }
}
