use proptest::prelude::*;
use proptest::test_runner::Config as ProptestConfig;
use shellpad::notebook::{parse_notebook, serialize_notebook, Note, NotebookStore, WELCOME_TITLE};
use std::fs;
use tempfile::tempdir;

fn title_strategy() -> impl Strategy<Value = String> {
    "[A-Za-z0-9][A-Za-z0-9 _-]{0,16}[A-Za-z0-9]"
}

fn body_strategy() -> impl Strategy<Value = String> {
    proptest::collection::vec("[a-z\\[\\] ]{0,16}", 0..6)
        .prop_map(|lines| lines.join("\n").trim_end().to_string())
}

fn note_strategy() -> impl Strategy<Value = Note> {
    (title_strategy(), body_strategy()).prop_map(|(title, body)| Note::new(title, body))
}

proptest! {
    #![proptest_config(ProptestConfig { cases: 96, .. ProptestConfig::default() })]

    #[test]
    fn serialized_notebook_parses_back(notes in proptest::collection::vec(note_strategy(), 1..8)) {
        let text = serialize_notebook(&notes);
        prop_assert!(text.ends_with('\n'));
        prop_assert!(!text.ends_with("\n\n"));
        prop_assert_eq!(parse_notebook(&text), notes);
    }
}

#[test]
fn test_missing_file_is_seeded_with_welcome_note() {
    let temp_dir = tempdir().unwrap();
    let path = temp_dir.path().join("nested").join("notes.md");
    let store = NotebookStore::new(&path);

    let notes = store.load().expect("load");
    assert_eq!(notes, vec![Note::welcome()]);
    assert_eq!(notes[0].title, WELCOME_TITLE);

    let written = fs::read_to_string(&path).unwrap();
    assert!(written.starts_with("# Welcome to Shellpad\n"));
    assert_eq!(parse_notebook(&written), notes);
}

fn backup_files(dir: &std::path::Path) -> Vec<String> {
    fs::read_dir(dir)
        .unwrap()
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.file_name().to_string_lossy().into_owned())
        .filter(|name| name.contains(".bak."))
        .collect()
}

#[test]
fn test_empty_and_blank_files_are_seeded_without_backup() {
    for contents in ["", "  \n\n\t\n"] {
        let temp_dir = tempdir().unwrap();
        let path = temp_dir.path().join("notes.md");
        fs::write(&path, contents).unwrap();

        let notes = NotebookStore::new(&path).load().expect("load");
        assert_eq!(notes, vec![Note::welcome()]);
        assert!(notes[0].body.lines().any(|line| line.starts_with("[ ]")));

        let written = fs::read_to_string(&path).unwrap();
        assert_eq!(parse_notebook(&written), notes);
        assert!(backup_files(temp_dir.path()).is_empty(), "{:?}", contents);
    }
}

#[test]
fn test_content_without_headings_is_backed_up() {
    let temp_dir = tempdir().unwrap();
    let path = temp_dir.path().join("notes.md");
    fs::write(&path, "loose text\nwithout a heading\n").unwrap();

    let notes = NotebookStore::new(&path).load().expect("load");
    assert_eq!(notes, vec![Note::welcome()]);

    let backups = backup_files(temp_dir.path());
    assert_eq!(backups.len(), 1);
    let backup = fs::read_to_string(temp_dir.path().join(&backups[0])).unwrap();
    assert_eq!(backup, "loose text\nwithout a heading\n");
}

#[test]
fn test_save_then_load_preserves_order_and_bodies() {
    let temp_dir = tempdir().unwrap();
    let path = temp_dir.path().join("notes.md");
    let store = NotebookStore::new(&path);
    let notes = vec![
        Note::new("Groceries", "[ ] milk\n[x] bread"),
        Note::new("Empty", ""),
        Note::new("Links", "see https://example.com\n\n  indented"),
    ];

    store.save(&notes).expect("save");
    assert_eq!(store.load().expect("load"), notes);

    let leftovers: Vec<_> = fs::read_dir(temp_dir.path())
        .unwrap()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_name().to_string_lossy().ends_with(".tmp"))
        .collect();
    assert!(leftovers.is_empty());
}

#[test]
fn test_text_before_first_heading_is_dropped() {
    let notes = parse_notebook("preamble\n\n#   Spaced title  \nbody   \n\n\n# Next\n");
    assert_eq!(
        notes,
        vec![Note::new("Spaced title", "body"), Note::new("Next", "")]
    );
}
