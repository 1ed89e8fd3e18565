#![allow(dead_code)]

use std::path::PathBuf;
use std::rc::Rc;

use cpp_comprehension::completion::CompletionEntry;
use cpp_comprehension::{ComprehensionEngine, LocalFileDB, Position};

pub fn fixture_root() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/test")
}

pub fn read_fixture(name: &str) -> String {
    std::fs::read_to_string(fixture_root().join(name)).expect("fixture must exist")
}

/// Engine over in-memory sources registered by project-relative name.
pub fn engine_with_sources(files: &[(&str, &str)]) -> ComprehensionEngine {
    let filedb = LocalFileDB::new();
    for (name, content) in files {
        filedb.add(*name, *content);
    }
    ComprehensionEngine::new(Rc::new(filedb))
}

/// Same, but also hands back the file database so tests can swap
/// contents and drive `on_edit`.
pub fn shared_engine(files: &[(&str, &str)]) -> (Rc<LocalFileDB>, ComprehensionEngine) {
    let filedb = Rc::new(LocalFileDB::new());
    for (name, content) in files {
        filedb.add(*name, *content);
    }
    let engine = ComprehensionEngine::new(filedb.clone());
    (filedb, engine)
}

/// Engine whose files come from the shared fixture directory.
pub fn engine_with_fixtures(files: &[&str]) -> ComprehensionEngine {
    let filedb = LocalFileDB::new();
    for name in files {
        filedb.add(*name, read_fixture(name));
    }
    ComprehensionEngine::new(Rc::new(filedb))
}

pub fn completions(entries: &[CompletionEntry]) -> Vec<String> {
    entries.iter().map(|entry| entry.completion.clone()).collect()
}

pub fn position_of(
    source: &str,
    needle: &str,
) -> Position {
    position_of_nth(source, needle, 0)
}

pub fn position_of_nth(
    source: &str,
    needle: &str,
    nth: usize,
) -> Position {
    assert!(!needle.is_empty(), "needle must not be empty");
    let mut from = 0usize;
    let mut current = 0usize;

    loop {
        let Some(index) = source[from..].find(needle) else {
            panic!("needle not found: {needle}");
        };
        let absolute = from + index;
        if current == nth {
            let before = &source[..absolute];
            let line = before.bytes().filter(|&b| b == b'\n').count();
            let column = before
                .rsplit_once('\n')
                .map(|(_, tail)| tail.chars().count())
                .unwrap_or_else(|| before.chars().count());
            return Position::new(line, column);
        }
        current += 1;
        from = absolute + needle.len();
    }
}

/// Cursor position directly after the `nth` occurrence of `needle`,
/// which is where an editor sits right after the user typed it.
pub fn cursor_after_nth(
    source: &str,
    needle: &str,
    nth: usize,
) -> Position {
    let start = position_of_nth(source, needle, nth);
    Position::new(start.line, start.column + needle.chars().count())
}

pub fn cursor_after(
    source: &str,
    needle: &str,
) -> Position {
    cursor_after_nth(source, needle, 0)
}
