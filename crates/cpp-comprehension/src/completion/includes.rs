use std::path::PathBuf;

use tracing::debug;

use crate::completion::{CompletionEntry, HideAutocompleteAfterApplying, Language};
use crate::config::EngineConfig;
use crate::syntax::lexer::Token;
use crate::text_pos::Position;
use crate::vfs::FileDB;

/// Include-path completion over the directory named by the partial path.
///
/// `<...>` paths enumerate under the first system include root, `"..."`
/// paths under the project root. Subdirectories complete with a trailing
/// `/` and keep the popup open; files are offered when they carry a
/// configured header extension. Returns `None` when the token is not an
/// include path at all, or when the cursor sits past a typed closing
/// delimiter.
pub fn complete_include_path(
    filedb: &dyn FileDB,
    config: &EngineConfig,
    token: &Token,
    cursor: Position,
) -> Option<Vec<CompletionEntry>> {
    let mut partial = token.text.trim().to_string();

    let include_root: PathBuf;
    let is_system: bool;
    let mut already_has_suffix = false;
    if partial.starts_with('<') {
        include_root = config.system_include_roots.first().cloned().unwrap_or_default();
        is_system = true;
        if partial.ends_with('>') {
            already_has_suffix = true;
            partial.pop();
            partial = partial.trim_end().to_string();
        }
    } else if partial.starts_with('"') {
        include_root = filedb.project_root().map(PathBuf::from).unwrap_or_default();
        is_system = false;
        if partial.len() > 1 && partial.ends_with('"') {
            already_has_suffix = true;
            partial.pop();
            partial = partial.trim_end().to_string();
        }
    } else {
        return None;
    }

    // Cursor past the closing delimiter: not inside the path anymore.
    if already_has_suffix && token.end <= cursor {
        return None;
    }

    let last_slash = partial.rfind('/');
    let include_dir = match last_slash {
        Some(index) => partial[1..=index].to_string(),
        None => String::new(),
    };
    let partial_basename = &partial[last_slash.map_or(1, |index| index + 1)..];

    let full_dir = include_root.join(&include_dir);
    debug!(dir = %full_dir.display(), basename = partial_basename, "include completion");

    let mut dir_entries: Vec<(String, bool)> = Vec::new();
    if let Ok(read_dir) = std::fs::read_dir(&full_dir) {
        for entry in read_dir.flatten() {
            let Ok(name) = entry.file_name().into_string() else {
                continue;
            };
            let is_dir = entry.file_type().map_or(false, |file_type| file_type.is_dir());
            dir_entries.push((name, is_dir));
        }
    }
    dir_entries.sort();

    let (prefix, suffix) = if is_system { ("<", ">") } else { ("\"", "\"") };
    let partial_length = include_dir.len() + partial_basename.len() + 1;

    let mut options = Vec::new();
    for (name, is_dir) in dir_entries {
        if !name.starts_with(partial_basename) {
            continue;
        }
        if is_dir {
            options.push(CompletionEntry {
                completion: format!("{prefix}{include_dir}{name}/"),
                partial_input_length: partial_length,
                language: Language::Cpp,
                display_text: Some(name),
                hide_after_applying: HideAutocompleteAfterApplying::No,
            });
        } else if config.header_extensions.iter().any(|extension| name.ends_with(extension.as_str())) {
            let close = if already_has_suffix { "" } else { suffix };
            options.push(CompletionEntry {
                completion: format!("{prefix}{include_dir}{name}{close}"),
                partial_input_length: partial_length,
                language: Language::Cpp,
                display_text: Some(name),
                hide_after_applying: HideAutocompleteAfterApplying::Yes,
            });
        }
    }

    Some(options)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::syntax::kind::TokenKind;
    use crate::vfs::LocalFileDB;
    use std::fs;

    fn include_token(
        text: &str,
        line: usize,
        start_column: usize,
    ) -> Token {
        let end_column = start_column + text.chars().count() - 1;
        Token::new(
            TokenKind::IncludePath,
            text,
            Position::new(line, start_column),
            Position::new(line, end_column),
        )
    }

    fn sysroot_config(root: &std::path::Path) -> EngineConfig {
        EngineConfig {
            system_include_roots: vec![root.to_path_buf()],
            ..EngineConfig::default()
        }
    }

    #[test]
    fn completes_headers_in_project_root() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("sample_header.hh"), "").unwrap();
        fs::write(dir.path().join("notes.txt"), "").unwrap();
        let mut filedb = LocalFileDB::new();
        filedb.set_project_root(Some(dir.path().to_path_buf()));

        let token = include_token("\"sample_head", 0, 9);
        let entries =
            complete_include_path(&filedb, &EngineConfig::default(), &token, Position::new(0, 20)).unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].completion, "\"sample_header.hh\"");
        assert_eq!(entries[0].partial_input_length, 12);
        assert_eq!(entries[0].hide_after_applying, HideAutocompleteAfterApplying::Yes);
    }

    #[test]
    fn completes_system_headers_in_subdirectory() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("sys")).unwrap();
        fs::write(dir.path().join("sys/asoundlib.h"), "").unwrap();

        let filedb = LocalFileDB::new();
        let token = include_token("<sys/asou", 1, 9);
        let entries =
            complete_include_path(&filedb, &sysroot_config(dir.path()), &token, Position::new(1, 17)).unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].completion, "<sys/asoundlib.h>");
        assert_eq!(entries[0].partial_input_length, 9);
    }

    #[test]
    fn directories_complete_with_trailing_slash() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("sys")).unwrap();

        let filedb = LocalFileDB::new();
        let token = include_token("<sy", 0, 9);
        let entries =
            complete_include_path(&filedb, &sysroot_config(dir.path()), &token, Position::new(0, 11)).unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].completion, "<sys/");
        assert_eq!(entries[0].hide_after_applying, HideAutocompleteAfterApplying::No);
    }

    #[test]
    fn cursor_past_closing_delimiter_suppresses() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("a.h"), "").unwrap();

        let filedb = LocalFileDB::new();
        // `<a.h>` spans columns 9..13; the cursor sits on the closer.
        let token = include_token("<a.h>", 0, 9);
        assert!(complete_include_path(&filedb, &sysroot_config(dir.path()), &token, Position::new(0, 13)).is_none());
    }

    #[test]
    fn typed_closer_is_not_duplicated() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("a.h"), "").unwrap();

        let filedb = LocalFileDB::new();
        let token = include_token("<a>", 0, 9);
        let entries =
            complete_include_path(&filedb, &sysroot_config(dir.path()), &token, Position::new(0, 10)).unwrap();
        // The user already typed the `>`; the completion must not add another.
        assert_eq!(entries[0].completion, "<a.h");
    }

    #[test]
    fn non_include_text_returns_none() {
        let filedb = LocalFileDB::new();
        let token = include_token("plain", 0, 0);
        assert!(complete_include_path(&filedb, &EngineConfig::default(), &token, Position::new(0, 2)).is_none());
    }
}
