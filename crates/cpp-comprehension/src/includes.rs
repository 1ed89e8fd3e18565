use regex::Regex;

use crate::config::EngineConfig;
use crate::vfs::FileDB;

/// Maps include-path syntax to absolute file paths.
///
/// `<...>` paths resolve under the configured system include roots,
/// `"..."` paths are project-root relative through the [`FileDB`]. The
/// resolver only builds paths, it never touches the filesystem.
#[derive(Debug)]
pub struct IncludeResolver {
    system_include_roots: Vec<std::path::PathBuf>,
    library_include: Regex,
    user_include: Regex,
}

impl IncludeResolver {
    pub fn new(config: &EngineConfig) -> Self {
        Self {
            system_include_roots: config.system_include_roots.clone(),
            library_include: Regex::new("<(.+)>").expect("static pattern"),
            user_include: Regex::new("\"(.+)\"").expect("static pattern"),
        }
    }

    /// Absolute path for an include-path token text (delimiters included),
    /// or the empty string when the text matches neither form.
    pub fn resolve(
        &self,
        include_path: &str,
        filedb: &dyn FileDB,
    ) -> String {
        if let Some(captures) = self.library_include.captures(include_path) {
            let path = &captures[1];
            if let Some(root) = self.system_include_roots.first() {
                return root.join(path).display().to_string();
            }
            return String::new();
        }
        if let Some(captures) = self.user_include.captures(include_path) {
            return filedb.to_absolute_path(&captures[1]);
        }
        String::new()
    }
}
