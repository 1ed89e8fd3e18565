use std::cell::RefCell;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Pluggable file database: path normalization and content retrieval.
///
/// All engine file access funnels through this trait; failures are
/// expressed as `None` and leave the corresponding document unbuilt.
pub trait FileDB {
    /// File contents for `path`, or `None` when unresolvable.
    fn get_or_read(
        &self,
        path: &str,
    ) -> Option<String>;

    fn project_root(&self) -> Option<&Path>;

    /// Absolute form of `name`: unchanged when already absolute, joined
    /// with the project root when one is set, otherwise unchanged.
    fn to_absolute_path(
        &self,
        name: &str,
    ) -> String {
        if Path::new(name).is_absolute() {
            return name.to_string();
        }
        match self.project_root() {
            Some(root) => root.join(name).display().to_string(),
            None => name.to_string(),
        }
    }
}

/// In-memory file database used by the test driver and tests.
///
/// Contents are registered under project-relative names; absolute lookups
/// under the project root are stripped back to the registered name.
/// Registration takes `&self` so content can be swapped behind the shared
/// handle the engine holds, which is how edits are simulated.
#[derive(Debug, Default)]
pub struct LocalFileDB {
    files: RefCell<HashMap<String, String>>,
    project_root: Option<PathBuf>,
}

impl LocalFileDB {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_project_root(root: PathBuf) -> Self {
        Self {
            files: RefCell::new(HashMap::new()),
            project_root: Some(root),
        }
    }

    pub fn set_project_root(
        &mut self,
        root: Option<PathBuf>,
    ) {
        self.project_root = root;
    }

    pub fn add(
        &self,
        name: impl Into<String>,
        content: impl Into<String>,
    ) {
        self.files.borrow_mut().insert(name.into(), content.into());
    }

    pub fn remove(
        &self,
        name: &str,
    ) {
        self.files.borrow_mut().remove(name);
    }
}

impl FileDB for LocalFileDB {
    fn get_or_read(
        &self,
        path: &str,
    ) -> Option<String> {
        let mut key = path;
        if let Some(root) = self.project_root() {
            if let Ok(relative) = Path::new(path).strip_prefix(root) {
                key = relative.to_str().unwrap_or(path);
            }
        }
        self.files.borrow().get(key).cloned()
    }

    fn project_root(&self) -> Option<&Path> {
        self.project_root.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absolute_paths_pass_through() {
        let filedb = LocalFileDB::new();
        assert_eq!(filedb.to_absolute_path("/usr/include/stdio.h"), "/usr/include/stdio.h");
    }

    #[test]
    fn relative_paths_join_project_root() {
        let mut filedb = LocalFileDB::new();
        filedb.set_project_root(Some(PathBuf::from("/proj")));
        assert_eq!(filedb.to_absolute_path("main.cc"), "/proj/main.cc");
    }

    #[test]
    fn relative_paths_unchanged_without_root() {
        let filedb = LocalFileDB::new();
        assert_eq!(filedb.to_absolute_path("main.cc"), "main.cc");
    }

    #[test]
    fn lookup_strips_project_root_prefix() {
        let mut filedb = LocalFileDB::new();
        filedb.set_project_root(Some(PathBuf::from("/proj")));
        filedb.add("main.cc", "int x;");
        assert_eq!(filedb.get_or_read("/proj/main.cc").as_deref(), Some("int x;"));
        assert_eq!(filedb.get_or_read("main.cc").as_deref(), Some("int x;"));
        assert!(filedb.get_or_read("/elsewhere/main.cc").is_none());
    }
}
