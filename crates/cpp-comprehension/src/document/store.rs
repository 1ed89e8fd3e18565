use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::rc::Rc;

use tracing::debug;

use crate::document::Document;

/// Owns every materialized document, keyed by absolute path, plus the
/// in-progress set that breaks circular include chains.
///
/// Inserting replaces any previous document; callers still holding the
/// old `Rc` keep a valid snapshot. The in-progress set is only touched
/// through [`InProgressGuard`], so it drains on every exit path of a
/// pipeline run, including aborted ones.
#[derive(Default)]
pub struct DocumentStore {
    documents: HashMap<String, Rc<Document>>,
    in_progress: Rc<RefCell<HashSet<String>>>,
}

impl DocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(
        &self,
        absolute_path: &str,
    ) -> Option<Rc<Document>> {
        self.documents.get(absolute_path).cloned()
    }

    pub fn contains(
        &self,
        absolute_path: &str,
    ) -> bool {
        self.documents.contains_key(absolute_path)
    }

    pub fn insert(
        &mut self,
        absolute_path: String,
        document: Rc<Document>,
    ) {
        debug!(file = %absolute_path, "document cached");
        self.documents.insert(absolute_path, document);
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    /// Mark `absolute_path` as being built. Returns `None` when the path
    /// is already building — the caller hit an include cycle and must
    /// abort that branch.
    pub fn begin_build(
        &self,
        absolute_path: &str,
    ) -> Option<InProgressGuard> {
        if !self.in_progress.borrow_mut().insert(absolute_path.to_string()) {
            debug!(file = %absolute_path, "include cycle detected");
            return None;
        }
        Some(InProgressGuard {
            in_progress: self.in_progress.clone(),
            path: absolute_path.to_string(),
        })
    }

    /// True when no pipeline run is underway.
    pub fn no_build_in_progress(&self) -> bool {
        self.in_progress.borrow().is_empty()
    }
}

/// Scoped membership in the in-progress set.
pub struct InProgressGuard {
    in_progress: Rc<RefCell<HashSet<String>>>,
    path: String,
}

impl Drop for InProgressGuard {
    fn drop(&mut self) {
        self.in_progress.borrow_mut().remove(&self.path);
    }
}
