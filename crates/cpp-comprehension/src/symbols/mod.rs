mod table;

use std::fmt;
use std::rc::Rc;

pub use table::{build_symbol_table, kind_of_declaration, SymbolTable};

use crate::syntax::ast::AstNode;

/// A scope-qualified identifier: ordered scope parts plus the tail name.
/// `A::B::x` is `{ scope: ["A", "B"], name: "x" }`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SymbolName {
    pub scope: Vec<String>,
    pub name: String,
}

impl SymbolName {
    pub fn new(
        name: impl Into<String>,
        scope: Vec<String>,
    ) -> Self {
        Self {
            scope,
            name: name.into(),
        }
    }

    /// Split a `::`-qualified string into scope parts and tail.
    pub fn parse(qualified: &str) -> Self {
        let mut parts: Vec<String> = qualified.split("::").map(str::to_string).collect();
        let name = parts.pop().unwrap_or_default();
        Self { scope: parts, name }
    }

    pub fn scope_as_string(&self) -> String {
        self.scope.join("::")
    }
}

impl fmt::Display for SymbolName {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        if self.scope.is_empty() {
            return f.write_str(&self.name);
        }
        write!(f, "{}::{}", self.scope_as_string(), self.name)
    }
}

/// One declaration indexed by the symbol table.
///
/// Local symbols (declared inside a function body) never appear in
/// cross-file iteration results meaningfully and are subject to the
/// not-visible-before-declaration rule.
#[derive(Debug, Clone)]
pub struct Symbol {
    pub name: SymbolName,
    pub declaration: Rc<AstNode>,
    pub is_local: bool,
}

impl Symbol {
    pub fn new(
        name: impl Into<String>,
        scope: Vec<String>,
        declaration: Rc<AstNode>,
        is_local: bool,
    ) -> Self {
        Self {
            name: SymbolName::new(name, scope),
            declaration,
            is_local,
        }
    }
}

/// Editor-facing classification of a declaration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeclarationKind {
    Struct,
    Class,
    Function,
    Variable,
    Namespace,
    Member,
    PreprocessorDefinition,
}

/// A `(file, line, column)` location in the project.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectLocation {
    pub file: String,
    pub line: usize,
    pub column: usize,
}

/// One entry of a document's declaration listing, pushed to the client
/// through the declarations callback.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Declaration {
    pub name: String,
    pub position: ProjectLocation,
    pub kind: DeclarationKind,
    pub scope: String,
}

/// A TODO/FIXME marker extracted from comments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TodoEntry {
    pub content: String,
    pub filename: String,
    pub line: usize,
    pub column: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_splits_qualified_name() {
        let name = SymbolName::parse("A::B::x");
        assert_eq!(name.scope, ["A", "B"]);
        assert_eq!(name.name, "x");
        assert_eq!(name.to_string(), "A::B::x");
    }

    #[test]
    fn parse_unqualified() {
        let name = SymbolName::parse("x");
        assert!(name.scope.is_empty());
        assert_eq!(name.name, "x");
        assert_eq!(name.scope_as_string(), "");
    }

    #[test]
    fn equality_is_componentwise() {
        assert_eq!(SymbolName::parse("A::x"), SymbolName::new("x", vec!["A".into()]));
        assert_ne!(SymbolName::parse("A::x"), SymbolName::parse("B::x"));
    }
}
