pub mod store;

use std::rc::Rc;

use indexmap::IndexSet;

use crate::symbols::SymbolTable;
use crate::syntax::ast::AstNode;
use crate::syntax::parser::Parser;
use crate::syntax::preprocessor::Preprocessor;

/// The in-memory representation of one parsed source file: original
/// text, preprocessor state, parser (owning the AST), the symbol table
/// and the transitively reachable header paths (self excluded).
///
/// Documents are immutable once constructed; an edit builds a fresh
/// instance and swaps it into the store.
pub struct Document {
    filename: String,
    text: String,
    preprocessor: Preprocessor,
    parser: Parser,
    symbols: SymbolTable,
    available_headers: IndexSet<String>,
}

impl Document {
    pub fn new(
        filename: impl Into<String>,
        text: impl Into<String>,
        preprocessor: Preprocessor,
        parser: Parser,
        symbols: SymbolTable,
        available_headers: IndexSet<String>,
    ) -> Self {
        Self {
            filename: filename.into(),
            text: text.into(),
            preprocessor,
            parser,
            symbols,
            available_headers,
        }
    }

    pub fn filename(&self) -> &str {
        &self.filename
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn preprocessor(&self) -> &Preprocessor {
        &self.preprocessor
    }

    pub fn parser(&self) -> &Parser {
        &self.parser
    }

    pub fn root(&self) -> Option<Rc<AstNode>> {
        self.parser.root()
    }

    pub fn symbols(&self) -> &SymbolTable {
        &self.symbols
    }

    /// Absolute paths of every header transitively reachable through
    /// resolvable includes.
    pub fn available_headers(&self) -> &IndexSet<String> {
        &self.available_headers
    }
}
