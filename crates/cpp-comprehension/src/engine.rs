use std::collections::HashMap;
use std::rc::Rc;

use indexmap::IndexSet;
use tracing::debug;

use crate::completion::{CompletionEntry, CompletionProvider};
use crate::config::EngineConfig;
use crate::definition::DefinitionProvider;
use crate::document::store::DocumentStore;
use crate::document::Document;
use crate::includes::IncludeResolver;
use crate::param_hint::{FunctionParamsHint, ParamHintProvider};
use crate::semantic_tokens::{SemanticTokenProvider, TokenInfo};
use crate::symbols::{build_symbol_table, kind_of_declaration, Declaration, DeclarationKind, ProjectLocation, TodoEntry};
use crate::syntax::parser::Parser;
use crate::syntax::preprocessor::{Definitions, Preprocessor};
use crate::text_pos::Position;
use crate::vfs::FileDB;

pub type DeclarationsCallback = Box<dyn Fn(&str, &[Declaration])>;
pub type TodosCallback = Box<dyn Fn(&str, &[TodoEntry])>;

/// The public query surface of the comprehension engine.
///
/// All queries are synchronous and total: failures surface as `None` or
/// empty collections, never as panics or errors. Documents materialize
/// lazily on first reference and are replaced wholesale on edit; callers
/// holding an old document snapshot stay valid.
pub struct ComprehensionEngine {
    filedb: Rc<dyn FileDB>,
    config: EngineConfig,
    include_resolver: IncludeResolver,
    store: DocumentStore,
    declarations_callback: Option<DeclarationsCallback>,
    todos_callback: Option<TodosCallback>,
    all_declarations: HashMap<String, Vec<Declaration>>,
}

impl ComprehensionEngine {
    pub fn new(filedb: Rc<dyn FileDB>) -> Self {
        Self::with_config(filedb, EngineConfig::default())
    }

    pub fn with_config(
        filedb: Rc<dyn FileDB>,
        config: EngineConfig,
    ) -> Self {
        let include_resolver = IncludeResolver::new(&config);
        Self {
            filedb,
            config,
            include_resolver,
            store: DocumentStore::new(),
            declarations_callback: None,
            todos_callback: None,
            all_declarations: HashMap::new(),
        }
    }

    /// Register the declarations-changed callback. Without one,
    /// declaration listings are dropped silently.
    pub fn set_declarations_callback(
        &mut self,
        callback: DeclarationsCallback,
    ) {
        self.declarations_callback = Some(callback);
    }

    pub fn set_todos_callback(
        &mut self,
        callback: TodosCallback,
    ) {
        self.todos_callback = Some(callback);
    }

    // ── engine API ──────────────────────────────────────────────────────

    /// Prewarm the cache for `file`.
    pub fn file_opened(
        &mut self,
        file: &str,
    ) {
        self.get_or_create_document(file);
    }

    /// Rebuild `file` from its current contents, replacing the cached
    /// document. Documents that include `file` are not rebuilt.
    pub fn on_edit(
        &mut self,
        file: &str,
    ) {
        let absolute = self.filedb.to_absolute_path(file);
        let Some(document) = self.create_document(&absolute) else {
            return;
        };
        let document = Rc::new(document);
        self.store.insert(absolute, document.clone());
        self.update_declared_symbols(&document);
        self.update_todo_entries(&document);
    }

    pub fn get_suggestions(
        &mut self,
        file: &str,
        position: Position,
    ) -> Vec<CompletionEntry> {
        debug!(file, %position, "get_suggestions");
        let Some(document) = self.get_or_create_document(file) else {
            return Vec::new();
        };
        let provider = CompletionProvider::new(&self.store, &self.config);
        provider.get_suggestions(self.filedb.as_ref(), &document, position)
    }

    pub fn find_declaration_of(
        &mut self,
        file: &str,
        position: Position,
    ) -> Option<ProjectLocation> {
        debug!(file, %position, "find_declaration_of");
        let document = self.get_or_create_document(file)?;
        DefinitionProvider::new(&self.store).find_declaration(&document, position)
    }

    pub fn get_function_params_hint(
        &mut self,
        file: &str,
        position: Position,
    ) -> Option<FunctionParamsHint> {
        debug!(file, %position, "get_function_params_hint");
        let document = self.get_or_create_document(file)?;
        ParamHintProvider::new(&self.store).get_function_params_hint(&document, position)
    }

    pub fn get_tokens_info(
        &mut self,
        file: &str,
    ) -> Vec<TokenInfo> {
        let Some(document) = self.get_or_create_document(file) else {
            return Vec::new();
        };
        SemanticTokenProvider::new(&self.store).get_tokens_info(&document)
    }

    /// Number of cached documents.
    pub fn document_count(&self) -> usize {
        self.store.len()
    }

    /// True outside of any pipeline run; the in-progress set must drain
    /// on every query exit path.
    pub fn no_build_in_progress(&self) -> bool {
        self.store.no_build_in_progress()
    }

    // ── document pipeline ───────────────────────────────────────────────

    fn get_or_create_document(
        &mut self,
        file: &str,
    ) -> Option<Rc<Document>> {
        let absolute = self.filedb.to_absolute_path(file);
        if let Some(document) = self.store.get(&absolute) {
            return Some(document);
        }
        let document = Rc::new(self.create_document(&absolute)?);
        self.store.insert(absolute, document.clone());
        self.update_declared_symbols(&document);
        self.update_todo_entries(&document);
        Some(document)
    }

    /// Build the full pipeline for one file: source text → preprocess
    /// (materializing included headers recursively) → parse → symbol
    /// table. Returns `None` for unresolvable files and include cycles;
    /// aborted builds are never cached, so a later non-cyclic path may
    /// still build the document.
    fn create_document(
        &mut self,
        absolute: &str,
    ) -> Option<Document> {
        let _guard = self.store.begin_build(absolute)?;
        let text = self.filedb.get_or_read(absolute)?;
        debug!(file = %absolute, bytes = text.len(), "building document");

        let mut preprocessor = Preprocessor::new(absolute, &text);
        preprocessor.set_ignore_unsupported_keywords(true);
        preprocessor.set_ignore_invalid_statements(true);
        preprocessor.set_keep_include_statements(true);

        let tokens = {
            let mut definitions_in_header = |include_path: &str| -> Definitions {
                let resolved = self.include_resolver.resolve(include_path, self.filedb.as_ref());
                if resolved.is_empty() {
                    return Definitions::default();
                }
                match self.get_or_create_document(&resolved) {
                    Some(included) => included.preprocessor().definitions().clone(),
                    None => Definitions::default(),
                }
            };
            preprocessor.process_and_lex(&mut definitions_in_header)
        };

        // Union the transitive header closure: direct includes plus
        // everything they already reach.
        let mut available_headers = IndexSet::new();
        let included_paths: Vec<String> = preprocessor.included_paths().to_vec();
        for include_path in included_paths {
            let resolved = self.include_resolver.resolve(&include_path, self.filedb.as_ref());
            if resolved.is_empty() {
                continue;
            }
            let Some(included) = self.get_or_create_document(&resolved) else {
                continue;
            };
            available_headers.insert(resolved);
            for header in included.available_headers() {
                available_headers.insert(header.clone());
            }
        }

        let mut parser = Parser::new(tokens, absolute);
        let root = parser.parse();
        let symbols = build_symbol_table(&root);

        Some(Document::new(absolute, text, preprocessor, parser, symbols, available_headers))
    }

    // ── declaration / TODO listings ─────────────────────────────────────

    fn update_declared_symbols(
        &mut self,
        document: &Document,
    ) {
        let mut declarations = Vec::new();
        for symbol in document.symbols().values() {
            declarations.push(Declaration {
                name: symbol.name.name.clone(),
                position: ProjectLocation {
                    file: document.filename().to_string(),
                    line: symbol.declaration.start.line,
                    column: symbol.declaration.start.column,
                },
                kind: kind_of_declaration(&symbol.declaration),
                scope: symbol.name.scope_as_string(),
            });
        }
        for (name, defined) in document.preprocessor().definitions() {
            declarations.push(Declaration {
                name: name.clone(),
                position: ProjectLocation {
                    file: document.filename().to_string(),
                    line: defined.line,
                    column: defined.column,
                },
                kind: DeclarationKind::PreprocessorDefinition,
                scope: String::new(),
            });
        }
        self.set_declarations_of_document(document.filename(), declarations);
    }

    fn set_declarations_of_document(
        &mut self,
        filename: &str,
        declarations: Vec<Declaration>,
    ) {
        // Without a registered callback the listing is dropped.
        if self.declarations_callback.is_none() {
            return;
        }
        // Unchanged listings are suppressed.
        if self.all_declarations.get(filename) == Some(&declarations) {
            return;
        }
        self.all_declarations.insert(filename.to_string(), declarations.clone());
        if let Some(callback) = &self.declarations_callback {
            callback(filename, &declarations);
        }
    }

    fn update_todo_entries(
        &mut self,
        document: &Document,
    ) {
        if self.todos_callback.is_none() {
            return;
        }
        let todos = document.parser().get_todo_entries();
        if let Some(callback) = &self.todos_callback {
            callback(document.filename(), &todos);
        }
    }
}
