pub mod completion;
pub mod config;
pub mod definition;
pub mod document;
pub mod engine;
pub mod includes;
pub mod param_hint;
pub mod semantic_tokens;
pub mod symbols;
pub mod syntax;
pub mod text_pos;
pub mod vfs;

pub use completion::{CompletionEntry, CompletionProvider, HideAutocompleteAfterApplying, Language};
pub use config::EngineConfig;
pub use definition::DefinitionProvider;
pub use engine::ComprehensionEngine;
pub use includes::IncludeResolver;
pub use param_hint::FunctionParamsHint;
pub use semantic_tokens::{SemanticTokenProvider, SemanticTokenType, TokenInfo};
pub use symbols::{Declaration, DeclarationKind, ProjectLocation, TodoEntry};
pub use text_pos::Position;
pub use vfs::{FileDB, LocalFileDB};
