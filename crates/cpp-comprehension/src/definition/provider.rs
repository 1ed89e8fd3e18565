use tracing::debug;

use crate::definition::resolver::Resolver;
use crate::document::store::DocumentStore;
use crate::document::Document;
use crate::symbols::ProjectLocation;
use crate::syntax::preprocessor::Substitution;
use crate::text_pos::Position;

/// Jump-to-declaration entry point: declaration search through the
/// resolver, with a fallback to preprocessor macro definitions so macro
/// uses navigate to their `#define`.
pub struct DefinitionProvider<'a> {
    store: &'a DocumentStore,
}

impl<'a> DefinitionProvider<'a> {
    pub fn new(store: &'a DocumentStore) -> Self {
        Self { store }
    }

    pub fn find_declaration(
        &self,
        document: &Document,
        position: Position,
    ) -> Option<ProjectLocation> {
        let resolver = Resolver::new(self.store);
        if let Some(found) = resolver.find_declaration_at(document, position) {
            debug!(file = %found.filename, line = found.declaration.start.line, "declaration found");
            return Some(ProjectLocation {
                file: found.filename,
                line: found.declaration.start.line,
                column: found.declaration.start.column,
            });
        }

        let substitution = find_preprocessor_substitution(document, position)?;
        Some(ProjectLocation {
            file: substitution.defined_value.filename.clone(),
            line: substitution.defined_value.line,
            column: substitution.defined_value.column,
        })
    }
}

/// The substitution whose first original token contains `position`,
/// inclusive on both ends.
pub fn find_preprocessor_substitution(
    document: &Document,
    position: Position,
) -> Option<&Substitution> {
    document.preprocessor().substitutions().iter().find(|substitution| {
        substitution
            .original_tokens
            .first()
            .map_or(false, |first| first.start <= position && position <= first.end)
    })
}
