use tracing::debug;

use crate::definition::{find_preprocessor_substitution, Resolver};
use crate::document::store::DocumentStore;
use crate::document::Document;
use crate::semantic_tokens::{SemanticTokenType, TokenInfo};
use crate::syntax::kind::TokenKind;
use crate::syntax::lexer::Token;
use crate::syntax::queries;
use crate::text_pos::Position;

/// Classifies every token of the preprocessor's unprocessed stream.
///
/// Identifiers are refined through the resolver: macro uses map to
/// `PreprocessorMacro`, resolvable references take the kind of their
/// declaration, everything else stays `Identifier`.
pub struct SemanticTokenProvider<'a> {
    store: &'a DocumentStore,
}

impl<'a> SemanticTokenProvider<'a> {
    pub fn new(store: &'a DocumentStore) -> Self {
        Self { store }
    }

    pub fn get_tokens_info(
        &self,
        document: &Document,
    ) -> Vec<TokenInfo> {
        let tokens = document.preprocessor().unprocessed_tokens();
        debug!(file = %document.filename(), tokens = tokens.len(), "classifying tokens");
        tokens
            .iter()
            .map(|token| TokenInfo {
                semantic_type: self.semantic_type_of(document, token),
                start_line: token.start.line,
                start_column: token.start.column,
                end_line: token.end.line,
                end_column: token.end.column,
            })
            .collect()
    }

    fn semantic_type_of(
        &self,
        document: &Document,
        token: &Token,
    ) -> SemanticTokenType {
        match token.kind {
            TokenKind::Identifier => self.semantic_type_for_identifier(document, token.start),
            TokenKind::EscapeSequence => SemanticTokenType::Keyword,
            TokenKind::Integer | TokenKind::Float => SemanticTokenType::Number,
            TokenKind::IncludePath => SemanticTokenType::IncludePath,
            TokenKind::IncludeStatement | TokenKind::PreprocessorStatement => {
                SemanticTokenType::PreprocessorStatement
            },
            TokenKind::Comment => SemanticTokenType::Comment,
            kind if queries::is_known_type(kind) => SemanticTokenType::Type,
            kind if queries::is_keyword(kind) => SemanticTokenType::Keyword,
            kind if queries::is_string(kind) => SemanticTokenType::String,
            _ => SemanticTokenType::Unknown,
        }
    }

    fn semantic_type_for_identifier(
        &self,
        document: &Document,
        position: Position,
    ) -> SemanticTokenType {
        if find_preprocessor_substitution(document, position).is_some() {
            return SemanticTokenType::PreprocessorMacro;
        }

        let resolver = Resolver::new(self.store);
        let Some(found) = resolver.find_declaration_at(document, position) else {
            return SemanticTokenType::Identifier;
        };
        let declaration = found.declaration;

        if declaration.is_function() {
            return SemanticTokenType::Function;
        }
        if declaration.is_parameter() {
            return SemanticTokenType::Parameter;
        }
        if declaration.is_variable_declaration() {
            if declaration.is_member() {
                return SemanticTokenType::Member;
            }
            return SemanticTokenType::Variable;
        }
        if declaration.is_struct_or_class() || declaration.is_enum() {
            return SemanticTokenType::CustomType;
        }
        if declaration.is_namespace() {
            return SemanticTokenType::Namespace;
        }
        SemanticTokenType::Identifier
    }
}
