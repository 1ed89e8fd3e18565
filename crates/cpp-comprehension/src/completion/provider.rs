use std::ops::ControlFlow;
use std::rc::Rc;

use tracing::debug;

use crate::completion::{complete_include_path, CompletionEntry};
use crate::config::EngineConfig;
use crate::definition::{is_symbol_available, scope_of_node, scope_of_reference, Resolver};
use crate::document::store::DocumentStore;
use crate::document::Document;
use crate::syntax::ast::AstNode;
use crate::syntax::kind::TokenKind;
use crate::syntax::lexer::Token;
use crate::text_pos::Position;

/// Prefix-based identifier, member-access and include-path suggestions.
pub struct CompletionProvider<'a> {
    store: &'a DocumentStore,
    config: &'a EngineConfig,
}

impl<'a> CompletionProvider<'a> {
    pub fn new(
        store: &'a DocumentStore,
        config: &'a EngineConfig,
    ) -> Self {
        Self { store, config }
    }

    pub fn get_suggestions(
        &self,
        filedb: &dyn crate::vfs::FileDB,
        document: &Document,
        position: Position,
    ) -> Vec<CompletionEntry> {
        // The cursor sits after the typed text; look one column left.
        let position = position.previous_column();
        let containing_token = document.parser().token_at(position);

        if let Some(token) = &containing_token {
            if token.kind == TokenKind::IncludePath {
                if let Some(entries) = complete_include_path(filedb, self.config, token, position) {
                    return entries;
                }
            }
        }

        let Some(node) = document.parser().node_at(position) else {
            debug!(%position, "no node at completion position");
            return Vec::new();
        };
        if node.parent().is_none() {
            return Vec::new();
        }

        if let Some(entries) = self.try_complete_property(document, &node, containing_token.as_ref()) {
            return entries;
        }
        if let Some(entries) = self.try_complete_name(document, &node, containing_token.as_ref()) {
            return entries;
        }
        Vec::new()
    }

    /// Member-access completion: the node hangs off a member expression
    /// and the cursor is on the `.` or inside the property prefix.
    fn try_complete_property(
        &self,
        document: &Document,
        node: &Rc<AstNode>,
        containing_token: Option<&Token>,
    ) -> Option<Vec<CompletionEntry>> {
        let token = containing_token?;
        let parent = node.parent()?;
        if !parent.is_member_expression() {
            return None;
        }

        let partial = if matches!(token.kind, TokenKind::Dot | TokenKind::Arrow) {
            String::new()
        } else {
            let property = parent.member_property()?;
            if !Rc::ptr_eq(&property, node) {
                return None;
            }
            token.text.clone()
        };

        Some(self.complete_property(document, &parent, &partial))
    }

    fn complete_property(
        &self,
        document: &Document,
        member: &Rc<AstNode>,
        partial: &str,
    ) -> Vec<CompletionEntry> {
        let resolver = Resolver::new(self.store);
        let Some(object) = member.member_object() else {
            return Vec::new();
        };
        let object_type = resolver.type_of(document, &object);
        if object_type.is_empty() {
            debug!("could not infer type of member object");
            return Vec::new();
        }

        resolver
            .properties_of_type(document, &object_type)
            .into_iter()
            .filter(|property| property.name.name.starts_with(partial))
            .map(|property| CompletionEntry::name(property.name.name, partial.len()))
            .collect()
    }

    /// Identifier completion over all available symbols, plus macro
    /// names when the reference is unqualified.
    fn try_complete_name(
        &self,
        document: &Document,
        node: &Rc<AstNode>,
        containing_token: Option<&Token>,
    ) -> Option<Vec<CompletionEntry>> {
        let partial = match containing_token {
            Some(token) if token.kind != TokenKind::ColonColon => token.text.clone(),
            _ => String::new(),
        };
        Some(self.complete_name(document, node, &partial))
    }

    fn complete_name(
        &self,
        document: &Document,
        node: &Rc<AstNode>,
        partial: &str,
    ) -> Vec<CompletionEntry> {
        let resolver = Resolver::new(self.store);
        let reference_scope = scope_of_reference(node);
        let current_scope = scope_of_node(node);

        let mut entries = Vec::new();
        resolver.for_each_available_symbol(document, |_, symbol| {
            if !is_symbol_available(symbol, &current_scope, &reference_scope) {
                return ControlFlow::Continue(());
            }
            if !symbol.name.name.starts_with(partial) {
                return ControlFlow::Continue(());
            }
            // Locals declared below the cursor are not offered.
            if symbol.is_local && symbol.declaration.start.line > node.start.line {
                return ControlFlow::Continue(());
            }
            entries.push(CompletionEntry::name(symbol.name.name.clone(), partial.len()));
            ControlFlow::Continue(())
        });

        if reference_scope.is_empty() {
            for name in document.preprocessor().definitions().keys() {
                if name.starts_with(partial) {
                    entries.push(CompletionEntry::name(name.clone(), partial.len()));
                }
            }
        }

        entries
    }
}
