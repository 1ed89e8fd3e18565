use std::rc::Rc;

use tracing::debug;

use crate::definition::Resolver;
use crate::document::store::DocumentStore;
use crate::document::Document;
use crate::param_hint::FunctionParamsHint;
use crate::syntax::ast::AstNode;
use crate::syntax::kind::TokenKind;
use crate::text_pos::Position;

pub struct ParamHintProvider<'a> {
    store: &'a DocumentStore,
}

impl<'a> ParamHintProvider<'a> {
    pub fn new(store: &'a DocumentStore) -> Self {
        Self { store }
    }

    pub fn get_function_params_hint(
        &self,
        document: &Document,
        position: Position,
    ) -> Option<FunctionParamsHint> {
        let node = document.parser().node_at(position)?;

        // Cursor directly on the call's parens: the call is the node itself.
        if node.is_function_call() {
            let token = document.parser().token_at(position);
            if matches!(
                token.map(|t| t.kind),
                Some(TokenKind::LParen) | Some(TokenKind::RParen)
            ) {
                let arguments = node.call_arguments();
                let index = arguments.len().saturating_sub(1);
                return self.hint_for_call(document, &node, index);
            }
        }

        // Otherwise walk upward until some ancestor is a call argument.
        let mut current = Some(node);
        let mut call_node: Option<Rc<AstNode>> = None;
        while let Some(node) = current {
            if let Some(parent) = node.parent() {
                if parent.is_function_call() {
                    call_node = Some(parent);
                    current = Some(node);
                    break;
                }
                current = Some(parent);
            } else {
                current = None;
            }
        }
        let call_node = call_node?;
        let argument = current?;

        let arguments = call_node.call_arguments();
        let index = arguments
            .iter()
            .position(|candidate| Rc::ptr_eq(candidate, &argument))
            .unwrap_or_else(|| arguments.len().saturating_sub(1));

        self.hint_for_call(document, &call_node, index)
    }

    fn hint_for_call(
        &self,
        document: &Document,
        call_node: &Rc<AstNode>,
        argument_index: usize,
    ) -> Option<FunctionParamsHint> {
        let callee = call_node.call_callee()?;
        let callee_identifier = if callee.is_identifier() {
            callee
        } else if callee.is_name() {
            callee.name_identifier()?
        } else if callee.is_member_expression() {
            let property = callee.member_property()?;
            if !property.is_identifier() {
                return None;
            }
            property
        } else {
            debug!("unexpected callee node for params hint");
            return None;
        };

        let resolver = Resolver::new(self.store);
        let found = resolver.find_declaration_of_node(document, &callee_identifier)?;
        if !found.declaration.is_function() {
            debug!("params hint target is not a function");
            return None;
        }

        // Parameter texts come from the declaring document's tokens.
        let declaring_document = self.store.get(&found.filename)?;
        let mut params = Vec::new();
        for parameter in found.declaration.function_parameters() {
            let texts: Vec<String> = declaring_document
                .parser()
                .tokens_in_range(parameter.start, parameter.end)
                .into_iter()
                .map(|token| token.text)
                .collect();
            params.push(texts.join(" "));
        }

        Some(FunctionParamsHint {
            params,
            current_index: argument_index,
        })
    }
}
