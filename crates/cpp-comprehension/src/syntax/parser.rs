use std::rc::Rc;

use tracing::trace;

use crate::symbols::TodoEntry;
use crate::syntax::ast::{link_parents, AstNode, NodeKind, RecordKind};
use crate::syntax::kind::TokenKind;
use crate::syntax::lexer::Token;
use crate::syntax::queries;
use crate::text_pos::Position;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DeclContext {
    TopLevel,
    Record,
    Block,
}

/// Recursive-descent parser over the preprocessor's processed stream.
///
/// The grammar is a tolerant C++ subset: anything it does not understand
/// is consumed without diagnostics, since comprehension queries only need
/// the declarations and expressions around the cursor. The full token
/// list is retained for position queries (`token_at`, `tokens_in_range`).
pub struct Parser {
    tokens: Vec<Token>,
    code: Vec<usize>,
    cursor: usize,
    filename: String,
    root: Option<Rc<AstNode>>,
    nodes: Vec<Rc<AstNode>>,
}

impl Parser {
    pub fn new(
        tokens: Vec<Token>,
        filename: &str,
    ) -> Self {
        let code = tokens
            .iter()
            .enumerate()
            .filter(|(_, token)| {
                !matches!(
                    token.kind,
                    TokenKind::Comment
                        | TokenKind::IncludeStatement
                        | TokenKind::IncludePath
                        | TokenKind::PreprocessorStatement
                        | TokenKind::Whitespace
                )
            })
            .map(|(index, _)| index)
            .collect();
        Self {
            tokens,
            code,
            cursor: 0,
            filename: filename.to_string(),
            root: None,
            nodes: Vec::new(),
        }
    }

    pub fn filename(&self) -> &str {
        &self.filename
    }

    /// Parse the whole token stream into a translation unit.
    pub fn parse(&mut self) -> Rc<AstNode> {
        let start = self.peek().map(|t| t.start).unwrap_or_default();
        let mut declarations = Vec::new();
        while !self.is_eof() {
            let before = self.cursor;
            if let Some(declaration) = self.parse_declaration(DeclContext::TopLevel) {
                declarations.push(declaration);
            }
            if self.cursor == before {
                self.bump();
            }
        }
        let end = self.prev_end().unwrap_or(start);
        let root = AstNode::new(NodeKind::TranslationUnit { declarations }, start, end);
        link_parents(&root);
        self.nodes.clear();
        collect_nodes(&root, &mut self.nodes);
        trace!(file = %self.filename, nodes = self.nodes.len(), "parsed");
        self.root = Some(root.clone());
        root
    }

    pub fn root(&self) -> Option<Rc<AstNode>> {
        self.root.clone()
    }

    /// Deepest AST node whose inclusive range contains `position`.
    pub fn node_at(
        &self,
        position: Position,
    ) -> Option<Rc<AstNode>> {
        let mut best: Option<Rc<AstNode>> = None;
        for node in &self.nodes {
            if !node.contains(position) {
                continue;
            }
            let replace = match &best {
                None => true,
                Some(current) => node.start >= current.start && node.end <= current.end,
            };
            if replace {
                best = Some(node.clone());
            }
        }
        best
    }

    /// Token (including comments and preprocessor leftovers) containing
    /// `position`.
    pub fn token_at(
        &self,
        position: Position,
    ) -> Option<Token> {
        self.tokens.iter().find(|token| token.contains(position)).cloned()
    }

    /// Code tokens fully inside the inclusive `[start, end]` range.
    pub fn tokens_in_range(
        &self,
        start: Position,
        end: Position,
    ) -> Vec<Token> {
        self.code
            .iter()
            .map(|&index| &self.tokens[index])
            .filter(|token| token.start >= start && token.end <= end)
            .cloned()
            .collect()
    }

    /// Source text of a node, reconstructed from its tokens.
    pub fn text_of_node(
        &self,
        node: &AstNode,
    ) -> String {
        let texts: Vec<String> = self
            .tokens_in_range(node.start, node.end)
            .into_iter()
            .map(|token| token.text)
            .collect();
        texts.join(" ")
    }

    /// TODO/FIXME markers found in comment tokens.
    pub fn get_todo_entries(&self) -> Vec<TodoEntry> {
        self.tokens
            .iter()
            .filter(|token| token.kind == TokenKind::Comment)
            .filter(|token| token.text.contains("TODO") || token.text.contains("FIXME"))
            .map(|token| TodoEntry {
                content: token.text.trim_start_matches('/').trim_start_matches('*').trim().to_string(),
                filename: self.filename.clone(),
                line: token.start.line,
                column: token.start.column,
            })
            .collect()
    }

    // ── token cursor ────────────────────────────────────────────────────

    fn is_eof(&self) -> bool {
        self.cursor >= self.code.len()
    }

    fn peek(&self) -> Option<&Token> {
        self.code.get(self.cursor).map(|&index| &self.tokens[index])
    }

    fn peek_kind(&self) -> Option<TokenKind> {
        self.peek().map(|token| token.kind)
    }

    fn peek_nth(
        &self,
        n: usize,
    ) -> Option<&Token> {
        self.code.get(self.cursor + n).map(|&index| &self.tokens[index])
    }

    fn at(
        &self,
        kind: TokenKind,
    ) -> bool {
        self.peek_kind() == Some(kind)
    }

    fn bump(&mut self) -> Option<Token> {
        let token = self.peek().cloned();
        if token.is_some() {
            self.cursor += 1;
        }
        token
    }

    fn eat(
        &mut self,
        kind: TokenKind,
    ) -> bool {
        if self.at(kind) {
            self.cursor += 1;
            return true;
        }
        false
    }

    fn prev_end(&self) -> Option<Position> {
        if self.cursor == 0 {
            return None;
        }
        self.code.get(self.cursor - 1).map(|&index| self.tokens[index].end)
    }

    fn node(
        &self,
        kind: NodeKind,
        start: Position,
    ) -> Rc<AstNode> {
        let end = self.prev_end().unwrap_or(start);
        AstNode::new(kind, start, end)
    }

    // ── declarations ────────────────────────────────────────────────────

    fn parse_declaration(
        &mut self,
        context: DeclContext,
    ) -> Option<Rc<AstNode>> {
        match self.peek_kind()? {
            TokenKind::KwNamespace => self.parse_namespace(),
            TokenKind::KwStruct | TokenKind::KwClass => self.parse_struct_or_class(),
            TokenKind::KwEnum => self.parse_enum(),
            TokenKind::KwTypedef | TokenKind::KwUsing => {
                self.consume_until_semicolon();
                None
            },
            _ if self.looks_like_declaration() => self.parse_function_or_variable(context),
            _ => None,
        }
    }

    /// Lookahead: qualifiers, a type (builtin or possibly-qualified user
    /// type), pointer/reference markers, then a declarator identifier.
    fn looks_like_declaration(&self) -> bool {
        let mut n = 0usize;
        while self.peek_nth(n).map_or(false, |t| queries::is_declaration_qualifier(t.kind)) {
            n += 1;
        }
        let Some(first) = self.peek_nth(n) else {
            return false;
        };
        if queries::is_known_type(first.kind) {
            while self.peek_nth(n).map_or(false, |t| queries::is_known_type(t.kind)) {
                n += 1;
            }
        } else if first.kind == TokenKind::Identifier {
            n += 1;
            while self.peek_nth(n).map_or(false, |t| t.kind == TokenKind::ColonColon)
                && self.peek_nth(n + 1).map_or(false, |t| t.kind == TokenKind::Identifier)
            {
                n += 2;
            }
        } else {
            return false;
        }
        while self.peek_nth(n).map_or(false, |t| {
            matches!(
                t.kind,
                TokenKind::Star | TokenKind::Amp | TokenKind::AndAnd | TokenKind::KwConst | TokenKind::KwVolatile
            )
        }) {
            n += 1;
        }
        self.peek_nth(n).map_or(false, |t| t.kind == TokenKind::Identifier)
    }

    fn parse_namespace(&mut self) -> Option<Rc<AstNode>> {
        let start = self.peek()?.start;
        self.bump();
        let name = if self.at(TokenKind::Identifier) {
            self.parse_name_or_identifier()
        } else {
            None
        };
        let mut declarations = Vec::new();
        if self.eat(TokenKind::LBrace) {
            while !self.at(TokenKind::RBrace) && !self.is_eof() {
                let before = self.cursor;
                if let Some(declaration) = self.parse_declaration(DeclContext::TopLevel) {
                    declarations.push(declaration);
                }
                if self.cursor == before {
                    self.bump();
                }
            }
            self.eat(TokenKind::RBrace);
        }
        Some(self.node(
            NodeKind::NamespaceDeclaration {
                name,
                declarations,
            },
            start,
        ))
    }

    fn parse_struct_or_class(&mut self) -> Option<Rc<AstNode>> {
        let start = self.peek()?.start;
        let record_kind = if self.at(TokenKind::KwClass) {
            RecordKind::Class
        } else {
            RecordKind::Struct
        };
        self.bump();
        let name = if self.at(TokenKind::Identifier) {
            self.parse_name_or_identifier()
        } else {
            None
        };
        // Base-class list and attributes are irrelevant for comprehension.
        while !self.at(TokenKind::LBrace) && !self.at(TokenKind::Semicolon) && !self.is_eof() {
            self.bump();
        }
        let mut members = Vec::new();
        if self.eat(TokenKind::LBrace) {
            while !self.at(TokenKind::RBrace) && !self.is_eof() {
                let before = self.cursor;
                if matches!(
                    self.peek_kind(),
                    Some(TokenKind::KwPublic) | Some(TokenKind::KwPrivate) | Some(TokenKind::KwProtected)
                ) {
                    self.bump();
                    self.eat(TokenKind::Colon);
                    continue;
                }
                if let Some(member) = self.parse_declaration(DeclContext::Record) {
                    members.push(member);
                }
                if self.cursor == before {
                    self.bump();
                }
            }
            self.eat(TokenKind::RBrace);
        }
        self.eat(TokenKind::Semicolon);
        Some(self.node(
            NodeKind::StructOrClassDeclaration {
                record_kind,
                name,
                members,
            },
            start,
        ))
    }

    fn parse_enum(&mut self) -> Option<Rc<AstNode>> {
        let start = self.peek()?.start;
        self.bump();
        if self.at(TokenKind::KwClass) || self.at(TokenKind::KwStruct) {
            self.bump();
        }
        let name = if self.at(TokenKind::Identifier) {
            self.parse_name_or_identifier()
        } else {
            None
        };
        while !self.at(TokenKind::LBrace) && !self.at(TokenKind::Semicolon) && !self.is_eof() {
            self.bump();
        }
        let mut entries = Vec::new();
        if self.eat(TokenKind::LBrace) {
            while !self.at(TokenKind::RBrace) && !self.is_eof() {
                if self.at(TokenKind::Identifier) {
                    let token = self.bump().unwrap();
                    entries.push(AstNode::new(
                        NodeKind::Identifier {
                            name: token.text.clone(),
                        },
                        token.start,
                        token.end,
                    ));
                    if self.eat(TokenKind::Equal) {
                        while !self.at(TokenKind::Comma) && !self.at(TokenKind::RBrace) && !self.is_eof() {
                            self.bump();
                        }
                    }
                    self.eat(TokenKind::Comma);
                } else {
                    self.bump();
                }
            }
            self.eat(TokenKind::RBrace);
        }
        self.eat(TokenKind::Semicolon);
        Some(self.node(
            NodeKind::EnumDeclaration {
                name,
                entries,
            },
            start,
        ))
    }

    fn parse_function_or_variable(
        &mut self,
        _context: DeclContext,
    ) -> Option<Rc<AstNode>> {
        let start = self.peek()?.start;
        while self.peek().map_or(false, |t| queries::is_declaration_qualifier(t.kind)) {
            self.bump();
        }
        let declared_type = self.parse_type();
        let name = self.parse_name_or_identifier();

        if name.is_some() && self.at(TokenKind::LParen) {
            let parameters = self.parse_parameter_list();
            while matches!(self.peek_kind(), Some(TokenKind::KwConst) | Some(TokenKind::KwNoexcept)) {
                self.bump();
            }
            let definition = if self.at(TokenKind::LBrace) {
                self.parse_function_definition()
            } else {
                self.consume_until_semicolon();
                None
            };
            return Some(self.node(
                NodeKind::FunctionDeclaration {
                    return_type: declared_type,
                    name,
                    parameters,
                    definition,
                },
                start,
            ));
        }

        // Variable declarator: optional array dimensions, optional
        // initializer; extra comma declarators are consumed without
        // producing further nodes.
        while self.at(TokenKind::LBracket) {
            self.consume_balanced(TokenKind::LBracket, TokenKind::RBracket);
        }
        let initial_value = if self.eat(TokenKind::Equal) {
            if self.at(TokenKind::LBrace) {
                self.consume_balanced(TokenKind::LBrace, TokenKind::RBrace);
                None
            } else {
                self.parse_expression()
            }
        } else {
            None
        };
        while !self.at(TokenKind::Semicolon) && !self.at(TokenKind::RBrace) && !self.is_eof() {
            self.bump();
        }
        self.eat(TokenKind::Semicolon);
        Some(self.node(
            NodeKind::VariableDeclaration {
                var_type: declared_type,
                name,
                initial_value,
            },
            start,
        ))
    }

    fn parse_type(&mut self) -> Option<Rc<AstNode>> {
        let start = self.peek()?.start;
        let mut base = if self.peek().map_or(false, |t| queries::is_known_type(t.kind)) {
            let mut text = String::new();
            let mut end = start;
            while self.peek().map_or(false, |t| queries::is_known_type(t.kind)) {
                let token = self.bump().unwrap();
                if !text.is_empty() {
                    text.push(' ');
                }
                text.push_str(&token.text);
                end = token.end;
            }
            let identifier = AstNode::new(NodeKind::Identifier { name: text }, start, end);
            AstNode::new(NodeKind::NamedType { name: Some(identifier) }, start, end)
        } else if self.at(TokenKind::Identifier) {
            let name = self.parse_name_or_identifier()?;
            let (name_start, name_end) = (name.start, name.end);
            AstNode::new(NodeKind::NamedType { name: Some(name) }, name_start, name_end)
        } else {
            return None;
        };

        loop {
            if self.at(TokenKind::Star) {
                let token = self.bump().unwrap();
                base = AstNode::new(NodeKind::PointerType { pointee: Some(base) }, start, token.end);
            } else if self.at(TokenKind::Amp) || self.at(TokenKind::AndAnd) {
                let token = self.bump().unwrap();
                base = AstNode::new(
                    NodeKind::ReferenceType {
                        referenced: Some(base),
                    },
                    start,
                    token.end,
                );
            } else if self.at(TokenKind::KwConst) || self.at(TokenKind::KwVolatile) {
                // Trailing cv-qualifier (`char const*`).
                self.bump();
            } else {
                break;
            }
        }
        Some(base)
    }

    fn parse_parameter_list(&mut self) -> Vec<Rc<AstNode>> {
        let mut parameters = Vec::new();
        if !self.eat(TokenKind::LParen) {
            return parameters;
        }
        while !self.at(TokenKind::RParen) && !self.is_eof() {
            let before = self.cursor;
            if self.at(TokenKind::Ellipsis) {
                let token = self.bump().unwrap();
                parameters.push(AstNode::new(
                    NodeKind::Parameter {
                        param_type: None,
                        name: None,
                        is_ellipsis: true,
                    },
                    token.start,
                    token.end,
                ));
            } else {
                let start = self.peek().map(|t| t.start).unwrap_or_default();
                while self.peek().map_or(false, |t| queries::is_declaration_qualifier(t.kind)) {
                    self.bump();
                }
                let param_type = self.parse_type();
                let name = if self.at(TokenKind::Identifier) {
                    self.parse_name_or_identifier()
                } else {
                    None
                };
                while self.at(TokenKind::LBracket) {
                    self.consume_balanced(TokenKind::LBracket, TokenKind::RBracket);
                }
                if param_type.is_some() || name.is_some() {
                    parameters.push(self.node(
                        NodeKind::Parameter {
                            param_type,
                            name,
                            is_ellipsis: false,
                        },
                        start,
                    ));
                }
            }
            if !self.eat(TokenKind::Comma) && self.cursor == before {
                self.bump();
            }
        }
        self.eat(TokenKind::RParen);
        parameters
    }

    fn parse_function_definition(&mut self) -> Option<Rc<AstNode>> {
        let start = self.peek()?.start;
        if !self.eat(TokenKind::LBrace) {
            return None;
        }
        let mut statements = Vec::new();
        while !self.at(TokenKind::RBrace) && !self.is_eof() {
            let before = self.cursor;
            if let Some(statement) = self.parse_statement() {
                statements.push(statement);
            }
            if self.cursor == before {
                self.bump();
            }
        }
        self.eat(TokenKind::RBrace);
        Some(self.node(NodeKind::FunctionDefinition { statements }, start))
    }

    // ── statements ──────────────────────────────────────────────────────

    fn parse_statement(&mut self) -> Option<Rc<AstNode>> {
        match self.peek_kind()? {
            TokenKind::LBrace => self.parse_block(),
            TokenKind::KwReturn => {
                let start = self.peek()?.start;
                self.bump();
                let value = if self.at(TokenKind::Semicolon) {
                    None
                } else {
                    self.parse_expression()
                };
                self.eat(TokenKind::Semicolon);
                Some(self.node(NodeKind::ReturnStatement { value }, start))
            },
            TokenKind::KwIf => {
                let start = self.peek()?.start;
                self.bump();
                let condition = self.parse_paren_expression();
                let then_branch = self.parse_statement();
                let else_branch = if self.eat(TokenKind::KwElse) {
                    self.parse_statement()
                } else {
                    None
                };
                Some(self.node(
                    NodeKind::IfStatement {
                        condition,
                        then_branch,
                        else_branch,
                    },
                    start,
                ))
            },
            TokenKind::KwWhile => {
                let start = self.peek()?.start;
                self.bump();
                let condition = self.parse_paren_expression();
                let body = self.parse_statement();
                Some(self.node(
                    NodeKind::WhileStatement {
                        condition,
                        body,
                    },
                    start,
                ))
            },
            TokenKind::KwFor => {
                let start = self.peek()?.start;
                self.bump();
                if self.at(TokenKind::LParen) {
                    self.consume_balanced(TokenKind::LParen, TokenKind::RParen);
                }
                let body = self.parse_statement();
                Some(self.node(
                    NodeKind::ForStatement {
                        init: None,
                        body,
                    },
                    start,
                ))
            },
            TokenKind::KwBreak | TokenKind::KwContinue => {
                self.bump();
                self.eat(TokenKind::Semicolon);
                None
            },
            TokenKind::KwStruct | TokenKind::KwClass | TokenKind::KwEnum => self.parse_declaration(DeclContext::Block),
            _ if self.looks_like_declaration() => self.parse_function_or_variable(DeclContext::Block),
            _ => {
                let expression = self.parse_expression();
                self.eat(TokenKind::Semicolon);
                expression
            },
        }
    }

    fn parse_block(&mut self) -> Option<Rc<AstNode>> {
        let start = self.peek()?.start;
        if !self.eat(TokenKind::LBrace) {
            return None;
        }
        let mut statements = Vec::new();
        while !self.at(TokenKind::RBrace) && !self.is_eof() {
            let before = self.cursor;
            if let Some(statement) = self.parse_statement() {
                statements.push(statement);
            }
            if self.cursor == before {
                self.bump();
            }
        }
        self.eat(TokenKind::RBrace);
        Some(self.node(NodeKind::BlockStatement { statements }, start))
    }

    fn parse_paren_expression(&mut self) -> Option<Rc<AstNode>> {
        if !self.eat(TokenKind::LParen) {
            return None;
        }
        let expression = self.parse_expression();
        let mut depth = 1usize;
        while depth > 0 && !self.is_eof() {
            match self.peek_kind() {
                Some(TokenKind::LParen) => depth += 1,
                Some(TokenKind::RParen) => depth -= 1,
                _ => {},
            }
            self.bump();
        }
        expression
    }

    // ── expressions ─────────────────────────────────────────────────────

    fn parse_expression(&mut self) -> Option<Rc<AstNode>> {
        let start = self.peek()?.start;
        let lhs = self.parse_binary()?;
        if matches!(
            self.peek_kind(),
            Some(TokenKind::Equal)
                | Some(TokenKind::PlusEqual)
                | Some(TokenKind::MinusEqual)
                | Some(TokenKind::StarEqual)
                | Some(TokenKind::SlashEqual)
                | Some(TokenKind::PercentEqual)
                | Some(TokenKind::AmpEqual)
                | Some(TokenKind::PipeEqual)
                | Some(TokenKind::CaretEqual)
                | Some(TokenKind::LeftShiftEqual)
                | Some(TokenKind::RightShiftEqual)
        ) {
            self.bump();
            let rhs = self.parse_expression();
            return Some(self.node(
                NodeKind::AssignmentExpression {
                    lhs,
                    rhs,
                },
                start,
            ));
        }
        Some(lhs)
    }

    fn parse_binary(&mut self) -> Option<Rc<AstNode>> {
        let start = self.peek()?.start;
        let mut lhs = self.parse_unary()?;
        while self.peek().map_or(false, |t| queries::is_binary_operator(t.kind)) {
            self.bump();
            let rhs = self.parse_unary();
            let done = rhs.is_none();
            lhs = self.node(
                NodeKind::BinaryExpression {
                    lhs,
                    rhs,
                },
                start,
            );
            if done {
                break;
            }
        }
        Some(lhs)
    }

    fn parse_unary(&mut self) -> Option<Rc<AstNode>> {
        if matches!(
            self.peek_kind(),
            Some(TokenKind::Exclaim)
                | Some(TokenKind::Tilde)
                | Some(TokenKind::Minus)
                | Some(TokenKind::Plus)
                | Some(TokenKind::Star)
                | Some(TokenKind::Amp)
                | Some(TokenKind::PlusPlus)
                | Some(TokenKind::MinusMinus)
        ) {
            let start = self.peek()?.start;
            self.bump();
            let operand = self.parse_unary();
            return Some(self.node(NodeKind::UnaryExpression { operand }, start));
        }
        self.parse_postfix()
    }

    fn parse_postfix(&mut self) -> Option<Rc<AstNode>> {
        let start = self.peek()?.start;
        let mut expression = self.parse_primary()?;
        loop {
            match self.peek_kind() {
                Some(TokenKind::LParen) => {
                    self.bump();
                    let mut arguments = Vec::new();
                    while !self.at(TokenKind::RParen) && !self.is_eof() {
                        let before = self.cursor;
                        if let Some(argument) = self.parse_expression() {
                            arguments.push(argument);
                        }
                        if !self.eat(TokenKind::Comma) && self.cursor == before {
                            self.bump();
                        }
                    }
                    self.eat(TokenKind::RParen);
                    expression = self.node(
                        NodeKind::FunctionCall {
                            callee: expression,
                            arguments,
                        },
                        start,
                    );
                },
                Some(TokenKind::Dot) | Some(TokenKind::Arrow) => {
                    let dot = self.bump().unwrap();
                    let property = if self.at(TokenKind::Identifier) {
                        let token = self.bump().unwrap();
                        AstNode::new(
                            NodeKind::Identifier {
                                name: token.text.clone(),
                            },
                            token.start,
                            token.end,
                        )
                    } else {
                        // Dangling access (`obj.`): give the missing property
                        // the accessor's range so completion queries land on it.
                        AstNode::new(
                            NodeKind::Identifier {
                                name: String::new(),
                            },
                            dot.start,
                            dot.end,
                        )
                    };
                    expression = self.node(
                        NodeKind::MemberExpression {
                            object: expression,
                            property,
                        },
                        start,
                    );
                },
                Some(TokenKind::LBracket) => {
                    self.bump();
                    let index = if self.at(TokenKind::RBracket) {
                        None
                    } else {
                        self.parse_expression()
                    };
                    while !self.at(TokenKind::RBracket) && !self.is_eof() {
                        self.bump();
                    }
                    self.eat(TokenKind::RBracket);
                    expression = self.node(
                        NodeKind::IndexExpression {
                            object: expression,
                            index,
                        },
                        start,
                    );
                },
                Some(TokenKind::PlusPlus) | Some(TokenKind::MinusMinus) => {
                    self.bump();
                    expression = self.node(
                        NodeKind::UnaryExpression {
                            operand: Some(expression),
                        },
                        start,
                    );
                },
                _ => break,
            }
        }
        Some(expression)
    }

    fn parse_primary(&mut self) -> Option<Rc<AstNode>> {
        match self.peek_kind()? {
            TokenKind::Identifier => self.parse_name_or_identifier(),
            TokenKind::Integer | TokenKind::Float => {
                let token = self.bump().unwrap();
                Some(AstNode::new(
                    NodeKind::NumericLiteral {
                        value: token.text.clone(),
                    },
                    token.start,
                    token.end,
                ))
            },
            TokenKind::DoubleQuotedString | TokenKind::SingleQuotedString | TokenKind::RawString => {
                let token = self.bump().unwrap();
                Some(AstNode::new(
                    NodeKind::StringLiteral {
                        value: token.text.clone(),
                    },
                    token.start,
                    token.end,
                ))
            },
            TokenKind::KwTrue | TokenKind::KwFalse => {
                let token = self.bump().unwrap();
                Some(AstNode::new(
                    NodeKind::BooleanLiteral {
                        value: token.kind == TokenKind::KwTrue,
                    },
                    token.start,
                    token.end,
                ))
            },
            TokenKind::KwThis | TokenKind::KwNullptr => {
                let token = self.bump().unwrap();
                Some(AstNode::new(
                    NodeKind::Identifier {
                        name: token.text.clone(),
                    },
                    token.start,
                    token.end,
                ))
            },
            TokenKind::LParen => {
                let expression = self.parse_paren_expression();
                expression.or_else(|| {
                    let start = self.prev_end().unwrap_or_default();
                    Some(AstNode::new(NodeKind::InvalidExpression, start, start))
                })
            },
            _ => None,
        }
    }

    /// An identifier, or a `::`-qualified name. A trailing `::` without a
    /// tail yields a `Name` whose tail is an empty identifier spanning the
    /// `::` token, so scope-qualified completion can anchor there.
    fn parse_name_or_identifier(&mut self) -> Option<Rc<AstNode>> {
        if !self.at(TokenKind::Identifier) {
            return None;
        }
        let first = self.bump().unwrap();
        let first_node = AstNode::new(
            NodeKind::Identifier {
                name: first.text.clone(),
            },
            first.start,
            first.end,
        );
        if !self.at(TokenKind::ColonColon) {
            return Some(first_node);
        }

        let start = first.start;
        let mut parts = vec![first_node];
        let mut tail: Option<Rc<AstNode>> = None;
        while self.at(TokenKind::ColonColon) {
            let separator = self.bump().unwrap();
            if self.at(TokenKind::Identifier) {
                let token = self.bump().unwrap();
                parts.push(AstNode::new(
                    NodeKind::Identifier {
                        name: token.text.clone(),
                    },
                    token.start,
                    token.end,
                ));
            } else {
                tail = Some(AstNode::new(
                    NodeKind::Identifier {
                        name: String::new(),
                    },
                    separator.start,
                    separator.end,
                ));
                break;
            }
        }
        let name = match tail {
            Some(empty) => Some(empty),
            None => parts.pop(),
        };
        Some(self.node(
            NodeKind::Name {
                name,
                scope: parts,
            },
            start,
        ))
    }

    // ── recovery helpers ────────────────────────────────────────────────

    fn consume_until_semicolon(&mut self) {
        while !self.at(TokenKind::Semicolon) && !self.is_eof() {
            if self.at(TokenKind::LBrace) {
                self.consume_balanced(TokenKind::LBrace, TokenKind::RBrace);
                continue;
            }
            self.bump();
        }
        self.eat(TokenKind::Semicolon);
    }

    fn consume_balanced(
        &mut self,
        open: TokenKind,
        close: TokenKind,
    ) {
        if !self.eat(open) {
            return;
        }
        let mut depth = 1usize;
        while depth > 0 && !self.is_eof() {
            let kind = self.peek_kind();
            self.bump();
            if kind == Some(open) {
                depth += 1;
            } else if kind == Some(close) {
                depth -= 1;
            }
        }
    }
}

fn collect_nodes(
    node: &Rc<AstNode>,
    out: &mut Vec<Rc<AstNode>>,
) {
    out.push(node.clone());
    for child in node.children() {
        collect_nodes(&child, out);
    }
}
