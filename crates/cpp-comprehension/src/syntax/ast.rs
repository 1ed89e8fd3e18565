use std::cell::RefCell;
use std::rc::{Rc, Weak};

use crate::text_pos::Position;

/// Whether a struct-or-class declaration was introduced with `struct`
/// or `class`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordKind {
    Struct,
    Class,
}

/// One AST node. The tree is built bottom-up by the parser; parent links
/// are weak back-pointers fixed in a single pass once the root exists.
/// Ownership flows strictly parent → child through `Rc`.
#[derive(Debug)]
pub struct AstNode {
    pub kind: NodeKind,
    pub start: Position,
    pub end: Position,
    parent: RefCell<Weak<AstNode>>,
}

#[derive(Debug)]
pub enum NodeKind {
    TranslationUnit {
        declarations: Vec<Rc<AstNode>>,
    },

    // Declarations
    FunctionDeclaration {
        return_type: Option<Rc<AstNode>>,
        name: Option<Rc<AstNode>>,
        parameters: Vec<Rc<AstNode>>,
        definition: Option<Rc<AstNode>>,
    },
    FunctionDefinition {
        statements: Vec<Rc<AstNode>>,
    },
    Parameter {
        param_type: Option<Rc<AstNode>>,
        name: Option<Rc<AstNode>>,
        is_ellipsis: bool,
    },
    VariableDeclaration {
        var_type: Option<Rc<AstNode>>,
        name: Option<Rc<AstNode>>,
        initial_value: Option<Rc<AstNode>>,
    },
    StructOrClassDeclaration {
        record_kind: RecordKind,
        name: Option<Rc<AstNode>>,
        members: Vec<Rc<AstNode>>,
    },
    EnumDeclaration {
        name: Option<Rc<AstNode>>,
        entries: Vec<Rc<AstNode>>,
    },
    NamespaceDeclaration {
        name: Option<Rc<AstNode>>,
        declarations: Vec<Rc<AstNode>>,
    },

    // Names & types
    Identifier {
        name: String,
    },
    Name {
        name: Option<Rc<AstNode>>,
        scope: Vec<Rc<AstNode>>,
    },
    NamedType {
        name: Option<Rc<AstNode>>,
    },
    PointerType {
        pointee: Option<Rc<AstNode>>,
    },
    ReferenceType {
        referenced: Option<Rc<AstNode>>,
    },

    // Expressions
    MemberExpression {
        object: Rc<AstNode>,
        property: Rc<AstNode>,
    },
    FunctionCall {
        callee: Rc<AstNode>,
        arguments: Vec<Rc<AstNode>>,
    },
    IndexExpression {
        object: Rc<AstNode>,
        index: Option<Rc<AstNode>>,
    },
    AssignmentExpression {
        lhs: Rc<AstNode>,
        rhs: Option<Rc<AstNode>>,
    },
    BinaryExpression {
        lhs: Rc<AstNode>,
        rhs: Option<Rc<AstNode>>,
    },
    UnaryExpression {
        operand: Option<Rc<AstNode>>,
    },
    NumericLiteral {
        value: String,
    },
    StringLiteral {
        value: String,
    },
    BooleanLiteral {
        value: bool,
    },
    InvalidExpression,

    // Statements
    BlockStatement {
        statements: Vec<Rc<AstNode>>,
    },
    ReturnStatement {
        value: Option<Rc<AstNode>>,
    },
    IfStatement {
        condition: Option<Rc<AstNode>>,
        then_branch: Option<Rc<AstNode>>,
        else_branch: Option<Rc<AstNode>>,
    },
    WhileStatement {
        condition: Option<Rc<AstNode>>,
        body: Option<Rc<AstNode>>,
    },
    ForStatement {
        init: Option<Rc<AstNode>>,
        body: Option<Rc<AstNode>>,
    },
}

impl AstNode {
    pub fn new(
        kind: NodeKind,
        start: Position,
        end: Position,
    ) -> Rc<Self> {
        Rc::new(Self {
            kind,
            start,
            end,
            parent: RefCell::new(Weak::new()),
        })
    }

    pub fn parent(&self) -> Option<Rc<AstNode>> {
        self.parent.borrow().upgrade()
    }

    pub fn contains(
        &self,
        position: Position,
    ) -> bool {
        self.start <= position && position <= self.end
    }

    /// All direct children, in source order.
    pub fn children(&self) -> Vec<Rc<AstNode>> {
        fn push(
            out: &mut Vec<Rc<AstNode>>,
            node: &Option<Rc<AstNode>>,
        ) {
            if let Some(node) = node {
                out.push(node.clone());
            }
        }
        let mut out = Vec::new();
        match &self.kind {
            NodeKind::TranslationUnit { declarations } => out.extend(declarations.iter().cloned()),
            NodeKind::FunctionDeclaration {
                return_type,
                name,
                parameters,
                definition,
            } => {
                push(&mut out, return_type);
                push(&mut out, name);
                out.extend(parameters.iter().cloned());
                push(&mut out, definition);
            },
            NodeKind::FunctionDefinition { statements } => out.extend(statements.iter().cloned()),
            NodeKind::Parameter {
                param_type,
                name,
                ..
            } => {
                push(&mut out, param_type);
                push(&mut out, name);
            },
            NodeKind::VariableDeclaration {
                var_type,
                name,
                initial_value,
            } => {
                push(&mut out, var_type);
                push(&mut out, name);
                push(&mut out, initial_value);
            },
            NodeKind::StructOrClassDeclaration {
                name,
                members,
                ..
            } => {
                push(&mut out, name);
                out.extend(members.iter().cloned());
            },
            NodeKind::EnumDeclaration {
                name,
                entries,
            } => {
                push(&mut out, name);
                out.extend(entries.iter().cloned());
            },
            NodeKind::NamespaceDeclaration {
                name,
                declarations,
            } => {
                push(&mut out, name);
                out.extend(declarations.iter().cloned());
            },
            NodeKind::Identifier { .. } => {},
            NodeKind::Name {
                name,
                scope,
            } => {
                out.extend(scope.iter().cloned());
                push(&mut out, name);
            },
            NodeKind::NamedType { name } => push(&mut out, name),
            NodeKind::PointerType { pointee } => push(&mut out, pointee),
            NodeKind::ReferenceType { referenced } => push(&mut out, referenced),
            NodeKind::MemberExpression {
                object,
                property,
            } => {
                out.push(object.clone());
                out.push(property.clone());
            },
            NodeKind::FunctionCall {
                callee,
                arguments,
            } => {
                out.push(callee.clone());
                out.extend(arguments.iter().cloned());
            },
            NodeKind::IndexExpression {
                object,
                index,
            } => {
                out.push(object.clone());
                push(&mut out, index);
            },
            NodeKind::AssignmentExpression {
                lhs,
                rhs,
            } => {
                out.push(lhs.clone());
                push(&mut out, rhs);
            },
            NodeKind::BinaryExpression {
                lhs,
                rhs,
            } => {
                out.push(lhs.clone());
                push(&mut out, rhs);
            },
            NodeKind::UnaryExpression { operand } => push(&mut out, operand),
            NodeKind::NumericLiteral { .. }
            | NodeKind::StringLiteral { .. }
            | NodeKind::BooleanLiteral { .. }
            | NodeKind::InvalidExpression => {},
            NodeKind::BlockStatement { statements } => out.extend(statements.iter().cloned()),
            NodeKind::ReturnStatement { value } => push(&mut out, value),
            NodeKind::IfStatement {
                condition,
                then_branch,
                else_branch,
            } => {
                push(&mut out, condition);
                push(&mut out, then_branch);
                push(&mut out, else_branch);
            },
            NodeKind::WhileStatement {
                condition,
                body,
            } => {
                push(&mut out, condition);
                push(&mut out, body);
            },
            NodeKind::ForStatement {
                init,
                body,
            } => {
                push(&mut out, init);
                push(&mut out, body);
            },
        }
        out
    }

    // ── kind predicates ─────────────────────────────────────────────────

    pub fn is_identifier(&self) -> bool {
        matches!(self.kind, NodeKind::Identifier { .. })
    }

    pub fn is_name(&self) -> bool {
        matches!(self.kind, NodeKind::Name { .. })
    }

    pub fn is_member_expression(&self) -> bool {
        matches!(self.kind, NodeKind::MemberExpression { .. })
    }

    pub fn is_function_call(&self) -> bool {
        matches!(self.kind, NodeKind::FunctionCall { .. })
    }

    pub fn is_declaration(&self) -> bool {
        matches!(
            self.kind,
            NodeKind::FunctionDeclaration { .. }
                | NodeKind::Parameter { .. }
                | NodeKind::VariableDeclaration { .. }
                | NodeKind::StructOrClassDeclaration { .. }
                | NodeKind::EnumDeclaration { .. }
                | NodeKind::NamespaceDeclaration { .. }
        )
    }

    pub fn is_type(&self) -> bool {
        matches!(
            self.kind,
            NodeKind::NamedType { .. } | NodeKind::PointerType { .. } | NodeKind::ReferenceType { .. }
        )
    }

    pub fn is_named_type(&self) -> bool {
        matches!(self.kind, NodeKind::NamedType { .. })
    }

    pub fn is_variable_declaration(&self) -> bool {
        matches!(self.kind, NodeKind::VariableDeclaration { .. })
    }

    pub fn is_parameter(&self) -> bool {
        matches!(self.kind, NodeKind::Parameter { .. })
    }

    pub fn is_variable_or_parameter_declaration(&self) -> bool {
        self.is_variable_declaration() || self.is_parameter()
    }

    pub fn is_struct_or_class(&self) -> bool {
        matches!(self.kind, NodeKind::StructOrClassDeclaration { .. })
    }

    pub fn is_struct(&self) -> bool {
        matches!(
            self.kind,
            NodeKind::StructOrClassDeclaration {
                record_kind: RecordKind::Struct,
                ..
            }
        )
    }

    pub fn is_class(&self) -> bool {
        matches!(
            self.kind,
            NodeKind::StructOrClassDeclaration {
                record_kind: RecordKind::Class,
                ..
            }
        )
    }

    pub fn is_enum(&self) -> bool {
        matches!(self.kind, NodeKind::EnumDeclaration { .. })
    }

    pub fn is_namespace(&self) -> bool {
        matches!(self.kind, NodeKind::NamespaceDeclaration { .. })
    }

    pub fn is_function(&self) -> bool {
        matches!(self.kind, NodeKind::FunctionDeclaration { .. })
    }

    /// A member is a variable declared directly inside a struct or class
    /// body.
    pub fn is_member(&self) -> bool {
        if !self.is_variable_declaration() {
            return false;
        }
        self.parent().map_or(false, |parent| parent.is_struct_or_class())
    }

    // ── structured accessors ────────────────────────────────────────────

    /// The identifier text of an `Identifier`, or empty.
    pub fn identifier_name(&self) -> &str {
        match &self.kind {
            NodeKind::Identifier { name } => name,
            _ => "",
        }
    }

    /// The tail identifier of a `Name` node.
    pub fn name_identifier(&self) -> Option<Rc<AstNode>> {
        match &self.kind {
            NodeKind::Name { name, .. } => name.clone(),
            _ => None,
        }
    }

    /// Scope-qualifier identifiers of a `Name` node, outermost first.
    pub fn name_scope(&self) -> &[Rc<AstNode>] {
        match &self.kind {
            NodeKind::Name { scope, .. } => scope,
            _ => &[],
        }
    }

    /// Qualified text of a declaration's name (or of a `Name`/`Identifier`
    /// node itself), `::`-joined.
    pub fn full_name(&self) -> String {
        match &self.kind {
            NodeKind::Identifier { name } => name.clone(),
            NodeKind::Name {
                name,
                scope,
            } => {
                let mut parts: Vec<String> = scope.iter().map(|part| part.identifier_name().to_string()).collect();
                if let Some(name) = name {
                    parts.push(name.identifier_name().to_string());
                }
                parts.join("::")
            },
            NodeKind::FunctionDeclaration { name, .. }
            | NodeKind::Parameter { name, .. }
            | NodeKind::VariableDeclaration {
                name, ..
            }
            | NodeKind::StructOrClassDeclaration { name, .. }
            | NodeKind::EnumDeclaration { name, .. }
            | NodeKind::NamespaceDeclaration { name, .. }
            | NodeKind::NamedType { name } => name.as_ref().map(|n| n.full_name()).unwrap_or_default(),
            _ => String::new(),
        }
    }

    /// The declared type of a variable or parameter declaration.
    pub fn declaration_type(&self) -> Option<Rc<AstNode>> {
        match &self.kind {
            NodeKind::VariableDeclaration { var_type, .. } => var_type.clone(),
            NodeKind::Parameter { param_type, .. } => param_type.clone(),
            _ => None,
        }
    }

    /// Immediate child declarations, the recursion surface for symbol
    /// table construction. Functions contribute their parameters and the
    /// declarations of their body.
    pub fn declarations(&self) -> Vec<Rc<AstNode>> {
        match &self.kind {
            NodeKind::TranslationUnit { declarations } | NodeKind::NamespaceDeclaration { declarations, .. } => {
                declarations.iter().filter(|d| d.is_declaration()).cloned().collect()
            },
            NodeKind::FunctionDeclaration {
                parameters,
                definition,
                ..
            } => {
                let mut out: Vec<Rc<AstNode>> = parameters.clone();
                if let Some(definition) = definition {
                    out.extend(definition.declarations());
                }
                out
            },
            NodeKind::FunctionDefinition { statements } | NodeKind::BlockStatement { statements } => {
                statements.iter().filter(|s| s.is_declaration()).cloned().collect()
            },
            NodeKind::StructOrClassDeclaration { members, .. } => {
                members.iter().filter(|m| m.is_declaration()).cloned().collect()
            },
            _ => Vec::new(),
        }
    }

    /// Arguments of a `FunctionCall` node.
    pub fn call_arguments(&self) -> &[Rc<AstNode>] {
        match &self.kind {
            NodeKind::FunctionCall { arguments, .. } => arguments,
            _ => &[],
        }
    }

    pub fn call_callee(&self) -> Option<Rc<AstNode>> {
        match &self.kind {
            NodeKind::FunctionCall { callee, .. } => Some(callee.clone()),
            _ => None,
        }
    }

    pub fn member_object(&self) -> Option<Rc<AstNode>> {
        match &self.kind {
            NodeKind::MemberExpression { object, .. } => Some(object.clone()),
            _ => None,
        }
    }

    pub fn member_property(&self) -> Option<Rc<AstNode>> {
        match &self.kind {
            NodeKind::MemberExpression { property, .. } => Some(property.clone()),
            _ => None,
        }
    }

    pub fn function_parameters(&self) -> &[Rc<AstNode>] {
        match &self.kind {
            NodeKind::FunctionDeclaration { parameters, .. } => parameters,
            _ => &[],
        }
    }
}

/// Point every node's parent link at its owner. Called once on the root
/// after parsing; the weak links never change afterwards.
pub fn link_parents(root: &Rc<AstNode>) {
    for child in root.children() {
        *child.parent.borrow_mut() = Rc::downgrade(root);
        link_parents(&child);
    }
}
