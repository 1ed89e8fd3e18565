use std::ops::ControlFlow;
use std::rc::Rc;

use tracing::trace;

use crate::document::store::DocumentStore;
use crate::document::Document;
use crate::symbols::{Symbol, SymbolName};
use crate::syntax::ast::AstNode;
use crate::text_pos::Position;

/// A resolved declaration together with the file that owns it.
#[derive(Debug, Clone)]
pub struct FoundDeclaration {
    pub declaration: Rc<AstNode>,
    pub filename: String,
}

/// What kind of declaration a reference site is asking for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetKind {
    Variable,
    Type,
    Function,
    Property,
    Scope,
}

#[derive(Debug, Clone)]
pub struct TargetDeclaration {
    pub kind: TargetKind,
    pub name: String,
}

// ── scope computation ───────────────────────────────────────────────────

/// Names of every enclosing namespace, struct/class or function
/// declaration, root to leaf.
pub fn scope_of_node(node: &Rc<AstNode>) -> Vec<String> {
    let mut scope = Vec::new();
    let mut current = node.parent();
    while let Some(ancestor) = current {
        if ancestor.is_namespace() || ancestor.is_struct_or_class() || ancestor.is_function() {
            scope.push(ancestor.full_name());
        }
        current = ancestor.parent();
    }
    scope.reverse();
    scope
}

/// The scope qualification written before a name at a reference site:
/// for the `x` of `A::B::x` this is `["A", "B"]`; for a node inside the
/// qualifier chain, the parts before it. Empty for unqualified names.
pub fn scope_of_reference(node: &Rc<AstNode>) -> Vec<String> {
    let name = if node.is_name() {
        node.clone()
    } else if node.is_identifier() {
        match node.parent() {
            Some(parent) if parent.is_name() => parent,
            _ => return Vec::new(),
        }
    } else {
        return Vec::new();
    };

    let mut parts = Vec::new();
    for part in name.name_scope() {
        if Rc::ptr_eq(part, node) {
            break;
        }
        parts.push(part.identifier_name().to_string());
    }
    parts
}

/// Visibility of a symbol from a reference site. A written qualification
/// must match the symbol's scope exactly (`using`-directives are out of
/// scope); an unqualified reference sees symbols whose scope is a prefix
/// of the current scope chain.
pub fn is_symbol_available(
    symbol: &Symbol,
    current_scope: &[String],
    reference_scope: &[String],
) -> bool {
    if !reference_scope.is_empty() {
        return symbol.name.scope == reference_scope;
    }
    if symbol.name.scope.len() > current_scope.len() {
        return false;
    }
    symbol.name.scope.iter().zip(current_scope.iter()).all(|(a, b)| a == b)
}

/// True when `node` is the property side of a member expression.
pub fn is_property(node: &Rc<AstNode>) -> bool {
    node.parent().map_or(false, |parent| {
        parent.is_member_expression() && parent.member_property().map_or(false, |p| Rc::ptr_eq(&p, node))
    })
}

// ── target inference ────────────────────────────────────────────────────

/// Infer what kind of declaration a "find declaration of" query at
/// `node` should look for.
pub fn get_target_declaration(node: &Rc<AstNode>) -> Option<TargetDeclaration> {
    if node.is_identifier() {
        return Some(target_for(node, node.identifier_name().to_string()));
    }
    if node.is_declaration() {
        let kind = if node.is_function() {
            TargetKind::Function
        } else if node.is_struct_or_class() || node.is_enum() {
            TargetKind::Type
        } else if node.is_namespace() {
            TargetKind::Scope
        } else {
            TargetKind::Variable
        };
        return Some(TargetDeclaration {
            kind,
            name: node.full_name(),
        });
    }
    if node.is_type() {
        if let Some(parent) = node.parent() {
            if parent.is_declaration() {
                return Some(target_for(&parent, parent.full_name()));
            }
        }
    }
    None
}

fn target_for(
    node: &Rc<AstNode>,
    name: String,
) -> TargetDeclaration {
    let Some(parent) = node.parent() else {
        return TargetDeclaration {
            kind: TargetKind::Variable,
            name,
        };
    };

    if parent.is_name() {
        let is_tail = parent.name_identifier().map_or(false, |tail| Rc::ptr_eq(&tail, node));
        if !is_tail {
            // Part of the qualifier chain: `A` or `B` of `A::B::x`.
            return TargetDeclaration {
                kind: TargetKind::Scope,
                name,
            };
        }
        if let Some(grandparent) = parent.parent() {
            if grandparent.is_declaration() {
                if grandparent.is_struct_or_class() || grandparent.is_enum() {
                    return TargetDeclaration {
                        kind: TargetKind::Type,
                        name,
                    };
                }
                if grandparent.is_function() {
                    return TargetDeclaration {
                        kind: TargetKind::Function,
                        name,
                    };
                }
            }
        }
    }

    if is_call_callee(node, &parent) {
        return TargetDeclaration {
            kind: TargetKind::Function,
            name,
        };
    }

    let in_type = parent.is_type() || (parent.is_name() && parent.parent().map_or(false, |g| g.is_type()));
    if in_type {
        return TargetDeclaration {
            kind: TargetKind::Type,
            name,
        };
    }

    if parent.is_member_expression() {
        return TargetDeclaration {
            kind: TargetKind::Property,
            name,
        };
    }

    TargetDeclaration {
        kind: TargetKind::Variable,
        name,
    }
}

/// Is `node` (directly, or through its wrapping `Name`) the callee of a
/// function call?
fn is_call_callee(
    node: &Rc<AstNode>,
    parent: &Rc<AstNode>,
) -> bool {
    if parent.is_function_call() {
        return parent.call_callee().map_or(false, |callee| Rc::ptr_eq(&callee, node));
    }
    if parent.is_name() {
        if let Some(grandparent) = parent.parent() {
            if grandparent.is_function_call() {
                return grandparent.call_callee().map_or(false, |callee| Rc::ptr_eq(&callee, parent));
            }
        }
    }
    false
}

// ── declaration search ──────────────────────────────────────────────────

/// Scope-aware declaration lookup across a document and its transitive
/// headers.
pub struct Resolver<'a> {
    store: &'a DocumentStore,
}

impl<'a> Resolver<'a> {
    pub fn new(store: &'a DocumentStore) -> Self {
        Self { store }
    }

    /// Visit the document's own symbols, then the symbols of every cached
    /// transitive header. Transitivity is pre-computed, so headers are
    /// iterated flat; `Break` stops the whole walk.
    pub fn for_each_available_symbol<F>(
        &self,
        document: &Document,
        mut f: F,
    ) where
        F: FnMut(&Document, &Symbol) -> ControlFlow<()>,
    {
        for symbol in document.symbols().values() {
            if let ControlFlow::Break(()) = f(document, symbol) {
                return;
            }
        }
        for header in document.available_headers() {
            let Some(included) = self.store.get(header) else {
                continue;
            };
            for symbol in included.symbols().values() {
                if let ControlFlow::Break(()) = f(&included, symbol) {
                    return;
                }
            }
        }
    }

    pub fn find_declaration_at(
        &self,
        document: &Document,
        position: Position,
    ) -> Option<FoundDeclaration> {
        let node = document.parser().node_at(position)?;
        self.find_declaration_of_node(document, &node)
    }

    /// First available symbol matching the inferred target, own document
    /// first.
    pub fn find_declaration_of_node(
        &self,
        document: &Document,
        node: &Rc<AstNode>,
    ) -> Option<FoundDeclaration> {
        let target = get_target_declaration(node)?;
        let reference_scope = scope_of_reference(node);
        let current_scope = scope_of_node(node);
        trace!(name = %target.name, kind = ?target.kind, "declaration lookup");

        let mut found: Option<FoundDeclaration> = None;
        self.for_each_available_symbol(document, |owner, symbol| {
            if symbol_matches(symbol, &target, &current_scope, &reference_scope, node) {
                found = Some(FoundDeclaration {
                    declaration: symbol.declaration.clone(),
                    filename: owner.filename().to_string(),
                });
                return ControlFlow::Break(());
            }
            ControlFlow::Continue(())
        });
        found
    }

    /// Lookup by exact qualified name.
    pub fn find_declaration_of_symbol(
        &self,
        document: &Document,
        target: &SymbolName,
    ) -> Option<FoundDeclaration> {
        let mut found: Option<FoundDeclaration> = None;
        self.for_each_available_symbol(document, |owner, symbol| {
            if symbol.name == *target {
                found = Some(FoundDeclaration {
                    declaration: symbol.declaration.clone(),
                    filename: owner.filename().to_string(),
                });
                return ControlFlow::Break(());
            }
            ControlFlow::Continue(())
        });
        found
    }

    // ── type inference for member accesses ──────────────────────────────

    /// Type name of an expression, as far as trivial chained member
    /// accesses allow. Empty when unknown.
    pub fn type_of(
        &self,
        document: &Document,
        expression: &Rc<AstNode>,
    ) -> String {
        if expression.is_member_expression() {
            if let Some(property) = expression.member_property() {
                if property.is_identifier() {
                    return self.type_of_property(document, &property);
                }
            }
            return String::new();
        }

        let identifier = if expression.is_name() {
            match expression.name_identifier() {
                Some(identifier) => identifier,
                None => return String::new(),
            }
        } else if expression.is_identifier() {
            expression.clone()
        } else {
            return String::new();
        };

        if is_property(&identifier) {
            return self.type_of_property(document, &identifier);
        }
        type_of_variable(&identifier)
    }

    /// Type of the member named by `identifier` inside its owner's type.
    pub fn type_of_property(
        &self,
        document: &Document,
        identifier: &Rc<AstNode>,
    ) -> String {
        let Some(parent) = identifier.parent() else {
            return String::new();
        };
        if !parent.is_member_expression() {
            return String::new();
        }
        let Some(object) = parent.member_object() else {
            return String::new();
        };
        let object_type = self.type_of(document, &object);
        for property in self.properties_of_type(document, &object_type) {
            if property.name.name != identifier.identifier_name() {
                continue;
            }
            let Some(member_type) = property.declaration.declaration_type() else {
                continue;
            };
            if member_type.is_named_type() {
                return member_type.full_name();
            }
        }
        String::new()
    }

    /// Members of the struct/class named `type_name`, as symbols scoped
    /// under the type.
    pub fn properties_of_type(
        &self,
        document: &Document,
        type_name: &str,
    ) -> Vec<Symbol> {
        if type_name.is_empty() {
            return Vec::new();
        }
        let type_symbol = SymbolName::parse(type_name);
        let Some(found) = self.find_declaration_of_symbol(document, &type_symbol) else {
            return Vec::new();
        };
        if !found.declaration.is_struct_or_class() {
            return Vec::new();
        }

        let mut scope = type_symbol.scope.clone();
        scope.push(type_symbol.name.clone());
        found
            .declaration
            .declarations()
            .into_iter()
            .map(|member| Symbol::new(member.full_name(), scope.clone(), member, false))
            .collect()
    }
}

/// Nearest enclosing variable-or-parameter declaration whose name equals
/// the identifier and whose type is a named type.
fn type_of_variable(identifier: &Rc<AstNode>) -> String {
    let mut current = Some(identifier.clone());
    while let Some(node) = current {
        for declaration in node.declarations() {
            if !declaration.is_variable_or_parameter_declaration() {
                continue;
            }
            if declaration.full_name() != identifier.identifier_name() {
                continue;
            }
            let Some(declared_type) = declaration.declaration_type() else {
                continue;
            };
            if declared_type.is_named_type() {
                return declared_type.full_name();
            }
        }
        current = node.parent();
    }
    String::new()
}

fn symbol_matches(
    symbol: &Symbol,
    target: &TargetDeclaration,
    current_scope: &[String],
    reference_scope: &[String],
    node: &Rc<AstNode>,
) -> bool {
    let declaration = &symbol.declaration;

    // Properties match on the bare name before any visibility gate; the
    // owner type is not cross-checked.
    let match_property = target.kind == TargetKind::Property
        && declaration
            .parent()
            .map_or(false, |parent| parent.is_declaration() && parent.is_struct_or_class());
    if match_property && symbol.name.name == target.name {
        return true;
    }

    if !is_symbol_available(symbol, current_scope, reference_scope) {
        return false;
    }

    let match_function = target.kind == TargetKind::Function && declaration.is_function();
    let match_type = target.kind == TargetKind::Type && (declaration.is_struct_or_class() || declaration.is_enum());
    let match_scope = target.kind == TargetKind::Scope && (declaration.is_namespace() || declaration.is_struct_or_class());
    if (match_function || match_type || match_scope) && symbol.name.name == target.name {
        return true;
    }

    let match_variable =
        target.kind == TargetKind::Variable && (declaration.is_variable_declaration() || declaration.is_parameter());
    if match_variable {
        // A local declared below the reference is not visible.
        let is_unavailable = symbol.is_local && declaration.start.line > node.start.line;
        if !is_unavailable && symbol.name.name == target.name {
            return true;
        }
    }

    false
}
