use std::rc::Rc;

use indexmap::IndexMap;

use crate::symbols::{DeclarationKind, Symbol, SymbolName};
use crate::syntax::ast::AstNode;

/// Declarations of one document, keyed by qualified name.
///
/// Insertion order is the pre-order walk of the AST, which keeps
/// iteration deterministic; duplicate names overwrite so the last
/// declaration wins while keeping the original position in the map.
pub type SymbolTable = IndexMap<SymbolName, Symbol>;

/// Walk the AST and index every reachable declaration.
///
/// Namespaces, structs/classes and functions are recursed into with the
/// declaration's name appended to the scope. Function bodies taint all
/// descendants as local, and locality is sticky: a class declared inside
/// a function body has its members marked local too.
pub fn build_symbol_table(root: &Rc<AstNode>) -> SymbolTable {
    let mut table = SymbolTable::default();
    collect_into(root, &[], false, &mut table);
    table
}

fn collect_into(
    node: &Rc<AstNode>,
    scope: &[String],
    is_local: bool,
    table: &mut SymbolTable,
) {
    for declaration in node.declarations() {
        let symbol = Symbol::new(declaration.full_name(), scope.to_vec(), declaration.clone(), is_local);
        table.insert(symbol.name.clone(), symbol);

        let should_recurse =
            declaration.is_namespace() || declaration.is_struct_or_class() || declaration.is_function();
        if !should_recurse {
            continue;
        }
        let children_are_local = is_local || declaration.is_function();

        let mut child_scope = scope.to_vec();
        child_scope.push(declaration.full_name());
        collect_into(&declaration, &child_scope, children_are_local, table);
    }
}

/// Editor-facing kind of a declaration node, mirroring the checks the
/// declaration listing wants: structs and classes split, member variables
/// reported as members, everything unrecognized reported as a variable.
pub fn kind_of_declaration(declaration: &AstNode) -> DeclarationKind {
    if declaration.is_struct() {
        return DeclarationKind::Struct;
    }
    if declaration.is_class() {
        return DeclarationKind::Class;
    }
    if declaration.is_function() {
        return DeclarationKind::Function;
    }
    if declaration.is_namespace() {
        return DeclarationKind::Namespace;
    }
    if declaration.is_member() {
        return DeclarationKind::Member;
    }
    DeclarationKind::Variable
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::syntax::kind::TokenKind;
    use crate::syntax::lexer::Lexer;
    use crate::syntax::parser::Parser;

    fn table_for(source: &str) -> SymbolTable {
        let tokens = Lexer::tokenize(source)
            .into_iter()
            .filter(|t| t.kind != TokenKind::Whitespace)
            .collect();
        let mut parser = Parser::new(tokens, "test.cc");
        let root = parser.parse();
        build_symbol_table(&root)
    }

    fn names(table: &SymbolTable) -> Vec<String> {
        table.keys().map(|name| name.to_string()).collect()
    }

    #[test]
    fn function_parameters_are_local_and_scoped() {
        let table = table_for("int f(int argc, char** argv)\n{\n}\n");
        assert_eq!(names(&table), ["f", "f::argc", "f::argv"]);
        assert!(!table[&SymbolName::parse("f")].is_local);
        assert!(table[&SymbolName::parse("f::argc")].is_local);
        assert!(table[&SymbolName::parse("f::argv")].is_local);
    }

    #[test]
    fn namespace_scopes_nest() {
        let table = table_for("namespace Bar {\nnamespace Baz {\n    void foo();\n}\n}\n");
        assert_eq!(names(&table), ["Bar", "Bar::Baz", "Bar::Baz::foo"]);
        assert!(!table[&SymbolName::parse("Bar::Baz::foo")].is_local);
    }

    #[test]
    fn struct_members_are_not_local() {
        let table = table_for("struct S {\n    int field;\n    void method();\n};\n");
        assert_eq!(names(&table), ["S", "S::field", "S::method"]);
        assert!(!table[&SymbolName::parse("S::field")].is_local);
    }

    #[test]
    fn locality_is_sticky_through_nested_records() {
        let table = table_for("void f()\n{\n    struct Inner {\n        int member;\n    };\n}\n");
        let inner_member = table.get(&SymbolName::parse("f::Inner::member")).expect("member indexed");
        assert!(inner_member.is_local, "function bodies taint descendants as local");
    }

    #[test]
    fn duplicate_names_keep_last_declaration() {
        let table = table_for("void g();\nvoid g()\n{\n}\n");
        let symbol = table.get(&SymbolName::parse("g")).unwrap();
        assert_eq!(symbol.declaration.start.line, 1, "later declaration wins");
        // Insertion position is preserved, so iteration order is stable.
        assert_eq!(names(&table)[0], "g");
    }

    #[test]
    fn declaration_kinds() {
        let table = table_for("struct S {\n    int field;\n};\nclass C {};\nnamespace N {}\nint global;\nvoid f();\n");
        assert_eq!(
            kind_of_declaration(&table[&SymbolName::parse("S")].declaration),
            DeclarationKind::Struct
        );
        assert_eq!(
            kind_of_declaration(&table[&SymbolName::parse("S::field")].declaration),
            DeclarationKind::Member
        );
        assert_eq!(
            kind_of_declaration(&table[&SymbolName::parse("C")].declaration),
            DeclarationKind::Class
        );
        assert_eq!(
            kind_of_declaration(&table[&SymbolName::parse("N")].declaration),
            DeclarationKind::Namespace
        );
        assert_eq!(
            kind_of_declaration(&table[&SymbolName::parse("global")].declaration),
            DeclarationKind::Variable
        );
        assert_eq!(
            kind_of_declaration(&table[&SymbolName::parse("f")].declaration),
            DeclarationKind::Function
        );
    }
}
