mod common;

use std::cell::RefCell;
use std::rc::Rc;

use cpp_comprehension::{Declaration, DeclarationKind, Position, TodoEntry};

use common::{completions, engine_with_sources, shared_engine};

fn declaration_recorder() -> (Rc<RefCell<Vec<Vec<Declaration>>>>, Box<dyn Fn(&str, &[Declaration])>) {
    let emissions: Rc<RefCell<Vec<Vec<Declaration>>>> = Rc::new(RefCell::new(Vec::new()));
    let sink = emissions.clone();
    let callback = Box::new(move |_file: &str, declarations: &[Declaration]| {
        sink.borrow_mut().push(declarations.to_vec());
    });
    (emissions, callback)
}

#[test]
fn file_opened_is_idempotent() {
    let (emissions, callback) = declaration_recorder();
    let mut engine = engine_with_sources(&[("main.cc", "int alpha;\n")]);
    engine.set_declarations_callback(callback);

    engine.file_opened("main.cc");
    engine.file_opened("main.cc");

    assert_eq!(engine.document_count(), 1);
    assert_eq!(emissions.borrow().len(), 1, "second open must reuse the cached document");
}

#[test]
fn declaration_listing_contains_symbols_and_macros() {
    let (emissions, callback) = declaration_recorder();
    let source = "#define LIMIT 10\n\nstruct S {\n    int field;\n};\n\nvoid f();\n";
    let mut engine = engine_with_sources(&[("main.cc", source)]);
    engine.set_declarations_callback(callback);
    engine.file_opened("main.cc");

    let emissions = emissions.borrow();
    let declarations = emissions.last().expect("one emission");
    let kind_of = |name: &str| {
        declarations
            .iter()
            .find(|declaration| declaration.name == name)
            .map(|declaration| declaration.kind)
    };
    assert_eq!(kind_of("S"), Some(DeclarationKind::Struct));
    assert_eq!(kind_of("field"), Some(DeclarationKind::Member));
    assert_eq!(kind_of("f"), Some(DeclarationKind::Function));
    assert_eq!(kind_of("LIMIT"), Some(DeclarationKind::PreprocessorDefinition));
    let field = declarations.iter().find(|d| d.name == "field").unwrap();
    assert_eq!(field.scope, "S");
}

#[test]
fn unchanged_rebuild_suppresses_declaration_callback() {
    let (emissions, callback) = declaration_recorder();
    let mut engine = engine_with_sources(&[("main.cc", "int alpha;\n")]);
    engine.set_declarations_callback(callback);

    engine.file_opened("main.cc");
    engine.on_edit("main.cc");

    assert_eq!(emissions.borrow().len(), 1, "identical listing must not re-emit");
}

#[test]
fn edit_replaces_document_contents() {
    let (filedb, mut engine) = shared_engine(&[("main.cc", "int alpha;\n\nvoid f()\n{\n    alp\n}\n")]);
    let suggestions = engine.get_suggestions("main.cc", Position::new(4, 7));
    assert_eq!(completions(&suggestions), ["alpha"]);

    let edited = "int beta;\n\nvoid f()\n{\n    bet\n}\n";
    filedb.add("main.cc", edited);
    engine.on_edit("main.cc");

    // Queries now reflect the new source exclusively.
    let fresh = engine.get_suggestions("main.cc", Position::new(4, 7));
    assert_eq!(completions(&fresh), ["beta"]);
    assert_eq!(engine.document_count(), 1);
}

#[test]
fn failed_rebuild_keeps_previous_document() {
    let (filedb, mut engine) = shared_engine(&[("main.cc", "int alpha;\n\nvoid f()\n{\n    alp\n}\n")]);
    engine.file_opened("main.cc");
    assert_eq!(engine.document_count(), 1);

    // The file vanishes; the rebuild fails and the old snapshot stays.
    filedb.remove("main.cc");
    engine.on_edit("main.cc");

    assert_eq!(engine.document_count(), 1);
    let suggestions = engine.get_suggestions("main.cc", Position::new(4, 7));
    assert_eq!(completions(&suggestions), ["alpha"]);
}

#[test]
fn cyclic_includes_terminate_and_share_symbols() {
    let a_header = "#include \"b.hh\"\nint a_var;\n";
    let b_header = "#include \"a.hh\"\nint b_var;\n";
    let main = "#include \"a.hh\"\n\nvoid f()\n{\n    \n}\n";
    let mut engine = engine_with_sources(&[("main.cc", main), ("a.hh", a_header), ("b.hh", b_header)]);

    let suggestions = engine.get_suggestions("main.cc", Position::new(4, 1));
    let names = completions(&suggestions);
    assert!(names.contains(&"a_var".to_string()));
    assert!(names.contains(&"b_var".to_string()));

    assert!(engine.no_build_in_progress(), "in-progress set must drain");
    assert_eq!(engine.document_count(), 3);
}

#[test]
fn self_include_terminates() {
    let main = "#include \"main.cc\"\nint lonely;\n";
    let mut engine = engine_with_sources(&[("main.cc", main)]);
    let location = engine.find_declaration_of("main.cc", Position::new(1, 4));
    assert!(location.is_some());
    assert!(engine.no_build_in_progress());
}

#[test]
fn header_closure_is_transitive() {
    let c_header = "int c_var;\n";
    let b_header = "#include \"c.hh\"\nint b_var;\n";
    let a_main = "#include \"b.hh\"\n\nvoid f()\n{\n    c_v\n    c_var = 1;\n}\n";
    let mut engine = engine_with_sources(&[("a.cc", a_main), ("b.hh", b_header), ("c.hh", c_header)]);

    let suggestions = engine.get_suggestions("a.cc", Position::new(4, 7));
    assert_eq!(completions(&suggestions), ["c_var"]);

    let location = engine.find_declaration_of("a.cc", Position::new(5, 5)).expect("resolves through closure");
    assert_eq!(location.file, "c.hh");
    assert_eq!(location.line, 0);
}

#[test]
fn todo_entries_are_reported() {
    let todos: Rc<RefCell<Vec<TodoEntry>>> = Rc::new(RefCell::new(Vec::new()));
    let sink = todos.clone();
    let source = "// TODO: wire this up\nvoid f();\n";
    let mut engine = engine_with_sources(&[("main.cc", source)]);
    engine.set_todos_callback(Box::new(move |_file, entries| {
        sink.borrow_mut().extend(entries.to_vec());
    }));
    engine.file_opened("main.cc");

    let todos = todos.borrow();
    assert_eq!(todos.len(), 1);
    assert_eq!(todos[0].line, 0);
    assert!(todos[0].content.contains("TODO: wire this up"));
}

#[test]
fn queries_against_missing_files_are_empty() {
    let mut engine = engine_with_sources(&[]);
    assert!(engine.get_suggestions("nope.cc", Position::new(0, 0)).is_empty());
    assert!(engine.get_tokens_info("nope.cc").is_empty());
    assert!(engine.get_function_params_hint("nope.cc", Position::new(0, 0)).is_none());
    assert_eq!(engine.document_count(), 0);
    assert!(engine.no_build_in_progress());
}
