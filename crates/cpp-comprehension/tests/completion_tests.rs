mod common;

use std::rc::Rc;

use cpp_comprehension::{ComprehensionEngine, EngineConfig, LocalFileDB, Position};

use common::{completions, cursor_after, engine_with_sources};

#[test]
fn completes_function_arguments_in_declaration_order() {
    let source = "int f(int argc, char** argv)\n{\n    arg\n}\n";
    let mut engine = engine_with_sources(&[("main.cc", source)]);
    let suggestions = engine.get_suggestions("main.cc", Position::new(2, 6));
    assert_eq!(completions(&suggestions), ["argc", "argv"]);
    assert!(suggestions.iter().all(|entry| entry.partial_input_length == 3));
}

#[test]
fn completes_local_variables() {
    let source = "void f()\n{\n    int myvar1;\n    myv\n}\n";
    let mut engine = engine_with_sources(&[("main.cc", source)]);
    let suggestions = engine.get_suggestions("main.cc", Position::new(3, 7));
    assert_eq!(completions(&suggestions), ["myvar1"]);
}

#[test]
fn completes_struct_types() {
    let source = "struct MyStruct {\n};\n\nvoid f()\n{\n    MyStr\n}\n";
    let mut engine = engine_with_sources(&[("main.cc", source)]);
    let suggestions = engine.get_suggestions("main.cc", Position::new(5, 9));
    assert_eq!(completions(&suggestions), ["MyStruct"]);
}

#[test]
fn locals_declared_below_the_cursor_are_not_offered() {
    let source = "void f()\n{\n    myv\n    int myvar1;\n}\n";
    let mut engine = engine_with_sources(&[("main.cc", source)]);
    let suggestions = engine.get_suggestions("main.cc", Position::new(2, 7));
    assert!(suggestions.is_empty(), "forward reference to a local must not complete");
}

#[test]
fn member_access_after_dot_lists_all_members() {
    let source = "struct Vec3 {\n    int x;\n    int y;\n};\n\nvoid f()\n{\n    Vec3 v;\n    v.\n}\n";
    let mut engine = engine_with_sources(&[("main.cc", source)]);
    let position = cursor_after(source, "v.");
    let suggestions = engine.get_suggestions("main.cc", position);
    assert_eq!(completions(&suggestions), ["x", "y"]);
}

#[test]
fn member_access_prefix_filters_members() {
    let source = "struct Vec3 {\n    int x;\n    int ydir;\n};\n\nvoid f()\n{\n    Vec3 v;\n    v.yd\n}\n";
    let mut engine = engine_with_sources(&[("main.cc", source)]);
    let position = cursor_after(source, "v.yd");
    let suggestions = engine.get_suggestions("main.cc", position);
    assert_eq!(completions(&suggestions), ["ydir"]);
    assert_eq!(suggestions[0].partial_input_length, 2);
}

#[test]
fn member_access_follows_chained_types() {
    let source = concat!(
        "struct Inner {\n",
        "    int value;\n",
        "};\n",
        "\n",
        "struct Outer {\n",
        "    Inner inner;\n",
        "};\n",
        "\n",
        "void f()\n",
        "{\n",
        "    Outer o;\n",
        "    o.inner.\n",
        "}\n",
    );
    let mut engine = engine_with_sources(&[("main.cc", source)]);
    let position = cursor_after(source, "o.inner.");
    let suggestions = engine.get_suggestions("main.cc", position);
    assert_eq!(completions(&suggestions), ["value"]);
}

#[test]
fn macro_names_complete_for_unqualified_references() {
    let source = "#define MY_VALUE 1\n#define MY_OTHER 2\n\nvoid f()\n{\n    MY_\n}\n";
    let mut engine = engine_with_sources(&[("main.cc", source)]);
    let position = cursor_after(source, "    MY_");
    let suggestions = engine.get_suggestions("main.cc", position);
    assert_eq!(completions(&suggestions), ["MY_VALUE", "MY_OTHER"]);
}

#[test]
fn scope_qualified_completion_lists_namespace_symbols() {
    let source = "namespace ns {\n    int alpha;\n    int beta;\n}\n\nvoid f()\n{\n    ns::\n}\n";
    let mut engine = engine_with_sources(&[("main.cc", source)]);
    let position = cursor_after(source, "ns::");
    let suggestions = engine.get_suggestions("main.cc", position);
    assert_eq!(completions(&suggestions), ["alpha", "beta"]);
}

#[test]
fn scope_qualified_completion_excludes_macros() {
    let source = "#define ALPHA_MACRO 1\nnamespace ns {\n    int alpha;\n}\n\nvoid f()\n{\n    ns::\n}\n";
    let mut engine = engine_with_sources(&[("main.cc", source)]);
    let position = cursor_after(source, "ns::");
    let suggestions = engine.get_suggestions("main.cc", position);
    assert_eq!(completions(&suggestions), ["alpha"]);
}

#[test]
fn symbols_from_included_headers_complete() {
    let header = "#pragma once\n\nint header_var;\n";
    let main = "#include \"lib.hh\"\n\nvoid f()\n{\n    header_\n}\n";
    let mut engine = engine_with_sources(&[("main.cc", main), ("lib.hh", header)]);
    let position = cursor_after(main, "header_");
    let suggestions = engine.get_suggestions("main.cc", position);
    assert_eq!(completions(&suggestions), ["header_var"]);
}

#[test]
fn header_macros_complete_in_including_file() {
    let header = "#pragma once\n#define FROM_HEADER 5\n";
    let main = "#include \"lib.hh\"\n\nvoid f()\n{\n    FROM_\n}\n";
    let mut engine = engine_with_sources(&[("main.cc", main), ("lib.hh", header)]);
    let position = cursor_after(main, "FROM_");
    let suggestions = engine.get_suggestions("main.cc", position);
    assert_eq!(completions(&suggestions), ["FROM_HEADER"]);
}

// ── include-path completion over the fixture tree ───────────────────────

fn fixture_include_engine() -> ComprehensionEngine {
    let root = common::fixture_root();
    let mut filedb = LocalFileDB::new();
    filedb.set_project_root(Some(root.clone()));
    filedb.add("complete_includes.cc", common::read_fixture("complete_includes.cc"));
    filedb.add("sample_header.hh", common::read_fixture("sample_header.hh"));
    let config = EngineConfig {
        system_include_roots: vec![root.join("sysroot")],
        ..EngineConfig::default()
    };
    ComprehensionEngine::with_config(Rc::new(filedb), config)
}

#[test]
fn completes_project_include_paths() {
    let mut engine = fixture_include_engine();
    let suggestions = engine.get_suggestions("complete_includes.cc", Position::new(0, 21));
    assert_eq!(completions(&suggestions), ["\"sample_header.hh\""]);
    assert_eq!(suggestions[0].partial_input_length, 12);
}

#[test]
fn completes_system_include_paths() {
    let mut engine = fixture_include_engine();
    let suggestions = engine.get_suggestions("complete_includes.cc", Position::new(1, 18));
    assert_eq!(completions(&suggestions), ["<sys/asoundlib.h>"]);
}
