mod common;

use cpp_comprehension::Position;

use common::{engine_with_fixtures, engine_with_sources, position_of};

#[test]
fn hint_on_first_argument() {
    let mut engine = engine_with_fixtures(&["parameters_hint1.cc"]);
    let hint = engine
        .get_function_params_hint("parameters_hint1.cc", Position::new(4, 6))
        .expect("hint produced");
    assert_eq!(hint.params, ["int x", "char y"]);
    assert_eq!(hint.current_index, 0);
}

#[test]
fn hint_on_second_argument() {
    let mut engine = engine_with_fixtures(&["parameters_hint1.cc"]);
    let hint = engine
        .get_function_params_hint("parameters_hint1.cc", Position::new(5, 9))
        .expect("hint produced");
    assert_eq!(hint.params, ["int x", "char y"]);
    assert_eq!(hint.current_index, 1);
}

#[test]
fn hint_inside_empty_argument_list() {
    let mut engine = engine_with_fixtures(&["parameters_hint1.cc"]);
    let hint = engine
        .get_function_params_hint("parameters_hint1.cc", Position::new(6, 5))
        .expect("hint produced");
    assert_eq!(hint.params, ["int x", "char y"]);
    assert_eq!(hint.current_index, 0);
}

#[test]
fn hint_resolves_member_function_callee() {
    let source = concat!(
        "struct S {\n",
        "    void m(int amount);\n",
        "};\n",
        "\n",
        "void f()\n",
        "{\n",
        "    S s;\n",
        "    s.m(1);\n",
        "}\n",
    );
    let mut engine = engine_with_sources(&[("main.cc", source)]);
    let position = position_of(source, "1)");
    let hint = engine.get_function_params_hint("main.cc", position).expect("hint produced");
    assert_eq!(hint.params, ["int amount"]);
    assert_eq!(hint.current_index, 0);
}

#[test]
fn hint_reads_parameters_from_declaring_header() {
    let header = "#pragma once\n\nvoid shout(char const* text, int volume);\n";
    let main = "#include \"lib.hh\"\n\nvoid f()\n{\n    shout(\"hey\", 9);\n}\n";
    let mut engine = engine_with_sources(&[("main.cc", main), ("lib.hh", header)]);
    let position = position_of(main, "9)");
    let hint = engine.get_function_params_hint("main.cc", position).expect("hint produced");
    assert_eq!(hint.params, ["char const * text", "int volume"]);
    assert_eq!(hint.current_index, 1);
}

#[test]
fn no_hint_outside_any_call() {
    let source = "void f()\n{\n    int x;\n}\n";
    let mut engine = engine_with_sources(&[("main.cc", source)]);
    assert!(engine.get_function_params_hint("main.cc", Position::new(2, 8)).is_none());
}
