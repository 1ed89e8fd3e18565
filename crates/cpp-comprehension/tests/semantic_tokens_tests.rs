mod common;

use cpp_comprehension::semantic_tokens::{SemanticTokenType, TokenInfo};

use common::engine_with_sources;

fn type_at(
    tokens: &[TokenInfo],
    line: usize,
    column: usize,
) -> Option<SemanticTokenType> {
    tokens
        .iter()
        .find(|info| info.start_line == line && info.start_column <= column && column <= info.end_column)
        .map(|info| info.semantic_type)
}

#[test]
fn classifies_lexical_token_kinds() {
    let source = concat!(
        "#include \"lib.hh\"\n",
        "#define COUNT 3\n",
        "\n",
        "// note\n",
        "int value = COUNT;\n",
        "char* name = \"hi\";\n",
    );
    let mut engine = engine_with_sources(&[("main.cc", source)]);
    let tokens = engine.get_tokens_info("main.cc");

    // `#include` folds into a statement token, the path stays separate.
    assert_eq!(type_at(&tokens, 0, 0), Some(SemanticTokenType::PreprocessorStatement));
    assert_eq!(type_at(&tokens, 0, 9), Some(SemanticTokenType::IncludePath));
    assert_eq!(type_at(&tokens, 1, 0), Some(SemanticTokenType::PreprocessorStatement));
    assert_eq!(type_at(&tokens, 3, 0), Some(SemanticTokenType::Comment));
    assert_eq!(type_at(&tokens, 4, 0), Some(SemanticTokenType::Type), "known type keyword");
    assert_eq!(type_at(&tokens, 4, 4), Some(SemanticTokenType::Variable));
    assert_eq!(type_at(&tokens, 4, 12), Some(SemanticTokenType::PreprocessorMacro));
    assert_eq!(type_at(&tokens, 5, 13), Some(SemanticTokenType::String));
}

#[test]
fn classifies_resolved_identifiers() {
    let source = concat!(
        "namespace ns {\n",
        "struct Thing {\n",
        "    int field;\n",
        "};\n",
        "}\n",
        "\n",
        "void act(int amount)\n",
        "{\n",
        "    ns::Thing t;\n",
        "    t.field = amount;\n",
        "    act(amount);\n",
        "}\n",
    );
    let mut engine = engine_with_sources(&[("main.cc", source)]);
    let tokens = engine.get_tokens_info("main.cc");

    // `ns::Thing t;` — namespace qualifier, custom type, local variable.
    assert_eq!(type_at(&tokens, 8, 4), Some(SemanticTokenType::Namespace));
    assert_eq!(type_at(&tokens, 8, 8), Some(SemanticTokenType::CustomType));
    // `t.field = amount;` — member property and parameter reference.
    assert_eq!(type_at(&tokens, 9, 4), Some(SemanticTokenType::Variable));
    assert_eq!(type_at(&tokens, 9, 6), Some(SemanticTokenType::Member));
    assert_eq!(type_at(&tokens, 9, 14), Some(SemanticTokenType::Parameter));
    // `act(amount);` — function callee.
    assert_eq!(type_at(&tokens, 10, 4), Some(SemanticTokenType::Function));
    assert_eq!(type_at(&tokens, 10, 8), Some(SemanticTokenType::Parameter));
}

#[test]
fn unresolved_identifier_stays_identifier() {
    let source = "void f()\n{\n    mystery;\n}\n";
    let mut engine = engine_with_sources(&[("main.cc", source)]);
    let tokens = engine.get_tokens_info("main.cc");
    assert_eq!(type_at(&tokens, 2, 4), Some(SemanticTokenType::Identifier));
}

#[test]
fn numbers_and_operators() {
    let source = "int x = 1 + 2;\n";
    let mut engine = engine_with_sources(&[("main.cc", source)]);
    let tokens = engine.get_tokens_info("main.cc");
    assert_eq!(type_at(&tokens, 0, 8), Some(SemanticTokenType::Number));
    assert_eq!(type_at(&tokens, 0, 10), Some(SemanticTokenType::Unknown), "punctuation is unclassified");
    assert_eq!(type_at(&tokens, 0, 12), Some(SemanticTokenType::Number));
}

#[test]
fn inactive_preprocessor_branch_tokens_still_reported() {
    let source = "#ifdef MISSING\nint hidden;\n#endif\n";
    let mut engine = engine_with_sources(&[("main.cc", source)]);
    let tokens = engine.get_tokens_info("main.cc");
    // The `int` of the inactive branch still classifies lexically.
    assert_eq!(type_at(&tokens, 1, 0), Some(SemanticTokenType::Type));
}
