use std::path::{Path, PathBuf};
use std::rc::Rc;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use cpp_comprehension::semantic_tokens::SemanticTokenType;
use cpp_comprehension::{ComprehensionEngine, EngineConfig, LocalFileDB, Position};

/// Regression driver: runs the fixed comprehension suite against the
/// test assets under `<project root>/test` and exits non-zero on any
/// failure.
#[derive(Parser, Debug)]
#[command(name = "cpp-comprehension", version, about)]
struct Args {
    /// Project source directory (assets under `<root>/test`). Read from
    /// the first line of `project_source_dir.txt` when omitted.
    #[arg(long)]
    project_root: Option<PathBuf>,

    #[arg(long, short)]
    verbose: bool,
}

type ScenarioFn = fn(&Path) -> std::result::Result<(), String>;

fn main() {
    let args = Args::parse();

    let filter = if args.verbose {
        EnvFilter::new("cpp_comprehension=debug")
    } else {
        EnvFilter::new("cpp_comprehension=warn")
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .with_target(false)
        .init();

    match run(&args) {
        Ok(true) => {},
        Ok(false) => std::process::exit(1),
        Err(error) => {
            eprintln!("error: {error:#}");
            std::process::exit(1);
        },
    }
}

fn run(args: &Args) -> Result<bool> {
    let root = match &args.project_root {
        Some(root) => root.clone(),
        None => read_project_root(Path::new("project_source_dir.txt"))?,
    };
    let tests_root = root.join("test");
    info!(root = %tests_root.display(), "running comprehension suite");

    let scenarios: &[(&str, ScenarioFn)] = &[
        ("Complete Local Args", complete_local_args),
        ("Complete Local Vars", complete_local_vars),
        ("Complete Type", complete_type),
        ("Find Function Declaration", find_function_declaration),
        ("Find Variable Declaration", find_variable_declaration),
        ("Find Symbol In Namespace", find_symbol_in_namespace),
        ("Find 1D Array as a Variable Declaration", find_array_single),
        ("Find 1D Empty size Array as a Variable Declaration", find_array_single_empty),
        ("Find 2D Array as a Variable Declaration", find_array_double),
        ("Complete include statements", complete_includes),
        ("Function Parameters hint", parameters_hint),
        ("Semantic tokens info", tokens_info),
    ];

    let mut all_passed = true;
    for (name, scenario) in scenarios {
        print!("Testing {name}... ");
        match scenario(&tests_root) {
            Ok(()) => println!("PASS"),
            Err(reason) => {
                println!("FAIL: {reason}");
                all_passed = false;
            },
        }
    }
    Ok(all_passed)
}

fn read_project_root(path: &Path) -> Result<PathBuf> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("unable to read {} (pass --project-root instead)", path.display()))?;
    let first_line = content.lines().next().unwrap_or("").trim();
    Ok(PathBuf::from(first_line))
}

// ── scenario plumbing ───────────────────────────────────────────────────

fn load(
    tests_root: &Path,
    filedb: &LocalFileDB,
    name: &str,
) -> std::result::Result<(), String> {
    let content = std::fs::read_to_string(tests_root.join(name))
        .map_err(|error| format!("unable to load {name}: {error}"))?;
    filedb.add(name, content);
    Ok(())
}

fn engine_with(
    tests_root: &Path,
    files: &[&str],
) -> std::result::Result<ComprehensionEngine, String> {
    let filedb = LocalFileDB::new();
    for file in files {
        load(tests_root, &filedb, file)?;
    }
    Ok(ComprehensionEngine::new(Rc::new(filedb)))
}

fn expect(
    condition: bool,
    reason: &str,
) -> std::result::Result<(), String> {
    if condition {
        Ok(())
    } else {
        Err(reason.to_string())
    }
}

// ── scenarios ───────────────────────────────────────────────────────────

fn complete_local_args(tests_root: &Path) -> std::result::Result<(), String> {
    let mut engine = engine_with(tests_root, &["complete_local_args.cc"])?;
    let suggestions = engine.get_suggestions("complete_local_args.cc", Position::new(2, 6));
    expect(suggestions.len() == 2, "bad size")?;
    expect(
        suggestions[0].completion == "argc" && suggestions[1].completion == "argv",
        "wrong results",
    )?;
    expect(suggestions[0].partial_input_length == 3, "wrong partial length")
}

fn complete_local_vars(tests_root: &Path) -> std::result::Result<(), String> {
    let mut engine = engine_with(tests_root, &["complete_local_vars.cc"])?;
    let suggestions = engine.get_suggestions("complete_local_vars.cc", Position::new(3, 7));
    expect(suggestions.len() == 1, "bad size")?;
    expect(suggestions[0].completion == "myvar1", "wrong results")
}

fn complete_type(tests_root: &Path) -> std::result::Result<(), String> {
    let mut engine = engine_with(tests_root, &["complete_type.cc"])?;
    let suggestions = engine.get_suggestions("complete_type.cc", Position::new(5, 7));
    expect(suggestions.len() == 1, "bad size")?;
    expect(suggestions[0].completion == "MyStruct", "wrong results")
}

fn find_function_declaration(tests_root: &Path) -> std::result::Result<(), String> {
    let mut engine = engine_with(tests_root, &["find_function_declaration.cc", "sample_header.hh"])?;

    // Function declared in the same file.
    let position = engine
        .find_declaration_of("find_function_declaration.cc", Position::new(10, 6))
        .ok_or("declaration not found (1)")?;
    expect(
        position.file == "find_function_declaration.cc" && position.line == 1,
        "wrong declaration location (1)",
    )?;

    // Function declared in the included header.
    let position = engine
        .find_declaration_of("find_function_declaration.cc", Position::new(11, 6))
        .ok_or("declaration not found (2)")?;
    expect(
        position.file == "sample_header.hh" && position.line == 2,
        "wrong declaration location (2)",
    )?;

    // Member function through a member access.
    let position = engine
        .find_declaration_of("find_function_declaration.cc", Position::new(13, 8))
        .ok_or("declaration not found (3)")?;
    expect(
        position.file == "find_function_declaration.cc" && position.line == 4,
        "wrong declaration location (3)",
    )?;

    // Member function referenced from within another member function.
    let position = engine
        .find_declaration_of("find_function_declaration.cc", Position::new(5, 24))
        .ok_or("declaration not found (4)")?;
    expect(
        position.file == "find_function_declaration.cc" && position.line == 4,
        "wrong declaration location (4)",
    )
}

fn find_variable_declaration(tests_root: &Path) -> std::result::Result<(), String> {
    let mut engine = engine_with(tests_root, &["find_variable_declaration.cc", "sample_header.hh"])?;

    // Local variable.
    let position = engine
        .find_declaration_of("find_variable_declaration.cc", Position::new(6, 6))
        .ok_or("declaration not found (1)")?;
    expect(
        position.file == "find_variable_declaration.cc" && position.line == 4 && position.column >= 4,
        "wrong declaration location (1)",
    )?;

    // Global variable from the included header.
    let position = engine
        .find_declaration_of("find_variable_declaration.cc", Position::new(7, 6))
        .ok_or("declaration not found (2)")?;
    expect(
        position.file == "sample_header.hh" && position.line == 4,
        "wrong declaration location (2)",
    )?;

    // Struct member through a member access.
    let position = engine
        .find_declaration_of("find_variable_declaration.cc", Position::new(12, 33))
        .ok_or("declaration not found (3)")?;
    expect(
        position.file == "sample_header.hh" && position.line == 8,
        "wrong declaration location (3)",
    )
}

fn find_symbol_in_namespace(tests_root: &Path) -> std::result::Result<(), String> {
    let mut engine = engine_with(tests_root, &["find_symbol_in_namespace.cc"])?;

    let position = engine
        .find_declaration_of("find_symbol_in_namespace.cc", Position::new(8, 15))
        .ok_or("declaration not found (1)")?;
    expect(
        position.file == "find_symbol_in_namespace.cc" && position.line == 3 && position.column == 4,
        "wrong declaration location (1)",
    )?;

    let position = engine
        .find_declaration_of("find_symbol_in_namespace.cc", Position::new(14, 15))
        .ok_or("declaration not found (2)")?;
    expect(
        position.file == "find_symbol_in_namespace.cc" && position.line == 3 && position.column == 4,
        "wrong declaration location (2)",
    )
}

fn find_array_single(tests_root: &Path) -> std::result::Result<(), String> {
    let mut engine = engine_with(tests_root, &["find_array_variable_declaration.cc"])?;
    let position = engine
        .find_declaration_of("find_array_variable_declaration.cc", Position::new(3, 4))
        .ok_or("declaration not found")?;
    expect(position.line == 2 && position.column >= 4, "wrong declaration location")
}

fn find_array_single_empty(tests_root: &Path) -> std::result::Result<(), String> {
    let mut engine = engine_with(tests_root, &["find_array_variable_declaration.cc"])?;
    let position = engine
        .find_declaration_of("find_array_variable_declaration.cc", Position::new(6, 4))
        .ok_or("declaration not found")?;
    expect(position.line == 5 && position.column >= 4, "wrong declaration location")
}

fn find_array_double(tests_root: &Path) -> std::result::Result<(), String> {
    let mut engine = engine_with(tests_root, &["find_array_variable_declaration.cc"])?;
    let position = engine
        .find_declaration_of("find_array_variable_declaration.cc", Position::new(9, 4))
        .ok_or("declaration not found")?;
    expect(position.line == 8 && position.column >= 4, "wrong declaration location")
}

fn complete_includes(tests_root: &Path) -> std::result::Result<(), String> {
    let mut filedb = LocalFileDB::new();
    filedb.set_project_root(Some(tests_root.to_path_buf()));
    load(tests_root, &filedb, "complete_includes.cc")?;
    load(tests_root, &filedb, "sample_header.hh")?;

    let config = EngineConfig {
        system_include_roots: vec![tests_root.join("sysroot")],
        ..EngineConfig::default()
    };
    let mut engine = ComprehensionEngine::with_config(Rc::new(filedb), config);

    let suggestions = engine.get_suggestions("complete_includes.cc", Position::new(0, 21));
    expect(suggestions.len() == 1, "project include - bad size")?;
    expect(
        suggestions[0].completion == "\"sample_header.hh\"",
        "project include - wrong results",
    )?;

    let suggestions = engine.get_suggestions("complete_includes.cc", Position::new(1, 18));
    expect(suggestions.len() == 1, "global include - bad size")?;
    expect(
        suggestions[0].completion == "<sys/asoundlib.h>",
        "global include - wrong results",
    )
}

fn parameters_hint(tests_root: &Path) -> std::result::Result<(), String> {
    let mut engine = engine_with(tests_root, &["parameters_hint1.cc"])?;
    let expected_params = ["int x", "char y"];

    let hint = engine
        .get_function_params_hint("parameters_hint1.cc", Position::new(4, 6))
        .ok_or("failed to get parameters hint (1)")?;
    expect(hint.params == expected_params && hint.current_index == 0, "bad result (1)")?;

    let hint = engine
        .get_function_params_hint("parameters_hint1.cc", Position::new(5, 9))
        .ok_or("failed to get parameters hint (2)")?;
    expect(hint.params == expected_params && hint.current_index == 1, "bad result (2)")?;

    let hint = engine
        .get_function_params_hint("parameters_hint1.cc", Position::new(6, 5))
        .ok_or("failed to get parameters hint (3)")?;
    expect(hint.params == expected_params && hint.current_index == 0, "bad result (3)")
}

fn tokens_info(tests_root: &Path) -> std::result::Result<(), String> {
    let mut engine = engine_with(tests_root, &["find_function_declaration.cc", "sample_header.hh"])?;
    let tokens = engine.get_tokens_info("find_function_declaration.cc");
    expect(!tokens.is_empty(), "no tokens")?;

    let at = |line: usize, column: usize| {
        tokens
            .iter()
            .find(|info| {
                info.start_line == line && info.start_column <= column && column <= info.end_column
            })
            .map(|info| info.semantic_type)
    };
    // `MyStruct s;` uses the struct as a type.
    expect(at(12, 4) == Some(SemanticTokenType::CustomType), "type use not classified")?;
    // `s.mem_fn()` resolves the property to the member function.
    expect(at(13, 6) == Some(SemanticTokenType::Function), "member call not classified")?;
    // The `struct` keyword itself.
    expect(at(3, 0) == Some(SemanticTokenType::Keyword), "keyword not classified")
}
