use indexmap::IndexMap;
use tracing::{debug, warn};

use crate::syntax::kind::TokenKind;
use crate::syntax::lexer::{Lexer, Token};
use crate::text_pos::Position;

/// A recorded `#define`, keyed by macro name in [`Definitions`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DefinedValue {
    pub value: String,
    pub parameters: Vec<String>,
    pub is_function_like: bool,
    pub filename: String,
    pub line: usize,
    pub column: usize,
}

/// Macro definitions in the order they were encountered.
pub type Definitions = IndexMap<String, DefinedValue>;

/// One macro expansion site: the original tokens that were replaced and
/// the definition that replaced them.
#[derive(Debug, Clone)]
pub struct Substitution {
    pub original_tokens: Vec<Token>,
    pub defined_value: DefinedValue,
}

/// Callback resolving `#include` paths to the included header's macro
/// definitions, so they participate in substitution in this document.
pub type DefinitionsInHeaderCallback<'a> = &'a mut dyn FnMut(&str) -> Definitions;

#[derive(Debug, Default)]
struct Conditional {
    active: bool,
    parent_active: bool,
    taken: bool,
}

/// Line-oriented preprocessor over the raw token stream.
///
/// Produces two streams: the *unprocessed* stream (original tokens with
/// directives folded into synthetic `IncludeStatement` / `IncludePath` /
/// `PreprocessorStatement` tokens, used for semantic token queries) and
/// the *processed* stream (macro-substituted, conditional-filtered, fed
/// to the parser). Whitespace never reaches either stream.
#[derive(Debug)]
pub struct Preprocessor {
    filename: String,
    text: String,
    ignore_unsupported_keywords: bool,
    ignore_invalid_statements: bool,
    keep_include_statements: bool,
    definitions: Definitions,
    substitutions: Vec<Substitution>,
    included_paths: Vec<String>,
    unprocessed: Vec<Token>,
}

impl Preprocessor {
    pub fn new(
        filename: &str,
        text: &str,
    ) -> Self {
        Self {
            filename: filename.to_string(),
            text: text.to_string(),
            ignore_unsupported_keywords: false,
            ignore_invalid_statements: false,
            keep_include_statements: false,
            definitions: Definitions::default(),
            substitutions: Vec::new(),
            included_paths: Vec::new(),
            unprocessed: Vec::new(),
        }
    }

    pub fn set_ignore_unsupported_keywords(
        &mut self,
        ignore: bool,
    ) {
        self.ignore_unsupported_keywords = ignore;
    }

    pub fn set_ignore_invalid_statements(
        &mut self,
        ignore: bool,
    ) {
        self.ignore_invalid_statements = ignore;
    }

    pub fn set_keep_include_statements(
        &mut self,
        keep: bool,
    ) {
        self.keep_include_statements = keep;
    }

    pub fn definitions(&self) -> &Definitions {
        &self.definitions
    }

    pub fn substitutions(&self) -> &[Substitution] {
        &self.substitutions
    }

    /// Include-path texts as written, delimiters included (`<x.h>`, `"x.h"`).
    pub fn included_paths(&self) -> &[String] {
        &self.included_paths
    }

    pub fn unprocessed_tokens(&self) -> &[Token] {
        &self.unprocessed
    }

    /// Run the preprocessor, returning the processed token stream.
    pub fn process_and_lex(
        &mut self,
        definitions_in_header: DefinitionsInHeaderCallback<'_>,
    ) -> Vec<Token> {
        let raw = Lexer::tokenize(&self.text);
        let mut processed = Vec::new();
        let mut conditionals: Vec<Conditional> = Vec::new();

        let mut i = 0;
        while i < raw.len() {
            let line = raw[i].start.line;
            let mut j = i;
            while j < raw.len() && raw[j].start.line == line {
                j += 1;
            }
            let line_tokens = &raw[i..j];

            let first_code = line_tokens.iter().position(|t| t.kind != TokenKind::Whitespace);
            let is_directive = first_code.map_or(false, |idx| line_tokens[idx].kind == TokenKind::Hash);
            if is_directive {
                self.handle_directive(
                    &line_tokens[first_code.unwrap()..],
                    &mut processed,
                    &mut conditionals,
                    definitions_in_header,
                );
            } else {
                let active = conditionals.iter().all(|c| c.active);
                self.handle_code_line(line_tokens, active, &mut processed);
            }
            i = j;
        }

        debug!(
            file = %self.filename,
            definitions = self.definitions.len(),
            includes = self.included_paths.len(),
            "preprocessed"
        );
        processed
    }

    // ── directives ──────────────────────────────────────────────────────

    fn handle_directive(
        &mut self,
        line_tokens: &[Token],
        processed: &mut Vec<Token>,
        conditionals: &mut Vec<Conditional>,
        definitions_in_header: DefinitionsInHeaderCallback<'_>,
    ) {
        let hash = &line_tokens[0];
        let name_index = line_tokens[1..]
            .iter()
            .position(|t| t.kind != TokenKind::Whitespace)
            .map(|idx| idx + 1);
        let directive = match name_index {
            Some(idx) => line_tokens[idx].text.clone(),
            None => String::new(),
        };
        let parent_active = conditionals.iter().all(|c| c.active);

        match directive.as_str() {
            "include" => {
                if parent_active {
                    self.handle_include(hash, line_tokens, name_index.unwrap(), processed, definitions_in_header);
                    return;
                }
            },
            "define" => {
                if parent_active {
                    self.handle_define(line_tokens, name_index.unwrap());
                }
            },
            "undef" => {
                if parent_active {
                    if let Some(name) = Self::token_after(line_tokens, name_index.unwrap()) {
                        self.definitions.shift_remove(&name.text);
                    }
                }
            },
            "ifdef" | "ifndef" => {
                let defined = Self::token_after(line_tokens, name_index.unwrap())
                    .map_or(false, |t| self.definitions.contains_key(&t.text));
                let condition = if directive == "ifdef" { defined } else { !defined };
                conditionals.push(Conditional {
                    active: parent_active && condition,
                    parent_active,
                    taken: condition,
                });
            },
            "if" => {
                let condition = Self::token_after(line_tokens, name_index.unwrap()).map_or(true, |t| t.text != "0");
                conditionals.push(Conditional {
                    active: parent_active && condition,
                    parent_active,
                    taken: condition,
                });
            },
            "elif" => {
                let condition = Self::token_after(line_tokens, name_index.unwrap()).map_or(true, |t| t.text != "0");
                if let Some(top) = conditionals.last_mut() {
                    top.active = top.parent_active && !top.taken && condition;
                    top.taken = top.taken || condition;
                }
            },
            "else" => {
                if let Some(top) = conditionals.last_mut() {
                    top.active = top.parent_active && !top.taken;
                    top.taken = true;
                }
            },
            "endif" => {
                conditionals.pop();
            },
            _ => {
                if !self.ignore_invalid_statements {
                    warn!(file = %self.filename, line = hash.start.line, %directive, "unsupported directive");
                }
            },
        }

        // Directives other than a kept #include fold into one statement token.
        let statement = Self::statement_token(line_tokens);
        self.unprocessed.push(statement);
    }

    fn handle_include(
        &mut self,
        hash: &Token,
        line_tokens: &[Token],
        name_index: usize,
        processed: &mut Vec<Token>,
        definitions_in_header: DefinitionsInHeaderCallback<'_>,
    ) {
        let path_index = line_tokens[name_index + 1..]
            .iter()
            .position(|t| t.kind != TokenKind::Whitespace)
            .map(|idx| idx + name_index + 1);
        let Some(path_index) = path_index else {
            self.unprocessed.push(Self::statement_token(line_tokens));
            return;
        };

        let first = &line_tokens[path_index];
        let path_token = match first.kind {
            TokenKind::DoubleQuotedString => {
                Token::new(TokenKind::IncludePath, first.text.clone(), first.start, first.end)
            },
            // A quote the user is still typing behind lexes as an
            // unterminated token; the path runs to the end of the line.
            TokenKind::Unknown if first.text.starts_with('"') => {
                let mut text = String::new();
                for token in &line_tokens[path_index..] {
                    text.push_str(&token.text);
                }
                let text = text.trim_end().to_string();
                let end = line_tokens.last().map(|t| t.end).unwrap_or(first.end);
                Token::new(TokenKind::IncludePath, text, first.start, end)
            },
            TokenKind::Less => {
                // Reconstruct `<...>` verbatim up to the closing `>` (or the
                // end of the line when the user is still typing the path).
                let close = line_tokens[path_index..]
                    .iter()
                    .position(|t| t.kind == TokenKind::Greater)
                    .map(|idx| idx + path_index)
                    .unwrap_or(line_tokens.len() - 1);
                let mut text = String::new();
                for token in &line_tokens[path_index..=close] {
                    text.push_str(&token.text);
                }
                let text = text.trim_end().to_string();
                Token::new(TokenKind::IncludePath, text, first.start, line_tokens[close].end)
            },
            _ => {
                self.unprocessed.push(Self::statement_token(line_tokens));
                return;
            },
        };

        let statement = Token::new(
            TokenKind::IncludeStatement,
            "#include",
            hash.start,
            line_tokens[name_index].end,
        );

        self.included_paths.push(path_token.text.clone());
        let header_definitions = definitions_in_header(&path_token.text);
        for (name, value) in header_definitions {
            self.definitions.entry(name).or_insert(value);
        }

        self.unprocessed.push(statement.clone());
        self.unprocessed.push(path_token.clone());
        if self.keep_include_statements {
            processed.push(statement);
            processed.push(path_token);
        }
    }

    fn handle_define(
        &mut self,
        line_tokens: &[Token],
        name_index: usize,
    ) {
        let macro_index = line_tokens[name_index + 1..]
            .iter()
            .position(|t| t.kind == TokenKind::Identifier)
            .map(|idx| idx + name_index + 1);
        let Some(macro_index) = macro_index else {
            return;
        };
        let name = &line_tokens[macro_index];

        // A parameter list only counts when the paren hugs the macro name.
        let mut parameters = Vec::new();
        let mut is_function_like = false;
        let mut value_from = macro_index + 1;
        if let Some(next) = line_tokens.get(macro_index + 1) {
            if next.kind == TokenKind::LParen && next.start == Position::new(name.end.line, name.end.column + 1) {
                is_function_like = true;
                let mut idx = macro_index + 2;
                while idx < line_tokens.len() && line_tokens[idx].kind != TokenKind::RParen {
                    if line_tokens[idx].kind == TokenKind::Identifier {
                        parameters.push(line_tokens[idx].text.clone());
                    }
                    idx += 1;
                }
                value_from = (idx + 1).min(line_tokens.len());
            }
        }

        let mut value = String::new();
        for token in &line_tokens[value_from..] {
            value.push_str(&token.text);
        }
        let defined = DefinedValue {
            value: value.trim().to_string(),
            parameters,
            is_function_like,
            filename: self.filename.clone(),
            line: name.start.line,
            column: name.start.column,
        };
        self.definitions.insert(name.text.clone(), defined);
    }

    // ── code lines ──────────────────────────────────────────────────────

    fn handle_code_line(
        &mut self,
        line_tokens: &[Token],
        active: bool,
        processed: &mut Vec<Token>,
    ) {
        for token in line_tokens {
            if token.kind != TokenKind::Whitespace {
                self.unprocessed.push(token.clone());
            }
        }
        if !active {
            return;
        }

        let code: Vec<&Token> = line_tokens.iter().filter(|t| t.kind != TokenKind::Whitespace).collect();
        let mut k = 0;
        while k < code.len() {
            let token = code[k];
            if token.kind == TokenKind::Identifier {
                if let Some(defined) = self.definitions.get(&token.text).cloned() {
                    if defined.is_function_like {
                        if code.get(k + 1).map_or(false, |t| t.kind == TokenKind::LParen) {
                            let mut depth = 0usize;
                            let mut m = k + 1;
                            while m < code.len() {
                                match code[m].kind {
                                    TokenKind::LParen => depth += 1,
                                    TokenKind::RParen => {
                                        depth -= 1;
                                        if depth == 0 {
                                            break;
                                        }
                                    },
                                    _ => {},
                                }
                                m += 1;
                            }
                            let m = m.min(code.len() - 1);
                            let original: Vec<Token> = code[k..=m].iter().map(|t| (*t).clone()).collect();
                            self.expand(original, defined, processed);
                            k = m + 1;
                            continue;
                        }
                        // Function-like macro named without a call: leave as is.
                    } else {
                        self.expand(vec![token.clone()], defined, processed);
                        k += 1;
                        continue;
                    }
                }
            }
            if token.kind == TokenKind::Unknown && self.ignore_unsupported_keywords {
                k += 1;
                continue;
            }
            processed.push(token.clone());
            k += 1;
        }
    }

    /// Splice the expansion of `defined` into the processed stream. Every
    /// emitted token takes the position of the replaced range so later
    /// position queries stay anchored to the original source.
    fn expand(
        &mut self,
        original_tokens: Vec<Token>,
        defined: DefinedValue,
        processed: &mut Vec<Token>,
    ) {
        let start = original_tokens.first().map(|t| t.start).unwrap_or_default();
        let end = original_tokens.last().map(|t| t.end).unwrap_or_default();
        for mut token in Lexer::tokenize(&defined.value) {
            if token.kind == TokenKind::Whitespace {
                continue;
            }
            token.start = start;
            token.end = end;
            processed.push(token);
        }
        self.substitutions.push(Substitution {
            original_tokens,
            defined_value: defined,
        });
    }

    // ── helpers ─────────────────────────────────────────────────────────

    fn token_after(
        line_tokens: &[Token],
        index: usize,
    ) -> Option<&Token> {
        line_tokens[index + 1..].iter().find(|t| t.kind != TokenKind::Whitespace)
    }

    fn statement_token(line_tokens: &[Token]) -> Token {
        let mut text = String::new();
        for token in line_tokens {
            text.push_str(&token.text);
        }
        let start = line_tokens[0].start;
        let end = line_tokens.last().map(|t| t.end).unwrap_or(start);
        Token::new(TokenKind::PreprocessorStatement, text.trim_end(), start, end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn no_headers() -> impl FnMut(&str) -> Definitions {
        |_: &str| Definitions::default()
    }

    fn process(source: &str) -> (Preprocessor, Vec<Token>) {
        let mut preprocessor = Preprocessor::new("test.cc", source);
        preprocessor.set_ignore_unsupported_keywords(true);
        preprocessor.set_ignore_invalid_statements(true);
        preprocessor.set_keep_include_statements(true);
        let mut callback = no_headers();
        let tokens = preprocessor.process_and_lex(&mut callback);
        (preprocessor, tokens)
    }

    #[test]
    fn records_definition_with_location() {
        let (preprocessor, _) = process("#define VALUE 42\n");
        let defined = preprocessor.definitions().get("VALUE").unwrap();
        assert_eq!(defined.value, "42");
        assert_eq!(defined.line, 0);
        assert_eq!(defined.column, 8);
        assert!(!defined.is_function_like);
    }

    #[test]
    fn substitutes_object_like_macro() {
        let (preprocessor, tokens) = process("#define VALUE 42\nint x = VALUE;\n");
        let substituted = tokens.iter().find(|t| t.text == "42").expect("expansion emitted");
        assert_eq!(substituted.kind, TokenKind::Integer);
        // The expansion keeps the position of the macro use.
        assert_eq!(substituted.start, Position::new(1, 8));
        assert_eq!(preprocessor.substitutions().len(), 1);
        assert_eq!(preprocessor.substitutions()[0].original_tokens[0].text, "VALUE");
    }

    #[test]
    fn function_like_macro_consumes_arguments() {
        let (preprocessor, tokens) = process("#define TWICE(x) 2\nint x = TWICE(3);\n");
        assert!(tokens.iter().any(|t| t.text == "2"));
        assert!(!tokens.iter().any(|t| t.text == "3"));
        let substitution = &preprocessor.substitutions()[0];
        assert_eq!(substitution.original_tokens.first().unwrap().text, "TWICE");
        assert_eq!(substitution.original_tokens.last().unwrap().kind, TokenKind::RParen);
    }

    #[test]
    fn include_statement_kept_in_both_streams() {
        let (preprocessor, tokens) = process("#include \"header.hh\"\nint x;\n");
        assert_eq!(preprocessor.included_paths(), ["\"header.hh\""]);
        assert_eq!(tokens[0].kind, TokenKind::IncludeStatement);
        assert_eq!(tokens[1].kind, TokenKind::IncludePath);
        assert_eq!(tokens[1].text, "\"header.hh\"");
        let unprocessed_kinds: Vec<TokenKind> = preprocessor.unprocessed_tokens().iter().map(|t| t.kind).collect();
        assert!(unprocessed_kinds.contains(&TokenKind::IncludePath));
    }

    #[test]
    fn angle_include_reconstructed_with_delimiters() {
        let (preprocessor, _) = process("#include <sys/types.h>\n");
        assert_eq!(preprocessor.included_paths(), ["<sys/types.h>"]);
    }

    #[test]
    fn unterminated_include_path_extends_to_line_end() {
        let (_, tokens) = process("#include <sys/aso");
        let path = tokens.iter().find(|t| t.kind == TokenKind::IncludePath).unwrap();
        assert_eq!(path.text, "<sys/aso");
        assert_eq!(path.end, Position::new(0, 17));
    }

    #[test]
    fn unterminated_quoted_include_path() {
        let (_, tokens) = process("#include \"sample_head");
        let path = tokens.iter().find(|t| t.kind == TokenKind::IncludePath).unwrap();
        assert_eq!(path.text, "\"sample_head");
        assert_eq!(path.start, Position::new(0, 9));
        assert_eq!(path.end, Position::new(0, 20));
    }

    #[test]
    fn inactive_branches_do_not_reach_processed_stream() {
        let source = "#ifdef MISSING\nint hidden;\n#else\nint visible;\n#endif\n";
        let (preprocessor, tokens) = process(source);
        assert!(!tokens.iter().any(|t| t.text == "hidden"));
        assert!(tokens.iter().any(|t| t.text == "visible"));
        // The unprocessed stream still carries the inactive tokens.
        assert!(preprocessor.unprocessed_tokens().iter().any(|t| t.text == "hidden"));
    }

    #[test]
    fn ifndef_guard_admits_first_inclusion() {
        let source = "#ifndef GUARD\n#define GUARD\nint value;\n#endif\n";
        let (preprocessor, tokens) = process(source);
        assert!(tokens.iter().any(|t| t.text == "value"));
        assert!(preprocessor.definitions().contains_key("GUARD"));
    }

    #[test]
    fn undef_removes_definition() {
        let (preprocessor, _) = process("#define GONE 1\n#undef GONE\n");
        assert!(preprocessor.definitions().is_empty());
    }

    #[test]
    fn header_definitions_participate_in_substitution() {
        let mut preprocessor = Preprocessor::new("main.cc", "#include \"h.hh\"\nint x = FROM_HEADER;\n");
        preprocessor.set_keep_include_statements(true);
        let mut callback = |_path: &str| {
            let mut definitions = Definitions::default();
            definitions.insert(
                "FROM_HEADER".to_string(),
                DefinedValue {
                    value: "7".to_string(),
                    parameters: Vec::new(),
                    is_function_like: false,
                    filename: "h.hh".to_string(),
                    line: 0,
                    column: 8,
                },
            );
            definitions
        };
        let tokens = preprocessor.process_and_lex(&mut callback);
        assert!(tokens.iter().any(|t| t.text == "7"));
    }

    #[test]
    fn pragma_is_tolerated() {
        let (preprocessor, tokens) = process("#pragma once\nint x;\n");
        assert!(tokens.iter().any(|t| t.text == "x"));
        assert_eq!(preprocessor.unprocessed_tokens()[0].kind, TokenKind::PreprocessorStatement);
    }
}
