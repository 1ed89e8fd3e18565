use logos::Logos;

use crate::syntax::kind::{LexKind, TokenKind};
use crate::text_pos::Position;

/// A lexed token with owned text and inclusive `(line, column)` range.
///
/// `end` is the position of the last character of the token, so single
/// character tokens have `start == end`. Owning the text keeps tokens
/// valid after the preprocessor splices in macro expansions whose text
/// does not exist in the original source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub text: String,
    pub start: Position,
    pub end: Position,
}

impl Token {
    pub fn new(
        kind: TokenKind,
        text: impl Into<String>,
        start: Position,
        end: Position,
    ) -> Self {
        Self {
            kind,
            text: text.into(),
            start,
            end,
        }
    }

    pub fn contains(
        &self,
        position: Position,
    ) -> bool {
        self.start <= position && position <= self.end
    }
}

/// Wraps `logos::Lexer` and converts byte spans into line/column ranges.
pub struct Lexer;

impl Lexer {
    pub fn tokenize(input: &str) -> Vec<Token> {
        let mut tokens = Vec::new();
        let mut lexer = LexKind::lexer(input);
        let mut tracker = PositionTracker::default();

        while let Some(result) = lexer.next() {
            let text = lexer.slice();
            let kind = match result {
                Ok(lex_kind) => TokenKind::from(lex_kind),
                Err(()) => TokenKind::Unknown,
            };
            let (start, end) = tracker.advance(text);
            tokens.push(Token::new(kind, text, start, end));
        }

        tokens
    }
}

/// Running line/column state while consuming token texts in order.
#[derive(Default)]
struct PositionTracker {
    line: usize,
    column: usize,
}

impl PositionTracker {
    /// Consume `text`, returning the inclusive range it covered.
    fn advance(
        &mut self,
        text: &str,
    ) -> (Position, Position) {
        let start = Position::new(self.line, self.column);
        let mut last = start;
        for ch in text.chars() {
            last = Position::new(self.line, self.column);
            if ch == '\n' {
                self.line += 1;
                self.column = 0;
            } else {
                self.column += 1;
            }
        }
        (start, last)
    }
}
