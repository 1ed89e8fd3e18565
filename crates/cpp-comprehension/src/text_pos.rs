use std::fmt;

/// A 0-based `(line, column)` position in a source file.
///
/// Ordering is lexicographic: first by line, then by column. Token and AST
/// ranges store the position of their **last** character, so containment
/// checks are inclusive on both ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Position {
    pub line: usize,
    pub column: usize,
}

impl Position {
    pub fn new(
        line: usize,
        column: usize,
    ) -> Self {
        Self { line, column }
    }

    /// The same position one column to the left, clamped at column 0.
    ///
    /// Completion queries arrive with the cursor *after* the typed text;
    /// the token of interest sits one column earlier.
    pub fn previous_column(self) -> Self {
        Self {
            line: self.line,
            column: self.column.saturating_sub(1),
        }
    }
}

impl fmt::Display for Position {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ordering_is_lexicographic() {
        assert!(Position::new(1, 9) < Position::new(2, 0));
        assert!(Position::new(2, 3) < Position::new(2, 4));
        assert!(Position::new(2, 4) <= Position::new(2, 4));
    }

    #[test]
    fn previous_column_clamps_at_zero() {
        assert_eq!(Position::new(3, 0).previous_column(), Position::new(3, 0));
        assert_eq!(Position::new(3, 7).previous_column(), Position::new(3, 6));
    }
}
