// file: src/template/spacing.rs
// version: 1.0.0
// guid: d54baf58-63f7-4439-a760-ba168d3073e1

//! Spacing around a rewritten interval descriptor
//!
//! xorriso is whitespace sensitive next to quoted arguments, so the separators placed
//! around `--interval:...` are a pure function of what surrounds it.

const QUOTE: char = '\'';
const SPACE: &str = " ";
const NONE: &str = "";

/// Separators to place before and after the descriptor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Spacers {
    pub before: &'static str,
    pub after: &'static str,
}

impl Spacers {
    /// Decide from presence of surrounding text and its boundary characters.
    ///
    /// `before_last` is the final character of the preceding text, `after_first` the first
    /// character of the following text.
    pub fn resolve(
        has_before: bool,
        has_after: bool,
        before_last: Option<char>,
        after_first: Option<char>,
    ) -> Self {
        let quotes_adjacent = before_last == Some(QUOTE) && after_first == Some(QUOTE);

        match (has_before, has_after) {
            (true, true) if quotes_adjacent => Self::new(NONE, NONE),
            (true, true) => Self::new(SPACE, SPACE),
            (true, false) => Self::new(SPACE, NONE),
            (false, true) => Self::new(NONE, SPACE),
            (false, false) => Self::new(NONE, NONE),
        }
    }

    /// Convenience wrapper over [`Spacers::resolve`] for the surrounding strings
    pub fn between(before: &str, after: &str) -> Self {
        Self::resolve(
            !before.is_empty(),
            !after.is_empty(),
            before.chars().last(),
            after.chars().next(),
        )
    }

    fn new(before: &'static str, after: &'static str) -> Self {
        Self { before, after }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_before() {
        let spacers = Spacers::between("", "rest");
        assert_eq!(spacers.before, "");
        assert_eq!(spacers.after, " ");
    }

    #[test]
    fn test_empty_after() {
        let spacers = Spacers::between("-isohybrid-mbr", "");
        assert_eq!(spacers.before, " ");
        assert_eq!(spacers.after, "");
    }

    #[test]
    fn test_both_empty() {
        assert_eq!(Spacers::between("", ""), Spacers::new("", ""));
    }

    #[test]
    fn test_adjacent_quotes_get_no_space() {
        let spacers = Spacers::between("'x'", "'y'");
        assert_eq!(spacers, Spacers::new("", ""));
    }

    #[test]
    fn test_both_present_without_adjacent_quotes() {
        assert_eq!(Spacers::between("-c 'boot.cat'", "-b x"), Spacers::new(" ", " "));
        assert_eq!(Spacers::between("-c", "'y'"), Spacers::new(" ", " "));
        assert_eq!(Spacers::between("a", "b"), Spacers::new(" ", " "));
    }

    #[test]
    fn test_resolve_ignores_boundaries_when_side_missing() {
        let spacers = Spacers::resolve(false, true, Some('\''), Some('\''));
        assert_eq!(spacers, Spacers::new("", " "));
    }
}
