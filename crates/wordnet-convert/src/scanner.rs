//! Cursor-based matching over a single line.

use regex::{Captures, Regex};

use crate::error::ParseError;

/// Anchored matcher that walks one line from left to right.
///
/// Patterns passed to [`Scanner::scan`] are expected to start with `^`; they
/// are applied to the unconsumed suffix, and a match that does not begin at
/// the cursor counts as no match.
#[derive(Clone, Debug)]
pub struct Scanner<'a> {
    line: &'a str,
    pos: usize,
}

impl<'a> Scanner<'a> {
    pub fn new(line: &'a str) -> Self {
        Self { line, pos: 0 }
    }

    /// Reset to the start of a fresh line.
    pub fn rebind(&mut self, line: &'a str) {
        self.line = line;
        self.pos = 0;
    }

    /// Match `pattern` at the cursor and advance past it on success.
    ///
    /// On failure the cursor does not move.
    pub fn scan(&mut self, pattern: &Regex) -> Option<Captures<'a>> {
        let rest = self.remainder();
        let caps = pattern.captures(rest)?;
        let whole = caps.get(0)?;
        if whole.start() != 0 {
            return None;
        }
        self.pos += whole.end();
        Some(caps)
    }

    /// Like [`Scanner::scan`] but only reports whether the pattern matched.
    pub fn skip(&mut self, pattern: &Regex) -> bool {
        self.scan(pattern).is_some()
    }

    /// The unconsumed suffix of the line.
    pub fn remainder(&self) -> &'a str {
        let line = self.line;
        &line[self.pos..]
    }

    pub fn at_end(&self) -> bool {
        self.pos >= self.line.len()
    }

    #[cfg(test)]
    pub(crate) fn position(&self) -> usize {
        self.pos
    }

    /// [`Scanner::scan`], turning a miss into a `MalformedField` error for `field`.
    pub(crate) fn require(
        &mut self,
        pattern: &Regex,
        field: &'static str,
        line: usize,
    ) -> Result<Captures<'a>, ParseError> {
        self.scan(pattern)
            .ok_or_else(|| ParseError::malformed(field, self.remainder(), line))
    }
}

/// Text of capture group `idx`, borrowed from the scanned line.
pub(crate) fn group<'a>(caps: &Captures<'a>, idx: usize) -> &'a str {
    caps.get(idx).map_or("", |m| m.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn re(pattern: &str) -> Regex {
        Regex::new(pattern).unwrap()
    }

    #[test]
    fn advances_only_on_anchored_match() {
        let digits = re(r"^\s*(\d+)");
        let word = re(r"^\s*([a-z]+)");
        let mut scanner = Scanner::new("12 abc 7");

        let caps = scanner.scan(&digits).unwrap();
        assert_eq!(group(&caps, 1), "12");
        assert_eq!(scanner.remainder(), " abc 7");

        assert!(scanner.scan(&digits).is_none());
        assert_eq!(scanner.position(), 2);

        assert!(scanner.skip(&word));
        assert_eq!(scanner.remainder(), " 7");
        assert!(!scanner.at_end());
        assert!(scanner.skip(&digits));
        assert!(scanner.at_end());
    }

    #[test]
    fn unanchored_patterns_do_not_jump_ahead() {
        let mut scanner = Scanner::new("abc 42");
        assert!(scanner.scan(&re(r"\d+")).is_none());
        assert_eq!(scanner.position(), 0);
    }

    #[test]
    fn rebind_resets_cursor() {
        let any = re(r"^\S+");
        let mut scanner = Scanner::new("first");
        assert!(scanner.skip(&any));
        assert!(scanner.at_end());
        scanner.rebind("second line");
        assert_eq!(scanner.position(), 0);
        assert_eq!(scanner.remainder(), "second line");
    }

    #[test]
    fn require_reports_remainder_and_line() {
        let mut scanner = Scanner::new("x 1");
        let err = scanner.require(&re(r"^\d"), "count", 9).unwrap_err();
        assert_eq!(err.line(), 9);
        assert_eq!(err.remainder(), "x 1");
    }
}
