use thiserror::Error;
use wordnet_types::Pos;

/// Why a single dictionary line produced no record.
///
/// Every variant carries the 1-based line number; all but `DuplicateSense`
/// also carry the text left unconsumed when parsing stopped.
#[derive(Clone, Debug, Eq, PartialEq, Error)]
pub enum ParseError {
    #[error("line {line}: malformed {field} at {remainder:?}")]
    MalformedField {
        field: &'static str,
        remainder: String,
        line: usize,
    },
    #[error("line {line}: no sense number for {lemma:?} in synset {offset:08}{} at {remainder:?}", .pos.to_char())]
    UnresolvedSense {
        offset: u32,
        pos: Pos,
        lemma: String,
        remainder: String,
        line: usize,
    },
    #[error("line {line}: unexpected trailing data {remainder:?}")]
    TrailingData { remainder: String, line: usize },
    #[error("line {line}: sense of {lemma:?} in synset {offset:08}{} already assigned", .pos.to_char())]
    DuplicateSense {
        offset: u32,
        pos: Pos,
        lemma: String,
        line: usize,
    },
}

/// Coarse classification of a [`ParseError`], handy for tallies.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum ParseErrorKind {
    MalformedField,
    UnresolvedSense,
    TrailingData,
    DuplicateSense,
}

impl ParseError {
    pub(crate) fn malformed(field: &'static str, remainder: &str, line: usize) -> Self {
        ParseError::MalformedField {
            field,
            remainder: remainder.to_string(),
            line,
        }
    }

    pub fn kind(&self) -> ParseErrorKind {
        match self {
            ParseError::MalformedField { .. } => ParseErrorKind::MalformedField,
            ParseError::UnresolvedSense { .. } => ParseErrorKind::UnresolvedSense,
            ParseError::TrailingData { .. } => ParseErrorKind::TrailingData,
            ParseError::DuplicateSense { .. } => ParseErrorKind::DuplicateSense,
        }
    }

    pub fn line(&self) -> usize {
        match self {
            ParseError::MalformedField { line, .. }
            | ParseError::UnresolvedSense { line, .. }
            | ParseError::TrailingData { line, .. }
            | ParseError::DuplicateSense { line, .. } => *line,
        }
    }

    pub fn remainder(&self) -> &str {
        match self {
            ParseError::MalformedField { remainder, .. }
            | ParseError::UnresolvedSense { remainder, .. }
            | ParseError::TrailingData { remainder, .. } => remainder,
            ParseError::DuplicateSense { .. } => "",
        }
    }
}

/// A (key, value) pair that does not follow the record encoding.
#[derive(Clone, Debug, Eq, PartialEq, Error)]
pub enum DecodeError {
    #[error("malformed key {0:?}")]
    Key(String),
    #[error("expected {expected} fields, found {found}")]
    FieldCount { expected: usize, found: usize },
    #[error("malformed {field} {text:?}")]
    Field { field: &'static str, text: String },
}

impl DecodeError {
    pub(crate) fn field(field: &'static str, text: &str) -> Self {
        DecodeError::Field {
            field,
            text: text.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_line_and_remainder() {
        let err = ParseError::malformed("ptr_cnt", " zz |", 12);
        assert_eq!(err.to_string(), r#"line 12: malformed ptr_cnt at " zz |""#);
        assert_eq!(err.kind(), ParseErrorKind::MalformedField);

        let err = ParseError::UnresolvedSense {
            offset: 1740,
            pos: Pos::Noun,
            lemma: "dog".into(),
            remainder: " 000".into(),
            line: 3,
        };
        assert_eq!(
            err.to_string(),
            r#"line 3: no sense number for "dog" in synset 00001740n at " 000""#
        );
        assert_eq!(err.remainder(), " 000");
    }
}
