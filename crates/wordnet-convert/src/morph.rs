use wordnet_types::{MorphRecord, Pos};

use crate::error::ParseError;

/// Parse one `*.exc` line (`form base_lemma`); `pos` is the file's POS.
pub fn parse_morph_line(line: &str, lineno: usize, pos: Pos) -> Result<MorphRecord, ParseError> {
    let mut tokens = line.split_whitespace();
    match (tokens.next(), tokens.next(), tokens.next()) {
        (Some(form), Some(lemma), None) => Ok(MorphRecord {
            form: form.to_string(),
            pos,
            lemma: lemma.to_string(),
        }),
        _ => Err(ParseError::malformed("exception pair", line, lineno)),
    }
}
