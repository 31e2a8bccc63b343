use std::collections::HashSet;

use lazy_static::lazy_static;
use regex::Regex;
use wordnet_types::{IndexRecord, Pos};

use crate::error::ParseError;
use crate::scanner::{Scanner, group};
use crate::sense_index::SenseIndex;

lazy_static! {
    static ref LEMMA: Regex = Regex::new(r"^\s*(\S+)").unwrap();
    static ref POS: Regex = Regex::new(r"^\s+([nvar])").unwrap();
    static ref COUNT: Regex = Regex::new(r"^\s+(\d+)").unwrap();
    static ref PTR_SYMBOL: Regex = Regex::new(r"^\s+(\S{1,2})").unwrap();
    static ref OFFSET: Regex = Regex::new(r"^\s+(\d{8})").unwrap();
    static ref TRAILING_SPACE: Regex = Regex::new(r"^\s+").unwrap();
}

/// Parse one `index.*` line and register its senses in `senses`.
///
/// Layout: `lemma pos synset_cnt p_cnt [ptr_symbol...] sense_cnt
/// tagsense_cnt synset_offset...`. The i-th offset becomes sense `i` of the
/// lemma. Pointer symbols and the tagged-sense count are read but not kept.
///
/// The POS comes from the line itself; `_file_pos` is only accepted so all
/// line parsers share a call shape. Nothing is written to `senses` unless the
/// whole line parses.
pub fn parse_index_line(
    line: &str,
    lineno: usize,
    _file_pos: Pos,
    senses: &mut SenseIndex,
) -> Result<IndexRecord, ParseError> {
    let mut scanner = Scanner::new(line);

    let lemma = group(&scanner.require(&LEMMA, "lemma", lineno)?, 1);
    let pos_caps = scanner.require(&POS, "pos", lineno)?;
    let pos = group(&pos_caps, 1)
        .chars()
        .next()
        .and_then(Pos::from_char)
        .ok_or_else(|| ParseError::malformed("pos", scanner.remainder(), lineno))?;
    let polysemy = count(&mut scanner, "synset_cnt", lineno)?;
    let p_cnt = count(&mut scanner, "p_cnt", lineno)?;
    for _ in 0..p_cnt {
        scanner.require(&PTR_SYMBOL, "ptr_symbol", lineno)?;
    }
    let sense_cnt = count(&mut scanner, "sense_cnt", lineno)?;
    count(&mut scanner, "tagsense_cnt", lineno)?;

    let mut offsets = Vec::new();
    for _ in 0..sense_cnt {
        let caps = scanner.require(&OFFSET, "synset_offset", lineno)?;
        let offset = group(&caps, 1)
            .parse::<u32>()
            .map_err(|_| ParseError::malformed("synset_offset", scanner.remainder(), lineno))?;
        offsets.push(offset);
    }

    scanner.skip(&TRAILING_SPACE);
    if !scanner.at_end() {
        return Err(ParseError::TrailingData {
            remainder: scanner.remainder().to_string(),
            line: lineno,
        });
    }

    let mut seen = HashSet::with_capacity(offsets.len());
    for &offset in &offsets {
        if !seen.insert(offset) || senses.contains(offset, pos, lemma) {
            return Err(ParseError::DuplicateSense {
                offset,
                pos,
                lemma: lemma.to_string(),
                line: lineno,
            });
        }
    }
    for (sense, &offset) in offsets.iter().enumerate() {
        senses.put(offset, pos, lemma, sense as u32);
    }

    Ok(IndexRecord {
        lemma: lemma.to_string(),
        pos,
        polysemy,
        offsets,
    })
}

fn count(scanner: &mut Scanner<'_>, field: &'static str, lineno: usize) -> Result<u32, ParseError> {
    let caps = scanner.require(&COUNT, field, lineno)?;
    group(&caps, 1)
        .parse()
        .map_err(|_| ParseError::malformed(field, scanner.remainder(), lineno))
}
