use lazy_static::lazy_static;
use regex::Regex;
use wordnet_types::{
    FrameEntry, PointerEntry, Pos, SynsetRecord, SynsetType, WordSense, split_source_target,
};

use crate::error::ParseError;
use crate::scanner::{Scanner, group};
use crate::sense_index::SenseIndex;

lazy_static! {
    static ref OFFSET: Regex = Regex::new(r"^\s*(\d{8})").unwrap();
    static ref LEX_FILENUM: Regex = Regex::new(r"^\s+(\d{2})").unwrap();
    static ref SS_TYPE: Regex = Regex::new(r"^\s+([nvasr])").unwrap();
    static ref W_CNT: Regex = Regex::new(r"^\s+([0-9a-fA-F]{2})").unwrap();
    // The lex id is optional, so on a line that omits it a following word
    // made of one hex digit (`a`, `e`) is consumed as that lex id.
    static ref WORD: Regex = Regex::new(r"^\s+(\S+)(?:\s+([0-9a-fA-F])\b)?").unwrap();
    static ref P_CNT: Regex = Regex::new(r"^\s+(\d{3})").unwrap();
    static ref POINTER: Regex =
        Regex::new(r"^\s+(\S{1,2})\s+(\d{8})\s+([nvasr])\s+([0-9a-fA-F]{4})").unwrap();
    static ref F_CNT: Regex = Regex::new(r"^\s+(\d{2})").unwrap();
    static ref FRAME: Regex = Regex::new(r"^\s+\+\s+(\d{2})\s+([0-9a-fA-F]{2})").unwrap();
    static ref GLOSS: Regex = Regex::new(r"^\s*\|(.*)$").unwrap();
    static ref TRAILING_SPACE: Regex = Regex::new(r"^\s+").unwrap();
}

struct Header {
    offset: u32,
    lex_filenum: u8,
    ss_type: SynsetType,
    w_cnt: u8,
}

/// Parse one `data.*` line, resolving every word against `senses`.
///
/// The line is consumed strictly in order: header, words, pointers, verb
/// frames (only when `ss_type` is `v`), then an optional `| gloss`. A word
/// that has no sense number under `(offset, pos, word)` fails the whole line.
/// The record's POS is the normalized `ss_type`, so satellites key as `a`.
pub fn parse_synset_line(
    line: &str,
    lineno: usize,
    pos: Pos,
    senses: &SenseIndex,
) -> Result<SynsetRecord, ParseError> {
    let mut scanner = Scanner::new(line);

    let header = read_header(&mut scanner, lineno)?;
    let words = read_words(&mut scanner, &header, pos, senses, lineno)?;
    let pointers = read_pointers(&mut scanner, lineno)?;
    let frames = if header.ss_type.is_verb() {
        read_frames(&mut scanner, lineno)?
    } else {
        Vec::new()
    };
    let gloss = read_gloss(&mut scanner);

    scanner.skip(&TRAILING_SPACE);
    if !scanner.at_end() {
        return Err(ParseError::TrailingData {
            remainder: scanner.remainder().to_string(),
            line: lineno,
        });
    }

    Ok(SynsetRecord {
        offset: header.offset,
        pos: header.ss_type.normalized(),
        lex_filenum: header.lex_filenum,
        words,
        pointers,
        frames,
        gloss,
    })
}

fn read_header(scanner: &mut Scanner<'_>, lineno: usize) -> Result<Header, ParseError> {
    let offset = decimal(scanner, &OFFSET, "offset", lineno)?;
    let lex_filenum = decimal(scanner, &LEX_FILENUM, "lex_filenum", lineno)?;
    let caps = scanner.require(&SS_TYPE, "ss_type", lineno)?;
    let ss_type = group(&caps, 1)
        .chars()
        .next()
        .and_then(SynsetType::from_char)
        .ok_or_else(|| ParseError::malformed("ss_type", scanner.remainder(), lineno))?;
    let w_cnt = hex(scanner, &W_CNT, "w_cnt", lineno)?;
    Ok(Header {
        offset,
        lex_filenum,
        ss_type,
        w_cnt,
    })
}

fn read_words(
    scanner: &mut Scanner<'_>,
    header: &Header,
    pos: Pos,
    senses: &SenseIndex,
    lineno: usize,
) -> Result<Vec<WordSense>, ParseError> {
    let mut words = Vec::with_capacity(header.w_cnt as usize);
    for _ in 0..header.w_cnt {
        let caps = scanner.require(&WORD, "word", lineno)?;
        let word = group(&caps, 1);
        let sense = senses
            .get(header.offset, pos, word)
            .ok_or_else(|| ParseError::UnresolvedSense {
                offset: header.offset,
                pos,
                lemma: word.to_lowercase(),
                remainder: scanner.remainder().to_string(),
                line: lineno,
            })?;
        words.push(WordSense {
            word: word.to_string(),
            sense,
        });
    }
    Ok(words)
}

fn read_pointers(scanner: &mut Scanner<'_>, lineno: usize) -> Result<Vec<PointerEntry>, ParseError> {
    let p_cnt: u32 = decimal(scanner, &P_CNT, "p_cnt", lineno)?;
    let mut pointers = Vec::with_capacity(p_cnt as usize);
    for _ in 0..p_cnt {
        let caps = scanner.require(&POINTER, "pointer", lineno)?;
        let bad = || ParseError::malformed("pointer", scanner.remainder(), lineno);
        let target_type = group(&caps, 3)
            .chars()
            .next()
            .and_then(SynsetType::from_char)
            .ok_or_else(bad)?;
        let (source, target) = split_source_target(group(&caps, 4)).ok_or_else(bad)?;
        pointers.push(PointerEntry {
            symbol: group(&caps, 1).to_string(),
            target_offset: group(&caps, 2).parse().map_err(|_| bad())?,
            target_type,
            source,
            target,
        });
    }
    Ok(pointers)
}

fn read_frames(scanner: &mut Scanner<'_>, lineno: usize) -> Result<Vec<FrameEntry>, ParseError> {
    let f_cnt: u8 = decimal(scanner, &F_CNT, "f_cnt", lineno)?;
    let mut frames = Vec::with_capacity(f_cnt as usize);
    for _ in 0..f_cnt {
        let caps = scanner.require(&FRAME, "frame", lineno)?;
        let bad = || ParseError::malformed("frame", scanner.remainder(), lineno);
        frames.push(FrameEntry {
            frame: group(&caps, 1).parse().map_err(|_| bad())?,
            word: u8::from_str_radix(group(&caps, 2), 16).map_err(|_| bad())?,
        });
    }
    Ok(frames)
}

fn read_gloss(scanner: &mut Scanner<'_>) -> Option<String> {
    let caps = scanner.scan(&GLOSS)?;
    let gloss = group(&caps, 1).trim();
    (!gloss.is_empty()).then(|| gloss.to_string())
}

fn decimal<T: std::str::FromStr>(
    scanner: &mut Scanner<'_>,
    pattern: &Regex,
    field: &'static str,
    lineno: usize,
) -> Result<T, ParseError> {
    let caps = scanner.require(pattern, field, lineno)?;
    group(&caps, 1)
        .parse()
        .map_err(|_| ParseError::malformed(field, scanner.remainder(), lineno))
}

fn hex(
    scanner: &mut Scanner<'_>,
    pattern: &Regex,
    field: &'static str,
    lineno: usize,
) -> Result<u8, ParseError> {
    let caps = scanner.require(pattern, field, lineno)?;
    u8::from_str_radix(group(&caps, 1), 16)
        .map_err(|_| ParseError::malformed(field, scanner.remainder(), lineno))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encode::{KvRecord, split_fields};
    use crate::error::ParseErrorKind;
    use crate::index_line::parse_index_line;

    fn senses_from(lines: &[&str]) -> SenseIndex {
        let mut senses = SenseIndex::new();
        for (i, line) in lines.iter().enumerate() {
            parse_index_line(line, i + 1, Pos::Noun, &mut senses).expect("index fixture");
        }
        senses
    }

    #[test]
    fn resolves_verb_words_and_gloss() {
        let senses = senses_from(&["run v 2 0 2 1 00101742 00201234"]);
        let record = parse_synset_line(
            "00101742 38 v 01 run 0 000 00 | to move fast",
            1,
            Pos::Verb,
            &senses,
        )
        .unwrap();

        let (key, value) = record.encode();
        assert_eq!(key, "00101742%v");
        let fields = split_fields(&value);
        assert_eq!(fields[1], "run%0");
        assert_eq!(fields[4], "to move fast");
    }

    #[test]
    fn parses_pointers_and_frames() {
        let senses = senses_from(&[
            "breathe v 2 1 @ 2 1 00002000 00001740",
            "respire v 1 1 @ 1 0 00001740",
        ]);
        let line = "00001740 29 v 02 breathe 0 Respire 1 002 @ 00002084 v 0000 + 00831191 n 0103 02 + 02 00 + 08 01 | draw air into, and expel out of, the lungs  ";
        let record = parse_synset_line(line, 5, Pos::Verb, &senses).unwrap();

        assert_eq!(record.lex_filenum, 29);
        assert_eq!(record.words[0].sense, 1);
        assert_eq!(record.words[1].word, "Respire");
        assert_eq!(record.words[1].sense, 0);
        assert_eq!(record.pointers.len(), 2);
        assert_eq!(record.pointers[1].symbol, "+");
        assert_eq!(record.pointers[1].target_offset, 831191);
        assert_eq!(record.pointers[1].target_type, SynsetType::Noun);
        assert_eq!((record.pointers[1].source, record.pointers[1].target), (1, 3));
        assert_eq!(
            record.frames,
            vec![FrameEntry { frame: 2, word: 0 }, FrameEntry { frame: 8, word: 1 }]
        );
        assert_eq!(
            record.gloss.as_deref(),
            Some("draw air into, and expel out of, the lungs")
        );
    }

    #[test]
    fn satellite_keys_as_adjective() {
        let senses = senses_from(&["abaxial a 1 0 1 0 00002098"]);
        let record = parse_synset_line(
            "00002098 00 s 01 abaxial 0 001 & 00001740 a 0000 | facing away from the axis",
            1,
            Pos::Adj,
            &senses,
        )
        .unwrap();
        assert_eq!(record.pos, Pos::Adj);
        assert_eq!(record.key(), "00002098%a");
    }

    #[test]
    fn marker_words_use_stripped_lemma() {
        let senses = senses_from(&["galore a 1 0 1 0 01673061"]);
        let record = parse_synset_line(
            "01673061 00 s 01 galore(ip) 0 000 | in great numbers",
            1,
            Pos::Adj,
            &senses,
        )
        .unwrap();
        assert_eq!(record.words[0].word, "galore(ip)");
        assert_eq!(record.words[0].sense, 0);
    }

    #[test]
    fn unresolved_word_fails_the_line() {
        let senses = senses_from(&["dog n 1 0 1 0 00001740"]);
        let err = parse_synset_line(
            "00001740 05 n 02 dog 0 cat(x) 0 000 | an animal",
            12,
            Pos::Noun,
            &senses,
        )
        .unwrap_err();
        assert!(matches!(
            err,
            ParseError::UnresolvedSense { offset: 1740, pos: Pos::Noun, ref lemma, line: 12, .. }
                if lemma == "cat(x)"
        ));
        assert_eq!(err.remainder(), " 000 | an animal");
    }

    #[test]
    fn words_resolve_against_the_file_pos() {
        let senses = senses_from(&["dog n 1 0 1 0 00001740"]);
        let err = parse_synset_line("00001740 05 n 01 dog 0 000 | x", 1, Pos::Verb, &senses)
            .unwrap_err();
        assert_eq!(err.kind(), ParseErrorKind::UnresolvedSense);
    }

    #[test]
    fn nouns_have_no_frame_section() {
        let senses = senses_from(&["dog n 1 0 1 0 00001740"]);
        let err = parse_synset_line("00001740 05 n 01 dog 0 000 01 + 02 00 | x", 1, Pos::Noun, &senses)
            .unwrap_err();
        assert_eq!(err.kind(), ParseErrorKind::TrailingData);
        assert_eq!(err.remainder(), "01 + 02 00 | x");
    }

    #[test]
    fn missing_gloss_is_none() {
        let senses = senses_from(&["dog n 1 0 1 0 00001740"]);
        let record = parse_synset_line("00001740 05 n 01 dog 0 000  ", 1, Pos::Noun, &senses)
            .unwrap();
        assert_eq!(record.gloss, None);
    }

    #[test]
    fn short_pointer_block_is_malformed() {
        let senses = senses_from(&["dog n 1 0 1 0 00001740"]);
        let err = parse_synset_line(
            "00001740 05 n 01 dog 0 002 @ 00002084 n 0000 | x",
            3,
            Pos::Noun,
            &senses,
        )
        .unwrap_err();
        assert!(matches!(
            err,
            ParseError::MalformedField { field: "pointer", line: 3, .. }
        ));
        assert_eq!(err.remainder(), " | x");
    }

    #[test]
    fn one_letter_word_after_missing_lex_id_is_read_as_lex_id() {
        let senses = senses_from(&["dog n 1 0 1 0 00001740"]);
        let err = parse_synset_line("00001740 05 n 02 dog a 000 | x", 4, Pos::Noun, &senses)
            .unwrap_err();
        assert!(matches!(
            err,
            ParseError::UnresolvedSense { offset: 1740, ref lemma, line: 4, .. }
                if lemma == "000"
        ));
        assert_eq!(err.remainder(), " | x");
    }

    #[test]
    fn bad_header_is_malformed() {
        let senses = SenseIndex::new();
        let err = parse_synset_line("1740 05 n 01 dog 0 000 | x", 1, Pos::Noun, &senses)
            .unwrap_err();
        assert!(matches!(err, ParseError::MalformedField { field: "offset", .. }));
    }
}
