//! Owned record types produced when converting WordNet lexicographer files.
//!
//! The converter turns every line of `index.*`, `data.*` and `*.exc` into one
//! of [`IndexRecord`], [`SynsetRecord`] or [`MorphRecord`]. Fields keep the
//! numeric representation of the source files (`offset`, `lex_filenum`,
//! pointer source/target word numbers, frame numbers) so a record can be
//! written back out byte-for-byte in the canonical text form.
//!
//! Use [`Pos`] for the part-of-speech of a file or key and [`SynsetType`] for
//! the raw `ss_type` marker of a data line, which still distinguishes
//! adjective satellites.
//!
//! ```rust
//! use wordnet_types::{Pos, SynsetType, split_source_target};
//!
//! assert_eq!(SynsetType::from_char('s').unwrap().normalized(), Pos::Adj);
//! assert_eq!(split_source_target("0a0b"), Some((10, 11)));
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};

/// Part-of-speech marker as used by WordNet files (`n`, `v`, `a`/`s`, `r`).
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Pos {
    Noun,
    Verb,
    Adj,
    Adv,
}

impl Pos {
    /// Every part of speech, in the order the dictionary files are converted.
    pub const ALL: [Pos; 4] = [Pos::Noun, Pos::Verb, Pos::Adj, Pos::Adv];

    /// Parse a WordNet POS character into an enum.
    pub fn from_char(c: char) -> Option<Self> {
        match c {
            'n' => Some(Pos::Noun),
            'v' => Some(Pos::Verb),
            'a' | 's' => Some(Pos::Adj),
            'r' => Some(Pos::Adv),
            _ => None,
        }
    }

    /// Emit the POS character used in `index.*`/`data.*` and in record keys.
    pub fn to_char(self) -> char {
        match self {
            Pos::Noun => 'n',
            Pos::Verb => 'v',
            Pos::Adj => 'a',
            Pos::Adv => 'r',
        }
    }

    /// Suffix of the per-POS dictionary files (`index.noun`, `noun.exc`, ...).
    pub fn file_suffix(self) -> &'static str {
        match self {
            Pos::Noun => "noun",
            Pos::Verb => "verb",
            Pos::Adj => "adj",
            Pos::Adv => "adv",
        }
    }
}

impl fmt::Display for Pos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.file_suffix())
    }
}

/// Raw `ss_type` marker from `data.*`, including adjective satellites.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum SynsetType {
    Noun,
    Verb,
    Adj,
    Adv,
    AdjSatellite,
}

impl SynsetType {
    /// Parse the `ss_type` character from a data line.
    pub fn from_char(c: char) -> Option<Self> {
        match c {
            'n' => Some(SynsetType::Noun),
            'v' => Some(SynsetType::Verb),
            'a' => Some(SynsetType::Adj),
            's' => Some(SynsetType::AdjSatellite),
            'r' => Some(SynsetType::Adv),
            _ => None,
        }
    }

    pub fn to_char(self) -> char {
        match self {
            SynsetType::Noun => 'n',
            SynsetType::Verb => 'v',
            SynsetType::Adj => 'a',
            SynsetType::AdjSatellite => 's',
            SynsetType::Adv => 'r',
        }
    }

    /// Fold satellites into plain adjectives, the form used in synset keys.
    pub fn normalized(self) -> Pos {
        match self {
            SynsetType::Noun => Pos::Noun,
            SynsetType::Verb => Pos::Verb,
            SynsetType::Adj | SynsetType::AdjSatellite => Pos::Adj,
            SynsetType::Adv => Pos::Adv,
        }
    }

    pub fn is_verb(self) -> bool {
        matches!(self, SynsetType::Verb)
    }
}

/// One `index.*` line: a lemma, its polysemy count and its synsets in sense order.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct IndexRecord {
    pub lemma: String,
    pub pos: Pos,
    pub polysemy: u32,
    pub offsets: Vec<u32>,
}

/// A synset member paired with its 0-based sense number for that lemma.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct WordSense {
    pub word: String,
    pub sense: u32,
}

/// Pointer metadata from the `p_cnt` section of a data line.
///
/// `source`/`target` are word numbers within the two synsets; zero means the
/// pointer is semantic (synset to synset) rather than lexical.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct PointerEntry {
    pub symbol: String,
    pub target_offset: u32,
    pub target_type: SynsetType,
    pub source: u8,
    pub target: u8,
}

/// Verb frame (`f_cnt`) entry; `word` zero applies the frame to every word.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct FrameEntry {
    pub frame: u8,
    pub word: u8,
}

/// One `data.*` line with every word resolved to its sense number.
///
/// `pos` is already normalized: satellites are stored as [`Pos::Adj`].
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct SynsetRecord {
    pub offset: u32,
    pub pos: Pos,
    pub lex_filenum: u8,
    pub words: Vec<WordSense>,
    pub pointers: Vec<PointerEntry>,
    pub frames: Vec<FrameEntry>,
    pub gloss: Option<String>,
}

/// One `*.exc` line: an irregular form and the lemma it inflects.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct MorphRecord {
    pub form: String,
    pub pos: Pos,
    pub lemma: String,
}

/// Split the four-hex source/target field used in pointer blocks.
///
/// High byte is the source word number, low byte is the target word number.
pub fn split_source_target(hex4: &str) -> Option<(u8, u8)> {
    if hex4.len() != 4 {
        return None;
    }
    let val = u16::from_str_radix(hex4, 16).ok()?;
    Some(((val >> 8) as u8, (val & 0x00FF) as u8))
}
