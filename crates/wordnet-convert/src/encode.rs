//! Canonical two-level text encoding of converted records.
//!
//! Keys are two parts joined by [`KEY_DELIM`] (`run%v`, `00101742%v`,
//! `ran%n`). Values join their top-level fields with [`FIELD_DELIM`] and the
//! repeated items inside one field with [`SUB_DELIM`]:
//!
//! | record  | value fields                                              |
//! |---------|-----------------------------------------------------------|
//! | index   | `polysemy`, offsets                                       |
//! | synset  | `lex_filenum`, `word%sense` pairs, pointers, frames, gloss |
//! | morph   | base lemma                                                |
//!
//! A pointer item reads `symbol offset%type SSTT` and a frame item `NN WW`
//! (decimal frame number, hex word number). Decoding is the exact inverse of
//! encoding as long as no text field contains a delimiter.

use wordnet_types::{
    FrameEntry, IndexRecord, MorphRecord, PointerEntry, Pos, SynsetRecord, SynsetType, WordSense,
    split_source_target,
};

use crate::error::DecodeError;

pub const KEY_DELIM: char = '%';
pub const FIELD_DELIM: &str = "||";
pub const SUB_DELIM: &str = "|";

/// A record with a canonical (key, value) text form.
pub trait KvRecord: Sized {
    fn key(&self) -> String;
    fn value(&self) -> String;
    fn decode(key: &str, value: &str) -> Result<Self, DecodeError>;

    fn encode(&self) -> (String, String) {
        (self.key(), self.value())
    }
}

pub fn join_key(head: &str, tail: &str) -> String {
    format!("{head}{KEY_DELIM}{tail}")
}

pub fn join_fields<I, S>(fields: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    join_with(fields, FIELD_DELIM)
}

pub fn join_items<I, S>(items: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    join_with(items, SUB_DELIM)
}

pub fn split_fields(value: &str) -> Vec<&str> {
    value.split(FIELD_DELIM).collect()
}

/// Items of one field; an empty field has no items.
pub fn split_items(field: &str) -> Vec<&str> {
    if field.is_empty() {
        Vec::new()
    } else {
        field.split(SUB_DELIM).collect()
    }
}

fn join_with<I, S>(parts: I, delim: &str) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut out = String::new();
    for (i, part) in parts.into_iter().enumerate() {
        if i > 0 {
            out.push_str(delim);
        }
        out.push_str(part.as_ref());
    }
    out
}

fn split_key(key: &str) -> Result<(&str, &str), DecodeError> {
    key.rsplit_once(KEY_DELIM)
        .filter(|(head, tail)| !head.is_empty() && !tail.is_empty())
        .ok_or_else(|| DecodeError::Key(key.to_string()))
}

fn expect_fields(value: &str, expected: usize) -> Result<Vec<&str>, DecodeError> {
    let fields = split_fields(value);
    if fields.len() != expected {
        return Err(DecodeError::FieldCount {
            expected,
            found: fields.len(),
        });
    }
    Ok(fields)
}

fn decode_pos(text: &str) -> Result<Pos, DecodeError> {
    single_char(text)
        .filter(|c| *c != 's')
        .and_then(Pos::from_char)
        .ok_or_else(|| DecodeError::field("pos", text))
}

fn decode_offset(text: &str) -> Result<u32, DecodeError> {
    if text.len() != 8 {
        return Err(DecodeError::field("offset", text));
    }
    text.parse().map_err(|_| DecodeError::field("offset", text))
}

fn single_char(text: &str) -> Option<char> {
    let mut chars = text.chars();
    let c = chars.next()?;
    chars.next().is_none().then_some(c)
}

fn encode_pointer(ptr: &PointerEntry) -> String {
    format!(
        "{} {:08}{KEY_DELIM}{} {:02x}{:02x}",
        ptr.symbol,
        ptr.target_offset,
        ptr.target_type.to_char(),
        ptr.source,
        ptr.target
    )
}

fn decode_pointer(item: &str) -> Result<PointerEntry, DecodeError> {
    let bad = || DecodeError::field("pointer", item);
    let mut parts = item.split(' ');
    let (Some(symbol), Some(target), Some(st), None) =
        (parts.next(), parts.next(), parts.next(), parts.next())
    else {
        return Err(bad());
    };
    let (offset, ty) = target.split_once(KEY_DELIM).ok_or_else(bad)?;
    let target_type = single_char(ty)
        .and_then(SynsetType::from_char)
        .ok_or_else(bad)?;
    let (source, target) = split_source_target(st).ok_or_else(bad)?;
    Ok(PointerEntry {
        symbol: symbol.to_string(),
        target_offset: decode_offset(offset)?,
        target_type,
        source,
        target,
    })
}

fn encode_frame(frame: &FrameEntry) -> String {
    format!("{:02} {:02x}", frame.frame, frame.word)
}

fn decode_frame(item: &str) -> Result<FrameEntry, DecodeError> {
    let bad = || DecodeError::field("frame", item);
    let (frame, word) = item.split_once(' ').ok_or_else(bad)?;
    Ok(FrameEntry {
        frame: frame.parse().map_err(|_| bad())?,
        word: u8::from_str_radix(word, 16).map_err(|_| bad())?,
    })
}

fn decode_word(item: &str) -> Result<WordSense, DecodeError> {
    let bad = || DecodeError::field("word", item);
    let (word, sense) = item.rsplit_once(KEY_DELIM).ok_or_else(bad)?;
    if word.is_empty() {
        return Err(bad());
    }
    Ok(WordSense {
        word: word.to_string(),
        sense: sense.parse().map_err(|_| bad())?,
    })
}

impl KvRecord for IndexRecord {
    fn key(&self) -> String {
        join_key(&self.lemma, &self.pos.to_char().to_string())
    }

    fn value(&self) -> String {
        let offsets = join_items(self.offsets.iter().map(|off| format!("{off:08}")));
        join_fields([self.polysemy.to_string(), offsets])
    }

    fn decode(key: &str, value: &str) -> Result<Self, DecodeError> {
        let (lemma, pos) = split_key(key)?;
        let fields = expect_fields(value, 2)?;
        let polysemy = fields[0]
            .parse()
            .map_err(|_| DecodeError::field("polysemy", fields[0]))?;
        let offsets = split_items(fields[1])
            .into_iter()
            .map(decode_offset)
            .collect::<Result<_, _>>()?;
        Ok(IndexRecord {
            lemma: lemma.to_string(),
            pos: decode_pos(pos)?,
            polysemy,
            offsets,
        })
    }
}

impl KvRecord for SynsetRecord {
    fn key(&self) -> String {
        join_key(
            &format!("{:08}", self.offset),
            &self.pos.to_char().to_string(),
        )
    }

    fn value(&self) -> String {
        join_fields([
            format!("{:02}", self.lex_filenum),
            join_items(
                self.words
                    .iter()
                    .map(|w| format!("{}{KEY_DELIM}{}", w.word, w.sense)),
            ),
            join_items(self.pointers.iter().map(encode_pointer)),
            join_items(self.frames.iter().map(encode_frame)),
            self.gloss.clone().unwrap_or_default(),
        ])
    }

    fn decode(key: &str, value: &str) -> Result<Self, DecodeError> {
        let (offset, pos) = split_key(key)?;
        let fields = expect_fields(value, 5)?;
        let lex_filenum = fields[0]
            .parse()
            .map_err(|_| DecodeError::field("lex_filenum", fields[0]))?;
        let words = split_items(fields[1])
            .into_iter()
            .map(decode_word)
            .collect::<Result<_, _>>()?;
        let pointers = split_items(fields[2])
            .into_iter()
            .map(decode_pointer)
            .collect::<Result<_, _>>()?;
        let frames = split_items(fields[3])
            .into_iter()
            .map(decode_frame)
            .collect::<Result<_, _>>()?;
        let gloss = (!fields[4].is_empty()).then(|| fields[4].to_string());
        Ok(SynsetRecord {
            offset: decode_offset(offset)?,
            pos: decode_pos(pos)?,
            lex_filenum,
            words,
            pointers,
            frames,
            gloss,
        })
    }
}

impl KvRecord for MorphRecord {
    fn key(&self) -> String {
        join_key(&self.form, &self.pos.to_char().to_string())
    }

    fn value(&self) -> String {
        self.lemma.clone()
    }

    fn decode(key: &str, value: &str) -> Result<Self, DecodeError> {
        let (form, pos) = split_key(key)?;
        if value.is_empty() {
            return Err(DecodeError::field("lemma", value));
        }
        Ok(MorphRecord {
            form: form.to_string(),
            pos: decode_pos(pos)?,
            lemma: value.to_string(),
        })
    }
}
