//! Convert WordNet lexicographer files into delimited key/value records.
//!
//! Three line grammars are supported: `index.*` lines become
//! [`IndexRecord`]s, `data.*` lines become [`SynsetRecord`]s and `*.exc`
//! lines become [`MorphRecord`]s. Each record has a canonical text form
//! (see [`encode`]) that is handed to a caller-provided [`RecordSink`].
//!
//! Converting a synset needs the sense number of each of its words, which is
//! only known from the position of the synset on the word's index line. The
//! [`SenseIndex`] collects those numbers while index files are read, so a run
//! always converts every `index.*` file before any `data.*` file.
//!
//! Parse failures are per line: the line is logged, counted and dropped, and
//! conversion continues until an optional error limit is reached.
//!
//! # Example
//! ```no_run
//! use wordnet_convert::{ConvertOptions, MemorySink, convert_dir};
//!
//! # fn main() -> anyhow::Result<()> {
//! let mut sink = MemorySink::new();
//! let summary = convert_dir("/path/to/wordnet/dict", &mut sink, ConvertOptions::default())?;
//! println!("{} records, {} bad lines", summary.total_records(), summary.total_errors());
//! println!("{:?}", sink.get("index.verb", "run%v"));
//! # Ok(()) }
//! ```
//!
//! Single lines can be converted without touching the filesystem:
//!
//! ```rust
//! use wordnet_convert::{KvRecord, SenseIndex, parse_index_line, parse_synset_line};
//! use wordnet_types::Pos;
//!
//! let mut senses = SenseIndex::new();
//! let index = parse_index_line("run v 2 0 2 1 00101742 00201234", 1, Pos::Verb, &mut senses).unwrap();
//! assert_eq!(index.key(), "run%v");
//!
//! let synset = parse_synset_line(
//!     "00101742 38 v 01 run 0 000 00 | to move fast",
//!     1,
//!     Pos::Verb,
//!     &senses,
//! )
//! .unwrap();
//! assert_eq!(synset.value(), "38||run%0||||||to move fast");
//! ```
//!
//! For a runnable demo, see `cargo run -p wordnet-convert --example convert -- <dict>`.

pub mod convert;
pub mod encode;
pub mod error;
pub mod index_line;
pub mod morph;
pub mod scanner;
pub mod sense_index;
pub mod sink;
pub mod synset_line;

pub use convert::{
    ConvertOptions, ConvertSummary, Converter, ErrorLimitExceeded, FileKind, FileStats, LoadMode,
    SourceFile, convert_dir,
};
pub use encode::{FIELD_DELIM, KEY_DELIM, KvRecord, SUB_DELIM};
pub use error::{DecodeError, ParseError, ParseErrorKind};
pub use index_line::parse_index_line;
pub use morph::parse_morph_line;
pub use scanner::Scanner;
pub use sense_index::SenseIndex;
pub use sink::{MemorySink, RecordSink};
pub use synset_line::parse_synset_line;
pub use wordnet_types::{IndexRecord, MorphRecord, SynsetRecord};
