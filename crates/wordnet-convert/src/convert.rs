use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::thread;
use std::time::Instant;

use anyhow::{Context, Result, anyhow, bail};
use memmap2::Mmap;
use thiserror::Error;
use tracing::{debug, info, warn};
use wordnet_types::{Pos, SynsetRecord};

use crate::encode::KvRecord;
use crate::error::ParseError;
use crate::index_line::parse_index_line;
use crate::morph::parse_morph_line;
use crate::sense_index::SenseIndex;
use crate::sink::RecordSink;
use crate::synset_line::parse_synset_line;

/// Strategy for loading dictionary files.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum LoadMode {
    /// Memory-map each WordNet file (fast, zero-copy).
    Mmap,
    /// Read each file into an owned buffer (portable fallback).
    Owned,
}

enum Buffer {
    Mmap(Mmap),
    Owned(Vec<u8>),
}

impl Buffer {
    fn as_slice(&self) -> &[u8] {
        match self {
            Buffer::Mmap(m) => m.as_ref(),
            Buffer::Owned(v) => v.as_slice(),
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum FileKind {
    Index,
    Data,
    Exceptions,
}

/// One per-POS dictionary file, e.g. `index.noun` or `verb.exc`.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct SourceFile {
    pub kind: FileKind,
    pub pos: Pos,
}

impl SourceFile {
    pub fn new(kind: FileKind, pos: Pos) -> Self {
        Self { kind, pos }
    }

    /// File name inside a WordNet `dict` directory.
    pub fn name(&self) -> String {
        let suffix = self.pos.file_suffix();
        match self.kind {
            FileKind::Index => format!("index.{suffix}"),
            FileKind::Data => format!("data.{suffix}"),
            FileKind::Exceptions => format!("{suffix}.exc"),
        }
    }
}

/// Knobs for a conversion run.
#[derive(Clone, Debug)]
pub struct ConvertOptions {
    /// Abort once this many lines have failed across the whole run.
    pub error_limit: Option<usize>,
    pub load_mode: LoadMode,
    /// Parse the `data.*` files on separate threads.
    pub parallel_data: bool,
}

impl Default for ConvertOptions {
    fn default() -> Self {
        Self {
            error_limit: None,
            load_mode: LoadMode::Mmap,
            parallel_data: false,
        }
    }
}

/// Line counts for one converted file.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct FileStats {
    pub name: String,
    pub lines: usize,
    pub records: usize,
    pub errors: usize,
}

impl FileStats {
    fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ..Self::default()
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct ConvertSummary {
    pub files: Vec<FileStats>,
    /// Entries in the sense index once every index file was read.
    pub senses: usize,
}

impl ConvertSummary {
    pub fn file(&self, name: &str) -> Option<&FileStats> {
        self.files.iter().find(|f| f.name == name)
    }

    pub fn total_records(&self) -> usize {
        self.files.iter().map(|f| f.records).sum()
    }

    pub fn total_errors(&self) -> usize {
        self.files.iter().map(|f| f.errors).sum()
    }
}

/// The run was aborted because too many lines failed to parse.
#[derive(Debug, Error)]
#[error("error limit of {limit} reached while converting {file}")]
pub struct ErrorLimitExceeded {
    pub limit: usize,
    pub file: String,
}

struct ErrorTally {
    limit: Option<usize>,
    count: usize,
}

impl ErrorTally {
    /// Hand a parsed record to the sink, or log and count the failure.
    fn absorb<R: KvRecord>(
        &mut self,
        file: &str,
        outcome: Result<R, ParseError>,
        sink: &mut dyn RecordSink,
        stats: &mut FileStats,
    ) -> Result<()> {
        stats.lines += 1;
        match outcome {
            Ok(record) => {
                let (key, value) = record.encode();
                sink.put(&key, &value)
                    .with_context(|| format!("store {key:?} from {file}"))?;
                stats.records += 1;
            }
            Err(err) => {
                warn!("{file}: skipping {err}");
                stats.errors += 1;
                self.count += 1;
                if let Some(limit) = self.limit
                    && self.count >= limit
                {
                    return Err(ErrorLimitExceeded {
                        limit,
                        file: file.to_string(),
                    }
                    .into());
                }
            }
        }
        Ok(())
    }
}

/// One conversion run: owns the sense index and the cumulative error count.
///
/// Index files must be converted before data files so every synset word can
/// be resolved; [`Converter::run`] enforces that order for a whole directory.
/// A converter is meant for a single run, since converting the same index
/// file twice reports every line as a duplicate sense.
pub struct Converter {
    options: ConvertOptions,
    senses: SenseIndex,
    tally: ErrorTally,
}

impl Converter {
    pub fn new(options: ConvertOptions) -> Self {
        let tally = ErrorTally {
            limit: options.error_limit,
            count: 0,
        };
        Self {
            options,
            senses: SenseIndex::new(),
            tally,
        }
    }

    pub fn sense_index(&self) -> &SenseIndex {
        &self.senses
    }

    /// Lines that failed so far in this run.
    pub fn error_count(&self) -> usize {
        self.tally.count
    }

    /// Convert a WordNet `dict` directory: every `index.*`, then every
    /// `data.*`, then whichever `*.exc` files exist.
    pub fn run(
        &mut self,
        dict_dir: impl AsRef<Path>,
        sink: &mut dyn RecordSink,
    ) -> Result<ConvertSummary> {
        let dir = dict_dir.as_ref();
        for pos in Pos::ALL {
            for kind in [FileKind::Index, FileKind::Data] {
                let path = dir.join(SourceFile::new(kind, pos).name());
                if !path.exists() {
                    bail!("missing required WordNet file: {}", path.display());
                }
            }
        }

        let start = Instant::now();
        let mode = self.options.load_mode;
        let mut summary = ConvertSummary::default();

        for pos in Pos::ALL {
            let source = SourceFile::new(FileKind::Index, pos);
            let buffer = load_file(dir.join(source.name()), mode)?;
            let stats = self.convert_index(pos, as_text(&buffer, &source)?, sink)?;
            summary.files.push(stats);
        }
        info!("sense index holds {} entries", self.senses.len());

        let data = Pos::ALL
            .iter()
            .map(|pos| -> Result<(SourceFile, Buffer)> {
                let source = SourceFile::new(FileKind::Data, *pos);
                Ok((source, load_file(dir.join(source.name()), mode)?))
            })
            .collect::<Result<Vec<_>>>()?;
        if self.options.parallel_data {
            let stats = self.convert_data_parallel(&data, sink)?;
            summary.files.extend(stats);
        } else {
            for (source, buffer) in &data {
                let stats = self.convert_data(source.pos, as_text(buffer, source)?, sink)?;
                summary.files.push(stats);
            }
        }

        for pos in Pos::ALL {
            let source = SourceFile::new(FileKind::Exceptions, pos);
            let Some(buffer) = load_optional_file(dir.join(source.name()), mode)? else {
                debug!("no {} in {}, skipping", source.name(), dir.display());
                continue;
            };
            let stats = self.convert_exceptions(pos, as_text(&buffer, &source)?, sink)?;
            summary.files.push(stats);
        }

        summary.senses = self.senses.len();
        info!(
            "converted {} records ({} lines skipped) in {} ms",
            summary.total_records(),
            summary.total_errors(),
            start.elapsed().as_millis()
        );
        Ok(summary)
    }

    /// Convert the text of one `index.*` file, growing the sense index.
    pub fn convert_index(
        &mut self,
        pos: Pos,
        text: &str,
        sink: &mut dyn RecordSink,
    ) -> Result<FileStats> {
        let name = SourceFile::new(FileKind::Index, pos).name();
        sink.begin_file(&name)?;
        let mut stats = FileStats::new(&name);
        for (lineno, line) in source_lines(text) {
            let outcome = parse_index_line(line, lineno, pos, &mut self.senses);
            self.tally.absorb(&name, outcome, sink, &mut stats)?;
        }
        sink.end_file(&name)?;
        log_stats(&stats);
        Ok(stats)
    }

    /// Convert the text of one `data.*` file against the current sense index.
    pub fn convert_data(
        &mut self,
        pos: Pos,
        text: &str,
        sink: &mut dyn RecordSink,
    ) -> Result<FileStats> {
        let name = SourceFile::new(FileKind::Data, pos).name();
        sink.begin_file(&name)?;
        let mut stats = FileStats::new(&name);
        for (lineno, line) in source_lines(text) {
            let outcome = parse_synset_line(line, lineno, pos, &self.senses);
            self.tally.absorb(&name, outcome, sink, &mut stats)?;
        }
        sink.end_file(&name)?;
        log_stats(&stats);
        Ok(stats)
    }

    /// Convert the text of one `*.exc` file.
    pub fn convert_exceptions(
        &mut self,
        pos: Pos,
        text: &str,
        sink: &mut dyn RecordSink,
    ) -> Result<FileStats> {
        let name = SourceFile::new(FileKind::Exceptions, pos).name();
        sink.begin_file(&name)?;
        let mut stats = FileStats::new(&name);
        for (lineno, line) in source_lines(text) {
            let outcome = parse_morph_line(line, lineno, pos);
            self.tally.absorb(&name, outcome, sink, &mut stats)?;
        }
        sink.end_file(&name)?;
        log_stats(&stats);
        Ok(stats)
    }

    /// Parse all data files concurrently against the now read-only sense
    /// index, then feed the sink in file and line order.
    fn convert_data_parallel(
        &mut self,
        data: &[(SourceFile, Buffer)],
        sink: &mut dyn RecordSink,
    ) -> Result<Vec<FileStats>> {
        let texts = data
            .iter()
            .map(|(source, buffer)| as_text(buffer, source).map(|text| (*source, text)))
            .collect::<Result<Vec<_>>>()?;

        let senses = &self.senses;
        let parsed = thread::scope(|scope| {
            let handles: Vec<_> = texts
                .iter()
                .map(|(source, text)| scope.spawn(move || parse_data_text(text, source.pos, senses)))
                .collect();
            handles
                .into_iter()
                .map(|handle| {
                    handle
                        .join()
                        .map_err(|_| anyhow!("data parser thread panicked"))
                })
                .collect::<Result<Vec<_>>>()
        })?;

        let mut all_stats = Vec::with_capacity(parsed.len());
        for ((source, _), outcomes) in texts.iter().zip(parsed) {
            let name = source.name();
            sink.begin_file(&name)?;
            let mut stats = FileStats::new(&name);
            for outcome in outcomes {
                self.tally.absorb(&name, outcome, sink, &mut stats)?;
            }
            sink.end_file(&name)?;
            log_stats(&stats);
            all_stats.push(stats);
        }
        Ok(all_stats)
    }
}

/// Convert `dict_dir` into `sink` with a fresh [`Converter`].
pub fn convert_dir(
    dict_dir: impl AsRef<Path>,
    sink: &mut dyn RecordSink,
    options: ConvertOptions,
) -> Result<ConvertSummary> {
    Converter::new(options).run(dict_dir, sink)
}

fn parse_data_text(
    text: &str,
    pos: Pos,
    senses: &SenseIndex,
) -> Vec<Result<SynsetRecord, ParseError>> {
    source_lines(text)
        .map(|(lineno, line)| parse_synset_line(line, lineno, pos, senses))
        .collect()
}

/// Numbered record lines, skipping blanks and the indented license preamble.
fn source_lines(text: &str) -> impl Iterator<Item = (usize, &str)> {
    text.split('\n')
        .enumerate()
        .map(|(idx, raw)| (idx + 1, raw.strip_suffix('\r').unwrap_or(raw)))
        .filter(|(_, line)| !line.is_empty() && !line.starts_with([' ', '\t']))
}

fn log_stats(stats: &FileStats) {
    info!(
        "{}: {} records from {} lines ({} errors)",
        stats.name, stats.records, stats.lines, stats.errors
    );
}

fn as_text<'a>(buffer: &'a Buffer, source: &SourceFile) -> Result<&'a str> {
    std::str::from_utf8(buffer.as_slice())
        .with_context(|| format!("{} is not valid UTF-8", source.name()))
}

fn load_file(path: PathBuf, mode: LoadMode) -> Result<Buffer> {
    match mode {
        LoadMode::Mmap => {
            let file = File::open(&path).with_context(|| format!("open {}", path.display()))?;
            // Empty files cannot be mapped on every platform.
            if file.metadata().map(|m| m.len() == 0).unwrap_or(false) {
                return Ok(Buffer::Owned(Vec::new()));
            }
            unsafe { Mmap::map(&file) }
                .map(Buffer::Mmap)
                .with_context(|| format!("mmap {}", path.display()))
        }
        LoadMode::Owned => {
            let mut file = File::open(&path).with_context(|| format!("open {}", path.display()))?;
            let mut buf = Vec::new();
            file.read_to_end(&mut buf)
                .with_context(|| format!("read {}", path.display()))?;
            Ok(Buffer::Owned(buf))
        }
    }
}

fn load_optional_file(path: PathBuf, mode: LoadMode) -> Result<Option<Buffer>> {
    if !path.exists() {
        return Ok(None);
    }
    load_file(path, mode).map(Some)
}
