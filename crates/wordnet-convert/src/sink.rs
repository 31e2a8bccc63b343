use std::collections::BTreeMap;

use anyhow::{Result, bail};

/// Destination for converted (key, value) pairs, grouped per source file.
///
/// The converter calls `begin_file`, any number of `put`s, then `end_file`
/// for every dictionary file it reads. Implementations decide what a file
/// maps to (a database, a table, a transaction).
pub trait RecordSink {
    fn begin_file(&mut self, name: &str) -> Result<()>;
    fn put(&mut self, key: &str, value: &str) -> Result<()>;
    fn end_file(&mut self, name: &str) -> Result<()>;
}

/// Keeps every file's records in ordered in-memory maps.
#[derive(Debug, Default)]
pub struct MemorySink {
    files: BTreeMap<String, BTreeMap<String, String>>,
    current: Option<String>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, file: &str, key: &str) -> Option<&str> {
        self.files.get(file)?.get(key).map(String::as_str)
    }

    pub fn file(&self, name: &str) -> Option<&BTreeMap<String, String>> {
        self.files.get(name)
    }

    /// Names of every file that was opened, in sorted order.
    pub fn file_names(&self) -> impl Iterator<Item = &str> {
        self.files.keys().map(String::as_str)
    }

    /// Total records across all files.
    pub fn len(&self) -> usize {
        self.files.values().map(BTreeMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl RecordSink for MemorySink {
    fn begin_file(&mut self, name: &str) -> Result<()> {
        if let Some(open) = &self.current {
            bail!("cannot begin {name} while {open} is still open");
        }
        self.files.entry(name.to_string()).or_default();
        self.current = Some(name.to_string());
        Ok(())
    }

    fn put(&mut self, key: &str, value: &str) -> Result<()> {
        let Some(name) = &self.current else {
            bail!("put {key:?} outside of a file");
        };
        self.files
            .entry(name.clone())
            .or_default()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn end_file(&mut self, name: &str) -> Result<()> {
        match self.current.take() {
            Some(open) if open == name => Ok(()),
            Some(open) => bail!("end of {name} while {open} is open"),
            None => bail!("end of {name} without a matching begin"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn groups_records_per_file() {
        let mut sink = MemorySink::new();
        sink.begin_file("noun.exc").unwrap();
        sink.put("geese%n", "goose").unwrap();
        sink.end_file("noun.exc").unwrap();
        sink.begin_file("verb.exc").unwrap();
        sink.put("ran%v", "run").unwrap();
        sink.end_file("verb.exc").unwrap();

        assert_eq!(sink.get("noun.exc", "geese%n"), Some("goose"));
        assert_eq!(sink.get("noun.exc", "ran%v"), None);
        assert_eq!(sink.len(), 2);
        assert_eq!(sink.file_names().collect::<Vec<_>>(), ["noun.exc", "verb.exc"]);
    }

    #[test]
    fn rejects_unbalanced_calls() {
        let mut sink = MemorySink::new();
        assert!(sink.put("a%n", "b").is_err());
        assert!(sink.end_file("x").is_err());
        sink.begin_file("x").unwrap();
        assert!(sink.begin_file("y").is_err());
    }
}
