use std::env;
use std::path::PathBuf;

use wordnet_convert::{ConvertOptions, KvRecord, LoadMode, MemorySink, convert_dir};
use wordnet_types::IndexRecord;

fn dict_dir() -> Option<PathBuf> {
    env::var("WORDNET_DIR").ok().map(PathBuf::from)
}

#[test]
fn converts_open_english_wordnet() {
    let Some(dir) = dict_dir() else {
        eprintln!("skipping: WORDNET_DIR not set");
        return;
    };
    let mut sink = MemorySink::new();
    let options = ConvertOptions {
        load_mode: LoadMode::Mmap,
        parallel_data: true,
        ..ConvertOptions::default()
    };
    let summary = convert_dir(&dir, &mut sink, options).expect("convert open english wordnet");

    assert!(summary.senses > 10_000, "sense index too small");
    assert!(summary.total_records() > 10_000, "too few records");

    let dog = sink.get("index.noun", "dog%n").expect("dog indexed");
    let dog = IndexRecord::decode("dog%n", dog).expect("decode dog");
    assert!(!dog.offsets.is_empty());
    let first = format!("{:08}%n", dog.offsets[0]);
    let synset = sink.get("data.noun", &first).expect("first dog synset");
    assert!(synset.contains("dog%0"));
}
