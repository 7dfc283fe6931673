mod common;

use std::sync::Arc;
use std::thread;

use common::{Sample, Simple};
use csv_tagmap::{
    Config, CsvMapError, Encoding, descriptor_for, from_path, from_reader, stream_to_writer,
    to_path, to_writer,
};
use tempfile::tempdir;

fn simples() -> Vec<Simple> {
    vec![
        Simple { foo: "café".to_string(), bar: 1, baz: "Zürich".to_string() },
        Simple { foo: "naïve".to_string(), bar: -2, baz: "".to_string() },
    ]
}

#[test]
fn test_path_round_trip_windows_1252() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("simple.csv");
    let config = Config::default().with_encoding(Encoding::Windows1252);

    to_path(&simples(), &path, &config).unwrap();
    let bytes = std::fs::read(&path).unwrap();
    assert!(std::str::from_utf8(&bytes).is_err(), "output should be single byte encoded");

    let records: Vec<Simple> = from_path(&path, &config).unwrap();
    assert_eq!(records, simples());
}

#[test]
fn test_writer_round_trip_shift_jis() {
    let records = vec![Simple { foo: "東京".to_string(), bar: 3, baz: "大阪".to_string() }];
    let config = Config::default().with_encoding(Encoding::ShiftJis);

    let mut buffer = Vec::new();
    to_writer(&records, &mut buffer, &config).unwrap();
    let decoded: Vec<Simple> = from_reader(buffer.as_slice(), &config).unwrap();
    assert_eq!(decoded, records);
}

#[test]
fn test_utf8_bom_is_ignored() {
    let data = "\u{feff}foo,BAR,Baz\nx,1,y\n".as_bytes();
    let records: Vec<Simple> = from_reader(data, &Config::default()).unwrap();
    assert_eq!(records[0].foo, "x");
}

#[test]
fn test_stream_to_writer_requires_utf8() {
    let mut buffer = Vec::new();
    stream_to_writer(simples(), &mut buffer, &Config::default()).unwrap();
    assert_eq!(
        String::from_utf8(buffer).unwrap(),
        "foo,BAR,Baz\ncafé,1,Zürich\nnaïve,-2,\n"
    );

    let config = Config::default().with_encoding(Encoding::ShiftJis);
    let err = stream_to_writer(simples(), Vec::new(), &config).unwrap_err();
    assert!(matches!(err, CsvMapError::EncodingError(_)));
}

#[test]
fn test_descriptor_is_built_once_across_threads() {
    let handles: Vec<_> = (0..8)
        .map(|_| thread::spawn(|| descriptor_for::<Sample>(&Config::default()).unwrap()))
        .collect();
    let descriptors: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();

    for descriptor in &descriptors[1..] {
        assert!(Arc::ptr_eq(&descriptors[0], descriptor));
    }
    assert_eq!(descriptors[0].len(), 8);

    let other = descriptor_for::<Sample>(&Config::default().with_tag_separator("|")).unwrap();
    assert!(!Arc::ptr_eq(&descriptors[0], &other));
}
