#![allow(dead_code)]

use csv_tagmap::{BoxError, CsvCodec, CsvRecord};

#[derive(Debug, Default, Clone, PartialEq)]
pub struct MarshallerStruct {
    pub foo: String,
    pub bar: i32,
}

impl CsvCodec for MarshallerStruct {
    fn encode_text(&self) -> Result<String, BoxError> {
        Ok(format!("{} {}", self.foo, self.bar))
    }

    fn decode_text(&mut self, text: &str) -> Result<(), BoxError> {
        let (foo, bar) = text
            .split_once(' ')
            .ok_or_else(|| format!("expected '<foo> <bar>', got '{}'", text))?;
        self.foo = foo.to_string();
        self.bar = bar.parse()?;
        Ok(())
    }

    fn is_empty_value(&self) -> bool {
        self.foo.is_empty() && self.bar == 0
    }
}

#[derive(Debug, Default, Clone, PartialEq, CsvRecord)]
pub struct Sample {
    #[csv("foo")]
    pub foo: String,
    #[csv("BAR")]
    pub bar: i32,
    #[csv("Baz")]
    pub baz: String,
    #[csv("Quux")]
    pub frop: f64,
    #[csv("Blah")]
    pub blah: Option<i32>,
    #[csv("SPtr")]
    pub sptr: Option<String>,
    #[csv("Marshaller", codec)]
    pub marshaller: MarshallerStruct,
    #[csv("Omit,omitempty")]
    pub omit: Option<String>,
}

#[derive(Debug, Default, Clone, PartialEq, CsvRecord)]
pub struct EmbedSample {
    #[csv("first")]
    pub qux: String,
    #[csv(flatten)]
    pub sample: Sample,
    #[csv("-")]
    pub ignore: String,
    #[csv("garply")]
    pub grault: f64,
    #[csv("last")]
    pub quux: String,
}

#[derive(Debug, Default, Clone, PartialEq, CsvRecord)]
pub struct SkipFieldSample {
    #[csv(flatten)]
    pub embed: EmbedSample,
    #[csv("-")]
    pub more_ignore: String,
    #[csv("abc")]
    pub corge: String,
}

#[derive(Debug, Default, Clone, PartialEq, CsvRecord)]
pub struct Simple {
    #[csv("foo")]
    pub foo: String,
    #[csv("BAR")]
    pub bar: i32,
    #[csv("Baz")]
    pub baz: String,
}

#[derive(Debug, Default, Clone, PartialEq, CsvRecord)]
pub struct MultiTagSample {
    #[csv("Baz,foo")]
    pub foo: String,
    #[csv("BAR")]
    pub bar: i32,
}

#[derive(Debug, Default, Clone, PartialEq, CsvRecord)]
pub struct TagSeparatorSample {
    #[csv("Baz|foo")]
    pub foo: String,
    #[csv("BAR")]
    pub bar: i32,
}

pub fn rows(text: &str) -> Vec<Vec<String>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .from_reader(text.as_bytes());
    reader
        .records()
        .map(|record| record.unwrap().iter().map(String::from).collect())
        .collect()
}

pub fn assert_line(expected: &[&str], actual: &[String]) {
    assert_eq!(
        expected.len(),
        actual.len(),
        "line length mismatch between expected: {:?} and actual: {:?}",
        expected,
        actual
    );
    for (i, (e, a)) in expected.iter().zip(actual).enumerate() {
        assert_eq!(e, a, "mismatch on field {} at line {:?}", i, expected);
    }
}
