//! # csv-tagmap
//!
//! A Rust library for mapping CSV rows to and from tagged Rust structs
//! Each field declares, once, the header name(s) it corresponds to
//!
//! ## Quick Start
//!
//! ```rust
//! use csv_tagmap::{from_str, to_string, Config, CsvRecord};
//!
//! #[derive(Debug, Default, PartialEq, CsvRecord)]
//! struct Scenario {
//!     #[csv("ScenarioNo")]
//!     number: i32,
//!     #[csv("ZoneName,Zone")]
//!     zone: String,
//!     #[csv("Comment,omitempty")]
//!     comment: Option<String>,
//! }
//!
//! let config = Config::default();
//! let scenarios: Vec<Scenario> = from_str("ScenarioNo,Zone,Comment\n1,Garden,\n", &config).unwrap();
//! assert_eq!(scenarios[0].zone, "Garden");
//!
//! // First alias is the header, empty omitempty columns are blanked
//! let text = to_string(&scenarios, &config).unwrap();
//! assert_eq!(text, "ScenarioNo,ZoneName,\n1,Garden,\n");
//! ```
//!
//! ## Features
//!
//! - Multiple aliases per column, first one written on encode
//! - Flattened composition with `#[csv(flatten)]`
//! - Optional fields, timestamps and custom text codecs
//! - Strict or lenient header matching
//! - Bulk and streaming encoders
//! - UTF-8, Shift-JIS and Windows-1252 input/output

// Lets the derive macro's `::csv_tagmap` paths resolve inside this crate too
extern crate self as csv_tagmap;

pub mod coerce;
pub mod config;
pub mod csv;
pub mod decode;
pub mod descriptor;
pub mod encode;
pub mod error;
pub mod field;
pub mod header;
pub mod record;
pub mod rows;

pub use crate::coerce::{BoxError, Cell, CellError, CsvCodec, CsvField};
pub use crate::config::{Config, Encoding};
pub use crate::csv::{
    from_path, from_reader, from_str, stream_to_writer, to_path, to_string,
    to_string_without_headers, to_writer,
};
pub use crate::decode::{decode, decode_into_slice, decode_into_vec};
pub use crate::descriptor::{descriptor_for, FieldDescriptor, TypeDescriptor};
pub use crate::encode::{encode, encode_stream};
pub use crate::error::{CsvMapError, Result};
pub use crate::field::{FieldDecl, FieldShape, Kind};
pub use crate::header::{resolve, HeaderCorrespondence};
pub use crate::record::CsvRecord;
pub use crate::rows::{RowSink, RowSource};

pub use csv_tagmap_derive::CsvRecord;
