//! Decoding CSV rows into records

use std::any::type_name;

use log::{debug, trace};

use crate::coerce::CellError;
use crate::config::Config;
use crate::descriptor::{descriptor_for, TypeDescriptor};
use crate::error::{CsvMapError, Result};
use crate::header::{resolve, HeaderCorrespondence};
use crate::record::CsvRecord;
use crate::rows::RowSource;

/// Rows read and resolved, ready to fill a destination
struct Prepared {
    descriptor: std::sync::Arc<TypeDescriptor>,
    correspondence: HeaderCorrespondence,
    body: Vec<Vec<String>>,
}

fn prepare<R: CsvRecord, S: RowSource>(source: &mut S, config: &Config) -> Result<Prepared> {
    let mut rows = source.read_all_rows()?;
    if rows.is_empty() {
        return Err(CsvMapError::EmptyInput);
    }
    let body = rows.split_off(1);
    let headers = rows.swap_remove(0);
    trace!("Read header and {} data row(s)", body.len());

    let descriptor = descriptor_for::<R>(config)?;
    if descriptor.is_empty() {
        return Err(CsvMapError::NoTags {
            type_name: type_name::<R>(),
        });
    }

    let correspondence = resolve(&headers, &descriptor);
    correspondence.enforce(&descriptor, config.strict_headers)?;
    trace!(
        "Resolved {} header column(s) against {}",
        correspondence.width(),
        descriptor.type_name()
    );

    Ok(Prepared {
        descriptor,
        correspondence,
        body,
    })
}

impl Prepared {
    /// Build the record of data row `index`
    fn record<R: CsvRecord>(&self, index: usize) -> Result<R> {
        let mut record = R::default();
        // Header is line 1
        let line = index + 2;

        for (column, text) in self.body[index].iter().enumerate() {
            let Some(field_index) = self.correspondence.field_for(column) else {
                continue;
            };
            let Some(field) = self.descriptor.field(field_index) else {
                continue;
            };

            record
                .decode_field(field.path(), text)
                .map_err(|err| match err {
                    CellError::Parse { text, kind } => CsvMapError::Coercion {
                        line,
                        column,
                        field: field.name().to_string(),
                        text,
                        kind: kind.name(),
                    },
                    CellError::Codec(source) => CsvMapError::Unmarshal {
                        line,
                        field: field.name().to_string(),
                        source,
                    },
                    CellError::InvalidPath(path) => CsvMapError::InvalidAccessPath {
                        field: field.name().to_string(),
                        path,
                    },
                })?;
        }
        Ok(record)
    }
}

/// Decode every data row into a new vector
///
/// # Arguments
/// - `source` - The rows to decode, header row first
/// - `config` - Decoding options
///
/// # Returns
/// One record per data row, in input order
pub fn decode<R: CsvRecord, S: RowSource>(source: &mut S, config: &Config) -> Result<Vec<R>> {
    let mut out = Vec::new();
    decode_into_vec(source, &mut out, config)?;
    Ok(out)
}

/// Decode into a growable destination
///
/// The destination is resized to exactly the number of data rows. On error its
/// contents are unspecified.
pub fn decode_into_vec<R: CsvRecord, S: RowSource>(
    source: &mut S,
    out: &mut Vec<R>,
    config: &Config,
) -> Result<()> {
    let prepared = prepare::<R, S>(source, config)?;
    let count = prepared.body.len();

    out.clear();
    out.reserve(count);
    for index in 0..count {
        out.push(prepared.record(index)?);
    }

    debug!("Decoded {} {} record(s)", count, prepared.descriptor.type_name());
    Ok(())
}

/// Decode into a fixed-size destination
///
/// # Errors
/// - `CsvMapError::Capacity` if `out` is shorter than the number of data rows
///
/// # Returns
/// The number of slots filled, starting at index 0. Slots past that are left untouched
pub fn decode_into_slice<R: CsvRecord, S: RowSource>(
    source: &mut S,
    out: &mut [R],
    config: &Config,
) -> Result<usize> {
    let prepared = prepare::<R, S>(source, config)?;
    let count = prepared.body.len();

    if out.len() < count {
        return Err(CsvMapError::Capacity {
            needed: count,
            capacity: out.len(),
            type_name: type_name::<R>(),
        });
    }

    for (index, slot) in out.iter_mut().take(count).enumerate() {
        *slot = prepared.record(index)?;
    }

    debug!("Decoded {} {} record(s)", count, prepared.descriptor.type_name());
    Ok(count)
}
