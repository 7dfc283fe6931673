//! Encoding records into CSV rows

use std::any::type_name;
use std::sync::Arc;

use log::{debug, trace};

use crate::coerce::{Cell, CellError};
use crate::config::Config;
use crate::descriptor::{descriptor_for, FieldDescriptor, TypeDescriptor};
use crate::error::{CsvMapError, Result};
use crate::record::CsvRecord;
use crate::rows::RowSink;

fn mappable_descriptor<R: CsvRecord>(config: &Config) -> Result<Arc<TypeDescriptor>> {
    let descriptor = descriptor_for::<R>(config)?;
    if descriptor.is_empty() {
        return Err(CsvMapError::NoTags {
            type_name: type_name::<R>(),
        });
    }
    Ok(descriptor)
}

fn encode_cell<R: CsvRecord>(record: &R, field: &FieldDescriptor) -> Result<Cell> {
    record.encode_field(field.path()).map_err(|err| match err {
        CellError::Codec(source) => CsvMapError::Marshal {
            field: field.name().to_string(),
            message: source.to_string(),
            source,
        },
        err @ CellError::Parse { .. } => CsvMapError::Marshal {
            field: field.name().to_string(),
            message: err.to_string(),
            source: err.to_string().into(),
        },
        CellError::InvalidPath(path) => CsvMapError::InvalidAccessPath {
            field: field.name().to_string(),
            path,
        },
    })
}

fn encode_record<R: CsvRecord>(record: &R, descriptor: &TypeDescriptor) -> Result<Vec<Cell>> {
    descriptor
        .fields()
        .iter()
        .map(|field| encode_cell(record, field))
        .collect()
}

/// Columns to blank out for a whole collection
///
/// A column is omitted only when its field is `omitempty` and every record holds
/// an empty value there. An empty collection omits nothing.
pub fn omitted_columns(descriptor: &TypeDescriptor, rows: &[Vec<Cell>]) -> Vec<bool> {
    descriptor
        .fields()
        .iter()
        .enumerate()
        .map(|(column, field)| {
            field.omit_empty() && !rows.is_empty() && rows.iter().all(|row| row[column].empty)
        })
        .collect()
}

/// Encode a collection of records
///
/// Every cell is encoded before anything is written, so a codec failure leaves
/// the sink untouched.
///
/// # Arguments
/// - `records` - The records to encode, written in order
/// - `sink` - Where rows are written. It is flushed at the end
/// - `config` - Encoding options
/// - `omit_headers` - Skip the header row
pub fn encode<R: CsvRecord, W: RowSink>(
    records: &[R],
    sink: &mut W,
    config: &Config,
    omit_headers: bool,
) -> Result<()> {
    let descriptor = mappable_descriptor::<R>(config)?;

    let rows = records
        .iter()
        .map(|record| encode_record(record, &descriptor))
        .collect::<Result<Vec<_>>>()?;
    let omitted = omitted_columns(&descriptor, &rows);
    trace!("Encoded {} row(s), omitted columns: {:?}", rows.len(), omitted);

    if !omit_headers {
        let headers: Vec<String> = descriptor
            .fields()
            .iter()
            .zip(&omitted)
            .map(|(field, &omit)| if omit { String::new() } else { field.canonical().to_string() })
            .collect();
        sink.write_row(&headers)?;
    }

    for row in rows {
        let texts: Vec<String> = row
            .into_iter()
            .zip(&omitted)
            .map(|(cell, &omit)| if omit { String::new() } else { cell.text })
            .collect();
        sink.write_row(&texts)?;
    }

    sink.flush()?;
    debug!("Encoded {} {} record(s)", records.len(), descriptor.type_name());
    Ok(())
}

/// Encode records as they arrive from a sequence
///
/// The header comes from the record type and is written as soon as the first
/// record is received. `omitempty` fields are blanked per cell since there is
/// no way to look ahead. Any iterator works, including a channel receiver fed
/// by another thread: the stream ends when the sender is dropped.
///
/// # Errors
/// - `CsvMapError::EmptyStream` if the sequence yields nothing
pub fn encode_stream<R, I, W>(records: I, sink: &mut W, config: &Config) -> Result<()>
where
    R: CsvRecord,
    I: IntoIterator<Item = R>,
    W: RowSink,
{
    let mut records = records.into_iter();
    let first = records.next().ok_or(CsvMapError::EmptyStream)?;

    let descriptor = mappable_descriptor::<R>(config)?;
    sink.write_row(&descriptor.headers())?;

    let mut count = 0usize;
    for record in std::iter::once(first).chain(records) {
        let texts: Vec<String> = descriptor
            .fields()
            .iter()
            .map(|field| encode_cell(&record, field).map(|cell| cell.render(field.omit_empty())))
            .collect::<Result<_>>()?;
        sink.write_row(&texts)?;
        count += 1;
    }

    sink.flush()?;
    debug!("Streamed {} {} record(s)", count, descriptor.type_name());
    Ok(())
}
