use std::fs::File;
use std::io::{BufWriter, Read, Write};
use std::path::Path;

use crate::config::{Config, Encoding};
use crate::decode::decode;
use crate::encode::{encode, encode_stream};
use crate::error::{CsvMapError, Result};
use crate::record::CsvRecord;

/// Read records from CSV text
///
/// # Arguments
/// - `text` - CSV content, header row first. Rows may be shorter or longer than the header
/// - `config` - Options. `delimiter` applies, `encoding` does not since the text is already decoded
///
/// # Returns
/// One record per data row
pub fn from_str<R: CsvRecord>(text: &str, config: &Config) -> Result<Vec<R>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .delimiter(config.delimiter)
        .from_reader(text.as_bytes());
    decode(&mut reader, config)
}

/// Read records from any byte reader, transcoding with `config.encoding`
pub fn from_reader<R: CsvRecord, Rd: Read>(mut reader: Rd, config: &Config) -> Result<Vec<R>> {
    let mut data = Vec::new();
    reader.read_to_end(&mut data)?;
    let text = decode_string(&data, config.encoding)?;
    from_str(&text, config)
}

/// Read records from a CSV file
pub fn from_path<R: CsvRecord, P: AsRef<Path>>(path: P, config: &Config) -> Result<Vec<R>> {
    let file = File::open(path)?;
    from_reader(file, config)
}

/// Render records as CSV text with a header row
pub fn to_string<R: CsvRecord>(records: &[R], config: &Config) -> Result<String> {
    render(records, config, false)
}

/// Render records as CSV text without the header row
pub fn to_string_without_headers<R: CsvRecord>(records: &[R], config: &Config) -> Result<String> {
    render(records, config, true)
}

/// Write records to any byte writer, transcoding with `config.encoding`
pub fn to_writer<R: CsvRecord, W: Write>(records: &[R], mut writer: W, config: &Config) -> Result<()> {
    let text = to_string(records, config)?;
    writer.write_all(&encode_string(&text, config.encoding)?)?;
    writer.flush()?;
    Ok(())
}

/// Write records to a CSV file, creating or truncating it
pub fn to_path<R: CsvRecord, P: AsRef<Path>>(records: &[R], path: P, config: &Config) -> Result<()> {
    let file = File::create(path)?;
    to_writer(records, BufWriter::new(file), config)
}

/// Write records to a byte writer as they arrive
///
/// Only UTF-8 output is streamed; any other encoding is rejected since rows
/// are handed to the writer as soon as they are rendered.
pub fn stream_to_writer<R, I, W>(records: I, writer: W, config: &Config) -> Result<()>
where
    R: CsvRecord,
    I: IntoIterator<Item = R>,
    W: Write,
{
    if config.encoding != Encoding::Utf8 {
        return Err(CsvMapError::EncodingError(format!(
            "streaming only supports UTF-8, got {:?}",
            config.encoding
        )));
    }
    let mut csv_writer = csv::WriterBuilder::new()
        .delimiter(config.delimiter)
        .from_writer(writer);
    encode_stream(records, &mut csv_writer, config)
}

fn render<R: CsvRecord>(records: &[R], config: &Config, omit_headers: bool) -> Result<String> {
    let mut csv_writer = csv::WriterBuilder::new()
        .delimiter(config.delimiter)
        .from_writer(Vec::new());
    encode(records, &mut csv_writer, config, omit_headers)?;

    let data = csv_writer
        .into_inner()
        .map_err(|err| CsvMapError::IoError(err.into_error()))?;
    String::from_utf8(data).map_err(|e| CsvMapError::EncodingError(e.to_string()))
}

/// Decode a byte slice into a string using the specified encoding
///
/// # Errors
/// - `CsvMapError::EncodingError` if the bytes are not valid in that encoding
fn decode_string(bytes: &[u8], encoding: Encoding) -> Result<String> {
    let (decoded, had_errors) = match encoding {
        Encoding::Utf8 => {
            let text = std::str::from_utf8(bytes)
                .map_err(|e| CsvMapError::EncodingError(e.to_string()))?;
            return Ok(text.trim_start_matches('\u{feff}').to_string());
        }
        Encoding::ShiftJis => {
            let (decoded, _, had_errors) = encoding_rs::SHIFT_JIS.decode(bytes);
            (decoded, had_errors)
        }
        Encoding::Windows1252 => {
            let (decoded, _, had_errors) = encoding_rs::WINDOWS_1252.decode(bytes);
            (decoded, had_errors)
        }
    };
    if had_errors {
        return Err(CsvMapError::EncodingError(format!(
            "input is not valid {:?}",
            encoding
        )));
    }
    Ok(decoded.into_owned())
}

/// Encode a string into bytes using the specified encoding
///
/// # Errors
/// - `CsvMapError::EncodingError` if a character has no mapping in that encoding
fn encode_string(s: &str, encoding: Encoding) -> Result<Vec<u8>> {
    let (encoded, had_errors) = match encoding {
        Encoding::Utf8 => return Ok(s.as_bytes().to_vec()),
        Encoding::ShiftJis => {
            let (encoded, _, had_errors) = encoding_rs::SHIFT_JIS.encode(s);
            (encoded, had_errors)
        }
        Encoding::Windows1252 => {
            let (encoded, _, had_errors) = encoding_rs::WINDOWS_1252.encode(s);
            (encoded, had_errors)
        }
    };
    if had_errors {
        return Err(CsvMapError::EncodingError(format!(
            "output has characters not representable in {:?}",
            encoding
        )));
    }
    Ok(encoded.into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transcoding() {
        let bytes = encode_string("café;Zürich", Encoding::Windows1252).unwrap();
        assert_eq!(bytes.len(), 11);
        assert_eq!(decode_string(&bytes, Encoding::Windows1252).unwrap(), "café;Zürich");

        let bytes = encode_string("東京", Encoding::ShiftJis).unwrap();
        assert_eq!(decode_string(&bytes, Encoding::ShiftJis).unwrap(), "東京");

        assert!(encode_string("東京", Encoding::Windows1252).is_err());
        assert!(decode_string(&[0xff, 0xfe], Encoding::Utf8).is_err());
        assert_eq!(decode_string("\u{feff}a,b".as_bytes(), Encoding::Utf8).unwrap(), "a,b");
    }
}
