//! Row-level seams to the CSV tokenizer and writer

use std::io;

use crate::error::{CsvMapError, Result};

/// Supplies every row of a CSV input, header row first
pub trait RowSource {
    /// Read all rows at once
    fn read_all_rows(&mut self) -> Result<Vec<Vec<String>>>;
}

/// Receives rendered CSV rows
pub trait RowSink {
    /// Write one row
    fn write_row(&mut self, row: &[String]) -> Result<()>;

    /// Flush buffered rows, reporting any error the writer held back
    fn flush(&mut self) -> Result<()>;
}

impl<R: io::Read> RowSource for csv::Reader<R> {
    fn read_all_rows(&mut self) -> Result<Vec<Vec<String>>> {
        let mut rows = Vec::new();

        // A reader built with `has_headers(true)` keeps the header row apart.
        // Its header record is empty when the input had no row at all
        if self.has_headers() {
            let headers = self.headers()?;
            if !headers.is_empty() {
                rows.push(headers.iter().map(String::from).collect());
            }
        }

        for record in self.records() {
            rows.push(record?.iter().map(String::from).collect());
        }
        Ok(rows)
    }
}

impl RowSource for Vec<Vec<String>> {
    fn read_all_rows(&mut self) -> Result<Vec<Vec<String>>> {
        Ok(std::mem::take(self))
    }
}

impl<W: io::Write> RowSink for csv::Writer<W> {
    fn write_row(&mut self, row: &[String]) -> Result<()> {
        self.write_record(row).map_err(CsvMapError::RowWriter)
    }

    fn flush(&mut self) -> Result<()> {
        csv::Writer::flush(self).map_err(|err| CsvMapError::RowWriter(err.into()))
    }
}

impl RowSink for Vec<Vec<String>> {
    fn write_row(&mut self, row: &[String]) -> Result<()> {
        self.push(row.to_vec());
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reader_includes_header_row() {
        let data = "a,b\n1,2\n3,4\n";

        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .from_reader(data.as_bytes());
        let rows = reader.read_all_rows().unwrap();
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0], vec!["a", "b"]);

        let mut reader = csv::Reader::from_reader(data.as_bytes());
        let rows = reader.read_all_rows().unwrap();
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0], vec!["a", "b"]);
        assert_eq!(rows[2], vec!["3", "4"]);
    }

    #[test]
    fn test_empty_reader_has_no_rows() {
        let mut reader = csv::Reader::from_reader("".as_bytes());
        assert!(reader.read_all_rows().unwrap().is_empty());

        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .from_reader("".as_bytes());
        assert!(reader.read_all_rows().unwrap().is_empty());
    }

    #[test]
    fn test_writer_sink() {
        let mut writer = csv::Writer::from_writer(vec![]);
        writer.write_row(&["x".to_string(), "y,z".to_string()]).unwrap();
        RowSink::flush(&mut writer).unwrap();

        let data = String::from_utf8(writer.into_inner().unwrap()).unwrap();
        assert_eq!(data, "x,\"y,z\"\n");
    }
}
