use crate::coerce::{Cell, CellError};
use crate::field::FieldDecl;

/// A struct whose fields map to CSV columns
///
/// Usually implemented with `#[derive(CsvRecord)]`, which registers every
/// tagged field and routes access paths back to them. A path holds one
/// declaration offset per nesting level: `[2]` is the third field of the
/// struct, `[1, 0]` is the first field of the record embedded as the second
/// field.
pub trait CsvRecord: Default + 'static {
    /// Registration table of the record's fields, in declaration order
    fn schema() -> Vec<FieldDecl>;

    /// Decode `text` into the field at `path`
    fn decode_field(&mut self, path: &[usize], text: &str) -> Result<(), CellError>;

    /// Encode the field at `path`
    fn encode_field(&self, path: &[usize]) -> Result<Cell, CellError>;
}
