//! Conversion between CSV cell text and typed field values

use std::fmt;

use chrono::{DateTime, NaiveDateTime, SecondsFormat, Utc};

use crate::field::Kind;

/// Boxed error returned by custom codecs
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Textual layout used for [`NaiveDateTime`] cells
pub const NAIVE_DATETIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.f";

/// Failure of a single cell conversion, before row and column are known
#[derive(Debug)]
pub enum CellError {
    /// Text is not a valid value of the target kind
    Parse { text: String, kind: Kind },
    /// A custom codec reported an error
    Codec(BoxError),
    /// The record has no field at this access path
    InvalidPath(Vec<usize>),
}

impl fmt::Display for CellError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellError::Parse { text, kind } => write!(f, "cannot parse '{}' as {}", text, kind),
            CellError::Codec(err) => write!(f, "{}", err),
            CellError::InvalidPath(path) => write!(f, "invalid access path {:?}", path),
        }
    }
}

/// An encoded cell together with the emptiness of the value it came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cell {
    /// Rendered text
    pub text: String,
    /// Whether the value was its kind's zero or absent value
    pub empty: bool,
}

impl Cell {
    /// Text to write, blanked when `omit_if_empty` is set and the value was empty
    pub fn render(self, omit_if_empty: bool) -> String {
        if omit_if_empty && self.empty {
            String::new()
        } else {
            self.text
        }
    }
}

/// A value type with a built-in CSV coercion rule
///
/// Implemented for text, integers, floats, booleans, timestamps and one level of
/// `Option` around any of those.
pub trait CsvField: Sized {
    /// Coercion kind of this type
    fn kind() -> Kind;

    /// Parse a cell. Empty text maps to the zero value (or `None`)
    fn decode_cell(text: &str) -> Result<Self, CellError>;

    /// Render the value as cell text
    fn encode_cell(&self) -> String;

    /// Whether the value equals its kind's zero value
    fn is_empty_value(&self) -> bool;
}

/// User supplied text codec, taking precedence over primitive coercion
///
/// Fields opt in with `#[csv("name", codec)]`. `is_empty_value` decides
/// whether an `omitempty` column blanks the value, so it has no default.
pub trait CsvCodec {
    /// Render the value as cell text
    fn encode_text(&self) -> Result<String, BoxError>;

    /// Parse cell text into `self`
    fn decode_text(&mut self, text: &str) -> Result<(), BoxError>;

    /// Whether the value is its zero value, for `omitempty`
    fn is_empty_value(&self) -> bool;

    /// Coercion kind recorded in the type descriptor
    fn codec_kind() -> Kind
    where
        Self: Sized,
    {
        Kind::Custom
    }
}

impl CsvField for String {
    fn kind() -> Kind {
        Kind::String
    }

    fn decode_cell(text: &str) -> Result<Self, CellError> {
        Ok(text.to_string())
    }

    fn encode_cell(&self) -> String {
        self.clone()
    }

    fn is_empty_value(&self) -> bool {
        self.is_empty()
    }
}

macro_rules! impl_csv_number {
    ($kind:expr => $($ty:ty),*) => {
        $(
            impl CsvField for $ty {
                fn kind() -> Kind {
                    $kind
                }

                fn decode_cell(text: &str) -> Result<Self, CellError> {
                    if text.is_empty() {
                        return Ok(<$ty>::default());
                    }
                    text.parse::<$ty>().map_err(|_| CellError::Parse {
                        text: text.to_string(),
                        kind: Self::kind(),
                    })
                }

                // `Display` already gives the shortest text that parses back
                // to the same value, floats included
                fn encode_cell(&self) -> String {
                    self.to_string()
                }

                fn is_empty_value(&self) -> bool {
                    *self == <$ty>::default()
                }
            }
        )*
    };
}

impl_csv_number!(Kind::Integer => i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize);
impl_csv_number!(Kind::Float => f32, f64);

impl CsvField for bool {
    fn kind() -> Kind {
        Kind::Boolean
    }

    fn decode_cell(text: &str) -> Result<Self, CellError> {
        match text {
            "" => Ok(false),
            "1" | "t" | "T" | "TRUE" | "true" | "True" => Ok(true),
            "0" | "f" | "F" | "FALSE" | "false" | "False" => Ok(false),
            _ => Err(CellError::Parse {
                text: text.to_string(),
                kind: Kind::Boolean,
            }),
        }
    }

    fn encode_cell(&self) -> String {
        self.to_string()
    }

    fn is_empty_value(&self) -> bool {
        !*self
    }
}

impl CsvField for DateTime<Utc> {
    fn kind() -> Kind {
        Kind::DateTime
    }

    fn decode_cell(text: &str) -> Result<Self, CellError> {
        if text.is_empty() {
            return Ok(DateTime::<Utc>::default());
        }
        DateTime::parse_from_rfc3339(text)
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(|_| CellError::Parse {
                text: text.to_string(),
                kind: Kind::DateTime,
            })
    }

    fn encode_cell(&self) -> String {
        self.to_rfc3339_opts(SecondsFormat::AutoSi, true)
    }

    fn is_empty_value(&self) -> bool {
        *self == DateTime::<Utc>::default()
    }
}

impl CsvField for NaiveDateTime {
    fn kind() -> Kind {
        Kind::DateTime
    }

    fn decode_cell(text: &str) -> Result<Self, CellError> {
        if text.is_empty() {
            return Ok(NaiveDateTime::default());
        }
        NaiveDateTime::parse_from_str(text, NAIVE_DATETIME_FORMAT).map_err(|_| CellError::Parse {
            text: text.to_string(),
            kind: Kind::DateTime,
        })
    }

    fn encode_cell(&self) -> String {
        self.format(NAIVE_DATETIME_FORMAT).to_string()
    }

    fn is_empty_value(&self) -> bool {
        *self == NaiveDateTime::default()
    }
}

impl<T: CsvField> CsvField for Option<T> {
    fn kind() -> Kind {
        Kind::optional(T::kind())
    }

    fn decode_cell(text: &str) -> Result<Self, CellError> {
        if text.is_empty() {
            return Ok(None);
        }
        T::decode_cell(text).map(Some)
    }

    fn encode_cell(&self) -> String {
        match self {
            Some(value) => value.encode_cell(),
            None => String::new(),
        }
    }

    fn is_empty_value(&self) -> bool {
        self.is_none()
    }
}

impl<T: CsvCodec + Default> CsvCodec for Option<T> {
    fn encode_text(&self) -> Result<String, BoxError> {
        match self {
            Some(value) => value.encode_text(),
            None => Ok(String::new()),
        }
    }

    fn decode_text(&mut self, text: &str) -> Result<(), BoxError> {
        if text.is_empty() {
            *self = None;
            return Ok(());
        }
        let mut value = T::default();
        value.decode_text(text)?;
        *self = Some(value);
        Ok(())
    }

    fn is_empty_value(&self) -> bool {
        self.is_none()
    }

    fn codec_kind() -> Kind {
        Kind::optional(Kind::Custom)
    }
}

/// Decode `text` into a built-in field. Called by derived records
pub fn decode_value<T: CsvField>(slot: &mut T, text: &str) -> Result<(), CellError> {
    *slot = T::decode_cell(text)?;
    Ok(())
}

/// Encode a built-in field. Called by derived records
pub fn encode_value<T: CsvField>(value: &T) -> Result<Cell, CellError> {
    Ok(Cell {
        text: value.encode_cell(),
        empty: value.is_empty_value(),
    })
}

/// Decode `text` through a custom codec. Called by derived records
pub fn decode_custom<T: CsvCodec>(slot: &mut T, text: &str) -> Result<(), CellError> {
    slot.decode_text(text).map_err(CellError::Codec)
}

/// Encode through a custom codec. Called by derived records
pub fn encode_custom<T: CsvCodec>(value: &T) -> Result<Cell, CellError> {
    let text = value.encode_text().map_err(CellError::Codec)?;
    Ok(Cell {
        text,
        empty: value.is_empty_value(),
    })
}
