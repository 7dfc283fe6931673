use std::fmt;

/// Coercion kinds a record field can declare
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Kind {
    /// Text, copied verbatim
    String,
    /// Whole number of any width
    Integer,
    /// Floating point
    Float,
    /// Boolean
    Boolean,
    /// Timestamp
    DateTime,
    /// One level of `Option` around another kind
    Optional(Box<Kind>),
    /// Value goes through a user supplied [`CsvCodec`](crate::coerce::CsvCodec)
    Custom,
}

impl Kind {
    /// Wrap a kind as optional
    pub fn optional(inner: Kind) -> Self {
        Kind::Optional(Box::new(inner))
    }

    /// Whether a missing value is representable (`None`)
    pub fn is_optional(&self) -> bool {
        matches!(self, Kind::Optional(_))
    }

    /// The kind with one level of optional unwrapped
    pub fn base(&self) -> &Kind {
        match self {
            Kind::Optional(inner) => inner,
            other => other,
        }
    }

    /// Whether the crate knows how to coerce this kind
    ///
    /// Only one level of optional wrapping is supported.
    pub fn is_supported(&self) -> bool {
        !matches!(self, Kind::Optional(inner) if inner.is_optional())
    }

    /// Get the name of this kind for error messages
    pub fn name(&self) -> String {
        match self {
            Kind::String => "string".to_string(),
            Kind::Integer => "integer".to_string(),
            Kind::Float => "float".to_string(),
            Kind::Boolean => "boolean".to_string(),
            Kind::DateTime => "datetime".to_string(),
            Kind::Optional(inner) => format!("optional {}", inner.name()),
            Kind::Custom => "custom codec".to_string(),
        }
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// How a registered field takes part in the mapping
#[derive(Debug, Clone)]
pub enum FieldShape {
    /// A single column coerced with the given kind
    Value(Kind),
    /// A composed record whose own fields are spliced in place
    Embedded {
        /// Type name of the composed record, for diagnostics
        type_name: &'static str,
        /// Registration table of the composed record
        schema: fn() -> Vec<FieldDecl>,
    },
}

/// Registration entry for one struct field, as emitted by `#[derive(CsvRecord)]`
///
/// The position of a declaration inside [`CsvRecord::schema`](crate::CsvRecord::schema)
/// does not matter for access: `offset` is what the record uses to route
/// decode/encode calls back to the field.
#[derive(Debug, Clone)]
pub struct FieldDecl {
    /// Rust name of the field
    pub ident: &'static str,
    /// Declaration index of the field in its struct
    pub offset: usize,
    /// Raw tag text, `None` when the field carries no tag
    pub tag: Option<&'static str>,
    /// Value or embedded record
    pub shape: FieldShape,
}

impl FieldDecl {
    /// Declare a tagged value field
    pub fn value(ident: &'static str, offset: usize, tag: &'static str, kind: Kind) -> Self {
        Self {
            ident,
            offset,
            tag: Some(tag),
            shape: FieldShape::Value(kind),
        }
    }

    /// Declare a field without tag, it is not mappable
    #[cfg(test)]
    pub(crate) fn untagged(ident: &'static str, offset: usize, kind: Kind) -> Self {
        Self {
            ident,
            offset,
            tag: None,
            shape: FieldShape::Value(kind),
        }
    }

    /// Declare a composed record whose fields are flattened into the owner
    pub fn embedded(
        ident: &'static str,
        offset: usize,
        type_name: &'static str,
        schema: fn() -> Vec<FieldDecl>,
    ) -> Self {
        Self {
            ident,
            offset,
            tag: None,
            shape: FieldShape::Embedded { type_name, schema },
        }
    }
}
