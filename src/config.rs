/// Options for decoding and encoding, built once and passed by reference
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Fail a decode when a declared tag matches no header. Default is `true`
    pub strict_headers: bool,
    /// Separator between aliases and modifiers inside a tag. Default is `,`
    pub tag_separator: String,
    /// Column delimiter used by the convenience readers and writers. Default is `,`
    pub delimiter: u8,
    /// Text encoding used by the convenience readers and writers
    pub encoding: Encoding,
}

/// Text encoding options
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Encoding {
    /// UTF-8 encoding
    Utf8,
    /// Shift-JIS encoding
    ShiftJis,
    /// Windows-1252 encoding, as produced by many spreadsheet exports
    Windows1252,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            strict_headers: true,
            tag_separator: ",".to_string(),
            delimiter: b',',
            encoding: Encoding::Utf8,
        }
    }
}

impl Config {
    /// Options that tolerate declared tags missing from the header
    pub fn lenient() -> Self {
        Self {
            strict_headers: false,
            ..Self::default()
        }
    }

    /// Set whether unmatched declared tags are fatal
    pub fn with_strict_headers(mut self, strict: bool) -> Self {
        self.strict_headers = strict;
        self
    }

    /// Set the separator used inside tags
    pub fn with_tag_separator(mut self, separator: impl Into<String>) -> Self {
        self.tag_separator = separator.into();
        self
    }

    /// Set the column delimiter
    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// Set the text encoding
    pub fn with_encoding(mut self, encoding: Encoding) -> Self {
        self.encoding = encoding;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert!(config.strict_headers);
        assert_eq!(config.tag_separator, ",");
        assert_eq!(config.delimiter, b',');
        assert_eq!(config.encoding, Encoding::Utf8);

        let lenient = Config::lenient().with_delimiter(b';').with_tag_separator("|");
        assert!(!lenient.strict_headers);
        assert_eq!(lenient.delimiter, b';');
        assert_eq!(lenient.tag_separator, "|");
    }
}
