//! Header row resolution against a type descriptor

use log::warn;

use crate::descriptor::TypeDescriptor;
use crate::error::{CsvMapError, Result};

const BOM: char = '\u{feff}';

/// Column index -> field correspondence for one decode call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderCorrespondence {
    /// Field index bound to each input column, `None` when no alias matched
    columns: Vec<Option<usize>>,
    /// Declared fields none of whose aliases appeared in the header
    unmatched: Vec<usize>,
}

/// Match every header cell against the descriptor's aliases
///
/// Matching is case-sensitive and the first field declaring the alias wins.
/// Headers matching nothing are ignored.
///
/// # Arguments
/// - `headers` - The header row
/// - `descriptor` - Descriptor of the target record type
///
/// # Returns
/// The correspondence and the declared fields left unmatched
pub fn resolve(headers: &[String], descriptor: &TypeDescriptor) -> HeaderCorrespondence {
    let mut matched = vec![false; descriptor.len()];
    let columns: Vec<Option<usize>> = headers
        .iter()
        .enumerate()
        .map(|(i, header)| {
            let header = if i == 0 {
                header.trim_start_matches(BOM)
            } else {
                header.as_str()
            };
            let field = descriptor.lookup(header);
            if let Some(field) = field {
                matched[field] = true;
            }
            field
        })
        .collect();

    let unmatched = matched
        .iter()
        .enumerate()
        .filter(|(_, matched)| !**matched)
        .map(|(i, _)| i)
        .collect();

    HeaderCorrespondence { columns, unmatched }
}

impl HeaderCorrespondence {
    /// Field bound to an input column
    pub fn field_for(&self, column: usize) -> Option<usize> {
        self.columns.get(column).copied().flatten()
    }

    /// Number of header columns
    pub fn width(&self) -> usize {
        self.columns.len()
    }

    /// Indices of declared fields that no header matched
    pub fn unmatched(&self) -> &[usize] {
        &self.unmatched
    }

    /// Apply the unmatched-tag policy
    ///
    /// # Errors
    /// - `CsvMapError::UnmatchedTag` if `strict` is set and some declared field matched no header
    ///
    /// In non-strict mode the missing tags are logged and decoding goes on,
    /// the fields keep their default values.
    pub fn enforce(&self, descriptor: &TypeDescriptor, strict: bool) -> Result<()> {
        if self.unmatched.is_empty() {
            return Ok(());
        }

        let tags: Vec<String> = self
            .unmatched
            .iter()
            .filter_map(|&i| descriptor.field(i))
            .map(|field| field.canonical().to_string())
            .collect();

        if strict {
            return Err(CsvMapError::UnmatchedTag { tags });
        }

        warn!(
            "Not all declared csv tags of {} matched the input header, missing: {}",
            descriptor.type_name(),
            tags.join(", ")
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::{FieldDecl, Kind};

    fn headers(names: &[&str]) -> Vec<String> {
        names.iter().map(|name| name.to_string()).collect()
    }

    fn three_fields() -> TypeDescriptor {
        let schema = vec![
            FieldDecl::value("foo", 0, "foo", Kind::String),
            FieldDecl::value("bar", 1, "bar", Kind::String),
            FieldDecl::value("baz", 2, "baz", Kind::String),
        ];
        TypeDescriptor::build("Three", schema, ",").unwrap()
    }

    #[test]
    fn test_alias_first_match() {
        let schema = vec![
            FieldDecl::value("foo", 0, "foo", Kind::String),
            FieldDecl::value("baz", 1, "Baz,foo2", Kind::String),
        ];
        let descriptor = TypeDescriptor::build("Aliased", schema, ",").unwrap();

        let resolved = resolve(&headers(&["foo", "Baz"]), &descriptor);
        assert_eq!(resolved.field_for(0), Some(0));
        assert_eq!(resolved.field_for(1), Some(1));
        assert!(resolved.unmatched().is_empty());

        let resolved = resolve(&headers(&["FOO", "foo2"]), &descriptor);
        assert_eq!(resolved.field_for(0), None);
        assert_eq!(resolved.field_for(1), Some(1));
        assert_eq!(resolved.unmatched(), &[0]);
    }

    #[test]
    fn test_unmatched_declared_fields() {
        let descriptor = three_fields();

        let resolved = resolve(&headers(&["hi", "mom", "bacon"]), &descriptor);
        assert_eq!(resolved.unmatched(), &[0, 1, 2]);
        match resolved.enforce(&descriptor, true) {
            Err(CsvMapError::UnmatchedTag { tags }) => assert_eq!(tags, vec!["foo", "bar", "baz"]),
            other => panic!("unexpected result: {:?}", other),
        }
        assert!(resolved.enforce(&descriptor, false).is_ok());

        let resolved = resolve(&headers(&["foo", "bar", "baz"]), &descriptor);
        assert!(resolved.enforce(&descriptor, true).is_ok());

        let resolved = resolve(
            &headers(&["foo", "bar", "baz", "qux", "quux", "corge", "grault"]),
            &descriptor,
        );
        assert!(resolved.enforce(&descriptor, true).is_ok());
        assert_eq!(resolved.field_for(5), None);

        let resolved = resolve(&headers(&["foo", "qux", "quux", "corgi"]), &descriptor);
        assert!(resolved.enforce(&descriptor, true).is_err());
    }

    #[test]
    fn test_leading_bom_is_ignored() {
        let descriptor = three_fields();
        let resolved = resolve(&headers(&["\u{feff}foo", "bar", "baz"]), &descriptor);
        assert_eq!(resolved.field_for(0), Some(0));
        assert!(resolved.unmatched().is_empty());
    }
}
