//! Type descriptors: the flattened, ordered set of mappable fields of a record type

use std::any::{type_name, TypeId};
use std::collections::HashMap;
use std::sync::{Arc, OnceLock};

use indexmap::IndexMap;
use log::{debug, warn};
use parking_lot::RwLock;

use crate::config::Config;
use crate::error::{CsvMapError, Result};
use crate::field::{FieldDecl, FieldShape, Kind};
use crate::record::CsvRecord;

/// Alias marking a field as not mapped
pub const SKIP_ALIAS: &str = "-";

/// Modifier asking the encoder to blank zero values
pub const OMIT_EMPTY: &str = "omitempty";

/// One mappable field of a record type
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDescriptor {
    name: String,
    aliases: Vec<String>,
    path: Vec<usize>,
    kind: Kind,
    omit_empty: bool,
}

impl FieldDescriptor {
    /// Qualified field name, e.g. `Outer.inner.value`
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Header names accepted when decoding, in declared order
    pub fn aliases(&self) -> &[String] {
        &self.aliases
    }

    /// Header name written when encoding
    pub fn canonical(&self) -> &str {
        &self.aliases[0]
    }

    /// Declaration offsets leading from the record to the field
    pub fn path(&self) -> &[usize] {
        &self.path
    }

    /// Coercion kind of the field
    pub fn kind(&self) -> &Kind {
        &self.kind
    }

    /// Whether the field carries the `omitempty` modifier
    pub fn omit_empty(&self) -> bool {
        self.omit_empty
    }
}

/// The ordered field descriptors of one record type
#[derive(Debug, Clone)]
pub struct TypeDescriptor {
    type_name: &'static str,
    fields: Vec<FieldDescriptor>,
    /// Alias -> index into `fields`
    index: IndexMap<String, usize>,
}

/// A parsed field tag
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Tag {
    /// Alias names, first one is canonical
    pub aliases: Vec<String>,
    /// `omitempty` was present
    pub omit_empty: bool,
    /// The field is excluded with `-`
    pub skip: bool,
}

/// Parse a tag of the form `alias1,alias2;modifier`
///
/// Modifiers may also appear in the alias list (`"name,omitempty"`). Tokens
/// are trimmed and empty ones ignored.
pub fn parse_tag(raw: &str, separator: &str) -> Tag {
    let separator = if separator.is_empty() { "," } else { separator };
    let (names, modifiers) = match raw.split_once(';') {
        Some((names, modifiers)) if separator != ";" => (names, modifiers),
        _ => (raw, ""),
    };

    let mut tag = Tag::default();
    for token in split_tokens(names, separator) {
        if token == OMIT_EMPTY {
            tag.omit_empty = true;
        } else {
            tag.aliases.push(token.to_string());
        }
    }
    for token in split_tokens(modifiers, separator) {
        if token == OMIT_EMPTY {
            tag.omit_empty = true;
        } else {
            debug!("Ignoring unknown tag modifier '{}' in '{}'", token, raw);
        }
    }
    tag.skip = tag.aliases.first().is_some_and(|alias| alias == SKIP_ALIAS);
    tag
}

fn split_tokens<'a>(text: &'a str, separator: &'a str) -> impl Iterator<Item = &'a str> {
    text.split(separator).map(str::trim).filter(|token| !token.is_empty())
}

struct Candidate {
    field: FieldDescriptor,
    depth: usize,
}

impl TypeDescriptor {
    /// Build the descriptor of a record from its registration table
    ///
    /// # Arguments
    /// - `type_name` - Name of the record type, for diagnostics
    /// - `schema` - The record's field declarations
    /// - `separator` - Separator used inside tags
    ///
    /// # Errors
    /// - `CsvMapError::UnsupportedFieldKind` if a tagged field has a kind with no coercion rule
    ///
    /// # Returns
    /// The descriptor, possibly with zero fields. Callers decide whether that is fatal
    pub fn build(type_name: &'static str, schema: Vec<FieldDecl>, separator: &str) -> Result<Self> {
        let mut candidates = Vec::new();
        collect(schema, &[], short_name(type_name), 0, separator, &mut candidates)?;

        let fields = resolve_collisions(candidates);
        let mut index = IndexMap::with_capacity(fields.len());
        for (i, field) in fields.iter().enumerate() {
            for alias in &field.aliases {
                index.entry(alias.clone()).or_insert(i);
            }
        }

        Ok(Self {
            type_name,
            fields,
            index,
        })
    }

    /// Name of the described type
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// Field descriptors in mapping order
    pub fn fields(&self) -> &[FieldDescriptor] {
        &self.fields
    }

    /// Get a field descriptor by position
    pub fn field(&self, index: usize) -> Option<&FieldDescriptor> {
        self.fields.get(index)
    }

    /// Number of mappable fields
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Whether the type has no mappable field
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Position of the field declaring `alias`, compared case-sensitively
    pub fn lookup(&self, alias: &str) -> Option<usize> {
        self.index.get(alias).copied()
    }

    /// Canonical header row
    pub fn headers(&self) -> Vec<String> {
        self.fields.iter().map(|f| f.canonical().to_string()).collect()
    }
}

fn short_name(type_name: &str) -> &str {
    let base = type_name.split('<').next().unwrap_or(type_name);
    base.rsplit("::").next().unwrap_or(base)
}

fn collect(
    schema: Vec<FieldDecl>,
    prefix: &[usize],
    owner: &str,
    depth: usize,
    separator: &str,
    out: &mut Vec<Candidate>,
) -> Result<()> {
    for decl in schema {
        let mut path = prefix.to_vec();
        path.push(decl.offset);
        let name = format!("{}.{}", owner, decl.ident);

        match decl.shape {
            FieldShape::Embedded { schema, .. } => {
                collect(schema(), &path, &name, depth + 1, separator, out)?;
            }
            FieldShape::Value(kind) => {
                let Some(raw) = decl.tag else {
                    continue;
                };
                let tag = parse_tag(raw, separator);
                if tag.skip {
                    continue;
                }
                if !kind.is_supported() {
                    return Err(CsvMapError::UnsupportedFieldKind {
                        field: name,
                        kind: kind.name(),
                    });
                }
                let aliases = if tag.aliases.is_empty() {
                    vec![decl.ident.to_string()]
                } else {
                    tag.aliases
                };
                out.push(Candidate {
                    field: FieldDescriptor {
                        name,
                        aliases,
                        path,
                        kind,
                        omit_empty: tag.omit_empty,
                    },
                    depth,
                });
            }
        }
    }
    Ok(())
}

/// Give every alias to a single field: the shallowest one, then the earliest.
/// Fields left without any alias are dropped.
fn resolve_collisions(candidates: Vec<Candidate>) -> Vec<FieldDescriptor> {
    let mut owners: IndexMap<&str, usize> = IndexMap::new();
    for (i, candidate) in candidates.iter().enumerate() {
        for alias in &candidate.field.aliases {
            match owners.get(alias.as_str()) {
                Some(&owner) if candidates[owner].depth <= candidate.depth => {}
                _ => {
                    owners.insert(alias.as_str(), i);
                }
            }
        }
    }

    let mut kept: Vec<Vec<String>> = Vec::with_capacity(candidates.len());
    for (i, candidate) in candidates.iter().enumerate() {
        let mut aliases: Vec<String> = Vec::with_capacity(candidate.field.aliases.len());
        for alias in &candidate.field.aliases {
            if owners.get(alias.as_str()) == Some(&i) && !aliases.contains(alias) {
                aliases.push(alias.clone());
            } else if owners.get(alias.as_str()) != Some(&i) {
                warn!(
                    "Alias '{}' of {} is shadowed by another field",
                    alias, candidate.field.name
                );
            }
        }
        kept.push(aliases);
    }

    candidates
        .into_iter()
        .zip(kept)
        .filter_map(|(candidate, aliases)| {
            if aliases.is_empty() {
                warn!("Field {} has no alias left and is not mapped", candidate.field.name);
                return None;
            }
            Some(FieldDescriptor {
                aliases,
                ..candidate.field
            })
        })
        .collect()
}

type CacheKey = (TypeId, String);

fn cache() -> &'static RwLock<HashMap<CacheKey, Arc<TypeDescriptor>>> {
    static CACHE: OnceLock<RwLock<HashMap<CacheKey, Arc<TypeDescriptor>>>> = OnceLock::new();
    CACHE.get_or_init(|| RwLock::new(HashMap::new()))
}

/// Get the descriptor of `R`, building it on first use
///
/// Descriptors are cached for the life of the process, per record type and tag
/// separator. Concurrent first uses build the descriptor exactly once.
pub fn descriptor_for<R: CsvRecord>(config: &Config) -> Result<Arc<TypeDescriptor>> {
    let key = (TypeId::of::<R>(), config.tag_separator.clone());

    if let Some(descriptor) = cache().read().get(&key) {
        return Ok(Arc::clone(descriptor));
    }

    let mut guard = cache().write();
    if let Some(descriptor) = guard.get(&key) {
        return Ok(Arc::clone(descriptor));
    }

    let descriptor = Arc::new(TypeDescriptor::build(
        type_name::<R>(),
        R::schema(),
        &config.tag_separator,
    )?);
    debug!(
        "Built descriptor for {} with {} field(s): {:?}",
        descriptor.type_name(),
        descriptor.len(),
        descriptor.headers()
    );
    guard.insert(key, Arc::clone(&descriptor));
    Ok(descriptor)
}
