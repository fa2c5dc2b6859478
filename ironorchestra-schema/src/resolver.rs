//! Field type resolution.
//!
//! This module turns the field list of a parsed [`Repository`] into one
//! [`NormalizedFieldRecord`] per field, in document order. A declared type is
//! either a primitive found in the injected [`TypeMapping`] or the name of a
//! code set, whose own underlying type must in turn be a mapped primitive.
//!
//! Any reference that cannot be resolved aborts the whole resolution. Missing
//! documentation does not; it is reported as a [`ResolveWarning`].

use crate::error::ResolveError;
use crate::mapping::{SchemaType, TypeMapping};
use crate::types::{CodeSetDef, FieldDef, Repository};
use std::collections::{HashMap, HashSet};
use std::fmt;

/// Resolved, emitter-ready description of one field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedFieldRecord {
    /// Tag number.
    pub tag: u32,
    /// Field name, used as the property key.
    pub name: String,
    /// Normalized documentation; empty when the field has none.
    pub description: String,
    /// Schema descriptor of the primitive (or the code set's underlying primitive).
    pub schema_type: SchemaType,
    /// Permitted values, present only for code set typed fields.
    pub enum_values: Option<Vec<String>>,
}

impl NormalizedFieldRecord {
    /// Returns true if the field is an enumeration.
    #[must_use]
    pub fn is_enum(&self) -> bool {
        self.enum_values.is_some()
    }
}

/// What a declared type token refers to.
#[derive(Debug, Clone, Copy)]
pub enum TypeRef<'a> {
    /// Mapped primitive datatype.
    Primitive(&'a SchemaType),
    /// Code set defined in the repository.
    CodeSet(&'a CodeSetDef),
}

/// Non-fatal condition recorded during resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolveWarning {
    /// Field has no documentation text.
    MissingDescription {
        /// Field name.
        field: String,
        /// Field tag.
        tag: u32,
    },
    /// Datatype declared by the repository but absent from the mapping.
    UnmappedDatatype {
        /// Datatype name.
        name: String,
    },
}

impl fmt::Display for ResolveWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingDescription { field, tag } => {
                write!(f, "No description found for {} (tag {})", field, tag)
            }
            Self::UnmappedDatatype { name } => {
                write!(f, "datatype '{}' is declared but has no schema mapping", name)
            }
        }
    }
}

/// Output of a successful resolution.
#[derive(Debug, Clone, Default)]
pub struct Resolution {
    /// One record per input field, in input order.
    pub records: Vec<NormalizedFieldRecord>,
    /// Warnings in the order they were raised.
    pub warnings: Vec<ResolveWarning>,
}

/// Resolves field declarations against a type mapping.
#[derive(Debug, Clone, Copy)]
pub struct Resolver<'a> {
    mapping: &'a TypeMapping,
}

impl<'a> Resolver<'a> {
    /// Creates a resolver over the given mapping.
    #[must_use]
    pub fn new(mapping: &'a TypeMapping) -> Self {
        Self { mapping }
    }

    /// Classifies a declared type token.
    ///
    /// The mapping is consulted first; only tokens it does not know are
    /// looked up as code set names.
    #[must_use]
    pub fn classify<'r>(&'r self, repo: &'r Repository, type_name: &str) -> Option<TypeRef<'r>> {
        if let Some(schema_type) = self.mapping.get(type_name) {
            return Some(TypeRef::Primitive(schema_type));
        }
        repo.get_code_set(type_name).map(TypeRef::CodeSet)
    }

    /// Resolves every field of the repository.
    ///
    /// # Errors
    /// Returns the first `ResolveError` encountered; no records are returned
    /// in that case.
    pub fn resolve(&self, repo: &Repository) -> Result<Resolution, ResolveError> {
        tracing::info!(
            "expecting property definitions for {} fields",
            repo.fields.len()
        );

        let mut resolution = Resolution {
            records: Vec::with_capacity(repo.fields.len()),
            warnings: Vec::new(),
        };

        self.check_datatypes(repo, &mut resolution.warnings);

        let mut seen: HashMap<&str, u32> = HashMap::with_capacity(repo.fields.len());
        for field in &repo.fields {
            if let Some(&first_tag) = seen.get(field.name.as_str()) {
                return Err(ResolveError::DuplicateFieldName {
                    name: field.name.clone(),
                    first_tag,
                    tag: field.id,
                });
            }
            seen.insert(&field.name, field.id);

            let record = self.resolve_field(repo, field, &mut resolution.warnings)?;
            resolution.records.push(record);
        }

        tracing::info!(
            "resolved {} fields ({} enumerations, {} warnings)",
            resolution.records.len(),
            resolution.records.iter().filter(|r| r.is_enum()).count(),
            resolution.warnings.len()
        );

        Ok(resolution)
    }

    /// Resolves a single field.
    ///
    /// # Errors
    /// Returns `ResolveError` if the declared type cannot be resolved.
    pub fn resolve_field(
        &self,
        repo: &Repository,
        field: &FieldDef,
        warnings: &mut Vec<ResolveWarning>,
    ) -> Result<NormalizedFieldRecord, ResolveError> {
        let (schema_type, enum_values) = match self.classify(repo, &field.type_name) {
            Some(TypeRef::Primitive(schema_type)) => (schema_type.clone(), None),
            Some(TypeRef::CodeSet(code_set)) => {
                let values = enum_values(field, code_set)?;
                let schema_type = self.underlying_type(field, code_set)?;
                (schema_type.clone(), Some(values))
            }
            None => {
                return Err(ResolveError::UnknownType {
                    field: field.name.clone(),
                    tag: field.id,
                    type_name: field.type_name.clone(),
                });
            }
        };

        let description = match field
            .primary_documentation()
            .map(normalize_description)
            .filter(|d| !d.is_empty())
        {
            Some(description) => description,
            None => {
                let warning = ResolveWarning::MissingDescription {
                    field: field.name.clone(),
                    tag: field.id,
                };
                tracing::warn!("{}", warning);
                warnings.push(warning);
                String::new()
            }
        };

        tracing::debug!(
            tag = field.id,
            name = %field.name,
            declared = %field.type_name,
            primitive = %schema_type.primitive,
            "resolved field"
        );

        Ok(NormalizedFieldRecord {
            tag: field.id,
            name: field.name.clone(),
            description,
            schema_type,
            enum_values,
        })
    }

    /// Looks up the code set's underlying type in the mapping.
    fn underlying_type(
        &self,
        field: &FieldDef,
        code_set: &CodeSetDef,
    ) -> Result<&'a SchemaType, ResolveError> {
        self.mapping
            .get(&code_set.type_name)
            .ok_or_else(|| ResolveError::UnknownUnderlyingType {
                field: field.name.clone(),
                tag: field.id,
                underlying: code_set.type_name.clone(),
                code_set_dump: code_set.to_string(),
            })
    }

    /// Records a warning for each declared datatype the mapping lacks.
    fn check_datatypes(&self, repo: &Repository, warnings: &mut Vec<ResolveWarning>) {
        let mut reported = HashSet::new();
        for datatype in &repo.datatypes {
            if !self.mapping.contains(&datatype.name) && reported.insert(datatype.name.as_str()) {
                let warning = ResolveWarning::UnmappedDatatype {
                    name: datatype.name.clone(),
                };
                tracing::warn!("{}", warning);
                warnings.push(warning);
            }
        }
    }
}

/// Resolves every field of `repo` against `mapping`.
///
/// # Errors
/// Returns `ResolveError` on the first unresolvable field.
pub fn resolve_fields(
    repo: &Repository,
    mapping: &TypeMapping,
) -> Result<Resolution, ResolveError> {
    Resolver::new(mapping).resolve(repo)
}

/// Extracts the ordered code names of a code set.
fn enum_values(field: &FieldDef, code_set: &CodeSetDef) -> Result<Vec<String>, ResolveError> {
    if code_set.codes.is_empty() {
        return Err(ResolveError::EmptyCodeSet {
            field: field.name.clone(),
            tag: field.id,
            code_set: code_set.name.clone(),
        });
    }

    code_set
        .codes
        .iter()
        .enumerate()
        .map(|(position, code)| {
            if code.name.is_empty() {
                Err(ResolveError::MalformedCodeSet {
                    field: field.name.clone(),
                    tag: field.id,
                    code_set: code_set.name.clone(),
                    position,
                })
            } else {
                Ok(code.name.clone())
            }
        })
        .collect()
}

/// Normalizes documentation text for a double-quoted YAML scalar.
///
/// Trims surrounding whitespace, then escapes backslashes, double quotes and
/// line breaks (`\r\n`, `\n` and lone `\r` all become the two characters `\n`).
#[must_use]
pub fn normalize_description(text: &str) -> String {
    let trimmed = text.trim();
    let mut out = String::with_capacity(trimmed.len());
    let mut chars = trimmed.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => {
                if chars.peek() == Some(&'\n') {
                    chars.next();
                }
                out.push_str("\\n");
            }
            _ => out.push(c),
        }
    }

    out
}
