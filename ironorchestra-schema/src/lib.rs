//! # IronOrchestra Schema
//!
//! FIX Orchestra repository loading and field type resolution.
//!
//! This crate provides:
//! - XML parsing of Orchestra repositories (fields, code sets, datatypes)
//! - The FIX datatype to OpenAPI type mapping table
//! - Resolution of field declarations into normalized schema records

pub mod error;
pub mod mapping;
pub mod parser;
pub mod resolver;
pub mod types;

pub use error::{ParseError, ResolveError};
pub use mapping::{OpenApiPrimitive, SchemaType, TypeMapping};
pub use parser::{parse_repository, parse_repository_file};
pub use resolver::{
    NormalizedFieldRecord, Resolution, ResolveWarning, Resolver, TypeRef, normalize_description,
    resolve_fields,
};
pub use types::{CodeDef, CodeSetDef, DatatypeDef, Documentation, FieldDef, Repository};
