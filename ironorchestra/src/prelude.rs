//! Prelude module for convenient imports.
//!
//! ```ignore
//! use ironorchestra::prelude::*;
//! ```

// Conversion
pub use crate::config::{ConvertConfig, ConvertConfigBuilder};
pub use crate::{ConvertError, ConvertReport, convert, convert_with};

// Repository model
pub use ironorchestra_schema::{
    CodeDef, CodeSetDef, DatatypeDef, Documentation, FieldDef, ParseError, Repository,
    parse_repository, parse_repository_file,
};

// Type resolution
pub use ironorchestra_schema::{
    NormalizedFieldRecord, OpenApiPrimitive, Resolution, ResolveError, ResolveWarning, Resolver,
    SchemaType, TypeMapping, TypeRef, resolve_fields,
};

// Emission
pub use ironorchestra_openapi::{DEFAULT_DOCS_BASE_URL, EmitError, YamlEmitter};
