//! # IronOrchestra
//!
//! FIX Orchestra to OpenAPI field schema converter.
//!
//! IronOrchestra reads a FIX Orchestra repository, resolves every field's
//! datatype (directly, or through the code set it names) and writes one
//! OpenAPI-style property schema per field as YAML.
//!
//! ## Quick Start
//!
//! ```ignore
//! use ironorchestra::prelude::*;
//!
//! let config = ConvertConfig::builder()
//!     .input("OrchestraFIXLatest.xml")
//!     .output("fix-fields.yml")
//!     .build();
//!
//! let report = convert(&config)?;
//! println!("{} fields written", report.fields);
//! ```
//!
//! ## Crate Organization
//!
//! - [`schema`] - Orchestra parsing, type mapping and field resolution
//! - [`openapi`] - YAML schema emission
//! - [`config`] - Run configuration

pub mod config;
pub mod prelude;

/// Orchestra parsing, type mapping and field resolution.
pub mod schema {
    pub use ironorchestra_schema::*;
}

/// YAML schema emission.
pub mod openapi {
    pub use ironorchestra_openapi::*;
}

pub use config::{ConvertConfig, ConvertConfigBuilder};

use ironorchestra_openapi::{EmitError, YamlEmitter};
use ironorchestra_schema::{
    ParseError, ResolveError, ResolveWarning, Resolver, TypeMapping, parse_repository_file,
};
use std::path::PathBuf;
use thiserror::Error;

/// Error type for a conversion run.
#[derive(Debug, Error)]
pub enum ConvertError {
    /// The input repository could not be read or parsed.
    #[error("failed to load '{}': {source}", path.display())]
    Load {
        /// Input path.
        path: PathBuf,
        /// Underlying parse error.
        #[source]
        source: ParseError,
    },

    /// A field could not be resolved.
    #[error(transparent)]
    Resolve(#[from] ResolveError),

    /// The output file could not be written.
    #[error("failed to write '{}': {source}", path.display())]
    Write {
        /// Output path.
        path: PathBuf,
        /// Underlying emission error.
        #[source]
        source: EmitError,
    },
}

/// Summary of a completed conversion.
#[derive(Debug, Clone, Default)]
pub struct ConvertReport {
    /// Number of field schemas written.
    pub fields: usize,
    /// Number of those that are enumerations.
    pub enums: usize,
    /// Non-fatal conditions raised during resolution.
    pub warnings: Vec<ResolveWarning>,
}

/// Runs the full conversion with the FIX Latest type mapping.
///
/// # Errors
/// Returns `ConvertError` on the first parse, resolution or write failure.
/// Nothing is written unless resolution succeeds for every field.
pub fn convert(config: &ConvertConfig) -> Result<ConvertReport, ConvertError> {
    convert_with(config, &TypeMapping::fix_latest())
}

/// Runs the full conversion with a caller-supplied type mapping.
///
/// # Errors
/// Returns `ConvertError` on the first parse, resolution or write failure.
pub fn convert_with(
    config: &ConvertConfig,
    mapping: &TypeMapping,
) -> Result<ConvertReport, ConvertError> {
    tracing::info!("reading {}", config.input.display());
    let repository = parse_repository_file(&config.input).map_err(|source| ConvertError::Load {
        path: config.input.clone(),
        source,
    })?;

    let resolution = Resolver::new(mapping).resolve(&repository)?;

    YamlEmitter::new()
        .docs_base_url(config.docs_base_url.as_str())
        .write_to(&resolution.records, &config.output)
        .map_err(|source| ConvertError::Write {
            path: config.output.clone(),
            source,
        })?;

    Ok(ConvertReport {
        fields: resolution.records.len(),
        enums: resolution.records.iter().filter(|r| r.is_enum()).count(),
        warnings: resolution.warnings,
    })
}
