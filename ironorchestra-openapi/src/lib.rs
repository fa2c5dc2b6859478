//! # IronOrchestra OpenAPI
//!
//! OpenAPI property schema emission from FIX Orchestra repositories.
//!
//! This crate provides:
//! - YAML rendering of normalized field records
//! - Output file writing
//! - One-call conversion from Orchestra XML

pub mod emitter;
pub mod error;

pub use emitter::{DEFAULT_DOCS_BASE_URL, YamlEmitter};
pub use error::EmitError;

use ironorchestra_schema::{TypeMapping, parse_repository, resolve_fields};

/// Generates the YAML field schemas from an Orchestra XML string.
///
/// Uses the FIX Latest type mapping and the default documentation URL.
///
/// # Arguments
/// * `xml` - Orchestra repository content
///
/// # Returns
/// Rendered YAML as a string.
///
/// # Errors
/// Returns `EmitError` if parsing or resolution fails.
pub fn generate_from_xml(xml: &str) -> Result<String, EmitError> {
    let repository = parse_repository(xml)?;
    let mapping = TypeMapping::fix_latest();
    let resolution = resolve_fields(&repository, &mapping)?;
    Ok(YamlEmitter::new().emit(&resolution.records))
}

/// Generates the YAML field schemas from an Orchestra XML file.
///
/// # Arguments
/// * `path` - Path to the Orchestra repository file
///
/// # Returns
/// Rendered YAML as a string.
///
/// # Errors
/// Returns `EmitError` if reading, parsing, or resolution fails.
pub fn generate_from_file(path: &std::path::Path) -> Result<String, EmitError> {
    let xml = std::fs::read_to_string(path)?;
    generate_from_xml(&xml)
}

#[cfg(test)]
mod tests {
    use super::*;

    const REPOSITORY: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<fixr:repository xmlns:fixr="http://fixprotocol.io/2020/orchestra/repository" name="FIX.Latest">
    <fixr:codeSets>
        <fixr:codeSet name="SideCodeSet" id="54" type="char">
            <fixr:code name="Buy" id="54001" value="1"/>
            <fixr:code name="Sell" id="54002" value="2"/>
        </fixr:codeSet>
    </fixr:codeSets>
    <fixr:fields>
        <fixr:field id="15" name="Currency" type="Currency">
            <fixr:annotation>
                <fixr:documentation purpose="SYNOPSIS">Identifies currency used for price.</fixr:documentation>
            </fixr:annotation>
        </fixr:field>
        <fixr:field id="54" name="Side" type="SideCodeSet">
            <fixr:annotation>
                <fixr:documentation purpose="SYNOPSIS">Side of order</fixr:documentation>
            </fixr:annotation>
        </fixr:field>
    </fixr:fields>
</fixr:repository>"#;

    #[test]
    fn test_generate_from_xml() {
        let yaml = generate_from_xml(REPOSITORY).expect("Failed to generate");

        let expected = "\
Currency:
  type: string
  description: \"Identifies currency used for price.\"
  externalDocs:
    description: FIX-15
    url: https://fiximate.fixtrading.org/en/FIX.Latest/tag15.html
  pattern: \"[a-zA-Z]{3}\"
  format: iso-4217
Side:
  type: string
  enum:
    - Buy
    - Sell
  description: \"Side of order\"
  externalDocs:
    description: FIX-54
    url: https://fiximate.fixtrading.org/en/FIX.Latest/tag54.html
  pattern: \"[a-zA-Z]{1}\"
";
        assert_eq!(yaml, expected);
    }

    #[test]
    fn test_generate_is_idempotent() {
        let first = generate_from_xml(REPOSITORY).unwrap();
        let second = generate_from_xml(REPOSITORY).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_generate_unknown_type_fails() {
        let xml = r#"<fixr:repository xmlns:fixr="x"><fixr:fields>
            <fixr:field id="1" name="Thing" type="Bogus"/>
        </fixr:fields></fixr:repository>"#;
        let err = generate_from_xml(xml).unwrap_err();
        assert!(matches!(err, EmitError::Resolve(_)));
        assert!(err.to_string().contains("Thing"));
        assert!(err.to_string().contains("Bogus"));
    }

    #[test]
    fn test_generate_malformed_xml_fails() {
        let err = generate_from_xml("<fixr:repository><fixr:fields>").unwrap_err();
        assert!(matches!(err, EmitError::Parse(_)));
    }

    #[test]
    fn test_generate_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("OrchestraFIXLatest.xml");
        std::fs::write(&path, REPOSITORY).unwrap();

        let yaml = generate_from_file(&path).unwrap();
        assert!(yaml.starts_with("Currency:\n"));

        let err = generate_from_file(&dir.path().join("nope.xml")).unwrap_err();
        assert!(matches!(err, EmitError::Io(_)));
    }
}
