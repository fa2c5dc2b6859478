//! YAML property schema emission.
//!
//! Each [`NormalizedFieldRecord`] becomes one block keyed by the field name:
//!
//! ```text
//! Side:
//!   type: string
//!   enum:
//!     - Buy
//!     - Sell
//!   description: "Side of order"
//!   externalDocs:
//!     description: FIX-54
//!     url: https://fiximate.fixtrading.org/en/FIX.Latest/tag54.html
//!   pattern: "[a-zA-Z]{1}"
//! ```
//!
//! Attributes absent from the record (`enum`, `pattern`, `format`) are omitted.

use crate::error::EmitError;
use ironorchestra_schema::NormalizedFieldRecord;
use std::path::Path;

/// Base URL of the FIX Latest online field reference.
pub const DEFAULT_DOCS_BASE_URL: &str = "https://fiximate.fixtrading.org/en/FIX.Latest/";

/// Renders normalized field records as YAML property blocks.
#[derive(Debug, Clone)]
pub struct YamlEmitter {
    docs_base_url: String,
}

impl YamlEmitter {
    /// Creates an emitter linking to the FIX Latest field reference.
    #[must_use]
    pub fn new() -> Self {
        Self {
            docs_base_url: DEFAULT_DOCS_BASE_URL.to_string(),
        }
    }

    /// Sets the base URL used for `externalDocs` links.
    ///
    /// The field page `tag<N>.html` is appended as is, so the URL should end
    /// with a slash.
    #[must_use]
    pub fn docs_base_url(mut self, url: impl Into<String>) -> Self {
        self.docs_base_url = url.into();
        self
    }

    /// Renders all records, one block per record, in order.
    #[must_use]
    pub fn emit(&self, records: &[NormalizedFieldRecord]) -> String {
        let mut output = String::new();
        for record in records {
            output.push_str(&self.emit_field(record));
        }
        output
    }

    /// Renders a single record block, terminated by a newline.
    #[must_use]
    pub fn emit_field(&self, record: &NormalizedFieldRecord) -> String {
        let mut output = String::new();
        let schema_type = &record.schema_type;

        output.push_str(&format!("{}:\n", record.name));
        output.push_str(&format!("  type: {}\n", schema_type.primitive));

        if let Some(values) = record.enum_values.as_ref().filter(|v| !v.is_empty()) {
            output.push_str("  enum:\n");
            for value in values {
                output.push_str(&format!("    - {}\n", yaml_scalar(value)));
            }
        }

        output.push_str(&format!("  description: \"{}\"\n", record.description));
        output.push_str("  externalDocs:\n");
        output.push_str(&format!("    description: FIX-{}\n", record.tag));
        output.push_str(&format!("    url: {}\n", self.docs_url(record.tag)));

        if let Some(pattern) = &schema_type.pattern {
            output.push_str(&format!("  pattern: {}\n", double_quoted(pattern)));
        }
        if let Some(format) = &schema_type.format {
            output.push_str(&format!("  format: {}\n", format_scalar(format)));
        }

        output
    }

    /// Returns the documentation link for a tag.
    #[must_use]
    pub fn docs_url(&self, tag: u32) -> String {
        format!("{}tag{}.html", self.docs_base_url, tag)
    }

    /// Renders the records and writes them to `path` in a single write.
    ///
    /// # Errors
    /// Returns `EmitError::Io` if the file cannot be written.
    pub fn write_to(
        &self,
        records: &[NormalizedFieldRecord],
        path: impl AsRef<Path>,
    ) -> Result<(), EmitError> {
        let path = path.as_ref();
        let output = self.emit(records);
        std::fs::write(path, output)?;
        tracing::info!(
            "wrote {} field definitions to {}",
            records.len(),
            path.display()
        );
        Ok(())
    }
}

impl Default for YamlEmitter {
    fn default() -> Self {
        Self::new()
    }
}

/// Formats an enum value as a YAML scalar.
///
/// Identifier-like values are written bare; anything YAML would read as a
/// number, boolean or null, or that contains other characters, is quoted.
fn yaml_scalar(value: &str) -> String {
    let identifier = value
        .chars()
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
        && value.chars().all(|c| c.is_ascii_alphanumeric() || c == '_');

    if identifier && !is_yaml_keyword(value) {
        value.to_string()
    } else {
        double_quoted(value)
    }
}

/// Formats a `format` keyword, bare when it is a plain token such as
/// `date-time` or `iso-4217`.
fn format_scalar(value: &str) -> String {
    let plain = value.chars().next().is_some_and(|c| c.is_ascii_alphabetic())
        && value
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'));

    if plain && !is_yaml_keyword(value) {
        value.to_string()
    } else {
        double_quoted(value)
    }
}

/// Wraps a value in a YAML double-quoted scalar.
///
/// Backslashes are doubled so regex escapes such as `\d` survive as text.
fn double_quoted(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('"');
    for c in value.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            _ => out.push(c),
        }
    }
    out.push('"');
    out
}

fn is_yaml_keyword(value: &str) -> bool {
    matches!(
        value.to_ascii_lowercase().as_str(),
        "y" | "n" | "yes" | "no" | "true" | "false" | "on" | "off" | "null"
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use ironorchestra_schema::{OpenApiPrimitive, SchemaType, TypeMapping};

    fn record(tag: u32, name: &str, fix_type: &str) -> NormalizedFieldRecord {
        NormalizedFieldRecord {
            tag,
            name: name.to_string(),
            description: "desc".to_string(),
            schema_type: TypeMapping::fix_latest().get(fix_type).unwrap().clone(),
            enum_values: None,
        }
    }

    #[test]
    fn test_emit_primitive_field() {
        let output = YamlEmitter::new().emit_field(&record(44, "Price", "Price"));
        assert_eq!(
            output,
            "Price:\n  type: number\n  description: \"desc\"\n  externalDocs:\n    description: FIX-44\n    url: https://fiximate.fixtrading.org/en/FIX.Latest/tag44.html\n"
        );
    }

    #[test]
    fn test_emit_omits_absent_attributes() {
        let output = YamlEmitter::new().emit_field(&record(44, "Price", "Price"));
        assert!(!output.contains("enum:"));
        assert!(!output.contains("pattern:"));
        assert!(!output.contains("format:"));
    }

    #[test]
    fn test_emit_pattern_and_format() {
        let output = YamlEmitter::new().emit_field(&record(15, "Currency", "Currency"));
        assert!(output.ends_with("  pattern: \"[a-zA-Z]{3}\"\n  format: iso-4217\n"));

        let output = YamlEmitter::new().emit_field(&record(60, "TransactTime", "UTCTimestamp"));
        assert!(!output.contains("pattern:"));
        assert!(output.ends_with("  format: date-time\n"));
    }

    #[test]
    fn test_emit_enum_values_in_order() {
        let mut side = record(54, "Side", "char");
        side.enum_values = Some(vec!["Sell".to_string(), "Buy".to_string(), "1".to_string()]);

        let output = YamlEmitter::new().emit_field(&side);
        assert!(output.starts_with("Side:\n  type: string\n  enum:\n    - Sell\n    - Buy\n    - \"1\"\n  description:"));
    }

    #[test]
    fn test_emit_empty_enum_is_omitted() {
        let mut rec = record(1, "F", "int");
        rec.enum_values = Some(Vec::new());
        assert!(!YamlEmitter::new().emit_field(&rec).contains("enum:"));
    }

    #[test]
    fn test_emit_boolean() {
        let rec = NormalizedFieldRecord {
            tag: 7,
            name: "Flag".to_string(),
            description: String::new(),
            schema_type: SchemaType::new("Boolean", OpenApiPrimitive::Boolean, ""),
            enum_values: None,
        };
        let output = YamlEmitter::new().emit_field(&rec);
        assert!(output.contains("  type: boolean\n"));
        assert!(output.contains("  description: \"\"\n"));
    }

    #[test]
    fn test_custom_docs_base_url() {
        let emitter = YamlEmitter::new().docs_base_url("https://example.org/fix/");
        assert_eq!(emitter.docs_url(35), "https://example.org/fix/tag35.html");
    }

    #[test]
    fn test_emit_blocks_are_newline_joined() {
        let records = vec![record(1, "Account", "String"), record(2, "AdvId", "String")];
        let output = YamlEmitter::new().emit(&records);
        assert_eq!(output.matches("externalDocs:").count(), 2);
        assert!(output.contains(".html\nAdvId:\n"));
        assert!(output.ends_with("tag2.html\n"));
        assert_eq!(YamlEmitter::new().emit(&[]), "");
    }

    #[test]
    fn test_write_to() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("fix-fields.yml");
        let records = vec![record(1, "Account", "String")];

        YamlEmitter::new().write_to(&records, &path).unwrap();
        let written = std::fs::read_to_string(&path).unwrap();
        assert_eq!(written, YamlEmitter::new().emit(&records));

        let bad = dir.path().join("missing-dir").join("out.yml");
        assert!(matches!(
            YamlEmitter::new().write_to(&records, &bad),
            Err(EmitError::Io(_))
        ));
    }

    #[test]
    fn test_emit_pattern_escapes_backslashes() {
        let rec = NormalizedFieldRecord {
            tag: 9001,
            name: "Year".to_string(),
            description: "desc".to_string(),
            schema_type: SchemaType::new("Digits", OpenApiPrimitive::String, "d")
                .pattern(r#"\d{4}"x"#),
            enum_values: None,
        };
        let output = YamlEmitter::new().emit_field(&rec);
        assert!(output.ends_with("  pattern: \"\\\\d{4}\\\"x\"\n"));
    }

    #[test]
    fn test_emit_format_quoted_when_not_plain() {
        let mut rec = record(60, "TransactTime", "UTCTimestamp");
        rec.schema_type = rec.schema_type.format("custom format");
        let output = YamlEmitter::new().emit_field(&rec);
        assert!(output.ends_with("  format: \"custom format\"\n"));

        rec.schema_type = rec.schema_type.format("yes");
        assert!(YamlEmitter::new().emit_field(&rec).ends_with("  format: \"yes\"\n"));
    }

    #[test]
    fn test_double_quoted() {
        assert_eq!(double_quoted(r"\d+"), r#""\\d+""#);
        assert_eq!(double_quoted("a\"b"), r#""a\"b""#);
        assert_eq!(double_quoted("a\nb\tc"), r#""a\nb\tc""#);
        assert_eq!(format_scalar("iso-3166-alpha-2"), "iso-3166-alpha-2");
        assert_eq!(format_scalar(""), "\"\"");
    }

    #[test]
    fn test_yaml_scalar() {
        assert_eq!(yaml_scalar("Buy"), "Buy");
        assert_eq!(yaml_scalar("Good_Till_Cancel"), "Good_Till_Cancel");
        assert_eq!(yaml_scalar("1"), "\"1\"");
        assert_eq!(yaml_scalar("Y"), "\"Y\"");
        assert_eq!(yaml_scalar("No"), "\"No\"");
        assert_eq!(yaml_scalar("a b"), "\"a b\"");
        assert_eq!(yaml_scalar("say\"x"), "\"say\\\"x\"");
        assert_eq!(yaml_scalar(""), "\"\"");
    }
}
