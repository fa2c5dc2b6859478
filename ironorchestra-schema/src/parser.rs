//! FIX Orchestra repository parser.
//!
//! This module provides functionality to parse FIX Orchestra XML repository
//! files into the internal [`Repository`] representation. Only the sections
//! the converter needs are materialized: `codeSets`, `datatypes` and
//! `fields`. Everything else is skipped.
//!
//! Element names are matched on their local part, so both `fixr:field` and an
//! unprefixed `field` are accepted.

use crate::error::ParseError;
use crate::types::{CodeDef, CodeSetDef, DatatypeDef, Documentation, FieldDef, Repository};
use quick_xml::Reader;
use quick_xml::escape::unescape;
use quick_xml::events::{BytesStart, Event};
use std::path::Path;

/// Parses an Orchestra repository from a string.
///
/// # Arguments
/// * `xml` - XML repository content
///
/// # Returns
/// Parsed repository or parse error.
///
/// # Errors
/// Returns `ParseError` if the XML is malformed, has no `repository` root, or
/// a field carries invalid attributes.
pub fn parse_repository(xml: &str) -> Result<Repository, ParseError> {
    let mut reader = Reader::from_str(xml);

    let mut repository: Option<Repository> = None;
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(ref e)) => {
                let name = local_name(e)?;
                if name == "repository" {
                    if repository.is_none() {
                        repository = Some(parse_repository_attrs(e)?);
                    }
                } else if let Some(repo) = repository.as_mut() {
                    match name.as_str() {
                        "codeSets" => parse_code_sets(&mut reader, repo)?,
                        "datatypes" => parse_datatypes(&mut reader, repo)?,
                        "fields" => parse_fields(&mut reader, repo)?,
                        _ => {}
                    }
                }
            }
            Ok(Event::Empty(ref e)) => {
                if repository.is_none() && local_name(e)? == "repository" {
                    repository = Some(parse_repository_attrs(e)?);
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(ParseError::Xml(e)),
            _ => {}
        }
        buf.clear();
    }

    repository.ok_or_else(|| ParseError::InvalidStructure {
        message: "No repository element found".to_string(),
    })
}

/// Reads and parses an Orchestra repository file.
///
/// # Errors
/// Returns `ParseError::Io` if the file cannot be read, or any error of
/// [`parse_repository`].
pub fn parse_repository_file(path: impl AsRef<Path>) -> Result<Repository, ParseError> {
    let xml = std::fs::read_to_string(path)?;
    parse_repository(&xml)
}

/// Parses the repository element attributes.
fn parse_repository_attrs(e: &BytesStart<'_>) -> Result<Repository, ParseError> {
    let mut repository = Repository::new();

    for attr in e.attributes().flatten() {
        let key = std::str::from_utf8(attr.key.as_ref())?;
        match key {
            "name" => repository.name = Some(attr_value(&attr.value)?),
            "version" => repository.version = Some(attr_value(&attr.value)?),
            _ => {}
        }
    }

    Ok(repository)
}

/// Parses the codeSets section.
fn parse_code_sets(reader: &mut Reader<&[u8]>, repo: &mut Repository) -> Result<(), ParseError> {
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(ref e)) => {
                if local_name(e)? == "codeSet" {
                    let code_set = parse_code_set(reader, e)?;
                    repo.add_code_set(code_set);
                } else {
                    skip_to_end(reader)?;
                }
            }
            Ok(Event::Empty(ref e)) => {
                if local_name(e)? == "codeSet" {
                    repo.add_code_set(parse_code_set_attrs(e)?);
                }
            }
            Ok(Event::End(_)) => break,
            Ok(Event::Eof) => return Err(unexpected_eof("codeSets")),
            Err(e) => return Err(ParseError::Xml(e)),
            _ => {}
        }
        buf.clear();
    }

    Ok(())
}

/// Parses the attributes of a code set element.
fn parse_code_set_attrs(e: &BytesStart<'_>) -> Result<CodeSetDef, ParseError> {
    let mut name = None;
    let mut id = None;
    let mut type_name = None;
    let mut added = None;

    for attr in e.attributes().flatten() {
        let key = std::str::from_utf8(attr.key.as_ref())?;
        match key {
            "name" => name = Some(attr_value(&attr.value)?),
            "id" => id = Some(attr_value(&attr.value)?),
            "type" => type_name = Some(attr_value(&attr.value)?),
            "added" => added = Some(attr_value(&attr.value)?),
            _ => {}
        }
    }

    let name = name.ok_or_else(|| ParseError::missing_attr("codeSet", "name"))?;

    // A missing underlying type is reported by the resolver, with field context.
    let mut code_set = CodeSetDef::new(name, type_name.unwrap_or_default());
    code_set.id = id;
    code_set.added = added;

    Ok(code_set)
}

/// Parses a code set definition with its codes and annotation.
fn parse_code_set(
    reader: &mut Reader<&[u8]>,
    e: &BytesStart<'_>,
) -> Result<CodeSetDef, ParseError> {
    let mut code_set = parse_code_set_attrs(e)?;
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(ref e)) => match local_name(e)?.as_str() {
                "code" => {
                    code_set.add_code(parse_code_attrs(e)?);
                    skip_to_end(reader)?;
                }
                "annotation" => {
                    code_set.documentation = parse_annotation(reader)?;
                }
                _ => skip_to_end(reader)?,
            },
            Ok(Event::Empty(ref e)) => {
                if local_name(e)? == "code" {
                    code_set.add_code(parse_code_attrs(e)?);
                }
            }
            Ok(Event::End(_)) => break,
            Ok(Event::Eof) => return Err(unexpected_eof("codeSet")),
            Err(e) => return Err(ParseError::Xml(e)),
            _ => {}
        }
        buf.clear();
    }

    Ok(code_set)
}

/// Parses the attributes of a code element.
fn parse_code_attrs(e: &BytesStart<'_>) -> Result<CodeDef, ParseError> {
    let mut code = CodeDef::default();

    for attr in e.attributes().flatten() {
        let key = std::str::from_utf8(attr.key.as_ref())?;
        match key {
            "name" => code.name = attr_value(&attr.value)?,
            "id" => code.id = Some(attr_value(&attr.value)?),
            "value" => code.value = Some(attr_value(&attr.value)?),
            "sort" => code.sort = Some(attr_value(&attr.value)?),
            _ => {}
        }
    }

    Ok(code)
}

/// Parses the datatypes section.
fn parse_datatypes(reader: &mut Reader<&[u8]>, repo: &mut Repository) -> Result<(), ParseError> {
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(ref e)) => {
                if local_name(e)? == "datatype" {
                    repo.add_datatype(parse_datatype_attrs(e)?);
                }
                skip_to_end(reader)?;
            }
            Ok(Event::Empty(ref e)) => {
                if local_name(e)? == "datatype" {
                    repo.add_datatype(parse_datatype_attrs(e)?);
                }
            }
            Ok(Event::End(_)) => break,
            Ok(Event::Eof) => return Err(unexpected_eof("datatypes")),
            Err(e) => return Err(ParseError::Xml(e)),
            _ => {}
        }
        buf.clear();
    }

    Ok(())
}

/// Parses the attributes of a datatype element.
fn parse_datatype_attrs(e: &BytesStart<'_>) -> Result<DatatypeDef, ParseError> {
    let mut name = None;
    let mut base_type = None;

    for attr in e.attributes().flatten() {
        let key = std::str::from_utf8(attr.key.as_ref())?;
        match key {
            "name" => name = Some(attr_value(&attr.value)?),
            "baseType" => base_type = Some(attr_value(&attr.value)?),
            _ => {}
        }
    }

    let name = name.ok_or_else(|| ParseError::missing_attr("datatype", "name"))?;
    Ok(DatatypeDef { name, base_type })
}

/// Parses the fields section.
fn parse_fields(reader: &mut Reader<&[u8]>, repo: &mut Repository) -> Result<(), ParseError> {
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(ref e)) => {
                if local_name(e)? == "field" {
                    let field = parse_field(reader, e)?;
                    repo.add_field(field);
                } else {
                    skip_to_end(reader)?;
                }
            }
            Ok(Event::Empty(ref e)) => {
                if local_name(e)? == "field" {
                    repo.add_field(parse_field_attrs(e)?);
                }
            }
            Ok(Event::End(_)) => break,
            Ok(Event::Eof) => return Err(unexpected_eof("fields")),
            Err(e) => return Err(ParseError::Xml(e)),
            _ => {}
        }
        buf.clear();
    }

    Ok(())
}

/// Parses the attributes of a field element.
fn parse_field_attrs(e: &BytesStart<'_>) -> Result<FieldDef, ParseError> {
    let mut id: Option<u32> = None;
    let mut name = None;
    let mut type_name = None;
    let mut abbr_name = None;
    let mut added = None;

    for attr in e.attributes().flatten() {
        let key = std::str::from_utf8(attr.key.as_ref())?;
        let value = attr_value(&attr.value)?;

        match key {
            "id" => {
                let tag: u32 = value
                    .parse()
                    .map_err(|_| ParseError::invalid_attr("field", "id", &value))?;
                if tag == 0 {
                    return Err(ParseError::invalid_attr("field", "id", value));
                }
                id = Some(tag);
            }
            "name" => name = Some(value),
            "type" => type_name = Some(value),
            "abbrName" => abbr_name = Some(value),
            "added" => added = Some(value),
            _ => {}
        }
    }

    let id = id.ok_or_else(|| ParseError::missing_attr("field", "id"))?;
    let name = name
        .filter(|n| !n.is_empty())
        .ok_or_else(|| ParseError::missing_attr("field", "name"))?;
    let type_name = type_name.ok_or_else(|| ParseError::missing_attr("field", "type"))?;

    let mut field = FieldDef::new(id, name, type_name);
    field.abbr_name = abbr_name;
    field.added = added;

    Ok(field)
}

/// Parses a field definition with its annotation.
fn parse_field(reader: &mut Reader<&[u8]>, e: &BytesStart<'_>) -> Result<FieldDef, ParseError> {
    let mut field = parse_field_attrs(e)?;
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(ref e)) => {
                if local_name(e)? == "annotation" {
                    field.documentation.extend(parse_annotation(reader)?);
                } else {
                    skip_to_end(reader)?;
                }
            }
            Ok(Event::End(_)) => break,
            Ok(Event::Eof) => return Err(unexpected_eof("field")),
            Err(e) => return Err(ParseError::Xml(e)),
            _ => {}
        }
        buf.clear();
    }

    Ok(field)
}

/// Parses an annotation into its documentation nodes.
fn parse_annotation(reader: &mut Reader<&[u8]>) -> Result<Vec<Documentation>, ParseError> {
    let mut docs = Vec::new();
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(ref e)) => {
                if local_name(e)? == "documentation" {
                    let purpose = documentation_purpose(e)?;
                    let text = read_text(reader)?;
                    docs.push(Documentation { purpose, text });
                } else {
                    skip_to_end(reader)?;
                }
            }
            Ok(Event::Empty(ref e)) => {
                if local_name(e)? == "documentation" {
                    docs.push(Documentation {
                        purpose: documentation_purpose(e)?,
                        text: String::new(),
                    });
                }
            }
            Ok(Event::End(_)) => break,
            Ok(Event::Eof) => return Err(unexpected_eof("annotation")),
            Err(e) => return Err(ParseError::Xml(e)),
            _ => {}
        }
        buf.clear();
    }

    Ok(docs)
}

/// Reads the purpose attribute of a documentation element.
fn documentation_purpose(e: &BytesStart<'_>) -> Result<Option<String>, ParseError> {
    for attr in e.attributes().flatten() {
        if attr.key.as_ref() == b"purpose" {
            return Ok(Some(attr_value(&attr.value)?));
        }
    }
    Ok(None)
}

/// Collects all character content up to the end of the current element.
///
/// Text inside nested markup is included; entity and character references
/// are resolved.
fn read_text(reader: &mut Reader<&[u8]>) -> Result<String, ParseError> {
    let mut text = String::new();
    let mut buf = Vec::new();
    let mut depth = 0usize;

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Text(ref t)) => {
                let raw = std::str::from_utf8(t.as_ref())?;
                text.push_str(&unescape(raw)?);
            }
            Ok(Event::CData(ref c)) => {
                text.push_str(std::str::from_utf8(c.as_ref())?);
            }
            Ok(Event::GeneralRef(ref r)) => {
                let name = std::str::from_utf8(r.as_ref())?;
                text.push_str(&unescape(&format!("&{};", name))?);
            }
            Ok(Event::Start(_)) => depth += 1,
            Ok(Event::End(_)) => {
                if depth == 0 {
                    break;
                }
                depth -= 1;
            }
            Ok(Event::Eof) => return Err(unexpected_eof("documentation")),
            Err(e) => return Err(ParseError::Xml(e)),
            _ => {}
        }
        buf.clear();
    }

    Ok(text)
}

/// Skips to the end of the current element.
fn skip_to_end(reader: &mut Reader<&[u8]>) -> Result<(), ParseError> {
    let mut buf = Vec::new();
    let mut depth = 1;

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(_)) => depth += 1,
            Ok(Event::End(_)) => {
                depth -= 1;
                if depth == 0 {
                    break;
                }
            }
            Ok(Event::Eof) => return Err(unexpected_eof("element")),
            Err(e) => return Err(ParseError::Xml(e)),
            _ => {}
        }
        buf.clear();
    }

    Ok(())
}

/// Returns the element name without its namespace prefix.
fn local_name(e: &BytesStart<'_>) -> Result<String, ParseError> {
    let local = e.local_name();
    Ok(std::str::from_utf8(local.as_ref())?.to_string())
}

/// Decodes and unescapes a raw attribute value.
fn attr_value(raw: &[u8]) -> Result<String, ParseError> {
    let value = std::str::from_utf8(raw)?;
    Ok(unescape(value)?.into_owned())
}

fn unexpected_eof(context: &str) -> ParseError {
    ParseError::InvalidStructure {
        message: format!("unexpected end of document inside '{}'", context),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SIMPLE_REPOSITORY: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<fixr:repository xmlns:fixr="http://fixprotocol.io/2020/orchestra/repository"
                 name="FIX.Latest" version="FIX.Latest_EP269">
    <fixr:metadata>
        <dc:title xmlns:dc="http://purl.org/dc/elements/1.1/">Orchestra</dc:title>
    </fixr:metadata>
    <fixr:codeSets>
        <fixr:codeSet name="SideCodeSet" id="54" type="char" added="FIX.2.7">
            <fixr:code name="Buy" id="54001" value="1" sort="1">
                <fixr:annotation>
                    <fixr:documentation purpose="SYNOPSIS">Buy</fixr:documentation>
                </fixr:annotation>
            </fixr:code>
            <fixr:code name="Sell" id="54002" value="2" sort="2"/>
            <fixr:annotation>
                <fixr:documentation purpose="SYNOPSIS">Side of order</fixr:documentation>
            </fixr:annotation>
        </fixr:codeSet>
        <fixr:codeSet name="EmptyCodeSet" id="9" type="int"/>
    </fixr:codeSets>
    <fixr:datatypes>
        <fixr:datatype name="Price" baseType="float">
            <fixr:mappedDatatype standard="XML" base="xs:decimal"/>
        </fixr:datatype>
        <fixr:datatype name="char"/>
    </fixr:datatypes>
    <fixr:fields>
        <fixr:field id="44" name="Price" type="Price" added="FIX.2.7" abbrName="Px">
            <fixr:annotation>
                <fixr:documentation purpose="SYNOPSIS">
                    Price per unit of quantity &amp; "more"
                </fixr:documentation>
                <fixr:documentation purpose="ELABORATION">Second node</fixr:documentation>
            </fixr:annotation>
        </fixr:field>
        <fixr:field id="54" name="Side" type="SideCodeSet"/>
        <fixr:field id="58" name="Text" type="String">
            <fixr:annotation>
                <fixr:documentation purpose="SYNOPSIS"><![CDATA[Free <text>]]></fixr:documentation>
            </fixr:annotation>
        </fixr:field>
    </fixr:fields>
    <fixr:messages>
        <fixr:message name="Heartbeat" id="1" msgType="0">
            <fixr:structure>
                <fixr:fieldRef id="112"/>
            </fixr:structure>
        </fixr:message>
    </fixr:messages>
</fixr:repository>"#;

    #[test]
    fn test_parse_repository_attributes() {
        let repo = parse_repository(SIMPLE_REPOSITORY).expect("Failed to parse repository");

        assert_eq!(repo.name.as_deref(), Some("FIX.Latest"));
        assert_eq!(repo.version.as_deref(), Some("FIX.Latest_EP269"));
    }

    #[test]
    fn test_parse_fields_in_order() {
        let repo = parse_repository(SIMPLE_REPOSITORY).expect("Failed to parse repository");

        let tags: Vec<u32> = repo.fields.iter().map(|f| f.id).collect();
        assert_eq!(tags, vec![44, 54, 58]);

        let price = repo.get_field(44).unwrap();
        assert_eq!(price.name, "Price");
        assert_eq!(price.type_name, "Price");
        assert_eq!(price.abbr_name.as_deref(), Some("Px"));
        assert_eq!(price.added.as_deref(), Some("FIX.2.7"));
        assert_eq!(price.documentation.len(), 2);
        assert_eq!(price.documentation[0].purpose.as_deref(), Some("SYNOPSIS"));
        assert_eq!(
            price.primary_documentation().map(str::trim),
            Some("Price per unit of quantity & \"more\"")
        );

        assert!(repo.get_field(54).unwrap().documentation.is_empty());
    }

    #[test]
    fn test_parse_cdata_documentation() {
        let repo = parse_repository(SIMPLE_REPOSITORY).expect("Failed to parse repository");
        assert_eq!(
            repo.get_field(58).unwrap().primary_documentation(),
            Some("Free <text>")
        );
    }

    #[test]
    fn test_parse_code_sets() {
        let repo = parse_repository(SIMPLE_REPOSITORY).expect("Failed to parse repository");

        assert_eq!(repo.code_sets.len(), 2);
        let side = repo.get_code_set("SideCodeSet").unwrap();
        assert_eq!(side.type_name, "char");
        assert_eq!(side.id.as_deref(), Some("54"));
        assert_eq!(side.code_names().collect::<Vec<_>>(), vec!["Buy", "Sell"]);
        assert_eq!(side.codes[1].value.as_deref(), Some("2"));
        assert_eq!(side.documentation.len(), 1);

        let empty = repo.get_code_set("EmptyCodeSet").unwrap();
        assert!(empty.codes.is_empty());
    }

    #[test]
    fn test_parse_datatypes() {
        let repo = parse_repository(SIMPLE_REPOSITORY).expect("Failed to parse repository");

        let names: Vec<&str> = repo.datatypes.iter().map(|d| d.name.as_str()).collect();
        assert_eq!(names, vec!["Price", "char"]);
        assert_eq!(repo.datatypes[0].base_type.as_deref(), Some("float"));
    }

    #[test]
    fn test_unprefixed_elements() {
        let xml = r#"<repository><fields><field id="1" name="Account" type="String"/></fields></repository>"#;
        let repo = parse_repository(xml).expect("Failed to parse repository");
        assert_eq!(repo.fields.len(), 1);
        assert!(repo.name.is_none());
    }

    #[test]
    fn test_missing_repository_root() {
        let err = parse_repository("<other/>").unwrap_err();
        assert!(matches!(err, ParseError::InvalidStructure { .. }));
    }

    #[test]
    fn test_malformed_xml() {
        let xml = r#"<fixr:repository xmlns:fixr="x"><fixr:fields></fixr:repository>"#;
        assert!(parse_repository(xml).is_err());
    }

    #[test]
    fn test_invalid_field_id() {
        let xml = r#"<repository><fields><field id="abc" name="A" type="int"/></fields></repository>"#;
        let err = parse_repository(xml).unwrap_err();
        assert!(matches!(err, ParseError::InvalidAttribute { ref attribute, .. } if attribute == "id"));

        let xml = r#"<repository><fields><field id="0" name="A" type="int"/></fields></repository>"#;
        assert!(parse_repository(xml).is_err());
    }

    #[test]
    fn test_missing_field_type() {
        let xml = r#"<repository><fields><field id="1" name="A"/></fields></repository>"#;
        let err = parse_repository(xml).unwrap_err();
        assert!(matches!(err, ParseError::MissingAttribute { ref attribute, .. } if attribute == "type"));
    }

    #[test]
    fn test_parse_repository_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("orchestra.xml");
        std::fs::write(&path, SIMPLE_REPOSITORY).unwrap();

        let repo = parse_repository_file(&path).expect("Failed to parse file");
        assert_eq!(repo.fields.len(), 3);

        let missing = parse_repository_file(dir.path().join("missing.xml")).unwrap_err();
        assert!(matches!(missing, ParseError::Io(_)));
    }
}
