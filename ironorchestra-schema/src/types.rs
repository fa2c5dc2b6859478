//! Repository type definitions.
//!
//! This module contains the data structures representing the parts of a FIX
//! Orchestra repository that the converter consumes: fields, code sets,
//! datatypes and their annotations.

use std::collections::HashMap;
use std::fmt;

/// Parsed FIX Orchestra repository.
#[derive(Debug, Clone, Default)]
pub struct Repository {
    /// Repository name (e.g. `FIX.Latest`).
    pub name: Option<String>,
    /// Repository version.
    pub version: Option<String>,
    /// Code set definitions in document order.
    pub code_sets: Vec<CodeSetDef>,
    /// Datatype declarations in document order.
    pub datatypes: Vec<DatatypeDef>,
    /// Field definitions in document order.
    pub fields: Vec<FieldDef>,
    /// Code set lookup map (built during parsing).
    code_set_map: HashMap<String, usize>,
}

impl Repository {
    /// Creates a new empty repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a code set definition to the repository.
    ///
    /// The first code set registered under a name wins lookups.
    pub fn add_code_set(&mut self, code_set: CodeSetDef) {
        let index = self.code_sets.len();
        self.code_set_map
            .entry(code_set.name.clone())
            .or_insert(index);
        self.code_sets.push(code_set);
    }

    /// Adds a field definition to the repository.
    pub fn add_field(&mut self, field: FieldDef) {
        self.fields.push(field);
    }

    /// Adds a datatype declaration to the repository.
    pub fn add_datatype(&mut self, datatype: DatatypeDef) {
        self.datatypes.push(datatype);
    }

    /// Looks up a code set by name.
    #[must_use]
    pub fn get_code_set(&self, name: &str) -> Option<&CodeSetDef> {
        self.code_set_map.get(name).map(|&idx| &self.code_sets[idx])
    }

    /// Returns true if a code set with the given name exists.
    #[must_use]
    pub fn has_code_set(&self, name: &str) -> bool {
        self.code_set_map.contains_key(name)
    }

    /// Looks up a field by tag.
    #[must_use]
    pub fn get_field(&self, tag: u32) -> Option<&FieldDef> {
        self.fields.iter().find(|f| f.id == tag)
    }
}

/// Field definition (`fixr:field`).
#[derive(Debug, Clone)]
pub struct FieldDef {
    /// Tag number.
    pub id: u32,
    /// Field name.
    pub name: String,
    /// Declared type: a primitive datatype or a code set name.
    pub type_name: String,
    /// Abbreviated name used by FIXML.
    pub abbr_name: Option<String>,
    /// Version in which the field was added.
    pub added: Option<String>,
    /// Documentation nodes of the field annotation.
    pub documentation: Vec<Documentation>,
}

impl FieldDef {
    /// Creates a new field definition.
    #[must_use]
    pub fn new(id: u32, name: impl Into<String>, type_name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            type_name: type_name.into(),
            abbr_name: None,
            added: None,
            documentation: Vec::new(),
        }
    }

    /// Adds a documentation node.
    #[must_use]
    pub fn with_documentation(mut self, doc: Documentation) -> Self {
        self.documentation.push(doc);
        self
    }

    /// Returns the text of the first documentation node, if any.
    #[must_use]
    pub fn primary_documentation(&self) -> Option<&str> {
        self.documentation.first().map(|d| d.text.as_str())
    }
}

/// Code set definition (`fixr:codeSet`).
#[derive(Debug, Clone)]
pub struct CodeSetDef {
    /// Code set name.
    pub name: String,
    /// Code set identifier.
    pub id: Option<String>,
    /// Underlying primitive datatype.
    pub type_name: String,
    /// Version in which the code set was added.
    pub added: Option<String>,
    /// Codes in document order.
    pub codes: Vec<CodeDef>,
    /// Documentation nodes of the code set annotation.
    pub documentation: Vec<Documentation>,
}

impl CodeSetDef {
    /// Creates a new code set definition.
    #[must_use]
    pub fn new(name: impl Into<String>, type_name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            id: None,
            type_name: type_name.into(),
            added: None,
            codes: Vec::new(),
            documentation: Vec::new(),
        }
    }

    /// Adds a code.
    pub fn add_code(&mut self, code: CodeDef) {
        self.codes.push(code);
    }

    /// Builder-style variant of [`CodeSetDef::add_code`].
    #[must_use]
    pub fn with_code(mut self, code: CodeDef) -> Self {
        self.codes.push(code);
        self
    }

    /// Returns the code names in document order.
    pub fn code_names(&self) -> impl Iterator<Item = &str> {
        self.codes.iter().map(|c| c.name.as_str())
    }
}

impl fmt::Display for CodeSetDef {
    /// Formats the code set attributes and its code names for diagnostics.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "codeSet name=\"{}\"", self.name)?;
        if let Some(id) = &self.id {
            write!(f, " id=\"{}\"", id)?;
        }
        write!(f, " type=\"{}\"", self.type_name)?;
        if let Some(added) = &self.added {
            write!(f, " added=\"{}\"", added)?;
        }
        write!(f, " codes=[")?;
        for (i, code) in self.codes.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", code.name)?;
            if let Some(value) = &code.value {
                write!(f, "={}", value)?;
            }
        }
        write!(f, "]")
    }
}

/// Code within a code set (`fixr:code`).
#[derive(Debug, Clone, Default)]
pub struct CodeDef {
    /// Symbolic code name; empty when the source omits it.
    pub name: String,
    /// Code identifier.
    pub id: Option<String>,
    /// Wire value.
    pub value: Option<String>,
    /// Sort key.
    pub sort: Option<String>,
}

impl CodeDef {
    /// Creates a code with the given name and wire value.
    #[must_use]
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: Some(value.into()),
            ..Self::default()
        }
    }
}

/// Datatype declaration (`fixr:datatype`).
#[derive(Debug, Clone)]
pub struct DatatypeDef {
    /// Datatype name.
    pub name: String,
    /// Base datatype, when derived.
    pub base_type: Option<String>,
}

/// Documentation node (`fixr:documentation`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Documentation {
    /// Purpose attribute (`SYNOPSIS`, `ELABORATION`, ...).
    pub purpose: Option<String>,
    /// Raw text content with entities resolved.
    pub text: String,
}

impl Documentation {
    /// Creates a documentation node without a purpose.
    #[must_use]
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            purpose: None,
            text: text.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_code_set_lookup_first_wins() {
        let mut repo = Repository::new();
        repo.add_code_set(CodeSetDef::new("SideCodeSet", "char"));
        repo.add_code_set(CodeSetDef::new("SideCodeSet", "int"));

        assert!(repo.has_code_set("SideCodeSet"));
        assert_eq!(repo.get_code_set("SideCodeSet").unwrap().type_name, "char");
        assert!(repo.get_code_set("Missing").is_none());
    }

    #[test]
    fn test_primary_documentation() {
        let field = FieldDef::new(44, "Price", "Price")
            .with_documentation(Documentation::new("first"))
            .with_documentation(Documentation::new("second"));
        assert_eq!(field.primary_documentation(), Some("first"));
        assert_eq!(FieldDef::new(1, "A", "String").primary_documentation(), None);
    }

    #[test]
    fn test_code_set_display() {
        let mut cs = CodeSetDef::new("SideCodeSet", "char");
        cs.id = Some("54".to_string());
        cs.add_code(CodeDef::new("Buy", "1"));
        cs.add_code(CodeDef::new("Sell", "2"));
        assert_eq!(
            cs.to_string(),
            "codeSet name=\"SideCodeSet\" id=\"54\" type=\"char\" codes=[Buy=1, Sell=2]"
        );
    }
}
