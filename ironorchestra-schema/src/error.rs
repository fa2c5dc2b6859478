//! Error types for repository parsing and field resolution.

use thiserror::Error;

/// Error type for Orchestra repository parsing operations.
#[derive(Debug, Error)]
pub enum ParseError {
    /// XML parsing error.
    #[error("XML parsing error: {0}")]
    Xml(#[from] quick_xml::Error),

    /// Entity or character reference that cannot be resolved.
    #[error("XML escape error: {0}")]
    Escape(#[from] quick_xml::escape::EscapeError),

    /// Missing required attribute.
    #[error("missing required attribute '{attribute}' on element '{element}'")]
    MissingAttribute {
        /// Element name.
        element: String,
        /// Attribute name.
        attribute: String,
    },

    /// Invalid attribute value.
    #[error("invalid value '{value}' for attribute '{attribute}' on element '{element}'")]
    InvalidAttribute {
        /// Element name.
        element: String,
        /// Attribute name.
        attribute: String,
        /// Invalid value.
        value: String,
    },

    /// Invalid repository structure.
    #[error("invalid repository structure: {message}")]
    InvalidStructure {
        /// Error message.
        message: String,
    },

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// UTF-8 decoding error.
    #[error("UTF-8 error: {0}")]
    Utf8(#[from] std::str::Utf8Error),
}

/// Fatal error raised while resolving field types.
///
/// Every variant names the offending field so the source document can be
/// fixed without re-running under a debugger.
#[derive(Debug, Error)]
pub enum ResolveError {
    /// Declared type is neither a mapped primitive nor a code set.
    #[error("field '{field}' (tag {tag}) declares unknown type '{type_name}'")]
    UnknownType {
        /// Field name.
        field: String,
        /// Field tag.
        tag: u32,
        /// Declared type name.
        type_name: String,
    },

    /// Matched code set has no codes.
    #[error("error getting enum for field '{field}' (tag {tag}): code set '{code_set}' has no codes")]
    EmptyCodeSet {
        /// Field name.
        field: String,
        /// Field tag.
        tag: u32,
        /// Code set name.
        code_set: String,
    },

    /// Matched code set contains a code without a name.
    #[error(
        "error getting enum for field '{field}' (tag {tag}): code #{position} of code set '{code_set}' has no name"
    )]
    MalformedCodeSet {
        /// Field name.
        field: String,
        /// Field tag.
        tag: u32,
        /// Code set name.
        code_set: String,
        /// Zero-based position of the malformed code.
        position: usize,
    },

    /// Code set's underlying type is not in the mapping table.
    #[error(
        "error looking up code set on field '{field}' (id {tag}): underlying type '{underlying}' is not mapped; code set: {code_set_dump}"
    )]
    UnknownUnderlyingType {
        /// Field name.
        field: String,
        /// Field tag.
        tag: u32,
        /// Underlying type of the code set.
        underlying: String,
        /// Attribute dump of the offending code set.
        code_set_dump: String,
    },

    /// Two fields share the same name and would collide in the output map.
    #[error("duplicate field name '{name}': tags {first_tag} and {tag}")]
    DuplicateFieldName {
        /// Field name.
        name: String,
        /// Tag of the first field with this name.
        first_tag: u32,
        /// Tag of the colliding field.
        tag: u32,
    },
}

impl ParseError {
    /// Creates a missing attribute error.
    pub fn missing_attr(element: impl Into<String>, attribute: impl Into<String>) -> Self {
        Self::MissingAttribute {
            element: element.into(),
            attribute: attribute.into(),
        }
    }

    /// Creates an invalid attribute error.
    pub fn invalid_attr(
        element: impl Into<String>,
        attribute: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        Self::InvalidAttribute {
            element: element.into(),
            attribute: attribute.into(),
            value: value.into(),
        }
    }
}

impl ResolveError {
    /// Returns the name of the field the error refers to.
    #[must_use]
    pub fn field_name(&self) -> &str {
        match self {
            Self::UnknownType { field, .. }
            | Self::EmptyCodeSet { field, .. }
            | Self::MalformedCodeSet { field, .. }
            | Self::UnknownUnderlyingType { field, .. } => field,
            Self::DuplicateFieldName { name, .. } => name,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_type_message_names_field_and_type() {
        let err = ResolveError::UnknownType {
            field: "Side".to_string(),
            tag: 54,
            type_name: "Bogus".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("Side"));
        assert!(msg.contains("Bogus"));
        assert!(msg.contains("54"));
        assert_eq!(err.field_name(), "Side");
    }

    #[test]
    fn test_missing_attr_helper() {
        let err = ParseError::missing_attr("field", "type");
        assert_eq!(
            err.to_string(),
            "missing required attribute 'type' on element 'field'"
        );
    }
}
