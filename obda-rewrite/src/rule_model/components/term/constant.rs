//! This module defines constant terms, [UriConstant] and [ValueConstant].

use std::{fmt::Display, sync::Arc};

use strum_macros::{EnumIter, EnumString};

/// Datatype of a [ValueConstant]
#[derive(
    Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Default, EnumString, EnumIter,
)]
pub enum ValueType {
    /// Untyped literal, possibly with a language tag
    #[default]
    #[strum(serialize = "http://www.w3.org/2000/01/rdf-schema#Literal")]
    Literal,
    /// String
    #[strum(serialize = "http://www.w3.org/2001/XMLSchema#string")]
    String,
    /// Integer number
    #[strum(serialize = "http://www.w3.org/2001/XMLSchema#integer")]
    Integer,
    /// Decimal number
    #[strum(serialize = "http://www.w3.org/2001/XMLSchema#decimal")]
    Decimal,
    /// Double precision floating point number
    #[strum(serialize = "http://www.w3.org/2001/XMLSchema#double")]
    Double,
    /// Boolean
    #[strum(serialize = "http://www.w3.org/2001/XMLSchema#boolean")]
    Boolean,
    /// Date and time
    #[strum(serialize = "http://www.w3.org/2001/XMLSchema#dateTime")]
    DateTime,
}

impl ValueType {
    /// Return the iri of this datatype.
    pub fn iri(&self) -> &'static str {
        match self {
            ValueType::Literal => "http://www.w3.org/2000/01/rdf-schema#Literal",
            ValueType::String => "http://www.w3.org/2001/XMLSchema#string",
            ValueType::Integer => "http://www.w3.org/2001/XMLSchema#integer",
            ValueType::Decimal => "http://www.w3.org/2001/XMLSchema#decimal",
            ValueType::Double => "http://www.w3.org/2001/XMLSchema#double",
            ValueType::Boolean => "http://www.w3.org/2001/XMLSchema#boolean",
            ValueType::DateTime => "http://www.w3.org/2001/XMLSchema#dateTime",
        }
    }
}

/// Constant identified by an IRI
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct UriConstant {
    iri: Arc<str>,
}

impl UriConstant {
    /// Create a new [UriConstant].
    pub fn new(iri: &str) -> Self {
        Self {
            iri: Arc::from(iri),
        }
    }

    /// Return the iri of this constant.
    pub fn iri(&self) -> &str {
        &self.iri
    }
}

impl Display for UriConstant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "<{}>", self.iri)
    }
}

/// Constant value
///
/// Consists of a lexical value, a [ValueType]
/// and an optional language tag.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ValueConstant {
    /// Lexical representation of the value
    value: Arc<str>,
    /// Datatype
    value_type: ValueType,
    /// Language tag
    language: Option<Arc<str>>,
}

impl ValueConstant {
    /// Create a new [ValueConstant].
    pub fn new(value: &str, value_type: ValueType) -> Self {
        Self {
            value: Arc::from(value),
            value_type,
            language: None,
        }
    }

    /// Create a new language tagged [ValueConstant].
    ///
    /// Language tagged values are always of type [ValueType::Literal].
    pub fn language_tagged(value: &str, language: &str) -> Self {
        Self {
            value: Arc::from(value),
            value_type: ValueType::Literal,
            language: Some(Arc::from(language)),
        }
    }

    /// Return the lexical value.
    pub fn value(&self) -> &str {
        &self.value
    }

    /// Return the datatype.
    pub fn value_type(&self) -> ValueType {
        self.value_type
    }

    /// Return the language tag, if present.
    pub fn language(&self) -> Option<&str> {
        self.language.as_deref()
    }
}

impl From<&str> for ValueConstant {
    fn from(value: &str) -> Self {
        Self::new(value, ValueType::String)
    }
}

impl From<i64> for ValueConstant {
    fn from(value: i64) -> Self {
        Self::new(&value.to_string(), ValueType::Integer)
    }
}

impl From<bool> for ValueConstant {
    fn from(value: bool) -> Self {
        Self::new(&value.to_string(), ValueType::Boolean)
    }
}

impl Display for ValueConstant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "\"{}\"", self.value)?;

        match (&self.language, self.value_type) {
            (Some(language), _) => write!(f, "@{language}"),
            (None, ValueType::String) => Ok(()),
            (None, value_type) => write!(f, "^^<{}>", value_type.iri()),
        }
    }
}
