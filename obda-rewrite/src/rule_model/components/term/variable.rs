//! This module defines [Variable].

use std::{fmt::Display, sync::Arc};

/// Variable
///
/// A placeholder identified by its name.
/// Two variables are equal if they have the same name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Variable {
    /// Name of the variable
    name: Arc<str>,
}

impl Variable {
    /// Create a new [Variable].
    pub fn new(name: &str) -> Self {
        Self {
            name: Arc::from(name),
        }
    }

    /// Return the name of this variable.
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl From<&str> for Variable {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl Display for Variable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "?{}", self.name)
    }
}
