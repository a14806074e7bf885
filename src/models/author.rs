use std::fmt;

use chrono::NaiveDate;

use crate::error::ValidationError;

use super::{generate_id, require_text};

/// A person credited on one or more books. Two authors may share a name; the
/// id is what tells them apart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Author {
    id: String,
    name: String,
    birth_date: Option<NaiveDate>,
    biography: Option<String>,
}

impl Author {
    /// Create an author with a freshly generated id.
    pub fn new(name: &str) -> Result<Self, ValidationError> {
        Self::with_id(generate_id(), name)
    }

    /// Rebuild an author whose id is already known, e.g. when reading rows.
    pub fn with_id(id: impl Into<String>, name: &str) -> Result<Self, ValidationError> {
        Ok(Self {
            id: id.into(),
            name: require_text(name, ValidationError::EmptyAuthorName)?,
            birth_date: None,
            biography: None,
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: &str) -> Result<(), ValidationError> {
        self.name = require_text(name, ValidationError::EmptyAuthorName)?;
        Ok(())
    }

    pub fn birth_date(&self) -> Option<NaiveDate> {
        self.birth_date
    }

    pub fn set_birth_date(&mut self, birth_date: Option<NaiveDate>) {
        self.birth_date = birth_date;
    }

    pub fn biography(&self) -> Option<&str> {
        self.biography.as_deref()
    }

    pub fn set_biography(&mut self, biography: Option<String>) {
        self.biography = biography;
    }
}

impl fmt::Display for Author {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}
