//! Narrow storage interface for the repository object that owns a DOI.
//!
//! The DOI client never talks to a content store directly. Callers hand it
//! something implementing [`EntityFields`], and the entity-bound actions
//! read the current DOI from (and write the minted DOI back to) a named
//! field.

use std::collections::HashMap;

/// Field-level access to a repository object.
pub trait EntityFields: Send + Sync {
    /// Entity type identifier (e.g. `node`, `media`).
    fn entity_type(&self) -> &str;

    /// Entity identifier, used in log messages and audit events.
    fn entity_id(&self) -> String;

    /// Reads a field value, `None` if the field is absent.
    fn get_field(&self, name: &str) -> Option<String>;

    /// Writes a field value.
    fn set_field(&mut self, name: &str, value: &str);

    /// Reads a field, treating a blank value as absent.
    fn non_empty_field(&self, name: &str) -> Option<String> {
        self.get_field(name)
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    }
}

/// In-memory entity, for tests and one-shot tools.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InMemoryEntity {
    entity_type: String,
    id: String,
    fields: HashMap<String, String>,
}

impl InMemoryEntity {
    /// Creates an entity with no fields.
    ///
    /// # Examples
    ///
    /// ```
    /// use doi_core::{EntityFields, InMemoryEntity};
    ///
    /// let mut node = InMemoryEntity::new("node", "42");
    /// node.set_field("field_doi", "10.5072/ABCD-1234");
    /// assert_eq!(node.get_field("field_doi").as_deref(), Some("10.5072/ABCD-1234"));
    /// ```
    #[must_use]
    pub fn new(entity_type: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            entity_type: entity_type.into(),
            id: id.into(),
            fields: HashMap::new(),
        }
    }

    /// Adds a field value.
    #[must_use]
    pub fn with_field(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.fields.insert(name.into(), value.into());
        self
    }
}

impl EntityFields for InMemoryEntity {
    fn entity_type(&self) -> &str {
        &self.entity_type
    }

    fn entity_id(&self) -> String {
        self.id.clone()
    }

    fn get_field(&self, name: &str) -> Option<String> {
        self.fields.get(name).cloned()
    }

    fn set_field(&mut self, name: &str, value: &str) {
        self.fields.insert(name.to_string(), value.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_field_is_none() {
        let entity = InMemoryEntity::new("node", "1");
        assert_eq!(entity.get_field("field_doi"), None);
        assert_eq!(entity.non_empty_field("field_doi"), None);
    }

    #[test]
    fn test_blank_field_is_absent() {
        let entity = InMemoryEntity::new("node", "1").with_field("field_doi", "  ");
        assert_eq!(entity.get_field("field_doi").as_deref(), Some("  "));
        assert_eq!(entity.non_empty_field("field_doi"), None);
    }

    #[test]
    fn test_set_field_overwrites() {
        let mut entity = InMemoryEntity::new("media", "7").with_field("field_doi", "old");
        entity.set_field("field_doi", "new");
        assert_eq!(entity.get_field("field_doi").as_deref(), Some("new"));
        assert_eq!(entity.entity_type(), "media");
        assert_eq!(entity.entity_id(), "7");
    }
}
