//! Components registry and reference resolution.
//!
//! Named schemas and security schemes live in two independent namespaces.
//! The registry only grows during the declaration phase; re-registering a name
//! overwrites the previous entry (last write wins, first registration keeps
//! its position in the output).

use crate::definitions::{Components, SecurityScheme};
use crate::schema::Schema;
use indexmap::IndexMap;
use log::debug;

/// A schema-like value entering an operation: either an inline schema or a
/// reference token naming a registered component
#[derive(Debug, Clone)]
pub enum SchemaContent {
    /// An inline schema, emitted unchanged
    Inline(Schema),
    /// The name of a component schema, resolved to a `$ref` at registration time
    Named(String),
}

impl From<Schema> for SchemaContent {
    fn from(schema: Schema) -> Self {
        SchemaContent::Inline(schema)
    }
}

impl From<&str> for SchemaContent {
    fn from(name: &str) -> Self {
        SchemaContent::Named(name.to_string())
    }
}

impl From<String> for SchemaContent {
    fn from(name: String) -> Self {
        SchemaContent::Named(name)
    }
}

/// Registry of named, reusable schema and security-scheme definitions
#[derive(Debug, Default)]
pub struct ComponentsRegistry {
    schemas: IndexMap<String, Schema>,
    security_schemes: IndexMap<String, SecurityScheme>,
}

impl ComponentsRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a schema under a name, overwriting any previous entry
    pub fn register_schema(&mut self, name: impl Into<String>, schema: Schema) {
        let name = name.into();
        if self.schemas.contains_key(&name) {
            debug!("Overwriting schema component: {}", name);
        }
        self.schemas.insert(name, schema);
    }

    /// Register a security scheme under a name, overwriting any previous entry
    pub fn register_security_scheme(&mut self, name: impl Into<String>, scheme: SecurityScheme) {
        let name = name.into();
        if self.security_schemes.contains_key(&name) {
            debug!("Overwriting security scheme component: {}", name);
        }
        self.security_schemes.insert(name, scheme);
    }

    /// Whether a schema is registered under the name
    pub fn contains_schema(&self, name: &str) -> bool {
        self.schemas.contains_key(name)
    }

    /// Look up a registered schema by name
    pub fn schema(&self, name: &str) -> Option<&Schema> {
        self.schemas.get(name)
    }

    /// Look up a registered security scheme by name
    pub fn security_scheme(&self, name: &str) -> Option<&SecurityScheme> {
        self.security_schemes.get(name)
    }

    /// Resolve a schema-like value entering an operation.
    ///
    /// Inline schemas pass through unchanged. A name that matches a registered
    /// schema becomes a `$ref` pointer to it; an unmatched name degrades to an
    /// untyped object rather than failing, since the referenced schema may
    /// legitimately not need a named component.
    pub fn resolve(&self, content: SchemaContent) -> Schema {
        match content {
            SchemaContent::Inline(schema) => schema,
            SchemaContent::Named(name) => {
                if self.contains_schema(&name) {
                    Schema::reference(&name)
                } else {
                    debug!("Unresolved schema reference: {}, emitting placeholder", name);
                    Schema::untyped_object()
                }
            }
        }
    }

    /// Export both namespaces as a components block, or `None` when empty
    pub fn to_components(&self) -> Option<Components> {
        if self.schemas.is_empty() && self.security_schemes.is_empty() {
            return None;
        }

        Some(Components {
            schemas: if self.schemas.is_empty() {
                None
            } else {
                Some(self.schemas.clone())
            },
            security_schemes: if self.security_schemes.is_empty() {
                None
            } else {
                Some(self.security_schemes.clone())
            },
        })
    }
}
