//! Schema construction from data-model declarations.
//!
//! A [`TypeDecl`] describes a record type as an ordered list of named, typed
//! fields. [`SchemaFactory::make`] converts the declaration into a [`Schema`]
//! tree, substituting `$ref` pointers for field types that match a registered
//! named component and refusing to expand inline cycles.

use crate::components::ComponentsRegistry;
use crate::error::{Error, Result};
use indexmap::IndexMap;
use log::debug;
use serde::{Deserialize, Serialize};

/// OpenAPI Schema object
///
/// A single node in the schema tree: a primitive, an object with named
/// properties, an array, or a `$ref` pointer to a named component.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Schema {
    /// The type of the schema (string, integer, object, array, ...)
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub schema_type: Option<String>,
    /// Properties for object types, declaration order preserved
    #[serde(skip_serializing_if = "Option::is_none")]
    pub properties: Option<IndexMap<String, Schema>>,
    /// Required property names for object types
    #[serde(skip_serializing_if = "Option::is_none")]
    pub required: Option<Vec<String>>,
    /// Items schema for array types
    #[serde(skip_serializing_if = "Option::is_none")]
    pub items: Option<Box<Schema>>,
    /// Format for primitive types (e.g., "int64", "date-time")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
    /// Reference to a named component schema
    #[serde(rename = "$ref", skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
}

impl Schema {
    fn empty() -> Self {
        Self {
            schema_type: None,
            properties: None,
            required: None,
            items: None,
            format: None,
            reference: None,
        }
    }

    fn primitive(schema_type: &str, format: Option<&str>) -> Self {
        let mut schema = Self::empty();
        schema.schema_type = Some(schema_type.to_string());
        schema.format = format.map(|f| f.to_string());
        schema
    }

    /// A plain string schema
    pub fn string() -> Self {
        Self::primitive("string", None)
    }

    /// An integer schema (int64)
    pub fn integer() -> Self {
        Self::primitive("integer", Some("int64"))
    }

    /// A number schema (double)
    pub fn number() -> Self {
        Self::primitive("number", Some("double"))
    }

    /// A boolean schema
    pub fn boolean() -> Self {
        Self::primitive("boolean", None)
    }

    /// A string schema with date format
    pub fn date() -> Self {
        Self::primitive("string", Some("date"))
    }

    /// A string schema with date-time format
    pub fn date_time() -> Self {
        Self::primitive("string", Some("date-time"))
    }

    /// An array schema over the given item schema
    pub fn array(items: Schema) -> Self {
        let mut schema = Self::empty();
        schema.schema_type = Some("array".to_string());
        schema.items = Some(Box::new(items));
        schema
    }

    /// An object schema with named properties and required flags
    pub fn object(properties: IndexMap<String, Schema>, required: Vec<String>) -> Self {
        let mut schema = Self::empty();
        schema.schema_type = Some("object".to_string());
        schema.properties = Some(properties);
        schema.required = if required.is_empty() {
            None
        } else {
            Some(required)
        };
        schema
    }

    /// An object schema with no known structure, used as the unresolved fallback
    pub fn untyped_object() -> Self {
        let mut schema = Self::empty();
        schema.schema_type = Some("object".to_string());
        schema
    }

    /// A `$ref` pointer to the named component schema
    pub fn reference(name: &str) -> Self {
        let mut schema = Self::empty();
        schema.reference = Some(format!("#/components/schemas/{}", name));
        schema
    }

    /// Whether this schema is a `$ref` pointer
    pub fn is_reference(&self) -> bool {
        self.reference.is_some()
    }
}

/// The type of a single record field
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldKind {
    /// Plain string
    String,
    /// Integer (int64)
    Integer,
    /// Floating-point number (double)
    Number,
    /// Boolean
    Boolean,
    /// Calendar date
    Date,
    /// Date with time
    DateTime,
    /// Reference to a record type declared (or to be declared) under this name
    Named(String),
    /// Nested record expanded inline
    Inline(TypeDecl),
    /// Array of another field type
    Array(Box<FieldKind>),
}

impl FieldKind {
    /// An array over the given element kind
    pub fn array(items: FieldKind) -> Self {
        FieldKind::Array(Box::new(items))
    }

    /// A reference to a named record type
    pub fn named(name: impl Into<String>) -> Self {
        FieldKind::Named(name.into())
    }
}

/// One field of a record declaration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDecl {
    /// Field name
    pub name: String,
    /// Field type
    pub kind: FieldKind,
    /// Whether the field is required (default true)
    pub required: bool,
}

/// A record-type declaration: an ordered list of named, typed fields
///
/// Replaces language-level type introspection with an explicit value; the
/// declaration's name doubles as the component name when registered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeDecl {
    /// Record type name
    pub name: String,
    /// Fields in declaration order
    pub fields: Vec<FieldDecl>,
}

impl TypeDecl {
    /// Create an empty declaration with the given type name
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fields: Vec::new(),
        }
    }

    /// Append a required field
    pub fn field(mut self, name: impl Into<String>, kind: FieldKind) -> Self {
        self.fields.push(FieldDecl {
            name: name.into(),
            kind,
            required: true,
        });
        self
    }

    /// Append an optional field
    pub fn optional_field(mut self, name: impl Into<String>, kind: FieldKind) -> Self {
        self.fields.push(FieldDecl {
            name: name.into(),
            kind,
            required: false,
        });
        self
    }
}

/// Schema factory - converts record declarations to schema trees
pub struct SchemaFactory;

impl SchemaFactory {
    /// Build an object schema from a record declaration.
    ///
    /// Field types naming a component registered in `components` (or naming
    /// the declaring type itself) resolve to `$ref` pointers; unregistered
    /// names degrade to an untyped object. Inline records are expanded
    /// recursively, and an inline expansion that revisits a type already
    /// being expanded is a fatal [`Error::CyclicSchema`].
    pub fn make(decl: &TypeDecl, components: &ComponentsRegistry) -> Result<Schema> {
        Self::make_as(&decl.name, decl, components)
    }

    /// Build an object schema for a declaration that will be registered under
    /// a different component name. Self-references resolve to `$ref` pointers
    /// at the registration name, not the declaration's own type name.
    pub fn make_as(
        registered_name: &str,
        decl: &TypeDecl,
        components: &ComponentsRegistry,
    ) -> Result<Schema> {
        let mut in_progress = Vec::new();
        Self::make_record(decl, registered_name, components, &mut in_progress)
    }

    fn make_record(
        decl: &TypeDecl,
        registered_name: &str,
        components: &ComponentsRegistry,
        in_progress: &mut Vec<(String, String)>,
    ) -> Result<Schema> {
        debug!("Building schema for record type: {}", decl.name);

        if decl.name.is_empty() {
            return Err(Error::Declaration("record type name is empty".to_string()));
        }
        if in_progress.iter().any(|(name, _)| name == &decl.name) {
            return Err(Error::CyclicSchema {
                type_name: decl.name.clone(),
            });
        }

        in_progress.push((decl.name.clone(), registered_name.to_string()));

        let mut properties = IndexMap::new();
        let mut required = Vec::new();

        for field in &decl.fields {
            if field.name.is_empty() {
                in_progress.pop();
                return Err(Error::Declaration(format!(
                    "record type {} has a field with an empty name",
                    decl.name
                )));
            }
            let field_schema = match Self::field_schema(&field.kind, components, in_progress) {
                Ok(schema) => schema,
                Err(err) => {
                    in_progress.pop();
                    return Err(err);
                }
            };
            if properties.insert(field.name.clone(), field_schema).is_some() {
                in_progress.pop();
                return Err(Error::Declaration(format!(
                    "record type {} declares field {} more than once",
                    decl.name, field.name
                )));
            }
            if field.required {
                required.push(field.name.clone());
            }
        }

        in_progress.pop();
        Ok(Schema::object(properties, required))
    }

    fn field_schema(
        kind: &FieldKind,
        components: &ComponentsRegistry,
        in_progress: &mut Vec<(String, String)>,
    ) -> Result<Schema> {
        let schema = match kind {
            FieldKind::String => Schema::string(),
            FieldKind::Integer => Schema::integer(),
            FieldKind::Number => Schema::number(),
            FieldKind::Boolean => Schema::boolean(),
            FieldKind::Date => Schema::date(),
            FieldKind::DateTime => Schema::date_time(),
            FieldKind::Named(name) => {
                // A name on the in-progress stack is a type currently being
                // declared; it resolves through the component name it is
                // being registered under.
                if components.contains_schema(name) {
                    Schema::reference(name)
                } else if let Some((_, registered)) =
                    in_progress.iter().find(|(decl_name, _)| decl_name == name)
                {
                    Schema::reference(registered)
                } else {
                    debug!("Unresolved named type: {}, using object placeholder", name);
                    Schema::untyped_object()
                }
            }
            FieldKind::Inline(decl) => {
                Self::make_record(decl, &decl.name, components, in_progress)?
            }
            FieldKind::Array(items) => {
                Schema::array(Self::field_schema(items, components, in_progress)?)
            }
        };

        Ok(schema)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn empty_registry() -> ComponentsRegistry {
        ComponentsRegistry::new()
    }

    #[test]
    fn test_primitive_fields() {
        let decl = TypeDecl::new("Todo")
            .field("id", FieldKind::Integer)
            .field("done", FieldKind::Boolean)
            .field("text", FieldKind::String)
            .field("score", FieldKind::Number)
            .field("deadline", FieldKind::Date);

        let schema = SchemaFactory::make(&decl, &empty_registry()).unwrap();

        assert_eq!(schema.schema_type, Some("object".to_string()));
        let properties = schema.properties.as_ref().unwrap();
        assert_eq!(properties.len(), 5);
        assert_eq!(properties["id"].schema_type, Some("integer".to_string()));
        assert_eq!(properties["id"].format, Some("int64".to_string()));
        assert_eq!(properties["done"].schema_type, Some("boolean".to_string()));
        assert_eq!(properties["text"].schema_type, Some("string".to_string()));
        assert_eq!(properties["score"].format, Some("double".to_string()));
        assert_eq!(properties["deadline"].schema_type, Some("string".to_string()));
        assert_eq!(properties["deadline"].format, Some("date".to_string()));
    }

    #[test]
    fn test_property_order_matches_declaration_order() {
        let decl = TypeDecl::new("Todo")
            .field("id", FieldKind::Integer)
            .field("done", FieldKind::Boolean)
            .field("text", FieldKind::String);

        let schema = SchemaFactory::make(&decl, &empty_registry()).unwrap();
        let names: Vec<_> = schema.properties.unwrap().keys().cloned().collect();
        assert_eq!(names, vec!["id", "done", "text"]);
    }

    #[test]
    fn test_required_flags() {
        let decl = TypeDecl::new("Todo")
            .field("id", FieldKind::Integer)
            .optional_field("note", FieldKind::String);

        let schema = SchemaFactory::make(&decl, &empty_registry()).unwrap();
        let required = schema.required.unwrap();
        assert_eq!(required, vec!["id"]);
    }

    #[test]
    fn test_array_field() {
        let decl = TypeDecl::new("TodoList")
            .field("limit", FieldKind::Integer)
            .field("items", FieldKind::array(FieldKind::String));

        let schema = SchemaFactory::make(&decl, &empty_registry()).unwrap();
        let properties = schema.properties.unwrap();
        let items_schema = &properties["items"];
        assert_eq!(items_schema.schema_type, Some("array".to_string()));
        assert_eq!(
            items_schema.items.as_ref().unwrap().schema_type,
            Some("string".to_string())
        );
    }

    #[test]
    fn test_named_field_resolves_to_reference_when_registered() {
        let mut registry = ComponentsRegistry::new();
        let todo = TypeDecl::new("Todo").field("id", FieldKind::Integer);
        let todo_schema = SchemaFactory::make(&todo, &registry).unwrap();
        registry.register_schema("Todo", todo_schema);

        let list = TypeDecl::new("TodoList")
            .field("items", FieldKind::array(FieldKind::named("Todo")));
        let schema = SchemaFactory::make(&list, &registry).unwrap();

        let properties = schema.properties.unwrap();
        let items = properties["items"].items.as_ref().unwrap();
        assert_eq!(
            items.reference,
            Some("#/components/schemas/Todo".to_string())
        );
    }

    #[test]
    fn test_named_field_unregistered_falls_back_to_object() {
        let decl = TypeDecl::new("Todo").field("owner", FieldKind::named("User"));
        let schema = SchemaFactory::make(&decl, &empty_registry()).unwrap();

        let properties = schema.properties.unwrap();
        assert_eq!(properties["owner"].schema_type, Some("object".to_string()));
        assert!(properties["owner"].reference.is_none());
    }

    #[test]
    fn test_self_reference_resolves_through_own_name() {
        let decl = TypeDecl::new("Node")
            .field("value", FieldKind::Integer)
            .optional_field("next", FieldKind::named("Node"));

        let schema = SchemaFactory::make(&decl, &empty_registry()).unwrap();

        let properties = schema.properties.unwrap();
        assert_eq!(
            properties["next"].reference,
            Some("#/components/schemas/Node".to_string())
        );
    }

    #[test]
    fn test_self_reference_under_override_name() {
        let decl = TypeDecl::new("Node")
            .field("value", FieldKind::Integer)
            .optional_field("next", FieldKind::named("Node"));

        let schema = SchemaFactory::make_as("TreeNode", &decl, &empty_registry()).unwrap();

        // The component will live under the registration name, so the
        // self-reference must point there.
        let properties = schema.properties.unwrap();
        assert_eq!(
            properties["next"].reference,
            Some("#/components/schemas/TreeNode".to_string())
        );
    }

    #[test]
    fn test_inline_record() {
        let decl = TypeDecl::new("Todo").field(
            "owner",
            FieldKind::Inline(TypeDecl::new("Owner").field("name", FieldKind::String)),
        );

        let schema = SchemaFactory::make(&decl, &empty_registry()).unwrap();

        let properties = schema.properties.unwrap();
        let owner = &properties["owner"];
        assert_eq!(owner.schema_type, Some("object".to_string()));
        let owner_props = owner.properties.as_ref().unwrap();
        assert_eq!(owner_props["name"].schema_type, Some("string".to_string()));
    }

    #[test]
    fn test_inline_cycle_is_fatal() {
        let decl = TypeDecl::new("Node").field(
            "next",
            FieldKind::Inline(TypeDecl::new("Node").field("value", FieldKind::Integer)),
        );

        let result = SchemaFactory::make(&decl, &empty_registry());
        match result {
            Err(Error::CyclicSchema { type_name }) => assert_eq!(type_name, "Node"),
            other => panic!("expected cyclic schema error, got {:?}", other),
        }
    }

    #[test]
    fn test_empty_type_name_is_declaration_error() {
        let decl = TypeDecl::new("").field("id", FieldKind::Integer);
        assert!(matches!(
            SchemaFactory::make(&decl, &empty_registry()),
            Err(Error::Declaration(_))
        ));
    }

    #[test]
    fn test_duplicate_field_name_is_declaration_error() {
        let decl = TypeDecl::new("Todo")
            .field("id", FieldKind::Integer)
            .field("id", FieldKind::String);
        assert!(matches!(
            SchemaFactory::make(&decl, &empty_registry()),
            Err(Error::Declaration(_))
        ));
    }

    #[test]
    fn test_make_is_idempotent() {
        let decl = TypeDecl::new("Todo")
            .field("id", FieldKind::Integer)
            .field("tags", FieldKind::array(FieldKind::String));

        let registry = empty_registry();
        let first = SchemaFactory::make(&decl, &registry).unwrap();
        let second = SchemaFactory::make(&decl, &registry).unwrap();
        assert_eq!(first, second);
    }
}
