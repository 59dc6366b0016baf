//! Operation registry - accumulates per-handler operation metadata.
//!
//! Metadata arrives one declarative call at a time, usually long before the
//! host framework's route table exists. The registry keys every accumulator
//! by an opaque [`HandlerId`] and creates records lazily, so declarations can
//! run in any order. Nothing is validated across calls; the build phase reads
//! each record exactly once.

use crate::components::{ComponentsRegistry, SchemaContent};
use crate::definitions::{
    ExternalDocumentation, MediaType, Operation, Parameter, ParameterLocation, RequestBody,
    Response,
};
use crate::schema::Schema;
use indexmap::IndexMap;
use std::collections::HashMap;

/// Opaque, stable key identifying a route's handling logic.
///
/// Allocated by [`OperationRegistry::allocate`]; never derived from the
/// handler itself and never introspected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HandlerId(u64);

/// Mutable accumulator for one operation's metadata
#[derive(Debug, Clone, Default)]
pub struct OperationBuilder {
    /// Explicit operation ID, synthesized at build time when unset
    pub operation_id: Option<String>,
    /// Operation summary
    pub summary: Option<String>,
    /// Operation description
    pub description: Option<String>,
    /// External documentation link
    pub external_docs: Option<ExternalDocumentation>,
    /// Tags in declaration order, no de-duplication
    pub tags: Vec<String>,
    /// Declared parameters, in order
    pub parameters: Vec<Parameter>,
    /// Responses keyed by status code, last write per status wins
    pub responses: IndexMap<String, Response>,
    /// Request body, last write wins
    pub request_body: Option<RequestBody>,
    /// Security requirements, one mapping per `secured` call
    pub security: Vec<IndexMap<String, Vec<String>>>,
    /// Deprecation flag
    pub deprecated: bool,
}

impl OperationBuilder {
    /// Set the explicit operation ID
    pub fn name(&mut self, value: impl Into<String>) {
        self.operation_id = Some(value.into());
    }

    /// Set summary and optionally description
    pub fn describe(&mut self, summary: impl Into<String>, description: Option<&str>) {
        self.summary = Some(summary.into());
        if let Some(text) = description {
            self.description = Some(text.to_string());
        }
    }

    /// Attach an external documentation link
    pub fn document(&mut self, url: impl Into<String>, description: Option<&str>) {
        self.external_docs = Some(ExternalDocumentation {
            url: url.into(),
            description: description.map(|d| d.to_string()),
        });
    }

    /// Append tags
    pub fn tag<I, S>(&mut self, names: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for name in names {
            self.tags.push(name.into());
        }
    }

    /// Mark the operation deprecated (idempotent)
    pub fn deprecate(&mut self) {
        self.deprecated = true;
    }

    /// Set the request body, replacing any previous one
    pub fn body(&mut self, schema: Schema, required: bool, description: Option<&str>) {
        self.request_body = Some(RequestBody {
            description: description.map(|d| d.to_string()),
            required,
            content: MediaType::json(schema),
        });
    }

    /// Append a parameter
    pub fn parameter(
        &mut self,
        name: impl Into<String>,
        schema: Schema,
        location: ParameterLocation,
        required: bool,
        description: Option<&str>,
    ) {
        self.parameters.push(Parameter {
            name: name.into(),
            location: location.as_str().to_string(),
            // Path parameters are always required.
            required: required || location == ParameterLocation::Path,
            schema,
            description: description.map(|d| d.to_string()),
        });
    }

    /// Insert a response under a status code, replacing any previous one
    pub fn response(&mut self, status: u16, content: Option<Schema>, description: Option<&str>) {
        self.responses.insert(
            status.to_string(),
            Response {
                description: description.unwrap_or("Successful response").to_string(),
                content: content.map(MediaType::json),
            },
        );
    }

    /// Append one security-requirement mapping
    pub fn secured(&mut self, requirement: IndexMap<String, Vec<String>>) {
        self.security.push(requirement);
    }

    /// Finalize into an Operation document node
    pub fn build(self) -> Operation {
        Operation {
            operation_id: self.operation_id,
            summary: self.summary,
            description: self.description,
            tags: if self.tags.is_empty() {
                None
            } else {
                Some(self.tags)
            },
            external_docs: self.external_docs,
            parameters: if self.parameters.is_empty() {
                None
            } else {
                Some(self.parameters)
            },
            request_body: self.request_body,
            responses: self.responses,
            security: if self.security.is_empty() {
                None
            } else {
                Some(self.security)
            },
            deprecated: if self.deprecated { Some(true) } else { None },
        }
    }
}

/// Keyed accumulator of operation records
#[derive(Debug, Default)]
pub struct OperationRegistry {
    next_id: u64,
    operations: HashMap<HandlerId, OperationBuilder>,
}

impl OperationRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate a fresh handler identity
    pub fn allocate(&mut self) -> HandlerId {
        let id = HandlerId(self.next_id);
        self.next_id += 1;
        id
    }

    /// Access the record for a handler, creating it on first use
    pub fn entry(&mut self, handler: HandlerId) -> &mut OperationBuilder {
        self.operations.entry(handler).or_default()
    }

    /// Look up a record without creating one
    pub fn get(&self, handler: HandlerId) -> Option<&OperationBuilder> {
        self.operations.get(&handler)
    }

    /// Mutable lookup without creating a record
    pub fn get_mut(&mut self, handler: HandlerId) -> Option<&mut OperationBuilder> {
        self.operations.get_mut(&handler)
    }

    /// Whether a record exists for the handler
    pub fn contains(&self, handler: HandlerId) -> bool {
        self.operations.contains_key(&handler)
    }
}

/// Chaining facade over one operation record.
///
/// Every schema-like value entering through this type is resolved against the
/// components registry first, so a registered name always becomes a `$ref`
/// without the call site knowing about it.
pub struct OperationEntry<'a> {
    builder: &'a mut OperationBuilder,
    components: &'a ComponentsRegistry,
}

impl<'a> OperationEntry<'a> {
    pub(crate) fn new(builder: &'a mut OperationBuilder, components: &'a ComponentsRegistry) -> Self {
        Self {
            builder,
            components,
        }
    }

    /// Set the explicit operation ID
    pub fn name(self, value: impl Into<String>) -> Self {
        self.builder.name(value);
        self
    }

    /// Set the operation summary
    pub fn summary(self, text: impl Into<String>) -> Self {
        self.builder.summary = Some(text.into());
        self
    }

    /// Set the operation description
    pub fn description(self, text: impl Into<String>) -> Self {
        self.builder.description = Some(text.into());
        self
    }

    /// Attach an external documentation link
    pub fn document(self, url: impl Into<String>, description: Option<&str>) -> Self {
        self.builder.document(url, description);
        self
    }

    /// Append tags
    pub fn tag<I, S>(self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.builder.tag(names);
        self
    }

    /// Mark the operation deprecated
    pub fn deprecate(self) -> Self {
        self.builder.deprecate();
        self
    }

    /// Set the request body; `content` may be an inline schema or a component name
    pub fn body(
        self,
        content: impl Into<SchemaContent>,
        required: bool,
        description: Option<&str>,
    ) -> Self {
        let schema = self.components.resolve(content.into());
        self.builder.body(schema, required, description);
        self
    }

    /// Append a parameter; `content` may be an inline schema or a component name
    pub fn parameter(
        self,
        name: impl Into<String>,
        content: impl Into<SchemaContent>,
        location: ParameterLocation,
        required: bool,
        description: Option<&str>,
    ) -> Self {
        let schema = self.components.resolve(content.into());
        self.builder
            .parameter(name, schema, location, required, description);
        self
    }

    /// Record a response with content under a status code
    pub fn response(
        self,
        status: u16,
        content: impl Into<SchemaContent>,
        description: Option<&str>,
    ) -> Self {
        let schema = self.components.resolve(content.into());
        self.builder.response(status, Some(schema), description);
        self
    }

    /// Record a content-less response under a status code
    pub fn response_empty(self, status: u16, description: Option<&str>) -> Self {
        self.builder.response(status, None, description);
        self
    }

    /// Append one security requirement; each entry maps a scheme name to its scopes
    pub fn secured<I, S>(self, requirements: I) -> Self
    where
        I: IntoIterator<Item = (S, Vec<String>)>,
        S: Into<String>,
    {
        let mut requirement = IndexMap::new();
        for (name, scopes) in requirements {
            requirement.insert(name.into(), scopes);
        }
        self.builder.secured(requirement);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_allocate_yields_distinct_ids() {
        let mut registry = OperationRegistry::new();
        let a = registry.allocate();
        let b = registry.allocate();
        assert_ne!(a, b);
    }

    #[test]
    fn test_entry_creates_lazily() {
        let mut registry = OperationRegistry::new();
        let handler = registry.allocate();

        assert!(!registry.contains(handler));
        registry.entry(handler).deprecate();
        assert!(registry.contains(handler));
        assert!(registry.get(handler).unwrap().deprecated);
    }

    #[test]
    fn test_deprecate_is_idempotent() {
        let mut registry = OperationRegistry::new();
        let handler = registry.allocate();
        registry.entry(handler).deprecate();
        registry.entry(handler).deprecate();
        assert!(registry.get(handler).unwrap().deprecated);
    }

    #[test]
    fn test_tags_preserve_insertion_order() {
        let mut builder = OperationBuilder::default();
        builder.tag(["write", "admin"]);
        builder.tag(["write"]);
        assert_eq!(builder.tags, vec!["write", "admin", "write"]);
    }

    #[test]
    fn test_response_last_write_wins() {
        let mut builder = OperationBuilder::default();
        builder.response(200, None, Some("first"));
        builder.response(200, Some(Schema::string()), Some("second"));

        assert_eq!(builder.responses.len(), 1);
        let response = &builder.responses["200"];
        assert_eq!(response.description, "second");
        assert!(response.content.is_some());
    }

    #[test]
    fn test_independent_mutations_commute() {
        let mut first = OperationBuilder::default();
        first.describe("Fetch a todo", None);
        first.response(200, None, Some("ok"));
        first.tag(["todo"]);

        let mut second = OperationBuilder::default();
        second.tag(["todo"]);
        second.response(200, None, Some("ok"));
        second.describe("Fetch a todo", None);

        assert_eq!(first.summary, second.summary);
        assert_eq!(first.tags, second.tags);
        assert_eq!(first.responses["200"].description, second.responses["200"].description);
    }

    #[test]
    fn test_path_parameter_forced_required() {
        let mut builder = OperationBuilder::default();
        builder.parameter(
            "todo_id",
            Schema::integer(),
            ParameterLocation::Path,
            false,
            None,
        );
        assert!(builder.parameters[0].required);
        assert_eq!(builder.parameters[0].location, "path");
    }

    #[test]
    fn test_build_omits_empty_collections() {
        let operation = OperationBuilder::default().build();
        assert!(operation.tags.is_none());
        assert!(operation.parameters.is_none());
        assert!(operation.security.is_none());
        assert!(operation.deprecated.is_none());
    }

    #[test]
    fn test_entry_resolves_named_content() {
        let mut components = ComponentsRegistry::new();
        components.register_schema("Todo", Schema::untyped_object());
        let mut builder = OperationBuilder::default();

        OperationEntry::new(&mut builder, &components).response(200, "Todo", None);

        let content = builder.responses["200"].content.as_ref().unwrap();
        let schema = &content["application/json"].schema;
        assert_eq!(
            schema.reference,
            Some("#/components/schemas/Todo".to_string())
        );
    }

    #[test]
    fn test_secured_appends_one_mapping_per_call() {
        let components = ComponentsRegistry::new();
        let mut builder = OperationBuilder::default();

        let entry = OperationEntry::new(&mut builder, &components);
        entry
            .secured([("TodoApiKey".to_string(), vec![])])
            .secured([("OAuth".to_string(), vec!["read".to_string()])]);

        assert_eq!(builder.security.len(), 2);
        assert_eq!(builder.security[0]["TodoApiKey"], Vec::<String>::new());
        assert_eq!(builder.security[1]["OAuth"], vec!["read"]);
    }
}
