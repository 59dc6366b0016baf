//! Specification builder - the one-shot assembly of the final document.
//!
//! The builder owns the components and operation registries plus the
//! configuration surface. Declarations accumulate during the host
//! application's startup phase; when the host finishes registering routes it
//! calls [`SpecificationBuilder::build`] (or [`SpecificationBuilder::finish`])
//! exactly once with its route table, and the resulting document is served
//! verbatim from then on.

use crate::components::ComponentsRegistry;
use crate::definitions::{
    Contact, Info, License, OpenApiDocument, ParameterLocation, PathItem, SecurityScheme, Tag,
};
use crate::error::Result;
use crate::operations::{HandlerId, OperationEntry, OperationRegistry};
use crate::routes::{ParamCast, RouteCollection};
use crate::schema::{Schema, SchemaFactory, TypeDecl};
use indexmap::{IndexMap, IndexSet};
use log::debug;

/// Recognized configuration options, all optional with stated defaults
#[derive(Debug, Clone)]
pub struct SpecConfig {
    /// API title, defaults to "API"
    pub title: String,
    /// API version, defaults to "1.0.0"
    pub version: String,
    /// API description
    pub description: Option<String>,
    /// Terms-of-service URL
    pub terms_of_service: Option<String>,
    /// Contact information
    pub contact: Option<Contact>,
    /// License information
    pub license: Option<License>,
    /// Mount path for the spec endpoint, defaults to "openapi.json"
    pub url: String,
}

impl Default for SpecConfig {
    fn default() -> Self {
        Self {
            title: "API".to_string(),
            version: "1.0.0".to_string(),
            description: None,
            terms_of_service: None,
            contact: None,
            license: None,
            url: "openapi.json".to_string(),
        }
    }
}

/// The precomputed spec endpoint: a mount path and the serialized JSON body.
///
/// The host framework mounts `path` and returns `body` verbatim with status
/// 200 for every request; no request-time computation happens here.
#[derive(Debug, Clone)]
pub struct SpecEndpoint {
    /// Path the host should mount the endpoint under
    pub path: String,
    /// Serialized document, served as the JSON response body
    pub body: String,
}

/// Orchestrates metadata accumulation and final document assembly
#[derive(Debug, Default)]
pub struct SpecificationBuilder {
    config: SpecConfig,
    components: ComponentsRegistry,
    operations: OperationRegistry,
    tags: IndexMap<String, Tag>,
}

impl SpecificationBuilder {
    /// Create a builder with default configuration
    pub fn new() -> Self {
        debug!("Initializing SpecificationBuilder");
        Self::default()
    }

    /// Create a builder from an explicit configuration
    pub fn with_config(config: SpecConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    /// Set the API title and version
    pub fn describe(&mut self, title: impl Into<String>, version: impl Into<String>) {
        self.config.title = title.into();
        self.config.version = version.into();
    }

    /// Set the API description
    pub fn description(&mut self, text: impl Into<String>) {
        self.config.description = Some(text.into());
    }

    /// Set the terms-of-service URL
    pub fn terms(&mut self, url: impl Into<String>) {
        self.config.terms_of_service = Some(url.into());
    }

    /// Set the contact block; each part is independently optional
    pub fn contact(&mut self, name: Option<&str>, url: Option<&str>, email: Option<&str>) {
        self.config.contact = Some(Contact {
            name: name.map(|v| v.to_string()),
            url: url.map(|v| v.to_string()),
            email: email.map(|v| v.to_string()),
        });
    }

    /// Set the license block
    pub fn license(&mut self, name: impl Into<String>, url: Option<&str>) {
        self.config.license = Some(License {
            name: name.into(),
            url: url.map(|v| v.to_string()),
        });
    }

    /// Set the mount path for the spec endpoint
    pub fn url(&mut self, path: impl Into<String>) {
        self.config.url = path.into();
    }

    /// Register a tag description ahead of build; operations referencing the
    /// tag by name pick the description up in the final tag list
    pub fn tag(&mut self, name: impl Into<String>, description: Option<&str>) {
        let name = name.into();
        self.tags.insert(
            name.clone(),
            Tag {
                name,
                description: description.map(|d| d.to_string()),
            },
        );
    }

    /// Register a record declaration as a named component schema, keyed by
    /// the declaration's own type name
    pub fn schema(&mut self, decl: &TypeDecl) -> Result<()> {
        self.schema_as(decl.name.clone(), decl)
    }

    /// Register a record declaration under an explicit component name
    pub fn schema_as(&mut self, name: impl Into<String>, decl: &TypeDecl) -> Result<()> {
        let name = name.into();
        let schema = SchemaFactory::make_as(&name, decl, &self.components)?;
        self.components.register_schema(name, schema);
        Ok(())
    }

    /// Register a named security scheme
    pub fn security_scheme(&mut self, name: impl Into<String>, scheme: SecurityScheme) {
        self.components.register_security_scheme(name, scheme);
    }

    /// Allocate a handler identity for a route's handling logic
    pub fn handler(&mut self) -> HandlerId {
        self.operations.allocate()
    }

    /// Access the accumulating operation record for a handler, creating it on
    /// first use; schema-like values pass through the reference resolver
    pub fn operation(&mut self, handler: HandlerId) -> OperationEntry<'_> {
        let Self {
            operations,
            components,
            ..
        } = self;
        OperationEntry::new(operations.entry(handler), components)
    }

    /// Read access to the components registry
    pub fn components(&self) -> &ComponentsRegistry {
        &self.components
    }

    /// Reconcile the accumulated registrations against the host's route table
    /// and assemble the final document.
    ///
    /// Designed to run exactly once, after all routes are registered and
    /// before the host starts serving. Undocumented routes and orphaned
    /// operation records are silently omitted.
    pub fn build(&mut self, routes: &RouteCollection) -> OpenApiDocument {
        debug!("Building OpenAPI document from {} routes", routes.routes.len());

        // Auto-tagging fallback: a grouping lends its name to operations that
        // declared no tags of their own.
        for blueprint in &routes.blueprints {
            for handler in &blueprint.handlers {
                if let Some(record) = self.operations.get_mut(*handler) {
                    if record.tags.is_empty() {
                        record.tags.push(blueprint.name.clone());
                    }
                }
            }
        }

        let mut paths: IndexMap<String, PathItem> = IndexMap::new();
        let mut seen_tags: IndexSet<String> = IndexSet::new();

        for route in &routes.routes {
            if route.synthetic {
                debug!("Skipping synthetic route: {}", route.name);
                continue;
            }

            let path = normalize_path(&route.path);

            for (method, handler) in route.dispatch.pairs() {
                let Some(record) = self.operations.get(handler) else {
                    continue;
                };
                let mut record = record.clone();

                if record.operation_id.is_none() {
                    record.operation_id = Some(format!(
                        "{}_{}",
                        method.as_str().to_ascii_lowercase(),
                        route.name
                    ));
                }

                // Path parameters declared on the route but not documented
                // explicitly are synthesized from the cast hint.
                for param in &route.parameters {
                    let declared = record
                        .parameters
                        .iter()
                        .any(|p| p.name == param.name && p.location == "path");
                    if !declared {
                        record.parameter(
                            param.name.clone(),
                            cast_schema(param.cast),
                            ParameterLocation::Path,
                            true,
                            None,
                        );
                    }
                }

                for tag in &record.tags {
                    seen_tags.insert(tag.clone());
                }

                paths
                    .entry(path.clone())
                    .or_default()
                    .set(method, record.build());
            }
        }

        let tags: Vec<Tag> = seen_tags
            .iter()
            .map(|name| {
                self.tags
                    .get(name)
                    .cloned()
                    .unwrap_or_else(|| Tag::new(name.clone()))
            })
            .collect();

        OpenApiDocument {
            openapi: "3.0.0".to_string(),
            info: self.build_info(),
            tags: if tags.is_empty() { None } else { Some(tags) },
            paths,
            components: self.components.to_components(),
        }
    }

    /// Build once and serialize once, yielding the endpoint the host mounts.
    pub fn finish(&mut self, routes: &RouteCollection) -> Result<SpecEndpoint> {
        let document = self.build(routes);
        let body = serde_json::to_string_pretty(&document)?;

        Ok(SpecEndpoint {
            path: self.config.url.clone(),
            body,
        })
    }

    fn build_info(&self) -> Info {
        Info {
            title: self.config.title.clone(),
            version: self.config.version.clone(),
            description: self.config.description.clone(),
            terms_of_service: self.config.terms_of_service.clone(),
            contact: self.config.contact.clone(),
            license: self.config.license.clone(),
        }
    }
}

/// Normalize a host path template into the document's placeholder syntax.
///
/// `<name:cast>` segments become `{name}` with the cast hint stripped, and a
/// trailing slash is collapsed except for the root path.
fn normalize_path(template: &str) -> String {
    let trimmed = if template != "/" {
        template.trim_end_matches('/')
    } else {
        template
    };

    let converted: Vec<String> = trimmed
        .split('/')
        .map(|segment| {
            if segment.starts_with('<') && segment.ends_with('>') {
                let inner = &segment[1..segment.len() - 1];
                let name = inner.split(':').next().unwrap_or(inner);
                format!("{{{}}}", name)
            } else if let Some(name) = segment.strip_prefix(':') {
                format!("{{{}}}", name)
            } else {
                segment.to_string()
            }
        })
        .collect();

    converted.join("/")
}

/// Infer a parameter schema from a route's type-cast hint
fn cast_schema(cast: Option<ParamCast>) -> Schema {
    match cast {
        Some(ParamCast::Int) => Schema::integer(),
        Some(ParamCast::Number) => Schema::number(),
        Some(ParamCast::Uuid) => {
            let mut schema = Schema::string();
            schema.format = Some("uuid".to_string());
            schema
        }
        Some(ParamCast::Str) | None => Schema::string(),
    }
}
