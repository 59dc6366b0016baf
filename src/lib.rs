//! OpenAPI Assembler - builds an OpenAPI 3.0 document from registered metadata.
//!
//! This library accumulates per-operation and per-schema metadata during an
//! application's declaration phase, then reconciles it against the host web
//! framework's route table in a single build pass to emit one complete,
//! internally consistent document. The host framework itself stays outside:
//! it hands over a plain [`routes::RouteCollection`] and mounts the resulting
//! [`builder::SpecEndpoint`] verbatim.
//!
//! # Architecture
//!
//! The library is organized into several modules that work together:
//!
//! 1. [`schema`] - Converts data-model declarations into schema trees
//! 2. [`components`] - Registry of named schemas and security schemes, with reference resolution
//! 3. [`operations`] - Per-handler accumulators for operation metadata
//! 4. [`routes`] - Data model for the host framework's route table
//! 5. [`builder`] - One-shot assembly of the final document
//! 6. [`definitions`] - The plain OpenAPI document model
//! 7. [`serializer`] - Serializes the document to JSON or YAML
//!
//! # Example Usage
//!
//! ```
//! use openapi_assembler::builder::SpecificationBuilder;
//! use openapi_assembler::routes::{Dispatch, HttpMethod, ParamCast, PathParam, Route, RouteCollection};
//! use openapi_assembler::schema::{FieldKind, TypeDecl};
//!
//! // Declaration phase: register schemas and operation metadata.
//! let mut spec = SpecificationBuilder::new();
//! spec.describe("Todo API", "0.0.1");
//! spec.schema(
//!     &TypeDecl::new("Todo")
//!         .field("id", FieldKind::Integer)
//!         .field("text", FieldKind::String),
//! )
//! .unwrap();
//!
//! let todo_get = spec.handler();
//! spec.operation(todo_get)
//!     .summary("Fetches a todo item by ID")
//!     .response(200, "Todo", None);
//!
//! // Build phase: the host hands over its route table.
//! let mut routes = RouteCollection::new();
//! let mut route = Route::new(
//!     "todo_get",
//!     "/todo/<todo_id:int>",
//!     Dispatch::Shared { methods: vec![HttpMethod::Get], handler: todo_get },
//! );
//! route.parameters.push(PathParam::new("todo_id", Some(ParamCast::Int)));
//! routes.routes.push(route);
//!
//! let endpoint = spec.finish(&routes).unwrap();
//! assert!(endpoint.body.contains("/todo/{todo_id}"));
//! ```

pub mod builder;
pub mod components;
pub mod definitions;
pub mod error;
pub mod operations;
pub mod routes;
pub mod schema;
pub mod serializer;

pub use builder::{SpecConfig, SpecEndpoint, SpecificationBuilder};
pub use components::{ComponentsRegistry, SchemaContent};
pub use definitions::{OpenApiDocument, ParameterLocation, SecurityScheme};
pub use error::{Error, Result};
pub use operations::{HandlerId, OperationEntry, OperationRegistry};
pub use schema::{FieldKind, Schema, SchemaFactory, TypeDecl};
