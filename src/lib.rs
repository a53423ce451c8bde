//! Route documentation generator - structured API docs from annotated handlers.
//!
//! This library turns HTTP route definitions into normalized documentation
//! records by introspecting each handler's docblock-style annotations and,
//! where possible, invoking the handler (or a paired response transformer)
//! to capture a real example response.
//!
//! # Recognized Tags
//!
//! - `@group` - documentation group, method level overriding class level
//! - `@authenticated` - marks the route as requiring authentication
//! - `@bodyParam <name> <type> [required] <description>` - body parameters
//! - `@response <json>` - literal example response
//! - `@transformer` / `@transformercollection` / `@transformermodel` -
//!   response materialization through a transformation adapter
//!
//! # Architecture
//!
//! The library is organized into several modules that work together:
//!
//! 1. [`introspect`] - reads raw comment text for class and method
//!    declaration sites (in-memory registry or a syn-based source index)
//! 2. [`annotation`] - parses comment text into tag maps and free text
//! 3. [`description`] - resolves title and long description
//! 4. [`parameter`] - parses `@bodyParam` declarations with example values
//! 5. [`group`] / [`auth`] - resolve grouping and the authentication flag
//! 6. [`transform`] / [`invoke`] - transformer adapters and safe handler
//!    invocation behind narrow interfaces
//! 7. [`response`] - materializes an example response per route
//! 8. [`processor`] - composes everything into `process_route`
//! 9. [`serializer`] - encodes record batches for downstream writers
//!
//! # Example Usage
//!
//! ```no_run
//! use apidoc_from_routes::introspect::SourceIndex;
//! use apidoc_from_routes::processor::RouteProcessor;
//! use apidoc_from_routes::route::{HandlerRef, HttpMethod, Route};
//! use apidoc_from_routes::serializer::serialize_json;
//! use std::path::Path;
//!
//! // Index doc comments from the project source
//! let index = SourceIndex::from_dir(Path::new("./my-project")).unwrap();
//!
//! // Process the routes supplied by the route table
//! let processor = RouteProcessor::new(Box::new(index));
//! let routes = vec![Route::new(
//!     vec![HttpMethod::Get],
//!     "/api/users",
//!     HandlerRef::method("UserController", "index"),
//! )];
//!
//! let records: Vec<_> = processor
//!     .process_routes(&routes)
//!     .into_iter()
//!     .filter_map(Result::ok)
//!     .collect();
//!
//! let json = serialize_json(&records).unwrap();
//! println!("{}", json);
//! ```

pub mod annotation;
pub mod auth;
pub mod description;
pub mod error;
pub mod group;
pub mod introspect;
pub mod invoke;
pub mod parameter;
pub mod processor;
pub mod response;
pub mod route;
pub mod serializer;
pub mod transform;
