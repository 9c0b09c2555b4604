//! Core logic of the API documentation console.
//!
//! This crate turns the schema documents that backend services publish into
//! readable documentation: example request/response bodies synthesised from
//! the definitions graph, per-endpoint records with permission codes, and
//! dense invocation series rebuilt from sparse daily counters. It performs no
//! I/O; the `apidoc-console` crate wires it to caches and counter stores.
//!
//! # Crate layout
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`document`] | Deserialisable schema document: [`SchemaDocument`], [`Operation`], [`SchemaRef`] |
//! | [`types`] | Entity model: [`EntitySpec`], [`FieldSpec`], [`FieldKind`] |
//! | [`graph`] | [`SchemaGraph`], the definitions section as a reference graph |
//! | [`render`] | Cycle-safe example-body synthesis via [`render_entity`] and [`ExampleBook`] |
//! | [`endpoint`] | [`EndpointAssembler`]: [`EndpointDoc`] and [`ControllerDoc`] records |
//! | [`catalog`] | [`ServiceCatalog`]: registry resources grouped by route, service, version |
//! | [`validation`] | Date argument checking via [`DateRange`] |
//! | [`stats`] | Sparse-to-dense counter series via [`SeriesBuilder`] |
//!
//! # Quick start
//!
//! ```rust,ignore
//! use apidoc::{render_entity, SchemaGraph};
//!
//! let graph = SchemaGraph::parse(&swagger_json)?;
//! let body = render_entity(&graph, "RouteDTO").expect("entity exists");
//! println!("{body}");
//! ```

pub mod catalog;
pub mod document;
pub mod endpoint;
pub mod graph;
pub mod render;
pub mod stats;
pub mod types;
pub mod validation;

pub use catalog::{CatalogEntry, ServiceCatalog, ServiceResource};
pub use document::{entity_name, Operation, SchemaDocument, SchemaError, SchemaRef};
pub use endpoint::{
    decode_permission, find_operation, resolve_body, ControllerDoc, EndpointAssembler,
    EndpointDoc, Parameter, Permission, Response,
};
pub use graph::SchemaGraph;
pub use render::{render_entity, ExampleBook};
pub use stats::{decode_daily_counts, CountSeries, DailyCounts, SeriesBuilder, SeriesMatrix};
pub use types::{ArrayItem, EntitySpec, FieldKind, FieldSpec, ScalarType};
pub use validation::{parse_date, DateRange, ValidationError, DATE_FORMAT};
