//! Data model for street network graphs
//!
//! Contains the graph, its vertex registry and the typed property schema.

pub mod schema;
pub mod streets;

pub use schema::{
    EXTERNAL_ID_PROPERTY, FieldDefinition, GraphSchema, LOCATION_KEY_PROPERTY, PropertyType,
    PropertyValue, WEIGHT_PROPERTY,
};
pub use streets::{EndpointIndexing, StreetEdge, StreetGraph, StreetVertex, location_key};
