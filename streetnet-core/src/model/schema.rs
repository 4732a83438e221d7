//! Typed property schema of a street graph
//!
//! The schema is fixed before the first feature is ingested: two string
//! vertex properties, one edge property per source field and the synthetic
//! `weight_dist` edge property.

use serde::{Deserialize, Serialize};

use crate::Error;

/// Vertex property holding the location key
pub const LOCATION_KEY_PROPERTY: &str = "latlon";
/// Vertex property holding the external identifier
pub const EXTERNAL_ID_PROPERTY: &str = "geoid";
/// Synthetic edge property holding the geometric length
pub const WEIGHT_PROPERTY: &str = "weight_dist";

/// Closed set of property types a graph can materialize
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PropertyType {
    String,
    Integer,
    Float,
}

impl PropertyType {
    /// Lower-cased type name, as shown in property listings
    pub fn type_name(self) -> &'static str {
        match self {
            PropertyType::String => "string",
            PropertyType::Integer => "integer",
            PropertyType::Float => "float",
        }
    }

    /// Maps a source field type name (OGR style, e.g. `Integer64`, `Real`)
    /// onto the closed set. Unknown types fall back to string.
    pub fn from_source_type(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "integer" | "integer64" | "int" | "long" => PropertyType::Integer,
            "real" | "float" | "double" => PropertyType::Float,
            _ => PropertyType::String,
        }
    }

    /// Converts a value to this type. Integers widen to floats; every other
    /// mismatch is an error. `Null` passes through.
    pub fn coerce(self, field: &str, value: PropertyValue) -> Result<PropertyValue, Error> {
        match (self, value) {
            (_, PropertyValue::Null) => Ok(PropertyValue::Null),
            (PropertyType::String, v @ PropertyValue::String(_))
            | (PropertyType::Integer, v @ PropertyValue::Integer(_))
            | (PropertyType::Float, v @ PropertyValue::Float(_)) => Ok(v),
            #[allow(clippy::cast_precision_loss)]
            (PropertyType::Float, PropertyValue::Integer(i)) => Ok(PropertyValue::Float(i as f64)),
            (expected, other) => Err(Error::AttributeType {
                field: field.to_string(),
                expected,
                found: other.kind(),
            }),
        }
    }
}

impl std::fmt::Display for PropertyType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.type_name())
    }
}

/// Attribute value copied from a source record onto an edge
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PropertyValue {
    String(String),
    Integer(i64),
    Float(f64),
    Null,
}

impl PropertyValue {
    pub fn kind(&self) -> &'static str {
        match self {
            PropertyValue::String(_) => "string",
            PropertyValue::Integer(_) => "integer",
            PropertyValue::Float(_) => "float",
            PropertyValue::Null => "null",
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, PropertyValue::Null)
    }

    /// Textual form used for identifiers; `None` for null and empty strings
    pub fn as_identifier(&self) -> Option<String> {
        match self {
            PropertyValue::String(s) if s.is_empty() => None,
            PropertyValue::String(s) => Some(s.clone()),
            PropertyValue::Integer(i) => Some(i.to_string()),
            PropertyValue::Float(f) => Some(f.to_string()),
            PropertyValue::Null => None,
        }
    }

    pub fn to_json(&self) -> serde_json::Value {
        match self {
            PropertyValue::String(s) => serde_json::Value::from(s.as_str()),
            PropertyValue::Integer(i) => serde_json::Value::from(*i),
            PropertyValue::Float(f) => serde_json::Value::from(*f),
            PropertyValue::Null => serde_json::Value::Null,
        }
    }
}

impl std::fmt::Display for PropertyValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PropertyValue::String(s) => f.write_str(s),
            PropertyValue::Integer(i) => write!(f, "{i}"),
            PropertyValue::Float(v) => write!(f, "{v}"),
            PropertyValue::Null => f.write_str("null"),
        }
    }
}

impl From<&str> for PropertyValue {
    fn from(value: &str) -> Self {
        PropertyValue::String(value.to_string())
    }
}

impl From<String> for PropertyValue {
    fn from(value: String) -> Self {
        PropertyValue::String(value)
    }
}

impl From<i64> for PropertyValue {
    fn from(value: i64) -> Self {
        PropertyValue::Integer(value)
    }
}

impl From<f64> for PropertyValue {
    fn from(value: f64) -> Self {
        PropertyValue::Float(value)
    }
}

/// A named, typed field of a feature source
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDefinition {
    pub name: String,
    pub field_type: PropertyType,
}

impl FieldDefinition {
    pub fn new(name: impl Into<String>, field_type: PropertyType) -> Self {
        Self {
            name: name.into(),
            field_type,
        }
    }
}

/// Declared vertex and edge properties of a graph
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphSchema {
    /// Edge properties copied from the source, in source order
    edge_fields: Vec<FieldDefinition>,
}

impl GraphSchema {
    /// Declares the schema for a set of source fields
    ///
    /// # Errors
    ///
    /// Returns an error if a source field collides with the synthetic
    /// `weight_dist` property or appears twice.
    pub fn from_fields(fields: &[FieldDefinition]) -> Result<Self, Error> {
        let mut edge_fields: Vec<FieldDefinition> = Vec::with_capacity(fields.len());
        for field in fields {
            if field.name == WEIGHT_PROPERTY {
                return Err(Error::InvalidData(format!(
                    "source field {WEIGHT_PROPERTY:?} clashes with the synthetic weight property"
                )));
            }
            if edge_fields.iter().any(|f| f.name == field.name) {
                return Err(Error::InvalidData(format!(
                    "duplicate source field {:?}",
                    field.name
                )));
            }
            edge_fields.push(field.clone());
        }
        Ok(Self { edge_fields })
    }

    pub fn edge_fields(&self) -> &[FieldDefinition] {
        &self.edge_fields
    }

    /// Position of an edge field within an edge's attribute vector
    pub fn edge_field_index(&self, name: &str) -> Option<usize> {
        self.edge_fields.iter().position(|f| f.name == name)
    }

    /// All declared properties as `(name, kind, type)`, vertices first
    pub fn properties(&self) -> Vec<(&str, &'static str, PropertyType)> {
        let mut props = vec![
            (EXTERNAL_ID_PROPERTY, "vertex", PropertyType::String),
            (LOCATION_KEY_PROPERTY, "vertex", PropertyType::String),
        ];
        props.extend(
            self.edge_fields
                .iter()
                .map(|f| (f.name.as_str(), "edge", f.field_type)),
        );
        props.push((WEIGHT_PROPERTY, "edge", PropertyType::Float));
        props
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_source_type_mapping() {
        assert_eq!(PropertyType::from_source_type("Integer64"), PropertyType::Integer);
        assert_eq!(PropertyType::from_source_type("Real"), PropertyType::Float);
        assert_eq!(PropertyType::from_source_type("String"), PropertyType::String);
        assert_eq!(PropertyType::from_source_type("Date"), PropertyType::String);
    }

    #[test]
    fn test_coerce_widens_integer_to_float() {
        let value = PropertyType::Float.coerce("len", PropertyValue::Integer(3)).unwrap();
        assert_eq!(value, PropertyValue::Float(3.0));
    }

    #[test]
    fn test_coerce_rejects_mismatch() {
        let err = PropertyType::Integer
            .coerce("lanes", PropertyValue::String("two".into()))
            .unwrap_err();
        assert!(matches!(err, Error::AttributeType { ref field, .. } if field == "lanes"));
    }

    #[test]
    fn test_coerce_passes_null() {
        let value = PropertyType::Integer.coerce("lanes", PropertyValue::Null).unwrap();
        assert!(value.is_null());
    }

    #[test]
    fn test_schema_rejects_weight_field() {
        let fields = vec![FieldDefinition::new(WEIGHT_PROPERTY, PropertyType::Float)];
        assert!(GraphSchema::from_fields(&fields).is_err());
    }

    #[test]
    fn test_schema_property_listing() {
        let fields = vec![
            FieldDefinition::new("geoid", PropertyType::String),
            FieldDefinition::new("lanes", PropertyType::Integer),
        ];
        let schema = GraphSchema::from_fields(&fields).unwrap();
        let props = schema.properties();

        assert_eq!(props.len(), 5);
        assert_eq!(props[0], ("geoid", "vertex", PropertyType::String));
        assert_eq!(props[3], ("lanes", "edge", PropertyType::Integer));
        assert_eq!(props[4], (WEIGHT_PROPERTY, "edge", PropertyType::Float));
        assert_eq!(schema.edge_field_index("lanes"), Some(1));
    }

    #[test]
    fn test_identifier_rendering() {
        assert_eq!(PropertyValue::from("G1").as_identifier().as_deref(), Some("G1"));
        assert_eq!(PropertyValue::from(42_i64).as_identifier().as_deref(), Some("42"));
        assert_eq!(PropertyValue::from("").as_identifier(), None);
        assert_eq!(PropertyValue::Null.as_identifier(), None);
    }
}
