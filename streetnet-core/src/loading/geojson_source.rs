//! GeoJSON feature source

use std::path::Path;

use geojson::{Feature, GeoJson, JsonObject};
use hashbrown::HashMap;
use log::debug;
use serde_json::Value;

use super::source::{FeatureIter, FeatureSource, SourceFeature};
use crate::Error;
use crate::model::{FieldDefinition, PropertyType, PropertyValue};

/// Reads a GeoJSON `FeatureCollection` (or a single `Feature`).
///
/// GeoJSON carries no schema, so field types are inferred from the property
/// values of all features: integers stay integers, integers mixed with
/// floats become floats, anything else is a string. Nulls do not take part
/// in inference.
#[derive(Debug, Clone)]
pub struct GeoJsonSource {
    fields: Vec<FieldDefinition>,
    features: Vec<Feature>,
}

impl GeoJsonSource {
    /// Opens and parses a GeoJSON file
    ///
    /// # Errors
    ///
    /// Returns `SourceRead` if the file cannot be read or is not GeoJSON
    pub fn open(path: impl AsRef<Path>) -> Result<Self, Error> {
        let path = path.as_ref();
        let read_error = |reason: String| Error::SourceRead {
            path: path.display().to_string(),
            reason,
        };

        let text = std::fs::read_to_string(path).map_err(|e| read_error(e.to_string()))?;
        let source = Self::from_str(&text).map_err(|e| match e {
            Error::InvalidData(reason) => read_error(reason),
            other => other,
        })?;
        debug!(
            "Opened GeoJSON source {} with {} features and {} fields",
            path.display(),
            source.features.len(),
            source.fields.len()
        );
        Ok(source)
    }

    /// Parses GeoJSON text
    ///
    /// # Errors
    ///
    /// Returns `InvalidData` if the text is not a GeoJSON feature or
    /// feature collection
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(text: &str) -> Result<Self, Error> {
        let geojson: GeoJson = text
            .parse()
            .map_err(|e: geojson::Error| Error::InvalidData(e.to_string()))?;

        let features = match geojson {
            GeoJson::FeatureCollection(collection) => collection.features,
            GeoJson::Feature(feature) => vec![feature],
            GeoJson::Geometry(_) => {
                return Err(Error::InvalidData(
                    "expected a Feature or FeatureCollection, found a bare Geometry".to_string(),
                ));
            }
        };

        let fields = infer_fields(&features);
        Ok(Self { fields, features })
    }
}

impl FeatureSource for GeoJsonSource {
    fn fields(&self) -> &[FieldDefinition] {
        &self.fields
    }

    fn feature_count(&self) -> usize {
        self.features.len()
    }

    fn features(&mut self) -> FeatureIter<'_> {
        let fields = &self.fields;
        Box::new(
            self.features
                .iter()
                .map(move |feature| convert_feature(feature, fields)),
        )
    }
}

fn convert_feature(feature: &Feature, fields: &[FieldDefinition]) -> Result<SourceFeature, Error> {
    let geometry = match &feature.geometry {
        Some(geometry) => Some(
            geo::Geometry::<f64>::try_from(geometry.clone())
                .map_err(|e| Error::InvalidData(e.to_string()))?,
        ),
        None => None,
    };

    let mut attributes = HashMap::with_capacity(fields.len());
    if let Some(properties) = &feature.properties {
        for field in fields {
            let value = properties
                .get(&field.name)
                .map_or(PropertyValue::Null, |v| json_to_property(v, field.field_type));
            attributes.insert(field.name.clone(), value);
        }
    }

    Ok(SourceFeature {
        geometry,
        attributes,
    })
}

fn infer_fields(features: &[Feature]) -> Vec<FieldDefinition> {
    let mut fields: Vec<FieldDefinition> = Vec::new();
    let mut positions: HashMap<String, usize> = HashMap::new();

    for properties in features.iter().filter_map(|f| f.properties.as_ref()) {
        observe_properties(properties, &mut fields, &mut positions);
    }
    fields
}

fn observe_properties(
    properties: &JsonObject,
    fields: &mut Vec<FieldDefinition>,
    positions: &mut HashMap<String, usize>,
) {
    for (name, value) in properties {
        let observed = json_type(value);
        match positions.get(name) {
            Some(&idx) => {
                if let Some(observed) = observed {
                    let field = &mut fields[idx];
                    field.field_type = merge_types(field.field_type, observed);
                }
            }
            None => {
                positions.insert(name.clone(), fields.len());
                // Until a non-null value shows up the narrowest type is used
                fields.push(FieldDefinition::new(
                    name.clone(),
                    observed.unwrap_or(PropertyType::Integer),
                ));
            }
        }
    }
}

fn json_type(value: &Value) -> Option<PropertyType> {
    match value {
        Value::Null => None,
        Value::Number(n) if n.is_i64() => Some(PropertyType::Integer),
        Value::Number(_) => Some(PropertyType::Float),
        _ => Some(PropertyType::String),
    }
}

fn merge_types(current: PropertyType, observed: PropertyType) -> PropertyType {
    match (current, observed) {
        (a, b) if a == b => a,
        (PropertyType::String, _) | (_, PropertyType::String) => PropertyType::String,
        _ => PropertyType::Float,
    }
}

#[allow(clippy::cast_precision_loss)]
fn json_to_property(value: &Value, field_type: PropertyType) -> PropertyValue {
    match (field_type, value) {
        (_, Value::Null) => PropertyValue::Null,
        (PropertyType::Integer, Value::Number(n)) if n.is_i64() => {
            n.as_i64().map_or(PropertyValue::Null, PropertyValue::Integer)
        }
        (PropertyType::Float, Value::Number(n)) => {
            n.as_f64().map_or(PropertyValue::Null, PropertyValue::Float)
        }
        (_, Value::String(s)) => PropertyValue::String(s.clone()),
        (_, other) => PropertyValue::String(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const COLLECTION: &str = r#"{
        "type": "FeatureCollection",
        "features": [
            {
                "type": "Feature",
                "geometry": {"type": "LineString", "coordinates": [[1.0, 1.0], [2.0, 2.0]]},
                "properties": {"geoid": "G1", "lanes": 2, "speed": 30, "name": null}
            },
            {
                "type": "Feature",
                "geometry": {"type": "MultiLineString", "coordinates": [[[2.0, 2.0], [3.0, 3.0]]]},
                "properties": {"geoid": "G2", "lanes": 1, "speed": 42.5, "name": "Main St"}
            }
        ]
    }"#;

    #[test]
    fn test_infers_field_types() {
        let source = GeoJsonSource::from_str(COLLECTION).unwrap();
        let field = |name: &str| {
            source
                .fields()
                .iter()
                .find(|f| f.name == name)
                .map(|f| f.field_type)
        };

        assert_eq!(source.feature_count(), 2);
        assert_eq!(field("geoid"), Some(PropertyType::String));
        assert_eq!(field("lanes"), Some(PropertyType::Integer));
        assert_eq!(field("speed"), Some(PropertyType::Float));
        assert_eq!(field("name"), Some(PropertyType::String));
    }

    #[test]
    fn test_features_are_converted() {
        let mut source = GeoJsonSource::from_str(COLLECTION).unwrap();
        let features: Vec<SourceFeature> = source.features().collect::<Result<_, _>>().unwrap();

        assert!(matches!(
            features[0].geometry,
            Some(geo::Geometry::LineString(_))
        ));
        assert!(matches!(
            features[1].geometry,
            Some(geo::Geometry::MultiLineString(_))
        ));
        assert_eq!(features[0].attribute("speed"), Some(&PropertyValue::Float(30.0)));
        assert_eq!(features[0].attribute("name"), Some(&PropertyValue::Null));
        assert_eq!(
            features[1].attribute("name"),
            Some(&PropertyValue::String("Main St".to_string()))
        );
    }

    #[test]
    fn test_bare_geometry_rejected() {
        let text = r#"{"type": "Point", "coordinates": [1.0, 2.0]}"#;
        assert!(GeoJsonSource::from_str(text).is_err());
    }

    #[test]
    fn test_missing_file_is_source_read_error() {
        let err = GeoJsonSource::open("/nonexistent/streets.geojson").unwrap_err();
        assert!(matches!(err, Error::SourceRead { .. }));
    }
}
