use geo::{LineString, line_string};
use geojson::{Feature, FeatureCollection, Geometry, GeometryValue};
use serde_json::{Map, Value as JsonValue, json};

use super::ShortestPath;
use crate::Error;
use crate::model::{StreetGraph, WEIGHT_PROPERTY};

impl ShortestPath {
    /// Converts the path to a `GeoJSON` `FeatureCollection`, one straight
    /// vertex-to-vertex feature per traversed edge carrying the edge's
    /// attributes. A zero-length path yields a single point feature.
    ///
    /// # Errors
    ///
    /// Fails if the path refers to vertices or edges not in `graph`
    pub fn to_geojson(&self, graph: &StreetGraph) -> Result<FeatureCollection, Error> {
        let mut features = Vec::with_capacity(self.edges.len().max(1));

        if self.edges.is_empty()
            && let Some(vertex) = self.vertices.first().and_then(|&v| graph.vertex(v))
        {
            let value = json!({
                "type": "Feature",
                "geometry": Geometry::new(GeometryValue::from(&vertex.geometry)),
                "properties": {
                    "latlon": vertex.location_key,
                    "geoid": vertex.external_id,
                }
            });
            features.push(to_feature(value)?);
        }

        for (leg_idx, (pair, &edge)) in self.vertices.windows(2).zip(&self.edges).enumerate() {
            let (Some(from), Some(to), Some(street)) =
                (graph.vertex(pair[0]), graph.vertex(pair[1]), graph.edge(edge))
            else {
                return Err(Error::InvalidData(format!(
                    "path references missing edge {}",
                    edge.index()
                )));
            };

            let segment: LineString<f64> = line_string![
                (x: from.geometry.x(), y: from.geometry.y()),
                (x: to.geometry.x(), y: to.geometry.y()),
            ];

            let mut properties = Map::new();
            properties.insert("leg_index".to_string(), json!(leg_idx));
            properties.insert("edge".to_string(), json!(edge.index()));
            for (field, value) in graph.schema().edge_fields().iter().zip(&street.attributes) {
                properties.insert(field.name.clone(), value.to_json());
            }
            properties.insert(WEIGHT_PROPERTY.to_string(), json!(street.weight));

            let value = json!({
                "type": "Feature",
                "geometry": Geometry::new(GeometryValue::from(&segment)),
                "properties": JsonValue::Object(properties),
            });
            features.push(to_feature(value)?);
        }

        Ok(FeatureCollection {
            features,
            bbox: None,
            foreign_members: None,
        })
    }

    /// Serialized form of [`ShortestPath::to_geojson`]
    ///
    /// # Errors
    ///
    /// See [`ShortestPath::to_geojson`]
    pub fn to_geojson_string(&self, graph: &StreetGraph) -> Result<String, Error> {
        serde_json::to_string(&self.to_geojson(graph)?)
            .map_err(|e| Error::Serialization(e.to_string()))
    }
}

fn to_feature(value: JsonValue) -> Result<Feature, Error> {
    serde_json::from_value(value).map_err(|e| Error::Serialization(e.to_string()))
}
