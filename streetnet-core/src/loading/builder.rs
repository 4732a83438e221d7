use log::{debug, info, warn};
use petgraph::graph::EdgeIndex;

use super::config::GraphBuildConfig;
use super::geometry::{normalize, planar_length};
use super::source::{FeatureSource, SourceFeature};
use crate::Error;
use crate::model::{
    FieldDefinition, GraphSchema, PropertyValue, StreetEdge, StreetGraph, location_key,
};

/// Counters collected while building a graph
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BuildReport {
    pub features_read: usize,
    pub edges_created: usize,
    pub features_skipped: usize,
    pub vertices_created: usize,
}

/// Incremental graph construction, one feature at a time in stream order
#[derive(Debug)]
pub struct GraphBuilder {
    graph: StreetGraph,
    id_field: String,
}

impl GraphBuilder {
    /// Declares the graph schema for the given source fields
    ///
    /// # Errors
    ///
    /// Returns an error if the fields cannot form a valid schema
    pub fn new(
        fields: &[FieldDefinition],
        config: &GraphBuildConfig,
        capacity: usize,
    ) -> Result<Self, Error> {
        let schema = GraphSchema::from_fields(fields)?;
        Ok(Self {
            graph: StreetGraph::new(schema, config.endpoint_indexing, capacity),
            id_field: config.id_field.clone(),
        })
    }

    /// Adds one feature as an edge between its (deduplicated) endpoints.
    /// On error the graph is left as it was before the call.
    ///
    /// # Errors
    ///
    /// Fails if the geometry is missing, empty or not line-like, or an
    /// attribute does not match its declared type.
    pub fn add_feature(&mut self, feature: &SourceFeature) -> Result<EdgeIndex, Error> {
        let geometry = feature
            .geometry
            .as_ref()
            .ok_or(Error::MissingGeometry)?;
        let line = normalize(geometry)?;

        // Attributes are converted before any vertex is touched
        let attributes = self.edge_attributes(feature)?;

        let (Some(first), Some(last)) = (line.points().next(), line.points().last()) else {
            return Err(Error::EmptyGeometry);
        };
        let start_key = location_key(first);
        let end_key = location_key(last);

        let external_id = feature
            .attribute(&self.id_field)
            .and_then(PropertyValue::as_identifier);

        let start = self
            .graph
            .resolve_start(&start_key, external_id.as_deref(), first);
        let end = self.graph.resolve_end(&end_key, last);

        let edge = StreetEdge {
            weight: planar_length(&line),
            attributes,
        };
        Ok(self.graph.add_edge(start, end, edge))
    }

    pub fn graph(&self) -> &StreetGraph {
        &self.graph
    }

    pub fn finish(self) -> StreetGraph {
        self.graph
    }

    fn edge_attributes(&self, feature: &SourceFeature) -> Result<Vec<PropertyValue>, Error> {
        self.graph
            .schema()
            .edge_fields()
            .iter()
            .map(|field| {
                let value = feature
                    .attribute(&field.name)
                    .cloned()
                    .unwrap_or(PropertyValue::Null);
                field.field_type.coerce(&field.name, value)
            })
            .collect()
    }
}

/// Builds a street graph from all features of a source
///
/// # Errors
///
/// Returns an error if the source cannot be read, or if a feature is
/// invalid and `skip_invalid` is off. Feature errors carry the 0-based
/// position of the offending record.
pub fn build_street_graph<S>(source: &mut S, config: &GraphBuildConfig) -> Result<StreetGraph, Error>
where
    S: FeatureSource + ?Sized,
{
    build_street_graph_with_report(source, config).map(|(graph, _)| graph)
}

/// Same as [`build_street_graph`], also returning the build counters
///
/// # Errors
///
/// See [`build_street_graph`]
pub fn build_street_graph_with_report<S>(
    source: &mut S,
    config: &GraphBuildConfig,
) -> Result<(StreetGraph, BuildReport), Error>
where
    S: FeatureSource + ?Sized,
{
    let total = source.feature_count();
    info!(
        "Building street graph from {total} features ({} fields)",
        source.fields().len()
    );

    let mut builder = GraphBuilder::new(source.fields(), config, total)?;
    let mut report = BuildReport::default();

    for (index, record) in source.features().enumerate() {
        report.features_read += 1;

        let outcome = match record {
            Ok(feature) => builder.add_feature(&feature),
            // Read failures are never skippable
            Err(err @ Error::SourceRead { .. }) => return Err(err),
            Err(err) => Err(err),
        };

        match outcome {
            Ok(_) => report.edges_created += 1,
            Err(err) if config.skip_invalid => {
                warn!("Skipping feature #{index}: {err}");
                report.features_skipped += 1;
            }
            Err(err) => {
                return Err(Error::Feature {
                    index,
                    source: Box::new(err),
                });
            }
        }

        if config.progress_interval > 0 && (index + 1) % config.progress_interval == 0 {
            debug!("Processed {}/{total} features", index + 1);
        }
    }

    let graph = builder.finish();
    report.vertices_created = graph.vertex_count();

    info!(
        "Street graph built: {} vertices, {} edges, {} features skipped",
        report.vertices_created, report.edges_created, report.features_skipped
    );

    release_heap();
    Ok((graph, report))
}

/// Returns freed parsing buffers to the OS
fn release_heap() {
    // # Safety
    //
    // malloc_trim is only called on linux with the glibc allocator, which is
    // checked by the cfg attribute at compile time.
    #[cfg(all(target_os = "linux", target_env = "gnu"))]
    unsafe {
        if libc::malloc_trim(0) == 0 {
            log::trace!("No heap memory released after graph build");
        }
    }
}

#[cfg(test)]
mod tests {
    use geo::{Geometry, Point, line_string};

    use super::*;
    use crate::loading::MemorySource;
    use crate::model::{EndpointIndexing, PropertyType};

    fn segment(x1: f64, y1: f64, x2: f64, y2: f64) -> SourceFeature {
        SourceFeature::new(Geometry::LineString(
            line_string![(x: x1, y: y1), (x: x2, y: y2)],
        ))
    }

    fn fields() -> Vec<FieldDefinition> {
        vec![
            FieldDefinition::new("geoid", PropertyType::String),
            FieldDefinition::new("lanes", PropertyType::Integer),
        ]
    }

    #[test]
    fn test_shared_endpoint_creates_one_vertex() {
        let mut source = MemorySource::new(
            fields(),
            vec![segment(0.0, 0.0, 1.0, 0.0), segment(1.0, 0.0, 2.0, 0.0)],
        );
        let graph = build_street_graph(&mut source, &GraphBuildConfig::default()).unwrap();

        assert_eq!(graph.vertex_count(), 3);
        assert_eq!(graph.edge_count(), 2);
    }

    #[test]
    fn test_parallel_edges_are_kept() {
        let mut source = MemorySource::new(
            fields(),
            vec![segment(0.0, 0.0, 1.0, 0.0), segment(0.0, 0.0, 1.0, 0.0)],
        );
        let graph = build_street_graph(&mut source, &GraphBuildConfig::default()).unwrap();

        assert_eq!(graph.vertex_count(), 2);
        assert_eq!(graph.edge_count(), 2);
    }

    #[test]
    fn test_attributes_copied_in_schema_order() {
        let mut builder = GraphBuilder::new(&fields(), &GraphBuildConfig::default(), 1).unwrap();
        let feature = segment(0.0, 0.0, 3.0, 4.0)
            .with_attribute("geoid", "G1")
            .with_attribute("lanes", 2_i64);

        let edge = builder.add_feature(&feature).unwrap();
        let graph = builder.finish();

        assert_eq!(graph.edge_attribute(edge, "lanes"), Some(&PropertyValue::Integer(2)));
        assert_eq!(graph.edge_attribute(edge, "geoid"), Some(&PropertyValue::from("G1")));
        assert_eq!(graph.edge(edge).map(StreetEdge::weight_dist), Some(5.0));
    }

    #[test]
    fn test_missing_attribute_is_null() {
        let mut builder = GraphBuilder::new(&fields(), &GraphBuildConfig::default(), 1).unwrap();
        let edge = builder.add_feature(&segment(0.0, 0.0, 1.0, 0.0)).unwrap();

        assert_eq!(builder.graph().edge_attribute(edge, "lanes"), Some(&PropertyValue::Null));
    }

    #[test]
    fn test_failed_feature_leaves_graph_untouched() {
        let mut builder = GraphBuilder::new(&fields(), &GraphBuildConfig::default(), 1).unwrap();
        let feature = segment(0.0, 0.0, 1.0, 0.0).with_attribute("lanes", "two");

        assert!(builder.add_feature(&feature).is_err());
        assert_eq!(builder.graph().vertex_count(), 0);
        assert_eq!(builder.graph().edge_count(), 0);
    }

    #[test]
    fn test_invalid_feature_reports_index() {
        let mut source = MemorySource::new(
            fields(),
            vec![
                segment(0.0, 0.0, 1.0, 0.0),
                SourceFeature::new(Geometry::Point(Point::new(5.0, 5.0))),
            ],
        );
        let err = build_street_graph(&mut source, &GraphBuildConfig::default()).unwrap_err();

        assert!(matches!(
            err,
            Error::Feature { index: 1, ref source } if matches!(**source, Error::UnsupportedGeometryKind("Point"))
        ));
    }

    #[test]
    fn test_feature_without_geometry() {
        let mut builder = GraphBuilder::new(&fields(), &GraphBuildConfig::default(), 1).unwrap();
        let err = builder.add_feature(&SourceFeature::default()).unwrap_err();

        assert!(matches!(err, Error::MissingGeometry));
        assert_eq!(err.to_string(), "Feature has no geometry");
        assert_eq!(builder.graph().vertex_count(), 0);
    }

    #[test]
    fn test_skip_invalid_continues() {
        let mut source = MemorySource::new(
            fields(),
            vec![
                SourceFeature::default(),
                segment(0.0, 0.0, 1.0, 0.0),
                SourceFeature::new(Geometry::Point(Point::new(5.0, 5.0))),
            ],
        );
        let config = GraphBuildConfig {
            skip_invalid: true,
            ..GraphBuildConfig::default()
        };
        let (graph, report) = build_street_graph_with_report(&mut source, &config).unwrap();

        assert_eq!(graph.edge_count(), 1);
        assert_eq!(
            report,
            BuildReport {
                features_read: 3,
                edges_created: 1,
                features_skipped: 2,
                vertices_created: 2,
            }
        );
    }

    #[test]
    fn test_custom_id_field() {
        let fields = vec![FieldDefinition::new("tlid", PropertyType::Integer)];
        let config = GraphBuildConfig {
            id_field: "tlid".to_string(),
            ..GraphBuildConfig::default()
        };
        let mut builder = GraphBuilder::new(&fields, &config, 1).unwrap();
        builder
            .add_feature(&segment(0.0, 0.0, 1.0, 0.0).with_attribute("tlid", 7_i64))
            .unwrap();
        let graph = builder.finish();

        assert!(graph.find_vertex_by_external_id("7").is_some());
    }

    #[test]
    fn test_legacy_indexing_duplicates_end_vertices() {
        // Both features end at the same location; only the legacy mode
        // creates a second vertex for it
        let features = vec![segment(0.0, 0.0, 1.0, 0.0), segment(2.0, 0.0, 1.0, 0.0)];

        let mut source = MemorySource::new(fields(), features.clone());
        let fixed = build_street_graph(&mut source, &GraphBuildConfig::default()).unwrap();

        let mut source = MemorySource::new(fields(), features);
        let config = GraphBuildConfig {
            endpoint_indexing: EndpointIndexing::Legacy,
            ..GraphBuildConfig::default()
        };
        let legacy = build_street_graph(&mut source, &config).unwrap();

        assert_eq!(fixed.vertex_count(), 3);
        assert_eq!(legacy.vertex_count(), 4);
    }
}
