//! End-to-end construction and query behaviour on in-memory sources

use std::collections::HashSet;

use geo::{Geometry, LineString, MultiLineString, line_string};
use streetnet_core::prelude::*;
use streetnet_core::model::location_key;

fn fields() -> Vec<FieldDefinition> {
    vec![
        FieldDefinition::new("geoid", PropertyType::String),
        FieldDefinition::new("name", PropertyType::String),
    ]
}

/// Feature from `start` to `end`, padded with an out-and-back spur at the
/// start so that its planar length is `length`
fn feature(start: (f64, f64), end: (f64, f64), length: f64, geoid: Option<&str>) -> SourceFeature {
    let direct = (end.0 - start.0).hypot(end.1 - start.1);
    let spur = (length - direct) / 2.0;
    let line = if spur > 0.0 {
        LineString::from(vec![start, (start.0, start.1 + spur), start, end])
    } else {
        line_string![(x: start.0, y: start.1), (x: end.0, y: end.1)]
    };

    let feature = SourceFeature::new(Geometry::LineString(line));
    match geoid {
        Some(id) => feature.with_attribute("geoid", id),
        None => feature,
    }
}

fn scenario(extra: Vec<SourceFeature>) -> StreetGraph {
    // Points are (lon, lat); keys are "lat:lon"
    let mut features = vec![
        feature((1.0, 1.0), (2.0, 2.0), 5.0, Some("G1")),
        feature((2.0, 2.0), (3.0, 3.0), 7.0, None),
        feature((1.0, 1.0), (3.0, 3.0), 20.0, None),
    ];
    features.extend(extra);
    let mut source = MemorySource::new(fields(), features);
    build_street_graph(&mut source, &GraphBuildConfig::default()).unwrap()
}

#[test]
fn test_scenario_prefers_shorter_route() {
    let graph = scenario(Vec::new());

    assert_eq!(graph.vertex_count(), 3);
    assert_eq!(graph.edge_count(), 3);

    let start = graph.find_vertex_by_external_id("G1").unwrap();
    let end = graph.find_vertex_by_key("3:3").unwrap();
    let path = shortest_path_between(&graph, start, end)
        .path()
        .cloned()
        .unwrap();

    assert!((path.distance - 12.0).abs() < 1e-9);
    assert_eq!(path.edges.len(), 2);
    assert_eq!(path.vertices[1], graph.find_vertex_by_key("2:2").unwrap());
}

#[test]
fn test_scenario_by_external_ids() {
    // "3:3" already exists when G3 arrives, so G3 goes on a new start vertex
    let graph = scenario(vec![feature((4.0, 3.0), (3.0, 3.0), 1.0, Some("G3"))]);

    assert_eq!(graph.vertex_count(), 4);
    let distance = shortest_path(&graph, "G1", "G3").distance().unwrap();
    assert!((distance - 13.0).abs() < 1e-9);
}

#[test]
fn test_vertex_count_matches_distinct_keys() {
    let points = [
        ((0.0, 0.0), (1.0, 0.0)),
        ((1.0, 0.0), (1.0, 1.0)),
        ((1.0, 1.0), (0.0, 0.0)),
        ((5.0, 5.0), (1.0, 1.0)),
        ((0.5, 0.25), (0.1 + 0.2, 0.0)),
        ((0.3, 0.0), (0.5, 0.25)),
    ];
    let features: Vec<SourceFeature> = points
        .iter()
        .map(|&(a, b)| {
            SourceFeature::new(Geometry::LineString(line_string![(x: a.0, y: a.1), (x: b.0, y: b.1)]))
        })
        .collect();

    let keys: HashSet<String> = points
        .iter()
        .flat_map(|&(a, b)| [a, b])
        .map(|(x, y)| location_key(geo::Point::new(x, y)))
        .collect();

    let mut source = MemorySource::new(fields(), features);
    let graph = build_street_graph(&mut source, &GraphBuildConfig::default()).unwrap();

    // 0.1 + 0.2 and 0.3 render differently, so they stay separate vertices
    assert_eq!(keys.len(), 7);
    assert_eq!(graph.vertex_count(), keys.len());
    assert_eq!(graph.edge_count(), points.len());
}

#[test]
fn test_legacy_indexing_pinned() {
    let features = vec![
        feature((1.0, 1.0), (2.0, 2.0), 5.0, Some("G1")),
        feature((2.0, 2.0), (3.0, 3.0), 7.0, None),
        feature((1.0, 1.0), (3.0, 3.0), 20.0, None),
    ];
    let config = GraphBuildConfig {
        endpoint_indexing: EndpointIndexing::Legacy,
        ..GraphBuildConfig::default()
    };
    let mut source = MemorySource::new(fields(), features);
    let graph = build_street_graph(&mut source, &config).unwrap();

    // 1:1 (start), 2:2 (unindexed end), 2:2 (start of B), 3:3 twice
    assert_eq!(graph.vertex_count(), 5);
    assert_eq!(graph.edge_count(), 3);
    assert!(graph.find_vertex_by_key("3:3").is_none());
    let unkeyed = graph
        .vertices()
        .filter(|(_, v)| v.location_key.is_empty())
        .count();
    assert_eq!(unkeyed, 3);
}

#[test]
fn test_external_id_not_overwritten() {
    let graph = scenario(vec![feature((1.0, 1.0), (9.0, 9.0), 1.0, Some("LATE"))]);
    let vertex = graph.find_vertex_by_key("1:1").unwrap();

    assert_eq!(graph.vertex(vertex).unwrap().external_id.as_deref(), Some("G1"));
    assert!(graph.find_vertex_by_external_id("LATE").is_none());
}

#[test]
fn test_multi_line_endpoints_from_first_and_last_part() {
    let multi = MultiLineString::new(vec![
        line_string![(x: 0.0, y: 0.0), (x: 1.0, y: 0.0)],
        line_string![(x: 4.0, y: 0.0), (x: 5.0, y: 0.0)],
    ]);
    let mut source = MemorySource::new(
        fields(),
        vec![SourceFeature::new(Geometry::MultiLineString(multi)).with_attribute("geoid", "M")],
    );
    let graph = build_street_graph(&mut source, &GraphBuildConfig::default()).unwrap();

    assert!(graph.find_vertex_by_key("0:0").is_some());
    assert!(graph.find_vertex_by_key("0:5").is_some());
    assert!(graph.find_vertex_by_key("0:1").is_none());
    let edge = graph.edges(graph.find_vertex_by_key("0:0").unwrap()).next().unwrap();
    assert_eq!(edge.weight().weight, 5.0);
}

#[test]
fn test_unknown_and_unreachable_are_distinct() {
    let graph = scenario(vec![feature((50.0, 50.0), (51.0, 50.0), 1.0, Some("ISLAND"))]);

    assert_eq!(
        shortest_path(&graph, "G1", "missing"),
        PathOutcome::NotFound(MissingEndpoint::End)
    );
    assert_eq!(shortest_path(&graph, "G1", "ISLAND"), PathOutcome::Unreachable);
}

#[test]
fn test_property_listing_mentions_every_field() {
    let graph = scenario(Vec::new());
    let listing = graph.list_properties();

    for name in ["geoid", "latlon", "name", "weight_dist"] {
        assert!(listing.contains(name), "missing {name} in {listing}");
    }
}

#[test]
fn test_grid_ids_stick_when_faces_start_at_new_intersections() {
    // Each intersection emits faces to its left and lower neighbours, which
    // already exist, so it is created as a start point and keeps its id
    let side = 6_usize;
    let mut features = Vec::new();
    for row in 0..side {
        for col in 0..side {
            let (x, y) = (col as f64, row as f64);
            let id = format!("r{row}c{col}");
            if col > 0 {
                features.push(feature((x, y), (x - 1.0, y), 1.0, Some(id.as_str())));
            }
            if row > 0 {
                features.push(feature((x, y), (x, y - 1.0), 1.0, Some(id.as_str())));
            }
        }
    }
    let mut source = MemorySource::new(fields(), features);
    let graph = build_street_graph(&mut source, &GraphBuildConfig::default()).unwrap();

    assert_eq!(graph.vertex_count(), side * side);
    assert_eq!(graph.edge_count(), 2 * side * (side - 1));
    let with_id = graph
        .vertices()
        .filter(|(_, v)| v.external_id.is_some())
        .count();
    // the origin emits no face of its own
    assert_eq!(with_id, side * side - 1);
    assert!(graph.find_vertex_by_external_id("r0c0").is_none());

    let far = format!("r{}c{}", side - 1, side - 1);
    let path = shortest_path(&graph, "r0c1", &far).path().cloned().unwrap();
    assert_eq!(path.distance, (2 * side - 3) as f64);
    assert_eq!(path.edges.len(), 2 * side - 3);
}
