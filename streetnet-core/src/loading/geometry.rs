//! Reduction of line geometries to a single simple line

use std::borrow::Cow;

use geo::{Coord, Geometry, LineString};

use crate::Error;

/// Reduces a line geometry to one ordered point sequence.
///
/// A `LineString` is borrowed unchanged. The parts of a `MultiLineString`
/// are concatenated in input order; gaps between parts are kept as they are,
/// no reordering or stitching takes place.
pub fn normalize(geometry: &Geometry<f64>) -> Result<Cow<'_, LineString<f64>>, Error> {
    let line = match geometry {
        Geometry::LineString(line) => Cow::Borrowed(line),
        Geometry::MultiLineString(multi) => {
            let point_count = multi.0.iter().map(|part| part.0.len()).sum();
            let mut coords: Vec<Coord<f64>> = Vec::with_capacity(point_count);
            for part in &multi.0 {
                coords.extend(part.0.iter().copied());
            }
            Cow::Owned(LineString::new(coords))
        }
        Geometry::Line(line) => Cow::Owned(LineString::new(vec![line.start, line.end])),
        other => return Err(Error::UnsupportedGeometryKind(geometry_kind(other))),
    };

    if line.0.is_empty() {
        return Err(Error::EmptyGeometry);
    }
    Ok(line)
}

/// Planar length in the geometry's native units
pub fn planar_length(line: &LineString<f64>) -> f64 {
    line.lines().map(|segment| segment.dx().hypot(segment.dy())).sum()
}

fn geometry_kind(geometry: &Geometry<f64>) -> &'static str {
    match geometry {
        Geometry::Point(_) => "Point",
        Geometry::Line(_) => "Line",
        Geometry::LineString(_) => "LineString",
        Geometry::Polygon(_) => "Polygon",
        Geometry::MultiPoint(_) => "MultiPoint",
        Geometry::MultiLineString(_) => "MultiLineString",
        Geometry::MultiPolygon(_) => "MultiPolygon",
        Geometry::GeometryCollection(_) => "GeometryCollection",
        Geometry::Rect(_) => "Rect",
        Geometry::Triangle(_) => "Triangle",
    }
}
