//! CSV feature source with WKT geometries
//!
//! Reads the layout GDAL writes with `-lco GEOMETRY=AS_WKT`: a `WKT` column
//! holding the geometry, every other column an attribute. Column types come
//! from an optional `.csvt` sidecar next to the file; without one every
//! attribute is a string.

use std::path::{Path, PathBuf};

use csv::StringRecord;
use hashbrown::HashMap;
use log::{debug, warn};
use wkt::TryFromWkt;

use super::source::{FeatureIter, FeatureSource, SourceFeature};
use crate::Error;
use crate::model::{FieldDefinition, PropertyType, PropertyValue};

const GEOMETRY_COLUMN: &str = "WKT";

#[derive(Debug, Clone)]
pub struct CsvWktSource {
    fields: Vec<FieldDefinition>,
    /// Column index of every field in `fields`
    columns: Vec<usize>,
    geometry_column: usize,
    records: Vec<StringRecord>,
}

impl CsvWktSource {
    /// Opens a CSV file and its `.csvt` sidecar, if present
    ///
    /// # Errors
    ///
    /// Returns `SourceRead` if the file cannot be read or has no `WKT` column
    pub fn open(path: impl AsRef<Path>) -> Result<Self, Error> {
        let path = path.as_ref();
        let read_error = |reason: String| Error::SourceRead {
            path: path.display().to_string(),
            reason,
        };

        let mut reader = csv::Reader::from_path(path).map_err(|e| read_error(e.to_string()))?;
        let headers = reader
            .headers()
            .map_err(|e| read_error(e.to_string()))?
            .clone();
        let records = reader
            .records()
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| read_error(e.to_string()))?;

        let sidecar = sidecar_path(path);
        let column_types = if sidecar.exists() {
            let text = std::fs::read_to_string(&sidecar).map_err(|e| read_error(e.to_string()))?;
            Some(parse_csvt(&text))
        } else {
            None
        };

        let source = Self::from_parts(&headers, column_types.as_deref(), records)
            .map_err(|e| read_error(e.to_string()))?;
        debug!(
            "Opened CSV source {} with {} records and {} fields",
            path.display(),
            source.records.len(),
            source.fields.len()
        );
        Ok(source)
    }

    fn from_parts(
        headers: &StringRecord,
        column_types: Option<&[String]>,
        records: Vec<StringRecord>,
    ) -> Result<Self, Error> {
        let geometry_column = headers
            .iter()
            .position(|h| h.eq_ignore_ascii_case(GEOMETRY_COLUMN))
            .ok_or_else(|| Error::InvalidData(format!("no {GEOMETRY_COLUMN} column")))?;

        if let Some(types) = column_types
            && types.len() != headers.len()
        {
            warn!(
                "csvt sidecar lists {} types for {} columns; missing ones are read as strings",
                types.len(),
                headers.len()
            );
        }

        let mut fields = Vec::with_capacity(headers.len().saturating_sub(1));
        let mut columns = Vec::with_capacity(headers.len().saturating_sub(1));
        for (idx, name) in headers.iter().enumerate() {
            if idx == geometry_column {
                continue;
            }
            let field_type = column_types
                .and_then(|types| types.get(idx))
                .map_or(PropertyType::String, |t| PropertyType::from_source_type(t));
            fields.push(FieldDefinition::new(name, field_type));
            columns.push(idx);
        }

        Ok(Self {
            fields,
            columns,
            geometry_column,
            records,
        })
    }

    fn convert_record(&self, record: &StringRecord) -> Result<SourceFeature, Error> {
        let geometry = match record.get(self.geometry_column).map(str::trim) {
            None | Some("") => None,
            Some(text) => Some(
                geo::Geometry::<f64>::try_from_wkt_str(text)
                    .map_err(|e| Error::InvalidData(format!("invalid WKT: {e}")))?,
            ),
        };

        let mut attributes = HashMap::with_capacity(self.fields.len());
        for (field, &column) in self.fields.iter().zip(&self.columns) {
            let raw = record.get(column).unwrap_or_default();
            attributes.insert(field.name.clone(), parse_value(field, raw)?);
        }

        Ok(SourceFeature {
            geometry,
            attributes,
        })
    }
}

impl FeatureSource for CsvWktSource {
    fn fields(&self) -> &[FieldDefinition] {
        &self.fields
    }

    fn feature_count(&self) -> usize {
        self.records.len()
    }

    fn features(&mut self) -> FeatureIter<'_> {
        Box::new(self.records.iter().map(|record| self.convert_record(record)))
    }
}

fn sidecar_path(path: &Path) -> PathBuf {
    path.with_extension("csvt")
}

/// Parses a `.csvt` line such as `"WKT","String","Integer(10)","Real(12.3)"`
fn parse_csvt(text: &str) -> Vec<String> {
    text.lines()
        .next()
        .unwrap_or_default()
        .split(',')
        .map(|t| {
            let t = t.trim().trim_matches('"');
            t.split('(').next().unwrap_or(t).trim().to_string()
        })
        .collect()
}

fn parse_value(field: &FieldDefinition, raw: &str) -> Result<PropertyValue, Error> {
    let type_error = || Error::AttributeType {
        field: field.name.clone(),
        expected: field.field_type,
        found: "string",
    };

    match field.field_type {
        PropertyType::String => Ok(PropertyValue::String(raw.to_string())),
        _ if raw.trim().is_empty() => Ok(PropertyValue::Null),
        PropertyType::Integer => raw
            .trim()
            .parse::<i64>()
            .map(PropertyValue::Integer)
            .map_err(|_| type_error()),
        PropertyType::Float => raw
            .trim()
            .parse::<f64>()
            .map(PropertyValue::Float)
            .map_err(|_| type_error()),
    }
}
