//! Feature sources: ordered streams of line geometries with typed attributes

use std::path::Path;

use geo::Geometry;
use hashbrown::HashMap;

use super::{CsvWktSource, GeoJsonSource};
use crate::Error;
use crate::model::{FieldDefinition, PropertyValue};

/// One input record
#[derive(Debug, Clone, Default)]
pub struct SourceFeature {
    pub geometry: Option<Geometry<f64>>,
    pub attributes: HashMap<String, PropertyValue>,
}

impl SourceFeature {
    pub fn new(geometry: Geometry<f64>) -> Self {
        Self {
            geometry: Some(geometry),
            attributes: HashMap::new(),
        }
    }

    /// Builder-style attribute setter
    #[must_use]
    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<PropertyValue>) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }

    pub fn attribute(&self, name: &str) -> Option<&PropertyValue> {
        self.attributes.get(name)
    }
}

pub type FeatureIter<'a> = Box<dyn Iterator<Item = Result<SourceFeature, Error>> + 'a>;

/// Supplier of input records for graph construction
pub trait FeatureSource {
    /// Field names and types, known before reading any record
    fn fields(&self) -> &[FieldDefinition];

    /// Total number of records the source will yield
    fn feature_count(&self) -> usize;

    /// Records in source order. A read failure is yielded as an error item.
    fn features(&mut self) -> FeatureIter<'_>;
}

/// Feature source over records held in memory
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    fields: Vec<FieldDefinition>,
    features: Vec<SourceFeature>,
}

impl MemorySource {
    pub fn new(fields: Vec<FieldDefinition>, features: Vec<SourceFeature>) -> Self {
        Self { fields, features }
    }

    pub fn push(&mut self, feature: SourceFeature) {
        self.features.push(feature);
    }
}

impl FeatureSource for MemorySource {
    fn fields(&self) -> &[FieldDefinition] {
        &self.fields
    }

    fn feature_count(&self) -> usize {
        self.features.len()
    }

    fn features(&mut self) -> FeatureIter<'_> {
        Box::new(self.features.iter().cloned().map(Ok))
    }
}

/// Opens a feature source, choosing the reader by file extension
/// (`.geojson`/`.json` or `.csv`)
///
/// # Errors
///
/// Returns `SourceRead` for unknown extensions or unreadable files
pub fn open_feature_source(path: &Path) -> Result<Box<dyn FeatureSource>, Error> {
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase);

    match extension.as_deref() {
        Some("geojson" | "json") => Ok(Box::new(GeoJsonSource::open(path)?)),
        Some("csv") => Ok(Box::new(CsvWktSource::open(path)?)),
        _ => Err(Error::SourceRead {
            path: path.display().to_string(),
            reason: "unsupported file type, expected .geojson, .json or .csv".to_string(),
        }),
    }
}
