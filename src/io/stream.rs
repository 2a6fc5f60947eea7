use crate::error::PagesError;
use crate::project::PageFeature;
use geojson::feature::Id;
use geojson::{Feature, FeatureCollection, Geometry, Value};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use tracing::info;

/// Conversion of projected pages into GeoJSON values.
pub trait FeaturesToGeoJson {
    /// One GeoJSON Feature per page, keyed by the page identifier.
    fn to_geojson_features(&self) -> Result<Vec<Feature>, PagesError>;
}

impl FeaturesToGeoJson for [PageFeature] {
    fn to_geojson_features(&self) -> Result<Vec<Feature>, PagesError> {
        self.iter().map(PageFeature::to_geojson).collect()
    }
}

impl FeaturesToGeoJson for Vec<PageFeature> {
    fn to_geojson_features(&self) -> Result<Vec<Feature>, PagesError> {
        self.as_slice().to_geojson_features()
    }
}

impl PageFeature {
    /// Converts this page to a GeoJSON Feature with a Polygon geometry.
    pub fn to_geojson(&self) -> Result<Feature, PagesError> {
        let properties = match serde_json::to_value(&self.properties)? {
            serde_json::Value::Object(map) => map,
            other => {
                return Err(PagesError::SerializationError(format!(
                    "properties serialized to {other}, expected an object"
                )));
            }
        };

        Ok(Feature {
            bbox: None,
            geometry: Some(Geometry::new(Value::from(&self.geometry))),
            id: Some(Id::String(self.id.clone())),
            properties: Some(properties),
            foreign_members: None,
        })
    }
}

/// Writes one GeoJSON Feature per line.
///
/// Returns the number of features written. The writer is flushed before
/// returning; on error the stream is incomplete.
pub fn write_features<'a, W, I>(features: I, writer: W) -> Result<usize, PagesError>
where
    W: Write,
    I: IntoIterator<Item = &'a PageFeature>,
{
    let mut writer = BufWriter::new(writer);
    let mut count = 0;
    for feature in features {
        serde_json::to_writer(&mut writer, &feature.to_geojson()?)?;
        writer.write_all(b"\n")?;
        count += 1;
    }
    writer.flush()?;
    Ok(count)
}

/// Aggregates pages into a single FeatureCollection.
pub fn to_feature_collection(features: &[PageFeature]) -> Result<FeatureCollection, PagesError> {
    Ok(FeatureCollection {
        bbox: None,
        features: features.to_geojson_features()?,
        foreign_members: None,
    })
}

/// Writes pages as a single FeatureCollection document.
pub fn write_feature_collection(
    features: &[PageFeature],
    path: impl AsRef<Path>,
) -> Result<(), PagesError> {
    let collection = to_feature_collection(features)?;
    let file = File::create(path.as_ref())?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer(&mut writer, &collection)?;
    writer.flush()?;
    info!(
        path = %path.as_ref().display(),
        count = features.len(),
        "wrote feature collection"
    );
    Ok(())
}
