//! Site metadata reader.
//!
//! Pour points arrive as a GeoJSON FeatureCollection; each feature maps
//! the model's internal UUID to a USGS gauge code and, where the
//! crosswalk succeeded, an NHD+ COMID. Coordinates classify each site
//! into its region key.

use std::path::Path;

use serde::Deserialize;
use serde_json::Value;

use crate::error::IoError;

/// Immutable reference data for one site, loaded once at run start.
#[derive(Debug, Clone)]
pub struct SiteMeta {
    /// Internal model identifier.
    pub uuid: String,
    /// USGS gauge code, zero-padded to 8 digits.
    pub gauge_id: Option<String>,
    /// NHD+ reach identifier for the NWM crosswalk.
    pub comid: Option<i64>,
    pub lon: f64,
    pub lat: f64,
    /// Region grouping key classified from the coordinates.
    pub state: String,
}

#[derive(Debug, Deserialize)]
struct FeatureCollection {
    features: Vec<Feature>,
}

#[derive(Debug, Deserialize)]
struct Feature {
    properties: Properties,
    geometry: Geometry,
}

#[derive(Debug, Deserialize)]
struct Properties {
    #[serde(rename = "UUID")]
    uuid: Option<Value>,
    site_id: Option<Value>,
    comid: Option<i64>,
}

#[derive(Debug, Deserialize)]
struct Geometry {
    /// [lon, lat] with an occasional trailing elevation.
    coordinates: Vec<f64>,
}

/// Reads pour-point metadata, sorted by UUID.
///
/// Features without a UUID are dropped. Gauge ids appear in the source as
/// either strings or bare numbers; both are normalized to 8-digit
/// zero-padded strings.
///
/// # Errors
///
/// Returns [`IoError::FileNotFound`] for a missing file or
/// [`IoError::Json`] if the document does not parse as a
/// FeatureCollection.
pub fn read_sites(path: &Path) -> Result<Vec<SiteMeta>, IoError> {
    if !path.exists() {
        return Err(IoError::FileNotFound {
            path: path.to_path_buf(),
        });
    }

    let text = std::fs::read_to_string(path).map_err(|e| IoError::Json {
        reason: e.to_string(),
    })?;
    let collection: FeatureCollection =
        serde_json::from_str(&text).map_err(|e| IoError::Json {
            reason: e.to_string(),
        })?;

    let mut sites: Vec<SiteMeta> = collection
        .features
        .into_iter()
        .filter_map(|feature| {
            let uuid = feature.properties.uuid.as_ref().and_then(value_to_string)?;
            let [lon, lat, ..] = feature.geometry.coordinates[..] else {
                return None;
            };
            Some(SiteMeta {
                uuid,
                gauge_id: feature
                    .properties
                    .site_id
                    .as_ref()
                    .and_then(value_to_string)
                    .map(|s| format!("{s:0>8}")),
                comid: feature.properties.comid,
                lon,
                lat,
                state: state_for_location(lon, lat).to_string(),
            })
        })
        .collect();

    sites.sort_by(|a, b| a.uuid.cmp(&b.uuid));
    Ok(sites)
}

/// Classifies coordinates into the validation regions.
///
/// Coarse bounding boxes around the three study states; anything outside
/// falls into "Other".
pub fn state_for_location(lon: f64, lat: f64) -> &'static str {
    if -107.0 < lon && lon < -93.0 && 25.0 < lat && lat < 37.0 {
        "TX"
    } else if -125.0 < lon && lon < -114.0 && 32.0 < lat && lat < 42.0 {
        "CA"
    } else if -85.0 < lon && lon < -75.0 && 33.0 < lat && lat < 37.0 {
        "NC"
    } else {
        "Other"
    }
}

/// Renders a GeoJSON property that may be a string or a bare number.
fn value_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}
