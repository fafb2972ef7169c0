use serde::Deserialize;
use serde_json::Value;

/// Wire types for the backend's GeoJSON payloads. Coordinates stay raw
/// `Value`s here; validation happens downstream, one element at a time, so a
/// malformed entry drops that entry instead of the batch.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type")]
pub enum GeoJson {
    Feature(Feature),
    FeatureCollection(FeatureCollection),
}

#[derive(Debug, Clone, Deserialize)]
pub struct Feature {
    #[serde(default)]
    pub properties: Option<Properties>,
    #[serde(default)]
    pub geometry: Option<Geometry>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct FeatureCollection {
    #[serde(default)]
    pub features: Vec<Feature>,
}

/// Combined-mode features are tagged with `detection_type` and carry a
/// `color` hint for the renderer.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Properties {
    #[serde(default)]
    pub detection_type: Option<String>,
    #[serde(default)]
    pub color: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Geometry {
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default)]
    pub coordinates: Value,
}

impl Feature {
    fn detection_type(&self) -> Option<&str> {
        self.properties.as_ref()?.detection_type.as_deref()
    }

    fn geometry_kind(&self) -> &str {
        self.geometry
            .as_ref()
            .map(|geometry| geometry.kind.as_str())
            .unwrap_or_default()
    }
}

/// Raw trail positions: `geometry.coordinates` of each feature when it is an
/// array, otherwise nothing. Missing geometry and non-array coordinates are
/// an expected per-tick condition, never an error.
pub fn trail_coordinates(geojson: &GeoJson) -> Vec<Value> {
    features(geojson)
        .iter()
        .flat_map(line_coordinates)
        .collect()
}

/// Boundary rings of the landslide payload, one per polygon feature. The
/// `coordinates` member is treated as a ring list with ring 0 as the
/// boundary; a bare ring (positions directly under `coordinates`) is
/// recognized by nesting depth and used as-is.
pub fn polygon_rings(geojson: &GeoJson) -> Vec<Vec<Value>> {
    features(geojson).iter().filter_map(first_ring).collect()
}

/// Splits a combined-mode payload into trail positions and landslide rings
/// by the `detection_type` tag. Untagged features fall back to their
/// geometry type.
pub fn split_combined(geojson: &GeoJson) -> (Vec<Value>, Vec<Vec<Value>>) {
    let mut trail = Vec::new();
    let mut rings = Vec::new();
    for feature in features(geojson) {
        let treat_as_polygon = match feature.detection_type() {
            Some("landslide") => true,
            Some("trail") => false,
            _ => feature.geometry_kind() == "Polygon",
        };
        if treat_as_polygon {
            rings.extend(first_ring(feature));
        } else {
            trail.extend(line_coordinates(feature));
        }
    }
    (trail, rings)
}

fn features(geojson: &GeoJson) -> &[Feature] {
    match geojson {
        GeoJson::Feature(feature) => std::slice::from_ref(feature),
        GeoJson::FeatureCollection(collection) => &collection.features,
    }
}

fn line_coordinates(feature: &Feature) -> Vec<Value> {
    feature
        .geometry
        .as_ref()
        .and_then(|geometry| geometry.coordinates.as_array())
        .cloned()
        .unwrap_or_default()
}

fn first_ring(feature: &Feature) -> Option<Vec<Value>> {
    let coordinates = feature.geometry.as_ref()?.coordinates.as_array()?;
    let head = coordinates.first()?.as_array()?;
    if head.first().map(Value::is_number).unwrap_or(false) {
        // bare ring, positions sit directly under `coordinates`
        Some(coordinates.clone())
    } else {
        Some(head.clone())
    }
}
