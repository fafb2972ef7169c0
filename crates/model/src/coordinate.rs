use schemars::{
    gen::SchemaGenerator,
    schema::{InstanceType, Schema, SchemaObject},
    JsonSchema,
};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

/// A validated position, serialized in GeoJSON order as `[lon, lat]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinate {
    pub longitude: f64,
    pub latitude: f64,
}

impl Coordinate {
    pub fn new(longitude: f64, latitude: f64) -> Self {
        Self {
            longitude,
            latitude,
        }
    }

    /// Both components finite and within the WGS84 value ranges.
    pub fn in_range(longitude: f64, latitude: f64) -> bool {
        longitude.is_finite()
            && latitude.is_finite()
            && (-180.0..=180.0).contains(&longitude)
            && (-90.0..=90.0).contains(&latitude)
    }

    /// Accepts exactly 2-element numeric arrays with in-range components.
    /// Anything else is rejected, never coerced.
    pub fn from_value(value: &Value) -> Option<Self> {
        let pair = value.as_array()?;
        if pair.len() != 2 {
            return None;
        }
        let longitude = pair[0].as_f64()?;
        let latitude = pair[1].as_f64()?;
        if Self::in_range(longitude, latitude) {
            Some(Self::new(longitude, latitude))
        } else {
            None
        }
    }

    /// Keeps the valid elements of a raw coordinate array, preserving order.
    /// Malformed upstream data is expected, so invalid elements are dropped
    /// silently instead of failing the batch.
    pub fn filter_valid(values: &[Value]) -> Vec<Self> {
        values.iter().filter_map(Self::from_value).collect()
    }

    /// Great-circle distance to `other` in meters.
    pub fn distance_m(&self, other: &Self) -> f64 {
        utility::geo::haversine_distance(
            self.latitude,
            self.longitude,
            other.latitude,
            other.longitude,
        )
    }
}

impl Serialize for Coordinate {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        (self.longitude, self.latitude).serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Coordinate {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let [longitude, latitude] = <[f64; 2]>::deserialize(deserializer)?;
        Ok(Self::new(longitude, latitude))
    }
}

impl JsonSchema for Coordinate {
    fn schema_name() -> String {
        "Coordinate".to_owned()
    }

    fn json_schema(_gen: &mut SchemaGenerator) -> Schema {
        SchemaObject {
            instance_type: Some(InstanceType::Array.into()),
            format: Some("[lon, lat]".to_owned()),
            ..Default::default()
        }
        .into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn accepts_in_range_pairs() {
        let value = json!([85.4293, 28.2134]);
        let coordinate = Coordinate::from_value(&value).unwrap();
        assert_eq!(coordinate.longitude, 85.4293);
        assert_eq!(coordinate.latitude, 28.2134);
    }

    #[test]
    fn accepts_boundary_values() {
        assert!(Coordinate::from_value(&json!([-180.0, -90.0])).is_some());
        assert!(Coordinate::from_value(&json!([180.0, 90.0])).is_some());
    }

    #[test]
    fn rejects_out_of_range_pairs() {
        assert!(Coordinate::from_value(&json!([180.1, 0.0])).is_none());
        assert!(Coordinate::from_value(&json!([0.0, -90.5])).is_none());
    }

    #[test]
    fn rejects_wrong_arity_and_non_numbers() {
        assert!(Coordinate::from_value(&json!([85.4293])).is_none());
        assert!(Coordinate::from_value(&json!([85.4, 28.2, 0.0])).is_none());
        assert!(Coordinate::from_value(&json!(["85.4", 28.2])).is_none());
        assert!(Coordinate::from_value(&json!(null)).is_none());
        assert!(Coordinate::from_value(&json!({"lon": 85.4})).is_none());
    }

    #[test]
    fn rejects_non_finite_components() {
        assert!(!Coordinate::in_range(f64::NAN, 28.2));
        assert!(!Coordinate::in_range(85.4, f64::INFINITY));
    }

    #[test]
    fn filtering_preserves_order_and_drops_invalid() {
        let values = vec![
            json!([85.4293, 28.2134]),
            json!("junk"),
            json!([200.0, 0.0]),
            json!([85.4305, 28.2140]),
        ];
        let valid = Coordinate::filter_valid(&values);
        assert_eq!(valid.len(), 2);
        assert_eq!(valid[0].longitude, 85.4293);
        assert_eq!(valid[1].longitude, 85.4305);
    }

    #[test]
    fn serializes_in_geojson_order() {
        let coordinate = Coordinate::new(85.4293, 28.2134);
        let value = serde_json::to_value(coordinate).unwrap();
        assert_eq!(value, json!([85.4293, 28.2134]));
    }
}
