//! Firestore typed values
//!
//! The REST API wraps every field in a one-key object naming its type
//! (`{"stringValue": "x"}`, `{"mapValue": {"fields": {...}}}`). These types
//! model that encoding and convert it to and from plain JSON so records can
//! go through serde.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value as Json};
use std::collections::BTreeMap;

/// Named fields of a document or map value
pub type Fields = BTreeMap<String, FieldValue>;

/// One typed Firestore value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FieldValue {
    /// Null
    NullValue(()),
    /// Boolean
    BooleanValue(bool),
    /// 64-bit integer, transported as a decimal string
    IntegerValue(String),
    /// Double
    DoubleValue(f64),
    /// RFC 3339 timestamp
    TimestampValue(String),
    /// UTF-8 string
    StringValue(String),
    /// Base64 bytes
    BytesValue(String),
    /// Path of another document
    ReferenceValue(String),
    /// Latitude/longitude pair
    GeoPointValue(GeoPoint),
    /// Ordered list
    ArrayValue(ArrayValue),
    /// Nested fields
    MapValue(MapValue),
}

/// Geographic point value
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    /// Latitude
    #[serde(default)]
    pub latitude: f64,
    /// Longitude
    #[serde(default)]
    pub longitude: f64,
}

/// Array payload
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ArrayValue {
    /// Elements; omitted by the API when empty
    #[serde(default)]
    pub values: Vec<FieldValue>,
}

/// Map payload
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MapValue {
    /// Entries; omitted by the API when empty
    #[serde(default)]
    pub fields: Fields,
}

impl FieldValue {
    /// Encode plain JSON
    #[must_use]
    pub fn from_json(value: &Json) -> Self {
        match value {
            Json::Null => Self::NullValue(()),
            Json::Bool(b) => Self::BooleanValue(*b),
            Json::Number(n) => match n.as_i64() {
                Some(i) if !n.is_f64() => Self::IntegerValue(i.to_string()),
                _ => Self::DoubleValue(n.as_f64().unwrap_or_default()),
            },
            Json::String(s) => Self::StringValue(s.clone()),
            Json::Array(items) => Self::ArrayValue(ArrayValue {
                values: items.iter().map(Self::from_json).collect(),
            }),
            Json::Object(map) => Self::MapValue(MapValue {
                fields: fields_from_json(map),
            }),
        }
    }

    /// Decode to plain JSON
    ///
    /// Timestamps, bytes and references become strings; geo points become
    /// `{latitude, longitude}` objects.
    ///
    /// # Errors
    /// The offending text when an integer value does not parse.
    pub fn to_json(&self) -> Result<Json, String> {
        Ok(match self {
            Self::NullValue(()) => Json::Null,
            Self::BooleanValue(b) => Json::Bool(*b),
            Self::IntegerValue(s) => {
                let i: i64 = s.parse().map_err(|_| format!("bad integerValue {s:?}"))?;
                Json::Number(i.into())
            }
            Self::DoubleValue(d) => Number::from_f64(*d).map_or(Json::Null, Json::Number),
            Self::TimestampValue(s)
            | Self::StringValue(s)
            | Self::BytesValue(s)
            | Self::ReferenceValue(s) => Json::String(s.clone()),
            Self::GeoPointValue(p) => serde_json::json!({
                "latitude": p.latitude,
                "longitude": p.longitude,
            }),
            Self::ArrayValue(a) => Json::Array(
                a.values
                    .iter()
                    .map(Self::to_json)
                    .collect::<Result<_, _>>()?,
            ),
            Self::MapValue(m) => Json::Object(fields_to_json(&m.fields)?),
        })
    }
}

/// Encode a JSON object as document fields
#[must_use]
pub fn fields_from_json(map: &Map<String, Json>) -> Fields {
    map.iter()
        .map(|(k, v)| (k.clone(), FieldValue::from_json(v)))
        .collect()
}

/// Decode document fields to a JSON object
///
/// # Errors
/// See [`FieldValue::to_json`].
pub fn fields_to_json(fields: &Fields) -> Result<Map<String, Json>, String> {
    fields
        .iter()
        .map(|(k, v)| Ok((k.clone(), v.to_json()?)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn wire_shape() {
        let v = FieldValue::from_json(&json!({"lat": -37.8, "n": 3, "s": "x", "z": null}));
        assert_eq!(
            serde_json::to_value(&v).unwrap(),
            json!({"mapValue": {"fields": {
                "lat": {"doubleValue": -37.8},
                "n": {"integerValue": "3"},
                "s": {"stringValue": "x"},
                "z": {"nullValue": null},
            }}})
        );
    }

    #[test]
    fn decodes_api_response_values() {
        let wire = json!({
            "uid": {"stringValue": "u1"},
            "tags": {"arrayValue": {}},
            "at": {"geoPointValue": {"latitude": 1.5, "longitude": 2.5}},
            "count": {"integerValue": "42"},
        });
        let fields: Fields = serde_json::from_value(wire).unwrap();
        let plain = fields_to_json(&fields).unwrap();
        assert_eq!(
            Json::Object(plain),
            json!({
                "uid": "u1",
                "tags": [],
                "at": {"latitude": 1.5, "longitude": 2.5},
                "count": 42,
            })
        );
    }

    #[test]
    fn rejects_bad_integer() {
        let bad = FieldValue::IntegerValue("twelve".into());
        assert!(bad.to_json().is_err());
    }
}
