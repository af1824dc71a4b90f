use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

/// Three-level classification of how far a measurement deviates from its
/// configured limit. Computed upstream by the backend.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Severity {
    High,
    Medium,
    Low,
}

impl Severity {
    pub const ALL: [Severity; 3] = [Severity::High, Severity::Medium, Severity::Low];

    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::High => "High",
            Severity::Medium => "Medium",
            Severity::Low => "Low",
        }
    }

    /// Lowercase name used for style-class lookups (`severity-high` etc.).
    pub fn class_name(&self) -> &'static str {
        match self {
            Severity::High => "high",
            Severity::Medium => "medium",
            Severity::Low => "low",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Severity {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.to_ascii_lowercase().as_str() {
            "high" => Ok(Severity::High),
            "medium" => Ok(Severity::Medium),
            "low" => Ok(Severity::Low),
            other => Err(format!("unknown severity: {}", other)),
        }
    }
}

/// One surveyed pavement reading as delivered by the backend.
///
/// Field names follow the camelCase wire format of the ingest service.
/// Every attribute other than the coordinates and the severity may be
/// absent; absent values render as the literal `N/A`, never omitted.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MeasurementPoint {
    pub lat: f64,
    pub lng: f64,
    #[serde(default)]
    pub highway: Option<String>,
    #[serde(default)]
    pub lane: Option<String>,
    #[serde(
        default,
        rename = "startChainage",
        deserialize_with = "string_or_number"
    )]
    pub start_chainage: Option<String>,
    #[serde(default, rename = "endChainage", deserialize_with = "string_or_number")]
    pub end_chainage: Option<String>,
    #[serde(default)]
    pub structure: Option<String>,
    #[serde(default, rename = "type")]
    pub measurement_type: Option<String>,
    #[serde(default)]
    pub value: Option<f64>,
    #[serde(default)]
    pub unit: Option<String>,
    #[serde(default)]
    pub limit: Option<f64>,
    pub severity: Severity,
    #[serde(default)]
    pub datetime: Option<String>,
}

impl MeasurementPoint {
    /// Finite coordinates inside geographic range.
    pub fn has_valid_coordinates(&self) -> bool {
        self.lat.is_finite()
            && self.lng.is_finite()
            && (-90.0..=90.0).contains(&self.lat)
            && (-180.0..=180.0).contains(&self.lng)
    }

    /// Google Maps link derived from the coordinates.
    pub fn maps_link(&self) -> String {
        format!("https://maps.google.com/?q={},{}", self.lat, self.lng)
    }
}

/// Renders an optional field the way the reference UI does.
pub fn or_na<T: fmt::Display>(value: &Option<T>) -> String {
    match value {
        Some(inner) => inner.to_string(),
        None => "N/A".to_string(),
    }
}

/// Chainage markers arrive as either strings or bare numbers depending on
/// the survey file; both normalize to a string.
fn string_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Text(String),
        Number(f64),
    }

    let raw = Option::<Raw>::deserialize(deserializer)?;
    Ok(raw.map(|value| match value {
        Raw::Text(text) => text,
        Raw::Number(number) if number.fract() == 0.0 => format!("{}", number as i64),
        Raw::Number(number) => format!("{}", number),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_point() -> MeasurementPoint {
        MeasurementPoint {
            lat: 28.6,
            lng: 77.2,
            highway: Some("NH-44".into()),
            lane: Some("L1".into()),
            start_chainage: Some("100".into()),
            end_chainage: Some("200".into()),
            structure: None,
            measurement_type: Some("Roughness".into()),
            value: Some(2650.0),
            unit: Some("mm/km".into()),
            limit: Some(2400.0),
            severity: Severity::Medium,
            datetime: None,
        }
    }

    #[test]
    fn coordinate_validation_rejects_out_of_range() {
        let mut point = base_point();
        assert!(point.has_valid_coordinates());
        point.lat = 91.0;
        assert!(!point.has_valid_coordinates());
        point.lat = f64::NAN;
        assert!(!point.has_valid_coordinates());
    }

    #[test]
    fn maps_link_uses_lat_then_lng() {
        let mut point = base_point();
        point.lat = 1.0;
        point.lng = 2.0;
        assert_eq!(point.maps_link(), "https://maps.google.com/?q=1,2");
    }

    #[test]
    fn missing_fields_render_as_na() {
        let point = base_point();
        assert_eq!(or_na(&point.structure), "N/A");
        assert_eq!(or_na(&point.highway), "NH-44");
    }

    #[test]
    fn wire_format_accepts_numeric_chainage() {
        let json = r#"{
            "lat": 12.9,
            "lng": 77.6,
            "startChainage": 300,
            "endChainage": "400",
            "type": "Rutting",
            "severity": "High"
        }"#;
        let point: MeasurementPoint = serde_json::from_str(json).unwrap();
        assert_eq!(point.start_chainage.as_deref(), Some("300"));
        assert_eq!(point.end_chainage.as_deref(), Some("400"));
        assert_eq!(point.measurement_type.as_deref(), Some("Rutting"));
        assert_eq!(point.severity, Severity::High);
        assert!(point.value.is_none());
    }

    #[test]
    fn severity_parses_case_insensitive() {
        assert_eq!("high".parse::<Severity>().unwrap(), Severity::High);
        assert_eq!("Medium".parse::<Severity>().unwrap(), Severity::Medium);
        assert!("critical".parse::<Severity>().is_err());
    }
}
