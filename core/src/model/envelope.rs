use crate::model::point::MeasurementPoint;
use crate::model::stats::Statistics;
use serde::{Deserialize, Serialize};

/// Wire envelope returned by every backend data endpoint.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DataEnvelope {
    #[serde(default)]
    pub data: Vec<MeasurementPoint>,
    #[serde(default)]
    pub statistics: Statistics,
    #[serde(default)]
    pub total_points: usize,
}

impl DataEnvelope {
    pub fn new(data: Vec<MeasurementPoint>, statistics: Statistics) -> Self {
        let total_points = data.len();
        Self {
            data,
            statistics,
            total_points,
        }
    }
}

/// GET /export response body.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExportPayload {
    #[serde(default)]
    pub csv_content: String,
    #[serde(default)]
    pub filename: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn envelope_tolerates_missing_fields() {
        let envelope: DataEnvelope = serde_json::from_str("{}").unwrap();
        assert!(envelope.data.is_empty());
        assert_eq!(envelope.statistics.total, 0);
        assert_eq!(envelope.total_points, 0);
    }

    #[test]
    fn envelope_roundtrips_a_batch() {
        let json = r#"{
            "data": [{"lat": 10.0, "lng": 76.0, "severity": "Low"}],
            "statistics": {"total": 1, "low": 1},
            "total_points": 1
        }"#;
        let envelope: DataEnvelope = serde_json::from_str(json).unwrap();
        assert_eq!(envelope.data.len(), 1);
        assert_eq!(envelope.statistics.low, 1);
    }
}
