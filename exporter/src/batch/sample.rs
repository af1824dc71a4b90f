use nsvcore::model::{MeasurementPoint, Severity};
use rand::{rngs::StdRng, Rng, SeedableRng};
use serde::{Deserialize, Serialize};

const HIGHWAYS: [&str; 5] = ["NH-1", "NH-2", "NH-8", "NH-44", "NH-48"];
const LANES: [&str; 4] = ["L1", "L2", "R1", "R2"];
const MEASUREMENT_TYPES: [&str; 4] = ["Roughness", "Rutting", "Cracking", "Ravelling"];
const SAMPLE_DATETIME: &str = "2025-01-01T00:00:00";

/// Configuration for generating a demonstration survey batch.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SampleConfig {
    pub count: usize,
    pub seed: u64,
    pub description: Option<String>,
}

impl Default for SampleConfig {
    fn default() -> Self {
        Self {
            count: 100,
            seed: 0,
            description: None,
        }
    }
}

/// Severity from the measurement's deviation from its limit.
pub fn determine_severity(value: f64, limit: f64) -> Severity {
    if limit <= 0.0 {
        return Severity::Low;
    }
    let ratio = value / limit;
    if ratio > 1.5 {
        Severity::High
    } else if ratio > 1.0 {
        Severity::Medium
    } else {
        Severity::Low
    }
}

/// Builds a deterministic demo batch spread across the Indian highway
/// network, with per-type value ranges and limits from the survey standard.
pub fn build_sample_batch(config: &SampleConfig) -> Vec<MeasurementPoint> {
    let mut rng = StdRng::seed_from_u64(config.seed);
    let mut points = Vec::with_capacity(config.count);

    for index in 0..config.count {
        let lat = rng.gen_range(8.0..35.0);
        let lng = rng.gen_range(68.0..97.0);
        let highway = HIGHWAYS[rng.gen_range(0..HIGHWAYS.len())];
        let lane = LANES[rng.gen_range(0..LANES.len())];
        let kind = MEASUREMENT_TYPES[rng.gen_range(0..MEASUREMENT_TYPES.len())];

        let (value, limit, unit) = match kind {
            "Roughness" => (rng.gen_range(800.0..4000.0), 2400.0, "mm/km"),
            "Rutting" => (rng.gen_range(1.0..15.0), 5.0, "mm"),
            "Cracking" => (rng.gen_range(0.5..20.0), 5.0, "% area"),
            _ => (rng.gen_range(0.1..5.0), 1.0, "% area"),
        };
        let value = (value * 100.0_f64).round() / 100.0;

        points.push(MeasurementPoint {
            lat,
            lng,
            highway: Some(highway.to_string()),
            lane: Some(lane.to_string()),
            start_chainage: Some(format!("{}", index * 100)),
            end_chainage: Some(format!("{}", (index + 1) * 100)),
            structure: Some(format!("Structure {}", index + 1)),
            measurement_type: Some(kind.to_string()),
            value: Some(value),
            unit: Some(unit.to_string()),
            limit: Some(limit),
            severity: determine_severity(value, limit),
            datetime: Some(SAMPLE_DATETIME.to_string()),
        });
    }

    points
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn severity_thresholds_follow_the_limit_ratio() {
        assert_eq!(determine_severity(3601.0, 2400.0), Severity::High);
        assert_eq!(determine_severity(2500.0, 2400.0), Severity::Medium);
        assert_eq!(determine_severity(2000.0, 2400.0), Severity::Low);
        assert_eq!(determine_severity(1.0, 0.0), Severity::Low);
    }

    #[test]
    fn generator_is_deterministic_per_seed() {
        let config = SampleConfig {
            count: 20,
            seed: 7,
            description: None,
        };
        let first = build_sample_batch(&config);
        let second = build_sample_batch(&config);
        assert_eq!(first.len(), 20);
        assert_eq!(first, second);
    }

    #[test]
    fn generated_points_are_coherent() {
        let batch = build_sample_batch(&SampleConfig::default());
        assert_eq!(batch.len(), 100);
        for point in &batch {
            assert!(point.has_valid_coordinates());
            let value = point.value.unwrap();
            let limit = point.limit.unwrap();
            assert_eq!(point.severity, determine_severity(value, limit));
        }
    }
}
