use crate::model::point::{or_na, MeasurementPoint, Severity};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Per-category severity tally.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct SeverityCounts {
    pub total: u64,
    pub high: u64,
    pub medium: u64,
    pub low: u64,
}

impl SeverityCounts {
    fn bump(&mut self, severity: Severity) {
        self.total += 1;
        match severity {
            Severity::High => self.high += 1,
            Severity::Medium => self.medium += 1,
            Severity::Low => self.low += 1,
        }
    }
}

/// Aggregate counts supplied by the backend alongside each data batch.
///
/// Two copies circulate in the client: the original statistics (full
/// unfiltered dataset) and the detailed statistics (most recent operation,
/// filters included). Filtering must never perturb the original copy.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Statistics {
    #[serde(default)]
    pub total: u64,
    #[serde(default)]
    pub high: u64,
    #[serde(default)]
    pub medium: u64,
    #[serde(default)]
    pub low: u64,
    #[serde(default)]
    pub by_type: BTreeMap<String, SeverityCounts>,
    #[serde(default)]
    pub by_highway: BTreeMap<String, SeverityCounts>,
}

impl Statistics {
    /// The cleared state shown before any data is loaded.
    pub fn zero() -> Self {
        Self::default()
    }

    /// Recomputes the aggregate from a batch, mirroring the backend's
    /// per-response statistics pass. The client itself only recomputes for
    /// the offline stub; live responses carry their own statistics.
    pub fn from_points(points: &[MeasurementPoint]) -> Self {
        let mut stats = Statistics::zero();
        for point in points {
            stats.total += 1;
            match point.severity {
                Severity::High => stats.high += 1,
                Severity::Medium => stats.medium += 1,
                Severity::Low => stats.low += 1,
            }
            stats
                .by_type
                .entry(or_na(&point.measurement_type))
                .or_default()
                .bump(point.severity);
            stats
                .by_highway
                .entry(or_na(&point.highway))
                .or_default()
                .bump(point.severity);
        }
        stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn point(severity: Severity, highway: &str, kind: &str) -> MeasurementPoint {
        MeasurementPoint {
            lat: 20.0,
            lng: 78.0,
            highway: Some(highway.into()),
            lane: None,
            start_chainage: None,
            end_chainage: None,
            structure: None,
            measurement_type: Some(kind.into()),
            value: None,
            unit: None,
            limit: None,
            severity,
            datetime: None,
        }
    }

    #[test]
    fn zero_statistics_are_all_empty() {
        let stats = Statistics::zero();
        assert_eq!(stats.total, 0);
        assert!(stats.by_type.is_empty());
        assert!(stats.by_highway.is_empty());
    }

    #[test]
    fn from_points_tallies_by_category() {
        let points = vec![
            point(Severity::High, "NH-1", "Roughness"),
            point(Severity::High, "NH-1", "Rutting"),
            point(Severity::Low, "NH-2", "Roughness"),
        ];
        let stats = Statistics::from_points(&points);
        assert_eq!(stats.total, 3);
        assert_eq!(stats.high, 2);
        assert_eq!(stats.low, 1);
        assert_eq!(stats.by_highway["NH-1"].total, 2);
        assert_eq!(stats.by_highway["NH-1"].high, 2);
        assert_eq!(stats.by_type["Roughness"].total, 2);
        assert_eq!(stats.by_type["Roughness"].low, 1);
    }
}
