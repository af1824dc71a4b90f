use crate::model::{MeasurementPoint, Severity};
use serde::{Deserialize, Serialize};

/// Severity/type/highway predicate; unset fields impose no constraint.
/// Set fields combine with logical AND and compare by exact equality.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterCriteria {
    #[serde(default)]
    pub severity: Option<Severity>,
    #[serde(default)]
    pub measurement_type: Option<String>,
    #[serde(default)]
    pub highway: Option<String>,
}

impl FilterCriteria {
    pub fn is_empty(&self) -> bool {
        self.severity.is_none() && self.measurement_type.is_none() && self.highway.is_none()
    }

    pub fn matches(&self, point: &MeasurementPoint) -> bool {
        if let Some(severity) = self.severity {
            if point.severity != severity {
                return false;
            }
        }
        if let Some(kind) = &self.measurement_type {
            if point.measurement_type.as_deref() != Some(kind.as_str()) {
                return false;
            }
        }
        if let Some(highway) = &self.highway {
            if point.highway.as_deref() != Some(highway.as_str()) {
                return false;
            }
        }
        true
    }

    /// Query parameters for the remote filter endpoint; unset fields are
    /// omitted entirely.
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(severity) = self.severity {
            pairs.push(("severity", severity.as_str().to_string()));
        }
        if let Some(kind) = &self.measurement_type {
            pairs.push(("measurement_type", kind.clone()));
        }
        if let Some(highway) = &self.highway {
            pairs.push(("highway", highway.clone()));
        }
        pairs
    }
}

/// Distinguishes an empty filtered result from a populated one so callers
/// can show a "no data" state instead of an empty table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterOutcome {
    Empty,
    Matched(usize),
}

impl FilterOutcome {
    pub fn of(count: usize) -> Self {
        if count == 0 {
            FilterOutcome::Empty
        } else {
            FilterOutcome::Matched(count)
        }
    }
}

/// Pure local filter: returns matching points in their original relative
/// order without mutating the input. Used by the export preview; the live
/// map/list path delegates to the backend instead.
pub fn apply_local(points: &[MeasurementPoint], criteria: &FilterCriteria) -> Vec<MeasurementPoint> {
    points
        .iter()
        .filter(|point| criteria.matches(point))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn point(severity: Severity, kind: &str, highway: &str) -> MeasurementPoint {
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

    fn sample() -> Vec<MeasurementPoint> {
        vec![
            point(Severity::High, "Roughness", "NH-1"),
            point(Severity::Low, "Rutting", "NH-1"),
            point(Severity::High, "Rutting", "NH-2"),
            point(Severity::Medium, "Roughness", "NH-2"),
        ]
    }

    #[test]
    fn empty_criteria_match_everything() {
        let points = sample();
        let criteria = FilterCriteria::default();
        assert!(criteria.is_empty());
        assert_eq!(apply_local(&points, &criteria), points);
    }

    #[test]
    fn set_fields_combine_with_and() {
        let points = sample();
        let criteria = FilterCriteria {
            severity: Some(Severity::High),
            measurement_type: Some("Rutting".into()),
            highway: None,
        };
        let filtered = apply_local(&points, &criteria);
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].highway.as_deref(), Some("NH-2"));
    }

    #[test]
    fn filtering_preserves_order_and_is_idempotent() {
        let points = sample();
        let criteria = FilterCriteria {
            severity: None,
            measurement_type: None,
            highway: Some("NH-1".into()),
        };
        let once = apply_local(&points, &criteria);
        assert_eq!(once[0].severity, Severity::High);
        assert_eq!(once[1].severity, Severity::Low);
        let twice = apply_local(&once, &criteria);
        assert_eq!(once, twice);
    }

    #[test]
    fn empty_result_is_signaled_distinctly() {
        let points = sample();
        let criteria = FilterCriteria {
            severity: None,
            measurement_type: None,
            highway: Some("NH-99".into()),
        };
        let filtered = apply_local(&points, &criteria);
        assert_eq!(FilterOutcome::of(filtered.len()), FilterOutcome::Empty);
        assert_eq!(FilterOutcome::of(3), FilterOutcome::Matched(3));
    }

    #[test]
    fn query_pairs_omit_unset_fields() {
        let criteria = FilterCriteria {
            severity: Some(Severity::Medium),
            measurement_type: None,
            highway: Some("NH-8".into()),
        };
        assert_eq!(
            criteria.query_pairs(),
            vec![
                ("severity", "Medium".to_string()),
                ("highway", "NH-8".to_string()),
            ]
        );
    }
}
