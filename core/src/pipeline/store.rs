use crate::model::{MeasurementPoint, Statistics};

/// Single source of truth for the UI: the working set plus both statistics
/// copies. The original copy reflects the full unfiltered dataset and is
/// touched only by `replace`/`clear`; the detailed copy follows whatever the
/// most recent operation (filters included) produced.
#[derive(Debug, Default)]
pub struct DataStore {
    points: Vec<MeasurementPoint>,
    original: Statistics,
    detailed: Statistics,
}

impl DataStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Atomically swaps the working set and both statistics copies. Callers
    /// always provide a complete replacement batch; no partial update exists.
    pub fn replace(&mut self, points: Vec<MeasurementPoint>, stats: Statistics) {
        self.points = points;
        self.original = stats.clone();
        self.detailed = stats;
    }

    /// Empties the working set and resets both copies to the zero state.
    pub fn clear(&mut self) {
        self.points.clear();
        self.original = Statistics::zero();
        self.detailed = Statistics::zero();
    }

    /// Updates only the detailed copy; the original stays untouched.
    pub fn set_detailed(&mut self, stats: Statistics) {
        self.detailed = stats;
    }

    pub fn points(&self) -> &[MeasurementPoint] {
        &self.points
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn original_statistics(&self) -> &Statistics {
        &self.original
    }

    pub fn detailed_statistics(&self) -> &Statistics {
        &self.detailed
    }

    /// Distinct highway names in first-seen order, for the filter dropdowns.
    pub fn highways(&self) -> Vec<String> {
        distinct(self.points.iter().filter_map(|p| p.highway.clone()))
    }

    /// Distinct measurement types in first-seen order.
    pub fn measurement_types(&self) -> Vec<String> {
        distinct(self.points.iter().filter_map(|p| p.measurement_type.clone()))
    }
}

fn distinct(values: impl Iterator<Item = String>) -> Vec<String> {
    let mut seen = Vec::new();
    for value in values {
        if !seen.contains(&value) {
            seen.push(value);
        }
    }
    seen
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Severity;

    fn point(severity: Severity, highway: &str) -> MeasurementPoint {
        MeasurementPoint {
            lat: 20.0,
            lng: 78.0,
            highway: Some(highway.into()),
            lane: None,
            start_chainage: None,
            end_chainage: None,
            structure: None,
            measurement_type: Some("Roughness".into()),
            value: None,
            unit: None,
            limit: None,
            severity,
            datetime: None,
        }
    }

    #[test]
    fn replace_updates_both_statistics_copies() {
        let mut store = DataStore::new();
        let points = vec![point(Severity::High, "NH-1"), point(Severity::Low, "NH-2")];
        let stats = Statistics::from_points(&points);
        store.replace(points, stats);
        assert_eq!(store.original_statistics().total, 2);
        assert_eq!(store.detailed_statistics().total, 2);
    }

    #[test]
    fn set_detailed_leaves_original_untouched() {
        let mut store = DataStore::new();
        let points = vec![point(Severity::High, "NH-1"), point(Severity::Low, "NH-2")];
        let stats = Statistics::from_points(&points);
        store.replace(points, stats);

        let filtered = Statistics::from_points(&[point(Severity::High, "NH-1")]);
        store.set_detailed(filtered);
        assert_eq!(store.original_statistics().total, 2);
        assert_eq!(store.detailed_statistics().total, 1);
    }

    #[test]
    fn clear_resets_to_zero_state() {
        let mut store = DataStore::new();
        let points = vec![point(Severity::Medium, "NH-8")];
        let stats = Statistics::from_points(&points);
        store.replace(points, stats);
        store.clear();
        assert!(store.is_empty());
        assert_eq!(*store.original_statistics(), Statistics::zero());
        assert_eq!(*store.detailed_statistics(), Statistics::zero());
    }

    #[test]
    fn dropdown_values_are_distinct_in_first_seen_order() {
        let mut store = DataStore::new();
        let points = vec![
            point(Severity::High, "NH-44"),
            point(Severity::Low, "NH-1"),
            point(Severity::Low, "NH-44"),
        ];
        let stats = Statistics::from_points(&points);
        store.replace(points, stats);
        assert_eq!(store.highways(), vec!["NH-44".to_string(), "NH-1".to_string()]);
        assert_eq!(store.measurement_types(), vec!["Roughness".to_string()]);
    }
}
