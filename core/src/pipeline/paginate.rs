use crate::model::{MeasurementPoint, Severity};

/// Items appended to the severity list per reveal.
pub const PAGE_SIZE: usize = 50;

/// Lifecycle of the paginated severity list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageState {
    Empty,
    Initial,
    Partial,
    Complete,
}

/// One rendered severity group; counts are cumulative across pages within
/// the same filter selection.
#[derive(Debug)]
pub struct SeveritySection<'a> {
    pub severity: Severity,
    pub points: Vec<&'a MeasurementPoint>,
}

/// Tracks how many filtered items the list view has revealed and exposes
/// "reveal next page" as an idempotent, resumable operation.
#[derive(Debug, Default)]
pub struct PaginationController {
    points: Vec<MeasurementPoint>,
    list_filter: Option<Severity>,
    filtered: Vec<usize>,
    displayed: usize,
}

impl PaginationController {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the source data and resets the filter and reveal state.
    pub fn load(&mut self, points: Vec<MeasurementPoint>) {
        self.points = points;
        self.list_filter = None;
        self.displayed = 0;
        self.refilter();
    }

    /// Resets the displayed count and re-evaluates against the new subset.
    pub fn set_filter(&mut self, filter: Option<Severity>) {
        self.list_filter = filter;
        self.displayed = 0;
        self.refilter();
    }

    pub fn filter(&self) -> Option<Severity> {
        self.list_filter
    }

    /// Advances the displayed count by up to one page and returns how many
    /// items were newly revealed. Safe to call at `Complete` (no-op).
    pub fn reveal(&mut self) -> usize {
        let revealed = PAGE_SIZE.min(self.remaining());
        self.displayed += revealed;
        revealed
    }

    pub fn state(&self) -> PageState {
        if self.filtered.is_empty() {
            PageState::Empty
        } else if self.displayed == 0 {
            PageState::Initial
        } else if self.displayed < self.filtered.len() {
            PageState::Partial
        } else {
            PageState::Complete
        }
    }

    pub fn displayed(&self) -> usize {
        self.displayed
    }

    pub fn filtered_len(&self) -> usize {
        self.filtered.len()
    }

    pub fn remaining(&self) -> usize {
        self.filtered.len() - self.displayed
    }

    /// Size of the next page, for the "Load More (n)" label.
    pub fn next_page_len(&self) -> usize {
        PAGE_SIZE.min(self.remaining())
    }

    /// The displayed prefix grouped by severity in first-seen order, so a
    /// group present from a prior page accumulates instead of restarting.
    pub fn visible_sections(&self) -> Vec<SeveritySection<'_>> {
        let mut sections: Vec<SeveritySection<'_>> = Vec::new();
        for &index in self.filtered.iter().take(self.displayed) {
            let point = &self.points[index];
            match sections.iter_mut().find(|s| s.severity == point.severity) {
                Some(section) => section.points.push(point),
                None => sections.push(SeveritySection {
                    severity: point.severity,
                    points: vec![point],
                }),
            }
        }
        sections
    }

    fn refilter(&mut self) {
        self.filtered = self
            .points
            .iter()
            .enumerate()
            .filter(|(_, point)| match self.list_filter {
                Some(severity) => point.severity == severity,
                None => true,
            })
            .map(|(index, _)| index)
            .collect();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn batch(high: usize, medium: usize, low: usize) -> Vec<MeasurementPoint> {
        let mut points = Vec::new();
        let mut push = |count: usize, severity: Severity| {
            for _ in 0..count {
                points.push(MeasurementPoint {
                    lat: 20.0,
                    lng: 78.0,
                    highway: Some("NH-44".into()),
                    lane: None,
                    start_chainage: None,
                    end_chainage: None,
                    structure: None,
                    measurement_type: None,
                    value: None,
                    unit: None,
                    limit: None,
                    severity,
                    datetime: None,
                });
            }
        };
        push(high, Severity::High);
        push(medium, Severity::Medium);
        push(low, Severity::Low);
        points
    }

    #[test]
    fn empty_load_stays_empty() {
        let mut controller = PaginationController::new();
        controller.load(Vec::new());
        assert_eq!(controller.state(), PageState::Empty);
        assert_eq!(controller.reveal(), 0);
        assert_eq!(controller.state(), PageState::Empty);
    }

    #[test]
    fn ceil_n_over_page_size_reveals_reach_complete() {
        let mut controller = PaginationController::new();
        controller.load(batch(60, 40, 20));
        assert_eq!(controller.state(), PageState::Initial);

        let mut reveals = 0;
        while controller.state() != PageState::Complete {
            assert!(controller.reveal() > 0);
            reveals += 1;
            assert!(controller.displayed() <= controller.filtered_len());
        }
        // 120 items at 50 per page
        assert_eq!(reveals, 3);
        assert_eq!(controller.displayed(), 120);
    }

    #[test]
    fn reveal_at_complete_is_a_no_op() {
        let mut controller = PaginationController::new();
        controller.load(batch(10, 0, 0));
        controller.reveal();
        assert_eq!(controller.state(), PageState::Complete);
        assert_eq!(controller.reveal(), 0);
        assert_eq!(controller.displayed(), 10);
    }

    #[test]
    fn set_filter_resets_displayed_count() {
        let mut controller = PaginationController::new();
        controller.load(batch(80, 5, 5));
        controller.reveal();
        controller.reveal();
        assert_eq!(controller.displayed(), 90);

        controller.set_filter(Some(Severity::High));
        assert_eq!(controller.displayed(), 0);
        assert_eq!(controller.filtered_len(), 80);
        assert_eq!(controller.state(), PageState::Initial);
        controller.reveal();
        assert_eq!(controller.state(), PageState::Partial);
        assert_eq!(controller.next_page_len(), 30);
    }

    #[test]
    fn sections_accumulate_across_pages() {
        let mut controller = PaginationController::new();
        controller.load(batch(60, 30, 0));
        controller.reveal();
        let first = controller.visible_sections();
        assert_eq!(first.len(), 1);
        assert_eq!(first[0].severity, Severity::High);
        assert_eq!(first[0].points.len(), 50);

        controller.reveal();
        let second = controller.visible_sections();
        assert_eq!(second.len(), 2);
        assert_eq!(second[0].points.len(), 60);
        assert_eq!(second[1].severity, Severity::Medium);
        assert_eq!(second[1].points.len(), 30);
    }
}
