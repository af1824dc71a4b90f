use crate::map::highlight::HighlightSequence;
use crate::map::marker::Marker;
use crate::model::MeasurementPoint;
use crate::telemetry::{LogManager, MetricsRecorder};

/// Margin applied when reframing the view around the marker set.
pub const FIT_PADDING: f32 = 20.0;
/// Coordinate tolerance for locating a marker from a list row click.
pub const HIGHLIGHT_EPSILON: f64 = 0.001;

/// Axis-aligned geographic bounds of a marker set.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LatLngBounds {
    pub min_lat: f64,
    pub max_lat: f64,
    pub min_lng: f64,
    pub max_lng: f64,
}

impl LatLngBounds {
    fn around(lat: f64, lng: f64) -> Self {
        Self {
            min_lat: lat,
            max_lat: lat,
            min_lng: lng,
            max_lng: lng,
        }
    }

    fn extend(&mut self, lat: f64, lng: f64) {
        self.min_lat = self.min_lat.min(lat);
        self.max_lat = self.max_lat.max(lat);
        self.min_lng = self.min_lng.min(lng);
        self.max_lng = self.max_lng.max(lng);
    }

    pub fn center(&self) -> (f64, f64) {
        (
            (self.min_lat + self.max_lat) / 2.0,
            (self.min_lng + self.max_lng) / 2.0,
        )
    }

    pub fn span(&self) -> (f64, f64) {
        (self.max_lat - self.min_lat, self.max_lng - self.min_lng)
    }
}

/// Host-side map operations the presenter drives. The GUI viewport
/// implements this; tests substitute a recording fake.
pub trait MapSurface {
    fn current_zoom(&self) -> f32;
    fn fit_bounds(&mut self, bounds: LatLngBounds, padding: f32);
    fn fly_to(&mut self, lat: f64, lng: f64, zoom: f32);
    fn open_popup(&mut self, index: usize);
}

/// Target zoom for a highlight jump as a function of the current zoom:
/// coarse views jump straight in, closer views nudge by two levels.
pub fn target_zoom(current: f32) -> f32 {
    if current < 12.0 {
        16.0
    } else if current < 15.0 {
        17.0
    } else {
        (current + 2.0).min(18.0)
    }
}

/// Projects the working set onto map markers and owns marker lifecycle
/// plus the fly-to-and-pulse highlight sequence.
pub struct MapPresenter {
    markers: Vec<Marker>,
    highlight: HighlightSequence,
    logger: LogManager,
    metrics: MetricsRecorder,
}

impl MapPresenter {
    pub fn new() -> Self {
        Self {
            markers: Vec::new(),
            highlight: HighlightSequence::idle(),
            logger: LogManager::new(),
            metrics: MetricsRecorder::new(),
        }
    }

    /// Full re-render: clears every marker, creates one per coordinate-valid
    /// point, then reframes the view. Invalid points are skipped and logged,
    /// never fatal. With zero valid points no reframe occurs.
    pub fn render(&mut self, points: &[MeasurementPoint], surface: &mut dyn MapSurface) {
        self.highlight.cancel(&mut self.markers);
        self.markers.clear();

        let mut bounds: Option<LatLngBounds> = None;
        for point in points {
            if !point.has_valid_coordinates() {
                self.logger.record_warning(&format!(
                    "skipping point with invalid coordinates ({}, {})",
                    point.lat, point.lng
                ));
                self.metrics.record_skipped();
                continue;
            }
            match bounds.as_mut() {
                Some(b) => b.extend(point.lat, point.lng),
                None => bounds = Some(LatLngBounds::around(point.lat, point.lng)),
            }
            self.markers.push(Marker::new(point.clone()));
            self.metrics.record_rendered();
        }

        if let Some(bounds) = bounds {
            surface.fit_bounds(bounds, FIT_PADDING);
        }
        self.logger
            .record(&format!("rendered {} markers", self.markers.len()));
    }

    pub fn markers(&self) -> &[Marker] {
        &self.markers
    }

    pub fn marker_count(&self) -> usize {
        self.markers.len()
    }

    /// (rendered, skipped) counts since creation.
    pub fn metrics_snapshot(&self) -> (usize, usize) {
        self.metrics.snapshot()
    }

    /// Flies to the first marker (by creation order) within epsilon of the
    /// given coordinates and starts the pulse sequence. No match: no-op.
    pub fn highlight(&mut self, lat: f64, lng: f64, surface: &mut dyn MapSurface) {
        let found = self.markers.iter().position(|marker| {
            (marker.point.lat - lat).abs() < HIGHLIGHT_EPSILON
                && (marker.point.lng - lng).abs() < HIGHLIGHT_EPSILON
        });
        let Some(index) = found else {
            return;
        };

        self.highlight.cancel(&mut self.markers);
        surface.fly_to(lat, lng, target_zoom(surface.current_zoom()));
        self.highlight.start(index, self.markers[index].style);
    }

    pub fn highlight_active(&self) -> bool {
        self.highlight.is_active()
    }

    /// Advances the highlight sequence by one 300 ms tick.
    pub fn tick(&mut self, surface: &mut dyn MapSurface) {
        self.highlight.tick(&mut self.markers, surface);
    }

    /// Aborts any in-flight highlight, restoring the marker's exact
    /// pre-highlight style.
    pub fn cancel_highlight(&mut self) {
        self.highlight.cancel(&mut self.markers);
    }
}

impl Default for MapPresenter {
    fn default() -> Self {
        Self::new()
    }
}
