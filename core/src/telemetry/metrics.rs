use std::sync::Mutex;

/// Counts rendered versus skipped points across map re-renders.
pub struct MetricsRecorder {
    inner: Mutex<Metrics>,
}

struct Metrics {
    rendered: usize,
    skipped: usize,
}

impl MetricsRecorder {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(Metrics {
                rendered: 0,
                skipped: 0,
            }),
        }
    }

    pub fn record_rendered(&self) {
        if let Ok(mut metrics) = self.inner.lock() {
            metrics.rendered += 1;
        }
    }

    pub fn record_skipped(&self) {
        if let Ok(mut metrics) = self.inner.lock() {
            metrics.skipped += 1;
        }
    }

    pub fn snapshot(&self) -> (usize, usize) {
        if let Ok(metrics) = self.inner.lock() {
            (metrics.rendered, metrics.skipped)
        } else {
            (0, 0)
        }
    }
}

impl Default for MetricsRecorder {
    fn default() -> Self {
        Self::new()
    }
}
