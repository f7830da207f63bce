use std::sync::Mutex;

/// Counts products formed and failed during a workflow run.
pub struct MetricsRecorder {
    inner: Mutex<Metrics>,
}

struct Metrics {
    formed: usize,
    failed: usize,
}

impl MetricsRecorder {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(Metrics {
                formed: 0,
                failed: 0,
            }),
        }
    }

    pub fn record_formed(&self) {
        if let Ok(mut metrics) = self.inner.lock() {
            metrics.formed += 1;
        }
    }

    pub fn record_failed(&self) {
        if let Ok(mut metrics) = self.inner.lock() {
            metrics.failed += 1;
        }
    }

    /// `(formed, failed)`.
    pub fn snapshot(&self) -> (usize, usize) {
        if let Ok(metrics) = self.inner.lock() {
            (metrics.formed, metrics.failed)
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
