// Path: crates/telemetry/src/time.rs
use crate::sinks::ConsensusMetricsSink;
use std::time::Instant;

/// Records the lifetime of a header verification into the sink when dropped, so every
/// early return is measured too.
pub struct Timer<'a> {
    sink: &'a dyn ConsensusMetricsSink,
    start: Instant,
}

impl<'a> Timer<'a> {
    pub fn new(sink: &'a dyn ConsensusMetricsSink) -> Self {
        Self {
            sink,
            start: Instant::now(),
        }
    }
}

impl Drop for Timer<'_> {
    fn drop(&mut self) {
        self.sink
            .observe_verify_duration(self.start.elapsed().as_secs_f64());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[derive(Debug, Default)]
    struct Recorder(Mutex<Vec<f64>>);

    impl ConsensusMetricsSink for Recorder {
        fn inc_headers_verified(&self) {}
        fn inc_header_rejected(&self, _mechanism: &'static str) {}
        fn observe_verify_duration(&self, duration_secs: f64) {
            self.0.lock().unwrap().push(duration_secs);
        }
    }

    #[test]
    fn observes_once_on_drop() {
        let recorder = Recorder::default();
        {
            let _timer = Timer::new(&recorder);
        }
        let observed = recorder.0.lock().unwrap();
        assert_eq!(observed.len(), 1);
        assert!(observed[0] >= 0.0);
    }
}
