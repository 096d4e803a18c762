use std::time::{Duration, Instant};

use log::debug;

/// Sampled begin/end span logging for one tick.
///
/// - logs a begin/end wrapper for the tick with its total time
/// - supports sequential spans (`span()` ends the previous span)
/// - does nothing at all when not sampled
pub struct StageStopwatch {
    event_start: Option<Instant>,
    span: Option<(&'static str, Instant)>,
    name: String,
    should_sample: bool,
}

impl StageStopwatch {
    /// Creates a stopwatch that logs only when `should_sample` is true.
    pub fn new(name: impl Into<String>, should_sample: bool) -> Self {
        let name = name.into();
        if should_sample {
            debug!("--------- {name} begin ---------");
        }

        Self {
            event_start: should_sample.then(Instant::now),
            span: None,
            name,
            should_sample,
        }
    }

    /// Starts a new span within the event, ending any previous span.
    pub fn span(&mut self, stage: &'static str) {
        if !self.should_sample {
            return;
        }
        self.end_span();
        self.span = Some((stage, Instant::now()));
    }

    /// Ends the current span, if any.
    pub fn end_span(&mut self) {
        if let Some((stage, start)) = self.span.take() {
            debug!("{stage}: {}", format_elapsed(start.elapsed()));
        }
    }

    /// Whether this event is being sampled.
    pub fn should_sample(&self) -> bool {
        self.should_sample
    }
}

impl Drop for StageStopwatch {
    fn drop(&mut self) {
        if !self.should_sample {
            return;
        }

        // Close any open span first.
        self.end_span();

        if let Some(start) = self.event_start.take() {
            debug!("event_time: {}", format_elapsed(start.elapsed()));
        }

        debug!("---------- {} end ----------", self.name);
    }
}

fn format_elapsed(elapsed: Duration) -> String {
    format!("{:.3}ms", elapsed.as_secs_f64() * 1_000.0)
}
