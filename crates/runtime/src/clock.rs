use chime_toast::{Clock, Instant};

/// Reads tokio's clock, so paused test time drives the queue too.
#[derive(Debug, Default, Clone, Copy)]
pub struct TokioClock;

impl Clock for TokioClock {
	fn now(&self) -> Instant {
		tokio::time::Instant::now().into_std()
	}
}
