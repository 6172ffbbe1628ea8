//! Time sources for the queue.
//!
//! The queue never reads the wall clock directly; hosts that own time (an
//! event loop, a test) supply a [`Clock`].

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use web_time::Instant;

/// Monotonic time source.
pub trait Clock: Send + Sync {
	/// Current instant.
	fn now(&self) -> Instant;
}

/// Reads [`Instant::now`].
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
	fn now(&self) -> Instant {
		Instant::now()
	}
}

/// Clock that only moves when told to.
///
/// Clones share the same time, so a test can keep one handle while the queue
/// owns another.
#[derive(Debug, Clone)]
pub struct ManualClock {
	origin: Instant,
	elapsed_us: Arc<AtomicU64>,
}

impl Default for ManualClock {
	fn default() -> Self {
		Self::new()
	}
}

impl ManualClock {
	/// Creates a clock frozen at the current instant.
	pub fn new() -> Self {
		Self {
			origin: Instant::now(),
			elapsed_us: Arc::new(AtomicU64::new(0)),
		}
	}

	/// Moves time forward by `by`.
	pub fn advance(&self, by: Duration) {
		let micros = u64::try_from(by.as_micros()).unwrap_or(u64::MAX);
		self.elapsed_us.fetch_add(micros, Ordering::AcqRel);
	}

	/// Moves time forward to `to`. Earlier instants are ignored.
	pub fn set(&self, to: Instant) {
		let micros = u64::try_from(to.saturating_duration_since(self.origin).as_micros()).unwrap_or(u64::MAX);
		self.elapsed_us.fetch_max(micros, Ordering::AcqRel);
	}

	/// Time elapsed since the clock was created.
	pub fn elapsed(&self) -> Duration {
		Duration::from_micros(self.elapsed_us.load(Ordering::Acquire))
	}
}

impl Clock for ManualClock {
	fn now(&self) -> Instant {
		self.origin + self.elapsed()
	}
}

impl<C: Clock + ?Sized> Clock for Arc<C> {
	fn now(&self) -> Instant {
		(**self).now()
	}
}
