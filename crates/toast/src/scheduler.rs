//! Cancellable countdowns with global pause/resume.
//!
//! A countdown is a plain value owned by the [`Scheduler`]; nothing here holds
//! a timer or a closure over queue state. The host decides when to look at the
//! scheduler (usually at [`Scheduler::next_deadline`]) and calls
//! [`Scheduler::poll`] to collect whatever came due.

use std::hash::Hash;
use std::time::Duration;

use indexmap::IndexMap;
use web_time::Instant;

/// Callback payload for the closure-style contract, see [`Scheduler::fire_due`].
pub type Callback<K> = Box<dyn FnOnce(K) + Send>;

/// Where a countdown stands relative to the clock.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Deadline {
	/// Running, fires at this instant.
	At(Instant),
	/// Paused; `remaining` is authoritative.
	Frozen,
	/// The delay reaches past the last representable instant.
	Never,
}

impl Deadline {
	fn after(now: Instant, delay: Duration) -> Self {
		now.checked_add(delay).map_or(Deadline::Never, Deadline::At)
	}
}

/// One armed countdown.
#[derive(Debug, Clone)]
struct Countdown<T> {
	/// Delay still to run. Authoritative unless running.
	remaining: Duration,
	deadline: Deadline,
	/// Arm order, breaks ties between equal deadlines.
	seq: u64,
	payload: T,
}

impl<T> Countdown<T> {
	/// Remaining delay as seen at `now`.
	fn remaining(&self, now: Instant) -> Duration {
		match self.deadline {
			Deadline::At(at) => at.saturating_duration_since(now),
			Deadline::Frozen | Deadline::Never => self.remaining,
		}
	}

	/// Deadline, if running and reachable.
	fn fire_at(&self) -> Option<Instant> {
		match self.deadline {
			Deadline::At(at) => Some(at),
			Deadline::Frozen | Deadline::Never => None,
		}
	}
}

/// A countdown that came due.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fired<K, T> {
	/// Key the countdown was armed under.
	pub id: K,
	/// The armed payload.
	pub payload: T,
	/// Deadline the countdown was scheduled for.
	pub due: Instant,
}

/// Owns at most one countdown per key.
#[derive(Debug)]
pub struct Scheduler<K, T = ()> {
	entries: IndexMap<K, Countdown<T>>,
	paused: bool,
	next_seq: u64,
}

impl<K, T> Default for Scheduler<K, T> {
	fn default() -> Self {
		Self {
			entries: IndexMap::new(),
			paused: false,
			next_seq: 0,
		}
	}
}

impl<K, T> Scheduler<K, T>
where
	K: Copy + Eq + Hash,
{
	/// Creates an empty, running scheduler.
	pub fn new() -> Self {
		Self::default()
	}

	/// Arms a countdown of `delay` for `id`, replacing any existing one.
	///
	/// Returns the payload of the replaced countdown. While paused the new
	/// countdown is created frozen and starts running on resume.
	pub fn arm(&mut self, id: K, delay: Duration, payload: T, now: Instant) -> Option<T> {
		let replaced = self.entries.shift_remove(&id).map(|c| c.payload);
		let seq = self.next_seq;
		self.next_seq += 1;
		let deadline = if self.paused {
			Deadline::Frozen
		} else {
			Deadline::after(now, delay)
		};
		self.entries.insert(
			id,
			Countdown {
				remaining: delay,
				deadline,
				seq,
				payload,
			},
		);
		replaced
	}

	/// Stops the countdown for `id`. Unknown or already fired ids are a no-op.
	pub fn cancel(&mut self, id: K) -> Option<T> {
		self.entries.shift_remove(&id).map(|c| c.payload)
	}

	/// Freezes every countdown, recording what is left of its delay.
	///
	/// Returns false if already paused.
	pub fn pause_all(&mut self, now: Instant) -> bool {
		if self.paused {
			return false;
		}
		self.paused = true;
		for countdown in self.entries.values_mut() {
			if let Deadline::At(at) = countdown.deadline {
				countdown.remaining = at.saturating_duration_since(now);
				countdown.deadline = Deadline::Frozen;
			}
		}
		true
	}

	/// Re-arms every frozen countdown with its remaining delay.
	///
	/// Returns false if not paused.
	pub fn resume_all(&mut self, now: Instant) -> bool {
		if !self.paused {
			return false;
		}
		self.paused = false;
		for countdown in self.entries.values_mut() {
			if countdown.deadline == Deadline::Frozen {
				countdown.deadline = Deadline::after(now, countdown.remaining);
			}
		}
		true
	}

	/// Removes and returns every countdown due at `now`, earliest first.
	///
	/// Each countdown is returned at most once. Nothing fires while paused.
	pub fn poll(&mut self, now: Instant) -> Vec<Fired<K, T>> {
		if self.paused {
			return Vec::new();
		}

		let mut due: Vec<(Instant, u64, K)> = self
			.entries
			.iter()
			.filter_map(|(&id, c)| c.fire_at().filter(|&at| at <= now).map(|at| (at, c.seq, id)))
			.collect();
		due.sort_by_key(|&(at, seq, _)| (at, seq));

		due.into_iter()
			.filter_map(|(at, _, id)| {
				self.entries.shift_remove(&id).map(|c| Fired {
					id,
					payload: c.payload,
					due: at,
				})
			})
			.collect()
	}

	/// Earliest running deadline.
	pub fn next_deadline(&self) -> Option<Instant> {
		self.entries.values().filter_map(Countdown::fire_at).min()
	}

	/// Remaining delay for `id` as seen at `now`.
	pub fn remaining(&self, id: K, now: Instant) -> Option<Duration> {
		self.entries.get(&id).map(|c| c.remaining(now))
	}

	/// Whether a countdown exists for `id`.
	pub fn is_armed(&self, id: K) -> bool {
		self.entries.contains_key(&id)
	}

	/// Whether [`pause_all`](Self::pause_all) is in effect.
	pub fn is_paused(&self) -> bool {
		self.paused
	}

	/// Number of armed countdowns.
	pub fn len(&self) -> usize {
		self.entries.len()
	}

	/// Returns true if nothing is armed.
	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}
}

impl<K> Scheduler<K, Callback<K>>
where
	K: Copy + Eq + Hash,
{
	/// Invokes the callback of every countdown due at `now`.
	///
	/// Returns how many fired.
	pub fn fire_due(&mut self, now: Instant) -> usize {
		let fired = self.poll(now);
		let count = fired.len();
		for Fired { id, payload, .. } in fired {
			payload(id);
		}
		count
	}
}

#[cfg(test)]
mod tests {
	use std::sync::Arc;
	use std::sync::atomic::{AtomicUsize, Ordering};

	use super::*;

	const MS: Duration = Duration::from_millis(1);

	#[test]
	fn fires_once_at_deadline() {
		let t0 = Instant::now();
		let mut sched: Scheduler<u32> = Scheduler::new();
		sched.arm(1, 5000 * MS, (), t0);

		assert!(sched.poll(t0 + 4999 * MS).is_empty());
		let fired = sched.poll(t0 + 5000 * MS);
		assert_eq!(fired.len(), 1);
		assert_eq!(fired[0].id, 1);
		assert!(sched.poll(t0 + 9000 * MS).is_empty());
		assert!(sched.is_empty());
	}

	#[test]
	fn resume_uses_remaining_delay() {
		let t0 = Instant::now();
		let mut sched: Scheduler<u32> = Scheduler::new();
		sched.arm(1, 5000 * MS, (), t0);

		assert!(sched.pause_all(t0 + 2000 * MS));
		assert_eq!(sched.remaining(1, t0 + 60_000 * MS), Some(3000 * MS));
		assert!(sched.poll(t0 + 60_000 * MS).is_empty());

		let resumed = t0 + 60_000 * MS;
		assert!(sched.resume_all(resumed));
		assert!(sched.poll(resumed + 2999 * MS).is_empty());
		assert_eq!(sched.poll(resumed + 3000 * MS).len(), 1);
	}

	#[test]
	fn pause_and_resume_are_idempotent() {
		let t0 = Instant::now();
		let mut sched: Scheduler<u32> = Scheduler::new();
		sched.arm(1, 1000 * MS, (), t0);

		assert!(sched.pause_all(t0 + 100 * MS));
		assert!(!sched.pause_all(t0 + 500 * MS));
		assert_eq!(sched.remaining(1, t0), Some(900 * MS));
		assert!(sched.resume_all(t0 + 500 * MS));
		assert!(!sched.resume_all(t0 + 700 * MS));
		assert_eq!(sched.next_deadline(), Some(t0 + 1400 * MS));
	}

	#[test]
	fn arm_while_paused_starts_frozen() {
		let t0 = Instant::now();
		let mut sched: Scheduler<u32> = Scheduler::new();
		sched.pause_all(t0);
		sched.arm(7, 1000 * MS, (), t0);
		assert_eq!(sched.next_deadline(), None);

		sched.resume_all(t0 + 10_000 * MS);
		assert_eq!(sched.next_deadline(), Some(t0 + 11_000 * MS));
	}

	#[test]
	fn cancel_wins_over_expiry() {
		let t0 = Instant::now();
		let mut sched: Scheduler<u32, &str> = Scheduler::new();
		sched.arm(1, 10 * MS, "a", t0);

		assert_eq!(sched.cancel(1), Some("a"));
		assert!(sched.poll(t0 + 20 * MS).is_empty());
		assert_eq!(sched.cancel(1), None);
		assert_eq!(sched.cancel(99), None);
	}

	#[test]
	fn rearm_replaces_existing_countdown() {
		let t0 = Instant::now();
		let mut sched: Scheduler<u32, &str> = Scheduler::new();
		sched.arm(1, 10 * MS, "first", t0);
		assert_eq!(sched.arm(1, 50 * MS, "second", t0), Some("first"));
		assert_eq!(sched.len(), 1);
		assert!(sched.poll(t0 + 10 * MS).is_empty());
		assert_eq!(sched.poll(t0 + 50 * MS)[0].payload, "second");
	}

	#[test]
	fn due_countdowns_fire_in_deadline_then_arm_order() {
		let t0 = Instant::now();
		let mut sched: Scheduler<u32> = Scheduler::new();
		sched.arm(3, 30 * MS, (), t0);
		sched.arm(1, 10 * MS, (), t0);
		sched.arm(2, 10 * MS, (), t0);

		let order: Vec<u32> = sched.poll(t0 + 100 * MS).into_iter().map(|f| f.id).collect();
		assert_eq!(order, [1, 2, 3]);
	}

	#[test]
	fn callbacks_run_exactly_once() {
		let t0 = Instant::now();
		let hits = Arc::new(AtomicUsize::new(0));
		let mut sched: Scheduler<u32, Callback<u32>> = Scheduler::new();

		for id in 0..3 {
			let hits = Arc::clone(&hits);
			sched.arm(
				id,
				100 * MS,
				Box::new(move |_| {
					hits.fetch_add(1, Ordering::SeqCst);
				}),
				t0,
			);
		}
		sched.cancel(1);

		assert_eq!(sched.fire_due(t0 + 100 * MS), 2);
		assert_eq!(sched.fire_due(t0 + 500 * MS), 0);
		assert_eq!(hits.load(Ordering::SeqCst), 2);
	}

	#[test]
	fn unreachable_deadline_never_fires() {
		let t0 = Instant::now();
		let mut sched: Scheduler<u32> = Scheduler::new();
		sched.arm(1, Duration::MAX, (), t0);

		assert!(sched.is_armed(1));
		assert_eq!(sched.next_deadline(), None);
		assert_eq!(sched.remaining(1, t0), Some(Duration::MAX));
		assert!(sched.poll(t0 + 3_600_000 * MS).is_empty());
		assert!(sched.is_armed(1));
	}

	#[test]
	fn resume_with_unreachable_remainder_does_not_overflow() {
		let t0 = Instant::now();
		let mut sched: Scheduler<u32> = Scheduler::new();
		sched.pause_all(t0);
		sched.arm(1, Duration::MAX, (), t0);
		sched.arm(2, 10 * MS, (), t0);

		assert!(sched.resume_all(t0 + 1000 * MS));
		assert_eq!(sched.next_deadline(), Some(t0 + 1010 * MS));
		let fired: Vec<u32> = sched.poll(t0 + 5000 * MS).into_iter().map(|f| f.id).collect();
		assert_eq!(fired, [2]);
		assert!(sched.cancel(1).is_some());
	}

	proptest::proptest! {
		#[test]
		fn paused_time_never_counts(delay in 1u32..10_000, run in 0u32..10_000, hidden in 0u32..1_000_000) {
			let t0 = Instant::now();
			let mut sched: Scheduler<u32> = Scheduler::new();
			sched.arm(1, delay * MS, (), t0);

			let paused_at = t0 + run.min(delay - 1) * MS;
			sched.pause_all(paused_at);
			let resumed_at = paused_at + hidden * MS;
			sched.resume_all(resumed_at);

			let left = (delay - run.min(delay - 1)) * MS;
			proptest::prop_assert_eq!(sched.next_deadline(), Some(resumed_at + left));
			proptest::prop_assert!(sched.poll(resumed_at + left - MS).is_empty());
			proptest::prop_assert_eq!(sched.poll(resumed_at + left).len(), 1);
		}
	}
}
