//! Assistive-technology announcements.
//!
//! Each shown notification produces one short-lived text description for
//! screen readers. Announcements retract themselves after a fixed window and
//! are deliberately not tied to the notification's own lifecycle.

use core::fmt;
use std::time::Duration;

use web_time::Instant;

use crate::kinds::KindPolicy;
use crate::scheduler::Scheduler;

/// Default lifetime of an announcement.
pub const DEFAULT_ANNOUNCE_WINDOW: Duration = Duration::from_millis(1000);

/// Identifier of a posted announcement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AnnouncementId(u64);

impl fmt::Display for AnnouncementId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "announce-{}", self.0)
	}
}

/// How urgently assistive technology should read the text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Politeness {
	/// Read when the user is idle.
	#[default]
	Polite,
	/// Interrupt whatever is being read.
	Assertive,
}

/// One announcement as delivered to a sink.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Announcement {
	pub id: AnnouncementId,
	pub text: String,
	pub politeness: Politeness,
}

/// Receives announcements. Typically an off-screen live region.
pub trait AnnouncementSink: Send {
	/// Make `announcement` available to assistive technology.
	fn announce(&mut self, announcement: &Announcement);
	/// Take a previously announced text down again.
	fn retract(&mut self, id: AnnouncementId);
}

/// Text read for a notification: `"<label>: <title>. <message>"`.
pub fn describe(label: &str, title: &str, message: &str) -> String {
	format!("{label}: {title}. {message}")
}

/// Posts announcements and retracts them after [`window`](Self::window).
pub struct Announcer {
	window: Duration,
	live: Scheduler<AnnouncementId>,
	next_id: u64,
	sink: Option<Box<dyn AnnouncementSink>>,
}

impl Default for Announcer {
	fn default() -> Self {
		Self::new(DEFAULT_ANNOUNCE_WINDOW)
	}
}

impl fmt::Debug for Announcer {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Announcer")
			.field("window", &self.window)
			.field("live", &self.live.len())
			.field("has_sink", &self.sink.is_some())
			.finish()
	}
}

impl Announcer {
	/// Creates an announcer without a sink; announcements are still tracked
	/// and expired so hosts can attach a sink later.
	pub fn new(window: Duration) -> Self {
		Self {
			window,
			live: Scheduler::new(),
			next_id: 0,
			sink: None,
		}
	}

	/// Routes announcements to `sink`.
	pub fn set_sink(&mut self, sink: Box<dyn AnnouncementSink>) {
		self.sink = Some(sink);
	}

	/// Lifetime of each announcement.
	pub fn window(&self) -> Duration {
		self.window
	}

	/// Announces a notification of the given kind policy and schedules its
	/// retraction.
	pub fn announce(&mut self, policy: &KindPolicy, title: &str, message: &str, now: Instant) -> AnnouncementId {
		let id = AnnouncementId(self.next_id);
		self.next_id += 1;

		let announcement = Announcement {
			id,
			text: describe(&policy.label, title, message),
			politeness: policy.politeness,
		};
		tracing::trace!(%id, text = %announcement.text, politeness = ?announcement.politeness, "announce");

		if let Some(sink) = self.sink.as_mut() {
			sink.announce(&announcement);
		}
		self.live.arm(id, self.window, (), now);
		id
	}

	/// Retracts every announcement whose window has elapsed at `now`.
	pub fn expire(&mut self, now: Instant) -> usize {
		let expired = self.live.poll(now);
		if let Some(sink) = self.sink.as_mut() {
			for fired in &expired {
				sink.retract(fired.id);
			}
		}
		expired.len()
	}

	/// When the next retraction is due.
	pub fn next_deadline(&self) -> Option<Instant> {
		self.live.next_deadline()
	}

	/// Announcements not yet retracted.
	pub fn live_count(&self) -> usize {
		self.live.len()
	}
}

#[cfg(test)]
mod tests {
	use std::sync::{Arc, Mutex};

	use super::*;
	use crate::kinds::KindTable;
	use crate::types::Kind;

	#[derive(Default, Clone)]
	struct Log(Arc<Mutex<Vec<String>>>);

	impl AnnouncementSink for Log {
		fn announce(&mut self, announcement: &Announcement) {
			let marker = match announcement.politeness {
				Politeness::Polite => "+",
				Politeness::Assertive => "!",
			};
			self.0.lock().unwrap().push(format!("{marker}{}", announcement.text));
		}

		fn retract(&mut self, id: AnnouncementId) {
			self.0.lock().unwrap().push(format!("-{id}"));
		}
	}

	#[test]
	fn describe_matches_reader_format() {
		assert_eq!(describe("error", "Error!", "Disk full"), "error: Error!. Disk full");
	}

	#[test]
	fn announcements_retract_after_window() {
		let t0 = Instant::now();
		let log = Log::default();
		let mut announcer = Announcer::default();
		announcer.set_sink(Box::new(log.clone()));

		let kinds = KindTable::builtin();
		announcer.announce(kinds.get(Kind::Success), "Saved", "ok", t0);
		assert_eq!(announcer.live_count(), 1);
		assert_eq!(announcer.expire(t0 + Duration::from_millis(999)), 0);
		assert_eq!(announcer.expire(t0 + Duration::from_millis(1000)), 1);
		assert_eq!(announcer.live_count(), 0);

		assert_eq!(*log.0.lock().unwrap(), ["+success: Saved. ok", "-announce-0"]);
	}

	#[test]
	fn errors_are_assertive_and_labels_can_change() {
		let t0 = Instant::now();
		let log = Log::default();
		let mut announcer = Announcer::default();
		announcer.set_sink(Box::new(log.clone()));

		let kinds = KindTable::builtin().with_label(Kind::Warning, "caution");
		announcer.announce(kinds.get(Kind::Error), "Upload failed", "retrying", t0);
		announcer.announce(kinds.get(Kind::Warning), "Low disk", "5%", t0);

		assert_eq!(
			*log.0.lock().unwrap(),
			["!error: Upload failed. retrying", "+caution: Low disk. 5%"]
		);
	}

	#[test]
	fn expiry_works_without_sink() {
		let t0 = Instant::now();
		let mut announcer = Announcer::new(Duration::from_millis(10));
		announcer.announce(KindTable::builtin().get(Kind::Info), "a", "b", t0);
		assert_eq!(announcer.next_deadline(), Some(t0 + Duration::from_millis(10)));
		assert_eq!(announcer.expire(t0 + Duration::from_secs(1)), 1);
	}
}
