//! Notification lifecycle management.
//!
//! [`NotificationQueue`] owns the tracked set, applies drop-oldest eviction at
//! capacity, and drives every state transition. Countdown firing, explicit
//! removal, eviction and `remove_all` all go through the same dismiss path.

use core::fmt;
use std::time::Duration;

use indexmap::IndexMap;
use web_time::Instant;

use crate::announcer::{AnnouncementSink, Announcer};
use crate::clock::{Clock, SystemClock};
use crate::config::{DEFAULT_DISMISS_AFTER, QueueConfig};
use crate::events::{DismissCause, EventSink, QueueEvent, TracingSink};
use crate::kinds::KindTable;
use crate::notification::{Change, Notification, NotificationId, ShowOptions, Snapshot};
use crate::renderer::Renderer;
use crate::scheduler::Scheduler;
use crate::types::{Anchor, Kind, NotificationState, Visibility};

/// Bounded set of on-screen notifications.
pub struct NotificationQueue<C: Clock = SystemClock> {
	config: QueueConfig,
	kinds: KindTable,
	clock: C,
	/// Visible and dismissing notifications in creation order.
	entries: IndexMap<NotificationId, Notification>,
	/// Auto-dismiss countdowns. Frozen while the page is hidden.
	countdowns: Scheduler<NotificationId>,
	/// Exit windows of dismissing notifications. Never paused.
	exits: Scheduler<NotificationId>,
	announcer: Announcer,
	renderers: Vec<Box<dyn Renderer>>,
	sink: Box<dyn EventSink>,
	next_id: u64,
}

impl Default for NotificationQueue {
	fn default() -> Self {
		Self::new(QueueConfig::default())
	}
}

impl NotificationQueue {
	/// Creates a queue reading the system clock.
	pub fn new(config: QueueConfig) -> Self {
		Self::with_clock(config, SystemClock)
	}
}

impl<C: Clock> fmt::Debug for NotificationQueue<C> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("NotificationQueue")
			.field("config", &self.config)
			.field("entries", &self.entries.len())
			.field("countdowns", &self.countdowns.len())
			.field("paused", &self.countdowns.is_paused())
			.field("renderers", &self.renderers.len())
			.finish_non_exhaustive()
	}
}

impl<C: Clock> NotificationQueue<C> {
	/// Creates a queue on `clock`.
	///
	/// Degenerate settings are corrected rather than rejected: capacity is at
	/// least one and a zero countdown falls back to the default.
	pub fn with_clock(mut config: QueueConfig, clock: C) -> Self {
		config.max_visible = config.max_visible.max(1);
		if config.dismiss_after.is_zero() {
			config.dismiss_after = DEFAULT_DISMISS_AFTER;
		}
		let kinds = config.kind_table();
		let announcer = Announcer::new(config.announce_window);

		Self {
			config,
			kinds,
			clock,
			entries: IndexMap::new(),
			countdowns: Scheduler::new(),
			exits: Scheduler::new(),
			announcer,
			renderers: Vec::new(),
			sink: Box::new(TracingSink),
			next_id: 1,
		}
	}

	/// Replaces the kind table. Icon overrides from the config still win.
	#[must_use]
	pub fn with_kind_table(mut self, kinds: KindTable) -> Self {
		self.kinds = self
			.config
			.icons
			.iter()
			.fold(kinds, |table, (&kind, icon)| table.with_icon(kind, icon.as_str()));
		self
	}

	/// Adds a renderer. Renderers see every change from now on.
	pub fn subscribe(&mut self, renderer: Box<dyn Renderer>) {
		self.renderers.push(renderer);
	}

	/// Replaces the event sink (a [`TracingSink`] by default).
	pub fn set_event_sink(&mut self, sink: Box<dyn EventSink>) {
		self.sink = sink;
	}

	/// Routes assistive announcements to `sink`.
	pub fn set_announcement_sink(&mut self, sink: Box<dyn AnnouncementSink>) {
		self.announcer.set_sink(sink);
	}

	/// Shows a notification and returns its id.
	///
	/// At capacity the oldest tracked notification is evicted first.
	pub fn show(
		&mut self,
		kind: impl Into<Kind>,
		title: impl Into<String>,
		message: impl Into<String>,
		options: ShowOptions,
	) -> NotificationId {
		let now = self.clock.now();
		let id = NotificationId::new(self.next_id);
		self.next_id += 1;

		self.make_room(id, now);

		let notification = Notification {
			id,
			kind: kind.into(),
			title: title.into(),
			message: message.into(),
			anchor: self.config.position,
			auto_dismiss: options.auto_dismiss.unwrap_or(self.config.auto_dismiss),
			dismiss_after: options
				.dismiss_after
				.filter(|d| !d.is_zero())
				.unwrap_or(self.config.dismiss_after),
			created_at: now,
			state: NotificationState::Visible,
		};

		let countdown_armed = notification.is_countdown_eligible(&self.kinds);
		if countdown_armed {
			self.countdowns.arm(id, notification.dismiss_after, (), now);
		}

		let snapshot = Snapshot::of(&notification, &self.kinds);
		self.announcer
			.announce(self.kinds.get(notification.kind), &notification.title, &notification.message, now);
		self.sink.record(&QueueEvent::Shown {
			id,
			kind: notification.kind,
			anchor: notification.anchor,
			countdown_armed,
		});
		self.entries.insert(id, notification);
		self.notify(Change::Added, &snapshot);
		id
	}

	/// Shows a [`Kind::Success`] notification.
	pub fn success(&mut self, title: impl Into<String>, message: impl Into<String>, options: ShowOptions) -> NotificationId {
		self.show(Kind::Success, title, message, options)
	}

	/// Shows a [`Kind::Error`] notification.
	pub fn error(&mut self, title: impl Into<String>, message: impl Into<String>, options: ShowOptions) -> NotificationId {
		self.show(Kind::Error, title, message, options)
	}

	/// Shows a [`Kind::Warning`] notification.
	pub fn warning(&mut self, title: impl Into<String>, message: impl Into<String>, options: ShowOptions) -> NotificationId {
		self.show(Kind::Warning, title, message, options)
	}

	/// Shows a [`Kind::Info`] notification.
	pub fn info(&mut self, title: impl Into<String>, message: impl Into<String>, options: ShowOptions) -> NotificationId {
		self.show(Kind::Info, title, message, options)
	}

	/// Shows a [`Kind::Loading`] notification. It stays until removed.
	pub fn loading(&mut self, title: impl Into<String>, message: impl Into<String>, options: ShowOptions) -> NotificationId {
		self.show(Kind::Loading, title, message, options)
	}

	/// Shows a [`Kind::Custom`] notification.
	pub fn custom(&mut self, title: impl Into<String>, message: impl Into<String>, options: ShowOptions) -> NotificationId {
		self.show(Kind::Custom, title, message, options)
	}

	/// Starts dismissing `id`. No-op unless it is visible.
	pub fn remove(&mut self, id: NotificationId) {
		let now = self.clock.now();
		self.begin_dismiss(id, DismissCause::Explicit, now);
	}

	/// Starts dismissing every visible notification, oldest first.
	pub fn remove_all(&mut self) {
		let now = self.clock.now();
		let visible: Vec<NotificationId> = self.active().map(Notification::id).collect();
		for id in visible {
			self.begin_dismiss(id, DismissCause::Cleared, now);
		}
	}

	/// Changes the anchor used by future notifications.
	pub fn update_position(&mut self, anchor: Anchor) {
		self.config.position = anchor;
		self.sink.record(&QueueEvent::PositionChanged { anchor });
	}

	/// Changes the auto-dismiss default for future notifications.
	pub fn update_auto_dismiss(&mut self, enabled: bool) {
		self.config.auto_dismiss = enabled;
		self.sink.record(&QueueEvent::AutoDismissChanged { enabled });
	}

	/// Freezes every auto-dismiss countdown.
	pub fn pause_all(&mut self) {
		let now = self.clock.now();
		if self.countdowns.pause_all(now) {
			self.sink.record(&QueueEvent::Paused {
				countdowns: self.countdowns.len(),
			});
		}
	}

	/// Resumes frozen countdowns with whatever time they had left.
	pub fn resume_all(&mut self) {
		let now = self.clock.now();
		if self.countdowns.resume_all(now) {
			self.sink.record(&QueueEvent::Resumed {
				countdowns: self.countdowns.len(),
			});
		}
	}

	/// Forwards a host visibility change into pause/resume.
	pub fn set_page_visibility(&mut self, visibility: Visibility) {
		match visibility {
			Visibility::Hidden => self.pause_all(),
			Visibility::Visible => self.resume_all(),
		}
	}

	/// Processes everything due now: expired countdowns, finished exit
	/// windows and stale announcements.
	///
	/// Returns the number of notification state changes made.
	pub fn tick(&mut self) -> usize {
		let now = self.clock.now();
		let mut changes = 0;

		for fired in self.countdowns.poll(now) {
			let visible = self
				.entries
				.get(&fired.id)
				.is_some_and(|n| n.state == NotificationState::Visible);
			if !visible {
				tracing::trace!(id = %fired.id, "ignoring stale countdown");
				continue;
			}
			if self.begin_dismiss(fired.id, DismissCause::Expired, fired.due) {
				changes += 1;
			}
		}

		for fired in self.exits.poll(now) {
			if self.finalize(fired.id) {
				changes += 1;
			}
		}

		self.announcer.expire(now);
		changes
	}

	/// Earliest instant at which [`tick`](Self::tick) has work to do.
	pub fn next_deadline(&self) -> Option<Instant> {
		[
			self.countdowns.next_deadline(),
			self.exits.next_deadline(),
			self.announcer.next_deadline(),
		]
		.into_iter()
		.flatten()
		.min()
	}

	/// Visible notifications, oldest first.
	pub fn active(&self) -> impl Iterator<Item = &Notification> {
		self.entries
			.values()
			.filter(|n| n.state == NotificationState::Visible)
	}

	/// Visible and dismissing notifications, oldest first.
	pub fn tracked(&self) -> impl Iterator<Item = &Notification> {
		self.entries.values()
	}

	/// Whether `id` is visible.
	pub fn contains(&self, id: NotificationId) -> bool {
		self.entries
			.get(&id)
			.is_some_and(|n| n.state == NotificationState::Visible)
	}

	/// Returns a visible or dismissing notification.
	pub fn get(&self, id: NotificationId) -> Option<&Notification> {
		self.entries.get(&id)
	}

	/// Renderer view of a visible or dismissing notification.
	pub fn snapshot(&self, id: NotificationId) -> Option<Snapshot> {
		self.entries.get(&id).map(|n| Snapshot::of(n, &self.kinds))
	}

	/// Renderer views of everything tracked, oldest first.
	pub fn snapshots(&self) -> Vec<Snapshot> {
		self.entries
			.values()
			.map(|n| Snapshot::of(n, &self.kinds))
			.collect()
	}

	/// Countdown left for `id`, if one is armed.
	pub fn remaining(&self, id: NotificationId) -> Option<Duration> {
		self.countdowns.remaining(id, self.clock.now())
	}

	/// Number of visible notifications.
	pub fn len(&self) -> usize {
		self.active().count()
	}

	/// Returns true if nothing is visible.
	pub fn is_empty(&self) -> bool {
		self.len() == 0
	}

	/// Number of notifications occupying capacity (visible or dismissing).
	pub fn tracked_len(&self) -> usize {
		self.entries.len()
	}

	/// Anchor for the next notification.
	pub fn position(&self) -> Anchor {
		self.config.position
	}

	/// Auto-dismiss default for the next notification.
	pub fn auto_dismiss(&self) -> bool {
		self.config.auto_dismiss
	}

	/// Whether countdowns are frozen.
	pub fn is_paused(&self) -> bool {
		self.countdowns.is_paused()
	}

	/// Effective configuration.
	pub fn config(&self) -> &QueueConfig {
		&self.config
	}

	/// The kind table resolved at construction.
	pub fn kinds(&self) -> &KindTable {
		&self.kinds
	}

	/// The clock this queue reads.
	pub fn clock(&self) -> &C {
		&self.clock
	}

	/// Evicts oldest-first until a new notification fits.
	///
	/// An evicted notification cannot wait out its exit window without
	/// breaking capacity, so it is finalized on the spot.
	fn make_room(&mut self, by: NotificationId, now: Instant) {
		while self.entries.len() >= self.config.max_visible {
			let Some(oldest) = self.entries.keys().next().copied() else {
				break;
			};
			self.begin_dismiss(oldest, DismissCause::Evicted, now);
			self.finalize(oldest);
			self.sink.record(&QueueEvent::Evicted { id: oldest, by });
		}
	}

	/// Visible → Dismissing. Returns false if `id` was not visible.
	fn begin_dismiss(&mut self, id: NotificationId, cause: DismissCause, at: Instant) -> bool {
		let Some(notification) = self.entries.get_mut(&id) else {
			return false;
		};
		if notification.state != NotificationState::Visible {
			return false;
		}
		notification.state = NotificationState::Dismissing;
		let snapshot = Snapshot::of(notification, &self.kinds);

		self.countdowns.cancel(id);
		self.exits.arm(id, self.config.exit_window, (), at);
		self.sink.record(&QueueEvent::DismissStarted { id, cause });
		self.notify(Change::DismissStarted, &snapshot);
		true
	}

	/// Dismissing → Removed, dropping the notification and its timers.
	fn finalize(&mut self, id: NotificationId) -> bool {
		self.exits.cancel(id);
		self.countdowns.cancel(id);
		let Some(mut notification) = self.entries.shift_remove(&id) else {
			return false;
		};
		notification.state = NotificationState::Removed;
		let snapshot = Snapshot::of(&notification, &self.kinds);
		self.sink.record(&QueueEvent::Removed { id });
		self.notify(Change::Removed, &snapshot);
		true
	}

	fn notify(&mut self, change: Change, snapshot: &Snapshot) {
		for renderer in &mut self.renderers {
			renderer.on_change(change, snapshot);
		}
	}
}

#[cfg(test)]
mod tests {
	use std::sync::{Arc, Mutex};

	use super::*;
	use crate::clock::ManualClock;

	const MS: Duration = Duration::from_millis(1);

	type Log = Arc<Mutex<Vec<(Change, NotificationId, NotificationState)>>>;

	fn queue(config: QueueConfig) -> (NotificationQueue<ManualClock>, ManualClock, Log) {
		let clock = ManualClock::new();
		let mut queue = NotificationQueue::with_clock(config, clock.clone());
		let log: Log = Arc::default();
		let sink = Arc::clone(&log);
		queue.subscribe(Box::new(move |change: Change, snap: &Snapshot| {
			sink.lock().unwrap().push((change, snap.id, snap.state));
		}));
		(queue, clock, log)
	}

	#[test]
	fn show_assigns_increasing_ids_and_uses_defaults() {
		let (mut q, _, _) = queue(QueueConfig::default());
		let a = q.info("a", "", ShowOptions::new());
		let b = q.info("b", "", ShowOptions::new());
		assert!(b > a);

		let n = q.get(a).unwrap();
		assert!(n.auto_dismiss());
		assert_eq!(n.dismiss_after(), 5000 * MS);
		assert_eq!(n.anchor(), Anchor::TopRight);
		assert_eq!(q.remaining(a), Some(5000 * MS));
	}

	#[test]
	fn string_kinds_fall_back_to_info() {
		let (mut q, _, _) = queue(QueueConfig::default());
		let id = q.show("toaster", "t", "m", ShowOptions::new());
		assert_eq!(q.get(id).unwrap().kind(), Kind::Info);
	}

	#[test]
	fn countdown_expiry_runs_exit_window() {
		let (mut q, clock, log) = queue(QueueConfig::default());
		let id = q.success("Saved", "ok", ShowOptions::new());

		clock.advance(4999 * MS);
		assert_eq!(q.tick(), 0);
		clock.advance(MS);
		assert_eq!(q.tick(), 1);
		assert_eq!(q.get(id).unwrap().state(), NotificationState::Dismissing);
		assert!(!q.contains(id));
		assert_eq!(q.tracked_len(), 1);

		clock.advance(400 * MS);
		assert_eq!(q.tick(), 1);
		assert!(q.get(id).is_none());

		let changes: Vec<Change> = log.lock().unwrap().iter().map(|e| e.0).collect();
		assert_eq!(changes, [Change::Added, Change::DismissStarted, Change::Removed]);
	}

	#[test]
	fn late_tick_finishes_both_phases_at_once() {
		let (mut q, clock, _) = queue(QueueConfig::default());
		let id = q.info("i", "", ShowOptions::new());
		clock.advance(60_000 * MS);
		assert_eq!(q.tick(), 2);
		assert!(q.get(id).is_none());
	}

	#[test]
	fn remove_is_idempotent() {
		let (mut q, clock, log) = queue(QueueConfig::default());
		let id = q.info("i", "", ShowOptions::new());
		q.remove(id);
		q.remove(id);
		assert_eq!(log.lock().unwrap().len(), 2);
		assert_eq!(q.remaining(id), None);

		clock.advance(400 * MS);
		q.tick();
		q.remove(id);
		assert_eq!(log.lock().unwrap().len(), 3);
	}

	#[test]
	fn explicit_remove_beats_countdown() {
		let (mut q, clock, log) = queue(QueueConfig::default().exit_window(10_000 * MS));
		let id = q.info("i", "", ShowOptions::new());
		clock.advance(5000 * MS);
		q.remove(id);
		assert_eq!(q.tick(), 0);
		let dismiss_starts = log
			.lock()
			.unwrap()
			.iter()
			.filter(|e| e.0 == Change::DismissStarted)
			.count();
		assert_eq!(dismiss_starts, 1);
	}

	#[test]
	fn remove_all_goes_oldest_first() {
		let (mut q, _, log) = queue(QueueConfig::default());
		let ids: Vec<_> = (0..3).map(|i| q.info(format!("{i}"), "", ShowOptions::new())).collect();
		log.lock().unwrap().clear();

		q.remove_all();
		assert!(q.is_empty());
		let order: Vec<NotificationId> = log.lock().unwrap().iter().map(|e| e.1).collect();
		assert_eq!(order, ids);
	}

	#[test]
	fn eviction_finalizes_oldest_immediately() {
		let (mut q, _, log) = queue(QueueConfig::default().max_visible(2).auto_dismiss(false));
		let first = q.info("1", "", ShowOptions::new());
		let second = q.info("2", "", ShowOptions::new());
		let third = q.info("3", "", ShowOptions::new());

		assert_eq!(q.tracked_len(), 2);
		assert!(q.get(first).is_none());
		assert!(q.contains(second) && q.contains(third));

		let log = log.lock().unwrap();
		assert_eq!(
			log[2..],
			[
				(Change::DismissStarted, first, NotificationState::Dismissing),
				(Change::Removed, first, NotificationState::Removed),
				(Change::Added, third, NotificationState::Visible),
			]
		);
	}

	#[test]
	fn eviction_counts_dismissing_entries() {
		let (mut q, _, _) = queue(QueueConfig::default().max_visible(2));
		let first = q.info("1", "", ShowOptions::new());
		let second = q.info("2", "", ShowOptions::new());
		q.remove(first);
		let third = q.info("3", "", ShowOptions::new());

		assert_eq!(q.tracked_len(), 2);
		assert!(q.get(first).is_none());
		assert!(q.contains(second) && q.contains(third));
	}

	#[test]
	fn hidden_page_freezes_countdowns_only() {
		let (mut q, clock, _) = queue(QueueConfig::default());
		let leaving = q.info("leaving", "", ShowOptions::new());
		let staying = q.info("staying", "", ShowOptions::new());
		q.remove(leaving);

		clock.advance(2000 * MS);
		q.set_page_visibility(Visibility::Hidden);
		assert!(q.is_paused());

		clock.advance(30_000 * MS);
		q.tick();
		assert!(q.get(leaving).is_none(), "exit windows keep running");
		assert!(q.contains(staying));
		assert_eq!(q.remaining(staying), Some(3000 * MS));

		q.set_page_visibility(Visibility::Visible);
		clock.advance(2999 * MS);
		q.tick();
		assert!(q.contains(staying));
		clock.advance(MS);
		q.tick();
		assert!(!q.contains(staying));
	}

	#[test]
	fn update_position_affects_only_new_notifications() {
		let (mut q, _, _) = queue(QueueConfig::default());
		let before = q.info("a", "", ShowOptions::new());
		q.update_position(Anchor::BottomLeft);
		let after = q.info("b", "", ShowOptions::new());
		assert_eq!(q.get(before).unwrap().anchor(), Anchor::TopRight);
		assert_eq!(q.get(after).unwrap().anchor(), Anchor::BottomLeft);
		assert_eq!(q.position(), Anchor::BottomLeft);
	}

	#[test]
	fn update_auto_dismiss_affects_only_new_notifications() {
		let (mut q, _, _) = queue(QueueConfig::default());
		let armed = q.info("a", "", ShowOptions::new());
		q.update_auto_dismiss(false);
		let sticky = q.info("b", "", ShowOptions::new());
		let forced = q.info("c", "", ShowOptions::new().auto_dismiss(true));
		assert!(q.remaining(armed).is_some());
		assert!(q.remaining(sticky).is_none());
		assert!(q.remaining(forced).is_some());
	}

	#[test]
	fn per_call_duration_overrides_default() {
		let (mut q, _, _) = queue(QueueConfig::default());
		let quick = q.info("q", "", ShowOptions::new().dismiss_after(750 * MS));
		let zero = q.info("z", "", ShowOptions::new().dismiss_after(Duration::ZERO));
		assert_eq!(q.remaining(quick), Some(750 * MS));
		assert_eq!(q.remaining(zero), Some(5000 * MS));
	}

	#[test]
	fn next_deadline_tracks_all_timers() {
		let (mut q, clock, _) = queue(QueueConfig::default().announce_window(10_000 * MS));
		let start = clock.now();
		assert_eq!(q.next_deadline(), None);
		let id = q.info("a", "", ShowOptions::new());
		assert_eq!(q.next_deadline(), Some(start + 5000 * MS));
		q.remove(id);
		assert_eq!(q.next_deadline(), Some(start + 400 * MS));
	}

	#[test]
	fn zero_config_values_are_corrected() {
		let config = QueueConfig {
			max_visible: 0,
			dismiss_after: Duration::ZERO,
			..QueueConfig::default()
		};
		let (q, _, _) = queue(config);
		assert_eq!(q.config().max_visible, 1);
		assert_eq!(q.config().dismiss_after, 5000 * MS);
	}

	#[test]
	fn custom_kind_table_keeps_config_icons() {
		let mut config = QueueConfig::default();
		config.icons.insert(Kind::Custom, "*".to_string());
		let (q, _, _) = queue(config);
		let mut q = q.with_kind_table(
			KindTable::builtin()
				.with_icon(Kind::Custom, "@")
				.with_icon(Kind::Info, "i")
				.with_exemption(Kind::Error, true),
		);

		assert_eq!(q.kinds().get(Kind::Custom).icon, "*");
		assert_eq!(q.kinds().get(Kind::Info).icon, "i");
		let id = q.error("e", "", ShowOptions::new());
		assert_eq!(q.remaining(id), None);
	}
}
