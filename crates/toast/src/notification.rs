//! Core notification data structures.

use core::fmt;
use std::str::FromStr;
use std::time::Duration;

use web_time::Instant;

use crate::error::ParseIdError;
use crate::kinds::KindTable;
use crate::types::{Anchor, Kind, NotificationState, SlideDirection, StackEdge};

/// Unique identifier for a notification.
///
/// Allocated by the owning queue from a monotonic counter and never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NotificationId(u64);

impl NotificationId {
	pub(crate) const fn new(raw: u64) -> Self {
		Self(raw)
	}

	/// Raw counter value.
	pub const fn get(self) -> u64 {
		self.0
	}
}

impl fmt::Display for NotificationId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "toast-{}", self.0)
	}
}

/// Accepts the displayed form (`toast-3`) or the bare counter (`3`).
impl FromStr for NotificationId {
	type Err = ParseIdError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		let trimmed = s.trim();
		let raw = trimmed.strip_prefix("toast-").unwrap_or(trimmed);
		raw.parse::<u64>()
			.ok()
			.filter(|n| *n > 0)
			.map(Self)
			.ok_or_else(|| ParseIdError(s.to_string()))
	}
}

/// Per-call overrides for [`NotificationQueue::show`](crate::NotificationQueue::show).
///
/// Unset fields fall back to the queue defaults.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ShowOptions {
	/// Whether to arm a countdown.
	pub auto_dismiss: Option<bool>,
	/// Countdown duration. Zero counts as unset.
	pub dismiss_after: Option<Duration>,
}

impl ShowOptions {
	/// Options that defer entirely to the queue.
	pub fn new() -> Self {
		Self::default()
	}

	/// Overrides the auto-dismiss policy.
	#[must_use]
	pub fn auto_dismiss(mut self, auto_dismiss: bool) -> Self {
		self.auto_dismiss = Some(auto_dismiss);
		self
	}

	/// Overrides the countdown duration.
	#[must_use]
	pub fn dismiss_after(mut self, duration: Duration) -> Self {
		self.dismiss_after = Some(duration);
		self
	}

	/// Shorthand for a notification that stays until removed.
	pub fn sticky() -> Self {
		Self::new().auto_dismiss(false)
	}
}

/// A notification held by the queue.
///
/// Everything but `state` is fixed at creation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
	pub(crate) id: NotificationId,
	pub(crate) kind: Kind,
	pub(crate) title: String,
	pub(crate) message: String,
	pub(crate) anchor: Anchor,
	pub(crate) auto_dismiss: bool,
	pub(crate) dismiss_after: Duration,
	pub(crate) created_at: Instant,
	pub(crate) state: NotificationState,
}

impl Notification {
	/// Returns the notification's unique ID.
	pub fn id(&self) -> NotificationId {
		self.id
	}

	/// Returns the kind.
	pub fn kind(&self) -> Kind {
		self.kind
	}

	/// Returns the title.
	pub fn title(&self) -> &str {
		&self.title
	}

	/// Returns the message body.
	pub fn message(&self) -> &str {
		&self.message
	}

	/// Anchor in effect when the notification was shown.
	pub fn anchor(&self) -> Anchor {
		self.anchor
	}

	/// Requested auto-dismiss policy, before kind exemptions.
	pub fn auto_dismiss(&self) -> bool {
		self.auto_dismiss
	}

	/// Countdown duration.
	pub fn dismiss_after(&self) -> Duration {
		self.dismiss_after
	}

	/// When this notification was created.
	pub fn created_at(&self) -> Instant {
		self.created_at
	}

	/// Current lifecycle state.
	pub fn state(&self) -> NotificationState {
		self.state
	}

	/// Whether a countdown is armed for this notification while visible.
	pub fn is_countdown_eligible(&self, kinds: &KindTable) -> bool {
		self.auto_dismiss && kinds.allows_countdown(self.kind)
	}
}

/// What changed about a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Change {
	/// Shown for the first time.
	Added,
	/// Exit window started.
	DismissStarted,
	/// Gone for good.
	Removed,
}

/// Read-only view handed to renderers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
	pub id: NotificationId,
	pub kind: Kind,
	pub title: String,
	pub message: String,
	pub state: NotificationState,
	pub anchor: Anchor,
	/// Glyph from the kind table.
	pub icon: String,
	/// Where the renderer inserts the toast in its stack.
	pub edge: StackEdge,
	/// Direction the toast enters from and leaves towards.
	pub slide: SlideDirection,
	/// Full countdown duration when one is armed, for progress indicators.
	pub countdown: Option<Duration>,
}

impl Snapshot {
	pub(crate) fn of(notification: &Notification, kinds: &KindTable) -> Self {
		let countdown = notification.is_countdown_eligible(kinds).then_some(notification.dismiss_after);
		Self {
			id: notification.id,
			kind: notification.kind,
			title: notification.title.clone(),
			message: notification.message.clone(),
			state: notification.state,
			anchor: notification.anchor,
			icon: kinds.get(notification.kind).icon.clone(),
			edge: notification.anchor.edge(),
			slide: notification.anchor.slide_direction(),
			countdown,
		}
	}
}
