//! Fire-and-forget lifecycle events for analytics and logging.

use crate::notification::NotificationId;
use crate::types::{Anchor, Kind};

/// Why a notification started leaving.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DismissCause {
	/// `remove(id)` was called.
	Explicit,
	/// Its countdown ran out.
	Expired,
	/// Pushed out by a newer notification at capacity.
	Evicted,
	/// Part of `remove_all`.
	Cleared,
}

impl DismissCause {
	pub const fn as_str(self) -> &'static str {
		match self {
			DismissCause::Explicit => "explicit",
			DismissCause::Expired => "expired",
			DismissCause::Evicted => "evicted",
			DismissCause::Cleared => "cleared",
		}
	}
}

/// Something the queue did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueueEvent {
	Shown {
		id: NotificationId,
		kind: Kind,
		anchor: Anchor,
		countdown_armed: bool,
	},
	Evicted {
		id: NotificationId,
		/// The notification whose arrival forced the eviction.
		by: NotificationId,
	},
	DismissStarted {
		id: NotificationId,
		cause: DismissCause,
	},
	Removed {
		id: NotificationId,
	},
	Paused {
		countdowns: usize,
	},
	Resumed {
		countdowns: usize,
	},
	PositionChanged {
		anchor: Anchor,
	},
	AutoDismissChanged {
		enabled: bool,
	},
}

/// Receives queue events. Implementations must not block; the queue never
/// waits on them and ignores whatever they do.
pub trait EventSink: Send {
	fn record(&self, event: &QueueEvent);
}

/// Writes every event as a structured `tracing` record.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl EventSink for TracingSink {
	fn record(&self, event: &QueueEvent) {
		match *event {
			QueueEvent::Shown {
				id,
				kind,
				anchor,
				countdown_armed,
			} => {
				tracing::debug!(target: "chime_toast::events", %id, %kind, %anchor, countdown_armed, "toast.shown");
			}
			QueueEvent::Evicted { id, by } => {
				tracing::debug!(target: "chime_toast::events", %id, %by, "toast.evicted");
			}
			QueueEvent::DismissStarted { id, cause } => {
				tracing::debug!(target: "chime_toast::events", %id, cause = cause.as_str(), "toast.dismiss_started");
			}
			QueueEvent::Removed { id } => {
				tracing::trace!(target: "chime_toast::events", %id, "toast.removed");
			}
			QueueEvent::Paused { countdowns } => {
				tracing::debug!(target: "chime_toast::events", countdowns, "toast.paused");
			}
			QueueEvent::Resumed { countdowns } => {
				tracing::debug!(target: "chime_toast::events", countdowns, "toast.resumed");
			}
			QueueEvent::PositionChanged { anchor } => {
				tracing::debug!(target: "chime_toast::events", %anchor, "toast.position_changed");
			}
			QueueEvent::AutoDismissChanged { enabled } => {
				tracing::debug!(target: "chime_toast::events", enabled, "toast.auto_dismiss_changed");
			}
		}
	}
}

/// Discards every event.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl EventSink for NullSink {
	fn record(&self, _event: &QueueEvent) {}
}
