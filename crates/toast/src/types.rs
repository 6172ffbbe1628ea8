//! Core types for the notification system.

use core::fmt;
use core::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{ParseAnchorError, ParseKindError};

/// Category of a notification.
///
/// Selects icon, label and dismiss-exemption policy through the queue's
/// [`KindTable`](crate::KindTable).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Kind {
	/// Operation completed.
	Success,
	/// Operation failed.
	Error,
	/// Something needs attention but nothing failed.
	Warning,
	/// Informational message (default).
	#[default]
	Info,
	/// Work in progress. Never auto-dismissed.
	Loading,
	/// Host-defined presentation.
	Custom,
}

impl Kind {
	/// Every kind, in declaration order.
	pub const ALL: [Kind; 6] = [Kind::Success, Kind::Error, Kind::Warning, Kind::Info, Kind::Loading, Kind::Custom];

	/// Lowercase wire name.
	pub const fn name(self) -> &'static str {
		match self {
			Kind::Success => "success",
			Kind::Error => "error",
			Kind::Warning => "warning",
			Kind::Info => "info",
			Kind::Loading => "loading",
			Kind::Custom => "custom",
		}
	}

	/// Parses a kind name, coercing anything unrecognized to [`Kind::Info`].
	pub fn from_name(name: &str) -> Self {
		match name.parse() {
			Ok(kind) => kind,
			Err(ParseKindError(unknown)) => {
				tracing::debug!(kind = %unknown, "unknown notification kind, using info");
				Kind::Info
			}
		}
	}

	pub(crate) const fn index(self) -> usize {
		self as usize
	}
}

impl fmt::Display for Kind {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.name())
	}
}

impl FromStr for Kind {
	type Err = ParseKindError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		let trimmed = s.trim();
		Kind::ALL
			.into_iter()
			.find(|kind| kind.name().eq_ignore_ascii_case(trimmed))
			.ok_or_else(|| ParseKindError(trimmed.to_string()))
	}
}

impl From<&str> for Kind {
	fn from(name: &str) -> Self {
		Kind::from_name(name)
	}
}

impl From<String> for Kind {
	fn from(name: String) -> Self {
		Kind::from_name(&name)
	}
}

/// Screen anchor position for notifications.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Anchor {
	/// Top-left corner of the screen.
	TopLeft,
	/// Top-right corner of the screen (default).
	#[default]
	TopRight,
	/// Top-center of the screen.
	TopCenter,
	/// Bottom-left corner of the screen.
	BottomLeft,
	/// Bottom-right corner of the screen.
	BottomRight,
	/// Bottom-center of the screen.
	BottomCenter,
}

impl Anchor {
	/// Every anchor, in declaration order.
	pub const ALL: [Anchor; 6] = [
		Anchor::TopLeft,
		Anchor::TopRight,
		Anchor::TopCenter,
		Anchor::BottomLeft,
		Anchor::BottomRight,
		Anchor::BottomCenter,
	];

	/// Kebab-case name, e.g. `"top-right"`.
	pub const fn name(self) -> &'static str {
		match self {
			Anchor::TopLeft => "top-left",
			Anchor::TopRight => "top-right",
			Anchor::TopCenter => "top-center",
			Anchor::BottomLeft => "bottom-left",
			Anchor::BottomRight => "bottom-right",
			Anchor::BottomCenter => "bottom-center",
		}
	}

	/// Returns true for the three bottom anchors.
	pub const fn is_bottom(self) -> bool {
		matches!(self, Anchor::BottomLeft | Anchor::BottomRight | Anchor::BottomCenter)
	}

	/// Edge of the stack at which a new toast enters.
	///
	/// Bottom anchors grow upwards, so the newest toast goes in front of the
	/// existing ones.
	pub const fn edge(self) -> StackEdge {
		if self.is_bottom() { StackEdge::Front } else { StackEdge::Back }
	}

	/// Direction a toast slides in from (and back out to) at this anchor.
	pub const fn slide_direction(self) -> SlideDirection {
		match self {
			Anchor::TopLeft | Anchor::BottomLeft => SlideDirection::FromLeft,
			Anchor::TopRight | Anchor::BottomRight => SlideDirection::FromRight,
			Anchor::TopCenter => SlideDirection::FromTop,
			Anchor::BottomCenter => SlideDirection::FromBottom,
		}
	}

	/// Anchor to use for a host viewport `width` columns wide.
	///
	/// At or below [`NARROW_VIEWPORT`] every toast moves to the bottom
	/// center; wider viewports keep `preferred`.
	pub const fn for_viewport(preferred: Anchor, width: u32) -> Anchor {
		if width <= NARROW_VIEWPORT { Anchor::BottomCenter } else { preferred }
	}
}

/// Widest viewport treated as narrow by [`Anchor::for_viewport`].
pub const NARROW_VIEWPORT: u32 = 768;

impl fmt::Display for Anchor {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.name())
	}
}

impl FromStr for Anchor {
	type Err = ParseAnchorError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		let trimmed = s.trim();
		Anchor::ALL
			.into_iter()
			.find(|anchor| anchor.name().eq_ignore_ascii_case(trimmed))
			.ok_or_else(|| ParseAnchorError(trimmed.to_string()))
	}
}

/// Where a new toast is inserted relative to the toasts already shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StackEdge {
	/// Before the existing toasts.
	Front,
	/// After the existing toasts.
	Back,
}

/// Direction for slide animations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SlideDirection {
	/// Slide from the top edge.
	FromTop,
	/// Slide from the bottom edge.
	FromBottom,
	/// Slide from the left edge.
	FromLeft,
	/// Slide from the right edge.
	FromRight,
}

/// Lifecycle state of a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum NotificationState {
	/// Shown and, when eligible, counting down.
	#[default]
	Visible,
	/// Exit window running; no longer accepts `remove`.
	Dismissing,
	/// Terminal. Dropped from the queue.
	Removed,
}

impl NotificationState {
	/// True while the notification occupies a capacity slot.
	pub const fn is_tracked(self) -> bool {
		matches!(self, NotificationState::Visible | NotificationState::Dismissing)
	}
}

/// Host page visibility, forwarded into pause/resume.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Visibility {
	/// Page is in front; countdowns run.
	#[default]
	Visible,
	/// Page is hidden; countdowns are frozen.
	Hidden,
}
