//! Queue configuration.
//!
//! Configuration is plain TOML with kebab-case keys. Every option is optional:
//!
//! ```toml
//! position = "bottom-right"
//! max-visible = 3
//! auto-dismiss = true
//! dismiss-after-ms = 4000
//! exit-window-ms = 400
//! announce-window-ms = 1000
//!
//! [icons]
//! custom = "*"
//! ```

use std::collections::BTreeMap;
use std::path::Path;
use std::time::Duration;

use serde::Deserialize;

use crate::announcer::DEFAULT_ANNOUNCE_WINDOW;
use crate::error::{ConfigError, Result};
use crate::kinds::KindTable;
use crate::types::{Anchor, Kind};

/// Default eviction threshold.
pub const DEFAULT_MAX_VISIBLE: usize = 5;
/// Default countdown duration.
pub const DEFAULT_DISMISS_AFTER: Duration = Duration::from_millis(5000);
/// Default time between dismiss start and removal.
pub const DEFAULT_EXIT_WINDOW: Duration = Duration::from_millis(400);

/// Settings a [`NotificationQueue`](crate::NotificationQueue) is built from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueueConfig {
	/// Anchor for newly shown notifications.
	pub position: Anchor,
	/// Most notifications visible or dismissing at once.
	pub max_visible: usize,
	/// Default auto-dismiss policy for `show`.
	pub auto_dismiss: bool,
	/// Default countdown duration for `show`.
	pub dismiss_after: Duration,
	/// Exit-animation window between `Dismissing` and `Removed`.
	pub exit_window: Duration,
	/// Lifetime of assistive announcements.
	pub announce_window: Duration,
	/// Icon overrides on top of the builtin kind table.
	pub icons: BTreeMap<Kind, String>,
}

impl Default for QueueConfig {
	fn default() -> Self {
		Self {
			position: Anchor::default(),
			max_visible: DEFAULT_MAX_VISIBLE,
			auto_dismiss: true,
			dismiss_after: DEFAULT_DISMISS_AFTER,
			exit_window: DEFAULT_EXIT_WINDOW,
			announce_window: DEFAULT_ANNOUNCE_WINDOW,
			icons: BTreeMap::new(),
		}
	}
}

#[derive(Debug, Deserialize)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
struct RawConfig {
	position: Anchor,
	max_visible: usize,
	auto_dismiss: bool,
	dismiss_after_ms: u64,
	exit_window_ms: u64,
	announce_window_ms: u64,
	icons: BTreeMap<Kind, String>,
}

impl Default for RawConfig {
	fn default() -> Self {
		let defaults = QueueConfig::default();
		Self {
			position: defaults.position,
			max_visible: defaults.max_visible,
			auto_dismiss: defaults.auto_dismiss,
			dismiss_after_ms: millis(defaults.dismiss_after),
			exit_window_ms: millis(defaults.exit_window),
			announce_window_ms: millis(defaults.announce_window),
			icons: defaults.icons,
		}
	}
}

fn millis(duration: Duration) -> u64 {
	u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}

impl QueueConfig {
	/// Parses and validates a TOML document.
	pub fn from_toml_str(input: &str) -> Result<Self> {
		let raw: RawConfig = toml::from_str(input)?;
		let config = Self {
			position: raw.position,
			max_visible: raw.max_visible,
			auto_dismiss: raw.auto_dismiss,
			dismiss_after: Duration::from_millis(raw.dismiss_after_ms),
			exit_window: Duration::from_millis(raw.exit_window_ms),
			announce_window: Duration::from_millis(raw.announce_window_ms),
			icons: raw.icons,
		};
		config.validate()?;
		Ok(config)
	}

	/// Reads and parses a configuration file.
	pub fn load(path: impl AsRef<Path>) -> Result<Self> {
		let path = path.as_ref();
		let input = std::fs::read_to_string(path).map_err(|error| ConfigError::Io {
			path: path.to_path_buf(),
			error,
		})?;
		tracing::debug!(path = %path.display(), "loading toast config");
		Self::from_toml_str(&input)
	}

	/// Checks the invariants the queue relies on.
	pub fn validate(&self) -> Result<()> {
		if self.max_visible == 0 {
			return Err(ConfigError::ZeroCapacity);
		}
		if self.dismiss_after.is_zero() {
			return Err(ConfigError::ZeroDuration("dismiss-after-ms"));
		}
		Ok(())
	}

	/// Sets the anchor for new notifications.
	#[must_use]
	pub fn position(mut self, position: Anchor) -> Self {
		self.position = position;
		self
	}

	/// Sets the eviction threshold. Zero is raised to one.
	#[must_use]
	pub fn max_visible(mut self, max_visible: usize) -> Self {
		self.max_visible = max_visible.max(1);
		self
	}

	/// Sets the default auto-dismiss policy.
	#[must_use]
	pub fn auto_dismiss(mut self, auto_dismiss: bool) -> Self {
		self.auto_dismiss = auto_dismiss;
		self
	}

	/// Sets the default countdown. Zero keeps the current value.
	#[must_use]
	pub fn dismiss_after(mut self, dismiss_after: Duration) -> Self {
		if !dismiss_after.is_zero() {
			self.dismiss_after = dismiss_after;
		}
		self
	}

	/// Sets the exit-animation window.
	#[must_use]
	pub fn exit_window(mut self, exit_window: Duration) -> Self {
		self.exit_window = exit_window;
		self
	}

	/// Sets the announcement lifetime.
	#[must_use]
	pub fn announce_window(mut self, announce_window: Duration) -> Self {
		self.announce_window = announce_window;
		self
	}

	/// Builtin kind table with this config's icon overrides applied.
	pub fn kind_table(&self) -> KindTable {
		self.icons
			.iter()
			.fold(KindTable::builtin(), |table, (&kind, icon)| table.with_icon(kind, icon.as_str()))
	}
}
