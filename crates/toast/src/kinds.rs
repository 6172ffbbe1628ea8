//! Per-kind handler table.
//!
//! Everything that varies by [`Kind`] is looked up here once, so the queue
//! never branches on kind names.

use crate::announcer::Politeness;
use crate::types::Kind;

/// Presentation and dismiss policy for one kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KindPolicy {
	/// Word that opens the spoken announcement, e.g. `"error"`.
	pub label: String,
	/// Glyph handed to renderers.
	pub icon: String,
	/// Urgency of the announcement.
	pub politeness: Politeness,
	/// Never arm a countdown, whatever the auto-dismiss setting.
	pub exempt_from_auto_dismiss: bool,
}

impl KindPolicy {
	fn builtin(kind: Kind) -> Self {
		let (icon, exempt) = match kind {
			Kind::Success => ("\u{2713}", false),
			Kind::Error => ("\u{2715}", false),
			Kind::Warning => ("\u{26a0}", false),
			Kind::Info => ("\u{2139}", false),
			Kind::Loading => ("\u{25cc}", true),
			Kind::Custom => ("\u{1f389}", false),
		};
		let politeness = match kind {
			Kind::Error => Politeness::Assertive,
			_ => Politeness::Polite,
		};
		Self {
			label: kind.name().to_string(),
			icon: icon.to_string(),
			politeness,
			exempt_from_auto_dismiss: exempt,
		}
	}
}

/// Policy lookup indexed by [`Kind`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KindTable {
	policies: [KindPolicy; 6],
}

impl Default for KindTable {
	fn default() -> Self {
		Self::builtin()
	}
}

impl KindTable {
	/// The builtin table: only [`Kind::Loading`] is exempt from auto-dismiss.
	pub fn builtin() -> Self {
		Self {
			policies: Kind::ALL.map(KindPolicy::builtin),
		}
	}

	/// Returns the policy for `kind`.
	pub fn get(&self, kind: Kind) -> &KindPolicy {
		&self.policies[kind.index()]
	}

	/// Replaces the icon for `kind`.
	#[must_use]
	pub fn with_icon(mut self, kind: Kind, icon: impl Into<String>) -> Self {
		self.policies[kind.index()].icon = icon.into();
		self
	}

	/// Replaces the announcement label for `kind`.
	#[must_use]
	pub fn with_label(mut self, kind: Kind, label: impl Into<String>) -> Self {
		self.policies[kind.index()].label = label.into();
		self
	}

	/// Sets whether `kind` is exempt from auto-dismiss.
	#[must_use]
	pub fn with_exemption(mut self, kind: Kind, exempt: bool) -> Self {
		self.policies[kind.index()].exempt_from_auto_dismiss = exempt;
		self
	}

	/// Whether a countdown may be armed for `kind`.
	pub fn allows_countdown(&self, kind: Kind) -> bool {
		!self.get(kind).exempt_from_auto_dismiss
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn only_loading_is_exempt_by_default() {
		let table = KindTable::builtin();
		for kind in Kind::ALL {
			assert_eq!(table.allows_countdown(kind), kind != Kind::Loading, "{kind}");
		}
	}

	#[test]
	fn errors_interrupt_and_labels_follow_kind_names() {
		let table = KindTable::builtin();
		for kind in Kind::ALL {
			let policy = table.get(kind);
			assert_eq!(policy.label, kind.name());
			let expected = if kind == Kind::Error { Politeness::Assertive } else { Politeness::Polite };
			assert_eq!(policy.politeness, expected, "{kind}");
		}
	}

	#[test]
	fn icons_are_distinct() {
		let table = KindTable::builtin();
		let mut icons: Vec<&str> = Kind::ALL.iter().map(|&k| table.get(k).icon.as_str()).collect();
		icons.sort_unstable();
		icons.dedup();
		assert_eq!(icons.len(), Kind::ALL.len());
	}

	#[test]
	fn overrides_touch_a_single_kind() {
		let table = KindTable::builtin().with_icon(Kind::Custom, "*").with_exemption(Kind::Error, true);
		assert_eq!(table.get(Kind::Custom).icon, "*");
		assert!(!table.allows_countdown(Kind::Error));
		assert!(table.allows_countdown(Kind::Warning));
		assert_eq!(table.get(Kind::Warning).icon, KindTable::builtin().get(Kind::Warning).icon);
	}
}
