//! Observer interface for presentation layers.
//!
//! The queue decides *when* a toast appears, starts leaving and is gone. A
//! [`Renderer`] decides how that looks: animation, stacking math, drawing.

use crate::notification::{Change, Snapshot};

/// Subscriber notified of every state change, in the order they happen.
pub trait Renderer: Send {
	fn on_change(&mut self, change: Change, snapshot: &Snapshot);
}

impl<F> Renderer for F
where
	F: FnMut(Change, &Snapshot) + Send,
{
	fn on_change(&mut self, change: Change, snapshot: &Snapshot) {
		self(change, snapshot)
	}
}
