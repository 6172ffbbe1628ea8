use std::time::Duration;

use chime_toast::{Announcement, AnnouncementId, AnnouncementSink, Change, Renderer, Snapshot};

/// Prints one line per lifecycle change.
#[derive(Debug, Default)]
pub struct TerminalRenderer;

impl Renderer for TerminalRenderer {
	fn on_change(&mut self, change: Change, toast: &Snapshot) {
		println!("{}", render_line(change, toast));
	}
}

fn render_line(change: Change, toast: &Snapshot) -> String {
	match change {
		Change::Added => {
			let mut line = format!("{} [{}] {} @ {}", toast.icon, toast.id, toast.title, toast.anchor);
			if !toast.message.is_empty() {
				line.push_str(": ");
				line.push_str(&toast.message);
			}
			match toast.countdown {
				Some(left) => line.push_str(&format!(" ({})", seconds(left))),
				None => line.push_str(" (sticky)"),
			}
			line
		}
		Change::DismissStarted => format!("  [{}] leaving", toast.id),
		Change::Removed => format!("  [{}] gone", toast.id),
	}
}

fn seconds(d: Duration) -> String {
	format!("{:.1}s", d.as_secs_f32())
}

/// Prints announcements as a screen reader would speak them.
#[derive(Debug, Default)]
pub struct TerminalAnnouncer;

impl AnnouncementSink for TerminalAnnouncer {
	fn announce(&mut self, announcement: &Announcement) {
		println!("  (say) {}", announcement.text);
	}

	fn retract(&mut self, _id: AnnouncementId) {}
}

/// Formats the `list` reply.
pub fn list(toasts: &[Snapshot]) -> String {
	if toasts.is_empty() {
		return "no toasts".to_string();
	}
	toasts
		.iter()
		.map(|t| {
			let countdown = t.countdown.map(seconds).unwrap_or_else(|| "-".to_string());
			format!("{} {} {:?} {} {}", t.id, t.kind, t.state, countdown, t.title)
		})
		.collect::<Vec<_>>()
		.join("\n")
}
