//! Line protocol read from stdin.

use anyhow::{Context, bail};
use chime_toast::{Anchor, Kind, NotificationId, Visibility};

pub const HELP: &str = "\
commands:
  show <kind> <title> [message...]
  remove <id>
  clear
  position <anchor>
  auto-dismiss on|off
  hide | show-page
  resize <width>
  list
  quit";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineCommand {
	Show { kind: Kind, title: String, message: String },
	Remove(NotificationId),
	Clear,
	Position(Anchor),
	AutoDismiss(bool),
	Visibility(Visibility),
	Resize(u32),
	List,
	Help,
	Quit,
}

/// Parses one input line. Blank lines yield `None`.
///
/// Unknown kinds fall back to info, the same way the queue treats them.
pub fn parse(line: &str) -> anyhow::Result<Option<LineCommand>> {
	let mut words = line.split_whitespace();
	let Some(verb) = words.next() else {
		return Ok(None);
	};

	let cmd = match verb {
		"show" => {
			let kind = Kind::from_name(words.next().context("show needs a kind")?);
			let title = words.next().context("show needs a title")?.to_string();
			let message = words.collect::<Vec<_>>().join(" ");
			LineCommand::Show { kind, title, message }
		}
		"remove" => {
			let id = words.next().context("remove needs an id")?;
			LineCommand::Remove(id.parse()?)
		}
		"clear" => LineCommand::Clear,
		"position" => {
			let anchor = words.next().context("position needs an anchor")?;
			LineCommand::Position(anchor.parse()?)
		}
		"auto-dismiss" => match words.next() {
			Some("on") => LineCommand::AutoDismiss(true),
			Some("off") => LineCommand::AutoDismiss(false),
			other => bail!("auto-dismiss expects on or off, got {}", other.unwrap_or("nothing")),
		},
		"hide" => LineCommand::Visibility(Visibility::Hidden),
		"show-page" => LineCommand::Visibility(Visibility::Visible),
		"resize" => {
			let width = words.next().context("resize needs a width")?;
			LineCommand::Resize(width.parse().with_context(|| format!("invalid width: {width}"))?)
		}
		"list" => LineCommand::List,
		"help" | "?" => LineCommand::Help,
		"quit" | "exit" => LineCommand::Quit,
		other => bail!("unknown command: {other} (try help)"),
	};
	Ok(Some(cmd))
}
