//! Chime terminal front end.
//!
//! Reads line commands from stdin and drives a toast queue hosted on the
//! tokio runtime. Lifecycle changes and screen-reader announcements are
//! printed to stdout; logs go to stderr.

mod command;
mod terminal;

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Context;
use chime_runtime::{TokioClock, ToastHandle, ToastService};
use chime_toast::{Anchor, NotificationQueue, QueueConfig, ShowOptions};
use clap::Parser;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{debug, info, warn};

use crate::command::{HELP, LineCommand};
use crate::terminal::{TerminalAnnouncer, TerminalRenderer};

/// Chime command line arguments.
#[derive(Parser, Debug)]
#[command(name = "chime")]
#[command(about = "Toast notification queue driven from stdin")]
struct Args {
	/// Config file (defaults to $XDG_CONFIG_HOME/chime/config.toml when present)
	#[arg(short, long, value_name = "PATH")]
	config: Option<PathBuf>,

	/// Screen anchor for the stack
	#[arg(long, value_name = "ANCHOR")]
	position: Option<Anchor>,

	/// Maximum number of toasts on screen
	#[arg(long, value_name = "N")]
	max_visible: Option<usize>,

	/// Keep toasts until removed
	#[arg(long)]
	no_auto_dismiss: bool,

	/// Default countdown in milliseconds
	#[arg(long, value_name = "MS")]
	dismiss_after_ms: Option<u64>,

	/// Verbose logging
	#[arg(short, long)]
	verbose: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
	let args = Args::parse();

	setup_tracing(args.verbose);

	let config = load_config(&args)?;
	info!(
		position = %config.position,
		max_visible = config.max_visible,
		auto_dismiss = config.auto_dismiss,
		"starting chime"
	);

	let preferred = config.position;
	let mut queue = NotificationQueue::with_clock(config, TokioClock);
	queue.subscribe(Box::new(TerminalRenderer));
	queue.set_announcement_sink(Box::new(TerminalAnnouncer));
	let (handle, join) = ToastService::spawn(queue);

	let result = read_commands(&handle, preferred).await;
	handle.shutdown();
	join.await.context("toast service panicked")?;
	result
}

async fn read_commands(handle: &ToastHandle, mut preferred: Anchor) -> anyhow::Result<()> {
	let mut lines = BufReader::new(tokio::io::stdin()).lines();
	let mut narrow = false;

	while let Some(line) = lines.next_line().await.context("reading stdin")? {
		let cmd = match command::parse(&line) {
			Ok(Some(cmd)) => cmd,
			Ok(None) => continue,
			Err(err) => {
				eprintln!("error: {err:#}");
				continue;
			}
		};
		debug!(?cmd, "command");

		match cmd {
			LineCommand::Show { kind, title, message } => {
				handle.post(kind, title, message, ShowOptions::new());
			}
			LineCommand::Remove(id) => handle.remove(id),
			LineCommand::Clear => handle.remove_all(),
			LineCommand::Position(anchor) => {
				preferred = anchor;
				if !narrow {
					handle.update_position(anchor);
				}
			}
			LineCommand::AutoDismiss(enabled) => handle.update_auto_dismiss(enabled),
			LineCommand::Visibility(visibility) => handle.set_visibility(visibility),
			LineCommand::Resize(width) => {
				let anchor = Anchor::for_viewport(preferred, width);
				narrow = anchor != preferred;
				handle.update_position(anchor);
			}
			LineCommand::List => println!("{}", terminal::list(&handle.snapshots().await)),
			LineCommand::Help => println!("{HELP}"),
			LineCommand::Quit => break,
		}
	}
	Ok(())
}

fn load_config(args: &Args) -> anyhow::Result<QueueConfig> {
	let mut config = match &args.config {
		Some(path) => read_config(path)?,
		None => match default_config_path() {
			Some(path) if path.is_file() => read_config(&path)?,
			_ => QueueConfig::default(),
		},
	};

	if let Some(position) = args.position {
		config = config.position(position);
	}
	if let Some(max_visible) = args.max_visible {
		if max_visible == 0 {
			warn!("--max-visible 0 raised to 1");
		}
		config = config.max_visible(max_visible);
	}
	if args.no_auto_dismiss {
		config = config.auto_dismiss(false);
	}
	if let Some(ms) = args.dismiss_after_ms {
		anyhow::ensure!(ms > 0, "--dismiss-after-ms must be greater than zero");
		config = config.dismiss_after(Duration::from_millis(ms));
	}

	config.validate()?;
	Ok(config)
}

fn read_config(path: &Path) -> anyhow::Result<QueueConfig> {
	QueueConfig::load(path).with_context(|| format!("loading config from {}", path.display()))
}

fn default_config_path() -> Option<PathBuf> {
	dirs::config_dir().map(|dir| dir.join("chime").join("config.toml"))
}

fn setup_tracing(verbose: bool) {
	use tracing_subscriber::EnvFilter;

	let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
		if verbose {
			EnvFilter::new("chime=debug,chime_runtime=debug,chime_toast=trace,info")
		} else {
			EnvFilter::new("warn")
		}
	});

	tracing_subscriber::fmt()
		.with_env_filter(filter)
		.with_writer(std::io::stderr)
		.with_target(verbose)
		.init();
}
