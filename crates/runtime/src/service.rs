use chime_toast::{
	Anchor, Clock, Instant, Kind, NotificationId, NotificationQueue, ShowOptions, Snapshot, Visibility,
};
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, trace};

/// Messages accepted by a running [`ToastService`].
#[derive(Debug)]
pub enum Command {
	Show {
		kind: Kind,
		title: String,
		message: String,
		options: ShowOptions,
		reply: Option<oneshot::Sender<NotificationId>>,
	},
	Remove(NotificationId),
	RemoveAll,
	UpdatePosition(Anchor),
	UpdateAutoDismiss(bool),
	SetVisibility(Visibility),
	Snapshots(oneshot::Sender<Vec<Snapshot>>),
}

/// Owns a [`NotificationQueue`] on a tokio task.
///
/// The task sleeps until the earliest of the next command or the queue's
/// [`NotificationQueue::next_deadline`], then ticks the queue. Timers are
/// checked before commands on every wakeup so a busy command stream cannot
/// starve expirations.
pub struct ToastService<C: Clock> {
	queue: NotificationQueue<C>,
	commands: mpsc::UnboundedReceiver<Command>,
	cancel: CancellationToken,
}

impl<C: Clock + 'static> ToastService<C> {
	/// Moves `queue` onto a new task and returns a handle to drive it.
	///
	/// The task ends when [`ToastHandle::shutdown`] is called or every handle
	/// has been dropped.
	pub fn spawn(queue: NotificationQueue<C>) -> (ToastHandle, JoinHandle<()>) {
		let (tx, commands) = mpsc::unbounded_channel();
		let cancel = CancellationToken::new();
		let service = Self {
			queue,
			commands,
			cancel: cancel.clone(),
		};
		let join = tokio::spawn(service.run());
		(ToastHandle { tx, cancel }, join)
	}

	async fn run(mut self) {
		debug!(max_visible = self.queue.config().max_visible, "toast service started");
		loop {
			let deadline = self.queue.next_deadline();
			tokio::select! {
				biased;
				_ = self.cancel.cancelled() => break,
				_ = sleep_until(deadline) => {
					let changed = self.queue.tick();
					trace!(changed, "toast timers fired");
				}
				cmd = self.commands.recv() => match cmd {
					Some(cmd) => self.apply(cmd),
					None => break,
				},
			}
		}
		debug!(remaining = self.queue.tracked_len(), "toast service stopped");
	}

	fn apply(&mut self, cmd: Command) {
		match cmd {
			Command::Show {
				kind,
				title,
				message,
				options,
				reply,
			} => {
				let id = self.queue.show(kind, title, message, options);
				if let Some(reply) = reply {
					let _ = reply.send(id);
				}
			}
			Command::Remove(id) => self.queue.remove(id),
			Command::RemoveAll => self.queue.remove_all(),
			Command::UpdatePosition(anchor) => self.queue.update_position(anchor),
			Command::UpdateAutoDismiss(enabled) => self.queue.update_auto_dismiss(enabled),
			Command::SetVisibility(visibility) => self.queue.set_page_visibility(visibility),
			Command::Snapshots(reply) => {
				let _ = reply.send(self.queue.snapshots());
			}
		}
	}
}

async fn sleep_until(deadline: Option<Instant>) {
	match deadline {
		Some(at) => tokio::time::sleep_until(tokio::time::Instant::from_std(at)).await,
		None => std::future::pending().await,
	}
}

/// Cloneable sender side of a [`ToastService`].
///
/// Every method is fire-and-forget except [`show`](Self::show) and
/// [`snapshots`](Self::snapshots), which wait for the service's reply.
/// Commands sent after the service stopped are dropped.
#[derive(Debug, Clone)]
pub struct ToastHandle {
	tx: mpsc::UnboundedSender<Command>,
	cancel: CancellationToken,
}

impl ToastHandle {
	/// Shows a notification and returns its id, or `None` if the service is gone.
	pub async fn show(
		&self,
		kind: impl Into<Kind>,
		title: impl Into<String>,
		message: impl Into<String>,
		options: ShowOptions,
	) -> Option<NotificationId> {
		let (reply, rx) = oneshot::channel();
		self.send(Command::Show {
			kind: kind.into(),
			title: title.into(),
			message: message.into(),
			options,
			reply: Some(reply),
		});
		rx.await.ok()
	}

	/// Shows a notification without waiting for its id.
	pub fn post(&self, kind: impl Into<Kind>, title: impl Into<String>, message: impl Into<String>, options: ShowOptions) {
		self.send(Command::Show {
			kind: kind.into(),
			title: title.into(),
			message: message.into(),
			options,
			reply: None,
		});
	}

	pub fn remove(&self, id: NotificationId) {
		self.send(Command::Remove(id));
	}

	pub fn remove_all(&self) {
		self.send(Command::RemoveAll);
	}

	pub fn update_position(&self, anchor: Anchor) {
		self.send(Command::UpdatePosition(anchor));
	}

	pub fn update_auto_dismiss(&self, enabled: bool) {
		self.send(Command::UpdateAutoDismiss(enabled));
	}

	/// Forwards a host visibility signal; hidden pauses every countdown.
	pub fn set_visibility(&self, visibility: Visibility) {
		self.send(Command::SetVisibility(visibility));
	}

	/// Returns every tracked notification, oldest first. Empty once stopped.
	pub async fn snapshots(&self) -> Vec<Snapshot> {
		let (reply, rx) = oneshot::channel();
		self.send(Command::Snapshots(reply));
		rx.await.unwrap_or_default()
	}

	/// Stops the service task. Pending commands are discarded.
	pub fn shutdown(&self) {
		self.cancel.cancel();
	}

	pub fn is_closed(&self) -> bool {
		self.tx.is_closed()
	}

	fn send(&self, cmd: Command) {
		if let Err(mpsc::error::SendError(cmd)) = self.tx.send(cmd) {
			debug!(?cmd, "toast service stopped; command dropped");
		}
	}
}
