//! Transient notification (toast) queue.
//!
//! The crate manages the presentation lifecycle of toasts and nothing else:
//! it decides when a toast appears, when it starts leaving and when it is
//! gone. Drawing is left to [`Renderer`]s, screen-reader output to an
//! [`AnnouncementSink`], and analytics to an [`EventSink`].
//!
//! # Components
//!
//! - [`NotificationQueue`] - bounded set with drop-oldest eviction; the only
//!   component callers talk to
//! - [`Scheduler`] - cancellable countdowns with global pause/resume
//! - [`Announcer`] - self-expiring assistive announcements
//! - [`KindTable`] - per-kind icon and dismiss-exemption policy
//!
//! # Lifecycle
//!
//! ```text
//!   show()      countdown / remove() / eviction          exit window
//! ---------> Visible ---------------------------> Dismissing ---------> Removed
//! ```
//!
//! Time only advances when the host calls [`NotificationQueue::tick`], which
//! it should do at [`NotificationQueue::next_deadline`].
//!
//! # Usage
//!
//! ```
//! use chime_toast::{NotificationQueue, QueueConfig, ShowOptions};
//!
//! let mut queue = NotificationQueue::new(QueueConfig::default().max_visible(3));
//! let id = queue.show("error", "Upload failed", "Connection reset", ShowOptions::new());
//! assert!(queue.contains(id));
//!
//! queue.remove(id);
//! assert!(!queue.contains(id));
//! ```

pub mod announcer;
pub mod clock;
pub mod config;
pub mod error;
pub mod events;
pub mod kinds;
pub mod notification;
pub mod queue;
pub mod renderer;
pub mod scheduler;
pub mod types;

pub use announcer::{Announcement, AnnouncementId, AnnouncementSink, Announcer, Politeness};
pub use clock::{Clock, ManualClock, SystemClock};
pub use config::QueueConfig;
pub use error::{ConfigError, ParseAnchorError, ParseIdError, ParseKindError, Result};
pub use events::{DismissCause, EventSink, NullSink, QueueEvent, TracingSink};
pub use kinds::{KindPolicy, KindTable};
pub use notification::{Change, Notification, NotificationId, ShowOptions, Snapshot};
pub use queue::NotificationQueue;
pub use renderer::Renderer;
pub use scheduler::{Callback, Fired, Scheduler};
pub use types::{Anchor, Kind, NARROW_VIEWPORT, NotificationState, SlideDirection, StackEdge, Visibility};
/// Re-exported so hosts can build deadlines without depending on `web-time`.
pub use web_time::Instant;
