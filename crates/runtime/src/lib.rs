//! Event-loop host for [`chime_toast::NotificationQueue`].
//!
//! The queue itself is synchronous and never sleeps. [`ToastService`] owns one
//! queue on a tokio task, applies [`Command`]s sent through a [`ToastHandle`]
//! and wakes at the queue's next deadline to let countdowns fire. The task is
//! the only writer, so the queue needs no lock.

mod clock;
mod service;

pub use clock::TokioClock;
pub use service::{Command, ToastHandle, ToastService};
