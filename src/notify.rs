use serde::Serialize;
use tokio::sync::mpsc;

/// An outbound notification intent produced by a handler.
///
/// Handlers only describe what should be sent; the dispatch worker owns
/// delivery, which keeps the request path free of delivery failures.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Notification {
	Email {
		to: String,
		subject: String,
		body: String,
	},
	Sms {
		to: String,
		body: String,
	},
}

/// Handle used by handlers to emit notification intents.
#[derive(Debug, Clone)]
pub struct Notifier {
	tx: mpsc::UnboundedSender<Notification>,
}

impl Notifier {
	/// Spawns the dispatch worker and returns a handle to it.
	pub fn spawn() -> Self {
		let (tx, mut rx) = mpsc::unbounded_channel();

		tokio::spawn(async move {
			while let Some(notification) = rx.recv().await {
				dispatch(&notification);
			}
		});

		Self { tx }
	}

	/// Queues a notification. A closed worker is logged, never surfaced:
	/// notifications must not fail the request that produced them.
	pub fn send(&self, notification: Notification) {
		if let Err(error) = self.tx.send(notification) {
			tracing::warn!(notification = ?error.0, "notifier worker is gone");
		}
	}
}

fn dispatch(notification: &Notification) {
	match notification {
		Notification::Email { to, subject, .. } => {
			tracing::info!(%to, %subject, "dispatching email notification");
		}
		Notification::Sms { to, .. } => {
			tracing::info!(%to, "dispatching sms notification");
		}
	}
}
