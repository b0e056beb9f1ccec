//! Background write queue shared by all bindings of a registry.

use std::sync::Arc;

use prefs_store::KeyValueStore;
use prefs_wire::WireValue;
use prefs_worker::{RetryPolicy, TaskClass};
use tokio::sync::{broadcast, mpsc, oneshot};

#[cfg(test)]
mod tests;

/// A write the store did not accept after the retry policy gave up.
#[derive(Debug, Clone, PartialEq)]
pub struct WriteFailure {
	pub key: String,
	/// Value that was being written; `None` for a reset.
	pub value: Option<WireValue>,
	/// Rendered store error of the last attempt.
	pub error: String,
}

enum WriteCommand {
	Write { key: String, value: Option<WireValue> },
	Flush(oneshot::Sender<()>),
}

/// Sending half of the write queue.
///
/// Commands are applied one at a time in submission order by a single
/// background task. The task exits once every sender is dropped and the queue
/// is drained, so writes submitted before teardown are still carried out.
#[derive(Clone)]
pub(crate) struct WriteQueue {
	tx: mpsc::UnboundedSender<WriteCommand>,
}

impl WriteQueue {
	pub(crate) fn start(store: Arc<dyn KeyValueStore>, retry: RetryPolicy, failures: broadcast::Sender<WriteFailure>) -> Self {
		let (tx, rx) = mpsc::unbounded_channel();
		prefs_worker::spawn(TaskClass::Background, run(rx, store, retry, failures));
		Self { tx }
	}

	/// Enqueues a write without waiting for it.
	pub(crate) fn submit(&self, key: &str, value: Option<WireValue>) {
		let command = WriteCommand::Write {
			key: key.to_string(),
			value,
		};
		if self.tx.send(command).is_err() {
			tracing::error!(key, "write queue stopped, preference write dropped");
		}
	}

	/// Resolves once every command submitted before this call has been applied.
	pub(crate) async fn flush(&self) {
		let (done, wait) = oneshot::channel();
		if self.tx.send(WriteCommand::Flush(done)).is_ok() {
			let _ = wait.await;
		}
	}
}

async fn run(
	mut rx: mpsc::UnboundedReceiver<WriteCommand>,
	store: Arc<dyn KeyValueStore>,
	retry: RetryPolicy,
	failures: broadcast::Sender<WriteFailure>,
) {
	while let Some(command) = rx.recv().await {
		match command {
			WriteCommand::Write { key, value } => apply(store.as_ref(), &retry, &failures, key, value).await,
			WriteCommand::Flush(done) => {
				let _ = done.send(());
			}
		}
	}
	tracing::trace!("write queue drained");
}

async fn apply(
	store: &dyn KeyValueStore,
	retry: &RetryPolicy,
	failures: &broadcast::Sender<WriteFailure>,
	key: String,
	value: Option<WireValue>,
) {
	match retry.run("preference.write", || store.write(&key, value.clone())).await {
		Ok(()) => tracing::debug!(key = %key, value = ?value, "preference written"),
		Err(error) => {
			tracing::error!(key = %key, value = ?value, %error, "preference write failed");
			let _ = failures.send(WriteFailure {
				key,
				value,
				error: error.to_string(),
			});
		}
	}
}
