use std::future::Future;

use tokio::task::JoinSet;

use crate::TaskClass;

/// Owned group of tasks that are aborted together when the set is dropped.
///
/// Task spawning is routed through the worker runtime handle, so a set can be
/// filled from synchronous code outside any runtime.
#[derive(Debug)]
pub struct WorkerJoinSet<T> {
	class: TaskClass,
	inner: JoinSet<T>,
}

impl<T> WorkerJoinSet<T>
where
	T: Send + 'static,
{
	/// Creates an empty join set for the given task class.
	pub fn new(class: TaskClass) -> Self {
		Self { class, inner: JoinSet::new() }
	}

	/// Returns the number of tasks currently in the set.
	pub fn len(&self) -> usize {
		self.inner.len()
	}

	/// Returns `true` if the set is empty.
	pub fn is_empty(&self) -> bool {
		self.inner.is_empty()
	}

	/// Spawns a future into the set.
	pub fn spawn<F>(&mut self, fut: F)
	where
		F: Future<Output = T> + Send + 'static,
	{
		tracing::trace!(worker_class = self.class.as_str(), pending = self.inner.len(), "worker.join_set.spawn");
		let handle = crate::spawn::runtime_handle();
		self.inner.spawn_on(fut, &handle);
	}

	/// Aborts every task in the set.
	pub fn abort_all(&mut self) {
		self.inner.abort_all();
	}
}
