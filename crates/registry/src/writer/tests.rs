use std::time::Duration;

use prefs_store::MemoryStore;

use super::*;
use crate::Registry;

#[tokio::test]
async fn failed_write_is_published_and_value_kept() {
	let store = Arc::new(MemoryStore::new());
	let registry = Registry::builder(Arc::clone(&store) as Arc<dyn KeyValueStore>)
		.native("volume", 5i32)
		.build()
		.unwrap();
	let mut failures = registry.write_failures();
	let volume = registry.lookup::<i32>("volume").unwrap();

	store.fail_writes(1);
	volume.update(8);
	registry.flush().await;

	let failure = tokio::time::timeout(Duration::from_secs(2), failures.recv())
		.await
		.expect("no failure published")
		.unwrap();
	assert_eq!(failure.key, "volume");
	assert_eq!(failure.value, Some(WireValue::Int(8)));
	assert!(failure.error.contains("injected write fault"), "{}", failure.error);
	assert_eq!(volume.get(), 5);
	assert_eq!(store.get("volume"), None);
}

#[tokio::test]
async fn retry_policy_recovers_transient_failures() {
	let store = Arc::new(MemoryStore::new());
	let registry = Registry::builder(Arc::clone(&store) as Arc<dyn KeyValueStore>)
		.retry(RetryPolicy::exponential(3, Duration::from_millis(1), Duration::from_millis(4)))
		.native("volume", 5i32)
		.build()
		.unwrap();
	let mut failures = registry.write_failures();

	store.fail_writes(2);
	registry.lookup::<i32>("volume").unwrap().update(8);
	registry.flush().await;

	assert_eq!(store.get("volume"), Some(WireValue::Int(8)));
	assert!(matches!(failures.try_recv(), Err(broadcast::error::TryRecvError::Empty)));
}

#[tokio::test]
async fn writes_apply_in_submission_order() {
	let store = Arc::new(MemoryStore::new());
	let (failures, _) = broadcast::channel(4);
	let queue = WriteQueue::start(Arc::clone(&store) as Arc<dyn KeyValueStore>, RetryPolicy::none(), failures);
	let mut observed = store.observe("volume");

	for v in 0..20 {
		queue.submit("volume", Some(WireValue::Int(v)));
	}
	queue.flush().await;

	assert_eq!(*observed.borrow_and_update(), Some(WireValue::Int(19)));
}

#[tokio::test]
async fn flush_without_writes_returns() {
	let store = Arc::new(MemoryStore::new());
	let (failures, _) = broadcast::channel(4);
	let queue = WriteQueue::start(store, RetryPolicy::none(), failures);

	tokio::time::timeout(Duration::from_secs(2), queue.flush()).await.expect("flush hung");
}
