use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::Mutex;
use tokio::sync::{OwnedRwLockReadGuard, OwnedRwLockWriteGuard, RwLock};

/// A process-wide registry of named reader/writer locks.
///
/// Code paths that target the same remote object but share no object
/// reference can serialize by agreeing on a key. Locks are created lazily on
/// first use and live as long as the registry; the registry is expected to be
/// created once at process start and injected into everything that needs it.
///
/// Keys are opaque to the registry. Callers build composite keys such as
/// `iam-projects/my-project-roles/viewer` and must hold at most one key at a
/// time; there is no deadlock detection.
///
/// ```
/// use google_cloud_lock::MutexKV;
///
/// async fn run(locks: &MutexKV) {
///     let _guard = locks.lock("iam-projects/my-project-roles/viewer").await;
///     // read-modify-write of the shared remote object
/// } // released on drop, including early returns
/// ```
#[derive(Default, Debug)]
pub struct MutexKV {
    store: Mutex<HashMap<String, Arc<RwLock<()>>>>,
}

impl MutexKV {
    pub fn new() -> Self {
        Self::default()
    }

    /// Acquires the exclusive lock for `key`, waiting until it is free.
    ///
    /// The lock is held until the returned guard is dropped.
    pub async fn lock(&self, key: &str) -> OwnedRwLockWriteGuard<()> {
        tracing::trace!("locking {}", key);
        let guard = self.get(key).write_owned().await;
        tracing::trace!("locked {}", key);
        guard
    }

    /// Acquires the shared lock for `key`.
    ///
    /// Readers run concurrently with each other but never with a holder of
    /// the exclusive lock for the same key.
    pub async fn read_lock(&self, key: &str) -> OwnedRwLockReadGuard<()> {
        tracing::trace!("read locking {}", key);
        let guard = self.get(key).read_owned().await;
        tracing::trace!("read locked {}", key);
        guard
    }

    /// Returns the lock registered for `key`, inserting it if absent.
    ///
    /// The registry mutex only guards the map lookup and is never held across
    /// an await, so concurrent first-touches of an unseen key all end up with
    /// the same lock instance.
    fn get(&self, key: &str) -> Arc<RwLock<()>> {
        let mut store = self.store.lock();
        match store.get(key) {
            Some(lock) => Arc::clone(lock),
            None => {
                let lock = Arc::new(RwLock::new(()));
                store.insert(key.to_string(), Arc::clone(&lock));
                lock
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::time::Duration;

    use tokio::task::JoinSet;
    use tokio::time::sleep;

    use crate::MutexKV;

    #[tokio::test(flavor = "multi_thread")]
    async fn test_lock_is_exclusive() {
        let kv = Arc::new(MutexKV::new());
        // every task first-touches the same unseen key at once, so this also
        // verifies that they all synchronize on a single lock instance
        let barrier = Arc::new(tokio::sync::Barrier::new(16));
        let inside = Arc::new(AtomicUsize::new(0));
        let mut tasks = JoinSet::new();
        for _ in 0..16 {
            let kv = Arc::clone(&kv);
            let barrier = Arc::clone(&barrier);
            let inside = Arc::clone(&inside);
            tasks.spawn(async move {
                barrier.wait().await;
                let _guard = kv.lock("balance").await;
                assert_eq!(inside.fetch_add(1, Ordering::SeqCst), 0);
                sleep(Duration::from_millis(2)).await;
                assert_eq!(inside.fetch_sub(1, Ordering::SeqCst), 1);
            });
        }
        while let Some(result) = tasks.join_next().await {
            result.unwrap();
        }
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_second_caller_waits_for_unlock() {
        let kv = Arc::new(MutexKV::new());
        let guard = kv.lock("k").await;

        let entered = Arc::new(AtomicBool::new(false));
        let waiter = {
            let kv = Arc::clone(&kv);
            let entered = Arc::clone(&entered);
            tokio::spawn(async move {
                let _guard = kv.lock("k").await;
                entered.store(true, Ordering::SeqCst);
            })
        };

        sleep(Duration::from_millis(50)).await;
        assert!(!entered.load(Ordering::SeqCst));

        drop(guard);
        waiter.await.unwrap();
        assert!(entered.load(Ordering::SeqCst));
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_readers_share_but_exclude_writer() {
        let kv = Arc::new(MutexKV::new());

        // two concurrent readers
        let first = kv.read_lock("k").await;
        let second = kv.read_lock("k").await;

        let wrote = Arc::new(AtomicBool::new(false));
        let writer = {
            let kv = Arc::clone(&kv);
            let wrote = Arc::clone(&wrote);
            tokio::spawn(async move {
                let _guard = kv.lock("k").await;
                wrote.store(true, Ordering::SeqCst);
            })
        };

        sleep(Duration::from_millis(50)).await;
        assert!(!wrote.load(Ordering::SeqCst));

        drop(first);
        drop(second);
        writer.await.unwrap();
        assert!(wrote.load(Ordering::SeqCst));
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_writer_excludes_reader() {
        let kv = Arc::new(MutexKV::new());
        let guard = kv.lock("k").await;

        let read = Arc::new(AtomicBool::new(false));
        let reader = {
            let kv = Arc::clone(&kv);
            let read = Arc::clone(&read);
            tokio::spawn(async move {
                let _guard = kv.read_lock("k").await;
                read.store(true, Ordering::SeqCst);
            })
        };

        sleep(Duration::from_millis(50)).await;
        assert!(!read.load(Ordering::SeqCst));

        drop(guard);
        reader.await.unwrap();
        assert!(read.load(Ordering::SeqCst));
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_independent_keys_do_not_block() {
        let kv = Arc::new(MutexKV::new());
        let _held = kv.lock("a").await;

        let other = {
            let kv = Arc::clone(&kv);
            tokio::spawn(async move {
                let _guard = kv.lock("b").await;
            })
        };
        // completes while "a" is still held
        tokio::time::timeout(Duration::from_secs(1), other).await.unwrap().unwrap();
    }
}
