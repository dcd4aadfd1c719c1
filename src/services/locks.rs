use std::collections::HashMap;
use std::sync::{Arc, Mutex as StdMutex, PoisonError};
use tokio::sync::{Mutex, OwnedMutexGuard};

/// Per-document async locks.
///
/// Read-modify-write updates (saved lists, ratings, comments, save counters)
/// hold the lock of the document they rewrite so concurrent requests in this
/// process cannot interleave their read and write.
///
/// A lock stays in the table while any guard or waiter holds it. Unused
/// locks are pruned once the table grows past `prune_threshold`.
pub struct DocumentLocks {
    locks: StdMutex<HashMap<String, Arc<Mutex<()>>>>,
    prune_threshold: usize,
}

impl DocumentLocks {
    pub fn new(prune_threshold: usize) -> Self {
        Self {
            locks: StdMutex::new(HashMap::new()),
            prune_threshold: prune_threshold.max(1),
        }
    }

    fn key(collection: &str, document_id: &str) -> String {
        format!("{}/{}", collection, document_id)
    }

    /// Wait for and take the lock of one document
    pub async fn acquire(&self, collection: &str, document_id: &str) -> OwnedMutexGuard<()> {
        let lock = {
            let mut locks = self.locks.lock().unwrap_or_else(PoisonError::into_inner);
            if locks.len() >= self.prune_threshold {
                // Only the table holds these
                locks.retain(|_, lock| Arc::strong_count(lock) > 1);
            }
            locks
                .entry(Self::key(collection, document_id))
                .or_insert_with(|| Arc::new(Mutex::new(())))
                .clone()
        };
        lock.lock_owned().await
    }

    /// Number of locks currently tracked
    pub fn len(&self) -> usize {
        self.locks.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for DocumentLocks {
    fn default() -> Self {
        Self::new(10_000)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn test_same_document_is_exclusive() {
        let locks = DocumentLocks::default();

        let guard = locks.acquire("users", "u1").await;
        let second = tokio::time::timeout(Duration::from_millis(50), locks.acquire("users", "u1")).await;
        assert!(second.is_err(), "second acquire should block while the first is held");

        drop(guard);
        let third = tokio::time::timeout(Duration::from_millis(500), locks.acquire("users", "u1")).await;
        assert!(third.is_ok());
    }

    #[tokio::test]
    async fn test_different_documents_do_not_block() {
        let locks = DocumentLocks::default();

        let _a = locks.acquire("users", "u1").await;
        let b = tokio::time::timeout(Duration::from_millis(500), locks.acquire("users", "u2")).await;
        assert!(b.is_ok());
    }

    #[tokio::test]
    async fn test_held_lock_survives_pruning() {
        let locks = DocumentLocks::new(2);

        let held = locks.acquire("recipes", "r1").await;
        for i in 0..50 {
            let _g = locks.acquire("recipes", &format!("other-{}", i)).await;
        }

        let again = tokio::time::timeout(Duration::from_millis(50), locks.acquire("recipes", "r1")).await;
        assert!(again.is_err(), "pruning must not replace a lock that is held");

        drop(held);
        assert!(locks.len() <= 3);
    }
}
