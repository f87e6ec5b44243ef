//! Per-document critical sections.
//!
//! Baseline capture, proposal transition and content swap for one document
//! run under that document's lock. Distinct documents never contend.
//! Entries are weak so idle documents cost nothing.

use std::collections::HashMap;
use std::sync::{Arc, Weak};
use tokio::sync::{Mutex, OwnedMutexGuard};

use crate::domain::foundation::DocumentId;

#[derive(Default)]
pub struct DocumentLocks {
    locks: Mutex<HashMap<DocumentId, Weak<Mutex<()>>>>,
}

impl DocumentLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wait for exclusive access to one document.
    pub async fn acquire(&self, id: &DocumentId) -> OwnedMutexGuard<()> {
        let lock = {
            let mut locks = self.locks.lock().await;
            locks.retain(|_, weak| weak.strong_count() > 0);
            match locks.get(id).and_then(Weak::upgrade) {
                Some(lock) => lock,
                None => {
                    let lock = Arc::new(Mutex::new(()));
                    locks.insert(*id, Arc::downgrade(&lock));
                    lock
                }
            }
        };
        lock.lock_owned().await
    }

    /// Number of documents currently locked or awaited.
    pub async fn active(&self) -> usize {
        self.locks
            .lock()
            .await
            .values()
            .filter(|weak| weak.strong_count() > 0)
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    #[tokio::test]
    async fn same_document_is_mutually_exclusive() {
        let locks = Arc::new(DocumentLocks::new());
        let id = DocumentId::new();
        let inside = Arc::new(AtomicUsize::new(0));
        let max_seen = Arc::new(AtomicUsize::new(0));

        let mut handles = Vec::new();
        for _ in 0..8 {
            let (locks, inside, max_seen) = (locks.clone(), inside.clone(), max_seen.clone());
            handles.push(tokio::spawn(async move {
                let _guard = locks.acquire(&id).await;
                let now = inside.fetch_add(1, Ordering::SeqCst) + 1;
                max_seen.fetch_max(now, Ordering::SeqCst);
                tokio::time::sleep(Duration::from_millis(2)).await;
                inside.fetch_sub(1, Ordering::SeqCst);
            }));
        }
        for h in handles {
            h.await.unwrap();
        }
        assert_eq!(max_seen.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn different_documents_do_not_contend() {
        let locks = DocumentLocks::new();
        let _a = locks.acquire(&DocumentId::new()).await;
        let b = tokio::time::timeout(Duration::from_millis(100), locks.acquire(&DocumentId::new())).await;
        assert!(b.is_ok());
    }

    #[tokio::test]
    async fn released_locks_are_forgotten() {
        let locks = DocumentLocks::new();
        {
            let _guard = locks.acquire(&DocumentId::new()).await;
            assert_eq!(locks.active().await, 1);
        }
        assert_eq!(locks.active().await, 0);
    }
}
