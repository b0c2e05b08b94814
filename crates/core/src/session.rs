//! Chat id → conversation thread registry.
//!
//! Each chat gets exactly one thread for the lifetime of the process. Creation
//! goes through a per-chat `OnceCell`, so concurrent first messages for the same
//! chat share a single thread instead of racing to create two.

use std::collections::HashMap;
use std::future::Future;
use std::sync::{Arc, Mutex, PoisonError};
use tokio::sync::{MutexGuard, OnceCell};

/// The association between a chat and its assistant thread.
#[derive(Debug)]
pub struct Session {
    chat_id: String,
    thread_id: String,
    // Held for the whole append → run → poll sequence of one exchange.
    exchange: tokio::sync::Mutex<()>,
}

impl Session {
    fn new(chat_id: &str, thread_id: String) -> Self {
        Self {
            chat_id: chat_id.to_string(),
            thread_id,
            exchange: tokio::sync::Mutex::new(()),
        }
    }

    pub fn chat_id(&self) -> &str {
        &self.chat_id
    }

    pub fn thread_id(&self) -> &str {
        &self.thread_id
    }

    pub(crate) async fn lock_exchange(&self) -> MutexGuard<'_, ()> {
        self.exchange.lock().await
    }
}

type Slot = Arc<OnceCell<Arc<Session>>>;

#[derive(Debug, Default)]
pub struct SessionStore {
    slots: Mutex<HashMap<String, Slot>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn slot(&self, chat_id: &str) -> Slot {
        let mut slots = self.slots.lock().unwrap_or_else(PoisonError::into_inner);
        slots.entry(chat_id.to_string()).or_default().clone()
    }

    /// Returns the session for `chat_id`, calling `create` for a thread id if
    /// there is none yet.
    ///
    /// `create` runs at most once per chat even under concurrent callers; the
    /// others wait for it. If it fails, nothing is stored and the next call tries
    /// again.
    pub async fn get_or_create<F, Fut, E>(
        &self,
        chat_id: &str,
        create: F,
    ) -> Result<Arc<Session>, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<String, E>>,
    {
        let slot = self.slot(chat_id);
        let created = slot
            .get_or_try_init(|| async move {
                let thread_id = create().await?;
                tracing::info!("chat {} bound to thread {}", chat_id, thread_id);
                Ok::<_, E>(Arc::new(Session::new(chat_id, thread_id)))
            })
            .await
            .map(Arc::clone);
        if created.is_err() {
            self.discard_empty(chat_id, &slot);
        }
        created
    }

    // Drops a slot left empty by a failed creation unless another caller still holds it.
    fn discard_empty(&self, chat_id: &str, slot: &Slot) {
        let mut slots = self.slots.lock().unwrap_or_else(PoisonError::into_inner);
        let unused = slots.get(chat_id).is_some_and(|current| {
            Arc::ptr_eq(current, slot) && !current.initialized() && Arc::strong_count(current) == 2
        });
        if unused {
            slots.remove(chat_id);
        }
    }

    pub fn get(&self, chat_id: &str) -> Option<Arc<Session>> {
        let slots = self.slots.lock().unwrap_or_else(PoisonError::into_inner);
        slots.get(chat_id).and_then(|slot| slot.get().cloned())
    }

    /// Number of chats with a thread.
    pub fn len(&self) -> usize {
        let slots = self.slots.lock().unwrap_or_else(PoisonError::into_inner);
        slots.values().filter(|slot| slot.initialized()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn chat_ids(&self) -> Vec<String> {
        let slots = self.slots.lock().unwrap_or_else(PoisonError::into_inner);
        let mut ids: Vec<String> = slots
            .iter()
            .filter(|(_, slot)| slot.initialized())
            .map(|(id, _)| id.clone())
            .collect();
        ids.sort();
        ids
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::convert::Infallible;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    #[tokio::test]
    async fn second_call_for_same_chat_is_a_no_op() {
        let store = SessionStore::new();
        let calls = AtomicUsize::new(0);

        let first = store
            .get_or_create("chat-1", || async {
                calls.fetch_add(1, Ordering::SeqCst);
                Ok::<_, Infallible>("thread_1".to_string())
            })
            .await
            .unwrap();
        let second = store
            .get_or_create("chat-1", || async {
                calls.fetch_add(1, Ordering::SeqCst);
                Ok::<_, Infallible>("thread_2".to_string())
            })
            .await
            .unwrap();

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(store.len(), 1);
        assert_eq!(first.thread_id(), "thread_1");
        assert_eq!(second.thread_id(), "thread_1");
    }

    #[tokio::test(start_paused = true)]
    async fn concurrent_first_calls_create_one_thread() {
        let store = Arc::new(SessionStore::new());
        let calls = Arc::new(AtomicUsize::new(0));

        let spawn_create = |thread_id: &'static str| {
            let store = Arc::clone(&store);
            let calls = Arc::clone(&calls);
            tokio::spawn(async move {
                store
                    .get_or_create("chat-new", || async move {
                        calls.fetch_add(1, Ordering::SeqCst);
                        // Suspend mid-creation so the other caller gets to run.
                        tokio::time::sleep(Duration::from_millis(50)).await;
                        Ok::<_, Infallible>(thread_id.to_string())
                    })
                    .await
                    .unwrap()
            })
        };

        let (a, b) = tokio::join!(spawn_create("thread_a"), spawn_create("thread_b"));
        let (a, b) = (a.unwrap(), b.unwrap());

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(a.thread_id(), b.thread_id());
        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn failed_creation_is_retried_on_next_call() {
        let store = SessionStore::new();

        let err = store
            .get_or_create("chat-1", || async { Err::<String, _>("service down") })
            .await
            .unwrap_err();
        assert_eq!(err, "service down");
        assert!(store.get("chat-1").is_none());
        assert!(store.is_empty());

        let session = store
            .get_or_create("chat-1", || async { Ok::<_, &str>("thread_1".to_string()) })
            .await
            .unwrap();
        assert_eq!(session.chat_id(), "chat-1");
        assert_eq!(store.chat_ids(), vec!["chat-1".to_string()]);
    }

    #[tokio::test]
    async fn failed_creations_leave_no_slots_behind() {
        let store = SessionStore::new();

        for n in 0..5 {
            let chat_id = format!("chat-{n}");
            let result = store
                .get_or_create(&chat_id, || async { Err::<String, _>("service down") })
                .await;
            assert!(result.is_err());
        }

        assert!(store.slots.lock().unwrap().is_empty());
        assert!(store.chat_ids().is_empty());
    }
}
