use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use tokio::sync::{Mutex, Notify};

use crate::{EventSink, Result, SinkError};

/// A published key/value pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub key: Vec<u8>,
    pub value: Vec<u8>,
}

/// Event sink that keeps every message in memory.
///
/// Used by tests and by the binary when no broker is configured.
#[derive(Debug, Clone, Default)]
pub struct InMemoryEventSink {
    messages: Arc<Mutex<Vec<Message>>>,
    published: Arc<Notify>,
    fail: Arc<AtomicBool>,
}

impl InMemoryEventSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a copy of everything published so far, oldest first.
    pub async fn messages(&self) -> Vec<Message> {
        self.messages.lock().await.clone()
    }

    /// Waits until at least `count` messages were published and returns them.
    pub async fn wait_for(&self, count: usize) -> Vec<Message> {
        loop {
            let published = self.published.notified();
            {
                let messages = self.messages.lock().await;
                if messages.len() >= count {
                    return messages.clone();
                }
            }
            published.await;
        }
    }

    /// Makes every subsequent publish fail with `Unavailable`.
    pub fn set_fail(&self, fail: bool) {
        self.fail.store(fail, Ordering::Relaxed);
    }

    pub async fn clear(&self) {
        self.messages.lock().await.clear();
    }
}

#[async_trait]
impl EventSink for InMemoryEventSink {
    async fn publish(&self, key: &[u8], value: &[u8]) -> Result<()> {
        if self.fail.load(Ordering::Relaxed) {
            return Err(SinkError::Unavailable("publishing disabled".to_string()));
        }

        self.messages.lock().await.push(Message {
            key: key.to_vec(),
            value: value.to_vec(),
        });
        self.published.notify_waiters();
        Ok(())
    }
}
