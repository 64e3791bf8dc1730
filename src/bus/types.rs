use crate::core::types::{BetsSnapshot, TokensSnapshot};
use anyhow::Result;
use async_trait::async_trait;
use std::fmt::Debug;
use std::sync::Arc;
use tokio::sync::broadcast;

// ---------- Topic trait (broadcast semantics) ----------
#[async_trait::async_trait]
pub trait Topic<T>: Sync + Send + 'static {
    /// Publish a message to all subscribers.
    async fn publish(&self, msg: T) -> Result<()>;

    /// Subscribe to the stream (each subscriber has an independent cursor).
    fn subscribe(&self) -> broadcast::Receiver<Arc<T>>;
}

// 1->N fanout, lossy under lag. Payloads travel as Arc<T>.
pub struct BroadcastTopic<T: Clone + Send + Sync + 'static> {
    tx: broadcast::Sender<Arc<T>>,
}

impl<T: Clone + Send + Sync + 'static> BroadcastTopic<T> {
    pub fn with_capacity(cap: usize) -> Self {
        let (tx, _rx) = broadcast::channel(cap);
        Self { tx }
    }
}

#[async_trait]
impl<T: Debug + Clone + Send + Sync + 'static> Topic<T> for BroadcastTopic<T> {
    async fn publish(&self, msg: T) -> Result<()> {
        // errors only when nobody is listening
        let _ = self.tx.send(Arc::new(msg));
        Ok(())
    }

    fn subscribe(&self) -> broadcast::Receiver<Arc<T>> {
        self.tx.subscribe()
    }
}

#[derive(Clone)]
pub struct Bus {
    pub bets: Arc<dyn Topic<BetsSnapshot>>,
    pub tokens: Arc<dyn Topic<TokensSnapshot>>,
}

impl Bus {
    pub fn new() -> Self {
        // snapshots are whole lists, a short buffer is plenty
        let cap = 16;

        Self {
            bets: Arc::new(BroadcastTopic::<BetsSnapshot>::with_capacity(cap)),
            tokens: Arc::new(BroadcastTopic::<TokensSnapshot>::with_capacity(cap)),
        }
    }
}
