use crate::bus::Event;
use std::future::Future;
use std::sync::Arc;
use tokio::sync::broadcast;
use tracing::{debug, warn};

/// Lag-tolerant receiving for bus subscriptions.
///
/// A slow subscriber that falls behind the channel capacity skips the
/// overwritten events and continues from the oldest one still buffered.
pub trait EventReceiverExt<T> {
    /// Receive the next event, returning `None` when the bus was shut down.
    fn next_event(&mut self) -> impl Future<Output = Option<Arc<T>>> + Send;

    /// Return an already buffered event without waiting.
    fn try_next_event(&mut self) -> Option<Arc<T>>;
}

impl<T: Event> EventReceiverExt<T> for broadcast::Receiver<Arc<T>> {
    async fn next_event(&mut self) -> Option<Arc<T>> {
        let mut skipped = 0u64;

        loop {
            match self.recv().await {
                Ok(event) => {
                    if skipped > 0 {
                        warn!(
                            event = std::any::type_name::<T>(),
                            skipped, "Subscriber lagged; continuing from oldest buffered event"
                        );
                    }
                    return Some(event);
                },
                Err(broadcast::error::RecvError::Lagged(n)) => {
                    skipped = skipped.saturating_add(n);
                    debug!(event = std::any::type_name::<T>(), skipped = n, "Subscriber lagged");
                },
                Err(broadcast::error::RecvError::Closed) => return None,
            }
        }
    }

    fn try_next_event(&mut self) -> Option<Arc<T>> {
        loop {
            match self.try_recv() {
                Ok(event) => return Some(event),
                Err(broadcast::error::TryRecvError::Lagged(n)) => {
                    debug!(event = std::any::type_name::<T>(), skipped = n, "Subscriber lagged");
                },
                Err(_) => return None,
            }
        }
    }
}
