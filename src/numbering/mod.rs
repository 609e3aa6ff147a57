pub mod store;

pub use store::{CounterStore, FileCounterStore, MemoryCounterStore};

use std::sync::Arc;

/// Durable monotonic generator for invoice numbers.
///
/// Storage failures never abort the request: a failed read is treated as a
/// fresh sequence and a failed write is logged and ignored, so
/// failure-interleaved use can duplicate or skip numbers. Single-writer
/// operation is assumed; the pipeline serializes calls.
pub struct SequenceCounter {
    store: Arc<dyn CounterStore>,
}

impl SequenceCounter {
    pub fn new(store: Arc<dyn CounterStore>) -> Self {
        SequenceCounter { store }
    }

    /// Advances the sequence and returns the formatted invoice number.
    pub async fn issue_next(&self) -> String {
        let current = match self.store.load().await {
            Ok(value) => value,
            Err(err) => {
                tracing::error!("error reading invoice store: {}", err);
                0
            }
        };

        let next = current + 1;
        if let Err(err) = self.store.save(next).await {
            tracing::error!("error writing invoice store: {}", err);
        }

        format!("INV-{}", next)
    }

    /// Forces the persisted sequence back to 0. Idempotent.
    pub async fn reset(&self) {
        match self.store.save(0).await {
            Ok(()) => tracing::info!("invoice count reset to 0"),
            Err(err) => tracing::error!("error resetting invoice count: {}", err),
        }
    }
}
