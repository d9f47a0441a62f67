use std::collections::VecDeque;
use std::sync::Arc;

use parking_lot::Mutex;

use super::raster::InkSpan;

/// What happens when more spans are queued than a frame takes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OverflowPolicy {
    /// Nothing is dropped. A frame drains at most `capacity` spans and the
    /// rest wait for the next tick in order.
    #[default]
    SpillToNextFrame,

    /// The queue holds at most `capacity` spans; pushing onto a full queue
    /// evicts the oldest. A frame drains everything.
    DropOldest,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueueConfig {
    /// Per-frame budget (spill) or storage bound (drop-oldest). At least 1.
    pub capacity: usize,
    pub overflow: OverflowPolicy,
}

impl Default for QueueConfig {
    fn default() -> Self {
        Self {
            capacity: 4096,
            overflow: OverflowPolicy::default(),
        }
    }
}

#[derive(Debug)]
struct Inner {
    items: VecDeque<InkSpan>,
    capacity: usize,
    overflow: OverflowPolicy,
    dropped: u64,
}

/// Pending-geometry queue between the input side and the frame loop.
///
/// Cloning yields another handle to the same queue. Every operation holds the
/// lock for a bounded amount of work, so producers never wait on a frame.
#[derive(Debug, Clone)]
pub struct PendingQueue {
    inner: Arc<Mutex<Inner>>,
}

impl PendingQueue {
    pub fn new(config: QueueConfig) -> Self {
        Self {
            inner: Arc::new(Mutex::new(Inner {
                items: VecDeque::new(),
                capacity: config.capacity.max(1),
                overflow: config.overflow,
                dropped: 0,
            })),
        }
    }

    pub fn config(&self) -> QueueConfig {
        let inner = self.inner.lock();
        QueueConfig {
            capacity: inner.capacity,
            overflow: inner.overflow,
        }
    }

    pub fn push(&self, span: InkSpan) {
        let mut inner = self.inner.lock();
        if inner.overflow == OverflowPolicy::DropOldest && inner.items.len() >= inner.capacity {
            inner.items.pop_front();
            inner.dropped += 1;
            log::warn!(
                "pending queue full ({} spans); dropped oldest, {} dropped so far",
                inner.capacity,
                inner.dropped
            );
        }
        inner.items.push_back(span);
    }

    /// Takes this frame's spans, oldest first, in one locked step.
    pub fn drain_frame(&self) -> Vec<InkSpan> {
        let mut inner = self.inner.lock();
        let take = match inner.overflow {
            OverflowPolicy::SpillToNextFrame => inner.items.len().min(inner.capacity),
            OverflowPolicy::DropOldest => inner.items.len(),
        };
        let spans: Vec<InkSpan> = inner.items.drain(..take).collect();
        if !inner.items.is_empty() {
            log::trace!("{} spans spill to the next frame", inner.items.len());
        }
        spans
    }

    pub fn len(&self) -> usize {
        self.inner.lock().items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.lock().items.is_empty()
    }

    /// Discards everything queued. Returns how many spans were dropped.
    pub fn clear(&self) -> usize {
        let mut inner = self.inner.lock();
        let n = inner.items.len();
        inner.items.clear();
        n
    }

    /// Spans evicted by [`OverflowPolicy::DropOldest`] since creation.
    pub fn dropped(&self) -> u64 {
        self.inner.lock().dropped
    }
}

impl Default for PendingQueue {
    fn default() -> Self {
        Self::new(QueueConfig::default())
    }
}
