//! Capacity-bounded FIFO store of [`Series`] with epoch-style sampling.

use crate::experience::Series;
use crate::RlError;
use parking_lot::{Mutex, MutexGuard};
use std::collections::VecDeque;
use std::sync::Arc;
use tracing::debug;

/// Replay memory holding the most recent `capacity` series.
///
/// Insertion happens in batches through [`ReplayMemory::ingest`]; eviction of
/// the oldest entries runs once the whole batch is appended.
pub struct ReplayMemory {
    buffer: VecDeque<Arc<Series>>,
    capacity: usize,
    rng: fastrand::Rng,
    evicted: u64,
}

impl ReplayMemory {
    pub fn new(capacity: usize, seed: u64) -> Result<Self, RlError> {
        if capacity == 0 {
            return Err(RlError::InvalidConfig("replay capacity must be non-zero".into()));
        }
        Ok(Self {
            buffer: VecDeque::new(),
            capacity,
            rng: fastrand::Rng::with_seed(seed),
            evicted: 0,
        })
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    /// Series evicted since construction.
    pub fn evicted(&self) -> u64 {
        self.evicted
    }

    /// Stored series, oldest first.
    pub fn iter(&self) -> impl Iterator<Item = &Series> {
        self.buffer.iter().map(AsRef::as_ref)
    }

    /// Appends `series` in order, then evicts from the front until the
    /// memory fits its capacity. Returns how many entries were evicted.
    pub fn ingest(&mut self, series: impl IntoIterator<Item = Series>) -> usize {
        self.buffer.extend(series.into_iter().map(Arc::new));
        let overflow = self.buffer.len().saturating_sub(self.capacity);
        if overflow > 0 {
            self.buffer.drain(..overflow);
            self.evicted += overflow as u64;
            debug!(evicted = overflow, size = self.buffer.len(), "replay memory evicted oldest series");
        }
        overflow
    }

    /// Shuffles the current contents and splits them into chunks of
    /// `batch_size`; the last chunk holds the remainder. Every stored series
    /// appears in exactly one chunk. An empty memory yields no chunks.
    pub fn sample_batch(&mut self, batch_size: usize) -> Result<Batches, RlError> {
        if batch_size == 0 {
            return Err(RlError::InvalidConfig("batch size must be non-zero".into()));
        }
        let mut items: Vec<Arc<Series>> = self.buffer.iter().cloned().collect();
        self.rng.shuffle(&mut items);
        Ok(Batches { items, batch_size, offset: 0 })
    }

    pub fn clear(&mut self) {
        self.buffer.clear();
    }
}

/// Lazily yields the chunks of one shuffled pass over a [`ReplayMemory`].
pub struct Batches {
    items: Vec<Arc<Series>>,
    batch_size: usize,
    offset: usize,
}

impl Iterator for Batches {
    type Item = Vec<Arc<Series>>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.offset >= self.items.len() {
            return None;
        }
        let end = (self.offset + self.batch_size).min(self.items.len());
        let chunk = self.items[self.offset..end].to_vec();
        self.offset = end;
        Some(chunk)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = (self.items.len() - self.offset).div_ceil(self.batch_size);
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for Batches {}

/// Cloneable handle that serializes access to one [`ReplayMemory`] between
/// a collecting worker and a training worker.
#[derive(Clone)]
pub struct SharedReplayMemory {
    inner: Arc<Mutex<ReplayMemory>>,
}

impl SharedReplayMemory {
    pub fn new(memory: ReplayMemory) -> Self {
        Self { inner: Arc::new(Mutex::new(memory)) }
    }

    pub fn ingest(&self, series: impl IntoIterator<Item = Series>) -> usize {
        self.inner.lock().ingest(series)
    }

    pub fn len(&self) -> usize {
        self.inner.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.lock().is_empty()
    }

    /// Like [`ReplayMemory::sample_batch`], but collects every chunk before
    /// releasing the lock so training never holds it.
    pub fn sample_batch(&self, batch_size: usize) -> Result<Vec<Vec<Arc<Series>>>, RlError> {
        Ok(self.inner.lock().sample_batch(batch_size)?.collect())
    }

    pub fn lock(&self) -> MutexGuard<'_, ReplayMemory> {
        self.inner.lock()
    }
}
