/// Fixed-capacity ring with push-evict-oldest semantics.
///
/// Backed by a `heapless::Deque`, so storage is inline and bounded by the
/// const parameter `N`. A runtime `limit` (1..=N) lets configuration shrink
/// the effective capacity without changing the type.
use heapless::Deque;

#[derive(Debug)]
pub struct BoundedRing<T, const N: usize> {
    items: Deque<T, N>,
    limit: usize,
}

impl<T, const N: usize> BoundedRing<T, N> {
    /// Create a ring holding at most `limit` entries (clamped to 1..=N).
    pub fn new(limit: usize) -> Self {
        let clamped = limit.clamp(1, N);
        if clamped != limit {
            log::warn!("Ring capacity {} out of range, using {}", limit, clamped);
        }
        Self {
            items: Deque::new(),
            limit: clamped,
        }
    }

    /// Append `item`, evicting and returning the oldest entry when full.
    pub fn push(&mut self, item: T) -> Option<T> {
        let evicted = if self.items.len() >= self.limit {
            self.items.pop_front()
        } else {
            None
        };
        // Cannot fail: len < limit <= N after the eviction above.
        let _ = self.items.push_back(item);
        evicted
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Effective capacity.
    pub fn capacity(&self) -> usize {
        self.limit
    }

    /// Entry at position `index`, oldest first.
    pub fn get(&self, index: usize) -> Option<&T> {
        self.items.iter().nth(index)
    }

    pub fn newest(&self) -> Option<&T> {
        self.items.back()
    }

    /// Iterate oldest to newest.
    pub fn iter(&self) -> impl Iterator<Item = &T> + '_ {
        self.items.iter()
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }
}
