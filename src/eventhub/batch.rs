//! Size-bounded event batch

/// Container of encoded events submitted to the sink in one call.
///
/// `try_add` refuses a payload that would push the batch past its size
/// limit instead of truncating or splitting it.
#[derive(Debug, Clone)]
pub struct EventBatch {
    max_size_bytes: usize,
    size_bytes: usize,
    payloads: Vec<Vec<u8>>,
}

impl EventBatch {
    /// Create an empty batch with the given size limit
    pub fn new(max_size_bytes: usize) -> Self {
        Self {
            max_size_bytes,
            size_bytes: 0,
            payloads: Vec::new(),
        }
    }

    /// Add an encoded event. Returns `false` and leaves the batch untouched
    /// when the payload does not fit.
    pub fn try_add(&mut self, payload: Vec<u8>) -> bool {
        let size = payload.len();
        if self.size_bytes + size > self.max_size_bytes {
            return false;
        }
        self.size_bytes += size;
        self.payloads.push(payload);
        true
    }

    /// Number of events in the batch
    pub fn count(&self) -> usize {
        self.payloads.len()
    }

    /// Whether the batch holds no events
    pub fn is_empty(&self) -> bool {
        self.payloads.is_empty()
    }

    /// Total encoded size of the events
    pub fn size_bytes(&self) -> usize {
        self.size_bytes
    }

    /// Size limit for this batch
    pub fn max_size_bytes(&self) -> usize {
        self.max_size_bytes
    }

    /// Encoded events, in insertion order
    pub fn payloads(&self) -> &[Vec<u8>] {
        &self.payloads
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_try_add_within_limit() {
        let mut batch = EventBatch::new(10);
        assert!(batch.is_empty());
        assert!(batch.try_add(vec![0; 4]));
        assert!(batch.try_add(vec![0; 6]));
        assert_eq!(batch.count(), 2);
        assert_eq!(batch.size_bytes(), 10);
    }

    #[test]
    fn test_try_add_rejects_oversized_payload() {
        let mut batch = EventBatch::new(10);
        assert!(!batch.try_add(vec![0; 11]));
        assert!(batch.is_empty());
        assert_eq!(batch.size_bytes(), 0);
    }

    #[test]
    fn test_try_add_rejects_overflow_without_partial_add() {
        let mut batch = EventBatch::new(10);
        assert!(batch.try_add(vec![1; 8]));
        assert!(!batch.try_add(vec![2; 3]));
        assert_eq!(batch.count(), 1);
        assert_eq!(batch.payloads()[0], vec![1; 8]);
    }
}
