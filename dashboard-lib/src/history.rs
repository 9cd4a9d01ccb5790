use std::collections::VecDeque;

pub const DEFAULT_HISTORY_CAPACITY: usize = 10;

/// The most recent `written_count` values, oldest first.
///
/// Values are kept in the order their sync calls resolved. Once full, each
/// push evicts the oldest value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WriteHistory {
    values: VecDeque<i64>,
    capacity: usize,
}

impl Default for WriteHistory {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_HISTORY_CAPACITY)
    }
}

impl WriteHistory {
    /// A capacity of zero is raised to one.
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            values: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    pub fn push(&mut self, written_count: i64) {
        while self.values.len() >= self.capacity {
            self.values.pop_front();
        }
        self.values.push_back(written_count);
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn to_vec(&self) -> Vec<i64> {
        self.values.iter().copied().collect()
    }
}
