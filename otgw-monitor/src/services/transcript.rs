use std::collections::VecDeque;

/// Bounded log of formatted frame lines. Keeps the newest `capacity`
/// lines and counts what fell off the front.
#[derive(Debug, Clone)]
pub struct Transcript {
    lines: VecDeque<String>,
    capacity: usize,
    evicted: u64,
}

impl Transcript {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);

        Self {
            lines: VecDeque::with_capacity(capacity.min(4096)),
            capacity,
            evicted: 0,
        }
    }

    pub fn push(&mut self, line: impl Into<String>) {
        if self.lines.len() == self.capacity {
            self.lines.pop_front();
            self.evicted += 1;
        }
        self.lines.push_back(line.into());
    }

    /// Up to `count` newest lines, oldest first.
    pub fn tail(&self, count: usize) -> Vec<String> {
        let skip = self.lines.len().saturating_sub(count);
        self.lines.iter().skip(skip).cloned().collect()
    }

    pub fn latest(&self) -> Option<&str> {
        self.lines.back().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.lines.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn evicted(&self) -> u64 {
        self.evicted
    }

    /// Lines ever appended, including evicted ones.
    pub fn total(&self) -> u64 {
        self.evicted + self.lines.len() as u64
    }
}
